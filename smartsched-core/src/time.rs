//! Time utilities: timezone-aware due dates.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

fn parse_tz(tz: &str) -> Result<Tz> {
    tz.parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))
}

/// Parse a due date like "2026-02-20 23:59" (or a bare "2026-02-20", meaning
/// 23:59 that day) in an IANA tz like "Europe/Bucharest", returning UTC.
pub fn parse_due_date(local: &str, tz: &str) -> Result<DateTime<Utc>> {
    let tz = parse_tz(tz)?;
    let local = local.trim();

    let ndt = match NaiveDateTime::parse_from_str(local, "%Y-%m-%d %H:%M") {
        Ok(ndt) => ndt,
        Err(_) => {
            let date = NaiveDate::parse_from_str(local, "%Y-%m-%d")
                .map_err(|e| anyhow::anyhow!("invalid due date '{local}': {e}"))?;
            date.and_hms_opt(23, 59, 0)
                .ok_or_else(|| anyhow::anyhow!("invalid due date '{local}'"))?
        }
    };

    let local_dt = tz
        .from_local_datetime(&ndt)
        .single()
        .ok_or_else(|| anyhow::anyhow!("ambiguous or invalid local time (DST?): {local} {tz}"))?;

    Ok(local_dt.with_timezone(&Utc))
}

/// Render a UTC instant as "YYYY-MM-DD HH:MM" in `tz`.
pub fn format_local(dt: DateTime<Utc>, tz: &str) -> Result<String> {
    let tz = parse_tz(tz)?;
    Ok(dt.with_timezone(&tz).format("%Y-%m-%d %H:%M").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bucharest_due_date() {
        // February is EET (UTC+2)
        let utc = parse_due_date("2026-02-20 23:59", "Europe/Bucharest").unwrap();
        assert_eq!(utc.to_rfc3339(), "2026-02-20T21:59:00+00:00");
    }

    #[test]
    fn test_bare_date_means_end_of_day() {
        let utc = parse_due_date("2026-07-01", "UTC").unwrap();
        assert_eq!(utc.to_rfc3339(), "2026-07-01T23:59:00+00:00");
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(parse_due_date("tomorrow", "UTC").is_err());
        assert!(parse_due_date("2026-07-01", "Mars/Olympus").is_err());
    }

    #[test]
    fn test_format_local_round_trips() {
        let utc = parse_due_date("2026-03-10 09:30", "America/Chicago").unwrap();
        assert_eq!(format_local(utc, "America/Chicago").unwrap(), "2026-03-10 09:30");
    }
}
