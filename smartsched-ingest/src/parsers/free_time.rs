//! Free-time interval parser (text)
//!
//! One interval per line:
//!   Mon 18:00-21:00
//!   saturday 9:00 - 12:30
//!
//!   Fri 20:00-24:00
//!
//! An end of `24:00` (or `00:00`) means midnight at the close of that day.
//! Blank lines and lines starting with `#` are ignored.

use anyhow::{bail, Context, Result};
use chrono::{NaiveTime, Weekday};
use regex::Regex;
use smartsched_core::FreeTimeInterval;

fn interval_re() -> Result<Regex> {
    Ok(Regex::new(concat!(
        r"^\s*(?P<day>[A-Za-z]+)\s+",
        r"(?P<start>\d{1,2}:\d{2})\s*-\s*",
        r"(?P<end>\d{1,2}:\d{2})\s*$"
    ))?)
}

fn parse_with(re: &Regex, line: &str) -> Result<FreeTimeInterval> {
    let caps = re
        .captures(line)
        .with_context(|| format!("expected '<day> HH:MM-HH:MM', got '{}'", line.trim()))?;

    let day: Weekday = caps["day"]
        .parse()
        .map_err(|_| anyhow::anyhow!("unknown weekday '{}'", &caps["day"]))?;
    let start = NaiveTime::parse_from_str(&caps["start"], "%H:%M")
        .with_context(|| format!("invalid start time '{}'", &caps["start"]))?;
    let end = match &caps["end"] {
        "24:00" => NaiveTime::MIN,
        raw => NaiveTime::parse_from_str(raw, "%H:%M")
            .with_context(|| format!("invalid end time '{raw}'"))?,
    };

    let interval = FreeTimeInterval::new(day, start, end);
    if !interval.is_valid() {
        bail!("interval must end after it starts: '{}'", line.trim());
    }

    Ok(interval)
}

/// Parse a single "Mon 18:00-21:00" line.
pub fn parse_free_time_line(line: &str) -> Result<FreeTimeInterval> {
    parse_with(&interval_re()?, line)
}

/// Parse a block of interval lines.
pub fn parse_free_time(text: &str) -> Result<Vec<FreeTimeInterval>> {
    let re = interval_re()?;
    let mut out = Vec::new();

    for (i, line) in text.lines().enumerate() {
        let l = line.trim();
        if l.is_empty() || l.starts_with('#') {
            continue;
        }
        out.push(parse_with(&re, l).with_context(|| format!("line {}", i + 1))?);
    }

    Ok(out)
}
