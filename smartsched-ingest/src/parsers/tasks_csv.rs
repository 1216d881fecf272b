//! Task list CSV import.
//!
//! Expected header (case-insensitive, any column order):
//! title,description,priority,hours,due,category
//!
//! Only `title` and `hours` are required per row. `priority` takes
//! low/medium/high or a numeric rank; `due` takes "YYYY-MM-DD[ HH:MM]" in the
//! caller's timezone.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use smartsched_core::{parse_due_date, Priority};
use std::io;
use std::path::Path;

use crate::types::TaskDraft;

#[derive(Debug, Deserialize)]
struct TaskRow {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    priority: Option<String>,
    #[serde(default)]
    hours: Option<String>,
    #[serde(default)]
    due: Option<String>,
    #[serde(default)]
    category: Option<String>,
}

/// Parse a task CSV file.
pub fn parse_tasks_csv(path: impl AsRef<Path>, tz: &str) -> Result<Vec<TaskDraft>> {
    let file = std::fs::File::open(path.as_ref())
        .with_context(|| format!("opening {}", path.as_ref().display()))?;
    parse_tasks_csv_reader(file, tz)
        .with_context(|| format!("parsing {}", path.as_ref().display()))
}

pub fn parse_tasks_csv_reader<R: io::Read>(reader: R, tz: &str) -> Result<Vec<TaskDraft>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: csv::StringRecord = rdr
        .headers()
        .context("reading CSV header")?
        .iter()
        .map(|h| h.to_lowercase())
        .collect();
    if !headers.iter().any(|h| h == "title") || !headers.iter().any(|h| h == "hours") {
        bail!("CSV header must contain 'title' and 'hours' columns");
    }

    let mut out = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let line = record.position().map_or(0, |p| p.line());
        let row: TaskRow = record
            .deserialize(Some(&headers))
            .with_context(|| format!("line {line}: malformed row"))?;

        let Some(title) = non_blank(row.title) else {
            continue;
        };

        let hours_raw = non_blank(row.hours)
            .with_context(|| format!("line {line}: missing hours for '{title}'"))?;
        let required_hours: f64 = hours_raw
            .parse()
            .with_context(|| format!("line {line}: invalid hours '{hours_raw}'"))?;
        if !required_hours.is_finite() || required_hours < 0.0 {
            bail!("line {line}: hours must be a finite number >= 0, got {hours_raw}");
        }

        let priority = match non_blank(row.priority) {
            Some(p) => p
                .parse::<Priority>()
                .with_context(|| format!("line {line}: bad priority"))?,
            None => Priority::default(),
        };

        let due_date = match non_blank(row.due) {
            Some(d) => Some(parse_due_date(&d, tz).with_context(|| format!("line {line}"))?),
            None => None,
        };

        out.push(TaskDraft {
            title,
            description: non_blank(row.description),
            priority,
            required_hours,
            due_date,
            category: non_blank(row.category),
        });
    }

    Ok(out)
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}
