//! Plain-text rendering of tasks and schedules.

use anyhow::Result;
use std::fmt::Write;

use smartsched_core::{format_local, CostModel, Schedule, Task, User};

pub fn task_line(task: &Task, tz: &str) -> Result<String> {
    let mut s = format!(
        "#{} [{}] {} ({}h)",
        task.id, task.priority, task.title, task.required_hours
    );
    if let Some(due) = task.due_date {
        write!(s, " due {}", format_local(due, tz)?)?;
    }
    if let Some(category) = &task.category {
        write!(s, " {{{category}}}")?;
    }
    Ok(s)
}

/// Render `schedule` for `user`. `tasks` must be the exact input the
/// dispatcher saw, since assignments refer to tasks by position.
pub fn render_schedule(
    schedule: &Schedule,
    tasks: &[Task],
    user: &User,
    cost: &CostModel,
    budget: Option<f64>,
    tz: &str,
) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "{} schedule for {} ({} tasks)", schedule.algorithm(), user.username, tasks.len())?;

    if schedule.is_empty() {
        writeln!(out, "(nothing scheduled)")?;
        return Ok(out);
    }

    match schedule {
        Schedule::Assignment(slots) => {
            let mut rows: Vec<(usize, &Task)> = slots.iter().copied().zip(tasks).collect();
            rows.sort_by_key(|(slot, _)| *slot);
            let mut total = 0.0;
            for (slot, task) in rows {
                let c = cost.effective_cost(task, user);
                total += c;
                writeln!(out, "slot {slot}: {} cost={c}", task_line(task, tz)?)?;
            }
            writeln!(out, "total cost: {total}")?;
        }
        Schedule::Selection(picked) => {
            for task in picked {
                writeln!(
                    out,
                    "- {} priority={}",
                    task_line(task, tz)?,
                    cost.effective_priority(task, user)
                )?;
            }
            let priority: u64 = picked
                .iter()
                .map(|t| u64::from(cost.effective_priority(t, user)))
                .sum();
            let hours: f64 = picked.iter().map(|t| t.required_hours).sum();
            write!(out, "selected {} of {}: priority {priority}, {hours}h", picked.len(), tasks.len())?;
            match budget {
                Some(b) => writeln!(out, " of {b}h budget")?,
                None => writeln!(out)?,
            }
        }
        Schedule::Ordering(order) => {
            let mut elapsed = 0.0;
            for (i, task) in order.iter().enumerate() {
                elapsed += cost.effective_cost(task, user);
                writeln!(out, "{:>2}. {} (done at +{elapsed}h)", i + 1, task_line(task, tz)?)?;
            }
        }
    }
    Ok(out)
}
