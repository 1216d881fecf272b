//! Cost model: task + user => effective cost (hours) and effective priority.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::task::Task;
use crate::user::User;

/// Hobby-aware cost model.
///
/// A task whose category matches any of the user's hobbies (case-insensitive)
/// gets exactly one bonus: `hour_bonus` off its cost and `priority_bonus` on
/// its priority. Matching several hobbies does not stack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostModel {
    pub hour_bonus: f64,
    pub priority_bonus: u32,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            hour_bonus: 1.0,
            priority_bonus: 1,
        }
    }
}

impl CostModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hobby_match(&self, task: &Task, user: &User) -> bool {
        task.category
            .as_deref()
            .is_some_and(|category| user.has_hobby(category))
    }

    /// Required hours minus the hobby bonus, floored at zero.
    pub fn effective_cost(&self, task: &Task, user: &User) -> f64 {
        let cost = if self.hobby_match(task, user) {
            task.required_hours - self.hour_bonus
        } else {
            task.required_hours
        };
        cost.max(0.0)
    }

    /// Base priority rank plus the hobby bonus.
    pub fn effective_priority(&self, task: &Task, user: &User) -> u32 {
        let base = task.priority.rank();
        if self.hobby_match(task, user) {
            base.saturating_add(self.priority_bonus)
        } else {
            base
        }
    }
}

/// Reject tasks the solvers cannot reason about (negative, NaN or infinite hours).
pub(crate) fn validate_hours(tasks: &[Task]) -> Result<()> {
    match tasks.iter().find(|t| !t.required_hours.is_finite() || t.required_hours < 0.0) {
        Some(t) => Err(ScheduleError::InvalidHours {
            task: t.id,
            hours: t.required_hours,
        }),
        None => Ok(()),
    }
}
