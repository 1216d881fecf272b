//! Task model consumed by the solvers.
//!
//! Tasks are plain records: storage lives in `smartsched-store`, and nothing in
//! this crate ever writes derived cost/priority back onto a task.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type TaskId = u64;
pub type UserId = u64;

/// Ordered priority rank.
///
/// The three named ranks cover what the UI offers; any other rank is accepted
/// so imported data can carry a finer numeric scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "PriorityRepr", into = "PriorityRepr")]
pub struct Priority(u32);

impl Priority {
    pub const LOW: Priority = Priority(0);
    pub const MEDIUM: Priority = Priority(1);
    pub const HIGH: Priority = Priority(2);

    pub const fn from_rank(rank: u32) -> Self {
        Self(rank)
    }

    /// Ordinal used as the base value by the cost model.
    pub const fn rank(self) -> u32 {
        self.0
    }

    fn name(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("low"),
            1 => Some("medium"),
            2 => Some("high"),
            _ => None,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::MEDIUM
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{}", self.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePriorityError(String);

impl fmt::Display for ParsePriorityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid priority '{}' (expected low, medium, high or a rank)", self.0)
    }
}

impl std::error::Error for ParsePriorityError {}

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        match t.to_lowercase().as_str() {
            "low" => Ok(Priority::LOW),
            "medium" | "med" => Ok(Priority::MEDIUM),
            "high" => Ok(Priority::HIGH),
            other => other
                .parse::<u32>()
                .map(Priority)
                .map_err(|_| ParsePriorityError(t.to_string())),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum PriorityRepr {
    Rank(u32),
    Named(String),
}

impl TryFrom<PriorityRepr> for Priority {
    type Error = ParsePriorityError;

    fn try_from(repr: PriorityRepr) -> Result<Self, Self::Error> {
        match repr {
            PriorityRepr::Rank(r) => Ok(Priority(r)),
            PriorityRepr::Named(s) => s.parse(),
        }
    }
}

impl From<Priority> for PriorityRepr {
    fn from(p: Priority) -> Self {
        match p.name() {
            Some(name) => PriorityRepr::Named(name.to_string()),
            None => PriorityRepr::Rank(p.0),
        }
    }
}

/// Core task type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub user_id: UserId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Priority,

    /// Hours of work; must be non-negative to be schedulable.
    pub required_hours: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,

    /// Free-text tag matched against the owner's hobbies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Task {
    pub fn new(id: TaskId, title: impl Into<String>) -> Self {
        Self {
            id,
            user_id: 0,
            title: title.into(),
            description: None,
            priority: Priority::MEDIUM,
            required_hours: 1.0,
            due_date: None,
            category: None,
        }
    }

    pub fn with_user(mut self, user_id: UserId) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_hours(mut self, hours: f64) -> Self {
        self.required_hours = hours;
        self
    }

    pub fn with_due_date(mut self, due: DateTime<Utc>) -> Self {
        self.due_date = Some(due);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_parse_named_and_rank() {
        assert_eq!("High".parse::<Priority>().unwrap(), Priority::HIGH);
        assert_eq!(" low ".parse::<Priority>().unwrap(), Priority::LOW);
        assert_eq!("5".parse::<Priority>().unwrap().rank(), 5);
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn test_priority_ordering_follows_rank() {
        assert!(Priority::LOW < Priority::MEDIUM);
        assert!(Priority::HIGH < Priority::from_rank(3));
    }

    #[test]
    fn test_task_serde_accepts_both_priority_forms() {
        let named: Task = serde_json::from_str(
            r#"{"id":1,"user_id":2,"title":"read","priority":"high","required_hours":2.0}"#,
        )
        .unwrap();
        assert_eq!(named.priority, Priority::HIGH);
        assert_eq!(named.category, None);

        let ranked: Task = serde_json::from_str(
            r#"{"id":1,"user_id":2,"title":"read","priority":7,"required_hours":2.0}"#,
        )
        .unwrap();
        assert_eq!(ranked.priority.rank(), 7);

        let json = serde_json::to_string(&named).unwrap();
        assert!(json.contains(r#""priority":"high""#));
        assert!(!json.contains("due_date"));
    }
}
