use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smartsched_core::{Priority, Task, TaskId, UserId};

/// A task read from an external source, before the store assigns it an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub required_hours: f64,
    pub due_date: Option<DateTime<Utc>>,
    pub category: Option<String>,
}

impl TaskDraft {
    pub fn into_task(self, id: TaskId, user_id: UserId) -> Task {
        Task {
            id,
            user_id,
            title: self.title,
            description: self.description,
            priority: self.priority,
            required_hours: self.required_hours,
            due_date: self.due_date,
            category: self.category,
        }
    }
}
