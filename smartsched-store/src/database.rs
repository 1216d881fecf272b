//! In-memory database behind the repository traits.

use std::collections::BTreeMap;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use smartsched_core::{FreeTimeInterval, Hobby, Task, TaskId, User, UserId};

use crate::repository::{FreeTimeRepository, HobbyRepository, TaskRepository, UserRepository};

/// All persisted records. Ids are assigned from monotonically increasing
/// counters and never reused, even after deletes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Database {
    #[serde(default)]
    next_user_id: UserId,
    #[serde(default)]
    next_task_id: TaskId,
    #[serde(default)]
    next_interval_id: u64,
    #[serde(default)]
    users: BTreeMap<UserId, User>,
    #[serde(default)]
    tasks: BTreeMap<TaskId, Task>,
}

fn check_window(interval: &FreeTimeInterval) -> Result<()> {
    if !interval.is_valid() {
        bail!(
            "free time {} {}-{} must end after it starts",
            interval.day,
            interval.start.format("%H:%M"),
            interval.end.format("%H:%M")
        );
    }
    Ok(())
}

fn bump(counter: &mut u64) -> u64 {
    *counter += 1;
    *counter
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look a user up by numeric id or, failing that, by username.
    pub fn find_user(&self, key: &str) -> Option<User> {
        let key = key.trim();
        if let Ok(id) = key.parse::<UserId>() {
            if let Some(u) = self.users.get(&id) {
                return Some(u.clone());
            }
        }
        self.get_user_by_username(key)
    }

    fn user_mut(&mut self, id: UserId) -> Result<&mut User> {
        self.users
            .get_mut(&id)
            .with_context(|| format!("no user with id {id}"))
    }

    fn username_taken(&self, username: &str, except: Option<UserId>) -> bool {
        self.users
            .values()
            .any(|u| u.username == username && Some(u.id) != except)
    }
}

impl UserRepository for Database {
    fn create_user(&mut self, mut user: User) -> Result<User> {
        let username = user.username.trim().to_string();
        if username.is_empty() {
            bail!("username must not be empty");
        }
        if self.username_taken(&username, None) {
            bail!("username '{username}' already exists");
        }
        user.free_time.iter().try_for_each(check_window)?;

        user.username = username;
        user.id = bump(&mut self.next_user_id);
        for interval in &mut user.free_time {
            interval.id = bump(&mut self.next_interval_id);
        }
        tracing::debug!(user_id = user.id, username = %user.username, "created user");
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    fn get_user(&self, id: UserId) -> Option<User> {
        self.users.get(&id).cloned()
    }

    fn get_user_by_username(&self, username: &str) -> Option<User> {
        self.users.values().find(|u| u.username == username).cloned()
    }

    fn all_users(&self) -> Vec<User> {
        self.users.values().cloned().collect()
    }

    fn update_user(&mut self, user: User) -> Result<User> {
        if !self.users.contains_key(&user.id) {
            bail!("no user with id {}", user.id);
        }
        if self.username_taken(&user.username, Some(user.id)) {
            bail!("username '{}' already exists", user.username);
        }
        user.free_time.iter().try_for_each(check_window)?;
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    fn delete_user(&mut self, id: UserId) -> bool {
        if self.users.remove(&id).is_none() {
            return false;
        }
        let before = self.tasks.len();
        self.tasks.retain(|_, t| t.user_id != id);
        tracing::debug!(user_id = id, tasks_removed = before - self.tasks.len(), "deleted user");
        true
    }
}

impl HobbyRepository for Database {
    fn add_hobby(&mut self, user_id: UserId, name: &str) -> Result<User> {
        let name = name.trim();
        if name.is_empty() {
            bail!("hobby name must not be empty");
        }
        let user = self.user_mut(user_id)?;
        if !user.has_hobby(name) {
            user.hobbies.push(Hobby::new(name));
        }
        Ok(user.clone())
    }

    fn remove_hobby(&mut self, user_id: UserId, name: &str) -> Result<bool> {
        let user = self.user_mut(user_id)?;
        let before = user.hobbies.len();
        user.hobbies.retain(|h| !h.matches(name.trim()));
        Ok(user.hobbies.len() != before)
    }
}

impl TaskRepository for Database {
    fn add_task(&mut self, mut task: Task) -> Result<Task> {
        if !self.users.contains_key(&task.user_id) {
            bail!("task '{}' references unknown user {}", task.title, task.user_id);
        }
        task.id = bump(&mut self.next_task_id);
        self.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    fn get_task(&self, id: TaskId) -> Option<Task> {
        self.tasks.get(&id).cloned()
    }

    fn tasks_for_user(&self, user_id: UserId) -> Vec<Task> {
        self.tasks
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect()
    }

    fn all_tasks(&self) -> Vec<Task> {
        self.tasks.values().cloned().collect()
    }

    fn update_task(&mut self, task: Task) -> Result<Task> {
        if !self.tasks.contains_key(&task.id) {
            bail!("no task with id {}", task.id);
        }
        if !self.users.contains_key(&task.user_id) {
            bail!("task {} references unknown user {}", task.id, task.user_id);
        }
        self.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    fn delete_task(&mut self, id: TaskId) -> bool {
        self.tasks.remove(&id).is_some()
    }
}

impl FreeTimeRepository for Database {
    fn add_free_time(
        &mut self,
        user_id: UserId,
        mut interval: FreeTimeInterval,
    ) -> Result<FreeTimeInterval> {
        check_window(&interval)?;
        if !self.users.contains_key(&user_id) {
            bail!("no user with id {user_id}");
        }
        interval.id = bump(&mut self.next_interval_id);
        self.user_mut(user_id)?.free_time.push(interval.clone());
        Ok(interval)
    }

    fn free_time_for_user(&self, user_id: UserId) -> Vec<FreeTimeInterval> {
        self.users
            .get(&user_id)
            .map(|u| u.free_time.clone())
            .unwrap_or_default()
    }

    fn remove_free_time(&mut self, user_id: UserId, interval_id: u64) -> Result<bool> {
        let user = self.user_mut(user_id)?;
        let before = user.free_time.len();
        user.free_time.retain(|i| i.id != interval_id);
        Ok(user.free_time.len() != before)
    }
}
