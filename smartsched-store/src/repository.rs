//! Storage-agnostic CRUD interfaces.
//!
//! Records are plain values: reads hand back clones, writes take ownership
//! and return the stored record (with any assigned id filled in).

use anyhow::Result;
use smartsched_core::{FreeTimeInterval, Task, TaskId, User, UserId};

pub trait UserRepository {
    /// Store a new user under a fresh id. Usernames are unique.
    fn create_user(&mut self, user: User) -> Result<User>;
    fn get_user(&self, id: UserId) -> Option<User>;
    fn get_user_by_username(&self, username: &str) -> Option<User>;
    fn all_users(&self) -> Vec<User>;
    /// Replace an existing user record.
    fn update_user(&mut self, user: User) -> Result<User>;
    /// Remove a user together with all of their tasks.
    fn delete_user(&mut self, id: UserId) -> bool;
}

pub trait HobbyRepository {
    fn add_hobby(&mut self, user_id: UserId, name: &str) -> Result<User>;
    fn remove_hobby(&mut self, user_id: UserId, name: &str) -> Result<bool>;
}

pub trait TaskRepository {
    /// Store a new task under a fresh id. The owner must exist.
    fn add_task(&mut self, task: Task) -> Result<Task>;
    fn get_task(&self, id: TaskId) -> Option<Task>;
    fn tasks_for_user(&self, user_id: UserId) -> Vec<Task>;
    fn all_tasks(&self) -> Vec<Task>;
    fn update_task(&mut self, task: Task) -> Result<Task>;
    fn delete_task(&mut self, id: TaskId) -> bool;
}

pub trait FreeTimeRepository {
    fn add_free_time(&mut self, user_id: UserId, interval: FreeTimeInterval)
        -> Result<FreeTimeInterval>;
    fn free_time_for_user(&self, user_id: UserId) -> Vec<FreeTimeInterval>;
    fn remove_free_time(&mut self, user_id: UserId, interval_id: u64) -> Result<bool>;
}
