//! smartsched-store: users, tasks and free time persisted as one JSON file.
//!
//! The repository traits describe the operations the CLI needs; [`Database`]
//! implements them in memory and [`JsonStore`] loads/saves it atomically.

pub mod database;
pub mod json_store;
pub mod repository;

pub use database::Database;
pub use json_store::JsonStore;
pub use repository::{FreeTimeRepository, HobbyRepository, TaskRepository, UserRepository};
