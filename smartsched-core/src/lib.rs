//! smartsched-core: cost model and solvers for scheduling a user's tasks.
//!
//! Three interchangeable strategies sit behind [`SchedulingDispatcher`]:
//! - Hungarian assignment of tasks to interchangeable slots (minimum cost)
//! - Branch-and-Bound selection under an hour budget (maximum priority)
//! - A* ordering of every task (minimum accumulated cost)
//!
//! All solvers are synchronous and keep no state between calls.

pub mod astar;
pub mod bnb;
pub mod config;
pub mod cost;
pub mod dispatcher;
pub mod error;
pub mod hungarian;
pub mod task;
pub mod time;
pub mod user;

pub use astar::{AStarOutcome, AStarSearch, AStarStats, PlacedSet, SearchNode};
pub use bnb::{BnbOutcome, BnbStats, BranchAndBoundSolver};
pub use config::{SchedulerConfig, SearchLimits, DEFAULT_MAX_HOURS};
pub use cost::CostModel;
pub use dispatcher::{Algorithm, Schedule, SchedulingDispatcher};
pub use error::{Result, ScheduleError};
pub use hungarian::{assignment_cost, CostMatrix, HungarianSolver, Mark, Munkres, Step};
pub use task::{ParsePriorityError, Priority, Task, TaskId, UserId};
pub use time::{format_local, parse_due_date};
pub use user::{FreeTimeInterval, Hobby, User};
