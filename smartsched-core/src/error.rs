//! Error taxonomy for the scheduling core.
//!
//! Every failure is local and synchronous: solvers return it to the caller and
//! never retry or log it themselves.

use thiserror::Error;

use crate::task::TaskId;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScheduleError {
    #[error("assignment requires a square cost matrix, got {rows}x{cols}")]
    NonSquareMatrix { rows: usize, cols: usize },

    #[error("cost matrix row {row} has {found} columns, expected {expected}")]
    RaggedMatrix {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("cost matrix entry [{row}][{col}] is not finite")]
    NonFiniteCost { row: usize, col: usize },

    /// Negative, NaN or infinite hours.
    #[error("task {task} has invalid required hours: {hours}")]
    InvalidHours { task: TaskId, hours: f64 },

    #[error("hour budget must be a finite non-negative number, got {0}")]
    InvalidBudget(f64),

    #[error("task id {0} appears more than once")]
    DuplicateTaskId(TaskId),

    #[error("unknown scheduling algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("search exhausted after placing {placed} of {total} tasks")]
    SearchExhausted { placed: usize, total: usize },

    #[error("search stopped after expanding {limit} nodes")]
    NodeLimitExceeded { limit: usize },
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
