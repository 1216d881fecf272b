//! smartsched-ingest: importers that turn external text/CSV into scheduler records.

pub mod parsers;
pub mod types;

pub use parsers::free_time::{parse_free_time, parse_free_time_line};
pub use parsers::tasks_csv::{parse_tasks_csv, parse_tasks_csv_reader};
pub use types::TaskDraft;
