pub mod free_time;
pub mod tasks_csv;
