// File: ./src/model/mod.rs
// Aggregates the split model files
pub mod item;
pub mod parser;
pub mod subject;

pub use item::{DEFAULT_TASK_KINDS, Task, TaskDraft, TaskKind, TaskStatus, parse_date_input};
pub use parser::parse;
pub use subject::{Subject, Unit};
