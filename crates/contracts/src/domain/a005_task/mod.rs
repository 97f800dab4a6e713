pub mod aggregate;

pub use aggregate::{Task, TaskDto, TaskId, TaskPriority, TaskStatus};
