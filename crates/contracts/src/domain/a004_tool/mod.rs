pub mod aggregate;
pub mod lifecycle;

pub use aggregate::{Tool, ToolDto, ToolId};
pub use lifecycle::{ToolAction, ToolLifecycleError, ToolStatus};
