//! Tool surface the external runtime invokes.

pub mod record;
pub mod registry;
pub mod tool;

pub use registry::ToolRegistry;
pub use tool::*;
