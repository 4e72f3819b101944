//! Agent-facing tools.

pub mod search_threads;
pub mod tool;

pub use search_threads::SearchThreadsTool;
pub use tool::*;
