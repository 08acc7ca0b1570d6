pub mod core;

// Re-export key items for easy importing in this crate
pub use crate::core::types;

// Re-export key items for easy importing in other crates
pub use crate::core::executor::{CommandExecutor, ExecOutput, Invocation, ProcessExecutor};
pub use crate::core::main_shared::run_main;
pub use crate::core::registry::CategoryRegistry;
pub use crate::core::report;
pub use crate::core::runner::{CoverageSettings, RunOptions, RunOutcome, Runner};
