pub mod cli;
pub mod cmds;
pub mod executor;
pub mod logging;
pub mod main_shared;
pub mod registry;
pub mod report;
pub mod runner;
pub mod types;
