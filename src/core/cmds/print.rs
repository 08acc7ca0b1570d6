use crate::types::AppResult;
use crate::types::config::Config;

pub mod categories;
pub mod config;

pub enum PrintCommand {
    Categories(String),
    Config(String),
}

pub fn execute_print(command: PrintCommand, cfg: &Config) -> AppResult<()> {
    match command {
        PrintCommand::Categories(format) => categories::execute(cfg, &format),
        PrintCommand::Config(format) => config::execute(cfg, &format),
    }
}
