use std::str::FromStr;

use console::style;
use log::{Level, LevelFilter};

use crate::types::config::{colors_enabled, config};

fn level_prefix(level: Level) -> String {
    let label = format!("{level:<5}");
    match level {
        Level::Error => style(label).red().bold().to_string(),
        Level::Warn => style(label).yellow().to_string(),
        Level::Info => style(label).green().to_string(),
        Level::Debug => style(label).blue().to_string(),
        Level::Trace => style(label).dim().to_string(),
    }
}

/// Parse a configured level name, falling back to info
pub fn parse_level(level: &str) -> LevelFilter {
    LevelFilter::from_str(level.trim()).unwrap_or(LevelFilter::Info)
}

/// Install the global logger using the effective `[log]` config.
///
/// Logs go to stderr so stdout carries only the report. Info lines are
/// printed bare; other levels carry a level prefix. Calling this twice is a
/// no-op.
pub fn init_logging() {
    let log_config = config().log();
    let level = parse_level(log_config.level());
    let colors = colors_enabled();
    console::set_colors_enabled(colors);
    console::set_colors_enabled_stderr(colors);

    let result = fern::Dispatch::new()
        .level(level)
        .format(|out, message, record| {
            if record.level() == Level::Info {
                out.finish(format_args!("{message}"))
            } else {
                out.finish(format_args!(
                    "[{}] {}",
                    level_prefix(record.level()),
                    message
                ))
            }
        })
        .chain(std::io::stderr())
        .apply();

    if result.is_err() {
        log::debug!("Logger already initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_levels() {
        assert_eq!(parse_level("debug"), LevelFilter::Debug);
        assert_eq!(parse_level(" WARN "), LevelFilter::Warn);
    }

    #[test]
    fn unknown_level_falls_back_to_info() {
        assert_eq!(parse_level("loud"), LevelFilter::Info);
    }
}
