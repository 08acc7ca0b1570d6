use log::info;

use crate::types::AppResult;
use crate::types::config::Config;

pub fn execute(cfg: &Config, format: &str) -> AppResult<()> {
    let effective_config = cfg.to_effective()?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&effective_config)?);
        return Ok(());
    }

    // Table format
    info!("Effective Configuration:");
    info!("");
    let log = effective_config.log();
    info!("Log:");
    info!("  level: {}", log.level());
    match log.color() {
        Some(true) => info!("  color: on"),
        Some(false) => info!("  color: off"),
        None => info!("  color: auto"),
    }

    info!("");
    let test = effective_config.test();
    info!("Test:");
    info!("  cmd: {}", test.cmd());
    info!("  verbose_flag: {}", test.verbose_flag());
    match test.timeout() {
        Some(timeout) if timeout > 0 => info!("  timeout: {}s", timeout),
        _ => info!("  timeout: (not set)"),
    }

    info!("");
    let coverage = effective_config.coverage();
    info!("Coverage:");
    info!("  cmd: {}", coverage.cmd());
    info!("  threshold: {:.1}%", coverage.threshold());
    info!("  pattern: {}", coverage.pattern());

    info!("");
    info!("Categories:");
    let categories = effective_config.categories.unwrap_or_default();
    if categories.is_empty() {
        info!("  (none)");
    }
    for category in &categories {
        info!("  {}: {}", category.name, category.pattern);
    }

    Ok(())
}
