use std::fs;
use std::io::Write;
use std::path::Path;

use log::{info, warn};

use crate::types::AppResult;
use crate::types::config::get_config_filename;

pub const EXAMPLE_CONFIG: &str = include_str!("../../../example.toml");

/// Write the example config into `dir` unless a config file already exists there
pub fn execute_init(dir: &Path) -> AppResult<()> {
    info!("Initializing workspace...");

    let cfg_path = dir.join(get_config_filename());
    if cfg_path.exists() {
        warn!("{} already exists; leaving it unchanged", cfg_path.display());
    } else {
        let mut f = fs::File::create(&cfg_path)?;
        f.write_all(EXAMPLE_CONFIG.as_bytes())?;
        info!("Created {}", cfg_path.display());
    }

    Ok(())
}
