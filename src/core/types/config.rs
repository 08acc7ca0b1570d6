use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::core::registry::CategoryRegistry;
use crate::types::{AppError, AppResult, Category};

pub const CONFIG_FILENAME: &str = "suiterun.toml";
pub const DEFAULT_TEST_CMD: &str = "python -m pytest";
pub const DEFAULT_VERBOSE_FLAG: &str = "-v";
pub const DEFAULT_COVERAGE_CMD: &str = "python -m pytest --cov=. --cov-report=term";
pub const DEFAULT_COVERAGE_THRESHOLD: f64 = 95.0;
pub const DEFAULT_COVERAGE_PATTERN: &str = r"TOTAL\s+.*?(\d+(?:\.\d+)?)%";

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct LogConfig {
    pub level: Option<String>,
    pub color: Option<bool>, // None = auto-detect (semantic)
}

impl LogConfig {
    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or("info")
    }

    pub fn color(&self) -> Option<bool> {
        self.color // None has semantic meaning (auto-detect)
    }

    pub fn to_effective(&self) -> Self {
        Self {
            level: Some(self.level().to_string()),
            color: self.color,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct TestConfig {
    pub cmd: Option<String>,
    pub verbose_flag: Option<String>,
    pub timeout: Option<u32>, // None = wait for the tool indefinitely
}

impl TestConfig {
    pub fn cmd(&self) -> &str {
        self.cmd.as_deref().unwrap_or(DEFAULT_TEST_CMD)
    }

    pub fn verbose_flag(&self) -> &str {
        self.verbose_flag.as_deref().unwrap_or(DEFAULT_VERBOSE_FLAG)
    }

    pub fn timeout(&self) -> Option<u32> {
        self.timeout
    }

    pub fn to_effective(&self) -> Self {
        Self {
            cmd: Some(self.cmd().to_string()),
            verbose_flag: Some(self.verbose_flag().to_string()),
            timeout: self.timeout,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct CoverageConfig {
    pub cmd: Option<String>,
    pub threshold: Option<f64>,
    pub pattern: Option<String>,
}

impl CoverageConfig {
    pub fn cmd(&self) -> &str {
        self.cmd.as_deref().unwrap_or(DEFAULT_COVERAGE_CMD)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold.unwrap_or(DEFAULT_COVERAGE_THRESHOLD)
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_deref().unwrap_or(DEFAULT_COVERAGE_PATTERN)
    }

    pub fn to_effective(&self) -> Self {
        Self {
            cmd: Some(self.cmd().to_string()),
            threshold: Some(self.threshold()),
            pattern: Some(self.pattern().to_string()),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    // Nested sections
    pub log: Option<LogConfig>,
    pub test: Option<TestConfig>,
    pub coverage: Option<CoverageConfig>,
    pub categories: Option<Vec<Category>>, // None = built-in set (semantic)
}

impl Config {
    pub fn log(&self) -> LogConfig {
        self.log.clone().unwrap_or_default()
    }

    pub fn test(&self) -> TestConfig {
        self.test.clone().unwrap_or_default()
    }

    pub fn coverage(&self) -> CoverageConfig {
        self.coverage.clone().unwrap_or_default()
    }

    /// Build the category registry this configuration describes
    pub fn registry(&self) -> AppResult<CategoryRegistry> {
        match &self.categories {
            Some(entries) => CategoryRegistry::from_entries(entries.clone()),
            None => Ok(CategoryRegistry::builtin()),
        }
    }

    pub fn test_timeout(&self) -> Option<Duration> {
        self.test()
            .timeout()
            .filter(|secs| *secs > 0)
            .map(|secs| Duration::from_secs(u64::from(secs)))
    }

    /// Fully defaulted copy; fails when the configured categories are invalid
    pub fn to_effective(&self) -> AppResult<Self> {
        Ok(Self {
            log: Some(self.log().to_effective()),
            test: Some(self.test().to_effective()),
            coverage: Some(self.coverage().to_effective()),
            categories: Some(self.registry()?.iter().cloned().collect()),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub log_level: Option<String>,
    pub log_color: Option<String>, // "on" | "off"
    pub test_cmd: Option<String>,
    pub test_timeout: Option<u32>,
    pub coverage_threshold: Option<f64>,
}

static CONFIG: OnceCell<Config> = OnceCell::new();

pub fn get_config_filename() -> &'static str {
    CONFIG_FILENAME
}

/// The process-wide configuration; defaults until `init_with_overrides` has run
pub fn config() -> &'static Config {
    CONFIG.get_or_init(Config::default)
}

pub fn init_with_overrides(overrides: &CliOverrides) -> AppResult<()> {
    let _ = CONFIG.set(load_config(overrides)?);
    Ok(())
}

/// Resolve configuration: user file, then nearest project file, then CLI
pub fn load_config(overrides: &CliOverrides) -> AppResult<Config> {
    let mut cfg = Config::default();

    // 1) User-level config file, if any
    if let Some(path) = user_config_file() {
        apply_file_config(&mut cfg, &read_config_file(&path)?);
    }

    // 2) Project config file: walk up from cwd and use the first one found
    if let Some(path) = find_nearest_config_file() {
        apply_file_config(&mut cfg, &read_config_file(&path)?);
    }

    // 3) CLI arguments (highest priority). Only override if user specified.
    apply_cli_overrides(&mut cfg, overrides);

    Ok(cfg)
}

/// Parse one config file; unreadable or malformed files are errors
pub fn read_config_file(path: &Path) -> AppResult<Config> {
    let contents = fs::read_to_string(path).map_err(|e| {
        AppError::Config(format!("cannot read config file {}: {e}", path.display()))
    })?;
    toml::from_str::<Config>(&contents).map_err(|e| {
        AppError::Config(format!("malformed config file {}: {e}", path.display()))
    })
}

pub fn apply_file_config(cfg: &mut Config, file: &Config) {
    if file.categories.is_some() {
        cfg.categories = file.categories.clone(); // replace semantics
    }

    // Merge log section
    if let Some(file_log) = &file.log {
        let mut log = cfg.log.clone().unwrap_or_default();
        if file_log.level.is_some() {
            log.level = file_log.level.clone();
        }
        if file_log.color.is_some() {
            log.color = file_log.color;
        }
        cfg.log = Some(log);
    }

    // Merge test section
    if let Some(file_test) = &file.test {
        let mut test = cfg.test.clone().unwrap_or_default();
        if file_test.cmd.as_ref().is_some_and(|c| !c.trim().is_empty()) {
            test.cmd = file_test.cmd.clone();
        }
        if file_test.verbose_flag.is_some() {
            test.verbose_flag = file_test.verbose_flag.clone();
        }
        if file_test.timeout.is_some() {
            test.timeout = file_test.timeout;
        }
        cfg.test = Some(test);
    }

    // Merge coverage section
    if let Some(file_cov) = &file.coverage {
        let mut coverage = cfg.coverage.clone().unwrap_or_default();
        if file_cov.cmd.as_ref().is_some_and(|c| !c.trim().is_empty()) {
            coverage.cmd = file_cov.cmd.clone();
        }
        if file_cov.threshold.is_some() {
            coverage.threshold = file_cov.threshold;
        }
        if file_cov.pattern.is_some() {
            coverage.pattern = file_cov.pattern.clone();
        }
        cfg.coverage = Some(coverage);
    }
}

pub fn apply_cli_overrides(cfg: &mut Config, overrides: &CliOverrides) {
    // Log overrides
    let mut log = cfg.log.clone().unwrap_or_default();
    if let Some(level) = &overrides.log_level
        && !level.trim().is_empty()
    {
        log.level = Some(level.trim().to_string());
    }
    if let Some(color_str) = &overrides.log_color {
        match color_str.to_lowercase().as_str() {
            "on" => log.color = Some(true),
            "off" => log.color = Some(false),
            _ => {}
        }
    }
    if overrides.log_level.is_some() || overrides.log_color.is_some() {
        cfg.log = Some(log);
    }

    // Test overrides
    let mut test = cfg.test.clone().unwrap_or_default();
    if let Some(cmd) = &overrides.test_cmd
        && !cmd.trim().is_empty()
    {
        test.cmd = Some(cmd.clone());
    }
    if overrides.test_timeout.is_some() {
        test.timeout = overrides.test_timeout;
    }
    if overrides.test_cmd.is_some() || overrides.test_timeout.is_some() {
        cfg.test = Some(test);
    }

    // Coverage overrides
    if let Some(threshold) = overrides.coverage_threshold {
        let mut coverage = cfg.coverage.clone().unwrap_or_default();
        coverage.threshold = Some(threshold);
        cfg.coverage = Some(coverage);
    }
}

fn user_config_file() -> Option<PathBuf> {
    let candidate = dirs_next::config_dir()?
        .join("suiterun")
        .join(get_config_filename());
    candidate.exists().then_some(candidate)
}

fn find_nearest_config_file() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    let config_filename = get_config_filename();
    for dir in cwd.ancestors() {
        let candidate = dir.join(config_filename);
        if candidate.exists() {
            return Some(candidate);
        }
    }
    None
}

pub fn colors_enabled() -> bool {
    match config().log().color() {
        Some(force) => force,
        None => console::colors_enabled(),
    }
}

/// Split a configured command string into program and arguments
pub fn split_command(cmd: &str) -> Option<(String, Vec<String>)> {
    let mut parts = cmd.split_whitespace().map(str::to_string);
    let program = parts.next()?;
    Some((program, parts.collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(toml_str: &str) -> Config {
        toml::from_str(toml_str).expect("valid config")
    }

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = Config::default();
        assert_eq!(cfg.test().cmd(), DEFAULT_TEST_CMD);
        assert_eq!(cfg.test().verbose_flag(), "-v");
        assert_eq!(cfg.coverage().threshold(), 95.0);
        assert_eq!(cfg.log().level(), "info");
        assert!(cfg.test_timeout().is_none());
        assert_eq!(cfg.registry().unwrap().len(), 6);
    }

    #[test]
    fn file_config_merges_sections() {
        let mut cfg = Config::default();
        let file = parse(
            r#"
            [test]
            cmd = "pytest -q"
            timeout = 30

            [coverage]
            threshold = 80.0

            [[categories]]
            name = "smoke"
            pattern = "tests/smoke/"
            "#,
        );
        apply_file_config(&mut cfg, &file);

        assert_eq!(cfg.test().cmd(), "pytest -q");
        assert_eq!(cfg.test_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(cfg.coverage().threshold(), 80.0);
        assert_eq!(cfg.coverage().cmd(), DEFAULT_COVERAGE_CMD);
        assert_eq!(cfg.registry().unwrap().names(), vec!["smoke"]);
    }

    #[test]
    fn blank_file_cmd_keeps_previous() {
        let mut cfg = Config::default();
        apply_file_config(&mut cfg, &parse("[test]\ncmd = \"tox\"\n"));
        apply_file_config(&mut cfg, &parse("[test]\ncmd = \"  \"\n"));
        assert_eq!(cfg.test().cmd(), "tox");
    }

    #[test]
    fn cli_overrides_win() {
        let mut cfg = Config::default();
        apply_file_config(&mut cfg, &parse("[test]\ncmd = \"tox\"\ntimeout = 10\n"));
        apply_cli_overrides(
            &mut cfg,
            &CliOverrides {
                log_level: Some("debug".to_string()),
                log_color: Some("off".to_string()),
                test_cmd: Some("nox".to_string()),
                test_timeout: Some(5),
                coverage_threshold: Some(50.0),
            },
        );
        assert_eq!(cfg.test().cmd(), "nox");
        assert_eq!(cfg.test().timeout(), Some(5));
        assert_eq!(cfg.log().level(), "debug");
        assert_eq!(cfg.log().color(), Some(false));
        assert_eq!(cfg.coverage().threshold(), 50.0);
    }

    #[test]
    fn zero_timeout_means_unbounded() {
        let cfg = parse("[test]\ntimeout = 0\n");
        assert!(cfg.test_timeout().is_none());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "[test]\ncmd = 5\n").unwrap();

        let err = read_config_file(&path).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains("malformed config file"));
    }

    #[test]
    fn invalid_categories_fail_effective_config() {
        let cfg = parse(
            r#"
            [[categories]]
            name = "unit"
            pattern = "a/"

            [[categories]]
            name = "unit"
            pattern = "b/"
            "#,
        );
        assert!(matches!(cfg.to_effective(), Err(AppError::Config(_))));
        assert_eq!(
            Config::default().to_effective().unwrap().categories.unwrap().len(),
            6
        );
    }

    #[test]
    fn split_command_separates_program() {
        assert_eq!(
            split_command("python -m pytest"),
            Some((
                "python".to_string(),
                vec!["-m".to_string(), "pytest".to_string()]
            ))
        );
        assert_eq!(split_command("   "), None);
    }
}
