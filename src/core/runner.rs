use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use regex::Regex;

use crate::core::executor::{CommandExecutor, Invocation};
use crate::core::registry::{CategoryRegistry, Resolved};
use crate::types::config::{CoverageConfig, split_command};
use crate::types::{AppError, AppResult, Category, CategoryResult, CoverageResult};

/// Recorded when coverage is requested but none of the categories is known
pub const NO_COVERAGE_SCOPE: &str = "No known categories selected for coverage";

/// How each category's test command is built and bounded
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub test_cmd: String,
    pub verbose_flag: String,
    pub verbose: bool,
    pub timeout: Option<Duration>,
    pub show_progress: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            test_cmd: crate::types::config::DEFAULT_TEST_CMD.to_string(),
            verbose_flag: crate::types::config::DEFAULT_VERBOSE_FLAG.to_string(),
            verbose: false,
            timeout: None,
            show_progress: false,
        }
    }
}

/// Coverage command, threshold and the regex that extracts the total percentage
#[derive(Debug, Clone)]
pub struct CoverageSettings {
    pub cmd: String,
    pub threshold: f64,
    pub pattern: Regex,
}

impl CoverageSettings {
    pub fn from_config(config: &CoverageConfig) -> AppResult<Self> {
        let pattern = Regex::new(config.pattern()).map_err(|e| {
            AppError::Config(format!("invalid coverage pattern '{}': {e}", config.pattern()))
        })?;
        if pattern.captures_len() < 2 {
            return Err(AppError::Config(format!(
                "coverage pattern '{}' needs a capture group for the percentage",
                config.pattern()
            )));
        }
        Ok(Self {
            cmd: config.cmd().to_string(),
            threshold: config.threshold(),
            pattern,
        })
    }

    /// Last percentage reported in `text`, if any
    pub fn parse_percent(&self, text: &str) -> Option<f64> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(1)?.as_str().parse::<f64>().ok())
            .last()
    }
}

/// Categories run so far, and whether the run stopped early on Ctrl-C
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub results: Vec<CategoryResult>,
    pub interrupted: bool,
}

/// Runs test categories one at a time through a [`CommandExecutor`]
pub struct Runner<E: CommandExecutor> {
    registry: CategoryRegistry,
    executor: E,
    options: RunOptions,
    program: String,
    base_args: Vec<String>,
    running: Arc<AtomicBool>,
}

impl<E: CommandExecutor> Runner<E> {
    pub fn new(registry: CategoryRegistry, executor: E, options: RunOptions) -> AppResult<Self> {
        let (program, base_args) = split_command(&options.test_cmd)
            .ok_or_else(|| AppError::Config("test command is empty".to_string()))?;
        Ok(Self {
            registry,
            executor,
            options,
            program,
            base_args,
            running: Arc::new(AtomicBool::new(true)),
        })
    }

    /// Share a flag that, once cleared, stops new categories from starting
    pub fn with_running_flag(mut self, running: Arc<AtomicBool>) -> Self {
        self.running = running;
        self
    }

    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn invocation_for(&self, category: &Category) -> Invocation {
        let mut args = self.base_args.clone();
        args.push(category.pattern.clone());
        if self.options.verbose && !self.options.verbose_flag.trim().is_empty() {
            args.push(self.options.verbose_flag.clone());
        }
        Invocation::new(self.program.clone(), args).with_timeout(self.options.timeout)
    }

    pub async fn run_category(&self, category: &Category) -> CategoryResult {
        let invocation = self.invocation_for(category);
        info!("Running {} tests: {}", category.name, invocation.display());

        let progress = self.spinner(format!("Running {} tests", category.name));
        let start = Instant::now();
        let result = match self.executor.execute(&invocation).await {
            Ok(output) => CategoryResult::from_output(&category.name, output),
            Err(e) => CategoryResult::launch_error(&category.name, &e, start.elapsed()),
        };
        progress.finish_and_clear();

        info!(
            "{} {} ({:.2}s)",
            result.status.display(),
            category.name,
            result.duration.as_secs_f64()
        );
        if self.options.verbose {
            log_captured(&result.stdout, &result.stderr);
        }
        result
    }

    /// Run the requested categories in order; an empty request runs them all.
    ///
    /// Every category is attempted regardless of earlier failures. Unknown
    /// names are recorded as [`Status::Unknown`](crate::types::Status) results.
    pub async fn run<S: AsRef<str>>(&self, requested: &[S]) -> RunOutcome {
        let mut results = Vec::new();
        let mut interrupted = false;

        for entry in self.registry.resolve(requested) {
            if !self.running.load(Ordering::SeqCst) {
                warn!("Run interrupted, skipping remaining categories");
                interrupted = true;
                break;
            }
            match entry {
                Resolved::Known(category) => results.push(self.run_category(category).await),
                Resolved::Unknown(name) => {
                    warn!(
                        "Unknown test category '{}' (available: {})",
                        name,
                        self.registry.names().join(", ")
                    );
                    results.push(CategoryResult::unknown(&name));
                }
            }
        }

        RunOutcome {
            results,
            interrupted,
        }
    }

    /// One coverage invocation across the patterns of every requested known category
    pub async fn run_coverage<S: AsRef<str>>(
        &self,
        requested: &[S],
        settings: &CoverageSettings,
    ) -> AppResult<CoverageResult> {
        let (program, mut args) = split_command(&settings.cmd)
            .ok_or_else(|| AppError::Config("coverage command is empty".to_string()))?;
        let patterns: Vec<String> = self
            .registry
            .resolve(requested)
            .into_iter()
            .filter_map(|entry| match entry {
                Resolved::Known(category) => Some(category.pattern.clone()),
                Resolved::Unknown(_) => None,
            })
            .collect();
        // Without a pattern the tool would measure the whole project
        if patterns.is_empty() {
            warn!("Skipping coverage: no known categories selected");
            return Ok(CoverageResult::not_run(settings.threshold, NO_COVERAGE_SCOPE));
        }
        args.extend(patterns);
        let invocation = Invocation::new(program, args).with_timeout(self.options.timeout);
        info!("Measuring coverage: {}", invocation.display());

        let progress = self.spinner("Measuring coverage".to_string());
        let start = Instant::now();
        let result = match self.executor.execute(&invocation).await {
            Ok(output) => {
                let percent = settings
                    .parse_percent(&output.stdout)
                    .or_else(|| settings.parse_percent(&output.stderr));
                if percent.is_none() {
                    warn!("Could not find a coverage percentage in the tool output");
                }
                CoverageResult::new(output, percent, settings.threshold)
            }
            Err(e) => CoverageResult::launch_error(&e, settings.threshold, start.elapsed()),
        };
        progress.finish_and_clear();

        debug!(
            "Coverage {:?}% (threshold {}%), exit code {}",
            result.percent, result.threshold, result.exit_code
        );
        if self.options.verbose {
            log_captured(&result.stdout, &result.stderr);
        }
        Ok(result)
    }

    fn spinner(&self, message: String) -> ProgressBar {
        if !self.options.show_progress {
            return ProgressBar::hidden();
        }
        let progress = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} [{elapsed}]") {
            progress.set_style(style);
        }
        progress.set_message(message);
        progress.enable_steady_tick(Duration::from_millis(100));
        progress
    }
}

fn log_captured(stdout: &str, stderr: &str) {
    for line in stdout.trim_end().lines().chain(stderr.trim_end().lines()) {
        info!("  {line}");
    }
}
