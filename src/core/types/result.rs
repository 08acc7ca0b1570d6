use std::io;
use std::time::Duration;

use console::style;
use serde::{Serialize, Serializer};
use strum::{Display, EnumString};

use crate::core::executor::ExecOutput;

/// Exit code recorded when the tool was killed for exceeding its timeout
pub const TIMEOUT_EXIT_CODE: i32 = 124;

/// Exit code recorded when no process exit status exists
pub const NO_EXIT_CODE: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize)]
#[strum(ascii_case_insensitive)]
pub enum Status {
    Passed,
    Failed,
    Timeout,
    Unknown,
    Error,
}

impl Status {
    /// Short label used in the text report
    pub fn label(&self) -> &'static str {
        match self {
            Status::Passed => "PASS",
            Status::Failed => "FAIL",
            Status::Timeout => "TIMEOUT",
            Status::Unknown => "UNKNOWN",
            Status::Error => "ERROR",
        }
    }

    /// Label styled for terminal output
    pub fn display(&self) -> String {
        let label = self.label();
        match self {
            Status::Passed => style(label).green().to_string(),
            Status::Failed | Status::Timeout => style(label).red().to_string(),
            Status::Unknown | Status::Error => style(label).yellow().to_string(),
        }
    }
}

pub(crate) fn serialize_secs<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(duration.as_secs_f64())
}

/// Outcome of one category's test command. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryResult {
    pub category: String,
    pub status: Status,
    #[serde(serialize_with = "serialize_secs")]
    pub duration: Duration,
    pub exit_code: i32,
    pub passed: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CategoryResult {
    fn new(
        category: &str,
        status: Status,
        duration: Duration,
        exit_code: i32,
        stdout: String,
        stderr: String,
    ) -> Self {
        Self {
            category: category.to_string(),
            status,
            duration,
            exit_code,
            passed: exit_code == 0,
            stdout,
            stderr,
        }
    }

    /// Classify the captured output of a finished (or killed) tool invocation
    pub fn from_output(category: &str, output: ExecOutput) -> Self {
        if output.timed_out {
            let mut stderr = output.stderr;
            if !stderr.is_empty() && !stderr.ends_with('\n') {
                stderr.push('\n');
            }
            stderr.push_str(&format!(
                "timed out after {:.1}s",
                output.duration.as_secs_f64()
            ));
            return Self::new(
                category,
                Status::Timeout,
                output.duration,
                TIMEOUT_EXIT_CODE,
                output.stdout,
                stderr,
            );
        }

        match output.exit_code {
            Some(0) => Self::new(
                category,
                Status::Passed,
                output.duration,
                0,
                output.stdout,
                output.stderr,
            ),
            Some(code) => Self::new(
                category,
                Status::Failed,
                output.duration,
                code,
                output.stdout,
                output.stderr,
            ),
            None => {
                let mut stderr = output.stderr;
                if !stderr.is_empty() && !stderr.ends_with('\n') {
                    stderr.push('\n');
                }
                stderr.push_str("terminated by signal");
                Self::new(
                    category,
                    Status::Error,
                    output.duration,
                    NO_EXIT_CODE,
                    output.stdout,
                    stderr,
                )
            }
        }
    }

    /// A requested category that is missing from the registry
    pub fn unknown(category: &str) -> Self {
        Self::new(
            category,
            Status::Unknown,
            Duration::ZERO,
            NO_EXIT_CODE,
            String::new(),
            format!("Unknown test category: {category}"),
        )
    }

    /// The test tool could not be started at all
    pub fn launch_error(category: &str, error: &io::Error, duration: Duration) -> Self {
        Self::new(
            category,
            Status::Error,
            duration,
            NO_EXIT_CODE,
            String::new(),
            format!("Failed to launch test command: {error}"),
        )
    }

    /// Text shown when this category fails: stderr, or stdout when stderr is empty
    pub fn error_text(&self) -> &str {
        if self.stderr.trim().is_empty() {
            &self.stdout
        } else {
            &self.stderr
        }
    }
}

/// Outcome of the single coverage invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageResult {
    pub percent: Option<f64>,
    pub threshold: f64,
    #[serde(serialize_with = "serialize_secs")]
    pub duration: Duration,
    pub exit_code: i32,
    pub passed: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CoverageResult {
    pub fn new(output: ExecOutput, percent: Option<f64>, threshold: f64) -> Self {
        let exit_code = match (output.timed_out, output.exit_code) {
            (true, _) => TIMEOUT_EXIT_CODE,
            (false, Some(code)) => code,
            (false, None) => NO_EXIT_CODE,
        };
        let passed = exit_code == 0 && percent.is_some_and(|p| p >= threshold);
        Self {
            percent,
            threshold,
            duration: output.duration,
            exit_code,
            passed,
            stdout: output.stdout,
            stderr: output.stderr,
        }
    }

    /// Coverage that was never measured; always fails its threshold
    pub fn not_run(threshold: f64, reason: impl Into<String>) -> Self {
        Self {
            percent: None,
            threshold,
            duration: Duration::ZERO,
            exit_code: NO_EXIT_CODE,
            passed: false,
            stdout: String::new(),
            stderr: reason.into(),
        }
    }

    pub fn launch_error(error: &io::Error, threshold: f64, duration: Duration) -> Self {
        Self {
            percent: None,
            threshold,
            duration,
            exit_code: NO_EXIT_CODE,
            passed: false,
            stdout: String::new(),
            stderr: format!("Failed to launch coverage command: {error}"),
        }
    }
}
