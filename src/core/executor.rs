use std::future::Future;
use std::io;
use std::process::Stdio;
use std::time::{Duration, Instant};

use log::debug;
use tokio::process::Command;

/// One external command to run to completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub timeout: Option<Duration>,
}

impl Invocation {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Shell-like rendering for logs
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// What came back from a finished (or killed) command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOutput {
    /// None when the process was terminated by a signal or killed on timeout
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
    pub timed_out: bool,
}

/// Capability to run an external command; substituted with a fake in tests.
///
/// `Err` means the command could not be started. Any exit status, including
/// non-zero ones, is an `Ok` result.
pub trait CommandExecutor: Send + Sync {
    fn execute(
        &self,
        invocation: &Invocation,
    ) -> impl Future<Output = io::Result<ExecOutput>> + Send;
}

/// Runs commands as child processes of this one
#[derive(Debug, Clone, Default)]
pub struct ProcessExecutor;

impl CommandExecutor for ProcessExecutor {
    async fn execute(&self, invocation: &Invocation) -> io::Result<ExecOutput> {
        debug!("Executing: {}", invocation.display());
        let start = Instant::now();

        let child = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let waited = match invocation.timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .ok(),
            None => Some(child.wait_with_output().await),
        };
        let duration = start.elapsed();

        match waited {
            Some(output) => {
                let output = output?;
                Ok(ExecOutput {
                    exit_code: output.status.code(),
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                    duration,
                    timed_out: false,
                })
            }
            // The child was dropped with the timed-out future, which kills it
            None => Ok(ExecOutput {
                exit_code: None,
                stdout: String::new(),
                stderr: String::new(),
                duration,
                timed_out: true,
            }),
        }
    }
}
