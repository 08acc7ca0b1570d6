#![allow(dead_code)]

use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use suiterun::{CommandExecutor, ExecOutput, Invocation};

/// Canned reply for any invocation whose arguments contain `key`
#[derive(Clone)]
pub enum Reply {
    Exit {
        code: i32,
        millis: u64,
        stdout: String,
        stderr: String,
    },
    TimedOut {
        millis: u64,
    },
    LaunchFailure,
}

impl Reply {
    pub fn pass(millis: u64) -> Self {
        Reply::Exit {
            code: 0,
            millis,
            stdout: "ok".to_string(),
            stderr: String::new(),
        }
    }

    pub fn fail(code: i32, millis: u64, stderr: &str) -> Self {
        Reply::Exit {
            code,
            millis,
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }

    pub fn stdout(code: i32, stdout: &str) -> Self {
        Reply::Exit {
            code,
            millis: 10,
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }
}

/// Executor that answers from a script and records every invocation
#[derive(Default)]
pub struct ScriptedExecutor {
    replies: HashMap<String, Reply>,
    pub calls: Mutex<Vec<Invocation>>,
    clears: Option<Arc<AtomicBool>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, key: &str, reply: Reply) -> Self {
        self.replies.insert(key.to_string(), reply);
        self
    }

    /// Clear `running` while the first command is in flight, as Ctrl-C would
    pub fn clearing_flag(mut self, running: Arc<AtomicBool>) -> Self {
        self.clears = Some(running);
        self
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    fn reply_for(&self, invocation: &Invocation) -> Reply {
        // A reply keyed on the program name beats one keyed on an argument
        if let Some(reply) = self.replies.get(&invocation.program) {
            return reply.clone();
        }
        invocation
            .args
            .iter()
            .find_map(|arg| self.replies.get(arg))
            .cloned()
            .unwrap_or(Reply::pass(1))
    }
}

impl CommandExecutor for ScriptedExecutor {
    async fn execute(&self, invocation: &Invocation) -> io::Result<ExecOutput> {
        self.calls.lock().unwrap().push(invocation.clone());
        if let Some(running) = &self.clears {
            running.store(false, Ordering::SeqCst);
        }
        match self.reply_for(invocation) {
            Reply::Exit {
                code,
                millis,
                stdout,
                stderr,
            } => Ok(ExecOutput {
                exit_code: Some(code),
                stdout,
                stderr,
                duration: Duration::from_millis(millis),
                timed_out: false,
            }),
            Reply::TimedOut { millis } => Ok(ExecOutput {
                exit_code: None,
                stdout: String::new(),
                stderr: String::new(),
                duration: Duration::from_millis(millis),
                timed_out: true,
            }),
            Reply::LaunchFailure => Err(io::Error::new(
                io::ErrorKind::NotFound,
                "No such file or directory",
            )),
        }
    }
}
