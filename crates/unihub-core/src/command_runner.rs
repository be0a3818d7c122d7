use std::process::{Command, Stdio};
use std::time::Instant;

use anyhow::Context;

/// One backend process launch: `<program> <args...>`, where the last two
/// arguments are the command name and its JSON payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn command(&self) -> Option<&str> {
        self.args.iter().rev().nth(1).map(String::as_str)
    }

    pub fn payload(&self) -> Option<&str> {
        self.args.last().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub status_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn succeeded(&self) -> bool {
        self.status_code == 0
    }
}

/// Launches backend processes. Calls come from loader threads, so runners are
/// shared across them.
pub trait CommandRunner: Send + Sync {
    fn run(&self, invocation: &Invocation) -> anyhow::Result<CommandOutput>;
}

#[derive(Debug, Default)]
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemCommandRunner {
    fn run(&self, invocation: &Invocation) -> anyhow::Result<CommandOutput> {
        let started = Instant::now();
        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("failed to launch {}", invocation.program))?;

        tracing::trace!(
            command = invocation.command().unwrap_or_default(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "backend process finished"
        );

        Ok(CommandOutput {
            // No exit code means the process was killed by a signal.
            status_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
