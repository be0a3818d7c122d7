use std::collections::VecDeque;
use std::sync::Mutex;

use anyhow::anyhow;
use serde_json::Value;

use crate::command_runner::{CommandOutput, CommandRunner, Invocation};

/// Replays canned outputs in order and keeps every invocation it saw.
#[derive(Default)]
pub struct RecordingRunner {
    outputs: Mutex<VecDeque<anyhow::Result<CommandOutput>>>,
    invocations: Mutex<Vec<Invocation>>,
}

impl RecordingRunner {
    pub fn from_outputs(outputs: Vec<anyhow::Result<CommandOutput>>) -> Self {
        Self {
            outputs: Mutex::new(outputs.into()),
            invocations: Mutex::new(Vec::new()),
        }
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().expect("invocations lock").clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, invocation: &Invocation) -> anyhow::Result<CommandOutput> {
        self.invocations
            .lock()
            .expect("invocations lock")
            .push(invocation.clone());

        self.outputs
            .lock()
            .expect("outputs lock")
            .pop_front()
            .unwrap_or_else(|| Err(anyhow!("no canned output for {:?}", invocation.command())))
    }
}

pub fn output(stdout: &str, stderr: &str, status_code: i32) -> anyhow::Result<CommandOutput> {
    Ok(CommandOutput {
        status_code,
        stdout: stdout.to_string(),
        stderr: stderr.to_string(),
    })
}

pub fn payload(invocation: &Invocation) -> Value {
    invocation
        .payload()
        .and_then(|raw| serde_json::from_str(raw).ok())
        .unwrap_or(Value::Null)
}
