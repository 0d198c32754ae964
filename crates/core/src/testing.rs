//! Test doubles for the rclone runner and local filesystem.

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::runner::{ToolOutput, ToolRunner};
use crate::space::LocalFilesystem;

enum Reply {
    Output(ToolOutput),
    Exit(i32, String),
    MissingBinary,
}

/// Replays queued replies in order and records every argument vector.
/// Once the queue is drained every call succeeds with empty output.
#[derive(Default)]
pub struct ScriptedRunner {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stdout(self, stdout: &str) -> Self {
        self.output(stdout, "")
    }

    pub fn output(self, stdout: &str, stderr: &str) -> Self {
        self.push(Reply::Output(ToolOutput::new(stdout, stderr)))
    }

    /// Queue a fatal (non-retriable) exit.
    pub fn exit(self, code: i32, stderr: &str) -> Self {
        self.push(Reply::Exit(code, stderr.to_string()))
    }

    /// Queue a launch failure for a missing rclone binary.
    pub fn missing_binary(self) -> Self {
        self.push(Reply::MissingBinary)
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> Vec<String> {
        self.calls().pop().unwrap_or_default()
    }

    fn push(self, reply: Reply) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }
}

#[async_trait]
impl ToolRunner for ScriptedRunner {
    async fn run(&self, args: &[String]) -> Result<ToolOutput> {
        self.calls.lock().unwrap().push(args.to_vec());
        match self.replies.lock().unwrap().pop_front() {
            Some(Reply::Output(output)) => Ok(output),
            Some(Reply::Exit(code, stderr)) => Err(Error::ToolInvocationFailed {
                command: format!("rclone {}", args.join(" ")),
                exit_code: Some(code),
                stderr,
            }),
            Some(Reply::MissingBinary) => Err(Error::ToolNotFound {
                program: "rclone".to_string(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            }),
            None => Ok(ToolOutput::default()),
        }
    }
}

/// Reports paths as files or directories from a fixed answer and records
/// directory creation requests.
pub struct FakeFilesystem {
    is_file: bool,
    created: Mutex<HashSet<String>>,
}

impl FakeFilesystem {
    pub fn files() -> Self {
        Self {
            is_file: true,
            created: Mutex::default(),
        }
    }

    pub fn directories() -> Self {
        Self {
            is_file: false,
            created: Mutex::default(),
        }
    }

    pub fn created(&self) -> HashSet<String> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl LocalFilesystem for FakeFilesystem {
    fn is_file(&self, _path: &str) -> bool {
        self.is_file
    }

    async fn create_local_directory(&self, path: &str) -> Result<()> {
        self.created.lock().unwrap().insert(path.to_string());
        Ok(())
    }
}
