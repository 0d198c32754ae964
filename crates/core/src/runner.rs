//! Subprocess execution of the rclone binary.
//!
//! Every rclone call goes through [`ToolRunner::run`]. The production
//! implementation, [`RcloneRunner`], captures stdout/stderr fully and retries
//! exit code 5 on a fixed delay until the [`RetryPolicy`] budget is spent.

use std::borrow::Cow;
use std::future::Future;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, error, warn};

use crate::error::{Error, Result};

/// Exit code rclone uses for "temporary error, try again".
pub const RETRIABLE_EXIT_CODE: i32 = 5;

pub const DEFAULT_PROGRAM: &str = "rclone";

/// Bounded retry for [`RETRIABLE_EXIT_CODE`]: fixed delay, no jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay: Duration::from_secs(2),
        }
    }
}

/// Captured output of a successful invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ToolOutput {
    pub fn new(stdout: impl Into<Vec<u8>>, stderr: impl Into<Vec<u8>>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    pub fn stdout_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stdout)
    }

    pub fn stderr_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stderr)
    }

    /// Whitespace-only stderr counts as empty.
    pub fn has_stderr(&self) -> bool {
        !self.stderr_lossy().trim().is_empty()
    }
}

/// Result of one attempt, before exit-code classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawExit {
    /// `None` when the child was terminated by a signal.
    pub code: Option<i32>,
    pub output: ToolOutput,
}

/// Runs rclone with the given arguments (the program name is implied).
#[async_trait]
pub trait ToolRunner: Send + Sync {
    async fn run(&self, args: &[String]) -> Result<ToolOutput>;
}

/// Runs the real rclone binary as a child process.
///
/// Dropping the future returned by `run` (e.g. on a caller timeout) kills the
/// child, so a cancelled operation never completes behind the caller's back.
#[derive(Debug, Clone)]
pub struct RcloneRunner {
    program: String,
    policy: RetryPolicy,
}

impl RcloneRunner {
    pub fn new() -> Self {
        Self::with_program(DEFAULT_PROGRAM)
    }

    /// Use a different executable, e.g. an absolute path to rclone.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl Default for RcloneRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolRunner for RcloneRunner {
    async fn run(&self, args: &[String]) -> Result<ToolOutput> {
        let command = command_line(&self.program, args);
        let program = self.program.as_str();
        let command_ref = command.as_str();
        run_with_retry(&self.policy, &command, move || {
            exec_once(program, args, command_ref)
        })
        .await
    }
}

/// Drive `attempt` until it exits 0, fails fatally, or the budget is spent.
///
/// Only [`RETRIABLE_EXIT_CODE`] is retried; the same invocation is repeated
/// unchanged after `policy.delay`. Errors returned by `attempt` itself (spawn
/// failures) are never retried.
pub async fn run_with_retry<F, Fut>(
    policy: &RetryPolicy,
    command: &str,
    mut attempt: F,
) -> Result<ToolOutput>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<RawExit>>,
{
    let mut attempts = 0;

    loop {
        attempts += 1;
        let raw = attempt().await?;

        match raw.code {
            Some(0) => return Ok(raw.output),
            Some(RETRIABLE_EXIT_CODE) => {
                if attempts >= policy.max_attempts {
                    error!(
                        command,
                        attempts, "rclone failed to successfully run command"
                    );
                    return Err(Error::RetryBudgetExceeded {
                        command: command.to_string(),
                        attempts,
                        stderr: raw.output.stderr_lossy().trim().to_string(),
                    });
                }
                warn!(
                    command,
                    attempt = attempts,
                    delay_ms = policy.delay.as_millis() as u64,
                    "rclone command failed with retriable error, trying again"
                );
                tokio::time::sleep(policy.delay).await;
            }
            code => {
                return Err(Error::ToolInvocationFailed {
                    command: command.to_string(),
                    exit_code: code,
                    stderr: raw.output.stderr_lossy().trim().to_string(),
                });
            }
        }
    }
}

async fn exec_once(program: &str, args: &[String], command: &str) -> Result<RawExit> {
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                error!(program, error = %e, "rclone executable not found");
                Error::ToolNotFound {
                    program: program.to_string(),
                    source: e,
                }
            } else {
                error!(command, error = %e, "error running rclone command");
                Error::ToolInvocationFailed {
                    command: command.to_string(),
                    exit_code: None,
                    stderr: e.to_string(),
                }
            }
        })?;

    let captured = ToolOutput::new(output.stdout, output.stderr);
    debug!(command, "rclone cmd");
    debug!(stdout = %captured.stdout_lossy(), "rclone stdout");
    if captured.has_stderr() {
        warn!(stderr = %captured.stderr_lossy(), "rclone stderr");
    }

    Ok(RawExit {
        code: output.status.code(),
        output: captured,
    })
}

fn command_line(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            delay: Duration::from_millis(1),
        }
    }

    fn exit(code: i32, stdout: &str) -> RawExit {
        RawExit {
            code: Some(code),
            output: ToolOutput::new(stdout, ""),
        }
    }

    #[test]
    fn default_policy_is_five_attempts_two_seconds() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.delay, Duration::from_secs(2));
    }

    #[test]
    fn command_line_prepends_program() {
        let args = vec!["lsjson".to_string(), "r:c/x".to_string()];
        assert_eq!(command_line("rclone", &args), "rclone lsjson r:c/x");
    }

    #[test]
    fn whitespace_stderr_is_not_an_error() {
        assert!(!ToolOutput::new("", " \n").has_stderr());
        assert!(ToolOutput::new("", "ERROR: nope\n").has_stderr());
    }

    #[tokio::test]
    async fn succeeds_on_fifth_attempt_after_four_retriable_exits() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let out = run_with_retry(&fast_policy(5), "rclone ls r:", move || {
            let calls = calls_clone.clone();
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                if n < 5 {
                    Ok(exit(5, "stale"))
                } else {
                    Ok(exit(0, "fifth"))
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(out.stdout, b"fifth");
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn retriable_exit_on_every_attempt_exhausts_budget() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let err = run_with_retry(&fast_policy(5), "rclone ls r:", move || {
            let calls = calls_clone.clone();
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                Ok(RawExit {
                    code: Some(5),
                    output: ToolOutput::new("", format!("attempt {n}: rate limited\n")),
                })
            }
        })
        .await
        .unwrap_err();

        match err {
            Error::RetryBudgetExceeded {
                attempts, stderr, ..
            } => {
                assert_eq!(attempts, 5);
                assert_eq!(stderr, "attempt 5: rate limited");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn other_exit_codes_are_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let err = run_with_retry(&fast_policy(5), "rclone copy a b", move || {
            let calls = calls_clone.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(RawExit {
                    code: Some(3),
                    output: ToolOutput::new("", "directory not found\n"),
                })
            }
        })
        .await
        .unwrap_err();

        match err {
            Error::ToolInvocationFailed {
                exit_code, stderr, ..
            } => {
                assert_eq!(exit_code, Some(3));
                assert_eq!(stderr, "directory not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn signal_termination_is_fatal() {
        let err = run_with_retry(&fast_policy(5), "rclone ls r:", || async {
            Ok(RawExit {
                code: None,
                output: ToolOutput::default(),
            })
        })
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            Error::ToolInvocationFailed {
                exit_code: None,
                ..
            }
        ));
    }

    #[cfg(unix)]
    mod process {
        use super::*;

        fn sh(script: &str) -> Vec<String> {
            vec!["-c".to_string(), script.to_string()]
        }

        #[tokio::test]
        async fn captures_stdout_and_stderr() {
            let runner = RcloneRunner::with_program("sh");
            let out = runner
                .run(&sh("printf listing; printf notice >&2"))
                .await
                .unwrap();
            assert_eq!(out.stdout_lossy(), "listing");
            assert_eq!(out.stderr_lossy(), "notice");
        }

        #[tokio::test]
        async fn fatal_exit_code_carries_stderr() {
            let runner = RcloneRunner::with_program("sh");
            let err = runner
                .run(&sh("echo 'bucket missing' >&2; exit 3"))
                .await
                .unwrap_err();
            match err {
                Error::ToolInvocationFailed {
                    exit_code, stderr, ..
                } => {
                    assert_eq!(exit_code, Some(3));
                    assert_eq!(stderr, "bucket missing");
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }

        #[tokio::test]
        async fn retriable_exit_code_is_retried_by_real_runner() {
            let runner = RcloneRunner::with_program("sh").with_policy(fast_policy(2));
            let err = runner
                .run(&sh("echo 'rate limited' >&2; exit 5"))
                .await
                .unwrap_err();
            match err {
                Error::RetryBudgetExceeded {
                    attempts, stderr, ..
                } => {
                    assert_eq!(attempts, 2);
                    assert_eq!(stderr, "rate limited");
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }

        #[tokio::test]
        async fn timed_out_run_kills_the_child() {
            let dir = tempfile::tempdir().unwrap();
            let marker = dir.path().join("copied");
            let script = format!("sleep 1; touch '{}'", marker.display());

            let runner = RcloneRunner::with_program("sh");
            let outcome =
                tokio::time::timeout(Duration::from_millis(200), runner.run(&sh(&script))).await;
            assert!(outcome.is_err());

            tokio::time::sleep(Duration::from_secs(2)).await;
            assert!(!marker.exists());
        }

        #[tokio::test]
        async fn missing_binary_is_tool_not_found() {
            let runner = RcloneRunner::with_program("/nonexistent/rclone-binary");
            let err = runner.run(&["listremotes".to_string()]).await.unwrap_err();
            assert!(matches!(err, Error::ToolNotFound { .. }));
        }
    }
}
