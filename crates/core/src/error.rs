use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by the rclone adapter.
///
/// Nothing here is recovered locally except the retriable exit code, which
/// the runner absorbs until its budget runs out.
#[derive(Debug, Error)]
pub enum Error {
    /// The rclone binary could not be located or launched.
    #[error("rclone executable not found at {program}: {source}")]
    ToolNotFound {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Exit code 5 persisted through every attempt.
    #[error("rclone failed to run `{command}` after {attempts} attempts: {stderr}")]
    RetryBudgetExceeded {
        command: String,
        attempts: u32,
        stderr: String,
    },

    /// Fatal exit code, or a failure talking to the child process.
    #[error(
        "rclone command `{command}` failed{}: {stderr}",
        .exit_code.map(|c| format!(" with exit code {c}")).unwrap_or_default()
    )]
    ToolInvocationFailed {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("rclone remote matching {remote_name} not found")]
    RemoteNotFound { remote_name: String },

    #[error("unable to find or create container {container}")]
    ContainerUnavailable { container: String },

    #[error("unable to decode JSON from rclone lsjson for {path}: {source}")]
    MalformedListing {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// `rclone delete` exited cleanly but wrote to stderr.
    #[error("rclone delete of {path} reported an error: {stderr}")]
    DeleteFailed { path: String, stderr: String },

    #[error("failed to create local directory {path}: {source}")]
    LocalDirectory {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Exit status of the failed invocation, when there was one.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Error::ToolInvocationFailed { exit_code, .. } => *exit_code,
            Error::RetryBudgetExceeded { .. } => Some(crate::runner::RETRIABLE_EXIT_CODE),
            _ => None,
        }
    }
}
