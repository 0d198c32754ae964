use tracing::{debug, error, info};

use crate::error::{Error, Result};
use crate::path::container_path;
use crate::runner::ToolRunner;

/// Make sure `container` exists under `prefix`, creating it if the listing
/// fails. Idempotent; at most two rclone calls.
///
/// A listing or mkdir counts as successful only when it exits cleanly with an
/// empty stderr. A missing rclone binary is surfaced as is, since creating the
/// container cannot succeed either.
pub async fn ensure_exists(runner: &dyn ToolRunner, prefix: &str, container: &str) -> Result<()> {
    debug!(container, "Test that container exists");
    let prefixed = container_path(prefix, container);

    if step_succeeded(runner, "ls", &prefixed).await? {
        return Ok(());
    }

    info!(container, "Creating container");
    if step_succeeded(runner, "mkdir", &prefixed).await? {
        return Ok(());
    }

    error!(container = %prefixed, "Unable to find or create container");
    Err(Error::ContainerUnavailable { container: prefixed })
}

async fn step_succeeded(runner: &dyn ToolRunner, subcommand: &str, path: &str) -> Result<bool> {
    match runner.run(&[subcommand.to_string(), path.to_string()]).await {
        Ok(output) => Ok(!output.has_stderr()),
        Err(e @ Error::ToolNotFound { .. }) => Err(e),
        Err(e) => {
            debug!(subcommand, path, error = %e, "container step failed");
            Ok(false)
        }
    }
}
