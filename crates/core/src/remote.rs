use tracing::debug;

use crate::error::{Error, Result};
use crate::runner::ToolRunner;

/// Pick the first remote in `listing` whose identifier starts with
/// `remote_name`, ignoring case. Blank lines are skipped.
pub fn select_remote<'a>(listing: &'a str, remote_name: &str) -> Option<&'a str> {
    let wanted = remote_name.to_lowercase();
    listing
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .find(|remote| remote.to_lowercase().starts_with(&wanted))
}

/// Ask rclone for its configured remotes and return the prefix (`name:`)
/// matching `remote_name`.
///
/// Not cached: rclone's configuration can change underneath us, so every
/// caller pays for one `listremotes` invocation.
pub async fn resolve_prefix(runner: &dyn ToolRunner, remote_name: &str) -> Result<String> {
    let output = runner.run(&["listremotes".to_string()]).await?;
    let listing = output.stdout_lossy();
    debug!(remotes = %listing, "rclone listremotes output");

    match select_remote(&listing, remote_name) {
        Some(remote) => {
            debug!(remote, "rclone remote selected");
            Ok(remote.to_string())
        }
        None => Err(Error::RemoteNotFound {
            remote_name: remote_name.to_string(),
        }),
    }
}
