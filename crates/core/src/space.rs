//! The rclone space: move-in, move-out, browse and delete on a remote.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::{LocationPurpose, SpaceConfig};
use crate::container;
use crate::error::{Error, Result};
use crate::listing::{BrowseResult, parse_listing};
use crate::path::{compose, strip_current_dir, strip_leading_separator, with_trailing_separator};
use crate::remote;
use crate::runner::ToolRunner;

/// Extensions that mark a package path as a single file even when it does
/// not exist locally.
const PACKAGE_EXTENSIONS: &[&str] = &[".7z", ".zip", ".tar", ".tgz", ".gz", ".bz2"];

/// Local-side collaborators of a space.
#[async_trait]
pub trait LocalFilesystem: Send + Sync {
    /// Whether `path` names a single-file package rather than a directory tree.
    fn is_file(&self, path: &str) -> bool;

    /// Create the directories leading up to `path`. A path ending in a
    /// separator is created in full; otherwise only its parent.
    async fn create_local_directory(&self, path: &str) -> Result<()>;
}

/// The local filesystem as seen from the staging area.
#[derive(Debug, Clone, Copy, Default)]
pub struct StagingFilesystem;

#[async_trait]
impl LocalFilesystem for StagingFilesystem {
    fn is_file(&self, path: &str) -> bool {
        package_is_file(path)
    }

    async fn create_local_directory(&self, path: &str) -> Result<()> {
        let dir = if path.ends_with('/') {
            Path::new(path)
        } else {
            match Path::new(path).parent() {
                Some(parent) => parent,
                None => return Ok(()),
            }
        };
        if dir.as_os_str().is_empty() {
            return Ok(());
        }
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|source| Error::LocalDirectory {
                path: dir.display().to_string(),
                source,
            })
    }
}

/// A package is a file if it is a regular file on disk or carries a known
/// archive extension.
pub fn package_is_file(path: &str) -> bool {
    if Path::new(path).is_file() {
        return true;
    }
    let lower = path.to_lowercase();
    PACKAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

fn transfer_subcommand(is_file: bool) -> &'static str {
    if is_file { "copyto" } else { "copy" }
}

/// Storage space backed by an rclone remote.
///
/// The remote is addressed by name through rclone's global configuration, so
/// at most one concurrently-active space per distinct remote name is
/// supported.
pub struct RcloneSpace {
    config: SpaceConfig,
    runner: Arc<dyn ToolRunner>,
    fs: Arc<dyn LocalFilesystem>,
}

impl RcloneSpace {
    pub const ALLOWED_PURPOSES: [LocationPurpose; 4] = [
        LocationPurpose::AipStorage,
        LocationPurpose::DipStorage,
        LocationPurpose::Replicator,
        LocationPurpose::TransferSource,
    ];

    pub fn new(config: SpaceConfig, runner: Arc<dyn ToolRunner>) -> Self {
        Self {
            config,
            runner,
            fs: Arc::new(StagingFilesystem),
        }
    }

    pub fn with_filesystem(mut self, fs: Arc<dyn LocalFilesystem>) -> Self {
        self.fs = fs;
        self
    }

    pub fn config(&self) -> &SpaceConfig {
        &self.config
    }

    pub fn allows_purpose(purpose: LocationPurpose) -> bool {
        Self::ALLOWED_PURPOSES.contains(&purpose)
    }

    /// Resolve this space's remote prefix (`name:`) from rclone's live config.
    pub async fn remote_prefix(&self) -> Result<String> {
        remote::resolve_prefix(self.runner.as_ref(), &self.config.remote_name).await
    }

    /// Check the configured container and create it if needed. No-op for
    /// spaces without a container.
    pub async fn ensure_container_exists(&self) -> Result<()> {
        self.prepare().await.map(|_| ())
    }

    /// Copy a local package to `remote_path`.
    pub async fn move_to_remote(&self, local_path: &str, remote_path: &str) -> Result<()> {
        let source = strip_current_dir(local_path);
        let is_file = self.fs.is_file(source);

        let prefix = self.prepare().await?;
        let destination = compose(
            &prefix,
            &self.config.container,
            strip_current_dir(remote_path),
            !is_file,
        );

        self.runner
            .run(&[
                transfer_subcommand(is_file).to_string(),
                source.to_string(),
                destination,
            ])
            .await?;
        Ok(())
    }

    /// Copy the package at `remote_path` to `local_destination`.
    pub async fn move_from_remote(&self, remote_path: &str, local_destination: &str) -> Result<()> {
        let remote_path = strip_current_dir(remote_path);
        let is_file = self.fs.is_file(remote_path);

        let prefix = self.prepare().await?;
        let source = compose(&prefix, &self.config.container, remote_path, false);

        let destination = strip_current_dir(local_destination);
        let destination = if is_file {
            destination.to_string()
        } else {
            with_trailing_separator(destination)
        };

        if !self.config.has_container() {
            self.fs.create_local_directory(&destination).await?;
        }

        self.runner
            .run(&[transfer_subcommand(is_file).to_string(), source, destination])
            .await?;
        Ok(())
    }

    /// List the immediate children of a remote directory.
    pub async fn browse(&self, path: &str) -> Result<BrowseResult> {
        debug!(container = %self.config.container, path, "Browsing rclone space");

        let prefix = self.prepare().await?;
        let target = compose(&prefix, &self.config.container, path, false);
        let output = self.runner.run(&["lsjson".to_string(), target.clone()]).await?;
        parse_listing(&target, &output.stdout)
    }

    /// Permanently remove a remote object or tree.
    ///
    /// `rclone delete` does not reliably signal failure through its exit code,
    /// so any stderr output is treated as a failed delete.
    pub async fn delete(&self, path: &str) -> Result<()> {
        if path.starts_with('/') {
            info!(path, "rclone path to delete begins with /, removing it prior to deletion");
        }
        let relative = strip_leading_separator(path);

        let prefix = self.prepare().await?;
        let target = compose(&prefix, &self.config.container, relative, false);
        let output = self.runner.run(&["delete".to_string(), target.clone()]).await?;

        if output.has_stderr() {
            return Err(Error::DeleteFailed {
                path: target,
                stderr: output.stderr_lossy().trim().to_string(),
            });
        }
        Ok(())
    }

    /// Resolve the prefix and, when a container is configured, make sure it
    /// exists. Every operation goes through here before touching paths.
    async fn prepare(&self) -> Result<String> {
        let prefix = self.remote_prefix().await?;
        if self.config.has_container() {
            container::ensure_exists(self.runner.as_ref(), &prefix, &self.config.container).await?;
        }
        Ok(prefix)
    }
}
