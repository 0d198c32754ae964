//! Storage adapter that keeps packages on any rclone remote.
//!
//! All data transfer is delegated to the `rclone` binary. This crate turns
//! move-in, move-out, browse and delete into rclone invocations, keeps the
//! configured container in existence, and classifies rclone's exit codes.

pub mod config;
pub mod container;
pub mod error;
pub mod listing;
pub mod path;
pub mod remote;
pub mod runner;
pub mod space;

#[cfg(test)]
mod testing;

pub use config::{LocationPurpose, SpaceConfig};
pub use error::{Error, Result};
pub use listing::{BrowseResult, DirectoryEntry, EntryProperties};
pub use runner::{RcloneRunner, RetryPolicy, ToolOutput, ToolRunner};
pub use space::{LocalFilesystem, RcloneSpace, StagingFilesystem};
