pub mod browse;
pub mod delete;
pub mod remote;
pub mod space;
pub mod transfer;

use clap::{Args, Subcommand};

#[derive(Subcommand)]
pub enum Command {
    /// Manage configured spaces
    Space(space::SpaceArgs),
    /// Show the resolved rclone remote of a space
    Remote(remote::RemoteArgs),
    /// List a remote directory
    Browse(browse::BrowseArgs),
    /// Copy a local package to the remote
    Push(transfer::PushArgs),
    /// Copy a package from the remote to local storage
    Pull(transfer::PullArgs),
    /// Permanently delete a remote package
    Delete(delete::DeleteArgs),
}

/// Selects the configured space a command operates on.
#[derive(Args)]
pub struct SpaceSelector {
    /// Name of the configured space
    #[arg(long, short)]
    pub space: String,
}
