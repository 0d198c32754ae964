use anyhow::Result;
use clap::Args;
use tracing::info;

use super::SpaceSelector;
use crate::config::AppConfig;
use crate::progress;

#[derive(Args)]
pub struct PushArgs {
    #[command(flatten)]
    target: SpaceSelector,

    /// Local file or directory to upload
    local: String,

    /// Destination path on the remote, relative to the container
    remote: String,
}

#[derive(Args)]
pub struct PullArgs {
    #[command(flatten)]
    target: SpaceSelector,

    /// Path on the remote, relative to the container
    remote: String,

    /// Local destination
    local: String,
}

pub async fn push(args: PushArgs) -> Result<()> {
    let config = AppConfig::load()?;
    let space = config.open_space(&args.target.space)?;

    info!(
        local = %args.local,
        remote = %args.remote,
        space = %args.target.space,
        "Moving package to remote"
    );
    let spinner = progress::create_spinner(&format!("Copying {} to remote...", args.local));
    let result = space.move_to_remote(&args.local, &args.remote).await;
    spinner.finish_and_clear();
    result?;

    println!("Copied {} to {}", args.local, args.remote);
    Ok(())
}

pub async fn pull(args: PullArgs) -> Result<()> {
    let config = AppConfig::load()?;
    let space = config.open_space(&args.target.space)?;

    info!(
        remote = %args.remote,
        local = %args.local,
        space = %args.target.space,
        "Moving package from remote"
    );
    let spinner = progress::create_spinner(&format!("Copying {} from remote...", args.remote));
    let result = space.move_from_remote(&args.remote, &args.local).await;
    spinner.finish_and_clear();
    result?;

    println!("Copied {} to {}", args.remote, args.local);
    Ok(())
}
