use anyhow::Result;
use clap::Args;
use tracing::info;

use super::SpaceSelector;
use crate::config::AppConfig;

#[derive(Args)]
pub struct DeleteArgs {
    #[command(flatten)]
    target: SpaceSelector,

    /// Remote path to delete, relative to the container
    path: String,
}

pub async fn run(args: DeleteArgs) -> Result<()> {
    let config = AppConfig::load()?;
    let space = config.open_space(&args.target.space)?;

    space.delete(&args.path).await?;
    info!(path = %args.path, space = %args.target.space, "Package deleted");
    println!("Deleted {}", args.path);
    Ok(())
}
