use anyhow::Result;
use clap::Args;

use super::SpaceSelector;
use crate::config::AppConfig;

#[derive(Args)]
pub struct RemoteArgs {
    #[command(flatten)]
    target: SpaceSelector,
}

pub async fn run(args: RemoteArgs) -> Result<()> {
    let config = AppConfig::load()?;
    let space = config.open_space(&args.target.space)?;

    let prefix = space.remote_prefix().await?;
    println!("Remote:    {prefix}");

    if space.config().has_container() {
        space.ensure_container_exists().await?;
        println!("Container: {} (ok)", space.config().container);
    }
    Ok(())
}
