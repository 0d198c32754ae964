use anyhow::Result;
use clap::{Args, Subcommand};

use rclonespace_core::{LocationPurpose, RcloneSpace, SpaceConfig};

use crate::config::{AppConfig, SpaceEntry};

#[derive(Args)]
pub struct SpaceArgs {
    #[command(subcommand)]
    action: SpaceAction,
}

#[derive(Subcommand)]
enum SpaceAction {
    /// Add a new space
    Add {
        /// Space name used by other commands
        #[arg(long)]
        name: String,
        /// rclone remote name (prefix match, case-insensitive)
        #[arg(long)]
        remote: String,
        /// Bucket or container name
        #[arg(long, default_value = "")]
        container: String,
    },
    /// List configured spaces
    List,
    /// Remove a space
    Remove {
        /// Space name to remove
        name: String,
    },
}

pub async fn run(args: SpaceArgs) -> Result<()> {
    match args.action {
        SpaceAction::Add {
            name,
            remote,
            container,
        } => {
            let mut config = AppConfig::load_or_default()?;
            if config.find_space(&name).is_some() {
                anyhow::bail!("space '{name}' already exists");
            }
            config.spaces.push(SpaceEntry {
                name: name.clone(),
                space: SpaceConfig::new(remote, container),
            });
            config.save()?;
            println!("Space '{name}' added.");
        }
        SpaceAction::List => {
            let config = AppConfig::load()?;
            if config.spaces.is_empty() {
                println!("No spaces configured.");
            } else {
                println!("{:<20} {:<24} {:<24}", "NAME", "REMOTE", "CONTAINER");
                println!("{}", "-".repeat(68));
                for s in &config.spaces {
                    let container = if s.space.has_container() {
                        s.space.container.as_str()
                    } else {
                        "-"
                    };
                    println!("{:<20} {:<24} {:<24}", s.name, s.space.remote_name, container);
                }
                println!();
                println!("Allowed purposes: {}", allowed_purposes());
            }
        }
        SpaceAction::Remove { name } => {
            let mut config = AppConfig::load()?;
            let before = config.spaces.len();
            config
                .spaces
                .retain(|s| !s.name.eq_ignore_ascii_case(&name));
            if config.spaces.len() == before {
                anyhow::bail!("space '{name}' not found");
            }
            config.save()?;
            println!("Space '{name}' removed.");
        }
    }
    Ok(())
}

fn allowed_purposes() -> String {
    RcloneSpace::ALLOWED_PURPOSES
        .iter()
        .map(LocationPurpose::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
