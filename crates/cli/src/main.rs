mod commands;
mod config;
mod progress;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "rclonespace",
    version,
    about = "Archival package storage on rclone remotes"
)]
struct Cli {
    #[command(subcommand)]
    command: commands::Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.json_logs {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let result = match cli.command {
        commands::Command::Space(args) => commands::space::run(args).await,
        commands::Command::Remote(args) => commands::remote::run(args).await,
        commands::Command::Browse(args) => commands::browse::run(args).await,
        commands::Command::Push(args) => commands::transfer::push(args).await,
        commands::Command::Pull(args) => commands::transfer::pull(args).await,
        commands::Command::Delete(args) => commands::delete::run(args).await,
    };

    if let Err(err) = &result {
        if let Some(code) = err
            .downcast_ref::<rclonespace_core::Error>()
            .and_then(rclonespace_core::Error::exit_code)
        {
            tracing::error!(exit_code = code, "rclone exited unsuccessfully");
        }
    }
    result
}
