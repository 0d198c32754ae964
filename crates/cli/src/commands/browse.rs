use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;

use rclonespace_core::{BrowseResult, EntryProperties};

use super::SpaceSelector;
use crate::config::AppConfig;

#[derive(Args)]
pub struct BrowseArgs {
    #[command(flatten)]
    target: SpaceSelector,

    /// Directory to list, relative to the container
    #[arg(default_value = "/")]
    path: String,

    /// Print the raw listing as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(args: BrowseArgs) -> Result<()> {
    let config = AppConfig::load()?;
    let space = config.open_space(&args.target.space)?;

    let result = space.browse(&args.path).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if result.entries.is_empty() {
        println!("No entries found.");
        return Ok(());
    }

    println!("{:<40} {:>10} {:<24} {:<20}", "NAME", "SIZE", "TYPE", "MODIFIED");
    println!("{}", "-".repeat(96));
    for line in render(&result) {
        println!("{line}");
    }
    Ok(())
}

fn render(result: &BrowseResult) -> Vec<String> {
    result
        .sorted_entries()
        .into_iter()
        .map(|name| match result.properties.get(name) {
            Some(EntryProperties::File {
                size,
                timestamp,
                mimetype,
            }) => format!(
                "{:<40} {:>10} {:<24} {:<20}",
                name,
                size.map(format_bytes).unwrap_or_else(|| "-".to_string()),
                mimetype.as_deref().unwrap_or("-"),
                format_timestamp(timestamp.as_deref()),
            ),
            Some(EntryProperties::Directory { timestamp }) => format!(
                "{:<40} {:>10} {:<24} {:<20}",
                format!("{name}/"),
                "-",
                "directory",
                format_timestamp(timestamp.as_deref()),
            ),
            None => format!("{:<40} {:>10} {:<24} {:<20}", name, "-", "-", "-"),
        })
        .collect()
}

fn format_timestamp(timestamp: Option<&str>) -> String {
    match timestamp {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|dt| {
                dt.with_timezone(&Utc)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string()
            })
            .unwrap_or_else(|_| raw.to_string()),
        None => "-".to_string(),
    }
}

/// rclone reports -1 for objects whose size is unknown.
fn format_bytes(bytes: i64) -> String {
    const KB: i64 = 1024;
    const MB: i64 = 1024 * KB;
    const GB: i64 = 1024 * MB;
    if bytes < 0 {
        "-".to_string()
    } else if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}
