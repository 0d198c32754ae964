use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One object from `rclone lsjson`.
///
/// rclone emits more fields (`Path`, `ID`, hashes); only these are kept.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DirectoryEntry {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "IsDir", default)]
    pub is_directory: bool,
    #[serde(rename = "Size", default)]
    pub size: Option<i64>,
    #[serde(rename = "ModTime", default)]
    pub modified_at: Option<String>,
    #[serde(rename = "MimeType", default)]
    pub mime_type: Option<String>,
}

impl DirectoryEntry {
    /// The modification time, when rclone gave one in RFC 3339 form.
    pub fn modified(&self) -> Option<DateTime<Utc>> {
        self.modified_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    fn properties(&self) -> EntryProperties {
        if self.is_directory {
            EntryProperties::Directory {
                timestamp: self.modified_at.clone(),
            }
        } else {
            EntryProperties::File {
                size: self.size,
                timestamp: self.modified_at.clone(),
                mimetype: self.mime_type.clone(),
            }
        }
    }
}

/// Property bag recorded per entry; its shape depends on the entry kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EntryProperties {
    File {
        size: Option<i64>,
        timestamp: Option<String>,
        mimetype: Option<String>,
    },
    Directory {
        timestamp: Option<String>,
    },
}

/// Immediate children of a browsed remote directory.
///
/// `directories` is a subset of `entries`. Neither set has a meaningful order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BrowseResult {
    pub entries: HashSet<String>,
    pub directories: HashSet<String>,
    pub properties: HashMap<String, EntryProperties>,
}

impl BrowseResult {
    pub fn from_entries(entries: impl IntoIterator<Item = DirectoryEntry>) -> Self {
        let mut result = Self::default();
        for entry in entries {
            if entry.is_directory {
                result.directories.insert(entry.name.clone());
            }
            result.properties.insert(entry.name.clone(), entry.properties());
            result.entries.insert(entry.name);
        }
        result
    }

    pub fn is_directory(&self, name: &str) -> bool {
        self.directories.contains(name)
    }

    /// Entry names in lexical order, for display.
    pub fn sorted_entries(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Parse `rclone lsjson` stdout for the listing of `path`.
pub fn parse_listing(path: &str, stdout: &[u8]) -> Result<BrowseResult> {
    let entries: Vec<DirectoryEntry> =
        serde_json::from_slice(stdout).map_err(|source| Error::MalformedListing {
            path: path.to_string(),
            source,
        })?;
    Ok(BrowseResult::from_entries(entries))
}
