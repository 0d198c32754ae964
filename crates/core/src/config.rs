use serde::{Deserialize, Serialize};

/// Adapter configuration, owned by the enclosing storage-location record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceConfig {
    /// Matched case-insensitively against `rclone listremotes`.
    pub remote_name: String,
    /// Bucket or container; empty for remotes without one.
    #[serde(default)]
    pub container: String,
}

impl SpaceConfig {
    pub fn new(remote_name: impl Into<String>, container: impl Into<String>) -> Self {
        Self {
            remote_name: remote_name.into(),
            container: container.into(),
        }
    }

    pub fn has_container(&self) -> bool {
        !self.container.is_empty()
    }
}

/// What a storage location is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationPurpose {
    AipStorage,
    DipStorage,
    Replicator,
    TransferSource,
    Backlog,
    CurrentlyProcessing,
    StorageServiceInternal,
}

impl std::fmt::Display for LocationPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationPurpose::AipStorage => write!(f, "aip_storage"),
            LocationPurpose::DipStorage => write!(f, "dip_storage"),
            LocationPurpose::Replicator => write!(f, "replicator"),
            LocationPurpose::TransferSource => write!(f, "transfer_source"),
            LocationPurpose::Backlog => write!(f, "backlog"),
            LocationPurpose::CurrentlyProcessing => write!(f, "currently_processing"),
            LocationPurpose::StorageServiceInternal => write!(f, "storage_service_internal"),
        }
    }
}
