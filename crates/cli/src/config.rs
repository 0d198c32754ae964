use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use rclonespace_core::runner::DEFAULT_PROGRAM;
use rclonespace_core::{RcloneRunner, RcloneSpace, SpaceConfig};

const CONFIG_FILE: &str = "rclonespace.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub rclone: RcloneSettings,
    #[serde(default)]
    pub spaces: Vec<SpaceEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RcloneSettings {
    /// rclone executable, looked up on PATH unless absolute.
    #[serde(default = "default_binary")]
    pub binary: String,
}

impl Default for RcloneSettings {
    fn default() -> Self {
        Self {
            binary: default_binary(),
        }
    }
}

fn default_binary() -> String {
    DEFAULT_PROGRAM.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaceEntry {
    pub name: String,
    #[serde(flatten)]
    pub space: SpaceConfig,
}

impl AppConfig {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("rclonespace")
            .join(CONFIG_FILE)
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Like [`AppConfig::load`], but a missing file yields an empty config.
    pub fn load_or_default() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("config not found at {}", path.display()))?;
        toml::from_str(&content).context("failed to parse config")
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("failed to write config to {}", path.display()))?;
        Ok(())
    }

    pub fn find_space(&self, name: &str) -> Option<&SpaceEntry> {
        self.spaces
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }

    pub fn open_space(&self, name: &str) -> Result<RcloneSpace> {
        let entry = self
            .find_space(name)
            .with_context(|| format!("space '{name}' not configured"))?;
        let runner = RcloneRunner::with_program(&self.rclone.binary);
        Ok(RcloneSpace::new(entry.space.clone(), Arc::new(runner)))
    }
}
