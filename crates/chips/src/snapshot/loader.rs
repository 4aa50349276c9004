//! Snapshot Loader
//!
//! Reads a registry snapshot (`{entities, devices, areas, states}`) from a
//! JSON or TOML document.

use std::path::{Path, PathBuf};

use status_chips::Registries;
use tokio::fs;
use tracing::{debug, info};

/// Error type for snapshot loading
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Snapshot file does not exist: {0}")]
    NotFound(PathBuf),

    #[error("Unsupported snapshot format: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("Failed to read file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParseError(#[from] serde_json::Error),
}

/// Snapshot document format, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    Toml,
}

impl SnapshotFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// Snapshot loader
pub struct SnapshotLoader;

impl SnapshotLoader {
    /// Load a registry snapshot from the given path
    pub async fn load(path: impl AsRef<Path>) -> Result<Registries, LoadError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(LoadError::NotFound(path.to_path_buf()));
        }
        let format = SnapshotFormat::from_path(path)
            .ok_or_else(|| LoadError::UnsupportedFormat(path.to_path_buf()))?;

        let content = fs::read_to_string(path).await?;
        let registries = Self::parse(&content, format)?;

        info!(
            "Loaded snapshot {}: {} entities, {} devices, {} areas, {} states",
            path.display(),
            registries.entities.len(),
            registries.devices.len(),
            registries.areas.len(),
            registries.states.len()
        );
        Ok(registries)
    }

    /// Parse snapshot content in a known format
    pub fn parse(content: &str, format: SnapshotFormat) -> Result<Registries, LoadError> {
        debug!(?format, bytes = content.len(), "parsing snapshot");
        let registries = match format {
            SnapshotFormat::Json => serde_json::from_str(content)?,
            SnapshotFormat::Toml => toml::from_str(content)?,
        };
        Ok(registries)
    }
}
