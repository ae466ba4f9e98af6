//! Backend preferences loading and saving.
//!
//! Missing or malformed config files fall back to defaults; a broken
//! `config.json` must never stop `openURL` from working.

use crate::error::{AppServicesError, Result};
use crate::storage::StorageConfig;
use fs_err as fs;
use serde::{Deserialize, Serialize};

/// Default opener for files and URLs on freedesktop systems.
pub const DEFAULT_OPENER: &str = "xdg-open";

/// Preferences consumed by the platform backends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    /// Command used to hand files and URLs to their default handler.
    /// Ignored on macOS, where NSWorkspace does this directly.
    pub opener: String,
    /// Extra directories searched for `.desktop` entries, ahead of the XDG ones.
    pub extra_application_dirs: Vec<String>,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            opener: DEFAULT_OPENER.to_string(),
            extra_application_dirs: Vec::new(),
        }
    }
}

/// Loads the config from the default location, returning defaults if absent.
pub fn load_services_config() -> ServicesConfig {
    load_services_config_with_storage(&StorageConfig::default())
}

pub fn load_services_config_with_storage(storage: &StorageConfig) -> ServicesConfig {
    let path = storage.config_file();
    let Ok(content) = fs::read_to_string(&path) else {
        return ServicesConfig::default();
    };
    match serde_json::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring malformed config");
            ServicesConfig::default()
        }
    }
}

/// Saves the config as pretty JSON, creating the storage root if needed.
pub fn save_services_config_with_storage(
    storage: &StorageConfig,
    config: &ServicesConfig,
) -> Result<()> {
    fs::create_dir_all(storage.root()).map_err(|source| AppServicesError::Io {
        context: "creating storage root".to_string(),
        source,
    })?;
    let content = serde_json::to_string_pretty(config).map_err(|source| AppServicesError::Json {
        context: "serializing config".to_string(),
        source,
    })?;
    fs::write(storage.config_file(), content).map_err(|source| AppServicesError::Io {
        context: "writing config".to_string(),
        source,
    })
}
