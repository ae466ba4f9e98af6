//! Storage paths for app-services data.
//!
//! Production code uses `StorageConfig::default()` which points to
//! `~/.app-services/`. Tests use `StorageConfig::with_root(temp_dir)`.

use std::path::{Path, PathBuf};

/// Central configuration for all app-services storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Root directory for all app-services data (default: ~/.app-services)
    root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let root = dirs::home_dir()
            .map(|home| home.join(".app-services"))
            .unwrap_or_else(|| std::env::temp_dir().join(".app-services"));
        Self { root }
    }
}

impl StorageConfig {
    /// Creates a StorageConfig with a custom root directory.
    pub fn with_root(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to config.json (backend preferences).
    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.json")
    }

    /// Path to logs/ directory (rolling CLI logs).
    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }
}
