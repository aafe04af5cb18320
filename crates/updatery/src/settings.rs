use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use updatery_platform::AppPaths;

use crate::manager_kind::ManagerKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_winget_scan_timeout")]
    pub winget_scan_timeout_secs: u64,

    #[serde(default = "default_npm_scan_timeout")]
    pub npm_scan_timeout_secs: u64,

    #[serde(default)]
    pub winget_path: Option<PathBuf>,

    #[serde(default)]
    pub npm_path: Option<PathBuf>,

    #[serde(default)]
    pub debug_logging: bool,

    #[serde(default = "default_max_log_size_bytes")]
    pub max_log_size_bytes: u64,
}

fn default_winget_scan_timeout() -> u64 {
    120
}

fn default_npm_scan_timeout() -> u64 {
    60
}

fn default_max_log_size_bytes() -> u64 {
    5 * 1024 * 1024
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            winget_scan_timeout_secs: default_winget_scan_timeout(),
            npm_scan_timeout_secs: default_npm_scan_timeout(),
            winget_path: None,
            npm_path: None,
            debug_logging: false,
            max_log_size_bytes: default_max_log_size_bytes(),
        }
    }
}

impl AppSettings {
    pub fn load() -> Self {
        let Ok(paths) = AppPaths::new() else {
            return Self::default();
        };
        Self::load_from(&paths.settings_file())
    }

    /// Missing, unreadable, or invalid files all yield defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|error| {
                log::warn!("Ignoring invalid settings file {}: {error}", path.display());
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self) -> Result<PathBuf, std::io::Error> {
        let paths = AppPaths::new().map_err(std::io::Error::other)?;
        paths.ensure_dirs()?;

        let path = paths.settings_file();
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn scan_timeout(&self, kind: ManagerKind) -> Duration {
        let secs = match kind {
            ManagerKind::Winget => self.winget_scan_timeout_secs,
            ManagerKind::Npm => self.npm_scan_timeout_secs,
        };
        Duration::from_secs(secs)
    }

    pub fn program_override(&self, kind: ManagerKind) -> Option<&Path> {
        match kind {
            ManagerKind::Winget => self.winget_path.as_deref(),
            ManagerKind::Npm => self.npm_path.as_deref(),
        }
    }
}
