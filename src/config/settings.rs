//! Application settings and paths.
//!
//! Settings live in `settings.json` under the XDG config directory
//! (`~/.config/tlscan` on Linux). Every field is optional in the file.

use crate::error::{ConfigError, ConfigResult};
use crate::scanner::http::DEFAULT_USER_AGENT;
use crate::scanner::DEFAULT_CONCURRENCY;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application directory paths following the XDG Base Directory Specification.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/tlscan)
    pub config_dir: PathBuf,
}

impl Paths {
    /// Locate the directories; `None` when no home directory is known.
    pub fn discover() -> Option<Self> {
        let project = ProjectDirs::from("com", "tlscan", "tlscan")?;
        Some(Self {
            config_dir: project.config_dir().to_path_buf(),
        })
    }

    /// Get the path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }
}

/// Application-wide defaults, overridden by command-line flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Default number of concurrent probes.
    pub concurrency: usize,
    /// Default per-probe timeout in seconds.
    pub timeout_secs: f64,
    /// User-Agent sent with every probe.
    pub user_agent: String,
    /// Colourise terminal output.
    pub color: bool,
    /// Show the live progress bar on interactive terminals.
    pub progress: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            timeout_secs: 10.0,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            color: true,
            progress: true,
        }
    }
}

impl AppSettings {
    /// Load settings from the default location, falling back to defaults
    /// when the file does not exist.
    pub fn load() -> ConfigResult<Self> {
        let Some(paths) = Paths::discover() else {
            return Ok(Self::default());
        };
        let file = paths.settings_file();
        if !file.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&file)
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Ok(serde_json::from_str(&content)?)
    }
}
