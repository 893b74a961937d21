//! # Configuration Module
//!
//! Runtime settings for a run, with three layers:
//!
//! 1. Built-in defaults ([`RuntimeConfig::default`])
//! 2. An optional JSON file in the platform config directory:
//!    - Linux: `~/.config/newlistens/config.json`
//!    - macOS: `~/Library/Application Support/newlistens/config.json`
//!    - Windows: `%APPDATA%\newlistens\config.json`
//! 3. Command-line flags and `NEWLISTENS_*` environment variables
//!    ([`RuntimeConfig::with_overrides`])
//!
//! Missing keys in the file fall back to the defaults.

use crate::library::DEFAULT_SECTION;
use anyhow::{Context, Result};
use log::debug;
use path_absolutize::Absolutize;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "newlistens";
const CONFIG_FILE: &str = "config.json";

/// Returns the path of the optional config file.
///
/// The directory is not created; a missing file simply means defaults.
///
/// # Errors
///
/// Fails if the platform has no config directory.
pub fn get_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().ok_or_else(|| {
        anyhow::anyhow!(
            "Could not determine system config directory. Please ensure your platform supports standard config directories."
        )
    })?;
    Ok(config_dir.join(APP_DIR).join(CONFIG_FILE))
}

/// Configuration for runtime behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Library section holding the saved tracks
    pub section: String,
    /// Directory charts are written to
    pub out_dir: PathBuf,
    pub chart_width: u32,
    pub chart_height: u32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            section: DEFAULT_SECTION.to_string(),
            out_dir: PathBuf::from("charts"),
            chart_width: 1024,
            chart_height: 640,
        }
    }
}

impl RuntimeConfig {
    /// Load from the platform config file, or defaults if there is none.
    ///
    /// A platform without a config directory also gets the defaults.
    ///
    /// # Errors
    ///
    /// Fails only if a config file exists and cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_at(get_config_path())
    }

    fn load_at(config_path: Result<PathBuf>) -> Result<Self> {
        match config_path {
            Ok(path) => Self::load_or_default(&path),
            Err(e) => {
                debug!("{e}; using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load from `path` if it exists, otherwise return the defaults.
    ///
    /// # Errors
    ///
    /// Fails if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from(path)
        } else {
            debug!("No config file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        debug!("Loaded config from {}: {config:?}", path.display());
        Ok(config)
    }

    /// Apply command-line values on top of this config.
    #[must_use]
    pub fn with_overrides(mut self, section: Option<String>, out_dir: Option<PathBuf>) -> Self {
        if let Some(section) = section {
            self.section = section;
        }
        if let Some(out_dir) = out_dir {
            self.out_dir = out_dir;
        }
        self
    }

    pub fn chart_size(&self) -> (u32, u32) {
        (self.chart_width, self.chart_height)
    }

    /// Output directory resolved against the current directory.
    pub fn absolute_out_dir(&self) -> Result<PathBuf> {
        let absolute = self
            .out_dir
            .absolutize()
            .with_context(|| format!("Failed to resolve output directory {}", self.out_dir.display()))?;
        Ok(absolute.into_owned())
    }
}
