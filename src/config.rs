// src/config.rs

//! Mirror configuration
//!
//! Loaded once at startup from a JSON file and immutable thereafter.
//! The file declares which IntelliJ build ranges the mirror targets and
//! which plugins to mirror:
//!
//! ```json
//! {
//!   "intellij": { "builds": [{ "since-build": "243", "until-build": "*" }] },
//!   "plugins": [{ "id": "org.rust.lang" }]
//! }
//! ```
//!
//! Operational keys (`output_dir`, `timeout_secs`, `catalog_url`,
//! `repository_url`, `server_port`) all have defaults, so a minimal
//! config only needs `intellij` and `plugins`.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default config file location
pub const DEFAULT_CONFIG_PATH: &str = "config/config.json";

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_catalog_url() -> String {
    "https://plugins.jetbrains.com".to_string()
}

fn default_repository_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_server_port() -> u16 {
    8080
}

/// An inclusive interval of platform build numbers, possibly open-ended above
#[derive(Debug, Clone, Deserialize)]
pub struct BuildRange {
    /// Lowest compatible build, numeric string (e.g. "243")
    #[serde(rename = "since-build")]
    pub since_build: String,
    /// Highest compatible build, numeric string or "*" for unbounded
    #[serde(rename = "until-build")]
    pub until_build: String,
}

/// Target IDE identity, expressed as the set of build ranges it spans
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IntellijSection {
    #[serde(default)]
    pub builds: Vec<BuildRange>,
}

/// One plugin to mirror
#[derive(Debug, Clone, Deserialize)]
pub struct PluginEntry {
    pub id: String,
}

/// Top-level mirror configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub intellij: IntellijSection,

    #[serde(default)]
    pub plugins: Vec<PluginEntry>,

    /// Root of the mirror tree; artifacts land under `<output_dir>/plugins`
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Timeout applied to every HTTP request
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Base URL of the remote catalog and download endpoints
    #[serde(default = "default_catalog_url")]
    pub catalog_url: String,

    /// Base URL written into generated index entries; must match where
    /// the static server is reachable from the IDE
    #[serde(default = "default_repository_url")]
    pub repository_url: String,

    /// Port the static file server binds to
    #[serde(default = "default_server_port")]
    pub server_port: u16,
}

impl Config {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!("Failed to read config file {}: {e}", path.display()))
        })?;

        let config: Config = serde_json::from_str(&data)
            .map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))?;

        Ok(config)
    }

    /// Directory holding per-plugin artifact subtrees
    pub fn plugins_dir(&self) -> PathBuf {
        self.output_dir.join("plugins")
    }

    /// HTTP timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
