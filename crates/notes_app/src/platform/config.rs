//! Start-up configuration read from a RON file.
//!
//! ```ron
//! (
//!     data_dir: "data",
//!     log_destination: both,
//!     log_level: "debug",
//!     default_tags: ["work", "reading"],
//! )
//! ```
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notes_core::TopicSeed;
use notes_logging::LogDestination;
use serde::Deserialize;

pub const CONFIG_ENV: &str = "NOTES_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "notes.ron";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Snapshot and recent lists live here.
    pub data_dir: PathBuf,
    pub export_dir: PathBuf,
    pub log_destination: LogDestination,
    pub log_file: PathBuf,
    pub log_level: String,
    pub agent_timeout_secs: u64,
    pub default_tags: Vec<String>,
    /// Only used when no saved topics exist.
    pub demo_topics: Vec<TopicSeed>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            export_dir: PathBuf::from("exports"),
            log_destination: LogDestination::File,
            log_file: PathBuf::from("notes.log"),
            log_level: "info".to_string(),
            agent_timeout_secs: 60,
            default_tags: vec![
                "requirements".to_string(),
                "internal".to_string(),
                "regulation".to_string(),
            ],
            demo_topics: vec![
                TopicSeed {
                    title: "Weekly project report".to_string(),
                    tags: vec!["requirements".to_string(), "internal".to_string()],
                    favorited: false,
                },
                TopicSeed {
                    title: "Regulation reading".to_string(),
                    tags: vec!["regulation".to_string()],
                    favorited: true,
                },
            ],
        }
    }
}

/// Result of reading the config file; the caller logs `warning` once logging is up.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub path: PathBuf,
    pub warning: Option<String>,
}

impl AppConfig {
    pub fn agent_timeout(&self) -> Duration {
        Duration::from_secs(self.agent_timeout_secs.max(1))
    }

    pub fn parse(text: &str) -> Result<Self, String> {
        ron::from_str(text).map_err(|err| err.to_string())
    }
}

pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Missing file yields defaults silently; an unreadable or malformed one yields
/// defaults plus a warning.
pub fn load_config(path: &Path) -> LoadedConfig {
    let (config, warning) = match fs::read_to_string(path) {
        Ok(text) => match AppConfig::parse(&text) {
            Ok(config) => (config, None),
            Err(err) => (
                AppConfig::default(),
                Some(format!("Ignoring malformed config {}: {}", path.display(), err)),
            ),
        },
        Err(err) if err.kind() == io::ErrorKind::NotFound => (AppConfig::default(), None),
        Err(err) => (
            AppConfig::default(),
            Some(format!("Cannot read config {}: {}", path.display(), err)),
        ),
    };
    LoadedConfig {
        config,
        path: path.to_path_buf(),
        warning,
    }
}
