//! Configuration loading and root folder resolution
//!
//! Root folder priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable `ORILL_ROOT_FOLDER`
//! 3. TOML config file `root_folder`
//! 4. OS-dependent compiled default (fallback)
//!
//! A missing TOML file is not an error: the service starts with defaults and logs a warning.
//! A TOML file that exists but cannot be parsed is a configuration error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "ORILL_ROOT_FOLDER";

/// Environment variable overriding the database file location
pub const DB_PATH_ENV: &str = "ORILL_DB_PATH";

/// Database file name inside the root folder
pub const DATABASE_FILE: &str = "orill.db";

/// Default HTTP port for orill-il
pub const DEFAULT_PORT: u16 = 5780;

/// Analyzers registered when the config does not name any, in dispatch order
pub const DEFAULT_ANALYZERS: [&str; 4] = ["dataset", "interpret", "adapt", "vulnerability"];

/// Guardrail layers evaluated when the config does not name any, in audit order
///
/// CDIL = content integrity, IAL = instruction adherence, SELF_AUDIT = self review.
pub const DEFAULT_GUARDRAIL_LAYERS: [&str; 3] = ["CDIL", "IAL", "SELF_AUDIT"];

/// Logging section of the TOML config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level used when RUST_LOG is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// TOML configuration file contents
///
/// Every field has a default so partial files are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    pub bind_address: String,
    pub port: u16,
    /// Ordered analyzer names; order is dispatch order
    pub analyzers: Vec<String>,
    /// Ordered guardrail layer names; order is audit order
    pub guardrail_layers: Vec<String>,
    /// Reject unknown analyzer names and malformed layer lists instead of skipping them
    pub strict: bool,
    /// Default number of runs returned by the analytics summary
    pub recent_runs_limit: i64,
    pub logging: LoggingConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            root_folder: None,
            bind_address: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            analyzers: DEFAULT_ANALYZERS.iter().map(|s| s.to_string()).collect(),
            guardrail_layers: DEFAULT_GUARDRAIL_LAYERS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            strict: false,
            recent_runs_limit: 10,
            logging: LoggingConfig::default(),
        }
    }
}

impl TomlConfig {
    /// Parse a config file that must exist
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        Self::parse(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
    }

    /// Parse TOML text
    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load an explicitly requested file, or the platform default file if present
    ///
    /// An explicit path that does not exist is an error; a missing default file is not.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match default_config_path() {
            Some(path) if path.exists() => {
                info!("Loading config from {}", path.display());
                Self::load(&path)
            }
            Some(path) => {
                warn!(
                    "Config file not found at {}; using compiled defaults",
                    path.display()
                );
                Ok(Self::default())
            }
            None => {
                warn!("Could not determine config directory; using compiled defaults");
                Ok(Self::default())
            }
        }
    }
}

/// Platform config file location (`<config_dir>/orill/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("orill").join("config.toml"))
}

/// OS-dependent default root folder
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("orill"))
        .unwrap_or_else(|| PathBuf::from("./orill_data"))
}

/// Resolves the root folder following the documented priority order
#[derive(Debug, Clone, Default)]
pub struct RootFolderResolver {
    cli_arg: Option<PathBuf>,
    toml_root: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Priority 1: command-line argument
    pub fn with_cli_arg(mut self, path: Option<PathBuf>) -> Self {
        self.cli_arg = path;
        self
    }

    /// Priority 3: `root_folder` from the TOML config
    pub fn with_toml(mut self, config: &TomlConfig) -> Self {
        self.toml_root = config.root_folder.clone();
        self
    }

    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            return path.clone();
        }

        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }

        if let Some(path) = &self.toml_root {
            return path.clone();
        }

        default_root_folder()
    }
}

/// Creates the root folder and locates the database inside it
#[derive(Debug, Clone)]
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    pub fn root_folder(&self) -> &Path {
        &self.root_folder
    }

    pub fn ensure_directory_exists(&self) -> Result<()> {
        if !self.root_folder.exists() {
            std::fs::create_dir_all(&self.root_folder)?;
            info!("Created root folder: {}", self.root_folder.display());
        }
        Ok(())
    }

    /// `ORILL_DB_PATH` if set, else `<root>/orill.db`
    pub fn database_path(&self) -> PathBuf {
        match std::env::var(DB_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => self.root_folder.join(DATABASE_FILE),
        }
    }
}
