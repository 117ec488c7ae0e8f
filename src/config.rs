//! Sort configuration.
//!
//! Settings may come from a TOML file and are overridden by command-line
//! flags. The sort type stays a plain string here; it is only turned into a
//! [`SortMode`](crate::classifier::SortMode) when a run starts, so an invalid
//! value produces a warning instead of a configuration error.
//!
//! # Configuration File Format
//!
//! ```toml
//! [sort]
//! folder = "/home/user/Downloads"
//! output = "build/files"
//! sort_type = "extension"
//! ```

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the current directory.
pub const LOCAL_CONFIG_FILE: &str = ".filesortrc.toml";

/// Output root used when none is configured.
pub const DEFAULT_OUTPUT_ROOT: &str = "build/files";

/// Errors that can occur while loading configuration.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// IO error while reading configuration.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// On-disk layout of a configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub sort: SortSection,
}

/// The `[sort]` table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SortSection {
    /// Folder whose files are sorted.
    #[serde(default)]
    pub folder: Option<PathBuf>,
    /// Root directory receiving the classified subdirectories.
    #[serde(default)]
    pub output: Option<PathBuf>,
    /// `"date"` or `"extension"`; anything else falls back to date.
    #[serde(default)]
    pub sort_type: Option<String>,
}

/// Everything a [`Sorter`](crate::sorter::Sorter) needs for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortConfig {
    /// Folder whose files are sorted. `None` means there is nothing to sort.
    pub source: Option<PathBuf>,
    /// Root directory receiving the classified subdirectories.
    pub output_root: PathBuf,
    /// Raw sort type value, resolved at the start of each run.
    pub sort_type: Option<String>,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            source: None,
            output_root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
            sort_type: None,
        }
    }
}

impl SortConfig {
    /// Creates a configuration from explicit values.
    pub fn new(
        source: impl Into<PathBuf>,
        output_root: impl Into<PathBuf>,
        sort_type: Option<&str>,
    ) -> Self {
        Self {
            source: Some(source.into()),
            output_root: output_root.into(),
            sort_type: sort_type.map(str::to_string),
        }
    }

    /// Load configuration from a file, with fallback to defaults.
    ///
    /// Attempts to load configuration in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.filesortrc.toml` in the current directory
    /// 3. Look for `~/.config/filesort/config.toml` in home directory
    /// 4. Fall back to default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is explicitly provided but
    /// cannot be read, or if any file found is not valid TOML.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("filesort")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigNotFound` if file does not exist.
    /// Returns `ConfigError::ConfigInvalid` if TOML parsing fails.
    /// Returns `ConfigError::IoError` if file cannot be read.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))?;
        Ok(file.into())
    }

    /// Replaces values with those given explicitly, e.g. on the command line.
    pub fn with_overrides(
        mut self,
        source: Option<PathBuf>,
        output_root: Option<PathBuf>,
        sort_type: Option<String>,
    ) -> Self {
        if source.is_some() {
            self.source = source;
        }
        if let Some(output_root) = output_root {
            self.output_root = output_root;
        }
        if sort_type.is_some() {
            self.sort_type = sort_type;
        }
        self
    }
}

impl From<ConfigFile> for SortConfig {
    fn from(file: ConfigFile) -> Self {
        Self {
            source: file.sort.folder,
            output_root: file
                .sort
                .output
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_ROOT)),
            sort_type: file.sort.sort_type,
        }
    }
}
