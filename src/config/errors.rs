use std::path::PathBuf;

use thiserror::Error;

/// Errors that may occur while loading the settings file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The application directory could not be created.
    #[error("Unable to create config directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The config file exists but could not be read, or an explicit path is missing.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The config file is not valid TOML for the settings schema.
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// No base directory is available for the config file.
    #[error("No suitable config directory found")]
    NoConfigDir,
}
