//! Error types for fieldkit settings

use std::path::PathBuf;
use thiserror::Error;

/// Settings-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An explicitly requested settings file does not exist
    #[error("Settings file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Settings file has an extension we cannot parse
    #[error("Unsupported settings file format: {path}")]
    UnsupportedFormat { path: PathBuf },

    /// Figment failed to merge or extract the settings
    #[error("Failed to parse settings: {source}")]
    ParseError { source: figment::Error },

    /// A value parsed but is out of its allowed range
    #[error("Invalid settings value for key '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

impl From<figment::Error> for ConfigError {
    fn from(error: figment::Error) -> Self {
        ConfigError::ParseError { source: error }
    }
}
