//! Error types for configuration operations.

use slicer_engine::EngineError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, saving or checking configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Preset not found
    #[error("preset not found: {0}")]
    PresetNotFound(String),

    /// Preset values outside their ranges
    #[error("validation failed: {0}")]
    Validation(#[from] crate::validation::ValidationError),

    /// Engine settings the engine refuses to build with
    #[error("invalid engine config: {0}")]
    Engine(#[from] EngineError),

    /// Failed to create directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a create directory error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::CreateDir {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn mock_io_err() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::NotFound, "mock")
    }

    #[test]
    fn io_helpers_keep_path_and_source() {
        let err = ConfigError::read_file("/a/b.toml", mock_io_err());
        assert!(
            matches!(err, ConfigError::ReadFile { ref path, .. } if path == std::path::Path::new("/a/b.toml"))
        );
        assert!(err.to_string().contains("failed to read file"));
        assert!(err.source().is_some());

        let err = ConfigError::write_file("/out.toml", mock_io_err());
        assert!(err.to_string().contains("/out.toml"));
        assert!(err.source().is_some());

        let err = ConfigError::create_dir("/dir", mock_io_err());
        assert!(err.to_string().contains("failed to create directory"));
        assert!(err.source().is_some());
    }

    #[test]
    fn preset_not_found_display() {
        let err = ConfigError::PresetNotFound("drift".to_string());
        assert_eq!(err.to_string(), "preset not found: drift");
        assert!(err.source().is_none());
    }

    #[test]
    fn engine_error_converts() {
        let err: ConfigError = slicer_engine::EngineError::DelayCapacity(0).into();
        assert!(err.to_string().starts_with("invalid engine config"), "{err}");
    }
}
