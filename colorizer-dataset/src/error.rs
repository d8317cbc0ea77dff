//! Error types for colorizer-dataset crate.

use thiserror::Error;

/// Errors that can occur in colorizer-dataset operations.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Failed to decode an image file.
    ///
    /// Recoverable during training (skip and continue); fatal for
    /// single-image inference.
    #[error("failed to decode {path}: {reason}")]
    Decode {
        /// Path to the offending file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// No decodable image files found.
    #[error("no image files found in {0}")]
    EmptyDataset(String),

    /// Invalid preprocessing configuration.
    #[error("invalid preprocess configuration: {0}")]
    InvalidConfig(String),

    /// Invalid manifest.
    #[error("invalid manifest: {0}")]
    InvalidManifest(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl DatasetError {
    /// Creates a decode error.
    #[must_use]
    pub fn decode(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Decode {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates an empty dataset error.
    #[must_use]
    pub fn empty_dataset(dir: impl Into<String>) -> Self {
        Self::EmptyDataset(dir.into())
    }

    /// Creates an invalid config error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }

    /// Creates an invalid manifest error.
    #[must_use]
    pub fn invalid_manifest(reason: impl Into<String>) -> Self {
        Self::InvalidManifest(reason.into())
    }

    /// Creates an IO error.
    #[must_use]
    pub fn io(reason: impl Into<String>) -> Self {
        Self::Io(reason.into())
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(reason: impl Into<String>) -> Self {
        Self::Serialization(reason.into())
    }

    /// Returns `true` if this error is recoverable during training by
    /// skipping the offending sample.
    #[must_use]
    pub const fn is_skippable(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}

impl From<std::io::Error> for DatasetError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for DatasetError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type for colorizer-dataset operations.
pub type Result<T> = std::result::Result<T, DatasetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_decode() {
        let err = DatasetError::decode("bad.jpg", "truncated file");
        assert!(err.to_string().contains("bad.jpg"));
        assert!(err.to_string().contains("truncated file"));
        assert!(err.is_skippable());
    }

    #[test]
    fn error_empty_dataset() {
        let err = DatasetError::empty_dataset("/data/images");
        assert!(err.to_string().contains("/data/images"));
        assert!(!err.is_skippable());
    }

    #[test]
    fn error_invalid_config() {
        let err = DatasetError::invalid_config("target resolution must be > 0");
        assert!(err.to_string().contains("target resolution"));
    }

    #[test]
    fn error_invalid_manifest() {
        let err = DatasetError::invalid_manifest("missing name");
        assert!(err.to_string().contains("missing name"));
    }

    #[test]
    fn error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "not found");
        let err: DatasetError = io_err.into();
        assert!(matches!(err, DatasetError::Io(_)));
    }

    #[test]
    fn error_from_serde_error() {
        let json_err = serde_json::from_str::<i32>("invalid").unwrap_err();
        let err: DatasetError = json_err.into();
        assert!(matches!(err, DatasetError::Serialization(_)));
    }
}
