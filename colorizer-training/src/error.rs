//! Error types for colorizer-training crate.

use thiserror::Error;

use colorizer_dataset::DatasetError;
use colorizer_models::ModelError;

/// Errors that can occur in colorizer-training operations.
#[derive(Debug, Error)]
pub enum TrainingError {
    /// Invalid training configuration.
    #[error("invalid training configuration: {0}")]
    InvalidConfig(String),

    /// No usable training samples.
    #[error("no usable samples: {0}")]
    EmptyDataset(String),

    /// Estimated memory use exceeds the configured budget.
    #[error("batch requires {required} bytes but budget is {budget} bytes")]
    ResourceExhausted {
        /// Estimated bytes required per batch.
        required: usize,
        /// Configured budget in bytes.
        budget: usize,
    },

    /// Tensor data conversion error.
    #[error("tensor data error: {0}")]
    TensorData(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(String),

    /// Dataset error.
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    /// Model error.
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl TrainingError {
    /// Creates an invalid config error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }

    /// Creates an empty dataset error.
    #[must_use]
    pub fn empty_dataset(reason: impl Into<String>) -> Self {
        Self::EmptyDataset(reason.into())
    }

    /// Creates a resource exhausted error.
    #[must_use]
    pub const fn resource_exhausted(required: usize, budget: usize) -> Self {
        Self::ResourceExhausted { required, budget }
    }

    /// Creates a tensor data error.
    #[must_use]
    pub fn tensor_data(reason: impl Into<String>) -> Self {
        Self::TensorData(reason.into())
    }
}

impl From<std::io::Error> for TrainingError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type for colorizer-training operations.
pub type Result<T> = std::result::Result<T, TrainingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_invalid_config() {
        let err = TrainingError::invalid_config("batch size must be > 0");
        assert!(err.to_string().contains("batch size"));
    }

    #[test]
    fn error_resource_exhausted() {
        let err = TrainingError::resource_exhausted(2048, 1024);
        assert!(err.to_string().contains("2048"));
        assert!(err.to_string().contains("1024"));
    }

    #[test]
    fn error_from_dataset_error() {
        let err: TrainingError = DatasetError::decode("a.png", "truncated").into();
        assert!(matches!(err, TrainingError::Dataset(_)));
        assert!(err.to_string().contains("a.png"));
    }

    #[test]
    fn error_from_model_error() {
        let err: TrainingError = ModelError::checkpoint_not_found("m.bin").into();
        assert!(matches!(err, TrainingError::Model(_)));
    }
}
