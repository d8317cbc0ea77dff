//! Training pipeline for the colorizer network.
//!
//! This crate drives optimization of a [`colorizer_models::ColorizerModel`]
//! against a frozen feature extractor:
//!
//! # Configuration
//!
//! - [`TrainingConfig`] - epochs, batching, checkpointing, budgets
//! - [`OptimizerConfig`] - Adam hyperparameters
//! - [`LearningRateSchedule`] - constant, step, or cosine decay
//!
//! # Training
//!
//! - [`Trainer`] - streaming epoch loop with prefetched samples,
//!   skip-and-log decode failure handling, and periodic checkpoints
//! - [`reconstruction_loss`] / [`LossKind`] - chroma reconstruction
//!   objectives
//!
//! # Metrics
//!
//! - [`EpochMetrics`] / [`TrainingMetrics`] - per-epoch and aggregate
//!   loss tracking

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod config;
mod error;
mod loss;
mod metrics;
mod trainer;

// Re-export configuration
pub use config::{LearningRateSchedule, OptimizerConfig, TrainingConfig};

// Re-export training
pub use loss::{LossKind, reconstruction_loss};
pub use trainer::Trainer;

// Re-export metrics
pub use metrics::{EpochMetrics, TrainingMetrics};

// Re-export error types
pub use error::{Result, TrainingError};

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{
        EpochMetrics, LearningRateSchedule, LossKind, OptimizerConfig, Trainer, TrainingConfig,
        TrainingError, TrainingMetrics,
    };
}
