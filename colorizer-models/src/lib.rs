//! Neural network models for the colorizer pipeline.
//!
//! This crate provides the two networks of the pipeline and their
//! persistence:
//!
//! # Models
//!
//! - [`FeatureExtractor`] - frozen classifier backbone producing the
//!   conditioning embedding
//! - [`ColorizerModel`] - encoder-decoder network predicting chroma
//!   from lightness
//!
//! # Inference
//!
//! - [`Colorizer`] - pads, runs, crops, and composes a full RGB image
//! - [`sanity_check_embedding`] - validates embeddings before use
//!
//! # Persistence
//!
//! - [`save_checkpoint`] / [`load_checkpoint`] - weight serialization
//!   via Burn recorders
//!
//! # Backend Agnostic
//!
//! All models are generic over the Burn backend, so the same code runs
//! on `NdArray` (CPU) and GPU backends, and trains under
//! `Autodiff<_>`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod checkpoint;
mod colorizer;
mod error;
mod extractor;
mod inference;

// Re-export models
pub use colorizer::{ColorizerModel, ColorizerModelConfig};
pub use extractor::{ExtractorConfig, FeatureExtractor, sanity_check_embedding};

// Re-export inference
pub use inference::Colorizer;

// Re-export checkpoint utilities
pub use checkpoint::{CheckpointFormat, checkpoint_path, load_checkpoint, save_checkpoint};

// Re-export error types
pub use error::{ModelError, Result};

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{
        CheckpointFormat, Colorizer, ColorizerModel, ColorizerModelConfig, ExtractorConfig,
        FeatureExtractor, ModelError, load_checkpoint, save_checkpoint,
    };
}
