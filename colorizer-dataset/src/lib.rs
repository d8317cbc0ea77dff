//! Dataset lifecycle management for the colorizer pipeline.
//!
//! This crate turns a directory of ordinary image files into the
//! normalized training inputs the network consumes:
//!
//! # Indexing
//!
//! - [`DatasetIndex`] - deterministic listing of decodable image files
//! - [`DatasetManifest`] - JSON metadata describing a preprocessed set
//!
//! # Preprocessing
//!
//! - [`PreprocessConfig`] - target resolution, resize policy, extractor
//!   input size
//! - [`load_sample`] - decode + resize + Lab split + extractor view
//! - [`load_inference_input`] - same, keeping the original resolution
//!
//! # Splitting & Loading
//!
//! - [`SplitRatio`] / [`split_files`] - seeded train/val splits
//! - [`PrefetchLoader`] - bounded producer/consumer loader that overlaps
//!   disk I/O with training
//!
//! # Layer 0 Crate
//!
//! No tensor framework dependency. It can be used in:
//! - Training pipelines
//! - Data preprocessing scripts
//! - Dataset validation tools

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod error;
mod index;
mod loader;
mod manifest;
mod prefetch;
mod sample;
mod splits;

// Re-export index types
pub use index::DatasetIndex;

// Re-export manifest types
pub use manifest::DatasetManifest;

// Re-export sample types
pub use sample::{ColorSample, InferenceInput, PreprocessConfig, ResizeMode};

// Re-export loaders
pub use loader::{load_inference_input, load_sample};
pub use prefetch::PrefetchLoader;

// Re-export split utilities
pub use splits::{SplitRatio, split_files};

// Re-export error types
pub use error::{DatasetError, Result};

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{
        ColorSample, DatasetError, DatasetIndex, DatasetManifest, InferenceInput, PrefetchLoader,
        PreprocessConfig, ResizeMode, SplitRatio, load_inference_input, load_sample, split_files,
    };
}
