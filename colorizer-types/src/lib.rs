//! Colorspace math and image plane types for the colorizer pipeline.
//!
//! This crate provides the data model shared by the dataset, model, and
//! training crates:
//!
//! # Colorspace Conversions
//!
//! - [`srgb_to_lab`] / [`lab_to_srgb`] - sRGB <-> CIE Lab (D65)
//! - [`srgb_to_linear`] / [`linear_to_srgb`] - sRGB transfer function
//!
//! # Plane Types
//!
//! - [`LightnessPlane`] - single-channel L* plane, network-normalized
//! - [`ChromaPlanes`] - two-channel a*/b* planes, network-normalized
//! - [`Rgb8Image`] - interleaved 8-bit RGB raster
//!
//! # Composition
//!
//! - [`split_planes`] - RGB image -> (lightness, chroma)
//! - [`compose_planes`] - (lightness, chroma) -> RGB image, clipped to the
//!   display range
//!
//! # Layer 0 Crate
//!
//! No I/O, no tensor framework. It can be used in:
//! - Preprocessing pipelines
//! - Inference servers
//! - CLI tools

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod color;
mod compose;
mod error;
mod planes;

// Re-export colorspace utilities
pub use color::{Lab, lab_to_srgb, linear_to_srgb, luma, srgb_to_lab, srgb_to_linear};

// Re-export plane types
pub use planes::{ChromaPlanes, LightnessPlane, Rgb8Image};

// Re-export composition
pub use compose::{CHROMA_SCALE, LIGHTNESS_MIDPOINT, compose_planes, split_planes};

// Re-export error types
pub use error::{ColorError, Result};

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{
        ChromaPlanes, ColorError, Lab, LightnessPlane, Rgb8Image, compose_planes, lab_to_srgb,
        split_planes, srgb_to_lab,
    };
}
