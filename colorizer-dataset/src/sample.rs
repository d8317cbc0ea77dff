//! Preprocessed sample types and preprocessing configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use colorizer_types::{ChromaPlanes, LightnessPlane};

/// Mode for resizing images during preprocessing.
///
/// Whichever mode is chosen must be applied consistently between
/// training and inference.
///
/// # Example
///
/// ```
/// use colorizer_dataset::ResizeMode;
///
/// let mode = ResizeMode::default();
/// assert!(matches!(mode, ResizeMode::Stretch));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ResizeMode {
    /// Stretch to target size (may distort aspect ratio).
    #[default]
    Stretch,

    /// Resize preserving aspect ratio, pad with black.
    Letterbox,

    /// Resize preserving aspect ratio, crop excess.
    CropCenter,
}

impl ResizeMode {
    /// Returns the mode name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Stretch => "stretch",
            Self::Letterbox => "letterbox",
            Self::CropCenter => "crop_center",
        }
    }
}

impl std::fmt::Display for ResizeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Configuration for image preprocessing.
///
/// # Example
///
/// ```
/// use colorizer_dataset::PreprocessConfig;
///
/// let config = PreprocessConfig::default();
/// assert_eq!(config.target_resolution, 128);
/// assert_eq!(config.extractor_resolution, 224);
/// assert!(config.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreprocessConfig {
    /// Square resolution training images are resized to.
    pub target_resolution: u32,

    /// Square input resolution of the frozen feature extractor.
    pub extractor_resolution: u32,

    /// Resize policy.
    pub resize_mode: ResizeMode,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            target_resolution: 128,
            extractor_resolution: 224,
            resize_mode: ResizeMode::Stretch,
        }
    }
}

impl PreprocessConfig {
    /// Creates a config with the given target resolution.
    #[must_use]
    pub const fn new(target_resolution: u32) -> Self {
        Self {
            target_resolution,
            extractor_resolution: 224,
            resize_mode: ResizeMode::Stretch,
        }
    }

    /// Sets the extractor input resolution.
    #[must_use]
    pub const fn with_extractor_resolution(mut self, resolution: u32) -> Self {
        self.extractor_resolution = resolution;
        self
    }

    /// Sets the resize mode.
    #[must_use]
    pub const fn with_resize_mode(mut self, mode: ResizeMode) -> Self {
        self.resize_mode = mode;
        self
    }

    /// Validates the configuration.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.target_resolution > 0 && self.extractor_resolution > 0
    }
}

/// A fully preprocessed training sample.
///
/// Holds the normalized network input (lightness), the training target
/// (chroma), and the extractor view: a 3-channel grayscale image in CHW
/// layout, resized to the extractor's input resolution and normalized
/// to `[-1, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorSample {
    /// Source file path.
    pub path: PathBuf,

    /// Normalized lightness plane (network input).
    pub lightness: LightnessPlane,

    /// Normalized chroma planes (training target).
    pub chroma: ChromaPlanes,

    /// Extractor input, CHW `[3, E, E]` in `[-1, 1]`.
    pub extractor_view: Vec<f32>,

    /// Extractor input resolution E.
    pub extractor_resolution: u32,
}

impl ColorSample {
    /// Validates the sample data.
    ///
    /// Returns `true` if all three buffers match their declared shapes
    /// and lightness/chroma share spatial dimensions.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let e = self.extractor_resolution as usize;
        self.lightness.is_valid()
            && self.chroma.is_valid()
            && self.chroma.matches(&self.lightness)
            && self.extractor_view.len() == 3 * e * e
    }
}

/// Preprocessed input for single-image inference.
///
/// Unlike [`ColorSample`], the lightness plane keeps the source image's
/// original resolution; the model pads to its stride multiple and crops
/// back internally.
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceInput {
    /// Source file path.
    pub path: PathBuf,

    /// Normalized lightness plane at the original resolution.
    pub lightness: LightnessPlane,

    /// Extractor input, CHW `[3, E, E]` in `[-1, 1]`.
    pub extractor_view: Vec<f32>,

    /// Extractor input resolution E.
    pub extractor_resolution: u32,
}
