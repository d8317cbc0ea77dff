//! Image plane buffer types.

use serde::{Deserialize, Serialize};

/// A single-channel lightness plane in row-major H x W layout.
///
/// Values are network-normalized to `[-1, 1]`: `l = L* / 50 - 1` where
/// `L*` is the CIE Lab lightness in `[0, 100]`.
///
/// # Example
///
/// ```
/// use colorizer_types::LightnessPlane;
///
/// let plane = LightnessPlane::new(vec![0.0; 16], 4, 4);
/// assert!(plane.is_valid());
/// assert_eq!(plane.len(), 16);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightnessPlane {
    /// Normalized lightness values, row-major.
    pub data: Vec<f32>,

    /// Width in pixels.
    pub width: u32,

    /// Height in pixels.
    pub height: u32,
}

impl LightnessPlane {
    /// Creates a new lightness plane.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn new(data: Vec<f32>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
        }
    }

    /// Returns the number of pixels.
    #[must_use]
    pub const fn len(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Returns `true` if the plane has zero pixels.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Validates the plane data.
    ///
    /// Returns `true` if the buffer length matches the dimensions and
    /// every value lies in `[-1, 1]` (with a small tolerance for
    /// float rounding).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.data.len() == self.len() && self.data.iter().all(|v| (-1.001..=1.001).contains(v))
    }
}

/// Two-channel chroma planes in CHW layout: the a* plane followed by the
/// b* plane, each row-major H x W.
///
/// Values are network-normalized to `[-1, 1]`: `c = ab / 127`.
///
/// # Example
///
/// ```
/// use colorizer_types::ChromaPlanes;
///
/// let chroma = ChromaPlanes::new(vec![0.0; 32], 4, 4);
/// assert!(chroma.is_valid());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChromaPlanes {
    /// Normalized a*/b* values, CHW.
    pub data: Vec<f32>,

    /// Width in pixels.
    pub width: u32,

    /// Height in pixels.
    pub height: u32,
}

impl ChromaPlanes {
    /// Creates new chroma planes.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn new(data: Vec<f32>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
        }
    }

    /// Returns the number of pixels per plane.
    #[must_use]
    pub const fn plane_len(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Returns the a* plane.
    #[must_use]
    pub fn a_plane(&self) -> &[f32] {
        &self.data[..self.plane_len().min(self.data.len())]
    }

    /// Returns the b* plane.
    #[must_use]
    pub fn b_plane(&self) -> &[f32] {
        let n = self.plane_len();
        &self.data[n.min(self.data.len())..(2 * n).min(self.data.len())]
    }

    /// Validates the plane data.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.data.len() == 2 * self.plane_len()
            && self.data.iter().all(|v| (-1.001..=1.001).contains(v))
    }

    /// Returns `true` if the planes share spatial dimensions with the
    /// given lightness plane.
    #[must_use]
    pub const fn matches(&self, lightness: &LightnessPlane) -> bool {
        self.width == lightness.width && self.height == lightness.height
    }
}

/// An interleaved 8-bit RGB raster (HWC layout).
///
/// # Example
///
/// ```
/// use colorizer_types::Rgb8Image;
///
/// let image = Rgb8Image::new(vec![255; 48], 4, 4);
/// assert!(image.is_valid());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb8Image {
    /// Interleaved RGB bytes.
    pub data: Vec<u8>,

    /// Width in pixels.
    pub width: u32,

    /// Height in pixels.
    pub height: u32,
}

impl Rgb8Image {
    /// Creates a new RGB image.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
        }
    }

    /// Returns the number of pixels.
    #[must_use]
    pub const fn len(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Returns `true` if the image has zero pixels.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Validates the image data.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.data.len() == 3 * self.len()
    }

    /// Returns the RGB triple at `(x, y)`, or `None` if out of bounds.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = 3 * ((y as usize) * (self.width as usize) + (x as usize));
        Some([self.data[i], self.data[i + 1], self.data[i + 2]])
    }
}
