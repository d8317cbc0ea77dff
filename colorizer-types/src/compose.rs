//! Lightness/chroma split and recombination.
//!
//! The network operates on normalized Lab planes. The split direction
//! feeds training; the compose direction turns predicted chroma back
//! into a displayable RGB image.

use crate::color::{lab_to_srgb, srgb_to_lab, Lab};
use crate::error::{ColorError, Result};
use crate::planes::{ChromaPlanes, LightnessPlane, Rgb8Image};

/// Midpoint of the L* range used for normalization: `L* = 50 * (l + 1)`.
pub const LIGHTNESS_MIDPOINT: f32 = 50.0;

/// Chroma normalization divisor: `ab = 127 * c`.
pub const CHROMA_SCALE: f32 = 127.0;

/// Splits an RGB image into normalized lightness and chroma planes.
///
/// # Errors
///
/// Returns `ColorError::InvalidLength` if the image buffer does not
/// match its declared dimensions, or `ColorError::InvalidDimensions`
/// if the image is empty.
pub fn split_planes(image: &Rgb8Image) -> Result<(LightnessPlane, ChromaPlanes)> {
    if image.is_empty() {
        return Err(ColorError::invalid_dimensions(image.width, image.height));
    }
    if !image.is_valid() {
        return Err(ColorError::invalid_length(3 * image.len(), image.data.len()));
    }

    let n = image.len();
    let mut lightness = Vec::with_capacity(n);
    let mut a_plane = Vec::with_capacity(n);
    let mut b_plane = Vec::with_capacity(n);

    for rgb in image.data.chunks_exact(3) {
        let lab = srgb_to_lab(
            f32::from(rgb[0]) / 255.0,
            f32::from(rgb[1]) / 255.0,
            f32::from(rgb[2]) / 255.0,
        );
        lightness.push((lab.l / LIGHTNESS_MIDPOINT - 1.0).clamp(-1.0, 1.0));
        a_plane.push((lab.a / CHROMA_SCALE).clamp(-1.0, 1.0));
        b_plane.push((lab.b / CHROMA_SCALE).clamp(-1.0, 1.0));
    }

    let mut chroma = a_plane;
    chroma.extend(b_plane);

    Ok((
        LightnessPlane::new(lightness, image.width, image.height),
        ChromaPlanes::new(chroma, image.width, image.height),
    ))
}

/// Recombines a lightness plane with (predicted) chroma planes into an
/// RGB image, clipping every channel to the display range.
///
/// # Errors
///
/// Returns `ColorError::ShapeMismatch` if the planes disagree on
/// spatial dimensions, or `ColorError::InvalidLength` if either buffer
/// does not match its declared dimensions.
pub fn compose_planes(lightness: &LightnessPlane, chroma: &ChromaPlanes) -> Result<Rgb8Image> {
    if !chroma.matches(lightness) {
        return Err(ColorError::shape_mismatch(
            format!("{}x{}", lightness.width, lightness.height),
            format!("{}x{}", chroma.width, chroma.height),
        ));
    }
    if lightness.data.len() != lightness.len() {
        return Err(ColorError::invalid_length(
            lightness.len(),
            lightness.data.len(),
        ));
    }
    if chroma.data.len() != 2 * chroma.plane_len() {
        return Err(ColorError::invalid_length(
            2 * chroma.plane_len(),
            chroma.data.len(),
        ));
    }

    let n = lightness.len();
    let a_plane = chroma.a_plane();
    let b_plane = chroma.b_plane();
    let mut data = Vec::with_capacity(3 * n);

    for i in 0..n {
        let lab = Lab {
            l: (lightness.data[i] + 1.0) * LIGHTNESS_MIDPOINT,
            a: a_plane[i] * CHROMA_SCALE,
            b: b_plane[i] * CHROMA_SCALE,
        };
        let (r, g, b) = lab_to_srgb(lab);
        data.push(to_u8(r));
        data.push(to_u8(g));
        data.push(to_u8(b));
    }

    Ok(Rgb8Image::new(data, lightness.width, lightness.height))
}

#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_u8(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_image(width: u32, height: u32) -> Rgb8Image {
        let mut data = Vec::with_capacity((3 * width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                #[allow(clippy::cast_possible_truncation)]
                {
                    data.push((x * 255 / width.max(1)) as u8);
                    data.push((y * 255 / height.max(1)) as u8);
                    data.push(((x + y) * 255 / (width + height).max(1)) as u8);
                }
            }
        }
        Rgb8Image::new(data, width, height)
    }

    #[test]
    fn split_produces_matching_planes() {
        let image = gradient_image(8, 6);
        let (lightness, chroma) = split_planes(&image).unwrap();

        assert!(lightness.is_valid());
        assert!(chroma.is_valid());
        assert!(chroma.matches(&lightness));
        assert_eq!(lightness.len(), 48);
    }

    #[test]
    fn split_rejects_empty_image() {
        let image = Rgb8Image::new(Vec::new(), 0, 0);
        assert!(split_planes(&image).is_err());
    }

    #[test]
    fn split_rejects_truncated_buffer() {
        let image = Rgb8Image::new(vec![0; 10], 4, 4);
        assert!(matches!(
            split_planes(&image),
            Err(ColorError::InvalidLength { .. })
        ));
    }

    #[test]
    fn compose_rejects_dimension_mismatch() {
        let lightness = LightnessPlane::new(vec![0.0; 16], 4, 4);
        let chroma = ChromaPlanes::new(vec![0.0; 24], 4, 3);

        assert!(matches!(
            compose_planes(&lightness, &chroma),
            Err(ColorError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn split_compose_roundtrip() {
        let image = gradient_image(16, 16);
        let (lightness, chroma) = split_planes(&image).unwrap();
        let restored = compose_planes(&lightness, &chroma).unwrap();

        assert_eq!(restored.width, image.width);
        assert_eq!(restored.height, image.height);

        // Quantization plus two colorspace conversions; stays within a
        // few 8-bit steps per channel.
        let max_diff = image
            .data
            .iter()
            .zip(restored.data.iter())
            .map(|(&a, &b)| (i16::from(a) - i16::from(b)).unsigned_abs())
            .max()
            .unwrap_or(0);
        assert!(max_diff <= 3, "max channel diff {max_diff}");
    }

    #[test]
    fn compose_with_zero_chroma_is_grayscale() {
        let image = gradient_image(8, 8);
        let (lightness, _) = split_planes(&image).unwrap();
        let chroma = ChromaPlanes::new(vec![0.0; 2 * 64], 8, 8);

        let gray = compose_planes(&lightness, &chroma).unwrap();
        for pixel in gray.data.chunks_exact(3) {
            let spread = pixel
                .iter()
                .map(|&c| i16::from(c))
                .fold((i16::MAX, i16::MIN), |(lo, hi), c| (lo.min(c), hi.max(c)));
            assert!(spread.1 - spread.0 <= 2, "pixel {pixel:?} is not neutral");
        }
    }

    #[test]
    fn compose_output_is_full_range_safe() {
        // Saturated chroma must still clip into the display range
        let lightness = LightnessPlane::new(vec![0.9; 4], 2, 2);
        let chroma = ChromaPlanes::new(vec![1.0; 8], 2, 2);

        let image = compose_planes(&lightness, &chroma).unwrap();
        assert!(image.is_valid());
    }
}
