//! Image decoding and preprocessing.

use image::imageops::FilterType;
use image::{DynamicImage, RgbImage, imageops};
use std::path::Path;

use colorizer_types::{Rgb8Image, luma, split_planes};

use crate::error::{DatasetError, Result};
use crate::sample::{ColorSample, InferenceInput, PreprocessConfig, ResizeMode};

/// Loads and preprocesses a training sample.
///
/// Decodes the file, resizes it to `config.target_resolution` square
/// using `config.resize_mode`, splits it into normalized lightness and
/// chroma planes, and builds the extractor view.
///
/// # Errors
///
/// Returns `DatasetError::InvalidConfig` if the config is invalid, or
/// `DatasetError::Decode` if the file cannot be decoded or converted.
pub fn load_sample(path: impl AsRef<Path>, config: &PreprocessConfig) -> Result<ColorSample> {
    let path = path.as_ref();
    if !config.is_valid() {
        return Err(DatasetError::invalid_config(
            "resolutions must be non-zero",
        ));
    }

    let decoded = decode(path)?;
    let rgb = resize_square(&decoded, config.target_resolution, config.resize_mode);
    let extractor_view = extractor_view(&decoded, config.extractor_resolution);

    let image = to_rgb8_image(rgb);
    let (lightness, chroma) =
        split_planes(&image).map_err(|e| DatasetError::decode(path.display().to_string(), e.to_string()))?;

    Ok(ColorSample {
        path: path.to_path_buf(),
        lightness,
        chroma,
        extractor_view,
        extractor_resolution: config.extractor_resolution,
    })
}

/// Loads and preprocesses an image for inference.
///
/// The lightness plane keeps the source resolution; only the extractor
/// view is resized.
///
/// # Errors
///
/// Returns `DatasetError::InvalidConfig` if the config is invalid, or
/// `DatasetError::Decode` if the file cannot be decoded or converted.
pub fn load_inference_input(
    path: impl AsRef<Path>,
    config: &PreprocessConfig,
) -> Result<InferenceInput> {
    let path = path.as_ref();
    if !config.is_valid() {
        return Err(DatasetError::invalid_config(
            "resolutions must be non-zero",
        ));
    }

    let decoded = decode(path)?;
    let extractor_view = extractor_view(&decoded, config.extractor_resolution);

    let image = to_rgb8_image(decoded.to_rgb8());
    let (lightness, _) =
        split_planes(&image).map_err(|e| DatasetError::decode(path.display().to_string(), e.to_string()))?;

    Ok(InferenceInput {
        path: path.to_path_buf(),
        lightness,
        extractor_view,
        extractor_resolution: config.extractor_resolution,
    })
}

fn decode(path: &Path) -> Result<DynamicImage> {
    let image = image::open(path)
        .map_err(|e| DatasetError::decode(path.display().to_string(), e.to_string()))?;
    if image.width() == 0 || image.height() == 0 {
        return Err(DatasetError::decode(
            path.display().to_string(),
            "image has zero pixels",
        ));
    }
    Ok(image)
}

/// Resizes to a `size` x `size` RGB raster according to the mode.
fn resize_square(image: &DynamicImage, size: u32, mode: ResizeMode) -> RgbImage {
    match mode {
        ResizeMode::Stretch => image
            .resize_exact(size, size, FilterType::Triangle)
            .to_rgb8(),
        ResizeMode::CropCenter => image
            .resize_to_fill(size, size, FilterType::Triangle)
            .to_rgb8(),
        ResizeMode::Letterbox => {
            let fitted = image.resize(size, size, FilterType::Triangle).to_rgb8();
            let mut canvas = RgbImage::new(size, size);
            let x = i64::from((size - fitted.width()) / 2);
            let y = i64::from((size - fitted.height()) / 2);
            imageops::replace(&mut canvas, &fitted, x, y);
            canvas
        }
    }
}

/// Builds the extractor view: a 3-channel grayscale raster in CHW
/// layout, resized to `resolution` square and normalized to `[-1, 1]`.
fn extractor_view(image: &DynamicImage, resolution: u32) -> Vec<f32> {
    let rgb = image
        .resize_exact(resolution, resolution, FilterType::Triangle)
        .to_rgb8();

    let n = (resolution as usize) * (resolution as usize);
    let mut gray = Vec::with_capacity(n);
    for pixel in rgb.pixels() {
        let g = luma(
            f32::from(pixel.0[0]) / 255.0,
            f32::from(pixel.0[1]) / 255.0,
            f32::from(pixel.0[2]) / 255.0,
        );
        gray.push((2.0 * g - 1.0).clamp(-1.0, 1.0));
    }

    // Replicate across the three input channels
    let mut view = Vec::with_capacity(3 * n);
    for _ in 0..3 {
        view.extend_from_slice(&gray);
    }
    view
}

fn to_rgb8_image(rgb: RgbImage) -> Rgb8Image {
    let (width, height) = rgb.dimensions();
    Rgb8Image::new(rgb.into_raw(), width, height)
}
