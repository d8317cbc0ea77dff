//! Single-image colorization.

use burn::prelude::Backend;
use burn::tensor::{Tensor, TensorData};

use colorizer_types::{ChromaPlanes, LightnessPlane, Rgb8Image, compose_planes};

use crate::colorizer::ColorizerModel;
use crate::error::{ModelError, Result};
use crate::extractor::{FeatureExtractor, sanity_check_embedding};

/// Ties a frozen extractor and a trained network together for
/// inference at arbitrary resolutions.
///
/// The input lightness plane is padded to the model's stride multiple,
/// run through the network, and the predicted chroma is cropped back
/// before composition.
///
/// # Example
///
/// ```ignore
/// use colorizer_models::Colorizer;
///
/// let session = Colorizer::new(&extractor, &model, &device)?;
/// let image = session.colorize(&input.lightness, &input.extractor_view, 224)?;
/// ```
#[derive(Debug)]
pub struct Colorizer<'a, B: Backend> {
    extractor: &'a FeatureExtractor<B>,
    model: &'a ColorizerModel<B>,
    device: &'a B::Device,
}

impl<'a, B: Backend> Colorizer<'a, B> {
    /// Creates a new inference session.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::InvalidConfig` if the extractor's embedding
    /// dimension does not match what the network was built for.
    pub fn new(
        extractor: &'a FeatureExtractor<B>,
        model: &'a ColorizerModel<B>,
        device: &'a B::Device,
    ) -> Result<Self> {
        if extractor.embed_dim() != model.embed_dim() {
            return Err(ModelError::invalid_config(format!(
                "extractor embedding dim {} does not match model embedding dim {}",
                extractor.embed_dim(),
                model.embed_dim()
            )));
        }
        Ok(Self {
            extractor,
            model,
            device,
        })
    }

    /// Predicts normalized chroma planes for a lightness plane.
    ///
    /// # Arguments
    ///
    /// - `lightness`: Input plane at any resolution
    /// - `extractor_view`: CHW `[3, E, E]` grayscale view in `[-1, 1]`
    /// - `extractor_resolution`: The view's spatial resolution E
    ///
    /// # Errors
    ///
    /// Returns `ModelError::ShapeMismatch` if a buffer does not match
    /// its declared shape, or `ModelError::InvalidEmbedding` if the
    /// extractor produces non-finite values.
    pub fn predict_chroma(
        &self,
        lightness: &LightnessPlane,
        extractor_view: &[f32],
        extractor_resolution: usize,
    ) -> Result<ChromaPlanes> {
        let e = extractor_resolution;
        if extractor_view.len() != 3 * e * e {
            return Err(ModelError::shape_mismatch(
                format!("[3, {e}, {e}]"),
                format!("[{}]", extractor_view.len()),
            ));
        }
        if lightness.data.len() != lightness.len() || lightness.is_empty() {
            return Err(ModelError::shape_mismatch(
                format!("[{}, {}]", lightness.height, lightness.width),
                format!("[{}]", lightness.data.len()),
            ));
        }

        let embedding = self.embed(extractor_view, e)?;

        let height = lightness.height as usize;
        let width = lightness.width as usize;
        let input = Tensor::<B, 4>::from_data(
            TensorData::new(lightness.data.clone(), [1, 1, height, width]),
            self.device,
        );

        // Pad right/bottom to the stride multiple, crop after
        let stride = self.model.total_stride();
        let pad_h = height.next_multiple_of(stride) - height;
        let pad_w = width.next_multiple_of(stride) - width;
        let input = if pad_h > 0 || pad_w > 0 {
            input.pad((0, pad_w, 0, pad_h), 0.0)
        } else {
            input
        };

        let chroma = self.model.forward(input, embedding);
        let chroma = chroma.slice([0..1, 0..2, 0..height, 0..width]);

        let mut values: Vec<f32> = chroma
            .into_data()
            .to_vec()
            .map_err(|e| ModelError::tensor_data(format!("{e:?}")))?;
        for v in &mut values {
            *v = v.clamp(-1.0, 1.0);
        }

        Ok(ChromaPlanes::new(values, lightness.width, lightness.height))
    }

    /// Colorizes a lightness plane into an RGB image.
    ///
    /// # Errors
    ///
    /// Same as [`predict_chroma`](Self::predict_chroma), plus
    /// `ModelError::Color` if composition fails.
    pub fn colorize(
        &self,
        lightness: &LightnessPlane,
        extractor_view: &[f32],
        extractor_resolution: usize,
    ) -> Result<Rgb8Image> {
        let chroma = self.predict_chroma(lightness, extractor_view, extractor_resolution)?;
        Ok(compose_planes(lightness, &chroma)?)
    }

    fn embed(&self, extractor_view: &[f32], resolution: usize) -> Result<Tensor<B, 2>> {
        let view = Tensor::<B, 4>::from_data(
            TensorData::new(extractor_view.to_vec(), [1, 3, resolution, resolution]),
            self.device,
        );
        let embedding = self.extractor.forward(view);

        let values: Vec<f32> = embedding
            .clone()
            .into_data()
            .to_vec()
            .map_err(|e| ModelError::tensor_data(format!("{e:?}")))?;
        sanity_check_embedding(&values, self.model.embed_dim())?;

        Ok(embedding)
    }
}
