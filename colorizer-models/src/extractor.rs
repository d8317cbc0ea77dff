//! Frozen convolutional feature extractor.

use burn::module::Module;
use burn::nn;
use burn::nn::PaddingConfig2d;
use burn::nn::conv::{Conv2d, Conv2dConfig};
use burn::nn::pool::{AdaptiveAvgPool2d, AdaptiveAvgPool2dConfig};
use burn::prelude::Backend;
use burn::tensor::Tensor;
use burn::tensor::activation::relu;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Configuration for the feature extractor.
///
/// # Example
///
/// ```
/// use colorizer_models::ExtractorConfig;
///
/// let config = ExtractorConfig::default();
/// assert_eq!(config.embed_dim, 1000);
/// assert_eq!(config.input_resolution, 224);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Embedding dimension produced by the head.
    pub embed_dim: usize,

    /// Square input resolution the extractor expects.
    pub input_resolution: usize,

    /// Channels after the stem convolution.
    pub stem_channels: usize,

    /// Number of strided stages after the stem (channels double each
    /// stage).
    pub stages: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            embed_dim: 1000,
            input_resolution: 224,
            stem_channels: 32,
            stages: 4,
        }
    }
}

impl ExtractorConfig {
    /// Creates a configuration with the given embedding dimension.
    #[must_use]
    pub const fn new(embed_dim: usize) -> Self {
        Self {
            embed_dim,
            input_resolution: 224,
            stem_channels: 32,
            stages: 4,
        }
    }

    /// Sets the input resolution.
    #[must_use]
    pub const fn with_input_resolution(mut self, resolution: usize) -> Self {
        self.input_resolution = resolution;
        self
    }

    /// Sets the stem channel count.
    #[must_use]
    pub const fn with_stem_channels(mut self, channels: usize) -> Self {
        self.stem_channels = channels;
        self
    }

    /// Sets the number of strided stages.
    #[must_use]
    pub const fn with_stages(mut self, stages: usize) -> Self {
        self.stages = stages;
        self
    }

    /// Validates the configuration.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.embed_dim > 0
            && self.input_resolution > 0
            && self.stem_channels > 0
            && self.stages > 0
    }
}

/// A small convolutional classifier backbone used as a frozen
/// conditioning source.
///
/// Architecture: strided stem conv -> N strided conv stages (channels
/// doubling) -> global average pool -> linear head.
///
/// The forward pass detaches its output, so gradients never flow into
/// the extractor during training. Weights are loaded once from a
/// checkpoint and never updated.
///
/// # Type Parameters
///
/// - `B`: The Burn backend (e.g., `NdArray`, `Wgpu`)
#[derive(Debug, Module)]
pub struct FeatureExtractor<B: Backend> {
    stem: Conv2d<B>,
    stages: Vec<Conv2d<B>>,
    pool: AdaptiveAvgPool2d,
    head: nn::Linear<B>,
    /// Embedding dimension (stored separately for checkpoint
    /// compatibility).
    #[module(skip)]
    embed_dim: usize,
}

impl<B: Backend> FeatureExtractor<B> {
    /// Creates a new feature extractor with random weights.
    ///
    /// # Arguments
    ///
    /// - `config`: Extractor configuration
    /// - `device`: The device to create the model on
    #[must_use]
    pub fn new(config: ExtractorConfig, device: &B::Device) -> Self {
        let stem = Conv2dConfig::new([3, config.stem_channels], [3, 3])
            .with_stride([2, 2])
            .with_padding(PaddingConfig2d::Explicit(1, 1))
            .init(device);

        let mut stages = Vec::with_capacity(config.stages);
        let mut channels = config.stem_channels;
        for _ in 0..config.stages {
            let next = channels * 2;
            stages.push(
                Conv2dConfig::new([channels, next], [3, 3])
                    .with_stride([2, 2])
                    .with_padding(PaddingConfig2d::Explicit(1, 1))
                    .init(device),
            );
            channels = next;
        }

        let pool = AdaptiveAvgPool2dConfig::new([1, 1]).init();
        let head = nn::LinearConfig::new(channels, config.embed_dim).init(device);

        Self {
            stem,
            stages,
            pool,
            head,
            embed_dim: config.embed_dim,
        }
    }

    /// Returns the embedding dimension.
    #[must_use]
    pub const fn embed_dim(&self) -> usize {
        self.embed_dim
    }

    /// Computes the embedding for a batch of grayscale views.
    ///
    /// # Arguments
    ///
    /// - `input`: Tensor of shape `[batch, 3, E, E]` in `[-1, 1]`
    ///
    /// # Returns
    ///
    /// Detached embedding tensor of shape `[batch, embed_dim]`.
    pub fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 2> {
        let mut x = relu(self.stem.forward(input));
        for stage in &self.stages {
            x = relu(stage.forward(x));
        }
        let x = self.pool.forward(x);
        let [batch, channels, _, _] = x.dims();
        let x = x.reshape([batch, channels]);
        self.head.forward(x).detach()
    }
}

/// Validates an embedding buffer before it conditions the network.
///
/// # Errors
///
/// Returns `ModelError::ShapeMismatch` if the length is wrong, or
/// `ModelError::InvalidEmbedding` if any value is non-finite.
pub fn sanity_check_embedding(embedding: &[f32], expected_dim: usize) -> Result<()> {
    if embedding.len() != expected_dim {
        return Err(ModelError::shape_mismatch(
            format!("[{expected_dim}]"),
            format!("[{}]", embedding.len()),
        ));
    }
    if let Some(i) = embedding.iter().position(|v| !v.is_finite()) {
        return Err(ModelError::invalid_embedding(format!(
            "non-finite value at index {i}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn_ndarray::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn config_default() {
        let config = ExtractorConfig::default();
        assert_eq!(config.embed_dim, 1000);
        assert_eq!(config.input_resolution, 224);
        assert_eq!(config.stem_channels, 32);
        assert_eq!(config.stages, 4);
        assert!(config.is_valid());
    }

    #[test]
    fn config_builder() {
        let config = ExtractorConfig::new(64)
            .with_input_resolution(32)
            .with_stem_channels(8)
            .with_stages(2);

        assert_eq!(config.embed_dim, 64);
        assert_eq!(config.input_resolution, 32);
        assert_eq!(config.stem_channels, 8);
        assert_eq!(config.stages, 2);
    }

    #[test]
    fn config_invalid() {
        let config = ExtractorConfig::new(0);
        assert!(!config.is_valid());
    }

    #[test]
    fn config_serialization() {
        let config = ExtractorConfig::default();
        let json = serde_json::to_string(&config);
        assert!(json.is_ok());

        let parsed: std::result::Result<ExtractorConfig, _> =
            serde_json::from_str(&json.unwrap_or_default());
        assert!(parsed.is_ok());
        assert_eq!(parsed.unwrap_or_default(), config);
    }

    #[test]
    fn extractor_forward_shape() {
        let config = ExtractorConfig::new(16)
            .with_input_resolution(32)
            .with_stem_channels(4)
            .with_stages(2);
        let device = <TestBackend as Backend>::Device::default();
        let extractor = FeatureExtractor::<TestBackend>::new(config, &device);

        let input = Tensor::<TestBackend, 4>::zeros([2, 3, 32, 32], &device);
        let embedding = extractor.forward(input);

        assert_eq!(embedding.dims(), [2, 16]);
        assert_eq!(extractor.embed_dim(), 16);
    }

    #[test]
    fn extractor_output_is_finite() {
        let config = ExtractorConfig::new(8)
            .with_input_resolution(16)
            .with_stem_channels(4)
            .with_stages(1);
        let device = <TestBackend as Backend>::Device::default();
        let extractor = FeatureExtractor::<TestBackend>::new(config, &device);

        let input = Tensor::<TestBackend, 4>::ones([1, 3, 16, 16], &device);
        let embedding = extractor.forward(input);
        let values: Vec<f32> = embedding.into_data().to_vec().unwrap();

        assert!(sanity_check_embedding(&values, 8).is_ok());
    }

    #[test]
    fn sanity_check_rejects_wrong_length() {
        let embedding = vec![0.0; 10];
        let result = sanity_check_embedding(&embedding, 20);
        assert!(matches!(result, Err(ModelError::ShapeMismatch { .. })));
    }

    #[test]
    fn sanity_check_rejects_nan() {
        let mut embedding = vec![0.0; 10];
        embedding[3] = f32::NAN;
        let result = sanity_check_embedding(&embedding, 10);
        assert!(matches!(result, Err(ModelError::InvalidEmbedding(_))));
    }

    #[test]
    fn sanity_check_rejects_infinity() {
        let mut embedding = vec![0.0; 4];
        embedding[0] = f32::INFINITY;
        assert!(sanity_check_embedding(&embedding, 4).is_err());
    }
}
