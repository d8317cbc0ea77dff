//! Encoder-decoder colorization network.

use burn::module::Module;
use burn::nn::PaddingConfig2d;
use burn::nn::conv::{Conv2d, Conv2dConfig, ConvTranspose2d, ConvTranspose2dConfig};
use burn::prelude::Backend;
use burn::tensor::Tensor;
use burn::tensor::activation::{relu, tanh};
use serde::{Deserialize, Serialize};

/// Configuration for the colorization network.
///
/// The decoder must have as many stages as the encoder so the output
/// returns to the input resolution.
///
/// # Example
///
/// ```
/// use colorizer_models::ColorizerModelConfig;
///
/// let config = ColorizerModelConfig::default();
/// assert_eq!(config.embed_dim, 1000);
/// assert!(config.is_valid());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorizerModelConfig {
    /// Output channels of each strided encoder stage.
    pub encoder_channels: Vec<usize>,

    /// Output channels of each decoder upsampling stage.
    pub decoder_channels: Vec<usize>,

    /// Dimension of the conditioning embedding.
    pub embed_dim: usize,
}

impl Default for ColorizerModelConfig {
    fn default() -> Self {
        Self {
            encoder_channels: vec![64, 128, 256],
            decoder_channels: vec![128, 64, 32],
            embed_dim: 1000,
        }
    }
}

impl ColorizerModelConfig {
    /// Creates a configuration with the given embedding dimension.
    #[must_use]
    pub fn new(embed_dim: usize) -> Self {
        Self {
            embed_dim,
            ..Self::default()
        }
    }

    /// Sets the encoder channel progression.
    #[must_use]
    pub fn with_encoder_channels(mut self, channels: Vec<usize>) -> Self {
        self.encoder_channels = channels;
        self
    }

    /// Sets the decoder channel progression.
    #[must_use]
    pub fn with_decoder_channels(mut self, channels: Vec<usize>) -> Self {
        self.decoder_channels = channels;
        self
    }

    /// Validates the configuration.
    ///
    /// Encoder and decoder must have the same number of stages, all
    /// channel counts must be positive, and the embedding dimension
    /// must be non-zero.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.encoder_channels.is_empty()
            && self.encoder_channels.len() == self.decoder_channels.len()
            && self.encoder_channels.iter().all(|&c| c > 0)
            && self.decoder_channels.iter().all(|&c| c > 0)
            && self.embed_dim > 0
    }

    /// Returns the total downsampling factor of the encoder.
    #[must_use]
    pub fn total_stride(&self) -> usize {
        1 << self.encoder_channels.len()
    }
}

/// Encoder-decoder network predicting chroma from lightness.
///
/// The encoder downsamples the single-channel lightness input with
/// strided convolutions. At the bottleneck, the conditioning embedding
/// is broadcast spatially, concatenated along the channel axis, and
/// fused with a 1x1 convolution. The decoder upsamples back with
/// transposed convolutions, and a final 3x3 convolution with `tanh`
/// produces two chroma channels in `[-1, 1]`.
///
/// Input spatial dimensions must be multiples of
/// [`total_stride`](Self::total_stride); callers pad and crop around
/// the forward pass for arbitrary sizes.
///
/// # Type Parameters
///
/// - `B`: The Burn backend (e.g., `NdArray`, `Wgpu`)
#[derive(Debug, Module)]
pub struct ColorizerModel<B: Backend> {
    encoder: Vec<Conv2d<B>>,
    fusion: Conv2d<B>,
    decoder: Vec<ConvTranspose2d<B>>,
    head: Conv2d<B>,
    /// Embedding dimension (stored separately for checkpoint
    /// compatibility).
    #[module(skip)]
    embed_dim: usize,
}

impl<B: Backend> ColorizerModel<B> {
    /// Creates a new colorization network with random weights.
    ///
    /// # Arguments
    ///
    /// - `config`: Model configuration (must be valid)
    /// - `device`: The device to create the model on
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid.
    #[must_use]
    pub fn new(config: &ColorizerModelConfig, device: &B::Device) -> Self {
        assert!(config.is_valid(), "invalid colorizer model configuration");

        let mut encoder = Vec::with_capacity(config.encoder_channels.len());
        let mut in_channels = 1;
        for &out_channels in &config.encoder_channels {
            encoder.push(
                Conv2dConfig::new([in_channels, out_channels], [3, 3])
                    .with_stride([2, 2])
                    .with_padding(PaddingConfig2d::Explicit(1, 1))
                    .init(device),
            );
            in_channels = out_channels;
        }

        let fusion = Conv2dConfig::new([in_channels + config.embed_dim, in_channels], [1, 1])
            .init(device);

        let mut decoder = Vec::with_capacity(config.decoder_channels.len());
        for &out_channels in &config.decoder_channels {
            decoder.push(
                ConvTranspose2dConfig::new([in_channels, out_channels], [4, 4])
                    .with_stride([2, 2])
                    .with_padding([1, 1])
                    .init(device),
            );
            in_channels = out_channels;
        }

        let head = Conv2dConfig::new([in_channels, 2], [3, 3])
            .with_padding(PaddingConfig2d::Explicit(1, 1))
            .init(device);

        Self {
            encoder,
            fusion,
            decoder,
            head,
            embed_dim: config.embed_dim,
        }
    }

    /// Returns the embedding dimension this model was built for.
    #[must_use]
    pub const fn embed_dim(&self) -> usize {
        self.embed_dim
    }

    /// Returns the total downsampling factor of the encoder.
    #[must_use]
    pub fn total_stride(&self) -> usize {
        1 << self.encoder.len()
    }

    /// Runs the forward pass.
    ///
    /// # Arguments
    ///
    /// - `lightness`: Tensor of shape `[batch, 1, H, W]` in `[-1, 1]`,
    ///   with H and W multiples of [`total_stride`](Self::total_stride)
    /// - `embedding`: Conditioning tensor of shape `[batch, embed_dim]`
    ///
    /// # Returns
    ///
    /// Chroma tensor of shape `[batch, 2, H, W]` in `[-1, 1]`.
    pub fn forward(&self, lightness: Tensor<B, 4>, embedding: Tensor<B, 2>) -> Tensor<B, 4> {
        let mut x = lightness;
        for conv in &self.encoder {
            x = relu(conv.forward(x));
        }

        let [batch, _, height, width] = x.dims();
        let conditioning = embedding
            .reshape([batch, self.embed_dim, 1, 1])
            .expand([batch, self.embed_dim, height, width]);
        let x = Tensor::cat(vec![x, conditioning], 1);
        let mut x = relu(self.fusion.forward(x));

        for deconv in &self.decoder {
            x = relu(deconv.forward(x));
        }

        tanh(self.head.forward(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn_ndarray::NdArray;

    type TestBackend = NdArray<f32>;

    fn small_config() -> ColorizerModelConfig {
        ColorizerModelConfig::new(8)
            .with_encoder_channels(vec![4, 8])
            .with_decoder_channels(vec![8, 4])
    }

    #[test]
    fn config_default() {
        let config = ColorizerModelConfig::default();
        assert_eq!(config.encoder_channels, vec![64, 128, 256]);
        assert_eq!(config.decoder_channels, vec![128, 64, 32]);
        assert_eq!(config.embed_dim, 1000);
        assert_eq!(config.total_stride(), 8);
        assert!(config.is_valid());
    }

    #[test]
    fn config_rejects_stage_mismatch() {
        let config = ColorizerModelConfig::default().with_decoder_channels(vec![64]);
        assert!(!config.is_valid());
    }

    #[test]
    fn config_rejects_empty_encoder() {
        let config = ColorizerModelConfig::default()
            .with_encoder_channels(Vec::new())
            .with_decoder_channels(Vec::new());
        assert!(!config.is_valid());
    }

    #[test]
    fn config_rejects_zero_embed_dim() {
        let config = ColorizerModelConfig::new(0);
        assert!(!config.is_valid());
    }

    #[test]
    fn config_serialization() {
        let config = small_config();
        let json = serde_json::to_string(&config);
        assert!(json.is_ok());

        let parsed: std::result::Result<ColorizerModelConfig, _> =
            serde_json::from_str(&json.unwrap_or_default());
        assert!(parsed.is_ok());
        assert_eq!(parsed.unwrap_or_default(), config);
    }

    #[test]
    fn forward_preserves_resolution() {
        let config = small_config();
        let device = <TestBackend as Backend>::Device::default();
        let model = ColorizerModel::<TestBackend>::new(&config, &device);

        let lightness = Tensor::<TestBackend, 4>::zeros([2, 1, 16, 16], &device);
        let embedding = Tensor::<TestBackend, 2>::zeros([2, 8], &device);
        let chroma = model.forward(lightness, embedding);

        assert_eq!(chroma.dims(), [2, 2, 16, 16]);
    }

    #[test]
    fn forward_output_is_bounded() {
        let config = small_config();
        let device = <TestBackend as Backend>::Device::default();
        let model = ColorizerModel::<TestBackend>::new(&config, &device);

        let lightness = Tensor::<TestBackend, 4>::ones([1, 1, 8, 8], &device);
        let embedding = Tensor::<TestBackend, 2>::ones([1, 8], &device);
        let chroma = model.forward(lightness, embedding);

        let values: Vec<f32> = chroma.into_data().to_vec().unwrap();
        assert!(values.iter().all(|v| (-1.0..=1.0).contains(v)));
    }

    #[test]
    fn forward_rectangular_input() {
        let config = small_config();
        let device = <TestBackend as Backend>::Device::default();
        let model = ColorizerModel::<TestBackend>::new(&config, &device);
        assert_eq!(model.total_stride(), 4);

        let lightness = Tensor::<TestBackend, 4>::zeros([1, 1, 12, 20], &device);
        let embedding = Tensor::<TestBackend, 2>::zeros([1, 8], &device);
        let chroma = model.forward(lightness, embedding);

        assert_eq!(chroma.dims(), [1, 2, 12, 20]);
    }
}
