//! Training loop implementation.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use burn::module::AutodiffModule;
use burn::optim::decay::WeightDecayConfig;
use burn::optim::{AdamConfig, GradientsParams, Optimizer};
use burn::prelude::Backend;
use burn::tensor::backend::AutodiffBackend;
use burn::tensor::{ElementConversion, Tensor, TensorData};
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use colorizer_dataset::{ColorSample, PrefetchLoader, PreprocessConfig};
use colorizer_models::{
    CheckpointFormat, ColorizerModel, FeatureExtractor, sanity_check_embedding, save_checkpoint,
};

use crate::config::TrainingConfig;
use crate::error::{Result, TrainingError};
use crate::loss::reconstruction_loss;
use crate::metrics::{EpochMetrics, TrainingMetrics};

/// Runs training of a colorization network against a frozen extractor.
///
/// Samples stream in through a [`PrefetchLoader`]; decode failures are
/// skipped with a warning and counted in the metrics. Checkpoints are
/// written at the configured interval and at termination.
///
/// # Example
///
/// ```
/// use colorizer_training::{Trainer, TrainingConfig};
///
/// let trainer = Trainer::new(TrainingConfig::new(10));
/// assert_eq!(trainer.config().epochs, 10);
/// ```
#[derive(Debug, Clone)]
pub struct Trainer {
    config: TrainingConfig,
}

impl Default for Trainer {
    fn default() -> Self {
        Self::new(TrainingConfig::default())
    }
}

impl Trainer {
    /// Creates a new trainer with the given config.
    #[must_use]
    pub const fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    /// Returns the training configuration.
    #[must_use]
    pub const fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Computes the learning rate for the given epoch.
    #[must_use]
    pub fn compute_lr(&self, epoch: usize) -> f32 {
        self.config.lr_schedule.compute_lr(
            self.config.optimizer.learning_rate,
            epoch,
            self.config.epochs,
        )
    }

    /// Returns whether a checkpoint should be saved after this epoch.
    #[must_use]
    pub const fn should_checkpoint(&self, epoch: usize) -> bool {
        self.config.checkpoint_frequency > 0 && (epoch + 1) % self.config.checkpoint_frequency == 0
    }

    /// Trains a model over the given files.
    ///
    /// # Arguments
    ///
    /// - `model`: The network to train (consumed, returned updated)
    /// - `extractor`: Frozen conditioning source
    /// - `train_files`: Training image paths
    /// - `val_files`: Validation image paths (may be empty)
    /// - `preprocess`: Preprocessing applied to every file
    /// - `checkpoint_dir`: Directory for periodic checkpoints (`None`
    ///   disables saving)
    /// - `device`: The device to train on
    ///
    /// # Returns
    ///
    /// The trained model and the accumulated metrics.
    ///
    /// # Errors
    ///
    /// Returns `TrainingError::InvalidConfig` for invalid or
    /// incompatible configurations, `TrainingError::ResourceExhausted`
    /// if the estimated batch memory exceeds the configured budget,
    /// `TrainingError::Model` if the extractor fails its setup check
    /// on a known input, and `TrainingError::EmptyDataset` if no file
    /// list entry yields a usable sample.
    #[allow(clippy::too_many_lines, clippy::cast_precision_loss)]
    pub fn train<B: AutodiffBackend>(
        &self,
        mut model: ColorizerModel<B>,
        extractor: &FeatureExtractor<B>,
        train_files: &[PathBuf],
        val_files: &[PathBuf],
        preprocess: &PreprocessConfig,
        checkpoint_dir: Option<&Path>,
        device: &B::Device,
    ) -> Result<(ColorizerModel<B>, TrainingMetrics)> {
        self.check_preconditions(&model, extractor, train_files, preprocess, device)?;

        if let Some(dir) = checkpoint_dir {
            fs::create_dir_all(dir)?;
        }
        if let Some(seed) = self.config.seed {
            B::seed(seed);
        }

        let mut rng = self
            .config
            .seed
            .map_or_else(ChaCha8Rng::from_entropy, ChaCha8Rng::seed_from_u64);

        let mut adam = AdamConfig::new()
            .with_beta_1(self.config.optimizer.beta1)
            .with_beta_2(self.config.optimizer.beta2)
            .with_epsilon(self.config.optimizer.epsilon);
        if self.config.optimizer.weight_decay > 0.0 {
            adam = adam
                .with_weight_decay(Some(WeightDecayConfig::new(self.config.optimizer.weight_decay)));
        }
        let mut optim = adam.init();

        let mut metrics = TrainingMetrics::new();

        tracing::info!(
            epochs = self.config.epochs,
            train_files = train_files.len(),
            val_files = val_files.len(),
            "starting training run"
        );

        for epoch in 0..self.config.epochs {
            let epoch_start = Instant::now();
            let lr = self.compute_lr(epoch);

            let mut order = train_files.to_vec();
            if self.config.shuffle {
                order.shuffle(&mut rng);
            }

            let loader =
                PrefetchLoader::spawn(order, *preprocess, self.config.prefetch_depth);
            let mut builder = BatchBuilder::new(preprocess);
            let mut loss_sum = 0.0_f64;
            let mut processed = 0_usize;
            let mut skipped = 0_usize;

            for (path, result) in loader {
                let sample = match result {
                    Ok(sample) => sample,
                    Err(e) if e.is_skippable() => {
                        tracing::warn!(path = %path.display(), error = %e, "skipping sample");
                        skipped += 1;
                        continue;
                    }
                    Err(e) => return Err(e.into()),
                };
                if !builder.push(&sample) {
                    tracing::warn!(path = %path.display(), "skipping sample with unexpected shape");
                    skipped += 1;
                    continue;
                }

                if builder.len() == self.config.batch_size {
                    let (lightness, chroma, views, count) = builder.take();
                    let (updated, loss) =
                        self.train_step(model, &mut optim, extractor, lightness, chroma, views, lr, device);
                    model = updated;
                    loss_sum += f64::from(loss) * count as f64;
                    processed += count;
                }
            }

            // Trailing partial batch
            if builder.len() > 0 {
                let (lightness, chroma, views, count) = builder.take();
                let (updated, loss) =
                    self.train_step(model, &mut optim, extractor, lightness, chroma, views, lr, device);
                model = updated;
                loss_sum += f64::from(loss) * count as f64;
                processed += count;
            }

            if processed == 0 {
                return Err(TrainingError::empty_dataset(
                    "every sample in the epoch failed to decode",
                ));
            }

            #[allow(clippy::cast_possible_truncation)]
            let train_loss = (loss_sum / processed as f64) as f32;

            let val_loss = if val_files.is_empty() {
                None
            } else {
                self.validate(&model.valid(), &extractor.valid(), val_files, preprocess, device)?
            };

            tracing::info!(
                epoch = epoch + 1,
                train_loss,
                val_loss = val_loss.unwrap_or(f32::NAN),
                skipped,
                "epoch complete"
            );

            metrics.add_epoch(
                EpochMetrics::new(epoch, train_loss, val_loss)
                    .with_learning_rate(lr)
                    .with_train_time(epoch_start.elapsed().as_secs_f32())
                    .with_samples(processed, skipped),
            );

            if self.should_checkpoint(epoch) {
                if let Some(dir) = checkpoint_dir {
                    self.save_to(&model, dir, &format!("epoch-{}", epoch + 1))?;
                }
            }
        }

        if let Some(dir) = checkpoint_dir {
            self.save_to(&model, dir, "final")?;
        }

        Ok((model, metrics))
    }

    fn check_preconditions<B: Backend>(
        &self,
        model: &ColorizerModel<B>,
        extractor: &FeatureExtractor<B>,
        train_files: &[PathBuf],
        preprocess: &PreprocessConfig,
        device: &B::Device,
    ) -> Result<()> {
        if !self.config.is_valid() {
            return Err(TrainingError::invalid_config(
                "epochs, batch size, checkpoint frequency, prefetch depth, and optimizer settings must all be positive",
            ));
        }
        if !preprocess.is_valid() {
            return Err(TrainingError::invalid_config(
                "preprocess resolutions must be non-zero",
            ));
        }
        if train_files.is_empty() {
            return Err(TrainingError::empty_dataset("no training files"));
        }
        if extractor.embed_dim() != model.embed_dim() {
            return Err(TrainingError::invalid_config(format!(
                "extractor embedding dim {} does not match model embedding dim {}",
                extractor.embed_dim(),
                model.embed_dim()
            )));
        }
        let stride = model.total_stride();
        if preprocess.target_resolution as usize % stride != 0 {
            return Err(TrainingError::invalid_config(format!(
                "target resolution {} is not a multiple of the model stride {stride}",
                preprocess.target_resolution
            )));
        }
        if let Some(budget) = self.config.memory_budget_bytes {
            let required = self
                .config
                .estimated_batch_bytes(preprocess.target_resolution, preprocess.extractor_resolution);
            if required > budget {
                return Err(TrainingError::resource_exhausted(required, budget));
            }
        }

        // Run a known input through the extractor once; a mis-sized or
        // non-finite embedding aborts here instead of mid-epoch.
        let e = preprocess.extractor_resolution as usize;
        let known_input = Tensor::<B, 4>::zeros([1, 3, e, e], device);
        let embedding: Vec<f32> = extractor
            .forward(known_input)
            .into_data()
            .to_vec()
            .map_err(|err| TrainingError::tensor_data(format!("{err:?}")))?;
        sanity_check_embedding(&embedding, model.embed_dim())?;

        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn train_step<B: AutodiffBackend, O: Optimizer<ColorizerModel<B>, B>>(
        &self,
        model: ColorizerModel<B>,
        optim: &mut O,
        extractor: &FeatureExtractor<B>,
        lightness: TensorData,
        chroma: TensorData,
        views: TensorData,
        lr: f32,
        device: &B::Device,
    ) -> (ColorizerModel<B>, f32) {
        let lightness = Tensor::<B, 4>::from_data(lightness, device);
        let target = Tensor::<B, 4>::from_data(chroma, device);
        let views = Tensor::<B, 4>::from_data(views, device);

        let embedding = extractor.forward(views);
        let pred = model.forward(lightness, embedding);
        let loss = reconstruction_loss(self.config.loss, pred, target);
        let value: f32 = loss.clone().into_scalar().elem();

        let grads = GradientsParams::from_grads(loss.backward(), &model);
        let model = optim.step(f64::from(lr), model, grads);

        (model, value)
    }

    /// Computes the mean validation loss without updating the model.
    ///
    /// Returns `None` if no validation sample could be decoded.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    fn validate<B: Backend>(
        &self,
        model: &ColorizerModel<B>,
        extractor: &FeatureExtractor<B>,
        files: &[PathBuf],
        preprocess: &PreprocessConfig,
        device: &B::Device,
    ) -> Result<Option<f32>> {
        let loader = PrefetchLoader::spawn(
            files.to_vec(),
            *preprocess,
            self.config.prefetch_depth,
        );
        let mut builder = BatchBuilder::new(preprocess);
        let mut loss_sum = 0.0_f64;
        let mut processed = 0_usize;

        let mut consume =
            |builder: &mut BatchBuilder, loss_sum: &mut f64, processed: &mut usize| {
                let (lightness, chroma, views, count) = builder.take();
                let lightness = Tensor::<B, 4>::from_data(lightness, device);
                let target = Tensor::<B, 4>::from_data(chroma, device);
                let views = Tensor::<B, 4>::from_data(views, device);

                let embedding = extractor.forward(views);
                let pred = model.forward(lightness, embedding);
                let loss = reconstruction_loss(self.config.loss, pred, target);
                let value: f32 = loss.into_scalar().elem();

                *loss_sum += f64::from(value) * count as f64;
                *processed += count;
            };

        for (path, result) in loader {
            let sample = match result {
                Ok(sample) => sample,
                Err(e) if e.is_skippable() => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping validation sample");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            if !builder.push(&sample) {
                continue;
            }
            if builder.len() == self.config.batch_size {
                consume(&mut builder, &mut loss_sum, &mut processed);
            }
        }
        if builder.len() > 0 {
            consume(&mut builder, &mut loss_sum, &mut processed);
        }

        if processed == 0 {
            return Ok(None);
        }
        Ok(Some((loss_sum / processed as f64) as f32))
    }

    fn save_to<B: Backend>(
        &self,
        model: &ColorizerModel<B>,
        dir: &Path,
        stem: &str,
    ) -> Result<()> {
        let path = dir.join(stem);
        let path = path
            .to_str()
            .ok_or_else(|| TrainingError::invalid_config("checkpoint path is not valid UTF-8"))?;
        let saved = save_checkpoint::<B, _>(model, path, CheckpointFormat::Binary)?;
        tracing::info!(path = %saved, "saved checkpoint");
        Ok(())
    }
}

/// Accumulates samples into contiguous batch buffers.
struct BatchBuilder {
    resolution: usize,
    extractor_resolution: usize,
    lightness: Vec<f32>,
    chroma: Vec<f32>,
    views: Vec<f32>,
    count: usize,
}

impl BatchBuilder {
    fn new(preprocess: &PreprocessConfig) -> Self {
        Self {
            resolution: preprocess.target_resolution as usize,
            extractor_resolution: preprocess.extractor_resolution as usize,
            lightness: Vec::new(),
            chroma: Vec::new(),
            views: Vec::new(),
            count: 0,
        }
    }

    /// Appends a sample. Returns `false` if its shapes do not match
    /// the configured resolutions.
    fn push(&mut self, sample: &ColorSample) -> bool {
        let pixels = self.resolution * self.resolution;
        let view_len = 3 * self.extractor_resolution * self.extractor_resolution;
        if sample.lightness.data.len() != pixels
            || sample.chroma.data.len() != 2 * pixels
            || sample.extractor_view.len() != view_len
        {
            return false;
        }

        self.lightness.extend_from_slice(&sample.lightness.data);
        self.chroma.extend_from_slice(&sample.chroma.data);
        self.views.extend_from_slice(&sample.extractor_view);
        self.count += 1;
        true
    }

    const fn len(&self) -> usize {
        self.count
    }

    /// Drains the buffers into tensor data for one batch.
    fn take(&mut self) -> (TensorData, TensorData, TensorData, usize) {
        let n = self.count;
        let r = self.resolution;
        let e = self.extractor_resolution;

        let lightness = TensorData::new(std::mem::take(&mut self.lightness), [n, 1, r, r]);
        let chroma = TensorData::new(std::mem::take(&mut self.chroma), [n, 2, r, r]);
        let views = TensorData::new(std::mem::take(&mut self.views), [n, 3, e, e]);
        self.count = 0;

        (lightness, chroma, views, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LearningRateSchedule;
    use colorizer_types::{ChromaPlanes, LightnessPlane};

    #[test]
    fn trainer_compute_lr_constant() {
        let trainer = Trainer::new(TrainingConfig::new(10));
        assert!((trainer.compute_lr(0) - 1e-3).abs() < 1e-9);
        assert!((trainer.compute_lr(9) - 1e-3).abs() < 1e-9);
    }

    #[test]
    fn trainer_compute_lr_step() {
        let config =
            TrainingConfig::new(10).with_lr_schedule(LearningRateSchedule::step(0.5, 5));
        let trainer = Trainer::new(config);
        assert!((trainer.compute_lr(4) - 1e-3).abs() < 1e-9);
        assert!((trainer.compute_lr(5) - 5e-4).abs() < 1e-9);
    }

    #[test]
    fn trainer_should_checkpoint() {
        let trainer = Trainer::new(TrainingConfig::new(10).with_checkpoint_frequency(3));
        assert!(!trainer.should_checkpoint(0));
        assert!(!trainer.should_checkpoint(1));
        assert!(trainer.should_checkpoint(2));
        assert!(trainer.should_checkpoint(5));
    }

    fn fake_sample(resolution: usize, extractor_resolution: usize) -> ColorSample {
        let pixels = resolution * resolution;
        ColorSample {
            path: PathBuf::from("fake.png"),
            lightness: LightnessPlane::new(
                vec![0.1; pixels],
                resolution as u32,
                resolution as u32,
            ),
            chroma: ChromaPlanes::new(
                vec![0.2; 2 * pixels],
                resolution as u32,
                resolution as u32,
            ),
            extractor_view: vec![0.3; 3 * extractor_resolution * extractor_resolution],
            extractor_resolution: extractor_resolution as u32,
        }
    }

    #[test]
    fn batch_builder_accumulates() {
        let preprocess = PreprocessConfig::new(4).with_extractor_resolution(2);
        let mut builder = BatchBuilder::new(&preprocess);

        assert!(builder.push(&fake_sample(4, 2)));
        assert!(builder.push(&fake_sample(4, 2)));
        assert_eq!(builder.len(), 2);

        let (lightness, chroma, views, count) = builder.take();
        assert_eq!(count, 2);
        assert_eq!(lightness.shape, vec![2, 1, 4, 4]);
        assert_eq!(chroma.shape, vec![2, 2, 4, 4]);
        assert_eq!(views.shape, vec![2, 3, 2, 2]);
        assert_eq!(builder.len(), 0);
    }

    #[test]
    fn batch_builder_rejects_wrong_resolution() {
        let preprocess = PreprocessConfig::new(4).with_extractor_resolution(2);
        let mut builder = BatchBuilder::new(&preprocess);

        assert!(!builder.push(&fake_sample(8, 2)));
        assert_eq!(builder.len(), 0);
    }
}
