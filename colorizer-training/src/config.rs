//! Training configuration.

use serde::{Deserialize, Serialize};

use crate::loss::LossKind;

/// Configuration for a training run.
///
/// # Example
///
/// ```
/// use colorizer_training::TrainingConfig;
///
/// let config = TrainingConfig::default();
/// assert_eq!(config.epochs, 20);
/// assert_eq!(config.batch_size, 16);
/// assert!(config.is_valid());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of training epochs.
    pub epochs: usize,

    /// Batch size.
    pub batch_size: usize,

    /// Optimizer configuration.
    pub optimizer: OptimizerConfig,

    /// Learning rate schedule.
    pub lr_schedule: LearningRateSchedule,

    /// Reconstruction loss to minimize.
    pub loss: LossKind,

    /// Whether to shuffle data each epoch.
    pub shuffle: bool,

    /// Checkpoint frequency (epochs between saves).
    pub checkpoint_frequency: usize,

    /// Number of samples held in flight by the prefetching loader.
    pub prefetch_depth: usize,

    /// Upper bound on estimated per-batch tensor memory, in bytes
    /// (`None` = unlimited).
    pub memory_budget_bytes: Option<usize>,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: 20,
            batch_size: 16,
            optimizer: OptimizerConfig::default(),
            lr_schedule: LearningRateSchedule::default(),
            loss: LossKind::default(),
            shuffle: true,
            checkpoint_frequency: 5,
            prefetch_depth: 8,
            memory_budget_bytes: None,
            seed: None,
        }
    }
}

impl TrainingConfig {
    /// Creates a new training config with the given epochs.
    #[must_use]
    pub const fn new(epochs: usize) -> Self {
        Self {
            epochs,
            batch_size: 16,
            optimizer: OptimizerConfig::adam(1e-3),
            lr_schedule: LearningRateSchedule::Constant,
            loss: LossKind::Mse,
            shuffle: true,
            checkpoint_frequency: 5,
            prefetch_depth: 8,
            memory_budget_bytes: None,
            seed: None,
        }
    }

    /// Sets the batch size.
    #[must_use]
    pub const fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Sets the optimizer.
    #[must_use]
    pub const fn with_optimizer(mut self, optimizer: OptimizerConfig) -> Self {
        self.optimizer = optimizer;
        self
    }

    /// Sets the learning rate schedule.
    #[must_use]
    pub const fn with_lr_schedule(mut self, schedule: LearningRateSchedule) -> Self {
        self.lr_schedule = schedule;
        self
    }

    /// Sets the loss kind.
    #[must_use]
    pub const fn with_loss(mut self, loss: LossKind) -> Self {
        self.loss = loss;
        self
    }

    /// Sets the checkpoint frequency.
    #[must_use]
    pub const fn with_checkpoint_frequency(mut self, frequency: usize) -> Self {
        self.checkpoint_frequency = frequency;
        self
    }

    /// Sets the memory budget in bytes.
    #[must_use]
    pub const fn with_memory_budget(mut self, bytes: usize) -> Self {
        self.memory_budget_bytes = Some(bytes);
        self
    }

    /// Sets the random seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Disables shuffling.
    #[must_use]
    pub const fn without_shuffle(mut self) -> Self {
        self.shuffle = false;
        self
    }

    /// Validates the configuration.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.epochs > 0
            && self.batch_size > 0
            && self.checkpoint_frequency > 0
            && self.prefetch_depth > 0
            && self.optimizer.is_valid()
    }

    /// Estimates the float-tensor bytes a batch occupies, given the
    /// training and extractor resolutions.
    ///
    /// Counts the lightness input, the chroma target and prediction,
    /// and the extractor view, all f32.
    #[must_use]
    pub const fn estimated_batch_bytes(
        &self,
        target_resolution: u32,
        extractor_resolution: u32,
    ) -> usize {
        let pixels = (target_resolution as usize) * (target_resolution as usize);
        let view = 3 * (extractor_resolution as usize) * (extractor_resolution as usize);
        // 1 lightness + 2 target + 2 prediction channels
        self.batch_size * (5 * pixels + view) * core::mem::size_of::<f32>()
    }
}

/// Adam optimizer configuration.
///
/// # Example
///
/// ```
/// use colorizer_training::OptimizerConfig;
///
/// let adam = OptimizerConfig::adam(1e-3);
/// assert_eq!(adam.learning_rate, 1e-3);
/// assert!(adam.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Base learning rate.
    pub learning_rate: f32,

    /// Beta1 moment decay.
    pub beta1: f32,

    /// Beta2 moment decay.
    pub beta2: f32,

    /// Epsilon for numerical stability.
    pub epsilon: f32,

    /// Weight decay (L2 penalty, 0.0 = disabled).
    pub weight_decay: f32,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self::adam(1e-3)
    }
}

impl OptimizerConfig {
    /// Creates an Adam optimizer config.
    #[must_use]
    pub const fn adam(learning_rate: f32) -> Self {
        Self {
            learning_rate,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-8,
            weight_decay: 0.0,
        }
    }

    /// Sets weight decay.
    #[must_use]
    pub const fn with_weight_decay(mut self, weight_decay: f32) -> Self {
        self.weight_decay = weight_decay;
        self
    }

    /// Validates the configuration.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.learning_rate > 0.0
            && self.weight_decay >= 0.0
            && self.beta1 >= 0.0
            && self.beta1 < 1.0
            && self.beta2 >= 0.0
            && self.beta2 < 1.0
            && self.epsilon > 0.0
    }
}

/// Learning rate schedule.
///
/// # Example
///
/// ```
/// use colorizer_training::LearningRateSchedule;
///
/// let schedule = LearningRateSchedule::step(0.1, 10);
/// assert!((schedule.compute_lr(1.0, 10, 100) - 0.1).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum LearningRateSchedule {
    /// Constant learning rate.
    #[default]
    Constant,

    /// Step decay: multiply by factor every `step_size` epochs.
    Step {
        /// Decay factor.
        factor: f32,
        /// Epochs between decays.
        step_size: usize,
    },

    /// Cosine annealing to minimum.
    Cosine {
        /// Minimum learning rate.
        min_lr: f32,
    },
}

impl LearningRateSchedule {
    /// Creates a step decay schedule.
    #[must_use]
    pub const fn step(factor: f32, step_size: usize) -> Self {
        Self::Step { factor, step_size }
    }

    /// Creates a cosine annealing schedule.
    #[must_use]
    pub const fn cosine(min_lr: f32) -> Self {
        Self::Cosine { min_lr }
    }

    /// Computes the learning rate for a given epoch.
    ///
    /// # Arguments
    ///
    /// - `base_lr`: The base learning rate
    /// - `epoch`: Current epoch (0-indexed)
    /// - `total_epochs`: Total number of epochs
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap
    )]
    pub fn compute_lr(&self, base_lr: f32, epoch: usize, total_epochs: usize) -> f32 {
        match self {
            Self::Constant => base_lr,

            Self::Step { factor, step_size } => {
                let decays = epoch / step_size;
                base_lr * factor.powi(decays as i32)
            }

            Self::Cosine { min_lr } => {
                let progress = epoch as f32 / total_epochs.max(1) as f32;
                let cosine = (std::f32::consts::PI * progress).cos();
                min_lr + (base_lr - min_lr) * (1.0 + cosine) / 2.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn training_config_default() {
        let config = TrainingConfig::default();
        assert_eq!(config.epochs, 20);
        assert_eq!(config.batch_size, 16);
        assert!(config.shuffle);
        assert!(config.memory_budget_bytes.is_none());
        assert!(config.is_valid());
    }

    #[test]
    fn training_config_builder() {
        let config = TrainingConfig::new(5)
            .with_batch_size(4)
            .with_seed(42)
            .with_checkpoint_frequency(2)
            .without_shuffle();

        assert_eq!(config.epochs, 5);
        assert_eq!(config.batch_size, 4);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.checkpoint_frequency, 2);
        assert!(!config.shuffle);
    }

    #[test]
    fn training_config_invalid() {
        let mut config = TrainingConfig::default();
        config.epochs = 0;
        assert!(!config.is_valid());

        config = TrainingConfig::default();
        config.batch_size = 0;
        assert!(!config.is_valid());

        config = TrainingConfig::default();
        config.prefetch_depth = 0;
        assert!(!config.is_valid());
    }

    #[test]
    fn estimated_batch_bytes_scales_with_batch() {
        let small = TrainingConfig::default().with_batch_size(1);
        let large = TrainingConfig::default().with_batch_size(8);

        let one = small.estimated_batch_bytes(128, 224);
        let eight = large.estimated_batch_bytes(128, 224);
        assert_eq!(eight, 8 * one);
    }

    #[test]
    fn optimizer_config_adam() {
        let config = OptimizerConfig::adam(1e-3);
        assert_eq!(config.learning_rate, 1e-3);
        assert_eq!(config.beta1, 0.9);
        assert!(config.is_valid());
    }

    #[test]
    fn optimizer_config_invalid_lr() {
        let mut config = OptimizerConfig::adam(0.0);
        assert!(!config.is_valid());
        config.learning_rate = -1.0;
        assert!(!config.is_valid());
    }

    #[test]
    fn lr_schedule_constant() {
        let schedule = LearningRateSchedule::Constant;
        assert_eq!(schedule.compute_lr(0.01, 0, 100), 0.01);
        assert_eq!(schedule.compute_lr(0.01, 99, 100), 0.01);
    }

    #[test]
    fn lr_schedule_step() {
        let schedule = LearningRateSchedule::step(0.1, 10);

        assert!((schedule.compute_lr(1.0, 0, 100) - 1.0).abs() < 1e-6);
        assert!((schedule.compute_lr(1.0, 9, 100) - 1.0).abs() < 1e-6);
        assert!((schedule.compute_lr(1.0, 10, 100) - 0.1).abs() < 1e-6);
        assert!((schedule.compute_lr(1.0, 20, 100) - 0.01).abs() < 1e-6);
    }

    #[test]
    fn lr_schedule_cosine() {
        let schedule = LearningRateSchedule::cosine(0.0);

        assert!((schedule.compute_lr(1.0, 0, 100) - 1.0).abs() < 1e-6);
        assert!((schedule.compute_lr(1.0, 50, 100) - 0.5).abs() < 1e-5);
        assert!(schedule.compute_lr(1.0, 100, 100).abs() < 1e-5);
    }

    #[test]
    fn config_serialization() {
        let config = TrainingConfig::default();
        let json = serde_json::to_string(&config);
        assert!(json.is_ok());

        let parsed: std::result::Result<TrainingConfig, _> =
            serde_json::from_str(&json.unwrap_or_default());
        assert!(parsed.is_ok());
        assert_eq!(parsed.unwrap_or_default(), config);
    }
}
