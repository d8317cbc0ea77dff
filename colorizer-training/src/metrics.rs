//! Training metrics.

use serde::{Deserialize, Serialize};

/// Metrics for a single training epoch.
///
/// # Example
///
/// ```
/// use colorizer_training::EpochMetrics;
///
/// let metrics = EpochMetrics::new(0, 0.5, Some(0.4));
/// assert_eq!(metrics.epoch, 0);
/// assert!((metrics.train_loss - 0.5).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// Epoch number (0-indexed).
    pub epoch: usize,

    /// Training loss for this epoch.
    pub train_loss: f32,

    /// Validation loss (if a validation set was provided).
    pub val_loss: Option<f32>,

    /// Learning rate used.
    pub learning_rate: f32,

    /// Training time in seconds.
    pub train_time_secs: f32,

    /// Number of samples that contributed to the loss.
    pub processed_samples: usize,

    /// Number of samples skipped due to decode failures.
    pub skipped_samples: usize,
}

impl EpochMetrics {
    /// Creates new epoch metrics.
    #[must_use]
    pub const fn new(epoch: usize, train_loss: f32, val_loss: Option<f32>) -> Self {
        Self {
            epoch,
            train_loss,
            val_loss,
            learning_rate: 0.0,
            train_time_secs: 0.0,
            processed_samples: 0,
            skipped_samples: 0,
        }
    }

    /// Sets the learning rate.
    #[must_use]
    pub const fn with_learning_rate(mut self, lr: f32) -> Self {
        self.learning_rate = lr;
        self
    }

    /// Sets the training time.
    #[must_use]
    pub const fn with_train_time(mut self, secs: f32) -> Self {
        self.train_time_secs = secs;
        self
    }

    /// Sets processed and skipped sample counts.
    #[must_use]
    pub const fn with_samples(mut self, processed: usize, skipped: usize) -> Self {
        self.processed_samples = processed;
        self.skipped_samples = skipped;
        self
    }
}

/// Aggregate metrics for a training run.
///
/// # Example
///
/// ```
/// use colorizer_training::{EpochMetrics, TrainingMetrics};
///
/// let mut metrics = TrainingMetrics::new();
/// metrics.add_epoch(EpochMetrics::new(0, 0.5, Some(0.4)));
/// metrics.add_epoch(EpochMetrics::new(1, 0.3, Some(0.35)));
///
/// assert_eq!(metrics.epochs_completed(), 2);
/// assert!((metrics.final_loss() - 0.3).abs() < 1e-6);
/// assert_eq!(metrics.best_epoch, Some(1));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    /// Metrics for each epoch.
    pub epoch_metrics: Vec<EpochMetrics>,

    /// Best validation loss seen.
    pub best_val_loss: Option<f32>,

    /// Epoch with best validation loss.
    pub best_epoch: Option<usize>,

    /// Total training time in seconds.
    pub total_time_secs: f32,

    /// Total samples skipped across the run.
    pub total_skipped: usize,
}

impl TrainingMetrics {
    /// Creates new empty training metrics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds metrics for an epoch.
    pub fn add_epoch(&mut self, metrics: EpochMetrics) {
        if let Some(val_loss) = metrics.val_loss {
            if self.best_val_loss.is_none() || val_loss < self.best_val_loss.unwrap_or(f32::MAX) {
                self.best_val_loss = Some(val_loss);
                self.best_epoch = Some(metrics.epoch);
            }
        }

        self.total_time_secs += metrics.train_time_secs;
        self.total_skipped += metrics.skipped_samples;
        self.epoch_metrics.push(metrics);
    }

    /// Returns the number of completed epochs.
    #[must_use]
    pub fn epochs_completed(&self) -> usize {
        self.epoch_metrics.len()
    }

    /// Returns the final training loss.
    #[must_use]
    pub fn final_loss(&self) -> f32 {
        self.epoch_metrics.last().map_or(f32::NAN, |m| m.train_loss)
    }

    /// Returns the initial training loss.
    #[must_use]
    pub fn initial_loss(&self) -> f32 {
        self.epoch_metrics
            .first()
            .map_or(f32::NAN, |m| m.train_loss)
    }

    /// Returns the final validation loss.
    #[must_use]
    pub fn final_val_loss(&self) -> Option<f32> {
        self.epoch_metrics.last().and_then(|m| m.val_loss)
    }

    /// Returns training losses as a vector.
    #[must_use]
    pub fn train_losses(&self) -> Vec<f32> {
        self.epoch_metrics.iter().map(|m| m.train_loss).collect()
    }

    /// Returns a one-line human-readable summary.
    #[must_use]
    pub fn summary(&self) -> String {
        let val = self
            .best_val_loss
            .map_or_else(|| "n/a".to_string(), |v| format!("{v:.5}"));
        format!(
            "{} epochs, train loss {:.5} -> {:.5}, best val loss {}, {} skipped, {:.1}s",
            self.epochs_completed(),
            self.initial_loss(),
            self.final_loss(),
            val,
            self.total_skipped,
            self.total_time_secs,
        )
    }
}
