//! Dataset splitting utilities.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Ratio for splitting datasets into train/validation sets.
///
/// The ratio specifies the proportion of data to use for training.
/// The remainder goes to validation.
///
/// # Example
///
/// ```
/// use colorizer_dataset::SplitRatio;
///
/// // 90% train, 10% validation
/// let ratio = SplitRatio::new(0.9);
/// assert!((ratio.train_ratio() - 0.9).abs() < 1e-6);
/// assert!((ratio.val_ratio() - 0.1).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitRatio {
    train: f32,
}

impl SplitRatio {
    /// Creates a new split ratio.
    ///
    /// # Arguments
    ///
    /// - `train`: Proportion for training (must be in `(0, 1)`)
    ///
    /// # Panics
    ///
    /// Panics if ratio is not in `(0, 1)`.
    #[must_use]
    pub fn new(train: f32) -> Self {
        assert!(
            train > 0.0 && train < 1.0,
            "Split ratio must be in (0, 1), got {train}"
        );
        Self { train }
    }

    /// Creates a split ratio, returning `None` if invalid.
    #[must_use]
    pub fn try_new(train: f32) -> Option<Self> {
        if train > 0.0 && train < 1.0 {
            Some(Self { train })
        } else {
            None
        }
    }

    /// Returns the training ratio.
    #[must_use]
    pub const fn train_ratio(&self) -> f32 {
        self.train
    }

    /// Returns the validation ratio.
    #[must_use]
    pub fn val_ratio(&self) -> f32 {
        1.0 - self.train
    }

    /// Computes the split point for a given dataset size.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn split_point(&self, total: usize) -> usize {
        (total as f32 * self.train).round() as usize
    }

    /// Common 80/20 split.
    pub const EIGHTY_TWENTY: Self = Self { train: 0.8 };

    /// Common 90/10 split.
    pub const NINETY_TEN: Self = Self { train: 0.9 };
}

impl Default for SplitRatio {
    fn default() -> Self {
        Self::NINETY_TEN
    }
}

/// Splits a list of image files into training and validation sets.
///
/// # Arguments
///
/// - `files`: The file paths to split
/// - `ratio`: Train/val ratio
/// - `seed`: Optional random seed for reproducibility
///
/// # Returns
///
/// Tuple of `(train, val)` path vectors.
///
/// # Example
///
/// ```
/// use colorizer_dataset::{split_files, SplitRatio};
/// use std::path::PathBuf;
///
/// let files: Vec<PathBuf> = (0..10)
///     .map(|i| PathBuf::from(format!("{i}.png")))
///     .collect();
///
/// let (train, val) = split_files(&files, SplitRatio::EIGHTY_TWENTY, Some(42));
/// assert_eq!(train.len(), 8);
/// assert_eq!(val.len(), 2);
/// ```
#[must_use]
pub fn split_files(
    files: &[PathBuf],
    ratio: SplitRatio,
    seed: Option<u64>,
) -> (Vec<PathBuf>, Vec<PathBuf>) {
    if files.is_empty() {
        return (Vec::new(), Vec::new());
    }
    if files.len() == 1 {
        return (files.to_vec(), Vec::new());
    }

    // Shuffle indices rather than the paths themselves
    let mut indices: Vec<usize> = (0..files.len()).collect();

    let mut rng = seed.map_or_else(ChaCha8Rng::from_entropy, ChaCha8Rng::seed_from_u64);
    indices.shuffle(&mut rng);

    // Both halves stay non-empty
    let split = ratio.split_point(files.len()).max(1).min(files.len() - 1);

    let train = indices[..split].iter().map(|&i| files[i].clone()).collect();
    let val = indices[split..].iter().map(|&i| files[i].clone()).collect();

    (train, val)
}
