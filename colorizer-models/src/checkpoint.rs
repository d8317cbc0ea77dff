//! Checkpoint persistence for model weights.

use std::path::{Path, PathBuf};

use burn::module::Module;
use burn::prelude::Backend;
use burn::record::{BinFileRecorder, FullPrecisionSettings, PrettyJsonFileRecorder, Recorder};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Supported checkpoint file formats.
///
/// # Example
///
/// ```
/// use colorizer_models::CheckpointFormat;
///
/// let format = CheckpointFormat::from_extension("bin");
/// assert_eq!(format, Some(CheckpointFormat::Binary));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CheckpointFormat {
    /// Binary format via Burn's `BinFileRecorder`. Compact; the format
    /// training checkpoints use.
    #[default]
    Binary,

    /// JSON format via Burn's `PrettyJsonFileRecorder`. Human-readable
    /// and much larger; useful for inspecting weights.
    Json,
}

impl CheckpointFormat {
    /// Determines format from file extension.
    ///
    /// - `.bin`, `.burn` -> Binary
    /// - `.json` -> Json
    /// - Other -> None
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "bin" | "burn" => Some(Self::Binary),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Determines format from file path.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Returns the default file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Binary => "bin",
            Self::Json => "json",
        }
    }

    /// Returns the format name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::Json => "json",
        }
    }
}

impl std::fmt::Display for CheckpointFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Builds the checkpoint path for a named checkpoint in a directory.
///
/// # Example
///
/// ```
/// use colorizer_models::{checkpoint_path, CheckpointFormat};
/// use std::path::Path;
///
/// let path = checkpoint_path(Path::new("runs"), "epoch-3", CheckpointFormat::Binary);
/// assert_eq!(path, Path::new("runs/epoch-3.bin"));
/// ```
#[must_use]
pub fn checkpoint_path(dir: &Path, stem: &str, format: CheckpointFormat) -> PathBuf {
    dir.join(format!("{stem}.{}", format.extension()))
}

/// Saves model weights to a file.
///
/// # Arguments
///
/// - `model`: The model to save
/// - `path`: Output file path (without extension)
/// - `format`: Checkpoint format to use
///
/// # Returns
///
/// The full path to the saved checkpoint (with extension added).
///
/// # Errors
///
/// Returns `ModelError::SaveCheckpoint` if saving fails.
pub fn save_checkpoint<B, M>(model: &M, path: &str, format: CheckpointFormat) -> Result<String>
where
    B: Backend,
    M: Module<B>,
{
    let full_path = format!("{}.{}", path, format.extension());
    let record = model.clone().into_record();

    match format {
        CheckpointFormat::Binary => {
            let recorder = BinFileRecorder::<FullPrecisionSettings>::new();
            recorder
                .record(record, full_path.clone().into())
                .map_err(|e| ModelError::save_checkpoint(&full_path, e.to_string()))?;
        }
        CheckpointFormat::Json => {
            let recorder = PrettyJsonFileRecorder::<FullPrecisionSettings>::new();
            recorder
                .record(record, full_path.clone().into())
                .map_err(|e| ModelError::save_checkpoint(&full_path, e.to_string()))?;
        }
    }

    Ok(full_path)
}

/// Loads model weights from a file into an initialized model.
///
/// The model must have been built with the same configuration the
/// checkpoint was saved from.
///
/// # Arguments
///
/// - `model`: The model to load weights into
/// - `path`: Path to the checkpoint file (with extension)
/// - `device`: Device to load the weights onto
///
/// # Errors
///
/// Returns `ModelError::CheckpointNotFound` if the file doesn't exist,
/// `ModelError::UnsupportedFormat` if the format can't be determined
/// from the extension, or `ModelError::LoadCheckpoint` if the weights
/// don't match the model.
pub fn load_checkpoint<B, M>(model: M, path: &str, device: &B::Device) -> Result<M>
where
    B: Backend,
    M: Module<B>,
{
    let path_obj = Path::new(path);

    if !path_obj.exists() {
        return Err(ModelError::checkpoint_not_found(path));
    }

    let format = CheckpointFormat::from_path(path_obj)
        .ok_or_else(|| ModelError::unsupported_format(path))?;

    let loaded = match format {
        CheckpointFormat::Binary => {
            let recorder = BinFileRecorder::<FullPrecisionSettings>::new();
            model
                .load_file(path_obj, &recorder, device)
                .map_err(|e| ModelError::load_checkpoint(path, e.to_string()))?
        }
        CheckpointFormat::Json => {
            let recorder = PrettyJsonFileRecorder::<FullPrecisionSettings>::new();
            model
                .load_file(path_obj, &recorder, device)
                .map_err(|e| ModelError::load_checkpoint(path, e.to_string()))?
        }
    };

    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colorizer::{ColorizerModel, ColorizerModelConfig};
    use burn::tensor::Tensor;
    use burn_ndarray::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn format_from_extension() {
        assert_eq!(
            CheckpointFormat::from_extension("bin"),
            Some(CheckpointFormat::Binary)
        );
        assert_eq!(
            CheckpointFormat::from_extension("burn"),
            Some(CheckpointFormat::Binary)
        );
        assert_eq!(
            CheckpointFormat::from_extension("JSON"),
            Some(CheckpointFormat::Json)
        );
        assert_eq!(CheckpointFormat::from_extension("xml"), None);
    }

    #[test]
    fn format_from_path() {
        assert_eq!(
            CheckpointFormat::from_path(Path::new("model.bin")),
            Some(CheckpointFormat::Binary)
        );
        assert_eq!(
            CheckpointFormat::from_path(Path::new("/runs/epoch-2.json")),
            Some(CheckpointFormat::Json)
        );
        assert_eq!(CheckpointFormat::from_path(Path::new("model")), None);
    }

    #[test]
    fn format_display() {
        assert_eq!(format!("{}", CheckpointFormat::Binary), "binary");
        assert_eq!(format!("{}", CheckpointFormat::Json), "json");
    }

    #[test]
    fn checkpoint_path_joins_extension() {
        let path = checkpoint_path(Path::new("runs"), "final", CheckpointFormat::Json);
        assert_eq!(path, Path::new("runs/final.json"));
    }

    #[test]
    fn load_missing_checkpoint_fails() {
        let device = Default::default();
        let config = ColorizerModelConfig::new(4)
            .with_encoder_channels(vec![2])
            .with_decoder_channels(vec![2]);
        let model = ColorizerModel::<TestBackend>::new(&config, &device);

        let result = load_checkpoint::<TestBackend, _>(model, "/nonexistent/model.bin", &device);
        assert!(matches!(result, Err(ModelError::CheckpointNotFound(_))));
    }

    #[test]
    fn save_load_roundtrip_preserves_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let stem = dir.path().join("model");
        let device = Default::default();

        let config = ColorizerModelConfig::new(4)
            .with_encoder_channels(vec![2, 4])
            .with_decoder_channels(vec![4, 2]);
        let model = ColorizerModel::<TestBackend>::new(&config, &device);

        let lightness = Tensor::<TestBackend, 4>::ones([1, 1, 8, 8], &device);
        let embedding = Tensor::<TestBackend, 2>::ones([1, 4], &device);
        let before: Vec<f32> = model
            .forward(lightness.clone(), embedding.clone())
            .into_data()
            .to_vec()
            .unwrap();

        let saved =
            save_checkpoint::<TestBackend, _>(&model, stem.to_str().unwrap(), CheckpointFormat::Binary)
                .unwrap();

        let fresh = ColorizerModel::<TestBackend>::new(&config, &device);
        let loaded = load_checkpoint::<TestBackend, _>(fresh, &saved, &device).unwrap();
        let after: Vec<f32> = loaded
            .forward(lightness, embedding)
            .into_data()
            .to_vec()
            .unwrap();

        assert_eq!(before.len(), after.len());
        for (a, b) in before.iter().zip(after.iter()) {
            assert!((a - b).abs() < 1e-6);
        }
    }
}
