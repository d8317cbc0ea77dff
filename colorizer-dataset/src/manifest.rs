//! Dataset manifest metadata.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{DatasetError, Result};

/// Metadata describing a preprocessed dataset.
///
/// Written next to checkpoints so a training run records exactly which
/// files it saw and at what resolution they were preprocessed.
///
/// # Example
///
/// ```
/// use colorizer_dataset::DatasetManifest;
///
/// let manifest = DatasetManifest::new("flowers", 128)
///     .with_description("field test set")
///     .with_files(vec!["a.png".into(), "b.png".into()]);
///
/// assert!(manifest.validate().is_ok());
/// assert_eq!(manifest.sample_count, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetManifest {
    /// Dataset name.
    pub name: String,

    /// Number of samples listed.
    pub sample_count: usize,

    /// Square resolution samples were preprocessed to.
    pub target_resolution: u32,

    /// Relative paths of the member files.
    pub files: Vec<String>,

    /// Creation timestamp (RFC 3339 or free-form).
    pub created_at: String,

    /// Optional free-form description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl DatasetManifest {
    /// Creates a new empty manifest.
    #[must_use]
    pub fn new(name: impl Into<String>, target_resolution: u32) -> Self {
        Self {
            name: name.into(),
            sample_count: 0,
            target_resolution,
            files: Vec::new(),
            created_at: String::new(),
            description: String::new(),
        }
    }

    /// Sets the file list and the sample count to match.
    #[must_use]
    pub fn with_files(mut self, files: Vec<String>) -> Self {
        self.sample_count = files.len();
        self.files = files;
        self
    }

    /// Sets the creation timestamp.
    #[must_use]
    pub fn with_created_at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = created_at.into();
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Validates internal consistency.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::InvalidManifest` if the name is empty,
    /// the resolution is zero, or the sample count disagrees with the
    /// file list.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(DatasetError::invalid_manifest("name is empty"));
        }
        if self.target_resolution == 0 {
            return Err(DatasetError::invalid_manifest(
                "target resolution must be > 0",
            ));
        }
        if self.sample_count != self.files.len() {
            return Err(DatasetError::invalid_manifest(format!(
                "sample count {} does not match file list length {}",
                self.sample_count,
                self.files.len()
            )));
        }
        Ok(())
    }

    /// Serializes the manifest to pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::Serialization` on failure.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserializes a manifest from JSON and validates it.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::Serialization` if the JSON is malformed,
    /// or `DatasetError::InvalidManifest` if the content is
    /// inconsistent.
    pub fn from_json(json: &str) -> Result<Self> {
        let manifest: Self = serde_json::from_str(json)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Writes the manifest to a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::Io` or `DatasetError::Serialization` on
    /// failure.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = self.to_json()?;
        fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Reads and validates a manifest from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::Io`, `DatasetError::Serialization`, or
    /// `DatasetError::InvalidManifest` on failure.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path.as_ref())?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_manifest() -> DatasetManifest {
        DatasetManifest::new("test-set", 128)
            .with_files(vec!["a.png".into(), "b.jpg".into()])
            .with_created_at("2026-08-01T00:00:00Z")
            .with_description("two files")
    }

    #[test]
    fn manifest_validate_ok() {
        assert!(sample_manifest().validate().is_ok());
    }

    #[test]
    fn manifest_rejects_empty_name() {
        let manifest = DatasetManifest::new("", 128);
        assert!(manifest.validate().is_err());
    }

    #[test]
    fn manifest_rejects_zero_resolution() {
        let manifest = DatasetManifest::new("x", 0);
        assert!(manifest.validate().is_err());
    }

    #[test]
    fn manifest_rejects_count_mismatch() {
        let mut manifest = sample_manifest();
        manifest.sample_count = 5;
        assert!(matches!(
            manifest.validate(),
            Err(DatasetError::InvalidManifest(_))
        ));
    }

    #[test]
    fn manifest_json_roundtrip() {
        let manifest = sample_manifest();
        let json = manifest.to_json().unwrap();
        let restored = DatasetManifest::from_json(&json).unwrap();
        assert_eq!(restored, manifest);
    }

    #[test]
    fn manifest_from_json_validates() {
        let json = r#"{
            "name": "bad",
            "sample_count": 3,
            "target_resolution": 128,
            "files": ["only-one.png"],
            "created_at": ""
        }"#;
        assert!(DatasetManifest::from_json(json).is_err());
    }

    #[test]
    fn manifest_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");

        let manifest = sample_manifest();
        manifest.save(&path).unwrap();

        let restored = DatasetManifest::load(&path).unwrap();
        assert_eq!(restored, manifest);
    }

    #[test]
    fn manifest_load_missing_file() {
        let result = DatasetManifest::load("/nonexistent/manifest.json");
        assert!(matches!(result, Err(DatasetError::Io(_))));
    }
}
