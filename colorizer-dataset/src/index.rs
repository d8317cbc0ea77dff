//! Dataset directory indexing.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DatasetError, Result};

/// File extensions treated as decodable images.
const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

/// A deterministic listing of the image files in a dataset directory.
///
/// Files are sorted by path so the same directory always yields the
/// same ordering, which keeps seeded shuffles and splits reproducible.
///
/// # Example
///
/// ```no_run
/// use colorizer_dataset::DatasetIndex;
///
/// let index = DatasetIndex::scan("data/train")?;
/// println!("found {} images", index.len());
/// # Ok::<(), colorizer_dataset::DatasetError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetIndex {
    root: PathBuf,
    files: Vec<PathBuf>,
}

impl DatasetIndex {
    /// Scans a directory (non-recursively) for image files.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::Io` if the directory cannot be read, or
    /// `DatasetError::EmptyDataset` if no image files are found.
    pub fn scan(dir: impl AsRef<Path>) -> Result<Self> {
        let root = dir.as_ref().to_path_buf();
        let entries = fs::read_dir(&root)
            .map_err(|e| DatasetError::io(format!("{}: {e}", root.display())))?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| DatasetError::io(e.to_string()))?;
            let path = entry.path();
            if path.is_file() && is_image_file(&path) {
                files.push(path);
            }
        }

        if files.is_empty() {
            return Err(DatasetError::empty_dataset(root.display().to_string()));
        }

        files.sort_unstable();

        Ok(Self { root, files })
    }

    /// Returns the scanned root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the indexed file paths, sorted.
    #[must_use]
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Returns the number of indexed files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if no files were indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Consumes the index, returning the file list.
    #[must_use]
    pub fn into_files(self) -> Vec<PathBuf> {
        self.files
    }
}

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    fn touch(dir: &Path, name: &str) {
        let mut file = File::create(dir.join(name)).unwrap();
        file.write_all(b"x").unwrap();
    }

    #[test]
    fn scan_finds_sorted_images() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "b.png");
        touch(dir.path(), "a.jpg");
        touch(dir.path(), "c.JPEG");
        touch(dir.path(), "notes.txt");

        let index = DatasetIndex::scan(dir.path()).unwrap();
        assert_eq!(index.len(), 3);

        let names: Vec<_> = index
            .files()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.png", "c.JPEG"]);
    }

    #[test]
    fn scan_ignores_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.png");
        fs::create_dir(dir.path().join("nested.png")).unwrap();

        let index = DatasetIndex::scan(dir.path()).unwrap();
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn scan_empty_directory_is_error() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "readme.md");

        let result = DatasetIndex::scan(dir.path());
        assert!(matches!(result, Err(DatasetError::EmptyDataset(_))));
    }

    #[test]
    fn scan_missing_directory_is_io_error() {
        let result = DatasetIndex::scan("/nonexistent/colorizer-dataset-test");
        assert!(matches!(result, Err(DatasetError::Io(_))));
    }

    #[test]
    fn into_files_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "2.png");
        touch(dir.path(), "1.png");

        let index = DatasetIndex::scan(dir.path()).unwrap();
        let files = index.into_files();
        assert!(files[0] < files[1]);
    }
}
