//! Relative file sets.
//!
//! A [`RelativeFileSet`] is one logical bundle of application resources:
//! a base directory plus file paths relative to it (the main jar's
//! directory, a classpath directory, and so on). Immutable once built.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A base directory and an ordered set of paths relative to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelativeFileSet {
    base_dir: PathBuf,
    files: Vec<PathBuf>,
}

impl RelativeFileSet {
    /// Create a file set. Duplicate paths are dropped; first occurrence
    /// keeps its position.
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>, files: Vec<PathBuf>) -> Self {
        let mut deduped: Vec<PathBuf> = Vec::with_capacity(files.len());
        for file in files {
            if !deduped.contains(&file) {
                deduped.push(file);
            }
        }
        Self {
            base_dir: base_dir.into(),
            files: deduped,
        }
    }

    /// Create a file set holding a single file.
    #[must_use]
    pub fn single(base_dir: impl Into<PathBuf>, file: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            files: vec![file.into()],
        }
    }

    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// The included files, relative to [`base_dir`](Self::base_dir), in
    /// insertion order.
    #[must_use]
    pub fn included_files(&self) -> &[PathBuf] {
        &self.files
    }

    #[must_use]
    pub fn contains(&self, file: &Path) -> bool {
        self.files.iter().any(|f| f == file)
    }

    /// Resolve a relative entry against the base directory.
    #[must_use]
    pub fn resolve(&self, file: &Path) -> PathBuf {
        self.base_dir.join(file)
    }
}
