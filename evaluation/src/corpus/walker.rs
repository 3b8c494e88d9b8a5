//! Corpus walker: descriptor discovery using the `ignore` crate

use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::CorpusError;

/// File name that marks a sample directory.
pub const DESCRIPTOR_FILE_NAME: &str = "sample_metadata.yaml";

/// Walks a corpus directory for sample descriptors.
#[derive(Debug, Clone)]
pub struct CorpusWalker {
    root: PathBuf,
}

impl CorpusWalker {
    /// Open a corpus rooted at `root`. Fails if `root` is not an existing
    /// directory.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, CorpusError> {
        let root = root.as_ref();
        if !root.exists() {
            return Err(CorpusError::NotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(CorpusError::NotADirectory(root.to_path_buf()));
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Lazily yield every descriptor under the root.
    ///
    /// Every directory is visited, hidden ones included, and no ignore files
    /// are honored. Entries are sorted by name within each directory so the
    /// order is stable on an unchanged tree. A symlink named like a
    /// descriptor is yielded unless it points at a directory; a dangling
    /// link then fails at the descriptor stage instead of vanishing.
    pub fn descriptors(&self) -> impl Iterator<Item = PathBuf> {
        WalkBuilder::new(&self.root)
            .standard_filters(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build()
            .filter_map(|entry| match entry {
                Ok(entry) => {
                    let is_file = entry.file_type().is_some_and(|t| {
                        t.is_file() || (t.is_symlink() && !entry.path().is_dir())
                    });
                    (is_file && entry.file_name() == DESCRIPTOR_FILE_NAME)
                        .then(|| entry.into_path())
                }
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable corpus entry");
                    None
                }
            })
    }
}
