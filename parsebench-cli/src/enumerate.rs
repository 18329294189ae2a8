//! Source File Enumeration
//!
//! Resolves the benchmark source once, then hands out a fresh lazy walk for
//! every pass. Directory entries are visited in file-name order without
//! following links, so a fixed tree always yields the same files in the same
//! order. The tree must not change between passes; nothing here can detect
//! that it did.

use parsebench_core::{ConfigError, FileId, SourceKind};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Fault while walking the source tree
#[derive(Debug, Error)]
pub enum EnumerateError {
    /// Directory walk failed
    #[error("Failed to enumerate source files: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Deterministic producer of the files to benchmark
#[derive(Debug, Clone)]
pub struct FileEnumerator {
    root: PathBuf,
    extension: String,
    kind: SourceKind,
}

impl FileEnumerator {
    /// Resolve `root`, failing if it does not exist or cannot be read.
    ///
    /// `extension` filters directory scans (case-insensitive, leading dot
    /// optional); a single-file source is taken as is.
    pub fn new(root: impl AsRef<Path>, extension: &str) -> Result<Self, ConfigError> {
        let given = root.as_ref();
        let unreadable = |source| ConfigError::SourceUnreadable {
            path: given.to_path_buf(),
            source,
        };

        let root = given.canonicalize().map_err(unreadable)?;
        let kind = if root.is_dir() {
            std::fs::read_dir(&root).map_err(unreadable)?;
            SourceKind::Directory
        } else {
            std::fs::File::open(&root).map_err(unreadable)?;
            SourceKind::File
        };

        tracing::debug!(root = %root.display(), ?kind, "resolved benchmark source");
        Ok(Self {
            root,
            extension: extension.trim_start_matches('.').to_string(),
            kind,
        })
    }

    /// Canonical absolute source path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File or directory
    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    /// Last component of the source path, as shown in reports
    pub fn source_name(&self) -> String {
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.root.display().to_string())
    }

    /// Start a new walk over the source
    pub fn files(&self) -> SourceFiles {
        let state = match self.kind {
            SourceKind::File => Walk::Single(Some(self.root.clone())),
            SourceKind::Directory => Walk::Tree(
                WalkDir::new(&self.root)
                    .follow_links(false)
                    .sort_by_file_name()
                    .into_iter(),
            ),
        };
        SourceFiles {
            state,
            extension: self.extension.clone(),
        }
    }
}

enum Walk {
    Single(Option<PathBuf>),
    Tree(walkdir::IntoIter),
}

/// One lazy pass over the source files
pub struct SourceFiles {
    state: Walk,
    extension: String,
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
}

impl Iterator for SourceFiles {
    type Item = Result<FileId, EnumerateError>;

    fn next(&mut self) -> Option<Self::Item> {
        let walk = match &mut self.state {
            Walk::Single(path) => return path.take().map(|p| Ok(FileId::new(p))),
            Walk::Tree(walk) => walk,
        };
        loop {
            let entry = match walk.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(e.into())),
            };
            if entry.file_type().is_file() && has_extension(entry.path(), &self.extension) {
                return Some(Ok(FileId::new(entry.into_path())));
            }
        }
    }
}

impl std::fmt::Debug for SourceFiles {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceFiles")
            .field("extension", &self.extension)
            .finish_non_exhaustive()
    }
}
