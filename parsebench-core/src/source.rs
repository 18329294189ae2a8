//! Canonical File Identity
//!
//! Per-file statistics are keyed by [`FileId`]: the file name followed by the
//! absolute path. The derived ordering compares the name first and breaks
//! ties on the path, so two distinct files never compare equal and the report
//! lists files alphabetically regardless of directory depth.

use std::fmt;
use std::path::{Path, PathBuf};

/// Immutable, totally ordered identity of a benchmarked file
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileId {
    // Field order drives the derived `Ord`.
    name: String,
    path: PathBuf,
}

impl FileId {
    /// Identity for an absolute path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { name, path }
    }

    /// File name used as the report label
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Whether the benchmark source is one file or a directory tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// A single readable file
    File,
    /// A directory scanned recursively
    Directory,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_from_path() {
        let id = FileId::new("/corpus/lib/a.js");
        assert_eq!(id.name(), "a.js");
        assert_eq!(id.path(), Path::new("/corpus/lib/a.js"));
        assert_eq!(id.to_string(), "a.js");
    }

    #[test]
    fn test_orders_by_name_then_path() {
        let mut ids = vec![
            FileId::new("/corpus/z/b.js"),
            FileId::new("/corpus/z/a.js"),
            FileId::new("/corpus/a/b.js"),
        ];
        ids.sort();

        let paths: Vec<_> = ids.iter().map(|id| id.path().to_path_buf()).collect();
        assert_eq!(
            paths,
            [
                PathBuf::from("/corpus/z/a.js"),
                PathBuf::from("/corpus/a/b.js"),
                PathBuf::from("/corpus/z/b.js"),
            ]
        );
    }

    #[test]
    fn test_same_name_distinct_paths_never_equal() {
        let a = FileId::new("/corpus/one/index.js");
        let b = FileId::new("/corpus/two/index.js");
        assert_eq!(a.name(), b.name());
        assert_ne!(a, b);
        assert!(a < b);
    }
}
