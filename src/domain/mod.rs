//! Core domain types
//!
//! Entries discovered while walking the working copy, the operator's
//! decisions about them, and the per-session state shared by every level
//! of the walk.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::utils::normalize_lexically;

/// Kind of a filesystem entry as presented to the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Folder,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::File => f.write_str("file"),
            EntryKind::Folder => f.write_str("folder"),
        }
    }
}

/// A path found in a directory listing. Never cached between listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilesystemEntry {
    /// Absolute path to the entry
    pub path: PathBuf,

    /// File or folder
    pub kind: EntryKind,
}

impl FilesystemEntry {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), kind: EntryKind::File }
    }

    pub fn folder(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), kind: EntryKind::Folder }
    }
}

/// Answer given by the operator for a single entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// `yes`: emit the file, or descend into the folder with prompts
    Include,

    /// `no`: leave the entry out
    Skip,

    /// `folder`: emit every file beneath the folder without prompting
    IncludeSubtree,

    /// `skip-all`: leave out this entry and everything after it
    SkipAll,
}

impl FromStr for Decision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" => Ok(Decision::Include),
            "no" => Ok(Decision::Skip),
            "folder" => Ok(Decision::IncludeSubtree),
            "skip-all" => Ok(Decision::SkipAll),
            other => Err(format!("unrecognized response '{other}'")),
        }
    }
}

/// One-way flag raised by the first `skip-all` answer.
///
/// Once set it stays set for the rest of the session; every recursion level
/// holds the same instance by reference and checks it before each entry.
#[derive(Debug, Default)]
pub struct SkipAllLatch {
    set: bool,
}

impl SkipAllLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self) {
        self.set = true;
    }

    pub fn is_set(&self) -> bool {
        self.set
    }
}

/// Absolute paths that are never emitted or prompted for.
///
/// Paths are compared after lexical normalization, so `a/../a/x` matches `a/x`.
#[derive(Debug, Clone, Default)]
pub struct ExcludedPaths {
    paths: HashSet<PathBuf>,
}

impl ExcludedPaths {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>) {
        let path: PathBuf = path.into();
        self.paths.insert(normalize_lexically(&path));
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(&normalize_lexically(path))
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl<P: Into<PathBuf>> FromIterator<P> for ExcludedPaths {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        let mut excluded = Self::new();
        for path in iter {
            excluded.insert(path);
        }
        excluded
    }
}

/// Counters collected over one traversal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraversalStats {
    /// Prompts answered (invalid re-prompts not counted)
    pub prompts: usize,

    /// Files whose block was appended to the output
    pub files_emitted: usize,

    /// Files left out by decision or exclusion
    pub files_skipped: usize,

    /// Folders left out by decision or exclusion
    pub folders_skipped: usize,

    /// Files that could not be read as text
    pub files_unreadable: usize,

    /// Bytes appended to the output sink
    pub bytes_written: u64,
}
