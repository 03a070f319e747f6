//! Directory listing capability used by the traversal

use std::path::Path;
use walkdir::WalkDir;

use super::TraverseError;
use crate::domain::{EntryKind, FilesystemEntry};

/// Lists the immediate children of a directory.
pub trait DirectoryListing {
    fn list(&self, dir: &Path) -> Result<Vec<FilesystemEntry>, TraverseError>;
}

/// Lists the real filesystem, sorted by file name.
///
/// Symbolic links are reported as files and never descended into.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsListing;

impl DirectoryListing for FsListing {
    fn list(&self, dir: &Path) -> Result<Vec<FilesystemEntry>, TraverseError> {
        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name();

        let mut entries = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| TraverseError::Listing {
                path: dir.to_path_buf(),
                source: e.into(),
            })?;
            let kind =
                if entry.file_type().is_dir() { EntryKind::Folder } else { EntryKind::File };
            entries.push(FilesystemEntry { path: entry.into_path(), kind });
        }
        Ok(entries)
    }
}
