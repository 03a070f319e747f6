//! Interactive traversal engine
//!
//! Depth-first walk of the working copy in listing order. Each folder and
//! file is put to the operator; `folder` bulk-includes a subtree without
//! further questions, and `skip-all` raises the session latch, which every
//! level checks before touching the next entry.

pub mod listing;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub use listing::{DirectoryListing, FsListing};

use crate::domain::{
    Decision, EntryKind, ExcludedPaths, FilesystemEntry, SkipAllLatch, TraversalStats,
};
use crate::prompt::Prompter;
use crate::render::{Emission, Emitter};
use crate::utils::display_relative;

/// Fatal traversal failures. Unreadable files are not errors.
#[derive(Debug, Error)]
pub enum TraverseError {
    #[error("failed to list directory {}", path.display())]
    Listing {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write to output sink")]
    Sink(#[source] io::Error),
}

/// One walk over a directory tree, bound to a single session's collaborators.
pub struct Traversal<'a, L, P, W>
where
    L: DirectoryListing,
    P: Prompter,
    W: Write,
{
    listing: &'a L,
    prompter: &'a mut P,
    emitter: &'a mut Emitter<W>,
    excluded: &'a ExcludedPaths,
    latch: &'a mut SkipAllLatch,
    stats: TraversalStats,
}

impl<'a, L, P, W> Traversal<'a, L, P, W>
where
    L: DirectoryListing,
    P: Prompter,
    W: Write,
{
    pub fn new(
        listing: &'a L,
        prompter: &'a mut P,
        emitter: &'a mut Emitter<W>,
        excluded: &'a ExcludedPaths,
        latch: &'a mut SkipAllLatch,
    ) -> Self {
        Self { listing, prompter, emitter, excluded, latch, stats: TraversalStats::default() }
    }

    /// Walk `root` with prompts and return what happened.
    pub fn run(mut self, root: &Path) -> Result<TraversalStats, TraverseError> {
        self.traverse(root)?;
        Ok(self.stats)
    }

    fn traverse(&mut self, dir: &Path) -> Result<(), TraverseError> {
        if self.latch.is_set() {
            return Ok(());
        }

        for entry in self.listing.list(dir)? {
            // A skip-all answered for a sibling (or anywhere below one) ends this listing.
            if self.latch.is_set() {
                return Ok(());
            }
            if self.excluded.contains(&entry.path) {
                self.skip_excluded(&entry);
                continue;
            }

            match (entry.kind, self.ask(&entry)) {
                (EntryKind::Folder, Decision::Include) => self.traverse(&entry.path)?,
                (EntryKind::Folder, Decision::IncludeSubtree) => {
                    self.include_subtree(&entry.path)?;
                }
                // No subtree behind a file, so `folder` means the file itself.
                (EntryKind::File, Decision::Include | Decision::IncludeSubtree) => {
                    self.emit(&entry.path)?;
                }
                (_, Decision::Skip | Decision::SkipAll) => self.skip(&entry),
            }
        }
        Ok(())
    }

    /// Emit every file beneath `dir` without prompting.
    fn include_subtree(&mut self, dir: &Path) -> Result<(), TraverseError> {
        if self.latch.is_set() {
            return Ok(());
        }
        info!("Processing all files within folder {}", self.display(dir));

        for entry in self.listing.list(dir)? {
            if self.excluded.contains(&entry.path) {
                self.skip_excluded(&entry);
                continue;
            }
            match entry.kind {
                EntryKind::Folder => self.include_subtree(&entry.path)?,
                EntryKind::File => self.emit(&entry.path)?,
            }
        }
        Ok(())
    }

    fn ask(&mut self, entry: &FilesystemEntry) -> Decision {
        let shown = self.display(&entry.path);
        let decision = self.prompter.ask(&shown, entry.kind);
        self.stats.prompts += 1;

        if decision == Decision::SkipAll {
            self.latch.set();
            info!("Skipping {} and everything after it", shown);
        }
        decision
    }

    fn emit(&mut self, path: &Path) -> Result<(), TraverseError> {
        info!("Appending file content: {}", self.display(path));
        match self.emitter.emit(path)? {
            Emission::Written { bytes } => {
                self.stats.files_emitted += 1;
                self.stats.bytes_written += bytes;
            }
            Emission::Unreadable => self.stats.files_unreadable += 1,
        }
        Ok(())
    }

    fn skip(&mut self, entry: &FilesystemEntry) {
        if !self.latch.is_set() {
            info!("Skipping {}: {}", entry.kind, self.display(&entry.path));
        }
        self.count_skipped(entry.kind);
    }

    fn skip_excluded(&mut self, entry: &FilesystemEntry) {
        debug!(path = %entry.path.display(), "excluded");
        self.count_skipped(entry.kind);
    }

    fn count_skipped(&mut self, kind: EntryKind) {
        match kind {
            EntryKind::File => self.stats.files_skipped += 1,
            EntryKind::Folder => self.stats.folders_skipped += 1,
        }
    }

    fn display(&self, path: &Path) -> String {
        display_relative(self.emitter.root(), path)
    }
}
