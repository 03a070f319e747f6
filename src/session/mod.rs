//! Session controller
//!
//! Acquires the working copy, walks it with the operator, and removes it
//! again on every exit path once it exists.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::Config;
use crate::domain::{ExcludedPaths, SkipAllLatch, TraversalStats};
use crate::fetch::{repo_name_from_url, RepositorySource};
use crate::prompt::Prompter;
use crate::render::{open_output_sink, Emitter};
use crate::traverse::{DirectoryListing, Traversal};
use crate::utils::resolve_path;

/// Result of a completed session
#[derive(Debug, Clone)]
pub struct SessionReport {
    /// Output sink the blocks were appended to
    pub output: PathBuf,

    /// Working copy that was walked (already removed)
    pub working_copy: PathBuf,

    pub stats: TraversalStats,
}

/// Removes the working copy when dropped, including during unwinding.
struct WorkingCopy {
    path: PathBuf,
}

impl Drop for WorkingCopy {
    fn drop(&mut self) {
        info!("Cleaning up cloned repository");
        if let Err(err) = fs::remove_dir_all(&self.path) {
            if self.path.exists() {
                warn!("Failed to remove {}: {}", self.path.display(), err);
            }
        }
    }
}

pub struct Session<S, L, P> {
    config: Config,
    cwd: PathBuf,
    source: S,
    listing: L,
    prompter: P,
    excluded: Vec<PathBuf>,
}

impl<S, L, P> Session<S, L, P>
where
    S: RepositorySource,
    L: DirectoryListing,
    P: Prompter,
{
    /// Relative paths in `config` resolve against `cwd`.
    pub fn new(config: Config, cwd: impl Into<PathBuf>, source: S, listing: L, prompter: P) -> Self {
        Self { config, cwd: cwd.into(), source, listing, prompter, excluded: Vec::new() }
    }

    /// Never emit or prompt for `path` (absolute, or relative to `cwd`).
    ///
    /// The CLI passes the tool's own installed executable, so a repository
    /// that vendors the running binary (or a working copy placed around it
    /// with `--workdir`) never offers it for extraction.
    pub fn exclude(mut self, path: impl Into<PathBuf>) -> Self {
        self.excluded.push(path.into());
        self
    }

    /// Run the whole session. The prompter is released when this returns.
    pub fn run(self) -> Result<SessionReport> {
        let Session { config, cwd, source, listing, mut prompter, excluded } = self;
        config.validate()?;

        let url = config.repo_url()?;
        let parent = config.workdir.as_deref().map_or_else(|| cwd.clone(), |w| absolutize(&cwd, w));
        let root = resolve_path(&parent.join(repo_name_from_url(url)?));
        let output = resolve_path(&absolutize(&cwd, &config.output));

        // The working copy is deleted on exit, taking anything inside it along.
        if output.starts_with(&root) {
            anyhow::bail!(
                "Output file {} is inside the working copy {}, which is removed when the run ends",
                output.display(),
                root.display()
            );
        }

        info!("Starting to process repository: {}", url);
        source.acquire(url, &root).context("Failed to clone/pull repository")?;
        let _working_copy = WorkingCopy { path: root.clone() };

        let mut excluded: ExcludedPaths =
            excluded.iter().map(|p| resolve_path(&absolutize(&cwd, p))).collect();
        if !config.include_git_dir {
            excluded.insert(root.join(".git"));
        }

        let sink = open_output_sink(&output)
            .with_context(|| format!("Failed to open output file {}", output.display()))?;
        let mut emitter = Emitter::new(&root, sink);
        let mut latch = SkipAllLatch::new();

        info!("Starting interactive file selection...");
        let stats = Traversal::new(&listing, &mut prompter, &mut emitter, &excluded, &mut latch)
            .run(&root)
            .context("Interactive selection failed")?;

        info!(
            prompts = stats.prompts,
            files_emitted = stats.files_emitted,
            files_skipped = stats.files_skipped,
            folders_skipped = stats.folders_skipped,
            files_unreadable = stats.files_unreadable,
            bytes_written = stats.bytes_written,
            skip_all = latch.is_set(),
            "selection complete"
        );

        Ok(SessionReport { output, working_copy: root, stats })
    }
}

fn absolutize(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}
