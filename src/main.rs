//! repo-extract: interactively pick repository files into one text dump
//!
//! Clones a repository, walks it asking about each file and folder, and
//! appends every chosen file to a single output annotated with file markers.

use anyhow::Result;

fn main() -> Result<()> {
    repo_extract::cli::run()
}
