//! Output rendering: appends delimited file blocks to the output sink

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::traverse::TraverseError;
use crate::utils::display_relative;

/// Why a file's content could not be emitted
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("content is not valid UTF-8 text")]
    NotText,
}

/// Outcome of a single emission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emission {
    /// A complete block was appended
    Written { bytes: u64 },

    /// The file could not be read as text; nothing was appended
    Unreadable,
}

/// Appends file blocks, labelled relative to the repository root.
pub struct Emitter<W: Write> {
    root: PathBuf,
    sink: W,
}

impl<W: Write> Emitter<W> {
    pub fn new(root: impl Into<PathBuf>, sink: W) -> Self {
        Self { root: root.into(), sink }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read `path` and append its block.
    ///
    /// Read failures are recoverable and leave the sink untouched. Sink
    /// failures are returned as errors.
    pub fn emit(&mut self, path: &Path) -> Result<Emission, TraverseError> {
        let relative = display_relative(&self.root, path);

        let content = match read_text(path) {
            Ok(content) => content,
            Err(err) => {
                warn!("Could not read {} as text file: {}", relative, err);
                return Ok(Emission::Unreadable);
            }
        };

        let block = render_block(&relative, &content);
        self.sink
            .write_all(block.as_bytes())
            .and_then(|()| self.sink.flush())
            .map_err(TraverseError::Sink)?;
        debug!(path = %relative, bytes = block.len(), "appended file block");

        Ok(Emission::Written { bytes: block.len() as u64 })
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

/// Format one file block. The whole block is built before anything is
/// written so a failed read never leaves a partial block behind.
pub fn render_block(relative_path: &str, content: &str) -> String {
    format!(
        "----------  FILE: {relative_path}  ----------\n\
         {content}\n\
         ----------  END FILE: {relative_path}  ----------\n\n"
    )
}

/// Read a file as strict UTF-8: no BOM handling, no replacement characters.
pub fn read_text(path: &Path) -> Result<String, ReadError> {
    let bytes = fs::read(path)?;
    encoding_rs::UTF_8
        .decode_without_bom_handling_and_without_replacement(&bytes)
        .map(|text| text.into_owned())
        .ok_or(ReadError::NotText)
}

/// Open the output file for appending, creating it if needed.
pub fn open_output_sink(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}
