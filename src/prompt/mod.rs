//! Interactive prompt protocol
//!
//! One line of input per question; anything other than the four accepted
//! tokens re-asks in place. A closed or failing input stream answers `no`.

use std::io::{self, BufRead, StdinLock, Stdout, Write};
use tracing::{debug, warn};

use crate::domain::{Decision, EntryKind};

pub const INVALID_RESPONSE: &str =
    "Invalid response. Please enter 'yes', 'no', 'folder', or 'skip-all'.";

/// Source of operator decisions. The only blocking call in a session.
pub trait Prompter {
    fn ask(&mut self, display_path: &str, kind: EntryKind) -> Decision;
}

/// Line-oriented prompter over any reader/writer pair.
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
    closed: bool,
}

impl LinePrompter<StdinLock<'static>, Stdout> {
    /// Prompter bound to the process's standard input and output.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output, closed: false }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn write_prompt(&mut self, display_path: &str, kind: EntryKind) -> io::Result<()> {
        writeln!(self.output, "Include this {kind}? (yes/no/folder/skip-all): {display_path}")?;
        self.output.flush()
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn ask(&mut self, display_path: &str, kind: EntryKind) -> Decision {
        if self.closed {
            debug!(path = display_path, "input closed, skipping without prompt");
            return Decision::Skip;
        }

        loop {
            if let Err(err) = self.write_prompt(display_path, kind) {
                warn!("Could not write prompt for {}: {}; skipping", display_path, err);
                return Decision::Skip;
            }

            let mut line = Vec::new();
            match self.input.read_until(b'\n', &mut line) {
                Ok(0) => {
                    warn!("Input closed; skipping {} and every remaining entry", display_path);
                    self.closed = true;
                    return Decision::Skip;
                }
                Ok(_) => {}
                Err(err) => {
                    warn!("Error reading input: {}; skipping {}", err, display_path);
                    return Decision::Skip;
                }
            }

            // Undecodable bytes are a bad answer, not a broken stream.
            let (answer, _, _) = encoding_rs::UTF_8.decode(&line);
            match answer.parse::<Decision>() {
                Ok(decision) => return decision,
                Err(reason) => {
                    debug!(path = display_path, %reason, "re-prompting");
                    if writeln!(self.output, "{INVALID_RESPONSE}").is_err() {
                        return Decision::Skip;
                    }
                }
            }
        }
    }
}
