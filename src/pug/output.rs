//! Indentation-aware output sinks.
//!
//! A conversion walk writes through the [`Output`] trait. Indentation is a
//! small state machine: `enter` pushes one indent unit, `leave` pops one.
//! Every `enter` on a walk path is paired with exactly one `leave`, so the
//! depth after a subtree equals the depth before it.

use std::io;

use crate::error::{Error, Result};

use super::{DEFAULT_INDENT_SPACES, Options};

/// Indentation state shared by the sink implementations.
#[derive(Debug, Clone)]
struct Indent {
    unit: String,
    current: String,
}

impl Indent {
    fn new(options: &Options) -> Self {
        let unit = if options.use_tabs {
            "\t".to_string()
        } else {
            let spaces = if options.indent_spaces == 0 {
                DEFAULT_INDENT_SPACES
            } else {
                options.indent_spaces
            };
            " ".repeat(spaces)
        };
        Self {
            unit,
            current: String::new(),
        }
    }

    fn enter(&mut self) {
        self.current.push_str(&self.unit);
    }

    fn leave(&mut self) {
        let len = self.current.len().saturating_sub(self.unit.len());
        self.current.truncate(len);
    }

    fn as_str(&self) -> &str {
        &self.current
    }
}

/// Sink for conversion output.
pub trait Output {
    /// Push one indentation level.
    fn enter(&mut self);

    /// Pop one indentation level. Guarded: a leave at depth zero is a no-op.
    fn leave(&mut self);

    /// The current indentation string.
    fn indents(&self) -> &str;

    /// Append raw text, optionally prefixed with the current indent.
    /// No trailing newline is added.
    fn write(&mut self, data: &str, indent: bool);

    /// Append one line of text with a trailing newline. Lines that are blank
    /// after trimming ASCII spaces are silently dropped.
    fn write_line(&mut self, data: &str, indent: bool);
}

/// Returns true for lines the sinks drop: empty or spaces-only.
///
/// Only ASCII spaces count; a tabs-only line is kept.
fn is_blank(data: &str) -> bool {
    data.trim_matches(' ').is_empty()
}

/// Sink that accumulates fragments in memory.
pub struct StringOutput {
    indent: Indent,
    fragments: Vec<String>,
}

impl StringOutput {
    pub fn new(options: &Options) -> Self {
        Self {
            indent: Indent::new(options),
            fragments: Vec::new(),
        }
    }

    /// Join the buffered fragments into the final string.
    ///
    /// Consumes the sink: a conversion finalizes exactly once.
    pub fn finish(self) -> String {
        self.fragments.concat()
    }
}

impl Output for StringOutput {
    fn enter(&mut self) {
        self.indent.enter();
    }

    fn leave(&mut self) {
        self.indent.leave();
    }

    fn indents(&self) -> &str {
        self.indent.as_str()
    }

    fn write(&mut self, data: &str, indent: bool) {
        if indent {
            self.fragments
                .push(format!("{}{}", self.indent.as_str(), data));
        } else {
            self.fragments.push(data.to_string());
        }
    }

    fn write_line(&mut self, data: &str, indent: bool) {
        if is_blank(data) {
            return;
        }
        if indent {
            self.fragments
                .push(format!("{}{}\n", self.indent.as_str(), data));
        } else {
            self.fragments.push(format!("{data}\n"));
        }
    }
}

/// Sink that streams lines to an [`io::Write`] as they are produced.
///
/// Write failures are sticky: the first error stops all further output and
/// is surfaced by [`StreamOutput::finish`].
pub struct StreamOutput<W: io::Write> {
    indent: Indent,
    writer: W,
    error: Option<io::Error>,
}

impl<W: io::Write> StreamOutput<W> {
    pub fn new(options: &Options, writer: W) -> Self {
        Self {
            indent: Indent::new(options),
            writer,
            error: None,
        }
    }

    fn put(&mut self, data: &str) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.writer.write_all(data.as_bytes()) {
            self.error = Some(e);
        }
    }

    /// Flush the underlying writer and return it, or the first write error.
    pub fn finish(mut self) -> Result<W> {
        if let Some(e) = self.error {
            return Err(Error::Io(e));
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: io::Write> Output for StreamOutput<W> {
    fn enter(&mut self) {
        self.indent.enter();
    }

    fn leave(&mut self) {
        self.indent.leave();
    }

    fn indents(&self) -> &str {
        self.indent.as_str()
    }

    fn write(&mut self, data: &str, indent: bool) {
        if indent {
            let prefixed = format!("{}{}", self.indent.as_str(), data);
            self.put(&prefixed);
        } else {
            self.put(data);
        }
    }

    fn write_line(&mut self, data: &str, indent: bool) {
        if is_blank(data) {
            return;
        }
        let line = if indent {
            format!("{}{}\n", self.indent.as_str(), data)
        } else {
            format!("{data}\n")
        };
        self.put(&line);
    }
}
