//! HTML → Pug conversion engine.
//!
//! The engine is three small parts layered leaf-first:
//!
//! - `output`: indentation state and line buffering ([`StringOutput`],
//!   [`StreamOutput`])
//! - `writer`: per-node formatting rules ([`Writer`])
//! - `convert`: the recursive node dispatcher ([`Converter`])
//!
//! [`convert()`] ties them together for the common case.

pub mod convert;
pub mod escape;
pub mod output;
pub mod writer;

pub use convert::Converter;
pub use escape::{encode_entities, split_text_lines};
pub use output::{Output, StreamOutput, StringOutput};
pub use writer::{TextContext, Writer, is_identifier};

use std::io;

use crate::dom::parse_document;
use crate::error::Result;

/// Default maximum line length before text wrapping.
pub const DEFAULT_WRAP_LENGTH: usize = 80;

/// Default number of spaces per indentation level.
pub const DEFAULT_INDENT_SPACES: usize = 2;

/// Per-conversion configuration.
///
/// Invalid values are normalized rather than rejected: a zero
/// `indent_spaces` or `wrap_length` falls back to the default.
#[derive(Debug, Clone)]
pub struct Options {
    /// Indent with one tab per level instead of spaces.
    pub use_tabs: bool,
    /// Spaces per indentation level when not using tabs.
    pub indent_spaces: usize,
    /// Render `<head>` and its children instead of dropping them.
    pub keep_head: bool,
    /// Skip the `<html>`/`<body>` wrapper elements.
    pub bodyless: bool,
    /// Emit `:javascript`/`:css` filter blocks for inline scripts/styles.
    pub scalate: bool,
    /// Maximum line length before text wrapping.
    pub wrap_length: usize,
    /// Separate attributes with spaces instead of `, `.
    pub no_attr_comma: bool,
    /// Prefer double quotes for attribute values.
    pub double_quotes: bool,
    /// Drop piped lines whose content is blank.
    pub no_empty_pipe: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            use_tabs: false,
            indent_spaces: DEFAULT_INDENT_SPACES,
            keep_head: false,
            bodyless: false,
            scalate: false,
            wrap_length: DEFAULT_WRAP_LENGTH,
            no_attr_comma: false,
            double_quotes: false,
            no_empty_pipe: false,
        }
    }
}

/// How one text fragment is rendered. Callers construct a fresh value per
/// invocation; the writer never mutates it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextOptions {
    /// Encode HTML entity references (`&`, `<`, `>`, quotes).
    pub encode_entities: bool,
    /// Prefix each line with the `| ` text marker.
    pub pipe: bool,
    /// Trim surrounding whitespace from each line.
    pub trim: bool,
    /// Word-wrap lines longer than the configured wrap length.
    pub wrap: bool,
    /// Double backslashes so they survive the template engine.
    pub escape_backslash: bool,
}

/// Convert an HTML document to Pug source text.
///
/// # Examples
///
/// ```
/// use pugify::{Options, convert};
///
/// let pug = convert("<p>hello world</p>", &Options::default());
/// assert_eq!(pug, "html\n  body\n    p hello world\n");
/// ```
pub fn convert(html: &str, options: &Options) -> String {
    let mut dom = parse_document(html);
    let converter = Converter::new(options);
    let mut output = StringOutput::new(options);
    converter.document(&mut dom, &mut output);
    output.finish()
}

/// Convert an HTML document to Pug, streaming lines into `writer`.
///
/// Produces byte-identical output to [`convert`]. Returns the writer, or
/// the first write error encountered.
pub fn convert_to_writer<W: io::Write>(html: &str, options: &Options, writer: W) -> Result<W> {
    let mut dom = parse_document(html);
    let converter = Converter::new(options);
    let mut output = StreamOutput::new(options, writer);
    converter.document(&mut dom, &mut output);
    output.finish()
}
