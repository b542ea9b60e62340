//! # pugify
//!
//! A fast, lightweight library for converting HTML documents to Pug
//! (formerly Jade) template source.
//!
//! ## Features
//!
//! - Tag/id/class shorthand (`div#main.wide`), inline text, and piped text
//! - Literal blocks for `<pre>`, `<script>`, and `<style>`, with optional
//!   `:javascript`/`:css` filter blocks
//! - IE conditional comments translated to `//if …` comment blocks
//! - Doctype resolution for HTML5 and the XHTML 1.x family
//! - Configurable indentation, quoting, and line wrapping
//!
//! ## Quick Start
//!
//! ```
//! use pugify::{Options, convert};
//!
//! let pug = convert("<p>hello world</p>", &Options::default());
//! assert_eq!(pug, "html\n  body\n    p hello world\n");
//! ```
//!
//! ## Streaming
//!
//! Output can also be streamed line-by-line into any [`std::io::Write`]:
//!
//! ```
//! use pugify::{Options, convert_to_writer};
//!
//! let out = convert_to_writer("<p>hi</p>", &Options::default(), Vec::new()).unwrap();
//! assert_eq!(out, b"html\n  body\n    p hi\n");
//! ```

pub mod dom;
pub mod error;
pub mod pug;
pub mod util;

pub use dom::{Dom, NodeId, parse_document};
pub use error::{Error, Result};
pub use pug::{
    Converter, Options, Output, StreamOutput, StringOutput, TextOptions, Writer, convert,
    convert_to_writer,
};
