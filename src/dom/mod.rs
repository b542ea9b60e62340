//! HTML parsing and the arena DOM it produces.
//!
//! html5ever drives a [`TreeSink`](html5ever::tree_builder::TreeSink) that
//! builds a flat, index-addressed tree. The conversion engine only walks
//! this tree; it never touches the parser directly.

mod arena;
mod tree_sink;

pub use arena::{Attribute, Children, Dom, Node, NodeData, NodeId};
pub use tree_sink::DomSink;

use html5ever::driver::ParseOpts;
use html5ever::tendril::TendrilSink;

/// Parse an HTML document into a [`Dom`].
///
/// Parsing is lenient: malformed markup is repaired the way browsers repair
/// it, and recoverable parse errors are ignored.
pub fn parse_document(html: &str) -> Dom {
    let sink = DomSink::new();
    let result = html5ever::parse_document(sink, ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes());
    result.into_dom()
}
