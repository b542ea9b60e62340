//! Per-node formatting rules.
//!
//! The writer computes text fragments for a single node at a time: tag
//! shorthand heads, attribute clauses, inline-text candidates, and the
//! line-oriented text pipeline. It never mutates the tree; all state is the
//! option set resolved at construction.

use std::borrow::Cow;

use memchr::memchr2;

use crate::dom::{Dom, NodeId};

use super::escape::{encode_entities, has_line_break, split_text_lines};
use super::output::Output;
use super::{DEFAULT_WRAP_LENGTH, Options, TextOptions};

/// Sibling context for a text run, controlling edge-space trimming.
///
/// Leading spaces are trimmed when the previous sibling exists and is not an
/// element; trailing spaces likewise for the next sibling. This keeps the
/// space in mixed content like `<b>foo</b> bar` and drops it elsewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextContext {
    pub trim_start: bool,
    pub trim_end: bool,
}

impl TextContext {
    /// Compute the context from a node's position among its siblings.
    pub fn of(dom: &Dom, id: NodeId) -> Self {
        Self {
            trim_start: dom.prev_sibling(id).is_some_and(|p| !dom.is_element(p)),
            trim_end: dom.next_sibling(id).is_some_and(|n| !dom.is_element(n)),
        }
    }
}

/// Whether a string can appear in id/class shorthand.
///
/// Shorthand tokens are word characters and dashes only; anything else is
/// deferred to the explicit attribute clause.
pub fn is_identifier(s: &str) -> bool {
    let s = s.trim();
    !s.is_empty()
        && s.bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// Stateless-per-call formatting helpers.
pub struct Writer {
    wrap_length: usize,
    attr_separator: &'static str,
    quote: char,
    alt_quote: char,
    no_empty_pipe: bool,
}

impl Writer {
    pub fn new(options: &Options) -> Self {
        let wrap_length = if options.wrap_length == 0 {
            DEFAULT_WRAP_LENGTH
        } else {
            options.wrap_length
        };
        let attr_separator = if options.scalate || options.no_attr_comma {
            " "
        } else {
            ", "
        };
        let (quote, alt_quote) = if options.double_quotes {
            ('"', '\'')
        } else {
            ('\'', '"')
        };
        Self {
            wrap_length,
            attr_separator,
            quote,
            alt_quote,
            no_empty_pipe: options.no_empty_pipe,
        }
    }

    /// The shorthand head for an element: tag name (omitted for `div`),
    /// `#id`, and `.class` tokens. Falls back to `div` when nothing else
    /// is emitted.
    pub fn tag_head(&self, dom: &Dom, id: NodeId) -> String {
        let Some(tag) = dom.tag_name(id) else {
            return "div".to_string();
        };

        let mut head = String::new();
        if !tag.eq_ignore_ascii_case("div") {
            head.push_str(&tag.to_ascii_lowercase());
        }

        if let Some(id_value) = dom.attr(id, "id")
            && is_identifier(id_value)
        {
            head.push('#');
            head.push_str(id_value);
        }

        if let Some(class_value) = dom.attr(id, "class") {
            let valid: Vec<&str> = class_value
                .split_whitespace()
                .filter(|name| is_identifier(name))
                .collect();
            if !valid.is_empty() {
                head.push('.');
                head.push_str(&valid.join("."));
            }
        }

        if head.is_empty() {
            head.push_str("div");
        }
        head
    }

    /// The parenthesized attribute clause for an element, or an empty string
    /// when every attribute was already expressed as shorthand.
    ///
    /// `indents` is the caller's current indentation; multi-line attribute
    /// values continue under it with a trailing backslash.
    pub fn tag_attributes(&self, dom: &Dom, id: NodeId, indents: &str) -> String {
        let attrs = dom.attrs(id);
        if attrs.is_empty() {
            return String::new();
        }

        let mut rendered: Vec<String> = Vec::new();
        for attr in attrs {
            if attr.name == "id" && is_identifier(&attr.value) {
                // Already expressed in the tag head
                continue;
            }
            if attr.name == "class" {
                let invalid: Vec<&str> = attr
                    .value
                    .split_whitespace()
                    .filter(|name| !is_identifier(name))
                    .collect();
                if !invalid.is_empty() {
                    rendered.push(self.build_attribute(&attr.name, &invalid.join(" ")));
                }
                continue;
            }
            let value = escape_attr_line_breaks(&attr.value, indents);
            rendered.push(self.build_attribute(&attr.name, &value));
        }

        if rendered.is_empty() {
            return String::new();
        }
        format!("({})", rendered.join(self.attr_separator))
    }

    /// Render one `name=value` pair with the preferred quote character,
    /// falling back to the alternate when the value contains it, and
    /// escaping the preferred quote when the value contains both.
    pub fn build_attribute(&self, name: &str, value: &str) -> String {
        let q = self.quote;
        let alt = self.alt_quote;
        if !value.contains(q) {
            format!("{name}={q}{value}{q}")
        } else if !value.contains(alt) {
            format!("{name}={alt}{value}{alt}")
        } else {
            let escaped = value.replace(q, &format!("\\{q}"));
            format!("{name}={q}{escaped}{q}")
        }
    }

    /// The element's inline-text candidate: its sole child is a text node
    /// short enough to fit the wrap length with no embedded line break.
    pub fn tag_text(&self, dom: &Dom, id: NodeId) -> Option<String> {
        let first = dom.first_child(id)?;
        let data = dom.text(first)?;
        if dom.next_sibling(first).is_some() {
            return None;
        }
        if data.len() > self.wrap_length || has_line_break(data) {
            return None;
        }
        Some(data.to_string())
    }

    /// Emit a text fragment: split into logical lines, then run each line
    /// through the text-line pipeline.
    pub fn write_text(
        &self,
        text: &str,
        ctx: TextContext,
        output: &mut dyn Output,
        opts: TextOptions,
    ) {
        if text.is_empty() {
            return;
        }
        for line in split_text_lines(text) {
            self.write_text_line(line, ctx, output, opts);
        }
    }

    /// Emit one logical line of text.
    ///
    /// Pipeline: empty-piped-line suppression, pipe prefix, edge trimming,
    /// entity encoding, backslash doubling, then direct emission or greedy
    /// wrapping with each piece re-entering the pipeline.
    pub fn write_text_line(
        &self,
        line: &str,
        ctx: TextContext,
        output: &mut dyn Output,
        opts: TextOptions,
    ) {
        if opts.pipe && self.no_empty_pipe && line.trim().is_empty() {
            return;
        }
        let prefix = if opts.pipe { "| " } else { "" };

        let mut line = line;
        if ctx.trim_start {
            line = line.trim_start_matches(' ');
        }
        if ctx.trim_end {
            line = line.trim_end_matches(' ');
        }
        if opts.trim {
            line = line.trim();
        }
        if line.is_empty() {
            return;
        }

        let mut text = Cow::Borrowed(line);
        if opts.encode_entities {
            text = Cow::Owned(encode_entities(&text));
        }
        if opts.escape_backslash && text.contains('\\') {
            text = Cow::Owned(text.replace('\\', "\\\\"));
        }

        if !opts.wrap || text.len() <= self.wrap_length {
            output.write_line(&format!("{prefix}{text}"), true);
            return;
        }

        let pieces = self.break_line(&text);
        match pieces.len() {
            0 => {}
            1 => output.write_line(&format!("{prefix}{text}"), true),
            _ => {
                for piece in &pieces {
                    self.write_text_line(piece, ctx, output, opts);
                }
            }
        }
    }

    /// Greedy word wrap. Words accumulate onto a running line; the line is
    /// flushed whenever the next word (plus its joining space) would push it
    /// past the wrap length. A single word longer than the wrap length is
    /// never split.
    pub fn break_line(&self, line: &str) -> Vec<String> {
        if line.is_empty() {
            return Vec::new();
        }
        if !line.contains(' ') {
            return vec![line.to_string()];
        }

        let mut lines = Vec::new();
        let mut current = String::new();
        for word in line.split_whitespace() {
            if !current.is_empty() && current.len() + 1 + word.len() > self.wrap_length {
                lines.push(std::mem::take(&mut current));
            }
            if current.is_empty() {
                current.push_str(word);
            } else {
                current.push(' ');
                current.push_str(word);
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }

    /// Emit the text children of a node, one indentation level deeper.
    pub fn write_text_content(
        &self,
        dom: &Dom,
        id: NodeId,
        output: &mut dyn Output,
        opts: TextOptions,
    ) {
        output.enter();
        let mut cursor = dom.first_child(id);
        while let Some(child) = cursor {
            if let Some(data) = dom.text(child) {
                self.write_text(data, TextContext::of(dom, child), output, opts);
            }
            cursor = dom.next_sibling(child);
        }
        output.leave();
    }
}

/// Replace each line break (and any whitespace following it) in an attribute
/// value with `\`, the break character, and the caller's indentation, so the
/// value continues across source lines.
fn escape_attr_line_breaks(value: &str, indents: &str) -> String {
    if memchr2(b'\r', b'\n', value.as_bytes()).is_none() {
        return value.to_string();
    }
    let mut result = String::with_capacity(value.len() + indents.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\r' || c == '\n' {
            result.push('\\');
            result.push(c);
            result.push_str(indents);
            while chars.peek().is_some_and(|next| next.is_whitespace()) {
                chars.next();
            }
        } else {
            result.push(c);
        }
    }
    result
}
