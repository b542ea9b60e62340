//! Recursive tree walker that drives the conversion.
//!
//! One method per node kind. The walker computes per-node fragments through
//! the [`Writer`] and emits them through an [`Output`] sink. The only tree
//! mutation it performs is inserting the synthetic `conditional` element
//! produced by conditional-comment processing.

use memchr::memchr;

use crate::dom::{Attribute, Dom, NodeId};

use super::escape::{encode_entities, has_line_break, split_text_lines};
use super::output::Output;
use super::writer::{TextContext, Writer};
use super::{Options, TextOptions};

/// Doctype keywords by public identifier.
const PUBLIC_ID_DOCTYPE_NAMES: &[(&str, &str)] = &[
    ("-//W3C//DTD XHTML 1.0 Transitional//EN", "transitional"),
    ("-//W3C//DTD XHTML 1.0 Strict//EN", "strict"),
    ("-//W3C//DTD XHTML 1.0 Frameset//EN", "frameset"),
    ("-//W3C//DTD XHTML 1.1//EN", "1.1"),
    ("-//W3C//DTD XHTML Basic 1.1//EN", "basic"),
    ("-//WAPFORUM//DTD XHTML Mobile 1.2//EN", "mobile"),
];

/// Doctype keywords by system identifier.
const SYSTEM_ID_DOCTYPE_NAMES: &[(&str, &str)] = &[
    (
        "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd",
        "transitional",
    ),
    ("http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd", "strict"),
    (
        "http://www.w3.org/TR/xhtml1/DTD/xhtml1-frameset.dtd",
        "frameset",
    ),
    ("http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd", "1.1"),
    ("http://www.w3.org/TR/xhtml-basic/xhtml-basic11.dtd", "basic"),
    (
        "http://www.openmobilealliance.org/tech/DTD/xhtml-mobile12.dtd",
        "mobile",
    ),
];

fn lookup(table: &[(&str, &'static str)], key: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, keyword)| *keyword)
}

/// Resolve a doctype to its shorthand keyword: by public identifier first,
/// then by system identifier, then by the literal name `html`.
fn doctype_keyword(name: &str, public_id: &str, system_id: &str) -> Option<&'static str> {
    if !public_id.is_empty() {
        lookup(PUBLIC_ID_DOCTYPE_NAMES, public_id)
    } else if !system_id.is_empty() {
        lookup(SYSTEM_ID_DOCTYPE_NAMES, system_id)
    } else if name.eq_ignore_ascii_case("html") {
        Some("html")
    } else {
        None
    }
}

/// Extract the `if …` condition from a conditional-comment body.
///
/// Matches `[if <anything but ]>]` anywhere in the body, requiring at least
/// one whitespace character after `if` and a non-blank condition before the
/// closing bracket.
fn conditional_expression(data: &str) -> Option<&str> {
    let bytes = data.as_bytes();
    let mut search = 0;
    while let Some(found) = memchr(b'[', &bytes[search..]) {
        let start = search + found;
        let rest = &data[start + 1..];
        if let Some(after_if) = rest.strip_prefix("if")
            && after_if.starts_with(|c: char| c.is_whitespace())
            && let Some(end) = after_if.find(']')
            && !after_if[..end].trim().is_empty()
        {
            return Some(&rest[..end + 2]);
        }
        search = start + 1;
    }
    None
}

/// Recursive dispatcher over node kinds.
pub struct Converter<'a> {
    options: &'a Options,
    writer: Writer,
}

impl<'a> Converter<'a> {
    pub fn new(options: &'a Options) -> Self {
        Self {
            options,
            writer: Writer::new(options),
        }
    }

    /// Convert a whole document: doctype line, then the root element.
    ///
    /// Top-level comments are rendered in place. If parsing somehow produced
    /// a document without an element child, fall back to the first `<html>`
    /// found anywhere in the tree.
    pub fn document(&self, dom: &mut Dom, output: &mut dyn Output) {
        if let Some((name, public_id, system_id)) = dom.doctype()
            && let Some(keyword) = doctype_keyword(name, public_id, system_id)
        {
            output.write_line(&format!("doctype {keyword}"), true);
        }

        let doc = dom.document();
        if dom.children(doc).any(|child| dom.is_element(child)) {
            self.children(dom, doc, output, false);
        } else if let Some(html_el) = dom.find_by_tag("html") {
            self.element(dom, html_el, output);
        }
    }

    /// Convert one element node.
    pub fn element(&self, dom: &mut Dom, id: NodeId, output: &mut dyn Output) {
        let Some(tag) = dom.tag_name(id) else {
            return;
        };
        let tag = tag.to_ascii_lowercase();

        let tag_head = self.writer.tag_head(dom, id);
        let tag_attrs = self.writer.tag_attributes(dom, id, output.indents());
        let tag_text = self.writer.tag_text(dom, id);

        match tag.as_str() {
            "script" | "style" => {
                if dom.has_attr(id, "src") {
                    // src-bearing tags never get filter-block treatment;
                    // any stray text content is still flushed
                    output.write_line(&format!("{tag_head}{tag_attrs}"), true);
                    self.writer
                        .write_text_content(dom, id, output, TextOptions::default());
                } else if tag == "script" {
                    self.script(dom, id, output, &tag_head, &tag_attrs);
                } else {
                    self.style(dom, id, output, &tag_head, &tag_attrs);
                }
            }
            "conditional" => {
                let condition = dom.attr(id, "condition").unwrap_or("").to_string();
                output.write_line(&format!("//{condition}"), true);
                self.children(dom, id, output, true);
            }
            "pre" => self.pre(dom, id, output, &tag_head, &tag_attrs),
            _ => {
                if self.options.bodyless && (tag == "html" || tag == "body") {
                    self.children(dom, id, output, false);
                } else if !self.options.keep_head && tag == "head" {
                    // Dropped together with its children
                } else if let Some(text) = tag_text {
                    output.write_line(
                        &format!("{tag_head}{tag_attrs} {}", encode_entities(&text)),
                        true,
                    );
                } else {
                    output.write_line(&format!("{tag_head}{tag_attrs}"), true);
                    self.children(dom, id, output, true);
                }
            }
        }
    }

    /// Convert the direct children of a node in source order.
    ///
    /// Iteration follows sibling links on stable ids, so the synthetic
    /// element a conditional comment inserts mid-walk is reached naturally
    /// as the comment's next sibling.
    pub fn children(&self, dom: &mut Dom, parent: NodeId, output: &mut dyn Output, indent: bool) {
        if indent {
            output.enter();
        }

        let parent_is_code = dom
            .tag_name(parent)
            .is_some_and(|t| t.eq_ignore_ascii_case("code"));

        let mut cursor = dom.first_child(parent);
        while let Some(id) = cursor {
            if dom.is_element(id) {
                self.element(dom, id, output);
            } else if dom.text(id).is_some() {
                let opts = TextOptions {
                    encode_entities: true,
                    pipe: parent_is_code,
                    wrap: true,
                    ..TextOptions::default()
                };
                let last = self.text(dom, id, output, opts);
                cursor = dom.next_sibling(last);
                continue;
            } else if dom.is_comment(id) {
                self.comment(dom, id, output);
            }
            cursor = dom.next_sibling(id);
        }

        if indent {
            output.leave();
        }
    }

    /// Convert a text node, merging any run of adjacent text siblings into
    /// one fragment first. Returns the last node of the merged run so the
    /// caller can continue iteration past it.
    pub fn text(
        &self,
        dom: &Dom,
        id: NodeId,
        output: &mut dyn Output,
        opts: TextOptions,
    ) -> NodeId {
        let Some(first) = dom.text(id) else {
            return id;
        };

        let mut data = first.to_string();
        let mut last = id;
        while let Some(next) = dom.next_sibling(last) {
            match dom.text(next) {
                Some(more) => {
                    data.push_str(more);
                    last = next;
                }
                None => break,
            }
        }

        let ctx = TextContext {
            trim_start: dom.prev_sibling(id).is_some_and(|p| !dom.is_element(p)),
            trim_end: dom.next_sibling(last).is_some_and(|n| !dom.is_element(n)),
        };
        self.writer.write_text(&data, ctx, output, opts);
        last
    }

    /// Convert a comment node: a conditional comment becomes a deferred
    /// synthetic element, anything else a line or block comment.
    pub fn comment(&self, dom: &mut Dom, id: NodeId, output: &mut dyn Output) {
        let data = dom.comment_text(id).unwrap_or("").to_string();

        if let Some(condition) = conditional_expression(&data) {
            let condition = condition.to_string();
            self.conditional(dom, id, &condition);
            return;
        }

        if !has_line_break(&data) {
            output.write_line(&format!("// {}", data.trim()), true);
        } else {
            output.write_line("//", true);
            output.enter();
            let ctx = TextContext::of(dom, id);
            let opts = TextOptions {
                trim: true,
                ..TextOptions::default()
            };
            for line in split_text_lines(&data) {
                self.writer.write_text_line(line, ctx, output, opts);
            }
            output.leave();
        }
    }

    /// Translate a conditional comment into a synthetic `conditional`
    /// element appended as the comment's next sibling. The walker renders
    /// it when sibling iteration reaches it.
    pub fn conditional(&self, dom: &mut Dom, id: NodeId, condition: &str) {
        let body = dom.comment_text(id).unwrap_or("").trim().to_string();

        let mut condition = condition.to_string();
        let mut inner = body.replacen(&format!("[{condition}]>"), "", 1);
        inner = inner.replacen("<![endif]", "", 1);

        // Downlevel-revealed comments keep the whole marker in the label
        // and carry no content of their own
        if inner.starts_with("<!") {
            condition = format!(" [{condition}] <!");
            inner.clear();
        }

        let element = dom.create_element(
            "conditional",
            vec![Attribute {
                name: "condition".to_string(),
                value: condition,
            }],
        );
        if !inner.is_empty() {
            let text = dom.create_text(inner);
            dom.append(element, text);
        }
        dom.insert_after(id, element);
    }

    /// `<script>` without a `src`: a `:javascript` filter block in scalate
    /// mode, otherwise a literal block with trimmed, backslash-escaped text.
    fn script(
        &self,
        dom: &Dom,
        id: NodeId,
        output: &mut dyn Output,
        tag_head: &str,
        tag_attrs: &str,
    ) {
        if self.options.scalate {
            output.write_line(":javascript", true);
            self.writer
                .write_text_content(dom, id, output, TextOptions::default());
        } else {
            output.write_line(&format!("{tag_head}{tag_attrs}."), true);
            self.writer.write_text_content(
                dom,
                id,
                output,
                TextOptions {
                    trim: true,
                    escape_backslash: true,
                    ..TextOptions::default()
                },
            );
        }
    }

    /// `<style>` without a `src`: same shape as scripts, with the `:css`
    /// filter keyword and no backslash escaping.
    fn style(
        &self,
        dom: &Dom,
        id: NodeId,
        output: &mut dyn Output,
        tag_head: &str,
        tag_attrs: &str,
    ) {
        if self.options.scalate {
            output.write_line(":css", true);
            self.writer
                .write_text_content(dom, id, output, TextOptions::default());
        } else {
            output.write_line(&format!("{tag_head}{tag_attrs}."), true);
            self.writer.write_text_content(
                dom,
                id,
                output,
                TextOptions {
                    trim: true,
                    ..TextOptions::default()
                },
            );
        }
    }

    /// `<pre>`: a literal block. The first line gets a literal `\n` marker
    /// instead of a real break, tabs become `\t`, and every line break is
    /// re-indented by hand rather than through enter/leave.
    fn pre(
        &self,
        dom: &Dom,
        id: NodeId,
        output: &mut dyn Output,
        tag_head: &str,
        tag_attrs: &str,
    ) {
        output.write_line(&format!("{tag_head}{tag_attrs}."), true);
        output.enter();

        let mut first_line = true;
        let mut cursor = dom.first_child(id);
        while let Some(child) = cursor {
            if let Some(text) = dom.text(child)
                && !text.trim().is_empty()
            {
                let mut data = text.to_string();
                if first_line {
                    data = format!("\\n{}", data.trim_start_matches(['\r', '\n']));
                    first_line = false;
                }
                data = data.replace('\t', "\\t");
                let continuation = format!("\n{}", output.indents());
                data = data
                    .replace("\r\n", "\n")
                    .replace('\r', "\n")
                    .replace('\n', &continuation);
                output.write(&data, true);
            }
            cursor = dom.next_sibling(child);
        }

        output.write_line("", true);
        output.leave();
    }
}
