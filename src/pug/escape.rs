//! Pure text escaping and splitting utilities.

use memchr::memchr2;

/// Encode HTML entity references in text.
///
/// Encodes the five characters that must not appear literally in template
/// text: `&`, `<`, `>`, `"`, `'`.
///
/// # Examples
///
/// ```
/// use pugify::pug::encode_entities;
///
/// assert_eq!(encode_entities("a & b"), "a &amp; b");
/// assert_eq!(encode_entities("<em>"), "&lt;em&gt;");
/// ```
pub fn encode_entities(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + text.len() / 10);
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&#34;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}

/// Split text into logical lines on any line-break variant.
///
/// `\r\n`, `\r`, and `\n` each end a line; `\r\n` counts as a single break.
/// The final segment is always included, so text ending in a line break
/// yields a trailing empty line.
pub fn split_text_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;

    while let Some(found) = memchr2(b'\r', b'\n', &bytes[start..]) {
        let brk = start + found;
        lines.push(&text[start..brk]);
        start = brk + 1;
        if bytes[brk] == b'\r' && bytes.get(start) == Some(&b'\n') {
            start += 1;
        }
    }
    lines.push(&text[start..]);
    lines
}

/// Whether text contains any line-break character.
pub fn has_line_break(text: &str) -> bool {
    memchr2(b'\r', b'\n', text.as_bytes()).is_some()
}
