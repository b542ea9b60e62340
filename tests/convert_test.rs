//! End-to-end conversion tests.
//!
//! Each case feeds HTML through the full parse-and-convert pipeline and
//! checks the exact Pug output, including indentation.

use pugify::{Options, convert, convert_to_writer};

fn options() -> Options {
    Options::default()
}

// ============================================================================
// Basic structure
// ============================================================================

#[test]
fn test_simple_paragraph() {
    let pug = convert("<p>hello world</p>", &options());
    assert_eq!(pug, "html\n  body\n    p hello world\n");
}

#[test]
fn test_empty_input_still_produces_skeleton() {
    // The parser repairs an empty document into html > head + body
    let pug = convert("", &options());
    assert_eq!(pug, "html\n  body\n");
}

#[test]
fn test_trailing_whitespace_dropped() {
    let pug = convert("<p>hello world</p>\n  ", &options());
    assert_eq!(pug, "html\n  body\n    p hello world\n");
}

#[test]
fn test_tab_indentation() {
    let opts = Options {
        use_tabs: true,
        ..options()
    };
    let pug = convert("<p>hi</p>", &opts);
    assert_eq!(pug, "html\n\tbody\n\t\tp hi\n");
}

#[test]
fn test_wide_indentation() {
    let opts = Options {
        indent_spaces: 4,
        ..options()
    };
    let pug = convert("<p>hi</p>", &opts);
    assert_eq!(pug, "html\n    body\n        p hi\n");
}

#[test]
fn test_bodyless_skips_wrappers() {
    let opts = Options {
        bodyless: true,
        ..options()
    };
    let pug = convert("<p>hi</p>", &opts);
    assert_eq!(pug, "p hi\n");
}

#[test]
fn test_head_dropped_by_default() {
    let html = "<html><head><title>T</title></head><body><p>hi</p></body></html>";
    let pug = convert(html, &options());
    assert_eq!(pug, "html\n  body\n    p hi\n");
}

#[test]
fn test_keep_head() {
    let opts = Options {
        keep_head: true,
        ..options()
    };
    let html = "<html><head><title>T</title></head><body></body></html>";
    let pug = convert(html, &opts);
    assert_eq!(pug, "html\n  head\n    title T\n  body\n");
}

// ============================================================================
// Shorthand heads and attributes
// ============================================================================

#[test]
fn test_div_shorthand() {
    let pug = convert(r#"<div id="content" class="wide main">x</div>"#, &options());
    assert_eq!(pug, "html\n  body\n    #content.wide.main x\n");
}

#[test]
fn test_leading_equals_passes_through() {
    let pug = convert("<div>=1+1</div>", &options());
    assert_eq!(pug, "html\n  body\n    div =1+1\n");
}

#[test]
fn test_invalid_class_tokens_fall_back_to_attribute() {
    let pug = convert(r#"<div class="ok not/ok">x</div>"#, &options());
    assert_eq!(pug, "html\n  body\n    .ok(class='not/ok') x\n");
}

#[test]
fn test_angular_attributes() {
    let html = "<button\n  ng-click=\"login('testing', 'testing')\"\n  class=\"btn btn-small\">Test Login</button>\n";
    let pug = convert(html, &options());
    assert_eq!(
        pug,
        "html\n  body\n    button.btn.btn-small(ng-click=\"login('testing', 'testing')\") Test Login\n"
    );
}

#[test]
fn test_apostrophes_switch_quote_style() {
    let html = "<img title=\"Joe's Place\" />\n<img title='Joe\"s Place' />\n";
    let pug = convert(html, &options());
    assert_eq!(
        pug,
        "html\n  body\n    img(title=\"Joe's Place\")\n    img(title='Joe\"s Place')\n"
    );
}

#[test]
fn test_multi_line_attribute_continuation() {
    let html = r#"<img src="img/close_button.png" height="16" width="16" alt="Home"
onclick="
    mwl.switchClass('#search_title', 'show_title_search', 'show_title_main');
    mwl.setGroupTarget('#navigateToggle', '#home', 'show', 'hide');
    mwl.switchClass('#slider', 'show_miniapp', 'show_main');
    mwl.scrollTo('#main');"/>
"#;
    let expected = "html\n  body\n    img(src='img/close_button.png', height='16', width='16', alt='Home', onclick=\"\\\n    mwl.switchClass('#search_title', 'show_title_search', 'show_title_main');\\\n    mwl.setGroupTarget('#navigateToggle', '#home', 'show', 'hide');\\\n    mwl.switchClass('#slider', 'show_miniapp', 'show_main');\\\n    mwl.scrollTo('#main');\")\n";
    assert_eq!(convert(html, &options()), expected);
}

#[test]
fn test_no_attr_comma_separator() {
    let opts = Options {
        no_attr_comma: true,
        ..options()
    };
    let pug = convert(r#"<img src="a.png" alt="x">"#, &opts);
    assert_eq!(pug, "html\n  body\n    img(src='a.png' alt='x')\n");
}

#[test]
fn test_double_quote_preference() {
    let opts = Options {
        double_quotes: true,
        ..options()
    };
    let pug = convert(r#"<img alt="x">"#, &opts);
    assert_eq!(pug, "html\n  body\n    img(alt=\"x\")\n");
}

// ============================================================================
// Text handling
// ============================================================================

#[test]
fn test_code_inline() {
    let pug = convert("<code>inline</code>", &options());
    assert_eq!(pug, "html\n  body\n    code inline\n");
}

#[test]
fn test_code_multi_line_is_piped() {
    let pug = convert("<code>\nblah\nblah\n</code>", &options());
    assert_eq!(pug, "html\n  body\n    code\n      | blah\n      | blah\n");
}

#[test]
fn test_multi_line_text_block() {
    let pug = convert("<div>line one\nline two</div>", &options());
    assert_eq!(pug, "html\n  body\n    div\n      line one\n      line two\n");
}

#[test]
fn test_entities_encoded() {
    let pug = convert("<div>a &amp; b</div>", &options());
    assert_eq!(pug, "html\n  body\n    div a &amp; b\n");
}

#[test]
fn test_mixed_inline_content() {
    let pug = convert("<p><b>foo</b>bar</p>", &options());
    assert_eq!(pug, "html\n  body\n    p\n      b foo\n      bar\n");
}

#[test]
fn test_long_text_wraps_at_limit() {
    let html = format!("<div>{}</div>", "word ".repeat(30));
    let pug = convert(&html, &options());

    let lines: Vec<&str> = pug.lines().collect();
    assert_eq!(lines[2], "    div");
    let text_lines = &lines[3..];
    assert!(text_lines.len() >= 2, "long text should be wrapped");
    for line in text_lines {
        assert!(line.trim().len() <= 80, "wrapped line too long: {line:?}");
    }
    let total_words: usize = text_lines.iter().map(|l| l.split_whitespace().count()).sum();
    assert_eq!(total_words, 30);
}

// ============================================================================
// Script, style, and pre blocks
// ============================================================================

#[test]
fn test_script_block() {
    let pug = convert("<body><script>\nvar x = 1;\nvar y = 2;\n</script></body>", &options());
    assert_eq!(
        pug,
        "html\n  body\n    script.\n      var x = 1;\n      var y = 2;\n"
    );
}

#[test]
fn test_script_backslash_escaped() {
    let pug = convert("<body><script>var re = /\\d+/;</script></body>", &options());
    assert_eq!(pug, "html\n  body\n    script.\n      var re = /\\\\d+/;\n");
}

#[test]
fn test_script_with_src() {
    let pug = convert(r#"<body><script src="app.js"></script></body>"#, &options());
    assert_eq!(pug, "html\n  body\n    script(src='app.js')\n");
}

#[test]
fn test_script_with_src_flushes_fallback_text() {
    let pug = convert(
        r#"<body><script src="a.js">fallback();</script></body>"#,
        &options(),
    );
    assert_eq!(
        pug,
        "html\n  body\n    script(src='a.js')\n      fallback();\n"
    );
}

#[test]
fn test_scalate_script() {
    let opts = Options {
        scalate: true,
        ..options()
    };
    let pug = convert("<body><script>var x = 1;</script></body>", &opts);
    assert_eq!(pug, "html\n  body\n    :javascript\n      var x = 1;\n");
}

#[test]
fn test_style_block() {
    let pug = convert("<body><style>p { color: red; }</style></body>", &options());
    assert_eq!(pug, "html\n  body\n    style.\n      p { color: red; }\n");
}

#[test]
fn test_scalate_style() {
    let opts = Options {
        scalate: true,
        ..options()
    };
    let pug = convert("<body><style>p { color: red; }</style></body>", &opts);
    assert_eq!(pug, "html\n  body\n    :css\n      p { color: red; }\n");
}

#[test]
fn test_pre_literal_block() {
    let pug = convert("<body><pre>a\n\tb</pre></body>", &options());
    assert_eq!(pug, "html\n  body\n    pre.\n      \\na\n      \\tb");
}

// ============================================================================
// Comments and conditionals
// ============================================================================

#[test]
fn test_single_line_comment() {
    let pug = convert("<body><!-- a note --></body>", &options());
    assert_eq!(pug, "html\n  body\n    // a note\n");
}

#[test]
fn test_multi_line_comment_block() {
    let pug = convert("<body><!--\nline one\nline two\n--></body>", &options());
    assert_eq!(
        pug,
        "html\n  body\n    //\n      line one\n      line two\n"
    );
}

#[test]
fn test_top_level_comment() {
    let pug = convert(
        "<!DOCTYPE html><!-- banner --><html><body><p>x</p></body></html>",
        &options(),
    );
    assert_eq!(pug, "doctype html\n// banner\nhtml\n  body\n    p x\n");
}

#[test]
fn test_conditional_comment() {
    let pug = convert("<body><!--[if IE]>x<![endif]--></body>", &options());
    assert_eq!(pug, "html\n  body\n    //if IE\n      x\n");
}

#[test]
fn test_conditional_comment_keeps_sibling_order() {
    let pug = convert(
        "<body><!--[if lt IE 7]>old<![endif]--><p>after</p></body>",
        &options(),
    );
    assert_eq!(
        pug,
        "html\n  body\n    //if lt IE 7\n      old\n    p after\n"
    );
}

#[test]
fn test_downlevel_revealed_conditional() {
    let pug = convert("<body><!--[if gt IE 8]><!--></body>", &options());
    assert_eq!(pug, "html\n  body\n    // [if gt IE 8] <!\n");
}

// ============================================================================
// Doctypes
// ============================================================================

#[test]
fn test_html5_doctype() {
    let pug = convert("<!DOCTYPE html><p>hi</p>", &options());
    assert_eq!(pug, "doctype html\nhtml\n  body\n    p hi\n");
}

#[test]
fn test_xhtml_transitional_doctype() {
    let html = r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd"><html><body><p>hi</p></body></html>"#;
    let pug = convert(html, &options());
    assert_eq!(pug, "doctype transitional\nhtml\n  body\n    p hi\n");
}

#[test]
fn test_missing_doctype_emits_nothing() {
    let pug = convert("<p>hi</p>", &options());
    assert!(!pug.contains("doctype"));
}

// ============================================================================
// Streaming output
// ============================================================================

#[test]
fn test_streamed_output_matches_string_output() {
    let html = r#"<!DOCTYPE html><html><body>
        <div id="main" class="wide">
            <p>hello world</p>
            <!-- note -->
            <code>\nx\ny\n</code>
        </div>
    </body></html>"#;
    let opts = options();

    let joined = convert(html, &opts);
    let streamed = convert_to_writer(html, &opts, Vec::new()).expect("stream conversion");
    assert_eq!(String::from_utf8(streamed).unwrap(), joined);
}
