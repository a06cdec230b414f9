// tests/detection_suite.rs
//! Detection priority: when content plausibly matches several families,
//! the earlier stage in the chain must win.

use clip2notion::{detect, detect_bytes, ContentType};

#[test]
fn url_wins_over_plain_text() {
    let result = detect("https://example.com/some/path");
    assert_eq!(result.content_type, ContentType::Url);
    assert!(result.confidence.value() >= 0.9);
}

#[test]
fn audio_url_is_retagged() {
    let result = detect("https://cdn.example.com/episode.mp3");
    assert_eq!(result.content_type, ContentType::Audio);
}

#[test]
fn json_wins_over_code_heuristics() {
    // Braces and quotes look like code, but a strict parse settles it.
    let result = detect("{\n  \"name\": \"value\",\n  \"count\": 3\n}");
    assert_eq!(result.content_type, ContentType::Json);
    assert_eq!(result.confidence.value(), 1.0);
}

#[test]
fn dollar_wrapped_code_is_code_not_latex() {
    let result = detect("$function(){}$");
    assert_eq!(result.content_type, ContentType::Code);
}

#[test]
fn latex_wins_over_code_when_it_is_math() {
    let result = detect("\\begin{align}\nx &= y + 1 \\\\\nz &= x^2\n\\end{align}");
    assert_eq!(result.content_type, ContentType::Latex);
}

#[test]
fn code_wins_over_markdown_for_source_text() {
    let source = "fn add(a: i32, b: i32) -> i32 {\n    let mut sum = a;\n    sum += b;\n    sum\n}";
    let result = detect(source);
    assert_eq!(result.content_type, ContentType::Code);
    assert_eq!(result.subtype.as_deref(), Some("rust"));
}

#[test]
fn uniform_delimiters_win_over_markdown() {
    let result = detect("name\tage\tcity\nJohn\t30\tOslo\nJane\t25\tBergen");
    assert_eq!(result.content_type, ContentType::Tsv);
}

#[test]
fn semicolon_delimiter_is_in_the_family() {
    let result = detect("a;b;c\n1;2;3\n4;5;6");
    assert_eq!(result.content_type, ContentType::Table);
}

#[test]
fn pipe_table_detects_as_tabular() {
    let result = detect("| Name | Age |\n|------|-----|\n| John | 30 |");
    assert!(result.content_type.is_tabular());
}

#[test]
fn markdown_markers_beat_html() {
    let result = detect("# Title\n\nSome *styled* prose with a [link](https://example.com).\n\n- one\n- two");
    assert_eq!(result.content_type, ContentType::Markdown);
}

#[test]
fn html_detects_from_paired_tags() {
    let result = detect("<div class=\"card\">\n  <p>hello</p>\n</div>");
    assert_eq!(result.content_type, ContentType::Html);
}

#[test]
fn prose_falls_back_to_text() {
    let result = detect("Just an ordinary sentence with nothing special about it.");
    assert_eq!(result.content_type, ContentType::Text);
    assert_eq!(result.confidence.value(), 0.5);
}

#[test]
fn empty_input_is_text_with_full_confidence() {
    let result = detect("");
    assert_eq!(result.content_type, ContentType::Text);
    assert_eq!(result.confidence.value(), 1.0);
}

#[test]
fn png_magic_bytes_detect_as_image() {
    let png = [0x89u8, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];
    let result = detect_bytes(&png);
    assert_eq!(result.content_type, ContentType::Image);
}

#[test]
fn non_magic_bytes_route_to_text_detection() {
    let result = detect_bytes("plain words".as_bytes());
    assert_eq!(result.content_type, ContentType::Text);
}
