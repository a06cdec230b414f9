// src/parsers/inline.rs
//! Inline markdown parsing — splits a line of text into formatting runs.
//!
//! The scanner works at line granularity; this module works inside the
//! line, producing one [`InlineSpan`] per uniformly formatted run. An
//! opening marker with no matching closer is literal text: inline parsing
//! never fails, it only degrades.

use crate::ast::{InlineSpan, InlineStyles};

/// Parse a run of text into inline spans.
pub fn parse_inline(text: &str) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    parse_styled(text, InlineStyles::default(), &mut spans);
    spans
}

fn parse_styled(text: &str, styles: InlineStyles, out: &mut Vec<InlineSpan>) {
    let mut literal = String::new();
    let mut i = 0;

    while i < text.len() {
        let rest = &text[i..];

        if let Some(consumed) = try_image(rest, &mut literal, out, styles)
            .or_else(|| try_link(rest, &mut literal, out, styles))
            .or_else(|| try_code(rest, &mut literal, out, styles))
            .or_else(|| try_equation(rest, &mut literal, out, styles))
            .or_else(|| try_delimited(rest, "**", styles.with_bold(), &mut literal, out, styles))
            .or_else(|| try_delimited(rest, "__", styles.with_bold(), &mut literal, out, styles))
            .or_else(|| try_delimited(rest, "~~", styles.with_strikethrough(), &mut literal, out, styles))
            .or_else(|| try_delimited(rest, "*", styles.with_italic(), &mut literal, out, styles))
            .or_else(|| try_delimited(rest, "_", styles.with_italic(), &mut literal, out, styles))
        {
            i += consumed;
            continue;
        }

        // No marker matched here; the next char is literal.
        let ch = rest.chars().next().unwrap_or_default();
        literal.push(ch);
        i += ch.len_utf8();
    }

    flush_literal(&mut literal, styles, out);
}

fn flush_literal(literal: &mut String, styles: InlineStyles, out: &mut Vec<InlineSpan>) {
    if !literal.is_empty() {
        out.push(InlineSpan::styled(std::mem::take(literal), styles));
    }
}

/// `![alt](url)` — must be tried before links.
fn try_image(
    rest: &str,
    literal: &mut String,
    out: &mut Vec<InlineSpan>,
    styles: InlineStyles,
) -> Option<usize> {
    if !rest.starts_with("![") {
        return None;
    }
    let (alt, url, consumed) = bracket_pair(&rest[1..])?;
    flush_literal(literal, styles, out);
    out.push(InlineSpan::Image {
        alt: alt.to_string(),
        url: url.to_string(),
    });
    Some(consumed + 1)
}

/// `[text](url)`.
fn try_link(
    rest: &str,
    literal: &mut String,
    out: &mut Vec<InlineSpan>,
    styles: InlineStyles,
) -> Option<usize> {
    if !rest.starts_with('[') {
        return None;
    }
    let (text, url, consumed) = bracket_pair(rest)?;
    flush_literal(literal, styles, out);
    out.push(InlineSpan::Link {
        text: text.to_string(),
        url: url.to_string(),
    });
    Some(consumed)
}

/// Parse `[a](b)` starting at `rest`; returns (a, b, bytes consumed).
fn bracket_pair(rest: &str) -> Option<(&str, &str, usize)> {
    let close_bracket = rest.find("](")?;
    let text = &rest[1..close_bracket];
    let after = &rest[close_bracket + 2..];
    let close_paren = after.find(')')?;
    let url = &after[..close_paren];
    if url.is_empty() {
        return None;
    }
    Some((text, url, close_bracket + 2 + close_paren + 1))
}

/// `` `code` `` — interior is opaque, no nested formatting.
fn try_code(
    rest: &str,
    literal: &mut String,
    out: &mut Vec<InlineSpan>,
    styles: InlineStyles,
) -> Option<usize> {
    if !rest.starts_with('`') {
        return None;
    }
    let close = rest[1..].find('`')?;
    if close == 0 {
        return None;
    }
    flush_literal(literal, styles, out);
    out.push(InlineSpan::Code {
        content: rest[1..1 + close].to_string(),
    });
    Some(close + 2)
}

/// `$expr$` — a doubled `$$` is literal, to avoid misfiring on an
/// incomplete block-equation continuation.
fn try_equation(
    rest: &str,
    literal: &mut String,
    out: &mut Vec<InlineSpan>,
    styles: InlineStyles,
) -> Option<usize> {
    if !rest.starts_with('$') || rest.starts_with("$$") {
        return None;
    }
    let close = rest[1..].find('$')?;
    if close == 0 {
        return None;
    }
    let expression = &rest[1..1 + close];
    flush_literal(literal, styles, out);
    out.push(InlineSpan::Equation {
        expression: expression.to_string(),
    });
    Some(close + 2)
}

/// A symmetric delimiter like `**`, `~~`, or `*`; interior is parsed
/// recursively with the merged style.
fn try_delimited(
    rest: &str,
    delimiter: &str,
    inner_styles: InlineStyles,
    literal: &mut String,
    out: &mut Vec<InlineSpan>,
    styles: InlineStyles,
) -> Option<usize> {
    let inner_start = rest.strip_prefix(delimiter)?;
    // Opener must be followed by visible content, not whitespace — keeps
    // "2 * 3 * 4" literal.
    if inner_start.starts_with(char::is_whitespace) || inner_start.is_empty() {
        return None;
    }
    let mut close = inner_start.find(delimiter)?;
    if close == 0 {
        return None;
    }
    // A closer inside a longer marker run (`***`) binds as late as the run
    // allows, so `**bold *both***` closes the italic before the bold.
    let marker = delimiter.as_bytes()[0];
    while inner_start.as_bytes().get(close + delimiter.len()) == Some(&marker) {
        close += 1;
    }
    let inner = &inner_start[..close];
    flush_literal(literal, styles, out);
    parse_styled(inner, inner_styles, out);
    Some(delimiter.len() * 2 + close)
}

impl InlineStyles {
    fn with_bold(self) -> Self {
        Self { bold: true, ..self }
    }

    fn with_italic(self) -> Self {
        Self {
            italic: true,
            ..self
        }
    }

    fn with_strikethrough(self) -> Self {
        Self {
            strikethrough: true,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_single_span() {
        let spans = parse_inline("just words");
        assert_eq!(spans, vec![InlineSpan::plain("just words")]);
    }

    #[test]
    fn test_bold_run_splits_into_three_spans() {
        let spans = parse_inline("Body **bold** tail");
        assert_eq!(
            spans,
            vec![
                InlineSpan::plain("Body "),
                InlineSpan::styled("bold", InlineStyles::BOLD),
                InlineSpan::plain(" tail"),
            ]
        );
    }

    #[test]
    fn test_nested_bold_italic() {
        let spans = parse_inline("**bold *both***");
        assert_eq!(
            spans,
            vec![
                InlineSpan::styled("bold ", InlineStyles::BOLD),
                InlineSpan::styled(
                    "both",
                    InlineStyles {
                        bold: true,
                        italic: true,
                        strikethrough: false
                    }
                ),
            ]
        );
    }

    #[test]
    fn test_code_span_is_opaque() {
        let spans = parse_inline("run `cargo **build**` now");
        assert_eq!(
            spans,
            vec![
                InlineSpan::plain("run "),
                InlineSpan::Code {
                    content: "cargo **build**".to_string()
                },
                InlineSpan::plain(" now"),
            ]
        );
    }

    #[test]
    fn test_link_and_image() {
        let spans = parse_inline("see [docs](https://example.com) and ![pic](https://example.com/a.png)");
        assert_eq!(
            spans[1],
            InlineSpan::Link {
                text: "docs".to_string(),
                url: "https://example.com".to_string()
            }
        );
        assert_eq!(
            spans[3],
            InlineSpan::Image {
                alt: "pic".to_string(),
                url: "https://example.com/a.png".to_string()
            }
        );
    }

    #[test]
    fn test_unclosed_marker_stays_literal() {
        assert_eq!(
            parse_inline("a ** dangles"),
            vec![InlineSpan::plain("a ** dangles")]
        );
        assert_eq!(
            parse_inline("[no url]"),
            vec![InlineSpan::plain("[no url]")]
        );
    }

    #[test]
    fn test_asterisk_arithmetic_stays_literal() {
        assert_eq!(
            parse_inline("2 * 3 * 4"),
            vec![InlineSpan::plain("2 * 3 * 4")]
        );
    }

    #[test]
    fn test_inline_equation() {
        let spans = parse_inline("energy $E = mc^2$ here");
        assert_eq!(
            spans[1],
            InlineSpan::Equation {
                expression: "E = mc^2".to_string()
            }
        );
    }

    #[test]
    fn test_double_dollar_is_literal() {
        assert_eq!(
            parse_inline("costs $$ double"),
            vec![InlineSpan::plain("costs $$ double")]
        );
    }

    #[test]
    fn test_strikethrough() {
        let spans = parse_inline("~~gone~~");
        assert_eq!(
            spans,
            vec![InlineSpan::styled(
                "gone",
                InlineStyles {
                    strikethrough: true,
                    ..Default::default()
                }
            )]
        );
    }
}
