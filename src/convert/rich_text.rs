// src/convert/rich_text.rs
//! Inline spans to platform rich-text items.
//!
//! One item per formatting run. Items longer than the rich-text limit are
//! split into consecutive items on char boundaries — content is never
//! dropped at this layer.

use crate::ast::InlineSpan;
use crate::config::ParseOptions;
use crate::types::rich_text::{Annotations, RichTextItem};

/// Convert a span sequence into limit-respecting rich-text items.
pub fn convert_spans(spans: &[InlineSpan], options: &ParseOptions) -> Vec<RichTextItem> {
    let mut items: Vec<RichTextItem> = Vec::new();
    for span in spans {
        items.extend(convert_span(span, options));
    }
    items
}

/// Raw text as unformatted rich-text items, split at `limit`.
pub fn from_plain(text: &str, limit: usize) -> Vec<RichTextItem> {
    split_chars(text, limit)
        .into_iter()
        .map(|chunk| RichTextItem::plain_text(&chunk))
        .collect()
}

fn convert_span(span: &InlineSpan, options: &ParseOptions) -> Vec<RichTextItem> {
    let limit = options.max_rich_text_length;
    match span {
        InlineSpan::Text { content, styles } => {
            let content = prepare_text(content, options);
            let annotations = if options.preserve_formatting {
                Annotations {
                    bold: styles.bold,
                    italic: styles.italic,
                    strikethrough: styles.strikethrough,
                    ..Annotations::default()
                }
            } else {
                Annotations::default()
            };
            split_chars(&content, limit)
                .into_iter()
                .map(|chunk| RichTextItem::annotated(&chunk, annotations.clone()))
                .collect()
        }
        InlineSpan::Code { content } => {
            let annotations = if options.preserve_formatting {
                Annotations::code()
            } else {
                Annotations::default()
            };
            split_chars(content, limit)
                .into_iter()
                .map(|chunk| RichTextItem::annotated(&chunk, annotations.clone()))
                .collect()
        }
        InlineSpan::Link { text, url } => {
            let text = prepare_text(text, options);
            let display = if text.is_empty() { url.as_str() } else { &text };
            if options.convert_links {
                split_chars(display, limit)
                    .into_iter()
                    .map(|chunk| RichTextItem::linked(&chunk, url))
                    .collect()
            } else {
                from_plain(display, limit)
            }
        }
        // No inline image exists in rich text; a link to the target is the
        // closest faithful rendering.
        InlineSpan::Image { alt, url } => {
            let display = if alt.is_empty() { url.as_str() } else { alt };
            if options.convert_images && options.convert_links {
                split_chars(display, limit)
                    .into_iter()
                    .map(|chunk| RichTextItem::linked(&chunk, url))
                    .collect()
            } else {
                from_plain(display, limit)
            }
        }
        InlineSpan::Equation { expression } => {
            let expression: String = expression
                .chars()
                .take(options.max_equation_length)
                .collect();
            vec![RichTextItem::equation(&expression)]
        }
    }
}

fn prepare_text(text: &str, options: &ParseOptions) -> String {
    if options.normalize_whitespace {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    } else {
        text.to_string()
    }
}

/// Split on char boundaries into chunks of at most `limit` chars.
fn split_chars(text: &str, limit: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(limit.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}
