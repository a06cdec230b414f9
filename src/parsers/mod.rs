// src/parsers/mod.rs
//! Content-type dispatch over the specialized parsers.
//!
//! Every detected type has exactly one parsing strategy; the dispatch is
//! exhaustive so a new content type cannot be added without deciding how
//! it parses.

pub mod code;
pub mod inline;
pub mod latex;
pub mod markdown;
pub mod table;

use crate::ast::{AstNode, InlineSpan};
use crate::config::ParseOptions;
use crate::types::detection::{ContentType, DetectionResult};

/// Parse content with the strategy the detection result names.
pub fn parse_for_type(
    content: &str,
    detection: &DetectionResult,
    options: &ParseOptions,
) -> Vec<AstNode> {
    match detection.content_type {
        ContentType::Url => vec![AstNode::Bookmark {
            url: content.trim().to_string(),
        }],
        ContentType::Audio => vec![AstNode::Audio {
            url: content.trim().to_string(),
        }],
        ContentType::Json => vec![AstNode::CodeBlock {
            code: content.trim_end().to_string(),
            language: Some("json".to_string()),
        }],
        ContentType::Latex => latex::parse(content, options),
        ContentType::Code => code::parse(content, detection.subtype.as_deref(), options),
        ContentType::Csv | ContentType::Tsv | ContentType::Table => {
            table::parse(content, delimiter_from_metadata(detection), options)
        }
        ContentType::Markdown => markdown::parse(content, options),
        ContentType::Html => code::parse_html(content, options),
        ContentType::Image => {
            // Image detection fires on binary magic, not text; a text
            // payload tagged Image can only carry a URL.
            let trimmed = content.trim();
            if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
                vec![AstNode::Image {
                    url: trimmed.to_string(),
                    alt: String::new(),
                }]
            } else {
                parse_plain_text(content)
            }
        }
        ContentType::Text => parse_plain_text(content),
    }
}

/// Plain text splits on blank lines; each chunk becomes one paragraph
/// with its interior newlines collapsed to spaces.
fn parse_plain_text(content: &str) -> Vec<AstNode> {
    content
        .split("\n\n")
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| AstNode::Paragraph {
            spans: vec![InlineSpan::plain(chunk.replace('\n', " "))],
        })
        .collect()
}

fn delimiter_from_metadata(detection: &DetectionResult) -> Option<char> {
    detection
        .metadata
        .get("delimiter")
        .and_then(|value| value.as_str())
        .and_then(|s| s.chars().next())
}
