// src/parsers/code.rs
//! Code and HTML parsers.
//!
//! Both treat the whole input as a single opaque block: code keeps the
//! detected language, HTML is preserved verbatim as `html`-tagged code.
//! Truncation to the platform limit happens later in conversion, where
//! a warning can be attached.

use crate::ast::AstNode;
use crate::config::ParseOptions;

/// Wrap the entire input in one code node.
pub fn parse(content: &str, language: Option<&str>, _options: &ParseOptions) -> Vec<AstNode> {
    if content.trim().is_empty() {
        return Vec::new();
    }
    vec![AstNode::CodeBlock {
        code: content.trim_end().to_string(),
        language: language.map(str::to_string),
    }]
}

/// HTML passes through as code tagged `html`; no DOM translation.
pub fn parse_html(content: &str, options: &ParseOptions) -> Vec<AstNode> {
    parse(content, Some("html"), options)
}
