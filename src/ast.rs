// src/ast.rs
//! The generic intermediate tree every parser produces and the converter
//! consumes.
//!
//! Nodes form a tree with exclusively owned children — no parent links,
//! no cycles. Container kinds carry a children vector; leaf kinds have no
//! children field at all, so the container/leaf split holds by
//! construction rather than by runtime checks.

use crate::types::Color;

/// A node in the parsed content tree.
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    /// A literal run of text, used for malformed-syntax recovery.
    Text { content: String },
    Heading {
        level: u8,
        spans: Vec<InlineSpan>,
    },
    Paragraph { spans: Vec<InlineSpan> },
    /// A list; `items` contains only `ListItem` nodes.
    List {
        style: ListStyle,
        items: Vec<AstNode>,
    },
    ListItem {
        spans: Vec<InlineSpan>,
        checked: Option<bool>,
        children: Vec<AstNode>,
    },
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    CodeBlock {
        code: String,
        language: Option<String>,
    },
    Equation {
        expression: String,
        is_block: bool,
    },
    Quote {
        spans: Vec<InlineSpan>,
        children: Vec<AstNode>,
    },
    Toggle {
        spans: Vec<InlineSpan>,
        children: Vec<AstNode>,
    },
    Callout {
        icon: Option<String>,
        color: Color,
        spans: Vec<InlineSpan>,
        children: Vec<AstNode>,
    },
    Divider,
    Image { url: String, alt: String },
    Bookmark { url: String },
    Audio { url: String },
}

impl AstNode {
    /// A paragraph holding one unstyled span — the recovery shape for
    /// content that failed structured parsing.
    pub fn literal(content: impl Into<String>) -> Self {
        AstNode::Text {
            content: content.into(),
        }
    }

    /// Whether this node kind owns children.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            AstNode::List { .. }
                | AstNode::ListItem { .. }
                | AstNode::Quote { .. }
                | AstNode::Toggle { .. }
                | AstNode::Callout { .. }
                | AstNode::Table { .. }
        )
    }
}

/// The rendering style of a list and its items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStyle {
    Bulleted,
    Numbered,
    /// Checkbox items; each item carries its own checked state.
    Todo,
}

/// An inline run of uniformly formatted content inside a block.
#[derive(Debug, Clone, PartialEq)]
pub enum InlineSpan {
    Text {
        content: String,
        styles: InlineStyles,
    },
    Code { content: String },
    Link { text: String, url: String },
    Image { alt: String, url: String },
    Equation { expression: String },
}

impl InlineSpan {
    pub fn plain(content: impl Into<String>) -> Self {
        InlineSpan::Text {
            content: content.into(),
            styles: InlineStyles::default(),
        }
    }

    pub fn styled(content: impl Into<String>, styles: InlineStyles) -> Self {
        InlineSpan::Text {
            content: content.into(),
            styles,
        }
    }

    /// The visible text of this span, ignoring formatting.
    pub fn plain_text(&self) -> &str {
        match self {
            InlineSpan::Text { content, .. } => content,
            InlineSpan::Code { content } => content,
            InlineSpan::Link { text, .. } => text,
            InlineSpan::Image { alt, .. } => alt,
            InlineSpan::Equation { expression } => expression,
        }
    }
}

/// Formatting flags carried by a text span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InlineStyles {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
}

impl InlineStyles {
    pub const BOLD: Self = Self {
        bold: true,
        italic: false,
        strikethrough: false,
    };

    pub fn is_plain(&self) -> bool {
        !self.bold && !self.italic && !self.strikethrough
    }
}

/// Concatenated plain text of a span sequence.
pub fn spans_plain_text(spans: &[InlineSpan]) -> String {
    spans.iter().map(InlineSpan::plain_text).collect()
}
