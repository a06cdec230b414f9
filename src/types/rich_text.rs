// src/types/rich_text.rs
//! Rich text vocabulary matching the Notion API's inline model.

use serde::{Deserialize, Serialize};

/// The kind of rich text content — a typed vocabulary replacing stringly-typed dispatch.
///
/// Each variant carries its specific data, making invalid states
/// unrepresentable: you can't have an "equation" span with no expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RichTextType {
    Text { content: String, link: Option<Link> },
    Equation { expression: String },
}

/// Rich text item with formatting annotations.
///
/// The `text_type` field carries the content variant and `plain_text`
/// provides the fallback rendering for any variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTextItem {
    pub text_type: RichTextType,
    pub annotations: Annotations,
    pub plain_text: String,
}

impl RichTextItem {
    /// Create a plain text item — the most common rich text variant.
    pub fn plain_text(text: &str) -> Self {
        Self {
            text_type: RichTextType::Text {
                content: text.to_string(),
                link: None,
            },
            annotations: Annotations::default(),
            plain_text: text.to_string(),
        }
    }

    /// Create a text item with specific annotations.
    pub fn annotated(text: &str, annotations: Annotations) -> Self {
        Self {
            text_type: RichTextType::Text {
                content: text.to_string(),
                link: None,
            },
            annotations,
            plain_text: text.to_string(),
        }
    }

    /// Create a linked text item.
    pub fn linked(text: &str, url: &str) -> Self {
        Self {
            text_type: RichTextType::Text {
                content: text.to_string(),
                link: Some(Link {
                    url: url.to_string(),
                }),
            },
            annotations: Annotations::default(),
            plain_text: text.to_string(),
        }
    }

    /// Create an inline equation item.
    pub fn equation(expression: &str) -> Self {
        Self {
            text_type: RichTextType::Equation {
                expression: expression.to_string(),
            },
            annotations: Annotations::default(),
            plain_text: expression.to_string(),
        }
    }

    /// The character length of the content this span carries.
    pub fn content_len(&self) -> usize {
        match &self.text_type {
            RichTextType::Text { content, .. } => content.chars().count(),
            RichTextType::Equation { expression } => expression.chars().count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
    pub color: crate::types::Color,
}

impl Annotations {
    pub fn bold() -> Self {
        Self {
            bold: true,
            ..Default::default()
        }
    }

    pub fn code() -> Self {
        Self {
            code: true,
            ..Default::default()
        }
    }

    /// Whether every annotation is at its default — the common case the
    /// wire serializer still emits in full, per the API contract.
    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }
}
