// src/lib.rs
//! clip2notion library — converts clipboard, web, or file text into Notion
//! API block trees.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling** — `ParseError`, `AppError`, `Issue`, `IssueKind`
//! - **Configuration** — `ParseOptions`, `TypeOverride`, `HeadingOverflow`
//! - **Detection** — `detect`, `ContentType`, `DetectionResult`, `Confidence`
//! - **Parsing** — `scan`, the specialized parsers, `AstNode`, `InlineSpan`
//! - **Conversion** — `convert`, rich-text assembly, the language allow-list
//! - **Block model** — `Block` and its payload structs, wire serialization
//! - **Orchestration** — `parse_content` and the typed entry points

pub mod ast;
pub mod config;
pub mod constants;
pub mod convert;
pub mod detect;
pub mod error;
pub mod model;
pub mod output;
pub mod parsers;
pub mod pipeline;
pub mod scan;
pub mod types;
pub mod validate;

// --- Error Handling ---
pub use crate::error::{AppError, Issue, IssueKind, ParseError, Severity};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{HeadingOverflow, ParseOptions, TypeOverride};

// --- Detection ---
pub use crate::detect::{detect, detect_bytes};
pub use crate::types::detection::{Confidence, ContentType, DetectionResult};

// --- Scanning & AST ---
pub use crate::ast::{AstNode, InlineSpan, InlineStyles, ListStyle};
pub use crate::scan::{scan, Token, TokenKind};

// --- Block Model ---
pub use crate::model::blocks::{
    AudioBlock, BookmarkBlock, BulletedListItemBlock, CalloutBlock, CodeBlock, DividerBlock,
    EquationBlock, ExternalFile, FileObject, Heading1Block, Heading2Block, Heading3Block, Icon,
    ImageBlock, NumberedListItemBlock, ParagraphBlock, QuoteBlock, TableBlock, TableRowBlock,
    TextBlockContent, ToDoBlock, ToggleBlock,
};
pub use crate::model::{Block, BlockCommon};
pub use crate::types::rich_text::{Annotations, Link, RichTextItem, RichTextType};
pub use crate::types::Color;

// --- Conversion & Validation ---
pub use crate::convert::convert;
pub use crate::validate::{validate, ValidationReport};

// --- Orchestration ---
pub use crate::pipeline::{
    parse_code, parse_content, parse_latex, parse_markdown, parse_table, ParseMetadata,
    ParseResult,
};
