// src/error.rs
//! Application error types with structured error handling.
//!
//! Error types form the vocabulary for failure modes in the system.
//! The split is deliberate: `ParseError` is the only thing the library
//! ever surfaces to a caller, while `IssueKind`/`Issue` classify the
//! recoverable degradations that travel inside the result envelope
//! instead of aborting the pipeline.

use std::fmt;
use thiserror::Error;

/// Classification of a recoverable pipeline finding as a typed vocabulary.
///
/// Instead of matching against magic strings like `"limit_exceeded"`,
/// the degradation taxonomy is encoded in the type system. Each variant
/// tells you exactly what the pipeline did to keep going and enables
/// pattern-based handling without stringly-typed dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Detection produced a low-confidence guess — informational only
    DetectionAmbiguous,
    /// A parser could not make sense of a span and emitted it as literal text
    MalformedSyntax,
    /// Content, block count, or nesting exceeded a platform limit and was
    /// truncated or flattened
    LimitExceeded,
    /// A code language outside the platform allow-list was normalized
    UnsupportedLanguage,
    /// An unexpected failure inside a pipeline stage
    ConversionFailure,
    /// The whole input was degraded to a single literal paragraph
    FallbackUsed,
    /// A block failed a structural well-formedness check
    InvalidStructure,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DetectionAmbiguous => write!(f, "detection_ambiguous"),
            Self::MalformedSyntax => write!(f, "malformed_syntax"),
            Self::LimitExceeded => write!(f, "limit_exceeded"),
            Self::UnsupportedLanguage => write!(f, "unsupported_language"),
            Self::ConversionFailure => write!(f, "conversion_failure"),
            Self::FallbackUsed => write!(f, "fallback_used"),
            Self::InvalidStructure => write!(f, "invalid_structure"),
        }
    }
}

/// Severity of an [`Issue`] in the validation report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

/// A single finding recorded while parsing, converting, or validating.
///
/// Issues never abort the pipeline; they accumulate into the validation
/// report so the caller can decide whether to surface truncation or
/// degradation notices to the user.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Issue {
    pub kind: IssueKind,
    pub severity: Severity,
    pub message: String,
    pub context: Option<String>,
}

impl Issue {
    pub fn warning(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Warning,
            message: message.into(),
            context: None,
        }
    }

    pub fn error(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Error,
            message: message.into(),
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)?;
        if let Some(ctx) = &self.context {
            write!(f, " ({})", ctx)?;
        }
        Ok(())
    }
}

/// The only error the library surfaces from `parse_content`.
///
/// Everything that can go wrong *inside* the pipeline is recovered —
/// locally as a literal text node, or globally via the fallback
/// paragraph. Rejecting an invalid configuration before any stage runs
/// is the single exception.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid parse options: {0}")]
    InvalidOptions(String),
}

/// Errors of the CLI host layer around the pipeline.
///
/// These never escape the binary: the library itself performs no I/O.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Error interacting with clipboard: {0}")]
    Clipboard(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Failed to serialize result: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<arboard::Error> for AppError {
    fn from(err: arboard::Error) -> Self {
        AppError::Clipboard(format!("Clipboard error: {}", err))
    }
}

/// Result type alias for convenience
#[allow(dead_code)]
pub type Result<T, E = AppError> = std::result::Result<T, E>;
