// src/types/detection.rs
//! The detection vocabulary — content types, confidence, and the result
//! the detector hands to the parser dispatch.

use super::ValidationError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of content types the pipeline can recognize.
///
/// Parser dispatch is an exhaustive `match` over this enum, so adding a
/// variant forces every dispatch site to handle it at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Url,
    Audio,
    Json,
    Latex,
    Code,
    Csv,
    Tsv,
    Table,
    Markdown,
    Html,
    Image,
    Text,
}

impl ContentType {
    /// The wire/CLI name of this content type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::Audio => "audio",
            Self::Json => "json",
            Self::Latex => "latex",
            Self::Code => "code",
            Self::Csv => "csv",
            Self::Tsv => "tsv",
            Self::Table => "table",
            Self::Markdown => "markdown",
            Self::Html => "html",
            Self::Image => "image",
            Self::Text => "text",
        }
    }

    /// Whether this type is one of the delimiter-separated tabular family.
    pub fn is_tabular(&self) -> bool {
        matches!(self, Self::Csv | Self::Tsv | Self::Table)
    }
}

impl std::str::FromStr for ContentType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "url" => Ok(Self::Url),
            "audio" => Ok(Self::Audio),
            "json" => Ok(Self::Json),
            "latex" => Ok(Self::Latex),
            "code" => Ok(Self::Code),
            "csv" => Ok(Self::Csv),
            "tsv" => Ok(Self::Tsv),
            "table" => Ok(Self::Table),
            "markdown" | "md" => Ok(Self::Markdown),
            "html" => Ok(Self::Html),
            "image" => Ok(Self::Image),
            "text" | "plain" => Ok(Self::Text),
            other => Err(ValidationError::UnknownContentType(other.to_string())),
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A detection confidence score, clamped to [0, 1] by construction.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Confidence(f32);

impl Confidence {
    /// The floor below which a detection is recorded as ambiguous.
    pub const AMBIGUOUS_THRESHOLD: f32 = 0.6;

    /// Create a confidence score with validation.
    pub fn new(value: f32) -> Result<Self, ValidationError> {
        if !(0.0..=1.0).contains(&value) || value.is_nan() {
            return Err(ValidationError::OutOfBounds {
                value,
                min: 0.0,
                max: 1.0,
            });
        }
        Ok(Self(value))
    }

    /// Create a confidence score, clamping out-of-range inputs.
    ///
    /// Heuristic scoring arithmetic can overshoot; detection must never
    /// fail, so the clamping constructor is the one the detector uses.
    pub fn clamped(value: f32) -> Self {
        if value.is_nan() {
            return Self(0.0);
        }
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(&self) -> f32 {
        self.0
    }

    /// Whether this score falls below the ambiguity threshold.
    pub fn is_ambiguous(&self) -> bool {
        self.0 < Self::AMBIGUOUS_THRESHOLD
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// The detector's best guess for a piece of untyped content.
///
/// Produced fresh per call and never persisted. `metadata` is ordered so
/// the serialized report is stable across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub content_type: ContentType,
    pub subtype: Option<String>,
    pub confidence: Confidence,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub metadata: IndexMap<String, serde_json::Value>,
}

impl DetectionResult {
    pub fn new(content_type: ContentType, confidence: f32) -> Self {
        Self {
            content_type,
            subtype: None,
            confidence: Confidence::clamped(confidence),
            metadata: IndexMap::new(),
        }
    }

    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtype = Some(subtype.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}
