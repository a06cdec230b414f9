// src/pipeline.rs
//! The parse orchestrator.
//!
//! One synchronous stage machine per call: detect → parse → convert →
//! validate. The middle stages can divert to an absorbing fallback that
//! renders the raw input as a single paragraph, so the function is total
//! for valid options — the only `Err` is option validation, checked
//! before any stage runs.

use crate::config::{ParseOptions, TypeOverride};
use crate::convert;
use crate::detect;
use crate::error::{Issue, IssueKind, ParseError};
use crate::model::{ser, Block};
use crate::parsers;
use crate::types::detection::{ContentType, DetectionResult};
use crate::validate::{validate, ValidationReport};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

/// Where the orchestrator currently is; `Fallback` is absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Parsing,
    Converting,
    Validating,
    Fallback,
    Done,
}

/// Everything a parse run produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    pub blocks: Vec<Block>,
    pub metadata: ParseMetadata,
    pub validation: Option<ValidationReport>,
}

impl ParseResult {
    /// The append-children request body: `{"children": [...]}`.
    pub fn to_api_payload(&self) -> serde_json::Value {
        ser::blocks_to_payload(&self.blocks)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseMetadata {
    pub detected_type: ContentType,
    pub subtype: Option<String>,
    pub confidence: f32,
    pub block_count: usize,
    pub original_length: usize,
    pub processing_time_ms: u64,
    pub parsed_at: DateTime<Utc>,
}

/// Parse arbitrary text into platform blocks.
///
/// Detection runs unless the options carry an explicit type override.
/// Non-empty input always yields at least one block; empty input is the
/// only input that yields zero.
pub fn parse_content(content: &str, options: &ParseOptions) -> Result<ParseResult, ParseError> {
    options.validate()?;
    let start = Instant::now();

    if content.trim().is_empty() {
        return Ok(empty_result(content, start));
    }

    let detection = match &options.content_type {
        TypeOverride::Auto => detect::detect(content),
        TypeOverride::Explicit(content_type) => DetectionResult::new(*content_type, 1.0),
    };
    log::debug!(
        "detected {} (confidence {})",
        detection.content_type.as_str(),
        detection.confidence
    );

    Ok(run_stages(content, detection, options, start))
}

/// Parse content already known to be markdown, skipping detection.
pub fn parse_markdown(content: &str, options: &ParseOptions) -> Result<ParseResult, ParseError> {
    parse_as(content, ContentType::Markdown, options)
}

/// Parse content already known to be code, skipping detection.
pub fn parse_code(content: &str, options: &ParseOptions) -> Result<ParseResult, ParseError> {
    parse_as(content, ContentType::Code, options)
}

/// Parse content already known to be tabular, skipping detection.
pub fn parse_table(content: &str, options: &ParseOptions) -> Result<ParseResult, ParseError> {
    parse_as(content, ContentType::Table, options)
}

/// Parse content already known to be LaTeX, skipping detection.
pub fn parse_latex(content: &str, options: &ParseOptions) -> Result<ParseResult, ParseError> {
    parse_as(content, ContentType::Latex, options)
}

fn parse_as(
    content: &str,
    content_type: ContentType,
    options: &ParseOptions,
) -> Result<ParseResult, ParseError> {
    options.validate()?;
    let start = Instant::now();
    if content.trim().is_empty() {
        return Ok(empty_result(content, start));
    }
    let detection = DetectionResult::new(content_type, 1.0);
    Ok(run_stages(content, detection, options, start))
}

fn run_stages(
    content: &str,
    detection: DetectionResult,
    options: &ParseOptions,
    start: Instant,
) -> ParseResult {
    let mut issues: Vec<Issue> = Vec::new();
    if detection.confidence.is_ambiguous() {
        issues.push(Issue::warning(
            IssueKind::DetectionAmbiguous,
            format!(
                "low-confidence detection: {} at {}",
                detection.content_type.as_str(),
                detection.confidence
            ),
        ));
    }

    let mut stage = Stage::Parsing;
    let mut nodes = Vec::new();
    let mut blocks: Vec<Block> = Vec::new();
    let mut validation: Option<ValidationReport> = None;

    while stage != Stage::Done {
        stage = match stage {
            Stage::Parsing => {
                let outcome = catch_unwind(AssertUnwindSafe(|| {
                    parsers::parse_for_type(content, &detection, options)
                }));
                match outcome {
                    Ok(parsed) => {
                        nodes = parsed;
                        Stage::Converting
                    }
                    Err(_) => {
                        log::warn!("parser panicked, switching to fallback");
                        issues.push(Issue::warning(
                            IssueKind::ConversionFailure,
                            "parser failed, content rendered as plain text",
                        ));
                        Stage::Fallback
                    }
                }
            }
            Stage::Converting => {
                let outcome =
                    catch_unwind(AssertUnwindSafe(|| convert::convert(&nodes, options)));
                match outcome {
                    Ok((converted, conversion_issues)) => {
                        issues.extend(conversion_issues);
                        if converted.is_empty() {
                            // Non-empty input must produce at least one
                            // block.
                            Stage::Fallback
                        } else {
                            blocks = converted;
                            Stage::Validating
                        }
                    }
                    Err(_) => {
                        log::warn!("converter panicked, switching to fallback");
                        issues.push(Issue::warning(
                            IssueKind::ConversionFailure,
                            "conversion failed, content rendered as plain text",
                        ));
                        Stage::Fallback
                    }
                }
            }
            Stage::Fallback => {
                issues.push(Issue::warning(
                    IssueKind::FallbackUsed,
                    "content delivered as a single plain paragraph",
                ));
                blocks = vec![Block::paragraph(convert::rich_text::from_plain(
                    content,
                    options.max_rich_text_length,
                ))];
                let mut report = validate(&blocks, options.strict_validation);
                report.absorb(std::mem::take(&mut issues));
                validation = Some(report);
                Stage::Done
            }
            Stage::Validating => {
                let outcome = catch_unwind(AssertUnwindSafe(|| {
                    validate(&blocks, options.strict_validation)
                }));
                match outcome {
                    Ok(mut report) => {
                        report.absorb(std::mem::take(&mut issues));
                        validation = Some(report);
                        Stage::Done
                    }
                    Err(_) => {
                        log::warn!("validator panicked, switching to fallback");
                        issues.push(Issue::warning(
                            IssueKind::ConversionFailure,
                            "validation failed, content rendered as plain text",
                        ));
                        Stage::Fallback
                    }
                }
            }
            Stage::Done => Stage::Done,
        };
    }

    let block_count = blocks.len();
    ParseResult {
        blocks,
        metadata: ParseMetadata {
            detected_type: detection.content_type,
            subtype: detection.subtype,
            confidence: detection.confidence.value(),
            block_count,
            original_length: content.chars().count(),
            processing_time_ms: start.elapsed().as_millis() as u64,
            parsed_at: Utc::now(),
        },
        validation,
    }
}

/// Empty and whitespace-only input is the one input allowed to produce
/// zero blocks.
fn empty_result(content: &str, start: Instant) -> ParseResult {
    ParseResult {
        blocks: Vec::new(),
        metadata: ParseMetadata {
            detected_type: ContentType::Text,
            subtype: None,
            confidence: 1.0,
            block_count: 0,
            original_length: content.chars().count(),
            processing_time_ms: start.elapsed().as_millis() as u64,
            parsed_at: Utc::now(),
        },
        validation: Some(ValidationReport::valid()),
    }
}
