// src/validate.rs
//! Structural validation of a finished block tree.
//!
//! Validation is pure and deterministic: the same blocks always produce
//! the same report. In lenient mode every finding is a warning and the
//! tree stays valid; in strict mode the same findings become errors and
//! invalidate the tree.

use crate::constants::{MAX_BLOCK_DEPTH, MAX_EQUATION_LENGTH, MAX_RICH_TEXT_LENGTH};
use crate::convert::languages;
use crate::error::{Issue, IssueKind, Severity};
use crate::model::Block;
use serde::{Deserialize, Serialize};

/// The outcome of validating a block tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<Issue>,
    pub warnings: Vec<Issue>,
}

impl ValidationReport {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Fold an issue in, keeping `is_valid` consistent with the error
    /// list.
    pub fn push(&mut self, issue: Issue) {
        match issue.severity {
            Severity::Error => {
                self.is_valid = false;
                self.errors.push(issue);
            }
            Severity::Warning => self.warnings.push(issue),
        }
    }

    /// Absorb issues raised by earlier stages (parsing, conversion).
    pub fn absorb(&mut self, issues: Vec<Issue>) {
        for issue in issues {
            self.push(issue);
        }
    }
}

/// Validate every block against the platform's structural rules.
pub fn validate(blocks: &[Block], strict: bool) -> ValidationReport {
    let mut report = ValidationReport::valid();
    for (index, block) in blocks.iter().enumerate() {
        check_block(block, 1, &format!("blocks[{}]", index), strict, &mut report);
    }
    report
}

fn check_block(block: &Block, depth: usize, path: &str, strict: bool, report: &mut ValidationReport) {
    // Table rows are structural children, not user nesting.
    if depth > MAX_BLOCK_DEPTH && !matches!(block, Block::TableRow(_)) {
        finding(
            report,
            strict,
            IssueKind::LimitExceeded,
            format!("{}: nesting depth {} exceeds {}", path, depth, MAX_BLOCK_DEPTH),
        );
    }

    if block.has_children() != !block.children().is_empty() {
        finding(
            report,
            strict,
            IssueKind::InvalidStructure,
            format!("{}: has_children flag disagrees with children", path),
        );
    }

    if !block.children().is_empty() && !block.supports_children() {
        finding(
            report,
            strict,
            IssueKind::InvalidStructure,
            format!("{}: {} blocks cannot carry children", path, block.block_type()),
        );
    }

    if let Some(items) = block.rich_text() {
        if items.is_empty() && !block.is_structural() {
            finding(
                report,
                strict,
                IssueKind::InvalidStructure,
                format!("{}: empty rich_text", path),
            );
        }
        for (i, item) in items.iter().enumerate() {
            if item.content_len() > MAX_RICH_TEXT_LENGTH {
                finding(
                    report,
                    strict,
                    IssueKind::LimitExceeded,
                    format!(
                        "{}: rich_text[{}] holds {} characters, limit is {}",
                        path,
                        i,
                        item.content_len(),
                        MAX_RICH_TEXT_LENGTH
                    ),
                );
            }
        }
    }

    match block {
        Block::Table(table) => check_table(block, table.table_width, path, strict, report),
        Block::Code(code) => {
            if !languages::is_supported(&code.language) {
                finding(
                    report,
                    strict,
                    IssueKind::UnsupportedLanguage,
                    format!("{}: language '{}' is not supported", path, code.language),
                );
            }
        }
        Block::Equation(equation) => {
            let len = equation.expression.chars().count();
            if equation.expression.trim().is_empty() {
                finding(
                    report,
                    strict,
                    IssueKind::InvalidStructure,
                    format!("{}: empty equation expression", path),
                );
            } else if len > MAX_EQUATION_LENGTH {
                finding(
                    report,
                    strict,
                    IssueKind::LimitExceeded,
                    format!(
                        "{}: equation holds {} characters, limit is {}",
                        path, len, MAX_EQUATION_LENGTH
                    ),
                );
            }
        }
        _ => {}
    }

    for (index, child) in block.children().iter().enumerate() {
        let child_path = format!("{}.children[{}]", path, index);
        check_block(child, depth + 1, &child_path, strict, report);
    }
}

fn check_table(
    block: &Block,
    table_width: usize,
    path: &str,
    strict: bool,
    report: &mut ValidationReport,
) {
    let rows = block.children();
    if rows.is_empty() {
        finding(
            report,
            strict,
            IssueKind::InvalidStructure,
            format!("{}: table has no rows", path),
        );
        return;
    }
    for (index, row) in rows.iter().enumerate() {
        let Block::TableRow(table_row) = row else {
            finding(
                report,
                strict,
                IssueKind::InvalidStructure,
                format!("{}: table child [{}] is not a table_row", path, index),
            );
            continue;
        };
        if table_row.cells.len() != table_width {
            finding(
                report,
                strict,
                IssueKind::InvalidStructure,
                format!(
                    "{}: row [{}] has {} cells, table_width is {}",
                    path,
                    index,
                    table_row.cells.len(),
                    table_width
                ),
            );
        }
    }
}

fn finding(report: &mut ValidationReport, strict: bool, kind: IssueKind, message: String) {
    let issue = if strict {
        Issue::error(kind, message)
    } else {
        Issue::warning(kind, message)
    };
    report.push(issue);
}
