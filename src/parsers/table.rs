// src/parsers/table.rs
//! Tabular parser for delimiter-separated values and pipe tables.
//!
//! The first data row always becomes the header row; every following row
//! is padded or truncated to the header width so the resulting table is
//! rectangular.

use crate::ast::AstNode;
use crate::config::ParseOptions;
use crate::detect::infer_delimiter;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PIPE_SEPARATOR_ROW: Regex = Regex::new(r"^\|?[\s:|-]+\|?$")
        .expect("Failed to compile pipe separator regex - this is a bug");
}

/// Parse delimiter-separated content into a single table node.
///
/// The delimiter comes from detection metadata when available, otherwise
/// it is re-inferred from the content. Content with no consistent
/// delimiter degrades to literal text nodes, one per line.
pub fn parse(content: &str, delimiter_hint: Option<char>, options: &ParseOptions) -> Vec<AstNode> {
    let lines: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.is_empty() {
        return Vec::new();
    }

    if lines.iter().all(|l| looks_like_pipe_row(l)) {
        let owned: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        if let Some(table) = parse_pipe_rows(&owned) {
            return vec![table];
        }
    }

    let delimiter = delimiter_hint
        .or_else(|| infer_delimiter(content).map(|(d, _)| d))
        .or_else(|| header_delimiter(lines[0]));
    let Some(delimiter) = delimiter else {
        return lines.into_iter().map(AstNode::literal).collect();
    };

    let mut rows = lines.iter().map(|line| split_row(line, delimiter));
    let headers: Vec<String> = match rows.next() {
        Some(headers) => headers,
        None => return Vec::new(),
    };
    // Coarse memory bound only. The exact budget cut happens at
    // conversion, where truncation is recorded as an issue.
    let width = headers.len();
    let body: Vec<Vec<String>> = rows
        .take(options.max_blocks)
        .map(|row| fit_to_width(row, width))
        .collect();

    vec![AstNode::Table {
        headers,
        rows: body,
    }]
}

/// Parse a run of `|`-delimited rows already gathered by another parser.
///
/// The markdown separator row (`|---|---|`) is dropped; the first
/// remaining row becomes the header. Returns `None` when no data rows
/// survive, so the caller can fall back to paragraph text.
pub fn parse_pipe_rows(rows: &[String]) -> Option<AstNode> {
    let mut parsed: Vec<Vec<String>> = rows
        .iter()
        .filter(|row| !PIPE_SEPARATOR_ROW.is_match(row.trim()))
        .map(|row| split_pipe_row(row))
        .filter(|cells| !cells.is_empty())
        .collect();

    if parsed.is_empty() {
        return None;
    }

    let headers = parsed.remove(0);
    let width = headers.len();
    let body: Vec<Vec<String>> = parsed
        .into_iter()
        .map(|row| fit_to_width(row, width))
        .collect();

    Some(AstNode::Table {
        headers,
        rows: body,
    })
}

/// Lenient inference for content already routed here: detection demands a
/// uniform count per line, but ragged rows are this parser's job to fix,
/// so the delimiter only has to show up in the header line.
fn header_delimiter(header: &str) -> Option<char> {
    ['\t', ',', ';']
        .into_iter()
        .map(|delimiter| (delimiter, header.matches(delimiter).count()))
        .filter(|&(_, count)| count > 0)
        .max_by_key(|&(_, count)| count)
        .map(|(delimiter, _)| delimiter)
}

fn looks_like_pipe_row(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with('|') && trimmed.ends_with('|') && trimmed.len() > 1
}

fn split_row(line: &str, delimiter: char) -> Vec<String> {
    line.split(delimiter)
        .map(|cell| cell.trim().to_string())
        .collect()
}

/// Split a pipe row into cells, discarding the edge pipes.
fn split_pipe_row(row: &str) -> Vec<String> {
    let trimmed = row.trim();
    let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner.split('|').map(|cell| cell.trim().to_string()).collect()
}

fn fit_to_width(mut row: Vec<String>, width: usize) -> Vec<String> {
    row.resize(width, String::new());
    row
}
