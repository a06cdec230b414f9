// src/detect.rs
//! Content-type detection — the first pipeline stage.
//!
//! Detection is a fixed priority chain; each stage short-circuits on a
//! match. The order is a correctness invariant, not an implementation
//! accident: audio outranks generic URL, code and JSON outrank LaTeX even
//! when the content is dollar-delimited, and the tabular family outranks
//! markdown so a pipe table is never mistaken for prose.
//!
//! `detect` is a pure function over the input string. It never fails;
//! unknown content degrades to `Text` at fallback confidence.

use crate::constants::{
    CONFIDENCE_CODE, CONFIDENCE_FALLBACK, CONFIDENCE_HTML, CONFIDENCE_JSON, CONFIDENCE_LATEX,
    CONFIDENCE_MARKDOWN, CONFIDENCE_TABLE, CONFIDENCE_URL, TABLE_SAMPLE_LINES,
};
use crate::types::{ContentType, DetectionResult};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::json;

lazy_static! {
    static ref URL_PATTERN: Regex =
        Regex::new(r"^https?://\S+$").expect("Failed to compile URL regex - this is a bug");
    static ref AUDIO_EXTENSION: Regex = Regex::new(r"(?i)\.(mp3|wav|ogg|m4a|flac|aac|wma)(\?.*)?$")
        .expect("Failed to compile audio extension regex - this is a bug");
    static ref LATEX_ENVIRONMENT: Regex = Regex::new(r"\\begin\{[a-zA-Z*]+\}")
        .expect("Failed to compile LaTeX environment regex - this is a bug");
    static ref LATEX_COMMAND: Regex = Regex::new(r"\\[a-zA-Z]+")
        .expect("Failed to compile LaTeX command regex - this is a bug");
    static ref MARKDOWN_HEADING: Regex = Regex::new(r"(?m)^#{1,6}\s+\S")
        .expect("Failed to compile markdown heading regex - this is a bug");
    static ref MARKDOWN_LIST: Regex = Regex::new(r"(?m)^\s*(?:[-*+]|\d+\.)\s+\S")
        .expect("Failed to compile markdown list regex - this is a bug");
    static ref MARKDOWN_LINK: Regex = Regex::new(r"\[[^\]]+\]\([^)]+\)")
        .expect("Failed to compile markdown link regex - this is a bug");
    static ref MARKDOWN_EMPHASIS: Regex = Regex::new(r"\*\*[^*]+\*\*|__[^_]+__|~~[^~]+~~")
        .expect("Failed to compile markdown emphasis regex - this is a bug");
    static ref PIPE_TABLE_SEPARATOR: Regex = Regex::new(r"^\|?\s*:?-{2,}:?\s*(\|\s*:?-{2,}:?\s*)+\|?\s*$")
        .expect("Failed to compile pipe table separator regex - this is a bug");
    static ref HTML_CLOSING_TAG: Regex = Regex::new(r"</([a-zA-Z][a-zA-Z0-9]*)\s*>")
        .expect("Failed to compile HTML closing tag regex - this is a bug");
    static ref CODE_SIGNATURE: Regex = Regex::new(
        r"(?m)^\s*(?:fn|pub fn|def|class|function|impl|struct|enum|interface|import|from|use|package|#include|let|const|var|public|private|static|async|func|void|int|return)\b"
    )
    .expect("Failed to compile code signature regex - this is a bug");
}

/// Detect the semantic type of untyped text content.
pub fn detect(content: &str) -> DetectionResult {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return DetectionResult::new(ContentType::Text, 1.0);
    }

    if let Some(result) = detect_url(trimmed) {
        return result;
    }
    if let Some(result) = detect_latex(trimmed) {
        return result;
    }
    if let Some(result) = detect_json(trimmed) {
        return result;
    }
    if let Some(result) = detect_code(trimmed) {
        return result;
    }
    if let Some(result) = detect_tabular(trimmed) {
        return result;
    }
    if let Some(result) = detect_markdown(trimmed) {
        return result;
    }
    if let Some(result) = detect_html(trimmed) {
        return result;
    }

    DetectionResult::new(ContentType::Text, CONFIDENCE_FALLBACK)
}

/// Detect the semantic type of a raw buffer.
///
/// Image formats are sniffed by magic number; anything else is treated as
/// (possibly lossy) UTF-8 text and routed through [`detect`].
pub fn detect_bytes(bytes: &[u8]) -> DetectionResult {
    if let Some(format) = sniff_image_format(bytes) {
        return DetectionResult::new(ContentType::Image, 1.0).with_subtype(format);
    }
    detect(&String::from_utf8_lossy(bytes))
}

fn sniff_image_format(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        Some("png")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("jpeg")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("gif")
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("webp")
    } else {
        None
    }
}

/// Stage 1: URL, with audio file extensions outranking generic URLs.
fn detect_url(trimmed: &str) -> Option<DetectionResult> {
    if trimmed.lines().count() != 1 || !URL_PATTERN.is_match(trimmed) {
        return None;
    }
    // url::Url catches things the coarse regex lets through, like
    // "https://" with no host.
    let parsed = url::Url::parse(trimmed).ok()?;
    if parsed.host_str().is_none() {
        return None;
    }

    if let Some(captures) = AUDIO_EXTENSION.captures(parsed.path()) {
        let extension = captures.get(1).map(|m| m.as_str().to_lowercase());
        let mut result = DetectionResult::new(ContentType::Audio, CONFIDENCE_URL);
        if let Some(ext) = extension {
            result = result.with_subtype(ext);
        }
        return Some(result);
    }

    Some(DetectionResult::new(ContentType::Url, CONFIDENCE_URL))
}

/// Stage 2: LaTeX delimiters, unless the enclosed content is really code.
///
/// The lowest-confidence category: `$function(){}$` is dollar-delimited
/// but must classify as code, so the inner content is inspected before
/// this stage claims a match.
fn detect_latex(trimmed: &str) -> Option<DetectionResult> {
    let inner = latex_inner_content(trimmed)?;
    if looks_like_code(inner) || URL_PATTERN.is_match(inner.trim()) {
        return None;
    }

    // A delimited span with no LaTeX command or math operator in it is
    // more likely stray dollar signs than an equation.
    let has_math_shape = LATEX_COMMAND.is_match(inner)
        || inner.contains('^')
        || inner.contains('_')
        || inner.contains('=');
    let starts_with_env = LATEX_ENVIRONMENT.is_match(trimmed);
    if !has_math_shape && !starts_with_env {
        return None;
    }

    let confidence = if starts_with_env || LATEX_COMMAND.is_match(inner) {
        CONFIDENCE_LATEX + 0.3
    } else {
        CONFIDENCE_LATEX
    };
    Some(DetectionResult::new(ContentType::Latex, confidence))
}

/// The content between LaTeX delimiters, or the whole input for
/// `\begin`-style environments.
fn latex_inner_content(trimmed: &str) -> Option<&str> {
    if LATEX_ENVIRONMENT.is_match(trimmed) {
        return Some(trimmed);
    }
    let stripped = trimmed
        .strip_prefix("$$")
        .and_then(|rest| rest.strip_suffix("$$"))
        .or_else(|| {
            trimmed
                .strip_prefix('$')
                .and_then(|rest| rest.strip_suffix('$'))
        })?;
    if stripped.is_empty() {
        return None;
    }
    Some(stripped)
}

/// Stage 3: strict JSON.
fn detect_json(trimmed: &str) -> Option<DetectionResult> {
    let looks_delimited = (trimmed.starts_with('{') && trimmed.ends_with('}'))
        || (trimmed.starts_with('[') && trimmed.ends_with(']'));
    if !looks_delimited {
        return None;
    }
    serde_json::from_str::<serde_json::Value>(trimmed).ok()?;
    Some(DetectionResult::new(ContentType::Json, CONFIDENCE_JSON))
}

/// Stage 4: code heuristics.
///
/// Scores statement prefixes, bracket/semicolon density, and multi-line
/// shape; fires only when the accumulated evidence clears the floor.
fn detect_code(trimmed: &str) -> Option<DetectionResult> {
    // Dollar-delimited code ("$function(){}$") reaches this stage after
    // the latex stage declines; the wrapper defeats the line-anchored
    // signature regex, so score the interior instead.
    let candidate = latex_inner_content(trimmed)
        .filter(|inner| looks_like_code(inner))
        .unwrap_or(trimmed);
    if !looks_like_code(candidate) {
        return None;
    }
    let mut result = DetectionResult::new(ContentType::Code, code_score(candidate));
    if let Some(language) = guess_language(candidate) {
        result = result
            .with_subtype(language)
            .with_metadata("language", json!(language));
    }
    Some(result)
}

fn looks_like_code(content: &str) -> bool {
    code_score(content) >= CONFIDENCE_CODE
}

fn code_score(content: &str) -> f32 {
    let line_count = content.lines().count().max(1);
    let mut score: f32 = 0.0;

    let signature_hits = CODE_SIGNATURE.find_iter(content).count();
    if signature_hits > 0 {
        score += 0.5 + 0.1 * (signature_hits.min(3) as f32 - 1.0);
    }

    let brace_pairs = content.matches('{').count().min(content.matches('}').count());
    if brace_pairs > 0 {
        score += 0.2;
    }
    if content.contains("()") || content.contains("();") {
        score += 0.2;
    }

    let semicolon_lines = content
        .lines()
        .filter(|line| line.trim_end().ends_with(';'))
        .count();
    if semicolon_lines * 2 >= line_count {
        score += 0.2;
    }

    let indented_lines = content
        .lines()
        .filter(|line| line.starts_with("    ") || line.starts_with('\t'))
        .count();
    if line_count >= 3 && indented_lines * 3 >= line_count {
        score += 0.1;
    }

    score.min(0.95)
}

fn guess_language(content: &str) -> Option<&'static str> {
    let candidates: &[(&str, &[&str])] = &[
        ("rust", &["fn ", "let mut", "impl ", "pub fn", "::<", "&str"]),
        ("python", &["def ", "import ", "self.", "elif ", "print("]),
        ("javascript", &["function ", "const ", "=> ", "console.log", "var "]),
        ("typescript", &["interface ", ": string", ": number", "export "]),
        ("java", &["public class", "public static void", "System.out"]),
        ("go", &["func ", "package ", ":= ", "fmt."]),
        ("c", &["#include", "printf(", "int main"]),
        ("sql", &["SELECT ", "FROM ", "WHERE ", "INSERT INTO"]),
        ("shell", &["#!/bin/", "echo ", "grep ", "$1"]),
    ];
    candidates
        .iter()
        .map(|(language, markers)| {
            let hits = markers.iter().filter(|m| content.contains(**m)).count();
            (*language, hits)
        })
        .filter(|(_, hits)| *hits >= 2)
        .max_by_key(|(_, hits)| *hits)
        .map(|(language, _)| language)
}

/// Stage 5: delimiter-uniform tabular content.
///
/// A delimiter qualifies only when its per-line count is identical and
/// non-zero across the sampled lines; the one yielding the most columns
/// wins. Markdown pipe tables are detected in the same family.
fn detect_tabular(trimmed: &str) -> Option<DetectionResult> {
    if is_pipe_table(trimmed) {
        return Some(
            DetectionResult::new(ContentType::Table, CONFIDENCE_TABLE + 0.2)
                .with_metadata("delimiter", json!("|")),
        );
    }

    let (delimiter, columns) = infer_delimiter(trimmed)?;
    let content_type = match delimiter {
        '\t' => ContentType::Tsv,
        ',' => ContentType::Csv,
        _ => ContentType::Table,
    };
    let confidence = CONFIDENCE_TABLE + 0.05 * (columns.min(6) as f32 - 2.0);
    Some(
        DetectionResult::new(content_type, confidence)
            .with_metadata("delimiter", json!(delimiter.to_string()))
            .with_metadata("columns", json!(columns)),
    )
}

/// Infer the column delimiter for delimiter-separated content.
///
/// Shared with the table parser so detection and parsing can never
/// disagree about the column structure.
pub fn infer_delimiter(content: &str) -> Option<(char, usize)> {
    let sample: Vec<&str> = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(TABLE_SAMPLE_LINES)
        .collect();
    if sample.is_empty() {
        return None;
    }

    let mut best: Option<(char, usize)> = None;
    for delimiter in ['\t', ',', ';'] {
        let counts: Vec<usize> = sample
            .iter()
            .map(|line| line.matches(delimiter).count())
            .collect();
        let first = counts[0];
        if first == 0 || counts.iter().any(|&c| c != first) {
            continue;
        }
        let columns = first + 1;
        if columns < 2 {
            continue;
        }
        if best.map_or(true, |(_, cols)| columns > cols) {
            best = Some((delimiter, columns));
        }
    }
    best
}

/// Whether the content is a markdown pipe table with a separator row.
pub fn is_pipe_table(content: &str) -> bool {
    let lines: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    if lines.len() < 2 {
        return false;
    }
    lines[0].starts_with('|')
        && lines[0].matches('|').count() >= 2
        && PIPE_TABLE_SEPARATOR.is_match(lines[1])
}

/// Stage 6: markdown markers.
fn detect_markdown(trimmed: &str) -> Option<DetectionResult> {
    let mut evidence = 0;
    if MARKDOWN_HEADING.is_match(trimmed) {
        evidence += 2;
    }
    if MARKDOWN_LINK.is_match(trimmed) {
        evidence += 2;
    }
    if MARKDOWN_EMPHASIS.is_match(trimmed) {
        evidence += 1;
    }
    let list_lines = MARKDOWN_LIST.find_iter(trimmed).count();
    if list_lines >= 2 {
        evidence += 2;
    } else if list_lines == 1 {
        evidence += 1;
    }
    if trimmed.contains("```") {
        evidence += 2;
    }
    if evidence < 2 {
        return None;
    }
    let confidence = CONFIDENCE_MARKDOWN + 0.05 * (evidence.min(4) as f32 - 2.0);
    Some(DetectionResult::new(ContentType::Markdown, confidence))
}

/// Stage 7: HTML — an opening angle bracket with a matching closing tag.
fn detect_html(trimmed: &str) -> Option<DetectionResult> {
    if !trimmed.starts_with('<') {
        return None;
    }
    let closing = HTML_CLOSING_TAG.captures(trimmed)?;
    let tag = closing.get(1)?.as_str();
    let has_open = trimmed.to_lowercase().contains(&format!("<{}", tag.to_lowercase()));
    if !has_open {
        return None;
    }
    Some(DetectionResult::new(ContentType::Html, CONFIDENCE_HTML))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_certain_text() {
        let result = detect("");
        assert_eq!(result.content_type, ContentType::Text);
        assert_eq!(result.confidence.value(), 1.0);
        assert_eq!(detect("   \n\t  ").content_type, ContentType::Text);
    }

    #[test]
    fn test_audio_outranks_generic_url() {
        assert_eq!(
            detect("https://example.com/song.mp3").content_type,
            ContentType::Audio
        );
        assert_eq!(detect("https://example.com").content_type, ContentType::Url);
        assert!(detect("https://example.com").confidence.value() >= 0.9);
    }

    #[test]
    fn test_audio_extension_survives_query_string() {
        let result = detect("https://cdn.example.com/a.wav?token=abc");
        assert_eq!(result.content_type, ContentType::Audio);
        assert_eq!(result.subtype.as_deref(), Some("wav"));
    }

    #[test]
    fn test_dollar_delimited_code_is_code_not_latex() {
        assert_eq!(detect("$function(){}$").content_type, ContentType::Code);
    }

    #[test]
    fn test_latex_fraction_detected() {
        let result = detect("$\\frac{a}{b}$");
        assert_eq!(result.content_type, ContentType::Latex);
        assert!(result.confidence.value() >= 0.5);
    }

    #[test]
    fn test_latex_environment_detected() {
        assert_eq!(
            detect("\\begin{align}\nx &= 1\n\\end{align}").content_type,
            ContentType::Latex
        );
    }

    #[test]
    fn test_strict_json_is_certain() {
        let result = detect("{\"a\":1}");
        assert_eq!(result.content_type, ContentType::Json);
        assert_eq!(result.confidence.value(), 1.0);
        assert_eq!(detect("[1, 2, 3]").content_type, ContentType::Json);
    }

    #[test]
    fn test_near_json_is_not_json() {
        assert_ne!(detect("{not valid json}").content_type, ContentType::Json);
    }

    #[test]
    fn test_code_heuristics() {
        let rust = "pub fn main() {\n    let x = 1;\n    println!(\"{}\", x);\n}";
        let result = detect(rust);
        assert_eq!(result.content_type, ContentType::Code);
        assert!(result.confidence.value() >= 0.7);
    }

    #[test]
    fn test_language_guess_in_metadata() {
        let python = "def greet(name):\n    print(f\"hi {name}\")\nimport sys";
        let result = detect(python);
        assert_eq!(result.content_type, ContentType::Code);
        assert_eq!(result.subtype.as_deref(), Some("python"));
    }

    #[test]
    fn test_csv_tsv_and_semicolon_tables() {
        assert_eq!(detect("Name,Age\nJohn,30\nJane,25").content_type, ContentType::Csv);
        assert_eq!(detect("a\tb\tc\n1\t2\t3").content_type, ContentType::Tsv);
        assert_eq!(detect("a;b\n1;2\n3;4").content_type, ContentType::Table);
    }

    #[test]
    fn test_nonuniform_columns_not_tabular() {
        assert_ne!(detect("a,b,c\nplain line\nx,y").content_type, ContentType::Csv);
    }

    #[test]
    fn test_delimiter_inference_prefers_widest() {
        // Tab gives 2 columns, comma gives 3 — comma wins.
        let (delimiter, columns) = infer_delimiter("a\tb,c,d\ne\tf,g,h").expect("delimiter");
        assert_eq!(delimiter, ',');
        assert_eq!(columns, 3);
    }

    #[test]
    fn test_pipe_table_detected_as_table() {
        let table = "| Name | Age |\n|------|-----|\n| John | 30 |";
        assert_eq!(detect(table).content_type, ContentType::Table);
    }

    #[test]
    fn test_markdown_markers() {
        let md = "# Title\n\nSome **bold** text with a [link](https://example.com).";
        let result = detect(md);
        assert_eq!(result.content_type, ContentType::Markdown);
        assert!(result.confidence.value() >= 0.8);
    }

    #[test]
    fn test_html_requires_closing_tag() {
        assert_eq!(detect("<div>hello</div>").content_type, ContentType::Html);
        assert_eq!(detect("< not html at all").content_type, ContentType::Text);
    }

    #[test]
    fn test_plain_text_fallback() {
        let result = detect("Just an ordinary sentence about nothing.");
        assert_eq!(result.content_type, ContentType::Text);
        assert_eq!(result.confidence.value(), CONFIDENCE_FALLBACK);
    }

    #[test]
    fn test_byte_sniffing_magic_numbers() {
        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];
        let result = detect_bytes(&png);
        assert_eq!(result.content_type, ContentType::Image);
        assert_eq!(result.subtype.as_deref(), Some("png"));

        assert_eq!(detect_bytes(b"plain bytes").content_type, ContentType::Text);
    }
}
