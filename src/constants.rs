// src/constants.rs
//! Domain constants that define the operational boundaries of the system.
//!
//! Each constant is named for the domain concept it constrains, not its
//! technical role. The Notion API section is a fixed external contract:
//! those values belong to the platform, not to this implementation, and
//! must never drift.

// ---------------------------------------------------------------------------
// Notion API boundaries (fixed external contract)
// ---------------------------------------------------------------------------

/// Maximum characters in a single rich-text segment.
///
/// The Notion API rejects any `text.content` longer than 2000 characters.
/// Oversized runs are split into consecutive segments, never dropped.
pub const MAX_RICH_TEXT_LENGTH: usize = 2000;

/// Maximum blocks accepted in a single append-children request.
///
/// Enforced globally over the flat emission order of the converted tree;
/// truncation never splits a block in half.
pub const MAX_BLOCKS_PER_REQUEST: usize = 100;

/// Maximum nesting depth for blocks submitted in one request.
///
/// The API accepts two levels of `children` below a top-level block.
/// Structure deeper than this is flattened to the deepest legal level.
pub const MAX_BLOCK_DEPTH: usize = 3;

/// Maximum characters in an equation expression.
///
/// Applied before AST construction so downstream limits never fire twice
/// for the same expression.
pub const MAX_EQUATION_LENGTH: usize = 1000;

/// Maximum characters in a code block body before truncation.
///
/// Matches the rich-text segment limit: a code block's content travels as
/// one rich-text segment and the platform caps it the same way.
pub const MAX_CODE_LENGTH: usize = 2000;

/// Maximum characters accepted in a link or bookmark URL.
pub const MAX_URL_LENGTH: usize = 2000;

/// Marker appended to code bodies that were cut at [`MAX_CODE_LENGTH`].
///
/// Visible in the created page so the user knows content was dropped.
pub const TRUNCATION_MARKER: &str = "… [truncated]";

/// Language tag used when a code language is missing or not in the
/// platform's allow-list.
pub const FALLBACK_CODE_LANGUAGE: &str = "plain text";

// ---------------------------------------------------------------------------
// Detection confidence floors
// ---------------------------------------------------------------------------

/// Confidence reported for URL and audio-URL detection.
pub const CONFIDENCE_URL: f32 = 0.95;

/// Confidence reported for a successful strict JSON parse.
pub const CONFIDENCE_JSON: f32 = 1.0;

/// Baseline confidence for LaTeX detection — the least certain category;
/// code and JSON are ruled out before this fires.
pub const CONFIDENCE_LATEX: f32 = 0.5;

/// Baseline confidence for code heuristics.
pub const CONFIDENCE_CODE: f32 = 0.7;

/// Baseline confidence for delimiter-uniform tabular content.
pub const CONFIDENCE_TABLE: f32 = 0.6;

/// Baseline confidence for markdown marker detection.
pub const CONFIDENCE_MARKDOWN: f32 = 0.8;

/// Confidence reported for HTML detection.
pub const CONFIDENCE_HTML: f32 = 0.85;

/// Confidence reported when nothing else matched.
pub const CONFIDENCE_FALLBACK: f32 = 0.5;

/// How many leading non-empty lines the tabular detector samples when
/// testing delimiter uniformity.
pub const TABLE_SAMPLE_LINES: usize = 3;

// ---------------------------------------------------------------------------
// Pipeline defaults (host-tunable, unlike the API section above)
// ---------------------------------------------------------------------------

/// Number of spaces that equals one list-nesting level in markdown input.
pub const INDENT_SPACES_PER_LEVEL: usize = 2;

/// How many parse results the watch-mode clipboard cache retains.
pub const WATCH_CACHE_CAPACITY: usize = 64;

/// Clipboard poll interval for watch mode, in milliseconds.
pub const WATCH_POLL_INTERVAL_MS: u64 = 500;
