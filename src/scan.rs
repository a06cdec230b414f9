// src/scan.rs
//! Line scanner — splits raw text into classified line tokens.
//!
//! Classification uses an explicit priority-ordered pattern table: more
//! specific patterns sit above less specific ones (`######` above `#`,
//! checked `[x]` above unchecked `[ ]`, `>>` toggle above `>` quote), and
//! the first match wins. The ordering is a correctness invariant and is
//! pinned by tests, not left to declaration accident.
//!
//! Code fences are opaque: once a fence opens, structural recognition
//! pauses and every interior line passes through verbatim until the
//! closing fence, so fenced content that looks like a heading stays
//! literal.

use once_cell::sync::Lazy;
use regex::Regex;

/// The classification of a single input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Heading(u8),
    Bullet,
    Numbered,
    Todo { checked: bool },
    Toggle,
    Quote,
    Divider,
    CodeFenceOpen { language: Option<String> },
    CodeFenceClose,
    CalloutOpen,
    CalloutClose,
    TableRow,
    Blank,
    Text,
}

impl TokenKind {
    /// Whether this token starts a new structural block, closing any
    /// pending paragraph accumulation in the parser.
    pub fn is_structural(&self) -> bool {
        !matches!(self, TokenKind::Text | TokenKind::Blank)
    }
}

/// One classified line. `content` is the line body with the structural
/// prefix stripped; `indent` is the leading-space count of the original
/// line, kept for list nesting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub content: String,
    pub indent: usize,
}

/// How a matched pattern maps to a token kind.
enum PatternKind {
    Heading(u8),
    TodoChecked,
    TodoUnchecked,
    Toggle,
    Quote,
    Divider,
    Bullet,
    Numbered,
    CalloutOpen,
    CalloutClose,
    TableRow,
}

struct LinePattern {
    kind: PatternKind,
    regex: Regex,
}

fn pattern(kind: PatternKind, pattern: &str) -> LinePattern {
    LinePattern {
        kind,
        regex: Regex::new(pattern)
            .expect("Failed to compile line pattern regex - this is a bug"),
    }
}

/// The ordered classification table. Order is load-bearing: the first
/// matching entry wins, so every more-specific pattern precedes the
/// less-specific pattern it would otherwise shadow.
static LINE_PATTERNS: Lazy<Vec<LinePattern>> = Lazy::new(|| {
    vec![
        pattern(PatternKind::Heading(6), r"^######\s+(.*)$"),
        pattern(PatternKind::Heading(5), r"^#####\s+(.*)$"),
        pattern(PatternKind::Heading(4), r"^####\s+(.*)$"),
        pattern(PatternKind::Heading(3), r"^###\s+(.*)$"),
        pattern(PatternKind::Heading(2), r"^##\s+(.*)$"),
        pattern(PatternKind::Heading(1), r"^#\s+(.*)$"),
        pattern(PatternKind::TodoChecked, r"^[-*+]\s+\[[xX]\]\s*(.*)$"),
        pattern(PatternKind::TodoUnchecked, r"^[-*+]\s+\[ ?\]\s*(.*)$"),
        pattern(PatternKind::Toggle, r"^>>\s?(.*)$"),
        pattern(PatternKind::Quote, r"^>\s?(.*)$"),
        pattern(PatternKind::Divider, r"^(?:-{3,}|\*{3,}|_{3,})\s*$"),
        pattern(PatternKind::Bullet, r"^[-*+]\s+(.*)$"),
        pattern(PatternKind::Numbered, r"^\d+[.)]\s+(.*)$"),
        pattern(PatternKind::CalloutOpen, r"^<aside>\s*(.*)$"),
        pattern(PatternKind::CalloutClose, r"^</aside>\s*$"),
        pattern(PatternKind::TableRow, r"^\|.*\|\s*$"),
    ]
});

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^```\s*([^\s`]*)\s*$")
        .expect("Failed to compile code fence regex - this is a bug")
});

/// Tokenize content into a fresh scanner iterator.
///
/// Each call starts from scratch; no cursor state is shared between
/// calls, so re-scanning the same content yields identical tokens.
pub fn scan(content: &str) -> Scanner<'_> {
    Scanner {
        lines: content.lines(),
        in_fence: false,
    }
}

/// A lazy, single-pass token iterator over the input lines.
pub struct Scanner<'a> {
    lines: std::str::Lines<'a>,
    in_fence: bool,
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let line = self.lines.next()?;
        Some(self.classify(line))
    }
}

impl<'a> Scanner<'a> {
    fn classify(&mut self, line: &str) -> Token {
        let indent = line.len() - line.trim_start_matches(' ').len();
        let body = line.trim_start_matches(' ');

        // Fence boundaries toggle opacity; interior lines are verbatim.
        if let Some(captures) = CODE_FENCE.captures(body) {
            if self.in_fence {
                self.in_fence = false;
                return Token {
                    kind: TokenKind::CodeFenceClose,
                    content: String::new(),
                    indent,
                };
            }
            self.in_fence = true;
            let language = captures
                .get(1)
                .map(|m| m.as_str())
                .filter(|s| !s.is_empty())
                .map(|s| s.to_lowercase());
            return Token {
                kind: TokenKind::CodeFenceOpen { language },
                content: String::new(),
                indent,
            };
        }
        if self.in_fence {
            return Token {
                kind: TokenKind::Text,
                content: line.to_string(),
                indent: 0,
            };
        }

        if body.trim().is_empty() {
            return Token {
                kind: TokenKind::Blank,
                content: String::new(),
                indent,
            };
        }

        for entry in LINE_PATTERNS.iter() {
            if let Some(captures) = entry.regex.captures(body) {
                let content = captures
                    .get(1)
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default();
                let kind = match &entry.kind {
                    PatternKind::Heading(level) => TokenKind::Heading(*level),
                    PatternKind::TodoChecked => TokenKind::Todo { checked: true },
                    PatternKind::TodoUnchecked => TokenKind::Todo { checked: false },
                    PatternKind::Toggle => TokenKind::Toggle,
                    PatternKind::Quote => TokenKind::Quote,
                    PatternKind::Divider => TokenKind::Divider,
                    PatternKind::Bullet => TokenKind::Bullet,
                    PatternKind::Numbered => TokenKind::Numbered,
                    PatternKind::CalloutOpen => TokenKind::CalloutOpen,
                    PatternKind::CalloutClose => TokenKind::CalloutClose,
                    PatternKind::TableRow => {
                        return Token {
                            kind: TokenKind::TableRow,
                            content: body.to_string(),
                            indent,
                        }
                    }
                };
                return Token {
                    kind,
                    content,
                    indent,
                };
            }
        }

        Token {
            kind: TokenKind::Text,
            content: body.to_string(),
            indent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(content: &str) -> Vec<TokenKind> {
        scan(content).map(|t| t.kind).collect()
    }

    #[test]
    fn test_specific_heading_wins_over_general() {
        let tokens: Vec<Token> = scan("### three\n## two\n# one").collect();
        assert_eq!(tokens[0].kind, TokenKind::Heading(3));
        assert_eq!(tokens[0].content, "three");
        assert_eq!(tokens[1].kind, TokenKind::Heading(2));
        assert_eq!(tokens[2].kind, TokenKind::Heading(1));
    }

    #[test]
    fn test_checked_todo_wins_over_unchecked_and_bullet() {
        let tokens: Vec<Token> = scan("- [x] done\n- [ ] open\n- plain").collect();
        assert_eq!(tokens[0].kind, TokenKind::Todo { checked: true });
        assert_eq!(tokens[0].content, "done");
        assert_eq!(tokens[1].kind, TokenKind::Todo { checked: false });
        assert_eq!(tokens[2].kind, TokenKind::Bullet);
    }

    #[test]
    fn test_toggle_wins_over_quote() {
        let tokens: Vec<Token> = scan(">> toggled\n> quoted").collect();
        assert_eq!(tokens[0].kind, TokenKind::Toggle);
        assert_eq!(tokens[0].content, "toggled");
        assert_eq!(tokens[1].kind, TokenKind::Quote);
        assert_eq!(tokens[1].content, "quoted");
    }

    #[test]
    fn test_divider_vs_bullet() {
        assert_eq!(kinds("---"), vec![TokenKind::Divider]);
        assert_eq!(kinds("- x"), vec![TokenKind::Bullet]);
        assert_eq!(kinds("***"), vec![TokenKind::Divider]);
    }

    #[test]
    fn test_numbered_list_markers() {
        assert_eq!(kinds("1. first"), vec![TokenKind::Numbered]);
        assert_eq!(kinds("12) twelfth"), vec![TokenKind::Numbered]);
    }

    #[test]
    fn test_fence_interior_is_opaque() {
        let tokens: Vec<Token> = scan("```rust\n# not a heading\n- not a bullet\n```").collect();
        assert_eq!(
            tokens[0].kind,
            TokenKind::CodeFenceOpen {
                language: Some("rust".to_string())
            }
        );
        assert_eq!(tokens[1].kind, TokenKind::Text);
        assert_eq!(tokens[1].content, "# not a heading");
        assert_eq!(tokens[2].kind, TokenKind::Text);
        assert_eq!(tokens[3].kind, TokenKind::CodeFenceClose);
    }

    #[test]
    fn test_fence_preserves_interior_indentation() {
        let tokens: Vec<Token> = scan("```\n    indented\n```").collect();
        assert_eq!(tokens[1].content, "    indented");
    }

    #[test]
    fn test_callout_markers() {
        let tokens: Vec<Token> = scan("<aside>\nbody text\n</aside>").collect();
        assert_eq!(tokens[0].kind, TokenKind::CalloutOpen);
        assert_eq!(tokens[1].kind, TokenKind::Text);
        assert_eq!(tokens[2].kind, TokenKind::CalloutClose);
    }

    #[test]
    fn test_table_row_keeps_full_line() {
        let tokens: Vec<Token> = scan("| a | b |").collect();
        assert_eq!(tokens[0].kind, TokenKind::TableRow);
        assert_eq!(tokens[0].content, "| a | b |");
    }

    #[test]
    fn test_indent_captured_for_nesting() {
        let tokens: Vec<Token> = scan("- top\n  - nested").collect();
        assert_eq!(tokens[0].indent, 0);
        assert_eq!(tokens[1].indent, 2);
        assert_eq!(tokens[1].kind, TokenKind::Bullet);
    }

    #[test]
    fn test_rescan_is_identical() {
        let content = "# h\n\n- a\n- b\n```\ncode\n```";
        let first: Vec<Token> = scan(content).collect();
        let second: Vec<Token> = scan(content).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_blank_and_text() {
        assert_eq!(kinds("\nplain"), vec![TokenKind::Blank, TokenKind::Text]);
    }
}
