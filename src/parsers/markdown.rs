// src/parsers/markdown.rs
//! Markdown parser — consumes scanner tokens and builds the AST.
//!
//! Plain lines accumulate in a pending paragraph buffer; any structural
//! token flushes the buffer as a paragraph node, then the structural node
//! is built, then buffering resumes. Runs of related tokens (list items,
//! quote lines, fence bodies, table rows) are gathered in one pass each.

use super::inline::parse_inline;
use super::table;
use crate::ast::{AstNode, ListStyle};
use crate::config::ParseOptions;
use crate::constants::{INDENT_SPACES_PER_LEVEL, MAX_BLOCK_DEPTH};
use crate::scan::{scan, Token, TokenKind};

/// Parse markdown content into AST nodes, bounded by `max_blocks`.
pub fn parse(content: &str, options: &ParseOptions) -> Vec<AstNode> {
    let tokens: Vec<Token> = scan(content).collect();
    MarkdownParser::new(options).run(&tokens)
}

struct MarkdownParser<'a> {
    options: &'a ParseOptions,
    nodes: Vec<AstNode>,
    paragraph: Vec<String>,
}

impl<'a> MarkdownParser<'a> {
    fn new(options: &'a ParseOptions) -> Self {
        Self {
            options,
            nodes: Vec::new(),
            paragraph: Vec::new(),
        }
    }

    fn run(mut self, tokens: &[Token]) -> Vec<AstNode> {
        let mut i = 0;
        while i < tokens.len() && !self.at_capacity() {
            let token = &tokens[i];
            match &token.kind {
                TokenKind::Text => {
                    self.paragraph.push(token.content.clone());
                    i += 1;
                }
                TokenKind::Blank => {
                    self.flush_paragraph();
                    i += 1;
                }
                TokenKind::Heading(level) => {
                    self.flush_paragraph();
                    self.nodes.push(AstNode::Heading {
                        level: *level,
                        spans: parse_inline(&token.content),
                    });
                    i += 1;
                }
                TokenKind::Divider => {
                    self.flush_paragraph();
                    self.nodes.push(AstNode::Divider);
                    i += 1;
                }
                TokenKind::Bullet | TokenKind::Numbered | TokenKind::Todo { .. } => {
                    self.flush_paragraph();
                    i = self.consume_list(tokens, i);
                }
                TokenKind::Quote => {
                    self.flush_paragraph();
                    i = self.consume_quote(tokens, i);
                }
                TokenKind::Toggle => {
                    self.flush_paragraph();
                    i = self.consume_toggle(tokens, i);
                }
                TokenKind::CodeFenceOpen { language } => {
                    self.flush_paragraph();
                    i = self.consume_fence(tokens, i + 1, language.clone());
                }
                TokenKind::TableRow => {
                    self.flush_paragraph();
                    i = self.consume_table(tokens, i);
                }
                TokenKind::CalloutOpen => {
                    self.flush_paragraph();
                    i = self.consume_callout(tokens, i);
                }
                // Stray closers with no opener carry no content.
                TokenKind::CodeFenceClose | TokenKind::CalloutClose => {
                    i += 1;
                }
            }
        }
        self.flush_paragraph();
        self.nodes
    }

    fn at_capacity(&self) -> bool {
        self.nodes.len() >= self.options.max_blocks
    }

    fn flush_paragraph(&mut self) {
        if self.paragraph.is_empty() {
            return;
        }
        let text = self.paragraph.join(" ");
        self.paragraph.clear();
        if !text.trim().is_empty() {
            self.nodes.push(AstNode::Paragraph {
                spans: parse_inline(&text),
            });
        }
    }

    /// Gather a run of list-item tokens and build a (possibly nested) list.
    fn consume_list(&mut self, tokens: &[Token], start: usize) -> usize {
        let mut entries: Vec<ListEntry> = Vec::new();
        let mut i = start;
        while i < tokens.len() {
            let token = &tokens[i];
            let (style, checked) = match token.kind {
                TokenKind::Bullet => (ListStyle::Bulleted, None),
                TokenKind::Numbered => (ListStyle::Numbered, None),
                TokenKind::Todo { checked } => (ListStyle::Todo, Some(checked)),
                _ => break,
            };
            // Indentation deeper than the platform depth limit is
            // flattened to the deepest legal level, not rejected.
            let level = (token.indent / INDENT_SPACES_PER_LEVEL).min(MAX_BLOCK_DEPTH - 1);
            entries.push(ListEntry {
                level,
                style,
                checked,
                content: token.content.clone(),
            });
            i += 1;
        }

        let mut pos = 0;
        while pos < entries.len() {
            let level = entries[pos].level;
            let list = build_list(&entries, &mut pos, level);
            self.nodes.push(list);
        }
        i
    }

    /// Merge consecutive quote lines into one quote node.
    fn consume_quote(&mut self, tokens: &[Token], start: usize) -> usize {
        let mut lines = Vec::new();
        let mut i = start;
        while i < tokens.len() && tokens[i].kind == TokenKind::Quote {
            lines.push(tokens[i].content.clone());
            i += 1;
        }
        self.nodes.push(AstNode::Quote {
            spans: parse_inline(&lines.join(" ")),
            children: Vec::new(),
        });
        i
    }

    /// The first `>>` line is the toggle title; following `>>` lines
    /// become its paragraph children.
    fn consume_toggle(&mut self, tokens: &[Token], start: usize) -> usize {
        let title = parse_inline(&tokens[start].content);
        let mut children = Vec::new();
        let mut i = start + 1;
        while i < tokens.len() && tokens[i].kind == TokenKind::Toggle {
            if !tokens[i].content.trim().is_empty() {
                children.push(AstNode::Paragraph {
                    spans: parse_inline(&tokens[i].content),
                });
            }
            i += 1;
        }
        self.nodes.push(AstNode::Toggle {
            spans: title,
            children,
        });
        i
    }

    /// Collect verbatim fence-body lines until the closing fence; an
    /// unterminated fence closes at end of input.
    fn consume_fence(&mut self, tokens: &[Token], body_start: usize, language: Option<String>) -> usize {
        let mut lines = Vec::new();
        let mut i = body_start;
        while i < tokens.len() {
            match &tokens[i].kind {
                TokenKind::CodeFenceClose => {
                    i += 1;
                    break;
                }
                _ => {
                    lines.push(tokens[i].content.clone());
                    i += 1;
                }
            }
        }
        self.nodes.push(AstNode::CodeBlock {
            code: lines.join("\n"),
            language,
        });
        i
    }

    /// Gather consecutive pipe rows into a table node.
    fn consume_table(&mut self, tokens: &[Token], start: usize) -> usize {
        let mut rows = Vec::new();
        let mut i = start;
        while i < tokens.len() && tokens[i].kind == TokenKind::TableRow {
            rows.push(tokens[i].content.clone());
            i += 1;
        }
        match table::parse_pipe_rows(&rows) {
            Some(node) => self.nodes.push(node),
            // A lone pipe line is prose, not a table.
            None => self.nodes.push(AstNode::Paragraph {
                spans: parse_inline(&rows.join(" ")),
            }),
        }
        i
    }

    /// `<aside>` opens a callout. Body lines attach until a blank line,
    /// `</aside>`, or a new structural token; a leading emoji on the
    /// first body line becomes the callout icon.
    fn consume_callout(&mut self, tokens: &[Token], start: usize) -> usize {
        let mut body = Vec::new();
        if !tokens[start].content.trim().is_empty() {
            body.push(tokens[start].content.trim().to_string());
        }
        let mut i = start + 1;
        while i < tokens.len() {
            match &tokens[i].kind {
                TokenKind::CalloutClose => {
                    i += 1;
                    break;
                }
                TokenKind::Blank => {
                    i += 1;
                    break;
                }
                TokenKind::Text => {
                    body.push(tokens[i].content.clone());
                    i += 1;
                }
                _ => break,
            }
        }

        let mut text = body.join(" ");
        let icon = extract_leading_emoji(&text);
        if let Some(emoji) = &icon {
            text = text[emoji.len()..].trim_start().to_string();
        }
        self.nodes.push(AstNode::Callout {
            icon,
            color: crate::types::Color::GrayBackground,
            spans: parse_inline(&text),
            children: Vec::new(),
        });
        i
    }
}

struct ListEntry {
    level: usize,
    style: ListStyle,
    checked: Option<bool>,
    content: String,
}

/// Build one list at `level` from the gathered entries, recursing for
/// deeper indentation and attaching sublists to the preceding item.
fn build_list(entries: &[ListEntry], pos: &mut usize, level: usize) -> AstNode {
    let style = entries[*pos].style;
    let mut items: Vec<AstNode> = Vec::new();

    while *pos < entries.len() {
        let entry = &entries[*pos];
        if entry.level < level {
            break;
        }
        if entry.level > level {
            let sublist = build_list(entries, pos, entry.level);
            match items.last_mut() {
                Some(AstNode::ListItem { children, .. }) => children.push(sublist),
                // A deeper item with no parent flattens into this level.
                _ => {
                    if let AstNode::List { items: sub_items, .. } = sublist {
                        items.extend(sub_items);
                    }
                }
            }
            continue;
        }
        items.push(AstNode::ListItem {
            spans: parse_inline(&entry.content),
            checked: entry.checked,
            children: Vec::new(),
        });
        *pos += 1;
    }

    AstNode::List { style, items }
}

fn extract_leading_emoji(text: &str) -> Option<String> {
    let first = text.chars().next()?;
    if first.is_ascii() {
        return None;
    }
    Some(first.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{spans_plain_text, InlineSpan, InlineStyles};

    fn parse_default(content: &str) -> Vec<AstNode> {
        parse(content, &ParseOptions::default())
    }

    #[test]
    fn test_spec_ordering_fixture() {
        let nodes = parse_default("# Title\n\nBody **bold**.\n\n---\n\n- item");
        assert_eq!(nodes.len(), 4);
        assert!(matches!(nodes[0], AstNode::Heading { level: 1, .. }));
        match &nodes[1] {
            AstNode::Paragraph { spans } => {
                assert_eq!(
                    spans[1],
                    InlineSpan::styled("bold", InlineStyles::BOLD)
                );
            }
            other => panic!("expected paragraph, got {:?}", other),
        }
        assert_eq!(nodes[2], AstNode::Divider);
        assert!(matches!(
            &nodes[3],
            AstNode::List {
                style: ListStyle::Bulleted,
                ..
            }
        ));
    }

    #[test]
    fn test_paragraph_buffer_flushes_on_structural_token() {
        let nodes = parse_default("line one\nline two\n# heading\nline three");
        assert_eq!(nodes.len(), 3);
        match &nodes[0] {
            AstNode::Paragraph { spans } => {
                assert_eq!(spans_plain_text(spans), "line one line two")
            }
            other => panic!("expected paragraph, got {:?}", other),
        }
        assert!(matches!(nodes[1], AstNode::Heading { .. }));
    }

    #[test]
    fn test_nested_list_by_indent() {
        let nodes = parse_default("- top\n  - nested\n- second");
        let AstNode::List { items, .. } = &nodes[0] else {
            panic!("expected list");
        };
        assert_eq!(items.len(), 2);
        let AstNode::ListItem { children, .. } = &items[0] else {
            panic!("expected list item");
        };
        assert!(matches!(&children[0], AstNode::List { items, .. } if items.len() == 1));
    }

    #[test]
    fn test_overdeep_nesting_flattens() {
        let nodes =
            parse_default("- a\n  - b\n    - c\n      - d\n        - e");
        // Levels are clamped to the depth limit; nothing is dropped.
        fn count_items(node: &AstNode) -> usize {
            match node {
                AstNode::List { items, .. } => items.iter().map(count_items).sum(),
                AstNode::ListItem { children, .. } => {
                    1 + children.iter().map(count_items).sum::<usize>()
                }
                _ => 0,
            }
        }
        assert_eq!(count_items(&nodes[0]), 5);
    }

    #[test]
    fn test_todo_items_carry_checked_state() {
        let nodes = parse_default("- [x] done\n- [ ] open");
        let AstNode::List { style, items } = &nodes[0] else {
            panic!("expected list");
        };
        assert_eq!(*style, ListStyle::Todo);
        assert!(matches!(items[0], AstNode::ListItem { checked: Some(true), .. }));
        assert!(matches!(items[1], AstNode::ListItem { checked: Some(false), .. }));
    }

    #[test]
    fn test_consecutive_quote_lines_merge() {
        let nodes = parse_default("> first\n> second");
        assert_eq!(nodes.len(), 1);
        let AstNode::Quote { spans, .. } = &nodes[0] else {
            panic!("expected quote");
        };
        assert_eq!(spans_plain_text(spans), "first second");
    }

    #[test]
    fn test_toggle_takes_continuation_children() {
        let nodes = parse_default(">> Details\n>> hidden body\n>> more");
        let AstNode::Toggle { spans, children } = &nodes[0] else {
            panic!("expected toggle");
        };
        assert_eq!(spans_plain_text(spans), "Details");
        assert_eq!(children.len(), 2);
    }

    #[test]
    fn test_fence_body_verbatim() {
        let nodes = parse_default("```python\n# comment\nprint(1)\n```\nafter");
        let AstNode::CodeBlock { code, language } = &nodes[0] else {
            panic!("expected code block");
        };
        assert_eq!(code, "# comment\nprint(1)");
        assert_eq!(language.as_deref(), Some("python"));
        assert!(matches!(&nodes[1], AstNode::Paragraph { .. }));
    }

    #[test]
    fn test_unterminated_fence_closes_at_eof() {
        let nodes = parse_default("```\nstill code\nmore code");
        assert_eq!(nodes.len(), 1);
        let AstNode::CodeBlock { code, .. } = &nodes[0] else {
            panic!("expected code block");
        };
        assert_eq!(code, "still code\nmore code");
    }

    #[test]
    fn test_pipe_table_inside_markdown() {
        let nodes = parse_default("| a | b |\n|---|---|\n| 1 | 2 |");
        let AstNode::Table { headers, rows } = &nodes[0] else {
            panic!("expected table");
        };
        assert_eq!(headers, &vec!["a".to_string(), "b".to_string()]);
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_callout_with_emoji_icon() {
        let nodes = parse_default("<aside>\n💡 Remember this\n</aside>");
        let AstNode::Callout { icon, spans, .. } = &nodes[0] else {
            panic!("expected callout");
        };
        assert_eq!(icon.as_deref(), Some("💡"));
        assert_eq!(spans_plain_text(spans), "Remember this");
    }

    #[test]
    fn test_max_blocks_bounds_emission() {
        let content = (0..50).map(|i| format!("# h{}\n", i)).collect::<String>();
        let options = ParseOptions::default().with_max_blocks(10);
        assert_eq!(parse(&content, &options).len(), 10);
    }
}
