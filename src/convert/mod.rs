// src/convert/mod.rs
//! AST to block conversion.
//!
//! The walk enforces every platform limit in one place: heading overflow
//! policy, rich-text splitting, code language normalization and body
//! truncation, nesting depth, and the global block budget. Every
//! truncation or degradation emits a non-fatal [`Issue`] that flows into
//! the validation report; conversion itself never fails.

pub mod languages;
pub mod rich_text;

use crate::ast::{AstNode, ListStyle};
use crate::config::{HeadingOverflow, ParseOptions};
use crate::constants::{
    FALLBACK_CODE_LANGUAGE, MAX_BLOCK_DEPTH, MAX_CODE_LENGTH, MAX_URL_LENGTH, TRUNCATION_MARKER,
};
use crate::error::{Issue, IssueKind};
use crate::model::blocks::Icon;
use crate::model::Block;
use url::Url;

/// Convert a parsed tree into platform blocks plus the issues the
/// conversion raised.
pub fn convert(nodes: &[AstNode], options: &ParseOptions) -> (Vec<Block>, Vec<Issue>) {
    let mut ctx = ConvertContext::new(options);
    let produced = ctx.convert_nodes(nodes, 0);

    // The block budget counts every block in flat emission order,
    // descendants included. A block is kept or dropped whole.
    let mut blocks = Vec::new();
    let mut total = 0;
    for block in produced {
        let size = subtree_size(&block);
        if total + size > options.max_blocks {
            ctx.issues.push(Issue::warning(
                IssueKind::LimitExceeded,
                format!(
                    "block budget of {} reached, remaining content dropped",
                    options.max_blocks
                ),
            ));
            break;
        }
        total += size;
        blocks.push(block);
    }
    (blocks, ctx.issues)
}

fn subtree_size(block: &Block) -> usize {
    1 + block.children().iter().map(subtree_size).sum::<usize>()
}

struct ConvertContext<'a> {
    options: &'a ParseOptions,
    issues: Vec<Issue>,
}

impl<'a> ConvertContext<'a> {
    fn new(options: &'a ParseOptions) -> Self {
        Self {
            options,
            issues: Vec::new(),
        }
    }

    fn convert_nodes(&mut self, nodes: &[AstNode], depth: usize) -> Vec<Block> {
        let mut out = Vec::new();
        for node in nodes {
            for block in self.convert_node(node, depth) {
                if self.keep(&block) {
                    out.push(block);
                }
            }
        }
        out
    }

    /// A single node can expand to several blocks: lists flatten into one
    /// block per item, and over-deep children surface as trailing
    /// siblings.
    fn convert_node(&mut self, node: &AstNode, depth: usize) -> Vec<Block> {
        match node {
            AstNode::Text { content } => {
                vec![Block::paragraph(self.plain(content))]
            }
            AstNode::Heading { level, spans } => {
                let items = rich_text::convert_spans(spans, self.options);
                if *level <= 3 {
                    return vec![Block::heading(*level, items)];
                }
                match self.options.heading_overflow {
                    HeadingOverflow::Clamp => vec![Block::heading(3, items)],
                    HeadingOverflow::BoldParagraph => {
                        let mut items = items;
                        for item in &mut items {
                            item.annotations.bold = true;
                        }
                        vec![Block::paragraph(items)]
                    }
                }
            }
            AstNode::Paragraph { spans } => {
                vec![Block::paragraph(rich_text::convert_spans(spans, self.options))]
            }
            AstNode::List { style, items } => {
                let mut out = Vec::new();
                for item in items {
                    out.extend(self.convert_list_item(item, *style, depth));
                }
                out
            }
            // An item outside a list renders as a bulleted item.
            AstNode::ListItem { .. } => self.convert_list_item(node, ListStyle::Bulleted, depth),
            AstNode::Table { headers, rows } => self.convert_table(headers, rows),
            AstNode::CodeBlock { code, language } => self.convert_code(code, language.as_deref()),
            AstNode::Equation { expression, .. } => self.convert_equation(expression),
            AstNode::Quote { spans, children } => {
                let mut block = Block::quote(rich_text::convert_spans(spans, self.options));
                let overflow = self.attach_children(&mut block, children, depth);
                prepend(block, overflow)
            }
            AstNode::Toggle { spans, children } => {
                let mut block = Block::toggle(rich_text::convert_spans(spans, self.options));
                let overflow = self.attach_children(&mut block, children, depth);
                prepend(block, overflow)
            }
            AstNode::Callout {
                icon,
                color,
                spans,
                children,
            } => {
                let emoji = icon.clone().map(|emoji| Icon::Emoji { emoji });
                let mut block = Block::callout(rich_text::convert_spans(spans, self.options), emoji);
                if let Block::Callout(callout) = &mut block {
                    callout.content.color = *color;
                }
                let overflow = self.attach_children(&mut block, children, depth);
                prepend(block, overflow)
            }
            AstNode::Divider => vec![Block::divider()],
            AstNode::Image { url, alt } => self.convert_image(url, alt),
            AstNode::Bookmark { url } => self.convert_bookmark(url),
            AstNode::Audio { url } => self.convert_audio(url),
        }
    }

    fn convert_list_item(&mut self, item: &AstNode, style: ListStyle, depth: usize) -> Vec<Block> {
        let AstNode::ListItem {
            spans,
            checked,
            children,
        } = item
        else {
            // Lists hold only items by construction; anything else is a
            // parser defect recovered as a plain node.
            return self.convert_node(item, depth);
        };
        let items = rich_text::convert_spans(spans, self.options);
        let mut block = match style {
            ListStyle::Bulleted => Block::bulleted_list_item(items),
            ListStyle::Numbered => Block::numbered_list_item(items),
            ListStyle::Todo => Block::to_do(items, checked.unwrap_or(false)),
        };
        let overflow = self.attach_children(&mut block, children, depth);
        prepend(block, overflow)
    }

    /// Attach children at `depth + 1` when the depth limit allows;
    /// otherwise flatten them to siblings at the deepest legal level and
    /// return them for the caller to emit after the parent.
    fn attach_children(
        &mut self,
        parent: &mut Block,
        children: &[AstNode],
        depth: usize,
    ) -> Vec<Block> {
        if children.is_empty() {
            return Vec::new();
        }
        if depth + 1 < MAX_BLOCK_DEPTH {
            let blocks = self.convert_nodes(children, depth + 1);
            parent.set_children(blocks);
            Vec::new()
        } else {
            self.issues.push(Issue::warning(
                IssueKind::LimitExceeded,
                format!(
                    "content nested deeper than {} levels was flattened",
                    MAX_BLOCK_DEPTH
                ),
            ));
            self.convert_nodes(children, depth)
        }
    }

    fn convert_table(&mut self, headers: &[String], rows: &[Vec<String>]) -> Vec<Block> {
        if headers.is_empty() && rows.is_empty() {
            return Vec::new();
        }
        if !self.options.convert_tables {
            // Degraded form: one paragraph per row, cells joined visibly.
            let mut out = vec![Block::paragraph(self.plain(&headers.join(" | ")))];
            for row in rows {
                out.push(Block::paragraph(self.plain(&row.join(" | "))));
            }
            return out;
        }
        // The table and its header row count against the block budget, so
        // a table can carry at most max_blocks - 2 data rows. Dropping the
        // tail keeps the table; dropping the whole block would not.
        let max_rows = self.options.max_blocks.saturating_sub(2);
        if rows.len() > max_rows {
            self.issues.push(Issue::warning(
                IssueKind::LimitExceeded,
                format!(
                    "table truncated from {} to {} rows to fit the block budget",
                    rows.len(),
                    max_rows
                ),
            ));
        }
        let width = headers.len();
        let mut row_blocks = Vec::with_capacity(rows.len().min(max_rows) + 1);
        row_blocks.push(Block::table_row(
            headers.iter().map(|cell| self.plain(cell)).collect(),
        ));
        for row in rows.iter().take(max_rows) {
            row_blocks.push(Block::table_row(
                row.iter().map(|cell| self.plain(cell)).collect(),
            ));
        }
        vec![Block::table(width, true, row_blocks)]
    }

    fn convert_code(&mut self, code: &str, language: Option<&str>) -> Vec<Block> {
        if !self.options.convert_code {
            return vec![Block::paragraph(self.plain(code))];
        }
        let language = match language {
            None => FALLBACK_CODE_LANGUAGE,
            Some(raw) => match languages::normalize(raw) {
                Some(canonical) => canonical,
                None => {
                    self.issues.push(
                        Issue::warning(
                            IssueKind::UnsupportedLanguage,
                            format!("language '{}' is not supported, using '{}'", raw, FALLBACK_CODE_LANGUAGE),
                        )
                        .with_context(raw.to_string()),
                    );
                    FALLBACK_CODE_LANGUAGE
                }
            },
        };
        let body = if code.chars().count() > MAX_CODE_LENGTH {
            self.issues.push(Issue::warning(
                IssueKind::LimitExceeded,
                format!("code body exceeds {} characters and was truncated", MAX_CODE_LENGTH),
            ));
            let kept = MAX_CODE_LENGTH - TRUNCATION_MARKER.chars().count();
            let mut truncated: String = code.chars().take(kept).collect();
            truncated.push_str(TRUNCATION_MARKER);
            truncated
        } else {
            code.to_string()
        };
        vec![Block::code(self.plain(&body), language)]
    }

    fn convert_equation(&mut self, expression: &str) -> Vec<Block> {
        let trimmed = expression.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }
        let expression = if trimmed.chars().count() > self.options.max_equation_length {
            self.issues.push(Issue::warning(
                IssueKind::LimitExceeded,
                format!(
                    "equation exceeds {} characters and was truncated",
                    self.options.max_equation_length
                ),
            ));
            trimmed
                .chars()
                .take(self.options.max_equation_length)
                .collect::<String>()
        } else {
            trimmed.to_string()
        };
        vec![Block::equation(expression)]
    }

    fn convert_image(&mut self, url: &str, alt: &str) -> Vec<Block> {
        if !self.options.convert_images {
            let text = if alt.is_empty() { url } else { alt };
            return vec![Block::paragraph(self.plain(text))];
        }
        if let Some(issue) = invalid_url(url) {
            self.issues.push(issue);
            return vec![Block::paragraph(self.plain(url))];
        }
        let caption = if alt.is_empty() {
            Vec::new()
        } else {
            self.plain(alt)
        };
        vec![Block::image(url, caption)]
    }

    fn convert_bookmark(&mut self, url: &str) -> Vec<Block> {
        if !self.options.convert_links {
            return vec![Block::paragraph(self.plain(url))];
        }
        if let Some(issue) = invalid_url(url) {
            self.issues.push(issue);
            return vec![Block::paragraph(self.plain(url))];
        }
        vec![Block::bookmark(url)]
    }

    fn convert_audio(&mut self, url: &str) -> Vec<Block> {
        if let Some(issue) = invalid_url(url) {
            self.issues.push(issue);
            return vec![Block::paragraph(self.plain(url))];
        }
        vec![Block::audio(url)]
    }

    fn plain(&self, text: &str) -> Vec<crate::types::rich_text::RichTextItem> {
        rich_text::from_plain(text, self.options.max_rich_text_length)
    }

    /// Empty-block filter: whitespace-only text payloads with no children
    /// drop when `remove_empty_blocks` is set. Structural blocks and code
    /// blocks survive regardless.
    fn keep(&self, block: &Block) -> bool {
        if !self.options.remove_empty_blocks {
            return true;
        }
        if block.is_structural() || block.block_type() == "code" {
            return true;
        }
        if !block.children().is_empty() {
            return true;
        }
        match block.rich_text() {
            Some(items) => items
                .iter()
                .any(|item| !item.plain_text.trim().is_empty()),
            None => true,
        }
    }
}

fn prepend(block: Block, mut rest: Vec<Block>) -> Vec<Block> {
    let mut out = Vec::with_capacity(rest.len() + 1);
    out.push(block);
    out.append(&mut rest);
    out
}

/// A target URL must parse, use http(s), and fit the platform length
/// limit; otherwise the block degrades to a paragraph.
fn invalid_url(url: &str) -> Option<Issue> {
    if url.chars().count() > MAX_URL_LENGTH {
        return Some(Issue::warning(
            IssueKind::LimitExceeded,
            format!("URL exceeds {} characters", MAX_URL_LENGTH),
        ));
    }
    match Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => None,
        _ => Some(
            Issue::warning(IssueKind::MalformedSyntax, "invalid URL target")
                .with_context(url.to_string()),
        ),
    }
}
