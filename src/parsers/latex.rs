// src/parsers/latex.rs
//! LaTeX parser — a line-driven finite-state scan.
//!
//! Only enough LaTeX structure is recognized to emit equation, list, and
//! table blocks; this is not a typesetting engine. Unterminated block
//! equations degrade to a literal text node for the opening line rather
//! than swallowing the rest of the document.

use super::inline::parse_inline;
use crate::ast::{AstNode, InlineSpan, ListStyle};
use crate::config::ParseOptions;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref BEGIN_ENVIRONMENT: Regex = Regex::new(r"^\\begin\{([a-zA-Z]+)\*?\}(.*)$")
        .expect("Failed to compile begin environment regex - this is a bug");
    static ref ITEM_MARKER: Regex = Regex::new(r"\\item(?:\[[^\]]*\])?\s*")
        .expect("Failed to compile item marker regex - this is a bug");
}

/// Parse LaTeX content into AST nodes, bounded by `max_blocks`.
pub fn parse(content: &str, options: &ParseOptions) -> Vec<AstNode> {
    let lines: Vec<&str> = content.lines().collect();
    let mut nodes: Vec<AstNode> = Vec::new();
    let mut paragraph: Vec<String> = Vec::new();
    let mut i = 0;

    while i < lines.len() && nodes.len() < options.max_blocks {
        let line = lines[i];
        let trimmed = line.trim();

        // Lone $$ opens a block equation running to the next lone $$.
        if trimmed == "$$" {
            flush_paragraph(&mut paragraph, &mut nodes);
            match find_closing_dollars(&lines, i + 1) {
                Some(close) => {
                    let expression = lines[i + 1..close].join("\n");
                    nodes.push(equation_node(&expression, true, options));
                    i = close + 1;
                }
                None => {
                    // Unterminated: the opener becomes literal text and
                    // scanning continues on the next line.
                    nodes.push(AstNode::literal(line));
                    i += 1;
                }
            }
            continue;
        }

        if let Some(captures) = BEGIN_ENVIRONMENT.captures(trimmed) {
            let name = captures
                .get(1)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            match find_environment_end(&lines, i + 1, &name) {
                Some(close) => {
                    flush_paragraph(&mut paragraph, &mut nodes);
                    let interior: Vec<&str> = lines[i + 1..close].to_vec();
                    nodes.push(environment_node(&name, &interior, options));
                    i = close + 1;
                    continue;
                }
                None => {
                    // Unmatched \begin degrades like an unterminated $$.
                    flush_paragraph(&mut paragraph, &mut nodes);
                    nodes.push(AstNode::literal(line));
                    i += 1;
                    continue;
                }
            }
        }

        if trimmed.is_empty() {
            flush_paragraph(&mut paragraph, &mut nodes);
            i += 1;
            continue;
        }

        paragraph.push(truncate_inline_equations(line, options));
        i += 1;
    }

    flush_paragraph(&mut paragraph, &mut nodes);
    nodes
}

fn flush_paragraph(paragraph: &mut Vec<String>, nodes: &mut Vec<AstNode>) {
    if paragraph.is_empty() {
        return;
    }
    let text = paragraph.join(" ");
    paragraph.clear();
    if !text.trim().is_empty() {
        nodes.push(AstNode::Paragraph {
            spans: parse_inline(&text),
        });
    }
}

fn find_closing_dollars(lines: &[&str], from: usize) -> Option<usize> {
    (from..lines.len()).find(|&i| lines[i].trim() == "$$")
}

fn find_environment_end(lines: &[&str], from: usize, name: &str) -> Option<usize> {
    let end_plain = format!("\\end{{{}}}", name);
    let end_starred = format!("\\end{{{}*}}", name);
    (from..lines.len()).find(|&i| {
        let trimmed = lines[i].trim();
        trimmed == end_plain || trimmed == end_starred
    })
}

/// Expressions are truncated before AST construction so downstream
/// limits never fire a second time for the same content.
fn equation_node(expression: &str, is_block: bool, options: &ParseOptions) -> AstNode {
    AstNode::Equation {
        expression: truncate_chars(expression.trim(), options.max_equation_length),
        is_block,
    }
}

/// Dispatch a matched environment by name.
fn environment_node(name: &str, interior: &[&str], options: &ParseOptions) -> AstNode {
    match name {
        "equation" | "align" | "gather" | "multline" | "math" | "displaymath" => {
            equation_node(&interior.join("\n"), true, options)
        }
        "itemize" => list_node(interior, ListStyle::Bulleted),
        "enumerate" => list_node(interior, ListStyle::Numbered),
        "tabular" | "array" => table_node(interior),
        // Anything unrecognized stays literal rather than guessed at.
        _ => AstNode::CodeBlock {
            code: format!(
                "\\begin{{{name}}}\n{}\n\\end{{{name}}}",
                interior.join("\n")
            ),
            language: Some("latex".to_string()),
        },
    }
}

/// `\item` entries become list items; the environment's natural ordering
/// decides the style.
fn list_node(interior: &[&str], style: ListStyle) -> AstNode {
    let body = interior.join("\n");
    let items: Vec<AstNode> = ITEM_MARKER
        .split(&body)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| AstNode::ListItem {
            spans: vec![InlineSpan::plain(item.replace('\n', " "))],
            checked: None,
            children: Vec::new(),
        })
        .collect();
    AstNode::List { style, items }
}

/// `tabular`/`array` interiors: rows split on `\\`, cells on `&`,
/// first parsed row becomes the header.
fn table_node(interior: &[&str]) -> AstNode {
    let body = strip_column_spec(&interior.join("\n"));
    let mut rows: Vec<Vec<String>> = body
        .split("\\\\")
        .map(|row| {
            row.split('&')
                .map(|cell| cell.replace("\\hline", "").trim().to_string())
                .collect::<Vec<String>>()
        })
        .filter(|cells| cells.iter().any(|cell| !cell.is_empty()))
        .collect();

    if rows.is_empty() {
        return AstNode::Table {
            headers: Vec::new(),
            rows: Vec::new(),
        };
    }
    let headers = rows.remove(0);
    AstNode::Table { headers, rows }
}

/// The first line of a tabular interior is often the column spec
/// (`{|c|c|}`) left over from the `\begin` line.
fn strip_column_spec(body: &str) -> String {
    let trimmed = body.trim_start();
    if let Some(rest) = trimmed.strip_prefix('{') {
        if let Some(close) = rest.find('}') {
            return rest[close + 1..].to_string();
        }
    }
    body.to_string()
}

/// Truncate every inline `$...$` expression on a line to the equation
/// limit. The surrounding text is spliced back byte for byte, so other
/// inline markup on the line survives for the later inline parse.
fn truncate_inline_equations(line: &str, options: &ParseOptions) -> String {
    if !line.contains('$') {
        return line.to_string();
    }
    let mut out = String::with_capacity(line.len());
    let mut rest = line;
    while let Some(open) = rest.find('$') {
        // `$$` is a block-marker leftover, not an inline equation.
        if rest[open + 1..].starts_with('$') {
            out.push_str(&rest[..open + 2]);
            rest = &rest[open + 2..];
            continue;
        }
        let Some(close) = rest[open + 1..].find('$') else {
            break;
        };
        let expression = &rest[open + 1..open + 1 + close];
        out.push_str(&rest[..open]);
        out.push('$');
        out.push_str(&truncate_chars(expression, options.max_equation_length));
        out.push('$');
        rest = &rest[open + close + 2..];
    }
    out.push_str(rest);
    out
}

fn truncate_chars(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    text.chars().take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::spans_plain_text;

    fn parse_default(content: &str) -> Vec<AstNode> {
        parse(content, &ParseOptions::default())
    }

    #[test]
    fn test_block_equation() {
        let nodes = parse_default("$$\nE = mc^2\n$$");
        assert_eq!(
            nodes,
            vec![AstNode::Equation {
                expression: "E = mc^2".to_string(),
                is_block: true,
            }]
        );
    }

    #[test]
    fn test_unterminated_block_equation_degrades() {
        let nodes = parse_default("$$\nafter the marker\nmore text");
        assert_eq!(nodes[0], AstNode::literal("$$"));
        match &nodes[1] {
            AstNode::Paragraph { spans } => {
                assert_eq!(spans_plain_text(spans), "after the marker more text")
            }
            other => panic!("expected paragraph, got {:?}", other),
        }
    }

    #[test]
    fn test_align_environment_is_equation() {
        let nodes = parse_default("\\begin{align}\nx &= 1 \\\\\ny &= 2\n\\end{align}");
        assert!(matches!(
            &nodes[0],
            AstNode::Equation { is_block: true, .. }
        ));
    }

    #[test]
    fn test_itemize_and_enumerate() {
        let nodes = parse_default("\\begin{itemize}\n\\item first\n\\item second\n\\end{itemize}");
        let AstNode::List { style, items } = &nodes[0] else {
            panic!("expected list");
        };
        assert_eq!(*style, ListStyle::Bulleted);
        assert_eq!(items.len(), 2);

        let nodes = parse_default("\\begin{enumerate}\n\\item one\n\\end{enumerate}");
        assert!(matches!(
            &nodes[0],
            AstNode::List {
                style: ListStyle::Numbered,
                ..
            }
        ));
    }

    #[test]
    fn test_tabular_first_row_is_header() {
        let nodes =
            parse_default("\\begin{tabular}{|c|c|}\nName & Age \\\\\nJohn & 30\n\\end{tabular}");
        let AstNode::Table { headers, rows } = &nodes[0] else {
            panic!("expected table");
        };
        assert_eq!(headers, &vec!["Name".to_string(), "Age".to_string()]);
        assert_eq!(rows, &vec![vec!["John".to_string(), "30".to_string()]]);
    }

    #[test]
    fn test_unknown_environment_becomes_latex_code() {
        let nodes = parse_default("\\begin{theorem}\nLet x be ...\n\\end{theorem}");
        let AstNode::CodeBlock { code, language } = &nodes[0] else {
            panic!("expected code block");
        };
        assert!(code.contains("\\begin{theorem}"));
        assert_eq!(language.as_deref(), Some("latex"));
    }

    #[test]
    fn test_unmatched_begin_degrades_to_literal() {
        let nodes = parse_default("\\begin{align}\nx = 1\ntext continues");
        assert_eq!(nodes[0], AstNode::literal("\\begin{align}"));
        assert!(nodes.len() >= 2);
    }

    #[test]
    fn test_inline_equation_in_prose() {
        let nodes = parse_default("The identity $e^{i\\pi} = -1$ holds.");
        let AstNode::Paragraph { spans } = &nodes[0] else {
            panic!("expected paragraph");
        };
        assert!(spans
            .iter()
            .any(|s| matches!(s, InlineSpan::Equation { expression } if expression == "e^{i\\pi} = -1")));
    }

    #[test]
    fn test_inline_truncation_keeps_surrounding_markup() {
        let mut options = ParseOptions::default();
        options.max_equation_length = 4;
        let nodes = parse("keep **bold** and $abcdefgh$ markers", &options);
        let AstNode::Paragraph { spans } = &nodes[0] else {
            panic!("expected paragraph");
        };
        assert!(spans
            .iter()
            .any(|s| matches!(s, InlineSpan::Text { styles, .. } if styles.bold)));
        assert!(spans
            .iter()
            .any(|s| matches!(s, InlineSpan::Equation { expression } if expression == "abcd")));
    }

    #[test]
    fn test_expression_truncated_to_limit() {
        let mut options = ParseOptions::default();
        options.max_equation_length = 5;
        let nodes = parse("$$\nabcdefghij\n$$", &options);
        assert_eq!(
            nodes[0],
            AstNode::Equation {
                expression: "abcde".to_string(),
                is_block: true,
            }
        );
    }
}
