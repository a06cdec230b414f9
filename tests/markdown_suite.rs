//! End-to-end markdown coverage: structural elements in document order,
//! exercised through the typed `parse_markdown` entry point and checked
//! against the wire payload.

use clip2notion::{parse_markdown, HeadingOverflow, ParseOptions};
use pretty_assertions::assert_eq;
use serde_json::Value;

fn payload_for(content: &str) -> Value {
    let result = parse_markdown(content, &ParseOptions::default())
        .expect("markdown parsing must not fail");
    result.to_api_payload()
}

fn block_types(payload: &Value) -> Vec<String> {
    payload["children"]
        .as_array()
        .expect("payload must have a children array")
        .iter()
        .map(|b| b["type"].as_str().unwrap_or_default().to_string())
        .collect()
}

fn plain_text(block: &Value, type_tag: &str) -> String {
    block[type_tag]["rich_text"]
        .as_array()
        .map(|spans| {
            spans
                .iter()
                .map(|s| s["plain_text"].as_str().unwrap_or_default())
                .collect()
        })
        .unwrap_or_default()
}

#[test]
fn document_order_is_preserved() {
    let payload = payload_for(
        "# Title\n\nIntro paragraph.\n\n- alpha\n- beta\n\n```rust\nfn main() {}\n```",
    );
    assert_eq!(
        block_types(&payload),
        vec!["heading_1", "paragraph", "bulleted_list_item", "bulleted_list_item", "code"]
    );
}

#[test]
fn toggle_carries_its_body_as_children() {
    let payload = payload_for(">> Summary\n>> hidden detail");
    let toggle = &payload["children"][0];
    assert_eq!(toggle["type"], "toggle");
    assert_eq!(toggle["has_children"], true);
    assert_eq!(plain_text(toggle, "toggle"), "Summary");
    let child = &toggle["toggle"]["children"][0];
    assert_eq!(child["type"], "paragraph");
    assert_eq!(plain_text(child, "paragraph"), "hidden detail");
}

#[test]
fn checkboxes_become_to_do_blocks() {
    let payload = payload_for("- [x] shipped\n- [ ] pending");
    let children = payload["children"].as_array().unwrap();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0]["type"], "to_do");
    assert_eq!(children[0]["to_do"]["checked"], true);
    assert_eq!(children[1]["to_do"]["checked"], false);
    assert_eq!(plain_text(&children[1], "to_do"), "pending");
}

#[test]
fn nested_list_items_nest_as_children() {
    let payload = payload_for("- outer\n  - inner\n- sibling");
    let children = payload["children"].as_array().unwrap();
    assert_eq!(children.len(), 2);
    let outer = &children[0];
    assert_eq!(outer["has_children"], true);
    let inner = &outer["bulleted_list_item"]["children"][0];
    assert_eq!(inner["type"], "bulleted_list_item");
    assert_eq!(plain_text(inner, "bulleted_list_item"), "inner");
}

#[test]
fn consecutive_quote_lines_merge_into_one_block() {
    let payload = payload_for("> first line\n> second line");
    let children = payload["children"].as_array().unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0]["type"], "quote");
    assert_eq!(plain_text(&children[0], "quote"), "first line second line");
}

#[test]
fn callout_extracts_emoji_icon() {
    let payload = payload_for("<aside>\n\u{1f4a1} Worth remembering\n</aside>");
    let callout = &payload["children"][0];
    assert_eq!(callout["type"], "callout");
    assert_eq!(callout["callout"]["icon"]["emoji"], "\u{1f4a1}");
    assert_eq!(plain_text(callout, "callout"), "Worth remembering");
}

#[test]
fn bold_and_code_spans_get_annotations() {
    let payload = payload_for("mix of **bold** and `mono` text");
    let spans = payload["children"][0]["paragraph"]["rich_text"]
        .as_array()
        .unwrap()
        .clone();
    let bold = spans
        .iter()
        .find(|s| s["plain_text"] == "bold")
        .expect("bold span present");
    assert_eq!(bold["annotations"]["bold"], true);
    let mono = spans
        .iter()
        .find(|s| s["plain_text"] == "mono")
        .expect("code span present");
    assert_eq!(mono["annotations"]["code"], true);
}

#[test]
fn deep_heading_clamps_to_level_three() {
    let payload = payload_for("#### fourth level");
    let block = &payload["children"][0];
    assert_eq!(block["type"], "heading_3");
    assert_eq!(plain_text(block, "heading_3"), "fourth level");
}

#[test]
fn deep_heading_can_become_bold_paragraph() {
    let options =
        ParseOptions::default().with_heading_overflow(HeadingOverflow::BoldParagraph);
    let result = parse_markdown("##### fifth level", &options).unwrap();
    let payload = result.to_api_payload();
    let block = &payload["children"][0];
    assert_eq!(block["type"], "paragraph");
    let span = &block["paragraph"]["rich_text"][0];
    assert_eq!(span["annotations"]["bold"], true);
}

#[test]
fn divider_separates_paragraphs() {
    let payload = payload_for("before\n\n---\n\nafter");
    assert_eq!(
        block_types(&payload),
        vec!["paragraph", "divider", "paragraph"]
    );
    assert_eq!(payload["children"][1]["divider"], serde_json::json!({}));
}

#[test]
fn pipe_table_inside_markdown_becomes_table_block() {
    let payload = payload_for("| name | role |\n|------|------|\n| Ada | engineer |");
    let table = &payload["children"][0];
    assert_eq!(table["type"], "table");
    assert_eq!(table["table"]["table_width"], 2);
    let rows = table["table"]["children"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["type"], "table_row");
}

#[test]
fn links_become_linked_rich_text() {
    let payload = payload_for("see [the docs](https://example.com/docs) here");
    let spans = payload["children"][0]["paragraph"]["rich_text"]
        .as_array()
        .unwrap()
        .clone();
    let link = spans
        .iter()
        .find(|s| s["plain_text"] == "the docs")
        .expect("link span present");
    assert_eq!(link["text"]["link"]["url"], "https://example.com/docs");
}

#[test]
fn unterminated_fence_still_yields_code_block() {
    let payload = payload_for("```python\nprint('open ended')");
    let block = &payload["children"][0];
    assert_eq!(block["type"], "code");
    assert_eq!(block["code"]["language"], "python");
    assert_eq!(plain_text(block, "code"), "print('open ended')");
}
