//! Wire-format regression tests: the exact JSON each block type puts on
//! the wire, pinned with literal expectations so schema drift is caught
//! at review time.

use clip2notion::model::{block_to_wire, blocks_to_payload};
use clip2notion::{parse_content, Block, ParseOptions, RichTextItem};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn paragraph_wire_shape() {
    let wire = block_to_wire(&Block::paragraph(vec![RichTextItem::plain_text("hello")]));
    insta::assert_json_snapshot!(wire, @r###"
    {
      "has_children": false,
      "object": "block",
      "paragraph": {
        "color": "default",
        "rich_text": [
          {
            "annotations": {
              "bold": false,
              "code": false,
              "color": "default",
              "italic": false,
              "strikethrough": false,
              "underline": false
            },
            "plain_text": "hello",
            "text": {
              "content": "hello",
              "link": null
            },
            "type": "text"
          }
        ]
      },
      "type": "paragraph"
    }
    "###);
}

#[test]
fn heading_wire_shape() {
    let wire = block_to_wire(&Block::heading(2, vec![RichTextItem::plain_text("Section")]));
    assert_eq!(wire["type"], "heading_2");
    assert_eq!(
        wire["heading_2"],
        json!({
            "rich_text": [{
                "type": "text",
                "text": { "content": "Section", "link": null },
                "annotations": {
                    "bold": false,
                    "italic": false,
                    "strikethrough": false,
                    "underline": false,
                    "code": false,
                    "color": "default",
                },
                "plain_text": "Section",
            }],
            "color": "default",
            "is_toggleable": false,
        })
    );
}

#[test]
fn code_wire_shape() {
    let wire = block_to_wire(&Block::code(
        vec![RichTextItem::plain_text("print(1)")],
        "python",
    ));
    assert_eq!(wire["type"], "code");
    assert_eq!(wire["code"]["language"], "python");
    assert_eq!(wire["code"]["caption"], json!([]));
    assert_eq!(wire["code"]["rich_text"][0]["plain_text"], "print(1)");
}

#[test]
fn equation_wire_shape() {
    let wire = block_to_wire(&Block::equation("a^2 + b^2 = c^2"));
    assert_eq!(
        wire,
        json!({
            "object": "block",
            "type": "equation",
            "has_children": false,
            "equation": { "expression": "a^2 + b^2 = c^2" },
        })
    );
}

#[test]
fn bookmark_wire_shape() {
    let wire = block_to_wire(&Block::bookmark("https://example.com/page"));
    assert_eq!(
        wire,
        json!({
            "object": "block",
            "type": "bookmark",
            "has_children": false,
            "bookmark": { "url": "https://example.com/page", "caption": [] },
        })
    );
}

#[test]
fn payload_envelope_shape() {
    let payload = blocks_to_payload(&[Block::divider()]);
    assert_eq!(
        payload,
        json!({
            "children": [{
                "object": "block",
                "type": "divider",
                "has_children": false,
                "divider": {},
            }],
        })
    );
}

#[test]
fn end_to_end_markdown_payload_is_stable() {
    let result = parse_content("# Note\n\ndone", &ParseOptions::default())
        .expect("parsing must not fail");
    let payload = result.to_api_payload();
    let types: Vec<&str> = payload["children"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["type"].as_str().unwrap())
        .collect();
    assert_eq!(types, vec!["heading_1", "paragraph"]);
    // Every wire object carries its own type key.
    for block in payload["children"].as_array().unwrap() {
        let tag = block["type"].as_str().unwrap();
        assert!(block[tag].is_object());
    }
}
