// src/model/ser.rs
//! Serialization of the domain block model into the exact Notion
//! append-children wire shape.
//!
//! The derived `Serialize` on [`Block`] reflects the internal enum layout;
//! the API wants `{"object":"block","type":T,T:{payload}}` with the payload
//! keyed by the block's own type tag. This module is the single place that
//! wire shape is produced, so the payload-key invariant is observable (and
//! testable) here.

use super::blocks::*;
use super::Block;
use crate::types::{RichTextItem, RichTextType};
use serde_json::{json, Map, Value};

/// Serialize a slice of blocks into the `{"children":[...]}` request body.
pub fn blocks_to_payload(blocks: &[Block]) -> Value {
    json!({ "children": blocks.iter().map(block_to_wire).collect::<Vec<_>>() })
}

/// Serialize one block into its wire object.
pub fn block_to_wire(block: &Block) -> Value {
    let type_tag = block.block_type();
    let mut object = Map::new();
    object.insert("object".to_string(), json!("block"));
    object.insert("type".to_string(), json!(type_tag));
    object.insert("has_children".to_string(), json!(block.has_children()));
    object.insert(type_tag.to_string(), payload_to_wire(block));
    Value::Object(object)
}

/// Serialize rich text spans into their wire array.
pub fn rich_text_to_wire(items: &[RichTextItem]) -> Value {
    Value::Array(items.iter().map(rich_text_item_to_wire).collect())
}

fn rich_text_item_to_wire(item: &RichTextItem) -> Value {
    match &item.text_type {
        RichTextType::Text { content, link } => json!({
            "type": "text",
            "text": {
                "content": content,
                "link": link.as_ref().map(|l| json!({ "url": l.url })),
            },
            "annotations": annotations_to_wire(item),
            "plain_text": item.plain_text,
        }),
        RichTextType::Equation { expression } => json!({
            "type": "equation",
            "equation": { "expression": expression },
            "annotations": annotations_to_wire(item),
            "plain_text": item.plain_text,
        }),
    }
}

fn annotations_to_wire(item: &RichTextItem) -> Value {
    let a = &item.annotations;
    json!({
        "bold": a.bold,
        "italic": a.italic,
        "strikethrough": a.strikethrough,
        "underline": a.underline,
        "code": a.code,
        "color": a.color.as_str(),
    })
}

/// The payload object under the block's own type key.
///
/// Always an object, even when empty (divider): the payload-key invariant
/// requires the key to be present for every block type.
fn payload_to_wire(block: &Block) -> Value {
    match block {
        Block::Paragraph(b) => text_payload(&b.content, &b.common.children),
        Block::Heading1(b) => heading_payload(&b.content),
        Block::Heading2(b) => heading_payload(&b.content),
        Block::Heading3(b) => heading_payload(&b.content),
        Block::BulletedListItem(b) => text_payload(&b.content, &b.common.children),
        Block::NumberedListItem(b) => text_payload(&b.content, &b.common.children),
        Block::ToDo(b) => {
            let mut payload = text_payload_map(&b.content, &b.common.children);
            payload.insert("checked".to_string(), json!(b.checked));
            Value::Object(payload)
        }
        Block::Toggle(b) => text_payload(&b.content, &b.common.children),
        Block::Quote(b) => text_payload(&b.content, &b.common.children),
        Block::Callout(b) => {
            let mut payload = text_payload_map(&b.content, &b.common.children);
            if let Some(icon) = &b.icon {
                payload.insert("icon".to_string(), icon_to_wire(icon));
            }
            Value::Object(payload)
        }
        Block::Code(b) => json!({
            "rich_text": rich_text_to_wire(&b.content.rich_text),
            "language": b.language,
            "caption": rich_text_to_wire(&b.caption),
        }),
        Block::Equation(b) => json!({ "expression": b.expression }),
        Block::Divider(_) => json!({}),
        Block::Table(b) => json!({
            "table_width": b.table_width,
            "has_column_header": b.has_column_header,
            "has_row_header": b.has_row_header,
            "children": b.common.children.iter().map(block_to_wire).collect::<Vec<_>>(),
        }),
        Block::TableRow(b) => json!({
            "cells": b.cells.iter().map(|cell| rich_text_to_wire(cell)).collect::<Vec<_>>(),
        }),
        Block::Image(b) => file_payload(&b.image, &b.caption),
        Block::Audio(b) => file_payload(&b.audio, &b.caption),
        Block::Bookmark(b) => json!({
            "url": b.url,
            "caption": rich_text_to_wire(&b.caption),
        }),
    }
}

fn text_payload(content: &TextBlockContent, children: &[Block]) -> Value {
    Value::Object(text_payload_map(content, children))
}

fn text_payload_map(content: &TextBlockContent, children: &[Block]) -> Map<String, Value> {
    let mut payload = Map::new();
    payload.insert(
        "rich_text".to_string(),
        rich_text_to_wire(&content.rich_text),
    );
    payload.insert("color".to_string(), json!(content.color.as_str()));
    if !children.is_empty() {
        payload.insert(
            "children".to_string(),
            Value::Array(children.iter().map(block_to_wire).collect()),
        );
    }
    payload
}

// Headings never nest in the append API, so no children key.
fn heading_payload(content: &TextBlockContent) -> Value {
    json!({
        "rich_text": rich_text_to_wire(&content.rich_text),
        "color": content.color.as_str(),
        "is_toggleable": false,
    })
}

// External-file media (image, audio). Parsed text only ever references
// hosted files, never uploads.
fn file_payload(file: &FileObject, caption: &[RichTextItem]) -> Value {
    json!({
        "type": "external",
        "external": { "url": file.url() },
        "caption": rich_text_to_wire(caption),
    })
}

fn icon_to_wire(icon: &Icon) -> Value {
    match icon {
        Icon::Emoji { emoji } => json!({ "type": "emoji", "emoji": emoji }),
        Icon::External { external } => json!({
            "type": "external",
            "external": { "url": external.url },
        }),
    }
}
