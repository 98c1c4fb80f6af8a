//! Tagged wire form of the node taxonomy.
//!
//! A wire node crosses the host boundary as
//! `{ "type": <discriminant>, "value": { <payload fields> } }`.
//! Decoding reads the payload strictly by the shape the discriminant names;
//! unknown discriminants and malformed elements degrade to an empty text
//! node instead of failing.

use crate::error::BridgeError;
use crate::value::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Version of the wire schema. Bump on any change to kinds or payload fields.
pub const SCHEMA_VERSION: u32 = 1;

pub const TYPE_FIELD: &str = "type";
pub const PAYLOAD_FIELD: &str = "value";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    LineBreak,
    Paragraph,
    CodeBlock,
    Heading,
    HorizontalRule,
    Blockquote,
    OrderedList,
    UnorderedList,
    TaskList,
    MathBlock,
    Table,
    EmbeddedContent,
    Text,
    Bold,
    Italic,
    BoldItalic,
    Code,
    Image,
    Link,
    AutoLink,
    Tag,
    Strikethrough,
    EscapingCharacter,
    Math,
    Highlight,
    Subscript,
    Superscript,
    ReferencedContent,
    Spoiler,
}

impl NodeKind {
    pub const ALL: [NodeKind; 29] = [
        NodeKind::LineBreak,
        NodeKind::Paragraph,
        NodeKind::CodeBlock,
        NodeKind::Heading,
        NodeKind::HorizontalRule,
        NodeKind::Blockquote,
        NodeKind::OrderedList,
        NodeKind::UnorderedList,
        NodeKind::TaskList,
        NodeKind::MathBlock,
        NodeKind::Table,
        NodeKind::EmbeddedContent,
        NodeKind::Text,
        NodeKind::Bold,
        NodeKind::Italic,
        NodeKind::BoldItalic,
        NodeKind::Code,
        NodeKind::Image,
        NodeKind::Link,
        NodeKind::AutoLink,
        NodeKind::Tag,
        NodeKind::Strikethrough,
        NodeKind::EscapingCharacter,
        NodeKind::Math,
        NodeKind::Highlight,
        NodeKind::Subscript,
        NodeKind::Superscript,
        NodeKind::ReferencedContent,
        NodeKind::Spoiler,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::LineBreak => "line_break",
            NodeKind::Paragraph => "paragraph",
            NodeKind::CodeBlock => "code_block",
            NodeKind::Heading => "heading",
            NodeKind::HorizontalRule => "horizontal_rule",
            NodeKind::Blockquote => "blockquote",
            NodeKind::OrderedList => "ordered_list",
            NodeKind::UnorderedList => "unordered_list",
            NodeKind::TaskList => "task_list",
            NodeKind::MathBlock => "math_block",
            NodeKind::Table => "table",
            NodeKind::EmbeddedContent => "embedded_content",
            NodeKind::Text => "text",
            NodeKind::Bold => "bold",
            NodeKind::Italic => "italic",
            NodeKind::BoldItalic => "bold_italic",
            NodeKind::Code => "code",
            NodeKind::Image => "image",
            NodeKind::Link => "link",
            NodeKind::AutoLink => "auto_link",
            NodeKind::Tag => "tag",
            NodeKind::Strikethrough => "strikethrough",
            NodeKind::EscapingCharacter => "escaping_character",
            NodeKind::Math => "math",
            NodeKind::Highlight => "highlight",
            NodeKind::Subscript => "subscript",
            NodeKind::Superscript => "superscript",
            NodeKind::ReferencedContent => "referenced_content",
            NodeKind::Spoiler => "spoiler",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.as_str() == tag)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableRow {
    pub cells: Vec<String>,
}

/// A wire node. The variant is the payload, so tag and payload always agree.
#[derive(Debug, Clone, PartialEq)]
pub enum WireNode {
    LineBreak,
    Paragraph {
        children: Vec<WireNode>,
    },
    CodeBlock {
        language: String,
        content: String,
    },
    Heading {
        level: i64,
        children: Vec<WireNode>,
    },
    HorizontalRule {
        symbol: String,
    },
    Blockquote {
        children: Vec<WireNode>,
    },
    OrderedList {
        number: String,
        indent: i64,
        children: Vec<WireNode>,
    },
    UnorderedList {
        symbol: String,
        indent: i64,
        children: Vec<WireNode>,
    },
    TaskList {
        symbol: String,
        indent: i64,
        complete: bool,
        children: Vec<WireNode>,
    },
    MathBlock {
        content: String,
    },
    Table {
        header: Vec<String>,
        delimiter: Vec<String>,
        rows: Vec<TableRow>,
    },
    EmbeddedContent {
        resource_name: String,
        params: String,
    },
    Text {
        content: String,
    },
    Bold {
        symbol: String,
        children: Vec<WireNode>,
    },
    Italic {
        symbol: String,
        content: String,
    },
    BoldItalic {
        symbol: String,
        content: String,
    },
    Code {
        content: String,
    },
    Image {
        alt_text: String,
        url: String,
    },
    Link {
        text: String,
        url: String,
    },
    AutoLink {
        url: String,
        is_raw_text: bool,
    },
    Tag {
        content: String,
    },
    Strikethrough {
        content: String,
    },
    EscapingCharacter {
        symbol: String,
    },
    Math {
        content: String,
    },
    Highlight {
        content: String,
    },
    Subscript {
        content: String,
    },
    Superscript {
        content: String,
    },
    ReferencedContent {
        resource_name: String,
        params: String,
    },
    Spoiler {
        content: String,
    },
}

impl WireNode {
    /// The node substituted for any kind the receiving side does not know.
    pub fn fallback() -> Self {
        WireNode::Text {
            content: String::new(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            WireNode::LineBreak => NodeKind::LineBreak,
            WireNode::Paragraph { .. } => NodeKind::Paragraph,
            WireNode::CodeBlock { .. } => NodeKind::CodeBlock,
            WireNode::Heading { .. } => NodeKind::Heading,
            WireNode::HorizontalRule { .. } => NodeKind::HorizontalRule,
            WireNode::Blockquote { .. } => NodeKind::Blockquote,
            WireNode::OrderedList { .. } => NodeKind::OrderedList,
            WireNode::UnorderedList { .. } => NodeKind::UnorderedList,
            WireNode::TaskList { .. } => NodeKind::TaskList,
            WireNode::MathBlock { .. } => NodeKind::MathBlock,
            WireNode::Table { .. } => NodeKind::Table,
            WireNode::EmbeddedContent { .. } => NodeKind::EmbeddedContent,
            WireNode::Text { .. } => NodeKind::Text,
            WireNode::Bold { .. } => NodeKind::Bold,
            WireNode::Italic { .. } => NodeKind::Italic,
            WireNode::BoldItalic { .. } => NodeKind::BoldItalic,
            WireNode::Code { .. } => NodeKind::Code,
            WireNode::Image { .. } => NodeKind::Image,
            WireNode::Link { .. } => NodeKind::Link,
            WireNode::AutoLink { .. } => NodeKind::AutoLink,
            WireNode::Tag { .. } => NodeKind::Tag,
            WireNode::Strikethrough { .. } => NodeKind::Strikethrough,
            WireNode::EscapingCharacter { .. } => NodeKind::EscapingCharacter,
            WireNode::Math { .. } => NodeKind::Math,
            WireNode::Highlight { .. } => NodeKind::Highlight,
            WireNode::Subscript { .. } => NodeKind::Subscript,
            WireNode::Superscript { .. } => NodeKind::Superscript,
            WireNode::ReferencedContent { .. } => NodeKind::ReferencedContent,
            WireNode::Spoiler { .. } => NodeKind::Spoiler,
        }
    }

    pub fn encode(&self) -> Value {
        let mut payload = PayloadWriter::default();
        match self {
            WireNode::LineBreak => {}
            WireNode::Paragraph { children } | WireNode::Blockquote { children } => {
                payload.children("children", children);
            }
            WireNode::CodeBlock { language, content } => {
                payload.str("language", language);
                payload.str("content", content);
            }
            WireNode::Heading { level, children } => {
                payload.int("level", *level);
                payload.children("children", children);
            }
            WireNode::HorizontalRule { symbol } | WireNode::EscapingCharacter { symbol } => {
                payload.str("symbol", symbol);
            }
            WireNode::OrderedList {
                number,
                indent,
                children,
            } => {
                payload.str("number", number);
                payload.int("indent", *indent);
                payload.children("children", children);
            }
            WireNode::UnorderedList {
                symbol,
                indent,
                children,
            } => {
                payload.str("symbol", symbol);
                payload.int("indent", *indent);
                payload.children("children", children);
            }
            WireNode::TaskList {
                symbol,
                indent,
                complete,
                children,
            } => {
                payload.str("symbol", symbol);
                payload.int("indent", *indent);
                payload.bool("complete", *complete);
                payload.children("children", children);
            }
            WireNode::Table {
                header,
                delimiter,
                rows,
            } => {
                payload.strings("header", header);
                payload.strings("delimiter", delimiter);
                payload.rows("rows", rows);
            }
            WireNode::EmbeddedContent {
                resource_name,
                params,
            }
            | WireNode::ReferencedContent {
                resource_name,
                params,
            } => {
                payload.str("resourceName", resource_name);
                payload.str("params", params);
            }
            WireNode::Bold { symbol, children } => {
                payload.str("symbol", symbol);
                payload.children("children", children);
            }
            WireNode::Italic { symbol, content } | WireNode::BoldItalic { symbol, content } => {
                payload.str("symbol", symbol);
                payload.str("content", content);
            }
            WireNode::Image { alt_text, url } => {
                payload.str("altText", alt_text);
                payload.str("url", url);
            }
            WireNode::Link { text, url } => {
                payload.str("text", text);
                payload.str("url", url);
            }
            WireNode::AutoLink { url, is_raw_text } => {
                payload.str("url", url);
                payload.bool("isRawText", *is_raw_text);
            }
            WireNode::MathBlock { content }
            | WireNode::Text { content }
            | WireNode::Code { content }
            | WireNode::Tag { content }
            | WireNode::Strikethrough { content }
            | WireNode::Math { content }
            | WireNode::Highlight { content }
            | WireNode::Subscript { content }
            | WireNode::Superscript { content }
            | WireNode::Spoiler { content } => {
                payload.str("content", content);
            }
        }

        let mut node = BTreeMap::new();
        node.insert(TYPE_FIELD.to_string(), Value::from(self.kind().as_str()));
        node.insert(PAYLOAD_FIELD.to_string(), Value::Map(payload.0));
        Value::Map(node)
    }
}

pub fn encode_nodes(nodes: &[WireNode]) -> Value {
    Value::Array(nodes.iter().map(WireNode::encode).collect())
}

/// Decodes untrusted wire nodes. Only nesting deeper than `max_depth` fails.
pub fn decode_nodes(values: &[Value], max_depth: usize) -> Result<Vec<WireNode>, BridgeError> {
    Decoder { max_depth }.nodes(values, 1)
}

#[derive(Default)]
struct PayloadWriter(BTreeMap<String, Value>);

impl PayloadWriter {
    fn str(&mut self, name: &str, value: &str) {
        self.0.insert(name.to_string(), Value::from(value));
    }

    fn int(&mut self, name: &str, value: i64) {
        self.0.insert(name.to_string(), Value::from(value));
    }

    fn bool(&mut self, name: &str, value: bool) {
        self.0.insert(name.to_string(), Value::Bool(value));
    }

    fn strings(&mut self, name: &str, values: &[String]) {
        self.0.insert(name.to_string(), string_array(values));
    }

    fn rows(&mut self, name: &str, rows: &[TableRow]) {
        let rows = rows
            .iter()
            .map(|row| {
                let mut map = BTreeMap::new();
                map.insert("cells".to_string(), string_array(&row.cells));
                Value::Map(map)
            })
            .collect();
        self.0.insert(name.to_string(), Value::Array(rows));
    }

    fn children(&mut self, name: &str, children: &[WireNode]) {
        self.0.insert(name.to_string(), encode_nodes(children));
    }
}

fn string_array(values: &[String]) -> Value {
    Value::Array(values.iter().map(|s| Value::from(s.as_str())).collect())
}

/// Lenient view over a payload map: absent or mistyped fields read as zero values.
struct Payload<'a>(Option<&'a BTreeMap<String, Value>>);

impl<'a> Payload<'a> {
    fn get(&self, name: &str) -> Option<&'a Value> {
        self.0.and_then(|map| map.get(name))
    }

    fn str(&self, name: &str) -> String {
        self.get(name)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }

    fn int(&self, name: &str) -> i64 {
        match self.get(name).and_then(Value::as_f64) {
            Some(n)
                if n.is_finite()
                    && n.fract() == 0.0
                    && n >= i64::MIN as f64
                    && n < i64::MAX as f64 =>
            {
                n as i64
            }
            _ => 0,
        }
    }

    fn bool(&self, name: &str) -> bool {
        self.get(name).and_then(Value::as_bool).unwrap_or(false)
    }

    fn strings(&self, name: &str) -> Vec<String> {
        strings_of(self.get(name))
    }

    fn rows(&self, name: &str) -> Vec<TableRow> {
        self.get(name)
            .and_then(Value::as_array)
            .unwrap_or_default()
            .iter()
            .map(|row| TableRow {
                cells: strings_of(row.as_map().and_then(|map| map.get("cells"))),
            })
            .collect()
    }

    fn items(&self, name: &str) -> &'a [Value] {
        self.get(name).and_then(Value::as_array).unwrap_or_default()
    }
}

fn strings_of(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .unwrap_or_default()
        .iter()
        .map(|v| v.as_str().unwrap_or_default().to_string())
        .collect()
}

struct Decoder {
    max_depth: usize,
}

impl Decoder {
    fn nodes(&self, values: &[Value], depth: usize) -> Result<Vec<WireNode>, BridgeError> {
        values.iter().map(|v| self.node(v, depth)).collect()
    }

    fn node(&self, value: &Value, depth: usize) -> Result<WireNode, BridgeError> {
        if depth > self.max_depth {
            return Err(BridgeError::DepthExceeded {
                limit: self.max_depth,
            });
        }

        let Some(map) = value.as_map() else {
            tracing::debug!("wire node is not a map; substituting empty text");
            return Ok(WireNode::fallback());
        };
        let tag = map.get(TYPE_FIELD).and_then(Value::as_str).unwrap_or("");
        let Some(kind) = NodeKind::from_tag(tag) else {
            tracing::debug!(tag, "unknown wire node type; substituting empty text");
            return Ok(WireNode::fallback());
        };

        let p = Payload(map.get(PAYLOAD_FIELD).and_then(Value::as_map));
        let children = |name: &str| self.nodes(p.items(name), depth + 1);

        let node = match kind {
            NodeKind::LineBreak => WireNode::LineBreak,
            NodeKind::Paragraph => WireNode::Paragraph {
                children: children("children")?,
            },
            NodeKind::CodeBlock => WireNode::CodeBlock {
                language: p.str("language"),
                content: p.str("content"),
            },
            NodeKind::Heading => WireNode::Heading {
                level: p.int("level"),
                children: children("children")?,
            },
            NodeKind::HorizontalRule => WireNode::HorizontalRule {
                symbol: p.str("symbol"),
            },
            NodeKind::Blockquote => WireNode::Blockquote {
                children: children("children")?,
            },
            NodeKind::OrderedList => WireNode::OrderedList {
                number: p.str("number"),
                indent: p.int("indent"),
                children: children("children")?,
            },
            NodeKind::UnorderedList => WireNode::UnorderedList {
                symbol: p.str("symbol"),
                indent: p.int("indent"),
                children: children("children")?,
            },
            NodeKind::TaskList => WireNode::TaskList {
                symbol: p.str("symbol"),
                indent: p.int("indent"),
                complete: p.bool("complete"),
                children: children("children")?,
            },
            NodeKind::MathBlock => WireNode::MathBlock {
                content: p.str("content"),
            },
            NodeKind::Table => WireNode::Table {
                header: p.strings("header"),
                delimiter: p.strings("delimiter"),
                rows: p.rows("rows"),
            },
            NodeKind::EmbeddedContent => WireNode::EmbeddedContent {
                resource_name: p.str("resourceName"),
                params: p.str("params"),
            },
            NodeKind::Text => WireNode::Text {
                content: p.str("content"),
            },
            NodeKind::Bold => WireNode::Bold {
                symbol: p.str("symbol"),
                children: children("children")?,
            },
            NodeKind::Italic => WireNode::Italic {
                symbol: p.str("symbol"),
                content: p.str("content"),
            },
            NodeKind::BoldItalic => WireNode::BoldItalic {
                symbol: p.str("symbol"),
                content: p.str("content"),
            },
            NodeKind::Code => WireNode::Code {
                content: p.str("content"),
            },
            NodeKind::Image => WireNode::Image {
                alt_text: p.str("altText"),
                url: p.str("url"),
            },
            NodeKind::Link => WireNode::Link {
                text: p.str("text"),
                url: p.str("url"),
            },
            NodeKind::AutoLink => WireNode::AutoLink {
                url: p.str("url"),
                is_raw_text: p.bool("isRawText"),
            },
            NodeKind::Tag => WireNode::Tag {
                content: p.str("content"),
            },
            NodeKind::Strikethrough => WireNode::Strikethrough {
                content: p.str("content"),
            },
            NodeKind::EscapingCharacter => WireNode::EscapingCharacter {
                symbol: p.str("symbol"),
            },
            NodeKind::Math => WireNode::Math {
                content: p.str("content"),
            },
            NodeKind::Highlight => WireNode::Highlight {
                content: p.str("content"),
            },
            NodeKind::Subscript => WireNode::Subscript {
                content: p.str("content"),
            },
            NodeKind::Superscript => WireNode::Superscript {
                content: p.str("content"),
            },
            NodeKind::ReferencedContent => WireNode::ReferencedContent {
                resource_name: p.str("resourceName"),
                params: p.str("params"),
            },
            NodeKind::Spoiler => WireNode::Spoiler {
                content: p.str("content"),
            },
        };
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode_json(input: serde_json::Value) -> Vec<WireNode> {
        let value = Value::from_json(&input).unwrap();
        decode_nodes(value.as_array().unwrap(), 512).unwrap()
    }

    fn encode_json(nodes: &[WireNode]) -> serde_json::Value {
        serde_json::to_value(encode_nodes(nodes)).unwrap()
    }

    #[test]
    fn discriminants_are_unique_and_resolve_back() {
        for kind in NodeKind::ALL {
            assert_eq!(NodeKind::from_tag(kind.as_str()), Some(kind));
        }
        let mut tags: Vec<_> = NodeKind::ALL.iter().map(|k| k.as_str()).collect();
        tags.sort();
        tags.dedup();
        assert_eq!(tags.len(), NodeKind::ALL.len());
    }

    #[test]
    fn heading_encodes_with_nested_children() {
        let node = WireNode::Heading {
            level: 1,
            children: vec![WireNode::Text {
                content: "Hello".to_string(),
            }],
        };
        assert_eq!(
            encode_json(&[node]),
            json!([{
                "type": "heading",
                "value": {
                    "level": 1,
                    "children": [{ "type": "text", "value": { "content": "Hello" } }]
                }
            }])
        );
    }

    #[test]
    fn line_break_round_trips_to_identical_wire() {
        let input = json!([{ "type": "line_break", "value": {} }]);
        let nodes = decode_json(input.clone());
        assert_eq!(nodes, vec![WireNode::LineBreak]);
        assert_eq!(encode_json(&nodes), input);
    }

    #[test]
    fn unknown_type_decodes_to_empty_text() {
        let nodes = decode_json(json!([{ "type": "foobar", "value": {} }]));
        assert_eq!(nodes, vec![WireNode::fallback()]);
        assert_eq!(
            encode_json(&nodes),
            json!([{ "type": "text", "value": { "content": "" } }])
        );
    }

    #[test]
    fn malformed_elements_degrade_to_empty_text() {
        let nodes = decode_json(json!([42, null, "text", { "value": { "content": "x" } }]));
        assert_eq!(nodes, vec![WireNode::fallback(); 4]);
    }

    #[test]
    fn missing_and_mistyped_fields_take_zero_values() {
        let nodes = decode_json(json!([
            { "type": "task_list" },
            {
                "type": "ordered_list",
                "value": { "number": 7, "indent": 1.5, "children": "nope", "extra": true }
            },
            { "type": "heading", "value": { "level": "2" } },
            { "type": "auto_link", "value": { "url": "https://x.io", "isRawText": "yes" } }
        ]));
        assert_eq!(
            nodes,
            vec![
                WireNode::TaskList {
                    symbol: String::new(),
                    indent: 0,
                    complete: false,
                    children: vec![],
                },
                WireNode::OrderedList {
                    number: String::new(),
                    indent: 0,
                    children: vec![],
                },
                WireNode::Heading {
                    level: 0,
                    children: vec![],
                },
                WireNode::AutoLink {
                    url: "https://x.io".to_string(),
                    is_raw_text: false,
                },
            ]
        );
    }

    #[test]
    fn payload_is_read_by_tag_not_by_shape() {
        // A code payload under a link tag yields an empty link, not a code node.
        let nodes = decode_json(json!([{ "type": "link", "value": { "content": "x" } }]));
        assert_eq!(
            nodes,
            vec![WireNode::Link {
                text: String::new(),
                url: String::new(),
            }]
        );
    }

    #[test]
    fn table_preserves_row_and_cell_order() {
        let input = json!([{
            "type": "table",
            "value": {
                "header": ["a", "b"],
                "delimiter": ["-", "-"],
                "rows": [{ "cells": ["1", "2"] }, { "cells": ["3", "4"] }]
            }
        }]);
        let nodes = decode_json(input.clone());
        assert_eq!(
            nodes,
            vec![WireNode::Table {
                header: vec!["a".into(), "b".into()],
                delimiter: vec!["-".into(), "-".into()],
                rows: vec![
                    TableRow {
                        cells: vec!["1".into(), "2".into()],
                    },
                    TableRow {
                        cells: vec!["3".into(), "4".into()],
                    },
                ],
            }]
        );
        assert_eq!(encode_json(&nodes), input);
    }

    #[test]
    fn table_keeps_columns_of_non_string_cells() {
        let nodes = decode_json(json!([{
            "type": "table",
            "value": { "header": ["a", 1, "b"], "rows": [{ "cells": [null, "x"] }, 3] }
        }]));
        assert_eq!(
            nodes,
            vec![WireNode::Table {
                header: vec!["a".into(), "".into(), "b".into()],
                delimiter: vec![],
                rows: vec![
                    TableRow {
                        cells: vec!["".into(), "x".into()],
                    },
                    TableRow::default(),
                ],
            }]
        );
    }

    #[test]
    fn nesting_beyond_max_depth_is_a_fault() {
        let mut node = json!({ "type": "text", "value": { "content": "deep" } });
        for _ in 0..3 {
            node = json!({ "type": "blockquote", "value": { "children": [node] } });
        }
        let value = Value::from_json(&json!([node])).unwrap();
        let items = value.as_array().unwrap();

        assert!(decode_nodes(items, 4).is_ok());
        assert_eq!(
            decode_nodes(items, 3),
            Err(BridgeError::DepthExceeded { limit: 3 })
        );
    }
}
