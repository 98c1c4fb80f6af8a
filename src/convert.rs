use crate::ast::{self, Node};
use crate::wire::{TableRow, WireNode};

/// Converts engine nodes into wire nodes, preserving order.
///
/// Engine kinds without a wire counterpart become empty text.
pub fn serialize(nodes: &[Node]) -> Vec<WireNode> {
    nodes.iter().map(serialize_node).collect()
}

fn serialize_node(node: &Node) -> WireNode {
    match node {
        Node::LineBreak => WireNode::LineBreak,
        Node::Paragraph(n) => WireNode::Paragraph {
            children: serialize(&n.children),
        },
        Node::CodeBlock(n) => WireNode::CodeBlock {
            language: n.language.clone(),
            content: n.content.clone(),
        },
        Node::Heading(n) => WireNode::Heading {
            level: n.level,
            children: serialize(&n.children),
        },
        Node::HorizontalRule(n) => WireNode::HorizontalRule {
            symbol: n.symbol.clone(),
        },
        Node::Blockquote(n) => WireNode::Blockquote {
            children: serialize(&n.children),
        },
        Node::OrderedList(n) => WireNode::OrderedList {
            number: n.number.clone(),
            indent: n.indent,
            children: serialize(&n.children),
        },
        Node::UnorderedList(n) => WireNode::UnorderedList {
            symbol: n.symbol.clone(),
            indent: n.indent,
            children: serialize(&n.children),
        },
        Node::TaskList(n) => WireNode::TaskList {
            symbol: n.symbol.clone(),
            indent: n.indent,
            complete: n.complete,
            children: serialize(&n.children),
        },
        Node::MathBlock(n) => WireNode::MathBlock {
            content: n.content.clone(),
        },
        Node::Table(n) => WireNode::Table {
            header: n.header.clone(),
            delimiter: n.delimiter.clone(),
            rows: n
                .rows
                .iter()
                .map(|cells| TableRow {
                    cells: cells.clone(),
                })
                .collect(),
        },
        Node::EmbeddedContent(n) => WireNode::EmbeddedContent {
            resource_name: n.resource_name.clone(),
            params: n.params.clone(),
        },
        Node::Text(n) => WireNode::Text {
            content: n.content.clone(),
        },
        Node::Bold(n) => WireNode::Bold {
            symbol: n.symbol.clone(),
            children: serialize(&n.children),
        },
        Node::Italic(n) => WireNode::Italic {
            symbol: n.symbol.clone(),
            content: n.content.clone(),
        },
        Node::BoldItalic(n) => WireNode::BoldItalic {
            symbol: n.symbol.clone(),
            content: n.content.clone(),
        },
        Node::Code(n) => WireNode::Code {
            content: n.content.clone(),
        },
        Node::Image(n) => WireNode::Image {
            alt_text: n.alt_text.clone(),
            url: n.url.clone(),
        },
        Node::Link(n) => WireNode::Link {
            text: n.text.clone(),
            url: n.url.clone(),
        },
        Node::AutoLink(n) => WireNode::AutoLink {
            url: n.url.clone(),
            is_raw_text: n.is_raw_text,
        },
        Node::Tag(n) => WireNode::Tag {
            content: n.content.clone(),
        },
        Node::Strikethrough(n) => WireNode::Strikethrough {
            content: n.content.clone(),
        },
        Node::EscapingCharacter(n) => WireNode::EscapingCharacter {
            symbol: n.symbol.clone(),
        },
        Node::Math(n) => WireNode::Math {
            content: n.content.clone(),
        },
        Node::Highlight(n) => WireNode::Highlight {
            content: n.content.clone(),
        },
        Node::Subscript(n) => WireNode::Subscript {
            content: n.content.clone(),
        },
        Node::Superscript(n) => WireNode::Superscript {
            content: n.content.clone(),
        },
        Node::ReferencedContent(n) => WireNode::ReferencedContent {
            resource_name: n.resource_name.clone(),
            params: n.params.clone(),
        },
        Node::Spoiler(n) => WireNode::Spoiler {
            content: n.content.clone(),
        },
        Node::HtmlElement(n) => {
            tracing::debug!(
                tag_name = %n.tag_name,
                "html element has no wire kind; substituting empty text"
            );
            WireNode::fallback()
        }
    }
}

/// Rebuilds engine nodes from decoded wire nodes, preserving order.
pub fn hydrate(nodes: &[WireNode]) -> Vec<Node> {
    nodes.iter().map(hydrate_node).collect()
}

fn hydrate_node(node: &WireNode) -> Node {
    match node {
        WireNode::LineBreak => Node::LineBreak,
        WireNode::Paragraph { children } => Node::Paragraph(ast::Paragraph {
            children: hydrate(children),
        }),
        WireNode::CodeBlock { language, content } => Node::CodeBlock(ast::CodeBlock {
            language: language.clone(),
            content: content.clone(),
        }),
        WireNode::Heading { level, children } => Node::Heading(ast::Heading {
            level: *level,
            children: hydrate(children),
        }),
        WireNode::HorizontalRule { symbol } => Node::HorizontalRule(ast::HorizontalRule {
            symbol: symbol.clone(),
        }),
        WireNode::Blockquote { children } => Node::Blockquote(ast::Blockquote {
            children: hydrate(children),
        }),
        WireNode::OrderedList {
            number,
            indent,
            children,
        } => Node::OrderedList(ast::OrderedList {
            number: number.clone(),
            indent: *indent,
            children: hydrate(children),
        }),
        WireNode::UnorderedList {
            symbol,
            indent,
            children,
        } => Node::UnorderedList(ast::UnorderedList {
            symbol: symbol.clone(),
            indent: *indent,
            children: hydrate(children),
        }),
        WireNode::TaskList {
            symbol,
            indent,
            complete,
            children,
        } => Node::TaskList(ast::TaskList {
            symbol: symbol.clone(),
            indent: *indent,
            complete: *complete,
            children: hydrate(children),
        }),
        WireNode::MathBlock { content } => Node::MathBlock(ast::MathBlock {
            content: content.clone(),
        }),
        WireNode::Table {
            header,
            delimiter,
            rows,
        } => Node::Table(ast::Table {
            header: header.clone(),
            delimiter: delimiter.clone(),
            rows: rows.iter().map(|row| row.cells.clone()).collect(),
        }),
        WireNode::EmbeddedContent {
            resource_name,
            params,
        } => Node::EmbeddedContent(ast::EmbeddedContent {
            resource_name: resource_name.clone(),
            params: params.clone(),
        }),
        WireNode::Text { content } => Node::text(content.clone()),
        WireNode::Bold { symbol, children } => Node::Bold(ast::Bold {
            symbol: symbol.clone(),
            children: hydrate(children),
        }),
        WireNode::Italic { symbol, content } => Node::Italic(ast::Italic {
            symbol: symbol.clone(),
            content: content.clone(),
        }),
        WireNode::BoldItalic { symbol, content } => Node::BoldItalic(ast::BoldItalic {
            symbol: symbol.clone(),
            content: content.clone(),
        }),
        WireNode::Code { content } => Node::Code(ast::Code {
            content: content.clone(),
        }),
        WireNode::Image { alt_text, url } => Node::Image(ast::Image {
            alt_text: alt_text.clone(),
            url: url.clone(),
        }),
        WireNode::Link { text, url } => Node::Link(ast::Link {
            text: text.clone(),
            url: url.clone(),
        }),
        WireNode::AutoLink { url, is_raw_text } => Node::AutoLink(ast::AutoLink {
            url: url.clone(),
            is_raw_text: *is_raw_text,
        }),
        WireNode::Tag { content } => Node::Tag(ast::Tag {
            content: content.clone(),
        }),
        WireNode::Strikethrough { content } => Node::Strikethrough(ast::Strikethrough {
            content: content.clone(),
        }),
        WireNode::EscapingCharacter { symbol } => {
            Node::EscapingCharacter(ast::EscapingCharacter {
                symbol: symbol.clone(),
            })
        }
        WireNode::Math { content } => Node::Math(ast::Math {
            content: content.clone(),
        }),
        WireNode::Highlight { content } => Node::Highlight(ast::Highlight {
            content: content.clone(),
        }),
        WireNode::Subscript { content } => Node::Subscript(ast::Subscript {
            content: content.clone(),
        }),
        WireNode::Superscript { content } => Node::Superscript(ast::Superscript {
            content: content.clone(),
        }),
        WireNode::ReferencedContent {
            resource_name,
            params,
        } => Node::ReferencedContent(ast::ReferencedContent {
            resource_name: resource_name.clone(),
            params: params.clone(),
        }),
        WireNode::Spoiler { content } => Node::Spoiler(ast::Spoiler {
            content: content.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::{decode_nodes, encode_nodes, NodeKind};

    fn text(content: &str) -> Node {
        Node::text(content)
    }

    // One node of every wire kind, containers holding ordered children.
    fn every_kind() -> Vec<Node> {
        vec![
            Node::LineBreak,
            Node::Paragraph(ast::Paragraph {
                children: vec![text("a"), text("b")],
            }),
            Node::CodeBlock(ast::CodeBlock {
                language: "rust".into(),
                content: "fn main() {}".into(),
            }),
            Node::Heading(ast::Heading {
                level: 2,
                children: vec![text("Title")],
            }),
            Node::HorizontalRule(ast::HorizontalRule { symbol: "*".into() }),
            Node::Blockquote(ast::Blockquote {
                children: vec![Node::Paragraph(ast::Paragraph {
                    children: vec![text("quoted")],
                })],
            }),
            Node::OrderedList(ast::OrderedList {
                number: "3".into(),
                indent: 2,
                children: vec![text("third")],
            }),
            Node::UnorderedList(ast::UnorderedList {
                symbol: "-".into(),
                indent: 0,
                children: vec![text("item")],
            }),
            Node::TaskList(ast::TaskList {
                symbol: "*".into(),
                indent: 4,
                complete: true,
                children: vec![text("done")],
            }),
            Node::MathBlock(ast::MathBlock {
                content: "x^2".into(),
            }),
            Node::Table(ast::Table {
                header: vec!["a".into(), "b".into()],
                delimiter: vec!["-".into(), "-".into()],
                rows: vec![vec!["1".into(), "2".into()], vec!["3".into(), "4".into()]],
            }),
            Node::EmbeddedContent(ast::EmbeddedContent {
                resource_name: "memos/1".into(),
                params: "line=2".into(),
            }),
            text("plain"),
            Node::Bold(ast::Bold {
                symbol: "_".into(),
                children: vec![text("x"), Node::Code(ast::Code { content: "y".into() })],
            }),
            Node::Italic(ast::Italic {
                symbol: "*".into(),
                content: "it".into(),
            }),
            Node::BoldItalic(ast::BoldItalic {
                symbol: "_".into(),
                content: "both".into(),
            }),
            Node::Code(ast::Code {
                content: "code".into(),
            }),
            Node::Image(ast::Image {
                alt_text: "alt".into(),
                url: "https://img".into(),
            }),
            Node::Link(ast::Link {
                text: "link".into(),
                url: "https://link".into(),
            }),
            Node::AutoLink(ast::AutoLink {
                url: "https://auto".into(),
                is_raw_text: true,
            }),
            Node::Tag(ast::Tag {
                content: "tag".into(),
            }),
            Node::Strikethrough(ast::Strikethrough {
                content: "gone".into(),
            }),
            Node::EscapingCharacter(ast::EscapingCharacter { symbol: "#".into() }),
            Node::Math(ast::Math {
                content: "y".into(),
            }),
            Node::Highlight(ast::Highlight {
                content: "hl".into(),
            }),
            Node::Subscript(ast::Subscript {
                content: "sub".into(),
            }),
            Node::Superscript(ast::Superscript {
                content: "sup".into(),
            }),
            Node::ReferencedContent(ast::ReferencedContent {
                resource_name: "memos/2".into(),
                params: String::new(),
            }),
            Node::Spoiler(ast::Spoiler {
                content: "secret".into(),
            }),
        ]
    }

    #[test]
    fn every_kind_is_covered() {
        let kinds: Vec<NodeKind> = serialize(&every_kind()).iter().map(|n| n.kind()).collect();
        assert_eq!(kinds, NodeKind::ALL.to_vec());
    }

    #[test]
    fn hydrate_inverts_serialize() {
        let nodes = every_kind();
        assert_eq!(hydrate(&serialize(&nodes)), nodes);
    }

    #[test]
    fn serialize_inverts_hydrate() {
        let wire = serialize(&every_kind());
        assert_eq!(serialize(&hydrate(&wire)), wire);
    }

    #[test]
    fn survives_canonical_encoding() {
        let nodes = every_kind();
        let encoded = encode_nodes(&serialize(&nodes));
        let decoded = decode_nodes(encoded.as_array().unwrap(), 512).unwrap();
        assert_eq!(hydrate(&decoded), nodes);
    }

    #[test]
    fn html_element_serializes_to_empty_text() {
        let nodes = vec![
            text("a"),
            Node::HtmlElement(ast::HtmlElement {
                tag_name: "br".into(),
            }),
            text("b"),
        ];
        assert_eq!(
            serialize(&nodes),
            vec![
                WireNode::Text {
                    content: "a".into()
                },
                WireNode::fallback(),
                WireNode::Text {
                    content: "b".into()
                },
            ]
        );
    }
}
