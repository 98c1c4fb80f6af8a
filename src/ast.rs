#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    // Block nodes
    LineBreak,
    Paragraph(Paragraph),
    CodeBlock(CodeBlock),
    Heading(Heading),
    HorizontalRule(HorizontalRule),
    Blockquote(Blockquote),
    OrderedList(OrderedList),
    UnorderedList(UnorderedList),
    TaskList(TaskList),
    MathBlock(MathBlock),
    Table(Table),
    EmbeddedContent(EmbeddedContent),

    // Inline nodes
    Text(Text),
    Bold(Bold),
    Italic(Italic),
    BoldItalic(BoldItalic),
    Code(Code),
    Image(Image),
    Link(Link),
    AutoLink(AutoLink),
    Tag(Tag),
    Strikethrough(Strikethrough),
    EscapingCharacter(EscapingCharacter),
    Math(Math),
    Highlight(Highlight),
    Subscript(Subscript),
    Superscript(Superscript),
    ReferencedContent(ReferencedContent),
    Spoiler(Spoiler),
    HtmlElement(HtmlElement),
}

impl Node {
    pub fn text(content: impl Into<String>) -> Self {
        Node::Text(Text {
            content: content.into(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Paragraph {
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CodeBlock {
    pub language: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Heading {
    pub level: i64,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct HorizontalRule {
    pub symbol: String, // "-", "*" or "_"
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Blockquote {
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrderedList {
    pub number: String,
    pub indent: i64,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct UnorderedList {
    pub symbol: String,
    pub indent: i64,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskList {
    pub symbol: String,
    pub indent: i64,
    pub complete: bool,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MathBlock {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub header: Vec<String>,
    pub delimiter: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EmbeddedContent {
    pub resource_name: String,
    pub params: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Text {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Bold {
    pub symbol: String,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Italic {
    pub symbol: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoldItalic {
    pub symbol: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Code {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Image {
    pub alt_text: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Link {
    pub text: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AutoLink {
    pub url: String,
    pub is_raw_text: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tag {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Strikethrough {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EscapingCharacter {
    pub symbol: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Math {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Highlight {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Subscript {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Superscript {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReferencedContent {
    pub resource_name: String,
    pub params: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Spoiler {
    pub content: String,
}

/// Inline HTML tag the engine understands but the wire schema does not carry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HtmlElement {
    pub tag_name: String,
}
