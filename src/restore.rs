use crate::ast::*;

const MAX_HEADING_LEVEL: i64 = 6;
const MAX_INDENT: i64 = 256;

/// Renders nodes back to markdown source.
///
/// Inline constructs reproduce their source exactly. Block constructs are
/// written in one canonical form, so `parse(restore(parse(s)))` equals
/// `parse(s)` even where `restore(parse(s))` differs from `s`.
///
/// That holds for the AST itself. Kinds without a wire form, such as
/// `HtmlElement`, become empty text when serialized, so `a<br>b` sent through
/// the wire restores as `ab`.
pub fn restore(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(&mut out, node);
    }
    out
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::LineBreak => out.push('\n'),
        Node::Paragraph(p) => write_all(out, &p.children),
        Node::CodeBlock(c) => {
            out.push_str("```");
            out.push_str(&c.language);
            out.push('\n');
            if !c.content.is_empty() {
                out.push_str(&c.content);
                out.push('\n');
            }
            out.push_str("```");
        }
        Node::Heading(h) => {
            let level = h.level.clamp(1, MAX_HEADING_LEVEL) as usize;
            out.push_str(&"#".repeat(level));
            out.push(' ');
            write_all(out, &h.children);
        }
        Node::HorizontalRule(hr) => out.push_str(&hr.symbol.repeat(3)),
        Node::Blockquote(b) => {
            let inner = restore(&b.children);
            let quoted: Vec<String> = inner.split('\n').map(|line| format!("> {line}")).collect();
            out.push_str(&quoted.join("\n"));
        }
        Node::OrderedList(l) => {
            indent(out, l.indent);
            out.push_str(&l.number);
            out.push_str(". ");
            write_all(out, &l.children);
        }
        Node::UnorderedList(l) => {
            indent(out, l.indent);
            out.push_str(&l.symbol);
            out.push(' ');
            write_all(out, &l.children);
        }
        Node::TaskList(l) => {
            indent(out, l.indent);
            out.push_str(&l.symbol);
            out.push_str(if l.complete { " [x] " } else { " [ ] " });
            write_all(out, &l.children);
        }
        Node::MathBlock(m) => {
            out.push_str("$$\n");
            if !m.content.is_empty() {
                out.push_str(&m.content);
                out.push('\n');
            }
            out.push_str("$$");
        }
        Node::Table(t) => {
            let mut lines = vec![table_row(&t.header), table_row(&t.delimiter)];
            lines.extend(t.rows.iter().map(|row| table_row(row)));
            out.push_str(&lines.join("\n"));
        }
        Node::EmbeddedContent(e) => {
            out.push('!');
            resource(out, &e.resource_name, &e.params);
        }
        Node::Text(t) => out.push_str(&t.content),
        Node::Bold(b) => {
            let marker = b.symbol.repeat(2);
            out.push_str(&marker);
            write_all(out, &b.children);
            out.push_str(&marker);
        }
        Node::Italic(i) => wrap(out, &i.symbol, &i.content),
        Node::BoldItalic(b) => wrap(out, &b.symbol.repeat(3), &b.content),
        Node::Code(c) => wrap(out, "`", &c.content),
        Node::Image(i) => {
            out.push('!');
            link(out, &i.alt_text, &i.url);
        }
        Node::Link(l) => link(out, &l.text, &l.url),
        Node::AutoLink(a) if a.is_raw_text => out.push_str(&a.url),
        Node::AutoLink(a) => {
            out.push('<');
            out.push_str(&a.url);
            out.push('>');
        }
        Node::Tag(t) => {
            out.push('#');
            out.push_str(&t.content);
        }
        Node::Strikethrough(s) => wrap(out, "~~", &s.content),
        Node::EscapingCharacter(e) => {
            out.push('\\');
            out.push_str(&e.symbol);
        }
        Node::Math(m) => wrap(out, "$", &m.content),
        Node::Highlight(h) => wrap(out, "==", &h.content),
        Node::Subscript(s) => wrap(out, "~", &s.content),
        Node::Superscript(s) => wrap(out, "^", &s.content),
        Node::ReferencedContent(r) => resource(out, &r.resource_name, &r.params),
        Node::Spoiler(s) => wrap(out, "||", &s.content),
        Node::HtmlElement(h) => {
            out.push('<');
            out.push_str(&h.tag_name);
            out.push('>');
        }
    }
}

fn write_all(out: &mut String, nodes: &[Node]) {
    for node in nodes {
        write_node(out, node);
    }
}

fn wrap(out: &mut String, marker: &str, content: &str) {
    out.push_str(marker);
    out.push_str(content);
    out.push_str(marker);
}

fn indent(out: &mut String, width: i64) {
    out.push_str(&" ".repeat(width.clamp(0, MAX_INDENT) as usize));
}

fn link(out: &mut String, text: &str, url: &str) {
    out.push('[');
    out.push_str(text);
    out.push_str("](");
    out.push_str(url);
    out.push(')');
}

fn resource(out: &mut String, name: &str, params: &str) {
    out.push_str("[[");
    out.push_str(name);
    if !params.is_empty() {
        out.push('?');
        out.push_str(params);
    }
    out.push_str("]]");
}

fn table_row(cells: &[String]) -> String {
    format!("| {} |", cells.join(" | "))
}
