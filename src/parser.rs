use crate::ast::*;
use crate::error::ParseError;
use crate::tokenizer::{join, Token, TokenKind};

mod inline;

/// Default nesting limit for blocks and bold spans.
///
/// Release builds stay within a 1 MB stack at this depth. Unoptimized builds
/// need several megabytes, more than the 2 MB of a default spawned thread;
/// lower the limit when running on small stacks.
pub const DEFAULT_MAX_DEPTH: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    pub max_depth: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

pub fn parse(tokens: &[Token<'_>], options: &ParserOptions) -> Result<Vec<Node>, ParseError> {
    let parser = Parser {
        max_depth: options.max_depth,
    };
    parser.blocks(tokens, 1)
}

const NEWLINE: Token<'static> = Token {
    kind: TokenKind::Newline,
    value: "\n",
};

type Parsed = Option<(Node, usize)>;

struct Parser {
    max_depth: usize,
}

impl Parser {
    fn enter(&self, depth: usize) -> Result<(), ParseError> {
        if depth > self.max_depth {
            return Err(ParseError::DepthExceeded {
                limit: self.max_depth,
            });
        }
        Ok(())
    }

    fn blocks(&self, tokens: &[Token<'_>], depth: usize) -> Result<Vec<Node>, ParseError> {
        let mut nodes = Vec::new();
        let mut pos = 0;
        while pos < tokens.len() {
            self.enter(depth)?;
            let rest = &tokens[pos..];
            if rest[0].is(TokenKind::Newline) {
                nodes.push(Node::LineBreak);
                pos += 1;
                continue;
            }
            let (node, consumed) = self.block(rest, depth)?;
            nodes.push(node);
            pos += consumed;
        }
        Ok(nodes)
    }

    fn block(&self, tokens: &[Token<'_>], depth: usize) -> Result<(Node, usize), ParseError> {
        let found = code_block(tokens)
            .or_else(|| math_block(tokens))
            .or_else(|| table(tokens))
            .or_else(|| horizontal_rule(tokens));
        if let Some(found) = found {
            return Ok(found);
        }
        if let Some(found) = self.heading(tokens, depth)? {
            return Ok(found);
        }
        if let Some(found) = self.blockquote(tokens, depth)? {
            return Ok(found);
        }
        if let Some(found) = self.task_list(tokens, depth)? {
            return Ok(found);
        }
        if let Some(found) = self.unordered_list(tokens, depth)? {
            return Ok(found);
        }
        if let Some(found) = self.ordered_list(tokens, depth)? {
            return Ok(found);
        }
        if let Some(found) = embedded_content(tokens) {
            return Ok(found);
        }
        self.paragraph(tokens, depth)
    }

    fn heading(&self, tokens: &[Token<'_>], depth: usize) -> Result<Parsed, ParseError> {
        let line = first_line(tokens);
        let level = line.iter().take_while(|t| t.is(TokenKind::PoundSign)).count();
        if level == 0 || level > 6 {
            return Ok(None);
        }
        let Some(space) = line.get(level) else {
            return Ok(None);
        };
        let content = &line[level + 1..];
        if !space.is(TokenKind::Space) || content.is_empty() {
            return Ok(None);
        }

        let children = self.inlines(content, depth + 1)?;
        let node = Node::Heading(Heading {
            level: level as i64,
            children,
        });
        Ok(Some((node, line.len())))
    }

    fn blockquote(&self, tokens: &[Token<'_>], depth: usize) -> Result<Parsed, ParseError> {
        let mut inner = Vec::new();
        let mut consumed = 0;
        let mut lines = 0;
        for line in tokens.split(|t| t.is(TokenKind::Newline)) {
            let Some(content) = quote_content(line) else {
                break;
            };
            if lines > 0 {
                inner.push(NEWLINE);
                consumed += 1;
            }
            inner.extend_from_slice(content);
            consumed += line.len();
            lines += 1;
        }
        if lines == 0 {
            return Ok(None);
        }

        let children = self.blocks(&inner, depth + 1)?;
        Ok(Some((Node::Blockquote(Blockquote { children }), consumed)))
    }

    fn task_list(&self, tokens: &[Token<'_>], depth: usize) -> Result<Parsed, ParseError> {
        let line = first_line(tokens);
        let (indent, rest) = indent_of(line);
        let [symbol, space, open, mark, close, gap, content @ ..] = rest else {
            return Ok(None);
        };
        if !is_bullet(symbol)
            || !space.is(TokenKind::Space)
            || !open.is(TokenKind::LeftSquareBracket)
            || !close.is(TokenKind::RightSquareBracket)
            || !gap.is(TokenKind::Space)
        {
            return Ok(None);
        }
        let complete = match (mark.kind, mark.value) {
            (TokenKind::Space, " ") => false,
            (TokenKind::Text, "x" | "X") => true,
            _ => return Ok(None),
        };

        let children = self.inlines(content, depth + 1)?;
        let node = Node::TaskList(TaskList {
            symbol: symbol.value.to_string(),
            indent: indent as i64,
            complete,
            children,
        });
        Ok(Some((node, line.len())))
    }

    fn unordered_list(&self, tokens: &[Token<'_>], depth: usize) -> Result<Parsed, ParseError> {
        let line = first_line(tokens);
        let (indent, rest) = indent_of(line);
        let [symbol, space, content @ ..] = rest else {
            return Ok(None);
        };
        if !is_bullet(symbol) || !space.is(TokenKind::Space) {
            return Ok(None);
        }

        let children = self.inlines(content, depth + 1)?;
        let node = Node::UnorderedList(UnorderedList {
            symbol: symbol.value.to_string(),
            indent: indent as i64,
            children,
        });
        Ok(Some((node, line.len())))
    }

    fn ordered_list(&self, tokens: &[Token<'_>], depth: usize) -> Result<Parsed, ParseError> {
        let line = first_line(tokens);
        let (indent, rest) = indent_of(line);
        let [number, dot, space, content @ ..] = rest else {
            return Ok(None);
        };
        if !number.is(TokenKind::Number) || !dot.is(TokenKind::Dot) || !space.is(TokenKind::Space) {
            return Ok(None);
        }

        let children = self.inlines(content, depth + 1)?;
        let node = Node::OrderedList(OrderedList {
            number: number.value.to_string(),
            indent: indent as i64,
            children,
        });
        Ok(Some((node, line.len())))
    }

    fn paragraph(&self, tokens: &[Token<'_>], depth: usize) -> Result<(Node, usize), ParseError> {
        let line = first_line(tokens);
        let children = self.inlines(line, depth + 1)?;
        Ok((Node::Paragraph(Paragraph { children }), line.len()))
    }
}

fn first_line<'t, 'a>(tokens: &'t [Token<'a>]) -> &'t [Token<'a>] {
    let end = tokens
        .iter()
        .position(|t| t.is(TokenKind::Newline))
        .unwrap_or(tokens.len());
    &tokens[..end]
}

fn indent_of<'t, 'a>(line: &'t [Token<'a>]) -> (usize, &'t [Token<'a>]) {
    let indent = line.iter().take_while(|t| t.is(TokenKind::Space)).count();
    (indent, &line[indent..])
}

fn is_bullet(token: &Token<'_>) -> bool {
    matches!(
        token.kind,
        TokenKind::Hyphen | TokenKind::Asterisk | TokenKind::PlusSign
    )
}

fn quote_content<'t, 'a>(line: &'t [Token<'a>]) -> Option<&'t [Token<'a>]> {
    match line {
        [marker] if marker.is(TokenKind::GreaterThan) => Some(&[]),
        [marker, space, rest @ ..]
            if marker.is(TokenKind::GreaterThan) && space.is(TokenKind::Space) =>
        {
            Some(rest)
        }
        _ => None,
    }
}

/// Opening fence line, content lines and a closing line equal to `fence`.
/// Returns the text after the opening fence, the content and tokens consumed.
fn fenced(tokens: &[Token<'_>], fence: &str) -> Option<(String, String, usize)> {
    let mut lines = tokens.split(|t| t.is(TokenKind::Newline));
    let opening = lines.next()?;
    let info = join(opening).strip_prefix(fence)?.to_string();

    let mut consumed = opening.len();
    let mut content = Vec::new();
    for line in lines {
        consumed += 1 + line.len();
        let text = join(line);
        if text == fence {
            return Some((info, content.join("\n"), consumed));
        }
        content.push(text);
    }
    None
}

fn code_block(tokens: &[Token<'_>]) -> Parsed {
    let (language, content, consumed) = fenced(tokens, "```")?;
    if language.contains('`') {
        return None;
    }
    Some((Node::CodeBlock(CodeBlock { language, content }), consumed))
}

fn math_block(tokens: &[Token<'_>]) -> Parsed {
    let (info, content, consumed) = fenced(tokens, "$$")?;
    if !info.is_empty() {
        return None;
    }
    Some((Node::MathBlock(MathBlock { content }), consumed))
}

fn table_cells(line: &[Token<'_>]) -> Option<Vec<String>> {
    let text = join(line);
    let inner = text.trim().strip_prefix('|')?.strip_suffix('|')?;
    Some(inner.split('|').map(|cell| cell.trim().to_string()).collect())
}

fn is_delimiter_cell(cell: &str) -> bool {
    cell.contains('-') && cell.chars().all(|c| c == '-' || c == ':')
}

fn table(tokens: &[Token<'_>]) -> Parsed {
    let mut lines = tokens.split(|t| t.is(TokenKind::Newline));
    let header_line = lines.next()?;
    let header = table_cells(header_line)?;
    let delimiter_line = lines.next()?;
    let delimiter = table_cells(delimiter_line)?;
    if delimiter.len() != header.len() || !delimiter.iter().all(|c| is_delimiter_cell(c)) {
        return None;
    }

    let mut consumed = header_line.len() + 1 + delimiter_line.len();
    let mut rows = Vec::new();
    for line in lines {
        match table_cells(line) {
            Some(cells) if cells.len() == header.len() => {
                consumed += 1 + line.len();
                rows.push(cells);
            }
            _ => break,
        }
    }

    let node = Node::Table(Table {
        header,
        delimiter,
        rows,
    });
    Some((node, consumed))
}

fn horizontal_rule(tokens: &[Token<'_>]) -> Parsed {
    let [a, b, c] = first_line(tokens) else {
        return None;
    };
    let is_rule = matches!(
        a.kind,
        TokenKind::Hyphen | TokenKind::Asterisk | TokenKind::Underscore
    ) && b.kind == a.kind
        && c.kind == a.kind;
    if !is_rule {
        return None;
    }
    let node = Node::HorizontalRule(HorizontalRule {
        symbol: a.value.to_string(),
    });
    Some((node, 3))
}

/// `name` or `name?params` inside `[[...]]`.
fn resource(tokens: &[Token<'_>]) -> Option<(String, String)> {
    let bracketed = tokens.iter().any(|t| {
        matches!(
            t.kind,
            TokenKind::LeftSquareBracket | TokenKind::RightSquareBracket | TokenKind::Newline
        )
    });
    if bracketed {
        return None;
    }
    let (name, params) = match tokens.iter().position(|t| t.is(TokenKind::QuestionMark)) {
        Some(idx) => (join(&tokens[..idx]), join(&tokens[idx + 1..])),
        None => (join(tokens), String::new()),
    };
    if name.is_empty() {
        return None;
    }
    Some((name, params))
}

fn embedded_content(tokens: &[Token<'_>]) -> Parsed {
    let line = first_line(tokens);
    let [bang, open1, open2, inner @ .., close1, close2] = line else {
        return None;
    };
    if !bang.is(TokenKind::ExclamationMark)
        || !open1.is(TokenKind::LeftSquareBracket)
        || !open2.is(TokenKind::LeftSquareBracket)
        || !close1.is(TokenKind::RightSquareBracket)
        || !close2.is(TokenKind::RightSquareBracket)
    {
        return None;
    }
    let (resource_name, params) = resource(inner)?;
    let node = Node::EmbeddedContent(EmbeddedContent {
        resource_name,
        params,
    });
    Some((node, line.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    fn parse_str(input: &str) -> Vec<Node> {
        let tokens = tokenize(input).unwrap();
        parse(&tokens, &ParserOptions::default()).unwrap()
    }

    fn paragraph(children: Vec<Node>) -> Node {
        Node::Paragraph(Paragraph { children })
    }

    #[test]
    fn heading() {
        assert_eq!(
            parse_str("# Hello"),
            vec![Node::Heading(Heading {
                level: 1,
                children: vec![Node::text("Hello")],
            })]
        );
    }

    #[test]
    fn heading_needs_space_and_content() {
        assert!(matches!(parse_str("#Hello")[0], Node::Paragraph(_)));
        assert!(matches!(parse_str("####### seven")[0], Node::Paragraph(_)));
        assert!(matches!(parse_str("### ")[0], Node::Paragraph(_)));
    }

    #[test]
    fn lines_are_separated_by_line_breaks() {
        assert_eq!(
            parse_str("a\n\nb\n"),
            vec![
                paragraph(vec![Node::text("a")]),
                Node::LineBreak,
                Node::LineBreak,
                paragraph(vec![Node::text("b")]),
                Node::LineBreak,
            ]
        );
    }

    #[test]
    fn code_block_with_language() {
        assert_eq!(
            parse_str("```rust\nlet a = 1;\n\nlet b = 2;\n```\nafter"),
            vec![
                Node::CodeBlock(CodeBlock {
                    language: "rust".into(),
                    content: "let a = 1;\n\nlet b = 2;".into(),
                }),
                Node::LineBreak,
                paragraph(vec![Node::text("after")]),
            ]
        );
    }

    #[test]
    fn unclosed_fence_is_a_paragraph() {
        assert!(matches!(parse_str("```\ncode")[0], Node::Paragraph(_)));
    }

    #[test]
    fn math_block() {
        assert_eq!(
            parse_str("$$\na+b\n$$"),
            vec![Node::MathBlock(MathBlock {
                content: "a+b".into(),
            })]
        );
    }

    #[test]
    fn table_rows_stop_at_mismatched_line() {
        assert_eq!(
            parse_str("| a | b |\n| - | :-: |\n| 1 | 2 |\n| 3 |"),
            vec![
                Node::Table(Table {
                    header: vec!["a".into(), "b".into()],
                    delimiter: vec!["-".into(), ":-:".into()],
                    rows: vec![vec!["1".into(), "2".into()]],
                }),
                Node::LineBreak,
                paragraph(vec![Node::text("| 3 |")]),
            ]
        );
    }

    #[test]
    fn table_needs_a_delimiter_row() {
        assert!(matches!(parse_str("| a |\n| b |")[0], Node::Paragraph(_)));
    }

    #[test]
    fn horizontal_rules() {
        for symbol in ["-", "*", "_"] {
            assert_eq!(
                parse_str(&symbol.repeat(3)),
                vec![Node::HorizontalRule(HorizontalRule {
                    symbol: symbol.into(),
                })]
            );
        }
    }

    #[test]
    fn lists() {
        assert_eq!(
            parse_str("- one\n  * two\n3. three\n- [x] done\n+ [ ] todo"),
            vec![
                Node::UnorderedList(UnorderedList {
                    symbol: "-".into(),
                    indent: 0,
                    children: vec![Node::text("one")],
                }),
                Node::LineBreak,
                Node::UnorderedList(UnorderedList {
                    symbol: "*".into(),
                    indent: 2,
                    children: vec![Node::text("two")],
                }),
                Node::LineBreak,
                Node::OrderedList(OrderedList {
                    number: "3".into(),
                    indent: 0,
                    children: vec![Node::text("three")],
                }),
                Node::LineBreak,
                Node::TaskList(TaskList {
                    symbol: "-".into(),
                    indent: 0,
                    complete: true,
                    children: vec![Node::text("done")],
                }),
                Node::LineBreak,
                Node::TaskList(TaskList {
                    symbol: "+".into(),
                    indent: 0,
                    complete: false,
                    children: vec![Node::text("todo")],
                }),
            ]
        );
    }

    #[test]
    fn blockquote_spans_consecutive_lines() {
        assert_eq!(
            parse_str("> a\n>\n> > b\nc"),
            vec![
                Node::Blockquote(Blockquote {
                    children: vec![
                        paragraph(vec![Node::text("a")]),
                        Node::LineBreak,
                        Node::LineBreak,
                        Node::Blockquote(Blockquote {
                            children: vec![paragraph(vec![Node::text("b")])],
                        }),
                    ],
                }),
                Node::LineBreak,
                paragraph(vec![Node::text("c")]),
            ]
        );
    }

    #[test]
    fn embedded_content() {
        assert_eq!(
            parse_str("![[memos/1?line=2]]"),
            vec![Node::EmbeddedContent(EmbeddedContent {
                resource_name: "memos/1".into(),
                params: "line=2".into(),
            })]
        );
    }

    #[test]
    fn nesting_beyond_max_depth_is_a_fault() {
        let tokens = tokenize("> > > a").unwrap();
        assert!(parse(&tokens, &ParserOptions { max_depth: 5 }).is_ok());
        assert_eq!(
            parse(&tokens, &ParserOptions { max_depth: 4 }),
            Err(ParseError::DepthExceeded { limit: 4 })
        );
    }
}
