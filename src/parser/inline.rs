use super::{resource, Parsed, Parser};
use crate::ast::*;
use crate::error::ParseError;
use crate::tokenizer::{join, Token, TokenKind};

impl Parser {
    pub(super) fn inlines(&self, tokens: &[Token<'_>], depth: usize) -> Result<Vec<Node>, ParseError> {
        let mut nodes = Vec::new();
        let mut text = String::new();
        let mut pos = 0;
        while pos < tokens.len() {
            self.enter(depth)?;
            match self.inline(&tokens[pos..], depth)? {
                Some((node, consumed)) => {
                    if !text.is_empty() {
                        nodes.push(Node::text(std::mem::take(&mut text)));
                    }
                    nodes.push(node);
                    pos += consumed;
                }
                None => {
                    text.push_str(tokens[pos].value);
                    pos += 1;
                }
            }
        }
        if !text.is_empty() {
            nodes.push(Node::text(text));
        }
        Ok(nodes)
    }

    fn inline(&self, tokens: &[Token<'_>], depth: usize) -> Result<Parsed, ParseError> {
        let found = escaping_character(tokens)
            .or_else(|| html_element(tokens))
            .or_else(|| bold_italic(tokens))
            .or_else(|| image(tokens))
            .or_else(|| referenced_content(tokens))
            .or_else(|| link(tokens))
            .or_else(|| auto_link(tokens));
        if found.is_some() {
            return Ok(found);
        }
        if let Some(found) = self.bold(tokens, depth)? {
            return Ok(Some(found));
        }
        Ok(italic(tokens)
            .or_else(|| spoiler(tokens))
            .or_else(|| highlight(tokens))
            .or_else(|| code(tokens))
            .or_else(|| strikethrough(tokens))
            .or_else(|| subscript(tokens))
            .or_else(|| superscript(tokens))
            .or_else(|| math(tokens))
            .or_else(|| tag(tokens)))
    }

    fn bold(&self, tokens: &[Token<'_>], depth: usize) -> Result<Parsed, ParseError> {
        let Some(symbol) = tokens.first().and_then(emphasis) else {
            return Ok(None);
        };
        if !tokens.get(1).is_some_and(|t| t.is(symbol)) {
            return Ok(None);
        }
        let close = (2..tokens.len().saturating_sub(1))
            .take_while(|&i| !tokens[i].is(TokenKind::Newline))
            .find(|&i| tokens[i].is(symbol) && tokens[i + 1].is(symbol));
        let Some(close) = close.filter(|&i| i > 2) else {
            return Ok(None);
        };

        let children = self.inlines(&tokens[2..close], depth + 1)?;
        let node = Node::Bold(Bold {
            symbol: tokens[0].value.to_string(),
            children,
        });
        Ok(Some((node, close + 2)))
    }
}

fn emphasis(token: &Token<'_>) -> Option<TokenKind> {
    match token.kind {
        TokenKind::Asterisk | TokenKind::Underscore => Some(token.kind),
        _ => None,
    }
}

/// Matches `open`, a non-empty run free of `close[0]`, then `close`.
/// Returns the run and the number of tokens consumed.
fn delimited<'t, 'a>(
    tokens: &'t [Token<'a>],
    open: &[TokenKind],
    close: &[TokenKind],
) -> Option<(&'t [Token<'a>], usize)> {
    if tokens.len() < open.len() || !tokens.iter().zip(open).all(|(t, k)| t.is(*k)) {
        return None;
    }
    let start = open.len();
    let end = start
        + tokens[start..]
            .iter()
            .position(|t| t.is(close[0]) || t.is(TokenKind::Newline))?;
    let closed = tokens[end..]
        .iter()
        .map(|t| t.kind)
        .take(close.len())
        .eq(close.iter().copied());
    if end == start || !closed {
        return None;
    }
    Some((&tokens[start..end], end + close.len()))
}

fn escaping_character(tokens: &[Token<'_>]) -> Parsed {
    let [backslash, escaped, ..] = tokens else {
        return None;
    };
    if !backslash.is(TokenKind::Backslash) || !escaped.kind.is_symbol() {
        return None;
    }
    let node = Node::EscapingCharacter(EscapingCharacter {
        symbol: escaped.value.to_string(),
    });
    Some((node, 2))
}

fn html_element(tokens: &[Token<'_>]) -> Parsed {
    let consumed = match tokens {
        [lt, name, gt, ..]
            if lt.is(TokenKind::LessThan)
                && name.is(TokenKind::Text)
                && matches!(name.value, "br" | "br/")
                && gt.is(TokenKind::GreaterThan) =>
        {
            3
        }
        [lt, name, space, slash, gt, ..]
            if lt.is(TokenKind::LessThan)
                && name.value == "br"
                && space.is(TokenKind::Space)
                && slash.value == "/"
                && gt.is(TokenKind::GreaterThan) =>
        {
            5
        }
        _ => return None,
    };
    let node = Node::HtmlElement(HtmlElement {
        tag_name: "br".to_string(),
    });
    Some((node, consumed))
}

fn bold_italic(tokens: &[Token<'_>]) -> Parsed {
    let symbol = emphasis(tokens.first()?)?;
    let marker = [symbol; 3];
    let (content, consumed) = delimited(tokens, &marker, &marker)?;
    let node = Node::BoldItalic(BoldItalic {
        symbol: tokens[0].value.to_string(),
        content: join(content),
    });
    Some((node, consumed))
}

fn italic(tokens: &[Token<'_>]) -> Parsed {
    let symbol = emphasis(tokens.first()?)?;
    let (content, consumed) = delimited(tokens, &[symbol], &[symbol])?;
    let node = Node::Italic(Italic {
        symbol: tokens[0].value.to_string(),
        content: join(content),
    });
    Some((node, consumed))
}

/// `[text](url)`: text, url and tokens consumed.
fn link_parts(tokens: &[Token<'_>]) -> Option<(String, String, usize)> {
    if !tokens.first()?.is(TokenKind::LeftSquareBracket) {
        return None;
    }
    let close = 1 + tokens[1..].iter().position(|t| {
        matches!(
            t.kind,
            TokenKind::RightSquareBracket | TokenKind::LeftSquareBracket | TokenKind::Newline
        )
    })?;
    if !tokens[close].is(TokenKind::RightSquareBracket)
        || !tokens.get(close + 1)?.is(TokenKind::LeftParenthesis)
    {
        return None;
    }
    let url_start = close + 2;
    let url_end = url_start
        + tokens[url_start..].iter().position(|t| {
            matches!(
                t.kind,
                TokenKind::RightParenthesis | TokenKind::Space | TokenKind::Newline
            )
        })?;
    if url_end == url_start || !tokens[url_end].is(TokenKind::RightParenthesis) {
        return None;
    }
    Some((
        join(&tokens[1..close]),
        join(&tokens[url_start..url_end]),
        url_end + 1,
    ))
}

fn image(tokens: &[Token<'_>]) -> Parsed {
    let [bang, rest @ ..] = tokens else {
        return None;
    };
    if !bang.is(TokenKind::ExclamationMark) {
        return None;
    }
    let (alt_text, url, consumed) = link_parts(rest)?;
    Some((Node::Image(Image { alt_text, url }), consumed + 1))
}

fn link(tokens: &[Token<'_>]) -> Parsed {
    let (text, url, consumed) = link_parts(tokens)?;
    Some((Node::Link(Link { text, url }), consumed))
}

fn referenced_content(tokens: &[Token<'_>]) -> Parsed {
    let open = [TokenKind::LeftSquareBracket; 2];
    let close = [TokenKind::RightSquareBracket; 2];
    let (inner, consumed) = delimited(tokens, &open, &close)?;
    let (resource_name, params) = resource(inner)?;
    let node = Node::ReferencedContent(ReferencedContent {
        resource_name,
        params,
    });
    Some((node, consumed))
}

fn is_url(text: &str) -> bool {
    text.strip_prefix("https://")
        .or_else(|| text.strip_prefix("http://"))
        .is_some_and(|rest| !rest.is_empty())
}

fn auto_link(tokens: &[Token<'_>]) -> Parsed {
    let first = tokens.first()?;
    match first.kind {
        TokenKind::LessThan => {
            let end = tokens.iter().position(|t| {
                matches!(
                    t.kind,
                    TokenKind::GreaterThan | TokenKind::Space | TokenKind::Newline
                )
            })?;
            if !tokens[end].is(TokenKind::GreaterThan) {
                return None;
            }
            let url = join(&tokens[1..end]);
            if !is_url(&url) {
                return None;
            }
            let node = Node::AutoLink(AutoLink {
                url,
                is_raw_text: false,
            });
            Some((node, end + 1))
        }
        TokenKind::Text if matches!(first.value, "http" | "https") => {
            let end = tokens
                .iter()
                .position(|t| t.is(TokenKind::Space) || t.is(TokenKind::Newline))
                .unwrap_or(tokens.len());
            let url = join(&tokens[..end]);
            if !is_url(&url) {
                return None;
            }
            let node = Node::AutoLink(AutoLink {
                url,
                is_raw_text: true,
            });
            Some((node, end))
        }
        _ => None,
    }
}

fn spoiler(tokens: &[Token<'_>]) -> Parsed {
    let marker = [TokenKind::Pipe; 2];
    let (content, consumed) = delimited(tokens, &marker, &marker)?;
    let node = Node::Spoiler(Spoiler {
        content: join(content),
    });
    Some((node, consumed))
}

fn highlight(tokens: &[Token<'_>]) -> Parsed {
    let marker = [TokenKind::EqualSign; 2];
    let (content, consumed) = delimited(tokens, &marker, &marker)?;
    let node = Node::Highlight(Highlight {
        content: join(content),
    });
    Some((node, consumed))
}

fn code(tokens: &[Token<'_>]) -> Parsed {
    let marker = [TokenKind::Backtick];
    let (content, consumed) = delimited(tokens, &marker, &marker)?;
    let node = Node::Code(Code {
        content: join(content),
    });
    Some((node, consumed))
}

fn strikethrough(tokens: &[Token<'_>]) -> Parsed {
    let marker = [TokenKind::Tilde; 2];
    let (content, consumed) = delimited(tokens, &marker, &marker)?;
    let node = Node::Strikethrough(Strikethrough {
        content: join(content),
    });
    Some((node, consumed))
}

fn subscript(tokens: &[Token<'_>]) -> Parsed {
    let marker = [TokenKind::Tilde];
    let (content, consumed) = delimited(tokens, &marker, &marker)?;
    let node = Node::Subscript(Subscript {
        content: join(content),
    });
    Some((node, consumed))
}

fn superscript(tokens: &[Token<'_>]) -> Parsed {
    let marker = [TokenKind::Caret];
    let (content, consumed) = delimited(tokens, &marker, &marker)?;
    let node = Node::Superscript(Superscript {
        content: join(content),
    });
    Some((node, consumed))
}

fn math(tokens: &[Token<'_>]) -> Parsed {
    let marker = [TokenKind::DollarSign];
    let (content, consumed) = delimited(tokens, &marker, &marker)?;
    let node = Node::Math(Math {
        content: join(content),
    });
    Some((node, consumed))
}

fn tag(tokens: &[Token<'_>]) -> Parsed {
    let [hash, rest @ ..] = tokens else {
        return None;
    };
    if !hash.is(TokenKind::PoundSign)
        || !rest
            .first()
            .is_some_and(|t| t.is(TokenKind::Text) || t.is(TokenKind::Number))
    {
        return None;
    }
    let len = rest
        .iter()
        .take_while(|t| {
            matches!(
                t.kind,
                TokenKind::Text | TokenKind::Number | TokenKind::Underscore | TokenKind::Hyphen
            )
        })
        .count();
    let node = Node::Tag(Tag {
        content: join(&rest[..len]),
    });
    Some((node, len + 1))
}
