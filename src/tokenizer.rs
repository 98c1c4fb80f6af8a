use crate::error::ParseError;
use winnow::combinator::{alt, repeat};
use winnow::token::{any, take_while};
use winnow::{ModalResult, Parser};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Underscore,
    Asterisk,
    PoundSign,
    Backtick,
    LeftSquareBracket,
    RightSquareBracket,
    LeftParenthesis,
    RightParenthesis,
    ExclamationMark,
    QuestionMark,
    Tilde,
    Hyphen,
    PlusSign,
    Dot,
    LessThan,
    GreaterThan,
    DollarSign,
    EqualSign,
    Pipe,
    Colon,
    Caret,
    Backslash,
    Newline,
    Space,
    Number,
    Text,
}

impl TokenKind {
    fn from_symbol(c: char) -> Option<Self> {
        let kind = match c {
            '_' => TokenKind::Underscore,
            '*' => TokenKind::Asterisk,
            '#' => TokenKind::PoundSign,
            '`' => TokenKind::Backtick,
            '[' => TokenKind::LeftSquareBracket,
            ']' => TokenKind::RightSquareBracket,
            '(' => TokenKind::LeftParenthesis,
            ')' => TokenKind::RightParenthesis,
            '!' => TokenKind::ExclamationMark,
            '?' => TokenKind::QuestionMark,
            '~' => TokenKind::Tilde,
            '-' => TokenKind::Hyphen,
            '+' => TokenKind::PlusSign,
            '.' => TokenKind::Dot,
            '<' => TokenKind::LessThan,
            '>' => TokenKind::GreaterThan,
            '$' => TokenKind::DollarSign,
            '=' => TokenKind::EqualSign,
            '|' => TokenKind::Pipe,
            ':' => TokenKind::Colon,
            '^' => TokenKind::Caret,
            '\\' => TokenKind::Backslash,
            '\n' => TokenKind::Newline,
            ' ' | '\t' => TokenKind::Space,
            _ => return None,
        };
        Some(kind)
    }

    /// Punctuation that a backslash can escape.
    pub fn is_symbol(self) -> bool {
        !matches!(
            self,
            TokenKind::Newline | TokenKind::Space | TokenKind::Number | TokenKind::Text
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub value: &'a str,
}

impl<'a> Token<'a> {
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

fn symbol<'a>(input: &mut &'a str) -> ModalResult<Token<'a>> {
    any.with_taken()
        .verify_map(|(c, value): (char, &'a str)| {
            TokenKind::from_symbol(c).map(|kind| Token { kind, value })
        })
        .parse_next(input)
}

fn number<'a>(input: &mut &'a str) -> ModalResult<Token<'a>> {
    take_while(1.., |c: char| c.is_ascii_digit())
        .map(|value| Token {
            kind: TokenKind::Number,
            value,
        })
        .parse_next(input)
}

fn text<'a>(input: &mut &'a str) -> ModalResult<Token<'a>> {
    take_while(1.., |c: char| {
        !c.is_ascii_digit() && TokenKind::from_symbol(c).is_none()
    })
    .map(|value| Token {
        kind: TokenKind::Text,
        value,
    })
    .parse_next(input)
}

/// Splits `input` into tokens whose values concatenate back to `input`.
pub fn tokenize(input: &str) -> Result<Vec<Token<'_>>, ParseError> {
    repeat(0.., alt((symbol, number, text)))
        .parse(input)
        .map_err(|e| ParseError::Tokenize(e.to_string()))
}

pub fn join(tokens: &[Token<'_>]) -> String {
    tokens.iter().map(|t| t.value).collect()
}
