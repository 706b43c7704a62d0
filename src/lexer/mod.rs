//! Lexical analysis: source text → position-tracked token stream.
//!
//! Spaces and tabs are skipped, but `\n` is a meaningful token because it
//! separates statements. A run of digits with at most one `.` is a number
//! token; whether the literal carried a decimal point is recorded as a
//! boolean on the token kind, never re-derived from the text downstream.

use phf::phf_map;

use crate::common::{Error, Position, Result};

/// Kinds of tokens recognised by the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Explicit end-of-input marker, always the last token of a stream.
    Eof,
    Newline,
    Semicolon,
    Plus,
    Minus,
    Star,
    Slash,
    LeftParen,
    RightParen,
    Equals,
    Colon,
    Comma,
    /// Numeric literal. `has_decimal` is true when the literal was written
    /// with a fractional point, regardless of its value.
    Number { has_decimal: bool },
    /// A run of ASCII letters: a function name or a cell column.
    Identifier,
}

impl TokenKind {
    /// True for the two statement separators.
    pub fn is_separator(self) -> bool {
        matches!(self, Self::Newline | Self::Semicolon)
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Eof => "EOF",
            Self::Newline => "newline",
            Self::Semicolon => "';'",
            Self::Plus => "'+'",
            Self::Minus => "'-'",
            Self::Star => "'*'",
            Self::Slash => "'/'",
            Self::LeftParen => "'('",
            Self::RightParen => "')'",
            Self::Equals => "'='",
            Self::Colon => "':'",
            Self::Comma => "','",
            Self::Number { .. } => "number",
            Self::Identifier => "identifier",
        };
        f.write_str(text)
    }
}

/// One lexical token with the position of its first character.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, position: Position) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
        }
    }
}

static SINGLE_CHAR_TOKENS: phf::Map<char, TokenKind> = phf_map! {
    '\n' => TokenKind::Newline,
    ';' => TokenKind::Semicolon,
    '+' => TokenKind::Plus,
    '-' => TokenKind::Minus,
    '*' => TokenKind::Star,
    '/' => TokenKind::Slash,
    '(' => TokenKind::LeftParen,
    ')' => TokenKind::RightParen,
    '=' => TokenKind::Equals,
    ':' => TokenKind::Colon,
    ',' => TokenKind::Comma,
};

/// Single-pass tokenizer over one source string.
///
/// Lexing is a pure function of the source: tokenizing the same input twice
/// yields identical streams. Failure is atomic; no partial token vector is
/// ever returned.
pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    line: u32,
    column: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire source, ending with an `Eof` token.
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::with_capacity(self.source.len() / 4 + 1);

        while let Some(byte) = self.peek() {
            match byte {
                b' ' | b'\t' | b'\r' => self.advance(),
                b'0'..=b'9' | b'.' => tokens.push(self.lex_number()?),
                b'a'..=b'z' | b'A'..=b'Z' => tokens.push(self.lex_identifier()),
                _ => {
                    let ch = self.current_char();
                    match SINGLE_CHAR_TOKENS.get(&ch) {
                        Some(&kind) => {
                            let position = self.here();
                            self.advance();
                            tokens.push(Token::new(kind, ch.to_string(), position));
                        },
                        None => {
                            return Err(Error::InvalidCharacter {
                                ch,
                                position: self.here(),
                            });
                        },
                    }
                },
            }
        }

        tokens.push(Token::new(TokenKind::Eof, "", self.here()));
        Ok(tokens)
    }

    /// A digit run with at most one `.`. A second `.` ends the token; a `.`
    /// with no digits at all is an error at the token start.
    fn lex_number(&mut self) -> Result<Token> {
        let position = self.here();
        let start = self.pos;
        let mut has_decimal = false;

        while let Some(byte) = self.peek() {
            match byte {
                b'0'..=b'9' => self.advance(),
                b'.' if !has_decimal => {
                    has_decimal = true;
                    self.advance();
                },
                _ => break,
            }
        }

        let text = &self.source[start..self.pos];
        if text == "." {
            return Err(Error::InvalidNumber { position });
        }

        Ok(Token::new(
            TokenKind::Number { has_decimal },
            text,
            position,
        ))
    }

    /// A maximal run of ASCII letters. Digits are never part of an
    /// identifier; `A1` lexes as an identifier followed by a number so the
    /// parser can recognise cell addresses.
    fn lex_identifier(&mut self) -> Token {
        let position = self.here();
        let start = self.pos;

        while let Some(byte) = self.peek() {
            if byte.is_ascii_alphabetic() {
                self.advance();
            } else {
                break;
            }
        }

        Token::new(
            TokenKind::Identifier,
            &self.source[start..self.pos],
            position,
        )
    }

    fn peek(&self) -> Option<u8> {
        self.source.as_bytes().get(self.pos).copied()
    }

    /// The character at the cursor. Only called while input remains; the
    /// cursor always sits on a UTF-8 boundary because only ASCII bytes are
    /// ever consumed.
    fn current_char(&self) -> char {
        self.source[self.pos..].chars().next().unwrap_or('\0')
    }

    fn here(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn advance(&mut self) {
        if let Some(byte) = self.peek() {
            self.pos += 1;
            if byte == b'\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }
}
