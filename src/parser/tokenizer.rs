// Copyright 2024 OctoFHIR Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Tokenizer for SMPL expressions
//!
//! Works directly on the input bytes. Identifiers and keywords are ASCII; keywords are
//! recognised through a shared lookup table after the identifier has been scanned.

use super::error::{ParseError, ParseResult};
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use std::fmt;

/// Lexical token
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token<'input> {
    /// Integer literal (e.g., 42)
    Integer(i64),
    /// Real literal (e.g., 3.5)
    Real(f64),
    /// Identifier as a zero-copy slice of the input
    Identifier(&'input str),
    /// Boolean literal true
    True,
    /// Boolean literal false
    False,
    /// Logical AND (and keyword)
    And,
    /// Logical OR (or keyword)
    Or,
    /// Binary not (not keyword)
    Not,
    /// Conditional start (if keyword)
    If,
    /// Conditional consequent (then keyword)
    Then,
    /// Conditional alternative (else keyword)
    Else,
    /// Plus sign (+)
    Plus,
    /// Minus sign (-)
    Minus,
    /// Asterisk (*)
    Multiply,
    /// Slash (/)
    Divide,
    /// Percent sign (%)
    Percent,
    /// Caret (^)
    Caret,
    /// Equality (=)
    Equal,
    /// Inequality (!=)
    NotEqual,
    /// Less than (<)
    LessThan,
    /// Less than or equal (<=)
    LessThanOrEqual,
    /// Greater than (>)
    GreaterThan,
    /// Greater than or equal (>=)
    GreaterThanOrEqual,
    /// Left parenthesis (
    LeftParen,
    /// Right parenthesis )
    RightParen,
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Integer(value) => write!(f, "{value}"),
            Token::Real(value) => write!(f, "{value}"),
            Token::Identifier(name) => write!(f, "'{name}'"),
            Token::True => f.write_str("'true'"),
            Token::False => f.write_str("'false'"),
            Token::And => f.write_str("'and'"),
            Token::Or => f.write_str("'or'"),
            Token::Not => f.write_str("'not'"),
            Token::If => f.write_str("'if'"),
            Token::Then => f.write_str("'then'"),
            Token::Else => f.write_str("'else'"),
            Token::Plus => f.write_str("'+'"),
            Token::Minus => f.write_str("'-'"),
            Token::Multiply => f.write_str("'*'"),
            Token::Divide => f.write_str("'/'"),
            Token::Percent => f.write_str("'%'"),
            Token::Caret => f.write_str("'^'"),
            Token::Equal => f.write_str("'='"),
            Token::NotEqual => f.write_str("'!='"),
            Token::LessThan => f.write_str("'<'"),
            Token::LessThanOrEqual => f.write_str("'<='"),
            Token::GreaterThan => f.write_str("'>'"),
            Token::GreaterThanOrEqual => f.write_str("'>='"),
            Token::LeftParen => f.write_str("'('"),
            Token::RightParen => f.write_str("')'"),
        }
    }
}

/// A token together with the byte range it was read from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spanned<T> {
    /// The value
    pub value: T,
    /// Start position in the input
    pub start: usize,
    /// End position in the input
    pub end: usize,
}

static KEYWORD_TABLE: Lazy<FxHashMap<&'static str, Token<'static>>> = Lazy::new(|| {
    let mut map = FxHashMap::default();
    map.insert("true", Token::True);
    map.insert("false", Token::False);
    map.insert("and", Token::And);
    map.insert("or", Token::Or);
    map.insert("not", Token::Not);
    map.insert("if", Token::If);
    map.insert("then", Token::Then);
    map.insert("else", Token::Else);
    map
});

/// Check if `word` is reserved and therefore cannot name a variable
pub fn is_keyword(word: &str) -> bool {
    KEYWORD_TABLE.contains_key(word)
}

/// Byte-level tokenizer
pub struct Tokenizer<'input> {
    input: &'input str,
    bytes: &'input [u8],
    pos: usize,
}

impl<'input> Tokenizer<'input> {
    /// Create a tokenizer positioned at the start of `input`
    pub fn new(input: &'input str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
        }
    }

    /// Current byte offset
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline(always)]
    fn peek_byte(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    #[inline(always)]
    fn is_id_start(ch: u8) -> bool {
        matches!(ch, b'A'..=b'Z' | b'a'..=b'z' | b'_')
    }

    #[inline(always)]
    fn is_id_continue(ch: u8) -> bool {
        matches!(ch, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_')
    }

    /// Skip whitespace and `//` line comments
    fn skip_trivia(&mut self) {
        while let Some(byte) = self.peek_byte(0) {
            match byte {
                b' ' | b'\t' | b'\r' | b'\n' => self.pos += 1,
                b'/' if self.peek_byte(1) == Some(b'/') => {
                    while let Some(byte) = self.peek_byte(0) {
                        self.pos += 1;
                        if byte == b'\n' {
                            break;
                        }
                    }
                }
                _ => break,
            }
        }
    }

    fn parse_number(&mut self) -> ParseResult<Token<'input>> {
        let start = self.pos;
        while self.peek_byte(0).is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }

        let is_real = self.peek_byte(0) == Some(b'.')
            && self.peek_byte(1).is_some_and(|b| b.is_ascii_digit());
        if is_real {
            self.pos += 1;
            while self.peek_byte(0).is_some_and(|b| b.is_ascii_digit()) {
                self.pos += 1;
            }
        }

        let literal = &self.input[start..self.pos];
        let invalid = || ParseError::InvalidNumber {
            literal: literal.to_string(),
            position: start,
        };
        if is_real {
            match literal.parse::<f64>() {
                Ok(value) if value.is_finite() => Ok(Token::Real(value)),
                _ => Err(invalid()),
            }
        } else {
            literal.parse().map(Token::Integer).map_err(|_| invalid())
        }
    }

    fn parse_word(&mut self) -> Token<'input> {
        let start = self.pos;
        while self.peek_byte(0).is_some_and(Self::is_id_continue) {
            self.pos += 1;
        }
        let word = &self.input[start..self.pos];
        match KEYWORD_TABLE.get(word) {
            Some(keyword) => *keyword,
            None => Token::Identifier(word),
        }
    }

    /// Consume `width` bytes and yield `token`
    #[inline(always)]
    fn punct(&mut self, width: usize, token: Token<'input>) -> Token<'input> {
        self.pos += width;
        token
    }

    /// Read the next token, or `None` at end of input
    pub fn next_token(&mut self) -> ParseResult<Option<Spanned<Token<'input>>>> {
        self.skip_trivia();

        let start = self.pos;
        let Some(byte) = self.peek_byte(0) else {
            return Ok(None);
        };

        let token = match byte {
            b'0'..=b'9' => self.parse_number()?,
            b if Self::is_id_start(b) => self.parse_word(),
            b'+' => self.punct(1, Token::Plus),
            b'-' => self.punct(1, Token::Minus),
            b'*' => self.punct(1, Token::Multiply),
            b'/' => self.punct(1, Token::Divide),
            b'%' => self.punct(1, Token::Percent),
            b'^' => self.punct(1, Token::Caret),
            b'(' => self.punct(1, Token::LeftParen),
            b')' => self.punct(1, Token::RightParen),
            b'=' => self.punct(1, Token::Equal),
            b'!' if self.peek_byte(1) == Some(b'=') => self.punct(2, Token::NotEqual),
            b'<' if self.peek_byte(1) == Some(b'=') => self.punct(2, Token::LessThanOrEqual),
            b'<' => self.punct(1, Token::LessThan),
            b'>' if self.peek_byte(1) == Some(b'=') => self.punct(2, Token::GreaterThanOrEqual),
            b'>' => self.punct(1, Token::GreaterThan),
            _ => {
                let character = self.input[start..].chars().next().unwrap_or('\u{FFFD}');
                return Err(ParseError::UnexpectedCharacter {
                    character,
                    position: start,
                });
            }
        };

        Ok(Some(Spanned {
            value: token,
            start,
            end: self.pos,
        }))
    }

    /// Tokenize the whole input
    pub fn tokenize_all(&mut self) -> ParseResult<Vec<Spanned<Token<'input>>>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }
}

/// Tokenize `input` in one go
pub fn tokenize(input: &str) -> ParseResult<Vec<Spanned<Token<'_>>>> {
    Tokenizer::new(input).tokenize_all()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<Token<'_>> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|t| t.value)
            .collect()
    }

    #[test]
    fn test_tokenizer_basic() {
        assert_eq!(
            kinds("x + 42 * 3.5"),
            vec![
                Token::Identifier("x"),
                Token::Plus,
                Token::Integer(42),
                Token::Multiply,
                Token::Real(3.5),
            ]
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("= != < <= > >= ^ % / -"),
            vec![
                Token::Equal,
                Token::NotEqual,
                Token::LessThan,
                Token::LessThanOrEqual,
                Token::GreaterThan,
                Token::GreaterThanOrEqual,
                Token::Caret,
                Token::Percent,
                Token::Divide,
                Token::Minus,
            ]
        );
    }

    #[test]
    fn test_keywords() {
        assert_eq!(
            kinds("if a then true else false and b or c not d"),
            vec![
                Token::If,
                Token::Identifier("a"),
                Token::Then,
                Token::True,
                Token::Else,
                Token::False,
                Token::And,
                Token::Identifier("b"),
                Token::Or,
                Token::Identifier("c"),
                Token::Not,
                Token::Identifier("d"),
            ]
        );
        assert!(is_keyword("then"));
        assert!(!is_keyword("nothing"));
        assert_eq!(kinds("nothing"), vec![Token::Identifier("nothing")]);
    }

    #[test]
    fn test_spans_and_comments() {
        let tokens = tokenize("  ab // trailing comment\n + 1").unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!((tokens[0].start, tokens[0].end), (2, 4));
        assert_eq!(tokens[1].value, Token::Plus);
        assert_eq!(tokens[2].value, Token::Integer(1));
    }

    #[test]
    fn test_number_edge_cases() {
        // A dot without trailing digits is not part of the number
        assert!(matches!(
            tokenize("1."),
            Err(ParseError::UnexpectedCharacter { character: '.', position: 1 })
        ));
        assert!(matches!(
            tokenize("99999999999999999999"),
            Err(ParseError::InvalidNumber { position: 0, .. })
        ));
        // Reals beyond f64 range would print as `inf`
        let huge = format!("{}.0", "9".repeat(400));
        assert!(matches!(
            tokenize(&huge),
            Err(ParseError::InvalidNumber { position: 0, .. })
        ));
    }

    #[test]
    fn test_unexpected_characters() {
        assert!(matches!(
            tokenize("a ! b"),
            Err(ParseError::UnexpectedCharacter { character: '!', position: 2 })
        ));
        assert!(matches!(
            tokenize("λ"),
            Err(ParseError::UnexpectedCharacter { character: 'λ', position: 0 })
        ));
    }
}
