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

//! Pratt parser for SMPL expressions
//!
//! Precedence climbing over the token stream produced by [`Tokenizer`]. A leading `-`
//! does not produce a node of its own: it flips the sign flag of the operand that follows.

use super::error::{ParseError, ParseResult};
use super::tokenizer::{Spanned, Token, Tokenizer};
use crate::ast::{BinaryOperator, Comparator, Exp};

/// Default limit on syntactic nesting
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Operator precedence levels (higher = tighter binding)
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    /// Logical OR
    Or = 1,
    /// Logical AND
    And = 2,
    /// Comparisons and the binary `not`
    Comparison = 3,
    /// Additive operators (+, -)
    Additive = 4,
    /// Multiplicative operators (*, /, %)
    Multiplicative = 5,
    /// Prefix sign (-, +)
    Unary = 6,
    /// Exponentiation (^), right associative
    Power = 7,
}

impl Precedence {
    /// Get the next higher precedence level for left-associative operators
    #[inline(always)]
    pub const fn next_level(self) -> Self {
        match self {
            Precedence::Or => Precedence::And,
            Precedence::And => Precedence::Comparison,
            Precedence::Comparison => Precedence::Additive,
            Precedence::Additive => Precedence::Multiplicative,
            Precedence::Multiplicative => Precedence::Unary,
            Precedence::Unary => Precedence::Power,
            Precedence::Power => Precedence::Power,
        }
    }

    /// Check if this precedence is right associative
    #[inline(always)]
    pub const fn is_right_associative(self) -> bool {
        matches!(self, Precedence::Power)
    }
}

/// Map an infix token to its operator
#[inline(always)]
fn token_to_binary_op(token: &Token<'_>) -> Option<BinaryOperator> {
    match token {
        Token::Plus => Some(BinaryOperator::Add),
        Token::Minus => Some(BinaryOperator::Subtract),
        Token::Multiply => Some(BinaryOperator::Multiply),
        Token::Divide => Some(BinaryOperator::Divide),
        Token::Percent => Some(BinaryOperator::Modulo),
        Token::Caret => Some(BinaryOperator::Power),
        Token::And => Some(BinaryOperator::And),
        Token::Or => Some(BinaryOperator::Or),
        Token::Not => Some(BinaryOperator::Not),
        Token::Equal => Some(BinaryOperator::Compare(Comparator::Equal)),
        Token::NotEqual => Some(BinaryOperator::Compare(Comparator::NotEqual)),
        Token::LessThan => Some(BinaryOperator::Compare(Comparator::LessThan)),
        Token::LessThanOrEqual => Some(BinaryOperator::Compare(Comparator::LessThanOrEqual)),
        Token::GreaterThan => Some(BinaryOperator::Compare(Comparator::GreaterThan)),
        Token::GreaterThanOrEqual => {
            Some(BinaryOperator::Compare(Comparator::GreaterThanOrEqual))
        }
        _ => None,
    }
}

/// Binding strength of an infix operator
#[inline(always)]
fn precedence_of(op: BinaryOperator) -> Precedence {
    match op {
        BinaryOperator::Or => Precedence::Or,
        BinaryOperator::And => Precedence::And,
        BinaryOperator::Not | BinaryOperator::Compare(_) => Precedence::Comparison,
        BinaryOperator::Add | BinaryOperator::Subtract => Precedence::Additive,
        BinaryOperator::Multiply | BinaryOperator::Divide | BinaryOperator::Modulo => {
            Precedence::Multiplicative
        }
        BinaryOperator::Power => Precedence::Power,
    }
}

/// Pratt parser producing [`Exp`] trees
///
/// ### Precedence Levels (highest to lowest):
/// - **Power** (7): `^` - right associative
/// - **Unary** (6): prefix `-` / `+`
/// - **Multiplicative** (5): `*`, `/`, `%`
/// - **Additive** (4): `+`, `-`
/// - **Comparison** (3): `=`, `!=`, `<`, `<=`, `>`, `>=`, `not`
/// - **And** (2): `and`
/// - **Or** (1): `or`
pub struct PrattParser<'input> {
    tokenizer: Tokenizer<'input>,
    current_token: Option<Spanned<Token<'input>>>,
    depth: usize,
    max_depth: usize,
}

impl<'input> PrattParser<'input> {
    /// Create a parser with the default nesting limit
    pub fn new(input: &'input str) -> Self {
        Self::with_max_depth(input, DEFAULT_MAX_DEPTH)
    }

    /// Create a parser that rejects nesting deeper than `max_depth`
    pub fn with_max_depth(input: &'input str, max_depth: usize) -> Self {
        Self {
            tokenizer: Tokenizer::new(input),
            current_token: None,
            depth: 0,
            max_depth,
        }
    }

    #[inline(always)]
    fn advance(&mut self) -> ParseResult<()> {
        self.current_token = self.tokenizer.next_token()?;
        Ok(())
    }

    #[inline(always)]
    fn current(&self) -> Option<&Spanned<Token<'input>>> {
        self.current_token.as_ref()
    }

    fn unexpected(token: &Spanned<Token<'input>>) -> ParseError {
        ParseError::UnexpectedToken {
            token: token.value.to_string(),
            position: token.start,
        }
    }

    fn expect(&mut self, expected: Token<'static>) -> ParseResult<()> {
        match self.current_token {
            Some(token) if token.value == expected => self.advance(),
            Some(token) => Err(Self::unexpected(&token)),
            None => Err(ParseError::UnexpectedEof {
                expected: expected.to_string(),
            }),
        }
    }

    /// Parse the whole input as a single expression
    pub fn parse(&mut self) -> ParseResult<Exp> {
        self.advance()?;
        let (exp, _) = self.parse_expression_with_precedence(Precedence::Or)?;
        match self.current() {
            None => Ok(exp),
            Some(token) => Err(Self::unexpected(token)),
        }
    }

    /// Reject a subtree whose height exceeds the limit
    #[inline(always)]
    fn check_height(&self, height: usize, position: usize) -> ParseResult<usize> {
        if height > self.max_depth {
            return Err(ParseError::NestingTooDeep {
                limit: self.max_depth,
                position,
            });
        }
        Ok(height)
    }

    /// Parse at `min_precedence`, returning the expression and its tree height.
    ///
    /// Both the recursion depth and the height of the folded tree are bounded by
    /// `max_depth`: left-associative chains grow the tree without recursing.
    fn parse_expression_with_precedence(
        &mut self,
        min_precedence: Precedence,
    ) -> ParseResult<(Exp, usize)> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(ParseError::NestingTooDeep {
                limit: self.max_depth,
                position: self.tokenizer.position(),
            });
        }

        let (mut left, mut height) = self.parse_primary()?;

        while let Some(token) = self.current_token {
            let Some(op) = token_to_binary_op(&token.value) else {
                break;
            };
            let precedence = precedence_of(op);
            if precedence < min_precedence {
                break;
            }
            self.advance()?;

            let next_min = if precedence.is_right_associative() {
                precedence
            } else {
                precedence.next_level()
            };
            let (right, right_height) = self.parse_expression_with_precedence(next_min)?;
            height = self.check_height(1 + height.max(right_height), token.start)?;
            left = Exp::binary(op, left, right);
        }

        self.depth -= 1;
        Ok((left, height))
    }

    fn parse_primary(&mut self) -> ParseResult<(Exp, usize)> {
        let Some(token) = self.current_token else {
            return Err(ParseError::UnexpectedEof {
                expected: "expression".to_string(),
            });
        };

        let leaf = match token.value {
            Token::Integer(value) => Exp::integer(value),
            Token::Real(value) => Exp::real(value),
            Token::True => Exp::boolean(true),
            Token::False => Exp::boolean(false),
            Token::Identifier(name) => Exp::variable(name),
            Token::LeftParen => {
                self.advance()?;
                let inner = self.parse_expression_with_precedence(Precedence::Or)?;
                self.expect(Token::RightParen)?;
                return Ok(inner);
            }
            Token::Minus => {
                self.advance()?;
                let (operand, height) = self.parse_expression_with_precedence(Precedence::Unary)?;
                return Ok((operand.negated(), height));
            }
            Token::Plus => {
                self.advance()?;
                return self.parse_expression_with_precedence(Precedence::Unary);
            }
            Token::If => {
                self.advance()?;
                let (condition, h1) = self.parse_expression_with_precedence(Precedence::Or)?;
                self.expect(Token::Then)?;
                let (then_branch, h2) = self.parse_expression_with_precedence(Precedence::Or)?;
                self.expect(Token::Else)?;
                let (else_branch, h3) = self.parse_expression_with_precedence(Precedence::Or)?;
                let height = self.check_height(1 + h1.max(h2).max(h3), token.start)?;
                return Ok((Exp::conditional(condition, then_branch, else_branch), height));
            }
            _ => return Err(Self::unexpected(&token)),
        };
        self.advance()?;
        Ok((leaf, 1))
    }
}

/// Parse an expression with the default nesting limit
pub fn parse_expression_pratt(input: &str) -> ParseResult<Exp> {
    PrattParser::new(input).parse()
}
