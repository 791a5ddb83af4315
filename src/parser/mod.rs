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

//! SMPL expression parser
//!
//! Converts source text into [`Exp`](crate::ast::Exp) trees. A leading `-` is folded
//! into the sign flag of the operand rather than producing a node of its own.

#![warn(missing_docs)]

pub mod error;
pub mod pratt;
pub mod tokenizer;

pub use error::{ParseError, ParseResult};
pub use pratt::{DEFAULT_MAX_DEPTH, Precedence, PrattParser, parse_expression_pratt};
pub use tokenizer::{Spanned, Token, Tokenizer, tokenize};

use crate::ast::Exp;

/// Parse an SMPL expression string into an AST
pub fn parse(input: &str) -> ParseResult<Exp> {
    parse_expression_pratt(input)
}

/// Parse with an explicit nesting limit
pub fn parse_with_depth(input: &str, max_depth: usize) -> ParseResult<Exp> {
    PrattParser::with_max_depth(input, max_depth).parse()
}
