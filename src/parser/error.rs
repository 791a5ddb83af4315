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

//! Parser error types

use thiserror::Error;

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Errors that can occur while tokenizing or parsing an expression
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// A token that cannot appear at this point
    #[error("Unexpected token {token} at position {position}")]
    UnexpectedToken {
        /// Rendering of the offending token
        token: String,
        /// Byte offset of the token
        position: usize,
    },

    /// Input ended in the middle of an expression
    #[error("Unexpected end of input, expected {expected}")]
    UnexpectedEof {
        /// What the parser was looking for
        expected: String,
    },

    /// A character that starts no token
    #[error("Unexpected character '{character}' at position {position}")]
    UnexpectedCharacter {
        /// The character
        character: char,
        /// Byte offset of the character
        position: usize,
    },

    /// A numeric literal that does not fit its type
    #[error("Invalid number literal '{literal}' at position {position}")]
    InvalidNumber {
        /// Source text of the literal
        literal: String,
        /// Byte offset of the literal
        position: usize,
    },

    /// Nesting exceeded the configured limit
    #[error("Expression nests deeper than {limit} levels at position {position}")]
    NestingTooDeep {
        /// Configured limit
        limit: usize,
        /// Byte offset where the limit was hit
        position: usize,
    },
}

impl ParseError {
    /// Byte offset of the error, if it is tied to one
    pub fn position(&self) -> Option<usize> {
        match self {
            ParseError::UnexpectedToken { position, .. }
            | ParseError::UnexpectedCharacter { position, .. }
            | ParseError::InvalidNumber { position, .. }
            | ParseError::NestingTooDeep { position, .. } => Some(*position),
            ParseError::UnexpectedEof { .. } => None,
        }
    }
}
