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

//! Crate-level error type
//!
//! Each pass reports its own error type; [`SmplError`] wraps them for callers that run
//! several passes through the [`SmplEngine`](crate::SmplEngine).

use thiserror::Error;

use crate::analyzer::TypeError;
use crate::evaluator::EvaluationError;
use crate::parser::ParseError;

/// Result type alias for SMPL operations
pub type Result<T> = std::result::Result<T, SmplError>;

/// Any failure while compiling, checking or evaluating an expression
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SmplError {
    /// Source text did not parse
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Expression is ill-typed
    #[error("Type error: {0}")]
    Type(#[from] TypeError),

    /// Evaluation failed
    #[error("Evaluation error: {0}")]
    Evaluation(#[from] EvaluationError),
}

impl SmplError {
    /// Byte offset in the source, for parse errors that carry one
    pub fn position(&self) -> Option<usize> {
        match self {
            SmplError::Parse(err) => err.position(),
            _ => None,
        }
    }
}
