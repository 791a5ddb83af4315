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

//! Evaluation error types

use thiserror::Error;

/// Result type for evaluation operations
pub type EvaluationResult<T> = Result<T, EvaluationError>;

/// Evaluation error type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    /// An operand of the wrong kind
    #[error("Type mismatch in {operation}: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Operation being applied
        operation: String,
        /// Expected kind
        expected: String,
        /// Kind found
        actual: String,
    },

    /// Variable not bound in the environment
    #[error("Variable {name} is not bound")]
    UnboundVariable {
        /// Variable name
        name: String,
    },

    /// Integer division or remainder by zero
    #[error("Division by zero")]
    DivisionByZero,

    /// Integer result out of range
    #[error("Integer overflow in {operation}")]
    Overflow {
        /// Operation that overflowed
        operation: String,
    },

    /// Invalid operation
    #[error("Invalid operation: {message}")]
    InvalidOperation {
        /// Error message
        message: String,
    },

    /// Tree deeper than the configured limit
    #[error("Expression exceeds the maximum evaluation depth of {limit}")]
    DepthLimitExceeded {
        /// Configured limit
        limit: usize,
    },
}

impl EvaluationError {
    /// Create a type mismatch error
    pub fn type_mismatch(
        operation: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            operation: operation.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create an overflow error
    pub fn overflow(operation: impl Into<String>) -> Self {
        Self::Overflow {
            operation: operation.into(),
        }
    }
}
