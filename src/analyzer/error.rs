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

//! Type checking errors

use thiserror::Error;

use crate::model::ValueType;

/// Result type for type checking
pub type TypeResult<T> = Result<T, TypeError>;

/// Reasons an expression is ill-typed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TypeError {
    /// Operand of the wrong type
    #[error("Type mismatch in {operation}: expected {expected}, got {actual}")]
    Mismatch {
        /// Operation being applied
        operation: String,
        /// Expected type description
        expected: String,
        /// Type found
        actual: ValueType,
    },

    /// Variable without a declared type
    #[error("Variable {name} has no declared type")]
    UnboundVariable {
        /// Variable name
        name: String,
    },

    /// Conditional branches with no common type
    #[error("Conditional branches have incompatible types {then_type} and {else_type}")]
    IncompatibleBranches {
        /// Type of the `then` branch
        then_type: ValueType,
        /// Type of the `else` branch
        else_type: ValueType,
    },

    /// Tree deeper than the configured limit
    #[error("Expression exceeds the maximum checking depth of {limit}")]
    DepthLimitExceeded {
        /// Configured limit
        limit: usize,
    },
}

impl TypeError {
    /// Create a mismatch error
    pub fn mismatch(
        operation: impl Into<String>,
        expected: impl Into<String>,
        actual: ValueType,
    ) -> Self {
        Self::Mismatch {
            operation: operation.into(),
            expected: expected.into(),
            actual,
        }
    }
}
