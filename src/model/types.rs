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

//! Static types of SMPL values

use std::fmt;
use std::str::FromStr;

use super::error::ModelError;

/// The kind of value an expression produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueType {
    /// 64-bit signed integer
    Integer,
    /// Double precision real
    Real,
    /// Boolean
    Boolean,
}

impl ValueType {
    /// Check if this type is numeric
    pub fn is_numeric(self) -> bool {
        matches!(self, ValueType::Integer | ValueType::Real)
    }

    /// Type name as written in source and diagnostics
    pub fn name(self) -> &'static str {
        match self {
            ValueType::Integer => "Integer",
            ValueType::Real => "Real",
            ValueType::Boolean => "Boolean",
        }
    }

    /// Common type of two operands under numeric promotion
    ///
    /// Equal types unify to themselves; `Integer` and `Real` unify to `Real`.
    /// Anything else has no common type.
    pub fn unify(self, other: ValueType) -> Option<ValueType> {
        match (self, other) {
            (a, b) if a == b => Some(a),
            (ValueType::Integer, ValueType::Real) | (ValueType::Real, ValueType::Integer) => {
                Some(ValueType::Real)
            }
            _ => None,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ValueType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "integer" | "int" => Ok(ValueType::Integer),
            "real" => Ok(ValueType::Real),
            "boolean" | "bool" => Ok(ValueType::Boolean),
            _ => Err(ModelError::UnknownType {
                name: s.to_string(),
            }),
        }
    }
}
