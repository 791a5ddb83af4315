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

//! Runtime values produced by evaluation

use std::fmt;
use std::str::FromStr;

use super::error::ModelError;
use super::types::ValueType;
use crate::ast::{LiteralValue, write_real};

/// Result of evaluating an SMPL expression
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// Integer value (64-bit signed)
    Integer(i64),
    /// Real value
    Real(f64),
    /// Boolean value
    Boolean(bool),
}

impl Value {
    /// Get the type of this value
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Integer(_) => ValueType::Integer,
            Self::Real(_) => ValueType::Real,
            Self::Boolean(_) => ValueType::Boolean,
        }
    }

    /// Get the type name for this value
    pub fn type_name(&self) -> &'static str {
        self.value_type().name()
    }

    /// Numeric view of the value, promoting integers to reals
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Real(r) => Some(*r),
            Self::Boolean(_) => None,
        }
    }

    /// Try to convert to a boolean
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Check if this value is a number
    pub fn is_numeric(&self) -> bool {
        self.value_type().is_numeric()
    }
}

impl From<LiteralValue> for Value {
    fn from(literal: LiteralValue) -> Self {
        match literal {
            LiteralValue::Integer(i) => Value::Integer(i),
            LiteralValue::Real(r) => Value::Real(r),
            LiteralValue::Boolean(b) => Value::Boolean(b),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Real(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Real(r) => write_real(f, *r),
            Self::Boolean(b) => write!(f, "{b}"),
        }
    }
}

impl FromStr for Value {
    type Err = ModelError;

    /// Reads `true`, `false`, an integer or a real, with an optional leading sign on numbers
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        match text {
            "true" => return Ok(Value::Boolean(true)),
            "false" => return Ok(Value::Boolean(false)),
            _ => {}
        }
        if let Ok(i) = text.parse::<i64>() {
            return Ok(Value::Integer(i));
        }
        text.parse::<f64>()
            .map(Value::Real)
            .map_err(|_| ModelError::InvalidValue {
                text: s.to_string(),
            })
    }
}
