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

//! Operator definitions shared by the AST, the parser and the passes

use std::fmt;

/// Comparison operators carried by [`ExpKind::Compare`](crate::ast::ExpKind::Compare)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Comparator {
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
}

impl Comparator {
    /// Source spelling of the comparator
    pub const fn symbol(self) -> &'static str {
        match self {
            Comparator::Equal => "=",
            Comparator::NotEqual => "!=",
            Comparator::LessThan => "<",
            Comparator::LessThanOrEqual => "<=",
            Comparator::GreaterThan => ">",
            Comparator::GreaterThanOrEqual => ">=",
        }
    }

    /// Whether the comparator only makes sense on ordered (numeric) operands
    pub const fn is_ordering(self) -> bool {
        !matches!(self, Comparator::Equal | Comparator::NotEqual)
    }

    /// Apply the comparator to an [`Ordering`](std::cmp::Ordering)
    pub fn holds(self, ordering: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::*;
        match self {
            Comparator::Equal => ordering == Equal,
            Comparator::NotEqual => ordering != Equal,
            Comparator::LessThan => ordering == Less,
            Comparator::LessThanOrEqual => ordering != Greater,
            Comparator::GreaterThan => ordering == Greater,
            Comparator::GreaterThanOrEqual => ordering != Less,
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Every infix operator the grammar knows about
///
/// Each operator maps onto exactly one [`ExpKind`](crate::ast::ExpKind) variant, so a
/// pass never sees a `BinaryOperator` inside the tree. The enum exists for the parser's
/// precedence table and for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    /// Addition (+)
    Add,
    /// Subtraction (-)
    Subtract,
    /// Multiplication (*)
    Multiply,
    /// Division (/)
    Divide,
    /// Remainder (%)
    Modulo,
    /// Exponentiation (^)
    Power,
    /// Logical conjunction (and)
    And,
    /// Logical disjunction (or)
    Or,
    /// The binary `not` operator (L not R)
    Not,
    /// One of the comparison operators
    Compare(Comparator),
}

impl BinaryOperator {
    /// Source spelling of the operator
    pub const fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
            BinaryOperator::Power => "^",
            BinaryOperator::And => "and",
            BinaryOperator::Or => "or",
            BinaryOperator::Not => "not",
            BinaryOperator::Compare(cmp) => cmp.symbol(),
        }
    }
}

/// The numeric subset of [`BinaryOperator`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithmeticOperator {
    /// Addition (+)
    Add,
    /// Subtraction (-)
    Subtract,
    /// Multiplication (*)
    Multiply,
    /// Division (/)
    Divide,
    /// Remainder (%)
    Modulo,
    /// Exponentiation (^)
    Power,
}

impl ArithmeticOperator {
    /// Source spelling of the operator
    pub const fn symbol(self) -> &'static str {
        match self {
            ArithmeticOperator::Add => "+",
            ArithmeticOperator::Subtract => "-",
            ArithmeticOperator::Multiply => "*",
            ArithmeticOperator::Divide => "/",
            ArithmeticOperator::Modulo => "%",
            ArithmeticOperator::Power => "^",
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
