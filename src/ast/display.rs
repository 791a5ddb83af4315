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

//! Infix rendering of expression trees
//!
//! `Display` is the diagnostic rendering: each node prints its operator template, and a
//! node whose sign flag is set gets a leading `-`. Only the flag of the node being rendered
//! is consulted; operands render their own flags. No parentheses are inserted, so the text
//! is not guaranteed to re-parse to the same tree (see [`Printer`](crate::printer::Printer)
//! for that).

use super::expression::{Exp, ExpKind, LiteralValue};
use std::fmt;

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Integer(value) => write!(f, "{value}"),
            LiteralValue::Real(value) => write_real(f, *value),
            LiteralValue::Boolean(value) => write!(f, "{value}"),
        }
    }
}

/// Reals always keep a fractional part so that they read back as reals
pub(crate) fn write_real(f: &mut impl fmt::Write, value: f64) -> fmt::Result {
    let text = value.to_string();
    if value.is_finite() && !text.contains('.') {
        write!(f, "{text}.0")
    } else {
        f.write_str(&text)
    }
}

impl fmt::Display for Exp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            f.write_str("-")?;
        }
        match self.kind() {
            ExpKind::Lit(value) => write!(f, "{value}"),
            ExpKind::Var(name) => f.write_str(name),
            ExpKind::If(data) => write!(
                f,
                "if {} then {} else {}",
                data.condition(),
                data.then_branch(),
                data.else_branch()
            ),
            ExpKind::Add(data) => write!(f, "{} + {}", data.left(), data.right()),
            ExpKind::Sub(data) => write!(f, "{} - {}", data.left(), data.right()),
            ExpKind::Mul(data) => write!(f, "{} * {}", data.left(), data.right()),
            ExpKind::Div(data) => write!(f, "{} / {}", data.left(), data.right()),
            ExpKind::Mod(data) => write!(f, "{} % {}", data.left(), data.right()),
            ExpKind::Pow(data) => write!(f, "{} ^ {}", data.left(), data.right()),
            ExpKind::And(data) => write!(f, "{} and {}", data.left(), data.right()),
            ExpKind::Or(data) => write!(f, "{} or {}", data.left(), data.right()),
            ExpKind::Not(data) => write!(f, "{} not {}", data.left(), data.right()),
            ExpKind::Compare(data) => write!(
                f,
                "{} {} {}",
                data.left(),
                data.comparator(),
                data.right()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Comparator;

    #[test]
    fn test_addition_rendering() {
        let exp = Exp::add(Exp::integer(2), Exp::integer(3));
        assert_eq!(exp.to_string(), "2 + 3");
        assert_eq!(exp.negated().to_string(), "-2 + 3");
    }

    #[test]
    fn test_not_rendering() {
        let exp = Exp::not(Exp::variable("a"), Exp::variable("b"));
        assert_eq!(exp.to_string(), "a not b");
        assert_eq!(exp.negated().to_string(), "-a not b");
    }

    #[test]
    fn test_operand_signs_are_independent() {
        let exp = Exp::sub(Exp::variable("x"), Exp::integer(4).negated());
        assert_eq!(exp.to_string(), "x - -4");

        let nested = Exp::mul(exp.negated(), Exp::real(0.5));
        assert_eq!(nested.to_string(), "-x - -4 * 0.5");
    }

    #[test]
    fn test_leaf_and_conditional_rendering() {
        assert_eq!(Exp::real(2.0).to_string(), "2.0");
        assert_eq!(Exp::boolean(false).negated().to_string(), "-false");
        let exp = Exp::conditional(
            Exp::compare(Comparator::GreaterThanOrEqual, Exp::variable("n"), Exp::integer(0)),
            Exp::variable("n"),
            Exp::variable("n").negated(),
        );
        assert_eq!(exp.to_string(), "if n >= 0 then n else -n");
    }
}
