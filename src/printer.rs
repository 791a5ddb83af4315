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

//! Canonical source rendering
//!
//! [`Printer`] writes an expression back out as fully parenthesized source. Every binary
//! node and conditional is wrapped in parentheses and every negated node is written as
//! `(-X)`, so the text parses back to the tree it came from. `Display` on [`Exp`] is the
//! lighter, human oriented rendering and does not make that promise.

use std::convert::Infallible;
use std::fmt::Write as _;

use crate::ast::{
    BinaryExp, BinaryOperator, CompareExp, ConditionalExp, Exp, LiteralValue, Visitor,
    write_real,
};

/// Renders expressions as re-parseable source text
#[derive(Debug, Default, Clone, Copy)]
pub struct Printer;

impl Printer {
    /// Render `exp` as canonical source
    pub fn print(exp: &Exp) -> String {
        let Ok(text) = exp.visit(&mut Printer, ());
        text
    }

    fn binary(
        &mut self,
        exp: &Exp,
        op: BinaryOperator,
        left: &Exp,
        right: &Exp,
    ) -> Result<String, Infallible> {
        let left = left.visit(self, ())?;
        let right = right.visit(self, ())?;
        Ok(signed(exp, format!("({left} {op} {right})")))
    }
}

fn signed(exp: &Exp, text: String) -> String {
    if exp.is_negative() {
        format!("(-{text})")
    } else {
        text
    }
}

impl Visitor<(), String> for Printer {
    type Error = Infallible;

    fn visit_lit(&mut self, exp: &Exp, value: &LiteralValue, _: ()) -> Result<String, Infallible> {
        let mut text = String::new();
        match value {
            LiteralValue::Integer(i) => write!(text, "{i}"),
            LiteralValue::Real(r) => write_real(&mut text, *r),
            LiteralValue::Boolean(b) => write!(text, "{b}"),
        }
        .ok();
        Ok(signed(exp, text))
    }

    fn visit_var(&mut self, exp: &Exp, name: &str, _: ()) -> Result<String, Infallible> {
        Ok(signed(exp, name.to_string()))
    }

    fn visit_add(&mut self, exp: &Exp, operands: &BinaryExp, _: ()) -> Result<String, Infallible> {
        self.binary(exp, BinaryOperator::Add, operands.left(), operands.right())
    }

    fn visit_sub(&mut self, exp: &Exp, operands: &BinaryExp, _: ()) -> Result<String, Infallible> {
        self.binary(exp, BinaryOperator::Subtract, operands.left(), operands.right())
    }

    fn visit_mul(&mut self, exp: &Exp, operands: &BinaryExp, _: ()) -> Result<String, Infallible> {
        self.binary(exp, BinaryOperator::Multiply, operands.left(), operands.right())
    }

    fn visit_div(&mut self, exp: &Exp, operands: &BinaryExp, _: ()) -> Result<String, Infallible> {
        self.binary(exp, BinaryOperator::Divide, operands.left(), operands.right())
    }

    fn visit_mod(&mut self, exp: &Exp, operands: &BinaryExp, _: ()) -> Result<String, Infallible> {
        self.binary(exp, BinaryOperator::Modulo, operands.left(), operands.right())
    }

    fn visit_pow(&mut self, exp: &Exp, operands: &BinaryExp, _: ()) -> Result<String, Infallible> {
        self.binary(exp, BinaryOperator::Power, operands.left(), operands.right())
    }

    fn visit_and(&mut self, exp: &Exp, operands: &BinaryExp, _: ()) -> Result<String, Infallible> {
        self.binary(exp, BinaryOperator::And, operands.left(), operands.right())
    }

    fn visit_or(&mut self, exp: &Exp, operands: &BinaryExp, _: ()) -> Result<String, Infallible> {
        self.binary(exp, BinaryOperator::Or, operands.left(), operands.right())
    }

    fn visit_not(&mut self, exp: &Exp, operands: &BinaryExp, _: ()) -> Result<String, Infallible> {
        self.binary(exp, BinaryOperator::Not, operands.left(), operands.right())
    }

    fn visit_compare(
        &mut self,
        exp: &Exp,
        compare: &CompareExp,
        _: (),
    ) -> Result<String, Infallible> {
        let op = BinaryOperator::Compare(compare.comparator());
        self.binary(exp, op, compare.left(), compare.right())
    }

    fn visit_if(
        &mut self,
        exp: &Exp,
        conditional: &ConditionalExp,
        _: (),
    ) -> Result<String, Infallible> {
        let condition = conditional.condition().visit(self, ())?;
        let then_branch = conditional.then_branch().visit(self, ())?;
        let else_branch = conditional.else_branch().visit(self, ())?;
        Ok(signed(
            exp,
            format!("(if {condition} then {then_branch} else {else_branch})"),
        ))
    }
}
