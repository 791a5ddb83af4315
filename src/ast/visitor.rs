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

//! Visitor protocol and double dispatch over [`Exp`] trees
//!
//! A pass implements [`Visitor<S, T>`] once, with one handler per node kind, and starts a
//! traversal with [`Exp::visit`]. Dispatch selects the handler and nothing else: it does not
//! touch the children, so every handler decides itself whether, when and in which order to
//! recurse (`child.visit(self, arg)`), and where a failure stops the walk.

use super::expression::{BinaryExp, CompareExp, ConditionalExp, Exp, ExpKind, LiteralValue};

/// One handler per node kind, parameterized by an argument type `S` and a result type `T`
///
/// None of the handlers has a default body: adding a node kind is a compile error in every
/// implementation until it handles the new kind.
pub trait Visitor<S, T> {
    /// Failure signal of the pass; propagated unchanged through every enclosing `visit`
    type Error;

    /// Visit a literal
    fn visit_lit(&mut self, exp: &Exp, value: &LiteralValue, arg: S) -> Result<T, Self::Error>;

    /// Visit a variable reference
    fn visit_var(&mut self, exp: &Exp, name: &str, arg: S) -> Result<T, Self::Error>;

    /// Visit an addition
    fn visit_add(&mut self, exp: &Exp, operands: &BinaryExp, arg: S) -> Result<T, Self::Error>;

    /// Visit a subtraction
    fn visit_sub(&mut self, exp: &Exp, operands: &BinaryExp, arg: S) -> Result<T, Self::Error>;

    /// Visit a multiplication
    fn visit_mul(&mut self, exp: &Exp, operands: &BinaryExp, arg: S) -> Result<T, Self::Error>;

    /// Visit a division
    fn visit_div(&mut self, exp: &Exp, operands: &BinaryExp, arg: S) -> Result<T, Self::Error>;

    /// Visit a remainder
    fn visit_mod(&mut self, exp: &Exp, operands: &BinaryExp, arg: S) -> Result<T, Self::Error>;

    /// Visit an exponentiation
    fn visit_pow(&mut self, exp: &Exp, operands: &BinaryExp, arg: S) -> Result<T, Self::Error>;

    /// Visit a logical conjunction
    fn visit_and(&mut self, exp: &Exp, operands: &BinaryExp, arg: S) -> Result<T, Self::Error>;

    /// Visit a logical disjunction
    fn visit_or(&mut self, exp: &Exp, operands: &BinaryExp, arg: S) -> Result<T, Self::Error>;

    /// Visit a binary `not`
    fn visit_not(&mut self, exp: &Exp, operands: &BinaryExp, arg: S) -> Result<T, Self::Error>;

    /// Visit a comparison
    fn visit_compare(
        &mut self,
        exp: &Exp,
        compare: &CompareExp,
        arg: S,
    ) -> Result<T, Self::Error>;

    /// Visit a conditional
    fn visit_if(
        &mut self,
        exp: &Exp,
        conditional: &ConditionalExp,
        arg: S,
    ) -> Result<T, Self::Error>;
}

/// Dispatch `exp` to the single handler matching its kind
pub fn walk_expression<S, T, V>(visitor: &mut V, exp: &Exp, arg: S) -> Result<T, V::Error>
where
    V: Visitor<S, T> + ?Sized,
{
    match exp.kind() {
        ExpKind::Lit(value) => visitor.visit_lit(exp, value, arg),
        ExpKind::Var(name) => visitor.visit_var(exp, name, arg),
        ExpKind::Add(data) => visitor.visit_add(exp, data, arg),
        ExpKind::Sub(data) => visitor.visit_sub(exp, data, arg),
        ExpKind::Mul(data) => visitor.visit_mul(exp, data, arg),
        ExpKind::Div(data) => visitor.visit_div(exp, data, arg),
        ExpKind::Mod(data) => visitor.visit_mod(exp, data, arg),
        ExpKind::Pow(data) => visitor.visit_pow(exp, data, arg),
        ExpKind::And(data) => visitor.visit_and(exp, data, arg),
        ExpKind::Or(data) => visitor.visit_or(exp, data, arg),
        ExpKind::Not(data) => visitor.visit_not(exp, data, arg),
        ExpKind::Compare(data) => visitor.visit_compare(exp, data, arg),
        ExpKind::If(data) => visitor.visit_if(exp, data, arg),
    }
}

impl Exp {
    /// Run `visitor` on this node
    ///
    /// Exactly one handler is called and its result is returned as is.
    #[inline]
    pub fn visit<S, T, V>(&self, visitor: &mut V, arg: S) -> Result<T, V::Error>
    where
        V: Visitor<S, T> + ?Sized,
    {
        walk_expression(visitor, self, arg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Comparator, ExpressionType};
    use std::convert::Infallible;

    /// Records which handler ran without descending
    struct Shallow;

    impl Visitor<(), ExpressionType> for Shallow {
        type Error = Infallible;

        fn visit_lit(
            &mut self,
            _: &Exp,
            _: &LiteralValue,
            _: (),
        ) -> Result<ExpressionType, Infallible> {
            Ok(ExpressionType::Lit)
        }
        fn visit_var(&mut self, _: &Exp, _: &str, _: ()) -> Result<ExpressionType, Infallible> {
            Ok(ExpressionType::Var)
        }
        fn visit_add(
            &mut self,
            _: &Exp,
            _: &BinaryExp,
            _: (),
        ) -> Result<ExpressionType, Infallible> {
            Ok(ExpressionType::Add)
        }
        fn visit_sub(
            &mut self,
            _: &Exp,
            _: &BinaryExp,
            _: (),
        ) -> Result<ExpressionType, Infallible> {
            Ok(ExpressionType::Sub)
        }
        fn visit_mul(
            &mut self,
            _: &Exp,
            _: &BinaryExp,
            _: (),
        ) -> Result<ExpressionType, Infallible> {
            Ok(ExpressionType::Mul)
        }
        fn visit_div(
            &mut self,
            _: &Exp,
            _: &BinaryExp,
            _: (),
        ) -> Result<ExpressionType, Infallible> {
            Ok(ExpressionType::Div)
        }
        fn visit_mod(
            &mut self,
            _: &Exp,
            _: &BinaryExp,
            _: (),
        ) -> Result<ExpressionType, Infallible> {
            Ok(ExpressionType::Mod)
        }
        fn visit_pow(
            &mut self,
            _: &Exp,
            _: &BinaryExp,
            _: (),
        ) -> Result<ExpressionType, Infallible> {
            Ok(ExpressionType::Pow)
        }
        fn visit_and(
            &mut self,
            _: &Exp,
            _: &BinaryExp,
            _: (),
        ) -> Result<ExpressionType, Infallible> {
            Ok(ExpressionType::And)
        }
        fn visit_or(
            &mut self,
            _: &Exp,
            _: &BinaryExp,
            _: (),
        ) -> Result<ExpressionType, Infallible> {
            Ok(ExpressionType::Or)
        }
        fn visit_not(
            &mut self,
            _: &Exp,
            _: &BinaryExp,
            _: (),
        ) -> Result<ExpressionType, Infallible> {
            Ok(ExpressionType::Not)
        }
        fn visit_compare(
            &mut self,
            _: &Exp,
            _: &CompareExp,
            _: (),
        ) -> Result<ExpressionType, Infallible> {
            Ok(ExpressionType::Compare)
        }
        fn visit_if(
            &mut self,
            _: &Exp,
            _: &ConditionalExp,
            _: (),
        ) -> Result<ExpressionType, Infallible> {
            Ok(ExpressionType::If)
        }
    }

    #[test]
    fn test_dispatch_matches_expression_type() {
        let leaf = || Exp::integer(1);
        let nodes = vec![
            Exp::integer(7),
            Exp::variable("x"),
            Exp::add(leaf(), leaf()),
            Exp::sub(leaf(), leaf()),
            Exp::mul(leaf(), leaf()),
            Exp::div(leaf(), leaf()),
            Exp::modulo(leaf(), leaf()),
            Exp::pow(leaf(), leaf()),
            Exp::and(leaf(), leaf()),
            Exp::or(leaf(), leaf()),
            Exp::not(leaf(), leaf()),
            Exp::compare(Comparator::Equal, leaf(), leaf()),
            Exp::conditional(leaf(), leaf(), leaf()),
        ];
        for node in &nodes {
            let Ok(handled) = node.visit(&mut Shallow, ());
            assert_eq!(handled, node.expression_type());
        }
    }

    #[test]
    fn test_dispatch_through_trait_object() {
        let exp = Exp::not(Exp::integer(1), Exp::integer(2));
        let visitor: &mut dyn Visitor<(), ExpressionType, Error = Infallible> = &mut Shallow;
        let Ok(handled) = exp.visit(visitor, ());
        assert_eq!(handled, ExpressionType::Not);
    }
}
