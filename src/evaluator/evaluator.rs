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

//! Tree-walking evaluator
//!
//! [`Evaluator`] is a [`Visitor`] computing a [`Value`] for every node. Arithmetic on
//! integers is checked, integers mixed with reals are promoted, and a node whose sign flag
//! is set has its computed number negated before it is handed to the parent.

use std::cmp::Ordering;

use super::context::Environment;
use super::error::{EvaluationError, EvaluationResult};
use crate::ast::{
    ArithmeticOperator, BinaryExp, CompareExp, Comparator, ConditionalExp, Exp, LiteralValue,
    Visitor,
};
use crate::model::Value;

/// Default limit on the depth of evaluated trees
pub const DEFAULT_MAX_EVAL_DEPTH: usize = 512;

/// Evaluator settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluatorConfig {
    /// Deepest tree the evaluator will descend into
    pub max_depth: usize,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_EVAL_DEPTH,
        }
    }
}

/// Computes the value of an expression under an [`Environment`]
#[derive(Debug, Default)]
pub struct Evaluator {
    config: EvaluatorConfig,
    depth: usize,
}

impl Evaluator {
    /// Create an evaluator with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an evaluator with custom settings
    pub fn with_config(config: EvaluatorConfig) -> Self {
        Self { config, depth: 0 }
    }

    /// Current settings
    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Evaluate `exp` with the bindings in `env`
    pub fn evaluate(&mut self, exp: &Exp, env: &Environment) -> EvaluationResult<Value> {
        log::debug!("Evaluating {} expression", exp.expression_type().name());
        self.depth = 0;
        self.descend(exp, env)
    }

    /// Visit a child, enforcing the depth limit
    fn descend(&mut self, exp: &Exp, env: &Environment) -> EvaluationResult<Value> {
        if self.depth >= self.config.max_depth {
            return Err(EvaluationError::DepthLimitExceeded {
                limit: self.config.max_depth,
            });
        }
        self.depth += 1;
        let result = exp.visit(self, env);
        self.depth -= 1;
        result
    }

    fn descend_boolean(
        &mut self,
        exp: &Exp,
        env: &Environment,
        operation: &str,
    ) -> EvaluationResult<bool> {
        let value = self.descend(exp, env)?;
        value
            .as_boolean()
            .ok_or_else(|| EvaluationError::type_mismatch(operation, "Boolean", value.type_name()))
    }

    fn arithmetic(
        &mut self,
        exp: &Exp,
        op: ArithmeticOperator,
        operands: &BinaryExp,
        env: &Environment,
    ) -> EvaluationResult<Value> {
        let left = self.descend(operands.left(), env)?;
        let right = self.descend(operands.right(), env)?;
        let value = apply_arithmetic(op, left, right)?;
        apply_sign(exp, value)
    }
}

/// Negate `value` when the node's sign flag is set
fn apply_sign(exp: &Exp, value: Value) -> EvaluationResult<Value> {
    if !exp.is_negative() {
        return Ok(value);
    }
    match value {
        Value::Integer(i) => i
            .checked_neg()
            .map(Value::Integer)
            .ok_or_else(|| EvaluationError::overflow("negation")),
        Value::Real(r) => Ok(Value::Real(-r)),
        Value::Boolean(_) => Err(EvaluationError::type_mismatch(
            "negation",
            "number",
            value.type_name(),
        )),
    }
}

fn apply_arithmetic(op: ArithmeticOperator, left: Value, right: Value) -> EvaluationResult<Value> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => integer_arithmetic(op, a, b).map(Value::Integer),
        _ => match (left.as_real(), right.as_real()) {
            (Some(a), Some(b)) => Ok(Value::Real(real_arithmetic(op, a, b))),
            _ => {
                let offender = if left.is_numeric() { right } else { left };
                Err(EvaluationError::type_mismatch(
                    op.symbol(),
                    "number",
                    offender.type_name(),
                ))
            }
        },
    }
}

fn integer_arithmetic(op: ArithmeticOperator, a: i64, b: i64) -> EvaluationResult<i64> {
    let overflow = || EvaluationError::overflow(op.symbol());
    match op {
        ArithmeticOperator::Add => a.checked_add(b).ok_or_else(overflow),
        ArithmeticOperator::Subtract => a.checked_sub(b).ok_or_else(overflow),
        ArithmeticOperator::Multiply => a.checked_mul(b).ok_or_else(overflow),
        ArithmeticOperator::Divide | ArithmeticOperator::Modulo if b == 0 => {
            Err(EvaluationError::DivisionByZero)
        }
        ArithmeticOperator::Divide => a.checked_div(b).ok_or_else(overflow),
        ArithmeticOperator::Modulo => a.checked_rem(b).ok_or_else(overflow),
        ArithmeticOperator::Power => {
            if b < 0 {
                return Err(EvaluationError::InvalidOperation {
                    message: format!("negative integer exponent {b}"),
                });
            }
            let exponent = u32::try_from(b).map_err(|_| overflow())?;
            a.checked_pow(exponent).ok_or_else(overflow)
        }
    }
}

fn real_arithmetic(op: ArithmeticOperator, a: f64, b: f64) -> f64 {
    match op {
        ArithmeticOperator::Add => a + b,
        ArithmeticOperator::Subtract => a - b,
        ArithmeticOperator::Multiply => a * b,
        ArithmeticOperator::Divide => a / b,
        ArithmeticOperator::Modulo => a % b,
        ArithmeticOperator::Power => a.powf(b),
    }
}

/// Ordering of two values under numeric promotion
///
/// `Ok(None)` means the values are incomparable (a NaN operand).
fn compare_values(
    comparator: Comparator,
    left: Value,
    right: Value,
) -> EvaluationResult<Option<Ordering>> {
    match (left, right) {
        (Value::Boolean(a), Value::Boolean(b)) if !comparator.is_ordering() => Ok(Some(a.cmp(&b))),
        (Value::Integer(a), Value::Integer(b)) => Ok(Some(a.cmp(&b))),
        _ => match (left.as_real(), right.as_real()) {
            (Some(a), Some(b)) => Ok(a.partial_cmp(&b)),
            _ => {
                let expected = if comparator.is_ordering() {
                    "number"
                } else {
                    left.type_name()
                };
                let actual = if comparator.is_ordering() && left.is_numeric() {
                    right.type_name()
                } else if comparator.is_ordering() {
                    left.type_name()
                } else {
                    right.type_name()
                };
                Err(EvaluationError::type_mismatch(
                    comparator.symbol(),
                    expected,
                    actual,
                ))
            }
        },
    }
}

/// Two values are distinct when they differ after numeric promotion or are of different kinds
fn values_distinct(left: Value, right: Value) -> bool {
    match (left, right) {
        (Value::Boolean(a), Value::Boolean(b)) => a != b,
        (Value::Integer(a), Value::Integer(b)) => a != b,
        _ => match (left.as_real(), right.as_real()) {
            (Some(a), Some(b)) => a != b,
            _ => true,
        },
    }
}

impl<'env> Visitor<&'env Environment, Value> for Evaluator {
    type Error = EvaluationError;

    fn visit_lit(
        &mut self,
        exp: &Exp,
        value: &LiteralValue,
        _env: &'env Environment,
    ) -> EvaluationResult<Value> {
        log::trace!("lit {value}");
        apply_sign(exp, Value::from(*value))
    }

    fn visit_var(
        &mut self,
        exp: &Exp,
        name: &str,
        env: &'env Environment,
    ) -> EvaluationResult<Value> {
        log::trace!("var {name}");
        let value = env
            .get_variable(name)
            .ok_or_else(|| EvaluationError::UnboundVariable {
                name: name.to_string(),
            })?;
        apply_sign(exp, value)
    }

    fn visit_add(
        &mut self,
        exp: &Exp,
        operands: &BinaryExp,
        env: &'env Environment,
    ) -> EvaluationResult<Value> {
        self.arithmetic(exp, ArithmeticOperator::Add, operands, env)
    }

    fn visit_sub(
        &mut self,
        exp: &Exp,
        operands: &BinaryExp,
        env: &'env Environment,
    ) -> EvaluationResult<Value> {
        self.arithmetic(exp, ArithmeticOperator::Subtract, operands, env)
    }

    fn visit_mul(
        &mut self,
        exp: &Exp,
        operands: &BinaryExp,
        env: &'env Environment,
    ) -> EvaluationResult<Value> {
        self.arithmetic(exp, ArithmeticOperator::Multiply, operands, env)
    }

    fn visit_div(
        &mut self,
        exp: &Exp,
        operands: &BinaryExp,
        env: &'env Environment,
    ) -> EvaluationResult<Value> {
        self.arithmetic(exp, ArithmeticOperator::Divide, operands, env)
    }

    fn visit_mod(
        &mut self,
        exp: &Exp,
        operands: &BinaryExp,
        env: &'env Environment,
    ) -> EvaluationResult<Value> {
        self.arithmetic(exp, ArithmeticOperator::Modulo, operands, env)
    }

    fn visit_pow(
        &mut self,
        exp: &Exp,
        operands: &BinaryExp,
        env: &'env Environment,
    ) -> EvaluationResult<Value> {
        self.arithmetic(exp, ArithmeticOperator::Power, operands, env)
    }

    fn visit_and(
        &mut self,
        exp: &Exp,
        operands: &BinaryExp,
        env: &'env Environment,
    ) -> EvaluationResult<Value> {
        let result = self.descend_boolean(operands.left(), env, "and")?
            && self.descend_boolean(operands.right(), env, "and")?;
        apply_sign(exp, Value::Boolean(result))
    }

    fn visit_or(
        &mut self,
        exp: &Exp,
        operands: &BinaryExp,
        env: &'env Environment,
    ) -> EvaluationResult<Value> {
        let result = self.descend_boolean(operands.left(), env, "or")?
            || self.descend_boolean(operands.right(), env, "or")?;
        apply_sign(exp, Value::Boolean(result))
    }

    fn visit_not(
        &mut self,
        exp: &Exp,
        operands: &BinaryExp,
        env: &'env Environment,
    ) -> EvaluationResult<Value> {
        let left = self.descend(operands.left(), env)?;
        let right = self.descend(operands.right(), env)?;
        apply_sign(exp, Value::Boolean(values_distinct(left, right)))
    }

    fn visit_compare(
        &mut self,
        exp: &Exp,
        compare: &CompareExp,
        env: &'env Environment,
    ) -> EvaluationResult<Value> {
        let left = self.descend(compare.left(), env)?;
        let right = self.descend(compare.right(), env)?;
        let comparator = compare.comparator();
        let result = match compare_values(comparator, left, right)? {
            Some(ordering) => comparator.holds(ordering),
            None => comparator == Comparator::NotEqual,
        };
        apply_sign(exp, Value::Boolean(result))
    }

    fn visit_if(
        &mut self,
        exp: &Exp,
        conditional: &ConditionalExp,
        env: &'env Environment,
    ) -> EvaluationResult<Value> {
        let branch = if self.descend_boolean(conditional.condition(), env, "if")? {
            conditional.then_branch()
        } else {
            conditional.else_branch()
        };
        let value = self.descend(branch, env)?;
        apply_sign(exp, value)
    }
}
