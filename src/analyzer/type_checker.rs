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

//! Type inference over expression trees

use rustc_hash::FxHashMap;

use super::error::{TypeError, TypeResult};
use crate::ast::{BinaryExp, CompareExp, ConditionalExp, Exp, LiteralValue, Visitor};
use crate::evaluator::DEFAULT_MAX_EVAL_DEPTH;
use crate::model::ValueType;

/// Declared variable types
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeEnvironment {
    variables: FxHashMap<String, ValueType>,
}

impl TypeEnvironment {
    /// Create an empty type environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style declaration
    pub fn with_variable(mut self, name: impl Into<String>, value_type: ValueType) -> Self {
        self.declare(name, value_type);
        self
    }

    /// Declare `name` with `value_type`, replacing any previous declaration
    pub fn declare(&mut self, name: impl Into<String>, value_type: ValueType) {
        self.variables.insert(name.into(), value_type);
    }

    /// Declared type of `name`
    pub fn get_type(&self, name: &str) -> Option<ValueType> {
        self.variables.get(name).copied()
    }
}

impl<K: Into<String>> FromIterator<(K, ValueType)> for TypeEnvironment {
    fn from_iter<I: IntoIterator<Item = (K, ValueType)>>(iter: I) -> Self {
        let mut env = TypeEnvironment::new();
        for (name, value_type) in iter {
            env.declare(name, value_type);
        }
        env
    }
}

/// Infers expression types
///
/// Unlike evaluation every child is checked, so the right operand of `and` is
/// rejected even when the left one would decide the result.
#[derive(Debug)]
pub struct TypeChecker {
    max_depth: usize,
    depth: usize,
}

impl Default for TypeChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeChecker {
    /// Create a type checker with the default depth limit
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_EVAL_DEPTH)
    }

    /// Create a type checker that rejects trees deeper than `max_depth`
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth,
            depth: 0,
        }
    }

    /// Infer the type of `exp`
    pub fn check(&mut self, exp: &Exp, env: &TypeEnvironment) -> TypeResult<ValueType> {
        self.depth = 0;
        self.descend(exp, env)
    }

    fn descend(&mut self, exp: &Exp, env: &TypeEnvironment) -> TypeResult<ValueType> {
        if self.depth >= self.max_depth {
            return Err(TypeError::DepthLimitExceeded {
                limit: self.max_depth,
            });
        }
        self.depth += 1;
        let result = exp.visit(self, env);
        self.depth -= 1;
        result
    }

    fn numeric_operands(
        &mut self,
        exp: &Exp,
        operation: &str,
        operands: &BinaryExp,
        env: &TypeEnvironment,
    ) -> TypeResult<ValueType> {
        let left = self.descend(operands.left(), env)?;
        let right = self.descend(operands.right(), env)?;
        for operand in [left, right] {
            if !operand.is_numeric() {
                return Err(TypeError::mismatch(operation, "number", operand));
            }
        }
        let result = if left == ValueType::Integer && right == ValueType::Integer {
            ValueType::Integer
        } else {
            ValueType::Real
        };
        signed(exp, result)
    }

    fn boolean_operands(
        &mut self,
        exp: &Exp,
        operation: &str,
        operands: &BinaryExp,
        env: &TypeEnvironment,
    ) -> TypeResult<ValueType> {
        for operand in [operands.left(), operands.right()] {
            let found = self.descend(operand, env)?;
            if found != ValueType::Boolean {
                return Err(TypeError::mismatch(operation, "Boolean", found));
            }
        }
        signed(exp, ValueType::Boolean)
    }
}

fn signed(exp: &Exp, value_type: ValueType) -> TypeResult<ValueType> {
    if exp.is_negative() && !value_type.is_numeric() {
        return Err(TypeError::mismatch("negation", "number", value_type));
    }
    Ok(value_type)
}

impl<'env> Visitor<&'env TypeEnvironment, ValueType> for TypeChecker {
    type Error = TypeError;

    fn visit_lit(
        &mut self,
        exp: &Exp,
        value: &LiteralValue,
        _env: &'env TypeEnvironment,
    ) -> TypeResult<ValueType> {
        let value_type = match value {
            LiteralValue::Integer(_) => ValueType::Integer,
            LiteralValue::Real(_) => ValueType::Real,
            LiteralValue::Boolean(_) => ValueType::Boolean,
        };
        signed(exp, value_type)
    }

    fn visit_var(
        &mut self,
        exp: &Exp,
        name: &str,
        env: &'env TypeEnvironment,
    ) -> TypeResult<ValueType> {
        let value_type = env
            .get_type(name)
            .ok_or_else(|| TypeError::UnboundVariable {
                name: name.to_string(),
            })?;
        signed(exp, value_type)
    }

    fn visit_add(
        &mut self,
        exp: &Exp,
        operands: &BinaryExp,
        env: &'env TypeEnvironment,
    ) -> TypeResult<ValueType> {
        self.numeric_operands(exp, "+", operands, env)
    }

    fn visit_sub(
        &mut self,
        exp: &Exp,
        operands: &BinaryExp,
        env: &'env TypeEnvironment,
    ) -> TypeResult<ValueType> {
        self.numeric_operands(exp, "-", operands, env)
    }

    fn visit_mul(
        &mut self,
        exp: &Exp,
        operands: &BinaryExp,
        env: &'env TypeEnvironment,
    ) -> TypeResult<ValueType> {
        self.numeric_operands(exp, "*", operands, env)
    }

    fn visit_div(
        &mut self,
        exp: &Exp,
        operands: &BinaryExp,
        env: &'env TypeEnvironment,
    ) -> TypeResult<ValueType> {
        self.numeric_operands(exp, "/", operands, env)
    }

    fn visit_mod(
        &mut self,
        exp: &Exp,
        operands: &BinaryExp,
        env: &'env TypeEnvironment,
    ) -> TypeResult<ValueType> {
        self.numeric_operands(exp, "%", operands, env)
    }

    fn visit_pow(
        &mut self,
        exp: &Exp,
        operands: &BinaryExp,
        env: &'env TypeEnvironment,
    ) -> TypeResult<ValueType> {
        self.numeric_operands(exp, "^", operands, env)
    }

    fn visit_and(
        &mut self,
        exp: &Exp,
        operands: &BinaryExp,
        env: &'env TypeEnvironment,
    ) -> TypeResult<ValueType> {
        self.boolean_operands(exp, "and", operands, env)
    }

    fn visit_or(
        &mut self,
        exp: &Exp,
        operands: &BinaryExp,
        env: &'env TypeEnvironment,
    ) -> TypeResult<ValueType> {
        self.boolean_operands(exp, "or", operands, env)
    }

    fn visit_not(
        &mut self,
        exp: &Exp,
        operands: &BinaryExp,
        env: &'env TypeEnvironment,
    ) -> TypeResult<ValueType> {
        // Any two values can be tested for distinctness
        self.descend(operands.left(), env)?;
        self.descend(operands.right(), env)?;
        signed(exp, ValueType::Boolean)
    }

    fn visit_compare(
        &mut self,
        exp: &Exp,
        compare: &CompareExp,
        env: &'env TypeEnvironment,
    ) -> TypeResult<ValueType> {
        let left = self.descend(compare.left(), env)?;
        let right = self.descend(compare.right(), env)?;
        let comparator = compare.comparator();
        if comparator.is_ordering() {
            for operand in [left, right] {
                if !operand.is_numeric() {
                    return Err(TypeError::mismatch(comparator.symbol(), "number", operand));
                }
            }
        } else if left.unify(right).is_none() {
            return Err(TypeError::mismatch(comparator.symbol(), left.name(), right));
        }
        signed(exp, ValueType::Boolean)
    }

    fn visit_if(
        &mut self,
        exp: &Exp,
        conditional: &ConditionalExp,
        env: &'env TypeEnvironment,
    ) -> TypeResult<ValueType> {
        let condition = self.descend(conditional.condition(), env)?;
        if condition != ValueType::Boolean {
            return Err(TypeError::mismatch("if", "Boolean", condition));
        }
        let then_type = self.descend(conditional.then_branch(), env)?;
        let else_type = self.descend(conditional.else_branch(), env)?;
        let unified = then_type
            .unify(else_type)
            .ok_or(TypeError::IncompatibleBranches {
                then_type,
                else_type,
            })?;
        signed(exp, unified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn check(source: &str) -> TypeResult<ValueType> {
        let env = TypeEnvironment::new()
            .with_variable("n", ValueType::Integer)
            .with_variable("r", ValueType::Real)
            .with_variable("flag", ValueType::Boolean);
        TypeChecker::new().check(&parse(source).unwrap(), &env)
    }

    #[test]
    fn test_arithmetic_types() {
        assert_eq!(check("n + 1"), Ok(ValueType::Integer));
        assert_eq!(check("n * r"), Ok(ValueType::Real));
        assert_eq!(check("2 ^ n"), Ok(ValueType::Integer));
        assert_eq!(check("-r"), Ok(ValueType::Real));
        assert_eq!(
            check("n + flag"),
            Err(TypeError::mismatch("+", "number", ValueType::Boolean))
        );
    }

    #[test]
    fn test_boolean_types() {
        assert_eq!(check("n < r and flag"), Ok(ValueType::Boolean));
        assert_eq!(check("n not flag"), Ok(ValueType::Boolean));
        assert_eq!(check("flag = true"), Ok(ValueType::Boolean));
        assert_eq!(check("n = 2.0"), Ok(ValueType::Boolean));
        assert!(matches!(check("flag < true"), Err(TypeError::Mismatch { .. })));
        assert!(matches!(check("flag = 1"), Err(TypeError::Mismatch { .. })));
        assert!(matches!(check("-flag"), Err(TypeError::Mismatch { .. })));
    }

    #[test]
    fn test_checks_every_operand() {
        // Evaluation would short-circuit here; checking does not
        assert!(matches!(check("false and 1"), Err(TypeError::Mismatch { .. })));
        assert_eq!(
            check("true or missing"),
            Err(TypeError::UnboundVariable {
                name: "missing".to_string()
            })
        );
    }

    #[test]
    fn test_conditional_types() {
        assert_eq!(check("if flag then n else r"), Ok(ValueType::Real));
        assert_eq!(check("if flag then n else 1"), Ok(ValueType::Integer));
        assert_eq!(
            check("if flag then n else false"),
            Err(TypeError::IncompatibleBranches {
                then_type: ValueType::Integer,
                else_type: ValueType::Boolean,
            })
        );
        assert!(matches!(check("if n then 1 else 2"), Err(TypeError::Mismatch { .. })));
    }

    #[test]
    fn test_depth_limit() {
        let mut exp = Exp::variable("n");
        for _ in 0..20 {
            exp = Exp::mul(Exp::integer(2), exp);
        }
        let env = TypeEnvironment::new().with_variable("n", ValueType::Integer);
        assert_eq!(
            TypeChecker::with_max_depth(5).check(&exp, &env),
            Err(TypeError::DepthLimitExceeded { limit: 5 })
        );
        assert_eq!(TypeChecker::new().check(&exp, &env), Ok(ValueType::Integer));
    }
}
