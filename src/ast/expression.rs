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

//! Expression AST node definitions

use crate::ast::operator::{BinaryOperator, Comparator};
use smallvec::SmallVec;

/// A node of an SMPL expression tree
///
/// Every node is an `Exp`: a closed [`ExpKind`] plus the sign flag recording a leading
/// negation of the whole subexpression. Children are owned through `Box`, are set once by
/// the constructors and are only ever handed out as shared references, so the shape of a
/// tree cannot change after it has been built.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Exp {
    kind: ExpKind,
    negative: bool,
}

/// The closed set of node shapes
///
/// Binary variants are boxed to keep the enum small.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExpKind {
    /// Literal constant
    Lit(LiteralValue),
    /// Variable reference
    Var(String),
    /// Addition (L + R)
    Add(Box<BinaryExp>),
    /// Subtraction (L - R)
    Sub(Box<BinaryExp>),
    /// Multiplication (L * R)
    Mul(Box<BinaryExp>),
    /// Division (L / R)
    Div(Box<BinaryExp>),
    /// Remainder (L % R)
    Mod(Box<BinaryExp>),
    /// Exponentiation (L ^ R)
    Pow(Box<BinaryExp>),
    /// Logical conjunction (L and R)
    And(Box<BinaryExp>),
    /// Logical disjunction (L or R)
    Or(Box<BinaryExp>),
    /// Binary `not` (L not R); its meaning belongs to the pass interpreting it
    Not(Box<BinaryExp>),
    /// Comparison (L op R)
    Compare(Box<CompareExp>),
    /// Conditional (if C then A else B)
    If(Box<ConditionalExp>),
}

/// The two operands of a binary node
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinaryExp {
    left: Exp,
    right: Exp,
}

impl BinaryExp {
    /// Left operand
    #[inline]
    pub fn left(&self) -> &Exp {
        &self.left
    }

    /// Right operand
    #[inline]
    pub fn right(&self) -> &Exp {
        &self.right
    }
}

/// Comparison node data
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompareExp {
    comparator: Comparator,
    left: Exp,
    right: Exp,
}

impl CompareExp {
    /// The comparison operator
    #[inline]
    pub fn comparator(&self) -> Comparator {
        self.comparator
    }

    /// Left operand
    #[inline]
    pub fn left(&self) -> &Exp {
        &self.left
    }

    /// Right operand
    #[inline]
    pub fn right(&self) -> &Exp {
        &self.right
    }
}

/// Conditional node data
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConditionalExp {
    condition: Exp,
    then_branch: Exp,
    else_branch: Exp,
}

impl ConditionalExp {
    /// Condition
    #[inline]
    pub fn condition(&self) -> &Exp {
        &self.condition
    }

    /// Branch taken when the condition holds
    #[inline]
    pub fn then_branch(&self) -> &Exp {
        &self.then_branch
    }

    /// Branch taken otherwise
    #[inline]
    pub fn else_branch(&self) -> &Exp {
        &self.else_branch
    }
}

/// Literal values in SMPL
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LiteralValue {
    /// Integer literal
    Integer(i64),
    /// Real literal
    Real(f64),
    /// Boolean literal
    Boolean(bool),
}

impl From<i64> for LiteralValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for LiteralValue {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<bool> for LiteralValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

/// Fast node kind enumeration, one entry per [`ExpKind`] variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ExpressionType {
    /// Literal constant
    Lit = 0,
    /// Variable reference
    Var = 1,
    /// Addition
    Add = 2,
    /// Subtraction
    Sub = 3,
    /// Multiplication
    Mul = 4,
    /// Division
    Div = 5,
    /// Remainder
    Mod = 6,
    /// Exponentiation
    Pow = 7,
    /// Logical conjunction
    And = 8,
    /// Logical disjunction
    Or = 9,
    /// Binary not
    Not = 10,
    /// Comparison
    Compare = 11,
    /// Conditional
    If = 12,
}

impl ExpressionType {
    /// All node kinds in declaration order
    pub const ALL: [ExpressionType; 13] = [
        ExpressionType::Lit,
        ExpressionType::Var,
        ExpressionType::Add,
        ExpressionType::Sub,
        ExpressionType::Mul,
        ExpressionType::Div,
        ExpressionType::Mod,
        ExpressionType::Pow,
        ExpressionType::And,
        ExpressionType::Or,
        ExpressionType::Not,
        ExpressionType::Compare,
        ExpressionType::If,
    ];

    /// Short lowercase name, used in logs
    pub const fn name(self) -> &'static str {
        match self {
            ExpressionType::Lit => "lit",
            ExpressionType::Var => "var",
            ExpressionType::Add => "add",
            ExpressionType::Sub => "sub",
            ExpressionType::Mul => "mul",
            ExpressionType::Div => "div",
            ExpressionType::Mod => "mod",
            ExpressionType::Pow => "pow",
            ExpressionType::And => "and",
            ExpressionType::Or => "or",
            ExpressionType::Not => "not",
            ExpressionType::Compare => "compare",
            ExpressionType::If => "if",
        }
    }
}

impl Exp {
    fn new(kind: ExpKind) -> Self {
        Self {
            kind,
            negative: false,
        }
    }

    fn pair(left: Exp, right: Exp) -> Box<BinaryExp> {
        Box::new(BinaryExp { left, right })
    }

    /// Create a literal expression
    pub fn literal(value: impl Into<LiteralValue>) -> Self {
        Self::new(ExpKind::Lit(value.into()))
    }

    /// Create an integer literal
    pub fn integer(value: i64) -> Self {
        Self::literal(LiteralValue::Integer(value))
    }

    /// Create a real literal
    pub fn real(value: f64) -> Self {
        Self::literal(LiteralValue::Real(value))
    }

    /// Create a boolean literal
    pub fn boolean(value: bool) -> Self {
        Self::literal(LiteralValue::Boolean(value))
    }

    /// Create a variable reference
    pub fn variable(name: impl Into<String>) -> Self {
        Self::new(ExpKind::Var(name.into()))
    }

    /// Create an addition
    pub fn add(left: Exp, right: Exp) -> Self {
        Self::new(ExpKind::Add(Self::pair(left, right)))
    }

    /// Create a subtraction
    pub fn sub(left: Exp, right: Exp) -> Self {
        Self::new(ExpKind::Sub(Self::pair(left, right)))
    }

    /// Create a multiplication
    pub fn mul(left: Exp, right: Exp) -> Self {
        Self::new(ExpKind::Mul(Self::pair(left, right)))
    }

    /// Create a division
    pub fn div(left: Exp, right: Exp) -> Self {
        Self::new(ExpKind::Div(Self::pair(left, right)))
    }

    /// Create a remainder
    pub fn modulo(left: Exp, right: Exp) -> Self {
        Self::new(ExpKind::Mod(Self::pair(left, right)))
    }

    /// Create an exponentiation
    pub fn pow(left: Exp, right: Exp) -> Self {
        Self::new(ExpKind::Pow(Self::pair(left, right)))
    }

    /// Create a logical conjunction
    pub fn and(left: Exp, right: Exp) -> Self {
        Self::new(ExpKind::And(Self::pair(left, right)))
    }

    /// Create a logical disjunction
    pub fn or(left: Exp, right: Exp) -> Self {
        Self::new(ExpKind::Or(Self::pair(left, right)))
    }

    /// Create a binary `not`
    pub fn not(left: Exp, right: Exp) -> Self {
        Self::new(ExpKind::Not(Self::pair(left, right)))
    }

    /// Create a comparison
    pub fn compare(comparator: Comparator, left: Exp, right: Exp) -> Self {
        Self::new(ExpKind::Compare(Box::new(CompareExp {
            comparator,
            left,
            right,
        })))
    }

    /// Create a conditional
    pub fn conditional(condition: Exp, then_branch: Exp, else_branch: Exp) -> Self {
        Self::new(ExpKind::If(Box::new(ConditionalExp {
            condition,
            then_branch,
            else_branch,
        })))
    }

    /// Create the node matching an infix operator
    pub fn binary(op: BinaryOperator, left: Exp, right: Exp) -> Self {
        match op {
            BinaryOperator::Add => Self::add(left, right),
            BinaryOperator::Subtract => Self::sub(left, right),
            BinaryOperator::Multiply => Self::mul(left, right),
            BinaryOperator::Divide => Self::div(left, right),
            BinaryOperator::Modulo => Self::modulo(left, right),
            BinaryOperator::Power => Self::pow(left, right),
            BinaryOperator::And => Self::and(left, right),
            BinaryOperator::Or => Self::or(left, right),
            BinaryOperator::Not => Self::not(left, right),
            BinaryOperator::Compare(cmp) => Self::compare(cmp, left, right),
        }
    }

    /// Flip the sign flag, so that negating twice yields the original node
    #[must_use]
    pub fn negated(mut self) -> Self {
        self.negative = !self.negative;
        self
    }

    /// Set the sign flag explicitly
    #[must_use]
    pub fn with_sign(mut self, negative: bool) -> Self {
        self.negative = negative;
        self
    }

    /// Whether a leading negation applies to this node
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// The node's shape
    #[inline]
    pub fn kind(&self) -> &ExpKind {
        &self.kind
    }

    /// Fast check of the node kind
    #[inline(always)]
    pub fn expression_type(&self) -> ExpressionType {
        match &self.kind {
            ExpKind::Lit(_) => ExpressionType::Lit,
            ExpKind::Var(_) => ExpressionType::Var,
            ExpKind::Add(_) => ExpressionType::Add,
            ExpKind::Sub(_) => ExpressionType::Sub,
            ExpKind::Mul(_) => ExpressionType::Mul,
            ExpKind::Div(_) => ExpressionType::Div,
            ExpKind::Mod(_) => ExpressionType::Mod,
            ExpKind::Pow(_) => ExpressionType::Pow,
            ExpKind::And(_) => ExpressionType::And,
            ExpKind::Or(_) => ExpressionType::Or,
            ExpKind::Not(_) => ExpressionType::Not,
            ExpKind::Compare(_) => ExpressionType::Compare,
            ExpKind::If(_) => ExpressionType::If,
        }
    }

    /// The infix operator of a binary node
    pub fn binary_operator(&self) -> Option<BinaryOperator> {
        match &self.kind {
            ExpKind::Add(_) => Some(BinaryOperator::Add),
            ExpKind::Sub(_) => Some(BinaryOperator::Subtract),
            ExpKind::Mul(_) => Some(BinaryOperator::Multiply),
            ExpKind::Div(_) => Some(BinaryOperator::Divide),
            ExpKind::Mod(_) => Some(BinaryOperator::Modulo),
            ExpKind::Pow(_) => Some(BinaryOperator::Power),
            ExpKind::And(_) => Some(BinaryOperator::And),
            ExpKind::Or(_) => Some(BinaryOperator::Or),
            ExpKind::Not(_) => Some(BinaryOperator::Not),
            ExpKind::Compare(data) => Some(BinaryOperator::Compare(data.comparator)),
            ExpKind::Lit(_) | ExpKind::Var(_) | ExpKind::If(_) => None,
        }
    }

    /// Left and right operands of a binary node
    pub fn binary_operands(&self) -> Option<(&Exp, &Exp)> {
        match &self.kind {
            ExpKind::Add(data)
            | ExpKind::Sub(data)
            | ExpKind::Mul(data)
            | ExpKind::Div(data)
            | ExpKind::Mod(data)
            | ExpKind::Pow(data)
            | ExpKind::And(data)
            | ExpKind::Or(data)
            | ExpKind::Not(data) => Some((&data.left, &data.right)),
            ExpKind::Compare(data) => Some((&data.left, &data.right)),
            ExpKind::Lit(_) | ExpKind::Var(_) | ExpKind::If(_) => None,
        }
    }

    /// Direct children in source order
    pub fn children(&self) -> SmallVec<[&Exp; 3]> {
        let mut children = SmallVec::new();
        match &self.kind {
            ExpKind::Lit(_) | ExpKind::Var(_) => {}
            ExpKind::If(data) => {
                children.push(&data.condition);
                children.push(&data.then_branch);
                children.push(&data.else_branch);
            }
            _ => {
                if let Some((left, right)) = self.binary_operands() {
                    children.push(left);
                    children.push(right);
                }
            }
        }
        children
    }

    /// Check if this node has no children
    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, ExpKind::Lit(_) | ExpKind::Var(_))
    }

    /// Get the literal value if this is a literal node
    pub fn as_literal(&self) -> Option<&LiteralValue> {
        match &self.kind {
            ExpKind::Lit(value) => Some(value),
            _ => None,
        }
    }

    /// Get the variable name if this is a variable node
    pub fn as_variable(&self) -> Option<&str> {
        match &self.kind {
            ExpKind::Var(name) => Some(name),
            _ => None,
        }
    }

    /// Number of nodes in the tree rooted here
    pub fn node_count(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(|child| child.node_count())
            .sum::<usize>()
    }

    /// Length of the longest root-to-leaf path, counting nodes
    pub fn depth(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(|child| child.depth())
            .max()
            .unwrap_or(0)
    }
}

impl From<LiteralValue> for Exp {
    fn from(value: LiteralValue) -> Self {
        Self::literal(value)
    }
}
