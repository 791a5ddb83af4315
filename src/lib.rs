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

//! SMPL expressions in Rust
//!
//! An expression tree with one node kind per construct, a [`Visitor`] protocol for writing
//! passes over it, and the passes themselves: evaluation, type checking and canonical
//! printing.
//!
//! ```
//! use smpl::{Environment, SmplEngine, Value};
//!
//! let mut engine = SmplEngine::new();
//! let env = Environment::new().with_variable("x", 3i64);
//! assert_eq!(engine.evaluate("-x + 10", &env).unwrap(), Value::Integer(7));
//! ```

pub mod analyzer;
pub mod ast;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod model;
pub mod parser;
pub mod printer;

// Re-export main types
pub use analyzer::{TypeChecker, TypeEnvironment, TypeError};
pub use ast::{Exp, ExpKind, Visitor};
pub use engine::{EngineConfig, SmplEngine};
pub use error::{Result, SmplError};
pub use evaluator::{Environment, EvaluationError, Evaluator, EvaluatorConfig};
pub use model::{Value, ValueType};
pub use parser::{ParseError, parse};
pub use printer::Printer;
