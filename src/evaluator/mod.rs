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

//! SMPL expression evaluator
//!
//! Evaluation is a [`Visitor`](crate::ast::Visitor) pass over the tree; this module holds
//! the pass itself, its variable environment and its error type.

#![warn(missing_docs)]

mod context;
mod error;
#[allow(clippy::module_inception)]
mod evaluator;

pub use context::Environment;
pub use error::{EvaluationError, EvaluationResult};
pub use evaluator::{DEFAULT_MAX_EVAL_DEPTH, Evaluator, EvaluatorConfig};
