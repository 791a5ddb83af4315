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

//! Expression engine with a compiled-expression cache
//!
//! [`SmplEngine`] parses source text once and keeps the tree, so repeated evaluation or
//! checking of the same text skips the parser.

use rustc_hash::FxHashMap;

use crate::analyzer::{TypeChecker, TypeEnvironment};
use crate::ast::Exp;
use crate::error::Result;
use crate::evaluator::{DEFAULT_MAX_EVAL_DEPTH, Environment, Evaluator, EvaluatorConfig};
use crate::model::{Value, ValueType};
use crate::parser::{DEFAULT_MAX_DEPTH, parse_with_depth};
use crate::printer::Printer;

/// Engine settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum number of cached trees; the cache is emptied when it fills up
    pub max_cache_size: usize,
    /// Nesting limit handed to the parser
    pub max_parse_depth: usize,
    /// Depth limit for evaluation and type checking
    pub max_eval_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_cache_size: 1000,
            max_parse_depth: DEFAULT_MAX_DEPTH,
            max_eval_depth: DEFAULT_MAX_EVAL_DEPTH,
        }
    }
}

impl EngineConfig {
    /// Set the cache capacity
    pub fn with_max_cache_size(mut self, max_cache_size: usize) -> Self {
        self.max_cache_size = max_cache_size;
        self
    }

    /// Set the parser nesting limit
    pub fn with_max_parse_depth(mut self, max_parse_depth: usize) -> Self {
        self.max_parse_depth = max_parse_depth;
        self
    }

    /// Set the evaluation depth limit
    pub fn with_max_eval_depth(mut self, max_eval_depth: usize) -> Self {
        self.max_eval_depth = max_eval_depth;
        self
    }
}

/// SMPL expression engine
#[derive(Debug, Clone)]
pub struct SmplEngine {
    config: EngineConfig,
    /// Cached compiled expressions
    expression_cache: FxHashMap<String, Exp>,
}

impl Default for SmplEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SmplEngine {
    /// Create an engine with default settings
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an engine with custom settings
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            expression_cache: FxHashMap::default(),
        }
    }

    /// Current settings
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Parse `source`, reusing the cached tree when there is one
    pub fn compile(&mut self, source: &str) -> Result<&Exp> {
        if !self.expression_cache.contains_key(source) {
            let exp = parse_with_depth(source, self.config.max_parse_depth)?;
            if self.expression_cache.len() >= self.config.max_cache_size {
                log::debug!(
                    "Expression cache full ({} entries), clearing",
                    self.expression_cache.len()
                );
                self.expression_cache.clear();
            }
            return Ok(self
                .expression_cache
                .entry(source.to_string())
                .or_insert(exp));
        }
        log::trace!("Expression cache hit for {source:?}");
        Ok(&self.expression_cache[source])
    }

    /// Compile and evaluate `source`
    pub fn evaluate(&mut self, source: &str, env: &Environment) -> Result<Value> {
        let mut evaluator = Evaluator::with_config(EvaluatorConfig {
            max_depth: self.config.max_eval_depth,
        });
        let exp = self.compile(source)?;
        Ok(evaluator.evaluate(exp, env)?)
    }

    /// Compile and type check `source`
    pub fn check(&mut self, source: &str, env: &TypeEnvironment) -> Result<ValueType> {
        let mut checker = TypeChecker::with_max_depth(self.config.max_eval_depth);
        let exp = self.compile(source)?;
        Ok(checker.check(exp, env)?)
    }

    /// Compile `source` and render it in canonical form
    pub fn format(&mut self, source: &str) -> Result<String> {
        let exp = self.compile(source)?;
        Ok(Printer::print(exp))
    }

    /// Number of cached trees
    pub fn cache_len(&self) -> usize {
        self.expression_cache.len()
    }

    /// Drop every cached tree
    pub fn clear_cache(&mut self) {
        self.expression_cache.clear();
    }
}
