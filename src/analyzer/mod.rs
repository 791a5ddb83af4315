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

//! Static analysis for SMPL expressions
//!
//! The type checker infers the [`ValueType`](crate::model::ValueType) of an expression
//! from the declared types of its variables, rejecting trees that would fail evaluation
//! for type reasons alone.

#![warn(missing_docs)]

pub mod error;
pub mod type_checker;

pub use error::{TypeError, TypeResult};
pub use type_checker::{TypeChecker, TypeEnvironment};
