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

//! Error types for the value model

use thiserror::Error;

/// Errors raised when reading values or type names from text
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Text that is neither a number nor a boolean
    #[error("Cannot read '{text}' as a value")]
    InvalidValue {
        /// The rejected text
        text: String,
    },

    /// Unknown type name
    #[error("Unknown type '{name}', expected Integer, Real or Boolean")]
    UnknownType {
        /// The rejected name
        name: String,
    },
}
