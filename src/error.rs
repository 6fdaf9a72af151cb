// Copyright 2023 Mikael Lund
//
// Licensed under the Apache license, version 2.0 (the "license");
// you may not use this file except in compliance with the license.
// You may obtain a copy of the license at
//
//     http://www.apache.org/licenses/license-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the license is distributed on an "as is" basis,
// without warranties or conditions of any kind, either express or implied.
// See the license for the specific language governing permissions and
// limitations under the license.

//! Error types.

use crate::typeparam::TypePair;
use thiserror::Error;

/// Errors raised when configuring or evaluating a pair potential.
///
/// All of these are hard failures: nothing is silently defaulted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PairError {
    /// Energy shift mode not among `none`, `shift`, `xplor`
    #[error("unknown energy shift mode '{0}', expected one of: none, shift, xplor")]
    UnknownMode(String),

    /// Negative or non-finite parameter
    #[error("invalid value for '{name}': {value} (must be finite and non-negative)")]
    InvalidParameter { name: &'static str, value: f64 },

    /// A type pair present in the system has no value in a parameter table
    #[error("missing '{table}' for type pair {pair}")]
    MissingParameter { table: &'static str, pair: TypePair },

    /// Two particles inside the cutoff sit on top of each other
    #[error("particles {i} and {j} have zero separation; force direction is undefined")]
    ZeroSeparation { i: usize, j: usize },

    /// Inconsistent particle data
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}
