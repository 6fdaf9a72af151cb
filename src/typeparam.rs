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

//! # Per type-pair parameters
//!
//! Parameters of a pair potential are set per unordered pair of particle
//! types, so that looking up `(A, B)` and `(B, A)` gives the same value.
//! Values are validated when inserted.

use crate::{check_non_negative, PairError};
use itertools::Itertools;
use std::collections::HashMap;
use std::fmt::{self, Display};

/// Unordered pair of particle type names
///
/// The names are stored in lexicographic order so that both orderings
/// compare and hash identically.
///
/// # Examples
/// ~~~
/// use harmonic_pair::TypePair;
/// assert_eq!(TypePair::new("B", "A"), TypePair::new("A", "B"));
/// assert_eq!(TypePair::new("B", "A").to_string(), "(A, B)");
/// ~~~
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypePair(String, String);

impl TypePair {
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        let (a, b) = (a.into(), b.into());
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }
    /// Type names in canonical order
    pub fn types(&self) -> (&str, &str) {
        (&self.0, &self.1)
    }
}

impl Display for TypePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

/// Values that can be stored in a [`TypeParameterDict`]
pub trait TypeParameter {
    /// Check the value before it is accepted; `name` is the name of the table
    fn validate(&self, name: &'static str) -> Result<(), PairError>;
}

/// Distances such as `r_cut` and `r_on`
impl TypeParameter for f64 {
    fn validate(&self, name: &'static str) -> Result<(), PairError> {
        check_non_negative(name, *self).map(|_| ())
    }
}

/// Symmetric table of values keyed by [`TypePair`], with an optional default
#[derive(Debug, Clone, PartialEq)]
pub struct TypeParameterDict<T> {
    name: &'static str,
    default: Option<T>,
    values: HashMap<TypePair, T>,
}

impl<T: TypeParameter> TypeParameterDict<T> {
    /// Empty table without default
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            default: None,
            values: HashMap::new(),
        }
    }

    /// Empty table where unset pairs fall back to `default`
    pub fn with_default(name: &'static str, default: Option<T>) -> Result<Self, PairError> {
        let mut dict = Self::new(name);
        dict.set_default(default)?;
        Ok(dict)
    }

    /// Name of the table, e.g. `params` or `r_cut`
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn default_value(&self) -> Option<&T> {
        self.default.as_ref()
    }

    pub fn set_default(&mut self, default: Option<T>) -> Result<(), PairError> {
        if let Some(value) = &default {
            value.validate(self.name)?;
        }
        self.default = default;
        Ok(())
    }

    /// Set the value for the type pair `(a, b)`, returning any previous explicit value.
    ///
    /// Invalid values are rejected and leave the table unchanged.
    pub fn insert(
        &mut self,
        a: impl Into<String>,
        b: impl Into<String>,
        value: T,
    ) -> Result<Option<T>, PairError> {
        value.validate(self.name)?;
        let pair = TypePair::new(a, b);
        log::debug!("set {}{}", self.name, pair);
        Ok(self.values.insert(pair, value))
    }

    /// Value for `(a, b)`, falling back to the default
    pub fn get(&self, a: &str, b: &str) -> Option<&T> {
        self.get_pair(&TypePair::new(a, b))
    }

    pub fn get_pair(&self, pair: &TypePair) -> Option<&T> {
        self.values.get(pair).or(self.default.as_ref())
    }

    /// Remove an explicitly set value; the default, if any, applies again
    pub fn remove(&mut self, a: &str, b: &str) -> Option<T> {
        self.values.remove(&TypePair::new(a, b))
    }

    /// True if `(a, b)` resolves to a value, explicitly or through the default
    pub fn contains(&self, a: &str, b: &str) -> bool {
        self.get(a, b).is_some()
    }

    /// Number of explicitly set type pairs
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Explicitly set values in canonical type pair order
    pub fn iter(&self) -> impl Iterator<Item = (&TypePair, &T)> {
        self.values.iter().sorted_by(|a, b| a.0.cmp(b.0))
    }

    /// Checks that every pair drawn from `types`, including self-pairs, has a value.
    pub fn require_complete<S: AsRef<str>>(&self, types: &[S]) -> Result<(), PairError> {
        types
            .iter()
            .combinations_with_replacement(2)
            .map(|pair| {
                let (a, b): (&str, &str) = (pair[0].as_ref(), pair[1].as_ref());
                TypePair::new(a, b)
            })
            .find(|pair| self.get_pair(pair).is_none())
            .map_or(Ok(()), |pair| {
                Err(PairError::MissingParameter {
                    table: self.name,
                    pair,
                })
            })
    }

    /// Resolve values into a dense, symmetric `types.len()²` matrix indexed by type id.
    pub(crate) fn resolve<S: AsRef<str>>(&self, types: &[S]) -> Result<Vec<&T>, PairError> {
        let n = types.len();
        let mut matrix = Vec::with_capacity(n * n);
        for (a, b) in types.iter().cartesian_product(types.iter()) {
            let (a, b): (&str, &str) = (a.as_ref(), b.as_ref());
            let pair = TypePair::new(a, b);
            match self.get_pair(&pair) {
                Some(value) => matrix.push(value),
                None => {
                    return Err(PairError::MissingParameter {
                        table: self.name,
                        pair,
                    })
                }
            }
        }
        Ok(matrix)
    }
}
