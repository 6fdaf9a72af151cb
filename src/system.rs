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

//! Particle snapshots and pair sources.

use crate::{PairError, Vector3};
use itertools::Itertools;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Particle positions and types at one instant
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct Snapshot {
    /// Type names; a particle's type id indexes into this
    pub types: Vec<String>,
    pub positions: Vec<Vector3>,
    pub typeid: Vec<usize>,
}

impl Snapshot {
    /// Two particles of type `A` placed symmetrically about the origin along x,
    /// a distance `d` apart.
    ///
    /// # Examples
    /// ~~~
    /// use harmonic_pair::Snapshot;
    /// let snapshot = Snapshot::two_particles(1.5);
    /// let dx = snapshot.positions[1] - snapshot.positions[0];
    /// assert_eq!(dx.norm(), 1.5);
    /// ~~~
    pub fn two_particles(d: f64) -> Self {
        Self {
            types: vec!["A".to_string()],
            positions: vec![Vector3::new(-d / 2.0, 0.0, 0.0), Vector3::new(d / 2.0, 0.0, 0.0)],
            typeid: vec![0, 0],
        }
    }

    /// Number of particles
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Type name of particle `i`
    pub fn type_of(&self, i: usize) -> Option<&str> {
        self.typeid
            .get(i)
            .and_then(|&id| self.types.get(id))
            .map(String::as_str)
    }

    /// Type names actually used by at least one particle
    pub fn present_types(&self) -> Vec<&str> {
        self.typeid
            .iter()
            .unique()
            .sorted()
            .filter_map(|&id| self.types.get(id).map(String::as_str))
            .collect()
    }

    /// Checks that type ids are in range and all positions are finite.
    pub fn validate(&self) -> Result<(), PairError> {
        if self.typeid.len() != self.positions.len() {
            return Err(PairError::InvalidSnapshot(format!(
                "{} positions but {} type ids",
                self.positions.len(),
                self.typeid.len()
            )));
        }
        if let Some((i, id)) = self
            .typeid
            .iter()
            .enumerate()
            .find(|&(_, &id)| id >= self.types.len())
        {
            return Err(PairError::InvalidSnapshot(format!(
                "particle {} has type id {} but only {} types are defined",
                i,
                id,
                self.types.len()
            )));
        }
        if let Some(i) = self
            .positions
            .iter()
            .position(|p| !p.iter().all(|x| x.is_finite()))
        {
            return Err(PairError::InvalidSnapshot(format!(
                "particle {} has a non-finite position",
                i
            )));
        }
        Ok(())
    }
}

/// Every unordered pair `(i, j)` with `i < j` among `n` particles.
///
/// A brute force pair source for small systems; there is no spatial sorting.
///
/// # Examples
/// ~~~
/// use harmonic_pair::all_pairs;
/// assert_eq!(all_pairs(3), vec![(0, 1), (0, 2), (1, 2)]);
/// ~~~
pub fn all_pairs(n: usize) -> Vec<(usize, usize)> {
    (0..n).tuple_combinations().collect()
}
