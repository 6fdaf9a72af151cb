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

//! ## Twobody interactions
//!
//! Module for describing exactly two particles interacting with each other.

pub use crate::Vector3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

mod harmonic;
pub use self::harmonic::{evaluate_pair, Harmonic};

/// Force magnitude and potential energy of a single pair
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct PairEvaluation {
    /// Force magnitude along the separation vector; positive is repulsive
    pub force: f64,
    /// Pair energy, before splitting between the two particles
    pub energy: f64,
}

/// Potential energy between a pair of isotropic particles, 𝑈(𝑟)
///
/// Implementations are stateless and read-only during evaluation, so a single
/// instance can be shared between threads evaluating different pairs.
pub trait IsotropicTwobodyEnergy: Debug + Send + Sync {
    /// Interaction energy between a pair of isotropic particles.
    fn isotropic_twobody_energy(&self, distance_squared: f64) -> f64;

    /// Force magnitude due to an isotropic interaction potential, 𝐹(𝑟) = -d𝑈/d𝑟
    ///
    /// The default implementation uses a central difference to calculate the force
    /// and should be overridden with the exact analytical expression for better speed
    /// and accuracy. Close to contact the lower sample is clamped to r = 0.
    fn isotropic_twobody_force(&self, distance_squared: f64) -> f64 {
        const EPS: f64 = 1e-6;
        let r = distance_squared.sqrt();
        let (lower, upper) = ((r - EPS).max(0.0), r + EPS);
        let delta_u = self.isotropic_twobody_energy(upper.powi(2))
            - self.isotropic_twobody_energy(lower.powi(2));
        -delta_u / (upper - lower)
    }

    /// Force magnitude and energy in one go
    fn isotropic_twobody_force_energy(&self, distance_squared: f64) -> PairEvaluation {
        PairEvaluation {
            force: self.isotropic_twobody_force(distance_squared),
            energy: self.isotropic_twobody_energy(distance_squared),
        }
    }
}

impl<T: IsotropicTwobodyEnergy + ?Sized> IsotropicTwobodyEnergy for Box<T> {
    #[inline]
    fn isotropic_twobody_energy(&self, distance_squared: f64) -> f64 {
        (**self).isotropic_twobody_energy(distance_squared)
    }
    #[inline]
    fn isotropic_twobody_force(&self, distance_squared: f64) -> f64 {
        (**self).isotropic_twobody_force(distance_squared)
    }
    #[inline]
    fn isotropic_twobody_force_energy(&self, distance_squared: f64) -> PairEvaluation {
        (**self).isotropic_twobody_force_energy(distance_squared)
    }
}
