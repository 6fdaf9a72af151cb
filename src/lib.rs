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

//! # Harmonic pair
//!
//! A harmonic-style pair potential for molecular simulations together with
//! the plumbing needed to drive it: symmetric per-type-pair parameter tables,
//! energy shift modes (`none`, `shift`, `xplor`) and a reference pair loop
//! that accumulates per-particle forces, energies and virials.
//!
//! ## Examples
//! ~~~
//! use harmonic_pair::{EnergyShiftMode, Harmonic, PotentialPair, Snapshot, all_pairs};
//!
//! let mut pair = PotentialPair::new(Some(0.5), 0.0, EnergyShiftMode::None).unwrap();
//! pair.params.insert("A", "A", Harmonic::new(0.5, 0.5)).unwrap();
//!
//! let snapshot = Snapshot::two_particles(0.1);
//! let result = pair.compute(&snapshot, all_pairs(snapshot.len())).unwrap();
//! assert!((result.total_energy() - 0.04).abs() < 1e-12);
//! ~~~

#[cfg(test)]
extern crate approx;

/// A point in 3D space
pub type Vector3 = nalgebra::Vector3<f64>;

#[cfg(feature = "serde")]
pub mod config;
mod error;
pub mod pair;
pub mod smoothing;
pub mod system;
pub mod twobody;
pub mod typeparam;

#[cfg(feature = "serde")]
pub use config::{PairConfig, PairEntry};
pub use error::PairError;
pub use pair::{PairForces, PotentialPair};
pub use smoothing::EnergyShiftMode;
pub use system::{all_pairs, Snapshot};
pub use twobody::{evaluate_pair, Harmonic, IsotropicTwobodyEnergy, PairEvaluation};
pub use typeparam::{TypePair, TypeParameterDict};

/// Defines a cutoff distance
pub trait Cutoff {
    /// Squared cutoff distance
    fn cutoff_squared(&self) -> f64 {
        self.cutoff().powi(2)
    }

    /// Cutoff distance
    fn cutoff(&self) -> f64;
}

/// Descriptive information about an interaction
pub trait Info {
    /// Short name, e.g. used in log output
    fn short_name(&self) -> Option<&'static str> {
        None
    }
    /// Long, human readable name
    fn long_name(&self) -> Option<&'static str> {
        None
    }
    /// Reference or URL describing the interaction
    fn citation(&self) -> Option<&'static str> {
        None
    }
}

/// Checks that a parameter is finite and non-negative.
pub(crate) fn check_non_negative(name: &'static str, value: f64) -> Result<f64, PairError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(PairError::InvalidParameter { name, value })
    }
}
