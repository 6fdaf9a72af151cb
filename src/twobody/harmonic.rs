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

//! Implementation of the harmonic pair potential.

use super::{IsotropicTwobodyEnergy, PairEvaluation};
use crate::typeparam::TypeParameter;
use crate::{check_non_negative, EnergyShiftMode, Info, PairError};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Harmonic pair potential
///
/// $$ u(r) = \frac{1}{2} k (\sigma - r)^2 $$
///
/// with force magnitude $F = k(\sigma - r)$ along the separation: repulsive
/// for $r < \sigma$, attractive beyond. The force is finite at $r = 0$, but its
/// direction is not, which is left for the caller to guard.
///
/// # Examples
/// ~~~
/// use harmonic_pair::twobody::{Harmonic, IsotropicTwobodyEnergy};
/// let harmonic = Harmonic::new(0.5, 0.5);
/// let r: f64 = 0.1;
/// assert!((harmonic.isotropic_twobody_energy(r * r) - 0.04).abs() < 1e-12);
/// assert!((harmonic.isotropic_twobody_force(r * r) - 0.2).abs() < 1e-12);
/// ~~~
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(deny_unknown_fields)
)]
pub struct Harmonic {
    /// Spring constant
    pub k: f64,
    /// Equilibrium distance
    #[cfg_attr(feature = "serde", serde(alias = "σ"))]
    pub sigma: f64,
}

impl Harmonic {
    /// Create a new harmonic potential from the spring constant and equilibrium distance
    pub const fn new(k: f64, sigma: f64) -> Self {
        Self { k, sigma }
    }
}

impl IsotropicTwobodyEnergy for Harmonic {
    #[inline]
    fn isotropic_twobody_energy(&self, distance_squared: f64) -> f64 {
        0.5 * self.k * (self.sigma - distance_squared.sqrt()).powi(2)
    }

    #[inline]
    fn isotropic_twobody_force(&self, distance_squared: f64) -> f64 {
        self.k * (self.sigma - distance_squared.sqrt())
    }

    #[inline]
    fn isotropic_twobody_force_energy(&self, distance_squared: f64) -> PairEvaluation {
        let stretch = self.sigma - distance_squared.sqrt();
        PairEvaluation {
            force: self.k * stretch,
            energy: 0.5 * self.k * stretch * stretch,
        }
    }
}

impl TypeParameter for Harmonic {
    fn validate(&self, _name: &'static str) -> Result<(), PairError> {
        check_non_negative("k", self.k)?;
        check_non_negative("sigma", self.sigma)?;
        Ok(())
    }
}

impl Info for Harmonic {
    fn short_name(&self) -> Option<&'static str> {
        Some("harmonic")
    }
    fn long_name(&self) -> Option<&'static str> {
        Some("Harmonic pair potential")
    }
    fn citation(&self) -> Option<&'static str> {
        Some("https://en.wikipedia.org/wiki/Harmonic_oscillator")
    }
}

/// Force magnitude and energy of a single harmonic pair at distance `r`.
///
/// Pairs at or beyond `r_cut` do not interact. In [`EnergyShiftMode::Xplor`]
/// the plain energy is returned since switching is applied by the pair loop,
/// see [`EnergyShiftMode::apply`].
///
/// # Examples
/// ~~~
/// use harmonic_pair::{evaluate_pair, EnergyShiftMode};
/// let pair = evaluate_pair(0.1, 0.5, 0.5, 0.5, EnergyShiftMode::Shift);
/// assert!((pair.energy - 0.04).abs() < 1e-12);
/// assert!((pair.force - 0.2).abs() < 1e-12);
/// ~~~
pub fn evaluate_pair(
    r: f64,
    k: f64,
    sigma: f64,
    r_cut: f64,
    mode: EnergyShiftMode,
) -> PairEvaluation {
    let harmonic = Harmonic::new(k, sigma);
    let mode = match mode {
        EnergyShiftMode::Xplor => EnergyShiftMode::None,
        other => other,
    };
    mode.apply(&harmonic, r * r, r_cut * r_cut, 0.0)
}
