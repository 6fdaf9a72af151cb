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

//! # Energy shift modes
//!
//! Smoothing of a truncated pair potential near its cutoff. These are applied
//! generically on top of any [`IsotropicTwobodyEnergy`] so that individual
//! potentials only provide their plain, unshifted law.

use crate::twobody::{IsotropicTwobodyEnergy, PairEvaluation};
use crate::PairError;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;

/// The fixed set of accepted mode names
pub const ACCEPTED_MODES: [&str; 3] = ["none", "shift", "xplor"];

/// How the energy is treated near the cutoff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(rename_all = "lowercase")
)]
pub enum EnergyShiftMode {
    /// Plain truncation; the energy jumps to zero at the cutoff
    #[default]
    None,
    /// Energy shifted by its value at the cutoff, 𝑈(𝑟) - 𝑈(𝑟꜀)
    Shift,
    /// XPLOR switching between `r_on` and `r_cut`
    Xplor,
}

impl FromStr for EnergyShiftMode {
    type Err = PairError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "shift" => Ok(Self::Shift),
            "xplor" => Ok(Self::Xplor),
            _ => Err(PairError::UnknownMode(s.to_string())),
        }
    }
}

impl Display for EnergyShiftMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => ACCEPTED_MODES[0],
            Self::Shift => ACCEPTED_MODES[1],
            Self::Xplor => ACCEPTED_MODES[2],
        };
        write!(f, "{}", name)
    }
}

/// XPLOR switching function and its radial derivative divided by r.
///
/// For r²_on < r² < r²_c,
/// $$ S = \frac{(r_c^2 - r^2)^2 (r_c^2 + 2r^2 - 3r_{on}^2)}{(r_c^2 - r_{on}^2)^3} $$
/// and S = 1 below r_on. Returns `(S, (dS/dr)/r)`.
///
/// # Examples
/// ~~~
/// use harmonic_pair::smoothing::xplor_switch;
/// let (s, _) = xplor_switch(0.25, 0.25, 1.0);
/// assert_eq!(s, 1.0);
/// let (s, ds) = xplor_switch(1.0, 0.25, 1.0);
/// assert_eq!((s, ds), (0.0, 0.0));
/// ~~~
pub fn xplor_switch(distance_squared: f64, r_on_squared: f64, cutoff_squared: f64) -> (f64, f64) {
    if distance_squared <= r_on_squared {
        return (1.0, 0.0);
    }
    let rc2_minus_r2 = cutoff_squared - distance_squared;
    let denominator = (cutoff_squared - r_on_squared).powi(3);
    let s = rc2_minus_r2 * rc2_minus_r2
        * (cutoff_squared + 2.0 * distance_squared - 3.0 * r_on_squared)
        / denominator;
    let ds_dr_divr = -12.0 * (distance_squared - r_on_squared) * rc2_minus_r2 / denominator;
    (s, ds_dr_divr)
}

impl EnergyShiftMode {
    /// Evaluate `potential` at `distance_squared` with this shift mode applied.
    ///
    /// Pairs at or beyond the cutoff give zero force and energy. The returned
    /// force is the magnitude along the separation, positive when repulsive.
    /// In xplor mode with `r_on ≥ r_cut` the potential is shifted instead.
    pub fn apply<T: IsotropicTwobodyEnergy + ?Sized>(
        &self,
        potential: &T,
        distance_squared: f64,
        cutoff_squared: f64,
        r_on_squared: f64,
    ) -> PairEvaluation {
        if distance_squared >= cutoff_squared {
            return PairEvaluation::default();
        }
        let mut evaluation = potential.isotropic_twobody_force_energy(distance_squared);
        match self {
            Self::None => {}
            Self::Shift => {
                evaluation.energy -= potential.isotropic_twobody_energy(cutoff_squared);
            }
            Self::Xplor if r_on_squared >= cutoff_squared => {
                evaluation.energy -= potential.isotropic_twobody_energy(cutoff_squared);
            }
            Self::Xplor => {
                let (s, ds_dr_divr) = xplor_switch(distance_squared, r_on_squared, cutoff_squared);
                // F = -dU/dr, so d(U·S)/dr turns into F·S - U·dS/dr
                let r = distance_squared.sqrt();
                evaluation.force = evaluation.force * s - evaluation.energy * ds_dr_divr * r;
                evaluation.energy *= s;
            }
        }
        evaluation
    }
}
