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

//! # Pair loop
//!
//! [`PotentialPair`] couples a pair potential with its per type-pair
//! parameters, cutoffs and energy shift mode, and accumulates forces,
//! energies and virials over a list of particle pairs.
//!
//! For a pair `(i, j)` with separation `dx = rᵢ - rⱼ`, particle `i` receives
//! the force `(F/r)·dx` and `j` the opposite. The pair energy and virial are
//! split evenly between the two particles.

use crate::smoothing::EnergyShiftMode;
use crate::twobody::IsotropicTwobodyEnergy;
use crate::typeparam::{TypeParameter, TypeParameterDict};
use crate::{Cutoff, Info, PairError, Snapshot, Vector3};
use rayon::prelude::*;

/// Per-particle forces, energies and virials from a pair potential
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PairForces {
    pub forces: Vec<Vector3>,
    pub energies: Vec<f64>,
    /// Virial components (xx, xy, xz, yy, yz, zz)
    pub virials: Vec<[f64; 6]>,
}

impl PairForces {
    /// Zero contributions for `n` particles
    pub fn zeros(n: usize) -> Self {
        Self {
            forces: vec![Vector3::zeros(); n],
            energies: vec![0.0; n],
            virials: vec![[0.0; 6]; n],
        }
    }

    /// Number of particles
    pub fn len(&self) -> usize {
        self.energies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.energies.is_empty()
    }

    /// Sum of the per-particle energies
    pub fn total_energy(&self) -> f64 {
        self.energies.iter().sum()
    }

    /// Sum of the per-particle forces; zero up to rounding for pair forces
    pub fn total_force(&self) -> Vector3 {
        self.forces.iter().sum()
    }

    /// Sum of the per-particle virials
    pub fn total_virial(&self) -> [f64; 6] {
        self.virials.iter().fold([0.0; 6], |mut total, virial| {
            total.iter_mut().zip(virial).for_each(|(t, v)| *t += v);
            total
        })
    }

    /// Add the contribution of one pair; `dx = rᵢ - rⱼ`.
    fn add_pair(&mut self, i: usize, j: usize, dx: &Vector3, force_divr: f64, energy: f64) {
        let force = dx * force_divr;
        self.forces[i] += force;
        self.forces[j] -= force;

        let half_energy = 0.5 * energy;
        self.energies[i] += half_energy;
        self.energies[j] += half_energy;

        let half_force_divr = 0.5 * force_divr;
        let virial = [
            half_force_divr * dx.x * dx.x,
            half_force_divr * dx.x * dx.y,
            half_force_divr * dx.x * dx.z,
            half_force_divr * dx.y * dx.y,
            half_force_divr * dx.y * dx.z,
            half_force_divr * dx.z * dx.z,
        ];
        for particle in [i, j] {
            self.virials[particle]
                .iter_mut()
                .zip(&virial)
                .for_each(|(w, v)| *w += v);
        }
    }

    /// Element-wise sum of two sets of contributions for the same particles
    fn merge(mut self, other: Self) -> Self {
        self.forces
            .iter_mut()
            .zip(&other.forces)
            .for_each(|(a, b)| *a += b);
        self.energies
            .iter_mut()
            .zip(&other.energies)
            .for_each(|(a, b)| *a += b);
        self.virials.iter_mut().zip(&other.virials).for_each(|(a, b)| {
            a.iter_mut().zip(b).for_each(|(w, v)| *w += v);
        });
        self
    }
}

/// Parameters resolved into dense matrices indexed by type id
struct ResolvedTable<'a, T> {
    n_types: usize,
    params: Vec<&'a T>,
    cutoff_squared: Vec<f64>,
    r_on_squared: Vec<f64>,
}

impl<'a, T: Info> ResolvedTable<'a, T> {
    #[inline]
    fn index(&self, type_i: usize, type_j: usize) -> usize {
        type_i * self.n_types + type_j
    }

    /// Short name of the potential for log output
    fn name(&self) -> &'static str {
        self.params
            .first()
            .and_then(|params| params.short_name())
            .unwrap_or("pair potential")
    }
}

/// Pair potential together with its per type-pair parameters
///
/// # Examples
/// ~~~
/// use harmonic_pair::{all_pairs, EnergyShiftMode, Harmonic, PotentialPair, Snapshot};
///
/// let mut pair = PotentialPair::new(Some(1.0), 0.0, EnergyShiftMode::Shift).unwrap();
/// pair.params.insert("A", "A", Harmonic::new(2.0, 1.0)).unwrap();
///
/// let snapshot = Snapshot::two_particles(0.5);
/// let result = pair.compute(&snapshot, all_pairs(2)).unwrap();
/// // pushed apart along x
/// assert!(result.forces[0].x < 0.0 && result.forces[1].x > 0.0);
/// assert_eq!(result.energies[0], result.energies[1]);
/// ~~~
#[derive(Debug, Clone, PartialEq)]
pub struct PotentialPair<T> {
    /// Potential parameters per type pair
    pub params: TypeParameterDict<T>,
    /// Cutoff radius per type pair
    pub r_cut: TypeParameterDict<f64>,
    /// XPLOR switching onset per type pair
    pub r_on: TypeParameterDict<f64>,
    mode: EnergyShiftMode,
}

impl<T: IsotropicTwobodyEnergy + TypeParameter + Info> PotentialPair<T> {
    /// New pair potential without any parameters set.
    ///
    /// With `default_r_cut` set to `None`, every type pair needs an explicit
    /// `r_cut` before forces can be computed.
    pub fn new(
        default_r_cut: Option<f64>,
        default_r_on: f64,
        mode: EnergyShiftMode,
    ) -> Result<Self, PairError> {
        let pair = Self {
            params: TypeParameterDict::new("params"),
            r_cut: TypeParameterDict::with_default("r_cut", default_r_cut)?,
            r_on: TypeParameterDict::with_default("r_on", Some(default_r_on))?,
            mode,
        };
        log::info!(
            "pair potential with mode '{}', default r_cut {:?}, default r_on {}",
            mode,
            default_r_cut,
            default_r_on
        );
        Ok(pair)
    }

    pub fn mode(&self) -> EnergyShiftMode {
        self.mode
    }

    /// Change the energy shift mode, e.g. between simulation steps
    pub fn set_mode(&mut self, mode: EnergyShiftMode) {
        log::debug!("energy shift mode '{}' -> '{}'", self.mode, mode);
        self.mode = mode;
    }

    /// Resolve all tables for the snapshot's types, failing on the first missing value
    fn resolve<'a>(&'a self, types: &[String]) -> Result<ResolvedTable<'a, T>, PairError> {
        let params = self.params.resolve(types)?;
        let cutoff_squared: Vec<f64> = self
            .r_cut
            .resolve(types)?
            .into_iter()
            .map(|r_cut| r_cut * r_cut)
            .collect();
        let r_on_squared: Vec<f64> = self
            .r_on
            .resolve(types)?
            .into_iter()
            .map(|r_on| r_on * r_on)
            .collect();
        if self.mode == EnergyShiftMode::Xplor {
            if let Some(index) = r_on_squared
                .iter()
                .zip(&cutoff_squared)
                .position(|(r_on2, rc2)| r_on2 >= rc2)
            {
                let (a, b) = (&types[index / types.len()], &types[index % types.len()]);
                log::debug!("r_on >= r_cut for ({}, {}); xplor falls back to shift", a, b);
            }
        }
        Ok(ResolvedTable {
            n_types: types.len(),
            params,
            cutoff_squared,
            r_on_squared,
        })
    }

    /// Evaluate pair `(i, j)` and add its contribution to `forces`
    fn accumulate(
        &self,
        table: &ResolvedTable<T>,
        snapshot: &Snapshot,
        (i, j): (usize, usize),
        forces: &mut PairForces,
    ) -> Result<bool, PairError> {
        let n = snapshot.len();
        if i >= n || j >= n || i == j {
            return Err(PairError::InvalidSnapshot(format!(
                "invalid pair ({}, {}) for {} particles",
                i, j, n
            )));
        }
        let index = table.index(snapshot.typeid[i], snapshot.typeid[j]);
        let cutoff_squared = table.cutoff_squared[index];
        let dx = snapshot.positions[i] - snapshot.positions[j];
        let distance_squared = dx.norm_squared();
        if distance_squared >= cutoff_squared {
            return Ok(false);
        }
        if distance_squared == 0.0 {
            return Err(PairError::ZeroSeparation { i, j });
        }
        let evaluation = self.mode.apply(
            table.params[index],
            distance_squared,
            cutoff_squared,
            table.r_on_squared[index],
        );
        let force_divr = evaluation.force / distance_squared.sqrt();
        forces.add_pair(i, j, &dx, force_divr, evaluation.energy);
        Ok(true)
    }

    /// Forces, energies and virials from all `pairs` within their cutoff.
    ///
    /// Every pair of types defined in the snapshot must have parameters and a
    /// cutoff; this is checked before any pair is evaluated.
    pub fn compute(
        &self,
        snapshot: &Snapshot,
        pairs: impl IntoIterator<Item = (usize, usize)>,
    ) -> Result<PairForces, PairError> {
        snapshot.validate()?;
        let table = self.resolve(&snapshot.types)?;
        let mut forces = PairForces::zeros(snapshot.len());
        let mut n_interacting = 0;
        for pair in pairs {
            if self.accumulate(&table, snapshot, pair, &mut forces)? {
                n_interacting += 1;
            }
        }
        log::trace!(
            "{}: {} interacting pairs among types {:?}, total energy {}",
            table.name(),
            n_interacting,
            snapshot.present_types(),
            forces.total_energy()
        );
        Ok(forces)
    }

    /// Same as [`PotentialPair::compute`] but evaluates pairs on the rayon thread pool.
    ///
    /// Each worker accumulates into its own buffer which are then summed, so
    /// results agree with `compute` up to summation order.
    pub fn par_compute(
        &self,
        snapshot: &Snapshot,
        pairs: &[(usize, usize)],
    ) -> Result<PairForces, PairError> {
        snapshot.validate()?;
        let table = self.resolve(&snapshot.types)?;
        let n = snapshot.len();
        let forces = pairs
            .par_iter()
            .try_fold(
                || PairForces::zeros(n),
                |mut forces, &pair| {
                    self.accumulate(&table, snapshot, pair, &mut forces)?;
                    Ok::<_, PairError>(forces)
                },
            )
            .try_reduce(|| PairForces::zeros(n), |a, b| Ok(a.merge(b)))?;
        log::trace!(
            "{}: {} pairs on {} threads, total energy {}",
            table.name(),
            pairs.len(),
            rayon::current_num_threads(),
            forces.total_energy()
        );
        Ok(forces)
    }
}

/// Largest cutoff over all explicitly set type pairs and the default
impl<T> Cutoff for PotentialPair<T> {
    fn cutoff(&self) -> f64 {
        self.r_cut
            .iter()
            .map(|(_, r_cut)| *r_cut)
            .chain(self.r_cut.default_value().copied())
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{all_pairs, Harmonic, TypePair};
    use approx::assert_relative_eq;

    fn harmonic_pair(
        k: f64,
        sigma: f64,
        r_cut: f64,
        mode: EnergyShiftMode,
    ) -> PotentialPair<Harmonic> {
        let mut pair = PotentialPair::new(Some(r_cut), 0.0, mode).unwrap();
        pair.params.insert("A", "A", Harmonic::new(k, sigma)).unwrap();
        pair
    }

    #[test]
    fn test_two_particles_none() {
        let pair = harmonic_pair(0.5, 0.5, 0.5, EnergyShiftMode::None);
        let snapshot = Snapshot::two_particles(0.1);
        let result = pair.compute(&snapshot, all_pairs(2)).unwrap();
        // f = k(σ - r) along r₁ - r₀ = +x
        assert_relative_eq!(result.forces[1].x, 0.2, epsilon = 1e-12);
        assert_relative_eq!(result.forces[0].x, -0.2, epsilon = 1e-12);
        assert_relative_eq!(result.forces[0].y, 0.0);
        assert_relative_eq!(result.energies[0], 0.02, epsilon = 1e-12);
        assert_relative_eq!(result.energies[1], 0.02, epsilon = 1e-12);
        assert_relative_eq!(result.total_energy(), 0.04, epsilon = 1e-12);
    }

    #[test]
    fn test_beyond_cutoff() {
        let pair = harmonic_pair(5.0, 1.0, 1.0, EnergyShiftMode::Shift);
        for d in [1.0, 1.5] {
            let result = pair.compute(&Snapshot::two_particles(d), all_pairs(2)).unwrap();
            assert_eq!(result, PairForces::zeros(2));
        }
    }

    #[test]
    fn test_newtons_third_law_and_virial() {
        let mut pair = harmonic_pair(2.0, 1.0, 3.0, EnergyShiftMode::None);
        pair.params.insert("A", "B", Harmonic::new(1.0, 1.5)).unwrap();
        pair.params.insert("B", "B", Harmonic::new(4.0, 0.5)).unwrap();
        let snapshot = Snapshot {
            types: vec!["A".into(), "B".into()],
            positions: vec![
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(0.7, 0.2, -0.1),
                Vector3::new(-0.3, 0.9, 0.4),
                Vector3::new(1.1, -0.6, 0.8),
            ],
            typeid: vec![0, 1, 0, 1],
        };
        let result = pair.compute(&snapshot, all_pairs(4)).unwrap();
        let total_force = result.total_force();
        assert_relative_eq!(total_force.norm(), 0.0, epsilon = 1e-12);

        // virial of a pair is ½·(F/r)·dx⊗dx per particle, summing to (F/r)·dx⊗dx
        let mut expected = [0.0; 6];
        for (i, j) in all_pairs(4) {
            let dx = snapshot.positions[i] - snapshot.positions[j];
            let r = dx.norm();
            let params = pair
                .params
                .get(snapshot.type_of(i).unwrap(), snapshot.type_of(j).unwrap())
                .unwrap();
            let force_divr = params.isotropic_twobody_force(r * r) / r;
            let components = [
                dx.x * dx.x,
                dx.x * dx.y,
                dx.x * dx.z,
                dx.y * dx.y,
                dx.y * dx.z,
                dx.z * dx.z,
            ];
            for (e, c) in expected.iter_mut().zip(components) {
                *e += force_divr * c;
            }
        }
        for (w, e) in result.total_virial().iter().zip(expected) {
            assert_relative_eq!(*w, e, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_parallel_matches_serial() {
        let pair = harmonic_pair(3.0, 1.0, 1.6, EnergyShiftMode::Xplor);
        let positions: Vec<Vector3> = (0..60)
            .map(|i| {
                let t = i as f64;
                Vector3::new((0.37 * t).sin() * 3.0, (0.53 * t).cos() * 3.0, 0.05 * t)
            })
            .collect();
        let snapshot = Snapshot {
            types: vec!["A".into()],
            typeid: vec![0; positions.len()],
            positions,
        };
        let pairs = all_pairs(snapshot.len());
        let serial = pair.compute(&snapshot, pairs.iter().copied()).unwrap();
        let parallel = pair.par_compute(&snapshot, &pairs).unwrap();
        assert_relative_eq!(serial.total_energy(), parallel.total_energy(), epsilon = 1e-10);
        for (a, b) in serial.forces.iter().zip(&parallel.forces) {
            assert_relative_eq!((a - b).norm(), 0.0, epsilon = 1e-10);
        }
        for (a, b) in serial.energies.iter().zip(&parallel.energies) {
            assert_relative_eq!(*a, *b, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_zero_separation() {
        let pair = harmonic_pair(1.0, 1.0, 1.0, EnergyShiftMode::None);
        let snapshot = Snapshot::two_particles(0.0);
        assert_eq!(
            pair.compute(&snapshot, all_pairs(2)),
            Err(PairError::ZeroSeparation { i: 0, j: 1 })
        );
        assert_eq!(
            pair.par_compute(&snapshot, &all_pairs(2)),
            Err(PairError::ZeroSeparation { i: 0, j: 1 })
        );
    }

    #[test]
    fn test_zero_cutoff_disables_pair() {
        let pair = harmonic_pair(1.0, 1.0, 0.0, EnergyShiftMode::None);
        let result = pair.compute(&Snapshot::two_particles(0.0), all_pairs(2)).unwrap();
        assert_eq!(result.total_energy(), 0.0);
    }

    #[test]
    fn test_missing_parameters() {
        let pair: PotentialPair<Harmonic> =
            PotentialPair::new(Some(1.0), 0.0, EnergyShiftMode::None).unwrap();
        assert_eq!(
            pair.compute(&Snapshot::two_particles(0.5), all_pairs(2)),
            Err(PairError::MissingParameter {
                table: "params",
                pair: TypePair::new("A", "A"),
            })
        );

        let mut pair: PotentialPair<Harmonic> =
            PotentialPair::new(None, 0.0, EnergyShiftMode::None).unwrap();
        pair.params.insert("A", "A", Harmonic::new(1.0, 1.0)).unwrap();
        let snapshot = Snapshot::two_particles(0.5);
        assert!(matches!(
            pair.compute(&snapshot, all_pairs(2)),
            Err(PairError::MissingParameter { table: "r_cut", .. })
        ));
        pair.r_cut.insert("A", "A", 1.0).unwrap();
        assert!(pair.compute(&snapshot, all_pairs(2)).is_ok());

        // a defined type without particles still needs parameters
        let mut snapshot = Snapshot::two_particles(0.5);
        snapshot.types.push("B".into());
        assert!(pair.compute(&snapshot, all_pairs(2)).is_err());
    }

    #[test]
    fn test_invalid_construction_and_pairs() {
        assert!(PotentialPair::<Harmonic>::new(Some(-1.0), 0.0, EnergyShiftMode::None).is_err());
        let nan_r_on = PotentialPair::<Harmonic>::new(Some(1.0), f64::NAN, EnergyShiftMode::None);
        assert!(nan_r_on.is_err());
        let pair = harmonic_pair(1.0, 1.0, 1.0, EnergyShiftMode::None);
        let snapshot = Snapshot::two_particles(0.5);
        assert!(matches!(
            pair.compute(&snapshot, [(0, 2)]),
            Err(PairError::InvalidSnapshot(_))
        ));
        assert!(pair.compute(&snapshot, [(1, 1)]).is_err());
    }

    #[test]
    fn test_mode_change_between_steps() {
        let mut pair = harmonic_pair(2.0, 0.5, 1.0, EnergyShiftMode::None);
        let snapshot = Snapshot::two_particles(0.1);
        let before = pair.compute(&snapshot, all_pairs(2)).unwrap();
        pair.set_mode(EnergyShiftMode::Shift);
        assert_eq!(pair.mode(), EnergyShiftMode::Shift);
        let after = pair.compute(&snapshot, all_pairs(2)).unwrap();
        assert_relative_eq!(after.total_energy(), before.total_energy() - 0.25, epsilon = 1e-12);
        assert_eq!(after.forces, before.forces);
    }

    #[test]
    fn test_xplor_switches_energy() {
        let mut pair = harmonic_pair(2.0, 0.2, 1.0, EnergyShiftMode::Xplor);
        pair.r_on.set_default(Some(0.5)).unwrap();
        let inside = pair.compute(&Snapshot::two_particles(0.4), all_pairs(2)).unwrap();
        assert_relative_eq!(inside.total_energy(), 0.5 * 2.0 * 0.2 * 0.2, epsilon = 1e-12);
        let switched = pair.compute(&Snapshot::two_particles(0.8), all_pairs(2)).unwrap();
        assert!(switched.total_energy() < 0.5 * 2.0 * 0.6 * 0.6);
        assert!(switched.total_energy() > 0.0);
    }

    #[test]
    fn test_table_name_from_info() {
        let pair = harmonic_pair(1.0, 1.0, 1.0, EnergyShiftMode::None);
        let table = pair.resolve(&["A".to_string()]).unwrap();
        assert_eq!(table.name(), "harmonic");
        let empty = pair.resolve(&[]).unwrap();
        assert_eq!(empty.name(), "pair potential");
    }

    #[test]
    fn test_max_cutoff() {
        let mut pair = harmonic_pair(1.0, 1.0, 2.5, EnergyShiftMode::None);
        assert_eq!(pair.cutoff(), 2.5);
        pair.r_cut.insert("A", "B", 4.0).unwrap();
        assert_eq!(pair.cutoff(), 4.0);
        assert_eq!(pair.cutoff_squared(), 16.0);
    }
}
