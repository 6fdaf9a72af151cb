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

//! # Configuration documents
//!
//! Builds a harmonic [`PotentialPair`] from user input such as:
//!
//! ~~~
//! use harmonic_pair::{EnergyShiftMode, Harmonic, PotentialPair};
//! let json = r#"{
//!     "default_r_cut": 2.5,
//!     "mode": "shift",
//!     "params": [
//!         {"types": ["A", "A"], "k": 0.5, "sigma": 1.0},
//!         {"types": ["B", "A"], "k": 2.0, "sigma": 1.5, "r_cut": 3.0}
//!     ]
//! }"#;
//! let pair = PotentialPair::<Harmonic>::from_json(json).unwrap();
//! assert_eq!(pair.mode(), EnergyShiftMode::Shift);
//! assert_eq!(pair.params.get("A", "B"), Some(&Harmonic::new(2.0, 1.5)));
//! assert_eq!(pair.r_cut.get("A", "B"), Some(&3.0));
//! ~~~

use crate::{EnergyShiftMode, Harmonic, PotentialPair, TypePair};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

fn default_mode() -> String {
    EnergyShiftMode::None.to_string()
}

/// Construction-time settings plus parameters for each type pair
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PairConfig {
    /// Cutoff for type pairs without their own `r_cut`
    #[serde(default)]
    pub default_r_cut: Option<f64>,
    /// XPLOR onset for type pairs without their own `r_on`
    #[serde(default)]
    pub default_r_on: f64,
    /// One of `none`, `shift`, `xplor`
    #[serde(default = "default_mode")]
    pub mode: String,
    #[serde(default)]
    pub params: Vec<PairEntry>,
}

/// Parameters of one unordered type pair
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PairEntry {
    pub types: [String; 2],
    pub k: f64,
    #[serde(alias = "σ")]
    pub sigma: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r_cut: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r_on: Option<f64>,
}

impl PairConfig {
    /// Validate everything and build the pair potential.
    ///
    /// A type pair listed twice, in either order, is an error.
    pub fn build(&self) -> Result<PotentialPair<Harmonic>> {
        let mode: EnergyShiftMode = self.mode.parse()?;
        let mut pair = PotentialPair::new(self.default_r_cut, self.default_r_on, mode)
            .context("invalid default r_cut or r_on")?;
        let mut seen = HashSet::new();
        for entry in &self.params {
            let [a, b] = &entry.types;
            let type_pair = TypePair::new(a.as_str(), b.as_str());
            if !seen.insert(type_pair.clone()) {
                bail!("duplicate parameters for type pair {}", type_pair);
            }
            pair.params
                .insert(a.as_str(), b.as_str(), Harmonic::new(entry.k, entry.sigma))
                .with_context(|| format!("invalid parameters for type pair {}", type_pair))?;
            if let Some(r_cut) = entry.r_cut {
                pair.r_cut
                    .insert(a.as_str(), b.as_str(), r_cut)
                    .with_context(|| format!("invalid r_cut for type pair {}", type_pair))?;
            }
            if let Some(r_on) = entry.r_on {
                pair.r_on
                    .insert(a.as_str(), b.as_str(), r_on)
                    .with_context(|| format!("invalid r_on for type pair {}", type_pair))?;
            }
        }
        Ok(pair)
    }
}

impl PotentialPair<Harmonic> {
    /// Build from a JSON [`PairConfig`] document
    pub fn from_json(json: &str) -> Result<Self> {
        let config: PairConfig =
            serde_json::from_str(json).context("failed to parse pair configuration")?;
        config.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PairError;

    #[test]
    fn test_defaults() {
        let pair = PotentialPair::<Harmonic>::from_json("{}").unwrap();
        assert_eq!(pair.mode(), EnergyShiftMode::None);
        assert_eq!(pair.r_cut.default_value(), None);
        assert_eq!(pair.r_on.default_value(), Some(&0.0));
        assert!(pair.params.is_empty());
    }

    #[test]
    fn test_unknown_mode() {
        let error = PotentialPair::<Harmonic>::from_json(r#"{"mode": "switch"}"#).unwrap_err();
        assert_eq!(
            error.downcast_ref::<PairError>(),
            Some(&PairError::UnknownMode("switch".to_string()))
        );
    }

    #[test]
    fn test_negative_k_is_rejected() {
        let json = r#"{
            "default_r_cut": 1.0,
            "params": [{"types": ["A", "A"], "k": -1.0, "sigma": 0.5}]
        }"#;
        let error = PotentialPair::<Harmonic>::from_json(json).unwrap_err();
        assert_eq!(error.to_string(), "invalid parameters for type pair (A, A)");
        assert_eq!(
            error.root_cause().to_string(),
            "invalid value for 'k': -1 (must be finite and non-negative)"
        );
    }

    #[test]
    fn test_duplicate_pair() {
        let json = r#"{"params": [
            {"types": ["A", "B"], "k": 1.0, "sigma": 0.5},
            {"types": ["B", "A"], "k": 2.0, "sigma": 0.5}
        ]}"#;
        let error = PotentialPair::<Harmonic>::from_json(json).unwrap_err();
        assert!(error.to_string().contains("duplicate"));
    }

    #[test]
    fn test_malformed_documents() {
        assert!(PotentialPair::<Harmonic>::from_json(r#"{"r_cut": 1.0}"#).is_err());
        let missing_sigma = r#"{"params": [{"types": ["A", "A"], "k": 1.0}]}"#;
        assert!(PotentialPair::<Harmonic>::from_json(missing_sigma).is_err());
        let negative_r_on = r#"{"default_r_on": -0.5}"#;
        assert!(PotentialPair::<Harmonic>::from_json(negative_r_on).is_err());
    }

    #[test]
    fn test_serialize_round_trip() {
        let config = PairConfig {
            default_r_cut: Some(1.0),
            default_r_on: 0.5,
            mode: "xplor".to_string(),
            params: vec![PairEntry {
                types: ["A".to_string(), "A".to_string()],
                k: 1.0,
                sigma: 0.5,
                r_cut: None,
                r_on: Some(0.8),
            }],
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("r_cut\":null"));
        let pair = PotentialPair::<Harmonic>::from_json(&json).unwrap();
        assert_eq!(pair.mode(), EnergyShiftMode::Xplor);
        assert_eq!(pair.r_on.get("A", "A"), Some(&0.8));
        assert_eq!(pair.r_cut.get("A", "A"), Some(&1.0));
    }
}
