//! Read-only views over a [`ParticleSet`].
//!
//! [`InteractionQuery`] combines the store with the naming conventions so
//! callers can list particles, look up interactions and bond lengths and
//! find the probe particles that belong to a protein backbone particle.

use crate::conventions::Naming;
use crate::model::particle::ParticleDescription;
use crate::model::types::Temperature;
use crate::store::{self, ParticleSet};
use std::collections::BTreeMap;

/// One cell of an interaction matrix row.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionCell {
    pub first: String,
    pub second: String,
    pub temperature: Temperature,
    /// `None` when the file defines no value for the pair.
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Copy)]
pub struct InteractionQuery<'a> {
    set: &'a ParticleSet,
    naming: &'a Naming,
}

impl<'a> InteractionQuery<'a> {
    pub fn new(set: &'a ParticleSet, naming: &'a Naming) -> Self {
        Self { set, naming }
    }

    pub fn set(&self) -> &'a ParticleSet {
        self.set
    }

    pub fn sorted_particles(&self) -> Vec<&'a str> {
        self.set.sorted_particles()
    }

    /// Code to name map in code order.
    pub fn available_particles(&self) -> BTreeMap<&'a str, &'a str> {
        self.set
            .particles()
            .map(|p| (p.code.as_str(), p.name.as_str()))
            .collect()
    }

    pub fn default_particle(&self) -> Option<&'a str> {
        self.set.default_particle()
    }

    pub fn probe_particles(&self) -> Vec<&'a str> {
        self.set
            .sorted_particles()
            .into_iter()
            .filter(|code| self.naming.is_probe(code))
            .collect()
    }

    pub fn has_probe_particles(&self) -> bool {
        self.set
            .particles()
            .any(|p| self.naming.is_probe(&p.code))
    }

    /// Probe particles derived from `backbone`, e.g. `AlaPd1`, `AlaPd2` for
    /// `AlaBb`. Empty when `backbone` is not a backbone code.
    pub fn probes_for_backbone(&self, backbone: &str) -> Vec<&'a str> {
        let Some(pattern) = self.naming.probe_pattern_for(backbone) else {
            return Vec::new();
        };
        self.set
            .sorted_particles()
            .into_iter()
            .filter(|code| pattern.is_match(code))
            .collect()
    }

    pub fn has_temperature(&self, temperature: &str) -> bool {
        self.set.has_temperature(temperature)
    }

    pub fn interaction(
        &self,
        a: &str,
        b: &str,
        temperature: &str,
    ) -> Result<Option<f64>, store::Error> {
        self.set.interaction(a, b, temperature)
    }

    pub fn bond_length(&self, a: &str, b: &str) -> Result<f64, store::Error> {
        self.set.bond_length(a, b)
    }

    /// All particle descriptions in code order.
    pub fn particle_table(&self) -> Vec<&'a ParticleDescription> {
        self.set.particles().collect()
    }

    /// Interactions of `first` with every particle at one temperature.
    pub fn interaction_matrix(&self, first: &str, temperature: &str) -> Option<Vec<InteractionCell>> {
        if !self.set.has_particle(first) || temperature.trim().is_empty() {
            return None;
        }
        let temperature = Temperature::parse(temperature).ok()?;
        let cells = self
            .set
            .sorted_particles()
            .into_iter()
            .map(|second| InteractionCell {
                first: first.to_string(),
                second: second.to_string(),
                value: self
                    .set
                    .interaction(first, second, temperature.as_str())
                    .ok()
                    .flatten(),
                temperature: temperature.clone(),
            })
            .collect();
        Some(cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conventions::default_conventions;

    const SAMPLE: &str = "\
[VERSION]
1.0.0.0
[/VERSION]
[PARTICLE_DESCRIPTION]
H2O Water 1.0 0.0 18.02 30.0 0.5 CYAN
AlaBb Alanine-Backbone 1.0 0.0 71.0 80.0 0.7 GRAY
AlaPd1 Alanine-Probe 1.0 0.0 71.0 80.0 0.7 RED
AlaPd2 Alanine-Probe 1.0 0.0 71.0 80.0 0.7 RED
GlyPd1 Glycine-Probe 1.0 0.0 57.0 60.0 0.6 RED
[/PARTICLE_DESCRIPTION]
[PARTICLE_INTERACTIONS]
Pair 300 350
H2O_H2O 25.0 24.0
H2O_AlaBb 30.0 29.0
[/PARTICLE_INTERACTIONS]
";

    fn with_query<R>(f: impl FnOnce(InteractionQuery<'_>) -> R) -> R {
        let conventions = default_conventions();
        let set = ParticleSet::read(SAMPLE, conventions).unwrap();
        f(InteractionQuery::new(&set, &conventions.naming))
    }

    #[test]
    fn lists_particles_sorted() {
        with_query(|q| {
            assert_eq!(
                q.sorted_particles(),
                vec!["AlaBb", "AlaPd1", "AlaPd2", "GlyPd1", "H2O"]
            );
            assert_eq!(q.available_particles().get("H2O"), Some(&"Water"));
            assert_eq!(q.default_particle(), Some("H2O"));
        });
    }

    #[test]
    fn finds_probe_particles() {
        with_query(|q| {
            assert!(q.has_probe_particles());
            assert_eq!(q.probe_particles(), vec!["AlaPd1", "AlaPd2", "GlyPd1"]);
        });
    }

    #[test]
    fn probes_for_backbone_match_stem() {
        with_query(|q| {
            assert_eq!(q.probes_for_backbone("AlaBb"), vec!["AlaPd1", "AlaPd2"]);
            assert_eq!(q.probes_for_backbone("GlyBb"), vec!["GlyPd1"]);
            assert!(q.probes_for_backbone("H2O").is_empty());
        });
    }

    #[test]
    fn interaction_matrix_covers_every_particle() {
        with_query(|q| {
            let row = q.interaction_matrix("H2O", "350").unwrap();
            assert_eq!(row.len(), 5);
            assert_eq!(row[0].second, "AlaBb");
            assert_eq!(row[0].value, Some(29.0));
            assert_eq!(row[4].value, Some(24.0));
            assert_eq!(row[1].value, None);
            assert_eq!(row[0].temperature.as_str(), "350.00");
        });
    }

    #[test]
    fn interaction_matrix_requires_known_particle_and_temperature() {
        with_query(|q| {
            assert!(q.interaction_matrix("FAT", "300").is_none());
            assert!(q.interaction_matrix("H2O", " ").is_none());
        });
    }

    #[test]
    fn delegates_lookups_to_store() {
        with_query(|q| {
            assert!(q.has_temperature("300.0"));
            assert!(!q.has_temperature("400"));
            assert_eq!(q.interaction("AlaBb", "H2O", "300").unwrap(), Some(30.0));
            assert!(q.bond_length("H2O", "AlaBb").unwrap() > 0.0);
            assert_eq!(q.particle_table().len(), 5);
        });
    }
}
