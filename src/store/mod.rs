//! In-memory particle-set database.
//!
//! [`ParticleSet`] owns the particle descriptions, the pairwise interaction
//! values indexed by [`PairKey`] and [`Temperature`], the amino-acid
//! definitions and a memoized bond-length table. A store is usually built
//! from a file with [`ParticleSet::read_path`]; edits that change the file
//! produce a new file which is loaded into a fresh store.

mod error;

pub use error::Error;

use crate::conventions::Conventions;
use crate::io::{self, Document, ParticleSetData, Section, reader::split_pair};
use crate::model::amino_acid::AminoAcidDescription;
use crate::model::particle::ParticleDescription;
use crate::model::types::{PairKey, Temperature};
use log::debug;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Code preferred by [`ParticleSet::default_particle`].
pub const DEFAULT_PARTICLE: &str = "H2O";

#[derive(Debug, Default)]
pub struct ParticleSet {
    particles: BTreeMap<String, ParticleDescription>,
    interactions: HashMap<(PairKey, Temperature), f64>,
    temperatures: Vec<Temperature>,
    amino_acids: BTreeMap<String, AminoAcidDescription>,
    amino_acid_codes_by_name: BTreeMap<String, String>,
    has_amino_acid_definitions: bool,
    has_changed: bool,
    bond_lengths: RefCell<HashMap<PairKey, f64>>,
    bond_length_computations: Cell<usize>,
}

impl ParticleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(text: &str, conventions: &Conventions) -> Result<Self, io::Error> {
        Self::from_data(io::read(text, conventions)?)
    }

    pub fn read_path(path: &Path, conventions: &Conventions) -> Result<Self, io::Error> {
        let set = Self::from_data(io::read_path(path, conventions)?)?;
        debug!(
            "Loaded particle set {} ({} particles, {} temperatures)",
            path.display(),
            set.particles.len(),
            set.temperatures.len()
        );
        Ok(set)
    }

    pub fn from_document(document: &Document) -> Result<Self, io::Error> {
        Self::from_data(io::decode(document)?)
    }

    /// Builds a store from decoded file content.
    ///
    /// Conflicts the decoder cannot see on its own (a pair listed twice,
    /// inconsistent amino-acid entries) are reported as parse errors at the
    /// offending line. The change flag is clear on return.
    pub fn from_data(data: ParticleSetData) -> Result<Self, io::Error> {
        let mut set = Self::new();

        for record in data.particles {
            let line = record.line;
            set.add_particle(record.particle)
                .map_err(|e| io::Error::parse(Section::ParticleDescription, line, e.to_string()))?;
        }

        set.temperatures = data.temperatures;

        for record in data.interactions {
            let section = Section::ParticleInteractions;
            for (temperature, value) in record.values {
                let key = (PairKey::new(&record.first, &record.second), temperature);
                if set.interactions.insert(key, value).is_some() {
                    return Err(io::Error::parse(
                        section,
                        record.line,
                        format!(
                            "pair {}_{} is listed more than once",
                            record.first, record.second
                        ),
                    ));
                }
            }
        }

        if let Some(amino_acids) = data.amino_acids {
            set.has_amino_acid_definitions = true;
            for record in amino_acids {
                let section = Section::AminoAcidDescription;
                let added = set
                    .add_amino_acid(record.amino_acid)
                    .map_err(|e| io::Error::parse(section, record.line, e.to_string()))?;
                if !added {
                    return Err(io::Error::parse(
                        section,
                        record.line,
                        "amino acid is listed more than once",
                    ));
                }
            }
        }

        set.reset_change_detection();
        Ok(set)
    }

    // Particles

    /// Inserts `particle` unless its code is already present.
    pub fn add_particle(&mut self, particle: ParticleDescription) -> Result<bool, Error> {
        particle.validate().map_err(Error::InvalidArgument)?;
        if self.particles.contains_key(&particle.code) {
            return Ok(false);
        }
        self.check_case_clash(&particle.code)?;
        self.particles.insert(particle.code.clone(), particle);
        self.has_changed = true;
        Ok(true)
    }

    /// Inserts `particle`, or replaces the stored description when the two
    /// differ in their canonical string. Any replacement invalidates every
    /// cached bond length.
    pub fn update_particle(&mut self, particle: ParticleDescription) -> Result<bool, Error> {
        particle.validate().map_err(Error::InvalidArgument)?;
        match self.particles.get(&particle.code) {
            None => {
                self.check_case_clash(&particle.code)?;
                self.particles.insert(particle.code.clone(), particle);
                self.has_changed = true;
                Ok(true)
            }
            Some(current) if current.description_string() == particle.description_string() => {
                Ok(false)
            }
            Some(_) => {
                self.particles.insert(particle.code.clone(), particle);
                self.clear_bond_lengths();
                self.has_changed = true;
                Ok(true)
            }
        }
    }

    /// Pair keys ignore case, so two codes differing only in case would
    /// share interactions.
    fn check_case_clash(&self, code: &str) -> Result<(), Error> {
        match self
            .particles
            .keys()
            .find(|existing| existing.eq_ignore_ascii_case(code))
        {
            Some(existing) => Err(Error::invalid(format!(
                "particle '{code}' differs from existing particle '{existing}' only in case"
            ))),
            None => Ok(()),
        }
    }

    /// Removes a particle together with every interaction that references it.
    ///
    /// Returns `false` for unknown codes and for the last remaining particle.
    pub fn remove_particle(&mut self, code: &str) -> bool {
        if !self.particles.contains_key(code) || self.particles.len() == 1 {
            return false;
        }
        self.particles.remove(code);
        self.interactions.retain(|(pair, _), _| !pair.involves(code));
        self.clear_bond_lengths();
        self.has_changed = true;
        true
    }

    pub fn particle(&self, code: &str) -> Option<&ParticleDescription> {
        self.particles.get(code)
    }

    pub fn has_particle(&self, code: &str) -> bool {
        self.particles.contains_key(code)
    }

    /// Descriptions in ascending code order.
    pub fn particles(&self) -> impl Iterator<Item = &ParticleDescription> {
        self.particles.values()
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn sorted_particles(&self) -> Vec<&str> {
        self.particles.keys().map(String::as_str).collect()
    }

    /// `H2O` when present (compared upper case), otherwise the first code in
    /// sorted order.
    pub fn default_particle(&self) -> Option<&str> {
        self.particles
            .keys()
            .find(|code| code.to_ascii_uppercase() == DEFAULT_PARTICLE)
            .or_else(|| self.particles.keys().next())
            .map(String::as_str)
    }

    // Geometry

    /// Sum of the sphere radii of both particles, memoized per pair.
    pub fn bond_length(&self, a: &str, b: &str) -> Result<f64, Error> {
        let first = self.particle(a).ok_or_else(|| Error::unknown_particle(a))?;
        let second = self.particle(b).ok_or_else(|| Error::unknown_particle(b))?;

        let key = PairKey::new(a, b);
        if let Some(length) = self.bond_lengths.borrow().get(&key) {
            return Ok(*length);
        }
        let length = first.sphere_radius() + second.sphere_radius();
        self.bond_length_computations
            .set(self.bond_length_computations.get() + 1);
        self.bond_lengths.borrow_mut().insert(key, length);
        Ok(length)
    }

    /// Number of bond lengths computed rather than served from the cache.
    pub fn bond_length_computations(&self) -> usize {
        self.bond_length_computations.get()
    }

    fn clear_bond_lengths(&self) {
        let mut cache = self.bond_lengths.borrow_mut();
        if !cache.is_empty() {
            debug!("Clearing {} cached bond lengths", cache.len());
            cache.clear();
        }
    }

    // Interactions

    /// Inserts an interaction value unless one is already stored for the
    /// pair and temperature.
    pub fn add_interaction(
        &mut self,
        a: &str,
        b: &str,
        temperature: &str,
        value: f64,
    ) -> Result<bool, Error> {
        let key = self.interaction_key(a, b, temperature)?;
        check_value(value)?;
        if self.interactions.contains_key(&key) {
            return Ok(false);
        }
        self.insert_interaction(key, value);
        Ok(true)
    }

    /// Inserts or replaces an interaction value; returns whether the stored
    /// value changed.
    pub fn update_interaction(
        &mut self,
        a: &str,
        b: &str,
        temperature: &str,
        value: f64,
    ) -> Result<bool, Error> {
        let key = self.interaction_key(a, b, temperature)?;
        check_value(value)?;
        if self.interactions.get(&key) == Some(&value) {
            return Ok(false);
        }
        self.insert_interaction(key, value);
        Ok(true)
    }

    fn insert_interaction(&mut self, key: (PairKey, Temperature), value: f64) {
        if !self.temperatures.contains(&key.1) {
            let at = self.temperatures.partition_point(|t| *t < key.1);
            self.temperatures.insert(at, key.1.clone());
        }
        self.interactions.insert(key, value);
        self.has_changed = true;
    }

    pub fn interaction(&self, a: &str, b: &str, temperature: &str) -> Result<Option<f64>, Error> {
        let key = self.interaction_key(a, b, temperature)?;
        Ok(self.interactions.get(&key).copied())
    }

    pub fn has_interaction(&self, a: &str, b: &str, temperature: &str) -> bool {
        matches!(self.interaction(a, b, temperature), Ok(Some(_)))
    }

    /// Interaction lookup by a pair token such as `H2O_OIL`.
    pub fn interaction_for_pair(&self, pair: &str, temperature: &str) -> Result<Option<f64>, Error> {
        let (a, b) = split_pair(pair.trim())
            .ok_or_else(|| Error::invalid(format!("'{pair}' is not a particle pair")))?;
        self.interaction(a, b, temperature)
    }

    pub fn has_interaction_for_pair(&self, pair: &str, temperature: &str) -> bool {
        matches!(self.interaction_for_pair(pair, temperature), Ok(Some(_)))
    }

    pub fn interaction_count(&self) -> usize {
        self.interactions.len()
    }

    fn interaction_key(
        &self,
        a: &str,
        b: &str,
        temperature: &str,
    ) -> Result<(PairKey, Temperature), Error> {
        for code in [a, b] {
            if !self.has_particle(code) {
                return Err(Error::unknown_particle(code));
            }
        }
        if temperature.trim().is_empty() {
            return Err(Error::invalid("temperature is empty"));
        }
        let temperature =
            Temperature::parse(temperature).map_err(|e| Error::invalid(e.to_string()))?;
        Ok((PairKey::new(a, b), temperature))
    }

    // Temperatures

    /// Temperatures in ascending numeric order.
    pub fn temperatures(&self) -> &[Temperature] {
        &self.temperatures
    }

    /// Membership by formatted representation; unparsable input is absent.
    pub fn has_temperature(&self, temperature: &str) -> bool {
        match Temperature::parse(temperature) {
            Ok(t) => self.temperatures.iter().any(|known| *known == t),
            Err(_) => false,
        }
    }

    // Amino acids

    /// Inserts an amino acid keyed by one-letter code and by name.
    ///
    /// Returns `Ok(false)` when the same code/name pair is already present.
    /// A code or name that is already bound to a different entry is an
    /// error.
    pub fn add_amino_acid(&mut self, amino_acid: AminoAcidDescription) -> Result<bool, Error> {
        let code = &amino_acid.one_letter_code;
        let name = &amino_acid.name;
        let known_code = self.amino_acids.contains_key(code);
        let bound_code = self.amino_acid_codes_by_name.get(name);

        match (known_code, bound_code) {
            (false, None) => {
                self.amino_acid_codes_by_name
                    .insert(name.clone(), code.clone());
                self.amino_acids.insert(code.clone(), amino_acid);
                self.has_amino_acid_definitions = true;
                self.has_changed = true;
                Ok(true)
            }
            (true, Some(bound)) if bound == code => Ok(false),
            _ => Err(Error::CorruptAminoAcid {
                code: code.clone(),
                name: name.clone(),
            }),
        }
    }

    pub fn amino_acid(&self, code: &str) -> Option<&AminoAcidDescription> {
        self.amino_acids.get(code)
    }

    pub fn amino_acid_by_name(&self, name: &str) -> Option<&AminoAcidDescription> {
        self.amino_acid_codes_by_name
            .get(name)
            .and_then(|code| self.amino_acids.get(code))
    }

    pub fn has_amino_acid(&self, code: &str) -> bool {
        self.amino_acids.contains_key(code)
    }

    /// Amino acids in ascending one-letter-code order.
    pub fn amino_acids(&self) -> impl Iterator<Item = &AminoAcidDescription> {
        self.amino_acids.values()
    }

    pub fn sorted_amino_acid_names(&self) -> Vec<&str> {
        self.amino_acid_codes_by_name
            .keys()
            .map(String::as_str)
            .collect()
    }

    pub fn has_amino_acid_definitions(&self) -> bool {
        self.has_amino_acid_definitions
    }

    // Change detection

    pub fn has_changed(&self) -> bool {
        self.has_changed
    }

    pub fn reset_change_detection(&mut self) {
        self.has_changed = false;
    }
}

fn check_value(value: f64) -> Result<(), Error> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::invalid(format!("interaction value {value} is not finite")))
    }
}
