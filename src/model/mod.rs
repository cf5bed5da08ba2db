//! Value types of a particle set.
//!
//! - [`particle`] – Particle type descriptions (code, masses, charge, volume, display).
//! - [`amino_acid`] – Amino-acid entries expressed through the set's particles.
//! - [`types`] – Display colors, fixed-precision temperatures, and order-independent pair keys.

pub mod amino_acid;
pub mod particle;
pub mod types;
