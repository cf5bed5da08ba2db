//! Particle-set data core for dissipative particle dynamics (DPD) setups.
//!
//! A particle set describes the coarse-grained particle types of a DPD
//! simulation, their pairwise repulsion parameters at one or more
//! temperatures and, optionally, how amino acids map onto particles. This
//! crate reads and writes the section-tagged particle-set text format,
//! holds a set in memory for lookups and derived geometry, and rewrites
//! particle-set files for the common editing tasks.
//!
//! # Features
//!
//! - **Codec** - Lossless line model of particle-set files with
//!   case-insensitive section tags and preserved comments
//! - **Store** - Particle, interaction and amino-acid tables with symmetric
//!   pair keys, change detection and memoized bond lengths
//! - **Queries** - Sorted listings, default particle selection, probe
//!   particle discovery and interaction matrices
//! - **Editing** - Duplicate, remove, rescale minimum volume and increment
//!   probe particles, each written to a collision-free new file
//!
//! # Quick Start
//!
//! ```
//! use dpd_pset::{ParticleSet, default_conventions};
//!
//! let text = "\
//! [VERSION]
//! 1.0.0.0
//! [/VERSION]
//! [PARTICLE_DESCRIPTION]
//! H2O Water 1.0 0.0 18.02 30.0 0.5 CYAN
//! OIL Oil 1.0 0.0 100.0 100.0 0.8 YELLOW
//! [/PARTICLE_DESCRIPTION]
//! [PARTICLE_INTERACTIONS]
//! Pair 300
//! H2O_H2O 25.0
//! H2O_OIL 40.0
//! OIL_OIL 25.0
//! [/PARTICLE_INTERACTIONS]
//! ";
//!
//! let set = ParticleSet::read(text, default_conventions())?;
//!
//! assert_eq!(set.sorted_particles(), vec!["H2O", "OIL"]);
//! assert_eq!(set.default_particle(), Some("H2O"));
//!
//! // Pair keys are symmetric; temperatures are normalized to two decimals.
//! assert_eq!(set.interaction("OIL", "H2O", "300.00")?, Some(40.0));
//!
//! // Bond length is the sum of the sphere radii of both particles.
//! let length = set.bond_length("H2O", "OIL")?;
//! assert!(length > 4.0 && length < 5.0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Module Organization
//!
//! - [`io`] - Particle-set file codec ([`Document`], [`read`](io::read))
//! - [`store`] - In-memory [`ParticleSet`]
//! - [`query`] - Read-only [`InteractionQuery`] views
//! - [`edit`] - File-rewriting [`Editor`] operations and their requests
//! - [`session`] - [`Session`] owning paths, conventions and the current set
//! - [`conventions`] - Section tags, naming patterns and output suffixes
//!
//! # Data Types
//!
//! - [`ParticleDescription`] - Code, name, masses, charge, volume and display
//!   attributes of one particle type
//! - [`AminoAcidDescription`] - Amino-acid codes, name, fragment
//!   specification and charge settings
//! - [`Temperature`] - Temperature key held at fixed two-decimal precision
//! - [`PairKey`] - Order-independent particle pair
//! - [`StandardColor`] - Display color of a particle type

mod model;

pub mod conventions;
pub mod edit;
pub mod io;
pub mod query;
pub mod session;
pub mod store;

pub use model::amino_acid::AminoAcidDescription;
pub use model::particle::ParticleDescription;
pub use model::types::{PairKey, ParseColorError, ParseTemperatureError, StandardColor, Temperature};

pub use conventions::{Conventions, default_conventions, load_conventions};
pub use edit::{
    DuplicateRequest, DuplicateRow, Editor, ProbeIncrementRequest, RemoveAction, RemoveRequest,
    RemoveRow, RescaleRequest,
};
pub use io::{Document, Section};
pub use query::{InteractionCell, InteractionQuery};
pub use session::{ParticleSetPaths, Session};
pub use store::ParticleSet;

pub use conventions::Error as ConventionsError;
pub use edit::Error as EditError;
pub use io::Error as IoError;
pub use store::Error as StoreError;
