use super::Error;
use crate::conventions::Naming;
use crate::store::ParticleSet;

/// Minimum volume offered by a fresh [`RescaleRequest`], in Å³.
pub const DEFAULT_MIN_VOLUME: f64 = 30.0;

/// Duplication of one particle under a new code.
///
/// Corrections are percentages: a value `c` scales by `1 + c / 100`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DuplicateRow {
    pub particle: String,
    /// Blank rows are skipped.
    pub new_particle: String,
    /// Blank keeps the source particle's name.
    pub new_name: String,
    pub old_new_correction: f64,
    pub lower_correction: f64,
    pub upper_correction: f64,
    pub charge: Option<f64>,
    pub mass_g_mol: Option<f64>,
    pub volume: Option<f64>,
}

impl DuplicateRow {
    pub fn new(particle: impl Into<String>, new_particle: impl Into<String>) -> Self {
        Self {
            particle: particle.into(),
            new_particle: new_particle.into(),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.new_name = name.into();
        self
    }

    pub fn with_corrections(mut self, old_new: f64, lower: f64, upper: f64) -> Self {
        self.old_new_correction = old_new;
        self.lower_correction = lower;
        self.upper_correction = upper;
        self
    }

    pub fn is_blank(&self) -> bool {
        self.new_particle.trim().is_empty()
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        let code = self.new_particle.trim();
        for (what, value) in [
            ("old/new correction", self.old_new_correction),
            ("lower correction", self.lower_correction),
            ("upper correction", self.upper_correction),
        ] {
            if !value.is_finite() || value <= -100.0 {
                return Err(Error::malformed(format!(
                    "{what} {value} for '{code}' must be a finite percentage above -100"
                )));
            }
        }
        if let Some(charge) = self.charge.filter(|c| !c.is_finite()) {
            return Err(Error::malformed(format!("charge {charge} is not finite")));
        }
        for (what, value) in [("mass", self.mass_g_mol), ("volume", self.volume)] {
            if let Some(v) = value.filter(|v| !(v.is_finite() && *v > 0.0)) {
                return Err(Error::malformed(format!("{what} {v} must be positive")));
            }
        }
        if self.new_name.split_whitespace().count() > 1 {
            return Err(Error::malformed(format!(
                "name '{}' must be a single token",
                self.new_name
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateRequest {
    pub filename: String,
    pub rows: Vec<DuplicateRow>,
}

impl DuplicateRequest {
    pub fn new(filename: impl Into<String>, rows: Vec<DuplicateRow>) -> Self {
        Self {
            filename: filename.into(),
            rows,
        }
    }

    /// One blank row per particle of `set`, in code order.
    pub fn template(set: &ParticleSet, filename: impl Into<String>) -> Self {
        let rows = set
            .sorted_particles()
            .into_iter()
            .map(|code| DuplicateRow::new(code, ""))
            .collect();
        Self::new(filename, rows)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemoveAction {
    #[default]
    Keep,
    Remove,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveRow {
    pub particle: String,
    pub action: RemoveAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveRequest {
    pub filename: String,
    pub rows: Vec<RemoveRow>,
}

impl RemoveRequest {
    pub fn new(filename: impl Into<String>, rows: Vec<RemoveRow>) -> Self {
        Self {
            filename: filename.into(),
            rows,
        }
    }

    /// Request that removes exactly `codes`.
    pub fn removing<S: AsRef<str>>(filename: impl Into<String>, codes: &[S]) -> Self {
        let rows = codes
            .iter()
            .map(|code| RemoveRow {
                particle: code.as_ref().to_string(),
                action: RemoveAction::Remove,
            })
            .collect();
        Self::new(filename, rows)
    }

    /// One `Keep` row per particle of `set`, in code order.
    pub fn template(set: &ParticleSet, filename: impl Into<String>) -> Self {
        let rows = set
            .sorted_particles()
            .into_iter()
            .map(|code| RemoveRow {
                particle: code.to_string(),
                action: RemoveAction::Keep,
            })
            .collect();
        Self::new(filename, rows)
    }

    pub fn selected(&self) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .filter(|row| row.action == RemoveAction::Remove)
            .map(|row| row.particle.trim())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RescaleRequest {
    pub filename: String,
    pub new_min_volume: f64,
}

impl RescaleRequest {
    pub fn new(filename: impl Into<String>, new_min_volume: f64) -> Self {
        Self {
            filename: filename.into(),
            new_min_volume,
        }
    }

    pub fn template(filename: impl Into<String>) -> Self {
        Self::new(filename, DEFAULT_MIN_VOLUME)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeIncrementRequest {
    pub filename: String,
}

impl ProbeIncrementRequest {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
        }
    }
}

pub(crate) fn validate_filename(filename: &str, naming: &Naming) -> Result<(), Error> {
    if naming.is_valid_particle_set_filename(filename) {
        Ok(())
    } else {
        Err(Error::malformed(format!(
            "'{filename}' is not a valid particle-set filename"
        )))
    }
}
