use super::types::StandardColor;

/// Description of one particle type of a particle set.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleDescription {
    /// Short code, the unique key within a particle set (e.g. `H2O`).
    pub code: String,
    pub name: String,
    /// Mass in DPD units.
    pub mass_dpd: f64,
    pub charge: f64,
    /// Mass in g/mol.
    pub mass_g_mol: f64,
    /// Molecular volume in Å³.
    pub volume: f64,
    pub graphics_radius: f64,
    pub color: StandardColor,
}

impl ParticleDescription {
    pub fn new(code: impl Into<String>, name: impl Into<String>, volume: f64) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            mass_dpd: 1.0,
            charge: 0.0,
            mass_g_mol: 18.0,
            volume,
            graphics_radius: 1.0,
            color: StandardColor::Blue,
        }
    }

    pub fn with_mass(mut self, mass_dpd: f64, mass_g_mol: f64) -> Self {
        self.mass_dpd = mass_dpd;
        self.mass_g_mol = mass_g_mol;
        self
    }

    pub fn with_charge(mut self, charge: f64) -> Self {
        self.charge = charge;
        self
    }

    pub fn with_graphics(mut self, graphics_radius: f64, color: StandardColor) -> Self {
        self.graphics_radius = graphics_radius;
        self.color = color;
        self
    }

    /// Canonical single-line representation in file column order.
    ///
    /// Two descriptions are considered different exactly when these strings
    /// differ.
    pub fn description_string(&self) -> String {
        format!(
            "{} {} {} {} {} {} {} {}",
            self.code,
            self.name,
            self.mass_dpd,
            self.charge,
            self.mass_g_mol,
            self.volume,
            self.graphics_radius,
            self.color
        )
    }

    /// Returns a reason if the description violates a particle-set invariant.
    pub fn validate(&self) -> Result<(), String> {
        if self.code.trim().is_empty() {
            return Err("particle code is empty".into());
        }
        if self.code.split_whitespace().count() != 1 || self.code.contains('_') {
            return Err(format!(
                "particle code '{}' must be a single token without underscores",
                self.code
            ));
        }
        if self.name.trim().is_empty() || self.name.split_whitespace().count() != 1 {
            return Err(format!(
                "particle name '{}' must be a single non-empty token",
                self.name
            ));
        }
        if !(self.volume.is_finite() && self.volume > 0.0) {
            return Err(format!(
                "volume of particle '{}' must be positive, got {}",
                self.code, self.volume
            ));
        }
        if !(self.mass_g_mol.is_finite() && self.mass_g_mol > 0.0) {
            return Err(format!(
                "mass of particle '{}' must be positive, got {}",
                self.code, self.mass_g_mol
            ));
        }
        if !(self.mass_dpd.is_finite() && self.charge.is_finite() && self.graphics_radius.is_finite())
        {
            return Err(format!(
                "particle '{}' has a non-finite numeric field",
                self.code
            ));
        }
        Ok(())
    }

    /// Radius of a sphere with the particle's volume: `cbrt(3V / 4π)`.
    pub fn sphere_radius(&self) -> f64 {
        (3.0 * self.volume / (4.0 * std::f64::consts::PI)).cbrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    #[test]
    fn description_string_follows_column_order() {
        let p = ParticleDescription::new("H2O", "Water", 30.0)
            .with_mass(1.0, 18.02)
            .with_graphics(0.5, StandardColor::Cyan);
        assert_eq!(p.description_string(), "H2O Water 1 0 18.02 30 0.5 CYAN");
    }

    #[test]
    fn description_string_changes_with_volume() {
        let a = ParticleDescription::new("OIL", "Oil", 100.0);
        let mut b = a.clone();
        b.volume = 101.0;
        assert_ne!(a.description_string(), b.description_string());
    }

    #[test]
    fn validate_rejects_non_positive_volume() {
        let p = ParticleDescription::new("X", "Xeno", 0.0);
        assert!(p.validate().unwrap_err().contains("volume"));
    }

    #[test]
    fn validate_rejects_underscore_codes() {
        let p = ParticleDescription::new("A_B", "Bad", 10.0);
        assert!(p.validate().is_err());
    }

    #[test]
    fn validate_accepts_regular_particle() {
        assert!(ParticleDescription::new("H2O", "Water", 30.0).validate().is_ok());
    }

    #[test]
    fn sphere_radius_inverts_sphere_volume() {
        let p = ParticleDescription::new("S", "Sphere", 4.0 / 3.0 * std::f64::consts::PI);
        assert!(approx_eq(p.sphere_radius(), 1.0, 1e-12));
    }
}
