/// Amino-acid entry of a particle set.
///
/// The fragment specification describes the amino acid in terms of the
/// set's particles; charge settings list pH-dependent charge assignments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AminoAcidDescription {
    pub one_letter_code: String,
    pub three_letter_code: String,
    pub name: String,
    pub fragment_spec: String,
    pub charge_settings: String,
}

impl AminoAcidDescription {
    pub fn new(
        one_letter_code: impl Into<String>,
        three_letter_code: impl Into<String>,
        name: impl Into<String>,
        fragment_spec: impl Into<String>,
        charge_settings: impl Into<String>,
    ) -> Self {
        Self {
            one_letter_code: one_letter_code.into(),
            three_letter_code: three_letter_code.into(),
            name: name.into(),
            fragment_spec: fragment_spec.into(),
            charge_settings: charge_settings.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_sets_all_fields() {
        let aa = AminoAcidDescription::new("A", "Ala", "Alanine", "AlaBb", "-");
        assert_eq!(aa.one_letter_code, "A");
        assert_eq!(aa.three_letter_code, "Ala");
        assert_eq!(aa.name, "Alanine");
        assert_eq!(aa.fragment_spec, "AlaBb");
        assert_eq!(aa.charge_settings, "-");
    }
}
