//! Section-aware row edits on a [`Document`].

use super::{DuplicateRow, Error};
use crate::io::reader::split_pair;
use crate::io::{Document, Line, Section};

const VOLUME_COLUMN: usize = 5;
const SCALED_DECIMALS: usize = 4;
const VOLUME_DECIMALS: usize = 3;

fn same_code(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

fn description_code(line: &Line) -> Option<&str> {
    line.is_data_in(Section::ParticleDescription)
        .then(|| line.first_token())
        .flatten()
}

fn interaction_pair(line: &Line) -> Option<(&str, &str)> {
    line.is_data_in(Section::ParticleInteractions)
        .then(|| line.first_token().and_then(split_pair))
        .flatten()
}

fn parse_value(line: &Line, token: &str) -> Result<f64, Error> {
    token
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::invalid_value(line.number(), format!("'{token}' is not a number")))
}

/// Applies a percentage correction; the original token is kept when the
/// correction is zero.
fn corrected(line: &Line, token: &str, correction: f64) -> Result<String, Error> {
    if correction == 0.0 {
        return Ok(token.to_string());
    }
    let value = parse_value(line, token)?;
    Ok(format!(
        "{:.*}",
        SCALED_DECIMALS,
        value * (1.0 + correction / 100.0)
    ))
}

/// Values of the self-interaction row of `code`, in header column order.
fn diagonal(document: &Document, code: &str) -> Result<Option<Vec<f64>>, Error> {
    let Some(line) = document.rows(Section::ParticleInteractions).find(|line| {
        interaction_pair(line).is_some_and(|(a, b)| same_code(a, code) && same_code(b, code))
    }) else {
        return Ok(None);
    };
    let values = line.tokens()[1..]
        .iter()
        .map(|token| parse_value(line, token))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Some(values))
}

/// Inserts a copy of `row.particle` under `row.new_particle`.
///
/// The new description row follows the source row. Every interaction row
/// of the source particle is followed by its counterpart for the new code:
/// the self row yields a copied `(new, new)` row and a `(new, old)` row
/// corrected by the old/new percentage; a cross row `(old, X)` yields
/// `(new, X)` whose values are corrected by the lower percentage where they
/// are below the source diagonal and by the upper percentage where they are
/// above it. Values equal to the diagonal are copied.
pub(crate) fn duplicate_particle(document: &Document, row: &DuplicateRow) -> Result<Document, Error> {
    let old = row.particle.trim();
    let new = row.new_particle.trim();
    let needs_diagonal = row.lower_correction != 0.0 || row.upper_correction != 0.0;
    let diagonal = diagonal(document, old)?;

    document.rewrite(|line, out| {
        out.push(line.clone());

        if let Some(code) = description_code(line) {
            if same_code(code, old) {
                out.push(duplicate_description(line, row)?);
            }
            return Ok(());
        }

        let Some((a, b)) = interaction_pair(line) else {
            return Ok(());
        };
        let tokens = line.tokens();
        let values = &tokens[1..];

        if same_code(a, old) && same_code(b, old) {
            let mut self_row = vec![format!("{new}_{new}")];
            self_row.extend(values.iter().map(|v| v.to_string()));
            out.push(line.with_tokens(&self_row));

            let mut cross_row = vec![format!("{new}_{old}")];
            for value in values {
                cross_row.push(corrected(line, value, row.old_new_correction)?);
            }
            out.push(line.with_tokens(&cross_row));
        } else if same_code(a, old) || same_code(b, old) {
            let pair = if same_code(a, old) {
                format!("{new}_{b}")
            } else {
                format!("{a}_{new}")
            };
            let mut cross_row = vec![pair];
            match &diagonal {
                Some(diagonal) => {
                    for (value, reference) in values.iter().zip(diagonal) {
                        let current = parse_value(line, value)?;
                        let correction = if current < *reference {
                            row.lower_correction
                        } else if current > *reference {
                            row.upper_correction
                        } else {
                            0.0
                        };
                        cross_row.push(corrected(line, value, correction)?);
                    }
                }
                None if needs_diagonal => return Err(Error::MissingDiagonal(old.to_string())),
                None => cross_row.extend(values.iter().map(|v| v.to_string())),
            }
            out.push(line.with_tokens(&cross_row));
        }
        Ok(())
    })
}

fn duplicate_description(line: &Line, row: &DuplicateRow) -> Result<Line, Error> {
    let mut tokens: Vec<String> = line.tokens().into_iter().map(String::from).collect();
    let name = row.new_name.trim();
    let updates = [
        (0, Some(row.new_particle.trim().to_string())),
        (1, (!name.is_empty()).then(|| name.to_string())),
        (3, row.charge.map(|v| v.to_string())),
        (4, row.mass_g_mol.map(|v| v.to_string())),
        (VOLUME_COLUMN, row.volume.map(|v| v.to_string())),
    ];
    for (index, value) in updates {
        let Some(value) = value else { continue };
        let slot = tokens.get_mut(index).ok_or_else(|| {
            Error::invalid_value(
                line.number(),
                format!("description row has no column {}", index + 1),
            )
        })?;
        *slot = value;
    }
    Ok(line.with_tokens(&tokens))
}

/// Drops the description row of every code in `codes` and every
/// interaction row that references one of them.
pub(crate) fn remove_particles(document: &Document, codes: &[&str]) -> Document {
    let removed = |code: &str| codes.iter().any(|c| same_code(c, code));
    let result: Result<Document, std::convert::Infallible> = document.rewrite(|line, out| {
        let drop = match (description_code(line), interaction_pair(line)) {
            (Some(code), _) => removed(code),
            (_, Some((a, b))) => removed(a) || removed(b),
            _ => false,
        };
        if !drop {
            out.push(line.clone());
        }
        Ok(())
    });
    match result {
        Ok(document) => document,
        Err(never) => match never {},
    }
}

/// Scales every particle volume by `new_min / current_min`.
pub(crate) fn rescale_volumes(document: &Document, new_min: f64) -> Result<Document, Error> {
    let mut current_min: Option<f64> = None;
    for line in document.rows(Section::ParticleDescription) {
        let tokens = line.tokens();
        let token = tokens.get(VOLUME_COLUMN).ok_or_else(|| {
            Error::invalid_value(line.number(), "description row has no volume column")
        })?;
        let volume = parse_value(line, token)?;
        if volume <= 0.0 {
            return Err(Error::invalid_value(
                line.number(),
                format!("volume {token} is not positive"),
            ));
        }
        current_min = Some(current_min.map_or(volume, |min| min.min(volume)));
    }
    let Some(current_min) = current_min else {
        return Err(Error::malformed("particle set has no particles to rescale"));
    };

    document.rewrite(|line, out| {
        if !line.is_data_in(Section::ParticleDescription) {
            out.push(line.clone());
            return Ok(());
        }
        let tokens = line.tokens();
        let volume = parse_value(line, tokens[VOLUME_COLUMN])?;
        let scaled = new_min * volume / current_min;
        out.push(line.with_token(
            VOLUME_COLUMN,
            &format!("{:.*}", VOLUME_DECIMALS, scaled),
        ));
        Ok(())
    })
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
# Code Name Mass Charge MassGmol Volume Radius Color
H2O Water 1.0 0.0 18.02 30.0 0.5 CYAN
OIL Oil 1.0 0.0 100.0 100.0 0.8 YELLOW
[/PARTICLE_DESCRIPTION]
[PARTICLE_INTERACTIONS]
Pair 300 350
H2O_H2O 25.0 24.0
H2O_OIL 20.0 40.0
OIL_OIL 30.0 40.0
[/PARTICLE_INTERACTIONS]
";

    fn document(text: &str) -> Document {
        Document::parse(text, &default_conventions().format).unwrap()
    }

    fn data_rows(document: &Document, section: Section) -> Vec<String> {
        document.rows(section).map(|l| l.raw().to_string()).collect()
    }

    #[test]
    fn duplicate_inserts_description_after_source() {
        let row = DuplicateRow::new("OIL", "OIL2").with_name("Oil2");
        let result = duplicate_particle(&document(SAMPLE), &row).unwrap();
        assert_eq!(
            data_rows(&result, Section::ParticleDescription),
            vec![
                "H2O Water 1.0 0.0 18.02 30.0 0.5 CYAN",
                "OIL Oil 1.0 0.0 100.0 100.0 0.8 YELLOW",
                "OIL2 Oil2 1.0 0.0 100.0 100.0 0.8 YELLOW",
            ]
        );
    }

    #[test]
    fn duplicate_applies_description_overrides() {
        let mut row = DuplicateRow::new("H2O", "H2OX");
        row.charge = Some(-1.0);
        row.mass_g_mol = Some(19.5);
        row.volume = Some(32.0);
        let result = duplicate_particle(&document(SAMPLE), &row).unwrap();
        let rows = data_rows(&result, Section::ParticleDescription);
        assert_eq!(rows[1], "H2OX Water 1.0 -1 19.5 32 0.5 CYAN");
    }

    #[test]
    fn duplicate_reports_short_description_rows() {
        let text = SAMPLE.replace("H2O Water 1.0 0.0 18.02 30.0 0.5 CYAN", "H2O Water 1.0");
        let mut row = DuplicateRow::new("H2O", "H2OX");
        row.volume = Some(32.0);
        assert!(matches!(
            duplicate_particle(&document(&text), &row),
            Err(Error::InvalidValue { line: 6, .. })
        ));
    }

    #[test]
    fn duplicate_rewrites_interactions() {
        let row = DuplicateRow::new("OIL", "OIL2").with_corrections(10.0, -50.0, 50.0);
        let result = duplicate_particle(&document(SAMPLE), &row).unwrap();
        assert_eq!(
            data_rows(&result, Section::ParticleInteractions),
            vec![
                "H2O_H2O 25.0 24.0",
                "H2O_OIL 20.0 40.0",
                "H2O_OIL2 10.0000 40.0",
                "OIL_OIL 30.0 40.0",
                "OIL2_OIL2 30.0 40.0",
                "OIL2_OIL 33.0000 44.0000",
            ]
        );
    }

    #[test]
    fn duplicate_scales_values_above_diagonal_with_upper_correction() {
        let text = SAMPLE.replace("H2O_OIL 20.0 40.0", "H2O_OIL 35.0 40.0");
        let row = DuplicateRow::new("OIL", "OIL2").with_corrections(0.0, -50.0, 20.0);
        let result = duplicate_particle(&document(&text), &row).unwrap();
        let rows = data_rows(&result, Section::ParticleInteractions);
        assert_eq!(rows[2], "H2O_OIL2 42.0000 40.0");
        assert_eq!(rows[5], "OIL2_OIL 30.0 40.0");
    }

    #[test]
    fn duplicate_without_diagonal_copies_when_uncorrected() {
        let text = SAMPLE.replace("OIL_OIL 30.0 40.0\n", "");
        let row = DuplicateRow::new("OIL", "OIL2");
        let result = duplicate_particle(&document(&text), &row).unwrap();
        assert!(result.render().contains("H2O_OIL2 20.0 40.0\n"));

        let row = DuplicateRow::new("OIL", "OIL2").with_corrections(0.0, 5.0, 0.0);
        assert!(matches!(
            duplicate_particle(&document(&text), &row),
            Err(Error::MissingDiagonal(code)) if code == "OIL"
        ));
    }

    #[test]
    fn duplicate_keeps_tab_separated_layout() {
        let text = SAMPLE.replace("H2O_OIL 20.0 40.0", "H2O_OIL\t20.0\t40.0");
        let row = DuplicateRow::new("OIL", "OIL2");
        let result = duplicate_particle(&document(&text), &row).unwrap();
        assert!(result.render().contains("H2O_OIL2\t20.0\t40.0\n"));
    }

    #[test]
    fn remove_drops_description_and_interactions() {
        let result = remove_particles(&document(SAMPLE), &["oil"]);
        assert_eq!(
            data_rows(&result, Section::ParticleDescription),
            vec!["H2O Water 1.0 0.0 18.02 30.0 0.5 CYAN"]
        );
        assert_eq!(
            data_rows(&result, Section::ParticleInteractions),
            vec!["H2O_H2O 25.0 24.0"]
        );
        assert!(result.render().contains("# Code Name"));
        assert!(result.render().contains("Pair 300 350"));
    }

    #[test]
    fn rescale_uses_uniform_ratio() {
        let text = SAMPLE.replace(
            "OIL Oil 1.0 0.0 100.0 100.0 0.8 YELLOW",
            "OIL Oil 1.0 0.0 100.0 100.0 0.8 YELLOW\nFAT Fat 1.0 0.0 80.0 50.0 0.7 GOLD",
        );
        let result = rescale_volumes(&document(&text), 15.0).unwrap();
        let volumes: Vec<String> = result
            .rows(Section::ParticleDescription)
            .map(|l| l.tokens()[VOLUME_COLUMN].to_string())
            .collect();
        assert_eq!(volumes, vec!["15.000", "50.000", "25.000"]);
        assert_eq!(
            data_rows(&result, Section::ParticleInteractions),
            data_rows(&document(&text), Section::ParticleInteractions)
        );
    }

    #[test]
    fn rescale_reports_bad_volume_token() {
        let text = SAMPLE.replace("18.02 30.0", "18.02 lots");
        assert!(matches!(
            rescale_volumes(&document(&text), 15.0),
            Err(Error::InvalidValue { line: 6, .. })
        ));
    }
}
