use super::{Document, Line, Section, error::Error};
use crate::conventions::Conventions;
use crate::model::amino_acid::AminoAcidDescription;
use crate::model::particle::ParticleDescription;
use crate::model::types::{StandardColor, Temperature};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

/// The only file version this codec understands.
pub const SUPPORTED_VERSION: &str = "1.0.0.0";

const PARTICLE_COLUMNS: usize = 8;
const AMINO_ACID_COLUMNS: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct ParticleRecord {
    pub line: usize,
    pub particle: ParticleDescription,
}

/// One interaction row, resolved against the declared particle codes.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionRecord {
    pub line: usize,
    pub first: String,
    pub second: String,
    /// Values in header column order.
    pub values: Vec<(Temperature, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AminoAcidRecord {
    pub line: usize,
    pub amino_acid: AminoAcidDescription,
}

/// Decoded content of a particle-set file.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleSetData {
    pub version: String,
    pub particles: Vec<ParticleRecord>,
    /// Header temperatures sorted ascending by value.
    pub temperatures: Vec<Temperature>,
    pub interactions: Vec<InteractionRecord>,
    /// `None` when the file has no amino-acid section.
    pub amino_acids: Option<Vec<AminoAcidRecord>>,
}

pub fn read(text: &str, conventions: &Conventions) -> Result<ParticleSetData, Error> {
    let document = Document::parse(text, &conventions.format)?;
    decode(&document)
}

pub fn read_path(path: &Path, conventions: &Conventions) -> Result<ParticleSetData, Error> {
    let document = Document::read_path(path, &conventions.format)?;
    decode(&document)
}

pub fn decode(document: &Document) -> Result<ParticleSetData, Error> {
    for section in [
        Section::Version,
        Section::ParticleDescription,
        Section::ParticleInteractions,
    ] {
        if !document.has_section(section) {
            return Err(Error::MissingSection(section));
        }
    }

    let version = parse_version(document)?;
    let particles = parse_particles(document)?;

    let header = document
        .header()
        .ok_or(Error::MissingSection(Section::ParticleInteractions))?;
    let columns = parse_header(header)?;

    let codes: HashMap<String, &str> = particles
        .iter()
        .map(|r| (r.particle.code.to_ascii_uppercase(), r.particle.code.as_str()))
        .collect();
    let interactions = document
        .rows(Section::ParticleInteractions)
        .map(|line| parse_interaction(line, &columns, &codes))
        .collect::<Result<Vec<_>, _>>()?;

    let amino_acids = if document.has_section(Section::AminoAcidDescription) {
        Some(
            document
                .rows(Section::AminoAcidDescription)
                .map(parse_amino_acid)
                .collect::<Result<Vec<_>, _>>()?,
        )
    } else {
        None
    };

    let mut temperatures = columns;
    temperatures.sort();

    Ok(ParticleSetData {
        version,
        particles,
        temperatures,
        interactions,
        amino_acids,
    })
}

fn parse_version(document: &Document) -> Result<String, Error> {
    let version = document
        .rows(Section::Version)
        .next()
        .and_then(Line::first_token)
        .unwrap_or_default();
    if version != SUPPORTED_VERSION {
        return Err(Error::UnsupportedVersion(version.to_string()));
    }
    Ok(version.to_string())
}

fn parse_particles(document: &Document) -> Result<Vec<ParticleRecord>, Error> {
    let section = Section::ParticleDescription;
    let mut records: Vec<ParticleRecord> = Vec::new();

    for line in document.rows(section) {
        let number = line.number();
        let tokens = line.tokens();
        if tokens.len() != PARTICLE_COLUMNS {
            return Err(Error::parse(
                section,
                number,
                format!(
                    "expected {} columns, found {}",
                    PARTICLE_COLUMNS,
                    tokens.len()
                ),
            ));
        }

        let color = StandardColor::from_str(tokens[7])
            .map_err(|e| Error::parse(section, number, e.to_string()))?;
        let particle = ParticleDescription {
            code: tokens[0].to_string(),
            name: tokens[1].to_string(),
            mass_dpd: parse_f64(tokens[2], "mass", section, number)?,
            charge: parse_f64(tokens[3], "charge", section, number)?,
            mass_g_mol: parse_f64(tokens[4], "mass (g/mol)", section, number)?,
            volume: parse_f64(tokens[5], "volume", section, number)?,
            graphics_radius: parse_f64(tokens[6], "graphics radius", section, number)?,
            color,
        };
        particle
            .validate()
            .map_err(|reason| Error::parse(section, number, reason))?;

        if records
            .iter()
            .any(|r| r.particle.code.eq_ignore_ascii_case(&particle.code))
        {
            return Err(Error::parse(
                section,
                number,
                format!("particle '{}' is declared more than once", particle.code),
            ));
        }
        records.push(ParticleRecord {
            line: number,
            particle,
        });
    }

    if records.is_empty() {
        return Err(Error::parse(
            section,
            0,
            "at least one particle must be declared",
        ));
    }
    Ok(records)
}

/// Header temperatures in file column order.
fn parse_header(header: &Line) -> Result<Vec<Temperature>, Error> {
    let section = Section::ParticleInteractions;
    let number = header.number();
    let mut columns: Vec<Temperature> = Vec::new();
    for token in header.tokens().into_iter().skip(1) {
        let temperature =
            Temperature::parse(token).map_err(|e| Error::parse(section, number, e.to_string()))?;
        if columns.contains(&temperature) {
            return Err(Error::parse(
                section,
                number,
                format!("temperature {temperature} appears more than once"),
            ));
        }
        columns.push(temperature);
    }
    if columns.is_empty() {
        return Err(Error::parse(section, number, "header lists no temperatures"));
    }
    Ok(columns)
}

/// Splits a pair token such as `H2O_OIL` into its two codes.
pub(crate) fn split_pair(token: &str) -> Option<(&str, &str)> {
    let mut parts = token.split('_');
    let first = parts.next().filter(|p| !p.is_empty())?;
    let second = parts.next().filter(|p| !p.is_empty())?;
    if parts.next().is_some() {
        return None;
    }
    Some((first, second))
}

fn parse_interaction(
    line: &Line,
    columns: &[Temperature],
    codes: &HashMap<String, &str>,
) -> Result<InteractionRecord, Error> {
    let section = Section::ParticleInteractions;
    let number = line.number();
    let tokens = line.tokens();

    let (a, b) = split_pair(tokens[0]).ok_or_else(|| {
        Error::parse(
            section,
            number,
            format!("'{}' is not a particle pair", tokens[0]),
        )
    })?;
    let resolve = |code: &str| {
        codes
            .get(&code.to_ascii_uppercase())
            .map(|c| c.to_string())
            .ok_or_else(|| {
                Error::parse(
                    section,
                    number,
                    format!("pair '{}' references undeclared particle '{}'", tokens[0], code),
                )
            })
    };
    let first = resolve(a)?;
    let second = resolve(b)?;

    let raw_values = &tokens[1..];
    if raw_values.len() != columns.len() {
        return Err(Error::parse(
            section,
            number,
            format!(
                "expected {} values, found {}",
                columns.len(),
                raw_values.len()
            ),
        ));
    }
    let values = columns
        .iter()
        .zip(raw_values)
        .map(|(t, raw)| Ok((t.clone(), parse_f64(raw, "interaction", section, number)?)))
        .collect::<Result<Vec<_>, Error>>()?;

    Ok(InteractionRecord {
        line: number,
        first,
        second,
        values,
    })
}

fn parse_amino_acid(line: &Line) -> Result<AminoAcidRecord, Error> {
    let section = Section::AminoAcidDescription;
    let tokens = line.tokens();
    if tokens.len() != AMINO_ACID_COLUMNS {
        return Err(Error::parse(
            section,
            line.number(),
            format!(
                "expected {} columns, found {}",
                AMINO_ACID_COLUMNS,
                tokens.len()
            ),
        ));
    }
    Ok(AminoAcidRecord {
        line: line.number(),
        amino_acid: AminoAcidDescription::new(
            tokens[0], tokens[1], tokens[2], tokens[3], tokens[4],
        ),
    })
}

fn parse_f64(token: &str, what: &str, section: Section, line: usize) -> Result<f64, Error> {
    token
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::parse(section, line, format!("invalid {what} value '{token}'")))
}
