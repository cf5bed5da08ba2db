//! File-format and naming conventions of particle-set files.
//!
//! The section tags, the comment prefix, the particle naming patterns and
//! the output-filename suffixes are configuration, not format semantics.
//! The built-in defaults are embedded from
//! `resources/default.conventions.toml`; a custom TOML document with the
//! same layout can replace them.

use crate::io::Section;
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;
use thiserror::Error;

const DEFAULT_CONVENTIONS_TOML: &str = include_str!("../resources/default.conventions.toml");

static DEFAULT_CONVENTIONS: OnceLock<Conventions> = OnceLock::new();

/// Errors raised while loading conventions.
#[derive(Debug, Error)]
pub enum Error {
    /// The TOML document could not be deserialized.
    #[error("failed to parse conventions: {0}")]
    Toml(#[from] toml::de::Error),

    /// A naming pattern is not a valid regular expression.
    #[error("invalid '{name}' pattern: {source}")]
    Pattern {
        name: &'static str,
        #[source]
        source: regex::Error,
    },

    /// A tag or filename format lacks its `{}` placeholder.
    #[error("format string '{0}' must contain exactly one '{{}}' placeholder")]
    Placeholder(String),
}

#[derive(Debug, Clone, Deserialize)]
struct RawConventions {
    #[serde(default)]
    format: FormatConventions,
    #[serde(default)]
    naming: RawNaming,
    #[serde(default)]
    output: OutputSuffixes,
}

/// Section tags and the comment prefix.
#[derive(Debug, Clone, Deserialize)]
pub struct FormatConventions {
    #[serde(default = "default_ignore_prefix")]
    pub ignore_prefix: String,
    #[serde(default = "default_section_start")]
    pub section_start: String,
    #[serde(default = "default_section_end")]
    pub section_end: String,
    #[serde(default)]
    pub tags: SectionTags,
}

fn default_ignore_prefix() -> String {
    "#".into()
}
fn default_section_start() -> String {
    "[{}]".into()
}
fn default_section_end() -> String {
    "[/{}]".into()
}

impl Default for FormatConventions {
    fn default() -> Self {
        Self {
            ignore_prefix: default_ignore_prefix(),
            section_start: default_section_start(),
            section_end: default_section_end(),
            tags: SectionTags::default(),
        }
    }
}

impl FormatConventions {
    pub fn tag(&self, section: Section) -> &str {
        match section {
            Section::Version => &self.tags.version,
            Section::ParticleDescription => &self.tags.particle_description,
            Section::ParticleInteractions => &self.tags.particle_interactions,
            Section::AminoAcidDescription => &self.tags.amino_acid_description,
        }
    }

    pub fn start_line(&self, section: Section) -> String {
        self.section_start.replacen("{}", self.tag(section), 1)
    }

    pub fn end_line(&self, section: Section) -> String {
        self.section_end.replacen("{}", self.tag(section), 1)
    }

    pub fn is_comment(&self, line: &str) -> bool {
        !self.ignore_prefix.is_empty() && line.starts_with(&self.ignore_prefix)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SectionTags {
    #[serde(default = "default_version_tag")]
    pub version: String,
    #[serde(default = "default_particle_description_tag")]
    pub particle_description: String,
    #[serde(default = "default_particle_interactions_tag")]
    pub particle_interactions: String,
    #[serde(default = "default_amino_acid_description_tag")]
    pub amino_acid_description: String,
}

fn default_version_tag() -> String {
    "VERSION".into()
}
fn default_particle_description_tag() -> String {
    "PARTICLE_DESCRIPTION".into()
}
fn default_particle_interactions_tag() -> String {
    "PARTICLE_INTERACTIONS".into()
}
fn default_amino_acid_description_tag() -> String {
    "AMINO_ACID_DESCRIPTION".into()
}

impl Default for SectionTags {
    fn default() -> Self {
        Self {
            version: default_version_tag(),
            particle_description: default_particle_description_tag(),
            particle_interactions: default_particle_interactions_tag(),
            amino_acid_description: default_amino_acid_description_tag(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct RawNaming {
    #[serde(default = "default_particle_pattern")]
    particle: String,
    #[serde(default = "default_backbone_pattern")]
    backbone: String,
    #[serde(default = "default_probe_pattern")]
    probe: String,
    #[serde(default = "default_probe_ending")]
    probe_ending: String,
    #[serde(default = "default_probe_number_pattern")]
    probe_number: String,
    #[serde(default = "default_particle_set_file_pattern")]
    particle_set_file: String,
}

fn default_particle_pattern() -> String {
    r"^[A-Z][A-Za-z0-9]{0,9}$".into()
}
fn default_backbone_pattern() -> String {
    r"^[A-Z][A-Za-z0-9]*Bb$".into()
}
fn default_probe_pattern() -> String {
    r"^[A-Z][A-Za-z0-9]*Pd[0-9]+$".into()
}
fn default_probe_ending() -> String {
    r"Pd[0-9]+".into()
}
fn default_probe_number_pattern() -> String {
    r"^([A-Z][A-Za-z0-9]*?)(Pd)([0-9]+)$".into()
}
fn default_particle_set_file_pattern() -> String {
    r"^ParticleSet[A-Za-z0-9_()\-.][A-Za-z0-9_()\-.]*\.txt$".into()
}

impl Default for RawNaming {
    fn default() -> Self {
        Self {
            particle: default_particle_pattern(),
            backbone: default_backbone_pattern(),
            probe: default_probe_pattern(),
            probe_ending: default_probe_ending(),
            probe_number: default_probe_number_pattern(),
            particle_set_file: default_particle_set_file_pattern(),
        }
    }
}

/// Compiled particle naming patterns.
///
/// A protein backbone particle ends in a two-character marker; its probe
/// particles replace the marker with the probe ending and carry a numeric
/// suffix (e.g. backbone `AlaBb`, probes `AlaPd1`, `AlaPd2`).
#[derive(Debug, Clone)]
pub struct Naming {
    particle: Regex,
    backbone: Regex,
    probe: Regex,
    probe_ending: String,
    probe_number: Regex,
    particle_set_file: Regex,
}

impl Naming {
    fn compile(raw: &RawNaming) -> Result<Self, Error> {
        Ok(Self {
            particle: compile("particle", &raw.particle)?,
            backbone: compile("backbone", &raw.backbone)?,
            probe: compile("probe", &raw.probe)?,
            probe_ending: raw.probe_ending.clone(),
            probe_number: compile("probe_number", &raw.probe_number)?,
            particle_set_file: compile("particle_set_file", &raw.particle_set_file)?,
        })
    }

    pub fn is_valid_particle(&self, code: &str) -> bool {
        self.particle.is_match(code)
    }

    pub fn is_backbone(&self, code: &str) -> bool {
        self.backbone.is_match(code)
    }

    pub fn is_probe(&self, code: &str) -> bool {
        self.probe.is_match(code)
    }

    pub fn is_valid_particle_set_filename(&self, filename: &str) -> bool {
        self.particle_set_file.is_match(filename)
    }

    /// Pattern matching every probe of `backbone`, or `None` if `backbone`
    /// is not a backbone particle.
    pub fn probe_pattern_for(&self, backbone: &str) -> Option<Regex> {
        if !self.is_backbone(backbone) {
            return None;
        }
        let cut = backbone.char_indices().rev().nth(1).map(|(i, _)| i)?;
        let stem = &backbone[..cut];
        Regex::new(&format!("^{}{}$", regex::escape(stem), self.probe_ending)).ok()
    }

    /// Probe code with its numeric suffix incremented by one.
    pub fn increment_probe(&self, probe: &str) -> Option<String> {
        let caps = self.probe_number.captures(probe)?;
        let stem = caps.get(1)?.as_str();
        let marker = caps.get(2)?.as_str();
        let number: u64 = caps.get(3)?.as_str().parse().ok()?;
        Some(format!("{}{}{}", stem, marker, number.checked_add(1)?))
    }
}

fn compile(name: &'static str, pattern: &str) -> Result<Regex, Error> {
    Regex::new(pattern).map_err(|source| Error::Pattern { name, source })
}

/// Filename formats used when an edit's target name is already taken.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputSuffixes {
    #[serde(default = "default_duplicate_suffix")]
    pub duplicate: String,
    #[serde(default = "default_remove_suffix")]
    pub remove: String,
    #[serde(default = "default_rescale_suffix")]
    pub rescale: String,
    #[serde(default = "default_probe_increment_suffix")]
    pub probe_increment: String,
}

fn default_duplicate_suffix() -> String {
    "{}_Duplicate".into()
}
fn default_remove_suffix() -> String {
    "{}_Remove".into()
}
fn default_rescale_suffix() -> String {
    "{}_VminRescale".into()
}
fn default_probe_increment_suffix() -> String {
    "{}_ProbeIncrement".into()
}

impl Default for OutputSuffixes {
    fn default() -> Self {
        Self {
            duplicate: default_duplicate_suffix(),
            remove: default_remove_suffix(),
            rescale: default_rescale_suffix(),
            probe_increment: default_probe_increment_suffix(),
        }
    }
}

/// Complete set of conventions used by the codec, the query facade and the
/// editor.
#[derive(Debug, Clone)]
pub struct Conventions {
    pub format: FormatConventions,
    pub naming: Naming,
    pub output: OutputSuffixes,
}

impl Conventions {
    pub fn from_toml(text: &str) -> Result<Self, Error> {
        let raw: RawConventions = toml::from_str(text)?;
        for fmt in [
            &raw.format.section_start,
            &raw.format.section_end,
            &raw.output.duplicate,
            &raw.output.remove,
            &raw.output.rescale,
            &raw.output.probe_increment,
        ] {
            if fmt.matches("{}").count() != 1 {
                return Err(Error::Placeholder(fmt.clone()));
            }
        }
        Ok(Self {
            format: raw.format,
            naming: Naming::compile(&raw.naming)?,
            output: raw.output,
        })
    }
}

impl Default for Conventions {
    fn default() -> Self {
        default_conventions().clone()
    }
}

pub fn load_conventions(custom_toml: Option<&str>) -> Result<Conventions, Error> {
    match custom_toml {
        Some(toml) => Conventions::from_toml(toml),
        None => Ok(default_conventions().clone()),
    }
}

pub fn default_conventions() -> &'static Conventions {
    DEFAULT_CONVENTIONS.get_or_init(|| {
        Conventions::from_toml(DEFAULT_CONVENTIONS_TOML)
            .expect("Failed to parse embedded default conventions. This is a library bug.")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_conventions_load() {
        let conv = default_conventions();
        assert_eq!(conv.format.ignore_prefix, "#");
        assert_eq!(
            conv.format.start_line(Section::ParticleDescription),
            "[PARTICLE_DESCRIPTION]"
        );
        assert_eq!(conv.format.end_line(Section::Version), "[/VERSION]");
    }

    #[test]
    fn custom_conventions_fill_missing_fields_with_defaults() {
        let custom = r#"
            [format]
            ignore_prefix = "//"

            [format.tags]
            version = "Version"
        "#;
        let conv = load_conventions(Some(custom)).unwrap();
        assert_eq!(conv.format.ignore_prefix, "//");
        assert_eq!(conv.format.start_line(Section::Version), "[Version]");
        assert_eq!(
            conv.format.start_line(Section::ParticleInteractions),
            "[PARTICLE_INTERACTIONS]"
        );
        assert!(conv.naming.is_valid_particle("H2O"));
    }

    #[test]
    fn errors_on_invalid_toml() {
        assert!(matches!(
            load_conventions(Some("not valid [[[toml")),
            Err(Error::Toml(_))
        ));
    }

    #[test]
    fn errors_on_invalid_pattern() {
        let custom = r#"
            [naming]
            particle = "([unclosed"
        "#;
        assert!(matches!(
            load_conventions(Some(custom)),
            Err(Error::Pattern {
                name: "particle",
                ..
            })
        ));
    }

    #[test]
    fn errors_on_missing_placeholder() {
        let custom = r#"
            [output]
            duplicate = "copy"
        "#;
        assert!(matches!(
            load_conventions(Some(custom)),
            Err(Error::Placeholder(_))
        ));
    }

    #[test]
    fn comment_detection_uses_prefix() {
        let conv = default_conventions();
        assert!(conv.format.is_comment("# note"));
        assert!(!conv.format.is_comment(" H2O Water"));
    }

    #[test]
    fn particle_pattern_limits_length() {
        let naming = &default_conventions().naming;
        assert!(naming.is_valid_particle("OIL2"));
        assert!(!naming.is_valid_particle("oil"));
        assert!(!naming.is_valid_particle("ABCDEFGHIJK"));
    }

    #[test]
    fn probe_pattern_is_derived_from_backbone() {
        let naming = &default_conventions().naming;
        let pattern = naming.probe_pattern_for("AlaBb").unwrap();
        assert!(pattern.is_match("AlaPd1"));
        assert!(pattern.is_match("AlaPd12"));
        assert!(!pattern.is_match("GlyPd1"));
        assert!(!pattern.is_match("AlaBb"));
        assert!(naming.probe_pattern_for("Ala").is_none());
    }

    #[test]
    fn increment_probe_bumps_numeric_suffix() {
        let naming = &default_conventions().naming;
        assert_eq!(naming.increment_probe("AlaPd1").as_deref(), Some("AlaPd2"));
        assert_eq!(naming.increment_probe("AlaPd9").as_deref(), Some("AlaPd10"));
        assert_eq!(naming.increment_probe("AlaBb"), None);
    }

    #[test]
    fn particle_set_filename_pattern() {
        let naming = &default_conventions().naming;
        assert!(naming.is_valid_particle_set_filename("ParticleSet_V02.txt"));
        assert!(!naming.is_valid_particle_set_filename("Particles.txt"));
        assert!(!naming.is_valid_particle_set_filename("ParticleSet.txt"));
    }
}
