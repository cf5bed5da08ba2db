use std::io::{self, Write};

use anyhow::Error;

use crate::util::text::wrap;

#[rustfmt::skip]
pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "   ╔══════════════════════════════════════════════════════════════╗");
    let _ = writeln!(stderr, "   ║  ✗ Error                                                     ║");
    let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");

    for line in wrap(&err.to_string(), 59) {
        let _ = writeln!(stderr, "   ║  {:<59} ║", line);
    }

    let mut source = err.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Caused by:                                                  ║");
        for line in wrap(&cause.to_string(), 57) {
            let _ = writeln!(stderr, "   ║    {:<57} ║", line);
        }
        source = cause.source();
    }

    if let Some(hints) = HintCollector::collect(err) {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Hints:                                                      ║");
        for hint in hints {
            let wrapped = wrap(&hint, 55);
            if let Some((first, rest)) = wrapped.split_first() {
                let _ = writeln!(stderr, "   ║    • {:<55} ║", first);
                for line in rest {
                    let _ = writeln!(stderr, "   ║      {:<55} ║", line);
                }
            }
        }
    }

    let _ = writeln!(stderr, "   ╚══════════════════════════════════════════════════════════════╝");
    let _ = writeln!(stderr);
}

struct HintCollector {
    hints: Vec<String>,
}

impl HintCollector {
    fn collect(err: &Error) -> Option<Vec<String>> {
        let mut collector = Self { hints: Vec::new() };

        for cause in err.chain() {
            if let Some(e) = cause.downcast_ref::<dpd_pset::IoError>() {
                collector.collect_codec_hints(e);
            } else if let Some(e) = cause.downcast_ref::<dpd_pset::EditError>() {
                collector.collect_edit_hints(e);
            } else if let Some(e) = cause.downcast_ref::<dpd_pset::StoreError>() {
                collector.collect_store_hints(e);
            } else if let Some(e) = cause.downcast_ref::<dpd_pset::ConventionsError>() {
                collector.collect_conventions_hints(e);
            } else if let Some(e) = cause.downcast_ref::<std::io::Error>() {
                collector.collect_std_io_hints(e);
            } else {
                continue;
            }
            break;
        }

        if collector.hints.is_empty() {
            None
        } else {
            Some(collector.hints)
        }
    }

    fn add(&mut self, hint: impl Into<String>) {
        self.hints.push(hint.into());
    }

    fn collect_codec_hints(&mut self, err: &dpd_pset::IoError) {
        use dpd_pset::IoError;

        match err {
            IoError::Io { source } => self.collect_std_io_hints(source),

            IoError::Parse { section, line, .. } => {
                self.add(format!(
                    "The {section} section could not be read near line {line}"
                ));
                self.add("Particle rows need 8 columns: code, name, mass, charge, mass (g/mol), volume, radius, color");
                self.add("Interaction rows need one value per temperature of the 'Pair' header");
            }

            IoError::Structure { line, .. } => {
                self.add(format!("Check the section tags around line {line}"));
                self.add("Every [TAG] needs a matching [/TAG] and sections cannot nest");
            }

            IoError::MissingSection(section) => {
                self.add(format!("Add the {section} section to the file"));
                self.add("Version, particle description and particle interactions are required");
            }

            IoError::UnsupportedVersion(_) => {
                self.add(format!(
                    "Only particle-set version {} is supported",
                    dpd_pset::io::SUPPORTED_VERSION
                ));
            }
        }
    }

    fn collect_edit_hints(&mut self, err: &dpd_pset::EditError) {
        use dpd_pset::EditError;

        match err {
            EditError::Io { source, .. } => self.collect_std_io_hints(source),
            EditError::Document(e) => self.collect_codec_hints(e),
            EditError::MalformedRequest(_) => {
                self.add("Output names must look like ParticleSet<Name>.txt");
                self.add("New particle codes start with an upper-case letter, use letters and digits only and have at most 10 characters");
            }
            EditError::UnknownParticle(code) => {
                self.add(format!("'{code}' is not a particle of the loaded set"));
                self.add("Run 'dpset inspect --particles' to list the available codes");
            }
            EditError::LastParticle(_) => {
                self.add("A particle set must keep at least one particle");
            }
            EditError::MissingDiagonal(code) => {
                self.add(format!("Add a {code}_{code} row to the interaction section"));
                self.add("Or duplicate with zero --lower and --upper corrections");
            }
            EditError::InvalidValue { line, .. } => {
                self.add(format!("Fix the numeric value on line {line} of the current file"));
            }
            EditError::NothingToIncrement => {
                self.add("No probe particle has a free incremented code");
                self.add("Run 'dpset probes' to list the probe particles");
            }
            EditError::NoFreeFilename { .. } => {
                self.add("Choose a different output name or clean up the custom directory");
            }
        }
    }

    fn collect_store_hints(&mut self, err: &dpd_pset::StoreError) {
        use dpd_pset::StoreError;

        match err {
            StoreError::InvalidArgument(_) => {
                self.add("Particle codes are case sensitive");
                self.add("Run 'dpset inspect --particles' to list the available codes");
            }
            StoreError::CorruptAminoAcid { .. } => {
                self.add("Each amino-acid code and name may appear only once");
            }
        }
    }

    fn collect_conventions_hints(&mut self, err: &dpd_pset::ConventionsError) {
        use dpd_pset::ConventionsError;

        match err {
            ConventionsError::Toml(_) => {
                self.add("The conventions file has invalid TOML syntax");
            }
            ConventionsError::Pattern { name, .. } => {
                self.add(format!("Fix the regular expression of naming.{name}"));
            }
            ConventionsError::Placeholder(_) => {
                self.add("Section tag and output formats need exactly one '{}' placeholder");
            }
        }
    }

    fn collect_std_io_hints(&mut self, source: &std::io::Error) {
        use std::io::ErrorKind;

        match source.kind() {
            ErrorKind::NotFound => {
                self.add("File or directory not found");
                self.add("Check the --particle-set path");
            }
            ErrorKind::PermissionDenied => {
                self.add("Permission denied accessing the file");
                self.add("Check that the custom directory is writable");
            }
            ErrorKind::InvalidData => {
                self.add("The file is not valid UTF-8 text");
            }
            _ => {
                self.add("I/O operation failed");
                self.add("Check file path, permissions and disk space");
            }
        }
    }
}
