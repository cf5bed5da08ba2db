//! Editing operations that produce new particle-set files.
//!
//! Every operation reads the current file once, rewrites its rows section by
//! section and writes the result under a free name in the custom directory.
//! The loaded store is never modified; callers load the new file to pick up
//! the change.
//!
//! Each operation comes in two forms. The `try_*` methods return the path of
//! the written file or the reason nothing was written. The plain methods
//! return `true` on success and log the reason otherwise.

mod error;
mod naming;
mod request;
mod rewrite;

pub use error::Error;
pub use naming::MAX_FILENAME_ATTEMPTS;
pub use request::{
    DEFAULT_MIN_VOLUME, DuplicateRequest, DuplicateRow, ProbeIncrementRequest, RemoveAction,
    RemoveRequest, RemoveRow, RescaleRequest,
};

use crate::conventions::Conventions;
use crate::io::{self, Document};
use crate::session::ParticleSetPaths;
use crate::store::ParticleSet;
use log::{info, warn};
use request::validate_filename;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy)]
pub struct Editor<'a> {
    set: &'a ParticleSet,
    conventions: &'a Conventions,
    paths: &'a ParticleSetPaths,
}

impl<'a> Editor<'a> {
    pub fn new(
        set: &'a ParticleSet,
        conventions: &'a Conventions,
        paths: &'a ParticleSetPaths,
    ) -> Self {
        Self {
            set,
            conventions,
            paths,
        }
    }

    pub fn duplicate_particles(&self, request: &DuplicateRequest) -> bool {
        report("duplicate particles", self.try_duplicate_particles(request))
    }

    pub fn remove_particles(&self, request: &RemoveRequest) -> bool {
        report("remove particles", self.try_remove_particles(request))
    }

    pub fn rescale_min_volume(&self, request: &RescaleRequest) -> bool {
        report("rescale minimum volume", self.try_rescale_min_volume(request))
    }

    pub fn increment_probe_particles(&self, request: &ProbeIncrementRequest) -> bool {
        report(
            "increment probe particles",
            self.try_increment_probe_particles(request),
        )
    }

    /// Duplicates every non-blank row of `request`, in row order.
    ///
    /// A row whose new code equals its source code (ignoring case) is
    /// skipped.
    pub fn try_duplicate_particles(&self, request: &DuplicateRequest) -> Result<PathBuf, Error> {
        validate_filename(&request.filename, &self.conventions.naming)?;
        let rows: Vec<&DuplicateRow> = request
            .rows
            .iter()
            .filter(|row| !row.is_blank())
            .filter(|row| !row.particle.trim().eq_ignore_ascii_case(row.new_particle.trim()))
            .collect();
        if rows.is_empty() {
            return Err(Error::malformed("no particle selected for duplication"));
        }
        self.validate_duplicates(&rows)?;

        let mut document = self.read_current()?;
        for row in rows {
            document = rewrite::duplicate_particle(&document, row)?;
        }
        self.write(
            &document,
            &request.filename,
            &self.conventions.output.duplicate,
        )
    }

    pub fn try_remove_particles(&self, request: &RemoveRequest) -> Result<PathBuf, Error> {
        validate_filename(&request.filename, &self.conventions.naming)?;
        let mut codes: Vec<&str> = Vec::new();
        for code in request.selected() {
            if !self.set.has_particle(code) {
                return Err(Error::UnknownParticle(code.to_string()));
            }
            if !codes.contains(&code) {
                codes.push(code);
            }
        }
        if codes.is_empty() {
            return Err(Error::malformed("no particle selected for removal"));
        }
        if codes.len() >= self.set.particle_count() {
            return Err(Error::LastParticle(codes.join(", ")));
        }

        let document = rewrite::remove_particles(&self.read_current()?, &codes);
        self.write(&document, &request.filename, &self.conventions.output.remove)
    }

    pub fn try_rescale_min_volume(&self, request: &RescaleRequest) -> Result<PathBuf, Error> {
        validate_filename(&request.filename, &self.conventions.naming)?;
        let new_min = request.new_min_volume;
        if !(new_min.is_finite() && new_min > 0.0) {
            return Err(Error::malformed(format!(
                "new minimum volume {new_min} must be positive"
            )));
        }
        let document = rewrite::rescale_volumes(&self.read_current()?, new_min)?;
        self.write(&document, &request.filename, &self.conventions.output.rescale)
    }

    /// Duplicates each probe particle under its code with the numeric suffix
    /// incremented, keeping the source name and applying no corrections.
    pub fn try_increment_probe_particles(
        &self,
        request: &ProbeIncrementRequest,
    ) -> Result<PathBuf, Error> {
        validate_filename(&request.filename, &self.conventions.naming)?;
        let naming = &self.conventions.naming;
        let mut taken: HashSet<String> = HashSet::new();
        let mut rows = Vec::new();

        for code in self.set.sorted_particles() {
            if !naming.is_probe(code) {
                continue;
            }
            let Some(candidate) = naming.increment_probe(code) else {
                continue;
            };
            if !naming.is_valid_particle(&candidate)
                || self.set.has_particle(&candidate)
                || !taken.insert(candidate.clone())
            {
                continue;
            }
            let name = self
                .set
                .particle(code)
                .map(|p| p.name.clone())
                .unwrap_or_default();
            rows.push(DuplicateRow::new(code, candidate).with_name(name));
        }
        if rows.is_empty() {
            return Err(Error::NothingToIncrement);
        }

        let mut document = self.read_current()?;
        for row in &rows {
            document = rewrite::duplicate_particle(&document, row)?;
        }
        self.write(
            &document,
            &request.filename,
            &self.conventions.output.probe_increment,
        )
    }

    fn validate_duplicates(&self, rows: &[&DuplicateRow]) -> Result<(), Error> {
        let naming = &self.conventions.naming;
        let mut created: Vec<&str> = Vec::new();
        for row in rows {
            let old = row.particle.trim();
            let new = row.new_particle.trim();
            if !self.set.has_particle(old) && !created.contains(&old) {
                return Err(Error::UnknownParticle(old.to_string()));
            }
            if !naming.is_valid_particle(new) {
                return Err(Error::malformed(format!(
                    "'{new}' is not a valid particle code"
                )));
            }
            let exists = self
                .set
                .sorted_particles()
                .into_iter()
                .chain(created.iter().copied())
                .any(|code| code.eq_ignore_ascii_case(new));
            if exists {
                return Err(Error::malformed(format!("particle '{new}' already exists")));
            }
            row.validate()?;
            created.push(new);
        }
        Ok(())
    }

    /// Reads the current file as it is on disk. It may have changed since
    /// the store was loaded, so it must decode before any row is rewritten.
    fn read_current(&self) -> Result<Document, Error> {
        let document = Document::read_path(&self.paths.current, &self.conventions.format)?;
        io::decode(&document)?;
        Ok(document)
    }

    /// Checks that `document` still decodes, then writes it to the custom
    /// directory under the first free name derived from `filename`.
    fn write(&self, document: &Document, filename: &str, suffix: &str) -> Result<PathBuf, Error> {
        io::decode(document)?;
        let name = naming::free_filename(
            filename,
            suffix,
            &[self.paths.source_dir.as_path(), self.paths.custom_dir.as_path()],
        )?;
        fs::create_dir_all(&self.paths.custom_dir).map_err(|source| Error::Io {
            path: self.paths.custom_dir.clone(),
            source,
        })?;
        let path = self.paths.custom_dir.join(name);
        fs::write(&path, document.render()).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;
        info!("Wrote particle set {}", path.display());
        Ok(path)
    }
}

fn report(operation: &str, result: Result<PathBuf, Error>) -> bool {
    match result {
        Ok(_) => true,
        Err(e) => {
            warn!("Could not {operation}: {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::Section;
    use std::path::Path;
    use tempfile::{TempDir, tempdir};

    const SAMPLE: &str = "\
[VERSION]
1.0.0.0
[/VERSION]
[PARTICLE_DESCRIPTION]
H2O Water 1.0 0.0 18.02 30.0 0.5 CYAN
OIL Oil 1.0 0.0 100.0 100.0 0.8 YELLOW
[/PARTICLE_DESCRIPTION]
[PARTICLE_INTERACTIONS]
Pair 300
H2O_H2O 25.0
H2O_OIL 25.0
OIL_OIL 30.0
[/PARTICLE_INTERACTIONS]
";

    struct Fixture {
        _source: TempDir,
        _custom: TempDir,
        paths: ParticleSetPaths,
        conventions: Conventions,
        set: ParticleSet,
    }

    impl Fixture {
        fn new(text: &str) -> Self {
            let source = tempdir().unwrap();
            let custom = tempdir().unwrap();
            let current = source.path().join("ParticleSetBase.txt");
            fs::write(&current, text).unwrap();
            let conventions = Conventions::default();
            let set = ParticleSet::read_path(&current, &conventions).unwrap();
            let paths = ParticleSetPaths::new(current, source.path(), custom.path());
            Self {
                _source: source,
                _custom: custom,
                paths,
                conventions,
                set,
            }
        }

        fn editor(&self) -> Editor<'_> {
            Editor::new(&self.set, &self.conventions, &self.paths)
        }

        fn reload(&self, path: &Path) -> ParticleSet {
            ParticleSet::read_path(path, &self.conventions).unwrap()
        }
    }

    #[test]
    fn duplicate_end_to_end() {
        let fx = Fixture::new(SAMPLE);
        let request = DuplicateRequest::new(
            "ParticleSetDup.txt",
            vec![DuplicateRow::new("OIL", "OIL2").with_corrections(10.0, -20.0, 20.0)],
        );
        let path = fx.editor().try_duplicate_particles(&request).unwrap();
        assert_eq!(path, fx.paths.custom_dir.join("ParticleSetDup.txt"));

        let set = fx.reload(&path);
        assert_eq!(set.sorted_particles(), vec!["H2O", "OIL", "OIL2"]);
        assert_eq!(set.particle("OIL2").unwrap().name, "Oil");
        assert_eq!(set.interaction("OIL2", "OIL2", "300").unwrap(), Some(30.0));
        assert_eq!(set.interaction("OIL2", "OIL", "300").unwrap(), Some(33.0));
        // 25 is below the OIL diagonal of 30, so the lower correction applies.
        assert_eq!(set.interaction("OIL2", "H2O", "300").unwrap(), Some(20.0));
        assert_eq!(set.interaction("H2O", "OIL", "300").unwrap(), Some(25.0));
    }

    #[test]
    fn duplicate_of_same_code_is_skipped() {
        let fx = Fixture::new(SAMPLE);
        let request = DuplicateRequest::new(
            "ParticleSetDup.txt",
            vec![DuplicateRow::new("OIL", "oil")],
        );
        assert!(matches!(
            fx.editor().try_duplicate_particles(&request),
            Err(Error::MalformedRequest(_))
        ));
        assert!(!fx.paths.custom_dir.join("ParticleSetDup.txt").exists());
    }

    #[test]
    fn duplicate_rejects_existing_or_invalid_codes() {
        let fx = Fixture::new(SAMPLE);
        for new in ["H2O", "h2o", "oil2", "VeryLongCode1"] {
            let request = DuplicateRequest::new(
                "ParticleSetDup.txt",
                vec![DuplicateRow::new("OIL", new)],
            );
            assert!(
                !fx.editor().duplicate_particles(&request),
                "'{new}' should be rejected"
            );
        }
        let request = DuplicateRequest::new(
            "ParticleSetDup.txt",
            vec![DuplicateRow::new("FAT", "FAT2")],
        );
        assert!(matches!(
            fx.editor().try_duplicate_particles(&request),
            Err(Error::UnknownParticle(code)) if code == "FAT"
        ));
    }

    #[test]
    fn duplicate_can_copy_a_particle_created_earlier_in_the_request() {
        let fx = Fixture::new(SAMPLE);
        let request = DuplicateRequest::new(
            "ParticleSetDup.txt",
            vec![
                DuplicateRow::new("OIL", "OIL2"),
                DuplicateRow::new("OIL2", "OIL3").with_name("Oil3"),
            ],
        );
        let path = fx.editor().try_duplicate_particles(&request).unwrap();

        let set = fx.reload(&path);
        assert_eq!(set.sorted_particles(), vec!["H2O", "OIL", "OIL2", "OIL3"]);
        assert_eq!(set.particle("OIL3").unwrap().name, "Oil3");
        assert_eq!(set.interaction("OIL3", "OIL3", "300").unwrap(), Some(30.0));
        assert_eq!(set.interaction("OIL3", "OIL", "300").unwrap(), Some(30.0));
        assert_eq!(set.interaction("OIL3", "H2O", "300").unwrap(), Some(25.0));
    }

    #[test]
    fn edits_fail_cleanly_when_current_file_is_malformed() {
        let fx = Fixture::new(SAMPLE);
        let broken = SAMPLE.replace("OIL Oil 1.0 0.0 100.0 100.0 0.8 YELLOW", "OIL Oil");
        fs::write(&fx.paths.current, broken).unwrap();

        let mut row = DuplicateRow::new("OIL", "OIL2");
        row.volume = Some(50.0);
        let request = DuplicateRequest::new("ParticleSetDup.txt", vec![row]);
        assert!(!fx.editor().duplicate_particles(&request));
        assert!(matches!(
            fx.editor().try_duplicate_particles(&request),
            Err(Error::Document(_))
        ));
        assert!(!fx.paths.custom_dir.join("ParticleSetDup.txt").exists());
    }

    #[test]
    fn duplicate_rejects_bad_filename() {
        let fx = Fixture::new(SAMPLE);
        let request =
            DuplicateRequest::new("dup.txt", vec![DuplicateRow::new("OIL", "OIL2")]);
        assert!(!fx.editor().duplicate_particles(&request));
    }

    #[test]
    fn output_name_avoids_existing_files() {
        let fx = Fixture::new(SAMPLE);
        let request = RemoveRequest::removing("ParticleSetBase.txt", &["OIL"]);
        let path = fx.editor().try_remove_particles(&request).unwrap();
        assert_eq!(
            path,
            fx.paths.custom_dir.join("ParticleSetBase_Remove.txt")
        );

        let again = fx.editor().try_remove_particles(&request).unwrap();
        assert_eq!(
            again,
            fx.paths.custom_dir.join("ParticleSetBase_Remove_Remove.txt")
        );
    }

    #[test]
    fn remove_end_to_end() {
        let fx = Fixture::new(SAMPLE);
        let request = RemoveRequest::removing("ParticleSetSmall.txt", &["OIL"]);
        assert!(fx.editor().remove_particles(&request));

        let set = fx.reload(&fx.paths.custom_dir.join("ParticleSetSmall.txt"));
        assert_eq!(set.sorted_particles(), vec!["H2O"]);
        assert_eq!(set.interaction_count(), 1);
    }

    #[test]
    fn remove_guards_last_particle_and_unknown_codes() {
        let fx = Fixture::new(SAMPLE);
        let all = RemoveRequest::removing("ParticleSetNone.txt", &["OIL", "H2O"]);
        assert!(matches!(
            fx.editor().try_remove_particles(&all),
            Err(Error::LastParticle(_))
        ));

        let unknown = RemoveRequest::removing("ParticleSetNone.txt", &["FAT"]);
        assert!(matches!(
            fx.editor().try_remove_particles(&unknown),
            Err(Error::UnknownParticle(_))
        ));

        let template = RemoveRequest::template(&fx.set, "ParticleSetNone.txt");
        assert!(matches!(
            fx.editor().try_remove_particles(&template),
            Err(Error::MalformedRequest(_))
        ));
    }

    #[test]
    fn rescale_end_to_end() {
        let text = SAMPLE.replace(
            "OIL Oil 1.0 0.0 100.0 100.0 0.8 YELLOW",
            "OIL Oil 1.0 0.0 100.0 100.0 0.8 YELLOW\nFAT Fat 1.0 0.0 80.0 50.0 0.7 GOLD",
        );
        let fx = Fixture::new(&text);
        let path = fx
            .editor()
            .try_rescale_min_volume(&RescaleRequest::new("ParticleSetSmall.txt", 15.0))
            .unwrap();

        let set = fx.reload(&path);
        assert_eq!(set.particle("H2O").unwrap().volume, 15.0);
        assert_eq!(set.particle("OIL").unwrap().volume, 50.0);
        assert_eq!(set.particle("FAT").unwrap().volume, 25.0);
    }

    #[test]
    fn rescale_rejects_non_positive_minimum() {
        let fx = Fixture::new(SAMPLE);
        assert!(!fx
            .editor()
            .rescale_min_volume(&RescaleRequest::new("ParticleSetSmall.txt", 0.0)));
        assert!(!fx
            .editor()
            .rescale_min_volume(&RescaleRequest::new("ParticleSetSmall.txt", -5.0)));
    }

    #[test]
    fn increment_probes_skips_taken_codes() {
        let text = SAMPLE
            .replace(
                "OIL Oil 1.0 0.0 100.0 100.0 0.8 YELLOW",
                "OIL Oil 1.0 0.0 100.0 100.0 0.8 YELLOW\n\
                 AlaPd1 Probe-A 1.0 0.0 71.0 80.0 0.7 RED\n\
                 AlaPd2 Probe-B 1.0 0.0 71.0 80.0 0.7 RED",
            )
            .replace(
                "OIL_OIL 30.0",
                "OIL_OIL 30.0\nAlaPd2_AlaPd2 22.0\nAlaPd2_H2O 21.0",
            );
        let fx = Fixture::new(&text);
        let path = fx
            .editor()
            .try_increment_probe_particles(&ProbeIncrementRequest::new("ParticleSetProbe.txt"))
            .unwrap();

        let set = fx.reload(&path);
        assert_eq!(
            set.sorted_particles(),
            vec!["AlaPd1", "AlaPd2", "AlaPd3", "H2O", "OIL"]
        );
        assert_eq!(set.particle("AlaPd3").unwrap().name, "Probe-B");
        assert_eq!(set.interaction("AlaPd3", "AlaPd3", "300").unwrap(), Some(22.0));
        assert_eq!(set.interaction("AlaPd3", "AlaPd2", "300").unwrap(), Some(22.0));
        assert_eq!(set.interaction("AlaPd3", "H2O", "300").unwrap(), Some(21.0));
    }

    #[test]
    fn increment_probes_without_probes_fails() {
        let fx = Fixture::new(SAMPLE);
        assert!(matches!(
            fx.editor()
                .try_increment_probe_particles(&ProbeIncrementRequest::new("ParticleSetProbe.txt")),
            Err(Error::NothingToIncrement)
        ));
    }

    #[test]
    fn edits_preserve_comments_and_unrelated_rows() {
        let text = format!("# generated\n{SAMPLE}");
        let fx = Fixture::new(&text);
        let path = fx
            .editor()
            .try_duplicate_particles(&DuplicateRequest::new(
                "ParticleSetDup.txt",
                vec![DuplicateRow::new("H2O", "H2O2")],
            ))
            .unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# generated\n[VERSION]\n1.0.0.0\n"));

        let document = Document::parse(&written, &fx.conventions.format).unwrap();
        let original = Document::parse(&text, &fx.conventions.format).unwrap();
        let kept: Vec<&str> = original
            .rows(Section::ParticleInteractions)
            .map(|l| l.raw())
            .collect();
        let rewritten: Vec<&str> = document
            .rows(Section::ParticleInteractions)
            .map(|l| l.raw())
            .filter(|raw| !raw.contains("H2O2"))
            .collect();
        assert_eq!(kept, rewritten);
    }
}
