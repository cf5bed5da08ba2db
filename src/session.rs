//! Process-wide particle-set context.
//!
//! A [`Session`] owns the conventions, the file locations and the store of
//! the currently active particle set. Reloading never mutates the store in
//! place: a fresh store is read and swapped in only once it has loaded
//! successfully.

use crate::conventions::Conventions;
use crate::edit::Editor;
use crate::io;
use crate::query::InteractionQuery;
use crate::store::ParticleSet;
use log::debug;
use std::path::{Path, PathBuf};

/// Locations used by a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticleSetPaths {
    /// The particle-set file currently loaded.
    pub current: PathBuf,
    /// Directory searched for bundled particle-set files.
    pub source_dir: PathBuf,
    /// Directory that receives files written by editing operations.
    pub custom_dir: PathBuf,
}

impl ParticleSetPaths {
    pub fn new(
        current: impl Into<PathBuf>,
        source_dir: impl Into<PathBuf>,
        custom_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            current: current.into(),
            source_dir: source_dir.into(),
            custom_dir: custom_dir.into(),
        }
    }

    /// Paths with both directories set to the directory of `current`.
    pub fn beside(current: impl Into<PathBuf>) -> Self {
        let current = current.into();
        let dir = current
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self {
            current,
            source_dir: dir.clone(),
            custom_dir: dir,
        }
    }
}

#[derive(Debug)]
pub struct Session {
    paths: ParticleSetPaths,
    conventions: Conventions,
    store: ParticleSet,
}

impl Session {
    pub fn open(paths: ParticleSetPaths, conventions: Conventions) -> Result<Self, io::Error> {
        let store = ParticleSet::read_path(&paths.current, &conventions)?;
        Ok(Self {
            paths,
            conventions,
            store,
        })
    }

    /// Re-reads the current file into a fresh store.
    pub fn reset(&mut self) -> Result<(), io::Error> {
        let store = ParticleSet::read_path(&self.paths.current, &self.conventions)?;
        self.store = store;
        debug!("Reset particle set from {}", self.paths.current.display());
        Ok(())
    }

    /// Makes `path` the current file.
    pub fn load(&mut self, path: impl Into<PathBuf>) -> Result<(), io::Error> {
        let path = path.into();
        let store = ParticleSet::read_path(&path, &self.conventions)?;
        self.store = store;
        self.paths.current = path;
        Ok(())
    }

    pub fn paths(&self) -> &ParticleSetPaths {
        &self.paths
    }

    pub fn conventions(&self) -> &Conventions {
        &self.conventions
    }

    pub fn store(&self) -> &ParticleSet {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ParticleSet {
        &mut self.store
    }

    pub fn query(&self) -> InteractionQuery<'_> {
        InteractionQuery::new(&self.store, &self.conventions.naming)
    }

    pub fn editor(&self) -> Editor<'_> {
        Editor::new(&self.store, &self.conventions, &self.paths)
    }
}
