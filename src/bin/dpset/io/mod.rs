use std::fs;
use std::io::{self, IsTerminal};
use std::path::Path;

use anyhow::{Context, Result};
use dpd_pset::{Conventions, load_conventions};

/// Returns `true` if stderr is a terminal (interactive).
pub fn stderr_is_tty() -> bool {
    io::stderr().is_terminal()
}

/// Built-in conventions, or those of a user TOML file.
pub fn read_conventions(path: Option<&Path>) -> Result<Conventions> {
    match path {
        Some(p) => {
            let text = fs::read_to_string(p)
                .with_context(|| format!("Failed to read conventions file: {}", p.display()))?;
            load_conventions(Some(&text))
                .with_context(|| format!("Invalid conventions file: {}", p.display()))
        }
        None => Ok(load_conventions(None)?),
    }
}
