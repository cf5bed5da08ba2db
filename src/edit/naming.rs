use super::Error;
use std::path::Path;

/// Upper bound on suffix insertions while searching for a free filename.
pub const MAX_FILENAME_ATTEMPTS: usize = 1000;

const EXTENSION: &str = ".txt";

/// First name derived from `requested` that exists in none of `dirs`.
///
/// A taken name has its extension stripped, the stem substituted into
/// `suffix_format` and the extension re-appended; this repeats until a free
/// name is found.
pub(crate) fn free_filename(
    requested: &str,
    suffix_format: &str,
    dirs: &[&Path],
) -> Result<String, Error> {
    let mut name = requested.to_string();
    for _ in 0..MAX_FILENAME_ATTEMPTS {
        if !dirs.iter().any(|dir| dir.join(&name).exists()) {
            return Ok(name);
        }
        let stem = name.strip_suffix(EXTENSION).unwrap_or(&name);
        name = format!("{}{}", suffix_format.replacen("{}", stem, 1), EXTENSION);
    }
    Err(Error::NoFreeFilename {
        filename: requested.to_string(),
        attempts: MAX_FILENAME_ATTEMPTS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn keeps_free_name() {
        let dir = tempdir().unwrap();
        let name = free_filename("ParticleSetA.txt", "{}_Remove", &[dir.path()]).unwrap();
        assert_eq!(name, "ParticleSetA.txt");
    }

    #[test]
    fn inserts_suffix_until_free_in_all_dirs() {
        let source = tempdir().unwrap();
        let custom = tempdir().unwrap();
        fs::write(source.path().join("ParticleSetA.txt"), "").unwrap();
        fs::write(custom.path().join("ParticleSetA_Remove.txt"), "").unwrap();

        let name = free_filename(
            "ParticleSetA.txt",
            "{}_Remove",
            &[source.path(), custom.path()],
        )
        .unwrap();
        assert_eq!(name, "ParticleSetA_Remove_Remove.txt");
    }

    #[test]
    fn gives_up_when_suffix_never_changes_name() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("ParticleSetA.txt"), "").unwrap();
        let err = free_filename("ParticleSetA.txt", "{}", &[dir.path()]).unwrap_err();
        assert!(matches!(
            err,
            Error::NoFreeFilename { attempts: MAX_FILENAME_ATTEMPTS, .. }
        ));
    }
}
