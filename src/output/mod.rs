use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::TranslatorError;

// Writes the translation exactly as received, creating missing directories.
// The text goes to a temporary file next to the target and is renamed into
// place, so a failed write never leaves a truncated translation behind.
pub fn save_translation(path: &Path, translated: &str) -> Result<PathBuf, TranslatorError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !parent.exists() {
        fs::create_dir_all(parent)?;
    }

    let mut file = NamedTempFile::new_in(parent)?;
    debug!("Writing translation to {}", file.path().display());
    file.write_all(translated.as_bytes())?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;

    info!("Translation saved to: {}", path.display());
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_written_file_matches_translation() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = tempdir()?;
        let path = temp_dir.path().join("output").join("thai.txt");
        let translated = "ศิลปะแห่งการพูดในที่สาธารณะ\n\nบทที่ ๑\r\n";

        let saved = save_translation(&path, translated)?;

        assert_eq!(saved, path);
        assert_eq!(fs::read(&path)?, translated.as_bytes());
        Ok(())
    }

    #[test]
    fn test_overwrites_previous_output() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = tempdir()?;
        let path = temp_dir.path().join("book.txt");

        save_translation(&path, "first, longer attempt")?;
        save_translation(&path, "second")?;

        assert_eq!(fs::read_to_string(&path)?, "second");
        Ok(())
    }

    #[test]
    fn test_unwritable_target_is_io_error() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = tempdir()?;
        // A directory cannot be written as a file.
        let result = save_translation(temp_dir.path(), "text");

        assert!(matches!(result, Err(TranslatorError::Io(_))));
        Ok(())
    }

    #[test]
    fn test_failed_write_leaves_no_partial_file() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = tempdir()?;
        // An existing non-empty directory cannot be replaced by the finished file.
        let target = temp_dir.path().join("book.txt");
        fs::create_dir(&target)?;
        fs::write(target.join("keep"), "")?;

        let result = save_translation(&target, "a translation that never lands");

        assert!(matches!(result, Err(TranslatorError::Io(_))));
        let entries: Vec<_> = fs::read_dir(temp_dir.path())?
            .map(|entry| entry.map(|entry| entry.file_name()))
            .collect::<Result<_, _>>()?;
        assert_eq!(entries, vec![std::ffi::OsString::from("book.txt")]);
        assert!(target.is_dir());
        Ok(())
    }
}
