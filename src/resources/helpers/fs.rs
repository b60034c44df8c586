//! File-system resource helpers.
use std::io::{BufWriter, Write as _};
use std::path::Path;

use crate::error::{BoxError, ConvertError};

/// Ensure `dir` exists, creating it (and any ancestors) if necessary.
///
/// # Errors
///
/// Returns [`ConvertError::DirectoryCreate`] if the directory cannot be created.
pub fn ensure_dir(dir: &Path) -> Result<(), ConvertError> {
    std::fs::create_dir_all(dir).map_err(|source| ConvertError::DirectoryCreate {
        path: dir.to_path_buf(),
        source,
    })
}

/// Write a file through a temp sibling and rename it into `destination`.
///
/// `write` receives a buffered writer over the staged file.  The staged file
/// lives in the destination's directory so the final rename never crosses a
/// filesystem, and it is deleted on every failure path.  With
/// `overwrite == false` the rename refuses to replace a file that appeared
/// after the caller's existence check.
///
/// # Errors
///
/// Returns [`ConvertError::DestinationExists`] if `destination` exists and
/// `overwrite` is off, or [`ConvertError::Write`] for staging, encoding, or
/// rename failures (including a missing destination directory).
pub fn write_atomically<F>(destination: &Path, overwrite: bool, write: F) -> Result<(), ConvertError>
where
    F: FnOnce(&mut BufWriter<&mut std::fs::File>) -> Result<(), BoxError>,
{
    let parent = match destination.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut staged = tempfile::Builder::new()
        .prefix(".icon-")
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(|e| ConvertError::write(destination, e))?;

    {
        let mut writer = BufWriter::new(staged.as_file_mut());
        write(&mut writer).map_err(|e| ConvertError::Write {
            path: destination.to_path_buf(),
            source: e,
        })?;
        writer
            .flush()
            .map_err(|e| ConvertError::write(destination, e))?;
    }

    let persisted = if overwrite {
        staged.persist(destination)
    } else {
        staged.persist_noclobber(destination)
    };

    match persisted {
        Ok(_) => Ok(()),
        Err(e) if !overwrite && e.error.kind() == std::io::ErrorKind::AlreadyExists => {
            Err(ConvertError::DestinationExists {
                path: destination.to_path_buf(),
            })
        }
        Err(e) => Err(ConvertError::write(destination, e.error)),
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn ensure_dir_creates_missing_parents() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn ensure_dir_noop_when_present() {
        let dir = tempfile::tempdir().unwrap();
        ensure_dir(dir.path()).unwrap();
        assert!(dir.path().is_dir());
    }

    #[test]
    fn ensure_dir_fails_when_path_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("blocker");
        std::fs::write(&file, "x").unwrap();
        let err = ensure_dir(&file.join("child")).unwrap_err();
        assert!(matches!(err, ConvertError::DirectoryCreate { .. }));
    }

    #[test]
    fn writes_content_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.bin");
        write_atomically(&dest, false, |w| {
            w.write_all(b"payload")?;
            Ok(())
        })
        .unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"payload");
        assert_eq!(entries(dir.path()), vec!["out.bin".to_string()]);
    }

    #[test]
    fn writer_failure_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.bin");
        let err = write_atomically(&dest, false, |w| {
            w.write_all(b"partial")?;
            Err("encoder exploded".into())
        })
        .unwrap_err();
        assert!(matches!(err, ConvertError::Write { .. }));
        assert!(!dest.exists());
        assert!(entries(dir.path()).is_empty(), "temp file must be removed");
    }

    #[test]
    fn noclobber_reports_existing_destination() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.bin");
        std::fs::write(&dest, b"original").unwrap();
        let err = write_atomically(&dest, false, |w| {
            w.write_all(b"new")?;
            Ok(())
        })
        .unwrap_err();
        assert!(err.is_destination_exists());
        assert_eq!(std::fs::read(&dest).unwrap(), b"original");
        assert_eq!(entries(dir.path()), vec!["out.bin".to_string()]);
    }

    #[test]
    fn overwrite_replaces_existing_destination() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.bin");
        std::fs::write(&dest, b"original").unwrap();
        write_atomically(&dest, true, |w| {
            w.write_all(b"new")?;
            Ok(())
        })
        .unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"new");
    }

    #[test]
    fn missing_directory_is_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("absent").join("out.bin");
        let err = write_atomically(&dest, false, |_| Ok(())).unwrap_err();
        assert!(matches!(err, ConvertError::Write { .. }));
    }
}
