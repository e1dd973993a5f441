//! I/O utilities for persistence operations.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::config::StoreConfig;
use crate::error::{Result, StashError};

/// Classifies I/O errors into specific StashError variants.
pub fn classify_io_error(error: std::io::Error, path: &Path, context: &'static str) -> StashError {
    let path = path.to_path_buf();
    match error.kind() {
        ErrorKind::StorageFull | ErrorKind::OutOfMemory => StashError::DiskFull {
            path,
            context,
            source: error,
        },
        ErrorKind::WouldBlock | ErrorKind::TimedOut | ErrorKind::Interrupted => {
            StashError::TransientIo {
                path,
                context,
                source: error,
            }
        }
        _ => StashError::Io {
            path,
            context,
            source: error,
        },
    }
}

/// Reads a whole file, mapping "not found" to `None`.
pub fn read_if_exists(path: &Path) -> std::io::Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Replaces the contents of `path` with `bytes`.
///
/// The bytes go to `<path>.tmp` first and are renamed over `path`, so a
/// failure at any step leaves the previous contents in place.
pub fn write_atomic(path: &Path, bytes: &[u8], config: &StoreConfig) -> Result<()> {
    ensure_parent_dir(path, config)?;

    let temp_path = temp_path_for(path);
    let result = write_temp(path, &temp_path, bytes, config.sync_writes).and_then(|()| {
        fs::rename(&temp_path, path).map_err(|e| classify_io_error(e, path, "renaming temp file onto"))
    });

    if result.is_err() {
        if let Err(e) = fs::remove_file(&temp_path) {
            if e.kind() != ErrorKind::NotFound {
                tracing::warn!(
                    "Failed to remove temp file {}: {}",
                    temp_path.display(),
                    e
                );
            }
        }
    }

    result
}

/// Creates `path` as an empty file unless something already exists there.
pub fn create_empty(path: &Path, config: &StoreConfig) -> Result<()> {
    ensure_parent_dir(path, config)?;

    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(classify_io_error(e, path, "creating")),
    }
}

fn ensure_parent_dir(path: &Path, config: &StoreConfig) -> Result<()> {
    if !config.create_parent_dirs {
        return Ok(());
    }
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir)
            .map_err(|e| classify_io_error(e, dir, "creating directory")),
        _ => Ok(()),
    }
}

/// Errors name `path`, the file the caller asked for.
fn write_temp(path: &Path, temp_path: &Path, bytes: &[u8], sync: bool) -> Result<()> {
    let mut file = File::create(temp_path)
        .map_err(|e| classify_io_error(e, path, "creating temp file for"))?;
    file.write_all(bytes)
        .map_err(|e| classify_io_error(e, path, "writing temp file for"))?;
    if sync {
        file.sync_all()
            .map_err(|e| classify_io_error(e, path, "syncing temp file for"))?;
    }
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("stash"));
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_classify_io_error() {
        let path = Path::new("data.csv");
        let err = classify_io_error(std::io::Error::from(ErrorKind::Interrupted), path, "writing");
        assert!(matches!(err, StashError::TransientIo { .. }));

        let err = classify_io_error(std::io::Error::from(ErrorKind::OutOfMemory), path, "writing");
        assert!(matches!(err, StashError::DiskFull { .. }));

        let err = classify_io_error(
            std::io::Error::from(ErrorKind::PermissionDenied),
            path,
            "writing",
        );
        match err {
            StashError::Io { path, context, .. } => {
                assert_eq!(path, PathBuf::from("data.csv"));
                assert_eq!(context, "writing");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_temp_path_sits_next_to_target() {
        assert_eq!(
            temp_path_for(Path::new("dir/schema.json")),
            PathBuf::from("dir/schema.json.tmp")
        );
    }

    #[test]
    fn test_write_atomic_replaces_contents_and_cleans_up() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("value.bin");
        let config = StoreConfig::default();

        write_atomic(&path, b"first", &config).unwrap();
        write_atomic(&path, b"second", &config).unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"second");
        assert!(!temp_path_for(&path).exists());
    }

    #[test]
    fn test_write_atomic_without_parent_dirs_fails_and_leaves_nothing() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("missing").join("value.bin");
        let config = StoreConfig {
            create_parent_dirs: false,
            ..Default::default()
        };

        let err = write_atomic(&path, b"data", &config).unwrap_err();
        assert!(matches!(err, StashError::Io { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_write_atomic_errors_name_target_path() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("value.bin");
        // A directory where the temp file should go makes its creation fail
        fs::create_dir(temp_path_for(&path)).unwrap();

        let err = write_atomic(&path, b"data", &StoreConfig::default()).unwrap_err();

        assert_eq!(err.path(), Some(path.as_path()));
        assert!(err.to_string().contains("creating temp file for"));
        assert!(!path.exists());
    }

    #[test]
    fn test_create_empty_keeps_existing_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("log.csv");
        fs::write(&path, "a,b\n").unwrap();

        create_empty(&path, &StoreConfig::default()).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "a,b\n");
    }

    #[test]
    fn test_read_if_exists() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("absent");
        assert!(read_if_exists(&path).unwrap().is_none());

        fs::write(&path, b"x").unwrap();
        assert_eq!(read_if_exists(&path).unwrap(), Some(b"x".to_vec()));
    }
}
