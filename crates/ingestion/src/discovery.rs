//! Dataset / session directory discovery

use std::path::Path;

use contracts::{LabelError, Result};
use tracing::debug;

/// Names of the visible subdirectories of `path`, sorted.
///
/// Plain files and entries starting with `.` are ignored. Non-UTF-8 names
/// are skipped. Skipped directories are logged at debug level.
pub fn list_dirs(path: &Path) -> Result<Vec<String>> {
    let entries = std::fs::read_dir(path).map_err(|e| LabelError::io(path, e))?;

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| LabelError::io(path, e))?;
        let is_dir = entry
            .file_type()
            .map(|t| t.is_dir())
            .map_err(|e| LabelError::io(entry.path(), e))?;
        if !is_dir {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) if name.starts_with('.') => {
                debug!(dir = %path.display(), name = %name, "Skipping hidden directory");
            }
            Ok(name) => dirs.push(name),
            Err(raw) => {
                debug!(
                    dir = %path.display(),
                    name = %raw.to_string_lossy(),
                    "Skipping directory with non-UTF-8 name"
                );
            }
        }
    }

    dirs.sort();
    Ok(dirs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_lists_sorted_visible_dirs() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("session_b")).unwrap();
        fs::create_dir(dir.path().join("session_a")).unwrap();
        fs::create_dir(dir.path().join(".cache")).unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let dirs = list_dirs(dir.path()).unwrap();
        assert_eq!(dirs, vec!["session_a", "session_b"]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_non_utf8_name_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(OsStr::from_bytes(b"bad_\xff"))).unwrap();
        fs::create_dir(dir.path().join("session_a")).unwrap();

        let dirs = list_dirs(dir.path()).unwrap();
        assert_eq!(dirs, vec!["session_a"]);
    }

    #[test]
    fn test_missing_dir_is_error() {
        let dir = tempdir().unwrap();
        let err = list_dirs(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, LabelError::Io { .. }));
    }
}
