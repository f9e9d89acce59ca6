//! Opening and saving databases on disk

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::info;

use super::db::Database;
use crate::config::SafeOptions;
use crate::error::{Result, SafeError};

/// Open and decode the container at `path` with default options
pub fn open(path: &Path, password: &str) -> Result<Database> {
    open_with(path, password, &SafeOptions::default())
}

/// Open and decode the container at `path`
///
/// The path is remembered as the database's save location.
pub fn open_with(path: &Path, password: &str, options: &SafeOptions) -> Result<Database> {
    let bytes = fs::read(path)?;
    let mut db = Database::decode_with(&bytes, password, options)?;
    db.save_path = Some(path.to_path_buf());
    info!(path = %path.display(), records = db.len(), "opened database");
    Ok(db)
}

/// Encode `db` and write it to `path`, or to where it was last opened or saved
///
/// The container is written to a temporary file in the target directory
/// and renamed over the destination, so a failed save leaves any existing
/// file intact.
pub fn save(db: &mut Database, path: Option<&Path>) -> Result<()> {
    let target = match path {
        Some(path) => path.to_path_buf(),
        None => db
            .save_path
            .clone()
            .ok_or_else(|| SafeError::InvalidOperation("no save path set".to_string()))?,
    };

    let bytes = db.encode()?;

    let parent = match target.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(&bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(&target).map_err(|e| e.error)?;

    info!(path = %target.display(), records = db.len(), "saved database");
    db.save_path = Some(target);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{PasswordSafe, Record};
    use tempfile::TempDir;

    fn small_db() -> Database {
        let mut db = Database::with_salt("pw", [1u8; 32], 4).unwrap();
        db.set_record(Record::new("Router", "admin").with_group("Home"));
        db
    }

    #[test]
    fn test_save_and_open() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("safe.psafe3");

        let mut db = small_db();
        save(&mut db, Some(&path)).unwrap();
        assert_eq!(db.save_path(), Some(path.as_path()));

        let opened = open(&path, "pw").unwrap();
        assert_eq!(opened.save_path(), Some(path.as_path()));
        assert_eq!(opened.get_record("Router").unwrap().password, "admin");
    }

    #[test]
    fn test_save_to_remembered_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("safe.psafe3");
        save(&mut small_db(), Some(&path)).unwrap();

        let mut db = open(&path, "pw").unwrap();
        db.set_record(Record::new("Printer", "1234"));
        save(&mut db, None).unwrap();

        let reopened = open(&path, "pw").unwrap();
        assert_eq!(reopened.list(), vec!["Printer", "Router"]);
    }

    #[test]
    fn test_save_without_path() {
        let mut db = small_db();
        assert!(matches!(
            save(&mut db, None),
            Err(SafeError::InvalidOperation(_))
        ));
    }

    #[test]
    fn test_open_missing_file() {
        let temp = TempDir::new().unwrap();
        let result = open(&temp.path().join("missing.psafe3"), "pw");
        assert!(matches!(result, Err(SafeError::Io(_))));
    }

    #[test]
    fn test_failed_open_keeps_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("safe.psafe3");
        save(&mut small_db(), Some(&path)).unwrap();
        let before = fs::read(&path).unwrap();

        assert!(matches!(open(&path, "wrong"), Err(SafeError::Authentication)));
        assert_eq!(fs::read(&path).unwrap(), before);
    }
}
