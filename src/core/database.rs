//! Per-binary database of user symbols and input history.
//!
//! Stored as JSON next to the binary:
//!
//! ```json
//! {"symbols": {"main": 4198400}, "history": ["sym main 0x401000"]}
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::PersistenceError;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    #[serde(default)]
    pub symbols: BTreeMap<String, u64>,
    #[serde(default)]
    pub history: Vec<String>,
}

impl Database {
    /// Read the database at `path`. A missing file is not an error.
    pub fn load(path: &Path) -> Result<Option<Self>, PersistenceError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(PersistenceError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| PersistenceError::Format {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Write the database to `path`.
    ///
    /// The record goes to a sibling temporary file first and is renamed into
    /// place, so readers never see a partial write.
    pub fn save(&self, path: &Path) -> Result<(), PersistenceError> {
        let io_err = |source: std::io::Error| PersistenceError::Io {
            path: path.to_path_buf(),
            source,
        };

        let text = serde_json::to_string(self).map_err(|source| PersistenceError::Format {
            path: path.to_path_buf(),
            source,
        })?;

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = Path::new(&tmp);

        fs::write(tmp, text).map_err(io_err)?;
        fs::rename(tmp, path).map_err(|e| {
            let _ = fs::remove_file(tmp);
            io_err(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_database_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Database::load(&dir.path().join("a.out.db")).unwrap(), None);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.out.db");
        let db = Database {
            symbols: BTreeMap::from([("main".to_string(), 0x401000)]),
            history: vec!["sym main 0x401000".to_string()],
        };
        db.save(&path).unwrap();
        assert_eq!(Database::load(&path).unwrap(), Some(db));
        assert!(!dir.path().join("a.out.db.tmp").exists());
    }

    #[test]
    fn test_load_accepts_partial_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.out.db");
        fs::write(&path, r#"{"symbols": {"f": 16}}"#).unwrap();
        let db = Database::load(&path).unwrap().unwrap();
        assert_eq!(db.symbols.get("f"), Some(&16));
        assert!(db.history.is_empty());
    }

    #[test]
    fn test_corrupt_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.out.db");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            Database::load(&path),
            Err(PersistenceError::Format { .. })
        ));
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("a.out.db");
        assert!(matches!(
            Database::default().save(&path),
            Err(PersistenceError::Io { .. })
        ));
        assert!(!path.exists());
    }
}
