//! FileStorage - one file per record, one directory per type.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::trace;
use tempfile::NamedTempFile;

use super::Storage;
use crate::error::{StorageOp, StoreError};

/// Directory-backed storage rooted at a base directory.
///
/// Unit path is `"<base>/<type>/<id>.<extension>"`. Writes go to a temp file
/// in the type directory and are renamed into place.
#[derive(Debug, Clone)]
pub struct FileStorage {
    base_dir: PathBuf,
    extension: &'static str,
}

impl FileStorage {
    pub fn new(base_dir: impl Into<PathBuf>, extension: &'static str) -> Self {
        Self {
            base_dir: base_dir.into(),
            extension,
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn type_dir(&self, type_name: &str) -> PathBuf {
        self.base_dir.join(type_name)
    }

    /// Path of the storage unit for a record.
    pub fn unit_path(&self, type_name: &str, id: &str) -> Result<PathBuf, StoreError> {
        validate_id(id)?;
        Ok(self
            .type_dir(type_name)
            .join(format!("{}.{}", id, self.extension)))
    }
}

fn validate_id(id: &str) -> Result<(), StoreError> {
    let invalid = id.is_empty()
        || id == "."
        || id == ".."
        || id.contains(['/', '\\', '\0']);
    if invalid {
        return Err(StoreError::InvalidId(id.to_string()));
    }
    Ok(())
}

impl Storage for FileStorage {
    fn read(&self, type_name: &str, id: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.unit_path(type_name, id)?;
        fs::read(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StoreError::not_found(type_name, id),
            _ => StoreError::storage(StorageOp::Read, format!("{}: {}", path.display(), e)),
        })
    }

    fn write(&self, type_name: &str, id: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let path = self.unit_path(type_name, id)?;
        let dir = self.type_dir(type_name);
        let write_err = |e: io::Error| {
            StoreError::storage(StorageOp::Write, format!("{}: {}", path.display(), e))
        };

        fs::create_dir_all(&dir).map_err(write_err)?;
        let mut temp = NamedTempFile::new_in(&dir).map_err(write_err)?;
        temp.write_all(bytes).map_err(write_err)?;
        temp.as_file().sync_all().map_err(write_err)?;
        temp.persist(&path).map_err(|e| write_err(e.error))?;

        trace!("wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }

    fn remove(&self, type_name: &str, id: &str) -> Result<bool, StoreError> {
        let path = self.unit_path(type_name, id)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::storage(
                StorageOp::Delete,
                format!("{}: {}", path.display(), e),
            )),
        }
    }

    fn contains(&self, type_name: &str, id: &str) -> Result<bool, StoreError> {
        Ok(self.unit_path(type_name, id)?.is_file())
    }

    fn list_ids(&self, type_name: &str) -> Result<Vec<String>, StoreError> {
        let dir = self.type_dir(type_name);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StoreError::storage(
                    StorageOp::List,
                    format!("{}: {}", dir.display(), e),
                ))
            }
        };

        let suffix = format!(".{}", self.extension);
        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::storage(StorageOp::List, e))?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if let Some(id) = name.strip_suffix(&suffix) {
                if !id.is_empty() {
                    ids.push(id.to_string());
                }
            }
        }
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn storage() -> (TempDir, FileStorage) {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path(), "json");
        (dir, storage)
    }

    #[test]
    fn unit_path_layout() {
        let storage = FileStorage::new("/data", "json");
        assert_eq!(
            storage.unit_path("User", "u1").unwrap(),
            PathBuf::from("/data/User/u1.json")
        );
    }

    #[test]
    fn write_creates_type_directory() {
        let (dir, storage) = storage();
        storage.write("User", "u1", b"{}").unwrap();
        assert!(dir.path().join("User").join("u1.json").is_file());
        assert_eq!(storage.read("User", "u1").unwrap(), b"{}");
    }

    #[test]
    fn write_replaces_existing_unit() {
        let (_dir, storage) = storage();
        storage.write("User", "u1", b"first").unwrap();
        storage.write("User", "u1", b"second").unwrap();
        assert_eq!(storage.read("User", "u1").unwrap(), b"second");
        assert_eq!(storage.list_ids("User").unwrap(), vec!["u1".to_string()]);
    }

    #[test]
    fn read_missing_is_not_found() {
        let (_dir, storage) = storage();
        let err = storage.read("User", "nope").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn remove_missing_is_not_an_error() {
        let (_dir, storage) = storage();
        storage.write("User", "u1", b"{}").unwrap();
        assert!(storage.remove("User", "u1").unwrap());
        assert!(!storage.remove("User", "u1").unwrap());
        assert!(!storage.contains("User", "u1").unwrap());
    }

    #[test]
    fn list_ids_filters_extension_and_sorts() {
        let (dir, storage) = storage();
        storage.write("User", "b", b"{}").unwrap();
        storage.write("User", "a", b"{}").unwrap();
        fs::write(dir.path().join("User").join("notes.txt"), b"x").unwrap();

        assert_eq!(
            storage.list_ids("User").unwrap(),
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn list_missing_type_is_empty() {
        let (_dir, storage) = storage();
        assert!(storage.list_ids("Ghost").unwrap().is_empty());
    }

    #[test]
    fn rejects_path_like_ids() {
        let (_dir, storage) = storage();
        for id in ["", ".", "..", "a/b", "a\\b"] {
            let err = storage.write("User", id, b"{}").unwrap_err();
            assert_eq!(err, StoreError::InvalidId(id.to_string()));
        }
    }
}
