//! File-system [`ListRepository`]: one JSON file per saved list.
//!
//! A list called `dinner` lives at `<data-dir>/lists/dinner.json` and
//! contains `[["pizza", 1], ["tacos", 3]]`.  The `lists` directory is
//! created when the repository is opened.

use std::path::{Path, PathBuf};

use decisionmaker_core::{decode_list, encode_list, WeightedOption};
use tracing::debug;

use crate::application::manage_lists::{ListRepository, ListStoreError};

/// Name of the lists subdirectory inside the data directory.
pub const LISTS_DIR: &str = "lists";

/// File extension of list files (without the dot).
pub const LIST_EXTENSION: &str = "json";

/// Stores lists as `<dir>/<name>.json`.
#[derive(Debug, Clone)]
pub struct FsListRepository {
    dir: PathBuf,
}

impl FsListRepository {
    /// Opens (and creates if needed) the lists directory `dir`.
    ///
    /// # Errors
    ///
    /// [`ListStoreError::Io`] if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, ListStoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| ListStoreError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    /// Opens `<data_dir>/lists`.
    ///
    /// # Errors
    ///
    /// See [`FsListRepository::open`].
    pub fn in_data_dir(data_dir: &Path) -> Result<Self, ListStoreError> {
        Self::open(data_dir.join(LISTS_DIR))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of the file backing `name`.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.{LIST_EXTENSION}"))
    }

    fn io_error(path: PathBuf) -> impl FnOnce(std::io::Error) -> ListStoreError {
        move |source| ListStoreError::Io { path, source }
    }
}

impl ListRepository for FsListRepository {
    fn save(&self, name: &str, options: &[WeightedOption]) -> Result<(), ListStoreError> {
        let path = self.path_for(name);
        let text = encode_list(options).map_err(|source| ListStoreError::Encode {
            name: name.to_string(),
            source,
        })?;
        std::fs::write(&path, text).map_err(Self::io_error(path.clone()))?;
        debug!("wrote {} options to {}", options.len(), path.display());
        Ok(())
    }

    fn load(&self, name: &str) -> Result<Vec<WeightedOption>, ListStoreError> {
        let path = self.path_for(name);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ListStoreError::NotFound(name.to_string()))
            }
            Err(e) => return Err(ListStoreError::Io { path, source: e }),
        };

        decode_list(&text).map_err(|source| ListStoreError::Corrupt {
            name: name.to_string(),
            source,
        })
    }

    fn list(&self) -> Result<Vec<String>, ListStoreError> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(ListStoreError::Io {
                    path: self.dir.clone(),
                    source: e,
                })
            }
        };

        let mut names = Vec::new();
        for entry in entries {
            let path = entry.map_err(Self::io_error(self.dir.clone()))?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(LIST_EXTENSION)
            {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn delete(&self, name: &str) -> Result<(), ListStoreError> {
        let path = self.path_for(name);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ListStoreError::NotFound(name.to_string()))
            }
            Err(e) => Err(ListStoreError::Io { path, source: e }),
        }
    }

    fn exists(&self, name: &str) -> Result<bool, ListStoreError> {
        let path = self.path_for(name);
        path.try_exists().map_err(Self::io_error(path))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    /// Fresh, empty data directory under the system temp dir.
    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("decisionmaker_test_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn opt(label: &str, weight: u32) -> WeightedOption {
        WeightedOption::new(label, weight).unwrap()
    }

    #[test]
    fn test_open_creates_lists_directory() {
        // Arrange
        let data = temp_dir();

        // Act
        let repo = FsListRepository::in_data_dir(&data).unwrap();

        // Assert
        assert!(repo.dir().is_dir());
        assert!(repo.dir().ends_with("lists"));

        std::fs::remove_dir_all(&data).ok();
    }

    #[test]
    fn test_save_then_load_round_trip_preserves_order() {
        let data = temp_dir();
        let repo = FsListRepository::in_data_dir(&data).unwrap();
        let options = vec![opt("tacos", 3), opt("pizza", 1), opt("tacos", 3)];

        repo.save("dinner", &options).unwrap();
        let loaded = repo.load("dinner").unwrap();

        assert_eq!(loaded, options);
        std::fs::remove_dir_all(&data).ok();
    }

    #[test]
    fn test_saved_file_is_array_of_label_weight_pairs() {
        let data = temp_dir();
        let repo = FsListRepository::in_data_dir(&data).unwrap();

        repo.save("dinner", &[opt("pizza", 1), opt("tacos", 3)]).unwrap();
        let text = std::fs::read_to_string(repo.path_for("dinner")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value, serde_json::json!([["pizza", 1], ["tacos", 3]]));
        std::fs::remove_dir_all(&data).ok();
    }

    #[test]
    fn test_save_overwrites_unconditionally() {
        let data = temp_dir();
        let repo = FsListRepository::in_data_dir(&data).unwrap();

        repo.save("x", &[opt("old", 1)]).unwrap();
        repo.save("x", &[opt("new", 2)]).unwrap();

        assert_eq!(repo.load("x").unwrap(), vec![opt("new", 2)]);
        std::fs::remove_dir_all(&data).ok();
    }

    #[test]
    fn test_load_missing_returns_not_found() {
        let data = temp_dir();
        let repo = FsListRepository::in_data_dir(&data).unwrap();

        assert!(matches!(
            repo.load("missing"),
            Err(ListStoreError::NotFound(name)) if name == "missing"
        ));
        std::fs::remove_dir_all(&data).ok();
    }

    #[test]
    fn test_load_malformed_json_returns_corrupt() {
        let data = temp_dir();
        let repo = FsListRepository::in_data_dir(&data).unwrap();
        std::fs::write(repo.path_for("bad"), "[[\"pizza\", ").unwrap();

        assert!(matches!(
            repo.load("bad"),
            Err(ListStoreError::Corrupt { .. })
        ));
        std::fs::remove_dir_all(&data).ok();
    }

    #[test]
    fn test_list_returns_sorted_json_stems_only() {
        // Arrange
        let data = temp_dir();
        let repo = FsListRepository::in_data_dir(&data).unwrap();
        repo.save("zeta", &[opt("z", 1)]).unwrap();
        repo.save("alpha", &[opt("a", 1)]).unwrap();
        std::fs::write(repo.dir().join("notes.txt"), "ignored").unwrap();
        std::fs::create_dir(repo.dir().join("folder.json")).unwrap();

        // Act
        let names = repo.list().unwrap();

        // Assert
        assert_eq!(names, vec!["alpha", "zeta"]);
        std::fs::remove_dir_all(&data).ok();
    }

    #[test]
    fn test_delete_removes_file() {
        let data = temp_dir();
        let repo = FsListRepository::in_data_dir(&data).unwrap();
        repo.save("gone", &[opt("a", 1)]).unwrap();

        repo.delete("gone").unwrap();

        assert!(!repo.exists("gone").unwrap());
        std::fs::remove_dir_all(&data).ok();
    }

    #[test]
    fn test_delete_missing_returns_not_found_and_leaves_directory_unchanged() {
        // Arrange
        let data = temp_dir();
        let repo = FsListRepository::in_data_dir(&data).unwrap();
        repo.save("keep", &[opt("a", 1)]).unwrap();
        let before = repo.list().unwrap();

        // Act
        let result = repo.delete("x");

        // Assert
        assert!(matches!(result, Err(ListStoreError::NotFound(_))));
        assert_eq!(repo.list().unwrap(), before);
        std::fs::remove_dir_all(&data).ok();
    }
}
