//! ManageListsUseCase: save, load, delete and enumerate named option lists.
//!
//! Lists are stored by a [`ListRepository`]: the production implementation
//! writes one JSON file per list (`infrastructure::storage::lists`), tests
//! use a mock.
//!
//! # Overwrite policy
//!
//! The repository itself always overwrites.  The *use case* refuses to
//! replace an existing list unless the caller passes
//! [`Overwrite::Confirmed`]; the UI layer is responsible for asking the user
//! and calling again with confirmation.

use decisionmaker_core::{CodecError, OptionStore, WeightedOption};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

/// Errors reported by a [`ListRepository`].
#[derive(Debug, Error)]
pub enum ListStoreError {
    /// No list with this name exists.
    #[error("list '{0}' not found")]
    NotFound(String),

    /// The list file exists but could not be decoded.
    #[error("list '{name}' is corrupt: {source}")]
    Corrupt {
        name: String,
        #[source]
        source: CodecError,
    },

    /// The options could not be encoded; nothing was written.
    #[error("list '{name}' could not be encoded: {source}")]
    Encode {
        name: String,
        #[source]
        source: CodecError,
    },

    /// The name cannot be used as a file name.
    #[error("invalid list name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    /// A file system I/O error occurred.
    #[error("I/O error accessing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors returned by the list use cases.
#[derive(Debug, Error)]
pub enum ManageListsError {
    /// Saving would replace an existing list and the user has not confirmed.
    #[error("list '{0}' already exists; confirm to overwrite it")]
    AlreadyExists(String),

    #[error(transparent)]
    Store(#[from] ListStoreError),
}

impl ManageListsError {
    /// `true` for the "list does not exist" condition, which callers show as
    /// a notice rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ManageListsError::Store(ListStoreError::NotFound(_)))
    }
}

/// Whether an existing list may be replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overwrite {
    /// Fail with [`ManageListsError::AlreadyExists`] if the name is taken.
    Ask,
    /// The user confirmed; replace without asking.
    Confirmed,
}

/// Result of a successful save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Created,
    Overwritten,
}

/// Persistence port for named option lists.
///
/// Implementations must treat names as opaque, already-validated keys
/// (see [`validate_list_name`]).
#[cfg_attr(test, mockall::automock)]
pub trait ListRepository {
    /// Writes `options` under `name`, replacing any existing list.
    fn save(&self, name: &str, options: &[WeightedOption]) -> Result<(), ListStoreError>;
    /// Reads the list stored under `name`.
    fn load(&self, name: &str) -> Result<Vec<WeightedOption>, ListStoreError>;
    /// Names of all stored lists, sorted.
    fn list(&self) -> Result<Vec<String>, ListStoreError>;
    /// Removes the list stored under `name`.
    fn delete(&self, name: &str) -> Result<(), ListStoreError>;
    /// Whether a list is stored under `name`.
    fn exists(&self, name: &str) -> Result<bool, ListStoreError>;
}

/// Trims `name` and checks it can be used as a file name stem.
///
/// # Errors
///
/// [`ListStoreError::InvalidName`] for empty names, names containing path
/// separators, and names starting with `.`.
pub fn validate_list_name(name: &str) -> Result<String, ListStoreError> {
    let trimmed = name.trim();
    let reason = if trimmed.is_empty() {
        Some("name must not be empty")
    } else if trimmed.contains(['/', '\\']) {
        Some("name must not contain path separators")
    } else if trimmed.starts_with('.') {
        Some("name must not start with '.'")
    } else if trimmed.contains('\0') {
        Some("name must not contain NUL")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ListStoreError::InvalidName {
            name: name.to_string(),
            reason,
        }),
        None => Ok(trimmed.to_string()),
    }
}

/// Saves `options` under `name`.
///
/// # Errors
///
/// [`ManageListsError::AlreadyExists`] when the name is taken and
/// `overwrite` is [`Overwrite::Ask`]; repository errors otherwise.
pub fn save_list<R: ListRepository + ?Sized>(
    repo: &R,
    name: &str,
    options: &[WeightedOption],
    overwrite: Overwrite,
) -> Result<SaveOutcome, ManageListsError> {
    let name = validate_list_name(name)?;
    let existed = repo.exists(&name)?;
    if existed && overwrite == Overwrite::Ask {
        debug!("save of '{name}' needs overwrite confirmation");
        return Err(ManageListsError::AlreadyExists(name));
    }

    repo.save(&name, options)?;
    let outcome = if existed {
        SaveOutcome::Overwritten
    } else {
        SaveOutcome::Created
    };
    info!("saved list '{name}' ({} options, {outcome:?})", options.len());
    Ok(outcome)
}

/// Loads the list stored under `name` into a fresh [`OptionStore`].
///
/// # Errors
///
/// `NotFound` and `Corrupt` are reported distinctly (wrapped in
/// [`ManageListsError::Store`]).
pub fn load_list<R: ListRepository + ?Sized>(
    repo: &R,
    name: &str,
) -> Result<OptionStore, ManageListsError> {
    let name = validate_list_name(name)?;
    let options = repo.load(&name)?;
    debug!("loaded list '{name}' ({} options)", options.len());
    Ok(OptionStore::from_options(options))
}

/// Loads `name`, or returns an empty store if it does not exist yet.
///
/// # Errors
///
/// Any repository error other than `NotFound`.
pub fn load_or_new<R: ListRepository + ?Sized>(
    repo: &R,
    name: &str,
) -> Result<OptionStore, ManageListsError> {
    match load_list(repo, name) {
        Err(e) if e.is_not_found() => Ok(OptionStore::new()),
        other => other,
    }
}

/// Deletes the list stored under `name`.
///
/// # Errors
///
/// `NotFound` if no such list exists.
pub fn delete_list<R: ListRepository + ?Sized>(
    repo: &R,
    name: &str,
) -> Result<(), ManageListsError> {
    let name = validate_list_name(name)?;
    repo.delete(&name)?;
    info!("deleted list '{name}'");
    Ok(())
}

/// Names of all saved lists, sorted.
///
/// # Errors
///
/// Repository I/O errors.
pub fn list_names<R: ListRepository + ?Sized>(repo: &R) -> Result<Vec<String>, ManageListsError> {
    Ok(repo.list()?)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;

    fn opt(label: &str, weight: u32) -> WeightedOption {
        WeightedOption::new(label, weight).unwrap()
    }

    // ── validate_list_name ────────────────────────────────────────────────────

    #[test]
    fn test_validate_list_name_trims_whitespace() {
        assert_eq!(validate_list_name("  dinner ").unwrap(), "dinner");
    }

    #[test]
    fn test_validate_list_name_rejects_bad_names() {
        for bad in ["", "   ", "../etc", "a/b", "a\\b", ".hidden"] {
            assert!(
                matches!(
                    validate_list_name(bad),
                    Err(ListStoreError::InvalidName { .. })
                ),
                "{bad:?} must be rejected"
            );
        }
    }

    #[test]
    fn test_validate_list_name_allows_spaces_and_unicode() {
        assert_eq!(validate_list_name("Friday night 🍕").unwrap(), "Friday night 🍕");
    }

    // ── save_list ─────────────────────────────────────────────────────────────

    #[test]
    fn test_save_new_list_creates_it() {
        // Arrange
        let mut repo = MockListRepository::new();
        repo.expect_exists()
            .with(eq("dinner"))
            .times(1)
            .returning(|_| Ok(false));
        repo.expect_save().times(1).returning(|_, _| Ok(()));

        // Act
        let outcome = save_list(&repo, "dinner", &[opt("pizza", 1)], Overwrite::Ask);

        // Assert
        assert_eq!(outcome.unwrap(), SaveOutcome::Created);
    }

    #[test]
    fn test_save_existing_without_confirmation_is_refused() {
        // Arrange
        let mut repo = MockListRepository::new();
        repo.expect_exists().returning(|_| Ok(true));
        repo.expect_save().never();

        // Act
        let result = save_list(&repo, "dinner", &[opt("pizza", 1)], Overwrite::Ask);

        // Assert
        assert!(matches!(result, Err(ManageListsError::AlreadyExists(name)) if name == "dinner"));
    }

    #[test]
    fn test_save_existing_with_confirmation_overwrites() {
        let mut repo = MockListRepository::new();
        repo.expect_exists().returning(|_| Ok(true));
        repo.expect_save()
            .withf(|name, options| name == "dinner" && options.len() == 2)
            .times(1)
            .returning(|_, _| Ok(()));

        let outcome = save_list(
            &repo,
            "dinner",
            &[opt("pizza", 1), opt("tacos", 3)],
            Overwrite::Confirmed,
        );

        assert_eq!(outcome.unwrap(), SaveOutcome::Overwritten);
    }

    #[test]
    fn test_save_encode_failure_is_reported() {
        // Arrange
        let mut repo = MockListRepository::new();
        repo.expect_exists().returning(|_| Ok(true));
        repo.expect_save().times(1).returning(|name, _| {
            let source = serde_json::from_str::<u32>("x").unwrap_err();
            Err(ListStoreError::Encode {
                name: name.to_string(),
                source: CodecError::Encode(source),
            })
        });

        // Act
        let result = save_list(&repo, "dinner", &[opt("pizza", 1)], Overwrite::Confirmed);

        // Assert
        let err = result.unwrap_err();
        assert!(matches!(
            err,
            ManageListsError::Store(ListStoreError::Encode { ref name, .. }) if name == "dinner"
        ));
        assert!(err.to_string().contains("could not be encoded"), "{err}");
    }

    #[test]
    fn test_save_with_invalid_name_never_touches_repository() {
        let mut repo = MockListRepository::new();
        repo.expect_exists().never();
        repo.expect_save().never();

        let result = save_list(&repo, "../x", &[], Overwrite::Confirmed);

        assert!(matches!(
            result,
            Err(ManageListsError::Store(ListStoreError::InvalidName { .. }))
        ));
    }

    // ── load_list / load_or_new ───────────────────────────────────────────────

    #[test]
    fn test_load_list_wraps_options_in_store() {
        let mut repo = MockListRepository::new();
        repo.expect_load()
            .with(eq("dinner"))
            .returning(|_| Ok(vec![opt("pizza", 1), opt("tacos", 3)]));

        let store = load_list(&repo, "dinner").unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.total_weight(), 4);
    }

    #[test]
    fn test_load_missing_list_is_not_found() {
        let mut repo = MockListRepository::new();
        repo.expect_load()
            .returning(|name| Err(ListStoreError::NotFound(name.to_string())));

        let err = load_list(&repo, "missing").unwrap_err();

        assert!(err.is_not_found());
    }

    #[test]
    fn test_load_corrupt_list_is_distinct_from_not_found() {
        let mut repo = MockListRepository::new();
        repo.expect_load().returning(|name| {
            let source = decisionmaker_core::decode_list("{").unwrap_err();
            Err(ListStoreError::Corrupt {
                name: name.to_string(),
                source,
            })
        });

        let err = load_list(&repo, "broken").unwrap_err();

        assert!(!err.is_not_found());
        assert!(matches!(
            err,
            ManageListsError::Store(ListStoreError::Corrupt { .. })
        ));
    }

    #[test]
    fn test_load_or_new_returns_empty_store_for_missing_list() {
        let mut repo = MockListRepository::new();
        repo.expect_load()
            .returning(|name| Err(ListStoreError::NotFound(name.to_string())));

        let store = load_or_new(&repo, "fresh").unwrap();

        assert!(store.is_empty());
    }

    // ── delete_list / list_names ──────────────────────────────────────────────

    #[test]
    fn test_delete_missing_list_is_not_found() {
        let mut repo = MockListRepository::new();
        repo.expect_delete()
            .returning(|name| Err(ListStoreError::NotFound(name.to_string())));

        assert!(delete_list(&repo, "x").unwrap_err().is_not_found());
    }

    #[test]
    fn test_list_names_passes_through_repository_result() {
        let mut repo = MockListRepository::new();
        repo.expect_list()
            .returning(|| Ok(vec!["a".to_string(), "b".to_string()]));

        assert_eq!(list_names(&repo).unwrap(), vec!["a", "b"]);
    }
}
