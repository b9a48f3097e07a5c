//! JSON-based settings persistence.
//!
//! Reads and writes [`Settings`] to `<data-dir>/settings.json`:
//!
//! ```json
//! {
//!   "duration": 5,
//!   "sort_order": "Alphabetical",
//!   "font_size": 14,
//!   "theme": "Dark"
//! }
//! ```
//!
//! A missing file is not an error: the first run simply uses
//! `Settings::default()`.  A file that exists but cannot be parsed, or holds
//! out-of-range values, *is* an error ("invalid configuration"); callers
//! decide whether to fall back to defaults.

use std::path::{Path, PathBuf};

use decisionmaker_core::{Settings, SettingsError};
use thiserror::Error;
use tracing::debug;

/// File name of the settings file inside the data directory.
pub const SETTINGS_FILE: &str = "settings.json";

/// Error type for settings file operations.
#[derive(Debug, Error)]
pub enum SettingsFileError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The JSON content could not be parsed into settings.
    #[error("invalid configuration: failed to parse settings JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The JSON parsed but a value is out of range.
    #[error(transparent)]
    Invalid(#[from] SettingsError),
}

/// Resolves the full path to the settings file.
pub fn settings_file_path(data_dir: &Path) -> PathBuf {
    data_dir.join(SETTINGS_FILE)
}

/// Parses and validates settings JSON text.
///
/// # Errors
///
/// [`SettingsFileError::Parse`] for malformed JSON or wrong types,
/// [`SettingsFileError::Invalid`] for out-of-range values.
pub fn parse_settings(text: &str) -> Result<Settings, SettingsFileError> {
    let settings: Settings = serde_json::from_str(text)?;
    settings.validate()?;
    Ok(settings)
}

/// Loads settings from disk, returning `Settings::default()` if the file
/// does not yet exist.
///
/// # Errors
///
/// [`SettingsFileError::Io`] for file-system errors other than "not found",
/// [`SettingsFileError::Parse`] / [`SettingsFileError::Invalid`] for bad
/// content.
pub fn load_settings(data_dir: &Path) -> Result<Settings, SettingsFileError> {
    let path = settings_file_path(data_dir);

    match std::fs::read_to_string(&path) {
        Ok(content) => {
            let settings = parse_settings(&content)?;
            debug!("loaded settings from {}", path.display());
            Ok(settings)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("no settings file at {}, using defaults", path.display());
            Ok(Settings::default())
        }
        Err(e) => Err(SettingsFileError::Io { path, source: e }),
    }
}

/// Persists `settings` to disk.
///
/// Settings are validated first; invalid settings are never written.
/// Creates the data directory if it does not exist.
///
/// # Errors
///
/// [`SettingsFileError::Invalid`] for out-of-range values,
/// [`SettingsFileError::Io`] for file-system failures.
pub fn save_settings(data_dir: &Path, settings: &Settings) -> Result<(), SettingsFileError> {
    settings.validate()?;

    std::fs::create_dir_all(data_dir).map_err(|source| SettingsFileError::Io {
        path: data_dir.to_path_buf(),
        source,
    })?;

    let path = settings_file_path(data_dir);
    let content = serde_json::to_string_pretty(settings)?;
    std::fs::write(&path, content).map_err(|source| SettingsFileError::Io {
        path: path.clone(),
        source,
    })?;
    debug!("saved settings to {}", path.display());
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use decisionmaker_core::{SortOrder, Theme};
    use uuid::Uuid;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("decisionmaker_test_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_load_settings_returns_default_when_file_absent() {
        // Arrange
        let dir = temp_dir();

        // Act
        let settings = load_settings(&dir).unwrap();

        // Assert
        assert_eq!(settings, Settings::default());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_save_and_load_settings_round_trip() {
        // Arrange
        let dir = temp_dir();
        let settings = Settings {
            duration: 12,
            sort_order: SortOrder::Weight,
            font_size: 20,
            theme: Theme::Light,
        };

        // Act
        save_settings(&dir, &settings).unwrap();
        let loaded = load_settings(&dir).unwrap();

        // Assert
        assert_eq!(loaded, settings);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_settings_without_theme_key() {
        // Files from older versions have no theme key.
        let dir = temp_dir();
        std::fs::write(
            settings_file_path(&dir),
            r#"{"duration": 3, "sort_order": "Weight", "font_size": 16}"#,
        )
        .unwrap();

        let loaded = load_settings(&dir).unwrap();

        assert_eq!(loaded.duration, 3);
        assert_eq!(loaded.sort_order, SortOrder::Weight);
        assert_eq!(loaded.font_size, 16);
        assert_eq!(loaded.theme, Theme::Dark);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_parse_non_numeric_duration_is_parse_error() {
        let result = parse_settings(r#"{"duration": "five"}"#);
        assert!(matches!(result, Err(SettingsFileError::Parse(_))));
    }

    #[test]
    fn test_parse_out_of_range_duration_is_invalid() {
        let result = parse_settings(r#"{"duration": 0}"#);
        assert!(matches!(
            result,
            Err(SettingsFileError::Invalid(SettingsError::OutOfRange {
                field: "duration",
                ..
            }))
        ));
    }

    #[test]
    fn test_parse_invalid_json_is_parse_error() {
        assert!(matches!(
            parse_settings("{ not json"),
            Err(SettingsFileError::Parse(_))
        ));
    }

    #[test]
    fn test_save_refuses_invalid_settings_and_writes_nothing() {
        let dir = temp_dir();
        let bad = Settings {
            font_size: 2,
            ..Settings::default()
        };

        let result = save_settings(&dir, &bad);

        assert!(matches!(result, Err(SettingsFileError::Invalid(_))));
        assert!(!settings_file_path(&dir).exists());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_settings_file_path_ends_with_settings_json() {
        let path = settings_file_path(Path::new("/data"));
        assert!(path.ends_with("settings.json"));
    }
}
