//! User settings record.
//!
//! Settings are a flat record shared by the whole process:
//!
//! ```json
//! {"duration": 5, "sort_order": "Alphabetical", "font_size": 14, "theme": "Dark"}
//! ```
//!
//! # Serde default values
//!
//! Every field carries `#[serde(default = "...")]`, so a settings file
//! written by an older version (for example one without `theme`) still loads
//! and the missing keys take their defaults.
//!
//! Parsing only checks types.  Ranges are checked by [`Settings::validate`],
//! which callers must run after deserializing.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::options::SortOrder;
use super::reveal::{RevealPlan, DEFAULT_TICK};

/// Allowed reveal duration, in seconds.
pub const DURATION_RANGE: (u32, u32) = (1, 3600);

/// Allowed font size, in points.
pub const FONT_SIZE_RANGE: (u32, u32) = (8, 30);

/// Errors raised by settings validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    /// A numeric field is outside its allowed range.
    #[error("invalid configuration: {field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: u32,
        max: u32,
    },

    /// A field could not be parsed at all.
    #[error("invalid configuration: {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Colour scheme hint for the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    #[serde(alias = "dark")]
    Dark,
    #[serde(alias = "light")]
    Light,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Dark => f.write_str("Dark"),
            Theme::Light => f.write_str("Light"),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(format!("unknown theme '{other}' (expected 'dark' or 'light')")),
        }
    }
}

/// Process-wide user settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Reveal length in seconds.
    #[serde(default = "default_duration")]
    pub duration: i64,
    /// Display order of the option list.
    #[serde(default)]
    pub sort_order: SortOrder,
    /// Font size hint for the UI layer.
    #[serde(default = "default_font_size")]
    pub font_size: i64,
    /// Colour scheme hint for the UI layer.
    #[serde(default)]
    pub theme: Theme,
}

fn default_duration() -> i64 {
    5
}
fn default_font_size() -> i64 {
    14
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            duration: default_duration(),
            sort_order: SortOrder::default(),
            font_size: default_font_size(),
            theme: Theme::default(),
        }
    }
}

impl Settings {
    /// Checks every numeric field against its range.
    ///
    /// # Errors
    ///
    /// [`SettingsError::OutOfRange`] naming the first offending field.
    pub fn validate(&self) -> Result<(), SettingsError> {
        check_range("duration", self.duration, DURATION_RANGE)?;
        check_range("font_size", self.font_size, FONT_SIZE_RANGE)?;
        Ok(())
    }

    /// Reveal duration as a [`Duration`].  Only meaningful after
    /// [`validate`](Self::validate) succeeded.
    pub fn reveal_duration(&self) -> Duration {
        Duration::from_secs(self.duration.clamp(0, i64::from(DURATION_RANGE.1)) as u64)
    }

    /// Reveal plan at the default tick rate.
    pub fn reveal_plan(&self) -> RevealPlan {
        RevealPlan::new(self.reveal_duration(), DEFAULT_TICK)
    }
}

fn check_range(field: &'static str, value: i64, (min, max): (u32, u32)) -> Result<(), SettingsError> {
    if value < i64::from(min) || value > i64::from(max) {
        return Err(SettingsError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Parses an integer field typed by the user (e.g. `"abc"` for duration).
///
/// # Errors
///
/// [`SettingsError::Invalid`] if `raw` is not an integer.
pub fn parse_int_field(field: &'static str, raw: &str) -> Result<i64, SettingsError> {
    raw.trim().parse::<i64>().map_err(|e| SettingsError::Invalid {
        field,
        reason: format!("'{raw}' is not a whole number ({e})"),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_match_first_run_values() {
        let s = Settings::default();
        assert_eq!(s.duration, 5);
        assert_eq!(s.sort_order, SortOrder::Alphabetical);
        assert_eq!(s.font_size, 14);
        assert_eq!(s.theme, Theme::Dark);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_duration() {
        let s = Settings {
            duration: 0,
            ..Settings::default()
        };
        assert_eq!(
            s.validate(),
            Err(SettingsError::OutOfRange {
                field: "duration",
                value: 0,
                min: 1,
                max: 3600
            })
        );
    }

    #[test]
    fn test_validate_rejects_duration_above_one_hour() {
        let s = Settings {
            duration: 3601,
            ..Settings::default()
        };
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_range_edges() {
        for duration in [1, 3600] {
            let s = Settings {
                duration,
                ..Settings::default()
            };
            assert!(s.validate().is_ok(), "duration {duration}");
        }
    }

    #[test]
    fn test_validate_rejects_font_size_out_of_range() {
        let s = Settings {
            font_size: 31,
            ..Settings::default()
        };
        assert!(matches!(
            s.validate(),
            Err(SettingsError::OutOfRange {
                field: "font_size",
                ..
            })
        ));
    }

    #[test]
    fn test_json_key_names_and_spellings() {
        let json = serde_json::to_string(&Settings::default()).unwrap();
        assert!(json.contains("\"duration\":5"));
        assert!(json.contains("\"sort_order\":\"Alphabetical\""));
        assert!(json.contains("\"font_size\":14"));
        assert!(json.contains("\"theme\":\"Dark\""));
    }

    #[test]
    fn test_missing_keys_take_defaults() {
        let s: Settings = serde_json::from_str(r#"{"duration": 10}"#).unwrap();
        assert_eq!(s.duration, 10);
        assert_eq!(s.font_size, 14);
        assert_eq!(s.theme, Theme::Dark);
    }

    #[test]
    fn test_lowercase_enum_spellings_are_accepted() {
        let s: Settings =
            serde_json::from_str(r#"{"sort_order": "weight", "theme": "light"}"#).unwrap();
        assert_eq!(s.sort_order, SortOrder::Weight);
        assert_eq!(s.theme, Theme::Light);
    }

    #[test]
    fn test_non_numeric_duration_fails_to_parse() {
        let result: Result<Settings, _> = serde_json::from_str(r#"{"duration": "soon"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_int_field_reports_field_name() {
        let err = parse_int_field("duration", "abc").unwrap_err();
        assert!(err.to_string().contains("duration"));
        assert_eq!(parse_int_field("duration", " 12 "), Ok(12));
    }

    #[test]
    fn test_reveal_plan_uses_duration_seconds() {
        let s = Settings {
            duration: 2,
            ..Settings::default()
        };
        assert_eq!(s.reveal_plan().total_ticks(), 20);
    }

    #[test]
    fn test_theme_from_str() {
        assert_eq!("Light".parse::<Theme>().unwrap(), Theme::Light);
        assert!("blue".parse::<Theme>().is_err());
    }
}
