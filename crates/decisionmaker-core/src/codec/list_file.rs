//! JSON codec for persisted option lists.
//!
//! File format: a JSON array of two-element arrays, one per option, in list
//! order.
//!
//! ```json
//! [["pizza", 1], ["tacos", 3]]
//! ```
//!
//! The first element is the label (string), the second the weight (integer
//! ≥ 1).  Anything else (invalid JSON, an object at the top level, a
//! three-element entry, a weight of 0, a fractional weight) is rejected with a
//! [`CodecError`] rather than partially loaded.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::domain::options::{OptionError, WeightedOption};

/// Errors that can occur while encoding or decoding a list file.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The options could not be serialized.
    #[error("failed to encode list: {0}")]
    Encode(#[source] serde_json::Error),

    /// The text is not valid JSON or does not have the `[[label, weight], ...]`
    /// shape.
    #[error("malformed list file: {0}")]
    Malformed(#[from] serde_json::Error),

    /// An entry parsed but is not a valid option.
    #[error("invalid entry #{index} ('{label}'): {source}")]
    InvalidEntry {
        index: usize,
        label: String,
        #[source]
        source: OptionError,
    },
}

/// On-disk representation of one option.  A tuple struct serializes as a
/// JSON array, which gives the `[label, weight]` shape.
#[derive(Serialize, Deserialize)]
struct Entry(String, u32);

#[derive(Serialize)]
struct EntryRef<'a>(&'a str, u32);

// ── Public API ────────────────────────────────────────────────────────────────

/// Encodes options into list file text.
///
/// # Examples
///
/// ```rust
/// use decisionmaker_core::{decode_list, encode_list, WeightedOption};
///
/// let options = vec![
///     WeightedOption::new("pizza", 1).unwrap(),
///     WeightedOption::new("tacos", 3).unwrap(),
/// ];
/// let text = encode_list(&options).unwrap();
/// assert_eq!(text, r#"[["pizza",1],["tacos",3]]"#);
/// assert_eq!(decode_list(&text).unwrap(), options);
/// ```
///
/// # Errors
///
/// [`CodecError::Encode`] if serialization fails.  Callers must not write
/// anything in that case.
pub fn encode_list(options: &[WeightedOption]) -> Result<String, CodecError> {
    let entries: Vec<EntryRef<'_>> = options
        .iter()
        .map(|o| EntryRef(o.label(), o.weight()))
        .collect();
    serde_json::to_string(&entries).map_err(CodecError::Encode)
}

/// Decodes list file text into options, preserving order.
///
/// # Errors
///
/// [`CodecError::Malformed`] for invalid JSON or a wrong shape,
/// [`CodecError::InvalidEntry`] for an empty label or a zero weight.
pub fn decode_list(text: &str) -> Result<Vec<WeightedOption>, CodecError> {
    let entries: Vec<Entry> = serde_json::from_str(text)?;
    debug!(entries = entries.len(), "decoded list file");
    entries
        .into_iter()
        .enumerate()
        .map(|(index, Entry(label, weight))| {
            WeightedOption::new(label.clone(), weight).map_err(|source| CodecError::InvalidEntry {
                index,
                label,
                source,
            })
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
