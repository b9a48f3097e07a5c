//! Command bridge: exposes application-layer operations to the CLI and the
//! interactive shell.
//!
//! Every command function takes the [`AppState`] explicitly and returns a
//! [`CommandResult<T>`], so the presentation code never has to match on the
//! error types of the lower layers.  The bridge is the only consumer of the
//! storage adapters; it must NOT be imported by the application or domain
//! layers.
//!
//! # `CommandResult<T>` wrapper
//!
//! All commands return `CommandResult<T>` rather than `Result<T, E>`.  Every
//! response has the same shape, `{ success, data, error }`, which is also
//! what `--json` prints.
//!
//! # State ownership
//!
//! [`AppState`] owns the in-memory option list, the current settings and the
//! list repository.  There is exactly one controller (the CLI invocation or
//! the shell loop) and it passes `&mut AppState` into each command; nothing
//! is shared across threads, so there are no locks.

use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;

use decisionmaker_core::domain::settings::parse_int_field;
use decisionmaker_core::{OptionStore, Settings, SortOrder, Theme};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::manage_lists::{
    delete_list, list_names, load_list, load_or_new, save_list, ListStoreError, ManageListsError,
    Overwrite, SaveOutcome,
};
use crate::application::multi_roll::{roll_lists, RollOutcome, RollRow};
use crate::application::run_reveal::{run_reveal, RevealDisplay, RevealOutcome};
use crate::infrastructure::storage::lists::FsListRepository;
use crate::infrastructure::storage::settings::{load_settings, save_settings};

// ── Shared application state ──────────────────────────────────────────────────

/// Everything a session needs: the option list being edited, the settings
/// in force, and where lists are stored.
#[derive(Debug)]
pub struct AppState {
    /// Directory holding `settings.json` and `lists/`.
    pub data_dir: PathBuf,
    /// Saved lists.
    pub lists: FsListRepository,
    /// The option list currently being edited.
    pub options: OptionStore,
    /// Name of the saved list `options` came from, if any.
    pub current_list: Option<String>,
    /// Settings in force.
    pub settings: Settings,
}

impl AppState {
    /// Opens the data directory and loads `settings.json`.
    ///
    /// An unreadable or invalid settings file is logged and replaced by the
    /// defaults, so a bad file never prevents the tool from starting.
    ///
    /// # Errors
    ///
    /// Returns an error only if the lists directory cannot be created.
    pub fn open(data_dir: &Path) -> Result<Self, ListStoreError> {
        let settings = load_settings(data_dir).unwrap_or_else(|e| {
            warn!("ignoring settings file: {e}");
            Settings::default()
        });
        Self::with_settings(data_dir, settings)
    }

    /// Opens the data directory with explicit settings (nothing is read from
    /// `settings.json`).
    ///
    /// # Errors
    ///
    /// Returns an error if the lists directory cannot be created.
    pub fn with_settings(data_dir: &Path, settings: Settings) -> Result<Self, ListStoreError> {
        Ok(Self {
            data_dir: data_dir.to_path_buf(),
            lists: FsListRepository::in_data_dir(data_dir)?,
            options: OptionStore::new(),
            current_list: None,
            settings,
        })
    }

    /// Re-applies the configured sort order to the option list.
    fn refresh(&mut self) {
        self.options.sort(self.settings.sort_order);
    }
}

// ── Data Transfer Objects ─────────────────────────────────────────────────────

/// One row of the option list as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDto {
    pub index: usize,
    pub label: String,
    pub weight: u32,
}

/// The option list being edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListViewDto {
    pub name: Option<String>,
    pub options: Vec<OptionDto>,
    pub total_weight: u64,
}

impl ListViewDto {
    fn from_state(state: &AppState) -> Self {
        Self {
            name: state.current_list.clone(),
            options: state
                .options
                .options()
                .iter()
                .enumerate()
                .map(|(index, o)| OptionDto {
                    index,
                    label: o.label().to_string(),
                    weight: o.weight(),
                })
                .collect(),
            total_weight: state.options.total_weight(),
        }
    }
}

/// Settings as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsDto {
    pub duration: i64,
    pub sort_order: String,
    pub font_size: i64,
    pub theme: String,
}

impl From<&Settings> for SettingsDto {
    fn from(s: &Settings) -> Self {
        Self {
            duration: s.duration,
            sort_order: s.sort_order.to_string(),
            font_size: s.font_size,
            theme: s.theme.to_string(),
        }
    }
}

/// A partial settings change, as typed by the user.  `None` keeps the
/// current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsUpdateDto {
    pub duration: Option<String>,
    pub sort_order: Option<String>,
    pub font_size: Option<String>,
    pub theme: Option<String>,
}

/// Outcome of a save request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveStatus {
    Created,
    Overwritten,
    /// A list with this name exists; ask the user, then call again with
    /// [`Overwrite::Confirmed`].
    NeedsConfirmation,
}

/// Outcome of a reveal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealResultDto {
    /// `"settled"`, `"no_options"` or `"cancelled"`.
    pub outcome: String,
    pub result: Option<String>,
}

impl From<RevealOutcome> for RevealResultDto {
    fn from(outcome: RevealOutcome) -> Self {
        match outcome {
            RevealOutcome::Settled(label) => Self {
                outcome: "settled".to_string(),
                result: Some(label),
            },
            RevealOutcome::NoOptions => Self {
                outcome: "no_options".to_string(),
                result: None,
            },
            RevealOutcome::Cancelled => Self {
                outcome: "cancelled".to_string(),
                result: None,
            },
        }
    }
}

/// One multi-roll row, as requested by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollRowDto {
    pub list_name: String,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub previous: Option<String>,
}

/// One multi-roll row result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResultDto {
    pub list_name: String,
    pub result: String,
    pub locked: bool,
}

/// Unified response wrapper used by all commands.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResult<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

/// User-facing wording for list errors.
fn list_error_message(e: &ManageListsError) -> String {
    match e {
        ManageListsError::Store(ListStoreError::NotFound(name)) => {
            format!("List \"{name}\" not found.")
        }
        other => other.to_string(),
    }
}

// ── Option list commands ──────────────────────────────────────────────────────

/// Returns the option list being edited.
pub fn get_options(state: &AppState) -> CommandResult<ListViewDto> {
    CommandResult::ok(ListViewDto::from_state(state))
}

/// Starts a new, empty, unnamed list.
pub fn new_list(state: &mut AppState) -> CommandResult<ListViewDto> {
    state.options.clear();
    state.current_list = None;
    CommandResult::ok(ListViewDto::from_state(state))
}

/// Adds one option per comma-separated label, all with `weight`, then
/// re-sorts.
pub fn add_options(state: &mut AppState, text: &str, weight: u32) -> CommandResult<ListViewDto> {
    match state.options.add(text, weight) {
        Ok(added) => {
            debug!("added {added} options");
            state.refresh();
            CommandResult::ok(ListViewDto::from_state(state))
        }
        Err(e) => CommandResult::err(e.to_string()),
    }
}

/// Changes the weight of the option at `index`.
pub fn edit_option(state: &mut AppState, index: usize, weight: u32) -> CommandResult<ListViewDto> {
    match state.options.edit(index, weight) {
        Ok(()) => CommandResult::ok(ListViewDto::from_state(state)),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

/// Removes the options at `indices`; returns the removed options.
pub fn remove_options(state: &mut AppState, indices: &[usize]) -> CommandResult<Vec<OptionDto>> {
    match state.options.remove(indices) {
        Ok(removed) => {
            let mut sorted: Vec<usize> = indices.to_vec();
            sorted.sort_unstable();
            sorted.dedup();
            let dtos = sorted
                .into_iter()
                .zip(removed)
                .map(|(index, o)| OptionDto {
                    index,
                    label: o.label().to_string(),
                    weight: o.weight(),
                })
                .collect();
            CommandResult::ok(dtos)
        }
        Err(e) => CommandResult::err(e.to_string()),
    }
}

/// Sorts the option list once in `order` (the configured order is applied
/// again on the next add or load).
pub fn sort_options(state: &mut AppState, order: SortOrder) -> CommandResult<ListViewDto> {
    state.options.sort(order);
    CommandResult::ok(ListViewDto::from_state(state))
}

// ── Saved list commands ───────────────────────────────────────────────────────

/// Returns the names of all saved lists.
pub fn get_saved_lists(state: &AppState) -> CommandResult<Vec<String>> {
    match list_names(&state.lists) {
        Ok(names) => CommandResult::ok(names),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

/// Saves the option list under `name`.
///
/// With [`Overwrite::Ask`] an existing list is left alone and
/// [`SaveStatus::NeedsConfirmation`] is returned.
pub fn save_current_list(
    state: &mut AppState,
    name: &str,
    overwrite: Overwrite,
) -> CommandResult<SaveStatus> {
    match save_list(&state.lists, name, state.options.options(), overwrite) {
        Ok(outcome) => {
            state.current_list = Some(name.trim().to_string());
            CommandResult::ok(match outcome {
                SaveOutcome::Created => SaveStatus::Created,
                SaveOutcome::Overwritten => SaveStatus::Overwritten,
            })
        }
        Err(ManageListsError::AlreadyExists(_)) => CommandResult::ok(SaveStatus::NeedsConfirmation),
        Err(e) => CommandResult::err(list_error_message(&e)),
    }
}

/// Replaces the option list with the saved list `name`.
///
/// On failure (not found, corrupt) the current list is left untouched.
pub fn load_saved_list(state: &mut AppState, name: &str) -> CommandResult<ListViewDto> {
    match load_list(&state.lists, name) {
        Ok(store) => {
            state.options = store;
            state.current_list = Some(name.trim().to_string());
            state.refresh();
            CommandResult::ok(ListViewDto::from_state(state))
        }
        Err(e) => {
            if !e.is_not_found() {
                warn!("failed to load list '{name}': {e}");
            }
            CommandResult::err(list_error_message(&e))
        }
    }
}

/// Like [`load_saved_list`], but a missing list starts an empty one under
/// that name (used by one-shot CLI edits).
pub fn open_list_for_edit(state: &mut AppState, name: &str) -> CommandResult<ListViewDto> {
    match load_or_new(&state.lists, name) {
        Ok(store) => {
            state.options = store;
            state.current_list = Some(name.trim().to_string());
            state.refresh();
            CommandResult::ok(ListViewDto::from_state(state))
        }
        Err(e) => CommandResult::err(list_error_message(&e)),
    }
}

/// Deletes the saved list `name`.  The in-memory option list is kept but is
/// no longer associated with the deleted name.
pub fn delete_saved_list(state: &mut AppState, name: &str) -> CommandResult<()> {
    match delete_list(&state.lists, name) {
        Ok(()) => {
            if state.current_list.as_deref() == Some(name.trim()) {
                state.current_list = None;
            }
            CommandResult::ok(())
        }
        Err(e) => CommandResult::err(list_error_message(&e)),
    }
}

// ── Settings commands ─────────────────────────────────────────────────────────

/// Returns the settings in force.
pub fn get_settings(state: &AppState) -> CommandResult<SettingsDto> {
    CommandResult::ok(SettingsDto::from(&state.settings))
}

/// Applies a partial settings change, persists it and re-sorts the option
/// list.
///
/// Every field is parsed and the result validated before anything is
/// written; on error the previous settings stay in force.
pub fn update_settings(state: &mut AppState, update: SettingsUpdateDto) -> CommandResult<SettingsDto> {
    let mut next = state.settings;

    if let Some(raw) = update.duration.as_deref() {
        match parse_int_field("duration", raw) {
            Ok(v) => next.duration = v,
            Err(e) => return CommandResult::err(e.to_string()),
        }
    }
    if let Some(raw) = update.font_size.as_deref() {
        match parse_int_field("font_size", raw) {
            Ok(v) => next.font_size = v,
            Err(e) => return CommandResult::err(e.to_string()),
        }
    }
    if let Some(raw) = update.sort_order.as_deref() {
        match raw.parse::<SortOrder>() {
            Ok(v) => next.sort_order = v,
            Err(e) => return CommandResult::err(format!("invalid configuration: {e}")),
        }
    }
    if let Some(raw) = update.theme.as_deref() {
        match raw.parse::<Theme>() {
            Ok(v) => next.theme = v,
            Err(e) => return CommandResult::err(format!("invalid configuration: {e}")),
        }
    }

    if let Err(e) = save_settings(&state.data_dir, &next) {
        return CommandResult::err(e.to_string());
    }

    state.settings = next;
    state.refresh();
    CommandResult::ok(SettingsDto::from(&state.settings))
}

// ── Decision commands ─────────────────────────────────────────────────────────

/// Runs the timed reveal over the option list.
///
/// `duration_override` (seconds) replaces the configured duration for this
/// run only and is validated against the same range.
pub async fn decide<R: Rng + ?Sized>(
    state: &AppState,
    duration_override: Option<i64>,
    display: &mut dyn RevealDisplay,
    rng: &mut R,
    cancel: &AtomicBool,
) -> CommandResult<RevealResultDto> {
    let mut settings = state.settings;
    if let Some(duration) = duration_override {
        settings.duration = duration;
    }
    if let Err(e) = settings.validate() {
        return CommandResult::err(e.to_string());
    }

    match run_reveal(
        state.options.options(),
        settings.reveal_plan(),
        display,
        rng,
        cancel,
    )
    .await
    {
        Ok(outcome) => CommandResult::ok(RevealResultDto::from(outcome)),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

/// Draws one pick from each requested saved list.
pub fn multi_roll<R: Rng + ?Sized>(
    state: &AppState,
    rows: Vec<RollRowDto>,
    rng: &mut R,
) -> CommandResult<Vec<RollResultDto>> {
    let rows: Vec<RollRow> = rows
        .into_iter()
        .map(|dto| RollRow {
            list_name: dto.list_name,
            locked: dto.locked,
            previous: dto.previous,
        })
        .collect();

    let outcomes = roll_lists(&state.lists, &rows, rng);
    let results = rows
        .into_iter()
        .zip(outcomes)
        .map(|(row, outcome)| RollResultDto {
            locked: matches!(outcome, RollOutcome::Locked(_)),
            result: outcome.display_text(),
            list_name: row.list_name,
        })
        .collect();
    CommandResult::ok(results)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
