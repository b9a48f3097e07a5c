//! MultiRollUseCase: one weighted pick from each of several saved lists.
//!
//! Each row names a saved list.  Rolling draws a fresh pick for every
//! unlocked row; locked rows keep their previous result so the user can
//! re-roll only the rows they are unhappy with.
//!
//! A list that does not exist, or exists but is empty, yields
//! [`RollOutcome::NoData`] instead of an error, so one bad row never stops
//! the others from rolling.

use decisionmaker_core::{pick, SelectError};
use rand::Rng;
use tracing::{debug, warn};

use super::manage_lists::{load_list, ListRepository};

/// Text shown for rows with nothing to draw from.
pub const NO_DATA_TEXT: &str = "No data available";

/// One row of a multi-roll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollRow {
    /// Name of the saved list to draw from.
    pub list_name: String,
    /// Locked rows are not re-rolled.
    pub locked: bool,
    /// Result of the previous roll, kept for locked rows.
    pub previous: Option<String>,
}

impl RollRow {
    pub fn new(list_name: impl Into<String>) -> Self {
        Self {
            list_name: list_name.into(),
            locked: false,
            previous: None,
        }
    }

    pub fn locked(list_name: impl Into<String>, previous: Option<String>) -> Self {
        Self {
            list_name: list_name.into(),
            locked: true,
            previous,
        }
    }
}

/// Result of rolling one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RollOutcome {
    /// A fresh pick.
    Picked(String),
    /// The list is missing or empty.
    NoData,
    /// The row was locked; its previous result (if any) is kept.
    Locked(Option<String>),
    /// The list could not be read (corrupt file, invalid name, I/O error).
    Failed(String),
}

impl RollOutcome {
    /// Text for the result column.
    pub fn display_text(&self) -> String {
        match self {
            RollOutcome::Picked(label) => label.clone(),
            RollOutcome::NoData => NO_DATA_TEXT.to_string(),
            RollOutcome::Locked(previous) => previous.clone().unwrap_or_default(),
            RollOutcome::Failed(reason) => format!("error: {reason}"),
        }
    }
}

/// Rolls every row, in order.  Never fails as a whole; see [`RollOutcome`].
pub fn roll_lists<Repo, R>(repo: &Repo, rows: &[RollRow], rng: &mut R) -> Vec<RollOutcome>
where
    Repo: ListRepository + ?Sized,
    R: Rng + ?Sized,
{
    rows.iter().map(|row| roll_row(repo, row, rng)).collect()
}

fn roll_row<Repo, R>(repo: &Repo, row: &RollRow, rng: &mut R) -> RollOutcome
where
    Repo: ListRepository + ?Sized,
    R: Rng + ?Sized,
{
    if row.locked {
        debug!("row '{}' is locked", row.list_name);
        return RollOutcome::Locked(row.previous.clone());
    }

    let store = match load_list(repo, &row.list_name) {
        Ok(store) => store,
        Err(e) if e.is_not_found() => return RollOutcome::NoData,
        Err(e) => {
            warn!("multi-roll could not read '{}': {e}", row.list_name);
            return RollOutcome::Failed(e.to_string());
        }
    };

    match pick(store.options(), rng) {
        Ok(option) => RollOutcome::Picked(option.label().to_string()),
        Err(SelectError::Empty) => RollOutcome::NoData,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::manage_lists::{ListStoreError, MockListRepository};
    use decisionmaker_core::WeightedOption;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn repo_with_lists() -> MockListRepository {
        let mut repo = MockListRepository::new();
        repo.expect_load().returning(|name| match name {
            "food" => Ok(vec![WeightedOption::new("pizza", 1).unwrap()]),
            "empty" => Ok(Vec::new()),
            "broken" => Err(ListStoreError::Corrupt {
                name: name.to_string(),
                source: decisionmaker_core::decode_list("nope").unwrap_err(),
            }),
            other => Err(ListStoreError::NotFound(other.to_string())),
        });
        repo
    }

    #[test]
    fn test_unlocked_row_gets_fresh_pick() {
        let repo = repo_with_lists();
        let mut rng = StdRng::seed_from_u64(0);

        let outcomes = roll_lists(&repo, &[RollRow::new("food")], &mut rng);

        assert_eq!(outcomes, vec![RollOutcome::Picked("pizza".to_string())]);
    }

    #[test]
    fn test_missing_and_empty_lists_report_no_data() {
        let repo = repo_with_lists();
        let mut rng = StdRng::seed_from_u64(0);

        let outcomes = roll_lists(
            &repo,
            &[RollRow::new("missing"), RollRow::new("empty")],
            &mut rng,
        );

        assert_eq!(outcomes, vec![RollOutcome::NoData, RollOutcome::NoData]);
        assert_eq!(outcomes[0].display_text(), "No data available");
    }

    #[test]
    fn test_locked_row_keeps_previous_and_is_not_loaded() {
        // Arrange: a repository that must never be asked for anything
        let mut repo = MockListRepository::new();
        repo.expect_load().never();
        let mut rng = StdRng::seed_from_u64(0);

        // Act
        let outcomes = roll_lists(
            &repo,
            &[RollRow::locked("food", Some("tacos".to_string()))],
            &mut rng,
        );

        // Assert
        assert_eq!(outcomes, vec![RollOutcome::Locked(Some("tacos".to_string()))]);
        assert_eq!(outcomes[0].display_text(), "tacos");
    }

    #[test]
    fn test_corrupt_list_fails_only_its_row() {
        let repo = repo_with_lists();
        let mut rng = StdRng::seed_from_u64(0);

        let outcomes = roll_lists(
            &repo,
            &[RollRow::new("broken"), RollRow::new("food")],
            &mut rng,
        );

        assert!(matches!(outcomes[0], RollOutcome::Failed(_)));
        assert_eq!(outcomes[1], RollOutcome::Picked("pizza".to_string()));
    }
}
