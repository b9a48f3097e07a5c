//! # decisionmaker-core
//!
//! Shared library for DecisionMaker containing the option store, the weighted
//! selector, the list file codec, the settings record and the timed reveal
//! state machine.
//!
//! It has zero dependencies on the file system, terminals, or timers; the
//! `decisionmaker` application crate wires those in.
//!
//! # Architecture overview (for beginners)
//!
//! DecisionMaker helps you make a choice: you keep a list of options, give
//! each one a weight ("tacos" three times as likely as "pizza"), and let the
//! program draw one at random.  The draw is shown as a short "slot machine"
//! animation before it settles on the result.
//!
//! This crate (`decisionmaker-core`) is the shared foundation.  It defines:
//!
//! - **`domain`** – Pure business logic.  [`OptionStore`] is the editable
//!   list of options, [`WeightedSelector`] performs the weighted draw,
//!   [`RevealMachine`] models the timed reveal, and [`Settings`] is the
//!   validated user configuration.
//!
//! - **`codec`** – How an option list is written to and read from a
//!   persisted list file (a JSON array of `[label, weight]` pairs).

pub mod codec;
pub mod domain;

// Re-export the most-used types at the crate root so callers can write
// `decisionmaker_core::OptionStore` instead of the full module path.
pub use codec::list_file::{decode_list, encode_list, CodecError};
pub use domain::options::{OptionError, OptionStore, SortOrder, StoreError, WeightedOption};
pub use domain::reveal::{
    RevealError, RevealFrame, RevealMachine, RevealPlan, RevealState, MIN_TICK,
};
pub use domain::selector::{pick, SelectError, WeightedSelector};
pub use domain::settings::{Settings, SettingsError, Theme};
