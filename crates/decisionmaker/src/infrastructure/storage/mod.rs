//! Storage infrastructure: list and settings file persistence.
//!
//! This module provides a thin adapter between the application and the
//! file system.  Both files live under one data directory (the working
//! directory unless `--data-dir` says otherwise):
//!
//! ```text
//! <data-dir>/
//!   settings.json       user settings (see `settings`)
//!   lists/
//!     dinner.json       one file per saved option list (see `lists`)
//! ```
//!
//! Keeping storage concerns here means the application layer only ever sees
//! the `ListRepository` trait and plain `Settings` values.

pub mod lists;
pub mod settings;
