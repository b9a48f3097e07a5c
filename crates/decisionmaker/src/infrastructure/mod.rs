//! Infrastructure layer.
//!
//! Contains OS-facing adapters: file-system storage for lists and settings,
//! the terminal display and interactive shell, and the command bridge that
//! exposes application operations to the CLI.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `decisionmaker_core`, but MUST NOT be imported by the `application` or
//! domain layers.

pub mod cli_bridge;
pub mod storage;
pub mod terminal;
