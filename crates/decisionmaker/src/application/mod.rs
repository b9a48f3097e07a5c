//! Application layer use cases.
//!
//! # What is the "application" layer? (for beginners)
//!
//! In Clean Architecture the *application* layer sits between the domain
//! (pure business rules in `decisionmaker-core`) and the infrastructure
//! (file system, terminal).
//!
//! Use cases in this layer:
//!
//! - **Orchestrate** domain objects to fulfil a user goal (e.g., "save this
//!   list under a name, but only overwrite with confirmation").
//! - **Depend on abstractions** (traits such as [`manage_lists::ListRepository`]
//!   and [`run_reveal::RevealDisplay`]) rather than concrete implementations,
//!   so tests can substitute mocks.
//! - **Contain no file system access** of their own.
//!
//! # Sub-modules
//!
//! - **`manage_lists`** – Save, load, delete and enumerate named option lists
//!   through a [`manage_lists::ListRepository`].
//!
//! - **`run_reveal`**   – Drives the timed reveal: samples on every timer tick
//!   and pushes each frame to a display.
//!
//! - **`multi_roll`**   – Draws one pick from each of several saved lists at
//!   once, leaving locked rows untouched.

pub mod manage_lists;
pub mod multi_roll;
pub mod run_reveal;
