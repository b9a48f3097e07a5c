//! Domain entities for DecisionMaker.
//!
//! This module contains pure business logic with no infrastructure dependencies.
//!
//! # What is "domain" in Clean Architecture? (for beginners)
//!
//! The innermost layer of the application is the **domain**.  Domain code:
//!
//! - Contains the core rules of the application: how options are added and
//!   sorted, how a weighted pick is drawn, how long a reveal runs.
//! - Has **no** imports from the file system, terminals or async runtimes.
//! - Can be tested on any platform without any external setup.
//!
//! Randomness is the one external input the domain needs; it is passed in as
//! a `rand::Rng` so tests can use a seeded generator.

/// The editable, ordered list of weighted options.
pub mod options;

/// Timed reveal ("slot machine") state machine.
pub mod reveal;

/// Weight-proportional random selection.
pub mod selector;

/// User settings record and validation.
pub mod settings;
