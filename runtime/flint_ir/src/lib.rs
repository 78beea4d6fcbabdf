//! Flint IR - shared leaf types for the Flint runtime.
//!
//! This crate holds the types that every other runtime crate agrees on:
//!
//! - [`Name`]: short identifiers and `/`-delimited namespace paths
//! - [`SourcePos`]: the source-position record carried by operations and errors
//! - [`format_spec`]: parsing of printf-style format directives
//!
//! It has no dependencies so the heavier crates (`flint_eval`,
//! `flint_diagnostic`) can share these types without coupling to each other.

pub mod format_spec;
mod name;
mod pos;

pub use name::{Name, NameError, MAX_NAME_LENGTH};
pub use pos::SourcePos;
