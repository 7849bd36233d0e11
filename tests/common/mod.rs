//! Shared test utilities for biomap integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file. Fixtures are plain `&'static str` documents; builders
//! write them into a `tempfile::TempDir` when a harness needs real files.

pub mod assertions;
pub mod builders;
pub mod fixtures;

pub use builders::*;
pub use fixtures::*;
