//! Error types for model building and option parsing.

use thiserror::Error;

/// Failure while turning a [`RawTable`](crate::RawTable) into a
/// [`MapModel`](crate::MapModel).
#[derive(Debug, Error)]
pub enum ModelError {
    /// A column the map cannot be drawn without is absent from every input.
    #[error("required column {column:?} not found (available: {available:?})")]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    /// The colour palette has no usable entries.
    #[error("colour palette is empty")]
    EmptyPalette,
}

/// An option value (CLI flag or config key) outside its allowed set.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid {option} {value:?} (expected one of: {expected})")]
pub struct ParseOptionError {
    pub option: &'static str,
    pub value: String,
    pub expected: &'static str,
}
