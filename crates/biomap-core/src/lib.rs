//! biomap-core: data model and numeric pipeline for the biomap generator.
//!
//! This crate turns loosely typed tabular input into the render-ready
//! [`MapModel`]. The only layers with real algorithmic content are the
//! [`normalizer`] (messy numeric text → `Option<f64>`) and the [`scaler`]
//! (numeric distribution → bounded marker radius).
//!
//! # Architecture
//!
//! ```text
//! RawTable ──► columns ──► normalizer ──► scaler ──► model ──► MapModel
//! ```
//!
//! Everything here is synchronous and side-effect free apart from `tracing`
//! events; file I/O lives in `biomap-sources`, HTML in `biomap-render`.

pub mod columns;
pub mod config;
pub mod error;
pub mod model;
pub mod normalizer;
pub mod scaler;
pub mod types;

pub use error::ModelError;
pub use model::build_model;
pub use normalizer::{normalize, parse_numeric, NumericInput};
pub use scaler::Scaler;
pub use types::{
    Bounds, MapModel, Overlay, Palette, Preselect, RawTable, Site, SizeBy, VisibilityMode,
};
