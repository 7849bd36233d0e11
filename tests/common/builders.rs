//! Test builders: ergonomic constructors for tables and on-disk runs.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use biomap::Options;
use biomap_core::config::Config;
use biomap_core::RawTable;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// TableBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`RawTable`] fixtures.
///
/// # Example
///
/// ```rust
/// let table = TableBuilder::new(&["techno", "latitude", "longitude"])
///     .row(&["biogaz", "48.1", "2.3"])
///     .build();
/// ```
pub struct TableBuilder {
    table: RawTable,
}

impl TableBuilder {
    pub fn new(columns: &[&str]) -> Self {
        Self {
            table: RawTable::new(columns.iter().map(|c| c.to_string()).collect()),
        }
    }

    /// The default column layout: techno, status, coordinates, capacity, CO₂.
    pub fn sites() -> Self {
        Self::new(&[
            "techno",
            "operational_status",
            "latitude",
            "longitude",
            "capacite_gwh_year",
            "co2_injection_potential_tpy",
        ])
    }

    pub fn row(mut self, cells: &[&str]) -> Self {
        self.table
            .push_row(cells.iter().map(|c| Some(c.to_string())).collect());
        self
    }

    pub fn build(self) -> RawTable {
        self.table
    }
}

// ---------------------------------------------------------------------------
// On-disk runs
// ---------------------------------------------------------------------------

/// Write `content` to `dir/name` and return the path.
pub fn write_fixture(dir: &Path, name: &str, content: impl AsRef<[u8]>) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("write fixture");
    path
}

/// Options rendering `inputs` into `dir/map.html` with the default config.
pub fn options_in(dir: &Path, inputs: Vec<PathBuf>) -> Options {
    let mut config = Config::defaults();
    config.output.path = dir.join("map.html");
    Options::new(inputs, config)
}
