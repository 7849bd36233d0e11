//! Core types for biomap-core.
//!
//! This module defines the data structures shared across all layers: the
//! untyped [`RawTable`] produced by the readers, the render-ready [`Site`] and
//! [`MapModel`], and the option enums ([`SizeBy`], [`VisibilityMode`],
//! [`Preselect`]) that steer sizing and the client-side filters.

use crate::error::ParseOptionError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// RawTable
// ---------------------------------------------------------------------------

/// A dataset as read from disk: named columns and rows of optional text cells.
///
/// Cells are kept as text so that every numeric interpretation goes through
/// the [`normalizer`](crate::normalizer). `None` means the source had no value
/// at all (a GeoJSON `null`, or a column missing from one of several
/// concatenated files); an empty CSV cell is `Some("")`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row, padding or truncating it to the column count.
    pub fn push_row(&mut self, mut row: Vec<Option<String>>) {
        row.resize(self.columns.len(), None);
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Exact-name column lookup.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .and_then(|c| c.as_deref())
    }

    /// Concatenate tables by column name. Columns keep first-seen order; rows
    /// from a table lacking a column get `None` there.
    pub fn concat(tables: impl IntoIterator<Item = RawTable>) -> RawTable {
        let mut out = RawTable::default();
        for table in tables {
            let mapping: Vec<usize> = table
                .columns
                .iter()
                .map(|name| match out.column_index(name) {
                    Some(idx) => idx,
                    None => {
                        out.columns.push(name.clone());
                        out.columns.len() - 1
                    }
                })
                .collect();
            let width = out.columns.len();
            for row in &mut out.rows {
                row.resize(width, None);
            }
            for row in table.rows {
                let mut merged = vec![None; width];
                for (cell, &target) in row.into_iter().zip(&mapping) {
                    merged[target] = cell;
                }
                out.rows.push(merged);
            }
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Option enums
// ---------------------------------------------------------------------------

/// Which normalized metric drives marker size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeBy {
    /// Gas family by capacity, demand sectors by bioCO₂ potential.
    #[default]
    Auto,
    Capacity,
    Co2,
}

/// Client-side rule combining the techno and status filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VisibilityMode {
    #[default]
    Both,
    Techno,
    Status,
    Either,
}

/// Initial checkbox state for a filter group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Preselect {
    #[default]
    All,
    None,
}

impl Preselect {
    pub fn is_all(self) -> bool {
        self == Preselect::All
    }
}

impl std::fmt::Display for SizeBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SizeBy::Auto => write!(f, "auto"),
            SizeBy::Capacity => write!(f, "capacity"),
            SizeBy::Co2 => write!(f, "co2"),
        }
    }
}

impl std::fmt::Display for VisibilityMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VisibilityMode::Both => write!(f, "both"),
            VisibilityMode::Techno => write!(f, "techno"),
            VisibilityMode::Status => write!(f, "status"),
            VisibilityMode::Either => write!(f, "either"),
        }
    }
}

impl std::fmt::Display for Preselect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Preselect::All => write!(f, "all"),
            Preselect::None => write!(f, "none"),
        }
    }
}

impl FromStr for SizeBy {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(SizeBy::Auto),
            "capacity" => Ok(SizeBy::Capacity),
            "co2" => Ok(SizeBy::Co2),
            _ => Err(ParseOptionError {
                option: "size-by",
                value: s.to_string(),
                expected: "auto, capacity, co2",
            }),
        }
    }
}

impl FromStr for VisibilityMode {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "both" => Ok(VisibilityMode::Both),
            "techno" => Ok(VisibilityMode::Techno),
            "status" => Ok(VisibilityMode::Status),
            "either" => Ok(VisibilityMode::Either),
            _ => Err(ParseOptionError {
                option: "visibility-mode",
                value: s.to_string(),
                expected: "both, techno, status, either",
            }),
        }
    }
}

impl FromStr for Preselect {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Preselect::All),
            "none" => Ok(Preselect::None),
            _ => Err(ParseOptionError {
                option: "preselect",
                value: s.to_string(),
                expected: "all, none",
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

/// Ordered techno colours plus the colour used for rows without a techno.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub colors: Vec<String>,
    pub fallback: String,
}

impl Palette {
    /// Colour for the `index`-th techno, cycling through the palette.
    pub fn color_at(&self, index: usize) -> &str {
        if self.colors.is_empty() {
            return &self.fallback;
        }
        &self.colors[index % self.colors.len()]
    }
}

// ---------------------------------------------------------------------------
// Render model
// ---------------------------------------------------------------------------

/// One marker on the map. Field names are the keys the embedded script reads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Site {
    pub techno: String,
    pub status: String,
    pub lat: f64,
    pub lon: f64,
    pub operator: String,
    pub production_demand: String,
    pub capacity_gwh_year: Option<f64>,
    pub co2_injection_potential_tpy: Option<f64>,
    pub site_info: String,
    pub municipality: String,
    pub color: String,
    pub radius: f64,
    pub size_metric_label: &'static str,
    pub size_metric_value: Option<f64>,
}

/// Geographic extent the map is fitted to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl Bounds {
    /// Used when no site survives coordinate cleaning.
    pub const EUROPE: Bounds = Bounds {
        min_lat: 35.0,
        min_lon: -10.0,
        max_lat: 60.0,
        max_lon: 30.0,
    };

    /// Smallest box containing every point, or `None` for an empty input.
    pub fn enclosing(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Bounds> {
        points.into_iter().fold(None, |acc, (lat, lon)| {
            Some(match acc {
                None => Bounds {
                    min_lat: lat,
                    min_lon: lon,
                    max_lat: lat,
                    max_lon: lon,
                },
                Some(b) => Bounds {
                    min_lat: b.min_lat.min(lat),
                    min_lon: b.min_lon.min(lon),
                    max_lat: b.max_lat.max(lat),
                    max_lon: b.max_lon.max(lon),
                },
            })
        })
    }
}

/// `[lat, lon, intensity]`, the point shape leaflet.heat expects.
pub type HeatPoint = [f64; 3];

/// A GeoJSON layer drawn on top of the sites (pipelines, grid, zones).
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub name: String,
    pub data: serde_json::Value,
}

/// Everything the renderer needs, already cleaned, coloured and sized.
#[derive(Debug, Clone, PartialEq)]
pub struct MapModel {
    pub sites: Vec<Site>,
    pub techno_colors: BTreeMap<String, String>,
    /// Gas-family technos (circle markers), sorted.
    pub gas_technos: Vec<String>,
    /// Demand-sector technos (diamond markers), sorted.
    pub sector_technos: Vec<String>,
    pub bounds: Bounds,
    pub biogaz_heat: Vec<HeatPoint>,
    pub biomethane_heat: Vec<HeatPoint>,
    pub overlays: Vec<Overlay>,
    /// Rows discarded for lacking usable coordinates.
    pub dropped_rows: usize,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
