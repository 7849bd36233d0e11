//! biomap-sources: dataset readers for biomap.
//!
//! Each reader loads one file fully into memory and produces an untyped
//! [`biomap_core::RawTable`]; several inputs are merged with
//! [`RawTable::concat`](biomap_core::RawTable::concat). GeoJSON overlays
//! (pipelines, grid lines, zones) are loaded separately as opaque layers.

pub mod delimited;
pub mod error;
pub mod geo;
pub mod overlay;

pub use error::SourceError;
pub use overlay::load_overlay;

use biomap_core::config::ColumnsConfig;
use biomap_core::RawTable;
use std::path::{Path, PathBuf};

/// File formats accepted as site datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Delimited,
    GeoJson,
}

impl InputFormat {
    /// Pick the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" | "tsv" | "txt" => Some(InputFormat::Delimited),
            "geojson" | "json" => Some(InputFormat::GeoJson),
            _ => None,
        }
    }
}

impl std::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputFormat::Delimited => write!(f, "csv"),
            InputFormat::GeoJson => write!(f, "geojson"),
        }
    }
}

/// Read one dataset. GeoJSON point coordinates are written into the
/// configured latitude/longitude columns.
pub fn read_table(path: &Path, columns: &ColumnsConfig) -> Result<RawTable, SourceError> {
    let format = InputFormat::from_path(path).ok_or_else(|| SourceError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    let bytes = std::fs::read(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let table = match format {
        InputFormat::Delimited => {
            delimited::parse_delimited(&bytes).map_err(|source| SourceError::Csv {
                path: path.to_path_buf(),
                source,
            })?
        }
        InputFormat::GeoJson => {
            let text = delimited::decode_text(&bytes);
            geo::parse_point_features(&text, &columns.latitude, &columns.longitude).map_err(
                |source| SourceError::GeoJson {
                    path: path.to_path_buf(),
                    source: Box::new(source),
                },
            )?
        }
    };

    tracing::debug!(
        path = %path.display(),
        %format,
        rows = table.len(),
        columns = table.columns.len(),
        "read dataset"
    );
    Ok(table)
}

/// Read and concatenate several datasets by column name.
pub fn read_tables(paths: &[PathBuf], columns: &ColumnsConfig) -> Result<RawTable, SourceError> {
    if paths.is_empty() {
        return Err(SourceError::NoInputs);
    }
    let tables = paths
        .iter()
        .map(|p| read_table(p, columns))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(RawTable::concat(tables))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
