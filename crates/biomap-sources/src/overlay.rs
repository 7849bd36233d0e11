//! GeoJSON overlays (gas pipelines, electricity grid, zoning).
//!
//! Overlays are validated as GeoJSON and then embedded verbatim; the map draws
//! them as toggleable `L.geoJSON` layers.

use crate::error::SourceError;
use biomap_core::Overlay;
use geojson::GeoJson;
use std::path::{Path, PathBuf};

/// Split an overlay argument of the form `name=path` or `path`. Without an
/// explicit name the file stem is used.
pub fn parse_overlay_arg(arg: &str) -> (String, PathBuf) {
    match arg.split_once('=') {
        Some((name, path)) if !name.trim().is_empty() && !path.is_empty() => {
            (name.trim().to_string(), PathBuf::from(path))
        }
        _ => {
            let path = PathBuf::from(arg);
            (display_name(&path), path)
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().replace(['_', '-'], " "))
        .unwrap_or_else(|| path.display().to_string())
}

/// Load and validate one overlay.
pub fn load_overlay(arg: &str) -> Result<Overlay, SourceError> {
    let (name, path) = parse_overlay_arg(arg);
    let src = std::fs::read_to_string(&path).map_err(|source| SourceError::Io {
        path: path.clone(),
        source,
    })?;
    let geojson = src.parse::<GeoJson>().map_err(|source| SourceError::GeoJson {
        path: path.clone(),
        source: Box::new(source),
    })?;

    let features = match &geojson {
        GeoJson::FeatureCollection(fc) => fc.features.len(),
        GeoJson::Feature(_) | GeoJson::Geometry(_) => 1,
    };
    tracing::debug!(%name, path = %path.display(), features, "loaded overlay");

    let data = serde_json::to_value(&geojson).map_err(|source| SourceError::Json {
        path: path.clone(),
        source,
    })?;
    Ok(Overlay { name, data })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
