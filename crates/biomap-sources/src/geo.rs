//! GeoJSON point reader.
//!
//! Point features become rows: their properties become columns and the point
//! coordinates fill the latitude/longitude columns. Other geometry types are
//! skipped; draw those as overlays instead.

use biomap_core::RawTable;
use geojson::{Feature, GeoJson};
use std::collections::HashMap;

/// Parse a GeoJSON document of point features into a table whose first two
/// columns are `lat_col` and `lon_col`.
pub fn parse_point_features(
    src: &str,
    lat_col: &str,
    lon_col: &str,
) -> Result<RawTable, geojson::Error> {
    let features = match src.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(fc) => fc.features,
        GeoJson::Feature(f) => vec![f],
        GeoJson::Geometry(_) => {
            tracing::debug!("bare GeoJSON geometry carries no site properties; nothing to read");
            Vec::new()
        }
    };

    let mut table = RawTable::new(vec![lat_col.to_string(), lon_col.to_string()]);
    let mut index: HashMap<String, usize> = HashMap::new();
    index.insert(lat_col.to_string(), 0);
    index.insert(lon_col.to_string(), 1);

    let mut skipped = 0usize;
    for feature in &features {
        let Some((lon, lat)) = point_coordinates(feature) else {
            skipped += 1;
            continue;
        };

        let mut row: Vec<Option<String>> = vec![None; table.columns.len()];
        for (key, value) in feature.properties.iter().flatten() {
            let col = *index.entry(key.clone()).or_insert_with(|| {
                table.columns.push(key.clone());
                table.columns.len() - 1
            });
            if col >= row.len() {
                row.resize(col + 1, None);
            }
            row[col] = property_text(value);
        }
        // Geometry wins over any latitude/longitude properties.
        row[0] = Some(lat.to_string());
        row[1] = Some(lon.to_string());
        table.rows.push(row);
    }

    let width = table.columns.len();
    for row in &mut table.rows {
        row.resize(width, None);
    }
    if skipped > 0 {
        tracing::debug!(skipped, "non-point GeoJSON features skipped");
    }
    Ok(table)
}

/// `(lon, lat)` of a point feature.
fn point_coordinates(feature: &Feature) -> Option<(f64, f64)> {
    match &feature.geometry.as_ref()?.value {
        geojson::Value::Point(coords) if coords.len() >= 2 => Some((coords[0], coords[1])),
        _ => None,
    }
}

fn property_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
