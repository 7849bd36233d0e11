//! Static datasets used across harnesses.
//!
//! The CSV sample mirrors the French regional exports the generator was built
//! for: semicolon separated, decimal commas, ranges and `n/a` cells. One row
//! has no coordinates and must be dropped.

/// Every cell content the normalizer must read as "no value".
pub const NAN_MARKERS: &[&str] = &["", "nan", "N/A", "na", "NONE", "null", "-", "--", "   "];

/// Semicolon-separated site list with six rows, five of them mappable.
pub const SITES_CSV: &str = "\
techno;operational_status;latitude;longitude;capacite_gwh_year;co2_injection_potential_tpy;municipality;operator
biomethane;En service;48,8566;2,3522;370-450;;Paris;GRDF
biogaz;En service;45,764;4,8357;12,5;;Lyon;Veolia
biogaz;Projet;43,2965;5,3698;n/a;;Marseille;
Brasserie;En service;50,6292;3,0573;;1 200;Lille;Brasserie du Nord
Sucrerie;En projet;49,8941;2,2958;;25 000;Amiens;Tereos
biomethane;Projet;;;80;;Nowhere;
";

pub const SITES_CSV_ROWS: usize = 6;
pub const SITES_CSV_SITES: usize = 5;

/// Two point features plus a line that the site reader must skip.
pub const SITES_GEOJSON: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "geometry": { "type": "Point", "coordinates": [1.4442, 43.6047] },
      "properties": {
        "techno": "bioCO2",
        "operational_status": "En service",
        "capacite_gwh_year": 55,
        "municipality": "Toulouse"
      }
    },
    {
      "type": "Feature",
      "geometry": { "type": "Point", "coordinates": [-1.5536, 47.2184] },
      "properties": {
        "techno": "Laiterie",
        "operational_status": "Projet",
        "co2_injection_potential_tpy": "3 500",
        "municipality": null
      }
    },
    {
      "type": "Feature",
      "geometry": { "type": "LineString", "coordinates": [[0.0, 45.0], [1.0, 46.0]] },
      "properties": { "techno": "pipeline" }
    }
  ]
}"#;

pub const SITES_GEOJSON_SITES: usize = 2;

/// A pipeline overlay.
pub const GAS_GRID_GEOJSON: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "geometry": { "type": "LineString", "coordinates": [[2.35, 48.85], [4.83, 45.76]] },
      "properties": { "operator": "GRTgaz", "diameter_mm": 900 }
    }
  ]
}"#;

/// Right-skewed capacities: many small digesters and a few very large plants.
pub fn skewed_capacities() -> Vec<Option<f64>> {
    let mut values: Vec<Option<f64>> = (1..=95).map(|v| Some(f64::from(v))).collect();
    values.extend([Some(5_000.0), Some(8_000.0), Some(12_000.0), None, Some(f64::INFINITY)]);
    values
}
