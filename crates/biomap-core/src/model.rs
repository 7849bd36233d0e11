//! Model building: cleans a [`RawTable`] into the render-ready [`MapModel`].
//!
//! Rows without usable coordinates are dropped first; numeric columns are
//! normalized and the scalers fitted on what remains, so dropped rows never
//! influence marker sizes.

use crate::columns::ResolvedColumns;
use crate::config::Config;
use crate::error::ModelError;
use crate::normalizer::{is_gas_family, norm_key, normalize, parse_coordinate, NumericInput};
use crate::scaler::Scaler;
use crate::types::{Bounds, HeatPoint, MapModel, Palette, RawTable, Site, SizeBy};
use std::collections::{BTreeMap, BTreeSet};

pub const CAPACITY_LABEL: &str = "Capacity (GWh/year)";
pub const CO2_LABEL: &str = "bioCO₂ injection potential (t/y)";

/// A row that survived coordinate cleaning, with its numeric fields parsed.
struct CleanRow {
    index: usize,
    lat: f64,
    lon: f64,
    capacity: Option<f64>,
    co2: Option<f64>,
}

/// Build the map model from a (possibly concatenated) input table.
pub fn build_model(
    table: &RawTable,
    config: &Config,
    palette: &Palette,
) -> Result<MapModel, ModelError> {
    if palette.colors.is_empty() {
        return Err(ModelError::EmptyPalette);
    }
    let cols = ResolvedColumns::resolve(table, &config.columns)?;

    let numeric = |row: usize, col: Option<usize>| -> Option<f64> {
        col.and_then(|c| normalize(&NumericInput::from(table.cell(row, c))))
    };

    let rows: Vec<CleanRow> = (0..table.len())
        .filter_map(|index| {
            let lat = parse_coordinate(table.cell(index, cols.latitude))?;
            let lon = parse_coordinate(table.cell(index, cols.longitude))?;
            Some(CleanRow {
                index,
                lat,
                lon,
                capacity: numeric(index, cols.capacity),
                co2: numeric(index, cols.co2),
            })
        })
        .collect();
    let dropped_rows = table.len() - rows.len();
    if dropped_rows > 0 {
        tracing::warn!(dropped_rows, "rows without usable coordinates were skipped");
    }

    // Techno grouping and colours: gas family first so the legend is stable.
    let technos: BTreeSet<&str> = rows
        .iter()
        .filter_map(|r| text(table, r.index, Some(cols.techno)))
        .collect();
    let (gas_technos, sector_technos): (Vec<String>, Vec<String>) = technos
        .into_iter()
        .map(str::to_string)
        .partition(|t| is_gas_family(t));
    let techno_colors: BTreeMap<String, String> = gas_technos
        .iter()
        .chain(&sector_technos)
        .enumerate()
        .map(|(i, t)| (t.clone(), palette.color_at(i).to_string()))
        .collect();

    let (r_min, r_max) = (config.sizing.min_radius, config.sizing.max_radius);
    let cap_scaler = match cols.capacity {
        Some(_) => Scaler::fit(rows.iter().map(|r| r.capacity), r_min, r_max),
        None => Scaler::constant(r_min, r_max),
    };
    let co2_scaler = match cols.co2 {
        Some(_) => Scaler::fit(rows.iter().map(|r| r.co2), r_min, r_max),
        None => Scaler::constant(r_min, r_max),
    };
    tracing::debug!(
        capacity_domain = ?cap_scaler.domain(),
        co2_domain = ?co2_scaler.domain(),
        size_by = %config.sizing.size_by,
        "fitted marker scalers"
    );

    let sites: Vec<Site> = rows
        .iter()
        .map(|r| {
            let field = |col: Option<usize>| text(table, r.index, col).unwrap_or_default().to_string();
            let techno = field(Some(cols.techno));
            let by_capacity = match config.sizing.size_by {
                SizeBy::Capacity => true,
                SizeBy::Co2 => false,
                SizeBy::Auto => is_gas_family(&techno),
            };
            let (radius, label, value) = if by_capacity {
                (cap_scaler.scale(r.capacity), CAPACITY_LABEL, r.capacity)
            } else {
                (co2_scaler.scale(r.co2), CO2_LABEL, r.co2)
            };
            let color = techno_colors
                .get(&techno)
                .cloned()
                .unwrap_or_else(|| palette.fallback.clone());
            Site {
                status: field(cols.status),
                lat: r.lat,
                lon: r.lon,
                operator: field(cols.operator),
                production_demand: field(cols.production_demand),
                capacity_gwh_year: r.capacity,
                co2_injection_potential_tpy: r.co2,
                site_info: field(cols.site_info),
                municipality: field(cols.municipality),
                color,
                radius,
                size_metric_label: label,
                size_metric_value: value,
                techno,
            }
        })
        .collect();

    let heat = |key: &str| -> Vec<HeatPoint> {
        sites
            .iter()
            .filter(|s| norm_key(&s.techno) == key)
            .map(|s| [s.lat, s.lon, 1.0])
            .collect()
    };
    let biogaz_heat = heat("biogaz");
    let biomethane_heat = heat("biomethane");

    let bounds = Bounds::enclosing(sites.iter().map(|s| (s.lat, s.lon))).unwrap_or_else(|| {
        tracing::warn!("no site has usable coordinates; falling back to a Europe-wide view");
        Bounds::EUROPE
    });

    tracing::info!(
        sites = sites.len(),
        gas_technos = gas_technos.len(),
        sector_technos = sector_technos.len(),
        "built map model"
    );

    Ok(MapModel {
        sites,
        techno_colors,
        gas_technos,
        sector_technos,
        bounds,
        biogaz_heat,
        biomethane_heat,
        overlays: Vec::new(),
        dropped_rows,
    })
}

/// Trimmed, non-empty text of a cell.
fn text(table: &RawTable, row: usize, col: Option<usize>) -> Option<&str> {
    col.and_then(|c| table.cell(row, c))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
