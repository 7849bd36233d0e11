//! Column resolution: maps configured header names onto table indices.
//!
//! Lookups try the exact header first and then a loose match on
//! [`norm_key`](crate::normalizer::norm_key), so `"Latitude "` or
//! `"Operational Status"` still resolve.

use crate::config::ColumnsConfig;
use crate::error::ModelError;
use crate::normalizer::norm_key;
use crate::types::RawTable;

/// Table indices for every site field. Only techno and the coordinates are
/// required.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub techno: usize,
    pub latitude: usize,
    pub longitude: usize,
    pub status: Option<usize>,
    pub capacity: Option<usize>,
    pub co2: Option<usize>,
    pub municipality: Option<usize>,
    pub operator: Option<usize>,
    pub production_demand: Option<usize>,
    pub site_info: Option<usize>,
}

impl ResolvedColumns {
    pub fn resolve(table: &RawTable, names: &ColumnsConfig) -> Result<Self, ModelError> {
        let required = |name: &str| {
            find_column(table, name).ok_or_else(|| ModelError::MissingColumn {
                column: name.to_string(),
                available: table.columns.clone(),
            })
        };

        let capacity = find_column(table, &names.capacity)
            .or_else(|| find_column(table, &names.capacity_fallback));

        let resolved = Self {
            techno: required(&names.techno)?,
            latitude: required(&names.latitude)?,
            longitude: required(&names.longitude)?,
            status: find_column(table, &names.status),
            capacity,
            co2: find_column(table, &names.co2),
            municipality: find_column(table, &names.municipality),
            operator: find_column(table, &names.operator),
            production_demand: find_column(table, &names.production_demand),
            site_info: find_column(table, &names.site_info),
        };

        if resolved.capacity.is_none() {
            tracing::warn!(
                column = %names.capacity,
                fallback = %names.capacity_fallback,
                "no capacity column; gas sites will use the midpoint radius"
            );
        }
        if resolved.co2.is_none() {
            tracing::debug!(column = %names.co2, "no bioCO2 potential column");
        }
        Ok(resolved)
    }
}

/// Index of `name` in the table header, exact match first.
pub fn find_column(table: &RawTable, name: &str) -> Option<usize> {
    if name.is_empty() {
        return None;
    }
    table.column_index(name).or_else(|| {
        let key = norm_key(name);
        if key.is_empty() {
            return None;
        }
        table.columns.iter().position(|c| norm_key(c) == key)
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
