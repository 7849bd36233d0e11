//! Configuration types for biomap.
//!
//! [`Config::load`] layers, in increasing priority: the embedded defaults,
//! `~/.config/biomap/config.toml` (if present), an explicit file passed on the
//! command line, and `BIOMAP__<SECTION>__<KEY>` environment variables.
//! [`Config::defaults`] returns the embedded defaults without touching the
//! filesystem (useful in tests).

use crate::types::{Preselect, SizeBy, VisibilityMode};
use serde::Deserialize;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[sizing]
min_radius = 5.0
max_radius = 16.0
size_by    = "auto"

[filters]
visibility_mode  = "both"
preselect_status = "all"
preselect_techno = "none"

[heatmap]
radius   = 20
blur     = 15
max_zoom = 12

[columns]
techno            = "techno"
status            = "operational_status"
latitude          = "latitude"
longitude         = "longitude"
capacity          = "capacite_gwh_year"
capacity_fallback = "capacite_gwh_year/co2_injection_potential_tpy"
co2               = "co2_injection_potential_tpy"
municipality      = "municipality"
operator          = "operator"
production_demand = "production/demand"
site_info         = "site_info"

[output]
path  = "interactive_biogas_map.html"
title = "Biogas & Biomethane Interactive Map"
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sizing: SizingConfig,
    #[serde(default)]
    pub filters: FiltersConfig,
    #[serde(default)]
    pub heatmap: HeatmapConfig,
    #[serde(default)]
    pub columns: ColumnsConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// `[sizing]` section: marker radius range in pixels and the sizing metric.
#[derive(Debug, Clone, Deserialize)]
pub struct SizingConfig {
    #[serde(default = "default_min_radius")]
    pub min_radius: f64,
    #[serde(default = "default_max_radius")]
    pub max_radius: f64,
    #[serde(default)]
    pub size_by: SizeBy,
}

fn default_min_radius() -> f64 { 5.0 }
fn default_max_radius() -> f64 { 16.0 }

impl Default for SizingConfig {
    fn default() -> Self {
        Self {
            min_radius: default_min_radius(),
            max_radius: default_max_radius(),
            size_by: SizeBy::Auto,
        }
    }
}

/// `[filters]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct FiltersConfig {
    #[serde(default)]
    pub visibility_mode: VisibilityMode,
    #[serde(default = "default_preselect_status")]
    pub preselect_status: Preselect,
    #[serde(default = "default_preselect_techno")]
    pub preselect_techno: Preselect,
}

fn default_preselect_status() -> Preselect { Preselect::All }
fn default_preselect_techno() -> Preselect { Preselect::None }

impl Default for FiltersConfig {
    fn default() -> Self {
        Self {
            visibility_mode: VisibilityMode::Both,
            preselect_status: default_preselect_status(),
            preselect_techno: default_preselect_techno(),
        }
    }
}

/// `[heatmap]` section, passed straight to leaflet.heat.
#[derive(Debug, Clone, Deserialize)]
pub struct HeatmapConfig {
    #[serde(default = "default_heat_radius")]
    pub radius: u32,
    #[serde(default = "default_heat_blur")]
    pub blur: u32,
    #[serde(default = "default_heat_max_zoom")]
    pub max_zoom: u32,
}

fn default_heat_radius() -> u32 { 20 }
fn default_heat_blur() -> u32 { 15 }
fn default_heat_max_zoom() -> u32 { 12 }

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            radius: default_heat_radius(),
            blur: default_heat_blur(),
            max_zoom: default_heat_max_zoom(),
        }
    }
}

/// `[columns]` section: input header names for each field of a site.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ColumnsConfig {
    pub techno: String,
    pub status: String,
    pub latitude: String,
    pub longitude: String,
    pub capacity: String,
    /// Combined capacity/CO₂ column used by older exports when `capacity`
    /// is absent.
    pub capacity_fallback: String,
    pub co2: String,
    pub municipality: String,
    pub operator: String,
    pub production_demand: String,
    pub site_info: String,
}

impl Default for ColumnsConfig {
    fn default() -> Self {
        Self {
            techno: "techno".to_string(),
            status: "operational_status".to_string(),
            latitude: "latitude".to_string(),
            longitude: "longitude".to_string(),
            capacity: "capacite_gwh_year".to_string(),
            capacity_fallback: "capacite_gwh_year/co2_injection_potential_tpy".to_string(),
            co2: "co2_injection_potential_tpy".to_string(),
            municipality: "municipality".to_string(),
            operator: "operator".to_string(),
            production_demand: "production/demand".to_string(),
            site_info: "site_info".to_string(),
        }
    }
}

/// `[output]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
    #[serde(default = "default_title")]
    pub title: String,
}

fn default_output_path() -> PathBuf { PathBuf::from("interactive_biogas_map.html") }
fn default_title() -> String { "Biogas & Biomethane Interactive Map".to_string() }

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            title: default_title(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load the layered configuration. `explicit` must exist when given; the
    /// per-user file is optional. The result is not validated, so that
    /// command-line overrides can still repair it.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(config_path().as_path()).required(false));

        if let Some(path) = explicit {
            tracing::debug!(path = %path.display(), "loading config file");
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let cfg: Config = builder
            .add_source(
                config::Environment::with_prefix("BIOMAP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        Ok(cfg)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    /// Reject settings that would make the sizing or output meaningless.
    pub fn validate(&self) -> anyhow::Result<()> {
        let SizingConfig {
            min_radius,
            max_radius,
            ..
        } = self.sizing;
        if !min_radius.is_finite() || !max_radius.is_finite() {
            anyhow::bail!("marker radii must be finite (got {min_radius} and {max_radius})");
        }
        if min_radius < 0.0 {
            anyhow::bail!("min radius must not be negative (got {min_radius})");
        }
        if min_radius > max_radius {
            anyhow::bail!("min radius {min_radius} is larger than max radius {max_radius}");
        }
        if self.output.path.as_os_str().is_empty() {
            anyhow::bail!("output path is empty");
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("biomap")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load() {
        let cfg = Config::defaults();
        assert_eq!(cfg.sizing.min_radius, 5.0);
        assert_eq!(cfg.sizing.max_radius, 16.0);
        assert_eq!(cfg.sizing.size_by, SizeBy::Auto);
        assert_eq!(cfg.filters.visibility_mode, VisibilityMode::Both);
        assert_eq!(cfg.filters.preselect_status, Preselect::All);
        assert_eq!(cfg.filters.preselect_techno, Preselect::None);
        assert_eq!(cfg.heatmap.radius, 20);
        assert_eq!(cfg.heatmap.blur, 15);
        assert_eq!(cfg.columns.status, "operational_status");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn inverted_radii_rejected() {
        let mut cfg = Config::defaults();
        cfg.sizing.min_radius = 20.0;
        cfg.sizing.max_radius = 4.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn partial_section_keeps_field_defaults() {
        let cfg: Config = config::Config::builder()
            .add_source(config::File::from_str(
                "[sizing]\nsize_by = \"co2\"\n[columns]\ntechno = \"type\"",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(cfg.sizing.size_by, SizeBy::Co2);
        assert_eq!(cfg.sizing.min_radius, 5.0);
        assert_eq!(cfg.columns.techno, "type");
        assert_eq!(cfg.columns.latitude, "latitude");
        assert_eq!(cfg.heatmap.max_zoom, 12);
    }

    #[test]
    fn load_layers_user_file_explicit_file_and_env() {
        let xdg = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(xdg.path().join("biomap")).unwrap();
        std::fs::write(
            xdg.path().join("biomap").join("config.toml"),
            "[sizing]\nmin_radius = 3.0\nmax_radius = 12.0\n[columns]\nstatus = \"etat\"\n",
        )
        .unwrap();
        let explicit = xdg.path().join("explicit.toml");
        std::fs::write(
            &explicit,
            "[sizing]\nmax_radius = 20.0\nsize_by = \"co2\"\n[columns]\ntechno = \"type\"\n",
        )
        .unwrap();

        // Only this test touches the environment in this crate.
        std::env::set_var("XDG_CONFIG_HOME", xdg.path());
        std::env::set_var("BIOMAP__SIZING__MAX_RADIUS", "30");
        std::env::set_var("BIOMAP__FILTERS__VISIBILITY_MODE", "either");

        let layered = Config::load(Some(&explicit));
        let user_only = Config::load(None);

        std::env::remove_var("BIOMAP__SIZING__MAX_RADIUS");
        std::env::remove_var("BIOMAP__FILTERS__VISIBILITY_MODE");

        let cfg = layered.unwrap();
        assert_eq!(cfg.sizing.min_radius, 3.0);
        assert_eq!(cfg.sizing.max_radius, 30.0);
        assert_eq!(cfg.sizing.size_by, SizeBy::Co2);
        assert_eq!(cfg.filters.visibility_mode, VisibilityMode::Either);
        assert_eq!(cfg.columns.techno, "type");
        assert_eq!(cfg.columns.status, "etat");
        assert_eq!(cfg.columns.latitude, "latitude");

        let cfg = user_only.unwrap();
        assert_eq!(cfg.sizing.max_radius, 30.0);
        assert_eq!(cfg.sizing.size_by, SizeBy::Auto);
        assert_eq!(cfg.columns.techno, "techno");

        // A missing explicit file is an error.
        assert!(Config::load(Some(&xdg.path().join("absent.toml"))).is_err());

        // Invalid sizing loads; validation is left to the caller.
        let inverted = xdg.path().join("inverted.toml");
        std::fs::write(&inverted, "[sizing]\nmin_radius = 40.0\nmax_radius = 10.0\n").unwrap();
        let cfg = Config::load(Some(&inverted)).unwrap();
        assert!(cfg.validate().is_err());

        std::env::remove_var("XDG_CONFIG_HOME");
    }
}
