//! Colour theme for the generated map.
//!
//! Themes are defined as TOML files. The default theme is embedded in the
//! binary via [`include_str!`] so the generator works without any files on
//! disk. Call [`Theme::load_default`] (or [`Theme::load`] for a user file) and
//! hand [`Theme::palette`] to the model builder.
//!
//! # Colour assignment for technos
//!
//! Technos are coloured by position: gas-family technos first, then demand
//! sectors, each alphabetically, cycling through `technos.palette`. The same
//! dataset therefore always produces the same legend.

use anyhow::Context;
use biomap_core::Palette;
use config::{Config, File, FileFormat};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

const DEFAULT_THEME_SRC: &str = include_str!("themes/default.toml");

// ---------------------------------------------------------------------------
// Raw (serde) types, mirroring the TOML structure
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawPalette {
    palette: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawOverlays {
    palette: Vec<String>,
    #[serde(default = "default_overlay_weight")]
    weight: f64,
    #[serde(default = "default_overlay_opacity")]
    opacity: f64,
}

fn default_overlay_weight() -> f64 { 3.0 }
fn default_overlay_opacity() -> f64 { 0.8 }

#[derive(Debug, Deserialize)]
struct RawStop {
    stop: f64,
    color: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawHeatmap {
    #[serde(default)]
    biogaz: Vec<RawStop>,
    #[serde(default)]
    biomethane: Vec<RawStop>,
}

#[derive(Debug, Deserialize)]
struct RawTheme {
    fallback: String,
    technos: RawPalette,
    overlays: RawOverlays,
    #[serde(default)]
    heatmap: RawHeatmap,
}

// ---------------------------------------------------------------------------
// Public Theme type
// ---------------------------------------------------------------------------

/// Resolved map theme. Every colour is a validated lower-case `#rrggbb`.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Ordered techno colours.
    pub techno_palette: Vec<String>,
    /// Colour for sites without a techno.
    pub fallback: String,

    /// Line colours cycled across overlays.
    pub overlay_palette: Vec<String>,
    pub overlay_weight: f64,
    pub overlay_opacity: f64,

    /// leaflet.heat gradients keyed by stop (`"0.4"` → colour). Empty means
    /// the plugin default.
    pub biogaz_gradient: BTreeMap<String, String>,
    pub biomethane_gradient: BTreeMap<String, String>,
}

impl Theme {
    /// Load and parse the embedded default theme.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed. The file ships with the
    /// crate and is covered by the tests below.
    pub fn load_default() -> Self {
        Self::from_toml_str(DEFAULT_THEME_SRC).expect("embedded default theme must be valid TOML")
    }

    /// Load a user theme file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let src = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read theme {}", path.display()))?;
        Self::from_toml_str(&src).with_context(|| format!("invalid theme {}", path.display()))
    }

    /// Parse a theme from a TOML string.
    ///
    /// Invalid colours are dropped with a warning; a theme whose techno
    /// palette ends up empty is an error.
    pub fn from_toml_str(src: &str) -> anyhow::Result<Self> {
        let raw: RawTheme = Config::builder()
            .add_source(File::from_str(src, FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        let techno_palette = resolve_palette(&raw.technos.palette);
        if techno_palette.is_empty() {
            anyhow::bail!("theme has no valid techno colours");
        }
        let fallback = parse_color(&raw.fallback).unwrap_or_else(|| {
            tracing::warn!(color = %raw.fallback, "invalid fallback colour; using black");
            "#000000".to_string()
        });

        Ok(Self {
            techno_palette,
            fallback,
            overlay_palette: resolve_palette(&raw.overlays.palette),
            overlay_weight: raw.overlays.weight,
            overlay_opacity: raw.overlays.opacity.clamp(0.0, 1.0),
            biogaz_gradient: resolve_gradient(&raw.heatmap.biogaz),
            biomethane_gradient: resolve_gradient(&raw.heatmap.biomethane),
        })
    }

    /// The techno palette in the form the model builder takes.
    pub fn palette(&self) -> Palette {
        Palette {
            colors: self.techno_palette.clone(),
            fallback: self.fallback.clone(),
        }
    }

    /// Colour of the `index`-th overlay, cycling; the fallback colour when the
    /// overlay palette is empty.
    pub fn overlay_color(&self, index: usize) -> &str {
        if self.overlay_palette.is_empty() {
            return &self.fallback;
        }
        &self.overlay_palette[index % self.overlay_palette.len()]
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn resolve_palette(raw: &[String]) -> Vec<String> {
    raw.iter()
        .filter_map(|s| {
            let color = parse_color(s);
            if color.is_none() {
                tracing::warn!(color = %s, "ignoring invalid palette colour");
            }
            color
        })
        .collect()
}

fn resolve_gradient(stops: &[RawStop]) -> BTreeMap<String, String> {
    stops
        .iter()
        .filter_map(|s| {
            if !(0.0..=1.0).contains(&s.stop) {
                tracing::warn!(stop = s.stop, "ignoring heatmap gradient stop outside 0..=1");
                return None;
            }
            let color = parse_color(&s.color)?;
            Some((s.stop.to_string(), color))
        })
        .collect()
}

/// Parse a colour into lower-case `#rrggbb`.
///
/// Accepts:
/// - Basic names (case-insensitive): `black`, `white`, `red`, `green`, …
/// - Hex RGB: `#rrggbb`
/// - Short hex RGB: `#rgb`
fn parse_color(s: &str) -> Option<String> {
    let s = s.trim().to_ascii_lowercase();
    let named = match s.as_str() {
        "black" => Some("#000000"),
        "white" => Some("#ffffff"),
        "red" => Some("#ff0000"),
        "green" => Some("#008000"),
        "blue" => Some("#0000ff"),
        "orange" => Some("#ffa500"),
        "purple" => Some("#800080"),
        "gray" | "grey" => Some("#808080"),
        _ => None,
    };
    if let Some(hex) = named {
        return Some(hex.to_string());
    }

    let digits = s.strip_prefix('#')?;
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match digits.len() {
        6 => Some(format!("#{digits}")),
        3 => Some(digits.chars().fold(String::from("#"), |mut acc, c| {
            acc.push(c);
            acc.push(c);
            acc
        })),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
