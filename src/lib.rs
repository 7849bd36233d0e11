//! biomap: interactive biogas / biomethane / bioCO₂ site map generator.
//!
//! Reads one or more CSV or GeoJSON site lists and writes a single,
//! self-contained Leaflet HTML page. This crate wires the three layers
//! together so that the binary and the integration harnesses share one
//! pipeline.
//!
//! # Architecture
//!
//! ```text
//! Sources ──► RawTable ──► Model ──► Render ──► HTML file
//!                            ▲          ▲
//!   Config ──────────────────┴──────────┤
//!   Theme  ─────────────────────────────┘
//! ```
//!
//! Everything runs synchronously on the calling thread.

use anyhow::Context;
use biomap_core::config::Config;
use biomap_render::Theme;
use std::path::PathBuf;

/// Inputs of one generator run. `config` already has CLI overrides applied.
#[derive(Debug, Clone)]
pub struct Options {
    pub inputs: Vec<PathBuf>,
    /// Overlay arguments, `path` or `name=path`.
    pub overlays: Vec<String>,
    /// User theme file; the embedded default theme when `None`.
    pub theme: Option<PathBuf>,
    pub config: Config,
}

impl Options {
    pub fn new(inputs: Vec<PathBuf>, config: Config) -> Self {
        Self {
            inputs,
            overlays: Vec::new(),
            theme: None,
            config,
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub sites: usize,
    pub dropped_rows: usize,
    pub output: PathBuf,
}

/// Run the whole pipeline and write the HTML page to `config.output.path`.
pub fn generate(opts: &Options) -> anyhow::Result<Report> {
    let config = &opts.config;
    config.validate()?;

    let theme = match &opts.theme {
        Some(path) => Theme::load(path)?,
        None => Theme::load_default(),
    };

    let table = biomap_sources::read_tables(&opts.inputs, &config.columns)?;
    tracing::info!(
        files = opts.inputs.len(),
        rows = table.len(),
        columns = table.columns.len(),
        "read input tables"
    );

    let mut model = biomap_core::build_model(&table, config, &theme.palette())?;
    for arg in &opts.overlays {
        model.overlays.push(biomap_sources::load_overlay(arg)?);
    }

    let html = biomap_render::render_html(&model, &theme, config)?;

    let output = config.output.path.clone();
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(&output, html)
        .with_context(|| format!("failed to write {}", output.display()))?;
    tracing::info!(path = %output.display(), sites = model.sites.len(), "wrote map");

    Ok(Report {
        sites: model.sites.len(),
        dropped_rows: model.dropped_rows,
        output,
    })
}
