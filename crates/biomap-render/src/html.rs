//! HTML rendering: fills the embedded Leaflet page with a [`MapModel`].
//!
//! The template lives in `templates/map.html` and is compiled into the binary.
//! Placeholders are `@@NAME@@` tokens replaced in a single left-to-right pass,
//! so substituted values are never scanned again and may safely contain `@@`.
//!
//! Values that land inside `<script>` are JSON with `<`, `>` and `&` written
//! as unicode escapes; a site called `</script>` cannot close the block.

use crate::theme::Theme;
use anyhow::{anyhow, Context};
use biomap_core::config::{Config, HeatmapConfig};
use biomap_core::{MapModel, Preselect, VisibilityMode};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

const MAP_TEMPLATE: &str = include_str!("templates/map.html");

/// `L.heatLayer` options.
#[derive(Debug, Serialize)]
struct HeatOptions<'a> {
    radius: u32,
    blur: u32,
    #[serde(rename = "maxZoom")]
    max_zoom: u32,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    gradient: &'a BTreeMap<String, String>,
}

/// One overlay as the page script reads it.
#[derive(Debug, Serialize)]
struct OverlayLayer<'a> {
    name: &'a str,
    color: &'a str,
    weight: f64,
    opacity: f64,
    data: &'a serde_json::Value,
}

/// Render the map page, stamped with the current time.
pub fn render_html(model: &MapModel, theme: &Theme, config: &Config) -> anyhow::Result<String> {
    render_html_at(model, theme, config, Utc::now())
}

/// Render the map page with an explicit generation timestamp.
pub fn render_html_at(
    model: &MapModel,
    theme: &Theme,
    config: &Config,
    generated_at: DateTime<Utc>,
) -> anyhow::Result<String> {
    let overlays: Vec<OverlayLayer<'_>> = model
        .overlays
        .iter()
        .enumerate()
        .map(|(i, o)| OverlayLayer {
            name: &o.name,
            color: theme.overlay_color(i),
            weight: theme.overlay_weight,
            opacity: theme.overlay_opacity,
            data: &o.data,
        })
        .collect();

    let b = model.bounds;
    let bounds = [[b.min_lat, b.min_lon], [b.max_lat, b.max_lon]];
    let filters = &config.filters;

    let mut values: HashMap<&'static str, String> = HashMap::new();
    values.insert("TITLE", escape_html(&config.output.title));
    values.insert(
        "GENERATED_AT",
        generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
    );
    values.insert("SITES", script_json(&model.sites).context("serializing sites")?);
    values.insert("TECHNO_COLORS", script_json(&model.techno_colors)?);
    values.insert("GAS_TECHS", script_json(&model.gas_technos)?);
    values.insert("OVERLAYS", script_json(&overlays).context("serializing overlays")?);
    values.insert("BOUNDS", script_json(&bounds)?);
    values.insert("VISIBILITY_MODE", filters.visibility_mode.to_string());
    values.insert("VISIBILITY_RULE", visibility_rule(filters.visibility_mode).to_string());
    values.insert("PRESELECT_TECHNO", js_bool(filters.preselect_techno));
    values.insert("PRESELECT_STATUS", js_bool(filters.preselect_status));
    values.insert(
        "STATUS_PRESELECT_TEXT",
        if filters.preselect_status.is_all() { "preselected" } else { "not preselected" }.to_string(),
    );
    values.insert("BIOGAZ_POINTS", script_json(&model.biogaz_heat)?);
    values.insert("BIOMETHANE_POINTS", script_json(&model.biomethane_heat)?);
    values.insert(
        "BIOGAZ_HEAT_OPTIONS",
        script_json(&heat_options(&config.heatmap, &theme.biogaz_gradient))?,
    );
    values.insert(
        "BIOMETHANE_HEAT_OPTIONS",
        script_json(&heat_options(&config.heatmap, &theme.biomethane_gradient))?,
    );

    let html = fill_template(MAP_TEMPLATE, &values)?;
    tracing::debug!(
        bytes = html.len(),
        sites = model.sites.len(),
        overlays = model.overlays.len(),
        "rendered map page"
    );
    Ok(html)
}

fn heat_options<'a>(heat: &HeatmapConfig, gradient: &'a BTreeMap<String, String>) -> HeatOptions<'a> {
    HeatOptions {
        radius: heat.radius,
        blur: heat.blur,
        max_zoom: heat.max_zoom,
        gradient,
    }
}

/// JavaScript statement defining `show` from `technoOk` and `statusOk`.
fn visibility_rule(mode: VisibilityMode) -> &'static str {
    match mode {
        VisibilityMode::Both => "const show = technoOk && statusOk;",
        VisibilityMode::Techno => "const show = technoOk;",
        VisibilityMode::Status => "const show = statusOk;",
        VisibilityMode::Either => "const show = technoOk || statusOk;",
    }
}

fn js_bool(preselect: Preselect) -> String {
    preselect.is_all().to_string()
}

/// Serialize to JSON that is safe to place inside a `<script>` element.
fn script_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    let json = serde_json::to_string(value)?;
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            _ => out.push(c),
        }
    }
    Ok(out)
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Replace every `@@NAME@@` in `template`. Unknown or unterminated
/// placeholders are errors.
fn fill_template(template: &str, values: &HashMap<&'static str, String>) -> anyhow::Result<String> {
    let extra: usize = values.values().map(String::len).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;

    while let Some(start) = rest.find("@@") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after
            .find("@@")
            .ok_or_else(|| anyhow!("unterminated template placeholder"))?;
        let name = &after[..end];
        let value = values
            .get(name)
            .ok_or_else(|| anyhow!("unknown template placeholder @@{name}@@"))?;
        out.push_str(value);
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
