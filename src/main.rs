use biomap::{generate, Options};
use biomap_core::config::Config;
use biomap_core::{Preselect, SizeBy, VisibilityMode};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "biomap",
    version,
    about = "Interactive biogas / biomethane / bioCO₂ site map (single Leaflet HTML file)"
)]
struct Cli {
    /// Site list (CSV or GeoJSON). Repeat to merge several files.
    #[arg(long = "input", visible_alias = "csv", required = true, num_args = 1..)]
    inputs: Vec<PathBuf>,

    /// Output HTML file.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Smallest marker radius in pixels.
    #[arg(long)]
    min_radius: Option<f64>,

    /// Largest marker radius in pixels.
    #[arg(long)]
    max_radius: Option<f64>,

    /// Sizing metric: auto, capacity or co2.
    #[arg(long)]
    size_by: Option<SizeBy>,

    /// How techno and status filters combine: both, techno, status or either.
    #[arg(long)]
    visibility_mode: Option<VisibilityMode>,

    /// Initial status checkboxes: all or none.
    #[arg(long)]
    preselect_status: Option<Preselect>,

    /// Initial techno checkboxes: all or none.
    #[arg(long)]
    preselect_techno: Option<Preselect>,

    #[arg(long)]
    heat_radius: Option<u32>,

    #[arg(long)]
    heat_blur: Option<u32>,

    /// GeoJSON network layer, `path` or `name=path`. Repeatable.
    #[arg(long = "overlay")]
    overlays: Vec<String>,

    /// Page title.
    #[arg(long)]
    title: Option<String>,

    /// Extra TOML config file layered over the defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Colour theme TOML file.
    #[arg(long)]
    theme: Option<PathBuf>,

    /// Log at debug level (RUST_LOG still wins when set).
    #[arg(long)]
    debug: bool,

    /// Append logs to this file instead of stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Apply flag overrides on top of the layered config.
    fn apply(&self, cfg: &mut Config) {
        if let Some(v) = &self.out {
            cfg.output.path = v.clone();
        }
        if let Some(v) = &self.title {
            cfg.output.title = v.clone();
        }
        if let Some(v) = self.min_radius {
            cfg.sizing.min_radius = v;
        }
        if let Some(v) = self.max_radius {
            cfg.sizing.max_radius = v;
        }
        if let Some(v) = self.size_by {
            cfg.sizing.size_by = v;
        }
        if let Some(v) = self.visibility_mode {
            cfg.filters.visibility_mode = v;
        }
        if let Some(v) = self.preselect_status {
            cfg.filters.preselect_status = v;
        }
        if let Some(v) = self.preselect_techno {
            cfg.filters.preselect_techno = v;
        }
        if let Some(v) = self.heat_radius {
            cfg.heatmap.radius = v;
        }
        if let Some(v) = self.heat_blur {
            cfg.heatmap.blur = v;
        }
    }
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let default_level = if cli.debug { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    match &cli.log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_subscriber::fmt()
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .with_env_filter(filter)
                .init();
            tracing::info!(path = %path.display(), "biomap log started");
        }
        None => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(filter)
                .init();
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let mut config = Config::load(cli.config.as_deref())?;
    cli.apply(&mut config);
    config.validate()?;

    let mut opts = Options::new(cli.inputs.clone(), config);
    opts.overlays = cli.overlays.clone();
    opts.theme = cli.theme.clone();

    let report = generate(&opts)?;
    println!("Wrote {} ({} sites)", report.output.display(), report.sites);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_alias_collects_every_input() {
        let cli = Cli::try_parse_from(["biomap", "--csv", "a.csv", "b.geojson"]).unwrap();
        assert_eq!(cli.inputs, vec![PathBuf::from("a.csv"), PathBuf::from("b.geojson")]);

        let cli = Cli::try_parse_from(["biomap", "--input", "a.csv", "--input", "c.csv"]).unwrap();
        assert_eq!(cli.inputs.len(), 2);
    }

    #[test]
    fn inputs_are_required() {
        assert!(Cli::try_parse_from(["biomap", "--out", "map.html"]).is_err());
    }

    #[test]
    fn flags_override_loaded_config() {
        let cli = Cli::try_parse_from([
            "biomap",
            "--csv",
            "sites.csv",
            "--out",
            "out/map.html",
            "--title",
            "Sites",
            "--min-radius",
            "2",
            "--max-radius",
            "22",
            "--size-by",
            "co2",
            "--visibility-mode",
            "status",
            "--preselect-status",
            "none",
            "--preselect-techno",
            "all",
            "--heat-radius",
            "40",
            "--heat-blur",
            "5",
            "--overlay",
            "Grid=grid.geojson",
        ])
        .unwrap();

        let mut cfg = Config::defaults();
        cfg.sizing.min_radius = 30.0;
        cfg.sizing.max_radius = 10.0;
        assert!(cfg.validate().is_err());

        cli.apply(&mut cfg);
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.output.path, PathBuf::from("out/map.html"));
        assert_eq!(cfg.output.title, "Sites");
        assert_eq!((cfg.sizing.min_radius, cfg.sizing.max_radius), (2.0, 22.0));
        assert_eq!(cfg.sizing.size_by, SizeBy::Co2);
        assert_eq!(cfg.filters.visibility_mode, VisibilityMode::Status);
        assert_eq!(cfg.filters.preselect_status, Preselect::None);
        assert_eq!(cfg.filters.preselect_techno, Preselect::All);
        assert_eq!((cfg.heatmap.radius, cfg.heatmap.blur), (40, 5));
        assert_eq!(cli.overlays, vec!["Grid=grid.geojson".to_string()]);
    }

    #[test]
    fn absent_flags_keep_loaded_values() {
        let cli = Cli::try_parse_from(["biomap", "--csv", "sites.csv"]).unwrap();
        let mut cfg = Config::defaults();
        cfg.heatmap.radius = 33;
        cfg.output.title = "From file".to_string();
        cli.apply(&mut cfg);
        assert_eq!(cfg.heatmap.radius, 33);
        assert_eq!(cfg.output.title, "From file");
        assert_eq!(cfg.sizing.max_radius, 16.0);
    }
}
