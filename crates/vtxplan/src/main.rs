//! vtxplan
//!
//! Picks sets of FPV video channels that do not overlap and ranks them by
//! how much intermodulation they produce.
//!
//! - Built-in analog and HDZero channel tables, or a custom table from TOML
//! - Console report, `--json` for machine-readable output
//! - Optional SVG charts of the top combinations and the best set's IMD

mod plot;
mod report;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use vtxplan_core::catalog::BandwidthMode;
use vtxplan_core::config::{PlannerConfig, PlannerConfigInput};
use vtxplan_core::planner::Planner;
use vtxplan_core::Mhz;

use crate::plot::PlotContext;
use crate::report::ConsoleReport;

/// FPV multi-transmitter channel planner.
#[derive(Parser, Debug)]
#[command(name = "vtxplan", about = "FPV channel planner with IMD scoring")]
struct Cli {
    /// Bandwidth mode: analog, hdzero-narrow, hdzero or dji.
    mode: Option<BandwidthMode>,

    /// TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Lower edge of the usable range (MHz).
    #[arg(long)]
    min_freq: Option<Mhz>,

    /// Upper edge of the usable range (MHz).
    #[arg(long)]
    max_freq: Option<Mhz>,

    /// Number of simultaneous transmitters.
    #[arg(long)]
    segments: Option<usize>,

    /// Channel width override (MHz).
    #[arg(long)]
    width: Option<Mhz>,

    /// How many combinations to list.
    #[arg(long)]
    top: Option<usize>,

    /// Print the full report as JSON on stdout.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Write an SVG chart of the top combinations.
    #[arg(long)]
    plot: Option<PathBuf>,

    /// Write an SVG chart of the best combination with its IMD products.
    #[arg(long)]
    plot_imd: Option<PathBuf>,
}

impl Cli {
    /// Applies command-line overrides on top of the file input.
    fn apply(&self, input: &mut PlannerConfigInput) {
        if let Some(mode) = self.mode {
            input.mode = Some(mode.name().to_string());
            // A width from the file belongs to the file's mode.
            input.search.channel_width_mhz = None;
        }
        if let Some(width) = self.width {
            input.search.channel_width_mhz = Some(width);
        }
        if let Some(min) = self.min_freq {
            input.search.min_freq_mhz = Some(min);
        }
        if let Some(max) = self.max_freq {
            input.search.max_freq_mhz = Some(max);
        }
        if let Some(segments) = self.segments {
            input.search.segments = Some(segments);
        }
        if let Some(top) = self.top {
            input.top = Some(top);
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<PlannerConfig> {
    let mut input = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            PlannerConfigInput::from_toml_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => PlannerConfigInput::default(),
    };
    cli.apply(&mut input);
    Ok(input.resolve()?)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let top = config.top;
    let catalog = config.catalog();
    let planner = Planner::new(config)?;

    tracing::info!(
        mode = %planner.config().mode,
        width = planner.config().search.channel_width,
        min_freq = planner.config().search.min_freq,
        max_freq = planner.config().search.max_freq,
        segments = planner.config().search.segments_needed,
        "vtxplan starting"
    );

    let report = planner.run(&catalog);
    let labels = catalog.labels();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.json {
        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
    } else {
        ConsoleReport {
            report: &report,
            planner: &planner,
            labels: &labels,
            top,
        }
        .write_to(&mut out)?;
    }

    let plots = [(&cli.plot, false), (&cli.plot_imd, true)];
    for (path, with_imd) in plots {
        let Some(path) = path.as_deref() else {
            continue;
        };
        if !report.is_feasible() {
            tracing::warn!(path = %path.display(), "no feasible combination, plot skipped");
            continue;
        }
        let ctx = PlotContext {
            catalog: &catalog,
            labels: &labels,
            channel_width: report.channel_width,
            min_freq: report.min_freq,
            max_freq: report.max_freq,
            imd: if with_imd {
                report.best.as_ref().map(|b| &b.breakdown)
            } else {
                None
            },
        };
        let rows = if with_imd { 1 } else { top };
        plot::draw(path, report.ranking.top(rows), &ctx)
            .with_context(|| format!("writing plot {}", path.display()))?;
    }

    Ok(())
}
