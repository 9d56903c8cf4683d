use anyhow::Context;
use clap::{Parser, ValueEnum};
use display::renderer::{ConsoleRenderer, OutputFormat};
use generator::profile::SyntheticSource;
use log::{info, warn};
use radarcore::prelude::{EmptyViewPolicy, FilterField};
use radarcore::processing::TrendSeries;
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use workflow::config::DisplayConfig;
use workflow::runner::Runner;

mod display;
mod generator;
mod workflow;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TrendArg {
    /// Largest speed of the tick
    MaxVelocity,
    /// Speed of the strongest reflector
    VelocityAtMaxRcs,
}

impl From<TrendArg> for TrendSeries {
    fn from(arg: TrendArg) -> Self {
        match arg {
            TrendArg::MaxVelocity => TrendSeries::MaxVelocity,
            TrendArg::VelocityAtMaxRcs => TrendSeries::VelocityAtMaxRcs,
        }
    }
}

#[derive(Parser)]
#[command(author, version, about = "Ticks the radar display core against a synthetic sensor")]
struct Args {
    /// Load the display config from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Stop after this many refreshes (runs until Ctrl+C when omitted)
    #[arg(long)]
    ticks: Option<usize>,
    /// Override the generator seed
    #[arg(long)]
    seed: Option<u64>,
    /// Trend series to plot
    #[arg(long, value_enum, default_value_t = TrendArg::MaxVelocity)]
    trend: TrendArg,
    /// Keep the last non-empty range/RCS view when a frame has no points
    #[arg(long, default_value_t = false)]
    retain_last_good: bool,
    /// Filter edits as FIELD=VALUE, validated like the settings panel
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    edits: Vec<String>,
    /// Emit JSON lines on stdout instead of log lines
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn parse_edit(edit: &str) -> anyhow::Result<(FilterField, f64)> {
    let (name, value) = edit
        .split_once('=')
        .with_context(|| format!("filter edit '{}' is not FIELD=VALUE", edit))?;
    let field = name.parse::<FilterField>().map_err(anyhow::Error::msg)?;
    let value = value
        .trim()
        .parse::<f64>()
        .with_context(|| format!("filter edit '{}' has no numeric value", edit))?;
    Ok((field, value))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = if let Some(path) = &args.config {
        DisplayConfig::load(path)?
    } else {
        DisplayConfig::default()
    };
    if let Some(seed) = args.seed {
        config.generator.seed = seed;
    }
    if args.retain_last_good {
        config.empty_view = EmptyViewPolicy::RetainLastGood;
    }

    let format = if args.json {
        OutputFormat::JsonLines
    } else {
        OutputFormat::Log
    };
    let source = SyntheticSource::new(config.generator.clone());
    let mut runner = Runner::new(
        &config,
        source,
        ConsoleRenderer::new(format),
        args.trend.into(),
    );

    let store = runner.filter_store();
    for edit in &args.edits {
        let (field, value) = parse_edit(edit)?;
        if let Err(err) = store.set(field, value) {
            warn!("ignoring filter edit: {}", err);
        }
    }
    info!("filter settings: {:?}", store.snapshot());

    let runtime = TokioBuilder::new_current_thread()
        .enable_all()
        .build()
        .context("creating runtime for refresh timers")?;
    let summary = runtime.block_on(runner.run(args.ticks))?;

    info!(
        "ran {} ticks: {} frames, {} points skipped, {} source failures, {} empty views",
        summary.ticks,
        summary.metrics.frames_processed,
        summary.metrics.points_skipped,
        summary.metrics.source_failures,
        summary.metrics.empty_views
    );
    if runner.model().is_stale() {
        warn!("display ended on stale data");
    }
    Ok(())
}
