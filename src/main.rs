//! Catalog Insights - command line entry point.

use anyhow::{Context, Result};
use catalog_insights::charts::StaticChartRenderer;
use catalog_insights::config::{AppConfig, CliConfig, FileConfig};
use catalog_insights::data::load_dataset;
use catalog_insights::report::write_analysis;
use clap::Parser;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "catalog-insights", version, about)]
struct CliArgs {
    /// Path to the titles CSV. Without it the default locations are tried.
    #[clap(long)]
    pub dataset: Option<PathBuf>,

    /// Path to a TOML configuration file.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Directory receiving chart and JSON files.
    #[clap(long)]
    pub output_dir: Option<PathBuf>,

    /// Question number to run (1-15). Repeat to run several; defaults to all.
    #[clap(long = "question", value_parser = clap::value_parser!(u8).range(1..=15))]
    pub questions: Vec<u8>,

    /// Ranking length for the top countries and top directors questions.
    #[clap(long)]
    pub top_n: Option<usize>,

    /// Skip chart rendering.
    #[clap(long)]
    pub no_charts: bool,

    /// Also write each summary as JSON.
    #[clap(long)]
    pub json: bool,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            dataset: self.dataset.clone(),
            output_dir: self.output_dir.clone(),
            top_n: self.top_n,
            questions: self.questions.clone(),
            no_charts: self.no_charts,
            json: self.json,
        }
    }
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config file {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    let dataset = load_dataset(&config.dataset_candidates).context("Failed to load dataset")?;
    info!(
        "Loaded {} titles from {:?}",
        dataset.records.len(),
        dataset.path
    );

    let renderer = StaticChartRenderer::new(config.theme.clone(), config.output_dir.clone());
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for question in &config.questions {
        let analysis = question.analyze(&dataset.records, &config.analysis);
        write_analysis(&mut out, &analysis)?;

        if config.render_charts {
            let path = renderer.render(&analysis).with_context(|| {
                format!("Failed to render chart for question {}", question.number())
            })?;
            info!("Saved chart {:?}", path);
        }

        if config.write_json {
            fs::create_dir_all(&config.output_dir).with_context(|| {
                format!("Failed to create output directory {:?}", config.output_dir)
            })?;
            let path = config
                .output_dir
                .join(format!("{}.json", analysis.file_stem()));
            fs::write(&path, analysis.to_json()?)
                .with_context(|| format!("Failed to write {:?}", path))?;
            info!("Saved summary {:?}", path);
        }
    }
    out.flush()?;

    info!("Analysis complete: {} questions", config.questions.len());
    Ok(())
}
