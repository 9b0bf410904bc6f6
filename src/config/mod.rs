mod file_config;

pub use file_config::{ChartConfig, FileConfig};

use crate::charts::{parse_hex_color, ChartTheme};
use crate::data::DEFAULT_CANDIDATE_PATHS;
use crate::questions::{AnalysisSettings, Question};
use anyhow::{anyhow, bail, Result};
use plotters::style::RGBColor;
use std::path::PathBuf;

pub const DEFAULT_OUTPUT_DIR: &str = "charts";

/// CLI arguments that take part in config resolution.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub dataset: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub top_n: Option<usize>,
    pub questions: Vec<u8>,
    pub no_charts: bool,
    pub json: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Candidate dataset paths, in resolution order.
    pub dataset_candidates: Vec<PathBuf>,
    pub output_dir: PathBuf,
    /// Questions to run, in order.
    pub questions: Vec<Question>,
    pub analysis: AnalysisSettings,
    pub render_charts: bool,
    pub write_json: bool,
    pub theme: ChartTheme,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and an optional TOML file.
    /// CLI values win over the file, the file wins over built-in defaults.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let dataset_candidates = match (&cli.dataset, file.dataset_paths) {
            (Some(path), _) => vec![path.clone()],
            (None, Some(paths)) if !paths.is_empty() => {
                paths.into_iter().map(PathBuf::from).collect()
            }
            (None, Some(_)) => bail!("dataset_paths in config file must not be empty"),
            (None, None) => DEFAULT_CANDIDATE_PATHS.iter().map(PathBuf::from).collect(),
        };

        let output_dir = cli
            .output_dir
            .clone()
            .or_else(|| file.output_dir.map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

        let defaults = AnalysisSettings::default();
        let analysis = AnalysisSettings {
            top_n: positive("top_n", cli.top_n.or(file.top_n), defaults.top_n)?,
            breakdown_top_n: positive(
                "breakdown_top_n",
                file.breakdown_top_n,
                defaults.breakdown_top_n,
            )?,
            histogram_bins: positive(
                "histogram_bins",
                file.histogram_bins,
                defaults.histogram_bins,
            )?,
        };

        let numbers = if cli.questions.is_empty() {
            file.questions.unwrap_or_default()
        } else {
            cli.questions.clone()
        };
        let questions = resolve_questions(&numbers)?;

        let render_charts = !cli.no_charts && file.render_charts.unwrap_or(true);
        let write_json = cli.json || file.write_json.unwrap_or(false);
        let theme = resolve_theme(file.chart.unwrap_or_default())?;

        Ok(Self {
            dataset_candidates,
            output_dir,
            questions,
            analysis,
            render_charts,
            write_json,
            theme,
        })
    }
}

fn positive(name: &str, value: Option<usize>, default: usize) -> Result<usize> {
    match value {
        Some(0) => bail!("{} must be greater than zero", name),
        Some(v) => Ok(v),
        None => Ok(default),
    }
}

/// Map 1-based question numbers; an empty list selects every question.
pub fn resolve_questions(numbers: &[u8]) -> Result<Vec<Question>> {
    if numbers.is_empty() {
        return Ok(Question::ALL.to_vec());
    }
    numbers
        .iter()
        .map(|&n| {
            Question::from_number(n)
                .ok_or_else(|| anyhow!("Unknown question number {} (expected 1-15)", n))
        })
        .collect()
}

fn resolve_theme(chart: ChartConfig) -> Result<ChartTheme> {
    let defaults = ChartTheme::default();

    let width = chart.width.unwrap_or(defaults.width);
    let height = chart.height.unwrap_or(defaults.height);
    if width == 0 || height == 0 {
        bail!("Chart size must be non-zero, got {}x{}", width, height);
    }

    let background = match chart.background {
        Some(hex) => color("chart.background", &hex)?,
        None => defaults.background,
    };
    let grid = match chart.grid {
        Some(hex) => color("chart.grid", &hex)?,
        None => defaults.grid,
    };
    let palette = match chart.palette {
        Some(colors) if colors.is_empty() => bail!("chart.palette must not be empty"),
        Some(colors) => colors
            .iter()
            .map(|hex| color("chart.palette", hex))
            .collect::<Result<Vec<_>>>()?,
        None => defaults.palette,
    };

    Ok(ChartTheme {
        width,
        height,
        background,
        grid,
        palette,
    })
}

fn color(field: &str, hex: &str) -> Result<RGBColor> {
    parse_hex_color(hex).ok_or_else(|| anyhow!("Invalid color {:?} for {}", hex, field))
}
