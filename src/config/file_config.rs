use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    /// Dataset locations tried in order; the first existing file wins.
    pub dataset_paths: Option<Vec<String>>,
    pub output_dir: Option<String>,
    pub top_n: Option<usize>,
    pub breakdown_top_n: Option<usize>,
    pub histogram_bins: Option<usize>,
    pub render_charts: Option<bool>,
    pub write_json: Option<bool>,
    pub questions: Option<Vec<u8>>,

    pub chart: Option<ChartConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct ChartConfig {
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Plot area color, `#RRGGBB`.
    pub background: Option<String>,
    pub grid: Option<String>,
    pub palette: Option<Vec<String>>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
