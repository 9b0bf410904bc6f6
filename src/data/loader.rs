//! CSV Data Loader Module
//! Resolves the dataset path, loads it with Polars and converts rows into records.

use super::record::{Record, TitleType};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Candidate locations tried when no dataset path is given explicitly.
pub const DEFAULT_CANDIDATE_PATHS: [&str; 4] = [
    "../netflix_titles_CLEANED.csv",
    "../netflix_titles.CLEANED.csv",
    "netflix_titles_CLEANED.csv",
    "netflix_titles.CLEANED.csv",
];

pub const TITLE_COLUMN: &str = "title";
pub const TYPE_COLUMN: &str = "type";
pub const COUNTRIES_COLUMN: &str = "countries";
pub const RATING_COLUMN: &str = "rating";
pub const RELEASE_YEAR_COLUMN: &str = "release_year";
pub const DURATION_COLUMN: &str = "duration";
pub const DATE_ADDED_COLUMN: &str = "date_added";
pub const DIRECTORS_COLUMN: &str = "directors";

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Dataset not found, tried: {}", format_paths(.tried))]
    DatasetNotFound { tried: Vec<PathBuf> },
    #[error("Dataset is missing required column '{0}'")]
    MissingColumn(String),
    #[error("No data loaded")]
    NoData,
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Records converted from a loaded DataFrame.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub path: PathBuf,
    pub records: Vec<Record>,
    /// Rows with an unrecognized type or a non-integer release year.
    pub skipped_rows: usize,
}

/// Handles CSV file loading with Polars.
pub struct DataLoader {
    df: Option<DataFrame>,
    file_path: Option<PathBuf>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            df: None,
            file_path: None,
        }
    }

    /// Return the first candidate that exists on disk.
    pub fn resolve_path<P: AsRef<Path>>(candidates: &[P]) -> Result<PathBuf, LoaderError> {
        for candidate in candidates {
            let path = candidate.as_ref();
            if path.is_file() {
                debug!("Dataset candidate {:?} found", path);
                return Ok(path.to_path_buf());
            }
            debug!("Dataset candidate {:?} does not exist", path);
        }

        Err(LoaderError::DatasetNotFound {
            tried: candidates.iter().map(|p| p.as_ref().to_path_buf()).collect(),
        })
    }

    /// Load a CSV file using Polars. Every column is read as text; typing
    /// happens in [`DataLoader::to_dataset`].
    pub fn load_csv(&mut self, file_path: &Path) -> Result<&DataFrame, LoaderError> {
        self.file_path = Some(file_path.to_path_buf());

        let df = LazyCsvReader::new(file_path)
            .with_infer_schema_length(Some(0))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        info!(
            "Loaded {} rows x {} columns from {:?}",
            df.height(),
            df.width(),
            file_path
        );

        let df: &DataFrame = self.df.insert(df);
        Ok(df)
    }

    /// Resolve the first existing candidate and load it.
    pub fn load_first<P: AsRef<Path>>(
        &mut self,
        candidates: &[P],
    ) -> Result<&DataFrame, LoaderError> {
        let path = Self::resolve_path(candidates)?;
        self.load_csv(&path)
    }

    /// Convert the loaded DataFrame into catalog records.
    pub fn to_dataset(&self) -> Result<Dataset, LoaderError> {
        let df = self.df.as_ref().ok_or(LoaderError::NoData)?;

        let titles = optional_text_column(df, TITLE_COLUMN)?;
        let types = text_column(df, TYPE_COLUMN)?;
        let countries = text_column(df, COUNTRIES_COLUMN)?;
        let ratings = text_column(df, RATING_COLUMN)?;
        let release_years = text_column(df, RELEASE_YEAR_COLUMN)?;
        let durations = text_column(df, DURATION_COLUMN)?;
        let dates_added = text_column(df, DATE_ADDED_COLUMN)?;
        let directors = text_column(df, DIRECTORS_COLUMN)?;

        let mut records = Vec::with_capacity(df.height());
        let mut skipped_rows = 0;

        for i in 0..df.height() {
            let Some(title_type) = types.get(i).and_then(TitleType::parse) else {
                warn!("Skipping row {}: unrecognized type {:?}", i, types.get(i));
                skipped_rows += 1;
                continue;
            };
            let Some(release_year) = release_years.get(i).and_then(parse_year) else {
                warn!(
                    "Skipping row {}: invalid release year {:?}",
                    i,
                    release_years.get(i)
                );
                skipped_rows += 1;
                continue;
            };

            records.push(Record {
                title: titles.as_ref().and_then(|ca| owned_text(ca.get(i))),
                title_type,
                countries: owned_text(countries.get(i)),
                rating: owned_text(ratings.get(i)),
                release_year,
                duration_raw: owned_text(durations.get(i)),
                date_added_raw: owned_text(dates_added.get(i)),
                directors_raw: owned_text(directors.get(i)),
            });
        }

        if skipped_rows > 0 {
            warn!("Skipped {} unusable rows", skipped_rows);
        }

        Ok(Dataset {
            path: self.file_path.clone().unwrap_or_default(),
            records,
            skipped_rows,
        })
    }
}

/// Resolve, load and convert in one step.
pub fn load_dataset<P: AsRef<Path>>(candidates: &[P]) -> Result<Dataset, LoaderError> {
    let mut loader = DataLoader::new();
    loader.load_first(candidates)?;
    loader.to_dataset()
}

fn text_column(df: &DataFrame, name: &str) -> Result<StringChunked, LoaderError> {
    optional_text_column(df, name)?.ok_or_else(|| LoaderError::MissingColumn(name.to_string()))
}

fn optional_text_column(df: &DataFrame, name: &str) -> Result<Option<StringChunked>, LoaderError> {
    let Ok(column) = df.column(name) else {
        return Ok(None);
    };
    let series = column.as_materialized_series().cast(&DataType::String)?;
    Ok(Some(series.str()?.clone()))
}

fn owned_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Accepts "2019" and float renderings such as "2019.0".
fn parse_year(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    raw.parse::<i32>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && v.fract() == 0.0)
            .map(|v| v as i32)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_year_accepts_integer_renderings() {
        assert_eq!(parse_year("2019"), Some(2019));
        assert_eq!(parse_year(" 2019.0 "), Some(2019));
        assert_eq!(parse_year("2019.5"), None);
        assert_eq!(parse_year("soon"), None);
    }

    #[test]
    fn resolve_path_reports_every_candidate() {
        let err = DataLoader::resolve_path(&["/nonexistent/a.csv", "/nonexistent/b.csv"])
            .unwrap_err();
        match err {
            LoaderError::DatasetNotFound { tried } => assert_eq!(tried.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn load_csv_returns_the_loaded_frame() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("titles.csv");
        std::fs::write(
            &path,
            "type,release_year\nMovie,2019\nTV Show,2020\nMovie,2021\n",
        )
        .unwrap();

        let mut loader = DataLoader::new();
        let df = loader.load_csv(&path).unwrap();
        assert_eq!(df.height(), 3);
        assert_eq!(df.width(), 2);
    }

    #[test]
    fn to_dataset_without_load_is_no_data() {
        let loader = DataLoader::new();
        assert!(matches!(loader.to_dataset(), Err(LoaderError::NoData)));
    }
}
