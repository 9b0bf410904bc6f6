//! Questions module - the fifteen catalog questions
//!
//! Each [`Question`] picks a filter, a grouping key and an optional value,
//! and hands them to the shared aggregator. Nothing is cached between
//! questions; every run re-derives the columns it needs from the records.

mod summary;

pub use summary::{CountEntry, GapPoint, MeanEntry, Share, Summary};

use crate::data::{Record, TitleType};
use crate::stats::{
    count_by, count_exploded, cross_tab, mean_by, monthly_series, percentage_shares,
    seasonal_buckets, sort_means_desc, StatsCalculator,
};
use serde::Serialize;
use tracing::debug;

pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// How a question's summary is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Pie,
    Bar,
    HorizontalBar,
    Line,
    Heatmap,
    Histogram,
    StackedArea,
    Scatter,
    GroupedBar,
}

/// Tunables shared by the questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisSettings {
    /// Ranking length for top countries and top directors.
    pub top_n: usize,
    /// Number of countries in the content type breakdown.
    pub breakdown_top_n: usize,
    /// Bins of the movie duration histogram.
    pub histogram_bins: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            top_n: 10,
            breakdown_top_n: 5,
            histogram_bins: 20,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Question {
    ContentTypeMix,
    TopCountries,
    RatingDistribution,
    ReleaseYearTrend,
    TypeByRating,
    MovieDurations,
    TvSeasons,
    MonthlyAdditions,
    TypeByReleaseYear,
    TopDirectors,
    YearlyAdditions,
    DurationByRating,
    SeasonalAdditions,
    ReleaseToAddedGap,
    TopCountryBreakdown,
}

impl Question {
    pub const ALL: [Question; 15] = [
        Question::ContentTypeMix,
        Question::TopCountries,
        Question::RatingDistribution,
        Question::ReleaseYearTrend,
        Question::TypeByRating,
        Question::MovieDurations,
        Question::TvSeasons,
        Question::MonthlyAdditions,
        Question::TypeByReleaseYear,
        Question::TopDirectors,
        Question::YearlyAdditions,
        Question::DurationByRating,
        Question::SeasonalAdditions,
        Question::ReleaseToAddedGap,
        Question::TopCountryBreakdown,
    ];

    /// 1-based question number.
    pub fn number(self) -> u8 {
        self as u8 + 1
    }

    pub fn from_number(number: u8) -> Option<Self> {
        let idx = usize::from(number).checked_sub(1)?;
        Self::ALL.get(idx).copied()
    }

    pub fn slug(self) -> &'static str {
        match self {
            Question::ContentTypeMix => "content_type_mix",
            Question::TopCountries => "top_countries",
            Question::RatingDistribution => "rating_distribution",
            Question::ReleaseYearTrend => "release_year_trend",
            Question::TypeByRating => "type_by_rating",
            Question::MovieDurations => "movie_durations",
            Question::TvSeasons => "tv_seasons",
            Question::MonthlyAdditions => "monthly_additions",
            Question::TypeByReleaseYear => "type_by_release_year",
            Question::TopDirectors => "top_directors",
            Question::YearlyAdditions => "yearly_additions",
            Question::DurationByRating => "duration_by_rating",
            Question::SeasonalAdditions => "seasonal_additions",
            Question::ReleaseToAddedGap => "release_to_added_gap",
            Question::TopCountryBreakdown => "top_country_breakdown",
        }
    }

    /// Heading printed in the console banner.
    pub fn title(self) -> &'static str {
        match self {
            Question::ContentTypeMix => "Content Type Distribution",
            Question::TopCountries => "Top Countries by Content",
            Question::RatingDistribution => "Content Rating Distribution",
            Question::ReleaseYearTrend => "Content Release Year Trend",
            Question::TypeByRating => "Content Type vs Rating",
            Question::MovieDurations => "Movie Duration Distribution",
            Question::TvSeasons => "TV Show Seasons Distribution",
            Question::MonthlyAdditions => "Content Added Over Time",
            Question::TypeByReleaseYear => "Movies vs TV Shows Over Release Years",
            Question::TopDirectors => "Top Directors by Content Count",
            Question::YearlyAdditions => "Content Added by Year",
            Question::DurationByRating => "Average Movie Duration by Rating",
            Question::SeasonalAdditions => "Content Addition by Month",
            Question::ReleaseToAddedGap => "Release Year vs Addition Date Gap",
            Question::TopCountryBreakdown => "Top Countries - Content Type Breakdown",
        }
    }

    pub fn chart_kind(self) -> ChartKind {
        match self {
            Question::ContentTypeMix => ChartKind::Pie,
            Question::TopCountries | Question::TopDirectors => ChartKind::HorizontalBar,
            Question::RatingDistribution
            | Question::TvSeasons
            | Question::YearlyAdditions
            | Question::DurationByRating
            | Question::SeasonalAdditions => ChartKind::Bar,
            Question::ReleaseYearTrend | Question::MonthlyAdditions => ChartKind::Line,
            Question::TypeByRating => ChartKind::Heatmap,
            Question::MovieDurations => ChartKind::Histogram,
            Question::TypeByReleaseYear => ChartKind::StackedArea,
            Question::ReleaseToAddedGap => ChartKind::Scatter,
            Question::TopCountryBreakdown => ChartKind::GroupedBar,
        }
    }

    /// Chart axis captions as (x, y).
    pub fn axis_labels(self) -> (&'static str, &'static str) {
        match self {
            Question::ContentTypeMix => ("", ""),
            Question::TopCountries => ("Number of Titles", "Country"),
            Question::RatingDistribution => ("Rating", "Count"),
            Question::ReleaseYearTrend => ("Release Year", "Number of Titles"),
            Question::TypeByRating => ("Rating", "Content Type"),
            Question::MovieDurations => ("Duration (minutes)", "Frequency"),
            Question::TvSeasons => ("Number of Seasons", "Number of Shows"),
            Question::MonthlyAdditions => ("Date", "Number of Titles Added"),
            Question::TypeByReleaseYear => ("Release Year", "Number of Titles"),
            Question::TopDirectors => ("Number of Titles", "Director"),
            Question::YearlyAdditions => ("Year", "Number of Titles Added"),
            Question::DurationByRating => ("Rating", "Average Duration (minutes)"),
            Question::SeasonalAdditions => ("Month", "Number of Titles Added"),
            Question::ReleaseToAddedGap => ("Release Year", "Years Until Added"),
            Question::TopCountryBreakdown => ("Country", "Number of Titles"),
        }
    }

    /// Long series only show their most recent rows on the console.
    pub fn console_tail(self) -> Option<usize> {
        match self {
            Question::ReleaseYearTrend
            | Question::MonthlyAdditions
            | Question::TypeByReleaseYear => Some(10),
            _ => None,
        }
    }

    /// Run the question over `records`.
    pub fn analyze(self, records: &[Record], settings: &AnalysisSettings) -> Analysis {
        debug!(
            "Analyzing question {} ({}) over {} records",
            self.number(),
            self.slug(),
            records.len()
        );

        let summary = match self {
            Question::ContentTypeMix => {
                let counts = count_by(records, |r| Some(r.title_type));
                let values: Vec<usize> = counts.entries().iter().map(|(_, c)| *c).collect();
                let shares = percentage_shares(&values);
                Summary::Shares {
                    entries: counts
                        .into_entries()
                        .into_iter()
                        .zip(shares)
                        .map(|((title_type, count), percent)| Share {
                            label: title_type.to_string(),
                            count,
                            percent,
                        })
                        .collect(),
                }
            }
            Question::TopCountries => Summary::counts(
                count_by(records, |r| Some(r.primary_country()))
                    .top(settings.top_n)
                    .into_entries(),
            ),
            Question::RatingDistribution => Summary::counts(
                count_by(records, |r| r.rating().map(str::to_string)).into_entries(),
            ),
            Question::ReleaseYearTrend => Summary::counts(
                count_by(records, |r| Some(r.release_year))
                    .sorted_by_key()
                    .into_entries(),
            ),
            Question::TypeByRating => Summary::CrossTab {
                table: cross_tab(
                    records,
                    |r| Some(r.title_type),
                    |r| r.rating().map(str::to_string),
                )
                .map_axes(|t| t.to_string(), |rating| rating),
            },
            Question::MovieDurations => {
                let minutes = movie_minutes(records);
                Summary::Distribution {
                    stats: StatsCalculator::describe(&minutes),
                    histogram: StatsCalculator::histogram(&minutes, settings.histogram_bins),
                }
            }
            Question::TvSeasons => Summary::counts(
                count_by(records, |r| r.num_seasons())
                    .sorted_by_key()
                    .into_entries(),
            ),
            Question::MonthlyAdditions => Summary::counts(
                monthly_series(records, |r| r.calendar_parts().map(|p| (p.year, p.month)))
                    .into_iter()
                    .map(|((year, month), count)| (format!("{year}-{month:02}"), count)),
            ),
            Question::TypeByReleaseYear => {
                let types: Vec<String> = TitleType::ALL.iter().map(|t| t.to_string()).collect();
                Summary::CrossTab {
                    table: cross_tab(records, |r| Some(r.title_type), |r| Some(r.release_year))
                        .map_axes(|t| t.to_string(), |year| year.to_string())
                        .reindex_rows(&types),
                }
            }
            Question::TopDirectors => Summary::counts(
                count_exploded(records, |r| r.directors())
                    .top(settings.top_n)
                    .into_entries(),
            ),
            Question::YearlyAdditions => Summary::counts(
                count_by(records, |r| r.year_added())
                    .sorted_by_key()
                    .into_entries(),
            ),
            Question::DurationByRating => {
                let mut means = mean_by(
                    records.iter().filter(|r| r.is(TitleType::Movie)),
                    |r| r.rating().map(str::to_string),
                    |r| r.duration_minutes().map(f64::from),
                );
                sort_means_desc(&mut means);
                Summary::Means {
                    entries: means
                        .into_iter()
                        .map(|m| MeanEntry {
                            label: m.key,
                            mean: m.mean,
                            count: m.count,
                        })
                        .collect(),
                }
            }
            Question::SeasonalAdditions => Summary::counts(
                MONTH_NAMES
                    .iter()
                    .zip(seasonal_buckets(records, |r| r.month_added())),
            ),
            Question::ReleaseToAddedGap => {
                let points: Vec<GapPoint> = records
                    .iter()
                    .filter_map(|r| {
                        let gap = r.year_gap().filter(|gap| *gap >= 0)?;
                        Some(GapPoint {
                            release_year: r.release_year,
                            gap,
                            title_type: r.title_type,
                        })
                    })
                    .collect();
                let gaps: Vec<f64> = points.iter().map(|p| f64::from(p.gap)).collect();
                Summary::Gap {
                    stats: StatsCalculator::describe(&gaps),
                    points,
                }
            }
            Question::TopCountryBreakdown => {
                let top: Vec<String> = count_by(records, |r| Some(r.primary_country()))
                    .top(settings.breakdown_top_n)
                    .into_entries()
                    .into_iter()
                    .map(|(country, _)| country)
                    .collect();
                let types: Vec<String> = TitleType::ALL.iter().map(|t| t.to_string()).collect();
                Summary::CrossTab {
                    table: cross_tab(
                        records,
                        |r| Some(r.title_type.to_string()),
                        |r| Some(r.primary_country()).filter(|c| top.contains(c)),
                    )
                    .reindex_rows(&types)
                    .reindex_cols(&top),
                }
            }
        };

        Analysis {
            question: self,
            summary,
        }
    }
}

fn movie_minutes(records: &[Record]) -> Vec<f64> {
    records
        .iter()
        .filter_map(Record::duration_minutes)
        .map(f64::from)
        .collect()
}

/// Result of running one question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub question: Question,
    pub summary: Summary,
}

impl Analysis {
    /// JSON document with the question number, title and summary.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&serde_json::json!({
            "number": self.question.number(),
            "question": self.question,
            "title": self.question.title(),
            "summary": self.summary,
        }))
    }

    /// Base file name shared by the chart and JSON outputs.
    pub fn file_stem(&self) -> String {
        format!("q{:02}_{}", self.question.number(), self.question.slug())
    }
}

/// Run every question in order.
pub fn analyze_all(records: &[Record], settings: &AnalysisSettings) -> Vec<Analysis> {
    Question::ALL
        .iter()
        .map(|q| q.analyze(records, settings))
        .collect()
}
