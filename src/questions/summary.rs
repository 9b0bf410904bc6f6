//! Typed results of a question, ready for the console report and charts.

use crate::data::TitleType;
use crate::stats::{CrossTab, DescriptiveStats, HistogramBin};
use serde::Serialize;

/// Category with its count and share of the total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Share {
    pub label: String,
    pub count: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountEntry {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeanEntry {
    pub label: String,
    pub mean: Option<f64>,
    pub count: usize,
}

/// One title in the release-to-addition scatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GapPoint {
    pub release_year: i32,
    pub gap: i32,
    pub title_type: TitleType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Summary {
    Shares {
        entries: Vec<Share>,
    },
    Counts {
        entries: Vec<CountEntry>,
    },
    CrossTab {
        table: CrossTab<String, String>,
    },
    Distribution {
        stats: Option<DescriptiveStats>,
        histogram: Vec<HistogramBin>,
    },
    Means {
        entries: Vec<MeanEntry>,
    },
    Gap {
        stats: Option<DescriptiveStats>,
        points: Vec<GapPoint>,
    },
}

impl Summary {
    /// True when the aggregate has nothing to show.
    pub fn is_empty(&self) -> bool {
        match self {
            Summary::Shares { entries } => entries.is_empty(),
            Summary::Counts { entries } => entries.is_empty(),
            Summary::CrossTab { table } => table.is_empty(),
            Summary::Distribution { stats, .. } => stats.is_none(),
            Summary::Means { entries } => entries.is_empty(),
            Summary::Gap { points, .. } => points.is_empty(),
        }
    }

    pub(crate) fn counts<L: ToString>(entries: impl IntoIterator<Item = (L, usize)>) -> Self {
        Summary::Counts {
            entries: entries
                .into_iter()
                .map(|(label, count)| CountEntry {
                    label: label.to_string(),
                    count,
                })
                .collect(),
        }
    }
}
