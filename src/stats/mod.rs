//! Stats module - Aggregations and descriptive statistics

pub mod aggregator;
mod calculator;

pub use aggregator::{
    count_by, count_exploded, cross_tab, mean_by, monthly_series, percentage_shares,
    seasonal_buckets, sort_means_desc, Counts, CrossTab, GroupMean,
};
pub use calculator::{DescriptiveStats, HistogramBin, StatsCalculator};
