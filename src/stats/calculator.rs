//! Statistics Calculator Module
//! Handles descriptive statistics and histogram binning.

use serde::Serialize;
use statrs::statistics::Statistics;

/// Summary statistics for a numeric sample (pandas `describe()` layout).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescriptiveStats {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; absent for fewer than two values.
    pub std: Option<f64>,
    pub min: f64,
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
    pub max: f64,
}

/// One equal-width histogram bin. The last bin also includes its upper edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Handles statistical calculations.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute descriptive statistics for an array of values.
    /// NaN values are ignored; an empty sample has no statistics.
    pub fn describe(values: &[f64]) -> Option<DescriptiveStats> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        let n = sorted.len();
        if n == 0 {
            return None;
        }
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mean = sorted.iter().mean();
        let std = if n > 1 {
            Some(sorted.iter().std_dev())
        } else {
            None
        };

        Some(DescriptiveStats {
            count: n,
            mean,
            std,
            min: sorted[0],
            p25: Self::percentile(&sorted, 25.0),
            median: Self::percentile(&sorted, 50.0),
            p75: Self::percentile(&sorted, 75.0),
            max: sorted[n - 1],
        })
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Equal-width bins spanning `[min, max]` (NumPy `histogram` semantics).
    pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() || bins == 0 {
            return Vec::new();
        }

        let mut lo = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let mut hi = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }
        let width = (hi - lo) / bins as f64;

        let mut counts = vec![0usize; bins];
        for v in finite {
            let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }

        counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                lower: lo + i as f64 * width,
                upper: if i + 1 == bins {
                    hi
                } else {
                    lo + (i + 1) as f64 * width
                },
                count,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn describe_matches_pandas_layout() {
        let stats = StatsCalculator::describe(&[90.0, 120.0, 100.0, 110.0]).unwrap();
        assert_eq!(stats.count, 4);
        assert!(approx(stats.mean, 105.0));
        assert!(approx(stats.std.unwrap(), 12.909944487358056));
        assert_eq!(stats.min, 90.0);
        assert!(approx(stats.p25, 97.5));
        assert!(approx(stats.median, 105.0));
        assert!(approx(stats.p75, 112.5));
        assert_eq!(stats.max, 120.0);
    }

    #[test]
    fn describe_single_value_has_no_std() {
        let stats = StatsCalculator::describe(&[42.0]).unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.std, None);
        assert_eq!(stats.median, 42.0);
    }

    #[test]
    fn describe_empty_is_absent() {
        assert_eq!(StatsCalculator::describe(&[]), None);
        assert_eq!(StatsCalculator::describe(&[f64::NAN]), None);
    }

    #[test]
    fn histogram_covers_every_value() {
        let values: Vec<f64> = (0..=100).map(f64::from).collect();
        let bins = StatsCalculator::histogram(&values, 20);
        assert_eq!(bins.len(), 20);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), values.len());
        assert_eq!(bins[0].lower, 0.0);
        assert_eq!(bins[19].upper, 100.0);
        // 100 lands in the closed last bin
        assert_eq!(bins[19].count, 6);
    }

    #[test]
    fn histogram_constant_sample() {
        let bins = StatsCalculator::histogram(&[5.0, 5.0], 4);
        assert_eq!(bins.len(), 4);
        assert_eq!(bins[0].lower, 4.5);
        assert_eq!(bins[3].upper, 5.5);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 2);
    }

    #[test]
    fn histogram_empty() {
        assert!(StatsCalculator::histogram(&[], 20).is_empty());
    }
}
