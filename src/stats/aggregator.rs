//! Aggregator Module
//! Frequency counts, cross-tabulations, grouped means and time buckets over
//! catalog records.
//!
//! All functions take a key/value closure so each question only decides
//! *which* key, value and filter it needs. Items whose key is `None` are left
//! out of the aggregate.

use serde::Serialize;
use std::collections::HashMap;
use std::hash::Hash;

/// Ordered key -> count mapping.
///
/// Built in descending count order. Equal counts keep the order in which the
/// key first appeared in the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Counts<K> {
    entries: Vec<(K, usize)>,
}

impl<K> Counts<K> {
    pub fn entries(&self) -> &[(K, usize)] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<(K, usize)> {
        self.entries
    }

    /// First `n` entries of the ranking.
    pub fn top(mut self, n: usize) -> Self {
        self.entries.truncate(n);
        self
    }
}

impl<K: Ord> Counts<K> {
    /// Index order: ascending key instead of descending count.
    pub fn sorted_by_key(mut self) -> Self {
        self.entries.sort_by(|a, b| a.0.cmp(&b.0));
        self
    }
}

/// Count keys in first-occurrence order, then stable-sort by descending count.
fn tally<K, I>(keys: I) -> Counts<K>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = K>,
{
    let mut positions: HashMap<K, usize> = HashMap::new();
    let mut entries: Vec<(K, usize)> = Vec::new();

    for key in keys {
        match positions.get(&key).copied() {
            Some(pos) => entries[pos].1 += 1,
            None => {
                positions.insert(key.clone(), entries.len());
                entries.push((key, 1));
            }
        }
    }

    // `sort_by` is stable, which keeps first occurrence as the tie-break.
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    Counts { entries }
}

/// Frequency count of `key` over `items`.
pub fn count_by<'a, T, K, I, F>(items: I, mut key: F) -> Counts<K>
where
    T: 'a,
    I: IntoIterator<Item = &'a T>,
    K: Eq + Hash + Clone,
    F: FnMut(&T) -> Option<K>,
{
    tally(items.into_iter().filter_map(|item| key(item)))
}

/// Frequency count over a multi-valued field: each value of each item counts once.
pub fn count_exploded<'a, T, K, I, F>(items: I, mut values: F) -> Counts<K>
where
    T: 'a,
    I: IntoIterator<Item = &'a T>,
    K: Eq + Hash + Clone,
    F: FnMut(&T) -> Vec<K>,
{
    tally(items.into_iter().flat_map(|item| values(item)))
}

/// Two-dimensional count matrix. Every (row, col) cell is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrossTab<R, C> {
    pub rows: Vec<R>,
    pub cols: Vec<C>,
    /// `cells[r][c]` counts items with row key `rows[r]` and column key `cols[c]`.
    pub cells: Vec<Vec<usize>>,
}

impl<R, C> CrossTab<R, C> {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.cols.is_empty()
    }

    pub fn row_totals(&self) -> Vec<usize> {
        self.cells.iter().map(|row| row.iter().sum()).collect()
    }

    pub fn max_cell(&self) -> usize {
        self.cells.iter().flatten().copied().max().unwrap_or(0)
    }

    /// Relabel both axes, keeping the cell layout.
    pub fn map_axes<R2, C2>(
        self,
        rows: impl FnMut(R) -> R2,
        cols: impl FnMut(C) -> C2,
    ) -> CrossTab<R2, C2> {
        CrossTab {
            rows: self.rows.into_iter().map(rows).collect(),
            cols: self.cols.into_iter().map(cols).collect(),
            cells: self.cells,
        }
    }
}

impl<R: PartialEq + Clone, C: PartialEq + Clone> CrossTab<R, C> {
    /// Force the row categories to `rows`, zero-filling missing ones.
    /// Rows not listed are dropped.
    pub fn reindex_rows(self, rows: &[R]) -> Self {
        let cells = rows
            .iter()
            .map(|row| match self.rows.iter().position(|k| k == row) {
                Some(r) => self.cells[r].clone(),
                None => vec![0; self.cols.len()],
            })
            .collect();
        Self {
            rows: rows.to_vec(),
            cols: self.cols,
            cells,
        }
    }

    /// Force the column categories to `cols`, zero-filling missing ones.
    /// Columns not listed are dropped.
    pub fn reindex_cols(self, cols: &[C]) -> Self {
        let positions: Vec<Option<usize>> = cols
            .iter()
            .map(|col| self.cols.iter().position(|k| k == col))
            .collect();
        let cells = self
            .cells
            .iter()
            .map(|row| {
                positions
                    .iter()
                    .map(|pos| pos.map(|c| row[c]).unwrap_or(0))
                    .collect()
            })
            .collect();
        Self {
            rows: self.rows,
            cols: cols.to_vec(),
            cells,
        }
    }
}

/// Cross-tabulate `row_key` against `col_key`. Both category sets come from
/// the data, sorted ascending.
pub fn cross_tab<'a, T, R, C, I, FR, FC>(
    items: I,
    mut row_key: FR,
    mut col_key: FC,
) -> CrossTab<R, C>
where
    T: 'a,
    I: IntoIterator<Item = &'a T>,
    R: Ord + Clone,
    C: Ord + Clone,
    FR: FnMut(&T) -> Option<R>,
    FC: FnMut(&T) -> Option<C>,
{
    let pairs: Vec<(R, C)> = items
        .into_iter()
        .filter_map(|item| Some((row_key(item)?, col_key(item)?)))
        .collect();

    let mut rows: Vec<R> = pairs.iter().map(|(r, _)| r.clone()).collect();
    rows.sort();
    rows.dedup();
    let mut cols: Vec<C> = pairs.iter().map(|(_, c)| c.clone()).collect();
    cols.sort();
    cols.dedup();

    let mut cells = vec![vec![0usize; cols.len()]; rows.len()];
    for (row, col) in &pairs {
        // Both searches succeed: categories were collected from `pairs`.
        if let (Ok(r), Ok(c)) = (rows.binary_search(row), cols.binary_search(col)) {
            cells[r][c] += 1;
        }
    }

    CrossTab { rows, cols, cells }
}

/// Mean of one group's defined values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMean<K> {
    pub key: K,
    /// `None` when the group had no defined values.
    pub mean: Option<f64>,
    /// Number of defined values averaged.
    pub count: usize,
}

/// Mean of `value` per `group`, skipping absent values. Groups are returned
/// in first-occurrence order.
pub fn mean_by<'a, T, K, I, FK, FV>(items: I, mut group: FK, mut value: FV) -> Vec<GroupMean<K>>
where
    T: 'a,
    I: IntoIterator<Item = &'a T>,
    K: Eq + Hash + Clone,
    FK: FnMut(&T) -> Option<K>,
    FV: FnMut(&T) -> Option<f64>,
{
    let mut positions: HashMap<K, usize> = HashMap::new();
    let mut sums: Vec<(K, f64, usize)> = Vec::new();

    for item in items {
        let Some(key) = group(item) else {
            continue;
        };
        let pos = *positions.entry(key.clone()).or_insert_with(|| {
            sums.push((key, 0.0, 0));
            sums.len() - 1
        });
        if let Some(v) = value(item).filter(|v| !v.is_nan()) {
            sums[pos].1 += v;
            sums[pos].2 += 1;
        }
    }

    sums.into_iter()
        .map(|(key, sum, count)| GroupMean {
            key,
            mean: (count > 0).then(|| sum / count as f64),
            count,
        })
        .collect()
}

/// Descending mean; groups without a mean go last. Stable for equal means.
pub fn sort_means_desc<K>(means: &mut [GroupMean<K>]) {
    means.sort_by(|a, b| match (a.mean, b.mean) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(std::cmp::Ordering::Equal),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

/// Counts per `(year, month)`, chronological. Only months that occur are listed.
pub fn monthly_series<'a, T, I, F>(items: I, year_month: F) -> Vec<((i32, u32), usize)>
where
    T: 'a,
    I: IntoIterator<Item = &'a T>,
    F: FnMut(&T) -> Option<(i32, u32)>,
{
    count_by(items, year_month).sorted_by_key().into_entries()
}

/// Counts per month number regardless of year. Always twelve buckets;
/// index 0 is January.
pub fn seasonal_buckets<'a, T, I, F>(items: I, mut month: F) -> [usize; 12]
where
    T: 'a,
    I: IntoIterator<Item = &'a T>,
    F: FnMut(&T) -> Option<u32>,
{
    let mut buckets = [0usize; 12];
    for m in items.into_iter().filter_map(|item| month(item)) {
        if (1..=12).contains(&m) {
            buckets[(m - 1) as usize] += 1;
        }
    }
    buckets
}

/// Percentage of each count in the total, rounded to one decimal place.
///
/// Uses largest-remainder rounding on tenths of a percent so the shares of
/// a non-empty total sum to exactly 100.0.
pub fn percentage_shares(counts: &[usize]) -> Vec<f64> {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return vec![0.0; counts.len()];
    }

    const TENTHS: usize = 1000;
    let mut tenths: Vec<usize> = Vec::with_capacity(counts.len());
    let mut remainders: Vec<(usize, usize)> = Vec::with_capacity(counts.len());
    for (i, &count) in counts.iter().enumerate() {
        let scaled = count * TENTHS;
        tenths.push(scaled / total);
        remainders.push((i, scaled % total));
    }

    let assigned: usize = tenths.iter().sum();
    // Largest remainder first; equal remainders go to the earlier category.
    remainders.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    for &(i, _) in remainders.iter().take(TENTHS - assigned) {
        tenths[i] += 1;
    }

    tenths.into_iter().map(|t| t as f64 / 10.0).collect()
}
