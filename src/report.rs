//! Console report for a single analysis.

use crate::questions::{Analysis, Summary};
use crate::stats::{CrossTab, DescriptiveStats};
use std::io::{self, Write};

const BANNER_WIDTH: usize = 50;

/// Print the banner and summary table of `analysis`.
pub fn write_analysis<W: Write>(out: &mut W, analysis: &Analysis) -> io::Result<()> {
    let banner = "=".repeat(BANNER_WIDTH);
    writeln!(out)?;
    writeln!(out, "{}", banner)?;
    writeln!(
        out,
        "QUESTION {}: {}",
        analysis.question.number(),
        analysis.question.title()
    )?;
    writeln!(out, "{}", banner)?;

    if analysis.summary.is_empty() {
        return writeln!(out, "(no data)");
    }

    let tail = analysis.question.console_tail();
    match &analysis.summary {
        Summary::Shares { entries } => {
            let width = label_width(entries.iter().map(|e| e.label.as_str()));
            for entry in entries {
                writeln!(
                    out,
                    "{:<width$}  {:>8}  {:>5.1}%",
                    entry.label, entry.count, entry.percent
                )?;
            }
        }
        Summary::Counts { entries } => {
            let shown = tail_slice(entries, tail);
            let width = label_width(shown.iter().map(|e| e.label.as_str()));
            for entry in shown {
                writeln!(out, "{:<width$}  {:>8}", entry.label, entry.count)?;
            }
        }
        Summary::CrossTab { table } => write_cross_tab(out, table, tail)?,
        Summary::Distribution { stats, histogram } => {
            if let Some(stats) = stats {
                write_stats(out, stats)?;
            }
            writeln!(out, "{:<8}  {:>12}", "bins", histogram.len())?;
        }
        Summary::Means { entries } => {
            let width = label_width(entries.iter().map(|e| e.label.as_str()));
            for entry in entries {
                let mean = entry
                    .mean
                    .map(|m| format!("{:.2}", m))
                    .unwrap_or_else(|| "n/a".to_string());
                writeln!(
                    out,
                    "{:<width$}  {:>10}  (n={})",
                    entry.label, mean, entry.count
                )?;
            }
        }
        Summary::Gap { stats, points } => {
            if let Some(stats) = stats {
                write_stats(out, stats)?;
            }
            writeln!(out, "{:<8}  {:>12}", "points", points.len())?;
        }
    }
    Ok(())
}

/// Cross-tabs print one line per column category so long year axes stay readable.
fn write_cross_tab<W: Write>(
    out: &mut W,
    table: &CrossTab<String, String>,
    tail: Option<usize>,
) -> io::Result<()> {
    let label_w = label_width(table.cols.iter().map(String::as_str));
    let cell_w = table.rows.iter().map(|r| r.len()).max().unwrap_or(0).max(6);

    write!(out, "{:<label_w$}", "")?;
    for row in &table.rows {
        write!(out, "  {:>cell_w$}", row)?;
    }
    writeln!(out)?;

    let skip = tail.map_or(0, |n| table.cols.len().saturating_sub(n));
    for (j, col) in table.cols.iter().enumerate().skip(skip) {
        write!(out, "{:<label_w$}", col)?;
        for row in &table.cells {
            write!(out, "  {:>cell_w$}", row.get(j).copied().unwrap_or(0))?;
        }
        writeln!(out)?;
    }

    write!(out, "{:<label_w$}", "Total")?;
    for total in table.row_totals() {
        write!(out, "  {:>cell_w$}", total)?;
    }
    writeln!(out)
}

fn write_stats<W: Write>(out: &mut W, stats: &DescriptiveStats) -> io::Result<()> {
    let std = stats
        .std
        .map(|s| format!("{:.2}", s))
        .unwrap_or_else(|| "n/a".to_string());
    writeln!(out, "{:<8}  {:>12}", "count", stats.count)?;
    writeln!(out, "{:<8}  {:>12.2}", "mean", stats.mean)?;
    writeln!(out, "{:<8}  {:>12}", "std", std)?;
    writeln!(out, "{:<8}  {:>12.2}", "min", stats.min)?;
    writeln!(out, "{:<8}  {:>12.2}", "25%", stats.p25)?;
    writeln!(out, "{:<8}  {:>12.2}", "50%", stats.median)?;
    writeln!(out, "{:<8}  {:>12.2}", "75%", stats.p75)?;
    writeln!(out, "{:<8}  {:>12.2}", "max", stats.max)
}

fn tail_slice<T>(items: &[T], tail: Option<usize>) -> &[T] {
    match tail {
        Some(n) => &items[items.len().saturating_sub(n)..],
        None => items,
    }
}

fn label_width<'a>(labels: impl Iterator<Item = &'a str>) -> usize {
    labels.map(|l| l.chars().count()).max().unwrap_or(0).max(8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Record, TitleType};
    use crate::questions::{AnalysisSettings, Question};

    fn render(analysis: &Analysis) -> String {
        let mut buf = Vec::new();
        write_analysis(&mut buf, analysis).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_banner_and_shares() {
        let records = vec![
            Record::new(TitleType::Movie, 2020),
            Record::new(TitleType::Movie, 2020),
            Record::new(TitleType::TvShow, 2020),
        ];
        let output = render(&Question::ContentTypeMix.analyze(&records, &AnalysisSettings::default()));

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[1], "=".repeat(50));
        assert_eq!(lines[2], "QUESTION 1: Content Type Distribution");
        assert!(output.contains("66.7%"));
        assert!(output.contains("33.3%"));
    }

    #[test]
    fn test_console_tail_limits_rows() {
        let records: Vec<Record> = (1990..2010)
            .map(|year| Record::new(TitleType::Movie, year))
            .collect();
        let output =
            render(&Question::ReleaseYearTrend.analyze(&records, &AnalysisSettings::default()));

        assert!(!output.contains("1999"));
        assert!(output.contains("2000"));
        assert!(output.contains("2009"));
        assert_eq!(output.lines().count(), 4 + 10);
    }

    #[test]
    fn test_absent_mean_prints_na() {
        let analysis = Analysis {
            question: Question::DurationByRating,
            summary: Summary::Means {
                entries: vec![crate::questions::MeanEntry {
                    label: "NR".to_string(),
                    mean: None,
                    count: 0,
                }],
            },
        };
        let output = render(&analysis);
        assert!(output.contains("n/a"));
        assert!(output.contains("(n=0)"));
    }

    #[test]
    fn test_empty_summary() {
        let output = render(&Question::TvSeasons.analyze(&[], &AnalysisSettings::default()));
        assert!(output.contains("QUESTION 7: TV Show Seasons Distribution"));
        assert!(output.contains("(no data)"));
    }

    #[test]
    fn test_cross_tab_lists_columns_as_lines() {
        let records = vec![
            Record::new(TitleType::Movie, 2020).with_rating("PG"),
            Record::new(TitleType::TvShow, 2020).with_rating("TV-MA"),
        ];
        let output = render(&Question::TypeByRating.analyze(&records, &AnalysisSettings::default()));
        let pg_line = output.lines().find(|l| l.starts_with("PG")).unwrap();
        let cells: Vec<&str> = pg_line.split_whitespace().collect();
        assert_eq!(cells, vec!["PG", "1", "0"]);
        let total_line = output.lines().last().unwrap();
        let totals: Vec<&str> = total_line.split_whitespace().collect();
        assert_eq!(totals, vec!["Total", "1", "1"]);
    }
}
