//! Static Chart Renderer
//! Draws one SVG chart per analysis with plotters.
//!
//! Layout follows the question's [`ChartKind`]:
//! - Pie: shares with one-decimal percentages in the labels
//! - Bar / HorizontalBar / Line: one value per category
//! - Heatmap / StackedArea / GroupedBar: cross-tabulations
//! - Histogram and Scatter: numeric distributions
//!
//! An empty summary still produces a chart with title and axes.

use super::theme::ChartTheme;
use crate::data::TitleType;
use crate::questions::{Analysis, ChartKind, GapPoint, Share, Summary};
use crate::stats::{CrossTab, DescriptiveStats, HistogramBin};
use plotters::coord::ranged1d::SegmentValue;
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::element::Pie;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to prepare chart output: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to draw chart: {0}")]
    Drawing(#[from] DrawingAreaErrorKind<std::io::Error>),
}

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;
type Axes = (&'static str, &'static str);

const TITLE_FONT: (&str, i32) = ("sans-serif", 24);
const AXIS_FONT: (&str, i32) = ("sans-serif", 16);
const LABEL_FONT: (&str, i32) = ("sans-serif", 13);

pub struct StaticChartRenderer {
    theme: ChartTheme,
    output_dir: PathBuf,
}

impl StaticChartRenderer {
    pub fn new(theme: ChartTheme, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            theme,
            output_dir: output_dir.into(),
        }
    }

    /// Where the chart for `analysis` is written.
    pub fn output_path(&self, analysis: &Analysis) -> PathBuf {
        self.output_dir.join(format!("{}.svg", analysis.file_stem()))
    }

    /// Render `analysis` to an SVG file and return its path.
    pub fn render(&self, analysis: &Analysis) -> Result<PathBuf, RenderError> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_path(analysis);

        {
            let root = SVGBackend::new(&path, (self.theme.width, self.theme.height))
                .into_drawing_area();
            root.fill(&WHITE)?;
            self.draw(&root, analysis)?;
            root.present()?;
        }

        debug!(
            "Chart for question {} written to {:?}",
            analysis.question.number(),
            path
        );
        Ok(path)
    }

    fn draw(&self, area: &Area, analysis: &Analysis) -> Result<(), RenderError> {
        let question = analysis.question;
        let title = question.title();
        let axes = question.axis_labels();
        let theme = &self.theme;

        match &analysis.summary {
            Summary::Shares { entries } => draw_pie(area, theme, title, entries),
            Summary::Counts { entries } => {
                let labels: Vec<String> = entries.iter().map(|e| e.label.clone()).collect();
                let values: Vec<f64> = entries.iter().map(|e| e.count as f64).collect();
                match question.chart_kind() {
                    ChartKind::HorizontalBar => {
                        draw_horizontal_bars(area, theme, title, axes, &labels, &values)
                    }
                    ChartKind::Line => draw_line(area, theme, title, axes, &labels, &values),
                    _ => {
                        let bars: Vec<Option<f64>> = values.into_iter().map(Some).collect();
                        draw_vertical_bars(area, theme, title, axes, &labels, &bars)
                    }
                }
            }
            Summary::Means { entries } => {
                let labels: Vec<String> = entries.iter().map(|e| e.label.clone()).collect();
                let means: Vec<Option<f64>> = entries.iter().map(|e| e.mean).collect();
                draw_vertical_bars(area, theme, title, axes, &labels, &means)
            }
            Summary::CrossTab { table } => match question.chart_kind() {
                ChartKind::Heatmap => draw_heatmap(area, theme, title, axes, table),
                ChartKind::StackedArea => draw_stacked_area(area, theme, title, axes, table),
                _ => draw_grouped_bars(area, theme, title, axes, table),
            },
            Summary::Distribution { stats, histogram } => {
                draw_histogram(area, theme, title, axes, histogram, stats.as_ref())
            }
            Summary::Gap { points, .. } => draw_scatter(area, theme, title, axes, points),
        }
    }
}

/// Y-axis ceiling leaving headroom above the tallest value.
fn upper_bound(values: &[f64]) -> f64 {
    let max = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(0.0, f64::max);
    if max <= 0.0 {
        1.0
    } else {
        max * 1.1
    }
}

/// Bars for the present values only. An absent value keeps its slot and
/// label but draws nothing.
fn bar_data(values: &[Option<f64>]) -> Vec<(u32, f64)> {
    values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| (i as u32, v)))
        .collect()
}

/// Category label for an integer tick on a float axis, blank between ticks.
fn label_at(labels: &[String], x: f64) -> String {
    let idx = x.round();
    if (x - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

fn segment_label(labels: &[String], value: &SegmentValue<u32>) -> String {
    match value {
        SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
            labels.get(*i as usize).cloned().unwrap_or_default()
        }
        SegmentValue::Last => String::new(),
    }
}

/// Like [`segment_label`] with the first label at the top of the axis.
fn segment_label_reversed(labels: &[String], value: &SegmentValue<u32>) -> String {
    match value {
        SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => (*i as usize)
            .checked_add(1)
            .and_then(|pos| labels.len().checked_sub(pos))
            .and_then(|idx| labels.get(idx))
            .cloned()
            .unwrap_or_default(),
        SegmentValue::Last => String::new(),
    }
}

/// White to dark red, matching a "Reds" colormap.
fn heat_color(t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    let lerp = |from: u8, to: u8| {
        (f64::from(from) + (f64::from(to) - f64::from(from)) * t).round() as u8
    };
    RGBColor(lerp(255, 103), lerp(245, 0), lerp(240, 13))
}

fn draw_pie(
    area: &Area,
    theme: &ChartTheme,
    title: &str,
    entries: &[Share],
) -> Result<(), RenderError> {
    let area = area.titled(title, TITLE_FONT)?;
    if entries.iter().all(|e| e.count == 0) {
        return Ok(());
    }

    let (w, h) = area.dim_in_pixel();
    let center = ((w / 2) as i32, (h / 2) as i32);
    let radius = f64::from(w.min(h)) * 0.35;
    let sizes: Vec<f64> = entries.iter().map(|e| e.count as f64).collect();
    let colors: Vec<RGBColor> = (0..entries.len()).map(|i| theme.color(i)).collect();
    let labels: Vec<String> = entries
        .iter()
        .map(|e| format!("{} ({:.1}%)", e.label, e.percent))
        .collect();

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.start_angle(90.0);
    pie.label_style(("sans-serif", 18).into_font().color(&BLACK));
    area.draw(&pie)?;
    Ok(())
}

fn draw_vertical_bars(
    area: &Area,
    theme: &ChartTheme,
    title: &str,
    axes: Axes,
    labels: &[String],
    values: &[Option<f64>],
) -> Result<(), RenderError> {
    let slots = labels.len().max(1) as u32;
    let bars = bar_data(values);
    let heights: Vec<f64> = bars.iter().map(|(_, v)| *v).collect();
    let mut chart = ChartBuilder::on(area)
        .caption(title, TITLE_FONT)
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(70)
        .build_cartesian_2d((0u32..slots).into_segmented(), 0f64..upper_bound(&heights))?;

    chart.plotting_area().fill(&theme.background)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .bold_line_style(theme.grid)
        .light_line_style(theme.grid)
        .x_labels(labels.len().max(1))
        .x_label_formatter(&|v: &SegmentValue<u32>| segment_label(labels, v))
        .x_desc(axes.0)
        .y_desc(axes.1)
        .label_style(LABEL_FONT)
        .axis_desc_style(AXIS_FONT)
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(theme.primary().filled())
            .margin(4)
            .data(bars),
    )?;
    Ok(())
}

fn draw_horizontal_bars(
    area: &Area,
    theme: &ChartTheme,
    title: &str,
    axes: Axes,
    labels: &[String],
    values: &[f64],
) -> Result<(), RenderError> {
    let n = labels.len();
    let slots = n.max(1) as u32;
    let mut chart = ChartBuilder::on(area)
        .caption(title, TITLE_FONT)
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(180)
        .build_cartesian_2d(0f64..upper_bound(values), (0u32..slots).into_segmented())?;

    chart.plotting_area().fill(&theme.background)?;
    chart
        .configure_mesh()
        .disable_y_mesh()
        .bold_line_style(theme.grid)
        .light_line_style(theme.grid)
        .y_labels(n.max(1))
        .y_label_formatter(&|v: &SegmentValue<u32>| segment_label_reversed(labels, v))
        .x_desc(axes.0)
        .y_desc(axes.1)
        .label_style(LABEL_FONT)
        .axis_desc_style(AXIS_FONT)
        .draw()?;

    // Largest entry on top.
    chart.draw_series(
        Histogram::horizontal(&chart)
            .style(theme.primary().filled())
            .margin(4)
            .data(
                values
                    .iter()
                    .enumerate()
                    .map(|(i, v)| ((n - 1 - i) as u32, *v)),
            ),
    )?;
    Ok(())
}

fn draw_line(
    area: &Area,
    theme: &ChartTheme,
    title: &str,
    axes: Axes,
    labels: &[String],
    values: &[f64],
) -> Result<(), RenderError> {
    let n = labels.len();
    let mut chart = ChartBuilder::on(area)
        .caption(title, TITLE_FONT)
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(-0.5f64..(n.max(1) as f64 - 0.5), 0f64..upper_bound(values))?;

    chart.plotting_area().fill(&theme.background)?;
    chart
        .configure_mesh()
        .bold_line_style(theme.grid)
        .light_line_style(theme.grid)
        .x_labels(n.clamp(1, 12))
        .x_label_formatter(&|x: &f64| label_at(labels, *x))
        .x_desc(axes.0)
        .y_desc(axes.1)
        .label_style(LABEL_FONT)
        .axis_desc_style(AXIS_FONT)
        .draw()?;

    let color = theme.primary();
    chart.draw_series(LineSeries::new(
        values.iter().enumerate().map(|(i, v)| (i as f64, *v)),
        color.stroke_width(2),
    ))?;
    chart.draw_series(
        values
            .iter()
            .enumerate()
            .map(|(i, v)| Circle::new((i as f64, *v), 3, color.filled())),
    )?;
    Ok(())
}

fn draw_heatmap(
    area: &Area,
    theme: &ChartTheme,
    title: &str,
    axes: Axes,
    table: &CrossTab<String, String>,
) -> Result<(), RenderError> {
    let (nr, nc) = (table.rows.len(), table.cols.len());
    let mut chart = ChartBuilder::on(area)
        .caption(title, TITLE_FONT)
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(90)
        .build_cartesian_2d(
            -0.5f64..(nc.max(1) as f64 - 0.5),
            -0.5f64..(nr.max(1) as f64 - 0.5),
        )?;

    chart.plotting_area().fill(&theme.background)?;
    // Row 0 is drawn at the top.
    let row_labels: Vec<String> = table.rows.iter().rev().cloned().collect();
    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(nc + 1)
        .y_labels(nr + 1)
        .x_label_formatter(&|x: &f64| label_at(&table.cols, *x))
        .y_label_formatter(&|y: &f64| label_at(&row_labels, *y))
        .x_desc(axes.0)
        .y_desc(axes.1)
        .label_style(LABEL_FONT)
        .axis_desc_style(AXIS_FONT)
        .draw()?;

    let max = table.max_cell().max(1) as f64;
    let cells: Vec<(f64, f64, usize)> = table
        .cells
        .iter()
        .enumerate()
        .flat_map(|(r, row)| {
            let y = (nr - 1 - r) as f64;
            row.iter()
                .enumerate()
                .map(move |(c, &count)| (c as f64, y, count))
        })
        .collect();

    chart.draw_series(cells.iter().map(|&(x, y, count)| {
        Rectangle::new(
            [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)],
            heat_color(count as f64 / max).filled(),
        )
    }))?;
    chart.draw_series(cells.iter().map(|&(x, y, count)| {
        let text_color = if count as f64 / max > 0.5 { WHITE } else { BLACK };
        Text::new(
            count.to_string(),
            (x, y),
            ("sans-serif", 14)
                .into_font()
                .color(&text_color)
                .pos(Pos::new(HPos::Center, VPos::Center)),
        )
    }))?;
    Ok(())
}

fn draw_stacked_area(
    area: &Area,
    theme: &ChartTheme,
    title: &str,
    axes: Axes,
    table: &CrossTab<String, String>,
) -> Result<(), RenderError> {
    let nc = table.cols.len();

    // Running totals: layer r is the sum of rows 0..=r.
    let mut layers: Vec<Vec<f64>> = Vec::with_capacity(table.rows.len());
    for row in &table.cells {
        let below = layers.last().cloned().unwrap_or_else(|| vec![0.0; nc]);
        layers.push(
            row.iter()
                .zip(below)
                .map(|(&count, base)| base + count as f64)
                .collect(),
        );
    }
    let top = layers.last().cloned().unwrap_or_default();

    let mut chart = ChartBuilder::on(area)
        .caption(title, TITLE_FONT)
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(-0.5f64..(nc.max(1) as f64 - 0.5), 0f64..upper_bound(&top))?;

    chart.plotting_area().fill(&theme.background)?;
    chart
        .configure_mesh()
        .bold_line_style(theme.grid)
        .light_line_style(theme.grid)
        .x_labels(nc.clamp(1, 12))
        .x_label_formatter(&|x: &f64| label_at(&table.cols, *x))
        .x_desc(axes.0)
        .y_desc(axes.1)
        .label_style(LABEL_FONT)
        .axis_desc_style(AXIS_FONT)
        .draw()?;

    // Tallest layer first so lower layers stay visible.
    for (r, layer) in layers.iter().enumerate().rev() {
        let color = theme.color(r);
        chart
            .draw_series(AreaSeries::new(
                layer.iter().enumerate().map(|(c, v)| (c as f64, *v)),
                0.0,
                color.mix(0.8),
            ))?
            .label(table.rows[r].clone())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    if !layers.is_empty() {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }
    Ok(())
}

fn draw_grouped_bars(
    area: &Area,
    theme: &ChartTheme,
    title: &str,
    axes: Axes,
    table: &CrossTab<String, String>,
) -> Result<(), RenderError> {
    let (nr, nc) = (table.rows.len(), table.cols.len());
    let bar_width = 0.8 / nr.max(1) as f64;
    let values: Vec<f64> = table.cells.iter().flatten().map(|&c| c as f64).collect();

    let mut chart = ChartBuilder::on(area)
        .caption(title, TITLE_FONT)
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(70)
        .build_cartesian_2d(-0.5f64..(nc.max(1) as f64 - 0.5), 0f64..upper_bound(&values))?;

    chart.plotting_area().fill(&theme.background)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .bold_line_style(theme.grid)
        .light_line_style(theme.grid)
        .x_labels(nc + 1)
        .x_label_formatter(&|x: &f64| label_at(&table.cols, *x))
        .x_desc(axes.0)
        .y_desc(axes.1)
        .label_style(LABEL_FONT)
        .axis_desc_style(AXIS_FONT)
        .draw()?;

    for (r, row) in table.cells.iter().enumerate() {
        let color = theme.color(r);
        chart
            .draw_series(row.iter().enumerate().map(move |(c, &count)| {
                let left = c as f64 - 0.4 + r as f64 * bar_width;
                Rectangle::new([(left, 0.0), (left + bar_width, count as f64)], color.filled())
            }))?
            .label(table.rows[r].clone())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    if nr > 0 {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }
    Ok(())
}

fn draw_histogram(
    area: &Area,
    theme: &ChartTheme,
    title: &str,
    axes: Axes,
    bins: &[HistogramBin],
    stats: Option<&DescriptiveStats>,
) -> Result<(), RenderError> {
    let (x_min, x_max) = match (bins.first(), bins.last()) {
        (Some(first), Some(last)) => (first.lower, last.upper),
        _ => (0.0, 1.0),
    };
    let counts: Vec<f64> = bins.iter().map(|b| b.count as f64).collect();
    let y_max = upper_bound(&counts);

    let mut chart = ChartBuilder::on(area)
        .caption(title, TITLE_FONT)
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_min..x_max, 0f64..y_max)?;

    chart.plotting_area().fill(&theme.background)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .bold_line_style(theme.grid)
        .light_line_style(theme.grid)
        .x_desc(axes.0)
        .y_desc(axes.1)
        .label_style(LABEL_FONT)
        .axis_desc_style(AXIS_FONT)
        .draw()?;

    chart.draw_series(bins.iter().map(|b| {
        Rectangle::new(
            [(b.lower, 0.0), (b.upper, b.count as f64)],
            theme.primary().filled(),
        )
    }))?;
    chart.draw_series(bins.iter().map(|b| {
        Rectangle::new([(b.lower, 0.0), (b.upper, b.count as f64)], BLACK.stroke_width(1))
    }))?;

    if let Some(stats) = stats {
        let color = theme.color(2);
        chart
            .draw_series(LineSeries::new(
                vec![(stats.mean, 0.0), (stats.mean, y_max)],
                color.stroke_width(2),
            ))?
            .label(format!("Mean: {:.1}", stats.mean))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }
    Ok(())
}

fn draw_scatter(
    area: &Area,
    theme: &ChartTheme,
    title: &str,
    axes: Axes,
    points: &[GapPoint],
) -> Result<(), RenderError> {
    let (x_min, x_max) = points
        .iter()
        .map(|p| p.release_year)
        .fold(None, |acc: Option<(i32, i32)>, year| match acc {
            Some((lo, hi)) => Some((lo.min(year), hi.max(year))),
            None => Some((year, year)),
        })
        .unwrap_or((0, 1));
    let y_max = points.iter().map(|p| p.gap).max().unwrap_or(0);

    let mut chart = ChartBuilder::on(area)
        .caption(title, TITLE_FONT)
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(
            f64::from(x_min - 1)..f64::from(x_max + 1),
            0f64..f64::from(y_max + 1),
        )?;

    chart.plotting_area().fill(&theme.background)?;
    chart
        .configure_mesh()
        .bold_line_style(theme.grid)
        .light_line_style(theme.grid)
        .x_label_formatter(&|x: &f64| format!("{:.0}", x))
        .x_desc(axes.0)
        .y_desc(axes.1)
        .label_style(LABEL_FONT)
        .axis_desc_style(AXIS_FONT)
        .draw()?;

    for (idx, title_type) in TitleType::ALL.iter().enumerate() {
        let color = theme.color(idx);
        chart
            .draw_series(
                points
                    .iter()
                    .filter(|p| p.title_type == *title_type)
                    .map(|p| {
                        Circle::new(
                            (f64::from(p.release_year), f64::from(p.gap)),
                            3,
                            color.mix(0.5).filled(),
                        )
                    }),
            )?
            .label(title_type.label())
            .legend(move |(x, y)| Circle::new((x, y), 5, color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn label_at_only_labels_integer_ticks() {
        let names = labels(&["2019", "2020"]);
        assert_eq!(label_at(&names, 0.0), "2019");
        assert_eq!(label_at(&names, 1.0), "2020");
        assert_eq!(label_at(&names, 0.5), "");
        assert_eq!(label_at(&names, -1.0), "");
        assert_eq!(label_at(&names, 2.0), "");
    }

    #[test]
    fn reversed_segment_labels_put_first_on_top() {
        let names = labels(&["first", "second", "third"]);
        assert_eq!(segment_label_reversed(&names, &SegmentValue::CenterOf(2)), "first");
        assert_eq!(segment_label_reversed(&names, &SegmentValue::CenterOf(0)), "third");
        assert_eq!(segment_label_reversed(&names, &SegmentValue::CenterOf(3)), "");
        assert_eq!(segment_label(&names, &SegmentValue::CenterOf(1)), "second");
    }

    #[test]
    fn absent_mean_draws_no_bar() {
        let means = [Some(104.5), None, Some(0.0)];
        assert_eq!(bar_data(&means), vec![(0, 104.5), (2, 0.0)]);
        assert!(bar_data(&[None, None]).is_empty());
    }

    #[test]
    fn upper_bound_has_headroom() {
        assert_eq!(upper_bound(&[]), 1.0);
        assert_eq!(upper_bound(&[0.0]), 1.0);
        assert!((upper_bound(&[10.0, 5.0]) - 11.0).abs() < 1e-9);
    }

    #[test]
    fn heat_color_endpoints() {
        let low = heat_color(0.0);
        let high = heat_color(1.0);
        assert_eq!((low.0, low.1, low.2), (255, 245, 240));
        assert_eq!((high.0, high.1, high.2), (103, 0, 13));
    }
}
