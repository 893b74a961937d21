//! # Report Module
//!
//! Presentation of a [`MonthlyHistogram`]:
//!
//! - [`render`] builds chart models: one combined chart with a series per
//!   year, and one chart per year.
//! - [`write_svg`] / [`write_all`] draw those models to SVG with `plotters`.
//! - [`format_table`] prints counts and percentages as text.
//!
//! Nothing here changes the numbers; it only lays them out.

use crate::histogram::{Month, MonthlyHistogram};
use anyhow::{Context, Result};
use log::{debug, info};
use plotters::prelude::*;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

pub const X_LABEL: &str = "Months";
pub const Y_LABEL: &str = "No. of Listens";

/// File stem of the combined chart.
pub const COMBINED_STEM: &str = "new_listens_monthly";

/// One named series of bar values, one value per category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Series {
    pub name: String,
    pub values: Vec<u64>,
}

/// A bar chart ready to be drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarChart {
    pub title: String,
    /// Output file name without extension.
    pub file_stem: String,
    pub categories: Vec<&'static str>,
    pub series: Vec<Series>,
    pub x_label: &'static str,
    pub y_label: &'static str,
}

impl BarChart {
    fn new(title: String, file_stem: String, series: Vec<Series>) -> Self {
        Self {
            title,
            file_stem,
            categories: Month::ALL.iter().map(|m| m.label()).collect(),
            series,
            x_label: X_LABEL,
            y_label: Y_LABEL,
        }
    }

    pub fn max_value(&self) -> u64 {
        self.series
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .max()
            .unwrap_or(0)
    }
}

/// Charts produced from one histogram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCharts {
    pub combined: BarChart,
    pub per_year: Vec<BarChart>,
}

impl RenderedCharts {
    pub fn iter(&self) -> impl Iterator<Item = &BarChart> {
        std::iter::once(&self.combined).chain(self.per_year.iter())
    }
}

/// Build the combined chart and one chart per year.
///
/// The combined chart has one series per year; its title spans the first
/// and last year. Nothing is drawn here, see [`write_all`].
///
/// # Examples
///
/// ```
/// use newlistens::histogram::aggregate;
/// use newlistens::report::render;
///
/// let charts = render(&aggregate(&[]));
/// assert!(charts.per_year.is_empty());
/// assert_eq!(charts.combined.title, "New Monthly Listens on Spotify");
/// ```
pub fn render(histogram: &MonthlyHistogram) -> RenderedCharts {
    let series: Vec<Series> = histogram
        .rows()
        .iter()
        .map(|row| Series {
            name: row.year.clone(),
            values: row.counts.to_vec(),
        })
        .collect();

    let span = match (series.first(), series.last()) {
        (Some(first), Some(last)) if first.name != last.name => format!(" {}-{}", first.name, last.name),
        (Some(only), _) => format!(" {}", only.name),
        _ => String::new(),
    };
    let combined = BarChart::new(
        format!("New Monthly Listens on Spotify{span}"),
        COMBINED_STEM.to_string(),
        series.clone(),
    );

    let per_year = series
        .into_iter()
        .map(|s| {
            BarChart::new(
                format!("New Song Listens per Month on Spotify in {}", s.name),
                format!("new_listens_{}", s.name),
                vec![s],
            )
        })
        .collect();

    RenderedCharts { combined, per_year }
}

/// Draw one chart as an SVG file.
///
/// Bars of different series are grouped side by side within each month.
/// Charts with more than one series get a legend.
///
/// # Errors
///
/// Fails if plotters cannot lay out the chart or the file cannot be written.
pub fn write_svg(chart: &BarChart, path: &Path, size: (u32, u32)) -> Result<()> {
    debug!("Drawing `{}` to {}", chart.title, path.display());
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let categories = chart.categories.len();
    // Leave headroom above the tallest bar; an empty chart still gets an axis.
    let y_max = (chart.max_value() as f64 * 1.1).max(1.0);

    let mut ctx = ChartBuilder::on(&root)
        .caption(&chart.title, ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5f64..categories as f64 - 0.5, 0f64..y_max)?;

    let labels = chart.categories.clone();
    ctx.configure_mesh()
        .disable_x_mesh()
        .x_labels(categories)
        .x_label_formatter(&|x: &f64| {
            let i = x.round();
            if i >= 0.0 && (i as usize) < labels.len() {
                labels[i as usize].to_string()
            } else {
                String::new()
            }
        })
        .y_label_formatter(&|y: &f64| format!("{y:.0}"))
        .x_desc(chart.x_label)
        .y_desc(chart.y_label)
        .draw()?;

    let group_width = 0.8;
    let bar_width = group_width / chart.series.len().max(1) as f64;
    for (s_idx, series) in chart.series.iter().enumerate() {
        let color = Palette99::pick(s_idx).to_rgba();
        let offset = -group_width / 2.0 + s_idx as f64 * bar_width;
        let bars = series.values.iter().enumerate().map(move |(i, value)| {
            let x0 = i as f64 + offset;
            Rectangle::new([(x0, 0.0), (x0 + bar_width, *value as f64)], color.filled())
        });

        ctx.draw_series(bars)?
            .label(series.name.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    if chart.series.len() > 1 {
        ctx.configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }

    root.present()
        .with_context(|| format!("Failed to write chart {}", path.display()))?;
    Ok(())
}

/// Write every chart into `out_dir` as `<file_stem>.svg`.
///
/// `out_dir` is created if needed. Returns the written paths, combined chart
/// first.
///
/// # Errors
///
/// Fails if the directory cannot be created or any chart fails to write;
/// charts already written are left in place.
pub fn write_all(charts: &RenderedCharts, out_dir: &Path, size: (u32, u32)) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    let mut written = Vec::new();
    for chart in charts.iter() {
        let path = out_dir.join(format!("{}.svg", chart.file_stem));
        write_svg(chart, &path, size)?;
        written.push(path);
    }
    info!("Wrote {} chart(s) to {}", written.len(), out_dir.display());
    Ok(written)
}

/// Fixed-width table: one line per month, a count and percentage column
/// per year, then totals.
pub fn format_table(histogram: &MonthlyHistogram) -> String {
    let mut out = String::new();
    if histogram.is_empty() {
        let _ = writeln!(out, "No dated stream events found.");
        return out;
    }

    let _ = write!(out, "{:<6}", "Month");
    for year in histogram.years() {
        let _ = write!(out, " {:>8} {:>8}", year, "%");
    }
    out.push('\n');

    for month in Month::ALL {
        let _ = write!(out, "{:<6}", month.label());
        for row in histogram.rows() {
            let i = month.index();
            let _ = write!(out, " {:>8} {:>7.2}%", row.counts[i], row.percentages[i]);
        }
        out.push('\n');
    }

    let _ = write!(out, "{:<6}", "Total");
    for row in histogram.rows() {
        let _ = write!(out, " {:>8} {:>8}", row.total(), "");
    }
    out.push('\n');

    let _ = writeln!(
        out,
        "{} new song listens out of {} stream events",
        histogram.total_new_listens(),
        histogram.total_events()
    );
    if histogram.skipped() > 0 {
        let _ = writeln!(out, "{} new listens skipped for malformed timestamps", histogram.skipped());
    }
    out
}
