//! Line charts of monthly mean climbs, one line per grade.

use std::collections::HashMap;
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::error::{LogError, Result};
use crate::model::MonthlyAggregate;

pub const CHART_TITLE: &str = "Evolution of Average n_climbs Across Months by difficulty";
const X_DESC: &str = "Month-Year";
const Y_DESC: &str = "Average n_climbs";
const CHART_SIZE: (u32, u32) = (1200, 600);

/// Image format charts are written in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChartFormat {
    Png,
    Svg,
}

impl ChartFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ChartFormat::Png => "png",
            ChartFormat::Svg => "svg",
        }
    }
}

/// Points of one grade, ordered by month.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub label: String,
    pub points: Vec<(NaiveDate, f64)>,
}

/// Everything needed to draw one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub title: String,
    pub series: Vec<ChartSeries>,
}

impl ChartData {
    /// Groups aggregates into one series per label, following `order`.
    ///
    /// `order` fixes legend position and colour assignment. Labels without
    /// any aggregate are left out, as are aggregates whose label is not listed.
    pub fn build(title: &str, aggregates: &[MonthlyAggregate], order: &[String]) -> Self {
        let mut by_label: HashMap<&str, Vec<(NaiveDate, f64)>> = HashMap::new();
        for aggregate in aggregates {
            by_label
                .entry(aggregate.difficulty.as_str())
                .or_default()
                .push((aggregate.month, aggregate.mean_n_climbs));
        }

        let series = order
            .iter()
            .filter_map(|label| {
                let mut points = by_label.remove(label.as_str())?;
                points.sort_by_key(|(month, _)| *month);
                Some(ChartSeries {
                    label: label.clone(),
                    points,
                })
            })
            .collect();

        Self {
            title: title.to_string(),
            series,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    fn month_span(&self) -> (i32, i32) {
        let mut months = self
            .series
            .iter()
            .flat_map(|series| series.points.iter().map(|(month, _)| month_index(*month)));
        let first = months.next().unwrap_or(0);
        months.fold((first, first), |(lo, hi), idx| (lo.min(idx), hi.max(idx)))
    }

    fn y_max(&self) -> f64 {
        let max = self
            .series
            .iter()
            .flat_map(|series| series.points.iter().map(|(_, value)| *value))
            .fold(0.0, f64::max);
        (max * 1.1).max(1.0)
    }
}

/// Renders `data` to `path` in the given format.
pub fn render(data: &ChartData, path: &Path, format: ChartFormat) -> Result<()> {
    match format {
        ChartFormat::Png => {
            let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
            draw_chart(root, data)
        }
        ChartFormat::Svg => {
            let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
            draw_chart(root, data)
        }
    }
}

fn draw_chart<DB>(root: DrawingArea<DB, Shift>, data: &ChartData) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(chart_error)?;

    let (first, last) = data.month_span();
    let x_range = if last > first {
        first..last
    } else {
        first..first + 1
    };

    let mut chart = ChartBuilder::on(&root)
        .caption(&data.title, ("sans-serif", 26))
        .margin(25)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 70)
        .build_cartesian_2d(x_range, 0.0..data.y_max())
        .map_err(chart_error)?;

    let tick_count = usize::try_from(last - first + 1).unwrap_or(1);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .light_line_style(WHITE)
        .bold_line_style(BLACK.mix(0.2))
        .x_labels(tick_count)
        .x_label_formatter(&|idx| month_label(*idx))
        .x_desc(X_DESC)
        .y_desc(Y_DESC)
        .draw()
        .map_err(chart_error)?;

    for (idx, series) in data.series.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        let points: Vec<(i32, f64)> = series
            .points
            .iter()
            .map(|(month, value)| (month_index(*month), *value))
            .collect();

        chart
            .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))
            .map_err(chart_error)?
            .label(series.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));

        chart
            .draw_series(
                points
                    .iter()
                    .map(|point| Circle::new(*point, 4, color.filled())),
            )
            .map_err(chart_error)?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(chart_error)?;

    root.present().map_err(chart_error)?;
    Ok(())
}

fn month_index(month: NaiveDate) -> i32 {
    month.year() * 12 + month.month0() as i32
}

fn month_label(idx: i32) -> String {
    format!("{}-{:02}", idx.div_euclid(12), idx.rem_euclid(12) + 1)
}

fn chart_error(err: impl std::fmt::Display) -> LogError {
    LogError::Chart(err.to_string())
}
