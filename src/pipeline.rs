use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::aggregate::{monthly_means, partition};
use crate::chart::{self, CHART_TITLE, ChartData, ChartFormat};
use crate::error::{LogError, Result};
use crate::grade::{Category, sort_labels};
use crate::io::excel_read;
use crate::model::LongRecord;
use crate::report;
use crate::reshape::{WideSheet, melt};

/// Categories that get a chart, with the file stem each is written to.
pub const CHART_TARGETS: [(Category, &str); 2] = [
    (Category::NumericGroup, "numeric_grades"),
    (Category::AlphaGroup, "alpha_grades"),
];

/// How the long table is printed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TableFormat {
    Table,
    Json,
}

/// Settings for one batch run.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub input: PathBuf,
    pub out_dir: PathBuf,
    /// `None` skips chart rendering.
    pub chart_format: Option<ChartFormat>,
    pub table_format: TableFormat,
}

/// Reads a logbook workbook and returns its long table.
#[instrument(level = "info", skip_all, fields(input = %input.display()))]
pub fn load_logbook(input: &Path) -> Result<Vec<LongRecord>> {
    let sheets = excel_read::read_sheets(input)?;
    info!(sheet_count = sheets.len(), "read workbook");
    melt_sheets(&sheets)
}

/// Melts every sheet and concatenates the results in sheet order.
///
/// The first failing sheet aborts the whole run.
pub fn melt_sheets(sheets: &[WideSheet]) -> Result<Vec<LongRecord>> {
    let mut records = Vec::new();
    for sheet in sheets {
        let melted = melt(sheet)?;
        debug!(sheet = %sheet.name, records = melted.len(), "melted sheet");
        records.extend(melted);
    }
    info!(record_count = records.len(), "built long table");
    Ok(records)
}

/// Aggregates one category and orders its labels for plotting.
pub fn category_chart(records: &[LongRecord], category: Category) -> ChartData {
    let subset: Vec<LongRecord> = records
        .iter()
        .filter(|record| record.category() == category)
        .cloned()
        .collect();
    chart_for_subset(&subset, category)
}

/// Builds the chart of records already restricted to `category`.
fn chart_for_subset(subset: &[LongRecord], category: Category) -> ChartData {
    let aggregates = monthly_means(subset, category);
    let order = sort_labels(subset.iter().map(|record| record.difficulty.as_str()));
    debug!(%category, labels = order.len(), months = aggregates.len(), "aggregated category");
    ChartData::build(CHART_TITLE, &aggregates, &order)
}

/// Renders one chart per entry of [`CHART_TARGETS`] into `out_dir`.
///
/// Categories without records are skipped. Returns the written paths.
#[instrument(level = "info", skip_all, fields(out_dir = %out_dir.display()))]
pub fn render_charts(
    records: &[LongRecord],
    out_dir: &Path,
    format: ChartFormat,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)?;

    let split = partition(records);
    let mut written = Vec::new();
    for (category, stem) in CHART_TARGETS {
        let data = chart_for_subset(split.get(category), category);
        if data.is_empty() {
            info!(%category, "no records, chart skipped");
            continue;
        }
        let path = out_dir.join(format!("{stem}.{}", format.extension()));
        chart::render(&data, &path, format)?;
        info!(%category, path = %path.display(), "chart written");
        written.push(path);
    }
    Ok(written)
}

/// Runs the whole batch: ingest, print the long table to `out`, render charts.
pub fn run(config: &RunConfig, out: &mut impl Write) -> Result<Vec<PathBuf>> {
    if !config.input.exists() {
        return Err(LogError::MissingInput(config.input.clone()));
    }

    let records = load_logbook(&config.input)?;
    let printed = match config.table_format {
        TableFormat::Table => report::render_table(&records),
        TableFormat::Json => report::render_json(&records)?,
    };
    writeln!(out, "{printed}")?;

    match config.chart_format {
        Some(format) => render_charts(&records, &config.out_dir, format),
        None => Ok(Vec::new()),
    }
}
