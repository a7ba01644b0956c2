use crate::error::Result;
use crate::model::LongRecord;

const COLUMNS: [&str; 3] = ["date", "n_climbs", "difficulty"];

/// Formats the long table as right-aligned text columns with a row index.
pub fn render_table(records: &[LongRecord]) -> String {
    let cells: Vec<[String; 3]> = records
        .iter()
        .map(|record| {
            [
                record.date.format("%Y-%m-%d").to_string(),
                record.n_climbs.to_string(),
                record.difficulty.clone(),
            ]
        })
        .collect();

    let index_width = records.len().saturating_sub(1).to_string().len();
    let mut widths = COLUMNS.map(str::len);
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = format_row("", COLUMNS.as_slice(), &widths, index_width);
    for (idx, row) in cells.iter().enumerate() {
        out.push_str(&format_row(&idx.to_string(), row.as_slice(), &widths, index_width));
    }
    out.push_str(&format!(
        "\n[{} rows x {} columns]\n",
        records.len(),
        COLUMNS.len()
    ));
    out
}

fn format_row<S: AsRef<str>>(
    index: &str,
    cells: &[S],
    widths: &[usize],
    index_width: usize,
) -> String {
    let mut line = format!("{index:<index_width$}");
    for (cell, &width) in cells.iter().zip(widths) {
        line.push_str(&format!("  {:>width$}", cell.as_ref()));
    }
    line.push('\n');
    line
}

/// Serialises the long table as a pretty-printed JSON array.
pub fn render_json(records: &[LongRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}
