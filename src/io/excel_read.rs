use std::path::Path;

use calamine::{DataType, Reader, Xlsx, open_workbook};
use tracing::debug;

use crate::error::{LogError, Result};
use crate::reshape::{Cell, WideSheet};

/// Reads every sheet of a logbook workbook in workbook order.
pub fn read_sheets(path: &Path) -> Result<Vec<WideSheet>> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;

    let names = workbook.sheet_names().to_vec();
    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        let range = read_required_sheet(&mut workbook, &name)?;
        let sheet = range_to_sheet(name, &range);
        debug!(sheet = %sheet.name, rows = sheet.rows.len(), "read sheet");
        sheets.push(sheet);
    }

    Ok(sheets)
}

fn read_required_sheet<R: std::io::Read + std::io::Seek>(
    workbook: &mut Xlsx<R>,
    name: &str,
) -> Result<calamine::Range<DataType>> {
    let range_result = workbook
        .worksheet_range(name)
        .ok_or_else(|| LogError::InvalidWorkbook(format!("missing sheet '{name}'")))?;
    let range = range_result.map_err(LogError::from)?;
    Ok(range)
}

fn range_to_sheet(name: String, range: &calamine::Range<DataType>) -> WideSheet {
    let mut rows = range
        .rows()
        .map(|row| row.iter().map(to_cell).collect::<Vec<_>>());
    let header = rows.next().unwrap_or_default();
    WideSheet {
        name,
        header,
        rows: rows.collect(),
    }
}

fn to_cell(cell: &DataType) -> Cell {
    match cell {
        DataType::Empty => Cell::Empty,
        DataType::Float(value) => Cell::Number(*value),
        DataType::Int(value) => Cell::Number(*value as f64),
        DataType::String(value) => Cell::Text(value.clone()),
        DataType::Error(error) => Cell::Error(error.to_string()),
        other => Cell::Text(other.to_string()),
    }
}
