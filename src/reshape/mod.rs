//! Melting of wide monthly sheets into long records.
//!
//! A logbook sheet is a grid: grades down the `Datum` column, days of the
//! month across the header row, climb counts in the cells. [`melt`] turns one
//! such grid into [`LongRecord`]s, dropping empty and zero cells since those
//! mean "no session" rather than "zero climbs".

use crate::error::{LogError, Result};
use crate::model::{LongRecord, SheetPeriod};

/// Header of the column holding the difficulty labels.
pub const LABEL_HEADER: &str = "Datum";

/// Years in sheet names are offsets from this one.
pub const CENTURY_BASE: i32 = 2000;

/// A cell value as read from the workbook, independent of the reader.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
    Error(String),
}

impl Cell {
    /// Textual form of the cell as written. Whole numbers lose their
    /// fractional part.
    pub fn to_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Number(value) => value.to_string(),
            Cell::Text(value) => value.clone(),
            Cell::Error(value) => value.clone(),
        }
    }
}

/// One sheet of the logbook in its wide layout.
#[derive(Debug, Clone, PartialEq)]
pub struct WideSheet {
    pub name: String,
    pub header: Vec<Cell>,
    pub rows: Vec<Vec<Cell>>,
}

/// Reads the month and year encoded in an `MMYY` sheet name.
pub fn parse_sheet_name(name: &str) -> Result<SheetPeriod> {
    let invalid = |reason: &str| LogError::InvalidSheetName {
        sheet: name.to_string(),
        reason: reason.to_string(),
    };

    if name.len() != 4 || !name.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(invalid("expected exactly four digits"));
    }

    let month: u32 = name[..2]
        .parse()
        .map_err(|_| invalid("month is not a number"))?;
    let year_offset: i32 = name[2..]
        .parse()
        .map_err(|_| invalid("year is not a number"))?;

    if !(1..=12).contains(&month) {
        return Err(invalid("month must be between 01 and 12"));
    }

    Ok(SheetPeriod {
        year: CENTURY_BASE + year_offset,
        month,
    })
}

/// Converts one wide sheet into long records.
///
/// Records are emitted column by column (day), then row by row (grade).
pub fn melt(sheet: &WideSheet) -> Result<Vec<LongRecord>> {
    let period = parse_sheet_name(&sheet.name)?;
    let days = day_columns(sheet)?;

    let mut records = Vec::new();
    for (col_idx, day) in days {
        for row in &sheet.rows {
            let label = match row.first() {
                Some(Cell::Error(value)) => {
                    return Err(LogError::InvalidWorkbook(format!(
                        "sheet '{}': grade cell holds error '{value}'",
                        sheet.name
                    )));
                }
                Some(cell) => cell.to_text(),
                None => continue,
            };
            if label.trim().is_empty() {
                continue;
            }

            let cell = row.get(col_idx).unwrap_or(&Cell::Empty);
            let Some(n_climbs) = parse_count(cell, &sheet.name, &label, day)? else {
                continue;
            };

            let date = period.date(day).ok_or_else(|| LogError::InvalidDate {
                sheet: sheet.name.clone(),
                year: period.year,
                month: period.month,
                day,
            })?;

            records.push(LongRecord::new(date, label, n_climbs));
        }
    }

    Ok(records)
}

fn day_columns(sheet: &WideSheet) -> Result<Vec<(usize, u32)>> {
    let label_header = sheet.header.first().map(Cell::to_text).unwrap_or_default();
    if label_header.trim() != LABEL_HEADER {
        return Err(LogError::InvalidWorkbook(format!(
            "sheet '{}': first header is '{label_header}', expected '{LABEL_HEADER}'",
            sheet.name
        )));
    }

    let mut days = Vec::with_capacity(sheet.header.len().saturating_sub(1));
    for (col_idx, cell) in sheet.header.iter().enumerate().skip(1) {
        let invalid = || LogError::InvalidDayHeader {
            sheet: sheet.name.clone(),
            column: col_idx + 1,
            value: cell.to_text(),
        };

        let day = match cell {
            Cell::Empty => continue,
            Cell::Text(text) if text.trim().is_empty() => continue,
            Cell::Number(value) => whole_number(*value).ok_or_else(invalid)?,
            Cell::Text(text) => text.trim().parse::<u32>().map_err(|_| invalid())?,
            Cell::Error(_) => return Err(invalid()),
        };
        days.push((col_idx, day));
    }

    Ok(days)
}

/// Reads a climb count. `None` means the cell records no session.
fn parse_count(cell: &Cell, sheet: &str, label: &str, day: u32) -> Result<Option<u32>> {
    let invalid = || LogError::InvalidCount {
        sheet: sheet.to_string(),
        label: label.to_string(),
        day,
        value: cell.to_text(),
    };

    let value = match cell {
        Cell::Empty => return Ok(None),
        Cell::Text(text) if text.trim().is_empty() => return Ok(None),
        Cell::Number(value) => *value,
        Cell::Text(text) => text.trim().parse::<f64>().map_err(|_| invalid())?,
        Cell::Error(_) => return Err(invalid()),
    };

    match whole_number(value) {
        Some(0) => Ok(None),
        Some(count) => Ok(Some(count)),
        None => Err(invalid()),
    }
}

fn whole_number(value: f64) -> Option<u32> {
    if value.is_finite() && value.fract() == 0.0 && value >= 0.0 && value <= f64::from(u32::MAX)
    {
        Some(value as u32)
    } else {
        None
    }
}
