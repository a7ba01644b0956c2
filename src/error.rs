use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, LogError>;

/// Error type covering the different failure cases that can occur while the
/// logbook is ingested, aggregated, or rendered.
#[derive(Debug, Error)]
pub enum LogError {
    /// Wrapper for IO failures such as reading the workbook or writing charts.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when the long table cannot be serialised as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Raised when a sheet does not follow the logbook layout.
    #[error("invalid workbook structure: {0}")]
    InvalidWorkbook(String),

    /// Raised when a sheet name is not of the form `MMYY`.
    #[error("sheet '{sheet}' is not a valid MMYY name: {reason}")]
    InvalidSheetName { sheet: String, reason: String },

    /// Raised when a day column does not exist in the sheet's month.
    #[error("sheet '{sheet}': {year:04}-{month:02}-{day:02} is not a calendar date")]
    InvalidDate {
        sheet: String,
        year: i32,
        month: u32,
        day: u32,
    },

    /// Raised when a column header cannot be read as a day of the month.
    #[error("sheet '{sheet}': column {column} has header '{value}', expected a day number")]
    InvalidDayHeader {
        sheet: String,
        column: usize,
        value: String,
    },

    /// Raised when a cell holds something other than a non-negative whole count.
    #[error("sheet '{sheet}': grade '{label}' on day {day} has invalid count '{value}'")]
    InvalidCount {
        sheet: String,
        label: String,
        day: u32,
        value: String,
    },

    /// Raised when plotting a chart fails.
    #[error("chart rendering error: {0}")]
    Chart(String),

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
