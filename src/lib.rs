//! Core library for the climb-log command line application.
//!
//! A climbing logbook is kept as an Excel workbook with one sheet per month.
//! The modules follow the flow of a run: [`io`] reads the workbook, [`reshape`]
//! melts each wide sheet into long records, [`grade`] classifies and orders
//! difficulty labels, [`aggregate`] computes monthly means per taxonomy, and
//! [`chart`] draws them. [`pipeline`] ties the steps together for the binary.

pub mod aggregate;
pub mod chart;
pub mod error;
pub mod grade;
pub mod io;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod reshape;

pub use error::{LogError, Result};
