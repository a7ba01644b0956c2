use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::grade::{Category, classify};

/// Month and year a logbook sheet covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SheetPeriod {
    pub year: i32,
    pub month: u32,
}

impl SheetPeriod {
    /// Calendar date of `day` within the period, if it exists.
    pub fn date(&self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }
}

/// One observation of the logbook: climbs of one grade on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LongRecord {
    pub date: NaiveDate,
    pub n_climbs: u32,
    pub difficulty: String,
}

impl LongRecord {
    pub fn new(date: NaiveDate, difficulty: impl Into<String>, n_climbs: u32) -> Self {
        Self {
            date,
            n_climbs,
            difficulty: difficulty.into(),
        }
    }

    pub fn category(&self) -> Category {
        classify(&self.difficulty)
    }

    /// First day of the record's month.
    pub fn month(&self) -> NaiveDate {
        first_of_month(self.date)
    }
}

/// Mean climbs of one grade over one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyAggregate {
    pub month: NaiveDate,
    pub difficulty: String,
    pub mean_n_climbs: f64,
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}
