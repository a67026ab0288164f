//! Indicator Table Model
//! Typed records loaded from one workbook sheet plus derived period keys.

use chrono::{Datelike, Local, NaiveDate};
use std::collections::BTreeSet;

/// Full month names, January first.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// One observation of the measure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record {
    pub date: NaiveDate,
    /// Decimal percentage, e.g. 5.5 for 5.50%
    pub value: f64,
}

impl Record {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }

    pub fn period(&self) -> PeriodKey {
        PeriodKey::from_date(self.date)
    }
}

/// (year, month) pair used for chart grouping and pivot indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PeriodKey {
    pub year: i32,
    /// 1..=12
    pub month: u32,
}

impl PeriodKey {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

/// Full name for a 1-based month number. Out-of-range numbers yield "".
pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|i| MONTH_NAMES.get(i as usize))
        .copied()
        .unwrap_or("")
}

/// Three-letter abbreviation for a 1-based month number.
pub fn month_abbrev(month: u32) -> &'static str {
    let name = month_name(month);
    name.get(..3).unwrap_or(name)
}

/// Records of one sheet in sheet row order.
#[derive(Debug, Clone, Default)]
pub struct Table {
    /// Measure column name, which doubles as the indicator name
    pub measure: String,
    pub records: Vec<Record>,
}

impl Table {
    pub fn new(measure: impl Into<String>, records: Vec<Record>) -> Self {
        Self {
            measure: measure.into(),
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First record whose date matches exactly.
    pub fn find(&self, date: NaiveDate) -> Option<&Record> {
        self.records.iter().find(|r| r.date == date)
    }
}

/// Years the user picked for the chart.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    pub years: BTreeSet<i32>,
}

impl Selection {
    pub fn new(years: impl IntoIterator<Item = i32>) -> Self {
        Self {
            years: years.into_iter().collect(),
        }
    }

    /// Selection holding only the current calendar year.
    pub fn current_year() -> Self {
        Self::new([Local::now().year()])
    }

    pub fn contains(&self, year: i32) -> bool {
        self.years.contains(&year)
    }

    /// Add the year if absent, remove it otherwise.
    pub fn toggle(&mut self, year: i32) {
        if !self.years.remove(&year) {
            self.years.insert(year);
        }
    }
}
