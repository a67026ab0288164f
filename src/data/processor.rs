//! Data Processor Module
//! Derives latest-period metrics, year-filtered series and the year-by-month pivot.

use crate::data::table::{month_abbrev, PeriodKey, Record, Selection, Table};
use chrono::Months;
use polars::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Placeholder for an absent pivot cell.
pub const EMPTY_CELL: &str = "-";

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("Dataset is empty")]
    EmptyDataset,
    #[error("No record for comparison period {0}")]
    MissingComparisonPeriod(chrono::NaiveDate),
    #[error("Polars error: {0}")]
    Frame(#[from] PolarsError),
}

/// Latest value and its changes against the comparison periods.
#[derive(Debug)]
pub struct LatestMetrics {
    pub latest: Record,
    pub delta_month: Result<f64, TransformError>,
    pub delta_year: Result<f64, TransformError>,
}

/// A record annotated with its derived period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub record: Record,
    pub period: PeriodKey,
}

/// Dense year-by-month grid. `rows[i][m]` is month `m + 1` of `years[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Pivot {
    pub years: Vec<i32>,
    pub rows: Vec<[Option<f64>; 12]>,
}

impl Pivot {
    /// "Jan" .. "Dec"
    pub fn columns() -> Vec<&'static str> {
        (1..=12).map(month_abbrev).collect()
    }

    /// Row labels and display strings for every cell.
    pub fn formatted(&self) -> FormattedPivot {
        FormattedPivot {
            columns: Self::columns().into_iter().map(String::from).collect(),
            rows: self
                .years
                .iter()
                .zip(&self.rows)
                .map(|(year, cells)| {
                    (
                        format_year(*year),
                        cells.iter().map(|c| format_cell(*c)).collect(),
                    )
                })
                .collect(),
        }
    }
}

/// Pivot ready for display.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormattedPivot {
    pub columns: Vec<String>,
    pub rows: Vec<(String, Vec<String>)>,
}

/// Pure transformations over a loaded table.
pub struct DataProcessor;

impl DataProcessor {
    /// Latest record with changes from the previous month and the same month last year.
    pub fn latest_metrics(table: &Table) -> Result<LatestMetrics, TransformError> {
        let latest = *table
            .records
            .iter()
            .reduce(|best, r| if r.date > best.date { r } else { best })
            .ok_or(TransformError::EmptyDataset)?;

        let delta_against = |months: u32| -> Result<f64, TransformError> {
            // Day is clamped to the end of shorter months
            let target = latest
                .date
                .checked_sub_months(Months::new(months))
                .ok_or(TransformError::MissingComparisonPeriod(latest.date))?;
            table
                .find(target)
                .map(|prev| latest.value - prev.value)
                .ok_or(TransformError::MissingComparisonPeriod(target))
        };

        Ok(LatestMetrics {
            latest,
            delta_month: delta_against(1),
            delta_year: delta_against(12),
        })
    }

    /// Records whose year is selected, in table order.
    pub fn filter_series(table: &Table, selection: &Selection) -> Vec<SeriesPoint> {
        table
            .records
            .iter()
            .map(|record| SeriesPoint {
                record: *record,
                period: record.period(),
            })
            .filter(|p| selection.contains(p.period.year))
            .collect()
    }

    /// Split a series into one ordered run per year, years ascending.
    pub fn group_by_year(series: &[SeriesPoint]) -> Vec<(i32, Vec<SeriesPoint>)> {
        let mut by_year: BTreeMap<i32, Vec<SeriesPoint>> = BTreeMap::new();
        for point in series {
            by_year.entry(point.period.year).or_default().push(*point);
        }
        by_year.into_iter().collect()
    }

    /// Distinct years present in the table, ascending.
    pub fn available_years(table: &Table) -> Vec<i32> {
        table
            .records
            .iter()
            .map(|r| r.period().year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Convert the table to a frame with `year`, `month` and `value` columns.
    pub fn to_frame(table: &Table) -> Result<DataFrame, TransformError> {
        let mut years: Vec<i32> = Vec::with_capacity(table.len());
        let mut months: Vec<u32> = Vec::with_capacity(table.len());
        let mut values: Vec<f64> = Vec::with_capacity(table.len());

        for record in &table.records {
            let key = record.period();
            years.push(key.year);
            months.push(key.month);
            values.push(record.value);
        }

        let df = DataFrame::new(vec![
            Column::new("year".into(), years),
            Column::new("month".into(), months),
            Column::new("value".into(), values),
        ])?;
        Ok(df)
    }

    /// Dense pivot over every year of the full table; duplicate periods are averaged.
    pub fn pivot(table: &Table) -> Result<Pivot, TransformError> {
        if table.is_empty() {
            return Err(TransformError::EmptyDataset);
        }

        let grouped = Self::to_frame(table)?
            .lazy()
            .group_by([col("year"), col("month")])
            .agg([col("value").mean().alias("mean")])
            .collect()?;

        let years = Self::available_years(table);
        let mut rows = vec![[None; 12]; years.len()];

        let year_ca = grouped.column("year")?.i32()?;
        let month_ca = grouped.column("month")?.u32()?;
        let mean_ca = grouped.column("mean")?.f64()?;

        for ((year, month), mean) in year_ca
            .into_iter()
            .zip(month_ca.into_iter())
            .zip(mean_ca.into_iter())
        {
            if let (Some(year), Some(month), Some(mean)) = (year, month, mean) {
                if let (Ok(row), Some(slot)) = (years.binary_search(&year), month.checked_sub(1)) {
                    rows[row][slot as usize] = Some(mean);
                }
            }
        }

        Ok(Pivot { years, rows })
    }
}

/// "5.50%"
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

/// "+0.50%" / "-1.25%"
pub fn format_delta(value: f64) -> String {
    format!("{:+.2}%", value)
}

/// Pivot cell text; absent cells become the placeholder.
pub fn format_cell(value: Option<f64>) -> String {
    value.map(format_percent).unwrap_or_else(|| EMPTY_CELL.to_string())
}

/// Year label without thousands separators.
pub fn format_year(year: i32) -> String {
    year.to_string()
}
