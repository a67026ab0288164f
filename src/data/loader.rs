//! Workbook Loader Module
//! Opens a spreadsheet workbook with calamine and extracts one indicator sheet.

use crate::data::table::{Record, Table};
use calamine::{open_workbook_auto, Data, DataType, Range, Reader};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Name of the date column every indicator sheet carries.
pub const DATE_COLUMN: &str = "Date";

/// Text date layouts accepted besides ISO date-times.
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Workbook not found: {0}")]
    SourceNotFound(String),
    #[error("Sheet '{sheet}' not found (available: {available})")]
    SheetNotFound { sheet: String, available: String },
    #[error("Schema error in sheet '{sheet}': {reason}")]
    Schema { sheet: String, reason: String },
    #[error("Failed to read workbook: {0}")]
    Workbook(#[from] calamine::Error),
}

/// Reads indicator sheets from a workbook file.
pub struct DataLoader;

impl DataLoader {
    /// Sheet names in workbook order.
    pub fn list_sheets(source_path: &Path) -> Result<Vec<String>, LoaderError> {
        Self::ensure_exists(source_path)?;
        let workbook = open_workbook_auto(source_path)?;
        Ok(workbook.sheet_names())
    }

    /// Load `sheet_name` into a table of (date, measure) records.
    pub fn load(source_path: &Path, sheet_name: &str, measure: &str) -> Result<Table, LoaderError> {
        Self::ensure_exists(source_path)?;
        let mut workbook = open_workbook_auto(source_path)?;

        let sheets = workbook.sheet_names();
        if !sheets.iter().any(|s| s == sheet_name) {
            return Err(LoaderError::SheetNotFound {
                sheet: sheet_name.to_string(),
                available: sheets.join(", "),
            });
        }

        let range = workbook.worksheet_range(sheet_name)?;
        let table = Self::parse_range(&range, sheet_name, measure)?;

        info!(
            "loaded {} records from sheet '{}' of {}",
            table.len(),
            sheet_name,
            source_path.display()
        );
        Ok(table)
    }

    fn ensure_exists(source_path: &Path) -> Result<(), LoaderError> {
        if source_path.is_file() {
            Ok(())
        } else {
            Err(LoaderError::SourceNotFound(source_path.display().to_string()))
        }
    }

    /// Parse a sheet range whose first row holds the column headers.
    fn parse_range(range: &Range<Data>, sheet: &str, measure: &str) -> Result<Table, LoaderError> {
        let schema_error = |reason: String| LoaderError::Schema {
            sheet: sheet.to_string(),
            reason,
        };

        let mut rows = range.rows();
        let header = rows
            .next()
            .ok_or_else(|| schema_error("sheet has no header row".to_string()))?;

        let date_idx = Self::find_column(header, DATE_COLUMN)
            .ok_or_else(|| schema_error(format!("missing '{}' column", DATE_COLUMN)))?;
        let value_idx = Self::find_column(header, measure)
            .ok_or_else(|| schema_error(format!("missing '{}' column", measure)))?;

        // 1-based spreadsheet row number of the header
        let header_row = range.start().map(|(r, _)| r as usize + 1).unwrap_or(1);

        let mut records = Vec::new();
        for (i, row) in rows.enumerate() {
            let row_number = header_row + i + 1;
            let date_cell = row.get(date_idx).unwrap_or(&Data::Empty);
            let value_cell = row.get(value_idx).unwrap_or(&Data::Empty);

            if row.iter().all(Self::is_blank) {
                continue;
            }

            let date = Self::parse_date(date_cell).ok_or_else(|| {
                schema_error(format!(
                    "row {}: '{}' is not a date",
                    row_number,
                    Self::cell_text(date_cell)
                ))
            })?;

            if Self::is_blank(value_cell) {
                warn!("sheet '{}' row {}: blank {} value, skipped", sheet, row_number, measure);
                continue;
            }

            let value = Self::parse_value(value_cell).ok_or_else(|| {
                schema_error(format!(
                    "row {}: '{}' is not a decimal",
                    row_number,
                    Self::cell_text(value_cell)
                ))
            })?;

            records.push(Record::new(date, value));
        }

        debug!("sheet '{}' parsed into {} records", sheet, records.len());
        Ok(Table::new(measure, records))
    }

    /// Position of a header cell, matched trimmed and case-insensitively.
    fn find_column(header: &[Data], name: &str) -> Option<usize> {
        header.iter().position(|cell| match cell {
            Data::String(s) => s.trim().eq_ignore_ascii_case(name.trim()),
            _ => false,
        })
    }

    fn is_blank(cell: &Data) -> bool {
        match cell {
            Data::Empty => true,
            Data::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    fn cell_text(cell: &Data) -> String {
        match cell {
            Data::String(s) => s.clone(),
            Data::Empty => String::new(),
            other => other.to_string(),
        }
    }

    /// Parse a date cell: native date-time, serial number, or text.
    pub fn parse_date(cell: &Data) -> Option<NaiveDate> {
        match cell {
            // calamine applies the workbook's 1900/1904 epoch
            Data::DateTime(dt) => dt.as_datetime().map(|d| d.date()),
            Data::DateTimeIso(s) => cell.as_date().or_else(|| parse_date_text(s)),
            Data::Float(f) => serial_to_date(*f),
            Data::Int(i) => serial_to_date(*i as f64),
            Data::String(s) => parse_date_text(s),
            _ => None,
        }
    }

    /// Parse a decimal cell; text may carry a trailing percent sign.
    pub fn parse_value(cell: &Data) -> Option<f64> {
        let value = match cell {
            Data::Float(f) => *f,
            Data::Int(i) => *i as f64,
            Data::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok()?,
            _ => return None,
        };
        value.is_finite().then_some(value)
    }
}

/// Convert a bare 1900-system serial day number (no date format) to a date.
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    let days = serial.floor() as i64;
    // Serial 60 is the nonexistent 1900-02-29; earlier serials are one day behind
    let epoch = if days < 61 {
        NaiveDate::from_ymd_opt(1899, 12, 31)?
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)?
    };
    epoch.checked_add_signed(Duration::try_days(days)?)
}

/// Parse a text date in one of the accepted layouts.
pub fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, fmt) {
            return Some(date);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt.date());
        }
    }
    // "January 2023" / "Jan 2023"
    let first_of_month = format!("1 {}", text);
    ["%d %B %Y", "%d %b %Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&first_of_month, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{ExcelDateTime, ExcelDateTimeType};
    use rust_xlsxwriter::{ExcelDateTime as XlsxDateTime, Format, Workbook};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn write_workbook(dir: &TempDir, rows: &[(&str, &str)]) -> PathBuf {
        let path = dir.path().join("indicators.xlsx");
        let mut workbook = Workbook::new();

        let inflation = workbook.add_worksheet();
        inflation.set_name("Inflation").unwrap();
        inflation.write_string(0, 0, "Date").unwrap();
        inflation.write_string(0, 1, "Inflation").unwrap();
        for (i, (d, v)) in rows.iter().enumerate() {
            let row = i as u32 + 1;
            inflation.write_string(row, 0, *d).unwrap();
            match v.parse::<f64>() {
                Ok(n) => inflation.write_number(row, 1, n).unwrap(),
                Err(_) => inflation.write_string(row, 1, *v).unwrap(),
            };
        }

        let other = workbook.add_worksheet();
        other.set_name("Remittance").unwrap();
        other.write_string(0, 0, "Date").unwrap();
        other.write_string(0, 1, "Remittance").unwrap();
        other.write_number(1, 0, 44927.0).unwrap();
        other.write_number(1, 1, 12.5).unwrap();

        workbook.save(&path).unwrap();
        path
    }

    #[test]
    fn test_list_sheets_in_workbook_order() {
        let dir = TempDir::new().unwrap();
        let path = write_workbook(&dir, &[("2023-01-01", "5.0")]);
        let sheets = DataLoader::list_sheets(&path).unwrap();
        assert_eq!(sheets, vec!["Inflation".to_string(), "Remittance".to_string()]);
    }

    #[test]
    fn test_load_parses_text_dates_and_numbers() {
        let dir = TempDir::new().unwrap();
        let path = write_workbook(
            &dir,
            &[("2023-01-01", "5.0"), ("2023-02-01", "5.5"), ("2022-02-01", "4%")],
        );
        let table = DataLoader::load(&path, "Inflation", "Inflation").unwrap();
        assert_eq!(table.measure, "Inflation");
        assert_eq!(
            table.records,
            vec![
                Record::new(date(2023, 1, 1), 5.0),
                Record::new(date(2023, 2, 1), 5.5),
                Record::new(date(2022, 2, 1), 4.0),
            ]
        );
    }

    #[test]
    fn test_load_serial_dates() {
        let dir = TempDir::new().unwrap();
        let path = write_workbook(&dir, &[]);
        let table = DataLoader::load(&path, "Remittance", "Remittance").unwrap();
        assert_eq!(table.records, vec![Record::new(date(2023, 1, 1), 12.5)]);
    }

    #[test]
    fn test_load_date_formatted_cells() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dated.xlsx");
        let mut workbook = Workbook::new();
        let date_format = Format::new().set_num_format("yyyy-mm-dd");

        let sheet = workbook.add_worksheet();
        sheet.set_name("Inflation").unwrap();
        sheet.write_string(0, 0, "Date").unwrap();
        sheet.write_string(0, 1, "Inflation").unwrap();
        let feb = XlsxDateTime::from_ymd(2023, 2, 1).unwrap();
        sheet.write_datetime_with_format(1, 0, &feb, &date_format).unwrap();
        sheet.write_number(1, 1, 5.5).unwrap();
        workbook.save(&path).unwrap();

        let table = DataLoader::load(&path, "Inflation", "Inflation").unwrap();
        assert_eq!(table.records, vec![Record::new(date(2023, 2, 1), 5.5)]);
    }

    #[test]
    fn test_date_cells_respect_1904_epoch() {
        let cell_1904 = Data::DateTime(ExcelDateTime::new(43465.0, ExcelDateTimeType::DateTime, true));
        assert_eq!(DataLoader::parse_date(&cell_1904), Some(date(2023, 1, 1)));

        let cell_1900 = Data::DateTime(ExcelDateTime::new(44927.0, ExcelDateTimeType::DateTime, false));
        assert_eq!(DataLoader::parse_date(&cell_1900), Some(date(2023, 1, 1)));
    }

    #[test]
    fn test_iso_date_cells() {
        let cell = Data::DateTimeIso("2023-04-01T00:00:00".to_string());
        assert_eq!(DataLoader::parse_date(&cell), Some(date(2023, 4, 1)));
    }

    #[test]
    fn test_blank_value_row_is_skipped() {
        let dir = TempDir::new().unwrap();
        let path = write_workbook(&dir, &[("2023-01-01", "5.0"), ("2023-02-01", "")]);
        let table = DataLoader::load(&path, "Inflation", "Inflation").unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_missing_source() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.xlsx");
        assert!(matches!(
            DataLoader::load(&path, "Inflation", "Inflation"),
            Err(LoaderError::SourceNotFound(_))
        ));
        assert!(matches!(
            DataLoader::list_sheets(&path),
            Err(LoaderError::SourceNotFound(_))
        ));
    }

    #[test]
    fn test_missing_sheet() {
        let dir = TempDir::new().unwrap();
        let path = write_workbook(&dir, &[("2023-01-01", "5.0")]);
        match DataLoader::load(&path, "GDP", "GDP") {
            Err(LoaderError::SheetNotFound { sheet, available }) => {
                assert_eq!(sheet, "GDP");
                assert!(available.contains("Inflation"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_missing_measure_column() {
        let dir = TempDir::new().unwrap();
        let path = write_workbook(&dir, &[("2023-01-01", "5.0")]);
        assert!(matches!(
            DataLoader::load(&path, "Inflation", "Deflation"),
            Err(LoaderError::Schema { .. })
        ));
    }

    #[test]
    fn test_unparsable_cells() {
        let dir = TempDir::new().unwrap();
        let path = write_workbook(&dir, &[("not a date", "5.0")]);
        assert!(matches!(
            DataLoader::load(&path, "Inflation", "Inflation"),
            Err(LoaderError::Schema { .. })
        ));

        let path = write_workbook(&dir, &[("2023-01-01", "high")]);
        match DataLoader::load(&path, "Inflation", "Inflation") {
            Err(LoaderError::Schema { reason, .. }) => assert!(reason.contains("row 2")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_serial_to_date() {
        assert_eq!(serial_to_date(44927.0), Some(date(2023, 1, 1)));
        assert_eq!(serial_to_date(44927.75), Some(date(2023, 1, 1)));
        assert_eq!(serial_to_date(1.0), Some(date(1900, 1, 1)));
        assert_eq!(serial_to_date(61.0), Some(date(1900, 3, 1)));
        assert_eq!(serial_to_date(0.0), None);
    }

    #[test]
    fn test_parse_date_text_layouts() {
        assert_eq!(parse_date_text("2023/03/01"), Some(date(2023, 3, 1)));
        assert_eq!(parse_date_text("15/03/2023"), Some(date(2023, 3, 15)));
        assert_eq!(parse_date_text("2023-03-01 00:00:00"), Some(date(2023, 3, 1)));
        assert_eq!(parse_date_text("March 2023"), Some(date(2023, 3, 1)));
        assert_eq!(parse_date_text("Mar 2023"), Some(date(2023, 3, 1)));
        assert_eq!(parse_date_text(""), None);
    }
}
