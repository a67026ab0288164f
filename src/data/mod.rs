//! Data module - workbook loading and indicator transformations

mod loader;
mod processor;
mod table;

pub use loader::{DataLoader, LoaderError};
pub use processor::{
    format_delta, format_percent, DataProcessor, FormattedPivot, SeriesPoint, TransformError,
};
pub use table::{month_abbrev, month_name, Record, Selection, Table};
