//! CSV Data Loader Module
//! Decodes, parses and cleans a sales CSV into a [`Dataset`] using Polars.

use super::dataset::{Dataset, CATEGORY, ORDER_DATE, PROFIT, REGION, REQUIRED_COLUMNS, SALES};
use chrono::{NaiveDate, NaiveDateTime};
use log::{debug, info};
use polars::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%m-%d-%Y", "%d.%m.%Y", "%Y%m%d",
];

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Unsupported schema: missing column(s) {0}")]
    SchemaError(String),
    #[error("Column '{column}' contains non-numeric values")]
    NonNumeric { column: String },
    #[error("Cannot parse Order Date '{value}' (row {row})")]
    ParseError { row: usize, value: String },
    #[error("No data loaded")]
    NoData,
}

/// Holds the currently loaded dataset and where it came from.
pub struct DataLoader {
    dataset: Option<Dataset>,
    file_path: Option<PathBuf>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            dataset: None,
            file_path: None,
        }
    }

    /// Load a CSV file, replacing the current dataset on success.
    ///
    /// On failure the previously loaded dataset is kept.
    pub fn load_csv(&mut self, file_path: &Path) -> Result<&Dataset, LoaderError> {
        let bytes = std::fs::read(file_path)?;
        let dataset = Self::parse_bytes(&bytes)?;

        info!(
            "Loaded {} rows from {}",
            dataset.height(),
            file_path.display()
        );
        self.file_path = Some(file_path.to_path_buf());
        self.dataset = Some(dataset);
        self.dataset.as_ref().ok_or(LoaderError::NoData)
    }

    /// Decode ISO-8859-1 bytes, parse them as CSV with a header row and clean the result.
    pub fn parse_bytes(bytes: &[u8]) -> Result<Dataset, LoaderError> {
        let text = decode_latin1(bytes);

        let df = CsvReadOptions::default()
            .with_has_header(true)
            // Infer over every row so a late decimal never meets an integer column.
            .with_infer_schema_length(None)
            .into_reader_with_file_handle(Cursor::new(text.into_bytes()))
            .finish()?;

        Self::clean(df)
    }

    /// Validate the schema, drop incomplete rows and normalise column types.
    pub fn clean(df: DataFrame) -> Result<Dataset, LoaderError> {
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|name| df.column(name).is_err())
            .collect();
        if !missing.is_empty() {
            return Err(LoaderError::SchemaError(missing.join(", ")));
        }

        let total = df.height();
        let complete = complete_rows_mask(&df);
        let source_rows = kept_row_numbers(&complete);
        let mut df = df.filter(&complete)?;
        debug!("Dropped {} incomplete rows", total - df.height());

        for name in [SALES, PROFIT] {
            let numeric = df
                .column(name)?
                .as_materialized_series()
                .strict_cast(&DataType::Float64)
                .map_err(|_| LoaderError::NonNumeric {
                    column: name.to_string(),
                })?;
            df.with_column(numeric)?;
        }

        for name in [CATEGORY, REGION] {
            let labels = df.column(name)?.cast(&DataType::String)?;
            df.with_column(labels)?;
        }

        if df.column(ORDER_DATE).is_ok() {
            let dates = parse_order_dates(&df, &source_rows)?;
            df.with_column(Series::new(ORDER_DATE.into(), dates))?;
        }

        Ok(Dataset::from_clean_frame(df))
    }

    /// Get a reference to the loaded dataset.
    pub fn get_dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    /// Path of the loaded file.
    pub fn get_file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }
}

/// ISO-8859-1: every byte is the code point of the same value.
pub fn decode_latin1(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    bytes.iter().copied().map(char::from).collect()
}

/// Parse a single Order Date value. Time components are discarded.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// True for rows without a null or blank cell in any column.
fn complete_rows_mask(df: &DataFrame) -> BooleanChunked {
    let mut mask = BooleanChunked::full("complete".into(), true, df.height());

    for column in df.get_columns() {
        let series = column.as_materialized_series();
        mask = &mask & &series.is_not_null();

        if let Ok(text) = series.str() {
            let non_blank: BooleanChunked = text
                .into_iter()
                .map(|v| v.is_some_and(|s| !s.trim().is_empty()))
                .collect();
            mask = &mask & &non_blank;
        }
    }

    mask
}

/// 1-based data row numbers (header excluded) of the rows the mask keeps.
fn kept_row_numbers(mask: &BooleanChunked) -> Vec<usize> {
    mask.into_iter()
        .enumerate()
        .filter(|(_, keep)| keep.unwrap_or(false))
        .map(|(i, _)| i + 1)
        .collect()
}

/// `source_rows[i]` is the file row of cleaned row `i`, used in error reports.
fn parse_order_dates(df: &DataFrame, source_rows: &[usize]) -> Result<Vec<NaiveDate>, LoaderError> {
    let raw = df.column(ORDER_DATE)?.cast(&DataType::String)?;

    raw.str()?
        .into_iter()
        .enumerate()
        .map(|(i, value)| {
            let value = value.unwrap_or_default();
            parse_date(value).ok_or_else(|| LoaderError::ParseError {
                row: source_rows.get(i).copied().unwrap_or(i + 1),
                value: value.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn loads_and_types_columns() {
        let csv = "Category,Region,Sales,Profit,Order Date\n\
                   A,East,100,10,2023-01-01\n\
                   B,West,200.5,-5,2023-01-02\n";
        let ds = DataLoader::parse_bytes(csv.as_bytes()).unwrap();
        let df = ds.frame();

        assert_eq!(ds.height(), 2);
        assert_eq!(df.column(SALES).unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column(PROFIT).unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column(ORDER_DATE).unwrap().dtype(), &DataType::Date);
        assert_eq!(
            ds.date_bounds(),
            Some((date(2023, 1, 1), date(2023, 1, 2)))
        );
    }

    #[test]
    fn decodes_latin1_bytes() {
        let mut csv = b"Category,Region,Sales,Profit\nCaf".to_vec();
        csv.push(0xE9);
        csv.extend_from_slice(b",Nord,1,1\n");

        let ds = DataLoader::parse_bytes(&csv).unwrap();
        assert_eq!(ds.categories(), vec!["Café"]);
    }

    #[test]
    fn skips_utf8_bom() {
        let mut csv = UTF8_BOM.to_vec();
        csv.extend_from_slice(b"Category,Region,Sales,Profit\nA,East,1,1\n");
        assert!(DataLoader::parse_bytes(&csv).is_ok());
    }

    #[test]
    fn drops_rows_with_missing_values() {
        let csv = "Category,Region,Sales,Profit,Order Date\n\
                   A,East,,10,2023-01-01\n\
                   B,West,200,-5,2023-01-02\n\
                   ,West,300,1,2023-01-03\n\
                   C,North,400,2,\n\
                   D,  ,500,3,2023-01-04\n";
        let ds = DataLoader::parse_bytes(csv.as_bytes()).unwrap();

        assert_eq!(ds.height(), 1);
        assert_eq!(ds.categories(), vec!["B"]);
    }

    #[test]
    fn missing_value_in_extra_column_drops_row() {
        let csv = "Category,Region,Sales,Profit,Segment\n\
                   A,East,1,1,Retail\n\
                   B,West,2,2,\n";
        let ds = DataLoader::parse_bytes(csv.as_bytes()).unwrap();
        assert_eq!(ds.height(), 1);
    }

    #[test]
    fn missing_required_column_is_schema_error() {
        let csv = "Category,Sales,Profit\nA,1,1\n";
        let err = DataLoader::parse_bytes(csv.as_bytes()).unwrap_err();
        match err {
            LoaderError::SchemaError(missing) => assert_eq!(missing, "Region"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unparseable_date_aborts_load() {
        let csv = "Category,Region,Sales,Profit,Order Date\n\
                   A,East,1,1,2023-01-01\n\
                   B,West,2,2,not a date\n";
        let err = DataLoader::parse_bytes(csv.as_bytes()).unwrap_err();
        match err {
            LoaderError::ParseError { row, value } => {
                assert_eq!(row, 2);
                assert_eq!(value, "not a date");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn parse_error_reports_file_row() {
        let csv = "Category,Region,Sales,Profit,Order Date\n\
                   A,East,,1,2023-01-01\n\
                   B,West,2,2,2023-01-02\n\
                   C,West,3,3,31/31/2023\n";
        let err = DataLoader::parse_bytes(csv.as_bytes()).unwrap_err();
        match err {
            LoaderError::ParseError { row, value } => {
                assert_eq!(row, 3);
                assert_eq!(value, "31/31/2023");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn infers_types_past_the_first_rows() {
        let mut csv = String::from("Category,Region,Sales,Profit\n");
        for _ in 0..12_000 {
            csv.push_str("A,East,1,1\n");
        }
        csv.push_str("B,West,1.5,2.25\n");

        let ds = DataLoader::parse_bytes(csv.as_bytes()).unwrap();
        assert_eq!(ds.height(), 12_001);
        let sales = ds.frame().column(SALES).unwrap().f64().unwrap().sum();
        assert_eq!(sales, Some(12_001.5));
    }

    #[test]
    fn non_numeric_sales_is_rejected() {
        let csv = "Category,Region,Sales,Profit\nA,East,lots,1\n";
        let err = DataLoader::parse_bytes(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoaderError::NonNumeric { column } if column == SALES));
    }

    #[test]
    fn parses_common_date_shapes() {
        let expected = date(2016, 11, 8);
        assert_eq!(parse_date("2016-11-08"), Some(expected));
        assert_eq!(parse_date("2016/11/08"), Some(expected));
        assert_eq!(parse_date("11/8/2016"), Some(expected));
        assert_eq!(parse_date("11-08-2016"), Some(expected));
        assert_eq!(parse_date("08.11.2016"), Some(expected));
        assert_eq!(parse_date("20161108"), Some(expected));
        assert_eq!(parse_date("2016-11-08 13:45:00"), Some(expected));
        assert_eq!(parse_date("2016-11-08T13:45:00"), Some(expected));
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date("2016-13-45"), None);
    }

    #[test]
    fn load_csv_keeps_previous_dataset_on_error() {
        let mut good = tempfile::NamedTempFile::new().unwrap();
        writeln!(good, "Category,Region,Sales,Profit\nA,East,1,1").unwrap();
        let mut bad = tempfile::NamedTempFile::new().unwrap();
        writeln!(bad, "Region,Sales\nEast,1").unwrap();

        let mut loader = DataLoader::new();
        loader.load_csv(good.path()).unwrap();
        assert!(loader.load_csv(bad.path()).is_err());

        assert_eq!(loader.get_dataset().map(Dataset::height), Some(1));
        assert_eq!(loader.get_file_path(), Some(&good.path().to_path_buf()));
    }
}
