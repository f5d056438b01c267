//! Dataset Module
//! Cleaned, immutable sales table backed by a Polars DataFrame.

use chrono::NaiveDate;
use polars::prelude::*;
use serde::Serialize;
use std::collections::HashSet;

pub const CATEGORY: &str = "Category";
pub const REGION: &str = "Region";
pub const SALES: &str = "Sales";
pub const PROFIT: &str = "Profit";
pub const ORDER_DATE: &str = "Order Date";

/// Columns every dataset must carry.
pub const REQUIRED_COLUMNS: [&str; 4] = [CATEGORY, REGION, SALES, PROFIT];

/// First rows of a table rendered as display strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TablePreview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// A cleaned sales table.
///
/// Only built by the loader (after schema checks, null dropping and type
/// normalisation) or by filtering another dataset, so `Category`/`Region` are
/// always strings, `Sales`/`Profit` are always `Float64`, `Order Date` (when
/// present) is a `Date`, and no column holds a null.
#[derive(Debug, Clone)]
pub struct Dataset {
    df: DataFrame,
}

impl PartialEq for Dataset {
    fn eq(&self, other: &Self) -> bool {
        self.df.equals_missing(&other.df)
    }
}

impl Dataset {
    /// Wrap a frame that already satisfies the cleaned-table invariants.
    pub(crate) fn from_clean_frame(df: DataFrame) -> Self {
        Self { df }
    }

    /// Get a reference to the underlying DataFrame.
    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn has_order_date(&self) -> bool {
        self.df.column(ORDER_DATE).is_ok()
    }

    /// Distinct categories in first-appearance order.
    pub fn categories(&self) -> Vec<String> {
        self.distinct_strings(CATEGORY)
    }

    /// Distinct regions in first-appearance order.
    pub fn regions(&self) -> Vec<String> {
        self.distinct_strings(REGION)
    }

    /// Earliest and latest order date, if the dataset has dates and rows.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let dates = self.date_column()?;
        dates
            .as_date_iter()
            .flatten()
            .fold(None, |bounds, date| match bounds {
                None => Some((date, date)),
                Some((lo, hi)) => Some((lo.min(date), hi.max(date))),
            })
    }

    /// First `rows` rows formatted for display.
    pub fn preview(&self, rows: usize) -> TablePreview {
        let head = self.df.head(Some(rows));
        let rows = (0..head.height())
            .map(|i| {
                head.get_columns()
                    .iter()
                    .map(|column| {
                        column
                            .get(i)
                            .map(|v| v.to_string().trim_matches('"').to_string())
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();

        TablePreview {
            columns: self.column_names(),
            rows,
        }
    }

    pub(crate) fn date_column(&self) -> Option<&DateChunked> {
        self.df
            .column(ORDER_DATE)
            .ok()?
            .as_materialized_series()
            .date()
            .ok()
    }

    fn distinct_strings(&self, column: &str) -> Vec<String> {
        let Ok(values) = self.df.column(column).and_then(|c| c.str()) else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        values
            .into_iter()
            .flatten()
            .filter(|v| seen.insert(*v))
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataLoader;

    const CSV: &str = "Category,Region,Sales,Profit,Order Date\n\
                       Tech,East,100,10,2023-01-03\n\
                       Office,West,200,-5,2023-01-01\n\
                       Tech,West,50,4,2023-01-02\n";

    #[test]
    fn distinct_values_keep_first_appearance_order() {
        let ds = DataLoader::parse_bytes(CSV.as_bytes()).unwrap();
        assert_eq!(ds.categories(), vec!["Tech", "Office"]);
        assert_eq!(ds.regions(), vec!["East", "West"]);
    }

    #[test]
    fn date_bounds_span_all_rows() {
        let ds = DataLoader::parse_bytes(CSV.as_bytes()).unwrap();
        let (lo, hi) = ds.date_bounds().unwrap();
        assert_eq!(lo, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!(hi, NaiveDate::from_ymd_opt(2023, 1, 3).unwrap());
    }

    #[test]
    fn date_bounds_absent_without_order_date() {
        let ds = DataLoader::parse_bytes(b"Category,Region,Sales,Profit\nA,East,1,1\n").unwrap();
        assert!(!ds.has_order_date());
        assert_eq!(ds.date_bounds(), None);
    }

    #[test]
    fn preview_limits_rows() {
        let ds = DataLoader::parse_bytes(CSV.as_bytes()).unwrap();
        let preview = ds.preview(2);
        assert_eq!(preview.columns.len(), 5);
        assert_eq!(preview.rows.len(), 2);
        assert_eq!(preview.rows[0][0], "Tech");
    }
}
