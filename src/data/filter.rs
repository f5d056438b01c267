//! Row filtering by category, region and order-date range.

use super::dataset::{Dataset, CATEGORY, REGION};
use chrono::NaiveDate;
use log::debug;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Inclusive date range `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// The user's chosen categories, regions and optional date bounds.
///
/// An empty set for a dimension selects nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub categories: BTreeSet<String>,
    pub regions: BTreeSet<String>,
    pub date_range: Option<DateRange>,
}

impl FilterSelection {
    /// Every category and region, and the dataset's full date span.
    pub fn all(dataset: &Dataset) -> Self {
        Self {
            categories: dataset.categories().into_iter().collect(),
            regions: dataset.regions().into_iter().collect(),
            date_range: dataset
                .date_bounds()
                .map(|(start, end)| DateRange::new(start, end)),
        }
    }
}

/// Return the rows of `dataset` matching `selection`.
///
/// The date range only applies when the dataset has an `Order Date` column.
pub fn apply_filter(dataset: &Dataset, selection: &FilterSelection) -> PolarsResult<Dataset> {
    let df = dataset.frame();

    let mut mask = membership_mask(df.column(CATEGORY)?.str()?, &selection.categories);
    mask = &mask & &membership_mask(df.column(REGION)?.str()?, &selection.regions);

    if let (Some(range), Some(dates)) = (selection.date_range, dataset.date_column()) {
        let in_range: BooleanChunked = dates
            .as_date_iter()
            .map(|d| d.is_some_and(|d| range.contains(d)))
            .collect();
        mask = &mask & &in_range;
    }

    let filtered = Dataset::from_clean_frame(df.filter(&mask)?);
    if filtered.is_empty() {
        debug!("Selection matches no rows");
    } else {
        debug!("Filter kept {} of {} rows", filtered.height(), df.height());
    }

    Ok(filtered)
}

fn membership_mask(values: &StringChunked, selected: &BTreeSet<String>) -> BooleanChunked {
    values
        .into_iter()
        .map(|v| v.is_some_and(|v| selected.contains(v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataLoader;

    const CSV: &str = "Category,Region,Sales,Profit,Order Date\n\
                       A,East,100,10,2023-01-01\n\
                       B,West,200,-5,2023-01-02\n\
                       A,West,50,3,2023-01-05\n\
                       C,South,75,7,2023-02-01\n";

    fn dataset() -> Dataset {
        DataLoader::parse_bytes(CSV.as_bytes()).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn full_selection_is_identity() {
        let ds = dataset();
        let filtered = apply_filter(&ds, &FilterSelection::all(&ds)).unwrap();
        assert_eq!(filtered, ds);
    }

    #[test]
    fn unbounded_range_is_identity() {
        let ds = dataset();
        let selection = FilterSelection {
            date_range: None,
            ..FilterSelection::all(&ds)
        };
        assert_eq!(apply_filter(&ds, &selection).unwrap(), ds);
    }

    #[test]
    fn filtering_is_idempotent() {
        let ds = dataset();
        let selection = FilterSelection {
            categories: set(&["A", "C"]),
            regions: set(&["West", "South"]),
            date_range: Some(DateRange::new(date(2023, 1, 2), date(2023, 3, 1))),
        };

        let once = apply_filter(&ds, &selection).unwrap();
        let twice = apply_filter(&once, &selection).unwrap();
        assert_eq!(once.height(), 2);
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_category_selection_yields_empty_dataset() {
        let ds = dataset();
        let selection = FilterSelection {
            categories: BTreeSet::new(),
            ..FilterSelection::all(&ds)
        };
        let filtered = apply_filter(&ds, &selection).unwrap();
        assert!(filtered.is_empty());
        assert_eq!(filtered.column_names(), ds.column_names());
    }

    #[test]
    fn date_range_is_inclusive() {
        let ds = dataset();
        let selection = FilterSelection {
            date_range: Some(DateRange::new(date(2023, 1, 2), date(2023, 1, 5))),
            ..FilterSelection::all(&ds)
        };
        let filtered = apply_filter(&ds, &selection).unwrap();
        assert_eq!(filtered.categories(), vec!["B", "A"]);
    }

    #[test]
    fn inverted_range_matches_nothing() {
        let ds = dataset();
        let selection = FilterSelection {
            date_range: Some(DateRange::new(date(2023, 2, 1), date(2023, 1, 1))),
            ..FilterSelection::all(&ds)
        };
        assert!(apply_filter(&ds, &selection).unwrap().is_empty());
    }

    #[test]
    fn date_range_ignored_without_order_date() {
        let ds = DataLoader::parse_bytes(b"Category,Region,Sales,Profit\nA,East,1,1\n").unwrap();
        let selection = FilterSelection {
            date_range: Some(DateRange::new(date(1990, 1, 1), date(1990, 1, 2))),
            ..FilterSelection::all(&ds)
        };
        assert_eq!(apply_filter(&ds, &selection).unwrap().height(), 1);
    }
}
