//! Aggregation Module
//! Totals and group-by sums over a (filtered) dataset.

use crate::data::{Dataset, CATEGORY, ORDER_DATE, PROFIT, REGION, SALES};
use chrono::NaiveDate;
use polars::prelude::*;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Dataset has no 'Order Date' column")]
    MissingOrderDate,
}

/// Sum of Sales, sum of Profit and row count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    pub sales: f64,
    pub profit: f64,
    pub orders: usize,
}

/// Summed Sales for one order date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySales {
    pub date: NaiveDate,
    pub sales: f64,
}

/// Summed Sales for one category or region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSales {
    pub label: String,
    pub sales: f64,
}

/// Computes the aggregate views of a dataset.
pub struct Aggregator;

impl Aggregator {
    /// Sums over an empty dataset are zero.
    pub fn totals(dataset: &Dataset) -> Result<Totals, AggregateError> {
        let df = dataset.frame();
        Ok(Totals {
            sales: df.column(SALES)?.f64()?.sum().unwrap_or(0.0),
            profit: df.column(PROFIT)?.f64()?.sum().unwrap_or(0.0),
            orders: df.height(),
        })
    }

    /// Sales per distinct order date, ascending. Dates without rows are absent.
    pub fn time_series(dataset: &Dataset) -> Result<Vec<DailySales>, AggregateError> {
        if !dataset.has_order_date() {
            return Err(AggregateError::MissingOrderDate);
        }

        let out = dataset
            .frame()
            .clone()
            .lazy()
            .group_by([col(ORDER_DATE)])
            .agg([col(SALES).sum()])
            .sort([ORDER_DATE], SortMultipleOptions::default())
            .collect()?;

        let dates = out.column(ORDER_DATE)?.as_materialized_series().date()?;
        let sales = out.column(SALES)?.f64()?;

        Ok(dates
            .as_date_iter()
            .zip(sales)
            .filter_map(|(date, sales)| {
                Some(DailySales {
                    date: date?,
                    sales: sales.unwrap_or(0.0),
                })
            })
            .collect())
    }

    /// Sales per category, descending; tied sums are ordered by category label.
    pub fn category_breakdown(dataset: &Dataset) -> Result<Vec<GroupSales>, AggregateError> {
        let out = Self::sum_sales_by(dataset, CATEGORY)?
            .lazy()
            .sort(
                [SALES, CATEGORY],
                SortMultipleOptions::default()
                    .with_order_descending_multi([true, false])
                    .with_maintain_order(true),
            )
            .collect()?;

        Self::group_rows(&out, CATEGORY)
    }

    /// Sales per region, in first-appearance order.
    pub fn region_breakdown(dataset: &Dataset) -> Result<Vec<GroupSales>, AggregateError> {
        let out = Self::sum_sales_by(dataset, REGION)?;
        Self::group_rows(&out, REGION)
    }

    /// Raw Profit values, for the distribution chart.
    pub fn profit_values(dataset: &Dataset) -> Result<Vec<f64>, AggregateError> {
        Ok(dataset
            .frame()
            .column(PROFIT)?
            .f64()?
            .into_iter()
            .flatten()
            .collect())
    }

    fn sum_sales_by(dataset: &Dataset, key: &str) -> PolarsResult<DataFrame> {
        dataset
            .frame()
            .clone()
            .lazy()
            .group_by_stable([col(key)])
            .agg([col(SALES).sum()])
            .collect()
    }

    fn group_rows(out: &DataFrame, key: &str) -> Result<Vec<GroupSales>, AggregateError> {
        let labels = out.column(key)?.str()?;
        let sales = out.column(SALES)?.f64()?;

        Ok(labels
            .into_iter()
            .zip(sales)
            .filter_map(|(label, sales)| {
                Some(GroupSales {
                    label: label?.to_string(),
                    sales: sales.unwrap_or(0.0),
                })
            })
            .collect())
    }
}
