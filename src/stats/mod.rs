//! Statistics module - aggregate views and distribution summaries

mod aggregate;
mod distribution;

pub use aggregate::{AggregateError, Aggregator, DailySales, GroupSales, Totals};
pub use distribution::{ProfitDistribution, DEFAULT_BINS};
