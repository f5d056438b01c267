//! Data module - CSV loading, cleaning and filtering

mod dataset;
mod filter;
mod loader;

pub use dataset::{Dataset, TablePreview, CATEGORY, ORDER_DATE, PROFIT, REGION, SALES};
pub use filter::{apply_filter, FilterSelection};
pub use loader::DataLoader;
