//! One recomputation pass: dataset + selection + view state → display model.

use super::state::{ExplorerConfig, Panel, ViewState};
use crate::data::{apply_filter, Dataset, FilterSelection, TablePreview};
use crate::format::{format_count, format_money};
use crate::stats::{AggregateError, Aggregator, DailySales, GroupSales, ProfitDistribution, Totals};
use log::debug;
use polars::prelude::PolarsError;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Filter failed: {0}")]
    PolarsError(#[from] PolarsError),
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}

/// Totals with their card labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub totals: Totals,
    pub sales_label: String,
    pub profit_label: String,
    pub orders_label: String,
}

impl From<Totals> for Metrics {
    fn from(totals: Totals) -> Self {
        Self {
            sales_label: format_money(totals.sales),
            profit_label: format_money(totals.profit),
            orders_label: format_count(totals.orders),
            totals,
        }
    }
}

/// Everything the display surface draws for a loaded dataset.
///
/// Panels are `None` while hidden.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub selection: FilterSelection,
    pub row_count: usize,
    pub preview: TablePreview,
    pub metrics: Option<Metrics>,
    pub sales_trend: Option<Vec<DailySales>>,
    pub category_sales: Option<Vec<GroupSales>>,
    pub profit_distribution: Option<ProfitDistribution>,
    pub region_sales: Option<Vec<GroupSales>>,
    /// Visible panels the dataset cannot support (Sales Trend without `Order Date`).
    pub unavailable: Vec<Panel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DisplayModel {
    /// No file loaded yet.
    AwaitingUpload,
    Ready(Box<Dashboard>),
}

impl DisplayModel {
    pub fn dashboard(&self) -> Option<&Dashboard> {
        match self {
            DisplayModel::AwaitingUpload => None,
            DisplayModel::Ready(dashboard) => Some(&**dashboard),
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Filter once and compute the visible panels.
pub fn render(
    dataset: Option<&Dataset>,
    selection: &FilterSelection,
    view: &ViewState,
    config: &ExplorerConfig,
) -> Result<DisplayModel, RenderError> {
    let Some(dataset) = dataset else {
        return Ok(DisplayModel::AwaitingUpload);
    };

    let filtered = apply_filter(dataset, selection)?;
    let mut unavailable = Vec::new();

    let metrics = if view.is_visible(Panel::Metrics) {
        Some(Metrics::from(Aggregator::totals(&filtered)?))
    } else {
        None
    };

    let sales_trend = if !view.is_visible(Panel::SalesTrend) {
        None
    } else if filtered.has_order_date() {
        Some(Aggregator::time_series(&filtered)?)
    } else {
        unavailable.push(Panel::SalesTrend);
        None
    };

    let category_sales = if view.is_visible(Panel::CategorySales) {
        Some(Aggregator::category_breakdown(&filtered)?)
    } else {
        None
    };

    let profit_distribution = if view.is_visible(Panel::ProfitDistribution) {
        let values = Aggregator::profit_values(&filtered)?;
        Some(ProfitDistribution::from_values(values, config.histogram_bins))
    } else {
        None
    };

    let region_sales = if view.is_visible(Panel::RegionSales) {
        Some(Aggregator::region_breakdown(&filtered)?)
    } else {
        None
    };

    debug!(
        "Rendered {} of {} rows with {:?}",
        filtered.height(),
        dataset.height(),
        view
    );

    Ok(DisplayModel::Ready(Box::new(Dashboard {
        selection: selection.clone(),
        row_count: filtered.height(),
        preview: filtered.preview(config.preview_rows),
        metrics,
        sales_trend,
        category_sales,
        profit_distribution,
        region_sales,
        unavailable,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataLoader;

    const CSV: &str = "Category,Region,Sales,Profit,Order Date\n\
                       A,East,100,10,2023-01-01\n\
                       B,West,2000,-5,2023-01-02\n";

    fn dataset(csv: &str) -> Dataset {
        DataLoader::parse_bytes(csv.as_bytes()).unwrap()
    }

    fn all_visible() -> ViewState {
        let mut view = ViewState::default();
        for panel in Panel::ALL {
            view.toggle(panel);
        }
        view
    }

    #[test]
    fn no_dataset_awaits_upload() {
        let model = render(
            None,
            &FilterSelection::default(),
            &all_visible(),
            &ExplorerConfig::default(),
        )
        .unwrap();
        assert_eq!(model, DisplayModel::AwaitingUpload);
        assert!(model.dashboard().is_none());
    }

    #[test]
    fn hidden_panels_are_not_computed() {
        let ds = dataset(CSV);
        let model = render(
            Some(&ds),
            &FilterSelection::all(&ds),
            &ViewState::default(),
            &ExplorerConfig::default(),
        )
        .unwrap();
        let dashboard = model.dashboard().unwrap();

        assert_eq!(dashboard.row_count, 2);
        assert_eq!(dashboard.preview.rows.len(), 2);
        assert!(dashboard.metrics.is_none());
        assert!(dashboard.sales_trend.is_none());
        assert!(dashboard.category_sales.is_none());
        assert!(dashboard.profit_distribution.is_none());
        assert!(dashboard.region_sales.is_none());
    }

    #[test]
    fn visible_panels_are_filled() {
        let ds = dataset(CSV);
        let model = render(
            Some(&ds),
            &FilterSelection::all(&ds),
            &all_visible(),
            &ExplorerConfig::default(),
        )
        .unwrap();
        let dashboard = model.dashboard().unwrap();

        let metrics = dashboard.metrics.as_ref().unwrap();
        assert_eq!(metrics.totals.orders, 2);
        assert_eq!(metrics.sales_label, "$2.1K");
        assert_eq!(metrics.profit_label, "$5");
        assert_eq!(metrics.orders_label, "2");

        assert_eq!(dashboard.sales_trend.as_ref().unwrap().len(), 2);
        assert_eq!(dashboard.category_sales.as_ref().unwrap()[0].label, "B");
        assert_eq!(dashboard.region_sales.as_ref().unwrap().len(), 2);
        assert_eq!(
            dashboard.profit_distribution.as_ref().unwrap().values,
            vec![10.0, -5.0]
        );
        assert!(dashboard.unavailable.is_empty());
    }

    #[test]
    fn empty_selection_renders_empty_state() {
        let ds = dataset(CSV);
        let selection = FilterSelection {
            regions: Default::default(),
            ..FilterSelection::all(&ds)
        };
        let model = render(Some(&ds), &selection, &all_visible(), &ExplorerConfig::default()).unwrap();
        let dashboard = model.dashboard().unwrap();

        assert_eq!(dashboard.row_count, 0);
        assert!(dashboard.preview.rows.is_empty());
        assert_eq!(dashboard.metrics.as_ref().unwrap().totals, Totals::default());
        assert!(dashboard.sales_trend.as_ref().unwrap().is_empty());
        assert!(dashboard.category_sales.as_ref().unwrap().is_empty());
        assert!(dashboard.region_sales.as_ref().unwrap().is_empty());
        let profit = dashboard.profit_distribution.as_ref().unwrap();
        assert!(profit.histogram.bins.is_empty());
        assert!(profit.summary.is_none());
    }

    #[test]
    fn trend_without_dates_is_unavailable() {
        let ds = dataset("Category,Region,Sales,Profit\nA,East,1,1\n");
        let mut view = ViewState::default();
        view.toggle(Panel::SalesTrend);

        let model = render(Some(&ds), &FilterSelection::all(&ds), &view, &ExplorerConfig::default())
            .unwrap();
        let dashboard = model.dashboard().unwrap();

        assert!(dashboard.sales_trend.is_none());
        assert_eq!(dashboard.unavailable, vec![Panel::SalesTrend]);
    }

    #[test]
    fn exports_tagged_json() {
        let ds = dataset(CSV);
        let mut view = ViewState::default();
        view.toggle(Panel::Metrics);
        let model = render(Some(&ds), &FilterSelection::all(&ds), &view, &ExplorerConfig::default())
            .unwrap();

        let json: serde_json::Value = serde_json::from_str(&model.to_json_pretty().unwrap()).unwrap();
        assert_eq!(json["state"], "ready");
        assert_eq!(json["metrics"]["totals"]["sales"], 2100.0);
        assert_eq!(json["selection"]["date_range"]["start"], "2023-01-01");

        let waiting = DisplayModel::AwaitingUpload.to_json_pretty().unwrap();
        assert!(waiting.contains("awaiting_upload"));
    }
}
