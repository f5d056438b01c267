//! Per-session view state and display settings.

use crate::stats::DEFAULT_BINS;
use serde::{Deserialize, Serialize};

/// Rows shown in the filtered preview.
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// A toggleable dashboard panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Panel {
    Metrics,
    SalesTrend,
    CategorySales,
    ProfitDistribution,
    RegionSales,
}

impl Panel {
    pub const ALL: [Panel; 5] = [
        Panel::Metrics,
        Panel::SalesTrend,
        Panel::CategorySales,
        Panel::ProfitDistribution,
        Panel::RegionSales,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Panel::Metrics => "Key Metrics",
            Panel::SalesTrend => "Sales Trend Over Time",
            Panel::CategorySales => "Sales by Category",
            Panel::ProfitDistribution => "Profit Distribution",
            Panel::RegionSales => "Sales by Region",
        }
    }
}

/// Which panels are visible. Everything starts hidden.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub show_metrics: bool,
    pub show_sales_trend: bool,
    pub show_category_sales: bool,
    pub show_profit_distribution: bool,
    pub show_region_sales: bool,
}

impl ViewState {
    pub fn is_visible(&self, panel: Panel) -> bool {
        match panel {
            Panel::Metrics => self.show_metrics,
            Panel::SalesTrend => self.show_sales_trend,
            Panel::CategorySales => self.show_category_sales,
            Panel::ProfitDistribution => self.show_profit_distribution,
            Panel::RegionSales => self.show_region_sales,
        }
    }

    pub fn toggle(&mut self, panel: Panel) {
        let flag = self.flag_mut(panel);
        *flag = !*flag;
    }

    /// Hide every panel.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn flag_mut(&mut self, panel: Panel) -> &mut bool {
        match panel {
            Panel::Metrics => &mut self.show_metrics,
            Panel::SalesTrend => &mut self.show_sales_trend,
            Panel::CategorySales => &mut self.show_category_sales,
            Panel::ProfitDistribution => &mut self.show_profit_distribution,
            Panel::RegionSales => &mut self.show_region_sales,
        }
    }
}

/// Display settings for a render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    pub preview_rows: usize,
    pub histogram_bins: usize,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            preview_rows: DEFAULT_PREVIEW_ROWS,
            histogram_bins: DEFAULT_BINS,
        }
    }
}
