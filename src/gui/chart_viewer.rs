//! Chart Viewer Widget
//! Central panel: filtered preview, panel toggles and the visible charts
//! laid out in two columns.

use crate::charts::ChartPlotter;
use crate::data::TablePreview;
use crate::view::{Dashboard, DisplayModel, Panel, ViewState};
use egui::{Color32, RichText, ScrollArea};

const CARD_SPACING: f32 = 15.0;

/// Draws a [`DisplayModel`]; never computes anything itself.
#[derive(Default)]
pub struct ChartViewer;

impl ChartViewer {
    pub fn new() -> Self {
        Self
    }

    pub fn show(&self, ui: &mut egui::Ui, model: &DisplayModel, view: &ViewState) -> ChartViewerAction {
        let Some(dashboard) = model.dashboard() else {
            ui.centered_and_justified(|ui| {
                ui.label(
                    RichText::new("⚠ Please upload a CSV file to get started.")
                        .size(20.0)
                        .color(Color32::from_rgb(243, 156, 18)),
                );
            });
            return ChartViewerAction::None;
        };

        let mut action = ChartViewerAction::None;

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.label(RichText::new("🔍 Filtered Dataset Preview").size(18.0).strong());
                ui.label(
                    RichText::new(format!("{} matching rows", dashboard.row_count))
                        .size(11.0)
                        .color(Color32::GRAY),
                );
                ui.add_space(5.0);
                Self::draw_preview(ui, &dashboard.preview);

                ui.add_space(CARD_SPACING);
                ui.horizontal_wrapped(|ui| {
                    for panel in Panel::ALL {
                        let verb = if view.is_visible(panel) { "Hide" } else { "Show" };
                        let text = format!("{} {} {}", Self::icon(panel), verb, panel.title());
                        if ui.button(text).clicked() {
                            action = ChartViewerAction::Toggle(panel);
                        }
                    }
                    ui.separator();
                    if ui.button("📄 Export Summary").clicked() {
                        action = ChartViewerAction::ExportSummary;
                    }
                });

                for panel in &dashboard.unavailable {
                    ui.label(
                        RichText::new(format!(
                            "{} needs an 'Order Date' column",
                            panel.title()
                        ))
                        .color(Color32::from_rgb(220, 53, 69)),
                    );
                }

                ui.add_space(CARD_SPACING);
                ui.columns(2, |cols| {
                    Self::draw_left_column(&mut cols[0], dashboard);
                    Self::draw_right_column(&mut cols[1], dashboard);
                });
            });

        action
    }

    fn draw_left_column(ui: &mut egui::Ui, dashboard: &Dashboard) {
        if let Some(metrics) = &dashboard.metrics {
            Self::card(ui, Panel::Metrics, |ui| ChartPlotter::draw_metrics(ui, metrics));
        }
        if let Some(categories) = &dashboard.category_sales {
            Self::card(ui, Panel::CategorySales, |ui| {
                ChartPlotter::draw_category_sales(ui, categories)
            });
        }
        if let Some(regions) = &dashboard.region_sales {
            Self::card(ui, Panel::RegionSales, |ui| {
                ChartPlotter::draw_region_sales(ui, regions)
            });
        }
    }

    fn draw_right_column(ui: &mut egui::Ui, dashboard: &Dashboard) {
        if let Some(trend) = &dashboard.sales_trend {
            Self::card(ui, Panel::SalesTrend, |ui| ChartPlotter::draw_sales_trend(ui, trend));
        }
        if let Some(profit) = &dashboard.profit_distribution {
            Self::card(ui, Panel::ProfitDistribution, |ui| {
                ChartPlotter::draw_profit_distribution(ui, profit)
            });
        }
    }

    fn card(ui: &mut egui::Ui, panel: Panel, body: impl FnOnce(&mut egui::Ui)) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.0, Color32::from_gray(90)))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.label(
                    RichText::new(format!("{} {}", Self::icon(panel), panel.title()))
                        .size(16.0)
                        .strong(),
                );
                ui.add_space(8.0);
                body(ui);
            });
        ui.add_space(CARD_SPACING);
    }

    fn draw_preview(ui: &mut egui::Ui, preview: &TablePreview) {
        if preview.rows.is_empty() {
            ui.label(RichText::new("No rows match the current filters").color(Color32::GRAY));
            return;
        }

        ScrollArea::horizontal().id_salt("preview_scroll").show(ui, |ui| {
            egui::Grid::new("preview_table")
                .striped(true)
                .spacing([12.0, 4.0])
                .show(ui, |ui| {
                    for column in &preview.columns {
                        ui.label(RichText::new(column).strong().size(11.0));
                    }
                    ui.end_row();

                    for row in &preview.rows {
                        for cell in row {
                            ui.label(RichText::new(cell).size(11.0));
                        }
                        ui.end_row();
                    }
                });
        });
    }

    fn icon(panel: Panel) -> &'static str {
        match panel {
            Panel::Metrics => "📊",
            Panel::SalesTrend => "📅",
            Panel::CategorySales => "📊",
            Panel::ProfitDistribution => "💰",
            Panel::RegionSales => "🌍",
        }
    }
}

/// Actions triggered by the chart viewer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChartViewerAction {
    None,
    Toggle(Panel),
    ExportSummary,
}
