//! Chart Plotter Module
//! Draws the dashboard panels using egui_plot and the egui painter.

use crate::stats::{DailySales, GroupSales, ProfitDistribution};
use crate::view::Metrics;
use chrono::{Datelike, NaiveDate};
use egui::{Color32, RichText, Sense, Shape, Stroke};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Line, Plot, PlotPoints, Points};
use std::f32::consts::TAU;

pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(52, 152, 219),  // Blue
    Color32::from_rgb(231, 76, 60),   // Red
    Color32::from_rgb(46, 204, 113),  // Green
    Color32::from_rgb(155, 89, 182),  // Purple
    Color32::from_rgb(243, 156, 18),  // Orange
    Color32::from_rgb(26, 188, 156),  // Teal
    Color32::from_rgb(233, 30, 99),   // Pink
    Color32::from_rgb(0, 188, 212),   // Cyan
    Color32::from_rgb(121, 85, 72),   // Brown
    Color32::from_rgb(96, 125, 139),  // Blue Grey
];

pub const PROFIT_COLOR: Color32 = Color32::from_rgb(46, 204, 113);

const CHART_HEIGHT: f32 = 300.0;
const DONUT_HOLE: f32 = 0.4;
const DONUT_SEGMENTS_PER_TURN: f32 = 180.0;

/// Draws the dashboard charts.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Three metric cards: sales, profit, orders.
    pub fn draw_metrics(ui: &mut egui::Ui, metrics: &Metrics) {
        ui.columns(3, |cols| {
            Self::metric_card(&mut cols[0], "💰 Total Sales", &metrics.sales_label);
            Self::metric_card(&mut cols[1], "📈 Total Profit", &metrics.profit_label);
            Self::metric_card(&mut cols[2], "📦 Total Orders", &metrics.orders_label);
        });
    }

    fn metric_card(ui: &mut egui::Ui, label: &str, value: &str) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.label(RichText::new(label).size(12.0).color(Color32::GRAY));
                ui.label(RichText::new(value).size(24.0).strong());
            });
    }

    /// Line with markers; x is days from CE, labelled as dates.
    pub fn draw_sales_trend(ui: &mut egui::Ui, trend: &[DailySales]) {
        let points: Vec<[f64; 2]> = trend
            .iter()
            .map(|d| [d.date.num_days_from_ce() as f64, d.sales])
            .collect();

        Plot::new("sales_trend")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label("Order Date")
            .y_axis_label("Sales")
            .x_axis_formatter(|mark, _range| {
                NaiveDate::from_num_days_from_ce_opt(mark.value.round() as i32)
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::from_iter(points.iter().copied()))
                        .color(PALETTE[0])
                        .width(1.5)
                        .name("Sales"),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from_iter(points.iter().copied()))
                        .radius(3.0)
                        .color(PALETTE[0]),
                );
            });
    }

    /// One coloured bar per category, in breakdown order.
    pub fn draw_category_sales(ui: &mut egui::Ui, categories: &[GroupSales]) {
        let labels: Vec<String> = categories.iter().map(|g| g.label.clone()).collect();
        let bars: Vec<Bar> = categories
            .iter()
            .enumerate()
            .map(|(i, g)| {
                Bar::new(i as f64, g.sales)
                    .width(0.6)
                    .fill(Self::color(i))
                    .name(&g.label)
            })
            .collect();

        Plot::new("category_sales")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label("Category")
            .y_axis_label("Sales")
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                    return String::new();
                }
                labels.get(idx as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars));
            });
    }

    /// Histogram of profit with a horizontal box plot above it.
    pub fn draw_profit_distribution(ui: &mut egui::Ui, distribution: &ProfitDistribution) {
        let bars: Vec<Bar> = distribution
            .histogram
            .bins
            .iter()
            .map(|bin| {
                Bar::new(bin.center(), bin.count as f64)
                    .width(bin.width())
                    .fill(PROFIT_COLOR)
            })
            .collect();
        let max_count = distribution
            .histogram
            .bins
            .iter()
            .map(|b| b.count)
            .max()
            .unwrap_or(0) as f64;

        Plot::new("profit_distribution")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label("Profit")
            .y_axis_label("Count")
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).name("Profit"));

                if let Some(summary) = &distribution.summary {
                    let box_elem = BoxElem::new(
                        max_count * 1.15,
                        BoxSpread::new(
                            summary.lower_whisker,
                            summary.q1,
                            summary.median,
                            summary.q3,
                            summary.upper_whisker,
                        ),
                    )
                    .box_width((max_count * 0.1).max(0.5))
                    .fill(PROFIT_COLOR.gamma_multiply(0.3))
                    .stroke(Stroke::new(1.5, PROFIT_COLOR));

                    plot_ui.box_plot(BoxPlot::new(vec![box_elem]).horizontal().name("Box"));
                }
            });

        ui.label(
            RichText::new(format!("{} values", distribution.histogram.total()))
                .size(11.0)
                .color(Color32::GRAY),
        );
    }

    /// Donut chart of sales share per region. Non-positive sales are left out.
    pub fn draw_region_sales(ui: &mut egui::Ui, regions: &[GroupSales]) {
        let slices: Vec<(usize, &GroupSales)> = regions
            .iter()
            .enumerate()
            .filter(|(_, g)| g.sales > 0.0)
            .collect();
        let total: f64 = slices.iter().map(|(_, g)| g.sales).sum();

        if total <= 0.0 {
            ui.label(RichText::new("No positive sales to show").color(Color32::GRAY));
            return;
        }

        ui.horizontal(|ui| {
            let (response, painter) =
                ui.allocate_painter(egui::vec2(CHART_HEIGHT, CHART_HEIGHT), Sense::hover());
            let center = response.rect.center();
            let outer = CHART_HEIGHT / 2.0 - 8.0;
            let inner = outer * DONUT_HOLE;

            let mut start = -TAU / 4.0;
            for (i, group) in &slices {
                let sweep = (group.sales / total) as f32 * TAU;
                Self::paint_ring_segment(&painter, center, inner, outer, start, sweep, Self::color(*i));
                start += sweep;
            }

            ui.vertical(|ui| {
                for (i, group) in &slices {
                    ui.horizontal(|ui| {
                        let (rect, _) = ui.allocate_exact_size(egui::vec2(14.0, 14.0), Sense::hover());
                        ui.painter().rect_filled(rect, 3.0, Self::color(*i));
                        ui.label(format!(
                            "{} ({:.1}%)",
                            group.label,
                            group.sales / total * 100.0
                        ));
                    });
                }
            });
        });
    }

    /// Ring segments are not convex, so paint them as thin convex quads.
    fn paint_ring_segment(
        painter: &egui::Painter,
        center: egui::Pos2,
        inner: f32,
        outer: f32,
        start: f32,
        sweep: f32,
        color: Color32,
    ) {
        let steps = ((sweep / TAU) * DONUT_SEGMENTS_PER_TURN).ceil().max(1.0) as usize;
        let at = |radius: f32, angle: f32| center + radius * egui::vec2(angle.cos(), angle.sin());

        for step in 0..steps {
            let a0 = start + sweep * step as f32 / steps as f32;
            let a1 = start + sweep * (step + 1) as f32 / steps as f32;
            painter.add(Shape::convex_polygon(
                vec![at(outer, a0), at(outer, a1), at(inner, a1), at(inner, a0)],
                color,
                Stroke::NONE,
            ));
        }
    }
}
