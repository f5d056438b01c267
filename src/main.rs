//! Sales Explorer - Business & Sales Analysis Dashboard
//!
//! Load a sales CSV, filter it by category, region and order date, and view
//! totals, the sales trend, and breakdowns by category, profit and region.

mod charts;
mod data;
mod format;
mod gui;
mod stats;
mod view;

use eframe::egui;
use gui::ExplorerApp;

fn main() -> eframe::Result<()> {
    env_logger::init();

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 850.0])
            .with_min_inner_size([1000.0, 650.0])
            .with_title("Sales Explorer"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Sales Explorer",
        options,
        Box::new(|cc| Ok(Box::new(ExplorerApp::new(cc)))),
    )
}
