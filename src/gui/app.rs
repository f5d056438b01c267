//! Sales Explorer Main Application
//! Main window with control panel and chart viewer.
//!
//! Every interaction updates the session state (selection, view toggles) and
//! then recomputes the display model exactly once through [`render`].

use crate::data::{DataLoader, FilterSelection};
use crate::gui::{ChartViewer, ChartViewerAction, ControlPanel, ControlPanelAction};
use crate::view::{render, DisplayModel, ExplorerConfig, ViewState};
use anyhow::Context;
use egui::SidePanel;
use log::{error, info, warn};
use std::path::{Path, PathBuf};

/// Main application window.
pub struct ExplorerApp {
    loader: DataLoader,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    selection: FilterSelection,
    view: ViewState,
    config: ExplorerConfig,
    model: DisplayModel,
}

impl ExplorerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            loader: DataLoader::new(),
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
            selection: FilterSelection::default(),
            view: ViewState::default(),
            config: ExplorerConfig::default(),
            model: DisplayModel::AwaitingUpload,
        }
    }

    /// Recompute the display model from the current session state.
    fn refresh(&mut self) {
        match render(
            self.loader.get_dataset(),
            &self.selection,
            &self.view,
            &self.config,
        ) {
            Ok(model) => self.model = model,
            Err(e) => {
                error!("Render failed: {e}");
                self.control_panel.set_status(&format!("Error: {e}"));
            }
        }
    }

    /// Handle CSV file selection
    fn handle_browse_csv(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        else {
            return;
        };

        self.load_file(path);
    }

    fn load_file(&mut self, path: PathBuf) {
        match self.loader.load_csv(&path) {
            Ok(dataset) => {
                self.selection = FilterSelection::all(dataset);
                self.control_panel.update_options(dataset);
                self.control_panel.set_status(&format!(
                    "Loaded {} rows, {} columns",
                    dataset.height(),
                    dataset.column_names().len()
                ));
                self.control_panel.csv_path = self.loader.get_file_path().cloned();
            }
            Err(e) => {
                warn!("Failed to load {}: {e}", path.display());
                self.control_panel.set_status(&format!("Error: {e}"));
            }
        }

        self.refresh();
    }

    /// Hide every panel and select everything again.
    fn handle_reset(&mut self) {
        self.view.reset();
        self.selection = self
            .loader
            .get_dataset()
            .map(FilterSelection::all)
            .unwrap_or_default();
        self.refresh();
    }

    /// Handle summary export - write the current display model as JSON
    fn handle_export_summary(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_file_name("sales_summary.json")
            .save_file()
        else {
            return;
        };

        match self.export_summary(&path) {
            Ok(()) => {
                info!("Summary written to {}", path.display());
                self.control_panel
                    .set_status(&format!("Summary exported: {}", path.display()));
            }
            Err(e) => {
                error!("Summary export failed: {e:#}");
                self.control_panel.set_status(&format!("Error: {e:#}"));
            }
        }
    }

    fn export_summary(&self, path: &Path) -> anyhow::Result<()> {
        let json = self
            .model
            .to_json_pretty()
            .context("Failed to serialize summary")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}

impl eframe::App for ExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        let panel_action = SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .show(ui, |ui| self.control_panel.show(ui, &mut self.selection))
                    .inner
            })
            .inner;

        match panel_action {
            ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
            ControlPanelAction::SelectionChanged => self.refresh(),
            ControlPanelAction::ResetAll => self.handle_reset(),
            ControlPanelAction::None => {}
        }

        // Central panel - Chart Viewer
        let viewer_action = egui::CentralPanel::default()
            .show(ctx, |ui| self.chart_viewer.show(ui, &self.model, &self.view))
            .inner;

        match viewer_action {
            ChartViewerAction::Toggle(panel) => {
                self.view.toggle(panel);
                self.refresh();
            }
            ChartViewerAction::ExportSummary => self.handle_export_summary(),
            ChartViewerAction::None => {}
        }
    }
}
