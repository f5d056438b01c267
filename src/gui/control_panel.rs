//! Control Panel Widget
//! Left side panel with file selection, filters and reset.

use crate::data::{Dataset, FilterSelection};
use egui::{Color32, RichText, ScrollArea};
use egui_extras::DatePickerButton;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Left side control panel with file selection and filter controls.
pub struct ControlPanel {
    pub csv_path: Option<PathBuf>,
    pub categories: Vec<String>,
    pub regions: Vec<String>,
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            csv_path: None,
            categories: Vec::new(),
            regions: Vec::new(),
            status: "Ready".to_string(),
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refresh the filter options after a dataset load.
    pub fn update_options(&mut self, dataset: &Dataset) {
        self.categories = dataset.categories();
        self.regions = dataset.regions();
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui, selection: &mut FilterSelection) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 Sales Explorer")
                    .size(22.0)
                    .color(Color32::from_rgb(52, 152, 219)),
            );
            ui.label(
                RichText::new("Business & Sales Analysis")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Upload Section =====
        ui.label(RichText::new("📂 Upload Data").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .csv_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    let path_color = if self.csv_path.is_some() {
                        ui.visuals().text_color()
                    } else {
                        Color32::GRAY
                    };
                    ui.label(RichText::new(&path_text).size(12.0).color(path_color));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                    });
                });
            });

        if self.csv_path.is_some() {
            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);

            // ===== Filter Section =====
            ui.label(RichText::new("🔍 Filter Data").size(14.0).strong());
            ui.add_space(5.0);

            if Self::multi_select(ui, "Select Category", &self.categories, &mut selection.categories) {
                action = ControlPanelAction::SelectionChanged;
            }
            ui.add_space(8.0);
            if Self::multi_select(ui, "Select Region", &self.regions, &mut selection.regions) {
                action = ControlPanelAction::SelectionChanged;
            }

            if let Some(range) = selection.date_range.as_mut() {
                ui.add_space(8.0);
                ui.label("Select Date Range");
                ui.horizontal(|ui| {
                    ui.label("From");
                    let start = ui.push_id("date_start", |ui| {
                        ui.add(DatePickerButton::new(&mut range.start))
                    });
                    ui.label("To");
                    let end = ui.push_id("date_end", |ui| {
                        ui.add(DatePickerButton::new(&mut range.end))
                    });
                    if start.inner.changed() || end.inner.changed() {
                        action = ControlPanelAction::SelectionChanged;
                    }
                });
            }

            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);

            ui.vertical_centered(|ui| {
                let button = egui::Button::new(RichText::new("🔄 Reset All").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ResetAll;
                }
            });
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(5.0);

        let status_color = if self.status.starts_with("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.starts_with("Loaded") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Checkbox list with select all / none. Returns true when the selection changed.
    fn multi_select(
        ui: &mut egui::Ui,
        title: &str,
        options: &[String],
        selected: &mut BTreeSet<String>,
    ) -> bool {
        let mut changed = false;

        ui.label(title);
        ui.push_id(title, |ui| {
            egui::Frame::none()
                .fill(ui.visuals().widgets.noninteractive.bg_fill)
                .rounding(5.0)
                .inner_margin(5.0)
                .show(ui, |ui| {
                    ScrollArea::vertical().max_height(120.0).show(ui, |ui| {
                        for option in options {
                            let mut checked = selected.contains(option);
                            if ui.checkbox(&mut checked, option).changed() {
                                if checked {
                                    selected.insert(option.clone());
                                } else {
                                    selected.remove(option);
                                }
                                changed = true;
                            }
                        }
                    });
                });

            ui.horizontal(|ui| {
                if ui.small_button("Select All").clicked() {
                    selected.extend(options.iter().cloned());
                    changed = true;
                }
                if ui.small_button("Clear All").clicked() {
                    selected.clear();
                    changed = true;
                }
            });
        });

        changed
    }

    /// Set status line
    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    SelectionChanged,
    ResetAll,
}
