//! Control Panel Widget
//! Left side panel with the dataset source and every dashboard filter.

use crate::dashboard::{DashboardWarning, DatasetBounds, Selection};
use crate::data::{IndexSeries, REGION_NAMES};
use egui::{Color32, ComboBox, RichText};
use std::path::PathBuf;

/// Left side control panel with dataset selection and filter controls.
pub struct ControlPanel {
    pub selection: Selection,
    pub bounds: Option<DatasetBounds>,
    pub dataset_path: Option<PathBuf>,
    pub warnings: Vec<DashboardWarning>,
    pub status: String,
    pub busy: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        let bounds = DatasetBounds {
            years: (1982, 2024),
            weeks: (1, 52),
        };
        Self {
            selection: Selection::defaults(&bounds),
            bounds: None,
            dataset_path: None,
            warnings: Vec::new(),
            status: "Ready".to_string(),
            busy: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt the extents of a freshly loaded dataset and reset the filters.
    pub fn update_bounds(&mut self, bounds: DatasetBounds) {
        self.bounds = Some(bounds);
        self.selection = Selection::defaults(&bounds);
    }

    /// Restore the default selection for the loaded dataset.
    pub fn reset_filters(&mut self) {
        if let Some(bounds) = self.bounds {
            self.selection = Selection::defaults(&bounds);
        }
        self.warnings.clear();
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🌾 VHI Dashboard")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Vegetation health of Ukrainian regions")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Dataset Section =====
        ui.label(RichText::new("📁 Dataset").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .dataset_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No dataset loaded".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if self.dataset_path.is_some() {
                            Color32::WHITE
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.add_enabled_ui(!self.busy, |ui| {
                            if ui.button("📂 Browse").clicked() {
                                action = ControlPanelAction::BrowseDataset;
                            }
                        });
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Filter Section =====
        let Some(bounds) = self.bounds else {
            ui.label(RichText::new("Load a dataset to enable the filters").color(Color32::GRAY));
            Self::show_status(ui, &self.status, &self.warnings);
            return action;
        };

        ui.label(RichText::new("🔧 Filters").size(14.0).strong());
        ui.add_space(8.0);

        let label_width = 90.0;
        let combo_width = 170.0;
        let before = self.selection.clone();

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Index:"));
            ComboBox::from_id_salt("series")
                .width(combo_width)
                .selected_text(self.selection.series.to_string())
                .show_ui(ui, |ui| {
                    for series in IndexSeries::ALL {
                        ui.selectable_value(&mut self.selection.series, series, series.to_string());
                    }
                });
        });

        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Region:"));
            let current = REGION_NAMES
                .iter()
                .find(|(id, _)| *id == self.selection.region_id)
                .map(|(_, name)| *name)
                .unwrap_or("?");
            ComboBox::from_id_salt("region")
                .width(combo_width)
                .selected_text(current)
                .show_ui(ui, |ui| {
                    for (id, name) in REGION_NAMES {
                        ui.selectable_value(&mut self.selection.region_id, id, name);
                    }
                });
        });

        ui.add_space(10.0);

        ui.label("Years:");
        let years = bounds.years.0..=bounds.years.1;
        ui.add(egui::Slider::new(&mut self.selection.years.0, years.clone()).text("from"));
        ui.add(egui::Slider::new(&mut self.selection.years.1, years).text("to"));

        ui.add_space(5.0);

        ui.label("Weeks:");
        let weeks = bounds.weeks.0..=bounds.weeks.1;
        ui.add(egui::Slider::new(&mut self.selection.weeks.0, weeks.clone()).text("from"));
        ui.add(egui::Slider::new(&mut self.selection.weeks.1, weeks).text("to"));

        self.selection.normalize_ranges();

        ui.add_space(10.0);

        ui.horizontal(|ui| {
            ui.checkbox(&mut self.selection.sort_ascending, "Sort ascending");
            ui.checkbox(&mut self.selection.sort_descending, "Sort descending");
        });

        if self.selection != before {
            action = ControlPanelAction::SelectionChanged;
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            let reset = egui::Button::new(RichText::new("↺ Reset filters").size(14.0))
                .min_size(egui::vec2(200.0, 30.0));
            if ui.add(reset).clicked() {
                action = ControlPanelAction::ResetFilters;
            }

            ui.add_space(8.0);

            ui.add_enabled_ui(!self.warnings.contains(&DashboardWarning::NoData), |ui| {
                let region = egui::Button::new(RichText::new("🖼 Export region chart").size(14.0))
                    .min_size(egui::vec2(200.0, 30.0));
                if ui.add(region).clicked() {
                    action = ControlPanelAction::ExportRegionChart;
                }
            });

            ui.add_space(5.0);

            let comparison =
                egui::Button::new(RichText::new("🖼 Export comparison chart").size(14.0))
                    .min_size(egui::vec2(200.0, 30.0));
            if ui.add(comparison).clicked() {
                action = ControlPanelAction::ExportComparisonChart;
            }
        });

        Self::show_status(ui, &self.status, &self.warnings);

        action
    }

    fn show_status(ui: &mut egui::Ui, status: &str, warnings: &[DashboardWarning]) {
        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        ui.label(RichText::new("📊 Status").size(14.0).strong());
        ui.add_space(5.0);

        let status_color = if status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if status.starts_with("Loaded") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(status).size(11.0).color(status_color));

        for warning in warnings {
            ui.label(
                RichText::new(format!("⚠ {}", warning))
                    .size(11.0)
                    .color(Color32::from_rgb(243, 156, 18)),
            );
        }
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseDataset,
    SelectionChanged,
    ResetFilters,
    ExportRegionChart,
    ExportComparisonChart,
}
