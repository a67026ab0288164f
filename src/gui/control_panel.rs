//! Control Panel Widget
//! Left side panel with the workbook, indicator and year controls.

use crate::presenter::{Presenter, Screen, View};
use egui::{Color32, ComboBox, RichText, ScrollArea};

/// Left side control panel bound to the presenter state.
pub struct ControlPanel {
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            status: "Ready".to_string(),
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui, presenter: &Presenter) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📈 Indicator Dashboard")
                    .size(20.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Workbook Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path = presenter.source_path();
                    let file_name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No workbook".to_string());
                    let color = if path.is_file() {
                        ui.visuals().text_color()
                    } else {
                        Color32::GRAY
                    };
                    ui.label(RichText::new(&file_name).size(12.0).color(color));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseWorkbook;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Indicator Section =====
        ui.label(RichText::new("📊 Select Indicator").size(14.0).strong());
        ui.add_space(5.0);

        let current = presenter.view().label();
        ComboBox::from_id_salt("indicator")
            .width(220.0)
            .selected_text(&current)
            .show_ui(ui, |ui| {
                for view in presenter.options() {
                    let label = view.label();
                    if ui.selectable_label(current == label, &label).clicked() && current != label
                    {
                        action = ControlPanelAction::SelectView(view);
                    }
                }
            });

        // ===== Year Section (indicator pages only) =====
        if let Screen::Indicator(page) = presenter.screen() {
            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);

            ui.label(RichText::new("📅 Select Years").size(14.0).strong());
            ui.add_space(5.0);

            egui::Frame::none()
                .fill(ui.visuals().widgets.noninteractive.bg_fill)
                .rounding(5.0)
                .inner_margin(5.0)
                .show(ui, |ui| {
                    ScrollArea::vertical().max_height(180.0).show(ui, |ui| {
                        for &year in &page.available_years {
                            let mut checked = presenter.selection().contains(year);
                            if ui.checkbox(&mut checked, year.to_string()).changed() {
                                action = ControlPanelAction::ToggleYear(year);
                            }
                        }
                    });
                });

            ui.add_space(5.0);
            ui.horizontal(|ui| {
                if ui.small_button("Select All").clicked() {
                    action = ControlPanelAction::SelectYears(page.available_years.clone());
                }
                if ui.small_button("Clear All").clicked() {
                    action = ControlPanelAction::SelectYears(Vec::new());
                }
            });
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        let on_indicator = matches!(presenter.view(), View::Indicator(_));
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(on_indicator, |ui| {
                let button = egui::Button::new(RichText::new("⟳ Reload").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::Reload;
                }
            });

            ui.add_space(8.0);

            let export_enabled = matches!(presenter.screen(), Screen::Indicator(_));
            ui.add_enabled_ui(export_enabled, |ui| {
                let button = egui::Button::new(RichText::new("🖼 Export Chart PNG").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportChart;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(5.0);

        let status_color = if self.status.starts_with("Error") {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseWorkbook,
    SelectView(View),
    ToggleYear(i32),
    SelectYears(Vec<i32>),
    Reload,
    ExportChart,
}
