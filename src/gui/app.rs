//! Dashboard Main Application
//! Main window with control panel and dashboard viewer.

use crate::charts::StaticChartRenderer;
use crate::config::DashboardConfig;
use crate::data::Selection;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::presenter::{Presenter, Screen};
use egui::SidePanel;
use tracing::{error, info};

const EXPORT_WIDTH: u32 = 1400;
const EXPORT_HEIGHT: u32 = 700;

/// Main application window.
pub struct DashboardApp {
    presenter: Presenter,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        Self {
            presenter: Presenter::new(config),
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
        }
    }

    fn handle_action(&mut self, action: ControlPanelAction) {
        match action {
            ControlPanelAction::None => return,
            ControlPanelAction::BrowseWorkbook => self.handle_browse_workbook(),
            ControlPanelAction::SelectView(view) => self.presenter.select_view(view),
            ControlPanelAction::ToggleYear(year) => self.presenter.toggle_year(year),
            ControlPanelAction::SelectYears(years) => {
                self.presenter.set_years(Selection::new(years))
            }
            ControlPanelAction::Reload => self.presenter.refresh(),
            ControlPanelAction::ExportChart => {
                self.handle_export_chart();
                return;
            }
        }
        self.update_status();
    }

    /// Status line reflecting the current screen
    fn update_status(&mut self) {
        let status = match self.presenter.screen() {
            Screen::Welcome { .. } => "Ready".to_string(),
            Screen::Indicator(page) => format!(
                "{}: {} years, {} selected",
                page.measure,
                page.available_years.len(),
                self.presenter.selection().years.len()
            ),
            Screen::Failed { message, .. } => format!("Error: {}", message),
        };
        self.control_panel.set_status(&status);
    }

    /// Handle workbook selection
    fn handle_browse_workbook(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Workbooks", &["xlsx", "xlsm", "xls", "ods"])
            .pick_file()
        {
            self.presenter.set_source(path);
        }
    }

    /// Render the current chart to PNG and open it
    fn handle_export_chart(&mut self) {
        let Screen::Indicator(page) = self.presenter.screen() else {
            self.control_panel.set_status("No chart to export");
            return;
        };

        let output_path = match rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name(format!("{}_chart.png", page.measure.to_lowercase()))
            .save_file()
        {
            Some(path) => path,
            None => return, // User cancelled
        };

        match StaticChartRenderer::render_png(&page.chart, &output_path, EXPORT_WIDTH, EXPORT_HEIGHT)
        {
            Ok(()) => {
                self.control_panel
                    .set_status(&format!("Chart exported: {}", output_path.display()));
                if let Err(e) = open::that(&output_path) {
                    info!("could not open exported chart: {}", e);
                }
            }
            Err(e) => {
                error!("chart export failed: {}", e);
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        let mut action = ControlPanelAction::None;
        SidePanel::left("control_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    action = self.control_panel.show(ui, &self.presenter);
                });
            });

        // Central panel - Dashboard
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui, self.presenter.screen());
        });

        // Applied after drawing so the presenter is not borrowed by the panels
        self.handle_action(action);
    }
}
