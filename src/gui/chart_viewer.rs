//! Chart Viewer Widget
//! Central panel: welcome text, error banner, or metrics + chart + pivot table.

use crate::charts::ChartPlotter;
use crate::data::FormattedPivot;
use crate::presenter::{IndicatorPage, MetricCard, Screen, NOT_AVAILABLE};
use egui::{Color32, RichText, ScrollArea};

const SECTION_SPACING: f32 = 15.0;
const PIVOT_COL_WIDTH: f32 = 55.0;

/// Scrollable dashboard display area.
#[derive(Default)]
pub struct ChartViewer;

impl ChartViewer {
    pub fn new() -> Self {
        Self
    }

    pub fn show(&mut self, ui: &mut egui::Ui, screen: &Screen) {
        match screen {
            Screen::Welcome { title, lines } => Self::draw_welcome(ui, title, lines),
            Screen::Failed { indicator, message } => Self::draw_failure(ui, indicator, message),
            Screen::Indicator(page) => {
                ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| Self::draw_indicator(ui, page));
            }
        }
    }

    fn draw_welcome(ui: &mut egui::Ui, title: &str, lines: &[String]) {
        ui.add_space(20.0);
        ui.heading(RichText::new(title).size(32.0).strong());
        ui.add_space(10.0);
        for line in lines {
            ui.label(RichText::new(line).size(15.0));
        }
    }

    fn draw_failure(ui: &mut egui::Ui, indicator: &str, message: &str) {
        ui.add_space(20.0);
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(2.0, Color32::from_rgb(220, 53, 69)))
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.label(
                    RichText::new(format!("⚠ Cannot show {} analysis", indicator))
                        .size(18.0)
                        .strong()
                        .color(Color32::from_rgb(220, 53, 69)),
                );
                ui.add_space(6.0);
                ui.label(RichText::new(message).size(13.0));
            });
    }

    fn draw_indicator(ui: &mut egui::Ui, page: &IndicatorPage) {
        ui.columns(page.metrics.len().max(1), |columns| {
            for (column, metric) in columns.iter_mut().zip(&page.metrics) {
                Self::draw_metric(column, metric);
            }
        });

        ui.add_space(SECTION_SPACING);
        ChartPlotter::draw_line_chart(ui, &page.chart);

        ui.add_space(SECTION_SPACING);
        Self::draw_pivot(ui, &page.pivot);
    }

    fn draw_metric(ui: &mut egui::Ui, metric: &MetricCard) {
        let value_color = if metric.value == NOT_AVAILABLE {
            Color32::GRAY
        } else if !metric.delta {
            ui.visuals().strong_text_color()
        } else if metric.value.starts_with('+') {
            Color32::from_rgb(220, 53, 69)
        } else if metric.value.starts_with('-') {
            Color32::from_rgb(40, 167, 69)
        } else {
            ui.visuals().strong_text_color()
        };

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(8.0)
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(RichText::new(&metric.label).size(13.0))
                    .on_hover_text(&metric.help);
                ui.label(RichText::new(&metric.value).size(26.0).color(value_color))
                    .on_hover_text(&metric.help);
            });
    }

    fn draw_pivot(ui: &mut egui::Ui, pivot: &FormattedPivot) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ScrollArea::horizontal().show(ui, |ui| {
                    egui::Grid::new("pivot_table")
                        .striped(true)
                        .min_col_width(PIVOT_COL_WIDTH)
                        .spacing([8.0, 4.0])
                        .show(ui, |ui| {
                            // Headers
                            ui.label(RichText::new("Year").strong().size(12.0));
                            for column in &pivot.columns {
                                ui.label(RichText::new(column).strong().size(12.0));
                            }
                            ui.end_row();

                            for (year, cells) in &pivot.rows {
                                ui.label(RichText::new(year).strong().size(12.0));
                                for cell in cells {
                                    ui.label(RichText::new(cell).size(12.0));
                                }
                                ui.end_row();
                            }
                        });
                });
            });
    }
}
