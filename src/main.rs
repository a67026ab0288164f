//! Indicator Dashboard - Macroeconomic Workbook Viewer
//!
//! Reads one sheet per indicator from a workbook and shows summary metrics,
//! a multi-year chart and a year-by-month pivot table.

mod charts;
mod config;
mod data;
mod gui;
mod presenter;

use anyhow::Result;
use config::{DashboardConfig, CONFIG_FILE};
use eframe::egui;
use gui::DashboardApp;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!("startup");

    let config = DashboardConfig::load_or_default(Path::new(CONFIG_FILE))?;
    info!("workbook: {}", config.source_path.display());

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1000.0, 650.0])
            .with_title(config.title.as_str()),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Indicator Dashboard",
        options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}
