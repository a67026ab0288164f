//! Dashboard Presenter
//! State machine binding the indicator selector and year selection to the
//! load -> transform pipeline. Produces a `Screen` for the GUI to draw.

use crate::charts::ChartModel;
use crate::config::DashboardConfig;
use crate::data::{
    format_delta, format_percent, DataLoader, DataProcessor, FormattedPivot, LoaderError,
    Selection, TransformError,
};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

pub const MAIN_PAGE: &str = "Main Page";
const ANALYSIS_SUFFIX: &str = " Analysis";

/// Shown in place of a metric whose comparison period is missing.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error(transparent)]
    Load(#[from] LoaderError),
    #[error(transparent)]
    Transform(#[from] TransformError),
}

/// Which page the indicator selector points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    MainPage,
    /// Sheet name of the indicator
    Indicator(String),
}

impl View {
    /// Selector text, e.g. "Inflation Analysis".
    pub fn label(&self) -> String {
        match self {
            View::MainPage => MAIN_PAGE.to_string(),
            View::Indicator(sheet) => format!("{}{}", sheet, ANALYSIS_SUFFIX),
        }
    }
}

/// A labeled scalar display with a tooltip.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricCard {
    pub label: String,
    pub value: String,
    pub help: String,
    /// Signed change; the viewer colors it by direction
    pub delta: bool,
}

/// Everything drawn for one indicator.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPage {
    pub measure: String,
    pub metrics: Vec<MetricCard>,
    pub chart: ChartModel,
    pub pivot: FormattedPivot,
    /// Options for the year selector
    pub available_years: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Welcome { title: String, lines: Vec<String> },
    Indicator(IndicatorPage),
    Failed { indicator: String, message: String },
}

/// Owns the view and year selection; re-runs the pipeline on every change.
pub struct Presenter {
    config: DashboardConfig,
    source_path: PathBuf,
    indicators: Vec<String>,
    view: View,
    selection: Selection,
    screen: Screen,
}

impl Presenter {
    pub fn new(config: DashboardConfig) -> Self {
        let source_path = config.source_path.clone();
        let mut presenter = Self {
            indicators: Vec::new(),
            view: View::MainPage,
            selection: Selection::current_year(),
            screen: Self::welcome(&config),
            source_path,
            config,
        };
        presenter.refresh_indicators();
        presenter
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Selector entries: the main page followed by one entry per sheet.
    pub fn options(&self) -> Vec<View> {
        std::iter::once(View::MainPage)
            .chain(self.indicators.iter().cloned().map(View::Indicator))
            .collect()
    }

    pub fn select_view(&mut self, view: View) {
        info!("view selected: {}", view.label());
        self.view = view;
        self.render();
    }

    pub fn set_years(&mut self, selection: Selection) {
        self.selection = selection;
        self.render();
    }

    pub fn toggle_year(&mut self, year: i32) {
        self.selection.toggle(year);
        self.render();
    }

    /// Switch to another workbook and rebuild the indicator list.
    pub fn set_source(&mut self, path: PathBuf) {
        info!("workbook changed to {}", path.display());
        self.source_path = path;
        self.refresh_indicators();
        if let View::Indicator(sheet) = &self.view {
            if !self.indicators.contains(sheet) {
                self.view = View::MainPage;
            }
        }
        self.render();
    }

    /// Re-run the pipeline for the current view.
    pub fn refresh(&mut self) {
        self.render();
    }

    fn refresh_indicators(&mut self) {
        self.indicators = match DataLoader::list_sheets(&self.source_path) {
            Ok(sheets) => sheets,
            Err(e) => {
                warn!("could not list sheets: {}", e);
                vec![self.config.sheet_name.clone()]
            }
        };
    }

    fn welcome(config: &DashboardConfig) -> Screen {
        Screen::Welcome {
            title: config.title.clone(),
            lines: config.welcome.clone(),
        }
    }

    fn render(&mut self) {
        self.screen = match &self.view {
            View::MainPage => Self::welcome(&self.config),
            View::Indicator(sheet) => {
                match Self::build_page(&self.source_path, sheet, &self.selection) {
                    Ok(page) => Screen::Indicator(page),
                    Err(e) => {
                        warn!("indicator '{}' failed: {}", sheet, e);
                        Screen::Failed {
                            indicator: sheet.clone(),
                            message: e.to_string(),
                        }
                    }
                }
            }
        };
    }

    /// Load the sheet and derive metrics, chart and pivot for it.
    pub fn build_page(
        source_path: &Path,
        sheet: &str,
        selection: &Selection,
    ) -> Result<IndicatorPage, DashboardError> {
        let table = DataLoader::load(source_path, sheet, sheet)?;
        let metrics = DataProcessor::latest_metrics(&table)?;
        let series = DataProcessor::filter_series(&table, selection);
        let pivot = DataProcessor::pivot(&table)?;

        debug!(
            "sheet '{}': {} records, {} selected, {} pivot rows",
            sheet,
            table.len(),
            series.len(),
            pivot.years.len()
        );

        let delta_text = |delta: &Result<f64, TransformError>| match delta {
            Ok(v) => format_delta(*v),
            Err(e) => {
                debug!("{}", e);
                NOT_AVAILABLE.to_string()
            }
        };

        let metrics = vec![
            MetricCard {
                label: format!("{} {} Rate", metrics.latest.date.format("%B %Y"), table.measure),
                value: format_percent(metrics.latest.value),
                help: format!("Latest available month's {} rate", table.measure.to_lowercase()),
                delta: false,
            },
            MetricCard {
                label: "Change from Previous Month".to_string(),
                value: delta_text(&metrics.delta_month),
                help: "Change from the previous month".to_string(),
                delta: true,
            },
            MetricCard {
                label: "Change from Previous Year (Same Month)".to_string(),
                value: delta_text(&metrics.delta_year),
                help: "Change from the previous year, same month".to_string(),
                delta: true,
            },
        ];

        Ok(IndicatorPage {
            chart: ChartModel::from_series(&table.measure, &series),
            pivot: pivot.formatted(),
            available_years: DataProcessor::available_years(&table),
            measure: table.measure,
            metrics,
        })
    }
}
