//! Charts module - Chart building and rendering

mod plotter;
mod renderer;

pub use plotter::{ChartModel, ChartPlotter};
pub use renderer::StaticChartRenderer;
