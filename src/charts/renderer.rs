//! Static Chart Renderer
//! Draws the indicator line chart to a PNG file with plotters.
//!
//! Layout matches the interactive chart: title on top, month axis along the
//! bottom, one smoothed line with markers per year and a legend box.

use crate::charts::plotter::{ChartModel, ChartPlotter, PALETTE};
use crate::data::month_abbrev;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;
use tracing::info;

const SPLINE_SAMPLES: usize = 12;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Chart rendering failed: {0}")]
    Drawing(String),
}

impl RenderError {
    fn drawing(err: impl std::fmt::Display) -> Self {
        RenderError::Drawing(err.to_string())
    }
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render the chart to `path` as a PNG of the given size.
    pub fn render_png(
        chart: &ChartModel,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(RenderError::drawing)?;

        let (y_min, y_max) = chart.y_range();

        let mut ctx = ChartBuilder::on(&root)
            .caption(&chart.title, ("sans-serif", 28).into_font())
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(0.5f64..12.5f64, y_min..y_max)
            .map_err(RenderError::drawing)?;

        ctx.configure_mesh()
            .x_labels(12)
            .x_label_formatter(&|x| {
                let m = x.round();
                if (1.0..=12.0).contains(&m) {
                    month_abbrev(m as u32).to_string()
                } else {
                    String::new()
                }
            })
            .y_label_formatter(&|y| format!("{:.1}", y))
            .x_desc(chart.x_label.as_str())
            .y_desc(chart.y_label.as_str())
            .draw()
            .map_err(RenderError::drawing)?;

        for (idx, series) in chart.series.iter().enumerate() {
            if series.points.is_empty() {
                continue;
            }
            let (r, g, b) = PALETTE[idx % PALETTE.len()];
            let color = RGBColor(r, g, b);

            let smoothed = ChartPlotter::smooth(&series.points, SPLINE_SAMPLES);
            ctx.draw_series(LineSeries::new(
                smoothed.into_iter().map(|[x, y]| (x, y)),
                color.stroke_width(2),
            ))
            .map_err(RenderError::drawing)?
            .label(series.year.to_string())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));

            ctx.draw_series(
                series
                    .points
                    .iter()
                    .map(|&[x, y]| Circle::new((x, y), 4, color.filled())),
            )
            .map_err(RenderError::drawing)?;
        }

        if !chart.is_empty() {
            ctx.configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .map_err(RenderError::drawing)?;
        }

        root.present().map_err(RenderError::drawing)?;
        info!("chart exported to {}", path.display());
        Ok(())
    }
}
