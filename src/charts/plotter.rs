//! Chart Plotter Module
//! Builds per-year line series and draws them interactively using egui_plot.

use crate::data::{month_abbrev, month_name, DataProcessor, SeriesPoint};
use egui::{Color32, RichText};
use egui_plot::{GridMark, Legend, Line, Plot, PlotPoints, Points};

/// Series colors as RGB so the static renderer can share them.
pub const PALETTE: [(u8, u8, u8); 10] = [
    (52, 152, 219),  // Blue
    (231, 76, 60),   // Red
    (46, 204, 113),  // Green
    (155, 89, 182),  // Purple
    (243, 156, 18),  // Orange
    (26, 188, 156),  // Teal
    (233, 30, 99),   // Pink
    (0, 188, 212),   // Cyan
    (255, 87, 34),   // Deep Orange
    (121, 85, 72),   // Brown
];

/// Interpolated points inserted between two observations.
const SPLINE_SAMPLES: usize = 8;
const CHART_HEIGHT: f32 = 400.0;

/// One year's observations, x = month number (1..=12).
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub year: i32,
    pub points: Vec<[f64; 2]>,
}

/// Everything needed to draw the indicator line chart.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartModel {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<ChartSeries>,
}

impl ChartModel {
    /// Group a filtered series into one chart line per year.
    pub fn from_series(measure: &str, series: &[SeriesPoint]) -> Self {
        let series = DataProcessor::group_by_year(series)
            .into_iter()
            .map(|(year, points)| {
                let mut points: Vec<[f64; 2]> = points
                    .iter()
                    .map(|p| [p.period.month as f64, p.record.value])
                    .collect();
                points.sort_by(|a, b| a[0].partial_cmp(&b[0]).unwrap_or(std::cmp::Ordering::Equal));
                ChartSeries { year, points }
            })
            .collect();

        Self {
            title: format!("{} Data Analysis", measure),
            x_label: "Month".to_string(),
            y_label: format!("{} (%)", measure),
            series,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.points.is_empty())
    }

    /// Padded value range over all series; a default span when empty.
    pub fn y_range(&self) -> (f64, f64) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for point in self.series.iter().flat_map(|s| &s.points) {
            min = min.min(point[1]);
            max = max.max(point[1]);
        }
        if min.is_infinite() {
            return (0.0, 10.0);
        }
        let pad = ((max - min) * 0.15).max(0.5);
        (min - pad, max + pad)
    }
}

/// Draws the indicator chart with egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Color for the n-th series.
    pub fn series_color(index: usize) -> Color32 {
        let (r, g, b) = PALETTE[index % PALETTE.len()];
        Color32::from_rgb(r, g, b)
    }

    /// Catmull-Rom interpolation of y through the points, endpoints clamped.
    /// x advances linearly between neighbours so the curve never turns back
    /// across a gap in the months.
    pub fn smooth(points: &[[f64; 2]], samples: usize) -> Vec<[f64; 2]> {
        if points.len() < 3 || samples == 0 {
            return points.to_vec();
        }

        let n = points.len();
        let mut out = Vec::with_capacity((n - 1) * samples + 1);
        for i in 0..n - 1 {
            let p0 = points[i.saturating_sub(1)];
            let p1 = points[i];
            let p2 = points[i + 1];
            let p3 = points[(i + 2).min(n - 1)];

            for step in 0..samples {
                let t = step as f64 / samples as f64;
                let t2 = t * t;
                let t3 = t2 * t;
                let y = 0.5
                    * (2.0 * p1[1]
                        + (-p0[1] + p2[1]) * t
                        + (2.0 * p0[1] - 5.0 * p1[1] + 4.0 * p2[1] - p3[1]) * t2
                        + (-p0[1] + 3.0 * p1[1] - 3.0 * p2[1] + p3[1]) * t3);
                out.push([p1[0] + (p2[0] - p1[0]) * t, y]);
            }
        }
        out.push(points[n - 1]);
        out
    }

    /// Draw the multi-year line chart: x = month, one line per year.
    pub fn draw_line_chart(ui: &mut egui::Ui, chart: &ChartModel) {
        ui.label(RichText::new(&chart.title).size(16.0).strong());
        ui.add_space(4.0);

        let unit_label = chart.y_label.clone();
        let (y_min, y_max) = chart.y_range();

        Plot::new("indicator_line_chart")
            .height(CHART_HEIGHT)
            .width(ui.available_width())
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label(chart.x_label.as_str())
            .y_axis_label(chart.y_label.as_str())
            .include_x(0.5)
            .include_x(12.5)
            .include_y(y_min)
            .include_y(y_max)
            .x_grid_spacer(|_input| {
                (1..=12)
                    .map(|m| GridMark {
                        value: m as f64,
                        step_size: 1.0,
                    })
                    .collect()
            })
            .x_axis_formatter(|mark, _range| {
                let v = mark.value;
                if v.fract() == 0.0 && (1.0..=12.0).contains(&v) {
                    month_abbrev(v as u32).to_string()
                } else {
                    String::new()
                }
            })
            .label_formatter(move |name, value| {
                let month = value.x.round();
                if name.is_empty() || !(1.0..=12.0).contains(&month) {
                    return String::new();
                }
                format!(
                    "{}\n{}: {:.2} {}",
                    name,
                    month_name(month as u32),
                    value.y,
                    unit_label
                )
            })
            .show(ui, |plot_ui| {
                for (idx, series) in chart.series.iter().enumerate() {
                    if series.points.is_empty() {
                        continue;
                    }
                    let color = Self::series_color(idx);
                    let name = series.year.to_string();

                    let smoothed = Self::smooth(&series.points, SPLINE_SAMPLES);
                    plot_ui.line(
                        Line::new(PlotPoints::from_iter(smoothed.into_iter()))
                            .color(color)
                            .width(2.0)
                            .name(&name),
                    );

                    plot_ui.points(
                        Points::new(PlotPoints::from_iter(series.points.iter().copied()))
                            .radius(4.0)
                            .color(color)
                            .name(&name),
                    );
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Record, Selection, Table};
    use chrono::NaiveDate;

    fn series() -> Vec<SeriesPoint> {
        let table = Table::new(
            "Inflation",
            vec![
                Record::new(NaiveDate::from_ymd_opt(2023, 2, 1).unwrap(), 5.5),
                Record::new(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(), 5.0),
                Record::new(NaiveDate::from_ymd_opt(2022, 2, 1).unwrap(), 4.0),
            ],
        );
        DataProcessor::filter_series(&table, &Selection::new([2022, 2023]))
    }

    #[test]
    fn test_chart_model_groups_by_year() {
        let chart = ChartModel::from_series("Inflation", &series());
        assert_eq!(chart.title, "Inflation Data Analysis");
        assert_eq!(chart.x_label, "Month");
        assert_eq!(chart.y_label, "Inflation (%)");
        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.series[0].year, 2022);
        assert_eq!(chart.series[1].points, vec![[1.0, 5.0], [2.0, 5.5]]);
    }

    #[test]
    fn test_empty_chart_model() {
        let chart = ChartModel::from_series("Inflation", &[]);
        assert!(chart.series.is_empty());
        assert!(chart.is_empty());
        assert_eq!(chart.y_range(), (0.0, 10.0));
    }

    #[test]
    fn test_smooth_passes_through_observations() {
        let points = [[1.0, 2.0], [2.0, 4.0], [3.0, 3.0], [4.0, 5.0]];
        let smoothed = ChartPlotter::smooth(&points, 4);
        assert_eq!(smoothed.len(), 3 * 4 + 1);
        for (i, p) in points.iter().enumerate() {
            let s = smoothed[i * 4];
            assert!((s[0] - p[0]).abs() < 1e-9);
            assert!((s[1] - p[1]).abs() < 1e-9);
        }
    }

    #[test]
    fn test_smooth_keeps_months_in_order_across_gaps() {
        let points = [[1.0, 5.0], [2.0, 5.5], [12.0, 6.0]];
        let smoothed = ChartPlotter::smooth(&points, 8);
        for pair in smoothed.windows(2) {
            assert!(pair[1][0] >= pair[0][0], "x went back: {:?}", pair);
        }
        assert_eq!(smoothed.first(), Some(&[1.0, 5.0]));
        assert_eq!(smoothed.last(), Some(&[12.0, 6.0]));
    }

    #[test]
    fn test_smooth_short_series_unchanged() {
        let points = [[1.0, 2.0], [2.0, 4.0]];
        assert_eq!(ChartPlotter::smooth(&points, 8), points.to_vec());
    }

    #[test]
    fn test_series_color_wraps() {
        assert_eq!(ChartPlotter::series_color(0), ChartPlotter::series_color(PALETTE.len()));
    }
}
