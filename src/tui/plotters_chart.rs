//! Plotters-powered trajectory chart widget for Ratatui.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// A render-only chart description; series and bounds are computed outside
/// the render call.
pub struct TrajectoryChart<'a> {
    /// Connected runs of finite samples (planar views).
    pub segments: &'a [Vec<(f64, f64)>],
    /// Unconnected samples (3D scatter).
    pub points: &'a [(f64, f64)],
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub x_label: &'a str,
    pub y_label: &'a str,
}

impl<'a> Widget for TrajectoryChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to build a chart in a tiny area.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| format!("{v:.1}"))
                .y_label_formatter(&|v| format!("{v:.1}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            let line_color = RGBColor(0, 255, 255); // cyan
            for segment in self.segments {
                chart.draw_series(LineSeries::new(segment.iter().copied(), &line_color))?;
            }

            // `Circle` radii are mis-scaled by the backend; a `Pixel` is a clean dot.
            chart.draw_series(self.points.iter().map(|&(x, y)| Pixel::new((x, y), WHITE)))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}
