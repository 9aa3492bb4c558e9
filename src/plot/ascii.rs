//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - line views: `*` connected segments
//! - 3D scatter: `.` per sample
//!
//! Non-finite samples are skipped and break the line.

use crate::domain::Trajectory;
use crate::plot::view::View;

/// Render one view of the trajectory.
pub fn render_ascii_view(trajectory: &Trajectory, view: View, width: usize, height: usize) -> String {
    let points = view.series(trajectory);
    render_series(&points, view, width, height)
}

/// Render all seven views, separated by blank lines.
pub fn render_all_views(trajectory: &Trajectory, width: usize, height: usize) -> String {
    View::ALL
        .iter()
        .map(|&view| render_ascii_view(trajectory, view, width, height))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_series(points: &[(f64, f64)], view: View, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);
    let (h_name, v_name) = view.axes();

    let bounds = axis_bounds(points.iter().map(|p| p.0)).zip(axis_bounds(points.iter().map(|p| p.1)));
    let Some(((x_min, x_max), (y_min, y_max))) = bounds else {
        return format!("View: {} | no finite samples\n", view.title());
    };
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];
    let to_cell = |&(a, b): &(f64, f64)| {
        (
            map_x(a, x_min, x_max, width),
            map_y(b, y_min, y_max, height),
        )
    };

    if view.is_scatter() {
        for p in points.iter().filter(|p| is_finite(p)) {
            let (x, y) = to_cell(p);
            grid[y][x] = '.';
        }
    } else {
        let mut prev = None;
        for p in points {
            if !is_finite(p) {
                prev = None;
                continue;
            }
            let (x, y) = to_cell(p);
            match prev {
                Some((x0, y0)) => draw_line(&mut grid, x0, y0, x, y, '*'),
                None => grid[y][x] = '*',
            }
            prev = Some((x, y));
        }
    }

    // Build final string. We include a small header with ranges.
    let mut out = String::new();
    out.push_str(&format!(
        "View: {} | {h_name}=[{x_min:.3}, {x_max:.3}] | {v_name}=[{y_min:.3}, {y_max:.3}]\n",
        view.title()
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn is_finite(p: &(f64, f64)) -> bool {
    p.0.is_finite() && p.1.is_finite()
}

/// Finite min/max of `values`; a single repeated value is widened to ±0.5.
fn axis_bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values.filter(|v| v.is_finite()) {
        min = min.min(v);
        max = max.max(v);
    }
    if !(min.is_finite() && max.is_finite()) {
        return None;
    }
    if max > min {
        Some((min, max))
    } else {
        Some((min - 0.5, max + 0.5))
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(t: f64, t_min: f64, t_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((t - t_min) / (t_max - t_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0 && (y0 as usize) < grid.len() && x0 >= 0 && (x0 as usize) < grid[0].len() {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
