//! Ratatui-based terminal UI.
//!
//! Shows one of the seven trajectory views at a time and lets the user switch
//! views, change the integration order, nudge rho and export the current run.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
    Terminal,
};

use crate::app::pipeline::{export_run, run_simulation, RunOutput};
use crate::domain::{SimConfig, Trajectory};
use crate::error::AppError;
use crate::io::resolve_export_path;
use crate::plot::View;

mod plotters_chart;

use plotters_chart::TrajectoryChart;

/// Start the TUI with an initial configuration.
pub fn run(config: SimConfig) -> Result<(), AppError> {
    // Evolve before touching the terminal so config errors print normally.
    let mut app = App::new(config)?;

    let _guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::render(format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::render(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::render(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    config: SimConfig,
    view: View,
    status: String,
    run: RunOutput,
}

impl App {
    fn new(config: SimConfig) -> Result<Self, AppError> {
        let run = run_simulation(&config)?;
        Ok(Self {
            config,
            view: View::Tx,
            status: "Ready.".to_string(),
            run,
        })
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::render(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::render(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::render(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code)? {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> Result<bool, AppError> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Right => {
                self.view = self.view.next();
                self.status = format!("view: {}", self.view.title());
            }
            KeyCode::Left => {
                self.view = self.view.prev();
                self.status = format!("view: {}", self.view.title());
            }
            KeyCode::Char('o') => {
                self.config.order = self.config.order.next();
                self.rerun()?;
                self.status = format!("order: {}", self.config.order.display_name());
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.config.params.rho += 1.0;
                self.rerun()?;
                self.status = format!("rho: {}", self.config.params.rho);
            }
            KeyCode::Char('-') => {
                self.config.params.rho -= 1.0;
                self.rerun()?;
                self.status = format!("rho: {}", self.config.params.rho);
            }
            KeyCode::Char('e') => {
                let path = resolve_export_path(None);
                self.status = match export_run(&self.run, &path) {
                    Ok(()) => format!("Wrote {} rows to {}", self.run.trajectory.len(), path.display()),
                    Err(err) => format!("Export failed: {err}"),
                };
            }
            _ => {}
        }
        Ok(false)
    }

    fn rerun(&mut self) -> Result<(), AppError> {
        self.run = run_simulation(&self.config)?;
        Ok(())
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(frame.area());

        self.draw_header(frame, chunks[0]);
        self.draw_chart(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let p = &self.config.params;
        let g = &self.config.grid;
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("lorenz", Style::default().fg(Color::Cyan)),
            Span::raw(format!(
                " | sigma={} beta={:.4} rho={} | {}",
                p.sigma,
                p.beta,
                p.rho,
                self.config.order.display_name()
            )),
        ]));

        let mut info = format!("n={} | t=[{}, {}] | dt={}", g.points, g.start, g.end, g.dt());
        if let Some(idx) = self.run.trajectory.first_non_finite() {
            info.push_str(&format!(" | non-finite from row {idx}"));
        }
        lines.push(Line::from(Span::styled(info, Style::default().fg(Color::Gray))));

        let widget = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(widget, area);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default()
            .title(format!("View: {}", self.view.title()))
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(series) = chart_series(&self.run.trajectory, self.view) else {
            let msg = Paragraph::new("No finite samples to plot.").style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        };

        let (x_label, y_label) = self.view.axes();
        let widget = TrajectoryChart {
            segments: &series.segments,
            points: &series.points,
            x_bounds: series.x_bounds,
            y_bounds: series.y_bounds,
            x_label,
            y_label,
        };
        frame.render_widget(widget, inner);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "←/→ view  o order  +/- rho  e export  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Chart-ready data for one view.
#[derive(Debug, Clone, PartialEq)]
struct ChartSeries {
    segments: Vec<Vec<(f64, f64)>>,
    points: Vec<(f64, f64)>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

/// Build chart series for Plotters, or `None` when nothing is finite.
///
/// Line views are split into finite segments; the scatter view keeps finite
/// points only.
fn chart_series(trajectory: &Trajectory, view: View) -> Option<ChartSeries> {
    let raw = view.series(trajectory);

    let mut segments: Vec<Vec<(f64, f64)>> = Vec::new();
    let mut points = Vec::new();
    let mut current = Vec::new();
    for p in raw {
        if !(p.0.is_finite() && p.1.is_finite()) {
            if !current.is_empty() {
                segments.push(std::mem::take(&mut current));
            }
            continue;
        }
        if view.is_scatter() {
            points.push(p);
        } else {
            current.push(p);
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }

    let all = || segments.iter().flatten().chain(points.iter());
    let x_bounds = padded_bounds(all().map(|p| p.0))?;
    let y_bounds = padded_bounds(all().map(|p| p.1))?;

    Some(ChartSeries {
        segments,
        points,
        x_bounds,
        y_bounds,
    })
}

fn padded_bounds(values: impl Iterator<Item = f64>) -> Option<[f64; 2]> {
    let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
    for v in values {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if !(lo.is_finite() && hi.is_finite()) {
        return None;
    }
    if hi <= lo {
        return Some([lo - 0.5, hi + 0.5]);
    }
    let pad = (hi - lo) * 0.05;
    Some([lo - pad, hi + pad])
}
