//! Metrics chart: two filled bars with dashed reference lines.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Line as CanvasLine},
        Block, Borders, Paragraph,
    },
    Frame,
};

use crate::domain::MetricsChart;
use crate::tui::styles::DashboardTheme;

/// Horizontal extent of the plot area.
const X_MAX: f64 = 4.0;
/// Bar width in plot units.
const BAR_WIDTH: f64 = 1.2;
const DASH: f64 = 0.2;
const GAP: f64 = 0.12;

/// Left edge of each bar.
#[must_use]
pub fn bar_left_edges() -> [f64; 2] {
    [1.0 - BAR_WIDTH / 2.0, 3.0 - BAR_WIDTH / 2.0]
}

/// x positions of the vertical strokes that fill one bar.
#[must_use]
pub fn bar_strokes(left: f64) -> Vec<f64> {
    let steps = 30;
    (0..=steps)
        .map(|i| left + BAR_WIDTH * f64::from(i) / f64::from(steps))
        .collect()
}

/// Segments `(x1, x2)` of a dashed line across the plot.
#[must_use]
pub fn dash_segments() -> Vec<(f64, f64)> {
    let mut segments = Vec::new();
    let mut x = 0.0;
    while x < X_MAX {
        segments.push((x, (x + DASH).min(X_MAX)));
        x += DASH + GAP;
    }
    segments
}

/// Render the chart with its legend.
pub fn render_chart(f: &mut Frame, area: Rect, chart: &MetricsChart) {
    let block = Block::default()
        .title(Span::styled(format!(" {} ", chart.title), DashboardTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(DashboardTheme::border());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(4)])
        .split(inner);

    render_plot(f, chunks[0], chart);
    render_legend(f, chunks[1], chart);
}

fn render_plot(f: &mut Frame, area: Rect, chart: &MetricsChart) {
    let y_max = chart.y_max();

    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([0.0, X_MAX])
        .y_bounds([0.0, y_max])
        .paint(|ctx| {
            for (bar, left) in chart.bars.iter().zip(bar_left_edges()) {
                let color = DashboardTheme::rgb(bar.color);
                for x in bar_strokes(left) {
                    ctx.draw(&CanvasLine::new(x, 0.0, x, bar.value, color));
                }
            }

            ctx.layer();

            for line in &chart.reference_lines {
                let color = DashboardTheme::rgb(line.color);
                for (x1, x2) in dash_segments() {
                    ctx.draw(&CanvasLine::new(x1, line.value, x2, line.value, color));
                }
            }

            ctx.print(
                0.0,
                y_max,
                Span::styled(chart.y_label, DashboardTheme::text_secondary()),
            );
        });

    f.render_widget(canvas, area);
}

fn render_legend(f: &mut Frame, area: Rect, chart: &MetricsChart) {
    let mut lines = vec![Line::from(
        chart
            .bars
            .iter()
            .flat_map(|bar| {
                [
                    Span::styled("■ ", Style::default().fg(DashboardTheme::rgb(bar.color))),
                    Span::styled(
                        format!("{} {}   ", bar.category, format_value(bar.value)),
                        DashboardTheme::text(),
                    ),
                ]
            })
            .collect::<Vec<_>>(),
    )];

    lines.extend(chart.reference_lines.iter().map(|line| {
        Line::from(vec![
            Span::styled("- - ", Style::default().fg(DashboardTheme::rgb(line.color))),
            Span::styled(
                format!("{} ({})", line.label, format_value(line.value)),
                DashboardTheme::text_secondary(),
            ),
        ])
    }));

    f.render_widget(Paragraph::new(lines), area);
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}
