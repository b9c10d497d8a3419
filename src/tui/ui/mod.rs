//! UI module: View components for the TUI.

pub mod chart;
pub mod form;
pub mod verdict;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::application::Submission;
use crate::tui::styles::DashboardTheme;

use self::chart::render_chart;
use self::verdict::render_verdict;

/// Page title.
pub const PAGE_TITLE: &str = "🩺 Diabetes Prediction Dashboard";

/// One-line description under the title.
pub const PAGE_SUBTITLE: &str = "A professional tool to assess diabetes risk based on patient metrics.";

pub fn render_header(f: &mut Frame, area: Rect, model: Option<&str>) {
    let mut spans = vec![
        Span::styled(" ", DashboardTheme::text()),
        Span::styled(PAGE_TITLE, DashboardTheme::title()),
        Span::styled(" │ ", DashboardTheme::text_muted()),
        Span::styled(PAGE_SUBTITLE, DashboardTheme::text_secondary()),
    ];
    if let Some(model) = model {
        spans.push(Span::styled(format!(" │ model: {model}"), DashboardTheme::text_muted()));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(DashboardTheme::border()),
    );

    f.render_widget(header, area);
}

/// Main area after (or before) a submission.
pub fn render_results(f: &mut Frame, area: Rect, submission: Option<&Submission>) {
    let Some(submission) = submission else {
        render_placeholder(f, area);
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(2, 3), Constraint::Ratio(1, 3)])
        .split(area);

    render_verdict(f, columns[0], submission);
    render_chart(f, columns[1], &submission.chart);
}

fn render_placeholder(f: &mut Frame, area: Rect) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "Enter patient metrics in the sidebar",
            DashboardTheme::text_secondary(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Focus [Predict] and press Enter (or Ctrl+P) to assess risk",
            DashboardTheme::text_muted(),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(DashboardTheme::border()),
    );

    f.render_widget(content, area);
}

/// Banner shown instead of the form when the model could not be loaded.
pub fn render_load_error(f: &mut Frame, area: Rect, message: &str) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("⚠️ Cannot Start Session", DashboardTheme::danger())),
        Line::from(""),
        Line::from(Span::styled(message, DashboardTheme::text())),
        Line::from(""),
        Line::from(vec![
            Span::styled("[Q] ", DashboardTheme::key_hint()),
            Span::styled("Quit", DashboardTheme::key_desc()),
        ]),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(DashboardTheme::danger()),
    );

    f.render_widget(content, area);
}

pub fn render_footer(f: &mut Frame, area: Rect, halted: bool) {
    let hints = if halted {
        Line::from(vec![
            Span::styled("[Q] ", DashboardTheme::key_hint()),
            Span::styled("Quit", DashboardTheme::key_desc()),
        ])
    } else {
        Line::from(vec![
            Span::styled("[↑↓/Tab] ", DashboardTheme::key_hint()),
            Span::styled("Navigate ", DashboardTheme::key_desc()),
            Span::styled("[←→/+-] ", DashboardTheme::key_hint()),
            Span::styled("Step ", DashboardTheme::key_desc()),
            Span::styled("[Enter] ", DashboardTheme::key_hint()),
            Span::styled("Commit/Predict ", DashboardTheme::key_desc()),
            Span::styled("[Ctrl+P] ", DashboardTheme::key_hint()),
            Span::styled("Predict ", DashboardTheme::key_desc()),
            Span::styled("[Esc] ", DashboardTheme::key_hint()),
            Span::styled("Quit", DashboardTheme::key_desc()),
        ])
    };

    let text = vec![
        hints,
        Line::from(Span::styled(
            "Made with ❤ using Ratatui. Indicative estimate only; not a substitute for clinical evaluation.",
            DashboardTheme::text_muted(),
        )),
    ];

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(DashboardTheme::border());

    f.render_widget(Paragraph::new(text).block(block), area);
}
