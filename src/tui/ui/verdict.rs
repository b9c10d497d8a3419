//! Verdict panel: headline plus precautions or encouragement.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::application::Submission;
use crate::domain::Verdict;
use crate::tui::styles::DashboardTheme;
use crate::GlycoscopeError;

/// Lines for a verdict branch.
#[must_use]
pub fn verdict_lines(verdict: Verdict) -> Vec<Line<'static>> {
    let icon = match verdict {
        Verdict::Likely => "⚠",
        Verdict::Unlikely => "✅",
    };

    let mut lines = vec![
        Line::from(Span::styled(
            format!("{icon} {}", verdict.headline()),
            DashboardTheme::verdict(verdict),
        )),
        Line::from(""),
    ];

    if verdict.is_list() {
        lines.push(Line::from(Span::styled(
            "Precautions:",
            DashboardTheme::subtitle(),
        )));
        lines.extend(verdict.details().iter().map(|item| {
            Line::from(vec![
                Span::styled("  - ", DashboardTheme::text_secondary()),
                Span::styled(*item, DashboardTheme::text()),
            ])
        }));
    } else {
        lines.extend(
            verdict
                .details()
                .iter()
                .map(|line| Line::from(Span::styled(*line, DashboardTheme::text()))),
        );
    }

    lines
}

/// Render the verdict for a submission (or its prediction error).
pub fn render_verdict(f: &mut Frame, area: Rect, submission: &Submission) {
    let title = format!(
        " Result · {} ",
        submission.submitted_at.format("%H:%M:%S UTC")
    );

    let (lines, border) = match &submission.verdict {
        Ok(verdict) => (
            verdict_lines(*verdict),
            match verdict {
                Verdict::Likely => DashboardTheme::danger(),
                Verdict::Unlikely => DashboardTheme::success(),
            },
        ),
        Err(e) => {
            let message = GlycoscopeError::Predict(e.clone()).to_string();
            (
                vec![
                    Line::from(Span::styled("⚠️ Error", DashboardTheme::danger())),
                    Line::from(""),
                    Line::from(Span::styled(message, DashboardTheme::text())),
                ],
                DashboardTheme::danger(),
            )
        }
    };

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(Span::styled(title, DashboardTheme::subtitle()))
                .borders(Borders::ALL)
                .border_style(border),
        );

    f.render_widget(p, area);
}
