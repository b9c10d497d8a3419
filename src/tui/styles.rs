//! Dashboard color palette and styles.
//!
//! Colors chosen for:
//! - Clinical appearance on dark terminals
//! - High contrast for the verdict banners

use ratatui::style::{Color, Modifier, Style};

use crate::domain::Verdict;

/// Dashboard theme color palette.
pub struct DashboardTheme;

impl DashboardTheme {
    // === Primary Colors ===

    /// Deep teal - Primary color
    pub const PRIMARY: Color = Color::Rgb(13, 148, 136); // #0D9488

    /// Lighter teal for highlights
    pub const PRIMARY_LIGHT: Color = Color::Rgb(45, 212, 191); // #2DD4BF

    /// Light slate for borders
    pub const SECONDARY_LIGHT: Color = Color::Rgb(148, 163, 184); // #94A3B8

    // === Semantic Colors ===

    /// Emerald - Success/unlikely
    pub const SUCCESS: Color = Color::Rgb(16, 185, 129); // #10B981

    /// Amber - Notices
    pub const WARNING: Color = Color::Rgb(251, 191, 36); // #FBBF24

    /// Rose - Error/likely
    pub const DANGER: Color = Color::Rgb(244, 63, 94); // #F43F5E

    // === Background Colors ===

    /// Near-black with blue tint
    pub const BG_DARK: Color = Color::Rgb(15, 23, 42); // #0F172A

    // === Text Colors ===

    pub const TEXT_PRIMARY: Color = Color::Rgb(248, 250, 252); // #F8FAFC
    pub const TEXT_SECONDARY: Color = Color::Rgb(148, 163, 184); // #94A3B8
    pub const TEXT_MUTED: Color = Color::Rgb(100, 116, 139); // #64748B

    // === Preset Styles ===

    /// Style for titles
    #[must_use]
    pub fn title() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for subtitles
    #[must_use]
    pub fn subtitle() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    #[must_use]
    pub fn text_secondary() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    #[must_use]
    pub fn text_muted() -> Style {
        Style::default().fg(Self::TEXT_MUTED)
    }

    #[must_use]
    pub fn success() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    #[must_use]
    pub fn warning() -> Style {
        Style::default().fg(Self::WARNING)
    }

    #[must_use]
    pub fn danger() -> Style {
        Style::default().fg(Self::DANGER)
    }

    /// Style for the focused Predict button
    #[must_use]
    pub fn selected() -> Style {
        Style::default()
            .fg(Self::BG_DARK)
            .bg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for focused elements
    #[must_use]
    pub fn focused() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn border() -> Style {
        Style::default().fg(Self::SECONDARY_LIGHT)
    }

    #[must_use]
    pub fn border_focused() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    #[must_use]
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_desc() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Cursor shown after the value being edited
    #[must_use]
    pub fn cursor() -> Style {
        Style::default().fg(Self::PRIMARY_LIGHT)
    }

    /// High-visibility banner for a verdict.
    #[must_use]
    pub fn verdict(verdict: Verdict) -> Style {
        let fg = match verdict {
            Verdict::Likely => Self::DANGER,
            Verdict::Unlikely => Self::SUCCESS,
        };
        Style::default().fg(fg).add_modifier(Modifier::BOLD)
    }

    /// Colour from an RGB triple.
    #[must_use]
    pub fn rgb((r, g, b): (u8, u8, u8)) -> Color {
        Color::Rgb(r, g, b)
    }
}
