//! TUI module: Terminal User Interface using Ratatui.
//!
//! Provides the single-page dashboard:
//! - Sidebar form for patient metrics
//! - Verdict panel with precautions
//! - Metrics chart with reference lines

mod app;
mod styles;
pub mod ui;

pub use app::{App, Session};
pub use styles::DashboardTheme;
