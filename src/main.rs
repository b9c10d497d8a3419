//! Glycoscope: diabetes risk dashboard.
//!
//! Main entry point for the terminal application.

use anyhow::Result;
use std::io::IsTerminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use glycoscope::adapters::sanitize::SanitizingMakeWriter;
use glycoscope::config::AppConfig;
use glycoscope::tui::App;

fn main() -> Result<()> {
    let config = AppConfig::from_env();

    // Logs on the terminal would corrupt the alternate screen, so an
    // interactive session logs to a file unless told otherwise.
    let interactive = std::io::stdout().is_terminal();

    let (writer, _guard) = if config.log_mode.use_file(interactive) {
        if let Some(parent) = config.log_file.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(glycoscope::GlycoscopeError::Io)?;
            }
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log_file)
            .map_err(glycoscope::GlycoscopeError::Io)?;
        tracing_appender::non_blocking(file)
    } else {
        tracing_appender::non_blocking(std::io::stdout())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(SanitizingMakeWriter::new(writer)))
        .init();

    tracing::info!(model_path = %config.model_path.display(), "Starting Glycoscope...");

    let mut app = App::new(&config);
    app.run()?;

    tracing::info!("Glycoscope shutdown complete.");
    Ok(())
}
