//! Main TUI application.
//!
//! Handles:
//! - Session setup (model load happens once, here)
//! - Input event handling
//! - Frame layout

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};

use crate::adapters::model_file;
use crate::application::{PredictionService, Submission};
use crate::config::AppConfig;
use crate::GlycoscopeError;

use super::ui::{
    form::{render_patient_form, PatientFormState},
    render_footer, render_header, render_load_error, render_results,
};

/// Width of the sidebar form.
const SIDEBAR_WIDTH: u16 = 38;

/// Session built once at start.
pub enum Session {
    /// Model loaded; the form is live.
    Ready(PredictionService),
    /// Model failed to load; nothing else runs.
    Halted { message: String },
}

/// Main application state
pub struct App {
    session: Session,

    /// Sidebar form (pending values survive across frames)
    form: PatientFormState,

    /// Last submission, shown until the next one
    submission: Option<Submission>,

    should_quit: bool,
}

impl App {
    /// Create the application, loading the model from the configured path.
    ///
    /// A load failure does not return an error: the app starts halted and
    /// shows the failure instead of the form.
    #[must_use]
    pub fn new(config: &AppConfig) -> Self {
        let session = match model_file::load(&config.model_path) {
            Ok(handle) => Session::Ready(PredictionService::new(Arc::new(handle))),
            Err(e) => {
                let err = GlycoscopeError::from(e);
                tracing::error!("{}", err);
                Session::Halted {
                    message: err.to_string(),
                }
            }
        };
        Self::with_session(session)
    }

    /// Create application with an injected session (Composition Root pattern).
    #[must_use]
    pub fn with_session(session: Session) -> Self {
        Self {
            session,
            form: PatientFormState::default(),
            submission: None,
            should_quit: false,
        }
    }

    #[must_use]
    pub fn is_halted(&self) -> bool {
        matches!(self.session, Session::Halted { .. })
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    #[must_use]
    pub fn form(&self) -> &PatientFormState {
        &self.form
    }

    #[must_use]
    pub fn submission(&self) -> Option<&Submission> {
        self.submission.as_ref()
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            terminal.draw(|f| self.draw(f))?;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Draw one full frame.
    pub fn draw(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Header
                Constraint::Min(0),    // Body
                Constraint::Length(3), // Footer
            ])
            .split(f.area());

        match &self.session {
            Session::Halted { message } => {
                render_header(f, chunks[0], None);
                render_load_error(f, chunks[1], message);
            }
            Session::Ready(service) => {
                render_header(f, chunks[0], Some(&service.model_description()));

                let body = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
                    .split(chunks[1]);

                render_patient_form(f, body[0], &self.form);
                render_results(f, body[1], self.submission.as_ref());
            }
        }

        render_footer(f, chunks[2], self.is_halted());
    }

    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Global quit handling
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if self.is_halted() {
            if matches!(key, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q')) {
                self.should_quit = true;
            }
            return;
        }

        self.handle_form_key(key, modifiers);
    }

    fn handle_form_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        match key {
            KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('p') | KeyCode::Char('P') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.submit();
            }
            KeyCode::Up | KeyCode::BackTab => {
                self.form.prev_field();
            }
            KeyCode::Down | KeyCode::Tab => {
                self.form.next_field();
            }
            KeyCode::Left | KeyCode::Char('-') => {
                self.form.step(-1.0);
            }
            KeyCode::Right | KeyCode::Char('+') => {
                self.form.step(1.0);
            }
            KeyCode::Char(c) => {
                self.form.input_char(c);
            }
            KeyCode::Backspace => {
                self.form.delete_char();
            }
            KeyCode::Delete => {
                self.form.clear_field();
            }
            KeyCode::Enter => {
                if self.form.submit_focused() {
                    self.submit();
                } else if self.form.commit_current() {
                    self.form.next_field();
                }
            }
            _ => {}
        }
    }

    /// Hand the committed form values to the prediction service.
    fn submit(&mut self) {
        let Session::Ready(service) = &self.session else {
            return;
        };

        let features = self.form.submit();
        tracing::info!("Form submitted");
        self.submission = Some(service.submit(&features));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Verdict;
    use crate::ports::{Classifier, PredictError};
    use ratatui::backend::TestBackend;
    use std::sync::Mutex;

    struct FixedClassifier {
        labels: Mutex<Vec<Result<Vec<i64>, PredictError>>>,
        calls: Mutex<usize>,
    }

    impl FixedClassifier {
        /// Responses are consumed front to back; the last one repeats.
        fn new(mut labels: Vec<Result<Vec<i64>, PredictError>>) -> Arc<Self> {
            labels.reverse();
            Arc::new(Self {
                labels: Mutex::new(labels),
                calls: Mutex::new(0),
            })
        }
    }

    impl Classifier for FixedClassifier {
        fn predict(&self, _features: &[f64]) -> std::result::Result<Vec<i64>, PredictError> {
            *self.calls.lock().unwrap() += 1;
            let mut labels = self.labels.lock().unwrap();
            if labels.len() > 1 {
                labels.pop().unwrap()
            } else {
                labels.last().cloned().unwrap_or(Ok(vec![0]))
            }
        }
    }

    fn ready_app(model: Arc<FixedClassifier>) -> App {
        App::with_session(Session::Ready(PredictionService::new(model)))
    }

    fn screen_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn press(app: &mut App, key: KeyCode) {
        app.handle_key(key, KeyModifiers::NONE);
    }

    fn focus_predict_and_submit(app: &mut App) {
        while !app.form().submit_focused() {
            press(app, KeyCode::Down);
        }
        press(app, KeyCode::Enter);
    }

    #[test]
    fn test_missing_model_halts_without_form() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            model_path: dir.path().join("diabetes_model.json"),
            ..AppConfig::default()
        };
        let mut app = App::new(&config);
        assert!(app.is_halted());

        let text = screen_text(&app);
        assert!(text.contains("Error loading model"));
        assert!(!text.contains("Patient Information"));
        assert!(!text.contains("Predict "));

        // No interaction other than quitting.
        press(&mut app, KeyCode::Enter);
        assert!(app.submission().is_none());
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit());
    }

    #[test]
    fn test_loaded_model_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diabetes_model.json");
        std::fs::write(
            &path,
            r#"{"model": {"kind": "logistic_regression", "coefficients": [0.05, 0.0, 0.0, 0.1, 0.0], "intercept": -10.0}}"#,
        )
        .unwrap();
        let config = AppConfig {
            model_path: path,
            ..AppConfig::default()
        };

        let mut app = App::new(&config);
        assert!(!app.is_halted());

        // Defaults: 0.05*120 + 0.1*25 - 10 = -1.5 => unlikely
        app.handle_key(KeyCode::Char('p'), KeyModifiers::CONTROL);
        let verdict = app.submission().unwrap().verdict.as_ref().unwrap();
        assert_eq!(*verdict, Verdict::Unlikely);
    }

    #[test]
    fn test_form_shown_and_no_result_before_submit() {
        let model = FixedClassifier::new(vec![Ok(vec![1])]);
        let mut app = ready_app(model.clone());

        let text = screen_text(&app);
        assert!(text.contains("Patient Information"));
        assert!(text.contains("Glucose Level"));
        assert!(text.contains("Predict"));

        // Field edits alone never predict.
        press(&mut app, KeyCode::Char('9'));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Right);
        assert!(app.submission().is_none());
        assert_eq!(*model.calls.lock().unwrap(), 0);
    }

    #[test]
    fn test_positive_submission_renders_precautions_and_chart() {
        let model = FixedClassifier::new(vec![Ok(vec![1])]);
        let mut app = ready_app(model.clone());
        focus_predict_and_submit(&mut app);

        assert_eq!(*model.calls.lock().unwrap(), 1);
        let text = screen_text(&app);
        assert!(text.contains("likely to have diabetes"));
        assert!(text.contains("Precautions:"));
        assert!(text.contains("Consult your doctor regularly"));
        assert!(text.contains("Patient Health Metrics"));
        assert!(text.contains("High Glucose Risk"));
        assert!(text.contains("Healthy BMI"));
    }

    #[test]
    fn test_negative_submission_renders_encouragement() {
        let model = FixedClassifier::new(vec![Ok(vec![0])]);
        let mut app = ready_app(model);
        focus_predict_and_submit(&mut app);

        let text = screen_text(&app);
        assert!(text.contains("unlikely to have diabetes"));
        assert!(text.contains("Continue maintaining a healthy lifestyle!"));
        assert!(!text.contains("Precautions:"));
    }

    #[test]
    fn test_prediction_error_then_recovery() {
        let model = FixedClassifier::new(vec![
            Err(PredictError::Model("estimator crashed".into())),
            Ok(vec![1]),
        ]);
        let mut app = ready_app(model.clone());

        app.handle_key(KeyCode::Char('p'), KeyModifiers::CONTROL);
        let text = screen_text(&app);
        assert!(text.contains("Error during prediction"));
        assert!(text.contains("estimator crashed"));

        // Form is still live; resubmitting works.
        assert!(text.contains("Patient Information"));
        app.handle_key(KeyCode::Char('p'), KeyModifiers::CONTROL);
        assert_eq!(
            *app.submission().unwrap().verdict.as_ref().unwrap(),
            Verdict::Likely
        );
        assert_eq!(*model.calls.lock().unwrap(), 2);
    }

    #[test]
    fn test_enter_on_field_commits_and_advances() {
        let model = FixedClassifier::new(vec![Ok(vec![0])]);
        let mut app = ready_app(model);

        press(&mut app, KeyCode::Delete);
        for c in "155".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.form().focus, 1);
        assert!(app.submission().is_none());

        app.handle_key(KeyCode::Char('p'), KeyModifiers::CONTROL);
        assert_eq!(app.submission().unwrap().chart.bars[0].value, 155.0);
    }

    #[test]
    fn test_escape_quits() {
        let mut app = ready_app(FixedClassifier::new(vec![]));
        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit());
    }
}
