//! Patient information form (sidebar).
//!
//! Edits stay pending in the form. Only the Predict control hands the
//! committed values to the caller.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::domain::{FieldKind, FieldSpec, PatientFeatures, FEATURE_COUNT, FIELD_SPECS};
use crate::tui::styles::DashboardTheme;

/// One bounded numeric control.
#[derive(Debug, Clone)]
pub struct NumberField {
    pub spec: FieldSpec,
    /// Committed value, always inside the field's range.
    pub value: f64,
    /// Text being typed, if an edit is in progress.
    pub buffer: Option<String>,
}

impl NumberField {
    fn new(spec: FieldSpec) -> Self {
        Self {
            spec,
            value: spec.default,
            buffer: None,
        }
    }

    /// Text shown in the control.
    #[must_use]
    pub fn display(&self) -> String {
        match &self.buffer {
            Some(text) => text.clone(),
            None => self.spec.format(self.value),
        }
    }

    /// Apply the pending buffer.
    ///
    /// Out-of-range or unparsable entries are rejected and the previous
    /// value is kept.
    fn commit(&mut self) -> Result<(), String> {
        let Some(text) = self.buffer.take() else {
            return Ok(());
        };
        if text.is_empty() {
            return Ok(());
        }

        let parsed: f64 = text
            .parse()
            .map_err(|_| format!("{}: invalid number", self.spec.label))?;
        if !self.spec.accepts(parsed) {
            return Err(format!(
                "{}: value must be between {} and {}",
                self.spec.label,
                self.spec.format(self.spec.min),
                self.spec.format(self.spec.max)
            ));
        }

        self.value = self.spec.round(parsed);
        Ok(())
    }

    fn step(&mut self, direction: f64) {
        self.value = self.spec.clamp(self.value + direction * self.spec.step());
    }
}

/// Sidebar form state.
pub struct PatientFormState {
    pub fields: Vec<NumberField>,
    /// `0..FEATURE_COUNT` are fields; `FEATURE_COUNT` is the Predict control.
    pub focus: usize,
    pub notice: Option<String>,
}

impl Default for PatientFormState {
    fn default() -> Self {
        Self {
            fields: FIELD_SPECS.iter().copied().map(NumberField::new).collect(),
            focus: 0,
            notice: None,
        }
    }
}

impl PatientFormState {
    /// Index of the Predict control in the focus ring.
    pub const SUBMIT: usize = FEATURE_COUNT;

    /// Whether the Predict control has focus.
    #[must_use]
    pub fn submit_focused(&self) -> bool {
        self.focus == Self::SUBMIT
    }

    /// Move to the next control
    pub fn next_field(&mut self) {
        self.commit_current();
        self.focus = (self.focus + 1) % (Self::SUBMIT + 1);
    }

    /// Move to the previous control
    pub fn prev_field(&mut self) {
        self.commit_current();
        self.focus = if self.focus == 0 {
            Self::SUBMIT
        } else {
            self.focus - 1
        };
    }

    fn current_mut(&mut self) -> Option<&mut NumberField> {
        self.fields.get_mut(self.focus)
    }

    /// Type a character into the focused field.
    pub fn input_char(&mut self, c: char) {
        let Some(field) = self.current_mut() else {
            return;
        };
        let accepts_point = matches!(field.spec.kind, FieldKind::Real { .. });
        let buffer = field.buffer.get_or_insert_with(String::new);

        let ok = c.is_ascii_digit() || (c == '.' && accepts_point && !buffer.contains('.'));
        if ok {
            buffer.push(c);
            self.notice = None;
        }
    }

    /// Delete the last character of the focused field
    pub fn delete_char(&mut self) {
        if let Some(field) = self.current_mut() {
            let text = field.display();
            let buffer = field.buffer.get_or_insert(text);
            buffer.pop();
        }
    }

    /// Start a fresh entry in the focused field
    pub fn clear_field(&mut self) {
        if let Some(field) = self.current_mut() {
            field.buffer = Some(String::new());
        }
    }

    /// Step the focused field up or down, saturating at its bounds.
    pub fn step(&mut self, direction: f64) {
        self.commit_current();
        if let Some(field) = self.current_mut() {
            field.step(direction);
        }
    }

    /// Commit the focused field's pending text.
    ///
    /// Returns false if the entry was rejected.
    pub fn commit_current(&mut self) -> bool {
        let Some(field) = self.current_mut() else {
            return true;
        };
        match field.commit() {
            Ok(()) => true,
            Err(notice) => {
                self.notice = Some(notice);
                false
            }
        }
    }

    /// Committed values in classifier order.
    #[must_use]
    pub fn features(&self) -> PatientFeatures {
        PatientFeatures {
            glucose: self.fields[0].value,
            blood_pressure: self.fields[1].value,
            insulin: self.fields[2].value,
            bmi: self.fields[3].value,
            age: self.fields[4].value,
        }
    }

    /// Commit pending text and return the submitted values.
    ///
    /// A rejected entry keeps the field's previous value, so submission
    /// always carries in-range numbers.
    pub fn submit(&mut self) -> PatientFeatures {
        self.commit_current();
        self.features()
    }
}

/// Render the sidebar form
pub fn render_patient_form(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let block = Block::default()
        .title(Span::styled(" Patient Information ", DashboardTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(DashboardTheme::border());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let constraints: Vec<Constraint> = state
        .fields
        .iter()
        .map(|_| Constraint::Length(3))
        .chain([Constraint::Length(3), Constraint::Min(0)])
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (i, field) in state.fields.iter().enumerate() {
        render_field(f, chunks[i], field, state.focus == i);
    }

    render_submit(f, chunks[state.fields.len()], state.submit_focused());
    render_notice(f, chunks[state.fields.len() + 1], state);
}

fn render_field(f: &mut Frame, area: Rect, field: &NumberField, is_selected: bool) {
    let (border_style, title_style) = if is_selected {
        (DashboardTheme::border_focused(), DashboardTheme::focused())
    } else {
        (DashboardTheme::border(), DashboardTheme::text_secondary())
    };

    let block = Block::default()
        .title(Span::styled(format!(" {} ", field.spec.label), title_style))
        .borders(Borders::ALL)
        .border_style(border_style);

    let value_style = if field.buffer.is_some() {
        DashboardTheme::focused()
    } else {
        DashboardTheme::text()
    };

    let content = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(field.display(), value_style),
        if is_selected {
            Span::styled("▌", DashboardTheme::cursor())
        } else {
            Span::raw("")
        },
        Span::styled(format!("  {}", field.spec.hint), DashboardTheme::text_muted()),
    ]))
    .block(block);

    f.render_widget(content, area);
}

fn render_submit(f: &mut Frame, area: Rect, focused: bool) {
    let style = if focused {
        DashboardTheme::selected()
    } else {
        DashboardTheme::focused()
    };

    let button = Paragraph::new(Line::from(Span::styled("  Predict  ", style)))
        .alignment(ratatui::layout::Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(if focused {
                    DashboardTheme::border_focused()
                } else {
                    DashboardTheme::border()
                }),
        );

    f.render_widget(button, area);
}

fn render_notice(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let Some(notice) = &state.notice else {
        return;
    };

    let p = Paragraph::new(Line::from(vec![
        Span::styled("! ", DashboardTheme::warning()),
        Span::styled(notice.clone(), DashboardTheme::warning()),
    ]))
    .wrap(Wrap { trim: true });
    f.render_widget(p, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_text(form: &mut PatientFormState, text: &str) {
        form.clear_field();
        for c in text.chars() {
            form.input_char(c);
        }
    }

    #[test]
    fn test_defaults() {
        let form = PatientFormState::default();
        assert_eq!(form.features(), PatientFeatures::default());
        assert_eq!(form.fields[3].display(), "25.0");
        assert_eq!(form.fields[0].display(), "120");
    }

    #[test]
    fn test_typed_value_commits_on_navigation() {
        let mut form = PatientFormState::default();
        type_text(&mut form, "148");
        form.next_field();
        assert_eq!(form.features().glucose, 148.0);
        assert_eq!(form.focus, 1);
    }

    #[test]
    fn test_out_of_range_entry_rejected() {
        let mut form = PatientFormState::default();
        type_text(&mut form, "301");
        assert!(!form.commit_current());
        assert_eq!(form.features().glucose, 120.0);
        assert!(form.notice.as_deref().unwrap_or("").contains("between 0 and 300"));
    }

    #[test]
    fn test_integer_fields_reject_decimal_point() {
        let mut form = PatientFormState::default();
        type_text(&mut form, "12.5");
        form.commit_current();
        assert_eq!(form.features().glucose, 125.0);
    }

    #[test]
    fn test_bmi_rounds_to_one_decimal() {
        let mut form = PatientFormState::default();
        form.focus = 3;
        type_text(&mut form, "33.66");
        form.commit_current();
        assert!((form.features().bmi - 33.7).abs() < 1e-9);
    }

    #[test]
    fn test_step_saturates() {
        let mut form = PatientFormState::default();
        form.focus = 4;
        type_text(&mut form, "120");
        form.step(1.0);
        assert_eq!(form.features().age, 120.0);

        form.focus = 3;
        type_text(&mut form, "0");
        form.step(-1.0);
        assert_eq!(form.features().bmi, 0.0);
        form.step(1.0);
        assert!((form.features().bmi - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_focus_wraps_through_submit() {
        let mut form = PatientFormState::default();
        form.prev_field();
        assert!(form.submit_focused());
        form.next_field();
        assert_eq!(form.focus, 0);
    }

    #[test]
    fn test_submit_commits_pending_edit() {
        let mut form = PatientFormState::default();
        form.focus = 2;
        type_text(&mut form, "200");
        let features = form.submit();
        assert_eq!(features.insulin, 200.0);
        // Values stay in the form after submission.
        assert_eq!(form.features().insulin, 200.0);
    }

    #[test]
    fn test_empty_entry_keeps_value() {
        let mut form = PatientFormState::default();
        form.clear_field();
        form.next_field();
        assert_eq!(form.features().glucose, 120.0);
    }

    #[test]
    fn test_backspace_edits_current_value() {
        let mut form = PatientFormState::default();
        form.delete_char();
        assert_eq!(form.fields[0].display(), "12");
        form.commit_current();
        assert_eq!(form.features().glucose, 12.0);
    }
}
