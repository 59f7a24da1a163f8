use chrono::NaiveDate;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::planner::{Category, EventKind, Priority, Subject};
use crate::theme;

pub const TITLE: &str = "Title:";
pub const NAME: &str = "Name:";
pub const GRADE: &str = "Grade:";
pub const DESCRIPTION: &str = "Notes:";
pub const PRIORITY: &str = "Priority:";
pub const CATEGORY: &str = "Category:";
pub const DUE: &str = "Due:";
pub const DATE: &str = "Date:";
pub const TIME: &str = "Time:";
pub const KIND: &str = "Type:";

/// What a submitted form creates.
#[derive(Debug, Clone, PartialEq)]
pub enum FormKind {
    Subject,
    Grade { subject_id: String, subject_name: String },
    Task,
    Event,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Choice { options: Vec<&'static str>, index: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub label: &'static str,
    pub value: FieldValue,
}

impl FormField {
    fn text(label: &'static str, initial: &str) -> Self {
        Self {
            label,
            value: FieldValue::Text(initial.to_string()),
        }
    }

    fn choice(label: &'static str, options: Vec<&'static str>, index: usize) -> Self {
        Self {
            label,
            value: FieldValue::Choice { options, index },
        }
    }

    fn display(&self) -> String {
        match &self.value {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Choice { options, index } => {
                format!("< {} >", options.get(*index).copied().unwrap_or(""))
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct FormState {
    pub kind: FormKind,
    pub fields: Vec<FormField>,
    pub active: usize,
}

impl FormState {
    fn new(kind: FormKind, fields: Vec<FormField>) -> Self {
        Self {
            kind,
            fields,
            active: 0,
        }
    }

    pub fn subject() -> Self {
        Self::new(FormKind::Subject, vec![FormField::text(NAME, "")])
    }

    pub fn grade(subject: &Subject) -> Self {
        Self::new(
            FormKind::Grade {
                subject_id: subject.id.clone(),
                subject_name: subject.name.clone(),
            },
            vec![FormField::text(GRADE, "")],
        )
    }

    pub fn task() -> Self {
        let default_priority = Priority::ALL
            .iter()
            .position(|p| *p == Priority::default())
            .unwrap_or(0);
        Self::new(
            FormKind::Task,
            vec![
                FormField::text(TITLE, ""),
                FormField::text(DESCRIPTION, ""),
                FormField::choice(PRIORITY, Priority::ALL.iter().map(|p| p.label()).collect(), default_priority),
                FormField::choice(CATEGORY, Category::ALL.iter().map(|c| c.label()).collect(), 0),
                FormField::text(DUE, ""),
            ],
        )
    }

    pub fn event(date: NaiveDate) -> Self {
        let default_kind = EventKind::ALL
            .iter()
            .position(|k| *k == EventKind::default())
            .unwrap_or(0);
        Self::new(
            FormKind::Event,
            vec![
                FormField::text(TITLE, ""),
                FormField::text(DATE, &date.format("%Y-%m-%d").to_string()),
                FormField::text(TIME, ""),
                FormField::choice(KIND, EventKind::ALL.iter().map(|k| k.label()).collect(), default_kind),
                FormField::text(DESCRIPTION, ""),
            ],
        )
    }

    pub fn title(&self) -> String {
        match &self.kind {
            FormKind::Subject => " New Subject ".to_string(),
            FormKind::Grade { subject_name, .. } => format!(" Add Grade: {} ", subject_name),
            FormKind::Task => " New Task ".to_string(),
            FormKind::Event => " New Event ".to_string(),
        }
    }

    /// Text typed into the field with `label`, empty if there is none.
    pub fn text(&self, label: &str) -> &str {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .and_then(|f| match &f.value {
                FieldValue::Text(s) => Some(s.as_str()),
                FieldValue::Choice { .. } => None,
            })
            .unwrap_or("")
    }

    /// Selected option index of the choice field with `label`.
    pub fn choice(&self, label: &str) -> usize {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .and_then(|f| match &f.value {
                FieldValue::Choice { index, .. } => Some(*index),
                FieldValue::Text(_) => None,
            })
            .unwrap_or(0)
    }

    pub fn active_is_choice(&self) -> bool {
        matches!(
            self.fields.get(self.active).map(|f| &f.value),
            Some(FieldValue::Choice { .. })
        )
    }

    pub fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.active = (self.active + 1) % self.fields.len();
        }
    }

    pub fn prev_field(&mut self) {
        if !self.fields.is_empty() {
            self.active = (self.active + self.fields.len() - 1) % self.fields.len();
        }
    }

    pub fn input_char(&mut self, c: char) {
        if let Some(FormField {
            value: FieldValue::Text(s),
            ..
        }) = self.fields.get_mut(self.active)
        {
            s.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(FormField {
            value: FieldValue::Text(s),
            ..
        }) = self.fields.get_mut(self.active)
        {
            s.pop();
        }
    }

    pub fn cycle_choice(&mut self) {
        if let Some(FormField {
            value: FieldValue::Choice { options, index },
            ..
        }) = self.fields.get_mut(self.active)
        {
            if !options.is_empty() {
                *index = (*index + 1) % options.len();
            }
        }
    }
}

pub struct Form;

impl Form {
    pub fn render(frame: &mut Frame, area: Rect, state: &FormState) {
        let theme = theme::current();

        // Center the form popup
        let form_w = area.width.clamp(30, 56).min(area.width);
        let form_h = (state.fields.len() as u16 + 4).min(area.height);
        let x = area.x + (area.width.saturating_sub(form_w)) / 2;
        let y = area.y + (area.height.saturating_sub(form_h)) / 2;
        let form_area = Rect::new(x, y, form_w, form_h);

        frame.render_widget(Clear, form_area);

        let block = Block::default()
            .title(state.title())
            .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent));

        let inner = block.inner(form_area);
        frame.render_widget(block, form_area);

        let mut constraints: Vec<Constraint> = state.fields.iter().map(|_| Constraint::Length(1)).collect();
        constraints.push(Constraint::Length(1)); // spacer
        constraints.push(Constraint::Length(1)); // help
        constraints.push(Constraint::Min(0));
        let rows = Layout::vertical(constraints).split(inner);

        for (i, field) in state.fields.iter().enumerate() {
            render_field(frame, rows[i], field.label, &field.display(), i == state.active);
        }

        let choice_hint = if state.active_is_choice() { ":Change " } else { "" };
        let mut help = vec![
            Span::styled("Tab", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Next ", theme.dim),
        ];
        if !choice_hint.is_empty() {
            help.push(Span::styled("Space", Style::default().add_modifier(Modifier::BOLD)));
            help.push(Span::styled(choice_hint, theme.dim));
        }
        help.extend([
            Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Save ", theme.dim),
            Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Cancel", theme.dim),
        ]);
        frame.render_widget(Paragraph::new(Line::from(help)), rows[state.fields.len() + 1]);
    }
}

fn render_field(frame: &mut Frame, area: Rect, label: &str, value: &str, active: bool) {
    let theme = theme::current();
    let cursor = if active { "_" } else { "" };

    let style = if active {
        Style::default().fg(theme.accent)
    } else {
        Style::default()
    };

    let spans = vec![
        Span::styled(format!("{:<10}", label), theme.dim),
        Span::styled(format!("{}{}", value, cursor), style),
    ];

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_goes_to_active_text_field() {
        let mut form = FormState::task();
        for c in "Essay".chars() {
            form.input_char(c);
        }
        form.backspace();
        assert_eq!(form.text(TITLE), "Essa");
        assert_eq!(form.text(DESCRIPTION), "");
    }

    #[test]
    fn choice_fields_ignore_typing_and_cycle() {
        let mut form = FormState::task();
        form.next_field();
        form.next_field();
        assert!(form.active_is_choice());
        assert_eq!(form.choice(PRIORITY), 1);
        form.input_char('x');
        form.cycle_choice();
        form.cycle_choice();
        assert_eq!(form.choice(PRIORITY), 0);
    }

    #[test]
    fn field_focus_wraps_both_ways() {
        let mut form = FormState::event(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
        assert_eq!(form.text(DATE), "2026-10-19");
        form.prev_field();
        assert_eq!(form.fields[form.active].label, DESCRIPTION);
        form.next_field();
        assert_eq!(form.active, 0);
    }
}
