//! Single-field input widgets.
//!
//! Each widget owns its in-progress text or selection and reports a
//! [`FieldEvent`] per key. Committed values come out as [`FieldValue`]s
//! ready for the form.

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};
use workorder_core::form::{FieldValue, DISPLAY_DATE_FORMAT};
use workorder_core::work::WIRE_DATE_FORMAT;

#[derive(Debug, Clone, PartialEq)]
pub enum FieldEvent {
    /// Still editing.
    Pending,
    Commit(FieldValue),
    Cancel,
}

/// Free text or numeric text.
#[derive(Debug, Clone)]
pub struct TextInput {
    label: String,
    input: String,
    numeric: bool,
}

impl TextInput {
    pub fn new(label: impl Into<String>, initial: &str) -> Self {
        Self {
            label: label.into(),
            input: initial.to_string(),
            numeric: false,
        }
    }

    /// Only accepts digits and a decimal separator.
    pub fn numeric(label: impl Into<String>, initial: &str) -> Self {
        Self {
            numeric: true,
            ..Self::new(label, initial)
        }
    }

    pub fn value(&self) -> &str {
        &self.input
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FieldEvent {
        match key.code {
            KeyCode::Enter => FieldEvent::Commit(FieldValue::Text(self.input.clone())),
            KeyCode::Esc => FieldEvent::Cancel,
            KeyCode::Backspace => {
                self.input.pop();
                FieldEvent::Pending
            }
            KeyCode::Char(c) => {
                if !self.numeric || c.is_ascii_digit() || c == '.' || c == ',' {
                    self.input.push(c);
                }
                FieldEvent::Pending
            }
            _ => FieldEvent::Pending,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        render_input_bar(frame, &format!(" {}: ", self.label), &self.input, None, area);
    }
}

/// Parse a typed date, `YYYY-MM-DD` or `DD/MM/YYYY`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, WIRE_DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(raw, DISPLAY_DATE_FORMAT))
        .ok()
}

/// Typed date entry. Only a calendar date is kept, never a time.
#[derive(Debug, Clone)]
pub struct DateInput {
    label: String,
    input: String,
    invalid: bool,
}

impl DateInput {
    pub fn new(label: impl Into<String>, current: Option<NaiveDate>) -> Self {
        Self {
            label: label.into(),
            input: current
                .map(|d| d.format(DISPLAY_DATE_FORMAT).to_string())
                .unwrap_or_default(),
            invalid: false,
        }
    }

    pub fn value(&self) -> &str {
        &self.input
    }

    pub fn is_invalid(&self) -> bool {
        self.invalid
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FieldEvent {
        match key.code {
            KeyCode::Enter => match parse_date(&self.input) {
                Some(date) => FieldEvent::Commit(FieldValue::Date(date)),
                None => {
                    self.invalid = true;
                    FieldEvent::Pending
                }
            },
            KeyCode::Esc => FieldEvent::Cancel,
            KeyCode::Backspace => {
                self.input.pop();
                self.invalid = false;
                FieldEvent::Pending
            }
            KeyCode::Char(c) if c.is_ascii_digit() || c == '/' || c == '-' => {
                self.input.push(c);
                self.invalid = false;
                FieldEvent::Pending
            }
            _ => FieldEvent::Pending,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let hint = if self.invalid {
            Some("not a date, use DD/MM/YYYY")
        } else {
            Some("DD/MM/YYYY")
        };
        render_input_bar(frame, &format!(" {}: ", self.label), &self.input, hint, area);
    }
}

/// Pick one entry out of a reference list.
#[derive(Debug, Clone)]
pub struct SelectInput {
    label: String,
    options: Vec<String>,
    list_state: ListState,
}

impl SelectInput {
    /// Starts on `current` when it is one of the options.
    pub fn new(label: impl Into<String>, options: Vec<String>, current: &str) -> Self {
        let mut list_state = ListState::default();
        if !options.is_empty() {
            let idx = options.iter().position(|o| o == current).unwrap_or(0);
            list_state.select(Some(idx));
        }
        Self {
            label: label.into(),
            options,
            list_state,
        }
    }

    pub fn selected(&self) -> Option<&str> {
        self.list_state
            .selected()
            .and_then(|i| self.options.get(i))
            .map(String::as_str)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FieldEvent {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if let Some(i) = self.list_state.selected() {
                    if i + 1 < self.options.len() {
                        self.list_state.select(Some(i + 1));
                    }
                }
                FieldEvent::Pending
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if let Some(i) = self.list_state.selected() {
                    if i > 0 {
                        self.list_state.select(Some(i - 1));
                    }
                }
                FieldEvent::Pending
            }
            KeyCode::Enter => match self.selected() {
                Some(option) => FieldEvent::Commit(FieldValue::Text(option.to_string())),
                None => FieldEvent::Cancel,
            },
            KeyCode::Esc => FieldEvent::Cancel,
            _ => FieldEvent::Pending,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup = super::centered_rect(40, 50, area);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(format!(" {} ", self.label))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow));

        let items: Vec<ListItem> = if self.options.is_empty() {
            vec![ListItem::new("(nothing to choose from)")]
        } else {
            self.options.iter().map(|o| ListItem::new(o.as_str())).collect()
        };
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().fg(Color::Black).bg(Color::Yellow))
            .highlight_symbol("> ");
        let mut state = self.list_state.clone();
        frame.render_stateful_widget(list, popup, &mut state);
    }
}

/// One line of the read-only form: label, value, and an error marker.
pub fn field_line<'a>(label: &'a str, value: &'a str, invalid: bool, focused: bool) -> Line<'a> {
    let marker = if focused { "> " } else { "  " };
    let label_style = if invalid {
        Style::default().fg(Color::Red).bold()
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let value_span = if value.is_empty() {
        Span::styled("-", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(value)
    };
    let mut spans = vec![
        Span::styled(marker, Style::default().fg(Color::Cyan)),
        Span::styled(format!("{label:<10}"), label_style),
        value_span,
    ];
    if invalid {
        spans.push(Span::styled("  invalid", Style::default().fg(Color::Red)));
    }
    Line::from(spans)
}

fn render_input_bar(frame: &mut Frame, label: &str, input: &str, hint: Option<&str>, area: Rect) {
    let input_area = Rect {
        x: area.x,
        y: area.y + area.height.saturating_sub(3),
        width: area.width,
        height: 3.min(area.height),
    };
    frame.render_widget(Clear, input_area);
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(label.to_string());
    if let Some(hint) = hint {
        block = block.title_bottom(Line::from(format!(" {hint} ")).right_aligned());
    }
    let paragraph = Paragraph::new(input.to_string()).block(block);
    frame.render_widget(paragraph, input_area);
}
