use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use tracing::{info, warn};
use workorder_core::error::WorkOrderError;
use workorder_core::form::{FieldValue, FormField};
use workorder_core::message::MessageKind;
use workorder_core::screen::{EditWorkScreen, Navigation, Phase, Submission};
use workorder_core::store::Store;
use workorder_service::BlockingHttpService;

use crate::components::centered_rect;
use crate::components::field::{field_line, DateInput, FieldEvent, SelectInput, TextInput};

/// Something on the screen that can take focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Field(FormField),
    RechangeTitle(usize),
    RechangeNumber(usize),
}

/// What the app is currently doing
#[derive(Debug, Clone)]
pub enum Mode {
    /// Moving between fields
    Browse,
    /// Typing into a text or numeric field
    EditText { focus: Focus, input: TextInput },
    EditDate { input: DateInput },
    /// Choosing a client, machine or part
    Pick { focus: Focus, select: SelectInput },
    /// Confirmation after a save or close
    Done { navigation: Navigation },
}

pub struct App {
    service: BlockingHttpService,
    store: Store,
    screen: EditWorkScreen,
    mode: Mode,
    focus: usize,
    status_message: Option<String>,
}

impl App {
    /// Build the app and load the screen's work order.
    pub fn new(service: BlockingHttpService, store: Store, screen: EditWorkScreen) -> Self {
        let mut app = Self {
            service,
            store,
            screen,
            mode: Mode::Browse,
            focus: 0,
            status_message: None,
        };
        app.service.load_screen(&mut app.store, &mut app.screen);
        app
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn screen(&self) -> &EditWorkScreen {
        &self.screen
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// Form fields first, then two targets per part row.
    pub fn focus_targets(&self) -> Vec<Focus> {
        let mut targets: Vec<Focus> = FormField::ALL.iter().copied().map(Focus::Field).collect();
        for i in 0..self.screen.rechanges().len() {
            targets.push(Focus::RechangeTitle(i));
            targets.push(Focus::RechangeNumber(i));
        }
        targets
    }

    pub fn focused(&self) -> Focus {
        self.focus_targets()
            .get(self.focus)
            .copied()
            .unwrap_or(Focus::Field(FormField::Client))
    }

    pub fn is_input_mode(&self) -> bool {
        matches!(
            self.mode,
            Mode::EditText { .. } | Mode::EditDate { .. } | Mode::Pick { .. }
        )
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        self.status_message = None;

        if self.store.modal.is_open {
            self.handle_modal(key);
            return;
        }

        match self.mode.clone() {
            Mode::Browse => self.handle_browse(key),
            Mode::EditText { focus, input } => self.handle_edit_text(key, focus, input),
            Mode::EditDate { input } => self.handle_edit_date(key, input),
            Mode::Pick { focus, select } => self.handle_pick(key, focus, select),
            Mode::Done { .. } => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                    self.mode = Mode::Browse;
                }
            }
        }
    }

    fn handle_modal(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                let submission = self.service.accept_modal(&mut self.store, &mut self.screen);
                self.after_submit(submission);
            }
            KeyCode::Char('n') | KeyCode::Esc => self.screen.decline_modal(&mut self.store),
            _ => {}
        }
    }

    fn handle_browse(&mut self, key: KeyEvent) {
        let count = self.focus_targets().len();
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if self.focus + 1 < count {
                    self.focus += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if self.focus > 0 {
                    self.focus -= 1;
                }
            }
            KeyCode::Char('e') => {
                if self.screen.enable_edit() {
                    self.status_message = Some("Editing".into());
                } else if self.screen.is_finished() {
                    self.status_message = Some("Work order is closed".into());
                }
            }
            KeyCode::Enter => self.open_editor(),
            KeyCode::Char('a') => match self.screen.add_rechange() {
                Ok(index) => {
                    if let Some(pos) = self
                        .focus_targets()
                        .iter()
                        .position(|f| *f == Focus::RechangeTitle(index))
                    {
                        self.focus = pos;
                    }
                }
                Err(e) => self.status_message = Some(format!("Error: {e}")),
            },
            KeyCode::Char('s') => {
                let submission = self.service.submit_screen(&mut self.store, &mut self.screen);
                self.after_submit(submission);
            }
            KeyCode::Char('f') => self.finish(),
            KeyCode::Esc => self.store.hide_message(),
            _ => {}
        }
    }

    fn finish(&mut self) {
        let closable = self.screen.phase() == Phase::ReadOnly
            && !self.screen.is_finished()
            && self.screen.work_id().is_some();
        if !closable {
            self.status_message = Some("Only a saved, open work order can be closed".into());
            return;
        }
        if self.service.finish_screen(&mut self.store, &mut self.screen) {
            self.show_navigation();
        }
    }

    fn after_submit(&mut self, submission: Submission) {
        match submission {
            Submission::Ignored => {
                self.status_message = Some("Press e to edit before saving".into());
            }
            Submission::Invalid => {}
            Submission::Create(_) | Submission::Update { .. } => self.show_navigation(),
        }
    }

    fn show_navigation(&mut self) {
        if let Some(navigation) = self.screen.take_navigation() {
            info!("navigating to {}: {}", navigation.screen, navigation.message);
            self.mode = Mode::Done { navigation };
        }
    }

    fn open_editor(&mut self) {
        if self.screen.phase() != Phase::Editing {
            self.status_message = Some("Press e to edit".into());
            return;
        }
        let focus = self.focused();
        let values = self.screen.form().values();
        let refs = &self.store.references;
        let row = |i: usize| self.screen.rechanges().rows().get(i);

        self.mode = match focus {
            Focus::Field(field @ FormField::Client) => Mode::Pick {
                focus,
                select: SelectInput::new(field.label(), refs.client_names(), &values.client),
            },
            Focus::Field(field @ FormField::Machine) => Mode::Pick {
                focus,
                select: SelectInput::new(field.label(), refs.machine_names(), &values.machine),
            },
            Focus::Field(field @ FormField::Date) => Mode::EditDate {
                input: DateInput::new(field.label(), values.date),
            },
            Focus::Field(field @ FormField::Hours) => Mode::EditText {
                focus,
                input: TextInput::numeric(field.label(), &values.hours),
            },
            Focus::Field(field @ FormField::Works) => Mode::EditText {
                focus,
                input: TextInput::new(field.label(), &values.works),
            },
            Focus::RechangeTitle(i) => Mode::Pick {
                focus,
                select: SelectInput::new(
                    "Part",
                    refs.part_titles(),
                    row(i).map(|r| r.title.as_str()).unwrap_or_default(),
                ),
            },
            Focus::RechangeNumber(i) => Mode::EditText {
                focus,
                input: TextInput::numeric(
                    "Quantity",
                    row(i).map(|r| r.number.as_str()).unwrap_or_default(),
                ),
            },
        };
    }

    fn handle_edit_text(&mut self, key: KeyEvent, focus: Focus, mut input: TextInput) {
        match input.handle_key(key) {
            FieldEvent::Pending => self.mode = Mode::EditText { focus, input },
            FieldEvent::Cancel => self.mode = Mode::Browse,
            FieldEvent::Commit(value) => {
                self.commit(focus, value);
                self.mode = Mode::Browse;
            }
        }
    }

    fn handle_edit_date(&mut self, key: KeyEvent, mut input: DateInput) {
        match input.handle_key(key) {
            FieldEvent::Pending => self.mode = Mode::EditDate { input },
            FieldEvent::Cancel => self.mode = Mode::Browse,
            FieldEvent::Commit(value) => {
                self.commit(Focus::Field(FormField::Date), value);
                self.mode = Mode::Browse;
            }
        }
    }

    fn handle_pick(&mut self, key: KeyEvent, focus: Focus, mut select: SelectInput) {
        match select.handle_key(key) {
            FieldEvent::Pending => self.mode = Mode::Pick { focus, select },
            FieldEvent::Cancel => self.mode = Mode::Browse,
            FieldEvent::Commit(value) => {
                self.commit(focus, value);
                self.mode = Mode::Browse;
            }
        }
    }

    fn commit(&mut self, focus: Focus, value: FieldValue) {
        let result = match (focus, value) {
            (Focus::Field(field), value) => self.screen.set_field(field, value),
            (Focus::RechangeNumber(i), FieldValue::Text(number)) => {
                self.screen.edit_rechange_number(i, number)
            }
            (Focus::RechangeTitle(i), FieldValue::Text(title)) => {
                self.screen.select_rechange_title(i, title, &self.store)
            }
            (_, FieldValue::Date(_)) => Err(WorkOrderError::InvalidInput(
                "a date does not fit here".into(),
            )),
        };
        if let Err(e) = result {
            warn!("edit rejected: {e}");
            self.status_message = Some(format!("Error: {e}"));
        }
    }

    // -- Rendering --

    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let banner_height = if self.store.message.show { 1 } else { 0 };

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(banner_height),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        self.render_title_bar(frame, layout[0]);
        if self.store.message.show {
            self.render_banner(frame, layout[1]);
        }
        self.render_body(frame, layout[2]);
        self.render_status_bar(frame, layout[3]);

        // Overlays
        match &self.mode {
            Mode::Browse => {}
            Mode::EditText { input, .. } => input.render(frame, area),
            Mode::EditDate { input } => input.render(frame, area),
            Mode::Pick { select, .. } => select.render(frame, area),
            Mode::Done { navigation } => self.render_done(frame, navigation, area),
        }
        if self.store.modal.is_open {
            self.render_modal(frame, area);
        }
    }

    fn render_title_bar(&self, frame: &mut Frame, area: Rect) {
        let (state, color) = match self.screen.phase() {
            Phase::Loading => ("loading", Color::DarkGray),
            Phase::Error => ("error", Color::Red),
            Phase::ReadOnly if self.screen.is_finished() => ("closed", Color::Red),
            Phase::ReadOnly => ("read only", Color::Green),
            Phase::Editing => ("editing", Color::Yellow),
            Phase::Submitting => ("saving", Color::Yellow),
        };
        let mut spans = vec![
            Span::styled(" workorder ", Style::default().bold().fg(Color::Cyan)),
            Span::raw("| "),
            Span::styled(self.screen.title(), Style::default().fg(Color::Yellow)),
            Span::raw(" | "),
            Span::styled(state, Style::default().fg(color)),
        ];
        if let Some(ref session) = self.store.session {
            spans.push(Span::styled(
                format!("  {}", session.email),
                Style::default().fg(Color::DarkGray),
            ));
        }
        frame.render_widget(Line::from(spans), area);
    }

    fn render_banner(&self, frame: &mut Frame, area: Rect) {
        let bg = match self.store.message.kind {
            MessageKind::Success => Color::Green,
            MessageKind::Danger => Color::Red,
            MessageKind::Info => Color::Blue,
        };
        let line = Line::from(Span::styled(
            format!(" {} ", self.store.message.message),
            Style::default().fg(Color::White).bg(bg).bold(),
        ));
        frame.render_widget(line, area);
    }

    fn render_body(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", self.screen.title()));

        if !self.screen.is_renderable(&self.store) {
            let paragraph = if self.screen.phase() == Phase::Error {
                Paragraph::new("Could not load the work order.")
                    .style(Style::default().fg(Color::Red))
            } else {
                Paragraph::new("Loading...")
            };
            frame.render_widget(paragraph.block(block).alignment(Alignment::Center), area);
            return;
        }

        let focused = self.focused();
        let form = self.screen.form();
        let displays: Vec<(FormField, String)> = FormField::ALL
            .iter()
            .map(|f| (*f, form.values().display(*f)))
            .collect();

        let mut lines: Vec<Line> = displays
            .iter()
            .map(|(field, value)| {
                field_line(
                    field.label(),
                    value,
                    form.errors().get(*field),
                    focused == Focus::Field(*field),
                )
            })
            .collect();

        lines.push(Line::raw(""));
        lines.push(Line::styled(" Parts", Style::default().bold()));
        let rows = self.screen.rechanges();
        let editing = self.screen.phase() == Phase::Editing;
        for (i, row) in rows.rows().iter().enumerate() {
            let errors = rows.errors().get(i).copied().unwrap_or_default();
            lines.push(field_line(
                "Part",
                &row.title,
                errors.title,
                focused == Focus::RechangeTitle(i),
            ));
            lines.push(field_line(
                "Quantity",
                &row.number,
                errors.number,
                focused == Focus::RechangeNumber(i),
            ));
            if editing && rows.shows_add(i) {
                lines.push(Line::styled(
                    "  [a] add part",
                    Style::default().fg(Color::DarkGray),
                ));
            }
        }

        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        if let Some(ref msg) = self.status_message {
            let line = Line::from(Span::styled(
                format!(" {msg}"),
                Style::default().fg(Color::Green),
            ));
            frame.render_widget(line, area);
            return;
        }

        let hints = if self.store.modal.is_open {
            vec![("y", "try again"), ("n", "close")]
        } else {
            match &self.mode {
                Mode::Browse => match self.screen.phase() {
                    Phase::Editing => vec![
                        ("j/k", "move"),
                        ("Enter", "edit field"),
                        ("a", "add part"),
                        ("s", "save"),
                        ("Esc", "hide banner"),
                        ("q", "quit"),
                    ],
                    Phase::ReadOnly if !self.screen.is_finished() => vec![
                        ("j/k", "move"),
                        ("e", "edit"),
                        ("f", "close work"),
                        ("q", "quit"),
                    ],
                    _ => vec![("q", "quit")],
                },
                Mode::EditText { .. } | Mode::EditDate { .. } => {
                    vec![("Enter", "apply"), ("Esc", "cancel")]
                }
                Mode::Pick { .. } => vec![("j/k", "choose"), ("Enter", "select"), ("Esc", "cancel")],
                Mode::Done { .. } => vec![("Enter", "back")],
            }
        };

        let spans: Vec<Span> = hints
            .into_iter()
            .flat_map(|(key, desc)| {
                vec![
                    Span::styled(
                        format!(" {key}"),
                        Style::default().fg(Color::Yellow).bold(),
                    ),
                    Span::raw(format!(" {desc} ")),
                ]
            })
            .collect();

        frame.render_widget(Line::from(spans), area);
    }

    fn render_modal(&self, frame: &mut Frame, area: Rect) {
        let popup = centered_rect(50, 30, area);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(" Missing information ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red));

        let fields: Vec<&str> = self
            .screen
            .form()
            .errors()
            .flagged()
            .into_iter()
            .map(|f| f.label())
            .collect();
        let mut text = if fields.is_empty() {
            String::from("Some fields are invalid.")
        } else {
            format!("Check: {}", fields.join(", "))
        };
        if self.screen.rechanges().errors().iter().any(|e| e.any()) {
            text.push_str("\nEvery part row needs a part and a quantity.");
        }
        text.push_str("\n\n(y) try again / (n) close");

        let paragraph = Paragraph::new(text)
            .block(block)
            .wrap(Wrap { trim: false })
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, popup);
    }

    fn render_done(&self, frame: &mut Frame, navigation: &Navigation, area: Rect) {
        let popup = centered_rect(50, 20, area);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(" Done ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green));

        let text = format!("{}\n\nEnter to go back", navigation.message);
        let paragraph = Paragraph::new(text)
            .block(block)
            .wrap(Wrap { trim: false })
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, popup);
    }
}
