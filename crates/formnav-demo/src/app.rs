#![forbid(unsafe_code)]

//! The terminal rendering surface for the four-field form.
//!
//! [`FormApp`] owns the control buffers (what each input shows) and routes
//! key events to the [`FieldNavigator`]. Controls apply their own edit
//! first, then the navigator sees the event with the updated text. A key's
//! native default action (implicit submit on Enter, button activation on
//! Space) only runs when the navigator did not prevent it.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use formnav_core::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use formnav_form::{
    ControlId, FieldId, FieldKeyEvent, FieldKind, FieldNavigator, FormController, FormValues,
    GENDER_OPTIONS, KeyOutcome, LogSubmit, SubmitEvent, SubmitKeyEvent, SubmitOutcome,
};
use unicode_width::UnicodeWidthStr;

use crate::cli::Opts;
use crate::terminal::{SessionOptions, TerminalSession};

/// Upper bound on rows drawn, used to reserve space in inline mode.
pub const MAX_ROWS: u16 = 24;

const TICK: Duration = Duration::from_millis(100);

/// What the event loop should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// Form state plus the text currently shown by each control.
pub struct FormApp {
    nav: FieldNavigator<FormController, LogSubmit>,
    inputs: Vec<String>,
    status: String,
}

impl FormApp {
    #[must_use]
    pub fn new(show_results: bool) -> Self {
        let nav = FieldNavigator::standard(LogSubmit).with_result_display(show_results);
        let inputs = vec![String::new(); nav.sequence().len()];
        Self {
            nav,
            inputs,
            status: String::new(),
        }
    }

    #[must_use]
    pub fn navigator(&self) -> &FieldNavigator<FormController, LogSubmit> {
        &self.nav
    }

    /// Text shown by the control at a field position.
    #[must_use]
    pub fn input(&self, position: usize) -> Option<&str> {
        self.inputs.get(position).map(String::as_str)
    }

    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Route one input event.
    pub fn handle_event(&mut self, event: Event) -> Action {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Paste(text) => {
                self.paste(&text);
                Action::Continue
            }
            Event::Resize { .. } => Action::Continue,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.kind == KeyEventKind::Release {
            return Action::Continue;
        }
        if key.code == KeyCode::Escape || (key.ctrl() && key.is_char('c')) {
            return Action::Quit;
        }

        let Some(focused) = self.nav.focused() else {
            if matches!(key.code, KeyCode::Tab | KeyCode::BackTab) {
                self.cycle_focus(key.code == KeyCode::BackTab);
            }
            return Action::Continue;
        };

        match self.nav.registry().position_of(focused) {
            Some(position) => self.field_key(key, position),
            None => self.submit_key(key),
        }
        Action::Continue
    }

    fn field_key(&mut self, key: KeyEvent, position: usize) {
        let Some(field) = self.nav.sequence().get(position) else {
            return;
        };
        edit_control(field.kind(), &mut self.inputs[position], key);

        let mut event = FieldKeyEvent::new(key, &self.inputs[position]);
        let outcome = pollster::block_on(self.nav.handle_field_key(&mut event, position, field));
        let prevented = event.is_default_prevented();

        match outcome {
            KeyOutcome::Rejected => self.status = format!("{} needs attention", label(field)),
            KeyOutcome::Advanced(_) => self.status.clear(),
            KeyOutcome::Ignored | KeyOutcome::Stuck => {}
        }

        if prevented {
            return;
        }
        match key.code {
            // Enter in a form input submits the form.
            KeyCode::Enter => self.submit(),
            KeyCode::Tab | KeyCode::BackTab => self.cycle_focus(key.code == KeyCode::BackTab),
            _ => {}
        }
    }

    fn submit_key(&mut self, key: KeyEvent) {
        let mut event = SubmitKeyEvent::new(key);
        let outcome = pollster::block_on(self.nav.handle_submit_key(&mut event));
        if let Some(outcome) = outcome {
            self.report(outcome);
        }
        if event.is_default_prevented() {
            return;
        }
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => self.submit(),
            KeyCode::Tab | KeyCode::BackTab => self.cycle_focus(key.code == KeyCode::BackTab),
            _ => {}
        }
    }

    fn submit(&mut self) {
        let outcome = pollster::block_on(self.nav.handle_submit(&mut SubmitEvent::new()));
        self.report(outcome);
    }

    fn report(&mut self, outcome: SubmitOutcome) {
        self.status = match outcome {
            SubmitOutcome::Submitted => "Form submitted".to_string(),
            SubmitOutcome::Rejected { .. } => {
                let count = self.nav.errors().len();
                if count == 1 {
                    "1 field needs attention".to_string()
                } else {
                    format!("{count} fields need attention")
                }
            }
        };
    }

    /// Focus traversal of the surface itself: fields then the submit
    /// control, wrapping around.
    fn cycle_focus(&mut self, backwards: bool) {
        let registry = self.nav.registry();
        let order: Vec<ControlId> = (0..registry.field_count())
            .filter_map(|i| registry.field(i))
            .chain(registry.submit())
            .collect();
        if order.is_empty() {
            return;
        }
        let current = self
            .nav
            .focused()
            .and_then(|c| order.iter().position(|o| *o == c));
        let next = match (current, backwards) {
            (None, _) => 0,
            (Some(i), false) => (i + 1) % order.len(),
            (Some(i), true) => (i + order.len() - 1) % order.len(),
        };
        self.nav.focus_control(order[next]);
    }

    fn paste(&mut self, text: &str) {
        let Some(position) = self
            .nav
            .focused()
            .and_then(|c| self.nav.registry().position_of(c))
        else {
            return;
        };
        let Some(field) = self.nav.sequence().get(position) else {
            return;
        };
        let buffer = &mut self.inputs[position];
        match field.kind() {
            FieldKind::Text => buffer.extend(text.chars().filter(|c| !c.is_control())),
            FieldKind::Number => buffer.extend(text.chars().filter(|c| accepts_number_char(*c))),
            FieldKind::Choice => {}
        }
    }

    /// Values of the last successful submission, when shown.
    #[must_use]
    pub fn last_submitted(&self) -> Option<&FormValues> {
        self.nav.last_submitted()
    }

    // -- rendering ---------------------------------------------------------

    /// Draw the form starting at row `origin`.
    pub fn render(&self, out: &mut impl Write, origin: u16) -> io::Result<()> {
        let label_width = self
            .nav
            .fields()
            .map(|f| label(f.id).width())
            .max()
            .unwrap_or(0)
            + 2;
        let mut row = origin;

        next_line(out, &mut row)?;
        queue!(
            out,
            SetAttribute(Attribute::Bold),
            Print("Personal details"),
            SetAttribute(Attribute::Reset)
        )?;
        next_line(out, &mut row)?;

        for field in self.nav.fields() {
            let focused = field.control.is_some_and(|c| self.nav.is_focused(c));
            let name = label(field.id);
            let pad = label_width.saturating_sub(name.width());

            next_line(out, &mut row)?;
            queue!(
                out,
                Print(if focused { "› " } else { "  " }),
                Print(name),
                Print(":"),
                Print(" ".repeat(pad.saturating_sub(1))),
            )?;
            let text = self.inputs[field.position].as_str();
            match field.id.kind() {
                FieldKind::Choice => {
                    let shown = GENDER_OPTIONS
                        .iter()
                        .find(|(value, _)| *value == text)
                        .map_or(text, |(_, option)| *option);
                    queue!(out, Print(format!("< {shown} >")))?;
                }
                _ if text.is_empty() => {
                    queue!(
                        out,
                        SetAttribute(Attribute::Dim),
                        Print(field.id.placeholder()),
                        SetAttribute(Attribute::Reset)
                    )?;
                }
                _ => queue!(out, Print(text))?,
            }
            if focused && field.id.kind() != FieldKind::Choice {
                queue!(out, SetAttribute(Attribute::Reverse), Print(" "), SetAttribute(Attribute::Reset))?;
            }

            if let Some(error) = field.error {
                next_line(out, &mut row)?;
                queue!(
                    out,
                    Print(" ".repeat(label_width + 2)),
                    SetForegroundColor(Color::Red),
                    Print(error),
                    ResetColor
                )?;
            }
        }

        next_line(out, &mut row)?;
        next_line(out, &mut row)?;
        let submit_focused = self
            .nav
            .registry()
            .submit()
            .is_some_and(|c| self.nav.is_focused(c));
        if submit_focused {
            queue!(
                out,
                Print("› "),
                SetAttribute(Attribute::Reverse),
                Print("[ Submit ]"),
                SetAttribute(Attribute::Reset)
            )?;
        } else {
            queue!(out, Print("  [ Submit ]"))?;
        }

        next_line(out, &mut row)?;
        if !self.status.is_empty() {
            next_line(out, &mut row)?;
            queue!(out, Print(&self.status))?;
        }

        if let Some(values) = self.nav.last_submitted() {
            next_line(out, &mut row)?;
            next_line(out, &mut row)?;
            queue!(out, SetAttribute(Attribute::Bold), Print("Submitted values"), SetAttribute(Attribute::Reset))?;
            let pretty = serde_json::to_string_pretty(values).unwrap_or_default();
            for text in pretty.lines() {
                next_line(out, &mut row)?;
                queue!(out, Print(text))?;
            }
        }

        next_line(out, &mut row)?;
        next_line(out, &mut row)?;
        queue!(
            out,
            SetAttribute(Attribute::Dim),
            Print("Enter: next/submit  Tab: move  ←/→: gender  Esc: quit"),
            SetAttribute(Attribute::Reset)
        )?;
        queue!(out, Clear(ClearType::FromCursorDown))?;
        Ok(())
    }
}

fn label(id: FieldId) -> &'static str {
    match id {
        FieldId::FirstName => "First name",
        FieldId::LastName => "Last name",
        FieldId::Gender => "Gender",
        FieldId::Age => "Age",
    }
}

fn next_line(out: &mut impl Write, row: &mut u16) -> io::Result<()> {
    queue!(out, MoveTo(0, *row), Clear(ClearType::CurrentLine))?;
    *row += 1;
    Ok(())
}

/// Apply a key to a control's own text, the way the native input would.
fn edit_control(kind: FieldKind, buffer: &mut String, key: KeyEvent) {
    if key.ctrl() || key.alt() {
        return;
    }
    match kind {
        FieldKind::Text => match key.code {
            KeyCode::Char(c) => buffer.push(c),
            KeyCode::Backspace => {
                buffer.pop();
            }
            _ => {}
        },
        FieldKind::Number => match key.code {
            KeyCode::Char(c) if accepts_number_char(c) => buffer.push(c),
            KeyCode::Backspace => {
                buffer.pop();
            }
            _ => {}
        },
        FieldKind::Choice => {
            let current = GENDER_OPTIONS
                .iter()
                .position(|(value, _)| *value == buffer.as_str())
                .unwrap_or(0);
            let len = GENDER_OPTIONS.len();
            let next = match key.code {
                KeyCode::Right | KeyCode::Down | KeyCode::Char(' ') => (current + 1) % len,
                KeyCode::Left | KeyCode::Up => (current + len - 1) % len,
                _ => return,
            };
            *buffer = GENDER_OPTIONS[next].0.to_string();
        }
    }
}

/// Characters a number input lets through; the result may still not parse.
fn accepts_number_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E')
}

/// Run the form until the user quits or the exit timer fires.
///
/// # Errors
///
/// Returns terminal I/O errors.
pub fn run(opts: &Opts) -> io::Result<()> {
    let alternate = opts.alternate_screen();
    let session = TerminalSession::new(SessionOptions {
        alternate_screen: alternate,
        bracketed_paste: true,
    })?;
    let mut stdout = io::stdout();

    let origin = if alternate {
        0
    } else {
        for _ in 0..MAX_ROWS {
            queue!(stdout, Print("\r\n"))?;
        }
        stdout.flush()?;
        let (_, row) = crossterm::cursor::position()?;
        row.saturating_sub(MAX_ROWS)
    };
    let (cols, rows) = session.size()?;
    tracing::info!(cols, rows, alternate, "form session started");

    let mut app = FormApp::new(opts.show_results);
    let started = Instant::now();
    let deadline = (opts.exit_after_ms > 0).then(|| Duration::from_millis(opts.exit_after_ms));
    let mut dirty = true;

    loop {
        if dirty {
            app.render(&mut stdout, origin)?;
            stdout.flush()?;
            dirty = false;
        }
        if deadline.is_some_and(|d| started.elapsed() >= d) {
            tracing::info!("exit timer elapsed");
            break;
        }
        if let Some(event) = session.next_event(TICK)? {
            dirty = true;
            if app.handle_event(event) == Action::Quit {
                break;
            }
        }
    }

    tracing::info!(
        submissions = app.navigator().submission_count(),
        "form session ended"
    );
    Ok(())
}
