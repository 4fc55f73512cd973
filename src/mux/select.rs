// ABOUTME: Checkbox picker for choosing which detected services to launch
//
// A single descriptor is auto-selected with no UI. With more than one, the
// user toggles rows with space and confirms with enter; confirming with
// nothing toggled selects the row under the cursor. Cancelling yields an
// empty selection, which the caller treats as a clean no-op.

use crate::models::ServiceDescriptor;
use crate::mux::MuxError;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};
use std::io;

/// Result of feeding one key into the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Keep going.
    Pending,
    /// User confirmed; the chosen descriptors in list order.
    Confirmed(Vec<ServiceDescriptor>),
    /// User cancelled the whole operation.
    Cancelled,
}

/// Pure picker state, kept separate from the terminal loop for testing.
pub struct SelectState {
    services: Vec<ServiceDescriptor>,
    checked: Vec<bool>,
    cursor: usize,
}

impl SelectState {
    pub fn new(services: Vec<ServiceDescriptor>) -> Self {
        let checked = vec![false; services.len()];
        Self {
            services,
            checked,
            cursor: 0,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_checked(&self, index: usize) -> bool {
        self.checked.get(index).copied().unwrap_or(false)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> SelectOutcome {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                SelectOutcome::Cancelled
            }
            KeyCode::Char('q') | KeyCode::Esc => SelectOutcome::Cancelled,
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor = self.cursor.saturating_sub(1);
                SelectOutcome::Pending
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.cursor + 1 < self.services.len() {
                    self.cursor += 1;
                }
                SelectOutcome::Pending
            }
            KeyCode::Char(' ') => {
                self.checked[self.cursor] = !self.checked[self.cursor];
                SelectOutcome::Pending
            }
            KeyCode::Enter => {
                let mut selected: Vec<ServiceDescriptor> = self
                    .services
                    .iter()
                    .zip(&self.checked)
                    .filter(|(_, checked)| **checked)
                    .map(|(service, _)| service.clone())
                    .collect();
                // Confirming without toggling still yields one choice.
                if selected.is_empty() {
                    selected.push(self.services[self.cursor].clone());
                }
                SelectOutcome::Confirmed(selected)
            }
            _ => SelectOutcome::Pending,
        }
    }

    fn render(&self, frame: &mut Frame) {
        let mut lines = vec![
            Line::from("Use ↑/↓ to navigate, SPACE to toggle, ENTER to confirm, q to cancel."),
            Line::from(""),
        ];
        for (i, service) in self.services.iter().enumerate() {
            let cursor = if i == self.cursor { "> " } else { "  " };
            let checkbox = if self.checked[i] { "[x]" } else { "[ ]" };
            let style = if i == self.cursor {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            lines.push(Line::styled(
                format!("{cursor}{checkbox} {} — {}", service.name, service.command),
                style,
            ));
        }
        let list = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Select Services to Run"));
        frame.render_widget(list, frame.size());
    }
}

/// Run the selection stage. Returns the chosen descriptors; an empty vec
/// means the user cancelled and nothing should be launched. A single
/// descriptor is auto-selected and an empty list passes straight through,
/// so the picker only ever renders two or more rows.
pub fn select_services(
    services: Vec<ServiceDescriptor>,
) -> Result<Vec<ServiceDescriptor>, MuxError> {
    if services.len() < 2 {
        return Ok(services);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = picker_loop(&mut terminal, SelectState::new(services));

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn picker_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut state: SelectState,
) -> Result<Vec<ServiceDescriptor>, MuxError> {
    loop {
        terminal.draw(|frame| state.render(frame))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match state.handle_key(key) {
                SelectOutcome::Pending => {}
                SelectOutcome::Confirmed(selected) => return Ok(selected),
                SelectOutcome::Cancelled => return Ok(Vec::new()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn services(n: usize) -> Vec<ServiceDescriptor> {
        (0..n)
            .map(|i| ServiceDescriptor::new(format!("svc{i}"), format!("cmd{i}"), true))
            .collect()
    }

    fn press(state: &mut SelectState, code: KeyCode) -> SelectOutcome {
        state.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn single_service_is_returned_without_interaction() {
        let one = services(1);
        let selected = select_services(one.clone()).unwrap();
        assert_eq!(selected, one);
    }

    #[test]
    fn empty_service_list_passes_through_without_a_picker() {
        let selected = select_services(Vec::new()).unwrap();
        assert!(selected.is_empty());
    }

    #[test]
    fn confirm_without_toggles_falls_back_to_cursor_row() {
        let mut state = SelectState::new(services(3));
        press(&mut state, KeyCode::Down);

        let outcome = press(&mut state, KeyCode::Enter);
        assert_eq!(
            outcome,
            SelectOutcome::Confirmed(vec![ServiceDescriptor::new("svc1", "cmd1", true)])
        );
    }

    #[test]
    fn toggled_rows_are_returned_in_list_order() {
        let mut state = SelectState::new(services(3));
        press(&mut state, KeyCode::Char(' ')); // toggle svc0
        press(&mut state, KeyCode::Down);
        press(&mut state, KeyCode::Down);
        press(&mut state, KeyCode::Char(' ')); // toggle svc2

        let outcome = press(&mut state, KeyCode::Enter);
        let SelectOutcome::Confirmed(selected) = outcome else {
            panic!("expected confirmation");
        };
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].name, "svc0");
        assert_eq!(selected[1].name, "svc2");
    }

    #[test]
    fn toggle_is_per_row_and_reversible() {
        let mut state = SelectState::new(services(2));
        press(&mut state, KeyCode::Char(' '));
        assert!(state.is_checked(0));
        press(&mut state, KeyCode::Char(' '));
        assert!(!state.is_checked(0));
        assert!(!state.is_checked(1));
    }

    #[test]
    fn cursor_clamps_at_list_edges() {
        let mut state = SelectState::new(services(2));
        press(&mut state, KeyCode::Up);
        assert_eq!(state.cursor(), 0);
        press(&mut state, KeyCode::Down);
        press(&mut state, KeyCode::Down);
        assert_eq!(state.cursor(), 1);
    }

    #[test]
    fn quit_keys_cancel() {
        let mut state = SelectState::new(services(2));
        assert_eq!(press(&mut state, KeyCode::Char('q')), SelectOutcome::Cancelled);
        assert_eq!(press(&mut state, KeyCode::Esc), SelectOutcome::Cancelled);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(state.handle_key(ctrl_c), SelectOutcome::Cancelled);
    }
}
