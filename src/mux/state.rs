// ABOUTME: Pure state machine for the multiplexer UI
//
// The event loop feeds bounded events into `MultiplexerState::apply`, which
// returns the effects to execute (redraw, forward bytes, signal, exit).
// Keeping the reducer free of terminals and processes makes every
// transition testable without spawning anything.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Lifecycle of the multiplexer view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Sessions live, UI active, one session focused.
    Running,
    /// Quit requested; interrupt effects have been emitted.
    Terminating,
    /// Event loop has exited.
    Exited,
}

/// Bounded input alphabet of the event loop.
#[derive(Debug, Clone)]
pub enum MuxEvent {
    /// Periodic redraw trigger so new output becomes visible without a keypress.
    Tick,
    /// A raw key from the controlling terminal.
    Key(KeyEvent),
    /// External interrupt delivered to the UI process itself.
    Interrupted,
}

/// Side effects the loop executes after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Repaint the view.
    Redraw,
    /// Write these bytes to the focused session's stdin.
    Forward(Vec<u8>),
    /// Send SIGINT to the process group of the session at this index.
    Interrupt(usize),
    /// Leave the event loop.
    Exit,
}

pub struct MultiplexerState {
    session_count: usize,
    focused: usize,
    phase: Phase,
}

impl MultiplexerState {
    /// `session_count` must be non-zero; the caller treats an empty
    /// registry as fatal before constructing the UI.
    pub fn new(session_count: usize) -> Self {
        debug_assert!(session_count > 0);
        Self {
            session_count,
            focused: 0,
            phase: Phase::Running,
        }
    }

    pub fn focused(&self) -> usize {
        self.focused
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Called by the loop once it has unwound past the last draw.
    pub fn finish(&mut self) {
        self.phase = Phase::Exited;
    }

    pub fn apply(&mut self, event: MuxEvent) -> Vec<Effect> {
        if self.phase != Phase::Running {
            return Vec::new();
        }
        match event {
            MuxEvent::Tick => vec![Effect::Redraw],
            MuxEvent::Interrupted => self.terminate(),
            MuxEvent::Key(key) => self.apply_key(key),
        }
    }

    fn apply_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.terminate()
            }
            KeyCode::Char('q') => self.terminate(),
            KeyCode::Left | KeyCode::Char('h') => {
                self.focused = self.focused.saturating_sub(1);
                vec![Effect::Redraw]
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if self.focused + 1 < self.session_count {
                    self.focused += 1;
                }
                vec![Effect::Redraw]
            }
            _ => match key_to_bytes(key) {
                Some(bytes) => vec![Effect::Forward(bytes)],
                None => Vec::new(),
            },
        }
    }

    /// One interrupt per session, in registry order, then exit. Signal
    /// failures are per-session and handled by the executor; the state
    /// machine moves on regardless.
    fn terminate(&mut self) -> Vec<Effect> {
        self.phase = Phase::Terminating;
        let mut effects: Vec<Effect> = (0..self.session_count).map(Effect::Interrupt).collect();
        effects.push(Effect::Exit);
        effects
    }
}

/// Literal byte rendition of a key for stdin forwarding. Keys with no
/// sensible byte form are swallowed.
fn key_to_bytes(key: KeyEvent) -> Option<Vec<u8>> {
    match key.code {
        KeyCode::Char(c) => Some(c.to_string().into_bytes()),
        KeyCode::Enter => Some(b"\n".to_vec()),
        KeyCode::Tab => Some(b"\t".to_vec()),
        KeyCode::Backspace => Some(vec![0x7f]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> MuxEvent {
        MuxEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn tick_requests_redraw() {
        let mut state = MultiplexerState::new(2);
        assert_eq!(state.apply(MuxEvent::Tick), vec![Effect::Redraw]);
        assert_eq!(state.phase(), Phase::Running);
    }

    #[test]
    fn focus_clamps_at_both_ends() {
        let mut state = MultiplexerState::new(3);

        state.apply(key(KeyCode::Left));
        assert_eq!(state.focused(), 0);

        state.apply(key(KeyCode::Right));
        state.apply(key(KeyCode::Right));
        assert_eq!(state.focused(), 2);
        state.apply(key(KeyCode::Char('l')));
        assert_eq!(state.focused(), 2);

        state.apply(key(KeyCode::Char('h')));
        assert_eq!(state.focused(), 1);
    }

    #[test]
    fn quit_interrupts_every_session_exactly_once() {
        let mut state = MultiplexerState::new(3);
        let effects = state.apply(key(KeyCode::Char('q')));
        assert_eq!(
            effects,
            vec![
                Effect::Interrupt(0),
                Effect::Interrupt(1),
                Effect::Interrupt(2),
                Effect::Exit,
            ]
        );
        assert_eq!(state.phase(), Phase::Terminating);
    }

    #[test]
    fn ctrl_c_terminates_like_quit() {
        let mut state = MultiplexerState::new(1);
        let effects = state.apply(MuxEvent::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        )));
        assert_eq!(effects, vec![Effect::Interrupt(0), Effect::Exit]);
    }

    #[test]
    fn events_after_termination_are_ignored() {
        let mut state = MultiplexerState::new(2);
        state.apply(key(KeyCode::Char('q')));
        assert!(state.apply(MuxEvent::Tick).is_empty());
        assert!(state.apply(key(KeyCode::Char('x'))).is_empty());
        state.finish();
        assert_eq!(state.phase(), Phase::Exited);
    }

    #[test]
    fn plain_keys_are_forwarded_as_bytes() {
        let mut state = MultiplexerState::new(1);
        assert_eq!(
            state.apply(key(KeyCode::Char('x'))),
            vec![Effect::Forward(b"x".to_vec())]
        );
        assert_eq!(
            state.apply(key(KeyCode::Enter)),
            vec![Effect::Forward(b"\n".to_vec())]
        );
        assert_eq!(
            state.apply(key(KeyCode::Backspace)),
            vec![Effect::Forward(vec![0x7f])]
        );
    }

    #[test]
    fn unmappable_keys_are_swallowed() {
        let mut state = MultiplexerState::new(1);
        assert!(state.apply(key(KeyCode::F(5))).is_empty());
    }
}
