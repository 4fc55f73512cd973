// ABOUTME: Terminal event loop and rendering for the session multiplexer
//
// Single-threaded view over the session registry: a fixed-height header
// lists every session with a marker on the focused one, a separator, then
// the focused session's full accumulated output. A 200ms tick keeps new
// output visible without keypresses. All transitions go through the pure
// reducer in state.rs; this module only executes the resulting effects.

use crate::mux::session::Session;
use crate::mux::state::{Effect, MultiplexerState, MuxEvent, Phase};
use crate::mux::MuxError;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

const TICK_RATE: Duration = Duration::from_millis(200);

/// Run the multiplexer over a non-empty session registry until the user
/// quits. On quit every session's process group gets a SIGINT,
/// fire-and-forget, before the terminal is restored.
pub async fn run_multiplexer(sessions: Vec<Arc<Session>>) -> Result<(), MuxError> {
    if sessions.is_empty() {
        return Err(MuxError::NoSessions);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &sessions).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    sessions: &[Arc<Session>],
) -> Result<(), MuxError> {
    let mut state = MultiplexerState::new(sessions.len());
    let mut last_tick = Instant::now();

    // A SIGINT aimed at devmux itself tears the sessions down the same way
    // the quit key does.
    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&interrupted);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            flag.store(true, Ordering::SeqCst);
        }
    });

    loop {
        terminal.draw(|frame| render(frame, sessions, state.focused()))?;

        let timeout = TICK_RATE.saturating_sub(last_tick.elapsed());
        let mux_event = if interrupted.load(Ordering::SeqCst) {
            Some(MuxEvent::Interrupted)
        } else if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => Some(MuxEvent::Key(key)),
                _ => None,
            }
        } else {
            last_tick = Instant::now();
            Some(MuxEvent::Tick)
        };

        let Some(mux_event) = mux_event else {
            continue;
        };
        for effect in state.apply(mux_event) {
            match effect {
                // The next loop iteration repaints unconditionally.
                Effect::Redraw => {}
                Effect::Forward(bytes) => {
                    sessions[state.focused()].write_input(&bytes).await;
                }
                Effect::Interrupt(index) => {
                    info!(session = %sessions[index].name(), "interrupting process group");
                    sessions[index].interrupt();
                }
                Effect::Exit => {
                    state.finish();
                    debug_assert_eq!(state.phase(), Phase::Exited);
                    return Ok(());
                }
            }
        }
    }
}

fn render(frame: &mut Frame, sessions: &[Arc<Session>], focused: usize) {
    let header_height = sessions.len() as u16 + 1;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header_height),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(frame.size());

    let mut header_lines = vec![Line::from("Sessions:")];
    for (i, session) in sessions.iter().enumerate() {
        let marker = if i == focused { "> " } else { "  " };
        let style = if i == focused {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        header_lines.push(Line::styled(format!("{marker}{i}: {}", session.name()), style));
    }
    frame.render_widget(Paragraph::new(header_lines), chunks[0]);

    frame.render_widget(
        Paragraph::new("--- Active Session Output ---")
            .style(Style::default().add_modifier(Modifier::DIM)),
        chunks[1],
    );

    // The raw buffer is shown in full; there is no scrollback window.
    let output = sessions[focused].output_snapshot();
    frame.render_widget(Paragraph::new(output), chunks[2]);
}
