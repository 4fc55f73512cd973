// ABOUTME: Interactive session multiplexer - launch, capture, and tabbed terminal UI

pub mod launcher;
pub mod select;
pub mod session;
pub mod state;
pub mod ui;

use thiserror::Error;

/// Errors surfaced by the multiplexer subsystem.
///
/// Per-service spawn failures and stream read errors are logged and
/// recovered locally, so they never appear here; only conditions that stop
/// the whole run do.
#[derive(Error, Debug)]
pub enum MuxError {
    /// Every interactive launch failed, so there is nothing to multiplex.
    #[error("no interactive sessions could be started")]
    NoSessions,

    /// Terminal setup, draw, or input polling failed.
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

pub use launcher::{launch_interactive_services, run_foreground_services};
pub use select::select_services;
pub use session::Session;
pub use state::{Effect, MultiplexerState, MuxEvent, Phase};
pub use ui::run_multiplexer;
