// ABOUTME: Core data types shared between detection, selection, and the multiplexer

use serde::Serialize;

/// A runnable service discovered in the current project.
///
/// Produced once per invocation by the detectors and never mutated.
/// `interactive` marks services that produce continuous output and expect a
/// terminal (dev servers, compose stacks); everything else runs to
/// completion in the foreground.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceDescriptor {
    /// Display label, e.g. "docker compose" or "npm dev server".
    pub name: String,
    /// Shell command line, executed via `sh -c` so pipes and redirection work.
    pub command: String,
    /// Whether this service belongs in the multiplexer rather than the foreground.
    pub interactive: bool,
}

impl ServiceDescriptor {
    pub fn new(name: impl Into<String>, command: impl Into<String>, interactive: bool) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            interactive,
        }
    }
}
