// ABOUTME: Child process launching and stream capture for interactive services
//
// Interactive services are spawned concurrently through a shell, each in
// its own process group with fully piped stdio. Two drain tasks per child
// pull stdout and stderr into the session's combined buffer for the life
// of the process. Spawn failures are logged and skipped; they never abort
// sibling launches. Non-interactive services instead run one at a time in
// the foreground with inherited stdio.

use crate::models::ServiceDescriptor;
use crate::mux::session::Session;
use std::process::Stdio;
use std::sync::{Arc, Mutex};
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::{error, info, warn};

const READ_CHUNK_SIZE: usize = 1024;

// Children often suppress color when writing to a pipe; these coax it back.
const COLOR_ENV: &[(&str, &str)] = &[
    ("FORCE_COLOR", "1"),
    ("TERM", "xterm-256color"),
    ("COLORTERM", "truecolor"),
    ("COMPOSE_FORCE_COLOR", "1"),
];

/// Spawns services through a shell. The shell program is configurable so
/// tests can exercise the spawn-failure path.
pub struct Launcher {
    shell: String,
}

impl Default for Launcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Launcher {
    pub fn new() -> Self {
        Self {
            shell: "sh".to_string(),
        }
    }

    pub fn with_shell(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }

    /// Launch every descriptor concurrently and collect the sessions that
    /// started successfully. The registry is appended under one lock while
    /// launches race; once returned it is treated as read-only.
    pub async fn launch_all(&self, services: &[ServiceDescriptor]) -> Vec<Arc<Session>> {
        let registry = Arc::new(Mutex::new(Vec::new()));
        let mut launches = Vec::new();

        for service in services.iter().cloned() {
            let registry = Arc::clone(&registry);
            let shell = self.shell.clone();
            launches.push(tokio::spawn(async move {
                info!(service = %service.name, command = %service.command, "launching interactive service");
                if let Some(session) = spawn_session(&shell, &service) {
                    let mut sessions = registry.lock().unwrap_or_else(|e| e.into_inner());
                    sessions.push(session);
                }
            }));
        }
        for launch in launches {
            let _ = launch.await;
        }

        let mut sessions = registry.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *sessions)
    }

    /// Run non-interactive services one at a time with stdio connected to
    /// the controlling terminal. Failures are logged and do not stop the
    /// remaining services.
    pub async fn run_foreground(&self, services: &[ServiceDescriptor]) {
        for service in services {
            info!(service = %service.name, command = %service.command, "running foreground service");
            let status = Command::new(&self.shell)
                .args(["-c", &service.command])
                .process_group(0)
                .stdin(Stdio::inherit())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit())
                .status()
                .await;
            match status {
                Ok(status) if status.success() => {}
                Ok(status) => {
                    warn!(service = %service.name, %status, "foreground service exited with failure");
                    eprintln!("devmux: {} exited with {status}", service.name);
                }
                Err(e) => {
                    error!(service = %service.name, "failed to run foreground service: {e}");
                    eprintln!("devmux: failed to run {}: {e}", service.name);
                }
            }
        }
    }
}

fn spawn_session(shell: &str, service: &ServiceDescriptor) -> Option<Arc<Session>> {
    let mut command = Command::new(shell);
    command
        .args(["-c", &service.command])
        .process_group(0)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    for (key, value) in COLOR_ENV {
        command.env(key, value);
    }

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(e) => {
            error!(service = %service.name, "failed to start: {e}");
            eprintln!("devmux: skipping {}: failed to start: {e}", service.name);
            return None;
        }
    };

    let (Some(stdin), Some(stdout), Some(stderr)) =
        (child.stdin.take(), child.stdout.take(), child.stderr.take())
    else {
        error!(service = %service.name, "failed to obtain stdio pipes");
        eprintln!("devmux: skipping {}: failed to obtain stdio pipes", service.name);
        return None;
    };
    let Some(pid) = child.id() else {
        error!(service = %service.name, "child exited before a pid could be read");
        eprintln!("devmux: skipping {}: exited before startup finished", service.name);
        return None;
    };

    // process_group(0) makes the child the leader of a fresh group, so the
    // group id is its own pid.
    let session = Arc::new(Session::new(service.name.clone(), pid as i32, stdin, child));
    let drains = vec![
        tokio::spawn(drain_stream(Arc::clone(&session), stdout, "stdout")),
        tokio::spawn(drain_stream(Arc::clone(&session), stderr, "stderr")),
    ];
    session.attach_drains(drains);
    Some(session)
}

/// Read a pipe to end-of-stream, appending each chunk to the session
/// buffer. A read error other than EOF ends this drain only.
async fn drain_stream<R>(session: Arc<Session>, mut stream: R, label: &'static str)
where
    R: AsyncReadExt + Unpin,
{
    let mut buf = [0u8; READ_CHUNK_SIZE];
    loop {
        match stream.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => session.append_output(&String::from_utf8_lossy(&buf[..n])),
            Err(e) => {
                warn!(session = %session.name(), stream = label, "read error: {e}");
                break;
            }
        }
    }
}

/// Launch the given interactive descriptors with the default shell.
pub async fn launch_interactive_services(services: &[ServiceDescriptor]) -> Vec<Arc<Session>> {
    Launcher::new().launch_all(services).await
}

/// Run the given non-interactive descriptors in the foreground.
pub async fn run_foreground_services(services: &[ServiceDescriptor]) {
    Launcher::new().run_foreground(services).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn failed_spawn_does_not_prevent_sibling_session() {
        // Each launch stands alone: one service failing to start must leave
        // its sibling's session intact and fully drained.
        let failing = ServiceDescriptor::new("broken", "printf B", true);
        let surviving = ServiceDescriptor::new("healthy", "printf A", true);

        assert!(spawn_session("/nonexistent/devmux-test-shell", &failing).is_none());

        let session = spawn_session("sh", &surviving).expect("sibling session should exist");
        session.wait_drained().await;
        assert_eq!(session.name(), "healthy");
        assert_eq!(session.output_snapshot(), "A");
    }
}
