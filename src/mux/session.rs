// ABOUTME: Session state for one launched interactive service
//
// A Session owns the writable stdin handle, the combined stdout/stderr
// buffer, and the process group id of one child. The buffer is shared
// between exactly two drain tasks (append) and the render path (snapshot),
// so it sits behind its own lock; contention is per-session only.

use nix::sys::signal::{killpg, Signal};
use nix::unistd::Pid;
use std::sync::Mutex;
use tokio::io::AsyncWriteExt;
use tokio::process::{Child, ChildStdin};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub struct Session {
    name: String,
    pgid: i32,
    stdin: tokio::sync::Mutex<Option<ChildStdin>>,
    output: Mutex<String>,
    // Held so the child is reaped when the session drops, and so the
    // drain tasks can be awaited by callers that need output completeness.
    child: Mutex<Option<Child>>,
    drains: Mutex<Vec<JoinHandle<()>>>,
}

impl Session {
    pub fn new(name: String, pgid: i32, stdin: ChildStdin, child: Child) -> Self {
        Self {
            name,
            pgid,
            stdin: tokio::sync::Mutex::new(Some(stdin)),
            output: Mutex::new(String::new()),
            child: Mutex::new(Some(child)),
            drains: Mutex::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pgid(&self) -> i32 {
        self.pgid
    }

    /// Append a chunk of captured output. Called by the drain tasks; the
    /// buffer only ever grows.
    pub fn append_output(&self, chunk: &str) {
        let mut output = self.output.lock().unwrap_or_else(|e| e.into_inner());
        output.push_str(chunk);
    }

    /// Copy of the accumulated output for rendering.
    pub fn output_snapshot(&self) -> String {
        self.output.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Forward bytes to the child's stdin. A write failure means the
    /// process has gone away; the handle is dropped and the write becomes
    /// a no-op from then on.
    pub async fn write_input(&self, bytes: &[u8]) {
        let mut stdin = self.stdin.lock().await;
        let Some(handle) = stdin.as_mut() else {
            return;
        };
        let result = async {
            handle.write_all(bytes).await?;
            handle.flush().await
        }
        .await;
        if let Err(e) = result {
            debug!(session = %self.name, "stdin write failed, closing handle: {e}");
            *stdin = None;
        }
    }

    /// Send SIGINT to the child's process group so sub-children (compose
    /// wrappers and the like) receive it too. Best-effort.
    pub fn interrupt(&self) {
        if let Err(e) = killpg(Pid::from_raw(self.pgid), Signal::SIGINT) {
            warn!(session = %self.name, pgid = self.pgid, "failed to signal process group: {e}");
        }
    }

    pub(crate) fn attach_drains(&self, handles: Vec<JoinHandle<()>>) {
        let mut drains = self.drains.lock().unwrap_or_else(|e| e.into_inner());
        drains.extend(handles);
    }

    /// Wait until both drain tasks have seen end-of-stream and the child
    /// has been reaped. Used by callers that need the final buffer.
    pub async fn wait_drained(&self) {
        let handles: Vec<_> = {
            let mut drains = self.drains.lock().unwrap_or_else(|e| e.into_inner());
            drains.drain(..).collect()
        };
        for handle in handles {
            let _ = handle.await;
        }
        let child = {
            let mut slot = self.child.lock().unwrap_or_else(|e| e.into_inner());
            slot.take()
        };
        if let Some(mut child) = child {
            let _ = child.wait().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn detached_session() -> Arc<Session> {
        // A session around a real short-lived child, used purely as a
        // buffer/stdin fixture.
        let mut child = tokio::process::Command::new("sh")
            .args(["-c", "true"])
            .stdin(std::process::Stdio::piped())
            .spawn()
            .unwrap();
        let stdin = child.stdin.take().unwrap();
        let pgid = child.id().unwrap() as i32;
        Arc::new(Session::new("test".into(), pgid, stdin, child))
    }

    #[tokio::test]
    async fn output_is_append_only() {
        let session = detached_session();
        session.append_output("x\n");
        session.append_output("y\n");
        assert_eq!(session.output_snapshot(), "x\ny\n");
    }

    #[tokio::test]
    async fn concurrent_appends_never_lose_or_tear_chunks() {
        let session = detached_session();
        let a = Arc::clone(&session);
        let b = Arc::clone(&session);

        let writer_a = tokio::spawn(async move {
            for i in 0..50 {
                a.append_output(&format!("[A{i:03}]"));
                tokio::task::yield_now().await;
            }
        });
        let writer_b = tokio::spawn(async move {
            for i in 0..50 {
                b.append_output(&format!("[B{i:03}]"));
                tokio::task::yield_now().await;
            }
        });
        writer_a.await.unwrap();
        writer_b.await.unwrap();

        let buffer = session.output_snapshot();
        // 100 chunks of 7 bytes each, every one contiguous.
        assert_eq!(buffer.len(), 100 * 7);
        for i in 0..50 {
            assert!(buffer.contains(&format!("[A{i:03}]")));
            assert!(buffer.contains(&format!("[B{i:03}]")));
        }
    }

    #[tokio::test]
    async fn write_after_exit_is_silently_ignored() {
        let session = detached_session();
        session.wait_drained().await;
        // The child is gone; writes may fail once, then the handle closes.
        session.write_input(b"hello\n").await;
        session.write_input(b"again\n").await;
    }
}
