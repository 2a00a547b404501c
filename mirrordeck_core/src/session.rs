//! Mirror process lifecycle
//!
//! The mirroring tool is spawned with a built argument list and observed
//! through its standard streams and exit code only. At most one mirror
//! process exists at a time; starting a new one unconditionally terminates
//! the previous instance.

use crate::error::{MirrordeckError, Result};
use crate::toolchain::Toolchain;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

/// Which standard stream a log line came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogStream {
    Stdout,
    Stderr,
}

/// Events emitted by a running mirror session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionEvent {
    Log { stream: LogStream, line: String },
    /// The process terminated; `code` is `None` when it died to a signal
    Exited { code: Option<i32> },
}

/// Handle to one spawned mirror process
pub struct MirrorSession {
    kill_tx: Option<oneshot::Sender<()>>,
    running: Arc<AtomicBool>,
}

impl MirrorSession {
    /// Spawn the mirroring tool and stream its output as events.
    ///
    /// Must be called within a tokio runtime. A spawn failure is reported
    /// as an error here; anything after a successful spawn arrives on the
    /// returned channel, terminated by [`SessionEvent::Exited`].
    pub fn spawn(scrcpy: &Path, args: &[String]) -> Result<(Self, mpsc::Receiver<SessionEvent>)> {
        info!("Spawning: {} {}", scrcpy.display(), args.join(" "));

        let mut child = Command::new(scrcpy)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| MirrordeckError::Spawn(format!("{}: {}", scrcpy.display(), e)))?;

        let (tx, rx) = mpsc::channel(64);

        let mut readers = Vec::new();
        if let Some(stdout) = child.stdout.take() {
            readers.push(forward_lines(stdout, LogStream::Stdout, tx.clone()));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(forward_lines(stderr, LogStream::Stderr, tx.clone()));
        }

        let (kill_tx, mut kill_rx) = oneshot::channel::<()>();
        let running = Arc::new(AtomicBool::new(true));
        let running_flag = Arc::clone(&running);

        tokio::spawn(async move {
            let code = tokio::select! {
                status = child.wait() => status.ok().and_then(|s| s.code()),
                _ = &mut kill_rx => {
                    debug!("Kill requested, terminating mirror process");
                    let _ = child.start_kill();
                    child.wait().await.ok().and_then(|s| s.code())
                }
            };
            // Let the readers drain any buffered output so every log line
            // lands before the exit event
            for reader in readers {
                let _ = reader.await;
            }
            running_flag.store(false, Ordering::SeqCst);
            info!("Mirror process exited with code {:?}", code);
            let _ = tx.send(SessionEvent::Exited { code }).await;
        });

        Ok((
            Self {
                kill_tx: Some(kill_tx),
                running,
            },
            rx,
        ))
    }

    /// Whether the process is still alive
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Request termination; idempotent. Returns whether a kill was sent.
    pub fn kill(&mut self) -> bool {
        match self.kill_tx.take() {
            Some(tx) if self.is_running() => tx.send(()).is_ok(),
            _ => false,
        }
    }
}

fn forward_lines(
    stream: impl tokio::io::AsyncRead + Unpin + Send + 'static,
    source: LogStream,
    tx: mpsc::Sender<SessionEvent>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut lines = BufReader::new(stream).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if line.trim().is_empty() {
                continue;
            }
            let event = SessionEvent::Log {
                stream: source,
                line,
            };
            if tx.send(event).await.is_err() {
                break;
            }
        }
    });
}

/// Enforces the one-instance rule over [`MirrorSession`]s
#[derive(Default)]
pub struct SessionManager {
    current: Option<MirrorSession>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop any running instance and spawn a new one with the given
    /// argument list (callers validate options and build the list)
    pub fn start(
        &mut self,
        toolchain: &Toolchain,
        args: &[String],
    ) -> Result<mpsc::Receiver<SessionEvent>> {
        if let Some(mut previous) = self.current.take() {
            previous.kill();
        }

        let (session, rx) = MirrorSession::spawn(&toolchain.scrcpy, args)?;
        self.current = Some(session);
        Ok(rx)
    }

    /// Stop the running instance, if any
    pub fn stop(&mut self) -> bool {
        match self.current.take() {
            Some(mut session) => session.kill(),
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.current.as_ref().is_some_and(|s| s.is_running())
    }
}
