// Copyright 2026 Workbench Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interactive job session lifecycle and viewport-mode detection.
//!
//! A session pipes a remote job's terminal over a duplex byte stream.
//! There is no negotiated resize protocol: the controller scans inbound
//! bytes for the alternate-screen control sequences that full-screen
//! applications conventionally emit, and switches the local emulation
//! geometry when it sees them. The emulation surface does not resize
//! dynamically, so each geometry change produces a fresh `surface_key`
//! and the rendering layer recreates the surface bound to the same
//! transport.
//!
//! The scan is a heuristic. Marker bytes may arrive split across chunk
//! boundaries; [`AltScreenScanner`] buffers a partial-marker tail so a
//! split marker is still detected.

use std::sync::Arc;
use tracing::{debug, info};
use wb_client_api::{SessionChannel, SessionConnector};

use crate::error::{WorkspaceError, WorkspaceResult};

/// Alternate-screen enter, emitted when a full-screen application
/// starts inside the session.
const EXPAND_MARKER: &[u8] = b"\x1b[?1049h";
/// Alternate-screen leave.
const REVERT_MARKER: &[u8] = b"\x1b[?1049l";

/// Local terminal emulation geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportMode {
    Normal,
    Expanded,
}

impl ViewportMode {
    /// (rows, cols) of the emulated terminal in this mode.
    pub fn geometry(self) -> (u16, u16) {
        match self {
            ViewportMode::Normal => (15, 80),
            ViewportMode::Expanded => (40, 170),
        }
    }
}

/// Pluggable detector for viewport-mode switches in the inbound stream.
///
/// Kept behind a trait so the heuristic can be replaced by a proper
/// negotiated resize protocol without touching the session state
/// machine.
pub trait ViewportScanner: Send {
    /// Inspect one inbound chunk; the last mode switch found wins.
    fn scan(&mut self, chunk: &[u8]) -> Option<ViewportMode>;
}

/// Scanner for the alternate-screen markers, buffering a partial-marker
/// tail across chunk boundaries.
#[derive(Debug, Default)]
pub struct AltScreenScanner {
    tail: Vec<u8>,
}

impl AltScreenScanner {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ViewportScanner for AltScreenScanner {
    fn scan(&mut self, chunk: &[u8]) -> Option<ViewportMode> {
        let mut haystack = std::mem::take(&mut self.tail);
        haystack.extend_from_slice(chunk);

        let mut detected = None;
        if haystack.len() >= EXPAND_MARKER.len() {
            for window in haystack.windows(EXPAND_MARKER.len()) {
                if window == EXPAND_MARKER {
                    detected = Some(ViewportMode::Expanded);
                } else if window == REVERT_MARKER {
                    detected = Some(ViewportMode::Normal);
                }
            }
        }

        // Keep the longest suffix that could still grow into a marker.
        let max_tail = EXPAND_MARKER.len() - 1;
        for len in (1..=max_tail.min(haystack.len())).rev() {
            let suffix = &haystack[haystack.len() - len..];
            if EXPAND_MARKER.starts_with(suffix) || REVERT_MARKER.starts_with(suffix) {
                self.tail = suffix.to_vec();
                break;
            }
        }

        detected
    }
}

/// Lifecycle of the single session a workspace view may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Starting,
    Running,
    Closed,
}

/// Observable session geometry for the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub mode: ViewportMode,
    pub rows: u16,
    pub cols: u16,
    /// Changes whenever the geometry does; the rendering layer keys the
    /// emulation surface on it so a switch forces clean recreation.
    pub surface_key: String,
}

/// State machine driving one interactive job session.
pub struct SessionController {
    connector: Arc<dyn SessionConnector>,
    scanner: Box<dyn ViewportScanner>,
    phase: SessionPhase,
    endpoint: String,
    state: SessionState,
    channel: Option<Box<dyn SessionChannel>>,
}

impl SessionController {
    pub fn new(connector: Arc<dyn SessionConnector>) -> Self {
        Self::with_scanner(connector, Box::new(AltScreenScanner::new()))
    }

    pub fn with_scanner(
        connector: Arc<dyn SessionConnector>,
        scanner: Box<dyn ViewportScanner>,
    ) -> Self {
        let (rows, cols) = ViewportMode::Normal.geometry();
        Self {
            connector,
            scanner,
            phase: SessionPhase::Idle,
            endpoint: String::new(),
            state: SessionState {
                mode: ViewportMode::Normal,
                rows,
                cols,
                surface_key: String::new(),
            },
            channel: None,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Open a session for a recipe file. An already-running session is
    /// closed first; only one transport may be live per view.
    pub async fn start(&mut self, project_id: &str, recipe_path: &str) -> WorkspaceResult<()> {
        if let Some(mut previous) = self.channel.take() {
            info!(endpoint = %self.endpoint, "replacing active session");
            let _ = previous.close().await;
        }

        self.phase = SessionPhase::Starting;
        self.endpoint = format!("{project_id}:{recipe_path}");

        match self.connector.connect(project_id, recipe_path).await {
            Ok(channel) => {
                self.channel = Some(channel);
                self.scanner = Box::new(AltScreenScanner::new());
                self.set_mode(ViewportMode::Normal);
                self.phase = SessionPhase::Running;
                info!(endpoint = %self.endpoint, "session running");
                Ok(())
            }
            Err(error) => {
                self.phase = SessionPhase::Idle;
                Err(WorkspaceError::Api(error))
            }
        }
    }

    /// Next inbound chunk, scanned for viewport switches on the way
    /// through. `None` once the remote side has closed.
    pub async fn read(&mut self) -> Option<WorkspaceResult<Vec<u8>>> {
        let channel = self.channel.as_mut()?;
        let chunk = match channel.recv().await {
            Some(Ok(chunk)) => chunk,
            Some(Err(error)) => return Some(Err(WorkspaceError::Api(error))),
            None => {
                self.phase = SessionPhase::Closed;
                self.channel = None;
                return None;
            }
        };

        if let Some(mode) = self.scanner.scan(&chunk) {
            if mode != self.state.mode {
                debug!(?mode, "viewport switch detected");
                self.set_mode(mode);
            }
        }
        Some(Ok(chunk))
    }

    /// Forward terminal input to the job.
    pub async fn write(&mut self, bytes: &[u8]) -> WorkspaceResult<()> {
        let channel = self.channel.as_mut().ok_or(WorkspaceError::NoSession)?;
        channel.send(bytes).await.map_err(WorkspaceError::Api)
    }

    /// Release the transport. Idempotent.
    pub async fn close(&mut self) {
        if let Some(mut channel) = self.channel.take() {
            let _ = channel.close().await;
            info!(endpoint = %self.endpoint, "session closed");
        }
        if self.phase != SessionPhase::Idle {
            self.phase = SessionPhase::Closed;
        }
    }

    fn set_mode(&mut self, mode: ViewportMode) {
        let (rows, cols) = mode.geometry();
        self.state = SessionState {
            mode,
            rows,
            cols,
            // Same shape as the original surface key: endpoint + cols + rows.
            surface_key: format!("{}:{}x{}", self.endpoint, cols, rows),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex as StdMutex;
    use wb_client_api::ClientResult;

    struct ScriptedChannel {
        chunks: VecDeque<Vec<u8>>,
        closed: Arc<AtomicBool>,
        sent: Arc<StdMutex<Vec<Vec<u8>>>>,
    }

    #[async_trait]
    impl SessionChannel for ScriptedChannel {
        async fn send(&mut self, bytes: &[u8]) -> ClientResult<()> {
            self.sent.lock().unwrap().push(bytes.to_vec());
            Ok(())
        }

        async fn recv(&mut self) -> Option<ClientResult<Vec<u8>>> {
            self.chunks.pop_front().map(Ok)
        }

        async fn close(&mut self) -> ClientResult<()> {
            self.closed.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    #[derive(Default)]
    struct ScriptedConnector {
        scripts: StdMutex<VecDeque<Vec<Vec<u8>>>>,
        closed_flags: StdMutex<Vec<Arc<AtomicBool>>>,
        sent: Arc<StdMutex<Vec<Vec<u8>>>>,
    }

    impl ScriptedConnector {
        fn with_scripts(scripts: Vec<Vec<Vec<u8>>>) -> Arc<Self> {
            Arc::new(Self {
                scripts: StdMutex::new(scripts.into_iter().collect()),
                ..Self::default()
            })
        }

        fn closed(&self, index: usize) -> bool {
            self.closed_flags.lock().unwrap()[index].load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SessionConnector for ScriptedConnector {
        async fn connect(
            &self,
            _project_id: &str,
            _recipe_path: &str,
        ) -> ClientResult<Box<dyn SessionChannel>> {
            let chunks = self.scripts.lock().unwrap().pop_front().unwrap_or_default();
            let closed = Arc::new(AtomicBool::new(false));
            self.closed_flags.lock().unwrap().push(Arc::clone(&closed));
            Ok(Box::new(ScriptedChannel {
                chunks: chunks.into_iter().collect(),
                closed,
                sent: Arc::clone(&self.sent),
            }))
        }
    }

    fn concat(parts: &[&[u8]]) -> Vec<u8> {
        parts.concat()
    }

    #[test]
    fn scanner_detects_whole_markers() {
        let mut scanner = AltScreenScanner::new();
        assert_eq!(
            scanner.scan(concat(&[b"ls\r\n", EXPAND_MARKER, b"vim"]).as_slice()),
            Some(ViewportMode::Expanded)
        );
        assert_eq!(
            scanner.scan(concat(&[b"done", REVERT_MARKER]).as_slice()),
            Some(ViewportMode::Normal)
        );
        assert_eq!(scanner.scan(b"plain output"), None);
    }

    #[test]
    fn scanner_detects_marker_split_across_chunks() {
        let mut scanner = AltScreenScanner::new();
        assert_eq!(scanner.scan(b"output...\x1b[?10"), None);
        assert_eq!(scanner.scan(b"49h more output"), Some(ViewportMode::Expanded));
    }

    #[test]
    fn scanner_split_revert_marker() {
        let mut scanner = AltScreenScanner::new();
        assert_eq!(scanner.scan(b"\x1b"), None);
        assert_eq!(scanner.scan(b"[?1049"), None);
        assert_eq!(scanner.scan(b"l"), Some(ViewportMode::Normal));
    }

    #[test]
    fn scanner_reports_the_last_marker_in_a_chunk() {
        let mut scanner = AltScreenScanner::new();
        let chunk = concat(&[EXPAND_MARKER, b"quick app", REVERT_MARKER]);
        assert_eq!(scanner.scan(&chunk), Some(ViewportMode::Normal));
    }

    #[test]
    fn scanner_ignores_lookalike_sequences() {
        let mut scanner = AltScreenScanner::new();
        assert_eq!(scanner.scan(b"\x1b[?1049x"), None);
        assert_eq!(scanner.scan(b"\x1b[?104"), None);
        assert_eq!(scanner.scan(b"nope"), None);
    }

    #[tokio::test]
    async fn expanded_mode_changes_geometry_and_surface_key() {
        let connector =
            ScriptedConnector::with_scripts(vec![vec![concat(&[b"hello ", EXPAND_MARKER])]]);
        let mut controller = SessionController::new(connector);

        controller.start("p1", "/run.recipe").await.unwrap();
        assert_eq!(controller.phase(), SessionPhase::Running);
        let normal_key = controller.state().surface_key.clone();
        assert_eq!((controller.state().rows, controller.state().cols), (15, 80));

        let chunk = controller.read().await.unwrap().unwrap();
        assert!(chunk.starts_with(b"hello "));
        assert_eq!(controller.state().mode, ViewportMode::Expanded);
        assert_eq!((controller.state().rows, controller.state().cols), (40, 170));
        assert_ne!(controller.state().surface_key, normal_key);
    }

    #[tokio::test]
    async fn starting_a_new_run_closes_the_previous_transport() {
        let connector = ScriptedConnector::with_scripts(vec![vec![], vec![]]);
        let mut controller = SessionController::new(connector.clone());

        controller.start("p1", "/a.recipe").await.unwrap();
        assert!(!connector.closed(0));

        controller.start("p1", "/b.recipe").await.unwrap();
        assert!(connector.closed(0));
        assert!(!connector.closed(1));
        assert_eq!(controller.phase(), SessionPhase::Running);
    }

    #[tokio::test]
    async fn read_after_remote_close_reports_closed() {
        let connector = ScriptedConnector::with_scripts(vec![vec![b"bye".to_vec()]]);
        let mut controller = SessionController::new(connector);

        controller.start("p1", "/a.recipe").await.unwrap();
        assert!(controller.read().await.is_some());
        assert!(controller.read().await.is_none());
        assert_eq!(controller.phase(), SessionPhase::Closed);

        assert!(matches!(
            controller.write(b"input").await,
            Err(WorkspaceError::NoSession)
        ));
    }

    #[tokio::test]
    async fn write_forwards_terminal_input() {
        let connector = ScriptedConnector::with_scripts(vec![vec![]]);
        let mut controller = SessionController::new(connector.clone());

        controller.start("p1", "/a.recipe").await.unwrap();
        controller.write(b"echo hi\r").await.unwrap();
        assert_eq!(connector.sent.lock().unwrap().clone(), vec![b"echo hi\r".to_vec()]);
    }
}
