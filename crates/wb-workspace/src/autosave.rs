// Copyright 2026 Workbench Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Debounced persistence of editor content changes.
//!
//! One file is open at a time, so the scheduler carries at most one
//! pending edit. Every change resets a fixed 5-second window; when the
//! window elapses the buffered content is persisted through the file
//! store. [`AutosaveScheduler::flush`] persists immediately and must be
//! awaited before switching files, leaving the project, or starting a
//! run, which bounds staleness and rules out silent loss on navigation.
//!
//! Content updates arriving over the notification channel for the open
//! file are deliberately not folded into the buffer: with one editor per
//! file, last writer wins on flush.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use wb_client_api::FileStore;

use crate::paths;
use crate::relay::ErrorRelay;

/// Delay between the last edit and the automatic persist.
pub const AUTOSAVE_DELAY: Duration = Duration::from_secs(5);

struct PendingEdit {
    path: String,
    content: String,
    persisted: String,
    dirty: bool,
}

/// Debounce scheduler for the single open file.
pub struct AutosaveScheduler<S: FileStore + 'static> {
    store: Arc<S>,
    project_id: String,
    relay: ErrorRelay,
    edit: Arc<Mutex<Option<PendingEdit>>>,
    timer: Option<JoinHandle<()>>,
}

impl<S: FileStore + 'static> AutosaveScheduler<S> {
    pub fn new(store: Arc<S>, project_id: impl Into<String>, relay: ErrorRelay) -> Self {
        Self {
            store,
            project_id: project_id.into(),
            relay,
            edit: Arc::new(Mutex::new(None)),
            timer: None,
        }
    }

    /// Open a file, flushing whatever was open before. `content` is the
    /// last known persisted state and becomes the clean baseline.
    pub async fn open(&mut self, path: &str, content: &str) {
        self.flush().await;
        let mut guard = self.edit.lock().await;
        *guard = Some(PendingEdit {
            path: path.to_string(),
            content: content.to_string(),
            persisted: content.to_string(),
            dirty: false,
        });
    }

    /// Flush and forget the open file.
    pub async fn close(&mut self) {
        self.flush().await;
        *self.edit.lock().await = None;
    }

    /// Buffer an editor change. Reverting to the persisted content
    /// clears the dirty state and cancels the window; any other change
    /// marks dirty and restarts the delay.
    pub async fn on_content_changed(&mut self, content: &str) {
        let restart = {
            let mut guard = self.edit.lock().await;
            let Some(edit) = guard.as_mut() else { return };
            edit.content = content.to_string();
            edit.dirty = edit.content != edit.persisted;
            edit.dirty
        };
        if restart {
            self.restart_timer();
        } else {
            self.cancel_timer();
        }
    }

    /// Persist now if dirty; idempotent otherwise. On failure the edit
    /// stays dirty so the next edit window or flush retries.
    pub async fn flush(&mut self) {
        self.cancel_timer();
        persist(&self.edit, self.store.as_ref(), &self.project_id, &self.relay).await;
    }

    /// Whether unflushed changes exist.
    pub async fn is_dirty(&self) -> bool {
        self.edit.lock().await.as_ref().map(|edit| edit.dirty).unwrap_or(false)
    }

    /// Rewrite the open file's path after a move so a later persist
    /// lands on the file's new name. Covers both a direct move of the
    /// file and a move of one of its ancestor directories.
    pub async fn retarget(&mut self, old_path: &str, new_path: &str) {
        let mut guard = self.edit.lock().await;
        let Some(edit) = guard.as_mut() else { return };
        if edit.path == old_path {
            edit.path = new_path.to_string();
        } else if paths::is_strict_prefix(old_path, &edit.path) {
            edit.path = format!("{new_path}{}", &edit.path[old_path.len()..]);
        }
    }

    /// Drop the pending edit without persisting. Used when the open
    /// file, or an ancestor directory, no longer exists remotely.
    pub async fn discard_under(&mut self, path: &str) {
        let mut guard = self.edit.lock().await;
        let gone = guard
            .as_ref()
            .is_some_and(|edit| edit.path == path || paths::is_strict_prefix(path, &edit.path));
        if gone {
            *guard = None;
            drop(guard);
            self.cancel_timer();
        }
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    fn restart_timer(&mut self) {
        self.cancel_timer();
        let edit = Arc::clone(&self.edit);
        let store = Arc::clone(&self.store);
        let project_id = self.project_id.clone();
        let relay = self.relay.clone();
        // Create the sleep here so the window is measured from the edit,
        // not from the spawned task's first poll.
        let delay = tokio::time::sleep(AUTOSAVE_DELAY);
        self.timer = Some(tokio::spawn(async move {
            delay.await;
            persist(&edit, store.as_ref(), &project_id, &relay).await;
        }));
    }
}

impl<S: FileStore + 'static> Drop for AutosaveScheduler<S> {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

async fn persist<S: FileStore>(
    edit: &Mutex<Option<PendingEdit>>,
    store: &S,
    project_id: &str,
    relay: &ErrorRelay,
) {
    // The lock is held across the store call; a concurrent edit waits
    // behind it, which keeps the persisted/dirty accounting exact.
    let mut guard = edit.lock().await;
    let Some(edit) = guard.as_mut() else { return };
    if !edit.dirty {
        return;
    }

    let content = edit.content.clone();
    match store.update_content(project_id, &edit.path, &content).await {
        Ok(_) => {
            debug!(path = %edit.path, bytes = content.len(), "autosaved");
            edit.persisted = content;
            edit.dirty = false;
        }
        Err(error) => {
            warn!(path = %edit.path, %error, "autosave failed");
            relay.report(&error);
        }
    }
}
