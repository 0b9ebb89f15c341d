// Copyright 2026 Workbench Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stateless relay surfacing unrecoverable errors to the user.

use tokio::sync::mpsc;
use tracing::debug;
use wb_api_contract::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// One user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub severity: Severity,
    pub message: String,
}

/// Pass-through sender from any core component to the toast surface.
///
/// Field-scoped failures never pass through here; they are resolved as
/// inline feedback next to the offending field (see
/// [`ApiError::is_field_scoped`]).
#[derive(Debug, Clone)]
pub struct ErrorRelay {
    tx: mpsc::UnboundedSender<Toast>,
}

impl ErrorRelay {
    /// Create the relay and the receiving end the UI drains.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Toast>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Surface an API failure globally, unless it is field-scoped.
    pub fn report(&self, error: &ApiError) {
        if error.is_field_scoped() {
            debug!(code = ?error.code, "field-scoped failure kept inline");
            return;
        }
        self.push(Severity::Error, error.display_message());
    }

    /// Surface an arbitrary message.
    pub fn push(&self, severity: Severity, message: impl Into<String>) {
        // A dropped receiver means the surface is gone; nothing to do.
        let _ = self.tx.send(Toast { severity, message: message.into() });
    }
}
