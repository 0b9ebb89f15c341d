// Copyright 2026 Workbench Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client-side core of the workbench workspace.
//!
//! The interesting parts of the client live here, independent of any
//! rendering layer:
//!
//! - [`tree`]: a hierarchical cache of a project's remote file tree,
//!   kept consistent under optimistic mutations, their direct
//!   responses, and the out-of-band notification stream, through one
//!   converging, idempotent apply function keyed by path identity.
//! - [`autosave`]: debounced persistence of editor changes with a
//!   guaranteed flush before navigation or job launches.
//! - [`session`]: the interactive job session state machine, including
//!   the heuristic viewport-mode detection embedded in the raw byte
//!   stream.
//! - [`workspace`]: the controller tying cache, store, scheduler and
//!   session together for the surrounding UI.
//!
//! All state mutation is single-owner and runs on one logical event
//! loop; races between the two producers of the same logical mutation
//! (response vs. notification) are resolved by idempotence, not locks.

pub mod autosave;
pub mod error;
pub mod paths;
pub mod relay;
pub mod session;
pub mod tree;
pub mod workspace;

pub use autosave::AutosaveScheduler;
pub use error::{WorkspaceError, WorkspaceResult};
pub use relay::{ErrorRelay, Severity, Toast};
pub use session::{
    AltScreenScanner, SessionController, SessionPhase, SessionState, ViewportMode, ViewportScanner,
};
pub use tree::{TreeCache, TreeNode};
pub use workspace::WorkspaceController;
