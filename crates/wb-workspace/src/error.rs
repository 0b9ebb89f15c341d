// Copyright 2026 Workbench Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the workspace core

use thiserror::Error;
use wb_api_contract::{ApiContractError, ApiError};

pub type WorkspaceResult<T> = Result<T, WorkspaceError>;

/// Failures surfaced by workspace operations.
///
/// `Api` wraps the shared wire taxonomy; whether it was already routed
/// to the global relay depends on `ApiError::is_field_scoped`. The
/// caller receives the error either way so field-scoped failures can be
/// rendered inline. No variant is fatal: every failure leaves the tree
/// cache, scheduler and session controller in their prior valid state.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Contract error: {0}")]
    Contract(#[from] ApiContractError),

    #[error("No active session")]
    NoSession,

    #[error("The project root cannot be modified")]
    RootImmutable,
}
