// Copyright 2026 Workbench Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Schema types and validation for the workbench workspace API contract.
//!
//! Everything that crosses the wire between the client and the workspace
//! service lives here: entry/project records, the mutation notification
//! payloads, request bodies, and the error taxonomy shared by every
//! operation. The crate carries no I/O so both the REST client and the
//! in-memory test doubles can depend on it.

pub mod error;
pub mod types;
pub mod validation;

pub use error::*;
pub use types::*;
pub use validation::*;
