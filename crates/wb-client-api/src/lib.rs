// Copyright 2026 Workbench Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Abstract contracts consumed by the workspace core.
//!
//! The core never talks to the network directly; it works against these
//! traits so the same logic runs over the real REST/WebSocket client and
//! over in-memory doubles in tests. All operations surface failures as
//! the shared [`ApiError`] taxonomy, so the inline-vs-global error
//! routing policy applies uniformly regardless of the backing
//! implementation.

use async_trait::async_trait;
use wb_api_contract::{
    ApiError, CreateProjectRequest, Entry, IdResponse, Project, ProjectListEntry, SetAclRequest,
    User,
};

pub type ClientResult<T> = Result<T, ApiError>;

/// Account service contract: login, registration, current-user lookup.
///
/// Session mechanics (cookies, token refresh, ...) are entirely the
/// implementation's business; the core only observes the returned user.
#[async_trait]
pub trait AccountService: Send + Sync {
    async fn login(&self, email: &str, password: &str, stay_signed_in: bool)
        -> ClientResult<User>;

    async fn register(
        &self,
        email: &str,
        name: &str,
        password: &str,
        stay_signed_in: bool,
    ) -> ClientResult<User>;

    /// Who the service believes we are, or `Unauthenticated`.
    async fn current_user(&self) -> ClientResult<User>;
}

/// Project store contract: snapshots and listings.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn read_project(&self, project_id: &str) -> ClientResult<Project>;

    async fn list_owned(&self, query: &str) -> ClientResult<Vec<ProjectListEntry>>;

    async fn list_public(&self, query: &str) -> ClientResult<Vec<ProjectListEntry>>;

    async fn create_project(&self, request: &CreateProjectRequest) -> ClientResult<IdResponse>;

    async fn set_acl(&self, project_id: &str, request: &SetAclRequest) -> ClientResult<()>;
}

/// File store contract: the five mutations against a project's
/// authoritative entry set.
///
/// Every call is fire-and-forget from the tree cache's perspective: the
/// cache converges from the direct response or from the notification
/// channel, whichever arrives first.
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn create_file(&self, project_id: &str, path: &str) -> ClientResult<Entry>;

    async fn create_directory(&self, project_id: &str, path: &str) -> ClientResult<Entry>;

    async fn move_entry(&self, project_id: &str, old_path: &str, new_path: &str)
        -> ClientResult<()>;

    async fn delete_entry(&self, project_id: &str, path: &str) -> ClientResult<()>;

    async fn update_content(&self, project_id: &str, path: &str, content: &str)
        -> ClientResult<Entry>;
}

/// One end of an open duplex byte stream bound to a running job.
///
/// Raw bytes in both directions; the only structure the client imposes
/// is the viewport-mode scan performed by the session controller.
#[async_trait]
pub trait SessionChannel: Send {
    async fn send(&mut self, bytes: &[u8]) -> ClientResult<()>;

    /// Next inbound chunk; `None` once the remote side has closed.
    async fn recv(&mut self) -> Option<ClientResult<Vec<u8>>>;

    async fn close(&mut self) -> ClientResult<()>;
}

/// Factory for session channels, one per run request.
#[async_trait]
pub trait SessionConnector: Send + Sync {
    async fn connect(
        &self,
        project_id: &str,
        recipe_path: &str,
    ) -> ClientResult<Box<dyn SessionChannel>>;
}
