// Copyright 2026 Workbench Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP and WebSocket client for the workbench workspace service.
//!
//! This crate provides the concrete transports behind the abstract
//! contracts in `wb-client-api`: a cookie-session REST client for the
//! account/project/file stores, a per-project WebSocket notification
//! channel, and the duplex session transport for interactive jobs.
//!
//! It carries no client-side state of its own; the tree cache in
//! `wb-workspace` converges from responses and notifications
//! independently of this layer.

pub mod client;
pub mod config;
pub mod error;
pub mod notifications;
pub mod session;

pub use client::*;
pub use config::*;
pub use error::*;
pub use notifications::*;
pub use session::*;

use async_trait::async_trait;
use wb_api_contract::*;
use wb_client_api::{AccountService, ClientResult, FileStore, ProjectStore};

#[async_trait]
impl AccountService for client::RestClient {
    async fn login(
        &self,
        email: &str,
        password: &str,
        stay_signed_in: bool,
    ) -> ClientResult<User> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
            stay_signed_in,
        };
        self.login(&request).await.map_err(|e| e.into_api_error())
    }

    async fn register(
        &self,
        email: &str,
        name: &str,
        password: &str,
        stay_signed_in: bool,
    ) -> ClientResult<User> {
        let request = RegisterRequest {
            email: email.to_string(),
            name: name.to_string(),
            password: password.to_string(),
            stay_signed_in,
        };
        self.register(&request).await.map_err(|e| e.into_api_error())
    }

    async fn current_user(&self) -> ClientResult<User> {
        self.current_user().await.map_err(|e| e.into_api_error())
    }
}

#[async_trait]
impl ProjectStore for client::RestClient {
    async fn read_project(&self, project_id: &str) -> ClientResult<Project> {
        self.read_project(project_id).await.map_err(|e| e.into_api_error())
    }

    async fn list_owned(&self, query: &str) -> ClientResult<Vec<ProjectListEntry>> {
        self.list_owned_projects(query).await.map_err(|e| e.into_api_error())
    }

    async fn list_public(&self, query: &str) -> ClientResult<Vec<ProjectListEntry>> {
        self.list_public_projects(query).await.map_err(|e| e.into_api_error())
    }

    async fn create_project(&self, request: &CreateProjectRequest) -> ClientResult<IdResponse> {
        self.create_project(request).await.map_err(|e| e.into_api_error())
    }

    async fn set_acl(&self, project_id: &str, request: &SetAclRequest) -> ClientResult<()> {
        self.set_project_acl(project_id, request).await.map_err(|e| e.into_api_error())
    }
}

#[async_trait]
impl FileStore for client::RestClient {
    async fn create_file(&self, project_id: &str, path: &str) -> ClientResult<Entry> {
        self.create_file(project_id, path).await.map_err(|e| e.into_api_error())
    }

    async fn create_directory(&self, project_id: &str, path: &str) -> ClientResult<Entry> {
        self.create_directory(project_id, path).await.map_err(|e| e.into_api_error())
    }

    async fn move_entry(
        &self,
        project_id: &str,
        old_path: &str,
        new_path: &str,
    ) -> ClientResult<()> {
        self.move_entry(project_id, old_path, new_path).await.map_err(|e| e.into_api_error())
    }

    async fn delete_entry(&self, project_id: &str, path: &str) -> ClientResult<()> {
        self.delete_entry(project_id, path).await.map_err(|e| e.into_api_error())
    }

    async fn update_content(
        &self,
        project_id: &str,
        path: &str,
        content: &str,
    ) -> ClientResult<Entry> {
        self.update_content(project_id, path, content).await.map_err(|e| e.into_api_error())
    }
}
