// Copyright 2026 Workbench Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Main REST API client implementation

use reqwest::{Client as HttpClient, Method, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::{RestClientError, RestClientResult};
use wb_api_contract::*;

/// Request/response client for the workspace service.
///
/// Carries a cookie store so the account service's session cookie
/// survives across calls. Mutations are fire-and-forget with respect to
/// the tree cache: this type never touches client-side state.
#[derive(Debug, Clone)]
pub struct RestClient {
    http_client: HttpClient,
    base_url: Url,
}

impl RestClient {
    /// Create a new REST client.
    pub fn new(base_url: Url) -> Self {
        let http_client = HttpClient::builder()
            .user_agent("workbench/0.1")
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client");

        Self { http_client, base_url }
    }

    /// Create a client from a base URL string.
    pub fn from_url(base_url: &str) -> RestClientResult<Self> {
        let base_url = Url::parse(base_url)?;
        Ok(Self::new(base_url))
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Log in with email and password.
    pub async fn login(&self, request: &LoginRequest) -> RestClientResult<User> {
        self.put("/login", request).await
    }

    /// Register a new account.
    pub async fn register(&self, request: &RegisterRequest) -> RestClientResult<User> {
        self.post("/register", request).await
    }

    /// The user the current session belongs to.
    pub async fn current_user(&self) -> RestClientResult<User> {
        self.get("/self").await
    }

    /// List projects owned by the current user, filtered by `query`.
    pub async fn list_owned_projects(&self, query: &str) -> RestClientResult<Vec<ProjectListEntry>> {
        let url = self.searchable("/projects/owned", query)?;
        self.get(url.as_ref()).await
    }

    /// Search public projects.
    pub async fn list_public_projects(
        &self,
        query: &str,
    ) -> RestClientResult<Vec<ProjectListEntry>> {
        let url = self.searchable("/projects/public", query)?;
        self.get(url.as_ref()).await
    }

    /// Create a project.
    pub async fn create_project(
        &self,
        request: &CreateProjectRequest,
    ) -> RestClientResult<IdResponse> {
        self.post("/projects/create", request).await
    }

    /// Fetch the authoritative project snapshot.
    pub async fn read_project(&self, project_id: &str) -> RestClientResult<Project> {
        let url = format!("/projects/{project_id}");
        self.get(&url).await
    }

    /// Read a project's access-control list.
    pub async fn read_project_acl(
        &self,
        project_id: &str,
        query: &str,
    ) -> RestClientResult<Vec<AclEntry>> {
        let url = self.searchable(&format!("/projects/{project_id}/acl"), query)?;
        self.get(url.as_ref()).await
    }

    /// Grant or revoke access for one user.
    pub async fn set_project_acl(
        &self,
        project_id: &str,
        request: &SetAclRequest,
    ) -> RestClientResult<()> {
        let url = format!("/projects/{project_id}/acl");
        self.put_unit(&url, request).await
    }

    /// Create a file at `path`.
    pub async fn create_file(&self, project_id: &str, path: &str) -> RestClientResult<Entry> {
        let url = format!("/projects/{project_id}/file");
        self.post(&url, &CreateEntryRequest { path: path.to_string() }).await
    }

    /// Create a directory at `path` (trailing separator included).
    pub async fn create_directory(&self, project_id: &str, path: &str) -> RestClientResult<Entry> {
        let url = format!("/projects/{project_id}/directory");
        self.post(&url, &CreateEntryRequest { path: path.to_string() }).await
    }

    /// Move or rename an entry. Directory moves carry their whole
    /// subtree on the server side; the client learns the outcome from
    /// the response and/or the notification channel.
    pub async fn move_entry(
        &self,
        project_id: &str,
        old_path: &str,
        new_path: &str,
    ) -> RestClientResult<()> {
        let url = format!("/projects/{project_id}/files/move");
        let body = MoveEntryRequest {
            old_path: old_path.to_string(),
            new_path: new_path.to_string(),
        };
        self.put_unit(&url, &body).await
    }

    /// Delete an entry. Deleting a directory deletes its subtree.
    pub async fn delete_entry(&self, project_id: &str, path: &str) -> RestClientResult<()> {
        // The entry path is itself the suffix of the endpoint.
        let url = format!("/projects/{project_id}/files{path}");
        self.delete_unit(&url).await
    }

    /// Replace a file's content.
    pub async fn update_content(
        &self,
        project_id: &str,
        path: &str,
        content: &str,
    ) -> RestClientResult<Entry> {
        let url = format!("/projects/{project_id}/files{path}");
        self.put(&url, &UpdateContentRequest { content: content.to_string() }).await
    }

    /// WebSocket endpoint for a project's notification stream.
    pub fn notifications_url(&self, project_id: &str) -> RestClientResult<Url> {
        self.ws_url(&format!("/projects/{project_id}/notifications"))
    }

    /// WebSocket endpoint for running a recipe file as a job.
    pub fn job_url(&self, project_id: &str, recipe_path: &str) -> RestClientResult<Url> {
        self.ws_url(&format!("/project/{project_id}/job/recipe{recipe_path}"))
    }

    // Private helper methods

    fn searchable(&self, path: &str, query: &str) -> RestClientResult<Url> {
        let mut url = self.base_url.join(path)?;
        url.query_pairs_mut().append_pair("query", query);
        Ok(url)
    }

    fn ws_url(&self, path: &str) -> RestClientResult<Url> {
        let mut url = self.base_url.join(path)?;
        let scheme = match url.scheme() {
            "https" | "wss" => "wss",
            _ => "ws",
        };
        url.set_scheme(scheme)
            .map_err(|_| RestClientError::UnexpectedResponse("unsupported base URL scheme".into()))?;
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> RestClientResult<T> {
        self.request(Method::GET, path, None::<&()>).await
    }

    async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> RestClientResult<T> {
        self.request(Method::POST, path, Some(body)).await
    }

    async fn put<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> RestClientResult<T> {
        self.request(Method::PUT, path, Some(body)).await
    }

    async fn put_unit<B: serde::Serialize>(&self, path: &str, body: &B) -> RestClientResult<()> {
        let response = self.send(Method::PUT, path, Some(body)).await?;
        self.check_status(response).await
    }

    async fn delete_unit(&self, path: &str) -> RestClientResult<()> {
        let response = self.send(Method::DELETE, path, None::<&()>).await?;
        self.check_status(response).await
    }

    async fn request<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> RestClientResult<T> {
        let response = self.send(method, path, body).await?;
        self.handle_response(response).await
    }

    async fn send<B: serde::Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> RestClientResult<Response> {
        let url = if path.starts_with("http") {
            path.to_string()
        } else {
            self.base_url.join(path)?.to_string()
        };
        debug!(%method, %url, "issuing request");

        let mut request = self.http_client.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request.send().await?)
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: Response,
    ) -> RestClientResult<T> {
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            serde_json::from_str(&text).map_err(RestClientError::from)
        } else {
            Err(self.parse_error(&text))
        }
    }

    async fn check_status(&self, response: Response) -> RestClientResult<()> {
        if response.status().is_success() {
            return Ok(());
        }
        let text = response.text().await?;
        Err(self.parse_error(&text))
    }

    fn parse_error(&self, body: &str) -> RestClientError {
        match serde_json::from_str::<ApiError>(body) {
            Ok(error) => RestClientError::Api(error),
            Err(_) => RestClientError::UnexpectedResponse(body.to_string()),
        }
    }
}
