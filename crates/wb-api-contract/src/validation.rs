// Copyright 2026 Workbench Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Validation helpers for contract types

use crate::error::ApiContractError;
use crate::types::*;
use validator::Validate;

/// Validate an entry path before sending it to the server.
///
/// Paths are absolute, `/`-separated, with no empty interior components
/// and no `.`/`..` steps. A trailing `/` (directory convention) is
/// allowed; the bare root `/` is valid.
pub fn validate_path(path: &str) -> Result<(), ApiContractError> {
    if path.is_empty() {
        return Err(ApiContractError::InvalidPath("path is empty".to_string()));
    }
    if !path.starts_with('/') {
        return Err(ApiContractError::InvalidPath(format!("path must be absolute: {path}")));
    }
    if path == "/" {
        return Ok(());
    }

    let interior = path.strip_suffix('/').unwrap_or(path);
    for component in interior[1..].split('/') {
        if component.is_empty() {
            return Err(ApiContractError::InvalidPath(format!(
                "path contains an empty component: {path}"
            )));
        }
        if component == "." || component == ".." {
            return Err(ApiContractError::InvalidPath(format!(
                "path contains a relative component: {path}"
            )));
        }
    }
    Ok(())
}

/// Validate a single file or directory name (one path component).
pub fn validate_entry_name(name: &str) -> Result<(), ApiContractError> {
    if name.is_empty() {
        return Err(ApiContractError::InvalidName("name is empty".to_string()));
    }
    if name.contains('/') {
        return Err(ApiContractError::InvalidName(format!("name contains a separator: {name}")));
    }
    if name == "." || name == ".." {
        return Err(ApiContractError::InvalidName(format!("name is reserved: {name}")));
    }
    Ok(())
}

/// Validate a server-issued project identifier.
pub fn validate_project_id(id: &str) -> Result<(), ApiContractError> {
    uuid::Uuid::parse_str(id)
        .map(|_| ())
        .map_err(|e| ApiContractError::InvalidId(format!("{id}: {e}")))
}

/// Validate a registration request.
pub fn validate_register_request(request: &RegisterRequest) -> Result<(), ApiContractError> {
    request.validate()?;
    Ok(())
}

/// Validate a project creation request.
pub fn validate_create_project_request(
    request: &CreateProjectRequest,
) -> Result<(), ApiContractError> {
    request.validate()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_files_directories_and_root() {
        assert!(validate_path("/").is_ok());
        assert!(validate_path("/notes.txt").is_ok());
        assert!(validate_path("/src/lib/").is_ok());
        assert!(validate_path("/src/deep/tree/main.rs").is_ok());
    }

    #[test]
    fn rejects_malformed_paths() {
        assert!(validate_path("").is_err());
        assert!(validate_path("relative/file").is_err());
        assert!(validate_path("/a//b").is_err());
        assert!(validate_path("/a/../b").is_err());
        assert!(validate_path("/a/./b").is_err());
    }

    #[test]
    fn rejects_malformed_names() {
        assert!(validate_entry_name("notes.txt").is_ok());
        assert!(validate_entry_name("").is_err());
        assert!(validate_entry_name("a/b").is_err());
        assert!(validate_entry_name("..").is_err());
    }

    #[test]
    fn project_id_must_be_uuid() {
        assert!(validate_project_id("9b2f0c1e-9f1f-4f32-8f2a-1df1c4b7a001").is_ok());
        assert!(validate_project_id("not-a-uuid").is_err());
    }

    #[test]
    fn register_request_checks_email_and_password() {
        let request = RegisterRequest {
            email: "not-an-email".to_string(),
            name: "mara".to_string(),
            password: "short".to_string(),
            stay_signed_in: false,
        };
        assert!(validate_register_request(&request).is_err());

        let request = RegisterRequest {
            email: "mara@example.net".to_string(),
            name: "mara".to_string(),
            password: "longenough".to_string(),
            stay_signed_in: false,
        };
        assert!(validate_register_request(&request).is_ok());
    }
}
