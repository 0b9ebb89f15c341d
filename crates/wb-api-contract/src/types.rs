//! API contract types for the workspace service
//!
//! Field names and casings match the server's JSON exactly; renames are
//! explicit where the Rust name differs from the wire name.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use validator::Validate;

/// An authenticated user as returned by the account service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_uri: Option<Url>,
}

/// One file or directory record, identified by its full path.
///
/// Directory paths carry a trailing `/`; file paths do not. The path is
/// the unique identity key inside a project. Content itself is not
/// inlined: `content_uri` locates it in the blob store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub project_id: String,
    pub path: String,
    pub is_directory: bool,
    pub content_uri: String,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "file_edited_at")]
    pub edited_at: DateTime<Utc>,
    pub author_name: String,
    pub editor_name: String,
}

/// Access-control entry for one user on one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclEntry {
    pub user_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_uri: Option<Url>,
    pub can_read: bool,
    pub can_write: bool,
}

/// Authoritative project snapshot, fetched once per navigation.
///
/// After the initial fetch the entry set is kept live exclusively
/// through mutation events; the snapshot is never re-fetched while the
/// view stays open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub public: bool,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub owner_name: String,
    #[serde(rename = "files")]
    pub entries: Vec<Entry>,
    pub owned: bool,
    pub can_write: bool,
    pub acl: Vec<AclEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_uri: Option<Url>,
}

/// Lightweight listing record for project search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectListEntry {
    pub id: String,
    pub name: String,
    pub public: bool,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub owner_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_uri: Option<Url>,
}

/// Execution status of a job launched against a recipe file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub started: bool,
    pub completed: bool,
    pub success: bool,
}

/// One mutation to a project's entry set, as delivered by the
/// notification channel.
///
/// The same logical mutation also reaches the client through the direct
/// response of the request that caused it; the tree cache absorbs
/// whichever arrives second as a no-op.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum MutationEvent {
    Created {
        #[serde(rename = "file")]
        entry: Entry,
    },
    Moved {
        old_path: String,
        #[serde(rename = "file")]
        entry: Entry,
    },
    Deleted {
        path: String,
    },
}

/// Generic id-only response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdResponse {
    pub id: String,
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    pub password: String,
    #[serde(rename = "stay_signed")]
    pub stay_signed_in: bool,
}

/// Registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[serde(rename = "stay_signed")]
    pub stay_signed_in: bool,
}

/// Project creation request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: String,
    pub public: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body for file and directory creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEntryRequest {
    pub path: String,
}

/// Body for move/rename operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveEntryRequest {
    pub old_path: String,
    pub new_path: String,
}

/// Body for content updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateContentRequest {
    pub content: String,
}

/// Body for granting or revoking project access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetAclRequest {
    pub user_id: String,
    pub can_read: bool,
    pub can_write: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_json(path: &str, is_directory: bool) -> String {
        format!(
            r#"{{
                "project_id": "9b2f0c1e-9f1f-4f32-8f2a-1df1c4b7a001",
                "path": "{path}",
                "is_directory": {is_directory},
                "content_uri": "blob://9b2f/abc123",
                "created_at": "2026-01-12T09:30:00Z",
                "file_edited_at": "2026-01-13T17:45:00Z",
                "author_name": "mara",
                "editor_name": "jules"
            }}"#
        )
    }

    #[test]
    fn entry_roundtrip_preserves_wire_names() {
        let entry: Entry = serde_json::from_str(&entry_json("/src/main.rs", false)).unwrap();
        assert_eq!(entry.path, "/src/main.rs");
        assert!(!entry.is_directory);

        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("file_edited_at").is_some());
        assert!(json.get("edited_at").is_none());
    }

    #[test]
    fn mutation_event_created_uses_event_tag() {
        let json = format!(r#"{{"event": "created", "file": {}}}"#, entry_json("/a.txt", false));
        let event: MutationEvent = serde_json::from_str(&json).unwrap();
        match event {
            MutationEvent::Created { entry } => assert_eq!(entry.path, "/a.txt"),
            other => panic!("expected Created, got {other:?}"),
        }
    }

    #[test]
    fn mutation_event_moved_carries_old_path() {
        let json = format!(
            r#"{{"event": "moved", "old_path": "/old.txt", "file": {}}}"#,
            entry_json("/new.txt", false)
        );
        let event: MutationEvent = serde_json::from_str(&json).unwrap();
        match event {
            MutationEvent::Moved { old_path, entry } => {
                assert_eq!(old_path, "/old.txt");
                assert_eq!(entry.path, "/new.txt");
            }
            other => panic!("expected Moved, got {other:?}"),
        }
    }

    #[test]
    fn mutation_event_deleted_is_path_only() {
        let event: MutationEvent =
            serde_json::from_str(r#"{"event": "deleted", "path": "/gone/"}"#).unwrap();
        assert_eq!(event, MutationEvent::Deleted { path: "/gone/".to_string() });
    }

    #[test]
    fn login_request_renames_stay_signed() {
        let req = LoginRequest {
            email: "mara@example.net".to_string(),
            password: "hunter222".to_string(),
            stay_signed_in: true,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["stay_signed"], true);
    }
}
