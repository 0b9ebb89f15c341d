// Copyright 2026 Workbench Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Controller for one open project view.
//!
//! Owns the tree cache, the autosave scheduler and the session
//! controller, and routes every mutation through the shared error
//! policy: field-scoped failures are returned to the caller for inline
//! rendering, everything else is also pushed to the global relay.
//!
//! Mutations are pessimistic: the cache changes only after the server
//! confirms, from the direct response here or from the notification
//! stream via [`WorkspaceController::apply_notification`], whichever
//! arrives first. The cache's idempotent apply functions make the
//! double arrival harmless.

use std::sync::Arc;
use tracing::info;
use wb_api_contract::{
    validate_entry_name, validate_project_id, ApiError, Entry, MutationEvent, Project,
};
use wb_client_api::{FileStore, ProjectStore, SessionConnector};

use crate::autosave::AutosaveScheduler;
use crate::error::{WorkspaceError, WorkspaceResult};
use crate::paths;
use crate::relay::ErrorRelay;
use crate::session::SessionController;
use crate::tree::{TreeCache, TreeNode};

/// Default base names for newly created entries; prefixed with `new_`
/// until the name is free in the target directory.
const DEFAULT_FILE_NAME: &str = "file";
const DEFAULT_DIRECTORY_NAME: &str = "directory";

pub struct WorkspaceController<S: FileStore + 'static> {
    store: Arc<S>,
    cache: TreeCache,
    autosave: AutosaveScheduler<S>,
    session: SessionController,
    relay: ErrorRelay,
}

impl<S: FileStore + 'static> WorkspaceController<S> {
    pub fn new(
        store: Arc<S>,
        connector: Arc<dyn SessionConnector>,
        project: &Project,
        relay: ErrorRelay,
    ) -> Self {
        let cache = TreeCache::new(project);
        let autosave = AutosaveScheduler::new(Arc::clone(&store), project.id.clone(), relay.clone());
        Self {
            store,
            cache,
            autosave,
            session: SessionController::new(connector),
            relay,
        }
    }

    /// Fetch a project snapshot and build the controller around it.
    pub async fn open<P: ProjectStore>(
        projects: &P,
        store: Arc<S>,
        connector: Arc<dyn SessionConnector>,
        project_id: &str,
        relay: ErrorRelay,
    ) -> WorkspaceResult<Self> {
        validate_project_id(project_id)?;
        match projects.read_project(project_id).await {
            Ok(project) => {
                info!(project_id, entries = project.entries.len(), "project opened");
                Ok(Self::new(store, connector, &project, relay))
            }
            Err(error) => {
                relay.report(&error);
                Err(WorkspaceError::Api(error))
            }
        }
    }

    pub fn cache(&self) -> &TreeCache {
        &self.cache
    }

    pub fn session(&mut self) -> &mut SessionController {
        &mut self.session
    }

    /// Current display projection of the file tree.
    pub fn tree(&self) -> TreeNode {
        self.cache.rebuild()
    }

    /// Create a file under `parent_dir` with a locally disambiguated
    /// default name.
    pub async fn create_file(&mut self, parent_dir: &str) -> WorkspaceResult<Entry> {
        self.create_entry(parent_dir, DEFAULT_FILE_NAME, false).await
    }

    /// Create a directory under `parent_dir` with a locally
    /// disambiguated default name.
    pub async fn create_directory(&mut self, parent_dir: &str) -> WorkspaceResult<Entry> {
        self.create_entry(parent_dir, DEFAULT_DIRECTORY_NAME, true).await
    }

    async fn create_entry(
        &mut self,
        parent_dir: &str,
        base: &str,
        directory: bool,
    ) -> WorkspaceResult<Entry> {
        let name = self.cache.available_name(parent_dir, base, directory);
        let path = paths::join(parent_dir, &name, directory);
        let project_id = self.cache.project_id().to_string();
        let result = if directory {
            self.store.create_directory(&project_id, &path).await
        } else {
            self.store.create_file(&project_id, &path).await
        };
        match result {
            Ok(entry) => {
                self.cache.apply_created(&entry);
                Ok(entry)
            }
            Err(error) => Err(self.fail(error)),
        }
    }

    /// Rename an entry in place. Name validation failures come back as
    /// field-scoped errors for inline rendering and never hit the relay.
    pub async fn rename(&mut self, path: &str, new_name: &str) -> WorkspaceResult<()> {
        if paths::is_root(path) {
            return Err(WorkspaceError::RootImmutable);
        }
        if let Err(error) = validate_entry_name(new_name) {
            return Err(WorkspaceError::Api(ApiError::bad_parameter("name", error.to_string())));
        }
        let new_path = paths::join(paths::parent(path), new_name, paths::is_directory(path));
        if new_path == path {
            return Ok(());
        }
        self.relocate(path, &new_path).await
    }

    /// Move an entry into another directory, keeping its name.
    pub async fn move_to(&mut self, path: &str, dest_dir: &str) -> WorkspaceResult<()> {
        if paths::is_root(path) {
            return Err(WorkspaceError::RootImmutable);
        }
        let new_path = paths::join(dest_dir, paths::basename(path), paths::is_directory(path));
        if new_path == path {
            return Ok(());
        }
        self.relocate(path, &new_path).await
    }

    async fn relocate(&mut self, old_path: &str, new_path: &str) -> WorkspaceResult<()> {
        let project_id = self.cache.project_id().to_string();
        match self.store.move_entry(&project_id, old_path, new_path).await {
            Ok(()) => {
                // The move response carries no entry; rewrite the local
                // record and let the notification reconcile metadata.
                if let Some(mut moved) = self.cache.get(old_path).cloned() {
                    moved.path = new_path.to_string();
                    self.cache.apply_moved(old_path, &moved);
                }
                self.autosave.retarget(old_path, new_path).await;
                Ok(())
            }
            Err(error) => Err(self.fail(error)),
        }
    }

    /// Delete an entry; directory paths cascade. A pending edit under
    /// the deleted path is discarded, not persisted.
    pub async fn delete(&mut self, path: &str) -> WorkspaceResult<()> {
        if paths::is_root(path) {
            return Err(WorkspaceError::RootImmutable);
        }
        let project_id = self.cache.project_id().to_string();
        match self.store.delete_entry(&project_id, path).await {
            Ok(()) => {
                self.autosave.discard_under(path).await;
                self.cache.apply_deleted(path);
                Ok(())
            }
            Err(error) => Err(self.fail(error)),
        }
    }

    /// Open a file in the editor; the previously open file is flushed.
    pub async fn open_file(&mut self, path: &str, content: &str) {
        self.autosave.open(path, content).await;
    }

    /// Buffer an editor change for debounced persistence.
    pub async fn edit(&mut self, content: &str) {
        self.autosave.on_content_changed(content).await;
    }

    /// Persist the open file now.
    pub async fn save(&mut self) {
        self.autosave.flush().await;
    }

    pub async fn is_dirty(&self) -> bool {
        self.autosave.is_dirty().await
    }

    /// Launch a recipe. The open file is flushed first so the job sees
    /// the buffered content.
    pub async fn run(&mut self, recipe_path: &str) -> WorkspaceResult<()> {
        self.autosave.flush().await;
        let project_id = self.cache.project_id().to_string();
        match self.session.start(&project_id, recipe_path).await {
            Ok(()) => Ok(()),
            Err(WorkspaceError::Api(error)) => Err(self.fail(error)),
            Err(other) => Err(other),
        }
    }

    /// Fold one notification-channel event into the local state.
    /// Returns whether the cache changed (re-render signal).
    pub async fn apply_notification(&mut self, event: &MutationEvent) -> bool {
        match event {
            MutationEvent::Moved { old_path, entry } => {
                self.autosave.retarget(old_path, &entry.path).await;
            }
            MutationEvent::Deleted { path } => {
                self.autosave.discard_under(path).await;
            }
            MutationEvent::Created { .. } => {}
        }
        self.cache.apply(event)
    }

    /// Tear down the view: flush the open file, close the session.
    pub async fn leave(&mut self) {
        self.autosave.close().await;
        self.session.close().await;
    }

    fn fail(&self, error: ApiError) -> WorkspaceError {
        self.relay.report(&error);
        WorkspaceError::Api(error)
    }
}
