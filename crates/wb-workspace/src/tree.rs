// Copyright 2026 Workbench Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hierarchical cache of a project's remote file tree.
//!
//! The cache owns the flat entry set (path → [`Entry`]) and derives the
//! [`TreeNode`] projection from it deterministically. It is fed from two
//! independent producers, direct mutation responses and the notification
//! channel, that report the same logical events in arbitrary order;
//! `apply_*` operations are idempotent by path identity so both arrivals
//! converge to the same state.
//!
//! Directory existence is asymmetric, deliberately so: a non-empty
//! directory is inferred from its descendants' paths and needs no entry
//! of its own, while an empty directory is representable only through an
//! explicit directory entry. Deleting a directory path cascades over
//! every entry under that prefix.

use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};
use wb_api_contract::{Entry, MutationEvent, Project};

use crate::paths;

/// Derived display projection of the entry set. Never persisted,
/// rebuilt from scratch on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    /// Full path; doubles as the identity key for rendering layers.
    pub id: String,
    pub name: String,
    pub is_directory: bool,
    pub is_root: bool,
    pub children: Vec<TreeNode>,
}

struct NodeBuilder {
    name: String,
    is_directory: bool,
    children: Vec<String>,
}

/// Single-owner cache of one project's entry set.
pub struct TreeCache {
    project_id: String,
    root_name: String,
    entries: HashMap<String, Entry>,
    generation: u64,
}

impl TreeCache {
    /// Seed the cache from an authoritative project snapshot.
    pub fn new(project: &Project) -> Self {
        let entries = project
            .entries
            .iter()
            .map(|entry| (entry.path.clone(), entry.clone()))
            .collect();
        Self {
            project_id: project.id.clone(),
            root_name: format!("{} / {}", project.owner_name, project.name),
            entries,
            generation: 0,
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Bumped on every effective change; cheap re-render signal.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn get(&self, path: &str) -> Option<&Entry> {
        self.entries.get(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Route one mutation event through the converging apply function.
    pub fn apply(&mut self, event: &MutationEvent) -> bool {
        match event {
            MutationEvent::Created { entry } => self.apply_created(entry),
            MutationEvent::Moved { old_path, entry } => self.apply_moved(old_path, entry),
            MutationEvent::Deleted { path } => self.apply_deleted(path),
        }
    }

    /// Record a created entry. Re-applying the same entry is a no-op; a
    /// differing entry at the same path replaces it (last arrival wins).
    pub fn apply_created(&mut self, entry: &Entry) -> bool {
        if self.entries.get(&entry.path) == Some(entry) {
            return false;
        }
        self.entries.insert(entry.path.clone(), entry.clone());
        self.bump();
        true
    }

    /// Remove an entry. Unknown paths are a safe no-op; directory paths
    /// cascade over every entry under the prefix in the same
    /// transaction.
    pub fn apply_deleted(&mut self, path: &str) -> bool {
        let mut changed = self.entries.remove(path).is_some();

        if paths::is_directory(path) {
            let doomed: Vec<String> = self
                .entries
                .keys()
                .filter(|key| paths::is_strict_prefix(path, key))
                .cloned()
                .collect();
            for key in &doomed {
                self.entries.remove(key);
            }
            changed |= !doomed.is_empty();
        }

        if changed {
            debug!(path, "applied deletion");
            self.bump();
        }
        changed
    }

    /// Record a move from `old_path` to `entry.path`.
    ///
    /// Unknown `old_path` is a safe no-op: either the event was already
    /// applied through the other channel, or the matching creation was
    /// missed entirely. Directory moves rewrite every descendant path
    /// atomically: the whole rename set is computed and checked first,
    /// and on any conflict the cache is left untouched.
    pub fn apply_moved(&mut self, old_path: &str, entry: &Entry) -> bool {
        if old_path == entry.path {
            return self.apply_created(entry);
        }
        if !self.entries.contains_key(old_path) {
            return false;
        }

        if paths::is_directory(old_path) {
            if !paths::is_directory(&entry.path) {
                warn!(old_path, new_path = %entry.path, "rejecting directory move to file path");
                return false;
            }
            if paths::is_strict_prefix(old_path, &entry.path) {
                warn!(old_path, new_path = %entry.path, "rejecting move into own subtree");
                return false;
            }

            let move_set: HashSet<String> = self
                .entries
                .keys()
                .filter(|key| *key == old_path || paths::is_strict_prefix(old_path, key))
                .cloned()
                .collect();

            let mut renames = Vec::with_capacity(move_set.len());
            for old_key in &move_set {
                let new_key = format!("{}{}", entry.path, &old_key[old_path.len()..]);
                if self.entries.contains_key(&new_key) && !move_set.contains(&new_key) {
                    warn!(old_path, conflict = %new_key, "rejecting move, target occupied");
                    return false;
                }
                renames.push((old_key.clone(), new_key));
            }

            for (old_key, new_key) in renames {
                if let Some(mut moved) = self.entries.remove(&old_key) {
                    moved.path = new_key.clone();
                    self.entries.insert(new_key, moved);
                }
            }
            // The server's record for the moved directory itself
            // carries fresh metadata; prefer it over the rewrite.
            self.entries.insert(entry.path.clone(), entry.clone());
        } else {
            self.entries.remove(old_path);
            self.entries.insert(entry.path.clone(), entry.clone());
        }

        debug!(old_path, new_path = %entry.path, "applied move");
        self.bump();
        true
    }

    /// Disambiguate a default creation name against the local entry set
    /// by prefixing `new_` until no collision remains. Another actor may
    /// still race us to the name; the server stays the final arbiter.
    pub fn available_name(&self, parent_dir: &str, base: &str, directory: bool) -> String {
        let mut name = base.to_string();
        while self.entries.contains_key(&paths::join(parent_dir, &name, directory)) {
            name = format!("new_{name}");
        }
        name
    }

    /// Rebuild the display projection from the current entry set.
    ///
    /// Deterministic in the entry multiset alone: entries are sorted by
    /// (path length, path) so ancestors precede descendants, then
    /// inserted under a dir-path index, creating inferred intermediate
    /// directories as needed.
    pub fn rebuild(&self) -> TreeNode {
        let mut sorted: Vec<&Entry> = self.entries.values().collect();
        sorted.sort_by(|a, b| {
            a.path.len().cmp(&b.path.len()).then_with(|| a.path.cmp(&b.path))
        });

        let mut builders: HashMap<String, NodeBuilder> = HashMap::new();
        builders.insert(
            "/".to_string(),
            NodeBuilder {
                name: self.root_name.clone(),
                is_directory: true,
                children: Vec::new(),
            },
        );

        for entry in sorted {
            if paths::is_root(&entry.path) {
                continue;
            }
            if entry.is_directory {
                ensure_directory(&mut builders, &entry.path);
            } else {
                ensure_directory(&mut builders, paths::parent(&entry.path));
                if !builders.contains_key(&entry.path) {
                    let parent_dir = paths::parent(&entry.path).to_string();
                    if let Some(parent) = builders.get_mut(&parent_dir) {
                        parent.children.push(entry.path.clone());
                    }
                    builders.insert(
                        entry.path.clone(),
                        NodeBuilder {
                            name: paths::basename(&entry.path).to_string(),
                            is_directory: false,
                            children: Vec::new(),
                        },
                    );
                }
            }
        }

        let mut root = assemble(&builders, "/").unwrap_or(TreeNode {
            id: "/".to_string(),
            name: self.root_name.clone(),
            is_directory: true,
            is_root: true,
            children: Vec::new(),
        });
        root.is_root = true;
        root
    }

    fn bump(&mut self) {
        self.generation += 1;
    }
}

/// Register a directory node and its ancestor chain, inferring any
/// intermediates that have no explicit entry.
fn ensure_directory(builders: &mut HashMap<String, NodeBuilder>, dir: &str) {
    if builders.contains_key(dir) {
        return;
    }
    let parent_dir = paths::parent(dir).to_string();
    ensure_directory(builders, &parent_dir);
    if let Some(parent) = builders.get_mut(&parent_dir) {
        parent.children.push(dir.to_string());
    }
    builders.insert(
        dir.to_string(),
        NodeBuilder {
            name: paths::basename(dir).to_string(),
            is_directory: true,
            children: Vec::new(),
        },
    );
}

fn assemble(builders: &HashMap<String, NodeBuilder>, id: &str) -> Option<TreeNode> {
    let builder = builders.get(id)?;
    let mut children: Vec<TreeNode> = builder
        .children
        .iter()
        .filter_map(|child| assemble(builders, child))
        .collect();
    children.sort_by(|a, b| {
        paths::sibling_order(
            (a.is_directory, &a.name, &a.id),
            (b.is_directory, &b.name, &b.id),
        )
    });
    Some(TreeNode {
        id: id.to_string(),
        name: builder.name.clone(),
        is_directory: builder.is_directory,
        is_root: false,
        children,
    })
}
