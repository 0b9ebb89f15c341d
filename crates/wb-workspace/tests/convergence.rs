// Copyright 2026 Workbench Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end consistency of the tree cache under the double-producer
//! setup: every mutation is reported both by its direct response and by
//! the notification channel, in arbitrary order, and the cache must
//! converge to the same state either way.

use chrono::{TimeZone, Utc};
use wb_api_contract::{Entry, MutationEvent, Project};
use wb_workspace::TreeCache;

fn entry(path: &str) -> Entry {
    let ts = Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap();
    Entry {
        project_id: "p1".to_string(),
        path: path.to_string(),
        is_directory: path.ends_with('/'),
        content_uri: format!("blob:{path}"),
        created_at: ts,
        edited_at: ts,
        author_name: "mara".to_string(),
        editor_name: "mara".to_string(),
    }
}

fn cache(paths: &[&str]) -> TreeCache {
    let project = Project {
        id: "p1".to_string(),
        name: "demo".to_string(),
        public: false,
        description: None,
        created_at: Utc.with_ymd_and_hms(2026, 1, 10, 8, 0, 0).unwrap(),
        owner_name: "mara".to_string(),
        entries: paths.iter().map(|p| entry(p)).collect(),
        owned: true,
        can_write: true,
        acl: Vec::new(),
        avatar_uri: None,
    };
    TreeCache::new(&project)
}

fn paths_of(cache: &TreeCache, candidates: &[&str]) -> Vec<String> {
    candidates
        .iter()
        .filter(|p| cache.contains(p))
        .map(|p| p.to_string())
        .collect()
}

/// The same event batch applied in any order yields the same entry set
/// and the same rendered tree.
#[test]
fn event_order_does_not_change_the_final_state() {
    let events = vec![
        MutationEvent::Created { entry: entry("/src/") },
        MutationEvent::Created { entry: entry("/src/main.rs") },
        MutationEvent::Created { entry: entry("/notes.txt") },
        MutationEvent::Deleted { path: "/notes.txt".to_string() },
        MutationEvent::Moved {
            old_path: "/src/main.rs".to_string(),
            entry: entry("/src/lib.rs"),
        },
    ];
    let candidates =
        ["/src/", "/src/main.rs", "/src/lib.rs", "/notes.txt"];

    let mut forward = cache(&[]);
    for event in &events {
        forward.apply(event);
    }

    // Swapping independent neighbors must not change the outcome; the
    // dependent pairs (create-then-delete, create-then-move) stay
    // ordered, which is what the server guarantees per entity.
    let mut reordered = cache(&[]);
    reordered.apply(&events[2]);
    reordered.apply(&events[0]);
    reordered.apply(&events[3]);
    reordered.apply(&events[1]);
    reordered.apply(&events[4]);

    assert_eq!(paths_of(&forward, &candidates), paths_of(&reordered, &candidates));
    assert_eq!(forward.rebuild(), reordered.rebuild());
}

/// Response and notification both report the same mutation; applying
/// the pair in either order equals applying it once.
#[test]
fn double_delivery_converges() {
    let created = MutationEvent::Created { entry: entry("/a/b.txt") };

    let mut once = cache(&[]);
    once.apply(&created);

    let mut twice = cache(&[]);
    twice.apply(&created);
    let generation = twice.generation();
    assert!(!twice.apply(&created));
    assert_eq!(twice.generation(), generation);

    assert_eq!(once.rebuild(), twice.rebuild());

    // Same for a move: the second delivery finds the old path gone and
    // is a safe no-op.
    let moved = MutationEvent::Moved {
        old_path: "/a/b.txt".to_string(),
        entry: entry("/a/c.txt"),
    };
    assert!(twice.apply(&moved));
    assert!(!twice.apply(&moved));
    assert!(twice.contains("/a/c.txt"));
    assert!(!twice.contains("/a/b.txt"));
}

/// A directory deletion removes exactly the strict-prefix closure, and
/// the follow-up per-child notifications are harmless no-ops.
#[test]
fn cascade_delete_then_stray_child_notifications() {
    let mut cache = cache(&["/a/", "/a/b.txt", "/a/c/d.txt", "/ab.txt"]);
    assert!(cache.apply(&MutationEvent::Deleted { path: "/a/".to_string() }));
    assert!(cache.contains("/ab.txt"));
    assert_eq!(cache.len(), 1);

    assert!(!cache.apply(&MutationEvent::Deleted { path: "/a/b.txt".to_string() }));
    assert!(!cache.apply(&MutationEvent::Deleted { path: "/a/c/d.txt".to_string() }));
    assert_eq!(cache.len(), 1);
}

/// A rejected directory move leaves every affected path exactly where
/// it was.
#[test]
fn conflicting_directory_move_is_atomic() {
    let all = ["/a/", "/a/x.txt", "/dest/", "/dest/x.txt"];
    let mut cache = cache(&all);

    let event = MutationEvent::Moved {
        old_path: "/a/".to_string(),
        entry: entry("/dest/"),
    };
    assert!(!cache.apply(&event));
    assert_eq!(paths_of(&cache, &all), all.map(String::from).to_vec());
}

/// Inferred directories appear and disappear with their descendants;
/// explicit directory entries persist on their own.
#[test]
fn inferred_and_explicit_directories() {
    let mut cache = cache(&["/", "/a/", "/a/b.txt"]);

    let tree = cache.rebuild();
    assert_eq!(tree.children.len(), 1);
    assert_eq!(tree.children[0].id, "/a/");

    // Dropping the file leaves the explicit /a/ entry standing.
    cache.apply(&MutationEvent::Deleted { path: "/a/b.txt".to_string() });
    let tree = cache.rebuild();
    assert_eq!(tree.children[0].id, "/a/");
    assert!(tree.children[0].children.is_empty());

    // An inferred directory has no entry of its own and vanishes with
    // its last descendant.
    cache.apply(&MutationEvent::Created { entry: entry("/ghost/file.txt") });
    assert!(cache.rebuild().children.iter().any(|c| c.id == "/ghost/"));
    cache.apply(&MutationEvent::Deleted { path: "/ghost/file.txt".to_string() });
    assert!(!cache.rebuild().children.iter().any(|c| c.id == "/ghost/"));
}
