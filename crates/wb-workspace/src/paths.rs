// Copyright 2026 Workbench Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure utilities over hierarchical path strings.
//!
//! Paths are absolute and `/`-separated; directory paths carry a
//! trailing separator, file paths do not. All functions here are total:
//! they never fail, never allocate beyond their return value, and make
//! no assumption about the path existing anywhere.

use std::cmp::Ordering;

/// Path components, without empty segments. `split("/")` is empty.
pub fn split(path: &str) -> Vec<&str> {
    path.split('/').filter(|component| !component.is_empty()).collect()
}

/// Whether a path denotes a directory (trailing separator convention).
pub fn is_directory(path: &str) -> bool {
    path.ends_with('/')
}

/// Whether a path is the project root.
pub fn is_root(path: &str) -> bool {
    path == "/"
}

/// The containing directory path, including its trailing separator.
/// The parent of the root is the root itself.
pub fn parent(path: &str) -> &str {
    let trimmed = path.strip_suffix('/').unwrap_or(path);
    match trimmed.rfind('/') {
        Some(idx) => &path[..=idx],
        None => "/",
    }
}

/// The last path component; directories yield the component before the
/// trailing separator. The root yields the empty string.
pub fn basename(path: &str) -> &str {
    let trimmed = path.strip_suffix('/').unwrap_or(path);
    match trimmed.rfind('/') {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

/// Join a directory path and a component into a full path.
pub fn join(dir: &str, name: &str, directory: bool) -> String {
    let suffix = if directory { "/" } else { "" };
    format!("{dir}{name}{suffix}")
}

/// Whether `dir` (a directory path) strictly contains `other`.
/// A path never strictly contains itself.
pub fn is_strict_prefix(dir: &str, other: &str) -> bool {
    is_directory(dir) && other != dir && other.starts_with(dir)
}

/// Display order for siblings: directories before files, then by name,
/// ties broken by full path.
pub fn sibling_order(
    (a_directory, a_name, a_path): (bool, &str, &str),
    (b_directory, b_name, b_path): (bool, &str, &str),
) -> Ordering {
    b_directory
        .cmp(&a_directory)
        .then_with(|| a_name.cmp(b_name))
        .then_with(|| a_path.cmp(b_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_drops_empty_components() {
        assert_eq!(split("/"), Vec::<&str>::new());
        assert_eq!(split("/a/b.txt"), vec!["a", "b.txt"]);
        assert_eq!(split("/a/b/"), vec!["a", "b"]);
    }

    #[test]
    fn parent_of_files_and_directories() {
        assert_eq!(parent("/a/b.txt"), "/a/");
        assert_eq!(parent("/a/b/"), "/a/");
        assert_eq!(parent("/a.txt"), "/");
        assert_eq!(parent("/a/"), "/");
        assert_eq!(parent("/"), "/");
    }

    #[test]
    fn basename_of_files_and_directories() {
        assert_eq!(basename("/a/b.txt"), "b.txt");
        assert_eq!(basename("/a/b/"), "b");
        assert_eq!(basename("/a/"), "a");
        assert_eq!(basename("/"), "");
    }

    #[test]
    fn join_respects_directory_convention() {
        assert_eq!(join("/", "notes.txt", false), "/notes.txt");
        assert_eq!(join("/src/", "lib", true), "/src/lib/");
    }

    #[test]
    fn strict_prefix_excludes_self_and_siblings() {
        assert!(is_strict_prefix("/a/", "/a/b.txt"));
        assert!(is_strict_prefix("/a/", "/a/b/c/"));
        assert!(!is_strict_prefix("/a/", "/a/"));
        assert!(!is_strict_prefix("/a/", "/ab.txt"));
        assert!(!is_strict_prefix("/a/b.txt", "/a/b.txt.bak"));
    }

    #[test]
    fn directories_sort_before_files() {
        let dir = (true, "zeta", "/zeta/");
        let file = (false, "alpha", "/alpha");
        assert_eq!(sibling_order(dir, file), Ordering::Less);
        assert_eq!(sibling_order(file, dir), Ordering::Greater);
        assert_eq!(
            sibling_order((false, "a", "/x/a"), (false, "a", "/y/a")),
            Ordering::Less
        );
    }
}
