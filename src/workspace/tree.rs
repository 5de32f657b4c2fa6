//! Depth-bounded hierarchical view of the workspace for UI rendering.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::classify::{Category, classify};
use super::walker::relative_to;
use crate::core::config::AnalysisConfig;
use crate::core::errors::{Result, ensure_root};

/// Node kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A directory; carries `children`.
    Directory,
    /// A regular file (or anything that is not a directory).
    File,
}

/// One node of the file tree. Paths are relative to the workspace root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Final path component.
    pub name: String,
    /// Path relative to the root; the root itself is `.`.
    pub path: PathBuf,
    /// Directory or file.
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Category of a file node.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    /// Size of a file node in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Children of a directory node.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeNode>>,
}

impl TreeNode {
    /// Total number of nodes in this subtree, itself included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .flatten()
            .map(Self::node_count)
            .sum::<usize>()
    }

    /// Find a descendant by relative path.
    #[must_use]
    pub fn find(&self, path: &Path) -> Option<&Self> {
        if self.path == path {
            return Some(self);
        }
        self.children
            .iter()
            .flatten()
            .find_map(|child| child.find(path))
    }
}

/// Build the tree rooted at `root`, `max_depth` levels deep (root is depth 0).
///
/// Hidden directories and excluded names are pruned. Listing failures are
/// swallowed: the affected directory keeps whatever children were read.
pub fn build_tree(root: &Path, max_depth: usize, config: &AnalysisConfig) -> Result<TreeNode> {
    ensure_root(root)?;
    let name = root
        .file_name()
        .map_or_else(|| root.display().to_string(), |n| n.to_string_lossy().to_string());
    Ok(TreeNode {
        name,
        path: PathBuf::from("."),
        kind: NodeKind::Directory,
        category: None,
        size: None,
        children: Some(list_children(root, root, 0, max_depth, config)),
    })
}

fn list_children(
    root: &Path,
    dir: &Path,
    depth: usize,
    max_depth: usize,
    config: &AnalysisConfig,
) -> Vec<TreeNode> {
    let mut children = Vec::new();
    let Ok(entries) = fs::read_dir(dir) else {
        return children;
    };
    for entry in entries {
        let Ok(entry) = entry else {
            break;
        };
        let name = entry.file_name().to_string_lossy().to_string();
        let is_dir = entry.file_type().is_ok_and(|kind| kind.is_dir());
        if is_dir && (config.is_excluded(&name) || name.starts_with('.')) {
            continue;
        }
        if let Some(node) = build_node(root, &entry.path(), name, is_dir, depth + 1, max_depth, config) {
            children.push(node);
        }
    }
    children.sort_by(|left, right| left.kind.cmp(&right.kind).then_with(|| left.name.cmp(&right.name)));
    children
}

fn build_node(
    root: &Path,
    path: &Path,
    name: String,
    is_dir: bool,
    depth: usize,
    max_depth: usize,
    config: &AnalysisConfig,
) -> Option<TreeNode> {
    if depth > max_depth {
        return None;
    }
    let relative = relative_to(root, path);
    if is_dir {
        return Some(TreeNode {
            name,
            path: relative,
            kind: NodeKind::Directory,
            category: None,
            size: None,
            children: Some(list_children(root, path, depth, max_depth, config)),
        });
    }
    let size = fs::metadata(path).map(|meta| meta.len()).ok();
    Some(TreeNode {
        name,
        path: relative,
        kind: NodeKind::File,
        category: Some(classify(path)),
        size,
        children: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(root: &Path, rel: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("mkdir");
        }
        fs::write(path, b"x").expect("write");
    }

    #[test]
    fn tree_respects_depth_bound() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(dir.path(), "a/b/c/d/deep.txt");
        write(dir.path(), "top.txt");

        let tree = build_tree(dir.path(), 3, &AnalysisConfig::default()).expect("tree");
        assert!(tree.find(Path::new("top.txt")).is_some());
        let c = tree.find(Path::new("a/b/c")).expect("depth 3 present");
        assert_eq!(c.children.as_deref(), Some(&[][..]));
        assert!(tree.find(Path::new("a/b/c/d")).is_none());
    }

    #[test]
    fn hidden_and_excluded_dirs_are_pruned() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(dir.path(), ".secret/key.pem");
        write(dir.path(), "node_modules/pkg/index.js");
        write(dir.path(), "src/lib.rs");
        write(dir.path(), ".env");

        let tree = build_tree(dir.path(), 3, &AnalysisConfig::default()).expect("tree");
        assert!(tree.find(Path::new(".secret")).is_none());
        assert!(tree.find(Path::new("node_modules")).is_none());
        assert!(tree.find(Path::new("src/lib.rs")).is_some());
        // Hidden files stay visible; only hidden directories are pruned.
        assert!(tree.find(Path::new(".env")).is_some());
    }

    #[test]
    fn files_named_like_excluded_dirs_stay_visible() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(dir.path(), "env");
        write(dir.path(), "venv/bin/python");

        let tree = build_tree(dir.path(), 2, &AnalysisConfig::default()).expect("tree");
        let env = tree.find(Path::new("env")).expect("plain file kept");
        assert_eq!(env.kind, NodeKind::File);
        assert!(tree.find(Path::new("venv")).is_none());
    }

    #[test]
    fn directories_sort_before_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(dir.path(), "z_dir/inner.txt");
        write(dir.path(), "a_file.txt");
        let tree = build_tree(dir.path(), 2, &AnalysisConfig::default()).expect("tree");
        let names: Vec<_> = tree
            .children
            .as_ref()
            .expect("children")
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["z_dir", "a_file.txt"]);
        assert_eq!(tree.node_count(), 4);
    }

    #[test]
    fn depth_zero_yields_bare_root() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(dir.path(), "file.txt");
        let tree = build_tree(dir.path(), 0, &AnalysisConfig::default()).expect("tree");
        assert_eq!(tree.children, Some(Vec::new()));
    }

    #[test]
    fn file_nodes_serialize_with_type_tag() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(dir.path(), "main.py");
        let tree = build_tree(dir.path(), 1, &AnalysisConfig::default()).expect("tree");
        let json = serde_json::to_string(&tree).expect("json");
        assert!(json.contains("\"type\":\"directory\""));
        assert!(json.contains("\"type\":\"file\""));
        assert!(json.contains("\"category\":\"Python\""));
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(build_tree(&dir.path().join("nope"), 3, &AnalysisConfig::default()).is_err());
    }
}
