//! Workspace analysis and cleanup engine: classification, traversal, duplicate
//! detection, statistics, cleanup, organize, and the file-tree view.
//!
//! Every operation is synchronous and runs to completion on the calling
//! thread. Nothing here locks the tree; concurrent cleanup/organize calls on
//! the same root must be serialized by the caller.

pub mod classify;
pub mod cleanup;
pub mod dedup;
pub mod organize;
pub mod stats;
pub mod tree;
pub mod walker;

pub use classify::{Category, Destination, classify};
pub use cleanup::{CleanupCategory, CleanupRequest, CleanupResult, cleanup};
pub use organize::{MovedFile, OrganizeResult, OrganizeStrategy, organize};
pub use stats::{WorkspaceAnalysis, analyze};
pub use tree::{NodeKind, TreeNode, build_tree};
pub use walker::{FileRecord, walk};
