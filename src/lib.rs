//! Workspace analysis and cleanup engine.
//!
//! Walks a workspace once to classify files, aggregate statistics, and detect
//! byte-identical duplicates; offers best-effort cleanup and type-based
//! reorganization; and builds a depth-bounded file tree for display.

pub mod core;
pub mod logger;
pub mod monitor;
pub mod workspace;

#[cfg(feature = "cli")]
pub mod cli_app;

pub use crate::core::config::Config;
pub use crate::core::errors::{Result, WsError};
pub use crate::monitor::{AnalysisPoller, SnapshotStore};
pub use crate::workspace::{
    CleanupCategory, CleanupRequest, CleanupResult, OrganizeResult, OrganizeStrategy, TreeNode,
    WorkspaceAnalysis, analyze, build_tree, cleanup, organize,
};
