//! Single-pass, exclusion-aware workspace traversal.
//!
//! The walker prunes excluded directory names before descending, stats every
//! remaining file, and tracks which directories ended up with no children so
//! empty folders can be reported without a second traversal. Files that vanish
//! or become unreadable between listing and stat are skipped silently.

#![allow(missing_docs)]

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use super::classify::{Category, classify};
use crate::core::config::AnalysisConfig;
use crate::core::errors::{Result, WsError, ensure_root};

/// One observed file. Owned by the pass that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Absolute (root-joined) path.
    pub path: PathBuf,
    /// Path relative to the workspace root.
    pub relative: PathBuf,
    pub size: u64,
    pub modified: DateTime<Utc>,
    pub category: Category,
}

/// Receives observations as the walk proceeds.
pub trait WalkVisitor {
    /// Called once per successfully stat'ed file.
    fn visit_file(&mut self, record: FileRecord);

    /// Called once per empty directory after the traversal finishes.
    fn visit_empty_dir(&mut self, relative: PathBuf);
}

/// Collecting visitor for callers that want plain vectors.
#[derive(Debug, Default)]
pub struct WalkOutput {
    pub files: Vec<FileRecord>,
    pub empty_dirs: Vec<PathBuf>,
}

impl WalkVisitor for WalkOutput {
    fn visit_file(&mut self, record: FileRecord) {
        self.files.push(record);
    }

    fn visit_empty_dir(&mut self, relative: PathBuf) {
        self.empty_dirs.push(relative);
    }
}

/// Whether a walkdir entry is a directory whose name is in the exclusion set.
pub(crate) fn is_pruned(entry: &DirEntry, excluded: &dyn Fn(&str) -> bool) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry.file_name().to_str().is_some_and(excluded)
}

/// Map a failure to read `root` itself into the pass-level error.
pub(crate) fn root_walk_error(root: &Path, err: walkdir::Error) -> WsError {
    let path = err.path().unwrap_or(root).to_path_buf();
    match err.into_io_error() {
        Some(source) => WsError::io(path, source),
        None => WsError::Runtime {
            details: format!("cannot traverse {}", path.display()),
        },
    }
}

/// Path of `path` relative to `root`, or `path` itself when unrelated.
pub(crate) fn relative_to(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root)
        .map_or_else(|_| path.to_path_buf(), Path::to_path_buf)
}

/// Walk `root`, feeding every observation to `visitor`.
///
/// Fails only when `root` itself is missing, not a directory, or unreadable.
pub fn walk_with(root: &Path, config: &AnalysisConfig, visitor: &mut dyn WalkVisitor) -> Result<()> {
    ensure_root(root)?;

    let excluded = |name: &str| config.is_excluded(name);
    let mut child_counts: HashMap<PathBuf, usize> = HashMap::new();
    let mut unreadable: HashSet<PathBuf> = HashSet::new();
    let mut dir_order: Vec<PathBuf> = Vec::new();

    let walker = WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| !is_pruned(entry, &excluded));

    for item in walker {
        let entry = match item {
            Ok(entry) => entry,
            Err(err) => {
                if err.depth() == 0 {
                    return Err(root_walk_error(root, err));
                }
                debug!(error = %err, "skipping unreadable entry");
                if let Some(path) = err.path() {
                    unreadable.insert(path.to_path_buf());
                }
                continue;
            }
        };

        if entry.depth() > 0 {
            if let Some(parent) = entry.path().parent() {
                *child_counts.entry(parent.to_path_buf()).or_default() += 1;
            }
        }

        if entry.file_type().is_dir() {
            if entry.depth() > 0 {
                dir_order.push(entry.path().to_path_buf());
            }
            continue;
        }
        if !entry.file_type().is_file() {
            continue;
        }

        let Ok(metadata) = entry.metadata() else {
            debug!(path = %entry.path().display(), "file vanished before stat");
            continue;
        };
        let Ok(modified) = metadata.modified() else {
            continue;
        };
        visitor.visit_file(FileRecord {
            path: entry.path().to_path_buf(),
            relative: relative_to(root, entry.path()),
            size: metadata.len(),
            modified: DateTime::<Utc>::from(modified),
            category: classify(entry.path()),
        });
    }

    for dir in dir_order {
        if unreadable.contains(&dir) || child_counts.contains_key(&dir) {
            continue;
        }
        visitor.visit_empty_dir(relative_to(root, &dir));
    }
    Ok(())
}

/// Walk `root` and collect every observation.
pub fn walk(root: &Path, config: &AnalysisConfig) -> Result<WalkOutput> {
    let mut output = WalkOutput::default();
    walk_with(root, config, &mut output)?;
    Ok(output)
}
