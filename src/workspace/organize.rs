//! Move files into per-type destination folders under the workspace root.
//!
//! Files already under a destination folder are never touched again, so a
//! second run over the same tree moves nothing. An existing file at the target
//! location is never overwritten; the collision is reported in `errors` and
//! the source stays where it is. Completed moves are not rolled back when a
//! later item fails.

#![allow(missing_docs)]

use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use walkdir::{DirEntry, WalkDir};

use super::classify::{Category, Destination, classify};
use super::walker::{is_pruned, relative_to, root_walk_error};
use crate::core::config::AnalysisConfig;
use crate::core::errors::{Result, WsError, ensure_root};

/// How files are grouped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrganizeStrategy {
    /// One folder per [`Destination`], chosen from the file's category.
    #[default]
    ByType,
}

impl FromStr for OrganizeStrategy {
    type Err = WsError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "by_type" | "by-type" | "bytype" | "type" => Ok(Self::ByType),
            _ => Err(WsError::UnknownStrategy {
                value: value.to_string(),
            }),
        }
    }
}

/// One completed move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovedFile {
    pub from: PathBuf,
    pub to: PathBuf,
    #[serde(rename = "type")]
    pub category: Category,
}

/// Outcome of an organize pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizeResult {
    pub moved_files: Vec<MovedFile>,
    pub created_folders: Vec<PathBuf>,
    pub errors: Vec<String>,
}

/// Top-level directory that already is a destination folder.
fn is_destination_dir(entry: &DirEntry) -> bool {
    entry.depth() == 1
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .and_then(Destination::from_folder_name)
            .is_some()
}

/// Root-level file sitting where a destination folder would be created.
fn occupies_destination(root: &Path, path: &Path) -> bool {
    path.parent() == Some(root)
        && path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(Destination::from_folder_name)
            .is_some()
}

fn destination_for(strategy: OrganizeStrategy, path: &Path) -> (Category, Destination) {
    match strategy {
        OrganizeStrategy::ByType => {
            let category = classify(path);
            (category, category.destination())
        }
    }
}

/// Organize every file under `root` according to `strategy`.
pub fn organize(
    root: &Path,
    strategy: OrganizeStrategy,
    config: &AnalysisConfig,
) -> Result<OrganizeResult> {
    ensure_root(root)?;
    let mut result = OrganizeResult::default();

    // Collect first; moving while the walk is live would feed moved files back
    // into the traversal.
    let excluded = |name: &str| config.is_excluded(name);
    let mut pending = Vec::new();
    for item in WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| !is_pruned(entry, &excluded) && !is_destination_dir(entry))
    {
        match item {
            Ok(entry) if entry.file_type().is_file() => pending.push(entry.into_path()),
            Ok(_) => {}
            Err(err) if err.depth() == 0 => return Err(root_walk_error(root, err)),
            Err(err) => result.errors.push(format!("Failed to read: {err}")),
        }
    }

    // Files squatting on a destination name must leave first, otherwise the
    // outcome would depend on directory listing order.
    pending.sort_by_key(|path| !occupies_destination(root, path));

    let mut ready: HashSet<Destination> = HashSet::new();
    for source in pending {
        let Some(file_name) = source.file_name() else {
            continue;
        };
        let (category, destination) = destination_for(strategy, &source);
        let folder = root.join(destination.folder_name());

        if !ready.contains(&destination) {
            if !folder.is_dir() {
                if let Err(err) = std::fs::create_dir_all(&folder) {
                    result.errors.push(format!(
                        "Failed to create {}: {err}",
                        destination.folder_name()
                    ));
                    continue;
                }
                result
                    .created_folders
                    .push(PathBuf::from(destination.folder_name()));
            }
            ready.insert(destination);
        }

        let from = relative_to(root, &source);
        let target = folder.join(file_name);
        let to = relative_to(root, &target);
        if target.symlink_metadata().is_ok() {
            result.errors.push(format!(
                "Skipped {}: {} already exists",
                from.display(),
                to.display()
            ));
            continue;
        }
        match std::fs::rename(&source, &target) {
            Ok(()) => result.moved_files.push(MovedFile { from, to, category }),
            Err(err) => {
                warn!(from = %from.display(), error = %err, "move failed");
                result
                    .errors
                    .push(format!("Failed to move {}: {err}", from.display()));
            }
        }
    }

    info!(
        root = %root.display(),
        moved = result.moved_files.len(),
        created = result.created_folders.len(),
        errors = result.errors.len(),
        "organize complete"
    );
    Ok(result)
}

/// Format an organize result for terminal output.
#[must_use]
pub fn format_organize_report(result: &OrganizeResult) -> String {
    let mut out = String::new();
    for folder in &result.created_folders {
        let _ = writeln!(out, "  [ NEW] {}", folder.display());
    }
    for moved in &result.moved_files {
        let _ = writeln!(
            out,
            "  [MOVE] {} -> {} ({})",
            moved.from.display(),
            moved.to.display(),
            moved.category
        );
    }
    for err in &result.errors {
        let _ = writeln!(out, "  [FAIL] {err}");
    }
    let _ = writeln!(out);
    if result.errors.is_empty() {
        let _ = writeln!(
            out,
            "Organize completed: {} file(s) moved.",
            result.moved_files.len()
        );
    } else {
        let _ = writeln!(
            out,
            "Organize completed with {} error(s): {} file(s) moved.",
            result.errors.len(),
            result.moved_files.len()
        );
    }
    out
}
