//! Category-driven cleanup with per-item failure tolerance.
//!
//! Cleanup runs its own traversal rather than reusing analysis records, so it
//! never acts on a stale listing. Each deletion failure is recorded in
//! [`CleanupResult::errors`] and the pass moves on to the next item.
//!
//! Removing a cache directory first sums its size, which costs a full walk of
//! that subtree.

#![allow(missing_docs)]

use std::collections::BTreeSet;
use std::fmt::{self, Write as _};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::walker::{is_pruned, relative_to, root_walk_error};
use crate::core::config::{Config, MIB};
use crate::core::errors::{Result, WsError, ensure_root};

/// What a cleanup pass is allowed to delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CleanupCategory {
    /// `.tmp`, `.temp`, `.bak` files.
    Temp,
    /// `.log` files.
    Logs,
    /// Files whose name contains `cache`, and whole cache directories.
    Cache,
}

impl CleanupCategory {
    pub const ALL: [Self; 3] = [Self::Temp, Self::Logs, Self::Cache];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Temp => "temp",
            Self::Logs => "logs",
            Self::Cache => "cache",
        }
    }
}

impl fmt::Display for CleanupCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CleanupCategory {
    type Err = WsError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "temp" | "tmp" => Ok(Self::Temp),
            "logs" | "log" => Ok(Self::Logs),
            "cache" => Ok(Self::Cache),
            _ => Err(WsError::UnknownCleanupCategory {
                value: value.to_string(),
            }),
        }
    }
}

/// Requested cleanup categories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupRequest {
    pub categories: BTreeSet<CleanupCategory>,
    /// Report matches without deleting.
    #[serde(default)]
    pub dry_run: bool,
}

impl CleanupRequest {
    #[must_use]
    pub fn new(categories: impl IntoIterator<Item = CleanupCategory>) -> Self {
        Self {
            categories: categories.into_iter().collect(),
            dry_run: false,
        }
    }

    /// Parse category tags such as `["temp", "logs"]`.
    pub fn parse<S: AsRef<str>>(tags: &[S]) -> Result<Self> {
        let categories = tags
            .iter()
            .map(|tag| tag.as_ref().parse())
            .collect::<Result<BTreeSet<_>>>()?;
        Ok(Self {
            categories,
            dry_run: false,
        })
    }

    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    fn wants(&self, category: CleanupCategory) -> bool {
        self.categories.contains(&category)
    }
}

/// Outcome of a cleanup pass. Non-empty `errors` alongside deletions is a
/// normal partial completion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupResult {
    pub deleted_files: Vec<PathBuf>,
    pub deleted_size: u64,
    pub errors: Vec<String>,
    pub dry_run: bool,
}

impl CleanupResult {
    fn record(&mut self, path: PathBuf, size: u64) {
        self.deleted_files.push(path);
        self.deleted_size += size;
    }

    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn deleted_size_mb(&self) -> f64 {
        self.deleted_size as f64 / MIB as f64
    }
}

fn ends_with_any(name: &str, suffixes: &[String]) -> bool {
    suffixes
        .iter()
        .any(|suffix| name.ends_with(&suffix.to_ascii_lowercase()))
}

/// Total size of regular files under `dir`.
fn subtree_size(dir: &Path) -> u64 {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.metadata().ok())
        .map(|meta| meta.len())
        .sum()
}

/// Delete everything under `root` matching the requested categories.
///
/// Only a missing or unreadable root fails the call; everything else lands in
/// the result's `errors`.
pub fn cleanup(root: &Path, request: &CleanupRequest, config: &Config) -> Result<CleanupResult> {
    ensure_root(root)?;

    let mut result = CleanupResult {
        dry_run: request.dry_run,
        ..CleanupResult::default()
    };
    if request.categories.is_empty() {
        return Ok(result);
    }

    // Cache directories are also commonly excluded from analysis; they must
    // stay reachable here.
    let pruned =
        |name: &str| config.analysis.is_excluded(name) && !config.cleanup.is_cache_dir(name);
    let mut entries = WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| !is_pruned(entry, &pruned));

    while let Some(item) = entries.next() {
        let entry = match item {
            Ok(entry) => entry,
            Err(err) => {
                if err.depth() == 0 {
                    return Err(root_walk_error(root, err));
                }
                result.errors.push(format!("Failed to read: {err}"));
                continue;
            }
        };
        if entry.depth() == 0 {
            continue;
        }

        let relative = relative_to(root, entry.path());
        let name = entry.file_name().to_string_lossy().to_string();

        if entry.file_type().is_dir() {
            if request.wants(CleanupCategory::Cache) && config.cleanup.is_cache_dir(&name) {
                let size = subtree_size(entry.path());
                entries.skip_current_dir();
                if request.dry_run {
                    result.record(relative, size);
                    continue;
                }
                match std::fs::remove_dir_all(entry.path()) {
                    Ok(()) => {
                        debug!(path = %relative.display(), bytes = size, "removed cache dir");
                        result.record(relative, size);
                    }
                    Err(err) => {
                        warn!(path = %relative.display(), error = %err, "cache dir removal failed");
                        result
                            .errors
                            .push(format!("Failed to delete {}: {err}", relative.display()));
                    }
                }
            }
            continue;
        }
        if !entry.file_type().is_file() {
            continue;
        }

        let lower = name.to_ascii_lowercase();
        let matched = (request.wants(CleanupCategory::Temp)
            && ends_with_any(&lower, &config.analysis.temp_extensions))
            || (request.wants(CleanupCategory::Logs)
                && ends_with_any(&lower, &config.cleanup.log_extensions))
            || (request.wants(CleanupCategory::Cache) && lower.contains("cache"));
        if !matched {
            continue;
        }

        let size = match entry.metadata() {
            Ok(meta) => meta.len(),
            Err(err) => {
                result
                    .errors
                    .push(format!("Failed to delete {}: {err}", relative.display()));
                continue;
            }
        };
        if request.dry_run {
            result.record(relative, size);
            continue;
        }
        match std::fs::remove_file(entry.path()) {
            Ok(()) => result.record(relative, size),
            Err(err) => {
                warn!(path = %relative.display(), error = %err, "delete failed");
                result
                    .errors
                    .push(format!("Failed to delete {}: {err}", relative.display()));
            }
        }
    }

    info!(
        root = %root.display(),
        deleted = result.deleted_files.len(),
        bytes = result.deleted_size,
        errors = result.errors.len(),
        dry_run = result.dry_run,
        "cleanup complete"
    );
    Ok(result)
}

/// Format a cleanup result for terminal output.
#[must_use]
pub fn format_cleanup_report(result: &CleanupResult) -> String {
    let mut out = String::new();
    let verb = if result.dry_run { "Would delete" } else { "Deleted" };
    for path in &result.deleted_files {
        let _ = writeln!(out, "  {verb} {}", path.display());
    }
    for err in &result.errors {
        let _ = writeln!(out, "  [FAIL] {err}");
    }
    let _ = writeln!(out);
    let _ = write!(
        out,
        "{verb} {} item(s), {:.2} MB",
        result.deleted_files.len(),
        result.deleted_size_mb()
    );
    if result.dry_run {
        let _ = writeln!(out, ". Dry-run complete. No changes were made.");
    } else if result.errors.is_empty() {
        let _ = writeln!(out, ". Cleanup completed.");
    } else {
        let _ = writeln!(
            out,
            ". Cleanup completed with {} error(s).",
            result.errors.len()
        );
    }
    out
}
