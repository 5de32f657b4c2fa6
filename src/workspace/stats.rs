//! Workspace statistics: the single-pass fold from file observations into a
//! [`WorkspaceAnalysis`], plus the `analyze` pipeline that drives it.

#![allow(missing_docs)]

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::classify::Category;
use super::dedup::DedupIndex;
use super::walker::{FileRecord, WalkVisitor, walk_with};
use crate::core::config::{AnalysisConfig, MIB};
use crate::core::errors::Result;

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Entry of the large-file view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LargeFile {
    pub path: PathBuf,
    pub size: u64,
}

/// Entry of the recently-modified view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentFile {
    pub path: PathBuf,
    pub modified: DateTime<Utc>,
    pub size: u64,
}

/// A file carrying a temporary suffix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TempFile {
    pub path: PathBuf,
    pub size: u64,
}

/// Result of one analysis pass. Rebuilt from scratch on every call.
///
/// `large_files` and `recent_files` are bounded top-N views, not complete
/// listings. `duplicate_files` only covers files below the dedup ceiling.
/// All paths are relative to the analyzed root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceAnalysis {
    pub root: PathBuf,
    pub total_files: usize,
    pub total_size: u64,
    pub total_size_mb: f64,
    pub file_types: BTreeMap<Category, usize>,
    pub large_files: Vec<LargeFile>,
    pub recent_files: Vec<RecentFile>,
    pub temp_files: Vec<TempFile>,
    pub empty_folders: Vec<PathBuf>,
    pub duplicate_files: BTreeMap<String, Vec<PathBuf>>,
    pub analysis_time: f64,
    pub analyzed_at: DateTime<Utc>,
}

impl WorkspaceAnalysis {
    /// Type histogram ordered by count, highest first.
    #[must_use]
    pub fn file_types_by_count(&self) -> Vec<(Category, usize)> {
        let mut types: Vec<_> = self.file_types.iter().map(|(c, n)| (*c, *n)).collect();
        types.sort_by(|left, right| right.1.cmp(&left.1).then(left.0.cmp(&right.0)));
        types
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Keeps the `limit` greatest items seen.
#[derive(Debug)]
struct TopN<T: Ord> {
    limit: usize,
    heap: BinaryHeap<Reverse<T>>,
}

impl<T: Ord> TopN<T> {
    fn new(limit: usize) -> Self {
        Self {
            limit,
            heap: BinaryHeap::with_capacity(limit.min(1024) + 1),
        }
    }

    fn push(&mut self, item: T) {
        self.heap.push(Reverse(item));
        if self.heap.len() > self.limit {
            self.heap.pop();
        }
    }

    /// Items in descending order.
    fn into_sorted_desc(self) -> Vec<T> {
        // Ascending order of Reverse<T> is descending order of T.
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|Reverse(item)| item)
            .collect()
    }
}

/// Single-pass fold over [`FileRecord`]s. Also drives the dedup index so a
/// file is visited exactly once.
#[derive(Debug)]
pub struct Aggregator<'a> {
    config: &'a AnalysisConfig,
    root: PathBuf,
    started_at: DateTime<Utc>,
    recent_cutoff: DateTime<Utc>,
    total_files: usize,
    total_size: u64,
    file_types: BTreeMap<Category, usize>,
    large: TopN<(u64, PathBuf)>,
    recent: TopN<(DateTime<Utc>, PathBuf, u64)>,
    temp_files: Vec<TempFile>,
    empty_folders: Vec<PathBuf>,
    dedup: DedupIndex,
}

impl<'a> Aggregator<'a> {
    /// Fresh aggregator anchored at `started_at` for the recency window.
    #[must_use]
    pub fn new(root: &Path, config: &'a AnalysisConfig, started_at: DateTime<Utc>) -> Self {
        let recent_cutoff = started_at
            .checked_sub_signed(config.recent_window())
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self {
            config,
            root: root.to_path_buf(),
            started_at,
            recent_cutoff,
            total_files: 0,
            total_size: 0,
            file_types: BTreeMap::new(),
            large: TopN::new(config.top_n),
            recent: TopN::new(config.top_n),
            temp_files: Vec::new(),
            empty_folders: Vec::new(),
            dedup: DedupIndex::new(config.dedup_max_bytes),
        }
    }

    /// Produce the analysis; `analysis_time` is measured by the caller.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn finish(self, analysis_time: f64) -> WorkspaceAnalysis {
        WorkspaceAnalysis {
            root: self.root,
            total_files: self.total_files,
            total_size: self.total_size,
            total_size_mb: self.total_size as f64 / MIB as f64,
            file_types: self.file_types,
            large_files: self
                .large
                .into_sorted_desc()
                .into_iter()
                .map(|(size, path)| LargeFile { path, size })
                .collect(),
            recent_files: self
                .recent
                .into_sorted_desc()
                .into_iter()
                .map(|(modified, path, size)| RecentFile {
                    path,
                    modified,
                    size,
                })
                .collect(),
            temp_files: self.temp_files,
            empty_folders: self.empty_folders,
            duplicate_files: self.dedup.into_groups(),
            analysis_time,
            analyzed_at: self.started_at,
        }
    }
}

impl WalkVisitor for Aggregator<'_> {
    fn visit_file(&mut self, record: FileRecord) {
        self.total_files += 1;
        self.total_size += record.size;
        *self.file_types.entry(record.category).or_default() += 1;

        if record.size > self.config.large_file_bytes {
            self.large.push((record.size, record.relative.clone()));
        }
        if record.modified >= self.recent_cutoff {
            self.recent
                .push((record.modified, record.relative.clone(), record.size));
        }
        let is_temp = record
            .relative
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| self.config.is_temp_name(name));
        if is_temp {
            self.temp_files.push(TempFile {
                path: record.relative.clone(),
                size: record.size,
            });
        }
        self.dedup.observe(&record.path, record.relative, record.size);
    }

    fn visit_empty_dir(&mut self, relative: PathBuf) {
        self.empty_folders.push(relative);
    }
}

/// Walk, hash and aggregate `root` in one pass.
pub fn analyze(root: &Path, config: &AnalysisConfig) -> Result<WorkspaceAnalysis> {
    let clock = Instant::now();
    let mut aggregator = Aggregator::new(root, config, Utc::now());
    walk_with(root, config, &mut aggregator)?;
    let analysis = aggregator.finish(clock.elapsed().as_secs_f64());
    info!(
        root = %root.display(),
        files = analysis.total_files,
        bytes = analysis.total_size,
        duplicate_groups = analysis.duplicate_files.len(),
        elapsed_secs = analysis.analysis_time,
        "workspace analysis complete"
    );
    Ok(analysis)
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Format an analysis for terminal output.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_analysis_report(analysis: &WorkspaceAnalysis) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Workspace: {}", analysis.root.display());
    let _ = writeln!(
        out,
        "Files: {}  Size: {:.2} MB  Time: {:.2}s",
        analysis.total_files, analysis.total_size_mb, analysis.analysis_time
    );

    let _ = writeln!(out, "\nFile types:");
    for (category, count) in analysis.file_types_by_count() {
        let _ = writeln!(out, "  {category:<12} {count}");
    }

    if !analysis.large_files.is_empty() {
        let _ = writeln!(out, "\nLargest files:");
        for file in &analysis.large_files {
            let _ = writeln!(
                out,
                "  {:>10.2} MB  {}",
                file.size as f64 / MIB as f64,
                file.path.display()
            );
        }
    }

    if !analysis.recent_files.is_empty() {
        let _ = writeln!(out, "\nRecently modified:");
        for file in &analysis.recent_files {
            let _ = writeln!(
                out,
                "  {}  {}",
                file.modified.format("%Y-%m-%d %H:%M:%S"),
                file.path.display()
            );
        }
    }

    if !analysis.temp_files.is_empty() {
        let _ = writeln!(out, "\nTemporary files: {}", analysis.temp_files.len());
    }
    if !analysis.empty_folders.is_empty() {
        let _ = writeln!(out, "\nEmpty folders:");
        for folder in &analysis.empty_folders {
            let _ = writeln!(out, "  {}", folder.display());
        }
    }
    if !analysis.duplicate_files.is_empty() {
        let _ = writeln!(out, "\nDuplicate groups: {}", analysis.duplicate_files.len());
        for paths in analysis.duplicate_files.values() {
            let names: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
            let _ = writeln!(out, "  {}", names.join(", "));
        }
    }
    out
}
