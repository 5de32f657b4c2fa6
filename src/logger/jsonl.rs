//! Append-only JSONL journal of destructive runs.
//!
//! One line per cleanup or organize call. Write failures degrade to a warning;
//! the journal never fails the operation it records.

#![allow(missing_docs)]

use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::errors::{Result, WsError};
use crate::workspace::cleanup::CleanupResult;
use crate::workspace::organize::OrganizeResult;

/// Operation recorded by a journal line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Cleanup,
    Organize,
}

/// One journal line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub timestamp: DateTime<Utc>,
    pub operation: Operation,
    pub root: PathBuf,
    /// Files deleted or moved.
    pub affected: usize,
    /// Bytes freed (cleanup only).
    pub bytes: u64,
    pub dry_run: bool,
    pub errors: Vec<String>,
}

impl JournalEntry {
    #[must_use]
    pub fn from_cleanup(root: &Path, result: &CleanupResult) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::Cleanup,
            root: root.to_path_buf(),
            affected: result.deleted_files.len(),
            bytes: result.deleted_size,
            dry_run: result.dry_run,
            errors: result.errors.clone(),
        }
    }

    #[must_use]
    pub fn from_organize(root: &Path, result: &OrganizeResult) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::Organize,
            root: root.to_path_buf(),
            affected: result.moved_files.len(),
            bytes: 0,
            dry_run: false,
            errors: result.errors.clone(),
        }
    }
}

/// JSONL writer bound to one file.
#[derive(Debug, Clone)]
pub struct Journal {
    path: PathBuf,
}

impl Journal {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Append one entry, creating the file and its parent directory on demand.
    pub fn append(&self, entry: &JournalEntry) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|err| WsError::io(parent, err))?;
            }
        }
        let mut line = serde_json::to_string(entry)?;
        line.push('\n');
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|err| WsError::io(&self.path, err))?;
        file.write_all(line.as_bytes())
            .map_err(|err| WsError::io(&self.path, err))
    }

    /// Append, logging instead of failing.
    pub fn record(&self, entry: &JournalEntry) {
        if let Err(err) = self.append(entry) {
            warn!(path = %self.path.display(), error = %err, "journal write failed");
        }
    }

    /// Read every well-formed entry; malformed lines are skipped.
    pub fn read_all(&self) -> Result<Vec<JournalEntry>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(WsError::io(&self.path, err)),
        };
        Ok(raw
            .lines()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect())
    }
}
