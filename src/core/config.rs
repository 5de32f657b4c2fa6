//! TOML configuration with per-section defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::errors::{Result, WsError};

/// One mebibyte.
pub const MIB: u64 = 1024 * 1024;

/// Largest accepted `analysis.recent_days` (about a century).
pub const MAX_RECENT_DAYS: u32 = 36_500;

/// Largest accepted `analysis.top_n`.
pub const MAX_TOP_N: usize = 10_000;

/// Full configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Analysis pass tuning.
    pub analysis: AnalysisConfig,
    /// Cleanup pass tuning.
    pub cleanup: CleanupConfig,
    /// File-tree builder tuning.
    pub tree: TreeConfig,
    /// Background poller tuning.
    pub monitor: MonitorConfig,
    /// Auxiliary file locations.
    pub paths: PathsConfig,
}

/// Analysis thresholds and exclusions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Directory names pruned from every traversal.
    pub excluded_dirs: Vec<String>,
    /// Files strictly larger than this are "large".
    pub large_file_bytes: u64,
    /// Files modified within this many days are "recent".
    pub recent_days: u32,
    /// Files at or above this size are never hashed.
    pub dedup_max_bytes: u64,
    /// Length of the bounded large/recent views.
    pub top_n: usize,
    /// Name suffixes that mark a file as temporary.
    pub temp_extensions: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            excluded_dirs: [
                ".git",
                ".svn",
                ".hg",
                "node_modules",
                "__pycache__",
                ".vscode",
                ".idea",
                "venv",
                ".venv",
                "env",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            large_file_bytes: MIB,
            recent_days: 7,
            dedup_max_bytes: 10 * MIB,
            top_n: 10,
            temp_extensions: vec![".tmp".into(), ".temp".into(), ".bak".into()],
        }
    }
}

impl AnalysisConfig {
    /// Whether `name` is a pruned directory name.
    #[must_use]
    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded_dirs.iter().any(|excluded| excluded == name)
    }

    /// Whether a file name carries one of the temporary suffixes.
    #[must_use]
    pub fn is_temp_name(&self, name: &str) -> bool {
        let lower = name.to_ascii_lowercase();
        self.temp_extensions
            .iter()
            .any(|ext| lower.ends_with(&ext.to_ascii_lowercase()))
    }

    /// Recency window as a signed span for timestamp arithmetic.
    #[must_use]
    pub fn recent_window(&self) -> chrono::TimeDelta {
        chrono::TimeDelta::days(i64::from(self.recent_days))
    }
}

/// Cleanup pass settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupConfig {
    /// Directory names removed wholesale when the `cache` category is requested.
    pub cache_dirs: Vec<String>,
    /// Name suffixes matched by the `logs` category.
    pub log_extensions: Vec<String>,
    /// Report matches without deleting anything.
    pub dry_run: bool,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            cache_dirs: ["__pycache__", ".pytest_cache", "cache", "temp"]
                .into_iter()
                .map(String::from)
                .collect(),
            log_extensions: vec![".log".into()],
            dry_run: false,
        }
    }
}

impl CleanupConfig {
    /// Whether `name` is a cache directory name.
    #[must_use]
    pub fn is_cache_dir(&self, name: &str) -> bool {
        self.cache_dirs.iter().any(|cache| cache == name)
    }
}

/// File-tree builder settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Depth used when the caller does not pass one.
    pub default_depth: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self { default_depth: 3 }
    }
}

/// Background poller settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Seconds between two analysis runs.
    pub poll_interval_secs: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 300,
        }
    }
}

impl MonitorConfig {
    /// Poll interval as a duration.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

/// Auxiliary file locations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// JSONL activity journal for cleanup/organize runs.
    pub journal: Option<PathBuf>,
}

impl Config {
    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                WsError::MissingConfig {
                    path: path.to_path_buf(),
                }
            } else {
                WsError::io(path, err)
            }
        })?;
        let config: Self = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` when given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    /// Reject values that would make a pass meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.analysis.top_n == 0 || self.analysis.top_n > MAX_TOP_N {
            return Err(WsError::InvalidConfig {
                details: format!("analysis.top_n must be within 1..={MAX_TOP_N}"),
            });
        }
        if self.analysis.recent_days > MAX_RECENT_DAYS {
            return Err(WsError::InvalidConfig {
                details: format!("analysis.recent_days must be at most {MAX_RECENT_DAYS}"),
            });
        }
        if self.analysis.dedup_max_bytes == 0 {
            return Err(WsError::InvalidConfig {
                details: "analysis.dedup_max_bytes must be positive".to_string(),
            });
        }
        if self.monitor.poll_interval_secs == 0 {
            return Err(WsError::InvalidConfig {
                details: "monitor.poll_interval_secs must be positive".to_string(),
            });
        }
        Ok(())
    }
}
