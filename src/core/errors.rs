//! WSW-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, WsError>;

/// Top-level error type for the workspace sweeper.
///
/// Only call-level failures surface here. Per-item failures inside a pass are
/// skipped or collected into the `errors` list of the pass result.
#[derive(Debug, Error)]
pub enum WsError {
    #[error("[WSW-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[WSW-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[WSW-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[WSW-2001] workspace root does not exist: {path}")]
    RootNotFound { path: PathBuf },

    #[error("[WSW-2002] workspace root is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("[WSW-2101] unknown cleanup category: {value} (expected temp, logs, or cache)")]
    UnknownCleanupCategory { value: String },

    #[error("[WSW-2102] unknown organize strategy: {value} (expected by-type)")]
    UnknownStrategy { value: String },

    #[error("[WSW-2201] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[WSW-3002] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[WSW-3900] runtime failure: {details}")]
    Runtime { details: String },
}

impl WsError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "WSW-1001",
            Self::MissingConfig { .. } => "WSW-1002",
            Self::ConfigParse { .. } => "WSW-1003",
            Self::RootNotFound { .. } => "WSW-2001",
            Self::NotADirectory { .. } => "WSW-2002",
            Self::UnknownCleanupCategory { .. } => "WSW-2101",
            Self::UnknownStrategy { .. } => "WSW-2102",
            Self::Serialization { .. } => "WSW-2201",
            Self::Io { .. } => "WSW-3002",
            Self::Runtime { .. } => "WSW-3900",
        }
    }

    /// Whether retrying might resolve the failure.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::Runtime { .. })
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<serde_json::Error> for WsError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for WsError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}

/// Check that `root` exists and is a directory.
///
/// Every pass calls this first so that "nothing exists" is never reported as
/// "nothing found".
pub fn ensure_root(root: &Path) -> Result<()> {
    match std::fs::metadata(root) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(WsError::NotADirectory {
            path: root.to_path_buf(),
        }),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(WsError::RootNotFound {
            path: root.to_path_buf(),
        }),
        Err(err) => Err(WsError::io(root, err)),
    }
}
