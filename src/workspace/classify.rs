//! Extension-based file classification and the category → folder mapping.

#![allow(missing_docs)]

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Semantic file category derived from the extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Python,
    JavaScript,
    TypeScript,
    Rust,
    Web,
    Shell,
    Config,
    Document,
    Spreadsheet,
    Image,
    Video,
    Audio,
    Archive,
    Data,
    Other,
}

/// Destination folder used by the by-type organize strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Destination {
    Code,
    Config,
    Documents,
    Images,
    Videos,
    Audio,
    Archives,
    Data,
    Other,
}

impl Destination {
    /// Every destination, in a stable order.
    pub const ALL: [Self; 9] = [
        Self::Code,
        Self::Config,
        Self::Documents,
        Self::Images,
        Self::Videos,
        Self::Audio,
        Self::Archives,
        Self::Data,
        Self::Other,
    ];

    /// Folder name created directly under the workspace root.
    #[must_use]
    pub const fn folder_name(self) -> &'static str {
        match self {
            Self::Code => "Code",
            Self::Config => "Config",
            Self::Documents => "Documents",
            Self::Images => "Images",
            Self::Videos => "Videos",
            Self::Audio => "Audio",
            Self::Archives => "Archives",
            Self::Data => "Data",
            Self::Other => "Other",
        }
    }

    /// Reverse lookup by folder name.
    #[must_use]
    pub fn from_folder_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|destination| destination.folder_name() == name)
    }
}

impl Category {
    /// Human-readable label, also the serialized form.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Python => "Python",
            Self::JavaScript => "JavaScript",
            Self::TypeScript => "TypeScript",
            Self::Rust => "Rust",
            Self::Web => "Web",
            Self::Shell => "Shell",
            Self::Config => "Config",
            Self::Document => "Document",
            Self::Spreadsheet => "Spreadsheet",
            Self::Image => "Image",
            Self::Video => "Video",
            Self::Audio => "Audio",
            Self::Archive => "Archive",
            Self::Data => "Data",
            Self::Other => "Other",
        }
    }

    /// Folder this category is organized into.
    #[must_use]
    pub const fn destination(self) -> Destination {
        match self {
            Self::Python | Self::JavaScript | Self::TypeScript | Self::Rust | Self::Web | Self::Shell => {
                Destination::Code
            }
            Self::Config => Destination::Config,
            Self::Document | Self::Spreadsheet => Destination::Documents,
            Self::Image => Destination::Images,
            Self::Video => Destination::Videos,
            Self::Audio => Destination::Audio,
            Self::Archive => Destination::Archives,
            Self::Data => Destination::Data,
            Self::Other => Destination::Other,
        }
    }

    fn from_extension(ext: &str) -> Self {
        match ext {
            "py" | "pyw" | "pyi" | "ipynb" => Self::Python,
            "js" | "mjs" | "cjs" | "jsx" => Self::JavaScript,
            "ts" | "tsx" => Self::TypeScript,
            "rs" => Self::Rust,
            "html" | "htm" | "css" | "scss" | "sass" | "less" => Self::Web,
            "sh" | "bash" | "zsh" | "fish" | "ps1" | "bat" | "cmd" => Self::Shell,
            "json" | "yaml" | "yml" | "toml" | "ini" | "cfg" | "conf" | "env" => Self::Config,
            "pdf" | "doc" | "docx" | "txt" | "md" | "rst" | "rtf" | "odt" => Self::Document,
            "xls" | "xlsx" | "ods" => Self::Spreadsheet,
            "jpg" | "jpeg" | "png" | "gif" | "bmp" | "svg" | "webp" | "ico" | "tif" | "tiff" => {
                Self::Image
            }
            "mp4" | "avi" | "mkv" | "mov" | "webm" | "wmv" => Self::Video,
            "mp3" | "wav" | "flac" | "ogg" | "m4a" | "aac" => Self::Audio,
            "zip" | "tar" | "gz" | "tgz" | "bz2" | "xz" | "rar" | "7z" | "zst" => Self::Archive,
            "csv" | "tsv" | "sql" | "db" | "sqlite" | "parquet" | "xml" => Self::Data,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a path by its (case-insensitive) extension. Total: unknown or
/// missing extensions map to [`Category::Other`].
#[must_use]
pub fn classify(path: &Path) -> Category {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(Category::Other, |ext| {
            Category::from_extension(&ext.to_ascii_lowercase())
        })
}
