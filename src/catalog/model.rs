use std::path::{Path, PathBuf};

use crate::config::CatalogSettings;

/// One tracked media file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaEntry {
    pub path: PathBuf,
    pub display_name: String,
}

impl MediaEntry {
    pub fn new(path: PathBuf) -> Self {
        let display_name = display_name_for(&path);
        Self { path, display_name }
    }
}

/// Base name of `path` including its extension, falling back to the full path.
pub fn display_name_for(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| path.display().to_string())
}

/// Extensions accepted into the catalog, normalized to lowercase without dots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowList {
    exts: Vec<String>,
}

impl AllowList {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut exts: Vec<String> = Vec::new();
        for e in extensions {
            let e = e.as_ref().trim().trim_start_matches('.').to_ascii_lowercase();
            if !e.is_empty() && !exts.contains(&e) {
                exts.push(e);
            }
        }
        Self { exts }
    }

    pub fn from_settings(settings: &CatalogSettings) -> Self {
        Self::new(&settings.extensions)
    }

    pub fn allows(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|s| s.to_str())
            .map(|ext| {
                let ext = ext.to_ascii_lowercase();
                self.exts.iter().any(|e| e == &ext)
            })
            .unwrap_or(false)
    }

    pub fn extensions(&self) -> &[String] {
        &self.exts
    }
}

impl Default for AllowList {
    fn default() -> Self {
        Self::from_settings(&CatalogSettings::default())
    }
}

/// Why `add_file` refused a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    DuplicatePath,
    UnsupportedType,
    /// The path holds a line break and cannot be written to the catalog file.
    UnstorableName,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added(PathBuf),
    Rejected { path: PathBuf, reason: RejectReason },
}

impl AddOutcome {
    pub fn is_added(&self) -> bool {
        matches!(self, Self::Added(_))
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Added(p) => p,
            Self::Rejected { path, .. } => path,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Removed,
    NotFound,
}

#[derive(Debug, thiserror::Error)]
pub enum RenameError {
    #[error("{0} is not in the catalog")]
    NotInCatalog(PathBuf),
    #[error("invalid file name {0:?}")]
    InvalidName(String),
    #[error("{0} already exists")]
    TargetExists(PathBuf),
    #[error("renaming {from} to {to} failed: {source}")]
    Io {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("search term must not be empty")]
pub struct InvalidQuery;

#[derive(Debug, thiserror::Error)]
#[error("cannot list folder {dir}: {source}")]
pub struct ScanError {
    pub dir: PathBuf,
    #[source]
    pub source: std::io::Error,
}
