use std::fs;
use std::path::{Component, Path, PathBuf};

use log::{debug, warn};

use super::model::{
    AddOutcome, AllowList, DeleteOutcome, InvalidQuery, MediaEntry, RejectReason, RenameError,
    ScanError,
};
use super::scan::scan_folder;
use super::store::is_storable_path;

/// The in-memory catalog and the only place it is mutated.
///
/// Entries keep insertion order and no two entries share a path.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<MediaEntry>,
    allow: AllowList,
}

impl Catalog {
    pub fn new(allow: AllowList) -> Self {
        Self {
            entries: Vec::new(),
            allow,
        }
    }

    /// Build a catalog from previously stored entries. Later duplicates of a
    /// path are dropped so a hand-edited file cannot break the uniqueness rule.
    pub fn with_entries(entries: Vec<MediaEntry>, allow: AllowList) -> Self {
        let mut catalog = Self::new(allow);
        for entry in entries {
            if catalog.position(&entry.path).is_some() {
                warn!("dropping duplicate stored entry {}", entry.path.display());
                continue;
            }
            catalog.entries.push(entry);
        }
        catalog
    }

    pub fn entries(&self) -> &[MediaEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn allow_list(&self) -> &AllowList {
        &self.allow
    }

    pub fn position(&self, path: &Path) -> Option<usize> {
        self.entries.iter().position(|e| e.path == path)
    }

    /// Track a single file. The allow-list is checked before the duplicate rule.
    pub fn add_file(&mut self, path: impl Into<PathBuf>) -> AddOutcome {
        let path = path.into();

        if !is_storable_path(&path) {
            debug!("rejecting {path:?}: line break in path");
            return AddOutcome::Rejected {
                path,
                reason: RejectReason::UnstorableName,
            };
        }

        if !self.allow.allows(&path) {
            debug!("rejecting {}: unsupported type", path.display());
            return AddOutcome::Rejected {
                path,
                reason: RejectReason::UnsupportedType,
            };
        }
        if self.position(&path).is_some() {
            debug!("rejecting {}: already in catalog", path.display());
            return AddOutcome::Rejected {
                path,
                reason: RejectReason::DuplicatePath,
            };
        }

        debug!("adding {}", path.display());
        self.entries.push(MediaEntry::new(path.clone()));
        AddOutcome::Added(path)
    }

    /// Add every allowed file directly inside `dir`, one `add_file` per file.
    ///
    /// Files outside the allow-list produce no outcome. An empty result means
    /// the folder held nothing to add.
    pub fn add_folder(&mut self, dir: &Path) -> Result<Vec<AddOutcome>, ScanError> {
        let files = scan_folder(dir, &self.allow)?;
        let outcomes: Vec<AddOutcome> = files.into_iter().map(|p| self.add_file(p)).collect();
        debug!(
            "folder {}: {} candidates, {} added",
            dir.display(),
            outcomes.len(),
            outcomes.iter().filter(|o| o.is_added()).count()
        );
        Ok(outcomes)
    }

    pub fn delete(&mut self, path: &Path) -> DeleteOutcome {
        match self.position(path) {
            Some(idx) => {
                self.entries.remove(idx);
                debug!("removed {}", path.display());
                DeleteOutcome::Removed
            }
            None => DeleteOutcome::NotFound,
        }
    }

    /// Rename the file on disk within its directory, then update the entry in
    /// place. The entry is only touched after the filesystem rename succeeded.
    pub fn rename(&mut self, path: &Path, new_name: &str) -> Result<PathBuf, RenameError> {
        let idx = self
            .position(path)
            .ok_or_else(|| RenameError::NotInCatalog(path.to_path_buf()))?;

        let new_name = new_name.trim();
        if !is_plain_file_name(new_name) {
            return Err(RenameError::InvalidName(new_name.to_string()));
        }

        let target = match path.parent() {
            Some(parent) => parent.join(new_name),
            None => PathBuf::from(new_name),
        };
        if target == path {
            return Ok(target);
        }
        if target.exists() || self.position(&target).is_some() {
            return Err(RenameError::TargetExists(target));
        }

        fs::rename(path, &target).map_err(|source| RenameError::Io {
            from: path.to_path_buf(),
            to: target.clone(),
            source,
        })?;

        debug!("renamed {} -> {}", path.display(), target.display());
        self.entries[idx] = MediaEntry::new(target.clone());
        Ok(target)
    }

    /// Case-insensitive substring match on display names, in catalog order.
    pub fn search(&self, term: &str) -> Result<Vec<PathBuf>, InvalidQuery> {
        let term = term.trim();
        if term.is_empty() {
            return Err(InvalidQuery);
        }
        let needle = term.to_lowercase();
        Ok(self
            .entries
            .iter()
            .filter(|e| e.display_name.to_lowercase().contains(&needle))
            .map(|e| e.path.clone())
            .collect())
    }
}

/// True when `name` is a single normal path component.
fn is_plain_file_name(name: &str) -> bool {
    if name.is_empty()
        || name.contains(['/', '\n', '\r'])
        || name.contains(std::path::MAIN_SEPARATOR)
    {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
