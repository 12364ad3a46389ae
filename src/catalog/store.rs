use std::ffi::OsStr;
use std::fs;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use log::{debug, info};

use super::model::MediaEntry;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("cannot read catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot write catalog {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// True when `path` fits on a single line of the catalog file.
pub fn is_storable_path(path: &Path) -> bool {
    !path
        .as_os_str()
        .as_bytes()
        .iter()
        .any(|b| *b == b'\n' || *b == b'\r')
}

/// Flat-file persistence for the catalog: one path per line, no header.
///
/// Paths are stored as raw bytes so names that are not valid UTF-8 survive a
/// save/load cycle.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    path: PathBuf,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every stored path in file order. A missing file is an empty catalog.
    pub fn load(&self) -> Result<Vec<MediaEntry>, StoreError> {
        let file = match fs::File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("no catalog at {}, starting empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(source) => return Err(self.read_error(source)),
        };

        let mut entries = Vec::new();
        for line in BufReader::new(file).split(b'\n') {
            let line = line.map_err(|e| self.read_error(e))?;
            let line = line.strip_suffix(b"\r").unwrap_or(&line);
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            entries.push(MediaEntry::new(PathBuf::from(OsStr::from_bytes(line))));
        }

        info!(
            "loaded {} catalog entries from {}",
            entries.len(),
            self.path.display()
        );
        Ok(entries)
    }

    /// Overwrite the file with `entries`, in order.
    pub fn save(&self, entries: &[MediaEntry]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.write_error(e))?;
        }

        let file = fs::File::create(&self.path).map_err(|e| self.write_error(e))?;
        let mut writer = BufWriter::new(file);
        for entry in entries {
            writer
                .write_all(entry.path.as_os_str().as_bytes())
                .and_then(|()| writer.write_all(b"\n"))
                .map_err(|e| self.write_error(e))?;
        }
        writer.flush().map_err(|e| self.write_error(e))?;

        info!(
            "saved {} catalog entries to {}",
            entries.len(),
            self.path.display()
        );
        Ok(())
    }

    fn read_error(&self, source: io::Error) -> StoreError {
        StoreError::Read {
            path: self.path.clone(),
            source,
        }
    }

    fn write_error(&self, source: io::Error) -> StoreError {
        StoreError::Write {
            path: self.path.clone(),
            source,
        }
    }
}
