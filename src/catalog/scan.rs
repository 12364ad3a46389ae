use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::model::{AllowList, ScanError};

/// List the direct children of `dir` that are regular files with an allowed
/// extension, sorted by file name. Subdirectories are not descended into.
pub(super) fn scan_folder(dir: &Path, allow: &AllowList) -> Result<Vec<PathBuf>, ScanError> {
    let to_scan_error = |source: std::io::Error| ScanError {
        dir: dir.to_path_buf(),
        source,
    };

    // WalkDir reports an unreadable root as the first item's error; surface it
    // instead of treating the folder as empty.
    std::fs::read_dir(dir).map_err(to_scan_error)?;

    let files: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file() || (e.path_is_symlink() && e.path().is_file()))
        .map(|e| e.into_path())
        .filter(|p| allow.allows(p))
        .collect();

    Ok(files)
}
