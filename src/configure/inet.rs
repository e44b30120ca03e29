// configure/inet.rs

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::configure::relative_path;
use crate::error::{Error, Result};
use crate::global_variables::INET_VERSION_FILE;

/// Read the version marker shipped at the root of an INET checkout.
pub fn read_version(inet_root: &Path) -> Result<String> {
    let path = inet_root.join(INET_VERSION_FILE);
    let content = fs::read_to_string(&path)
        .map_err(|source| Error::VersionUnreadable { path, source })?;
    Ok(content.trim_end().to_string())
}

/// Compare the marker with the supported version.
/// A mismatch only warns unless `strict` is set.
pub fn check_version(found: &str, expected: &str, strict: bool) -> Result<()> {
    if found == expected {
        log::info!("Found INET version {}", found);
        return Ok(());
    }
    if strict {
        return Err(Error::VersionMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        });
    }
    log::warn!(
        "Unsupported INET version. Expecting {}, found \"{}\"",
        expected,
        found
    );
    Ok(())
}

/// Every directory below `<inet>/src`, relative to `base` (the directory the
/// makefile is generated in). Sorted so identical trees give identical output.
pub fn collect_header_dirs(inet_root: &Path, base: &Path) -> Result<Vec<String>> {
    let src = inet_root.join("src");
    let mut dirs = BTreeSet::new();

    for entry in WalkDir::new(&src).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| src.clone());
            Error::io(path, e.into())
        })?;
        if entry.file_type().is_dir() {
            let rel = relative_path(entry.path(), base);
            dirs.insert(rel.to_string_lossy().into_owned());
        }
    }

    log::debug!("Collected {} INET header directories", dirs.len());
    Ok(dirs.into_iter().collect())
}
