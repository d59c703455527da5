use std::fs;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use toolup_core::InstallError;

use crate::ToolchainLayout;

/// Remove tmp entries older than `max_age`. Crash-interrupted installs
/// leave their staging dirs behind; this clears them without touching
/// anything a live install could still be using.
pub fn prune_orphaned_tmp(
    layout: &ToolchainLayout,
    max_age: Duration,
) -> Result<Vec<PathBuf>, InstallError> {
    let dir = layout.tmp_state_dir();
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let now = SystemTime::now();
    let mut removed = Vec::new();
    let entries = fs::read_dir(&dir).map_err(|err| {
        InstallError::io(format!("failed to read tmp dir: {}", dir.display()), err)
    })?;
    for entry in entries {
        let entry = entry.map_err(|err| {
            InstallError::io(format!("failed to read tmp dir: {}", dir.display()), err)
        })?;
        let path = entry.path();

        let modified = entry
            .metadata()
            .and_then(|metadata| metadata.modified())
            .map_err(|err| {
                InstallError::io(format!("failed to stat {}", path.display()), err)
            })?;
        let age = now.duration_since(modified).unwrap_or_default();
        if age < max_age {
            continue;
        }

        let result = if path.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        result.map_err(|err| {
            InstallError::io(format!("failed to remove {}", path.display()), err)
        })?;
        removed.push(path);
    }

    removed.sort();
    Ok(removed)
}
