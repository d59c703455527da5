use std::fs;
use std::path::Path;

use toolup_core::InstallError;

/// Restore owner-write (and traversal, for directories) below `root`.
/// Idempotent; returns how many entries actually changed. Run on demand,
/// not as part of the install path.
pub fn repair_permissions(root: &Path) -> Result<usize, InstallError> {
    let mut repaired = 0;
    repair_entry(root, &mut repaired)?;
    Ok(repaired)
}

fn repair_entry(path: &Path, repaired: &mut usize) -> Result<(), InstallError> {
    let metadata = fs::symlink_metadata(path).map_err(|err| InstallError::Permission {
        path: path.to_path_buf(),
        source: err,
    })?;
    if metadata.file_type().is_symlink() {
        return Ok(());
    }

    let is_dir = metadata.is_dir();
    if restore_owner_access(path, &metadata, is_dir)? {
        *repaired += 1;
    }

    if is_dir {
        let entries = fs::read_dir(path).map_err(|err| InstallError::Permission {
            path: path.to_path_buf(),
            source: err,
        })?;
        for entry in entries {
            let entry = entry.map_err(|err| InstallError::Permission {
                path: path.to_path_buf(),
                source: err,
            })?;
            repair_entry(&entry.path(), repaired)?;
        }
    }

    Ok(())
}

#[cfg(unix)]
fn restore_owner_access(
    path: &Path,
    metadata: &fs::Metadata,
    is_dir: bool,
) -> Result<bool, InstallError> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = metadata.permissions();
    let mode = permissions.mode();
    let wanted = if is_dir { mode | 0o300 } else { mode | 0o200 };
    if wanted == mode {
        return Ok(false);
    }

    permissions.set_mode(wanted);
    fs::set_permissions(path, permissions).map_err(|err| InstallError::Permission {
        path: path.to_path_buf(),
        source: err,
    })?;
    Ok(true)
}

#[cfg(not(unix))]
fn restore_owner_access(
    path: &Path,
    metadata: &fs::Metadata,
    _is_dir: bool,
) -> Result<bool, InstallError> {
    let mut permissions = metadata.permissions();
    if !permissions.readonly() {
        return Ok(false);
    }

    permissions.set_readonly(false);
    fs::set_permissions(path, permissions).map_err(|err| InstallError::Permission {
        path: path.to_path_buf(),
        source: err,
    })?;
    Ok(true)
}
