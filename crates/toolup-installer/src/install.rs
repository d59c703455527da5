use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use toolup_core::{parse_default_packages, InstallError};

use crate::download::download_archive;
use crate::extract::{copy_with_strip, extract_archive};
use crate::packages::{install_default_packages, PackageFailure, PackageReport};
use crate::receipts::write_receipt;
use crate::{InstallOutcome, InstallReceipt, ToolchainDist, ToolchainLayout};

static TMP_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Install a toolchain if it is not already present.
///
/// The final directory only ever appears via `fs::rename` from a staging
/// dir under the layout's tmp dir, so a crash mid-unpack leaves tmp litter
/// but never a partial install. The probe path decides completeness: an
/// install dir without it is treated as absent and replaced.
pub fn ensure_installed(
    layout: &ToolchainLayout,
    dist: &ToolchainDist,
) -> Result<InstallOutcome, InstallError> {
    let final_dir = layout.install_dir(&dist.tool, &dist.version);
    if final_dir.join(&dist.probe_path).exists() {
        return Ok(InstallOutcome::AlreadyInstalled(final_dir));
    }
    if final_dir.exists() {
        fs::remove_dir_all(&final_dir).map_err(|err| {
            InstallError::io(
                format!(
                    "failed to remove incomplete install dir: {}",
                    final_dir.display()
                ),
                err,
            )
        })?;
    }

    let tmp = make_tmp_dir(layout, "install")?;
    let result = install_into(layout, dist, &tmp, &final_dir);
    let _ = fs::remove_dir_all(&tmp);
    result
}

fn install_into(
    layout: &ToolchainLayout,
    dist: &ToolchainDist,
    tmp: &Path,
    final_dir: &Path,
) -> Result<InstallOutcome, InstallError> {
    let raw_dir = tmp.join("raw");
    let staged_dir = tmp.join("staged");
    for dir in [&raw_dir, &staged_dir] {
        fs::create_dir_all(dir).map_err(|err| {
            InstallError::io(format!("failed to create {}", dir.display()), err)
        })?;
    }

    let archive_path = tmp.join(format!("archive.{}", dist.archive.cache_extension()));
    download_archive(dist, &archive_path)?;
    extract_archive(&archive_path, dist.archive, &raw_dir)?;
    copy_with_strip(&raw_dir, &staged_dir, dist.strip_components as usize)?;

    if !staged_dir.join(&dist.probe_path).exists() {
        return Err(InstallError::Unpack {
            archive: archive_path,
            reason: format!(
                "expected {} after extraction; wrong strip_components or archive layout",
                dist.probe_path.display()
            ),
        });
    }

    if let Some(parent) = final_dir.parent() {
        fs::create_dir_all(parent).map_err(|err| {
            InstallError::io(format!("failed to create {}", parent.display()), err)
        })?;
    }
    if let Err(err) = fs::rename(&staged_dir, final_dir) {
        // a concurrent installer winning the rename race is still success
        if final_dir.join(&dist.probe_path).exists() {
            return Ok(InstallOutcome::AlreadyInstalled(final_dir.to_path_buf()));
        }
        return Err(rename_error(final_dir, err));
    }

    let packages = run_default_packages(dist, final_dir);

    let receipt = InstallReceipt {
        tool: dist.tool.clone(),
        version: dist.version.clone(),
        install_path: final_dir.display().to_string(),
        installed_at_unix: current_unix_timestamp(),
        default_packages: packages
            .as_ref()
            .map(|report| report.attempted.clone())
            .unwrap_or_default(),
    };
    // the toolchain is complete once the rename lands; a receipt failure
    // only degrades the listings, so it must not fail the install
    let receipt_error = write_receipt(layout, &receipt)
        .err()
        .map(|err| format!("{err:#}"));

    Ok(InstallOutcome::Installed {
        path: final_dir.to_path_buf(),
        packages,
        receipt_error,
    })
}

fn run_default_packages(dist: &ToolchainDist, final_dir: &Path) -> Option<PackageReport> {
    let file = dist.default_packages_file.as_deref()?;
    if !file.exists() {
        return None;
    }

    let raw = match fs::read_to_string(file) {
        Ok(raw) => raw,
        // an unreadable packages file is a batch warning, not an install failure
        Err(err) => {
            return Some(PackageReport {
                attempted: Vec::new(),
                failures: vec![PackageFailure {
                    package: file.display().to_string(),
                    reason: format!("failed to read default packages file: {err}"),
                }],
            });
        }
    };

    let packages = parse_default_packages(&raw);
    if packages.is_empty() {
        return None;
    }
    Some(install_default_packages(&dist.tool, final_dir, &packages))
}

fn rename_error(final_dir: &Path, err: io::Error) -> InstallError {
    if err.kind() == io::ErrorKind::PermissionDenied {
        return InstallError::Permission {
            path: final_dir.to_path_buf(),
            source: err,
        };
    }
    InstallError::io(
        format!("failed to move staged install into {}", final_dir.display()),
        err,
    )
}

pub(crate) fn make_tmp_dir(layout: &ToolchainLayout, prefix: &str) -> Result<PathBuf, InstallError> {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_nanos())
        .unwrap_or(0);
    let sequence = TMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
    let mut dir = layout.tmp_state_dir();
    dir.push(format!(
        "{}-{}-{}-{}",
        prefix,
        std::process::id(),
        nanos,
        sequence
    ));
    fs::create_dir_all(&dir)
        .map_err(|err| InstallError::io(format!("failed creating tmp dir: {}", dir.display()), err))?;
    Ok(dir)
}

pub(crate) fn current_unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_secs())
        .unwrap_or(0)
}
