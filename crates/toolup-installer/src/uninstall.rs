use std::fs;
use std::io;

use toolup_core::InstallError;

use crate::permissions::repair_permissions;
use crate::{ToolchainLayout, UninstallResult, UninstallStatus};

pub fn uninstall_toolchain(
    layout: &ToolchainLayout,
    tool: &str,
    version: &str,
) -> Result<UninstallResult, InstallError> {
    let dir = layout.install_dir(tool, version);
    let receipt_path = layout.receipt_path(tool, version);
    let dir_existed = dir.exists();
    let receipt_existed = receipt_path.exists();

    if !dir_existed && !receipt_existed {
        return Ok(UninstallResult {
            tool: tool.to_string(),
            version: version.to_string(),
            status: UninstallStatus::NotInstalled,
        });
    }

    if dir_existed {
        if let Err(err) = fs::remove_dir_all(&dir) {
            if err.kind() != io::ErrorKind::PermissionDenied {
                return Err(InstallError::io(
                    format!("failed to remove install dir: {}", dir.display()),
                    err,
                ));
            }
            // write-protected payloads (GOROOT module caches and the like)
            repair_permissions(&dir)?;
            fs::remove_dir_all(&dir).map_err(|err| InstallError::Permission {
                path: dir.clone(),
                source: err,
            })?;
        }
    }

    if receipt_existed {
        fs::remove_file(&receipt_path).map_err(|err| {
            InstallError::io(
                format!("failed to remove install receipt: {}", receipt_path.display()),
                err,
            )
        })?;
    }

    Ok(UninstallResult {
        tool: tool.to_string(),
        version: version.to_string(),
        status: if dir_existed {
            UninstallStatus::Uninstalled
        } else {
            UninstallStatus::RepairedStaleState
        },
    })
}
