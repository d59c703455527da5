use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};
use toolup_core::InstallError;

use crate::ToolchainDist;

/// Fetch the dist archive to `dest`, verifying its sha256 when the dist
/// carries one. Any HTTP or digest failure is a download error.
pub fn download_archive(dist: &ToolchainDist, dest: &Path) -> Result<(), InstallError> {
    let response = reqwest::blocking::get(&dist.url).map_err(|err| InstallError::Download {
        url: dist.url.clone(),
        reason: err.to_string(),
    })?;
    if !response.status().is_success() {
        return Err(InstallError::Download {
            url: dist.url.clone(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let body = response.bytes().map_err(|err| InstallError::Download {
        url: dist.url.clone(),
        reason: format!("failed reading response body: {err}"),
    })?;

    if let Some(expected) = &dist.sha256 {
        verify_sha256(&body, expected).map_err(|reason| InstallError::Download {
            url: dist.url.clone(),
            reason,
        })?;
    }

    fs::write(dest, &body).map_err(|err| {
        InstallError::io(
            format!("failed to write downloaded archive: {}", dest.display()),
            err,
        )
    })
}

pub(crate) fn verify_sha256(body: &[u8], expected: &str) -> Result<(), String> {
    let mut hasher = Sha256::new();
    hasher.update(body);
    let actual = hex::encode(hasher.finalize());
    if actual.eq_ignore_ascii_case(expected.trim()) {
        return Ok(());
    }
    Err(format!(
        "sha256 mismatch: expected {expected}, got {actual}"
    ))
}
