use std::path::PathBuf;

use crate::packages::PackageReport;

/// Record of one installed toolchain, persisted as a `key=value` receipt
/// file next to its siblings under `state/installed/<tool>/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReceipt {
    pub tool: String,
    pub version: String,
    pub install_path: String,
    pub installed_at_unix: u64,
    pub default_packages: Vec<String>,
}

#[derive(Debug)]
pub enum InstallOutcome {
    /// The toolchain directory already exists and passes the probe check.
    AlreadyInstalled(PathBuf),
    Installed {
        path: PathBuf,
        packages: Option<PackageReport>,
        /// Set when the toolchain installed but its receipt could not be
        /// written; receipt-driven listings miss it until a reinstall or
        /// uninstall clears the state.
        receipt_error: Option<String>,
    },
}

impl InstallOutcome {
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::AlreadyInstalled(path) => path,
            Self::Installed { path, .. } => path,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UninstallStatus {
    NotInstalled,
    Uninstalled,
    /// Only stale state (a receipt without an install dir, or the reverse)
    /// was found and cleared.
    RepairedStaleState,
}

impl UninstallStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotInstalled => "not-installed",
            Self::Uninstalled => "uninstalled",
            Self::RepairedStaleState => "repaired-stale-state",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UninstallResult {
    pub tool: String,
    pub version: String,
    pub status: UninstallStatus,
}
