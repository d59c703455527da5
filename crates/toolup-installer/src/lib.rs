mod dists;
mod download;
mod extract;
mod install;
mod layout;
mod packages;
mod permissions;
mod prune;
mod receipts;
mod types;
mod uninstall;

pub use dists::{dist_for, dist_from_template, render_url_template, ToolchainDist};
pub use install::ensure_installed;
pub use layout::{default_user_prefix, ToolchainLayout};
pub use packages::{install_default_packages, PackageFailure, PackageReport};
pub use permissions::repair_permissions;
pub use prune::prune_orphaned_tmp;
pub use receipts::{installed_versions, read_all_receipts, read_tool_receipts, write_receipt};
pub use types::{InstallOutcome, InstallReceipt, UninstallResult, UninstallStatus};
pub use uninstall::uninstall_toolchain;
