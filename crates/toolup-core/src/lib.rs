mod archive;
mod error;
mod packages;
mod spec;
mod version;

pub use archive::ArchiveKind;
pub use error::{ActivateError, ExecError, InstallError, ResolveError};
pub use packages::parse_default_packages;
pub use spec::{ToolSpec, VersionSpec};
pub use version::{ResolvedVersion, ToolVersion, VersionSource};

#[cfg(test)]
mod tests;
