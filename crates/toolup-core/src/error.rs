use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Resolution failures: the specifier names nothing the catalog (or the
/// installed set) can satisfy.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("tool '{tool}' has no version '{version}' in the catalog")]
    NotFound { tool: String, version: String },

    #[error("no version of '{tool}' matches '{spec}'")]
    NoMatch { tool: String, spec: String },

    #[error("failed to load versions for '{tool}'")]
    Catalog {
        tool: String,
        #[source]
        source: anyhow::Error,
    },
}

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("download failed for {url}: {reason}")]
    Download { url: String, reason: String },

    #[error("failed to unpack {}: {reason}", archive.display())]
    Unpack { archive: PathBuf, reason: String },

    #[error("permission error at {}", path.display())]
    Permission {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl InstallError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

/// Activation never installs; a missing toolchain is the caller's problem.
#[derive(Debug, Error)]
pub enum ActivateError {
    #[error("{tool} {version} is not installed; run `toolup use {tool}@{version}` first")]
    NotInstalled { tool: String, version: String },
}

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("failed to spawn '{program}'")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed waiting on '{program}'")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },
}
