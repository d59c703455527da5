use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Directory layout under the toolup prefix. All state lives below one
/// root so a prefix can be inspected or removed wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainLayout {
    prefix: PathBuf,
}

impl ToolchainLayout {
    pub fn new(prefix: impl Into<PathBuf>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &Path {
        &self.prefix
    }

    pub fn toolchains_dir(&self) -> PathBuf {
        self.prefix.join("toolchains")
    }

    pub fn tool_dir(&self, tool: &str) -> PathBuf {
        self.toolchains_dir().join(tool)
    }

    pub fn install_dir(&self, tool: &str, version: &str) -> PathBuf {
        self.tool_dir(tool).join(version)
    }

    pub fn state_dir(&self) -> PathBuf {
        self.prefix.join("state")
    }

    pub fn tmp_state_dir(&self) -> PathBuf {
        self.state_dir().join("tmp")
    }

    pub fn installed_state_dir(&self) -> PathBuf {
        self.state_dir().join("installed")
    }

    pub fn tool_state_dir(&self, tool: &str) -> PathBuf {
        self.installed_state_dir().join(tool)
    }

    pub fn receipt_path(&self, tool: &str, version: &str) -> PathBuf {
        self.tool_state_dir(tool).join(format!("{version}.receipt"))
    }

    pub fn catalog_dir(&self) -> PathBuf {
        self.prefix.join("catalog")
    }

    pub fn config_path(&self) -> PathBuf {
        self.prefix.join("config.toml")
    }

    pub fn ensure_base_dirs(&self) -> Result<()> {
        for dir in [
            self.toolchains_dir(),
            self.state_dir(),
            self.tmp_state_dir(),
            self.installed_state_dir(),
            self.catalog_dir(),
        ] {
            fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        Ok(())
    }
}

pub fn default_user_prefix() -> Result<PathBuf> {
    if cfg!(windows) {
        let app_data = std::env::var("LOCALAPPDATA")
            .context("LOCALAPPDATA is not set; cannot resolve Windows user prefix")?;
        return Ok(PathBuf::from(app_data).join("Toolup"));
    }

    let home = std::env::var("HOME").context("HOME is not set; cannot resolve user prefix")?;
    Ok(PathBuf::from(home).join(".toolup"))
}
