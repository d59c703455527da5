use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use toolup_core::ToolVersion;

/// On-disk catalog: one `<tool>.toml` per tool under the catalog root,
/// holding the known version list. Written by `sync`, read by the resolver.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    root: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogFile {
    #[serde(default = "catalog_file_version")]
    version: u32,
    #[serde(default)]
    versions: Vec<String>,
}

impl CatalogStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn tool_file(&self, tool: &str) -> PathBuf {
        self.root.join(format!("{tool}.toml"))
    }

    pub fn has_tool(&self, tool: &str) -> bool {
        self.tool_file(tool).exists()
    }

    /// Known versions for a tool, highest first. A missing catalog file is an
    /// empty catalog, not an error.
    pub fn load_versions(&self, tool: &str) -> Result<Vec<ToolVersion>> {
        let path = self.tool_file(tool);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed reading catalog file: {}", path.display()))?;
        let file: CatalogFile = toml::from_str(&content)
            .with_context(|| format!("failed parsing catalog file: {}", path.display()))?;

        let mut versions = Vec::with_capacity(file.versions.len());
        for raw in &file.versions {
            let version = ToolVersion::parse(raw)
                .with_context(|| format!("invalid version in catalog file: {}", path.display()))?;
            versions.push(version);
        }
        versions.sort();
        versions.reverse();
        versions.dedup();
        Ok(versions)
    }

    pub fn save_versions(&self, tool: &str, versions: &[ToolVersion]) -> Result<PathBuf> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("failed creating catalog root: {}", self.root.display()))?;

        let mut sorted = versions.to_vec();
        sorted.sort();
        sorted.reverse();
        sorted.dedup();

        let file = CatalogFile {
            version: catalog_file_version(),
            versions: sorted.iter().map(|v| v.as_str().to_string()).collect(),
        };
        let path = self.tool_file(tool);
        let content = toml::to_string(&file)
            .with_context(|| format!("failed serializing catalog file: {}", path.display()))?;
        fs::write(&path, content)
            .with_context(|| format!("failed writing catalog file: {}", path.display()))?;
        Ok(path)
    }
}

fn catalog_file_version() -> u32 {
    1
}
