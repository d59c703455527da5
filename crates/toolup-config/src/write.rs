use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use toml::Value;
use toolup_core::ToolSpec;

use crate::PROJECT_FILE_NAME;

/// Record a tool pin in the project file under `dir`, creating the file
/// when absent. Unrelated keys survive the rewrite.
pub fn set_tool(dir: &Path, spec: &ToolSpec) -> Result<PathBuf> {
    let path = dir.join(PROJECT_FILE_NAME);
    let mut document: toml::Table = if path.exists() {
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read project file: {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("failed to parse project file: {}", path.display()))?
    } else {
        toml::Table::new()
    };

    let tools = document
        .entry("tools".to_string())
        .or_insert_with(|| Value::Table(toml::Table::new()));
    let Value::Table(tools) = tools else {
        return Err(anyhow!(
            "[tools] is not a table in {}; refusing to rewrite it",
            path.display()
        ));
    };
    tools.insert(spec.tool.clone(), Value::String(spec.spec.to_string()));

    let rendered = toml::to_string(&document)
        .with_context(|| format!("failed to serialize project file: {}", path.display()))?;
    fs::write(&path, rendered)
        .with_context(|| format!("failed to write project file: {}", path.display()))?;
    Ok(path)
}
