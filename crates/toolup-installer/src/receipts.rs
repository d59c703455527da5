use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use toolup_core::ToolVersion;

use crate::{InstallReceipt, ToolchainLayout};

pub fn write_receipt(layout: &ToolchainLayout, receipt: &InstallReceipt) -> Result<PathBuf> {
    let mut payload = String::new();
    payload.push_str(&format!("tool={}\n", receipt.tool));
    payload.push_str(&format!("version={}\n", receipt.version));
    payload.push_str(&format!("install_path={}\n", receipt.install_path));
    payload.push_str(&format!(
        "installed_at_unix={}\n",
        receipt.installed_at_unix
    ));
    for package in &receipt.default_packages {
        payload.push_str(&format!("default_package={}\n", package));
    }

    let path = layout.receipt_path(&receipt.tool, &receipt.version);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(&path, payload.as_bytes())
        .with_context(|| format!("failed to write install receipt: {}", path.display()))?;
    Ok(path)
}

/// All receipts for one tool, highest version first.
pub fn read_tool_receipts(layout: &ToolchainLayout, tool: &str) -> Result<Vec<InstallReceipt>> {
    let dir = layout.tool_state_dir(tool);
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut receipts = Vec::new();
    for entry in fs::read_dir(&dir)
        .with_context(|| format!("failed to read install state directory: {}", dir.display()))?
    {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }

        let path = entry.path();
        if path.extension().and_then(|v| v.to_str()) != Some("receipt") {
            continue;
        }

        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read install receipt: {}", path.display()))?;
        let receipt = parse_receipt(&raw)
            .with_context(|| format!("failed to parse install receipt: {}", path.display()))?;
        receipts.push(receipt);
    }

    receipts.sort_by(|a, b| {
        let left = ToolVersion::parse(&a.version).ok();
        let right = ToolVersion::parse(&b.version).ok();
        right.cmp(&left)
    });
    Ok(receipts)
}

/// Receipts for every tool under the prefix, grouped by tool name order.
pub fn read_all_receipts(layout: &ToolchainLayout) -> Result<Vec<InstallReceipt>> {
    let dir = layout.installed_state_dir();
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut tools = Vec::new();
    for entry in fs::read_dir(&dir)
        .with_context(|| format!("failed to read install state directory: {}", dir.display()))?
    {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        if let Some(tool) = entry.file_name().to_str() {
            tools.push(tool.to_string());
        }
    }
    tools.sort();

    let mut receipts = Vec::new();
    for tool in tools {
        receipts.extend(read_tool_receipts(layout, &tool)?);
    }
    Ok(receipts)
}

/// Installed versions of a tool per its receipts, highest first.
pub fn installed_versions(layout: &ToolchainLayout, tool: &str) -> Result<Vec<ToolVersion>> {
    let mut versions = Vec::new();
    for receipt in read_tool_receipts(layout, tool)? {
        versions.push(ToolVersion::parse(&receipt.version)?);
    }
    Ok(versions)
}

pub(crate) fn parse_receipt(raw: &str) -> Result<InstallReceipt> {
    let mut tool = None;
    let mut version = None;
    let mut install_path = None;
    let mut installed_at_unix = None;
    let mut default_packages = Vec::new();

    for line in raw.lines().map(str::trim).filter(|line| !line.is_empty()) {
        let Some((k, v)) = line.split_once('=') else {
            continue;
        };
        match k {
            "tool" => tool = Some(v.to_string()),
            "version" => version = Some(v.to_string()),
            "install_path" => install_path = Some(v.to_string()),
            "installed_at_unix" => {
                installed_at_unix = Some(v.parse().context("installed_at_unix must be u64")?)
            }
            "default_package" => default_packages.push(v.to_string()),
            _ => {}
        }
    }

    Ok(InstallReceipt {
        tool: tool.context("missing tool")?,
        version: version.context("missing version")?,
        install_path: install_path.context("missing install_path")?,
        installed_at_unix: installed_at_unix.context("missing installed_at_unix")?,
        default_packages,
    })
}
