use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use toolup_core::ToolVersion;

use crate::store::CatalogStore;

/// Builtin catalog endpoints for tools with well-known version indexes.
/// Config `[catalog]` entries override these.
pub fn default_catalog_url(tool: &str) -> Option<&'static str> {
    match tool {
        "golang" | "go" => Some("https://go.dev/dl/?mode=json&include=all"),
        "node" | "nodejs" => Some("https://nodejs.org/dist/index.json"),
        _ => None,
    }
}

/// Fetch the remote version index for a tool and rewrite its catalog file.
/// Returns the number of versions recorded.
pub fn sync_tool(store: &CatalogStore, tool: &str, url: &str) -> Result<usize> {
    let response = reqwest::blocking::get(url)
        .with_context(|| format!("failed to fetch version index from {url}"))?;
    if !response.status().is_success() {
        return Err(anyhow!(
            "version index at {url} returned HTTP {}",
            response.status()
        ));
    }
    let body = response
        .text()
        .with_context(|| format!("failed to read version index from {url}"))?;

    let versions = parse_remote_versions(&body)
        .with_context(|| format!("failed to parse version index from {url}"))?;
    if versions.is_empty() {
        return Err(anyhow!("version index at {url} contained no versions"));
    }

    store.save_versions(tool, &versions)?;
    Ok(versions.len())
}

/// Parse a remote version index. Accepts a JSON array of version strings or
/// an array of objects with a `version` field (the go.dev / nodejs.org
/// shape); `go`/`v` prefixes are stripped.
pub fn parse_remote_versions(body: &str) -> Result<Vec<ToolVersion>> {
    let value: Value = serde_json::from_str(body).context("version index is not valid JSON")?;
    let Value::Array(entries) = value else {
        return Err(anyhow!("version index must be a JSON array"));
    };

    let mut versions = Vec::with_capacity(entries.len());
    for entry in entries {
        let raw = match &entry {
            Value::String(raw) => raw.as_str(),
            Value::Object(fields) => {
                if let Some(Value::Bool(false)) = fields.get("stable") {
                    continue;
                }
                match fields.get("version") {
                    Some(Value::String(raw)) => raw.as_str(),
                    _ => return Err(anyhow!("version index entry is missing 'version'")),
                }
            }
            _ => return Err(anyhow!("unsupported version index entry: {entry}")),
        };

        let normalized = normalize_remote_version(raw);
        if normalized.is_empty() {
            continue;
        }
        versions.push(ToolVersion::parse(normalized)?);
    }

    Ok(versions)
}

fn normalize_remote_version(raw: &str) -> &str {
    let trimmed = raw.trim();
    if let Some(rest) = trimmed.strip_prefix("go") {
        if rest.starts_with(|ch: char| ch.is_ascii_digit()) {
            return rest;
        }
    }
    if let Some(rest) = trimmed.strip_prefix('v') {
        if rest.starts_with(|ch: char| ch.is_ascii_digit()) {
            return rest;
        }
    }
    trimmed
}
