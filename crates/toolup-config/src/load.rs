use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use toolup_core::ToolSpec;

pub const PROJECT_FILE_NAME: &str = "toolup.toml";

/// Layered configuration: global file, then project files walking down to
/// the working directory (nearer wins), then `TOOLUP_*` env overrides.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Requested toolchains in activation order. A later source replaces a
    /// tool's spec and moves it to the most-recent position.
    pub tools: Vec<ToolSpec>,
    pub settings: Settings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub experimental: bool,
    /// Per-tool default packages file, installed into fresh toolchains.
    pub default_packages: BTreeMap<String, PathBuf>,
    /// Per-tool catalog sync URL overrides (`[catalog]`).
    pub catalog_urls: BTreeMap<String, String>,
    /// Per-tool distribution URL templates (`[dist]`).
    pub dist_templates: BTreeMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    tools: BTreeMap<String, String>,
    settings: SettingsFile,
    catalog: BTreeMap<String, String>,
    dist: BTreeMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SettingsFile {
    experimental: Option<bool>,
    default_packages: BTreeMap<String, String>,
}

/// Pure function of its inputs: the caller supplies the environment map,
/// so nothing here consults process globals.
pub fn load_config(
    working_dir: &Path,
    global_path: Option<&Path>,
    env: &BTreeMap<String, String>,
) -> Result<Config> {
    let mut config = Config::default();

    if let Some(path) = global_path {
        if path.exists() {
            apply_file(&mut config, path)?;
        }
    }

    for path in project_files(working_dir) {
        apply_file(&mut config, &path)?;
    }

    apply_env(&mut config, env);
    Ok(config)
}

/// Env var holding a default-packages file override for one tool, e.g.
/// `TOOLUP_GOLANG_DEFAULT_PACKAGES_FILE`.
pub fn default_packages_env_key(tool: &str) -> String {
    format!(
        "TOOLUP_{}_DEFAULT_PACKAGES_FILE",
        tool.to_ascii_uppercase().replace('-', "_")
    )
}

/// Project files from the walk root down to `working_dir`, outermost
/// first so nearer files win.
fn project_files(working_dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = working_dir
        .ancestors()
        .map(|dir| dir.join(PROJECT_FILE_NAME))
        .filter(|path| path.is_file())
        .collect();
    files.reverse();
    files
}

fn apply_file(config: &mut Config, path: &Path) -> Result<()> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    let file: ConfigFile = toml::from_str(&raw)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;

    for (tool, spec) in &file.tools {
        let spec = ToolSpec::parse(&format!("{tool}@{spec}"))
            .with_context(|| format!("invalid tool entry in {}", path.display()))?;
        apply_tool(&mut config.tools, spec);
    }

    if let Some(experimental) = file.settings.experimental {
        config.settings.experimental = experimental;
    }
    for (tool, file_path) in file.settings.default_packages {
        config
            .settings
            .default_packages
            .insert(tool, PathBuf::from(file_path));
    }
    for (tool, url) in file.catalog {
        config.settings.catalog_urls.insert(tool, url);
    }
    for (tool, template) in file.dist {
        config.settings.dist_templates.insert(tool, template);
    }

    Ok(())
}

fn apply_env(config: &mut Config, env: &BTreeMap<String, String>) {
    if let Some(value) = env.get("TOOLUP_EXPERIMENTAL") {
        config.settings.experimental = matches!(value.trim(), "1" | "true");
    }

    for (key, value) in env {
        let Some(tool_key) = key
            .strip_prefix("TOOLUP_")
            .and_then(|rest| rest.strip_suffix("_DEFAULT_PACKAGES_FILE"))
        else {
            continue;
        };
        if tool_key.is_empty() {
            continue;
        }

        // the env key flattens '-' to '_'; cover both readings
        let lowered = tool_key.to_ascii_lowercase();
        let dashed = lowered.replace('_', "-");
        config
            .settings
            .default_packages
            .insert(lowered.clone(), PathBuf::from(value));
        if dashed != lowered {
            config
                .settings
                .default_packages
                .insert(dashed, PathBuf::from(value));
        }
    }
}

fn apply_tool(tools: &mut Vec<ToolSpec>, spec: ToolSpec) {
    tools.retain(|existing| existing.tool != spec.tool);
    tools.push(spec);
}
