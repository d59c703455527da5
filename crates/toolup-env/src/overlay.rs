use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use toolup_core::{ActivateError, ResolvedVersion};
use toolup_installer::ToolchainLayout;

/// Ordered set of toolchains to activate. One entry per tool; re-inserting
/// a tool replaces its version and moves it to the most-recent position,
/// which wins PATH precedence.
#[derive(Debug, Clone, Default)]
pub struct ActivationSet {
    entries: Vec<(String, ResolvedVersion)>,
}

impl ActivationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tool: &str, resolved: ResolvedVersion) {
        self.entries.retain(|(existing, _)| existing != tool);
        self.entries.push((tool.to_string(), resolved));
    }

    pub fn entries(&self) -> &[(String, ResolvedVersion)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Environment changes an activation produces: PATH entries to prepend
/// (highest precedence first) and tool-specific variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverlay {
    pub path_prepend: Vec<PathBuf>,
    pub vars: BTreeMap<String, String>,
}

impl EnvOverlay {
    /// Compose the final PATH value: overlay entries first, inherited
    /// entries after.
    pub fn merged_path(&self, inherited: Option<&OsStr>) -> OsString {
        let mut entries = self.path_prepend.clone();
        if let Some(inherited) = inherited {
            entries.extend(std::env::split_paths(inherited));
        }
        match std::env::join_paths(&entries) {
            Ok(joined) => joined,
            Err(_) => inherited.map(OsStr::to_os_string).unwrap_or_default(),
        }
    }
}

/// Build the environment overlay for an activation set.
///
/// Reads nothing but the install dirs and never installs: a missing
/// toolchain fails with `NotInstalled`. `system` entries contribute
/// nothing since the inherited PATH already provides them.
pub fn activate(layout: &ToolchainLayout, set: &ActivationSet) -> Result<EnvOverlay, ActivateError> {
    let mut overlay = EnvOverlay::default();

    for (tool, resolved) in set.entries().iter().rev() {
        if resolved.version.is_system() {
            continue;
        }

        let install_dir = layout.install_dir(tool, resolved.version.as_str());
        if !install_dir.is_dir() {
            return Err(ActivateError::NotInstalled {
                tool: tool.clone(),
                version: resolved.version.as_str().to_string(),
            });
        }

        overlay.path_prepend.push(install_dir.join("bin"));
        for (key, value) in tool_env_vars(tool, &install_dir) {
            overlay.vars.insert(key, value);
        }
    }

    Ok(overlay)
}

fn tool_env_vars(tool: &str, install_dir: &Path) -> Vec<(String, String)> {
    let home = install_dir.display().to_string();
    match tool {
        "golang" | "go" => vec![("GOROOT".to_string(), home)],
        "java" => vec![("JAVA_HOME".to_string(), home)],
        _ => Vec::new(),
    }
}
