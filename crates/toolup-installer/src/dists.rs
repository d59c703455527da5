use std::path::PathBuf;

use anyhow::{anyhow, Result};
use toolup_core::ArchiveKind;

/// Everything needed to fetch and unpack one toolchain version: where the
/// archive lives, how to verify and unpack it, and which binary proves the
/// install is complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainDist {
    pub tool: String,
    pub version: String,
    pub url: String,
    pub sha256: Option<String>,
    pub archive: ArchiveKind,
    pub strip_components: u32,
    /// Relative path probed to decide whether an install dir is complete.
    pub probe_path: PathBuf,
    pub default_packages_file: Option<PathBuf>,
}

/// Build the distribution for a tool the builtin tables know about.
/// Config `[dist]` URL templates take precedence via [`render_url_template`].
pub fn dist_for(tool: &str, version: &str) -> Result<ToolchainDist> {
    match tool {
        "golang" | "go" => Ok(golang_dist(tool, version)),
        "node" | "nodejs" => Ok(node_dist(tool, version)),
        _ => Err(anyhow!(
            "no known distribution for tool '{tool}'; add a [dist] url template to the config"
        )),
    }
}

/// Build a distribution from a config-supplied URL template. Placeholders:
/// `{version}`, `{os}`, `{arch}`.
pub fn dist_from_template(tool: &str, version: &str, template: &str) -> Result<ToolchainDist> {
    let url = render_url_template(template, version);
    let archive = ArchiveKind::infer_from_url(&url)
        .ok_or_else(|| anyhow!("cannot infer archive type from url: {url}"))?;
    Ok(ToolchainDist {
        tool: tool.to_string(),
        version: version.to_string(),
        url,
        sha256: None,
        archive,
        strip_components: 1,
        probe_path: probe_for(tool),
        default_packages_file: None,
    })
}

pub fn render_url_template(template: &str, version: &str) -> String {
    template
        .replace("{version}", version)
        .replace("{os}", os_token())
        .replace("{arch}", arch_token())
}

fn golang_dist(tool: &str, version: &str) -> ToolchainDist {
    let archive = if cfg!(windows) {
        ArchiveKind::Zip
    } else {
        ArchiveKind::TarGz
    };
    let url = format!(
        "https://go.dev/dl/go{version}.{os}-{arch}.{ext}",
        os = os_token(),
        arch = arch_token(),
        ext = archive.cache_extension(),
    );
    ToolchainDist {
        tool: tool.to_string(),
        version: version.to_string(),
        url,
        sha256: None,
        archive,
        // go archives unpack under a single "go/" root
        strip_components: 1,
        probe_path: probe_for(tool),
        default_packages_file: None,
    }
}

fn node_dist(tool: &str, version: &str) -> ToolchainDist {
    let archive = if cfg!(windows) {
        ArchiveKind::Zip
    } else {
        ArchiveKind::TarXz
    };
    let (os, arch) = (node_os_token(), node_arch_token());
    let url = format!(
        "https://nodejs.org/dist/v{version}/node-v{version}-{os}-{arch}.{ext}",
        ext = archive.cache_extension(),
    );
    ToolchainDist {
        tool: tool.to_string(),
        version: version.to_string(),
        url,
        sha256: None,
        archive,
        strip_components: 1,
        probe_path: probe_for(tool),
        default_packages_file: None,
    }
}

fn probe_for(tool: &str) -> PathBuf {
    let binary = match tool {
        "golang" | "go" => "go",
        "node" | "nodejs" => "node",
        other => other,
    };
    let mut path = PathBuf::from("bin");
    if cfg!(windows) {
        path.push(format!("{binary}.exe"));
    } else {
        path.push(binary);
    }
    path
}

fn os_token() -> &'static str {
    if cfg!(windows) {
        "windows"
    } else if cfg!(target_os = "macos") {
        "darwin"
    } else {
        "linux"
    }
}

fn arch_token() -> &'static str {
    if cfg!(target_arch = "aarch64") {
        "arm64"
    } else {
        "amd64"
    }
}

fn node_os_token() -> &'static str {
    if cfg!(windows) {
        "win"
    } else if cfg!(target_os = "macos") {
        "darwin"
    } else {
        "linux"
    }
}

fn node_arch_token() -> &'static str {
    if cfg!(target_arch = "aarch64") {
        "arm64"
    } else {
        "x64"
    }
}
