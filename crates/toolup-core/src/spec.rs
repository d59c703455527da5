use std::fmt;

use anyhow::{anyhow, Context, Result};
use semver::VersionReq;

use crate::version::SYSTEM_VERSION;

/// User-provided description of a desired version.
#[derive(Debug, Clone, PartialEq)]
pub enum VersionSpec {
    Exact(String),
    Prefix(String),
    Range(VersionReq),
    Latest,
    System,
}

impl VersionSpec {
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed == "latest" {
            return Ok(Self::Latest);
        }
        if trimmed == SYSTEM_VERSION {
            return Ok(Self::System);
        }
        if let Some(prefix) = trimmed.strip_prefix("prefix:") {
            if prefix.is_empty() {
                return Err(anyhow!("prefix specifier must not be empty"));
            }
            return Ok(Self::Prefix(prefix.to_string()));
        }
        if looks_like_range(trimmed) {
            let requirement = VersionReq::parse(trimmed)
                .with_context(|| format!("invalid version range: {trimmed}"))?;
            return Ok(Self::Range(requirement));
        }

        Ok(Self::Exact(trimmed.to_string()))
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(version) => f.write_str(version),
            Self::Prefix(prefix) => write!(f, "prefix:{prefix}"),
            Self::Range(requirement) => requirement.fmt(f),
            Self::Latest => f.write_str("latest"),
            Self::System => f.write_str(SYSTEM_VERSION),
        }
    }
}

/// A (tool, specifier) pair as written in config files or on the command
/// line: `golang@prefix:1.20`, `node@^20`, or bare `golang`.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSpec {
    pub tool: String,
    pub spec: VersionSpec,
}

impl ToolSpec {
    pub fn new(tool: impl Into<String>, spec: VersionSpec) -> Self {
        Self {
            tool: tool.into(),
            spec,
        }
    }

    pub fn parse(input: &str) -> Result<Self> {
        let (tool, spec) = match input.split_once('@') {
            Some((tool, spec)) => (tool, spec),
            None => (input, ""),
        };
        validate_tool_name(tool)?;
        let spec = VersionSpec::parse(spec)
            .with_context(|| format!("invalid version specifier for '{tool}'"))?;
        Ok(Self {
            tool: tool.to_string(),
            spec,
        })
    }
}

impl fmt::Display for ToolSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.tool, self.spec)
    }
}

pub(crate) fn validate_tool_name(name: &str) -> Result<()> {
    if name.is_empty() || name.len() > 64 {
        return Err(anyhow!("tool name must be 1-64 characters"));
    }

    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(anyhow!("tool name must not be empty"));
    };
    let first_is_valid = first.is_ascii_lowercase() || first.is_ascii_digit();
    let rest_is_valid =
        chars.all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' || ch == '_');
    if !first_is_valid || !rest_is_valid {
        return Err(anyhow!("invalid tool name: '{name}'"));
    }

    Ok(())
}

fn looks_like_range(input: &str) -> bool {
    input.contains(['^', '~', '>', '<', '=', '*', ','])
}
