use std::cmp::Ordering;
use std::fmt;

use anyhow::{anyhow, Result};
use semver::Version;

/// The version string `system` selects the host-provided toolchain and never
/// resolves against a catalog.
pub const SYSTEM_VERSION: &str = "system";

/// A concrete toolchain version. Ordering compares numeric segments, so
/// `1.9.0 < 1.20.14` even though the strings sort the other way.
#[derive(Debug, Clone, Eq)]
pub struct ToolVersion {
    raw: String,
    segments: Vec<u64>,
}

impl ToolVersion {
    pub fn parse(input: &str) -> Result<Self> {
        let raw = input.trim();
        if raw.is_empty() {
            return Err(anyhow!("version must not be empty"));
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(anyhow!("version must not contain whitespace: '{raw}'"));
        }

        Ok(Self {
            raw: raw.to_string(),
            segments: leading_numeric_segments(raw),
        })
    }

    pub fn system() -> Self {
        Self {
            raw: SYSTEM_VERSION.to_string(),
            segments: Vec::new(),
        }
    }

    pub fn is_system(&self) -> bool {
        self.raw == SYSTEM_VERSION
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether `prefix` matches this version at a segment boundary:
    /// `1.2` matches `1.2` and `1.2.9` but not `1.20.1`. A prefix with a
    /// trailing dot falls back to plain string matching.
    pub fn matches_prefix(&self, prefix: &str) -> bool {
        if prefix.ends_with('.') {
            return self.raw.starts_with(prefix);
        }
        self.raw == prefix
            || self.raw.starts_with(&format!("{prefix}."))
            || self.raw.starts_with(&format!("{prefix}-"))
            || self.raw.starts_with(&format!("{prefix}+"))
    }

    /// Semver view for range matching. Strictly-parsed when possible, with a
    /// zero-padded fallback for short numeric forms like `1.20`.
    pub fn as_semver(&self) -> Option<Version> {
        if let Ok(version) = Version::parse(&self.raw) {
            return Some(version);
        }
        if self.segments.is_empty() || !is_plain_numeric(&self.raw) {
            return None;
        }

        let major = *self.segments.first().unwrap_or(&0);
        let minor = *self.segments.get(1).unwrap_or(&0);
        let patch = *self.segments.get(2).unwrap_or(&0);
        Some(Version::new(major, minor, patch))
    }
}

impl PartialEq for ToolVersion {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl std::hash::Hash for ToolVersion {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl Ord for ToolVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.segments.len().max(other.segments.len());
        for index in 0..len {
            let left = self.segments.get(index).unwrap_or(&0);
            let right = other.segments.get(index).unwrap_or(&0);
            if left != right {
                return left.cmp(right);
            }
        }
        self.raw.cmp(&other.raw)
    }
}

impl PartialOrd for ToolVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ToolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl std::str::FromStr for ToolVersion {
    type Err = anyhow::Error;

    fn from_str(input: &str) -> Result<Self> {
        Self::parse(input)
    }
}

/// Where a resolved version came from. `Installed` lets callers skip the
/// download path entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionSource {
    Installed,
    Remote,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersion {
    pub version: ToolVersion,
    pub source: VersionSource,
}

impl ResolvedVersion {
    pub fn new(version: ToolVersion, source: VersionSource) -> Self {
        Self { version, source }
    }

    pub fn system() -> Self {
        Self {
            version: ToolVersion::system(),
            source: VersionSource::Installed,
        }
    }
}

impl fmt::Display for ResolvedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.version.fmt(f)
    }
}

fn leading_numeric_segments(raw: &str) -> Vec<u64> {
    let core = raw
        .split_once(['-', '+'])
        .map(|(head, _)| head)
        .unwrap_or(raw);

    let mut segments = Vec::new();
    for part in core.split('.') {
        match part.parse::<u64>() {
            Ok(value) => segments.push(value),
            Err(_) => break,
        }
    }
    segments
}

fn is_plain_numeric(raw: &str) -> bool {
    raw.split('.')
        .all(|part| !part.is_empty() && part.chars().all(|ch| ch.is_ascii_digit()))
}
