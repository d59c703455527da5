use anyhow::Result;
use toolup_core::{ResolveError, ResolvedVersion, ToolVersion, VersionSource, VersionSpec};

/// Resolve a specifier to a concrete version.
///
/// `installed` is the locally installed version set; it participates in
/// candidate selection (an installed version absent from the catalog still
/// resolves) and breaks ties in favor of skipping a download. `load_versions`
/// supplies the catalog list, so callers decide whether that is a cached
/// file, a remote fetch, or a test fixture.
pub fn resolve<F>(
    tool: &str,
    spec: &VersionSpec,
    installed: &[ToolVersion],
    load_versions: F,
) -> Result<ResolvedVersion, ResolveError>
where
    F: FnOnce(&str) -> Result<Vec<ToolVersion>>,
{
    if matches!(spec, VersionSpec::System) {
        return Ok(ResolvedVersion::system());
    }

    let catalog = load_versions(tool).map_err(|source| ResolveError::Catalog {
        tool: tool.to_string(),
        source,
    })?;

    let mut candidates = catalog;
    for version in installed {
        if !candidates.contains(version) {
            candidates.push(version.clone());
        }
    }
    candidates.sort();

    let winner = match spec {
        VersionSpec::Exact(version) => {
            let found = candidates.iter().any(|v| v.as_str() == version);
            if !found {
                return Err(ResolveError::NotFound {
                    tool: tool.to_string(),
                    version: version.clone(),
                });
            }
            ToolVersion::parse(version).map_err(|source| ResolveError::Catalog {
                tool: tool.to_string(),
                source,
            })?
        }
        VersionSpec::Prefix(prefix) => candidates
            .iter()
            .filter(|v| v.matches_prefix(prefix))
            .next_back()
            .cloned()
            .ok_or_else(|| no_match(tool, spec))?,
        VersionSpec::Range(requirement) => candidates
            .iter()
            .filter(|v| {
                v.as_semver()
                    .map(|semver| requirement.matches(&semver))
                    .unwrap_or(false)
            })
            .next_back()
            .cloned()
            .ok_or_else(|| no_match(tool, spec))?,
        VersionSpec::Latest => candidates
            .last()
            .cloned()
            .ok_or_else(|| no_match(tool, spec))?,
        VersionSpec::System => unreachable!("handled above"),
    };

    let source = if installed.contains(&winner) {
        VersionSource::Installed
    } else {
        VersionSource::Remote
    };
    Ok(ResolvedVersion::new(winner, source))
}

fn no_match(tool: &str, spec: &VersionSpec) -> ResolveError {
    ResolveError::NoMatch {
        tool: tool.to_string(),
        spec: spec.to_string(),
    }
}
