use super::*;

use semver::VersionReq;

#[test]
fn version_ordering_is_numeric_not_lexicographic() {
    let old = ToolVersion::parse("1.9.0").expect("must parse");
    let new = ToolVersion::parse("1.20.14").expect("must parse");
    assert!(old < new);
    assert!("1.9.0" > "1.20.14", "string ordering disagrees on purpose");
}

#[test]
fn version_ordering_pads_missing_segments() {
    let short = ToolVersion::parse("1.20").expect("must parse");
    let long = ToolVersion::parse("1.20.0").expect("must parse");
    assert!(short < long);
}

#[test]
fn version_rejects_empty_and_whitespace() {
    assert!(ToolVersion::parse("").is_err());
    assert!(ToolVersion::parse("  ").is_err());
    assert!(ToolVersion::parse("1. 2").is_err());
}

#[test]
fn prefix_matching_respects_segment_boundaries() {
    let version = ToolVersion::parse("1.20.14").expect("must parse");
    assert!(version.matches_prefix("1.20"));
    assert!(version.matches_prefix("1.20.14"));
    assert!(version.matches_prefix("1"));
    assert!(!version.matches_prefix("1.2"));
    assert!(!version.matches_prefix("1.20.1"));
}

#[test]
fn prefix_with_trailing_dot_is_plain_string_match() {
    let version = ToolVersion::parse("1.20.14").expect("must parse");
    assert!(version.matches_prefix("1.20."));
    assert!(!version.matches_prefix("1.21."));
}

#[test]
fn prefix_matches_pre_release_boundary() {
    let version = ToolVersion::parse("21.0.1-rc2").expect("must parse");
    assert!(version.matches_prefix("21.0.1"));
    assert!(!version.matches_prefix("21.0.1-rc"));
}

#[test]
fn semver_view_pads_short_numeric_versions() {
    let version = ToolVersion::parse("1.20").expect("must parse");
    let semver = version.as_semver().expect("must have semver view");
    assert_eq!(semver, semver::Version::new(1, 20, 0));

    let req = VersionReq::parse(">=1.19, <1.21").expect("req must parse");
    assert!(req.matches(&semver));
}

#[test]
fn semver_view_handles_pre_release() {
    let version = ToolVersion::parse("1.21.0-rc.1").expect("must parse");
    let semver = version.as_semver().expect("must have semver view");
    assert_eq!(semver.to_string(), "1.21.0-rc.1");
}

#[test]
fn semver_view_absent_for_non_numeric() {
    let version = ToolVersion::parse("graalvm-ce").expect("must parse");
    assert!(version.as_semver().is_none());
}

#[test]
fn system_version_is_special_cased() {
    let version = ToolVersion::system();
    assert!(version.is_system());
    assert_eq!(version.as_str(), "system");
}

#[test]
fn spec_parses_all_forms() {
    assert_eq!(
        VersionSpec::parse("1.20.14").expect("must parse"),
        VersionSpec::Exact("1.20.14".to_string())
    );
    assert_eq!(
        VersionSpec::parse("prefix:1.20").expect("must parse"),
        VersionSpec::Prefix("1.20".to_string())
    );
    assert_eq!(
        VersionSpec::parse("latest").expect("must parse"),
        VersionSpec::Latest
    );
    assert_eq!(
        VersionSpec::parse("").expect("must parse"),
        VersionSpec::Latest
    );
    assert_eq!(
        VersionSpec::parse("system").expect("must parse"),
        VersionSpec::System
    );
    assert!(matches!(
        VersionSpec::parse("^1.20").expect("must parse"),
        VersionSpec::Range(_)
    ));
}

#[test]
fn spec_rejects_empty_prefix_and_bad_range() {
    assert!(VersionSpec::parse("prefix:").is_err());
    assert!(VersionSpec::parse(">>nope").is_err());
}

#[test]
fn tool_spec_parses_with_and_without_specifier() {
    let full = ToolSpec::parse("golang@prefix:1.20").expect("must parse");
    assert_eq!(full.tool, "golang");
    assert_eq!(full.spec, VersionSpec::Prefix("1.20".to_string()));

    let bare = ToolSpec::parse("golang").expect("must parse");
    assert_eq!(bare.spec, VersionSpec::Latest);
}

#[test]
fn tool_spec_rejects_invalid_names() {
    assert!(ToolSpec::parse("@1.0").is_err());
    assert!(ToolSpec::parse("Go@1.0").is_err());
    assert!(ToolSpec::parse("bad name@1.0").is_err());
}

#[test]
fn tool_spec_round_trips_through_display() {
    for input in ["golang@prefix:1.20", "node@latest", "java@system"] {
        let spec = ToolSpec::parse(input).expect("must parse");
        assert_eq!(spec.to_string(), input);
    }
}

#[test]
fn default_packages_strips_comments_and_blanks() {
    let raw = "github.com/jdx/go-example # comment\n\n# full-line comment\n  \ngolang.org/x/tools/cmd/goimports\n";
    assert_eq!(
        parse_default_packages(raw),
        vec![
            "github.com/jdx/go-example".to_string(),
            "golang.org/x/tools/cmd/goimports".to_string(),
        ]
    );
}

#[test]
fn default_packages_honors_escaped_hash() {
    let raw = "weird\\#name # real comment\n";
    assert_eq!(parse_default_packages(raw), vec!["weird#name".to_string()]);
}

#[test]
fn default_packages_empty_input_yields_nothing() {
    assert!(parse_default_packages("").is_empty());
    assert!(parse_default_packages("# only a comment\n").is_empty());
}

#[test]
fn archive_kind_parse_and_infer() {
    assert_eq!(ArchiveKind::parse("tgz"), Some(ArchiveKind::TarGz));
    assert_eq!(ArchiveKind::parse("zip"), Some(ArchiveKind::Zip));
    assert_eq!(ArchiveKind::parse("msi"), None);

    assert_eq!(
        ArchiveKind::infer_from_url("https://go.dev/dl/go1.20.14.linux-amd64.tar.gz"),
        Some(ArchiveKind::TarGz)
    );
    assert_eq!(
        ArchiveKind::infer_from_url("https://example.test/node.zip?token=1"),
        Some(ArchiveKind::Zip)
    );
    assert_eq!(ArchiveKind::infer_from_url("https://example.test/raw"), None);
}
