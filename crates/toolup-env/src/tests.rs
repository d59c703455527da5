use super::*;

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use toolup_core::{ResolvedVersion, ToolVersion, VersionSource};
use toolup_installer::ToolchainLayout;

static TEST_PREFIX_COUNTER: AtomicU64 = AtomicU64::new(0);

fn test_layout() -> ToolchainLayout {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system time")
        .as_nanos();
    let sequence = TEST_PREFIX_COUNTER.fetch_add(1, Ordering::Relaxed);
    let mut prefix = std::env::temp_dir();
    prefix.push(format!(
        "toolup-env-tests-{}-{}-{}",
        std::process::id(),
        nanos,
        sequence
    ));
    let layout = ToolchainLayout::new(prefix);
    layout.ensure_base_dirs().expect("base dirs must create");
    layout
}

fn cleanup(layout: &ToolchainLayout) {
    let _ = fs::remove_dir_all(layout.prefix());
}

fn installed(version: &str) -> ResolvedVersion {
    ResolvedVersion::new(
        ToolVersion::parse(version).expect("version must parse"),
        VersionSource::Installed,
    )
}

fn fake_install(layout: &ToolchainLayout, tool: &str, version: &str) -> PathBuf {
    let dir = layout.install_dir(tool, version);
    fs::create_dir_all(dir.join("bin")).expect("must create");
    dir
}

#[test]
fn activation_set_keeps_one_entry_per_tool() {
    let mut set = ActivationSet::new();
    set.insert("golang", installed("1.20.1"));
    set.insert("node", installed("20.11.1"));
    set.insert("golang", installed("1.20.14"));

    assert_eq!(set.len(), 2);
    let entries: Vec<&str> = set.entries().iter().map(|(tool, _)| tool.as_str()).collect();
    assert_eq!(entries, vec!["node", "golang"]);
    assert_eq!(set.entries()[1].1.version.as_str(), "1.20.14");
}

#[test]
fn activate_orders_paths_newest_first() {
    let layout = test_layout();
    let go_dir = fake_install(&layout, "golang", "1.20.14");
    let node_dir = fake_install(&layout, "node", "20.11.1");

    let mut set = ActivationSet::new();
    set.insert("node", installed("20.11.1"));
    set.insert("golang", installed("1.20.14"));

    let overlay = activate(&layout, &set).expect("must activate");
    assert_eq!(
        overlay.path_prepend,
        vec![go_dir.join("bin"), node_dir.join("bin")]
    );
    assert_eq!(
        overlay.vars.get("GOROOT"),
        Some(&go_dir.display().to_string())
    );

    cleanup(&layout);
}

#[test]
fn activate_requires_an_install_dir() {
    let layout = test_layout();
    let mut set = ActivationSet::new();
    set.insert("golang", installed("1.20.14"));

    let err = activate(&layout, &set).expect_err("missing install must fail");
    let message = err.to_string();
    assert!(message.contains("not installed"));
    assert!(message.contains("toolup use golang@1.20.14"));

    cleanup(&layout);
}

#[test]
fn activate_skips_system_entries() {
    let layout = test_layout();
    let mut set = ActivationSet::new();
    set.insert("golang", ResolvedVersion::system());

    let overlay = activate(&layout, &set).expect("system entries need no install");
    assert!(overlay.path_prepend.is_empty());
    assert!(overlay.vars.is_empty());

    cleanup(&layout);
}

#[test]
fn java_gets_java_home() {
    let layout = test_layout();
    let jdk_dir = fake_install(&layout, "java", "21.0.1");

    let mut set = ActivationSet::new();
    set.insert("java", installed("21.0.1"));

    let overlay = activate(&layout, &set).expect("must activate");
    assert_eq!(
        overlay.vars.get("JAVA_HOME"),
        Some(&jdk_dir.display().to_string())
    );

    cleanup(&layout);
}

#[test]
fn merged_path_prepends_overlay_entries() {
    let overlay = EnvOverlay {
        path_prepend: vec![PathBuf::from("/toolup/go/bin")],
        vars: Default::default(),
    };
    let merged = overlay.merged_path(Some(std::ffi::OsStr::new("/usr/bin")));
    let entries: Vec<PathBuf> = std::env::split_paths(&merged).collect();
    assert_eq!(
        entries,
        vec![PathBuf::from("/toolup/go/bin"), PathBuf::from("/usr/bin")]
    );
}

#[test]
fn merged_path_without_inherited_is_just_the_overlay() {
    let overlay = EnvOverlay {
        path_prepend: vec![PathBuf::from("/toolup/go/bin")],
        vars: Default::default(),
    };
    let merged = overlay.merged_path(None);
    let entries: Vec<PathBuf> = std::env::split_paths(&merged).collect();
    assert_eq!(entries, vec![PathBuf::from("/toolup/go/bin")]);
}

#[test]
fn resolve_program_prefers_overlay_dirs() {
    let layout = test_layout();
    let bin_dir = fake_install(&layout, "golang", "1.20.14").join("bin");
    fs::write(bin_dir.join("go"), b"#!/bin/sh\n").expect("must write");

    let resolved = exec::resolve_program("go", &[bin_dir.clone()]);
    assert_eq!(resolved, bin_dir.join("go"));

    // unknown names fall through untouched for the child's PATH lookup
    let fallback = exec::resolve_program("gofmt2", &[bin_dir]);
    assert_eq!(fallback, PathBuf::from("gofmt2"));

    cleanup(&layout);
}

#[test]
fn resolve_program_leaves_explicit_paths_alone() {
    let resolved = exec::resolve_program("/usr/bin/env", &[PathBuf::from("/toolup/go/bin")]);
    assert_eq!(resolved, PathBuf::from("/usr/bin/env"));
}

#[cfg(unix)]
#[test]
fn run_command_forwards_exit_codes() {
    let overlay = EnvOverlay::default();
    let code = run_command("sh", &["-c".to_string(), "exit 7".to_string()], &overlay)
        .expect("sh must spawn");
    assert_eq!(code, 7);

    let code = run_command("true", &[], &overlay).expect("true must spawn");
    assert_eq!(code, 0);
}

#[cfg(unix)]
#[test]
fn run_command_exposes_overlay_vars() {
    let layout = test_layout();
    let go_dir = fake_install(&layout, "golang", "1.20.14");

    let mut set = ActivationSet::new();
    set.insert("golang", installed("1.20.14"));
    let overlay = activate(&layout, &set).expect("must activate");

    let script = format!("test \"$GOROOT\" = '{}'", go_dir.display());
    let code = run_command("sh", &["-c".to_string(), script], &overlay).expect("sh must spawn");
    assert_eq!(code, 0);

    cleanup(&layout);
}

#[test]
fn spawn_failure_is_an_error() {
    let overlay = EnvOverlay::default();
    let err = run_command("definitely-not-a-real-binary-xyz", &[], &overlay)
        .expect_err("must fail to spawn");
    assert!(matches!(err, toolup_core::ExecError::Spawn { .. }));
}
