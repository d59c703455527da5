use std::time::Duration;

use clap::Parser;

use crate::flows::{format_ls_lines, parse_exact_spec, prune_max_age};
use crate::render::{render_status_line, resolve_output_style, OutputStyle};
use crate::{Cli, Commands};

use toolup_installer::InstallReceipt;

#[test]
fn render_status_line_plain_is_unadorned() {
    assert_eq!(
        render_status_line(OutputStyle::Plain, "ok", "installed golang 1.20.14"),
        "installed golang 1.20.14"
    );
}

#[test]
fn render_status_line_rich_includes_ascii_badge() {
    assert_eq!(
        render_status_line(OutputStyle::Rich, "ok", "installed golang 1.20.14"),
        "[OK] installed golang 1.20.14"
    );
}

#[test]
fn render_status_line_rich_formats_warning() {
    assert_eq!(
        render_status_line(OutputStyle::Rich, "warn", "default package gopls failed"),
        "[WARN] default package gopls failed"
    );
}

#[test]
fn output_style_needs_a_tty_without_no_color() {
    assert_eq!(resolve_output_style(true, false), OutputStyle::Rich);
    assert_eq!(resolve_output_style(true, true), OutputStyle::Plain);
    assert_eq!(resolve_output_style(false, false), OutputStyle::Plain);
}

#[test]
fn exact_spec_parses_tool_and_version() {
    let (tool, version) = parse_exact_spec("golang@1.20.14").expect("must parse");
    assert_eq!(tool, "golang");
    assert_eq!(version, "1.20.14");
}

#[test]
fn exact_spec_rejects_prefix_and_latest() {
    assert!(parse_exact_spec("golang@prefix:1.20").is_err());
    assert!(parse_exact_spec("golang").is_err());
}

#[test]
fn ls_lines_pair_tool_and_version() {
    let receipts = vec![InstallReceipt {
        tool: "golang".to_string(),
        version: "1.20.14".to_string(),
        install_path: "/x".to_string(),
        installed_at_unix: 5,
        default_packages: Vec::new(),
    }];
    assert_eq!(format_ls_lines(&receipts), vec!["golang 1.20.14"]);
}

#[test]
fn prune_max_age_saturates_on_huge_hours() {
    assert_eq!(prune_max_age(24), Duration::from_secs(86_400));
    assert_eq!(prune_max_age(u64::MAX), Duration::from_secs(u64::MAX));
}

#[test]
fn exec_command_collects_trailing_args() {
    let cli = Cli::try_parse_from(["toolup", "x", "--", "go", "version"]).expect("must parse");
    match cli.command {
        Commands::Exec { command } => assert_eq!(command, vec!["go", "version"]),
        other => panic!("expected exec, got {other:?}"),
    }
}

#[test]
fn exec_command_keeps_hyphenated_args() {
    let cli = Cli::try_parse_from(["toolup", "x", "--", "go", "test", "-run", "TestX"])
        .expect("must parse");
    match cli.command {
        Commands::Exec { command } => assert_eq!(command, vec!["go", "test", "-run", "TestX"]),
        other => panic!("expected exec, got {other:?}"),
    }
}

#[test]
fn prefix_flag_is_global() {
    let cli = Cli::try_parse_from(["toolup", "--prefix", "/tmp/tl", "ls"]).expect("must parse");
    assert_eq!(cli.prefix.as_deref(), Some(std::path::Path::new("/tmp/tl")));
    assert!(matches!(cli.command, Commands::Ls { tool: None }));
}

#[test]
fn use_takes_a_single_spec() {
    let cli = Cli::try_parse_from(["toolup", "use", "golang@prefix:1.20"]).expect("must parse");
    match cli.command {
        Commands::Use { spec } => assert_eq!(spec, "golang@prefix:1.20"),
        other => panic!("expected use, got {other:?}"),
    }
}
