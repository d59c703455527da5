use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use toolup_catalog::{default_catalog_url, resolve, sync_tool, CatalogStore};
use toolup_config::{load_config, set_tool, Config, PROJECT_FILE_NAME};
use toolup_core::{ExecError, ResolvedVersion, ToolSpec, VersionSpec};
use toolup_env::{activate, run_command, ActivationSet, SPAWN_FAILURE_EXIT_CODE};
use toolup_installer::{
    default_user_prefix, dist_for, dist_from_template, ensure_installed, installed_versions,
    prune_orphaned_tmp, read_all_receipts, read_tool_receipts, repair_permissions,
    uninstall_toolchain, InstallOutcome, InstallReceipt, PackageReport, ToolchainDist,
    ToolchainLayout, UninstallStatus,
};

use crate::render::{
    current_output_style, finish_spinner, print_status, print_warn, start_spinner, OutputStyle,
};
use crate::{completion, Cli, Commands};

pub fn run(cli: Cli) -> i32 {
    match dispatch(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("toolup: {err:#}");
            1
        }
    }
}

fn dispatch(cli: Cli) -> Result<i32> {
    let layout = resolve_layout(cli.prefix)?;
    let style = current_output_style();

    match cli.command {
        Commands::Use { spec } => cmd_use(&layout, style, &spec),
        Commands::Exec { command } => cmd_exec(&layout, &command),
        Commands::Ls { tool } => cmd_ls(&layout, tool.as_deref()),
        Commands::LsRemote { tool } => cmd_ls_remote(&layout, &tool),
        Commands::Sync { tool } => cmd_sync(&layout, style, &tool),
        Commands::Uninstall { spec } => cmd_uninstall(&layout, style, &spec),
        Commands::Repair { spec } => cmd_repair(&layout, style, &spec),
        Commands::Prune { max_age_hours } => cmd_prune(&layout, style, max_age_hours),
        Commands::Doctor => cmd_doctor(&layout),
        Commands::InitShell => {
            print_init_shell();
            Ok(0)
        }
        Commands::Completions { shell } => {
            completion::print_completions(shell);
            Ok(0)
        }
        Commands::Version => {
            println!("toolup {}", env!("CARGO_PKG_VERSION"));
            Ok(0)
        }
    }
}

fn resolve_layout(prefix: Option<PathBuf>) -> Result<ToolchainLayout> {
    let prefix = match prefix {
        Some(prefix) => prefix,
        None => default_user_prefix()?,
    };
    Ok(ToolchainLayout::new(prefix))
}

fn process_env() -> BTreeMap<String, String> {
    std::env::vars().collect()
}

fn working_dir() -> Result<PathBuf> {
    std::env::current_dir().context("failed to resolve working directory")
}

fn load_effective_config(layout: &ToolchainLayout) -> Result<Config> {
    load_config(&working_dir()?, Some(&layout.config_path()), &process_env())
}

/// Resolve a specifier for one tool. When `allow_sync` is set an empty
/// catalog is refreshed from the tool's version index before resolving;
/// activation paths leave it off and run from cache plus installed state.
fn resolve_tool(
    layout: &ToolchainLayout,
    config: &Config,
    tool: &str,
    spec: &VersionSpec,
    allow_sync: bool,
) -> Result<ResolvedVersion> {
    let installed = installed_versions(layout, tool)?;
    let store = CatalogStore::new(layout.catalog_dir());
    let resolved = resolve(tool, spec, &installed, |tool| {
        let cached = store.load_versions(tool)?;
        if !cached.is_empty() || !allow_sync {
            return Ok(cached);
        }
        let Some(url) = catalog_url(config, tool) else {
            return Ok(cached);
        };
        sync_tool(&store, tool, &url)?;
        store.load_versions(tool)
    })?;
    Ok(resolved)
}

fn catalog_url(config: &Config, tool: &str) -> Option<String> {
    config
        .settings
        .catalog_urls
        .get(tool)
        .cloned()
        .or_else(|| default_catalog_url(tool).map(str::to_string))
}

fn build_dist(config: &Config, tool: &str, version: &str) -> Result<ToolchainDist> {
    let mut dist = match config.settings.dist_templates.get(tool) {
        Some(template) => dist_from_template(tool, version, template)?,
        None => dist_for(tool, version)?,
    };
    dist.default_packages_file = config.settings.default_packages.get(tool).cloned();
    Ok(dist)
}

fn cmd_use(layout: &ToolchainLayout, style: OutputStyle, spec: &str) -> Result<i32> {
    let tool_spec = ToolSpec::parse(spec)?;
    layout.ensure_base_dirs()?;
    let config = load_effective_config(layout)?;
    let resolved = resolve_tool(layout, &config, &tool_spec.tool, &tool_spec.spec, true)?;

    if resolved.version.is_system() {
        print_status(
            style,
            "ok",
            &format!("{} uses the system toolchain", tool_spec.tool),
        );
    } else {
        let version = resolved.version.as_str();
        let dist = build_dist(&config, &tool_spec.tool, version)?;

        let spinner = start_spinner(style, &format!("installing {} {version}", tool_spec.tool));
        let outcome = ensure_installed(layout, &dist);
        finish_spinner(spinner);

        match outcome? {
            InstallOutcome::AlreadyInstalled(_) => print_status(
                style,
                "ok",
                &format!("{} {version} already installed", tool_spec.tool),
            ),
            InstallOutcome::Installed {
                packages,
                receipt_error,
                ..
            } => {
                print_status(
                    style,
                    "ok",
                    &format!("installed {} {version}", tool_spec.tool),
                );
                if let Some(report) = packages {
                    print_package_report(style, &report);
                }
                if let Some(reason) = receipt_error {
                    print_warn(
                        style,
                        &format!(
                            "install record not written ({reason}); `toolup ls` will miss {} {version} until it is reinstalled",
                            tool_spec.tool
                        ),
                    );
                }
            }
        }
    }

    let dir = working_dir()?;
    set_tool(&dir, &tool_spec)?;
    print_status(
        style,
        "ok",
        &format!(
            "pinned {tool_spec} in {}",
            dir.join(PROJECT_FILE_NAME).display()
        ),
    );
    Ok(0)
}

fn print_package_report(style: OutputStyle, report: &PackageReport) {
    for failure in &report.failures {
        print_warn(
            style,
            &format!(
                "default package {} failed: {}",
                failure.package, failure.reason
            ),
        );
    }
    if report.all_succeeded() && !report.attempted.is_empty() {
        print_status(
            style,
            "ok",
            &format!("installed {} default packages", report.attempted.len()),
        );
    }
}

fn cmd_exec(layout: &ToolchainLayout, command: &[String]) -> Result<i32> {
    let Some((program, args)) = command.split_first() else {
        return Err(anyhow!("no command given; usage: toolup x -- <command> [args...]"));
    };

    let config = load_effective_config(layout)?;
    if config.tools.is_empty() {
        return Err(anyhow!(
            "no tools configured; run `toolup use <tool>@<spec>` first"
        ));
    }

    let mut set = ActivationSet::new();
    for tool_spec in &config.tools {
        let resolved = resolve_tool(layout, &config, &tool_spec.tool, &tool_spec.spec, false)?;
        set.insert(&tool_spec.tool, resolved);
    }
    let overlay = activate(layout, &set)?;

    match run_command(program, args, &overlay) {
        Ok(code) => Ok(code),
        Err(err @ ExecError::Spawn { .. }) => {
            eprintln!("toolup: {err}");
            Ok(SPAWN_FAILURE_EXIT_CODE)
        }
        Err(err) => Err(err.into()),
    }
}

fn cmd_ls(layout: &ToolchainLayout, tool: Option<&str>) -> Result<i32> {
    let receipts = match tool {
        Some(tool) => read_tool_receipts(layout, tool)?,
        None => read_all_receipts(layout)?,
    };
    if receipts.is_empty() {
        println!("no toolchains installed");
        return Ok(0);
    }
    for line in format_ls_lines(&receipts) {
        println!("{line}");
    }
    Ok(0)
}

pub(crate) fn format_ls_lines(receipts: &[InstallReceipt]) -> Vec<String> {
    receipts
        .iter()
        .map(|receipt| format!("{} {}", receipt.tool, receipt.version))
        .collect()
}

fn cmd_ls_remote(layout: &ToolchainLayout, tool: &str) -> Result<i32> {
    let config = load_effective_config(layout)?;
    let store = CatalogStore::new(layout.catalog_dir());

    let mut versions = store.load_versions(tool)?;
    if versions.is_empty() {
        let url = catalog_url(&config, tool)
            .ok_or_else(|| anyhow!("no catalog url known for '{tool}'"))?;
        sync_tool(&store, tool, &url)?;
        versions = store.load_versions(tool)?;
    }

    for version in versions {
        println!("{version}");
    }
    Ok(0)
}

fn cmd_sync(layout: &ToolchainLayout, style: OutputStyle, tool: &str) -> Result<i32> {
    layout.ensure_base_dirs()?;
    let config = load_effective_config(layout)?;
    let url = catalog_url(&config, tool)
        .ok_or_else(|| anyhow!("no catalog url known for '{tool}'"))?;

    let store = CatalogStore::new(layout.catalog_dir());
    let spinner = start_spinner(style, &format!("syncing {tool} catalog"));
    let count = sync_tool(&store, tool, &url);
    finish_spinner(spinner);

    let count = count?;
    print_status(style, "ok", &format!("synced {count} versions for {tool}"));
    Ok(0)
}

fn cmd_uninstall(layout: &ToolchainLayout, style: OutputStyle, spec: &str) -> Result<i32> {
    let (tool, version) = parse_exact_spec(spec)?;
    let result = uninstall_toolchain(layout, &tool, &version)?;
    match result.status {
        UninstallStatus::NotInstalled => {
            print_warn(style, &format!("{tool} {version} is not installed"))
        }
        UninstallStatus::Uninstalled => {
            print_status(style, "ok", &format!("uninstalled {tool} {version}"))
        }
        UninstallStatus::RepairedStaleState => print_status(
            style,
            "ok",
            &format!("cleared stale state for {tool} {version}"),
        ),
    }
    Ok(0)
}

fn cmd_repair(layout: &ToolchainLayout, style: OutputStyle, spec: &str) -> Result<i32> {
    let (tool, version) = parse_exact_spec(spec)?;
    let dir = layout.install_dir(&tool, &version);
    if !dir.is_dir() {
        return Err(anyhow!("{tool} {version} is not installed"));
    }

    let repaired = repair_permissions(&dir)?;
    print_status(
        style,
        "ok",
        &format!("repaired {repaired} entries under {}", dir.display()),
    );
    Ok(0)
}

fn cmd_prune(layout: &ToolchainLayout, style: OutputStyle, max_age_hours: u64) -> Result<i32> {
    let removed = prune_orphaned_tmp(layout, prune_max_age(max_age_hours))?;
    for path in &removed {
        print_status(style, "ok", &format!("removed {}", path.display()));
    }
    print_status(
        style,
        "ok",
        &format!("pruned {} leftover tmp entries", removed.len()),
    );
    Ok(0)
}

fn cmd_doctor(layout: &ToolchainLayout) -> Result<i32> {
    let config = load_effective_config(layout)?;

    println!("prefix: {}", layout.prefix().display());
    println!("toolchains: {}", layout.toolchains_dir().display());
    println!("catalog: {}", layout.catalog_dir().display());
    let global = layout.config_path();
    println!(
        "global config: {} ({})",
        global.display(),
        if global.exists() { "present" } else { "absent" }
    );
    println!("configured tools: {}", config.tools.len());
    for tool_spec in &config.tools {
        println!("- {tool_spec}");
    }
    println!(
        "experimental: {}",
        if config.settings.experimental { "on" } else { "off" }
    );
    Ok(0)
}

fn print_init_shell() {
    if cfg!(windows) {
        println!("doskey tx=toolup x -- $*");
    } else {
        println!("# add to your shell profile:");
        println!("tx() {{ toolup x -- \"$@\"; }}");
    }
}

/// Saturating so an absurd `--max-age-hours` clamps instead of overflowing.
pub(crate) fn prune_max_age(hours: u64) -> Duration {
    Duration::from_secs(hours.saturating_mul(3600))
}

pub(crate) fn parse_exact_spec(input: &str) -> Result<(String, String)> {
    let tool_spec = ToolSpec::parse(input)?;
    match &tool_spec.spec {
        VersionSpec::Exact(version) => Ok((tool_spec.tool.clone(), version.clone())),
        _ => Err(anyhow!(
            "expected tool@version with an exact version, got '{input}'"
        )),
    }
}
