use super::*;

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use toolup_core::{ToolSpec, VersionSpec};

static TEST_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

fn test_dir() -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system time")
        .as_nanos();
    let sequence = TEST_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
    let mut dir = std::env::temp_dir();
    dir.push(format!(
        "toolup-config-tests-{}-{}-{}",
        std::process::id(),
        nanos,
        sequence
    ));
    fs::create_dir_all(&dir).expect("must create test dir");
    dir
}

fn no_env() -> BTreeMap<String, String> {
    BTreeMap::new()
}

fn tool_names(config: &Config) -> Vec<&str> {
    config.tools.iter().map(|t| t.tool.as_str()).collect()
}

#[test]
fn empty_inputs_yield_default_config() {
    let dir = test_dir();
    let config = load_config(&dir, None, &no_env()).expect("must load");
    assert_eq!(config, Config::default());
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn project_file_overrides_global() {
    let dir = test_dir();
    let global = dir.join("config.toml");
    fs::write(&global, "[tools]\ngolang = \"1.19.5\"\nnode = \"20.11.1\"\n")
        .expect("must write");

    let project = dir.join("project");
    fs::create_dir_all(&project).expect("must create");
    fs::write(
        project.join(PROJECT_FILE_NAME),
        "[tools]\ngolang = \"prefix:1.20\"\n",
    )
    .expect("must write");

    let config = load_config(&project, Some(&global), &no_env()).expect("must load");
    // the project's golang replaces the global one and moves to the end
    assert_eq!(tool_names(&config), vec!["node", "golang"]);
    assert_eq!(
        config.tools[1].spec,
        VersionSpec::Prefix("1.20".to_string())
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn nearer_project_files_win() {
    let dir = test_dir();
    fs::write(
        dir.join(PROJECT_FILE_NAME),
        "[tools]\nnode = \"20.11.1\"\ngolang = \"1.19.5\"\n",
    )
    .expect("must write");

    let nested = dir.join("service").join("api");
    fs::create_dir_all(&nested).expect("must create");
    fs::write(
        dir.join("service").join(PROJECT_FILE_NAME),
        "[tools]\ngolang = \"prefix:1.20\"\n",
    )
    .expect("must write");

    let config = load_config(&nested, None, &no_env()).expect("must load");
    assert_eq!(tool_names(&config), vec!["node", "golang"]);
    assert_eq!(
        config.tools[1].spec,
        VersionSpec::Prefix("1.20".to_string())
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn settings_tables_accumulate() {
    let dir = test_dir();
    fs::write(
        dir.join(PROJECT_FILE_NAME),
        concat!(
            "[settings]\n",
            "experimental = true\n",
            "[settings.default_packages]\n",
            "golang = \"/etc/toolup/go-packages\"\n",
            "[catalog]\n",
            "zig = \"https://ziglang.org/download/index.json\"\n",
            "[dist]\n",
            "zig = \"https://ziglang.org/download/zig-{version}.tar.xz\"\n",
        ),
    )
    .expect("must write");

    let config = load_config(&dir, None, &no_env()).expect("must load");
    assert!(config.settings.experimental);
    assert_eq!(
        config.settings.default_packages.get("golang"),
        Some(&PathBuf::from("/etc/toolup/go-packages"))
    );
    assert!(config.settings.catalog_urls.contains_key("zig"));
    assert!(config.settings.dist_templates["zig"].contains("{version}"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn env_toggles_experimental() {
    let dir = test_dir();
    fs::write(dir.join(PROJECT_FILE_NAME), "[settings]\nexperimental = true\n")
        .expect("must write");

    let mut env = no_env();
    env.insert("TOOLUP_EXPERIMENTAL".to_string(), "false".to_string());
    let config = load_config(&dir, None, &env).expect("must load");
    assert!(!config.settings.experimental);

    env.insert("TOOLUP_EXPERIMENTAL".to_string(), "1".to_string());
    let config = load_config(&dir, None, &env).expect("must load");
    assert!(config.settings.experimental);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn env_overrides_default_packages_file() {
    let dir = test_dir();
    let mut env = no_env();
    env.insert(
        default_packages_env_key("golang"),
        "/home/me/.go-packages".to_string(),
    );
    env.insert(
        "TOOLUP_MY_TOOL_DEFAULT_PACKAGES_FILE".to_string(),
        "/tmp/pkgs".to_string(),
    );

    let config = load_config(&dir, None, &env).expect("must load");
    assert_eq!(
        config.settings.default_packages.get("golang"),
        Some(&PathBuf::from("/home/me/.go-packages"))
    );
    // flattened env keys cover both underscore and dash tool names
    assert_eq!(
        config.settings.default_packages.get("my_tool"),
        Some(&PathBuf::from("/tmp/pkgs"))
    );
    assert_eq!(
        config.settings.default_packages.get("my-tool"),
        Some(&PathBuf::from("/tmp/pkgs"))
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn env_key_flattens_dashes() {
    assert_eq!(
        default_packages_env_key("my-tool"),
        "TOOLUP_MY_TOOL_DEFAULT_PACKAGES_FILE"
    );
}

#[test]
fn set_tool_creates_project_file() {
    let dir = test_dir();
    let spec = ToolSpec::parse("golang@prefix:1.20").expect("must parse");
    set_tool(&dir, &spec).expect("must write");

    let config = load_config(&dir, None, &no_env()).expect("must load");
    assert_eq!(config.tools, vec![spec]);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn set_tool_preserves_unrelated_entries() {
    let dir = test_dir();
    fs::write(
        dir.join(PROJECT_FILE_NAME),
        concat!(
            "[settings]\n",
            "experimental = true\n",
            "[tools]\n",
            "node = \"20.11.1\"\n",
        ),
    )
    .expect("must write");

    let spec = ToolSpec::parse("golang@1.20.14").expect("must parse");
    set_tool(&dir, &spec).expect("must write");

    let config = load_config(&dir, None, &no_env()).expect("must load");
    assert!(config.settings.experimental);
    let mut names = tool_names(&config);
    names.sort();
    assert_eq!(names, vec!["golang", "node"]);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn set_tool_rejects_scalar_tools_key() {
    let dir = test_dir();
    fs::write(dir.join(PROJECT_FILE_NAME), "tools = 3\n").expect("must write");

    let spec = ToolSpec::parse("golang@1.20.14").expect("must parse");
    assert!(set_tool(&dir, &spec).is_err());

    let _ = fs::remove_dir_all(&dir);
}
