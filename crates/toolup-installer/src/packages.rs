use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

/// Outcome of a default-packages batch. Individual failures are recorded
/// here and reported as warnings; they never fail the install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageReport {
    pub attempted: Vec<String>,
    pub failures: Vec<PackageFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageFailure {
    pub package: String,
    pub reason: String,
}

impl PackageReport {
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Install each default package with the freshly installed toolchain, its
/// bin dir prepended to PATH so tool-managed helpers (gofmt, npx, ...) are
/// found before anything inherited.
pub fn install_default_packages(
    tool: &str,
    install_dir: &Path,
    packages: &[String],
) -> PackageReport {
    let mut failures = Vec::new();
    let bin_dir = install_dir.join("bin");
    let path_value = prepend_to_path(&bin_dir);

    for package in packages {
        let Some(mut command) = package_install_command(tool, &bin_dir, package) else {
            failures.push(PackageFailure {
                package: package.clone(),
                reason: format!("no package installer known for tool '{tool}'"),
            });
            continue;
        };
        command.env("PATH", &path_value);

        match command.output() {
            Ok(output) if output.status.success() => {}
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                failures.push(PackageFailure {
                    package: package.clone(),
                    reason: format!("status={} stderr='{}'", output.status, stderr.trim()),
                });
            }
            Err(err) => failures.push(PackageFailure {
                package: package.clone(),
                reason: format!("failed to start installer: {err}"),
            }),
        }
    }

    PackageReport {
        attempted: packages.to_vec(),
        failures,
    }
}

fn package_install_command(tool: &str, bin_dir: &Path, package: &str) -> Option<Command> {
    match tool {
        "golang" | "go" => {
            // `go install` requires a version suffix
            let target = if package.contains('@') {
                package.to_string()
            } else {
                format!("{package}@latest")
            };
            let mut command = Command::new(bin_dir.join(binary_name("go")));
            command.arg("install").arg(target);
            Some(command)
        }
        "node" | "nodejs" => {
            let mut command = Command::new(bin_dir.join(binary_name("npm")));
            command.arg("install").arg("-g").arg(package);
            Some(command)
        }
        "python" => {
            let mut command = Command::new(bin_dir.join(binary_name("pip")));
            command.arg("install").arg(package);
            Some(command)
        }
        _ => None,
    }
}

fn binary_name(base: &str) -> String {
    if cfg!(windows) {
        format!("{base}.exe")
    } else {
        base.to_string()
    }
}

fn prepend_to_path(bin_dir: &Path) -> OsString {
    let mut entries = vec![bin_dir.to_path_buf()];
    if let Some(existing) = std::env::var_os("PATH") {
        entries.extend(std::env::split_paths(&existing));
    }
    std::env::join_paths(&entries).unwrap_or_else(|_| bin_dir.as_os_str().to_os_string())
}
