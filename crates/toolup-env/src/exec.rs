use std::path::{Path, PathBuf};
use std::process::Command;

use toolup_core::ExecError;

use crate::EnvOverlay;

/// Conventional shell exit code for a command that could not be found or
/// started; the CLI maps `ExecError::Spawn` to this.
pub const SPAWN_FAILURE_EXIT_CODE: i32 = 127;

/// Run a command inside the overlay's environment with inherited stdio,
/// returning the child's exit code.
///
/// The program is looked up in the overlay's PATH entries before the
/// inherited PATH so activated toolchains shadow system binaries even
/// when the parent shell resolved the name differently.
pub fn run_command(
    program: &str,
    args: &[String],
    overlay: &EnvOverlay,
) -> Result<i32, ExecError> {
    let resolved = resolve_program(program, &overlay.path_prepend);

    let mut command = Command::new(&resolved);
    command.args(args);
    command.env(
        "PATH",
        overlay.merged_path(std::env::var_os("PATH").as_deref()),
    );
    for (key, value) in &overlay.vars {
        command.env(key, value);
    }

    let mut child = command.spawn().map_err(|source| ExecError::Spawn {
        program: program.to_string(),
        source,
    })?;
    let status = child.wait().map_err(|source| ExecError::Wait {
        program: program.to_string(),
        source,
    })?;
    Ok(exit_code(status))
}

pub(crate) fn resolve_program(program: &str, path_prepend: &[PathBuf]) -> PathBuf {
    // explicit paths bypass the overlay lookup
    if program.contains(std::path::MAIN_SEPARATOR) || program.contains('/') {
        return PathBuf::from(program);
    }

    for dir in path_prepend {
        for candidate in candidate_names(dir, program) {
            if candidate.is_file() {
                return candidate;
            }
        }
    }

    PathBuf::from(program)
}

fn candidate_names(dir: &Path, program: &str) -> Vec<PathBuf> {
    let mut candidates = vec![dir.join(program)];
    if cfg!(windows) && !program.to_ascii_lowercase().ends_with(".exe") {
        candidates.push(dir.join(format!("{program}.exe")));
    }
    candidates
}

#[cfg(unix)]
fn exit_code(status: std::process::ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    match status.code() {
        Some(code) => code,
        None => 128 + status.signal().unwrap_or(0),
    }
}

#[cfg(not(unix))]
fn exit_code(status: std::process::ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}
