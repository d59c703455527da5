mod completion;
mod flows;
mod render;

#[cfg(test)]
mod tests;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(name = "toolup")]
#[command(about = "Language toolchain version manager", long_about = None)]
struct Cli {
    /// Override the toolup prefix directory
    #[arg(long)]
    prefix: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve and install a toolchain, then pin it in the project file
    Use {
        /// tool@specifier, e.g. golang@prefix:1.20
        spec: String,
    },
    /// Run a command inside the configured toolchain environment
    #[command(name = "x")]
    Exec {
        /// command and arguments, e.g. `toolup x -- go build ./...`
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },
    /// List installed toolchains
    Ls { tool: Option<String> },
    /// List versions known to the catalog, syncing it when empty
    LsRemote { tool: String },
    /// Refresh the version catalog for a tool
    Sync { tool: String },
    /// Remove an installed toolchain
    Uninstall {
        /// tool@version, exact version required
        spec: String,
    },
    /// Restore owner write permissions under an installed toolchain
    Repair {
        /// tool@version, exact version required
        spec: String,
    },
    /// Remove leftover temp dirs from interrupted installs
    Prune {
        #[arg(long, default_value_t = 24)]
        max_age_hours: u64,
    },
    /// Show prefix layout and configuration sources
    Doctor,
    /// Print shell setup for convenient `toolup x` usage
    InitShell,
    /// Generate shell completions
    Completions { shell: Shell },
    /// Print the toolup version
    Version,
}

fn main() {
    let cli = Cli::parse();
    std::process::exit(flows::run(cli));
}
