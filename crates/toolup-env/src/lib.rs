mod exec;
mod overlay;

pub use exec::{run_command, SPAWN_FAILURE_EXIT_CODE};
pub use overlay::{activate, ActivationSet, EnvOverlay};

#[cfg(test)]
mod tests;
