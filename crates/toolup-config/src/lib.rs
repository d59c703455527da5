mod load;
mod write;

pub use load::{default_packages_env_key, load_config, Config, Settings, PROJECT_FILE_NAME};
pub use write::set_tool;

#[cfg(test)]
mod tests;
