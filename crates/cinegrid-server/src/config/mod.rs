//! Application configuration module.
//!
//! Manages the TOML config file (listener, upstream, listing and cache
//! settings) and the environment variables that override it.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::{AppConfig, ServerConfig};
pub use paths::resolve_config_path;
