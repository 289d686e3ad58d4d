//! Configuration system for cfapps.
//!
//! This module provides the configuration structures and CLI definitions for the
//! `cf-apps` binary. Configuration loading and precedence merging is handled by
//! the `ortho_config` crate. Precedence: CLI flags override environment
//! variables, which override configuration files, which override defaults.
//!
//! The configuration file is expected at `~/.config/cfapps/config.toml` by default.
//!
//! # Example Configuration
//!
//! ```toml
//! url = "https://api.sys.example.com"
//! username = "deployer"
//! org = "acme"
//! space = "prod"
//!
//! [log]
//! file = "/tmp/cf_apps.log"
//! level = "debug"
//!
//! [http]
//! timeout_secs = 30
//! skip_ssl_validation = false
//! ```
//!
//! When running as an Ansible module the lookup parameters come from the
//! argument file instead; see [`ModuleArgs`].

mod cli;
mod loader;
mod module_args;
mod request;
mod types;

#[cfg(test)]
mod tests;

pub use cli::{Cli, Commands, ListArgs, ModuleCommandArgs};
pub use loader::{env_var_names, load_config, load_config_with_env};
pub use module_args::ModuleArgs;
pub use request::LookupRequest;
pub use types::{AppConfig, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_LOG_LEVEL, HttpConfig, LogConfig};
