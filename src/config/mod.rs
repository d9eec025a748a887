//! Configuration system for ldapbdd.
//!
//! This module provides the configuration structures and CLI definitions.
//! Precedence merging is handled by the `ortho_config` crate: CLI flags
//! override environment variables, which override configuration files, which
//! override defaults.
//!
//! The configuration file is expected at `~/.config/ldapbdd/config.toml` by
//! default.
//!
//! # Example Configuration
//!
//! ```toml
//! server_url = "ldap://localhost:389"
//! root_dn = "dc=example,dc=com"
//!
//! [scenario]
//! bind_before = true
//! purge_before = false
//!
//! [authentication]
//! principal = "cn=admin,dc=example,dc=com"
//! password = "secret"
//!
//! [connection]
//! timeout_secs = 10
//! ```

mod cli;
mod loader;
mod types;


pub use cli::{Cli, Commands, CountArgs, SearchArgs};
pub use loader::{env_var_names, load_config, load_config_with_env};
pub use types::{
    AppConfig, AuthenticationConfig, ConnectionConfig, DEFAULT_SERVER_URL, ScenarioHooksConfig,
};
