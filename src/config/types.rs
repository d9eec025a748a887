//! Configuration data types for ldapbdd.

use std::time::Duration;

use ortho_config::{OrthoConfig, OrthoResult, PostMergeContext, PostMergeHook};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::scenario::{Credentials, ScenarioConfig};

/// Server used when no URL is configured.
pub const DEFAULT_SERVER_URL: &str = "ldap://localhost:389";

/// Connection timeout used when none is configured.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Setup-hook behaviour applied before every scenario.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ScenarioHooksConfig {
    /// Bind with the configured credentials before each scenario.
    pub bind_before: bool,

    /// Remove every entry below the root DN before each scenario.
    pub purge_before: bool,
}

/// Bind credentials.
#[derive(Clone, Default, Deserialize, Serialize)]
pub struct AuthenticationConfig {
    /// Distinguished name to bind as.
    #[serde(alias = "rdn")]
    pub principal: Option<String>,

    /// Password for the principal.
    pub password: Option<String>,
}

impl AuthenticationConfig {
    /// Returns the credentials when a principal is configured.
    ///
    /// A missing password is treated as empty.
    #[must_use]
    pub fn credentials(&self) -> Option<Credentials> {
        self.principal.as_ref().map(|principal| {
            Credentials::new(principal.clone(), self.password.clone().unwrap_or_default())
        })
    }
}

impl std::fmt::Debug for AuthenticationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticationConfig")
            .field("principal", &self.principal)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Connection settings handed to the LDAP client.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Seconds to wait for the server to accept a connection.
    pub timeout_secs: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Root application configuration.
///
/// Loaded with layered precedence (lowest to highest): defaults,
/// configuration file, environment variables, command-line arguments.
///
/// Configuration files are discovered in this order:
/// 1. Path specified via `LDAPBDD_CONFIG_PATH` environment variable
/// 2. `.ldapbdd.toml` in the current working directory
/// 3. `.ldapbdd.toml` in the home directory
/// 4. `~/.config/ldapbdd/config.toml` (XDG default)
#[derive(Debug, Clone, Default, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(
    prefix = "LDAPBDD",
    post_merge_hook,
    discovery(
        app_name = "ldapbdd",
        env_var = "LDAPBDD_CONFIG_PATH",
        config_file_name = "config.toml",
        dotfile_name = ".ldapbdd.toml",
        config_cli_long = "config",
        config_cli_visible = true,
    )
)]
pub struct AppConfig {
    /// LDAP server URL, for example `ldap://localhost:389`.
    pub server_url: Option<String>,

    /// Base DN under which scenarios create and search entries.
    pub root_dn: Option<String>,

    /// Setup-hook behaviour.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub scenario: ScenarioHooksConfig,

    /// Bind credentials.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub authentication: AuthenticationConfig,

    /// Connection settings.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub connection: ConnectionConfig,
}

impl AppConfig {
    /// The configured server URL, or [`DEFAULT_SERVER_URL`].
    #[must_use]
    pub fn server_url(&self) -> &str {
        self.server_url.as_deref().unwrap_or(DEFAULT_SERVER_URL)
    }

    /// The connection timeout.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the timeout is zero.
    pub fn connection_timeout(&self) -> Result<Duration> {
        if self.connection.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: String::from("connection.timeout_secs"),
                reason: String::from("must be greater than zero"),
            }
            .into());
        }
        Ok(Duration::from_secs(self.connection.timeout_secs))
    }

    /// Builds the per-scenario settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingRequired` if `root_dn` is unset, or if
    /// binding before scenarios is enabled without
    /// `authentication.principal`.
    pub fn scenario_config(&self) -> Result<ScenarioConfig> {
        let root_dn = self
            .root_dn
            .clone()
            .ok_or_else(|| ConfigError::MissingRequired {
                field: String::from("root_dn"),
            })?;
        let credentials = self.authentication.credentials();
        if self.scenario.bind_before && credentials.is_none() {
            return Err(ConfigError::MissingRequired {
                field: String::from("authentication.principal"),
            }
            .into());
        }
        Ok(ScenarioConfig {
            root_dn,
            bind_before_scenario: self.scenario.bind_before,
            purge_before_scenario: self.scenario.purge_before,
            credentials,
        })
    }
}

/// Trims a value, treating blank strings as unset.
fn normalise(value: &mut Option<String>) {
    *value = value
        .take()
        .map(|raw| raw.trim().to_owned())
        .filter(|trimmed| !trimmed.is_empty());
}

impl PostMergeHook for AppConfig {
    fn post_merge(&mut self, _ctx: &PostMergeContext) -> OrthoResult<()> {
        normalise(&mut self.server_url);
        normalise(&mut self.root_dn);
        normalise(&mut self.authentication.principal);
        Ok(())
    }
}
