//! Scenario steps bound to directory operations.
//!
//! A [`ScenarioContext`] lives for exactly one scenario. It runs the setup hook
//! ([`ScenarioContext::before_scenario`]), creates entries from step tables,
//! runs searches, and checks expectations against the most recent search.
//!
//! The context moves through a linear sequence of [`ScenarioPhase`]s:
//! unbound, bound, populated, queried. Assertions on the last search fail with
//! [`AssertionError::NoSearchPerformed`](crate::error::AssertionError) until a
//! search step has run.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//!
//! use ldapbdd::directory::LdapDirectoryClient;
//! use ldapbdd::scenario::{Credentials, ScenarioConfig, ScenarioContext};
//!
//! # fn example() -> ldapbdd::error::Result<()> {
//! let client = LdapDirectoryClient::connect("ldap://localhost:389", Duration::from_secs(5))?;
//! let config = ScenarioConfig::new("dc=example,dc=com")
//!     .with_bind(Credentials::new("cn=admin,dc=example,dc=com", "secret"));
//! let mut context = ScenarioContext::configure(client, config);
//! context.before_scenario()?;
//! context.search("(cn=alice)")?;
//! context.assert_result_count(1)?;
//! # Ok(())
//! # }
//! ```

mod assertions;
mod context;
mod table;


pub use context::{ScenarioContext, ScenarioPhase};
pub use table::{CN_COLUMN, EntryTable, entry_dn};

/// Bind credentials used by the setup hook.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Distinguished name to bind as.
    pub principal: String,
    /// Password for the principal.
    pub password: String,
}

impl Credentials {
    /// Creates credentials for `principal`.
    #[must_use]
    pub fn new(principal: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            principal: principal.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("principal", &self.principal)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Settings fixed for the lifetime of one scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioConfig {
    /// Base DN under which entries are created and searches run.
    pub root_dn: String,
    /// Bind with [`credentials`](Self::credentials) before the scenario.
    pub bind_before_scenario: bool,
    /// Remove every entry below [`root_dn`](Self::root_dn) before the scenario.
    pub purge_before_scenario: bool,
    /// Credentials for the setup bind.
    pub credentials: Option<Credentials>,
}

impl ScenarioConfig {
    /// Creates a configuration that neither binds nor purges.
    #[must_use]
    pub fn new(root_dn: impl Into<String>) -> Self {
        Self {
            root_dn: root_dn.into(),
            bind_before_scenario: false,
            purge_before_scenario: false,
            credentials: None,
        }
    }

    /// Enables the setup bind with `credentials`.
    #[must_use]
    pub fn with_bind(mut self, credentials: Credentials) -> Self {
        self.bind_before_scenario = true;
        self.credentials = Some(credentials);
        self
    }

    /// Enables purging below the root DN during setup.
    #[must_use]
    pub const fn with_purge(mut self) -> Self {
        self.purge_before_scenario = true;
        self
    }
}
