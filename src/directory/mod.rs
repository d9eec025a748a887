//! Directory access used by scenario steps.
//!
//! Scenario code talks to the directory only through [`DirectoryClient`], so
//! steps can run against a real server ([`LdapDirectoryClient`]) or a test
//! double. The trait mirrors the handful of LDAP operations the steps need:
//! bind, add, search and delete.

mod ldap;
mod types;


pub use ldap::LdapDirectoryClient;
pub use types::{DirectoryEntry, SearchResult};

use crate::error::DirectoryError;

/// Filter matching every entry, used to enumerate a subtree.
pub const MATCH_ALL_FILTER: &str = "(objectClass=*)";

/// Blocking directory operations consumed by a scenario.
///
/// Production code uses [`LdapDirectoryClient`]; unit tests inject mocks via
/// `mockall`.
#[cfg_attr(test, mockall::automock)]
pub trait DirectoryClient {
    /// Authenticates the connection as `principal`.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::BindFailed`] when the server rejects the bind.
    fn bind(&mut self, principal: &str, password: &str) -> Result<(), DirectoryError>;

    /// Creates `entry` in the directory.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::AddFailed`] when the server rejects the entry.
    fn add(&mut self, entry: &DirectoryEntry) -> Result<(), DirectoryError>;

    /// Searches the subtree rooted at `base_dn` with `filter`.
    ///
    /// Returns `Ok(None)` when the search produced no result object, for
    /// example because `base_dn` does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::SearchFailed`] when the search itself fails.
    fn search(
        &mut self,
        base_dn: &str,
        filter: &str,
    ) -> Result<Option<SearchResult>, DirectoryError>;

    /// Removes the entry named `dn`.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::DeleteFailed`] when the server refuses.
    fn delete(&mut self, dn: &str) -> Result<(), DirectoryError>;
}
