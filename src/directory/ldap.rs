//! [`DirectoryClient`] backed by the synchronous `ldap3` connection.

use std::collections::HashSet;
use std::time::Duration;

use ldap3::{LdapConn, LdapConnSettings, LdapResult, Scope, SearchEntry};
use tracing::{debug, instrument};

use super::{DirectoryClient, DirectoryEntry, SearchResult};
use crate::error::DirectoryError;

/// LDAP result code for a successful operation.
const SUCCESS: u32 = 0;

/// LDAP result code returned when the search base does not exist.
const NO_SUCH_OBJECT: u32 = 32;

/// Attribute selector requesting every user attribute.
const ALL_USER_ATTRIBUTES: &str = "*";

/// A blocking connection to an LDAP server.
pub struct LdapDirectoryClient {
    conn: LdapConn,
    url: String,
}

impl LdapDirectoryClient {
    /// Opens a connection to `url` (`ldap://host:port`).
    ///
    /// No bind is performed; the connection starts anonymous.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::ConnectionFailed`] if the URL is invalid or
    /// the server cannot be reached within `timeout`.
    pub fn connect(url: &str, timeout: Duration) -> Result<Self, DirectoryError> {
        debug!(url, timeout_secs = timeout.as_secs(), "connecting to LDAP server");
        let settings = LdapConnSettings::new().set_conn_timeout(timeout);
        let conn = LdapConn::with_settings(settings, url).map_err(|error| {
            DirectoryError::ConnectionFailed {
                url: url.to_owned(),
                message: error.to_string(),
            }
        })?;
        Ok(Self {
            conn,
            url: url.to_owned(),
        })
    }

    /// The URL this client is connected to.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl std::fmt::Debug for LdapDirectoryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LdapDirectoryClient")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl DirectoryClient for LdapDirectoryClient {
    #[instrument(skip(self, password))]
    fn bind(&mut self, principal: &str, password: &str) -> Result<(), DirectoryError> {
        let failed = |message: String| DirectoryError::BindFailed {
            principal: principal.to_owned(),
            message,
        };
        let result = self
            .conn
            .simple_bind(principal, password)
            .map_err(|error| failed(error.to_string()))?;
        check_result(&result).map_err(failed)
    }

    #[instrument(skip(self, entry), fields(dn = entry.distinguished_name()))]
    fn add(&mut self, entry: &DirectoryEntry) -> Result<(), DirectoryError> {
        let failed = |message: String| DirectoryError::AddFailed {
            dn: entry.distinguished_name().to_owned(),
            message,
        };
        // Value order is not preserved on the wire.
        let attributes: Vec<(&str, HashSet<&str>)> = entry
            .attributes()
            .map(|(name, values)| (name, values.iter().map(String::as_str).collect()))
            .collect();
        let result = self
            .conn
            .add(entry.distinguished_name(), attributes)
            .map_err(|error| failed(error.to_string()))?;
        check_result(&result).map_err(failed)
    }

    #[instrument(skip(self))]
    fn search(
        &mut self,
        base_dn: &str,
        filter: &str,
    ) -> Result<Option<SearchResult>, DirectoryError> {
        let failed = |message: String| DirectoryError::SearchFailed {
            base_dn: base_dn.to_owned(),
            filter: filter.to_owned(),
            message,
        };
        let ldap3::SearchResult(raw_entries, result) = self
            .conn
            .search(base_dn, Scope::Subtree, filter, vec![ALL_USER_ATTRIBUTES])
            .map_err(|error| failed(error.to_string()))?;

        if result.rc == NO_SUCH_OBJECT {
            debug!(rc = result.rc, "search base does not exist");
            return Ok(None);
        }
        check_result(&result).map_err(failed)?;

        let entries: SearchResult = raw_entries
            .into_iter()
            .map(SearchEntry::construct)
            .map(entry_from_search)
            .collect();
        debug!(count = entries.count(), "search completed");
        Ok(Some(entries))
    }

    #[instrument(skip(self))]
    fn delete(&mut self, dn: &str) -> Result<(), DirectoryError> {
        let failed = |message: String| DirectoryError::DeleteFailed {
            dn: dn.to_owned(),
            message,
        };
        let result = self
            .conn
            .delete(dn)
            .map_err(|error| failed(error.to_string()))?;
        check_result(&result).map_err(failed)
    }
}

/// Maps a non-success LDAP result to a message carrying the code and text.
fn check_result(result: &LdapResult) -> Result<(), String> {
    if result.rc == SUCCESS {
        Ok(())
    } else {
        Err(describe_result_code(result.rc, &result.text))
    }
}

/// Formats an LDAP result code and diagnostic text for error messages.
fn describe_result_code(rc: u32, text: &str) -> String {
    if text.is_empty() {
        format!("result code {rc}")
    } else {
        format!("result code {rc}: {text}")
    }
}

/// Converts an `ldap3` search entry, dropping binary-only attributes.
fn entry_from_search(raw: SearchEntry) -> DirectoryEntry {
    raw.attrs
        .into_iter()
        .fold(DirectoryEntry::new(raw.dn), |entry, (name, values)| {
            entry.with_attribute(name, values)
        })
}
