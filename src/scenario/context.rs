//! Per-scenario state and step operations.

use std::cmp::Reverse;

use tracing::{debug, info, warn};

use super::ScenarioConfig;
use super::assertions;
use super::table::{CN_COLUMN, EntryTable};
use crate::directory::{DirectoryClient, MATCH_ALL_FILTER, SearchResult};
use crate::error::{AssertionError, DirectoryError, Result, ScenarioError, SetupError};

/// Where a scenario is in its lifecycle.
///
/// Phases only move forward within a scenario.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum ScenarioPhase {
    /// No bind has been performed.
    #[default]
    Unbound,
    /// The setup hook bound the connection.
    Bound,
    /// At least one entry table has been created.
    Populated,
    /// A search result is available to assertion steps.
    Queried,
}

/// State owned by one running scenario.
///
/// The directory client is injected; the context never shares it with other
/// scenarios.
#[derive(Debug)]
pub struct ScenarioContext<C> {
    client: C,
    config: ScenarioConfig,
    phase: ScenarioPhase,
    last_search_result: Option<SearchResult>,
}

impl<C: DirectoryClient> ScenarioContext<C> {
    /// Creates a context for one scenario. No directory I/O happens here.
    #[must_use]
    pub const fn configure(client: C, config: ScenarioConfig) -> Self {
        Self {
            client,
            config,
            phase: ScenarioPhase::Unbound,
            last_search_result: None,
        }
    }

    /// The scenario configuration.
    #[must_use]
    pub const fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    /// The current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> ScenarioPhase {
        self.phase
    }

    /// The result of the most recent [`search`](Self::search) step.
    #[must_use]
    pub const fn last_search_result(&self) -> Option<&SearchResult> {
        self.last_search_result.as_ref()
    }

    /// Runs the setup hook.
    ///
    /// Binds with the configured credentials when `bind_before_scenario` is
    /// set, then removes every entry strictly below the root DN when
    /// `purge_before_scenario` is set. The root entry itself is kept.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::MissingCredentials`] if binding is requested
    /// without credentials, [`SetupError::BindFailed`] if the bind is
    /// rejected, or [`SetupError::PurgeFailed`] if the purge cannot complete.
    pub fn before_scenario(&mut self) -> Result<()> {
        if self.config.bind_before_scenario {
            self.bind_configured()?;
        }
        if self.config.purge_before_scenario {
            let removed = self.purge_root()?;
            info!(root_dn = %self.config.root_dn, removed, "purged entries before scenario");
        }
        Ok(())
    }

    fn bind_configured(&mut self) -> std::result::Result<(), SetupError> {
        let credentials = self
            .config
            .credentials
            .as_ref()
            .ok_or(SetupError::MissingCredentials)?;
        self.client
            .bind(&credentials.principal, &credentials.password)
            .map_err(|source| SetupError::BindFailed {
                principal: credentials.principal.clone(),
                source,
            })?;
        info!(principal = %credentials.principal, "bound before scenario");
        self.advance(ScenarioPhase::Bound);
        Ok(())
    }

    fn purge_root(&mut self) -> std::result::Result<usize, SetupError> {
        let root_dn = self.config.root_dn.clone();
        let purge_failed = |source| SetupError::PurgeFailed {
            root_dn: root_dn.clone(),
            source,
        };
        let Some(found) = self
            .client
            .search(&root_dn, MATCH_ALL_FILTER)
            .map_err(purge_failed)?
        else {
            debug!(root_dn = %root_dn, "root DN absent, nothing to purge");
            return Ok(0);
        };

        // Only entries strictly below the root; the root's spelling may differ.
        let root_depth = dn_depth(&root_dn);
        let mut doomed: Vec<String> = found
            .into_entries()
            .into_iter()
            .map(|entry| entry.distinguished_name().to_owned())
            .filter(|dn| dn_depth(dn) > root_depth)
            .collect();
        doomed.sort_by_key(|dn| Reverse(dn_depth(dn)));

        for dn in &doomed {
            self.client.delete(dn).map_err(purge_failed)?;
            debug!(dn = %dn, "purged entry");
        }
        Ok(doomed.len())
    }

    /// Creates one entry per data row of `table`, in row order.
    ///
    /// The first row is the header and must contain a `cn` column. Creation
    /// is not transactional: if an add fails, earlier rows stay created.
    ///
    /// # Errors
    ///
    /// Returns a [`TableError`](crate::error::TableError) for a malformed
    /// table (before any add is attempted) or the
    /// [`DirectoryError`](crate::error::DirectoryError) of the first failed add.
    pub fn create_entries(&mut self, table: &[Vec<String>]) -> Result<usize> {
        let parsed = EntryTable::parse(table)?;
        if parsed.is_empty() {
            debug!("entry table has no data rows");
            return Ok(0);
        }
        for entry in parsed.entries(&self.config.root_dn) {
            self.client.add(&entry)?;
            debug!(dn = entry.distinguished_name(), "created entry");
        }
        info!(count = parsed.len(), "created LDAP entries");
        self.advance(ScenarioPhase::Populated);
        Ok(parsed.len())
    }

    /// Checks that a search with `filter` under the root DN returns exactly
    /// `expected` entries.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionError::NoResult`] or
    /// [`AssertionError::CountMismatch`] when the expectation fails, or the
    /// directory error if the search itself fails.
    pub fn assert_request_returns_count(&mut self, filter: &str, expected: usize) -> Result<()> {
        let found = self.client.search(&self.config.root_dn, filter)?;
        assertions::request_count(filter, expected, found.as_ref()).map_err(assertion_failed)
    }

    /// Checks that the first entry named `cn` lists `object_class`.
    ///
    /// Only the first match is inspected even when several entries share the
    /// same `cn`.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionError::UnknownEntry`] when nothing matches,
    /// [`AssertionError::ObjectClassMissing`] when the class is absent, or the
    /// directory error if the search itself fails.
    pub fn assert_objectclass_with_cn_exists(&mut self, object_class: &str, cn: &str) -> Result<()> {
        let filter = format!("({CN_COLUMN}={cn})");
        let found = self.client.search(&self.config.root_dn, &filter)?;
        assertions::first_has_object_class(cn, object_class, found.as_ref())
            .map_err(assertion_failed)
    }

    /// Searches under the root DN and keeps the result for later steps,
    /// replacing any earlier result.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::NoResult`](crate::error::DirectoryError) when
    /// the search produces no result object, or the directory error if the
    /// search itself fails.
    pub fn search(&mut self, filter: &str) -> Result<&SearchResult> {
        let found = self
            .client
            .search(&self.config.root_dn, filter)?
            .ok_or_else(|| DirectoryError::NoResult {
                filter: filter.to_owned(),
            })?;
        info!(filter, count = found.count(), "LDAP search stored");
        self.advance(ScenarioPhase::Queried);
        Ok(self.last_search_result.insert(found))
    }

    /// Checks the number of entries returned by the last search.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionError::NoSearchPerformed`] before any search, or
    /// [`AssertionError::ResultCountMismatch`].
    pub fn assert_result_count(&self, expected: usize) -> Result<()> {
        assertions::result_count(self.stored_result()?, expected).map_err(assertion_failed)
    }

    /// Checks that every entry of the last search has `attribute` with
    /// `value` among its values. An empty result passes.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionError::NoSearchPerformed`] before any search, or the
    /// first [`AssertionError::MissingAttribute`] /
    /// [`AssertionError::AttributeValueMismatch`] encountered.
    pub fn assert_all_have_attribute_value(&self, attribute: &str, value: &str) -> Result<()> {
        assertions::all_have_attribute_value(self.stored_result()?, attribute, value)
            .map_err(assertion_failed)
    }

    /// Checks that every entry of the last search has `attribute`. An empty
    /// result passes.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionError::NoSearchPerformed`] before any search, or the
    /// first [`AssertionError::MissingAttribute`] encountered.
    pub fn assert_all_have_attribute_defined(&self, attribute: &str) -> Result<()> {
        assertions::all_have_attribute_defined(self.stored_result()?, attribute)
            .map_err(assertion_failed)
    }

    fn stored_result(&self) -> Result<&SearchResult> {
        self.last_search_result
            .as_ref()
            .ok_or_else(|| assertion_failed(AssertionError::NoSearchPerformed))
    }

    fn advance(&mut self, next: ScenarioPhase) {
        self.phase = self.phase.max(next);
    }
}

fn assertion_failed(error: AssertionError) -> ScenarioError {
    warn!(%error, "scenario expectation failed");
    error.into()
}

/// Number of RDN components in `dn`, ignoring escaped commas.
fn dn_depth(dn: &str) -> usize {
    let mut depth = 1;
    let mut escaped = false;
    for ch in dn.chars() {
        match (escaped, ch) {
            (true, _) => escaped = false,
            (false, '\\') => escaped = true,
            (false, ',') => depth += 1,
            _ => {}
        }
    }
    depth
}
