//! Semantic error types for ldapbdd.
//!
//! Scenario steps report failures through the enums below (via `thiserror`) so
//! a step runner can tell a broken setup from a failed expectation, while the
//! `ldapbdd` binary converts everything into an opaque `eyre::Report` at its
//! boundary.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file was not found at the expected path.
    #[error("configuration file not found: {path}")]
    FileNotFound {
        /// The path where the configuration file was expected.
        path: PathBuf,
    },

    /// The configuration file could not be parsed.
    #[error("failed to parse configuration file: {message}")]
    ParseError {
        /// A description of the parse error.
        message: String,
    },

    /// A required configuration value is missing.
    #[error("missing required configuration: {field}")]
    MissingRequired {
        /// The name of the missing field.
        field: String,
    },

    /// A configuration value failed validation.
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// The name of the invalid field.
        field: String,
        /// The reason the value is invalid.
        reason: String,
    },

    /// The `OrthoConfig` library returned an error during configuration loading.
    #[error("configuration loading failed: {0}")]
    OrthoConfig(Arc<ortho_config::OrthoError>),
}

/// Errors raised by the per-scenario setup hook.
///
/// A setup error is fatal: the scenario cannot run any of its steps.
#[derive(Debug, Error)]
pub enum SetupError {
    /// Binding was requested but no credentials were configured.
    #[error("bind before scenario is enabled but no credentials are configured")]
    MissingCredentials,

    /// The directory rejected the configured credentials.
    #[error("scenario setup failed to bind as '{principal}': {source}")]
    BindFailed {
        /// The principal used for the bind.
        principal: String,
        /// The underlying directory failure.
        #[source]
        source: DirectoryError,
    },

    /// Entries below the root DN could not be removed.
    #[error("scenario setup failed to purge entries under '{root_dn}': {source}")]
    PurgeFailed {
        /// The root DN being purged.
        root_dn: String,
        /// The underlying directory failure.
        #[source]
        source: DirectoryError,
    },
}

/// Errors reported by the directory client for individual operations.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The LDAP server could not be reached.
    #[error("failed to connect to LDAP server at {url}: {message}")]
    ConnectionFailed {
        /// The server URL.
        url: String,
        /// A description of the connection failure.
        message: String,
    },

    /// A bind operation failed.
    #[error("LDAP bind as '{principal}' failed: {message}")]
    BindFailed {
        /// The principal used for the bind.
        principal: String,
        /// A description of the failure, including the result code when known.
        message: String,
    },

    /// An add operation failed.
    #[error("failed to add LDAP entry '{dn}': {message}")]
    AddFailed {
        /// The distinguished name of the entry.
        dn: String,
        /// A description of the failure.
        message: String,
    },

    /// A search operation failed.
    #[error("LDAP search \"{filter}\" under '{base_dn}' failed: {message}")]
    SearchFailed {
        /// The search base.
        base_dn: String,
        /// The search filter.
        filter: String,
        /// A description of the failure.
        message: String,
    },

    /// A search completed without producing a result object.
    #[error("LDAP request \"{filter}\" has failed: no result returned")]
    NoResult {
        /// The search filter.
        filter: String,
    },

    /// A delete operation failed.
    #[error("failed to delete LDAP entry '{dn}': {message}")]
    DeleteFailed {
        /// The distinguished name of the entry.
        dn: String,
        /// A description of the failure.
        message: String,
    },
}

/// Errors raised while turning a scenario data table into directory entries.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    /// The table has no header row.
    #[error("entry table is empty: a header row with a 'cn' column is required")]
    Empty,

    /// The header row has no `cn` column.
    #[error("entry table has no 'cn' column (columns: {columns})")]
    MissingCnColumn {
        /// The header columns that were present.
        columns: String,
    },

    /// A data row has a different number of cells than the header.
    #[error("entry table row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        /// One-based index of the data row.
        row: usize,
        /// Number of header columns.
        expected: usize,
        /// Number of cells in the row.
        actual: usize,
    },

    /// A data row has an empty `cn` cell.
    #[error("entry table row {row} has an empty 'cn' value")]
    EmptyCn {
        /// One-based index of the data row.
        row: usize,
    },
}

/// Violated scenario expectations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssertionError {
    /// A filtered search returned an unexpected number of entries.
    #[error("LDAP request \"{filter}\" has returned {actual} result(s), expected {expected}")]
    CountMismatch {
        /// The search filter.
        filter: String,
        /// The expected number of entries.
        expected: usize,
        /// The number of entries returned.
        actual: usize,
    },

    /// A filtered search produced no result object to count.
    #[error("LDAP request \"{filter}\" returned no result, expected {expected} result(s)")]
    NoResult {
        /// The search filter.
        filter: String,
        /// The expected number of entries.
        expected: usize,
    },

    /// No entry matched the requested `cn`.
    #[error("unknown entry cn={cn} in LDAP")]
    UnknownEntry {
        /// The requested common name.
        cn: String,
    },

    /// The first entry matching a `cn` lacks the requested object class.
    #[error("the entry cn={cn} is not a {object_class} ({})", actual.join(","))]
    ObjectClassMissing {
        /// The requested common name.
        cn: String,
        /// The object class that was expected.
        object_class: String,
        /// The object classes the entry actually has.
        actual: Vec<String>,
    },

    /// A step needed the last search result but no search has run yet.
    #[error("no LDAP search has been performed in this scenario")]
    NoSearchPerformed,

    /// The last search returned an unexpected number of entries.
    #[error("LDAP request has returned {actual} entries, expected {expected}")]
    ResultCountMismatch {
        /// The expected number of entries.
        expected: usize,
        /// The number of entries returned.
        actual: usize,
    },

    /// An entry in the last search result lacks an attribute.
    #[error("entry {dn} has no attribute {attribute}")]
    MissingAttribute {
        /// The entry's distinguished name.
        dn: String,
        /// The missing attribute.
        attribute: String,
    },

    /// An entry in the last search result lacks an attribute value.
    #[error("entry {dn} has {attribute} with values {}, expected {expected}", actual.join(","))]
    AttributeValueMismatch {
        /// The entry's distinguished name.
        dn: String,
        /// The attribute that was inspected.
        attribute: String,
        /// The value that was expected among the attribute's values.
        expected: String,
        /// The attribute's actual values.
        actual: Vec<String>,
    },
}

/// Top-level error type for ldapbdd.
///
/// Aggregates the domain errors so each scenario step can return a single
/// error type. The binary converts these to `eyre::Report` for display.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// An error occurred during configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The setup hook failed.
    #[error(transparent)]
    Setup(#[from] SetupError),

    /// A directory operation failed.
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// An entry table was malformed.
    #[error(transparent)]
    Table(#[from] TableError),

    /// An expectation was violated.
    #[error(transparent)]
    Assertion(#[from] AssertionError),
}

/// A specialised `Result` type for ldapbdd operations.
pub type Result<T> = std::result::Result<T, ScenarioError>;
