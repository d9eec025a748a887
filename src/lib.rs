//! Behaviour-driven scenario steps for exercising an LDAP directory.
//!
//! `ldapbdd` binds natural-language scenario steps to directory operations:
//! creating entries from tables, counting search results, checking that an
//! entry carries an object class, and asserting attribute values across the
//! entries of the most recent search.
//!
//! Each scenario owns a [`scenario::ScenarioContext`] holding the directory
//! client, the scenario settings, and the last search result. A setup hook can
//! bind and purge the root DN before the steps run.
//!
//! # Modules
//!
//! - [`config`]: Configuration system with layered precedence (CLI > env > file > defaults)
//! - [`directory`]: Directory client abstraction and the `ldap3` implementation
//! - [`error`]: Semantic error types for the application
//! - [`scenario`]: Per-scenario state, step operations and assertions

pub mod config;
pub mod directory;
pub mod error;
pub mod scenario;
