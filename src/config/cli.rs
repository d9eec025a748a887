//! Command-line argument definitions for ldapbdd.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

/// Command-line interface for ldapbdd.
#[derive(Debug, Parser)]
#[command(name = "ldapbdd")]
#[command(
    author,
    version,
    about = "Run scenario steps against an LDAP directory"
)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file.
    #[arg(long, global = true)]
    pub config: Option<Utf8PathBuf>,

    /// LDAP server URL.
    #[arg(long, global = true)]
    pub server_url: Option<String>,

    /// Base DN for entries and searches.
    #[arg(long, global = true)]
    pub root_dn: Option<String>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Connect and run the scenario setup hook.
    Check,

    /// Search under the root DN and list matching entries.
    Search(SearchArgs),

    /// Assert that a filter matches an exact number of entries.
    Count(CountArgs),
}

/// Arguments for the `search` subcommand.
#[derive(Debug, Parser)]
pub struct SearchArgs {
    /// LDAP filter, for example `(cn=alice)`.
    #[arg(required = true)]
    pub filter: String,
}

/// Arguments for the `count` subcommand.
#[derive(Debug, Parser)]
pub struct CountArgs {
    /// LDAP filter, for example `(objectClass=person)`.
    #[arg(required = true)]
    pub filter: String,

    /// Expected number of matching entries.
    #[arg(required = true)]
    pub expected: usize,
}
