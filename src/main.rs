//! `ldapbdd` application entry point.
//!
//! Runs the scenario setup hook and individual scenario steps against a live
//! directory from the command line. Domain errors are converted to `eyre`
//! reports at this boundary.
//!
//! Configuration is loaded with layered precedence via `OrthoConfig`:
//! 1. Application defaults
//! 2. Configuration file (`~/.config/ldapbdd/config.toml` or path from `LDAPBDD_CONFIG_PATH`)
//! 3. Environment variables (`LDAPBDD_*`)
//! 4. Command-line arguments

use clap::Parser;
use eyre::{Report, Result as EyreResult};
use ldapbdd::config::{AppConfig, Cli, Commands, CountArgs, SearchArgs, load_config};
use ldapbdd::directory::LdapDirectoryClient;
use ldapbdd::error::Result as LdapBddResult;
use ldapbdd::scenario::ScenarioContext;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Application entry point.
///
/// Installs the log subscriber, loads configuration, then dispatches to the
/// subcommand handler.
fn main() -> EyreResult<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&cli).map_err(Report::from)?;

    run(&cli, &config).map_err(Report::from)
}

/// Execute the CLI command, returning domain-specific errors.
fn run(cli: &Cli, config: &AppConfig) -> LdapBddResult<()> {
    let mut context = open_scenario(config)?;
    match &cli.command {
        Commands::Check => check(&context),
        Commands::Search(args) => search(&mut context, args),
        Commands::Count(args) => count(&mut context, args),
    }
}

/// Connects to the configured server and runs the setup hook.
fn open_scenario(config: &AppConfig) -> LdapBddResult<ScenarioContext<LdapDirectoryClient>> {
    let scenario = config.scenario_config()?;
    let client = LdapDirectoryClient::connect(config.server_url(), config.connection_timeout()?)?;
    info!(url = client.url(), "connected to LDAP server");
    let mut context = ScenarioContext::configure(client, scenario);
    context.before_scenario()?;
    Ok(context)
}

/// Report that the server accepted the connection and the setup hook.
#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
#[expect(
    clippy::unnecessary_wraps,
    reason = "shares the handler signature used by the dispatcher"
)]
fn check(context: &ScenarioContext<LdapDirectoryClient>) -> LdapBddResult<()> {
    info!(phase = ?context.phase(), "setup hook completed");
    println!("Connected; scenario setup completed ({:?}).", context.phase());
    Ok(())
}

/// Search under the root DN and print the matching DNs.
#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
fn search(
    context: &mut ScenarioContext<LdapDirectoryClient>,
    args: &SearchArgs,
) -> LdapBddResult<()> {
    let found = context.search(&args.filter)?;
    println!("{} result(s) for {}", found.count(), args.filter);
    for entry in found.entries() {
        println!("{}", entry.distinguished_name());
    }
    Ok(())
}

/// Assert the number of entries matching a filter.
#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
fn count(context: &mut ScenarioContext<LdapDirectoryClient>, args: &CountArgs) -> LdapBddResult<()> {
    context.assert_request_returns_count(&args.filter, args.expected)?;
    println!(
        "LDAP request \"{}\" returned {} result(s)",
        args.filter, args.expected
    );
    Ok(())
}
