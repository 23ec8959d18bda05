//! Horizon entry point.
//!
//! Resolves the startup configuration exactly once. Any configuration or
//! schema problem is reported as a single line on stderr and the process
//! exits with a non-zero status before anything is served.

mod logging;
mod schema;

use clap::Command;
use horizon_rs_config::{
    OptionTable, ProcessEnv, RawSources, Resolved, SchemaGate, register_flags, resolve,
};
use log::info;
use schema::SqliteMigrations;
use std::process::ExitCode;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const CHECK_CONFIG: &str = "check-config";

/// Root command with every option registered as a persistent flag.
fn command(table: &OptionTable) -> Command {
    let command = Command::new("horizon")
        .version(VERSION)
        .about("client-facing api server for the stellar network")
        .subcommand(
            Command::new(CHECK_CONFIG)
                .about("Resolve the configuration, print it with secrets redacted and exit"),
        );
    register_flags(command, table)
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<()> {
    let table = OptionTable::horizon()?;
    let matches = command(&table).get_matches();
    // Persistent flags are visible on the deepest subcommand's matches.
    let (subcommand, matches) = match matches.subcommand() {
        Some((name, sub)) => (Some(name), sub),
        None => (None, &matches),
    };

    let env = ProcessEnv;
    let sources = RawSources::new(matches, &env);
    let migrations = SqliteMigrations::embedded();
    let gate = SchemaGate::new(&migrations, VERSION);
    let Resolved { config, logging } = resolve(&table, &sources, &gate)?;
    logging::install(logging)?;

    if subcommand == Some(CHECK_CONFIG) {
        println!("{}", serde_json::to_string_pretty(&config.redacted())?);
        return Ok(());
    }

    info!(
        "horizon {VERSION} configured (port={}, ingest={}, tls={})",
        config.port,
        config.ingest,
        !config.tls_cert.is_empty()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_rs_config::ValueOrigin;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn command_is_well_formed() {
        let table = OptionTable::horizon().expect("table");
        command(&table).debug_assert();
    }

    /// Flags given after a subcommand still reach resolution.
    #[test]
    fn flags_are_persistent_across_subcommands() {
        let table = OptionTable::horizon().expect("table");
        let matches = command(&table)
            .try_get_matches_from(["horizon", CHECK_CONFIG, "--port", "9000"])
            .expect("matches");
        let (name, sub) = matches.subcommand().expect("subcommand");
        assert_eq!(name, CHECK_CONFIG);

        let env: HashMap<String, String> = HashMap::new();
        let sources = RawSources::new(sub, &env);
        let raw = sources.raw(table.get("port").expect("port"));
        assert_eq!(raw.text, "9000");
        assert_eq!(raw.origin, ValueOrigin::CommandLine);
    }
}
