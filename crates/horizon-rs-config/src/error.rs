//! Error types for option resolution and startup validation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned while resolving or validating the startup config.
///
/// Every variant is fatal: the caller reports it once and exits.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required option has no effective value.
    #[error(
        "Invalid config: {name} is blank. Please specify --{name} on the command line or set the {env} environment variable."
    )]
    MissingRequired { name: String, env: String },
    /// A raw value could not be coerced to the option's type.
    #[error("Invalid config: --{name} expects {expected}, got {value:?}")]
    InvalidValue {
        name: String,
        value: String,
        expected: &'static str,
    },
    /// A numeric value that must be non-negative was negative.
    #[error("Invalid config: --{name} must not be negative, got {value}")]
    NegativeValue { name: String, value: i64 },
    /// A URL option could not be parsed.
    #[error("Unable to parse URL: {value}/{source}")]
    InvalidUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    /// The log level is not one of the known severities.
    #[error("Could not parse log-level: {0}")]
    InvalidLogLevel(String),
    /// The log file could not be opened for append.
    #[error("Failed to log to file {}: {source}", .path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Only one half of the TLS certificate/key pair was supplied.
    #[error("Invalid TLS config: {missing} not configured")]
    IncompleteTls { missing: &'static str },
    /// The binary expects schema migrations the store has not applied.
    #[error(
        "There are {count} migrations to apply in the \"up\" direction. A database migration is required to run this version ({version}) of Horizon. Run \"horizon db migrate up\" to update your DB."
    )]
    PendingMigrationsUp { count: usize, version: String },
    /// The store carries schema migrations newer than the binary.
    #[error(
        "A database migration DOWN to an earlier version of the schema is required to run this version ({version}) of Horizon. Using the HIGHEST version of Horizon you have installed (not this binary), run \"horizon db migrate down {count}\"."
    )]
    PendingMigrationsDown { count: usize, version: String },
    /// The migration-status collaborator could not answer.
    #[error("failed to read schema migration status: {0}")]
    MigrationStatus(String),
    /// The option table violates its structural invariants.
    #[error("invalid option table: {0}")]
    InvalidTable(String),
    /// A resolver tried to write a value into a field of another shape.
    #[error("option --{name} cannot be stored in {destination}")]
    DestinationMismatch {
        name: String,
        destination: &'static str,
    },
}
