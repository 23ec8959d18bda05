//! Declarative startup configuration for Horizon.
//!
//! A table of [`OptionDescriptor`]s is the single source of truth for every
//! tunable. The table registers command-line flags, resolves each option
//! from the command line, environment or default, validates the result and
//! assembles an immutable [`Config`]. Nothing here exits the process; every
//! failure is a [`ConfigError`] for the caller to report.

mod descriptor;
mod error;
pub mod gate;
mod model;
mod pipeline;
pub mod registrar;
pub mod resolver;
mod table;
pub mod validate;

/// Option descriptor model and table.
pub use descriptor::{
    CustomResolver, OptionDescriptor, OptionTable, OptionValue, ValueKind, kebab_to_constant_case,
};
/// Public error type returned by every resolution step.
pub use error::ConfigError;
/// Schema gate and its collaborator contract.
pub use gate::{MigrationStatus, SchemaGate};
/// Resolved configuration types.
pub use model::*;
pub use pipeline::resolve;
/// Flag registration and raw-value sources.
pub use registrar::{EnvSource, ProcessEnv, RawSources, RawValue, ValueOrigin, register_flags};
pub use resolver::ResolutionContext;
pub use table::{DATABASE_URL_OPTION, TEST_NETWORK_PASSPHRASE};
