//! Single-pass startup resolution.
//!
//! Order is part of the contract because it decides which diagnostic an
//! operator sees first: schema gate, required fields, per-option
//! resolution in table order, cross-field checks, assembly. The first
//! failure wins.

use log::info;

use crate::gate::SchemaGate;
use crate::registrar::RawSources;
use crate::resolver::ResolutionContext;
use crate::table::DATABASE_URL_OPTION;
use crate::validate::{check_cross_fields, check_required, missing_required};
use crate::{ConfigError, OptionTable, Resolved};

/// Resolve `table` against `sources`, gated on the schema state.
pub fn resolve(
    table: &OptionTable,
    sources: &RawSources<'_>,
    gate: &SchemaGate<'_>,
) -> Result<Resolved, ConfigError> {
    let locator = table.get(DATABASE_URL_OPTION).ok_or_else(|| {
        ConfigError::InvalidTable(format!("missing the {DATABASE_URL_OPTION} option"))
    })?;
    let store = sources.raw(locator).text;
    if store.is_empty() {
        return Err(missing_required(locator));
    }
    gate.check(&store)?;

    check_required(table, sources)?;

    let mut ctx = ResolutionContext::new(sources);
    for descriptor in table.iter() {
        ctx.apply(descriptor)?;
    }

    check_cross_fields(table, &ctx)?;

    let resolved = ctx.assemble();
    info!(
        "configuration resolved (port={}, ingest={}, log_level={})",
        resolved.config.port, resolved.config.ingest, resolved.config.log_level
    );
    Ok(resolved)
}
