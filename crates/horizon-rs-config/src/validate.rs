//! Required-field and cross-field validation.

use log::debug;

use crate::registrar::RawSources;
use crate::resolver::ResolutionContext;
use crate::resolver::custom::parse_url;
use crate::{Config, ConfigError, OptionDescriptor, OptionTable};

/// Flag name whose raw value is re-checked as the friendbot redirect URL.
const FRIENDBOT_URL_OPTION: &str = "friendbot-url";

/// Fail on the first required option whose effective value is blank.
pub fn check_required(table: &OptionTable, sources: &RawSources<'_>) -> Result<(), ConfigError> {
    for descriptor in table.iter().filter(|descriptor| descriptor.required) {
        if sources.raw(descriptor).text.is_empty() {
            return Err(missing_required(descriptor));
        }
    }
    Ok(())
}

pub(crate) fn missing_required(descriptor: &OptionDescriptor) -> ConfigError {
    ConfigError::MissingRequired {
        name: descriptor.name.to_string(),
        env: descriptor.env.clone(),
    }
}

/// Checks spanning more than one option, run after every field resolved.
pub fn check_cross_fields(
    table: &OptionTable,
    ctx: &ResolutionContext<'_>,
) -> Result<(), ConfigError> {
    if ctx.tls_provided() == 1 {
        return Err(incomplete_tls(ctx.config()));
    }

    // Second pass over the assembled values; a no-op once the above passed.
    check_tls_pair(ctx.config())?;
    if let Some(descriptor) = table.get(FRIENDBOT_URL_OPTION) {
        check_friendbot_url(&ctx.string(descriptor), ctx.config())?;
    }
    debug!("cross-field validation passed");
    Ok(())
}

/// Both or neither of the TLS certificate and key must be set.
pub fn check_tls_pair(config: &Config) -> Result<(), ConfigError> {
    match (config.tls_cert.is_empty(), config.tls_key.is_empty()) {
        (false, true) | (true, false) => Err(incomplete_tls(config)),
        _ => Ok(()),
    }
}

fn incomplete_tls(config: &Config) -> ConfigError {
    let missing = if config.tls_key.is_empty() {
        "key"
    } else {
        "cert"
    };
    ConfigError::IncompleteTls { missing }
}

fn check_friendbot_url(raw: &str, config: &Config) -> Result<(), ConfigError> {
    if raw.is_empty() {
        return Ok(());
    }
    let parsed = parse_url(raw)?;
    if config.friendbot_url.as_ref() != Some(&parsed) {
        return Err(ConfigError::DestinationMismatch {
            name: FRIENDBOT_URL_OPTION.to_string(),
            destination: "friendbot_url",
        });
    }
    Ok(())
}
