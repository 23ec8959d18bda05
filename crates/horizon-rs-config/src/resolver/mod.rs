//! Type-directed coercion of raw option values into [`Config`] fields.
//!
//! Options without a custom resolver are coerced by their [`ValueKind`];
//! options with one hand the whole job to it. Scratch state needed by
//! later cross-field checks lives on the [`ResolutionContext`].

pub mod custom;

use log::debug;

use crate::registrar::{RawSources, RawValue};
use crate::{Config, ConfigError, LogSettings, OptionDescriptor, Resolved, Slot, ValueKind};

/// Per-run resolution state: the config under construction plus scratch.
pub struct ResolutionContext<'a> {
    sources: &'a RawSources<'a>,
    config: Config,
    logging: LogSettings,
    tls_provided: usize,
}

impl<'a> ResolutionContext<'a> {
    pub fn new(sources: &'a RawSources<'a>) -> Self {
        Self {
            sources,
            config: Config::default(),
            logging: LogSettings::default(),
            tls_provided: 0,
        }
    }

    /// Effective raw value, with its origin.
    pub fn raw(&self, descriptor: &OptionDescriptor) -> RawValue {
        self.sources.raw(descriptor)
    }

    /// Effective value as a string.
    pub fn string(&self, descriptor: &OptionDescriptor) -> String {
        self.raw(descriptor).text
    }

    /// Effective value parsed as a base-10 signed integer.
    pub fn integer(&self, descriptor: &OptionDescriptor) -> Result<i64, ConfigError> {
        parse_integer(descriptor, &self.string(descriptor))
    }

    /// Effective value parsed signed, then range-checked into `u64`.
    pub fn unsigned(&self, descriptor: &OptionDescriptor) -> Result<u64, ConfigError> {
        let value = self.integer(descriptor)?;
        non_negative(descriptor, value)
    }

    /// Effective value parsed with the CLI boolean convention.
    pub fn boolean(&self, descriptor: &OptionDescriptor) -> Result<bool, ConfigError> {
        parse_bool(descriptor, &self.string(descriptor))
    }

    /// Borrow the field owned by `descriptor`.
    pub fn slot(&mut self, descriptor: &OptionDescriptor) -> Slot<'_> {
        self.config.slot_mut(descriptor.destination)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn logging_mut(&mut self) -> &mut LogSettings {
        &mut self.logging
    }

    /// Count one non-empty half of the TLS certificate/key pair.
    pub fn record_tls_flag(&mut self) {
        self.tls_provided += 1;
    }

    pub fn tls_provided(&self) -> usize {
        self.tls_provided
    }

    /// Resolve one descriptor into its destination.
    pub fn apply(&mut self, descriptor: &OptionDescriptor) -> Result<(), ConfigError> {
        if let Some(resolver) = descriptor.resolver {
            debug!("resolving {} with custom resolver", descriptor.name);
            return resolver(descriptor, self);
        }
        self.assign_simple(descriptor)
    }

    fn assign_simple(&mut self, descriptor: &OptionDescriptor) -> Result<(), ConfigError> {
        match descriptor.kind() {
            ValueKind::String => {
                let value = self.string(descriptor);
                match self.slot(descriptor) {
                    Slot::Text(field) => *field = value,
                    _ => return Err(mismatch(descriptor)),
                }
            }
            ValueKind::Integer => {
                let value = self.integer(descriptor)?;
                match self.slot(descriptor) {
                    Slot::Integer(field) => *field = value,
                    _ => return Err(mismatch(descriptor)),
                }
            }
            ValueKind::UnsignedInteger => {
                let value = self.unsigned(descriptor)?;
                match self.slot(descriptor) {
                    Slot::Unsigned(field) => *field = value,
                    _ => return Err(mismatch(descriptor)),
                }
            }
            ValueKind::Boolean => {
                let value = self.boolean(descriptor)?;
                match self.slot(descriptor) {
                    Slot::Flag(field) => *field = value,
                    _ => return Err(mismatch(descriptor)),
                }
            }
        }
        Ok(())
    }

    /// Hand back the assembled config and the chosen logger settings.
    pub fn assemble(self) -> Resolved {
        Resolved {
            config: self.config,
            logging: self.logging,
        }
    }
}

/// Error for a resolver writing into a field of the wrong shape.
pub(crate) fn mismatch(descriptor: &OptionDescriptor) -> ConfigError {
    ConfigError::DestinationMismatch {
        name: descriptor.name.to_string(),
        destination: descriptor.destination.field_name(),
    }
}

pub(crate) fn non_negative(descriptor: &OptionDescriptor, value: i64) -> Result<u64, ConfigError> {
    u64::try_from(value).map_err(|_| ConfigError::NegativeValue {
        name: descriptor.name.to_string(),
        value,
    })
}

fn parse_integer(descriptor: &OptionDescriptor, text: &str) -> Result<i64, ConfigError> {
    text.trim()
        .parse::<i64>()
        .map_err(|_| ConfigError::InvalidValue {
            name: descriptor.name.to_string(),
            value: text.to_string(),
            expected: ValueKind::Integer.expected(),
        })
}

/// Same literals clap's boolish parser accepts on the command line.
fn parse_bool(descriptor: &OptionDescriptor, text: &str) -> Result<bool, ConfigError> {
    match text.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" | "t" | "true" | "on" | "1" => Ok(true),
        "n" | "no" | "f" | "false" | "off" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            name: descriptor.name.to_string(),
            value: text.to_string(),
            expected: ValueKind::Boolean.expected(),
        }),
    }
}
