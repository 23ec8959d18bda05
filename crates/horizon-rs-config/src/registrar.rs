//! Flag registration and raw-value lookup across CLI, environment and defaults.

use clap::builder::BoolishValueParser;
use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use log::debug;
use std::collections::HashMap;

use crate::{OptionDescriptor, OptionTable, ValueKind};

/// Register one persistent flag per descriptor on `command`.
///
/// Flags are typed by [`ValueKind`] so clap rejects malformed command-line
/// input early. Environment variables are not bound here; [`RawSources`]
/// consults them after the command line.
pub fn register_flags(mut command: Command, table: &OptionTable) -> Command {
    for descriptor in table.iter() {
        command = command.arg(flag_for(descriptor));
    }
    command
}

fn flag_for(descriptor: &OptionDescriptor) -> Arg {
    let help = if descriptor.usage.is_empty() {
        format!("[env: {}]", descriptor.env)
    } else {
        format!("{} [env: {}]", descriptor.usage, descriptor.env)
    };
    let arg = Arg::new(descriptor.name)
        .long(descriptor.name)
        .help(help)
        .global(true);

    let arg = match descriptor.kind() {
        ValueKind::String => arg.action(ArgAction::Set).value_name("STRING"),
        // Unsigned flags accept signed input; the resolver guards the sign.
        ValueKind::Integer | ValueKind::UnsignedInteger => arg
            .action(ArgAction::Set)
            .value_name("INT")
            .allow_negative_numbers(true)
            .value_parser(value_parser!(i64)),
        ValueKind::Boolean => arg
            .action(ArgAction::Set)
            .value_name("BOOL")
            .num_args(0..=1)
            .require_equals(true)
            .default_missing_value("true")
            .value_parser(BoolishValueParser::new()),
    };

    let default = descriptor.default.to_string();
    if default.is_empty() {
        arg
    } else {
        arg.default_value(default)
    }
}

/// Read-only view of environment variables.
pub trait EnvSource {
    fn var(&self, key: &str) -> Option<String>;
}

/// The process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Which source supplied an option's effective value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueOrigin {
    CommandLine,
    Environment,
    Default,
}

/// Effective raw value of an option, still in string form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawValue {
    pub text: String,
    pub origin: ValueOrigin,
}

/// Union of parsed flags, environment and descriptor defaults.
///
/// Precedence is command line, then environment, then default. An
/// environment variable that is set but empty counts as absent.
pub struct RawSources<'a> {
    matches: &'a ArgMatches,
    env: &'a dyn EnvSource,
}

impl<'a> RawSources<'a> {
    pub fn new(matches: &'a ArgMatches, env: &'a dyn EnvSource) -> Self {
        Self { matches, env }
    }

    /// Effective raw value for `descriptor`.
    pub fn raw(&self, descriptor: &OptionDescriptor) -> RawValue {
        let raw = if let Some(text) = self.command_line(descriptor.name) {
            RawValue {
                text,
                origin: ValueOrigin::CommandLine,
            }
        } else if let Some(text) = self.env.var(&descriptor.env).filter(|v| !v.is_empty()) {
            RawValue {
                text,
                origin: ValueOrigin::Environment,
            }
        } else {
            RawValue {
                text: descriptor.default.to_string(),
                origin: ValueOrigin::Default,
            }
        };
        debug!(
            "option {} taken from {:?} (env={})",
            descriptor.name, raw.origin, descriptor.env
        );
        raw
    }

    fn command_line(&self, name: &str) -> Option<String> {
        // Unknown ids are treated as absent rather than panicking.
        let present = self.matches.try_contains_id(name).ok()?;
        if !present || self.matches.value_source(name) != Some(ValueSource::CommandLine) {
            return None;
        }
        self.matches
            .get_raw(name)?
            .last()
            .map(|value| value.to_string_lossy().into_owned())
    }
}
