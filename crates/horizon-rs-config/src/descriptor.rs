//! Declarative option descriptors and the option table.

use std::collections::HashSet;
use std::fmt;

use crate::resolver::ResolutionContext;
use crate::{ConfigError, Destination};

/// Custom coercion hook. Owns reading the raw value and writing the destination.
pub type CustomResolver = fn(&OptionDescriptor, &mut ResolutionContext<'_>) -> Result<(), ConfigError>;

/// Primitive shape of an option's raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Integer,
    UnsignedInteger,
    Boolean,
}

impl ValueKind {
    /// Short human description used in coercion errors.
    pub fn expected(self) -> &'static str {
        match self {
            ValueKind::String => "a string",
            ValueKind::Integer => "an integer",
            ValueKind::UnsignedInteger => "a non-negative integer",
            ValueKind::Boolean => "a boolean",
        }
    }
}

/// Default value of an option. The empty/zero value means "no default".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    String(String),
    Integer(i64),
    /// Stored signed; the resolver range-checks before writing.
    UnsignedInteger(i64),
    Boolean(bool),
}

impl OptionValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            OptionValue::String(_) => ValueKind::String,
            OptionValue::Integer(_) => ValueKind::Integer,
            OptionValue::UnsignedInteger(_) => ValueKind::UnsignedInteger,
            OptionValue::Boolean(_) => ValueKind::Boolean,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::String(value) => f.write_str(value),
            OptionValue::Integer(value) | OptionValue::UnsignedInteger(value) => {
                write!(f, "{value}")
            }
            OptionValue::Boolean(value) => write!(f, "{value}"),
        }
    }
}

/// Complete description of one command-line/environment option.
#[derive(Clone)]
pub struct OptionDescriptor {
    pub name: &'static str,
    pub env: String,
    pub default: OptionValue,
    pub required: bool,
    pub usage: &'static str,
    pub resolver: Option<CustomResolver>,
    pub destination: Destination,
}

impl OptionDescriptor {
    fn new(name: &'static str, destination: Destination, default: OptionValue) -> Self {
        Self {
            name,
            env: kebab_to_constant_case(name),
            default,
            required: false,
            usage: "",
            resolver: None,
            destination,
        }
    }

    /// String option copied verbatim into `destination`.
    pub fn string(name: &'static str, destination: Destination, default: &str) -> Self {
        Self::new(name, destination, OptionValue::String(default.to_string()))
    }

    /// Signed base-10 integer option.
    pub fn integer(name: &'static str, destination: Destination, default: i64) -> Self {
        Self::new(name, destination, OptionValue::Integer(default))
    }

    /// Unsigned integer option; negative input is rejected at resolution.
    pub fn unsigned(name: &'static str, destination: Destination, default: u32) -> Self {
        Self::new(
            name,
            destination,
            OptionValue::UnsignedInteger(i64::from(default)),
        )
    }

    /// Boolean option.
    pub fn boolean(name: &'static str, destination: Destination, default: bool) -> Self {
        Self::new(name, destination, OptionValue::Boolean(default))
    }

    /// Override the derived environment variable name.
    pub fn env(mut self, env: &str) -> Self {
        self.env = env.to_string();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn usage(mut self, usage: &'static str) -> Self {
        self.usage = usage;
        self
    }

    /// Hand coercion and assignment to `resolver`.
    pub fn resolver(mut self, resolver: CustomResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn kind(&self) -> ValueKind {
        self.default.kind()
    }
}

impl fmt::Debug for OptionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionDescriptor")
            .field("name", &self.name)
            .field("env", &self.env)
            .field("default", &self.default)
            .field("required", &self.required)
            .field("custom_resolver", &self.resolver.is_some())
            .field("destination", &self.destination)
            .finish()
    }
}

/// Convert `kebab-case` to `CONSTANT_CASE`, e.g. `db-url` to `DB_URL`.
pub fn kebab_to_constant_case(name: &str) -> String {
    name.replace('-', "_").to_ascii_uppercase()
}

/// Ordered, structurally checked list of option descriptors.
#[derive(Debug, Clone)]
pub struct OptionTable {
    descriptors: Vec<OptionDescriptor>,
}

impl OptionTable {
    /// Build a table, rejecting blank names and duplicate names, env aliases or destinations.
    pub fn new(descriptors: Vec<OptionDescriptor>) -> Result<Self, ConfigError> {
        let mut names = HashSet::new();
        let mut envs = HashSet::new();
        let mut destinations = HashSet::new();
        for descriptor in &descriptors {
            if descriptor.name.is_empty() {
                return Err(ConfigError::InvalidTable(
                    "option descriptors require a name".to_string(),
                ));
            }
            if !names.insert(descriptor.name) {
                return Err(ConfigError::InvalidTable(format!(
                    "duplicate option name: {}",
                    descriptor.name
                )));
            }
            if !envs.insert(descriptor.env.as_str()) {
                return Err(ConfigError::InvalidTable(format!(
                    "duplicate environment variable: {}",
                    descriptor.env
                )));
            }
            if !destinations.insert(descriptor.destination) {
                return Err(ConfigError::InvalidTable(format!(
                    "destination {} is shared by more than one option (second: {})",
                    descriptor.destination, descriptor.name
                )));
            }
        }
        Ok(Self { descriptors })
    }

    pub fn iter(&self) -> impl Iterator<Item = &OptionDescriptor> {
        self.descriptors.iter()
    }

    /// Look up a descriptor by its flag name.
    pub fn get(&self, name: &str) -> Option<&OptionDescriptor> {
        self.descriptors.iter().find(|descriptor| descriptor.name == name)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
