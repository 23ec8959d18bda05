//! Schema compatibility gate run before any option is resolved.

use log::{info, warn};

use crate::ConfigError;

/// Reports how far the persistent schema is from the one this binary expects.
pub trait MigrationStatus {
    /// Migrations this binary knows that the store has not applied.
    fn pending_up(&self, locator: &str) -> Result<usize, ConfigError>;

    /// Migrations applied to the store that this binary does not know.
    fn pending_down(&self, locator: &str) -> Result<usize, ConfigError>;
}

/// Refuses startup unless the store schema matches the binary exactly.
pub struct SchemaGate<'a> {
    status: &'a dyn MigrationStatus,
    version: &'a str,
}

impl<'a> SchemaGate<'a> {
    /// `version` is the running binary's version, quoted in diagnostics.
    pub fn new(status: &'a dyn MigrationStatus, version: &'a str) -> Self {
        Self { status, version }
    }

    /// Pass only when no migration is pending in either direction.
    pub fn check(&self, locator: &str) -> Result<(), ConfigError> {
        let up = self.status.pending_up(locator)?;
        if up > 0 {
            warn!("schema is behind this binary ({up} migrations pending)");
            return Err(ConfigError::PendingMigrationsUp {
                count: up,
                version: self.version.to_string(),
            });
        }

        let down = self.status.pending_down(locator)?;
        if down > 0 {
            warn!("schema is ahead of this binary ({down} migrations)");
            return Err(ConfigError::PendingMigrationsDown {
                count: down,
                version: self.version.to_string(),
            });
        }

        info!("schema is up to date (version={})", self.version);
        Ok(())
    }
}
