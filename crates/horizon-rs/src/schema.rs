//! Schema migration status read from a SQLite store.
//!
//! The binary embeds the ordered list of migrations it was built with.
//! The store records applied migrations in `gorp_migrations`; comparing the
//! two tells the startup gate whether the schema is behind or ahead.

use horizon_rs_config::{ConfigError, MigrationStatus};
use log::debug;
use rusqlite::{Connection, OpenFlags};
use std::collections::HashSet;

/// Migrations this build of Horizon expects, oldest first.
pub const MIGRATIONS: &[&str] = &[
    "1_initial_schema.sql",
    "2_index_participants_by_toid.sql",
    "3_use_sequence_in_history_accounts.sql",
    "4_add_protocol_version.sql",
    "5_create_trades_table.sql",
    "6_create_assets_table.sql",
    "7_modify_trades_table.sql",
    "8_create_asset_stats_table.sql",
];

const MIGRATIONS_TABLE: &str = "gorp_migrations";

/// [`MigrationStatus`] over a SQLite database named by `sqlite://path` or a bare path.
pub struct SqliteMigrations {
    known: Vec<String>,
}

impl SqliteMigrations {
    /// Status against the migrations compiled into this binary.
    pub fn embedded() -> Self {
        Self::new(MIGRATIONS.iter().copied())
    }

    pub fn new<I, S>(known: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            known: known.into_iter().map(Into::into).collect(),
        }
    }

    fn applied(&self, locator: &str) -> Result<HashSet<String>, ConfigError> {
        let path = store_path(locator);
        debug!("reading applied migrations (path={path})");
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|err| status_error(locator, err))?;

        let tracked: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [MIGRATIONS_TABLE],
                |row| row.get(0),
            )
            .map_err(|err| status_error(locator, err))?;
        if tracked == 0 {
            return Ok(HashSet::new());
        }

        let mut stmt = conn
            .prepare(&format!("SELECT id FROM {MIGRATIONS_TABLE}"))
            .map_err(|err| status_error(locator, err))?;
        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|err| status_error(locator, err))?
            .collect::<Result<HashSet<_>, _>>()
            .map_err(|err| status_error(locator, err))?;
        Ok(ids)
    }
}

impl MigrationStatus for SqliteMigrations {
    fn pending_up(&self, locator: &str) -> Result<usize, ConfigError> {
        let applied = self.applied(locator)?;
        Ok(self
            .known
            .iter()
            .filter(|id| !applied.contains(id.as_str()))
            .count())
    }

    fn pending_down(&self, locator: &str) -> Result<usize, ConfigError> {
        let known: HashSet<&str> = self.known.iter().map(String::as_str).collect();
        Ok(self
            .applied(locator)?
            .iter()
            .filter(|id| !known.contains(id.as_str()))
            .count())
    }
}

fn store_path(locator: &str) -> &str {
    locator.strip_prefix("sqlite://").unwrap_or(locator)
}

fn status_error(locator: &str, err: rusqlite::Error) -> ConfigError {
    ConfigError::MigrationStatus(format!("{locator}: {err}"))
}
