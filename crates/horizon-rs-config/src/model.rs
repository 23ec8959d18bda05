//! Resolved runtime configuration for Horizon.

use log::LevelFilter;
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

use crate::ConfigError;

/// Burst allowance paired with every configured hourly rate limit.
pub const RATE_LIMIT_BURST: u32 = 100;

/// Final configuration handed to the rest of the service.
///
/// Built once by the resolver and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Config {
    pub database_url: String,
    pub stellar_core_database_url: String,
    pub stellar_core_url: String,
    pub port: i64,
    pub max_db_connections: i64,
    pub sse_update_frequency: Duration,
    pub connection_timeout: Duration,
    pub rate_limit: Option<RateQuota>,
    pub rate_limit_redis_key: String,
    pub redis_url: String,
    pub friendbot_url: Option<Url>,
    pub log_level: LogLevel,
    pub log_file: String,
    pub max_path_length: u64,
    pub network_passphrase: String,
    pub sentry_dsn: String,
    pub loggly_token: String,
    pub loggly_tag: String,
    pub tls_cert: String,
    pub tls_key: String,
    pub ingest: bool,
    pub history_retention_count: u64,
    pub history_stale_threshold: u64,
    pub skip_cursor_update: bool,
    pub enable_asset_stats: bool,
}

/// Identifies exactly one field of [`Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Destination {
    DatabaseUrl,
    StellarCoreDatabaseUrl,
    StellarCoreUrl,
    Port,
    MaxDbConnections,
    SseUpdateFrequency,
    ConnectionTimeout,
    RateLimit,
    RateLimitRedisKey,
    RedisUrl,
    FriendbotUrl,
    LogLevel,
    LogFile,
    MaxPathLength,
    NetworkPassphrase,
    SentryDsn,
    LogglyToken,
    LogglyTag,
    TlsCert,
    TlsKey,
    Ingest,
    HistoryRetentionCount,
    HistoryStaleThreshold,
    SkipCursorUpdate,
    EnableAssetStats,
}

impl Destination {
    /// Every field of [`Config`], in declaration order.
    pub const ALL: [Destination; 25] = [
        Destination::DatabaseUrl,
        Destination::StellarCoreDatabaseUrl,
        Destination::StellarCoreUrl,
        Destination::Port,
        Destination::MaxDbConnections,
        Destination::SseUpdateFrequency,
        Destination::ConnectionTimeout,
        Destination::RateLimit,
        Destination::RateLimitRedisKey,
        Destination::RedisUrl,
        Destination::FriendbotUrl,
        Destination::LogLevel,
        Destination::LogFile,
        Destination::MaxPathLength,
        Destination::NetworkPassphrase,
        Destination::SentryDsn,
        Destination::LogglyToken,
        Destination::LogglyTag,
        Destination::TlsCert,
        Destination::TlsKey,
        Destination::Ingest,
        Destination::HistoryRetentionCount,
        Destination::HistoryStaleThreshold,
        Destination::SkipCursorUpdate,
        Destination::EnableAssetStats,
    ];

    /// Field name as it appears on [`Config`].
    pub fn field_name(self) -> &'static str {
        match self {
            Destination::DatabaseUrl => "database_url",
            Destination::StellarCoreDatabaseUrl => "stellar_core_database_url",
            Destination::StellarCoreUrl => "stellar_core_url",
            Destination::Port => "port",
            Destination::MaxDbConnections => "max_db_connections",
            Destination::SseUpdateFrequency => "sse_update_frequency",
            Destination::ConnectionTimeout => "connection_timeout",
            Destination::RateLimit => "rate_limit",
            Destination::RateLimitRedisKey => "rate_limit_redis_key",
            Destination::RedisUrl => "redis_url",
            Destination::FriendbotUrl => "friendbot_url",
            Destination::LogLevel => "log_level",
            Destination::LogFile => "log_file",
            Destination::MaxPathLength => "max_path_length",
            Destination::NetworkPassphrase => "network_passphrase",
            Destination::SentryDsn => "sentry_dsn",
            Destination::LogglyToken => "loggly_token",
            Destination::LogglyTag => "loggly_tag",
            Destination::TlsCert => "tls_cert",
            Destination::TlsKey => "tls_key",
            Destination::Ingest => "ingest",
            Destination::HistoryRetentionCount => "history_retention_count",
            Destination::HistoryStaleThreshold => "history_stale_threshold",
            Destination::SkipCursorUpdate => "skip_cursor_update",
            Destination::EnableAssetStats => "enable_asset_stats",
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

/// Mutable borrow of a single [`Config`] field, tagged by its shape.
#[derive(Debug)]
pub enum Slot<'a> {
    Text(&'a mut String),
    Integer(&'a mut i64),
    Unsigned(&'a mut u64),
    Flag(&'a mut bool),
    Duration(&'a mut Duration),
    Url(&'a mut Option<Url>),
    LogLevel(&'a mut LogLevel),
    RateLimit(&'a mut Option<RateQuota>),
}

impl Config {
    /// Borrow the field named by `destination`.
    pub fn slot_mut(&mut self, destination: Destination) -> Slot<'_> {
        match destination {
            Destination::DatabaseUrl => Slot::Text(&mut self.database_url),
            Destination::StellarCoreDatabaseUrl => Slot::Text(&mut self.stellar_core_database_url),
            Destination::StellarCoreUrl => Slot::Text(&mut self.stellar_core_url),
            Destination::Port => Slot::Integer(&mut self.port),
            Destination::MaxDbConnections => Slot::Integer(&mut self.max_db_connections),
            Destination::SseUpdateFrequency => Slot::Duration(&mut self.sse_update_frequency),
            Destination::ConnectionTimeout => Slot::Duration(&mut self.connection_timeout),
            Destination::RateLimit => Slot::RateLimit(&mut self.rate_limit),
            Destination::RateLimitRedisKey => Slot::Text(&mut self.rate_limit_redis_key),
            Destination::RedisUrl => Slot::Text(&mut self.redis_url),
            Destination::FriendbotUrl => Slot::Url(&mut self.friendbot_url),
            Destination::LogLevel => Slot::LogLevel(&mut self.log_level),
            Destination::LogFile => Slot::Text(&mut self.log_file),
            Destination::MaxPathLength => Slot::Unsigned(&mut self.max_path_length),
            Destination::NetworkPassphrase => Slot::Text(&mut self.network_passphrase),
            Destination::SentryDsn => Slot::Text(&mut self.sentry_dsn),
            Destination::LogglyToken => Slot::Text(&mut self.loggly_token),
            Destination::LogglyTag => Slot::Text(&mut self.loggly_tag),
            Destination::TlsCert => Slot::Text(&mut self.tls_cert),
            Destination::TlsKey => Slot::Text(&mut self.tls_key),
            Destination::Ingest => Slot::Flag(&mut self.ingest),
            Destination::HistoryRetentionCount => Slot::Unsigned(&mut self.history_retention_count),
            Destination::HistoryStaleThreshold => Slot::Unsigned(&mut self.history_stale_threshold),
            Destination::SkipCursorUpdate => Slot::Flag(&mut self.skip_cursor_update),
            Destination::EnableAssetStats => Slot::Flag(&mut self.enable_asset_stats),
        }
    }

    /// Copy of the config with credentials and secret-bearing URLs masked.
    pub fn redacted(&self) -> Config {
        let mut copy = self.clone();
        for field in [
            &mut copy.database_url,
            &mut copy.stellar_core_database_url,
            &mut copy.redis_url,
            &mut copy.sentry_dsn,
            &mut copy.loggly_token,
        ] {
            if !field.is_empty() {
                *field = "[REDACTED]".to_string();
            }
        }
        copy
    }
}

/// Request admission rate expressed as a count over a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rate {
    pub count: u64,
    pub period: Duration,
}

impl Rate {
    /// `count` requests per hour.
    pub fn per_hour(count: u64) -> Self {
        Self {
            count,
            period: Duration::from_secs(60 * 60),
        }
    }
}

/// Rate/burst pair governing request admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateQuota {
    pub max_rate: Rate,
    pub max_burst: u32,
}

impl RateQuota {
    /// Hourly quota with the fixed [`RATE_LIMIT_BURST`].
    pub fn per_hour(count: u64) -> Self {
        Self {
            max_rate: Rate::per_hour(count),
            max_burst: RATE_LIMIT_BURST,
        }
    }
}

/// Minimum log severity accepted by the `log-level` option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Panic,
    Fatal,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Filter to install on the process logger.
    pub fn level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Panic | LogLevel::Fatal | LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "panic" => Ok(LogLevel::Panic),
            "fatal" => Ok(LogLevel::Fatal),
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(ConfigError::InvalidLogLevel(value.to_string())),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Panic => "panic",
            LogLevel::Fatal => "fatal",
            LogLevel::Error => "error",
            LogLevel::Warn => "warning",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        };
        f.write_str(name)
    }
}

/// Where log records should be written.
#[derive(Debug, Default)]
pub enum LogOutput {
    #[default]
    Stdout,
    /// An already opened, append-mode log file.
    File { path: PathBuf, file: File },
}

/// Logger state chosen during resolution, applied once by the binary.
#[derive(Debug, Default)]
pub struct LogSettings {
    pub level: LogLevel,
    pub output: LogOutput,
}

/// Output of a successful resolution pass.
#[derive(Debug)]
pub struct Resolved {
    pub config: Config,
    pub logging: LogSettings,
}
