//! The Horizon option table.

use crate::resolver::custom::{
    absolute_url, duration_seconds, log_file, log_level, rate_limit, tls_flag,
};
use crate::{ConfigError, Destination, OptionDescriptor, OptionTable};

/// Passphrase of the public Stellar test network.
pub const TEST_NETWORK_PASSPHRASE: &str = "Test SDF Network ; September 2015";

/// Flag naming the store the schema gate inspects.
pub const DATABASE_URL_OPTION: &str = "db-url";

impl OptionTable {
    /// Every option understood by Horizon, in resolution order.
    pub fn horizon() -> Result<Self, ConfigError> {
        Self::new(horizon_options())
    }
}

fn horizon_options() -> Vec<OptionDescriptor> {
    vec![
        OptionDescriptor::string(DATABASE_URL_OPTION, Destination::DatabaseUrl, "")
            .env("DATABASE_URL")
            .required()
            .usage("horizon database to connect with"),
        OptionDescriptor::string(
            "stellar-core-db-url",
            Destination::StellarCoreDatabaseUrl,
            "",
        )
        .env("STELLAR_CORE_DATABASE_URL")
        .required()
        .usage("stellar-core postgres database to connect with"),
        OptionDescriptor::string("stellar-core-url", Destination::StellarCoreUrl, "")
            .required()
            .usage("stellar-core to connect with (for http commands)"),
        OptionDescriptor::integer("port", Destination::Port, 8000)
            .usage("tcp port to listen on for http requests"),
        OptionDescriptor::integer("max-db-connections", Destination::MaxDbConnections, 20)
            .usage("max db connections (per DB), may need to be increased when responses are slow but DB CPU is normal"),
        OptionDescriptor::integer("sse-update-frequency", Destination::SseUpdateFrequency, 5)
            .resolver(duration_seconds)
            .usage("defines how often streams should check if there's a new ledger (in seconds), may need to increase in case of big number of streams"),
        OptionDescriptor::integer("connection-timeout", Destination::ConnectionTimeout, 55)
            .resolver(duration_seconds)
            .usage("defines the timeout of connection after which 504 response will be sent or stream will be closed, if Horizon is behind a load balancer with idle connection timeout, this should be set to a few seconds less that idle timeout"),
        OptionDescriptor::integer("per-hour-rate-limit", Destination::RateLimit, 3600)
            .resolver(rate_limit)
            .usage("max count of requests allowed in a one hour period, by remote ip address"),
        OptionDescriptor::string("rate-limit-redis-key", Destination::RateLimitRedisKey, "")
            .usage("redis key for storing rate limit data, useful when deploying a cluster of Horizons, ignored when redis-url is empty"),
        OptionDescriptor::string("redis-url", Destination::RedisUrl, "")
            .usage("redis to connect with, for rate limiting"),
        OptionDescriptor::string("friendbot-url", Destination::FriendbotUrl, "")
            .resolver(absolute_url)
            .usage("friendbot service to redirect to"),
        OptionDescriptor::string("log-level", Destination::LogLevel, "info")
            .resolver(log_level)
            .usage("minimum log severity (debug, info, warn, error) to log"),
        OptionDescriptor::string("log-file", Destination::LogFile, "")
            .resolver(log_file)
            .usage("name of the file where logs will be saved (leave empty to send logs to stdout)"),
        OptionDescriptor::unsigned("max-path-length", Destination::MaxPathLength, 4)
            .usage("the maximum number of assets on the path in `/paths` endpoint"),
        OptionDescriptor::string(
            "network-passphrase",
            Destination::NetworkPassphrase,
            TEST_NETWORK_PASSPHRASE,
        )
        .required()
        .usage("override the network passphrase"),
        OptionDescriptor::string("sentry-dsn", Destination::SentryDsn, "")
            .usage("Sentry URL to which panics and errors should be reported"),
        OptionDescriptor::string("loggly-token", Destination::LogglyToken, "")
            .usage("Loggly token, used to configure log forwarding to loggly"),
        OptionDescriptor::string("loggly-tag", Destination::LogglyTag, "horizon")
            .usage("tag to be added to every loggly log event"),
        OptionDescriptor::string("tls-cert", Destination::TlsCert, "")
            .resolver(tls_flag)
            .usage("TLS certificate file to use for securing connections to horizon"),
        OptionDescriptor::string("tls-key", Destination::TlsKey, "")
            .resolver(tls_flag)
            .usage("TLS private key file to use for securing connections to horizon"),
        OptionDescriptor::boolean("ingest", Destination::Ingest, false)
            .usage("causes this horizon process to ingest data from stellar-core into horizon's db"),
        OptionDescriptor::unsigned(
            "history-retention-count",
            Destination::HistoryRetentionCount,
            0,
        )
        .usage("the minimum number of ledgers to maintain within horizon's history tables. 0 signifies an unlimited number of ledgers will be retained"),
        OptionDescriptor::unsigned(
            "history-stale-threshold",
            Destination::HistoryStaleThreshold,
            0,
        )
        .usage("the maximum number of ledgers the history db is allowed to be out of date from the connected stellar-core db before horizon considers history stale"),
        OptionDescriptor::boolean("skip-cursor-update", Destination::SkipCursorUpdate, false)
            .usage("causes the ingester to skip reporting the last imported ledger state to stellar-core"),
        OptionDescriptor::boolean("enable-asset-stats", Destination::EnableAssetStats, false)
            .usage("enables asset stats during the ingestion and expose `/assets` endpoint, enabling it has a negative impact on CPU"),
    ]
}
