//! Custom resolvers for options whose config field is not a plain primitive.

use log::{debug, info};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use super::{ResolutionContext, mismatch, non_negative};
use crate::{ConfigError, LogLevel, LogOutput, OptionDescriptor, RateQuota, Slot};

/// Integer seconds to a [`Duration`].
pub fn duration_seconds(
    descriptor: &OptionDescriptor,
    ctx: &mut ResolutionContext<'_>,
) -> Result<(), ConfigError> {
    let seconds = non_negative(descriptor, ctx.integer(descriptor)?)?;
    match ctx.slot(descriptor) {
        Slot::Duration(field) => *field = Duration::from_secs(seconds),
        _ => return Err(mismatch(descriptor)),
    }
    Ok(())
}

/// Parse a non-empty string as an absolute URL; empty leaves the field unset.
pub fn absolute_url(
    descriptor: &OptionDescriptor,
    ctx: &mut ResolutionContext<'_>,
) -> Result<(), ConfigError> {
    let value = ctx.string(descriptor);
    if value.is_empty() {
        return Ok(());
    }
    let parsed = parse_url(&value)?;
    match ctx.slot(descriptor) {
        Slot::Url(field) => *field = Some(parsed),
        _ => return Err(mismatch(descriptor)),
    }
    Ok(())
}

pub(crate) fn parse_url(value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|source| ConfigError::InvalidUrl {
        value: value.to_string(),
        source,
    })
}

/// Parse the severity and select it for the process logger as well.
pub fn log_level(
    descriptor: &OptionDescriptor,
    ctx: &mut ResolutionContext<'_>,
) -> Result<(), ConfigError> {
    let level: LogLevel = ctx.string(descriptor).parse()?;
    ctx.logging_mut().level = level;
    match ctx.slot(descriptor) {
        Slot::LogLevel(field) => *field = level,
        _ => return Err(mismatch(descriptor)),
    }
    Ok(())
}

/// Open the named file for append and route the process logger to it.
pub fn log_file(
    descriptor: &OptionDescriptor,
    ctx: &mut ResolutionContext<'_>,
) -> Result<(), ConfigError> {
    let name = ctx.string(descriptor);
    if name.is_empty() {
        return Ok(());
    }
    let path = PathBuf::from(&name);
    let mut options = OpenOptions::new();
    options.append(true).create(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }
    let file = options
        .open(&path)
        .map_err(|source| ConfigError::LogFile {
            path: path.clone(),
            source,
        })?;
    info!("logging to file: {}", path.display());
    ctx.logging_mut().output = LogOutput::File { path, file };
    match ctx.slot(descriptor) {
        Slot::Text(field) => *field = name,
        _ => return Err(mismatch(descriptor)),
    }
    Ok(())
}

/// Hourly request ceiling; zero means no limit is configured.
pub fn rate_limit(
    descriptor: &OptionDescriptor,
    ctx: &mut ResolutionContext<'_>,
) -> Result<(), ConfigError> {
    let per_hour = non_negative(descriptor, ctx.integer(descriptor)?)?;
    if per_hour == 0 {
        debug!("rate limiting disabled");
        return Ok(());
    }
    match ctx.slot(descriptor) {
        Slot::RateLimit(field) => *field = Some(RateQuota::per_hour(per_hour)),
        _ => return Err(mismatch(descriptor)),
    }
    Ok(())
}

/// Store one half of the TLS pair and count it for the pairing check.
pub fn tls_flag(
    descriptor: &OptionDescriptor,
    ctx: &mut ResolutionContext<'_>,
) -> Result<(), ConfigError> {
    let value = ctx.string(descriptor);
    if value.is_empty() {
        return Ok(());
    }
    ctx.record_tls_flag();
    match ctx.slot(descriptor) {
        Slot::Text(field) => *field = value,
        _ => return Err(mismatch(descriptor)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registrar::{RawSources, register_flags};
    use crate::{Destination, OptionTable};
    use clap::Command;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn run(
        descriptor: OptionDescriptor,
        env: &[(&str, &str)],
    ) -> (Result<(), ConfigError>, crate::Resolved, usize) {
        let table = OptionTable::new(vec![descriptor.clone()]).expect("table");
        let matches = register_flags(Command::new("horizon"), &table)
            .try_get_matches_from(["horizon"])
            .expect("matches");
        let env: HashMap<String, String> = env
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let sources = RawSources::new(&matches, &env);
        let mut ctx = ResolutionContext::new(&sources);
        let result = ctx.apply(&descriptor);
        let tls = ctx.tls_provided();
        (result, ctx.assemble(), tls)
    }

    #[test]
    fn duration_is_whole_seconds() {
        let descriptor =
            OptionDescriptor::integer("connection-timeout", Destination::ConnectionTimeout, 55)
                .resolver(duration_seconds);
        let (result, resolved, _) = run(descriptor.clone(), &[("CONNECTION_TIMEOUT", "5")]);
        result.expect("resolve");
        assert_eq!(resolved.config.connection_timeout, Duration::from_secs(5));

        let (result, resolved, _) = run(descriptor, &[("CONNECTION_TIMEOUT", "0")]);
        result.expect("resolve");
        assert_eq!(resolved.config.connection_timeout, Duration::ZERO);
    }

    #[test]
    fn negative_duration_is_rejected() {
        let descriptor =
            OptionDescriptor::integer("sse-update-frequency", Destination::SseUpdateFrequency, 5)
                .resolver(duration_seconds);
        let (result, _, _) = run(descriptor, &[("SSE_UPDATE_FREQUENCY", "-3")]);
        assert!(matches!(result, Err(ConfigError::NegativeValue { value: -3, .. })));
    }

    /// Empty URL strings leave the field unset without error.
    #[test]
    fn empty_url_stays_unset() {
        let descriptor = OptionDescriptor::string("friendbot-url", Destination::FriendbotUrl, "")
            .resolver(absolute_url);
        let (result, resolved, _) = run(descriptor, &[]);
        result.expect("resolve");
        assert_eq!(resolved.config.friendbot_url, None);
    }

    #[test]
    fn valid_url_round_trips() {
        let descriptor = OptionDescriptor::string("friendbot-url", Destination::FriendbotUrl, "")
            .resolver(absolute_url);
        let input = "https://friendbot.stellar.org/";
        let (result, resolved, _) = run(descriptor, &[("FRIENDBOT_URL", input)]);
        result.expect("resolve");
        let parsed = resolved.config.friendbot_url.expect("url");
        assert_eq!(parsed.as_str(), input);
    }

    #[test]
    fn malformed_url_reports_input() {
        let descriptor = OptionDescriptor::string("friendbot-url", Destination::FriendbotUrl, "")
            .resolver(absolute_url);
        let (result, _, _) = run(descriptor, &[("FRIENDBOT_URL", "not a url")]);
        let err = result.unwrap_err();
        assert!(format!("{err}").starts_with("Unable to parse URL: not a url/"));
    }

    /// Rate limit zero means no policy at all.
    #[test]
    fn zero_rate_limit_is_unset() {
        let descriptor =
            OptionDescriptor::integer("per-hour-rate-limit", Destination::RateLimit, 3600)
                .resolver(rate_limit);
        let (result, resolved, _) = run(descriptor, &[("PER_HOUR_RATE_LIMIT", "0")]);
        result.expect("resolve");
        assert_eq!(resolved.config.rate_limit, None);
    }

    #[test]
    fn rate_limit_pairs_rate_with_fixed_burst() {
        let descriptor =
            OptionDescriptor::integer("per-hour-rate-limit", Destination::RateLimit, 0)
                .resolver(rate_limit);
        let (result, resolved, _) = run(descriptor, &[("PER_HOUR_RATE_LIMIT", "3600")]);
        result.expect("resolve");
        assert_eq!(resolved.config.rate_limit, Some(RateQuota::per_hour(3600)));
        assert_eq!(resolved.config.rate_limit.expect("quota").max_burst, 100);
    }

    /// The chosen level lands in both the config and the logger settings.
    #[test]
    fn log_level_updates_logger_settings() {
        let descriptor = OptionDescriptor::string("log-level", Destination::LogLevel, "info")
            .resolver(log_level);
        let (result, resolved, _) = run(descriptor, &[("LOG_LEVEL", "debug")]);
        result.expect("resolve");
        assert_eq!(resolved.config.log_level, LogLevel::Debug);
        assert_eq!(resolved.logging.level, LogLevel::Debug);
    }

    #[test]
    fn unknown_log_level_is_fatal() {
        let descriptor = OptionDescriptor::string("log-level", Destination::LogLevel, "info")
            .resolver(log_level);
        let (result, _, _) = run(descriptor, &[("LOG_LEVEL", "chatty")]);
        assert_eq!(
            format!("{}", result.unwrap_err()),
            "Could not parse log-level: chatty"
        );
    }

    #[test]
    fn log_file_is_created_and_recorded() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("horizon.log");
        let descriptor =
            OptionDescriptor::string("log-file", Destination::LogFile, "").resolver(log_file);
        let path_text = path.to_string_lossy().to_string();
        let (result, resolved, _) = run(descriptor, &[("LOG_FILE", path_text.as_str())]);
        result.expect("resolve");
        assert!(path.exists());
        assert_eq!(resolved.config.log_file, path_text);
        assert!(matches!(resolved.logging.output, LogOutput::File { .. }));
    }

    #[test]
    fn unopenable_log_file_is_fatal() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("missing").join("horizon.log");
        let descriptor =
            OptionDescriptor::string("log-file", Destination::LogFile, "").resolver(log_file);
        let path_text = path.to_string_lossy().to_string();
        let (result, _, _) = run(descriptor, &[("LOG_FILE", path_text.as_str())]);
        assert!(matches!(result, Err(ConfigError::LogFile { .. })));
    }

    #[test]
    fn tls_flag_counts_non_empty_values() {
        let descriptor =
            OptionDescriptor::string("tls-cert", Destination::TlsCert, "").resolver(tls_flag);
        let (result, resolved, count) = run(descriptor.clone(), &[("TLS_CERT", "cert.pem")]);
        result.expect("resolve");
        assert_eq!(count, 1);
        assert_eq!(resolved.config.tls_cert, "cert.pem");

        let (result, _, count) = run(descriptor, &[]);
        result.expect("resolve");
        assert_eq!(count, 0);
    }

    /// Resolvers refuse to write into a field of another shape.
    #[test]
    fn wrong_destination_shape_is_reported() {
        let descriptor =
            OptionDescriptor::integer("port", Destination::Port, 8000).resolver(duration_seconds);
        let (result, _, _) = run(descriptor, &[]);
        assert!(matches!(
            result,
            Err(ConfigError::DestinationMismatch { destination: "port", .. })
        ));
    }
}
