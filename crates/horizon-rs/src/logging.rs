//! Process logger installation from resolved settings.

use anyhow::Context;
use env_logger::Target;
use horizon_rs_config::{LogOutput, LogSettings};

/// Install the process-wide logger chosen during resolution.
///
/// `RUST_LOG` still refines per-module filters on top of the resolved level.
pub fn install(settings: LogSettings) -> anyhow::Result<()> {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(settings.level.level_filter())
        .format_timestamp_millis()
        .parse_default_env();
    match settings.output {
        LogOutput::Stdout => {
            builder.target(Target::Stdout);
        }
        LogOutput::File { file, .. } => {
            builder.target(Target::Pipe(Box::new(file)));
        }
    }
    builder.try_init().context("failed to install logger")
}
