//! Logging initialization for the unitdc binary
//!
//! Log records always go to stderr so they never mix with calculator output.
//! `RUST_LOG`, when set, replaces the configured filter entirely.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Crates whose events are shown at the configured level.
const CRATES: [&str; 3] = ["unitdc", "unitdc_rpn", "unitdc_units"];

/// Install the global subscriber.
///
/// `verbosity` counts `-v` flags: one raises the level to `debug`, two or more
/// to `trace`.
pub fn init_logging(config: &LoggingConfig, verbosity: u8) -> anyhow::Result<()> {
    let env_filter = build_env_filter(config, verbosity);
    let subscriber = tracing_subscriber::registry().with(env_filter);

    if config.json {
        let layer = fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_writer(std::io::stderr);
        subscriber.with(layer).try_init()?;
    } else {
        let layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_writer(std::io::stderr);
        subscriber.with(layer).try_init()?;
    }

    tracing::debug!(level = %effective_level(config, verbosity), json = config.json, "Logging initialized");
    Ok(())
}

fn effective_level(config: &LoggingConfig, verbosity: u8) -> &str {
    match verbosity {
        0 => config.level.as_str(),
        1 => "debug",
        _ => "trace",
    }
}

fn build_env_filter(config: &LoggingConfig, verbosity: u8) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(directives(effective_level(config, verbosity)))
    })
}

fn directives(level: &str) -> String {
    CRATES
        .iter()
        .map(|krate| format!("{krate}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_overrides_configured_level() {
        let config = LoggingConfig::default();
        assert_eq!(effective_level(&config, 0), "warn");
        assert_eq!(effective_level(&config, 1), "debug");
        assert_eq!(effective_level(&config, 4), "trace");
    }

    #[test]
    fn directives_cover_every_crate() {
        assert_eq!(
            directives("info"),
            "unitdc=info,unitdc_rpn=info,unitdc_units=info"
        );
    }
}
