//! # Structured Logging
//!
//! Optional `tracing` subscriber setup for binaries and tests that embed the
//! engine. The library itself only emits events; nothing is printed unless
//! the host installs a subscriber, here or elsewhere.
//!
//! Output goes to stderr. `RUST_LOG` overrides the default filter, e.g.
//!
//! ```text
//! RUST_LOG=tangle_protocol::transaction=debug,tangle_protocol=info
//! ```

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines with file and line numbers.
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// "json" (any case) selects JSON; everything else is pretty.
    pub fn from_str_lossy(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Installs the global subscriber.
///
/// Returns `false` if a subscriber was already installed, in which case
/// nothing changes. Safe to call from every test.
pub fn init_logging(default_level: &str, format: LogFormat) -> bool {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let installed = match format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init()
            .is_ok(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr).with_target(true))
            .try_init()
            .is_ok(),
    };

    if installed {
        tracing::debug!(?format, "logging initialized");
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!(LogFormat::from_str_lossy("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::from_str_lossy("json"), LogFormat::Json);
        assert_eq!(LogFormat::from_str_lossy("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str_lossy("whatever"), LogFormat::Pretty);
    }

    #[test]
    fn test_second_init_is_a_no_op() {
        init_logging("warn", LogFormat::Pretty);
        assert!(!init_logging("debug", LogFormat::Json));
    }
}
