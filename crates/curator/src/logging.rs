//! Logging initialization and configuration.
//!
//! Uses the `tracing` ecosystem for structured logging with support for
//! both human-readable and JSON output formats.

use curator_core::config::LoggingConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the logging subsystem.
///
/// Logs go to stderr; stdout carries only the final run summary lines.
/// `RUST_LOG` overrides the level chosen here.
pub fn init(verbose: bool, json_format: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose)));

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Initialize logging with configuration from Config.
///
/// `[logging] level` of `debug` or `trace` enables debug output; `format =
/// "json"` selects JSON lines. CLI flags can only turn these on.
pub fn init_from_config(
    config: &curator_core::Config,
    verbose_override: bool,
    json_logs_override: bool,
) {
    let (verbose, json_format) = resolve(&config.logging, verbose_override, json_logs_override);
    init(verbose, json_format);
}

fn resolve(logging: &LoggingConfig, verbose: bool, json_logs: bool) -> (bool, bool) {
    let level = logging.level.to_ascii_lowercase();
    (
        verbose || level == "debug" || level == "trace",
        json_logs || logging.format.eq_ignore_ascii_case("json"),
    )
}

fn default_level(verbose: bool) -> &'static str {
    if verbose {
        // Keep ONNX Runtime's own debug chatter out of -v output.
        "debug,ort=warn"
    } else {
        "info"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_level_enables_verbose() {
        let logging = LoggingConfig {
            level: "DEBUG".to_string(),
            ..LoggingConfig::default()
        };
        assert_eq!(resolve(&logging, false, false), (true, false));
    }

    #[test]
    fn flags_override_config() {
        let logging = LoggingConfig::default();
        assert_eq!(resolve(&logging, false, false), (false, false));
        assert_eq!(resolve(&logging, true, true), (true, true));
    }

    #[test]
    fn verbose_filter_quiets_runtime() {
        assert_eq!(default_level(false), "info");
        assert!(default_level(true).contains("ort=warn"));
    }
}
