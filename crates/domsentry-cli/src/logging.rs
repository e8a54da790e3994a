//! Logging setup: installs a `tracing-subscriber` `fmt` layer,
//! generalizing `riptide-cli/src/main.rs`'s `env_logger`-based setup to
//! `tracing`.

use tracing_subscriber::EnvFilter;

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("invalid log format '{other}': expected text|json")),
        }
    }
}

/// Compute the effective log level: `LOG_LEVEL` wins outright; otherwise
/// `--verbose` or `VERBOSE_LOGGING=1|true` raises the default `info` to
/// `debug`.
fn effective_level(verbose: bool) -> String {
    if let Ok(level) = std::env::var("LOG_LEVEL") {
        if !level.is_empty() {
            return level;
        }
    }

    let verbose_env = std::env::var("VERBOSE_LOGGING")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    if verbose || verbose_env {
        "debug".to_string()
    } else {
        "info".to_string()
    }
}

/// True when ANSI color should be suppressed: `NODE_ENV=test` or `CI` set.
pub fn color_disabled() -> bool {
    std::env::var("NODE_ENV").map(|v| v == "test").unwrap_or(false) || std::env::var("CI").is_ok()
}

/// Install the global subscriber. Call once, at startup.
pub fn init(verbose: bool, format: LogFormat) {
    let filter = EnvFilter::try_new(effective_level(verbose)).unwrap_or_else(|_| EnvFilter::new("info"));
    let ansi = !color_disabled();

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).with_ansi(ansi).with_writer(std::io::stderr);

    match format {
        LogFormat::Text => {
            let _ = subscriber.try_init();
        }
        LogFormat::Json => {
            let _ = subscriber.json().try_init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_format_parses_known_values() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert!("bogus".parse::<LogFormat>().is_err());
    }
}
