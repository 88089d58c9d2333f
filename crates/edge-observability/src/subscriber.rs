//! Process-wide tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::logging::LogFormat;

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins over `default_level` when set. Safe to call more than
/// once; returns `false` when a subscriber was already installed.
pub fn init_tracing(default_level: &str, format: LogFormat) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Json => builder.json().with_target(false).try_init().is_ok(),
        LogFormat::Human => builder.with_target(true).try_init().is_ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_noop() {
        init_tracing("info", LogFormat::Json);
        assert!(!init_tracing("debug", LogFormat::Human));
    }
}
