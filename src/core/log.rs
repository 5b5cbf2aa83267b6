use tracing_subscriber::{
    EnvFilter, fmt, prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt,
};

/// Directives used when `RUST_LOG` is unset or unparseable.
fn default_directives(verbose: bool) -> &'static str {
    if verbose { "ecopulse=debug" } else { "off" }
}

/// `RUST_LOG` wins over `--verbose` when it parses.
fn build_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default_directives(verbose)))
}

/// Installs the global subscriber writing to stderr. Logging is off unless
/// `verbose` is set or `RUST_LOG` selects something; provider failures surface
/// at `warn`.
pub fn init_logging(verbose: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    tracing_subscriber::registry()
        .with(fmt::layer().pretty().without_time().with_writer(std::io::stderr))
        .with(build_filter(verbose, rust_log.as_deref()))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn test_quiet_by_default() {
        assert_eq!(build_filter(false, None).max_level_hint(), Some(LevelFilter::OFF));
    }

    #[test]
    fn test_verbose_enables_debug() {
        assert_eq!(build_filter(true, None).max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_rust_log_widens_filter_without_verbose() {
        let filter = build_filter(false, Some("ecopulse=warn"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
        assert_eq!(default_directives(false), "off");
    }

    #[test]
    fn test_invalid_rust_log_falls_back() {
        let filter = build_filter(true, Some("ecopulse=loud"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }
}
