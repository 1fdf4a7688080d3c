use std::sync::Once;

use log::LevelFilter;

/// Logger setup for binaries embedding the painter.
///
/// `env_filter` uses `env_logger` syntax, e.g. `"marduk_raster=debug"`.
/// When it is `None` and `RUST_LOG` is unset, `default_level` applies.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub default_level: LevelFilter,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            default_level: LevelFilter::Warn,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    fn builder(&self) -> env_logger::Builder {
        let mut builder = env_logger::Builder::new();
        let filter = self.env_filter.clone().or_else(|| std::env::var("RUST_LOG").ok());
        match filter {
            Some(filter) => builder.parse_filters(&filter),
            None => builder.filter_level(self.default_level),
        };
        builder.write_style(self.write_style);
        builder
    }
}

static INIT: Once = Once::new();

/// Installs the global logger. Only the first call has any effect; a logger
/// installed by someone else is left in place.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        if config.builder().try_init().is_ok() {
            log::debug!("logging initialized");
        }
    });
}

/// Routes log output through the test harness' captured output at trace
/// level. Safe to call from every test.
pub fn init_test_logging() {
    let _ = env_logger::Builder::new()
        .is_test(true)
        .filter_level(LevelFilter::Trace)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_initialization_is_harmless() {
        init_test_logging();
        init_logging(LoggingConfig::default().with_filter("marduk_raster=trace"));
        init_logging(LoggingConfig::default());
        log::trace!("still logging");
    }

    #[test]
    fn explicit_filter_wins() {
        let config = LoggingConfig::default().with_filter("off");
        assert_eq!(config.env_filter.as_deref(), Some("off"));
        assert_eq!(config.default_level, LevelFilter::Warn);
    }
}
