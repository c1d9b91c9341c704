use ferrous_dnscache_domain::LoggingConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Installs the global `fmt` subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Returns `false` if
/// a subscriber was already installed, in which case nothing changes.
pub fn init_logging(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_ascii_lowercase()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_level(true);

    let installed = if config.json {
        builder.json().try_init().is_ok()
    } else {
        builder.with_ansi(true).try_init().is_ok()
    };

    if installed {
        info!(level = %config.level, json = config.json, "Logging initialized");
    }
    installed
}
