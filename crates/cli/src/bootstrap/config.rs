use ferrous_dnscache_domain::{CliOverrides, Config};
use std::path::Path;
use tracing::info;

pub fn load_config(config_path: Option<&Path>, overrides: CliOverrides) -> anyhow::Result<Config> {
    let mut config = Config::load(config_path)?;
    config.apply_overrides(overrides);
    config.validate()?;

    Ok(config)
}

/// Logged once the subscriber is installed.
pub fn log_config(config_path: Option<&Path>, config: &Config) {
    info!(
        config_file = %config_path.map_or("default".into(), |p| p.display().to_string()),
        backend = config.cache.backend.as_str(),
        size = config.cache.size,
        refresh_type = config.cache.refresh_type.as_str(),
        auto_refresh_secs = config.cache.auto_refresh_interval_secs,
        "Configuration loaded"
    );
}
