//! # Ferrous DNS Cache
//!
//! Resolves names through the caching resolver, optionally refreshing them
//! in the background for a while.

mod bootstrap;

use anyhow::bail;
use clap::Parser;
use ferrous_dnscache_application::ports::ResolverCache;
use ferrous_dnscache_domain::{CacheBackend, CliOverrides};
use ferrous_dnscache_infrastructure::dns::Resolver;
use ferrous_dnscache_infrastructure::logging::init_logging;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "ferrous-dnscache")]
#[command(version)]
#[command(about = "Caching DNS resolver with background refresh")]
struct Cli {
    /// TOML configuration file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Log level, overrides the file
    #[arg(short = 'l', long)]
    log_level: Option<String>,

    /// Cache back-end: map or lru
    #[arg(short = 'b', long, value_parser = parse_backend)]
    backend: Option<CacheBackend>,

    /// Capacity of the lru back-end
    #[arg(short = 's', long)]
    size: Option<usize>,

    /// Background refresh period in seconds (0 disables it)
    #[arg(short = 'i', long)]
    interval: Option<u64>,

    /// Run one refresh pass after resolving and print the names again
    #[arg(short = 'r', long)]
    refresh: bool,

    /// Deadline of the manual refresh pass in milliseconds (0 = none)
    #[arg(long, default_value = "0")]
    refresh_timeout_ms: u64,

    /// Keep running for this many seconds (or until Ctrl+C) so the
    /// background refresh can work
    #[arg(long, default_value = "0")]
    hold: u64,

    /// Names to resolve
    names: Vec<String>,
}

fn parse_backend(s: &str) -> Result<CacheBackend, String> {
    CacheBackend::from_str(s).ok_or_else(|| format!("unknown backend '{s}' (expected map or lru)"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let overrides = CliOverrides {
        log_level: cli.log_level.clone(),
        backend: cli.backend,
        size: cli.size,
        auto_refresh_interval_secs: cli.interval,
    };
    let config = bootstrap::load_config(cli.config.as_deref(), overrides)?;
    init_logging(&config.logging);
    bootstrap::log_config(cli.config.as_deref(), &config);

    let resolver = Resolver::from_settings(&config.cache)?;

    let failures = resolve_all(&resolver, &cli.names).await;

    if cli.refresh {
        resolver
            .refresh_timeout(Duration::from_millis(cli.refresh_timeout_ms))
            .await;
        info!(entries = resolver.cache().len(), "Manual refresh finished");
        resolve_all(&resolver, &cli.names).await;
    }

    if cli.hold > 0 {
        info!(secs = cli.hold, "Holding, press Ctrl+C to stop");
        tokio::select! {
            _ = tokio::time::sleep(Duration::from_secs(cli.hold)) => {}
            _ = tokio::signal::ctrl_c() => info!("Interrupted"),
        }
        resolve_all(&resolver, &cli.names).await;
    }

    resolver.close()?;

    if failures > 0 {
        bail!("{failures} of {} names failed to resolve", cli.names.len());
    }
    Ok(())
}

/// Prints one line per name and returns how many failed.
async fn resolve_all(resolver: &Resolver, names: &[String]) -> usize {
    let mut failures = 0;
    for name in names {
        match resolver.fetch(name).await {
            Ok(addresses) => {
                let joined: Vec<String> = addresses.iter().map(|ip| ip.to_string()).collect();
                println!("{name}\t{}", joined.join(", "));
            }
            Err(e) => {
                error!(name = %name, error = %e, "Resolution failed");
                failures += 1;
            }
        }
    }
    failures
}
