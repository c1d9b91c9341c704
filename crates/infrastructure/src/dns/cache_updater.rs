use ferrous_dnscache_application::ports::ResolverCache;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Background task that runs one refresh pass of a cache every `interval`.
pub struct CacheUpdater {
    cache: Arc<dyn ResolverCache>,
    interval: Duration,
    timeout: Duration,
    shutdown: CancellationToken,
}

impl CacheUpdater {
    pub fn new(cache: Arc<dyn ResolverCache>, interval: Duration) -> Self {
        Self {
            cache,
            interval,
            timeout: Duration::ZERO,
            shutdown: CancellationToken::new(),
        }
    }

    /// Deadline handed to every pass; zero means none.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    /// Spawns the loop. A zero interval disables it and nothing is spawned.
    pub fn start(self) -> Option<JoinHandle<()>> {
        if self.interval.is_zero() {
            debug!("Cache updater disabled");
            return None;
        }

        Some(tokio::spawn(async move {
            info!(
                interval = ?self.interval,
                timeout = ?self.timeout,
                "Cache updater started"
            );

            let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = self.shutdown.cancelled() => {
                        info!("Cache updater stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        debug!(entries = self.cache.len(), "Starting cache refresh cycle");
                        // a pass still running at shutdown is dropped
                        tokio::select! {
                            biased;
                            _ = self.shutdown.cancelled() => {
                                info!("Cache updater stopped during refresh");
                                break;
                            }
                            _ = self.cache.refresh(self.timeout) => {}
                        }
                    }
                }
            }
        }))
    }
}
