use super::cache::{LruCache, MapCache};
use super::cache_updater::CacheUpdater;
use super::close_signal::CloseSignal;
use ferrous_dnscache_application::cache_options;
use ferrous_dnscache_application::ports::{AddressResolver, Addresses, ResolverCache};
use ferrous_dnscache_domain::{CacheBackend, CacheConfig, DomainError};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::info;

/// Composition of a [`Resolver`]: one back-end plus its refresh schedule.
#[derive(Clone)]
pub struct ResolverConfig {
    pub cache: Arc<dyn ResolverCache>,
    /// Pause between two automatic refresh passes; zero disables them.
    pub auto_refresh_interval: Duration,
    /// Deadline of each automatic pass and of [`Resolver::refresh`]; zero
    /// means none.
    pub auto_refresh_timeout: Duration,
}

impl ResolverConfig {
    pub fn new(cache: Arc<dyn ResolverCache>) -> Self {
        Self {
            cache,
            auto_refresh_interval: Duration::ZERO,
            auto_refresh_timeout: Duration::ZERO,
        }
    }

    pub fn with_auto_refresh(mut self, interval: Duration, timeout: Duration) -> Self {
        self.auto_refresh_interval = interval;
        self.auto_refresh_timeout = timeout;
        self
    }
}

/// Caching front of an [`AddressResolver`].
///
/// Owns one cache back-end and, when an interval is configured, the task that
/// refreshes it. Closing (or dropping) the resolver stops that task.
///
/// Constructors that start the background task must be called from within a
/// tokio runtime.
pub struct Resolver {
    cache: Arc<dyn ResolverCache>,
    refresh_timeout: Duration,
    close: CloseSignal,
    updater: Option<JoinHandle<()>>,
}

impl Resolver {
    /// Map-backed resolver over the system resolver, refreshed every
    /// `refresh_interval` without a deadline.
    pub fn new(refresh_interval: Duration) -> Result<Self, DomainError> {
        Self::with_refresh_timeout(refresh_interval, Duration::ZERO)
    }

    /// Same as [`Resolver::new`], with a deadline on each automatic pass.
    pub fn with_refresh_timeout(
        refresh_interval: Duration,
        refresh_timeout: Duration,
    ) -> Result<Self, DomainError> {
        let cache = MapCache::builder().build()?;
        Ok(Self::from_config(
            ResolverConfig::new(Arc::new(cache))
                .with_auto_refresh(refresh_interval, refresh_timeout),
        ))
    }

    pub fn from_config(config: ResolverConfig) -> Self {
        let close = CloseSignal::new();

        let updater = CacheUpdater::new(Arc::clone(&config.cache), config.auto_refresh_interval)
            .with_timeout(config.auto_refresh_timeout)
            .with_cancellation(close.token().clone())
            .start();

        info!(
            entries = config.cache.len(),
            auto_refresh = updater.is_some(),
            "Resolver ready"
        );

        Self {
            cache: config.cache,
            refresh_timeout: config.auto_refresh_timeout,
            close,
            updater,
        }
    }

    /// Builds the back-end and schedule described by a configuration file,
    /// resolving through the system resolver.
    pub fn from_settings(settings: &CacheConfig) -> Result<Self, DomainError> {
        Self::from_settings_with_resolver(settings, None)
    }

    pub fn from_settings_with_resolver(
        settings: &CacheConfig,
        resolver: Option<Arc<dyn AddressResolver>>,
    ) -> Result<Self, DomainError> {
        let options = cache_options(settings, resolver);
        let cache: Arc<dyn ResolverCache> = match settings.backend {
            CacheBackend::Map => Arc::new(MapCache::new(&options)?),
            CacheBackend::Lru => Arc::new(LruCache::new(&options)?),
        };

        Ok(Self::from_config(ResolverConfig::new(cache).with_auto_refresh(
            Duration::from_secs(settings.auto_refresh_interval_secs),
            Duration::from_secs(settings.auto_refresh_timeout_secs),
        )))
    }

    /// Cached addresses of `name`, resolving and storing them on a miss.
    pub async fn fetch(&self, name: &str) -> Result<Addresses, DomainError> {
        self.cache.fetch(name).await
    }

    /// First address of `name`, `None` when the name has no address.
    pub async fn fetch_one(&self, name: &str) -> Result<Option<IpAddr>, DomainError> {
        Ok(self.fetch(name).await?.first().copied())
    }

    pub async fn fetch_one_string(&self, name: &str) -> Result<Option<String>, DomainError> {
        Ok(self.fetch_one(name).await?.map(|ip| ip.to_string()))
    }

    /// Live lookup that bypasses (and then updates) the cache.
    pub async fn lookup(&self, name: &str) -> Result<Addresses, DomainError> {
        self.cache.lookup(name).await
    }

    /// One refresh pass with the configured automatic deadline.
    pub async fn refresh(&self) {
        self.cache.refresh(self.refresh_timeout).await;
    }

    pub async fn refresh_timeout(&self, timeout: Duration) {
        self.cache.refresh(timeout).await;
    }

    pub fn purge(&self) {
        self.cache.purge();
    }

    pub fn cache(&self) -> &Arc<dyn ResolverCache> {
        &self.cache
    }

    pub fn is_closed(&self) -> bool {
        self.close.is_closed()
    }

    pub fn is_auto_refreshing(&self) -> bool {
        self.updater.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stops the background refresh and closes the back-end. Safe to call
    /// more than once.
    pub fn close(&self) -> Result<(), DomainError> {
        if !self.close.close() {
            return Ok(());
        }
        self.cache.close()?;
        info!("Resolver closed");
        Ok(())
    }
}

impl Drop for Resolver {
    fn drop(&mut self) {
        self.close.token().cancel();
    }
}
