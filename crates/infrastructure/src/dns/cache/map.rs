use super::common::{live_lookup, refresh_store, CommonSettings, Store};
use crate::dns::close_signal::CloseSignal;
use async_trait::async_trait;
use ferrous_dnscache_application::ports::{
    AddressResolver, Addresses, RefreshableCache, ResolverCache,
};
use ferrous_dnscache_application::{ConfigOption, RefreshOptions};
use ferrous_dnscache_domain::{DomainError, OptionError, RefreshStrategy};
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tracing::{debug, info};

const INITIAL_CAPACITY: usize = 64;

/// Unbounded cache: a `HashMap` behind one reader/writer lock.
///
/// The lock is never held across a resolver call, so lookups of different
/// names run in parallel. Closing the cache interrupts a running refresh pass.
pub struct MapCache {
    store: Arc<MapStore>,
    strategy: RefreshStrategy,
    refresh: RefreshOptions,
    close: CloseSignal,
}

struct MapStore {
    entries: RwLock<HashMap<String, Addresses>>,
    resolver: Arc<dyn AddressResolver>,
}

impl MapStore {
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Addresses>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Addresses>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RefreshableCache for MapStore {
    fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.read().keys().cloned().collect();
        keys.sort_unstable();
        keys
    }

    fn contains(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }
}

impl Store for MapStore {
    fn resolver(&self) -> &Arc<dyn AddressResolver> {
        &self.resolver
    }

    fn upsert(&self, name: &str, addresses: Addresses) {
        self.write().insert(name.to_string(), addresses);
    }
}

/// Typed construction of a [`MapCache`].
///
/// Defaults: system resolver, shuffled linear refresh, 1s between lookups.
#[derive(Clone, Default)]
pub struct MapCacheBuilder {
    common: CommonSettings,
}

impl MapCacheBuilder {
    pub fn resolver(mut self, resolver: Arc<dyn AddressResolver>) -> Self {
        self.common.resolver = resolver;
        self
    }

    pub fn refresh_options(mut self, refresh: RefreshOptions) -> Self {
        self.common.refresh = refresh;
        self
    }

    pub fn strategy(mut self, strategy: RefreshStrategy) -> Self {
        self.common = self.common.with_strategy(strategy);
        self
    }

    /// Applies one option. Recognized keys: Resolver, RefreshShuffle,
    /// RefreshSleepTime, RefreshType, RefreshBatchSize.
    pub fn apply(self, opt: &ConfigOption) -> Result<Self, OptionError> {
        Ok(Self {
            common: self.common.apply(opt)?,
        })
    }

    pub fn build(self) -> Result<MapCache, OptionError> {
        let strategy = self.common.strategy()?;

        info!(
            strategy = ?strategy,
            shuffle = self.common.refresh.shuffle,
            sleep = ?self.common.refresh.sleep,
            "Initializing map cache"
        );

        Ok(MapCache {
            store: Arc::new(MapStore {
                entries: RwLock::new(HashMap::with_capacity(INITIAL_CAPACITY)),
                resolver: self.common.resolver,
            }),
            strategy,
            refresh: self.common.refresh,
            close: CloseSignal::new(),
        })
    }
}

impl MapCache {
    /// Builds a cache from option records. No option is required.
    pub fn new(options: &[ConfigOption]) -> Result<Self, OptionError> {
        options
            .iter()
            .try_fold(MapCacheBuilder::default(), |builder, opt| builder.apply(opt))?
            .build()
    }

    pub fn builder() -> MapCacheBuilder {
        MapCacheBuilder::default()
    }

    /// Checks an option against this cache's rules without changing anything.
    pub fn validate_option(&self, opt: &ConfigOption) -> Result<(), OptionError> {
        CommonSettings::default().apply(opt).map(|_| ())
    }

    pub fn strategy(&self) -> RefreshStrategy {
        self.strategy
    }

    pub fn refresh_options(&self) -> RefreshOptions {
        self.refresh
    }
}

impl RefreshableCache for MapCache {
    fn keys(&self) -> Vec<String> {
        self.store.keys()
    }

    fn contains(&self, name: &str) -> bool {
        self.store.contains(name)
    }
}

#[async_trait]
impl ResolverCache for MapCache {
    async fn fetch(&self, name: &str) -> Result<Addresses, DomainError> {
        let cached = self.store.read().get(name).cloned();
        if let Some(addresses) = cached {
            debug!(name = %name, "Cache HIT");
            return Ok(addresses);
        }

        debug!(name = %name, "Cache MISS");
        self.lookup(name).await
    }

    async fn lookup(&self, name: &str) -> Result<Addresses, DomainError> {
        live_lookup(self.store.as_ref(), name).await
    }

    async fn refresh(&self, timeout: Duration) {
        refresh_store(
            &self.store,
            self.strategy,
            self.refresh,
            timeout,
            self.close.token(),
        )
        .await;
    }

    fn add(&self, name: &str, addresses: Vec<IpAddr>) {
        self.store.upsert(name, Arc::new(addresses));
    }

    fn remove(&self, name: &str) {
        self.store.write().remove(name);
    }

    fn get(&self, name: &str) -> Option<Addresses> {
        self.store.read().get(name).cloned()
    }

    fn len(&self) -> usize {
        self.store.read().len()
    }

    fn purge(&self) {
        *self.store.write() = HashMap::with_capacity(INITIAL_CAPACITY);
    }

    fn close(&self) -> Result<(), DomainError> {
        if self.close.close() {
            info!("Map cache closed");
        }
        Ok(())
    }
}
