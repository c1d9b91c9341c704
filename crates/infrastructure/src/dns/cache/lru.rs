use super::bounded::{BoundedMap, IdleExpiringMap, TwoQueueMap};
use super::common::{live_lookup, refresh_store, CommonSettings, Store};
use crate::dns::close_signal::CloseSignal;
use async_trait::async_trait;
use ferrous_dnscache_application::ports::{
    AddressResolver, Addresses, RefreshableCache, ResolverCache,
};
use ferrous_dnscache_application::{find_option, ConfigOption, RefreshOptions};
use ferrous_dnscache_domain::{DomainError, OptionError, OptionKey, RefreshStrategy};
use std::net::IpAddr;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Bounded cache with two-queue eviction, or LRU eviction plus an idle TTL
/// when ItemTTL is set.
pub struct LruCache {
    store: Arc<LruStore>,
    strategy: RefreshStrategy,
    refresh: RefreshOptions,
    allow_refresh: bool,
    capacity: NonZeroUsize,
    item_ttl: Option<Duration>,
    close: CloseSignal,
}

struct LruStore {
    map: Box<dyn BoundedMap>,
    resolver: Arc<dyn AddressResolver>,
}

impl RefreshableCache for LruStore {
    fn keys(&self) -> Vec<String> {
        let mut keys = self.map.keys();
        keys.sort_unstable();
        keys
    }

    fn contains(&self, name: &str) -> bool {
        self.map.contains(name)
    }
}

impl Store for LruStore {
    fn resolver(&self) -> &Arc<dyn AddressResolver> {
        &self.resolver
    }

    fn upsert(&self, name: &str, addresses: Addresses) {
        self.map.add(name, addresses);
    }
}

/// Typed construction of an [`LruCache`].
#[derive(Clone)]
pub struct LruCacheBuilder {
    common: CommonSettings,
    capacity: usize,
    item_ttl: Option<Duration>,
    allow_refresh: bool,
}

impl LruCacheBuilder {
    fn new(capacity: usize) -> Self {
        Self {
            common: CommonSettings::default(),
            capacity,
            item_ttl: None,
            allow_refresh: true,
        }
    }

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

    /// Entries idle for longer than `ttl` are evicted.
    pub fn item_ttl(mut self, ttl: Duration) -> Self {
        self.item_ttl = Some(ttl);
        self
    }

    pub fn allow_refresh(mut self, allow: bool) -> Self {
        self.allow_refresh = allow;
        self
    }

    /// Applies one option. CacheSize and ItemTTL are fixed by the constructor,
    /// so here they are only type-checked.
    pub fn apply(mut self, opt: &ConfigOption) -> Result<Self, OptionError> {
        match opt.key {
            OptionKey::CacheSize => {
                opt.value.as_size(opt.key)?;
            }
            OptionKey::ItemTtl => {
                opt.value.as_duration(opt.key)?;
            }
            OptionKey::AllowRefresh => self.allow_refresh = opt.value.as_bool(opt.key)?,
            _ => self.common = self.common.apply(opt)?,
        }
        Ok(self)
    }

    pub fn build(self) -> Result<LruCache, OptionError> {
        let capacity =
            NonZeroUsize::new(self.capacity).ok_or_else(|| OptionError::InvalidValue {
                key: OptionKey::CacheSize,
                reason: "capacity must be greater than zero".to_string(),
            })?;
        let strategy = self.common.strategy()?;

        let map: Box<dyn BoundedMap> = match self.item_ttl {
            Some(ttl) if ttl.is_zero() => {
                return Err(OptionError::InvalidValue {
                    key: OptionKey::ItemTtl,
                    reason: "ttl must be greater than zero".to_string(),
                })
            }
            Some(ttl) => Box::new(IdleExpiringMap::new(capacity, ttl)),
            None => Box::new(TwoQueueMap::new(capacity)),
        };

        info!(
            capacity = capacity.get(),
            policy = map.policy(),
            ttl_secs = self.item_ttl.map(|t| t.as_secs()),
            allow_refresh = self.allow_refresh,
            strategy = ?strategy,
            "Initializing LRU cache"
        );

        Ok(LruCache {
            store: Arc::new(LruStore {
                map,
                resolver: self.common.resolver,
            }),
            strategy,
            refresh: self.common.refresh,
            allow_refresh: self.allow_refresh,
            capacity,
            item_ttl: self.item_ttl,
            close: CloseSignal::new(),
        })
    }
}

impl LruCache {
    /// Builds a cache from option records. CacheSize is required and is
    /// checked before anything else.
    pub fn new(options: &[ConfigOption]) -> Result<Self, OptionError> {
        let capacity = find_option(options, OptionKey::CacheSize)
            .ok_or(OptionError::MissingRequired(OptionKey::CacheSize))?
            .as_size(OptionKey::CacheSize)?;

        let mut builder = LruCacheBuilder::new(capacity);
        if let Some(ttl) = find_option(options, OptionKey::ItemTtl) {
            builder = builder.item_ttl(ttl.as_duration(OptionKey::ItemTtl)?);
        }

        options
            .iter()
            .try_fold(builder, |builder, opt| builder.apply(opt))?
            .build()
    }

    pub fn builder(capacity: usize) -> LruCacheBuilder {
        LruCacheBuilder::new(capacity)
    }

    /// Checks an option against this cache's rules without changing anything.
    pub fn validate_option(&self, opt: &ConfigOption) -> Result<(), OptionError> {
        LruCacheBuilder::new(self.capacity.get())
            .apply(opt)
            .map(|_| ())
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    pub fn item_ttl(&self) -> Option<Duration> {
        self.item_ttl
    }

    pub fn allows_refresh(&self) -> bool {
        self.allow_refresh
    }

    pub fn strategy(&self) -> RefreshStrategy {
        self.strategy
    }
}

impl RefreshableCache for LruCache {
    fn keys(&self) -> Vec<String> {
        self.store.keys()
    }

    fn contains(&self, name: &str) -> bool {
        self.store.contains(name)
    }
}

#[async_trait]
impl ResolverCache for LruCache {
    async fn fetch(&self, name: &str) -> Result<Addresses, DomainError> {
        if let Some(addresses) = self.store.map.get(name) {
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
        if !self.allow_refresh {
            return;
        }
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
        self.store.map.remove(name);
    }

    fn get(&self, name: &str) -> Option<Addresses> {
        self.store.map.get(name)
    }

    fn len(&self) -> usize {
        self.store.map.len()
    }

    fn purge(&self) {
        self.store.map.purge();
    }

    fn close(&self) -> Result<(), DomainError> {
        if self.close.close() {
            info!(capacity = self.capacity.get(), "LRU cache closed");
        }
        Ok(())
    }
}
