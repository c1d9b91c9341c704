use crate::dns::refresh::{self, lookup_fn, LookupFn, RefreshPass};
use crate::dns::SystemResolver;
use ferrous_dnscache_application::ports::{AddressResolver, Addresses, RefreshableCache};
use ferrous_dnscache_application::{ConfigOption, RefreshOptions};
use ferrous_dnscache_domain::{DomainError, OptionError, OptionKey, RefreshStrategy, RefreshType};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Settings every back-end understands: the resolver and the refresher.
#[derive(Clone)]
pub(crate) struct CommonSettings {
    pub resolver: Arc<dyn AddressResolver>,
    pub refresh: RefreshOptions,
    pub refresh_type: RefreshType,
    pub refresh_batch_size: Option<usize>,
}

impl Default for CommonSettings {
    fn default() -> Self {
        Self {
            resolver: Arc::new(SystemResolver::new()),
            refresh: RefreshOptions::default(),
            refresh_type: RefreshType::default(),
            refresh_batch_size: None,
        }
    }
}

impl CommonSettings {
    pub fn apply(mut self, opt: &ConfigOption) -> Result<Self, OptionError> {
        match opt.key {
            OptionKey::Resolver => self.resolver = opt.value.as_resolver(opt.key)?,
            OptionKey::RefreshShuffle | OptionKey::RefreshSleepTime => {
                self.refresh = self.refresh.apply(opt)?
            }
            OptionKey::RefreshType => self.refresh_type = opt.value.as_refresh_type(opt.key)?,
            OptionKey::RefreshBatchSize => {
                self.refresh_batch_size = Some(opt.value.as_size(opt.key)?)
            }
            _ => return Err(OptionError::Unsupported),
        }
        Ok(self)
    }

    pub fn with_strategy(mut self, strategy: RefreshStrategy) -> Self {
        self.refresh_type = strategy.kind();
        self.refresh_batch_size = match strategy {
            RefreshStrategy::WindowedParallel { window } => Some(window),
            RefreshStrategy::Off | RefreshStrategy::Sequential => None,
        };
        self
    }

    pub fn strategy(&self) -> Result<RefreshStrategy, OptionError> {
        RefreshStrategy::from_parts(self.refresh_type, self.refresh_batch_size)
    }
}

/// Store operations a back-end exposes to its own refresher.
pub(crate) trait Store: RefreshableCache + 'static {
    fn resolver(&self) -> &Arc<dyn AddressResolver>;

    fn upsert(&self, name: &str, addresses: Addresses);
}

/// Live lookup through the store's resolver; the result is stored only on
/// success and errors are returned untouched.
pub(crate) async fn live_lookup<S: Store>(
    store: &S,
    name: &str,
) -> Result<Addresses, DomainError> {
    let addresses = Arc::new(store.resolver().lookup_ip(name).await?);
    store.upsert(name, Arc::clone(&addresses));
    Ok(addresses)
}

fn store_lookup<S: Store>(store: &Arc<S>) -> LookupFn {
    let store = Arc::clone(store);
    lookup_fn(move |name: String| {
        let store = Arc::clone(&store);
        async move { live_lookup(store.as_ref(), &name).await }
    })
}

/// Runs one refresh pass of `store` and swallows incompleteness.
pub(crate) async fn refresh_store<S: Store>(
    store: &Arc<S>,
    strategy: RefreshStrategy,
    options: RefreshOptions,
    timeout: Duration,
    closed: &CancellationToken,
) {
    let cache: Arc<dyn RefreshableCache> = Arc::clone(store) as Arc<dyn RefreshableCache>;
    let pass = RefreshPass::new(cache, store_lookup(store), options.with_timeout(timeout))
        .with_close_token(closed.clone());

    match refresh::run(strategy, &pass).await {
        Ok(true) => {}
        Ok(false) => debug!(timeout = ?timeout, "Refresh pass left entries stale"),
        Err(e) => warn!(error = %e, "Refresh pass rejected"),
    }
}
