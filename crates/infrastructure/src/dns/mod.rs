pub mod cache;
pub mod cache_updater;
pub mod close_signal;
pub mod refresh;
pub mod resolver;
pub mod system_resolver;

pub use cache::{LruCache, LruCacheBuilder, MapCache, MapCacheBuilder};
pub use cache_updater::CacheUpdater;
pub use close_signal::CloseSignal;
pub use refresh::{lookup_fn, LookupFn, RefreshPass};
pub use resolver::{Resolver, ResolverConfig};
pub use system_resolver::SystemResolver;
