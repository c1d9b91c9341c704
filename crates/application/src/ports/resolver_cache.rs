use async_trait::async_trait;
use ferrous_dnscache_domain::DomainError;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

/// Cached lookup result. An empty list is a valid (placeholder) value.
pub type Addresses = Arc<Vec<IpAddr>>;

/// Minimal surface a refresher needs from a cache.
pub trait RefreshableCache: Send + Sync {
    /// Sorted snapshot of the resident names.
    fn keys(&self) -> Vec<String>;

    /// Membership probe, used to skip names evicted during a pass.
    fn contains(&self, name: &str) -> bool;
}

/// Storage back-end contract used by the `Resolver` façade.
///
/// Every method must be safe to call from many tasks at once.
#[async_trait]
pub trait ResolverCache: RefreshableCache {
    /// Cached value if present, otherwise a live lookup that is then cached.
    async fn fetch(&self, name: &str) -> Result<Addresses, DomainError>;

    /// Always a live lookup. Successful results are upserted; failures leave
    /// the cache untouched.
    async fn lookup(&self, name: &str) -> Result<Addresses, DomainError>;

    /// Re-resolve the resident names with the configured refresher.
    /// `Duration::ZERO` means no deadline.
    async fn refresh(&self, timeout: Duration);

    /// Upsert without calling the resolver.
    fn add(&self, name: &str, addresses: Vec<IpAddr>);

    /// Remove the entry if present.
    fn remove(&self, name: &str);

    fn get(&self, name: &str) -> Option<Addresses>;

    /// Number of resident entries. Bounded back-ends may report an estimate.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn purge(&self);

    /// Stop any refresh tied to this instance. Calling it again is a no-op.
    fn close(&self) -> Result<(), DomainError>;
}
