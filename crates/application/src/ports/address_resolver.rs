use async_trait::async_trait;
use ferrous_dnscache_domain::DomainError;
use std::net::IpAddr;

/// The live name-to-address primitive sitting behind every cache.
///
/// Errors are handed to the cache caller exactly as returned here; caches
/// never retry, wrap or store them.
#[async_trait]
pub trait AddressResolver: Send + Sync {
    async fn lookup_ip(&self, name: &str) -> Result<Vec<IpAddr>, DomainError>;
}
