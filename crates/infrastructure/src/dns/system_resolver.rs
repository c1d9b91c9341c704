use async_trait::async_trait;
use ferrous_dnscache_application::ports::AddressResolver;
use ferrous_dnscache_domain::validators::validate_domain_name;
use ferrous_dnscache_domain::DomainError;
use std::net::IpAddr;
use tracing::debug;

/// Resolves names through the operating system (`getaddrinfo` via tokio).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

impl SystemResolver {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AddressResolver for SystemResolver {
    async fn lookup_ip(&self, name: &str) -> Result<Vec<IpAddr>, DomainError> {
        validate_domain_name(name).map_err(|reason| DomainError::LookupFailed {
            name: name.to_string(),
            reason,
        })?;

        let resolved = tokio::net::lookup_host((name, 0))
            .await
            .map_err(|e| DomainError::LookupFailed {
                name: name.to_string(),
                reason: e.to_string(),
            })?;

        let mut addresses: Vec<IpAddr> = Vec::new();
        for addr in resolved {
            let ip = addr.ip();
            if !addresses.contains(&ip) {
                addresses.push(ip);
            }
        }

        debug!(name = %name, count = addresses.len(), "System lookup completed");
        Ok(addresses)
    }
}
