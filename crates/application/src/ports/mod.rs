pub mod address_resolver;
pub mod resolver_cache;

pub use address_resolver::AddressResolver;
pub use resolver_cache::{Addresses, RefreshableCache, ResolverCache};
