pub mod dns;
pub mod logging;

pub use dns::{LruCache, MapCache, Resolver, ResolverConfig, SystemResolver};
