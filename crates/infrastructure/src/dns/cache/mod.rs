//! Storage back-ends of the resolver cache.

mod bounded;
mod common;
mod lru;
mod map;

pub use lru::{LruCache, LruCacheBuilder};
pub use map::{MapCache, MapCacheBuilder};
