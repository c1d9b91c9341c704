#![allow(dead_code)]

mod mock_resolver;

pub use mock_resolver::MockResolver;

use ferrous_dnscache_application::ports::AddressResolver;
use std::net::IpAddr;
use std::sync::Arc;

pub fn ip(s: &str) -> IpAddr {
    s.parse().unwrap()
}

pub fn as_resolver(mock: &Arc<MockResolver>) -> Arc<dyn AddressResolver> {
    Arc::clone(mock) as Arc<dyn AddressResolver>
}

/// Placeholder names `host-0000.test`, `host-0001.test`, ... in sorted order.
pub fn placeholder_names(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("host-{i:04}.test")).collect()
}
