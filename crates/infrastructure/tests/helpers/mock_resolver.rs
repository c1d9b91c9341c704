use async_trait::async_trait;
use ferrous_dnscache_application::ports::AddressResolver;
use ferrous_dnscache_domain::DomainError;
use std::collections::{HashMap, HashSet};
use std::net::IpAddr;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::RwLock;

/// Address resolver with canned answers.
///
/// Names without a canned answer resolve to `127.0.0.1`.
pub struct MockResolver {
    answers: Arc<RwLock<HashMap<String, Vec<IpAddr>>>>,
    failing: Arc<RwLock<HashSet<String>>>,
    call_count: Arc<AtomicU64>,
    calls: Arc<Mutex<Vec<String>>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
    latency: Duration,
}

impl MockResolver {
    pub fn new() -> Self {
        Self {
            answers: Arc::new(RwLock::new(HashMap::new())),
            failing: Arc::new(RwLock::new(HashSet::new())),
            call_count: Arc::new(AtomicU64::new(0)),
            calls: Arc::new(Mutex::new(Vec::new())),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
            latency: Duration::ZERO,
        }
    }

    pub fn with_answers(entries: Vec<(&str, Vec<&str>)>) -> Self {
        let answers = entries
            .into_iter()
            .map(|(name, ips)| {
                (
                    name.to_string(),
                    ips.into_iter().map(|ip| ip.parse().unwrap()).collect(),
                )
            })
            .collect();
        Self {
            answers: Arc::new(RwLock::new(answers)),
            ..Self::new()
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub async fn set_answer(&self, name: &str, ips: Vec<&str>) {
        self.answers.write().await.insert(
            name.to_string(),
            ips.into_iter().map(|ip| ip.parse().unwrap()).collect(),
        );
    }

    pub async fn set_failing(&self, name: &str, fail: bool) {
        let mut failing = self.failing.write().await;
        if fail {
            failing.insert(name.to_string());
        } else {
            failing.remove(name);
        }
    }

    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Names looked up so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AddressResolver for MockResolver {
    async fn lookup_ip(&self, name: &str) -> Result<Vec<IpAddr>, DomainError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(name.to_string());

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let result = if self.failing.read().await.contains(name) {
            Err(DomainError::LookupFailed {
                name: name.to_string(),
                reason: "no such host".to_string(),
            })
        } else {
            Ok(self
                .answers
                .read()
                .await
                .get(name)
                .cloned()
                .unwrap_or_else(|| vec!["127.0.0.1".parse().unwrap()]))
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}
