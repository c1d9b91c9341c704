//! Refresh strategies: re-resolve every resident name of a cache.
//!
//! A pass takes a sorted snapshot of the keys, optionally shuffles it and
//! feeds it to the selected [`RefreshStrategy`]. Names evicted while the pass
//! is running are detected with `contains` and skipped.

mod sequential;
mod windowed;

use ferrous_dnscache_application::ports::{Addresses, RefreshableCache};
use ferrous_dnscache_application::RefreshOptions;
use ferrous_dnscache_domain::{DomainError, OptionError, RefreshStrategy};
use futures::future::{BoxFuture, FutureExt};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Live lookup that stores its result, as performed by the owning cache.
pub type LookupFn =
    Arc<dyn Fn(String) -> BoxFuture<'static, Result<Addresses, DomainError>> + Send + Sync>;

/// Wraps an async closure as a [`LookupFn`].
pub fn lookup_fn<F, Fut>(f: F) -> LookupFn
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Addresses, DomainError>> + Send + 'static,
{
    Arc::new(move |name| f(name).boxed())
}

/// Inputs of one refresh pass.
#[derive(Clone)]
pub struct RefreshPass {
    pub cache: Arc<dyn RefreshableCache>,
    pub lookup: LookupFn,
    pub options: RefreshOptions,
    /// Termination signal of the owning cache.
    pub closed: CancellationToken,
}

impl RefreshPass {
    pub fn new(
        cache: Arc<dyn RefreshableCache>,
        lookup: LookupFn,
        options: RefreshOptions,
    ) -> Self {
        Self {
            cache,
            lookup,
            options,
            closed: CancellationToken::new(),
        }
    }

    pub fn with_close_token(mut self, closed: CancellationToken) -> Self {
        self.closed = closed;
        self
    }

    fn deadline(&self, started: Instant) -> Option<Instant> {
        if self.options.timeout.is_zero() {
            None
        } else {
            Some(started + self.options.timeout)
        }
    }

    fn snapshot(&self) -> Vec<String> {
        let mut names = self.cache.keys();
        if self.options.shuffle {
            fastrand::shuffle(&mut names);
        }
        names
    }
}

/// Runs `strategy` over the cache.
///
/// Returns `Ok(true)` when every selected name was attempted, `Ok(false)` when
/// the pass stopped early on its deadline or on close. A windowed strategy
/// with a zero window is rejected as a missing batch size.
pub async fn run(strategy: RefreshStrategy, pass: &RefreshPass) -> Result<bool, OptionError> {
    let started = Instant::now();

    let completed = match strategy {
        RefreshStrategy::Off => return Ok(true),
        RefreshStrategy::Sequential => sequential::run(pass, started).await,
        RefreshStrategy::WindowedParallel { window } => {
            windowed::run(pass, window, started).await?
        }
    };

    debug!(
        strategy = ?strategy,
        completed,
        elapsed = ?started.elapsed(),
        "Refresh pass finished"
    );

    Ok(completed)
}

/// Outcome of waiting between two lookups (or two waves).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pace {
    Ready,
    Expired,
    Closed,
}

async fn pace(sleep: Duration, deadline: Option<Instant>, closed: &CancellationToken) -> Pace {
    if closed.is_cancelled() {
        return Pace::Closed;
    }
    if deadline.is_some_and(|at| Instant::now() >= at) {
        return Pace::Expired;
    }
    if sleep.is_zero() {
        tokio::task::yield_now().await;
        return Pace::Ready;
    }

    let expiry = async {
        match deadline {
            Some(at) => tokio::time::sleep_until(at).await,
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        biased;
        _ = closed.cancelled() => Pace::Closed,
        _ = expiry => Pace::Expired,
        _ = tokio::time::sleep(sleep) => Pace::Ready,
    }
}

async fn refresh_one(lookup: &LookupFn, name: String) {
    if let Err(e) = lookup(name.clone()).await {
        warn!(name = %name, error = %e, "Refresh lookup failed");
    }
}
