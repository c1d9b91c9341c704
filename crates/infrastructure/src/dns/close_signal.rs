use std::sync::atomic::{AtomicBool, Ordering};
use tokio_util::sync::CancellationToken;

/// One-time termination signal shared by a cache (or façade) and the refresh
/// work it starts.
///
/// Only the first `close` cancels the token; later calls report `false` and do
/// nothing else.
#[derive(Debug, Default)]
pub struct CloseSignal {
    closed: AtomicBool,
    token: CancellationToken,
}

impl CloseSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn close(&self) -> bool {
        if self
            .closed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }
        self.token.cancel();
        true
    }

    pub fn is_closed(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}
