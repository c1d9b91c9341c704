use super::{pace, refresh_one, Pace, RefreshPass};
use tokio::time::Instant;
use tracing::debug;

/// One lookup at a time, `sleep` apart.
///
/// The first name is resolved without waiting. After each pause, names that
/// left the cache in the meantime are skipped until a resident one is found.
pub(super) async fn run(pass: &RefreshPass, started: Instant) -> bool {
    if pass.closed.is_cancelled() {
        return false;
    }

    let names = pass.snapshot();
    if names.is_empty() {
        return true;
    }

    let deadline = pass.deadline(started);
    let mut names = names.into_iter();
    let mut refreshed = 0usize;
    let mut skipped = 0usize;

    if let Some(first) = names.next() {
        refresh_one(&pass.lookup, first).await;
        refreshed += 1;
    }

    while names.len() > 0 {
        match pace(pass.options.sleep, deadline, &pass.closed).await {
            Pace::Ready => {}
            Pace::Expired => {
                debug!(refreshed, remaining = names.len(), "Sequential refresh hit its deadline");
                return false;
            }
            Pace::Closed => {
                debug!(refreshed, "Sequential refresh cancelled by close");
                return false;
            }
        }

        let Some(name) = names.by_ref().find(|name| {
            let resident = pass.cache.contains(name);
            if !resident {
                skipped += 1;
            }
            resident
        }) else {
            break;
        };

        refresh_one(&pass.lookup, name).await;
        refreshed += 1;
    }

    debug!(refreshed, skipped, "Sequential refresh completed");
    true
}
