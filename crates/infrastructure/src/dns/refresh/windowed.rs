use super::{pace, refresh_one, Pace, RefreshPass};
use ferrous_dnscache_domain::{OptionError, OptionKey};
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Waves of up to `window` concurrent lookups, `sleep` apart.
///
/// The deadline is only checked between waves: a dispatched wave is never
/// interrupted and every spawned lookup is joined before returning. The
/// result tells whether all names were dispatched, not whether every lookup
/// succeeded.
pub(super) async fn run(
    pass: &RefreshPass,
    window: usize,
    started: Instant,
) -> Result<bool, OptionError> {
    if window == 0 {
        return Err(OptionError::MissingRequired(OptionKey::RefreshBatchSize));
    }
    if pass.closed.is_cancelled() {
        return Ok(false);
    }

    let names = pass.snapshot();
    if names.is_empty() {
        return Ok(true);
    }

    let deadline = pass.deadline(started);
    let mut inflight = JoinSet::new();
    let mut dispatched = 0usize;
    let mut skipped = 0usize;

    let first_wave = window.min(names.len());
    for name in &names[..first_wave] {
        spawn_lookup(&mut inflight, pass, name);
    }
    dispatched += first_wave;
    let mut next = first_wave;
    let mut completed = true;

    while next < names.len() {
        match pace(pass.options.sleep, deadline, &pass.closed).await {
            Pace::Ready => {}
            Pace::Expired | Pace::Closed => {
                debug!(
                    dispatched,
                    remaining = names.len() - next,
                    "Windowed refresh stopped before its next wave"
                );
                completed = false;
                break;
            }
        }

        reap(&mut inflight);

        let mut wave = 0usize;
        while next < names.len() && wave < window {
            let name = &names[next];
            next += 1;
            if pass.cache.contains(name) {
                spawn_lookup(&mut inflight, pass, name);
                wave += 1;
            } else {
                skipped += 1;
            }
        }
        dispatched += wave;
    }

    while let Some(joined) = inflight.join_next().await {
        if let Err(e) = joined {
            warn!(error = %e, "Refresh lookup task failed");
        }
    }

    if completed {
        debug!(dispatched, skipped, window, "Windowed refresh completed");
    }
    Ok(completed)
}

fn spawn_lookup(inflight: &mut JoinSet<()>, pass: &RefreshPass, name: &str) {
    let lookup = pass.lookup.clone();
    let name = name.to_string();
    inflight.spawn(async move { refresh_one(&lookup, name).await });
}

/// Drops the bookkeeping of lookups that already finished.
fn reap(inflight: &mut JoinSet<()>) {
    while let Some(joined) = inflight.try_join_next() {
        if let Err(e) = joined {
            warn!(error = %e, "Refresh lookup task failed");
        }
    }
}
