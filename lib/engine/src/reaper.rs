use crate::effects::PendingEffects;
use crate::index::IndexState;
use sesamestream_common::Metrics;
use std::time::Instant;

/// `shouldRunCleanup(secondsSinceLast, queriesAdded, statementsAdded) -> bool`
/// (§4.6). Injectable via `QueryIndex::set_cleanup_policy` (§6 `setCleanupPolicy`).
pub trait CleanupPolicy: Send + Sync {
    fn should_run_cleanup(&self, seconds_since_last: u64, queries_added: u64, statements_added: u64) -> bool;
}

/// The default policy named in §4.6: run if at least 30 seconds have
/// elapsed since the last cleanup, regardless of how much was ingested.
#[derive(Debug, Clone, Copy)]
pub struct DefaultCleanupPolicy {
    min_interval_secs: u64,
}

impl DefaultCleanupPolicy {
    #[must_use]
    pub const fn with_interval_secs(min_interval_secs: u64) -> Self {
        Self { min_interval_secs }
    }
}

impl Default for DefaultCleanupPolicy {
    fn default() -> Self {
        Self::with_interval_secs(30)
    }
}

impl CleanupPolicy for DefaultCleanupPolicy {
    fn should_run_cleanup(&self, seconds_since_last: u64, _queries_added: u64, _statements_added: u64) -> bool {
        seconds_since_last >= self.min_interval_secs
    }
}

/// One reap cycle (§4.6): drop partial solutions whose effective expiry has
/// passed, unsubscribing them from every pattern they still awaited (and
/// forgetting patterns that lose their last subscriber); then mark expired
/// subscriptions inactive and remove them from the index.
pub(crate) fn reap(state: &mut IndexState, now: Instant, metrics: &Metrics) -> PendingEffects {
    let mut effects = PendingEffects::default();

    let mut dropped: u64 = 0;
    for ps in state.pattern_store.all_partial_solutions() {
        if !ps.is_expired(now) {
            continue;
        }
        for pattern in &ps.patterns {
            if state.pattern_store.unsubscribe(pattern, &ps, metrics) {
                effects.forgotten.push(pattern.clone());
            }
        }
        dropped += 1;
    }
    if dropped > 0 {
        metrics.record_partial_solutions_dropped(dropped);
    }

    let expired_ids: Vec<_> = state
        .subscriptions
        .values()
        .filter(|subscription| subscription.expires_at().is_expired(now))
        .map(|subscription| subscription.id)
        .collect();
    for id in expired_ids {
        if let Some(subscription) = state.subscriptions.remove(&id) {
            subscription.deactivate();
            metrics.record_query_removed();
        }
    }

    effects
}
