use crate::subscription::SubscriptionInner;
use sesamestream_model::{Binding, Pattern};
use std::sync::Arc;

/// Everything a locked index mutation produced that must be dispatched
/// *outside* the lock: pattern-lifecycle events for `PatternObserver`s, and
/// candidate solutions for `emit_solution` (§4.4 "Snapshotting" — handler
/// and observer callbacks may reentrantly call back into the index, which
/// would deadlock a non-reentrant `std::sync::Mutex` if dispatched while
/// still held).
#[derive(Default)]
pub(crate) struct PendingEffects {
    pub(crate) emissions: Vec<(Arc<SubscriptionInner>, Binding)>,
    pub(crate) first_seen: Vec<Arc<Pattern>>,
    pub(crate) forgotten: Vec<Arc<Pattern>>,
}

impl PendingEffects {
    pub(crate) fn merge(&mut self, mut other: Self) {
        self.emissions.append(&mut other.emissions);
        self.first_seen.append(&mut other.first_seen);
        self.forgotten.append(&mut other.forgotten);
    }
}
