use crate::partial_solution::PartialSolution;
use sesamestream_common::Metrics;
use sesamestream_model::Pattern;
use std::collections::HashMap;
use std::sync::Arc;

/// §4.2. Deduplicates patterns (`representatives`) and maintains the
/// reverse index `subscribers: pattern -> partial solutions awaiting it`.
///
/// Canonicalization means equality between two interned patterns collapses
/// to pointer equality: `Arc::ptr_eq`, not a structural `Pattern::eq` call,
/// is what the Matcher uses to test "is this the pattern I just satisfied"
/// (§4.4 "Identity-based satisfied pattern skip").
#[derive(Default)]
pub(crate) struct PatternStore {
    representatives: HashMap<Pattern, Arc<Pattern>>,
    subscribers: HashMap<Arc<Pattern>, Vec<Arc<PartialSolution>>>,
}

impl PatternStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// `intern(p) -> canonicalP` (§4.2): insert if absent, return the
    /// representative. Never emits pattern-lifecycle events by itself —
    /// only `subscribe` and `unsubscribe` do, since a pattern can be
    /// interned without yet gaining a subscriber (e.g. a
    /// rewritten-but-not-yet-subscribed pattern mid-`extend`) — but it does
    /// move the `patterns_interned` counter, since that counter tracks
    /// everything the store is holding onto, not just subscribed patterns.
    pub(crate) fn intern(&mut self, pattern: Pattern, metrics: &Metrics) -> Arc<Pattern> {
        if let Some(existing) = self.representatives.get(&pattern) {
            return existing.clone();
        }
        let canonical = Arc::new(pattern.clone());
        self.representatives.insert(pattern, canonical.clone());
        metrics.record_pattern_interned();
        canonical
    }

    /// `subscribe(canonicalP, ps)` (§4.2). Returns `true` if this is the
    /// first-ever subscriber to `canonicalP` ("pattern-first-seen", §4.4).
    pub(crate) fn subscribe(&mut self, pattern: &Arc<Pattern>, ps: Arc<PartialSolution>) -> bool {
        match self.subscribers.get_mut(pattern) {
            Some(existing) => {
                existing.push(ps);
                false
            }
            None => {
                self.subscribers.insert(pattern.clone(), vec![ps]);
                true
            }
        }
    }

    /// `unsubscribe(canonicalP, ps)` (§4.2). Returns `true` if the
    /// subscriber collection became empty as a result, meaning the pattern
    /// is now forgotten entirely (invariant 3, §3).
    pub(crate) fn unsubscribe(&mut self, pattern: &Arc<Pattern>, ps: &Arc<PartialSolution>, metrics: &Metrics) -> bool {
        let Some(list) = self.subscribers.get_mut(pattern) else {
            return false;
        };
        list.retain(|candidate| !Arc::ptr_eq(candidate, ps));
        if list.is_empty() {
            self.subscribers.remove(pattern);
            self.representatives.remove(pattern.as_ref());
            metrics.record_pattern_forgotten();
            true
        } else {
            false
        }
    }

    /// `iterate()` (§4.2): a snapshot of currently-interesting patterns,
    /// safe to iterate even if a handler reentrantly grows the store
    /// (§4.4 "Snapshotting").
    pub(crate) fn snapshot_patterns(&self) -> Vec<Arc<Pattern>> {
        self.subscribers.keys().cloned().collect()
    }

    /// A snapshot of the partial solutions awaiting `pattern`, taken before
    /// dispatch for the same reentrancy reason as [`Self::snapshot_patterns`].
    pub(crate) fn subscribers_of(&self, pattern: &Arc<Pattern>) -> Vec<Arc<PartialSolution>> {
        self.subscribers.get(pattern).cloned().unwrap_or_default()
    }

    /// Every partial solution currently reachable from the store, each
    /// counted once even though it may appear under several patterns. Used
    /// only by the reaper, which needs to consider each partial solution's
    /// expiry exactly once regardless of how many patterns it still awaits.
    pub(crate) fn all_partial_solutions(&self) -> Vec<Arc<PartialSolution>> {
        let mut seen = std::collections::HashSet::new();
        let mut result = Vec::new();
        for group in self.subscribers.values() {
            for ps in group {
                if seen.insert(Arc::as_ptr(ps) as usize) {
                    result.push(ps.clone());
                }
            }
        }
        result
    }

    #[cfg(test)]
    pub(crate) fn pattern_count(&self) -> usize {
        self.representatives.len()
    }
}
