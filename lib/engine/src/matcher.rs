use crate::effects::PendingEffects;
use crate::index::IndexState;
use crate::partial_solution::PartialSolution;
use sesamestream_common::{Expiry, Metrics};
use sesamestream_model::{substitute, unify, Pattern, Tuple};
use std::sync::Arc;
use std::time::Instant;

/// `ingest(tuple, ttl, now)` (§4.4). Unifies `tuple` against every
/// currently-interesting canonical pattern and extends each awaiting
/// partial solution. Returns `true` if at least one pattern matched.
pub(crate) fn ingest(
    state: &mut IndexState,
    tuple: &Tuple,
    expires_at: Expiry,
    now: Instant,
    metrics: &Metrics,
) -> (bool, PendingEffects) {
    let mut changed = false;
    let mut effects = PendingEffects::default();
    for pattern in state.pattern_store.snapshot_patterns() {
        let Some(binding) = unify(&pattern, tuple) else {
            continue;
        };
        changed = true;
        for ps in state.pattern_store.subscribers_of(&pattern) {
            if ps.is_expired(now) {
                continue;
            }
            let child_expiry = expires_at.min(ps.effective_expiry());
            extend(state, &ps, &pattern, binding.clone(), child_expiry, metrics, &mut effects);
        }
    }
    (changed, effects)
}

/// `extend(ps, satisfiedP, newBindings, childExpiresAt)` (§4.4).
fn extend(
    state: &mut IndexState,
    ps: &Arc<PartialSolution>,
    satisfied: &Arc<Pattern>,
    new_bindings: sesamestream_model::Binding,
    child_expiry: Expiry,
    metrics: &Metrics,
    effects: &mut PendingEffects,
) {
    let next_bindings = ps.bindings.extend(&new_bindings);
    if ps.is_terminal() {
        effects.emissions.push((ps.subscription.clone(), next_bindings));
        return;
    }

    let mut next_patterns = Vec::with_capacity(ps.patterns.len() - 1);
    for candidate in &ps.patterns {
        if Arc::ptr_eq(candidate, satisfied) {
            continue;
        }
        match substitute(candidate, &new_bindings) {
            None => next_patterns.push(candidate.clone()),
            Some(rewritten) => next_patterns.push(state.pattern_store.intern(rewritten, metrics)),
        }
    }

    let child = Arc::new(PartialSolution::child(
        ps.subscription.clone(),
        next_patterns,
        next_bindings,
        child_expiry,
    ));
    metrics.record_partial_solution_created();
    for pattern in &child.patterns {
        if state.pattern_store.subscribe(pattern, child.clone()) {
            effects.first_seen.push(pattern.clone());
        }
    }
}
