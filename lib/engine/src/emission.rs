use crate::subscription::SubscriptionInner;
use sesamestream_common::Metrics;
use sesamestream_model::Binding;
use std::sync::Arc;

/// `emit_solution(subscriptionId, bindings)` (§4.5). Runs entirely outside
/// the index's lock — filters, the sequence modifier, and the handler are
/// all foreign code that may reentrantly call back into `QueryIndex`.
pub(crate) fn emit_solution(subscription: &Arc<SubscriptionInner>, bindings: Binding, metrics: &Metrics) {
    // Step 1: dead subscriptions (cancelled since the match was queued) are
    // dropped silently.
    if !subscription.is_active() {
        return;
    }

    // Step 3: filters see the full, pre-projection binding set.
    for filter in subscription.query.filters() {
        match filter.apply(&bindings) {
            Ok(true) => {}
            Ok(false) => return,
            Err(error) => {
                tracing::error!(error = %error, subscription = %subscription.id, "filter evaluation failed; rejecting candidate solution");
                return;
            }
        }
    }

    // Step 2: project + apply constants now that the filter has accepted.
    let projected = subscription.query.project(&bindings);

    // Step 4: DISTINCT / REDUCED / OFFSET / LIMIT.
    let outcome = subscription
        .query
        .sequence_modifier()
        .try_solution(&projected, subscription.id.as_u64());
    if outcome.closes_subscription() {
        subscription.deactivate();
    }
    if !outcome.accepted() {
        return;
    }

    metrics.record_solution_emitted();
    #[cfg(feature = "metrics")]
    tracing::info!(subscription = %subscription.id, bindings = ?projected, "SOLUTION");

    // Step 5: invoke the handler.
    if let Some(handler) = &subscription.handler {
        handler.handle(projected);
    }
}
