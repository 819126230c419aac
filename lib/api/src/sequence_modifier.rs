use sesamestream_model::Binding;

/// The per-subscription sequence-modifier collaborator (§6): applies
/// DISTINCT / REDUCED / OFFSET / LIMIT semantics to a projected solution.
///
/// `try_solution` may return `false` to suppress the solution (e.g. a
/// duplicate under DISTINCT, or an OFFSET not yet consumed) and may
/// request that the subscription be deactivated once a LIMIT is reached,
/// by returning `SequenceOutcome::AcceptAndClose` rather than merely
/// `SequenceOutcome::Accept`.
pub trait SequenceModifier: Send + Sync {
    /// Decides whether a projected result binding-set should reach the
    /// handler. `subscription_id` identifies the subscription this result
    /// belongs to, in case the modifier keeps per-subscription state (e.g.
    /// a DISTINCT dedup set) shared across subscriptions.
    fn try_solution(&self, result: &Binding, subscription_id: u64) -> SequenceOutcome;

    /// Called when the owning subscription is cancelled or TTL-expired, so
    /// a modifier that keeps per-subscription bookkeeping (DISTINCT's dedup
    /// set) can release it on the same schedule as the subscription itself
    /// (§10.7's resolution of the "DISTINCT bookkeeping TTL" ambiguity).
    /// The default implementation does nothing, since most modifiers
    /// (OFFSET/LIMIT counters) have no state worth reclaiming early.
    fn on_subscription_expired(&self, subscription_id: u64) {
        let _ = subscription_id;
    }
}

/// The result of [`SequenceModifier::try_solution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceOutcome {
    /// Suppress the solution; the subscription stays active.
    Reject,
    /// Deliver the solution to the handler; the subscription stays active.
    Accept,
    /// Deliver the solution to the handler, then deactivate the
    /// subscription (a LIMIT was just reached).
    AcceptAndClose,
}

impl SequenceOutcome {
    #[must_use]
    pub const fn accepted(self) -> bool {
        matches!(self, Self::Accept | Self::AcceptAndClose)
    }

    #[must_use]
    pub const fn closes_subscription(self) -> bool {
        matches!(self, Self::AcceptAndClose)
    }
}

/// A sequence modifier with no DISTINCT/LIMIT/OFFSET — every solution is
/// accepted and the subscription never auto-closes. Useful as the default
/// for queries that specify none of those modifiers.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassThrough;

impl SequenceModifier for PassThrough {
    fn try_solution(&self, _result: &Binding, _subscription_id: u64) -> SequenceOutcome {
        SequenceOutcome::Accept
    }
}
