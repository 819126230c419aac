use crate::subscription::SubscriptionInner;
use sesamestream_common::Expiry;
use sesamestream_model::{Binding, Pattern};
use std::sync::Arc;
use std::time::Instant;

/// `(subscriptionId, patterns, bindings, expiresAt)` of §3.
///
/// `own_expiry` is the part of `expiresAt` this partial solution was
/// clamped to at creation time — `Expiry::Never` for a root, or the
/// `min` of the contributing triples' expiries for a child (§10.7 item 1,
/// "inherit forward, never loosen"). The subscription's own, independently
/// renewable expiry is *not* folded in here; [`Self::effective_expiry`]
/// combines both live, so a `renew()` on the subscription can rescue a
/// partial solution that `own_expiry` alone would not have protected, and a
/// lazy check at match time (not only the periodic reaper) can drop one
/// whose subscription expired without waiting for the next reap (§8 S4, S5).
pub(crate) struct PartialSolution {
    pub(crate) subscription: Arc<SubscriptionInner>,
    pub(crate) patterns: Vec<Arc<Pattern>>,
    pub(crate) bindings: Binding,
    own_expiry: Expiry,
}

impl PartialSolution {
    /// The partial solution born at query admission: all of the query's
    /// patterns, an empty binding set, and an `own_expiry` of `Never` since
    /// no triple has contributed to it yet (only the subscription's own
    /// expiry bounds it).
    pub(crate) fn root(subscription: Arc<SubscriptionInner>, patterns: Vec<Arc<Pattern>>) -> Self {
        Self {
            subscription,
            patterns,
            bindings: Binding::empty(),
            own_expiry: Expiry::Never,
        }
    }

    pub(crate) fn child(
        subscription: Arc<SubscriptionInner>,
        patterns: Vec<Arc<Pattern>>,
        bindings: Binding,
        own_expiry: Expiry,
    ) -> Self {
        Self {
            subscription,
            patterns,
            bindings,
            own_expiry,
        }
    }

    /// The two-part expiry model of §10.7: the earlier of what this
    /// partial solution was frozen to at creation and the subscription's
    /// current (possibly renewed) expiry.
    pub(crate) fn effective_expiry(&self) -> Expiry {
        self.own_expiry.min(self.subscription.expires_at())
    }

    /// `true` if this partial solution should be treated as gone: either
    /// its owning subscription was cancelled, or its effective expiry has
    /// passed. Checked lazily at match time in addition to the periodic
    /// reaper (§8 S4).
    pub(crate) fn is_expired(&self, now: Instant) -> bool {
        !self.subscription.is_active() || self.effective_expiry().is_expired(now)
    }

    /// "Terminal" (§4.3): satisfying its one remaining pattern produces a
    /// final solution rather than another partial solution.
    pub(crate) fn is_terminal(&self) -> bool {
        self.patterns.len() == 1
    }
}
