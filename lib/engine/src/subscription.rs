use crate::index::IndexInner;
use sesamestream_api::Query;
use sesamestream_api::SolutionHandler;
use sesamestream_common::{Expiry, Ttl};
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

/// A front-end-independent subscription identifier, assigned by the index
/// itself at `addQuery` time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub(crate) fn next(counter: &AtomicU64) -> Self {
        Self(counter.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub{}", self.0)
    }
}

/// The `(query, handler, active)` handle of §3 "Subscription", minus the
/// host-facing wrapper ([`Subscription`] below). Every [`crate::partial_solution::PartialSolution`]
/// holds an `Arc` to one of these rather than copying the query or handler.
pub(crate) struct SubscriptionInner {
    pub(crate) id: SubscriptionId,
    pub(crate) query: Query,
    pub(crate) handler: Option<Arc<dyn SolutionHandler>>,
    active: AtomicBool,
    expires_at: Mutex<Expiry>,
}

impl SubscriptionInner {
    pub(crate) fn new(id: SubscriptionId, query: Query, handler: Arc<dyn SolutionHandler>, expires_at: Expiry) -> Self {
        Self {
            id,
            query,
            handler: Some(handler),
            active: AtomicBool::new(true),
            expires_at: Mutex::new(expires_at),
        }
    }

    #[cfg(test)]
    pub(crate) fn new_for_test(query: Query) -> Self {
        Self {
            id: SubscriptionId(0),
            query,
            handler: None,
            active: AtomicBool::new(true),
            expires_at: Mutex::new(Expiry::Never),
        }
    }

    pub(crate) fn expires_at(&self) -> Expiry {
        *self.expires_at.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    pub(crate) fn set_expires_at(&self, expiry: Expiry) {
        *self.expires_at.lock().unwrap_or_else(std::sync::PoisonError::into_inner) = expiry;
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Deactivates the subscription and fires the sequence modifier's
    /// expiry hook exactly once (§10.7's DISTINCT-bookkeeping resolution).
    /// Idempotent: a second call is a no-op.
    pub(crate) fn deactivate(&self) {
        if self.active.swap(false, Ordering::AcqRel) {
            self.query.sequence_modifier().on_subscription_expired(self.id.as_u64());
        }
    }
}

/// The durable handle a caller gets back from `addQuery` (§3
/// "Subscription", §6 `addQuery(...) -> Subscription`).
pub struct Subscription {
    id: SubscriptionId,
    inner: Arc<SubscriptionInner>,
    index: Weak<IndexInner>,
}

impl Subscription {
    pub(crate) fn new(id: SubscriptionId, inner: Arc<SubscriptionInner>, index: Weak<IndexInner>) -> Self {
        Self { id, inner, index }
    }

    #[must_use]
    pub const fn id(&self) -> SubscriptionId {
        self.id
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.inner.is_active()
    }

    /// Idempotent, immediate cancellation (§5). Already-spawned partial
    /// solutions are not eagerly dropped; they are reclaimed lazily, either
    /// at their next match attempt (which checks `subscription.is_active()`)
    /// or at the next reap cycle.
    pub fn cancel(&self) {
        self.inner.deactivate();
        if let Some(index) = self.index.upgrade() {
            index.forget_subscription(self.id);
        }
    }

    /// Resets the expiration to `now + ttl` (§5, §6 `Subscription.renew`).
    /// Affects only this subscription record; partial solutions already
    /// spawned keep the `own_expiry` they were clamped to at creation
    /// (§10.7 item 1).
    pub fn renew(&self, ttl: Ttl) {
        let Some(index) = self.index.upgrade() else {
            return;
        };
        let now = index.now();
        self.inner.set_expires_at(ttl.expiry_from(now));
    }
}
