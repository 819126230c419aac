use crate::effects::PendingEffects;
use crate::emission;
use crate::matcher;
use crate::pattern_store::PatternStore;
use crate::reaper::{self, CleanupPolicy, DefaultCleanupPolicy};
use crate::subscription::{Subscription, SubscriptionId, SubscriptionInner};
use sesamestream_api::{PatternObserver, Query, SolutionHandler};
use sesamestream_common::{Clock, IndexMetrics, Metrics, SesameStreamError, SystemClock, Ttl};
use sesamestream_model::Tuple;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Instant;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Everything the single writer lock guards (§5 "all operations are
/// serialized by one lock"): the pattern store, the subscription table, and
/// the reap-scheduling bookkeeping.
pub(crate) struct IndexState {
    pub(crate) pattern_store: PatternStore,
    pub(crate) subscriptions: HashMap<SubscriptionId, Arc<SubscriptionInner>>,
    last_reap: Instant,
    queries_added_since_reap: u64,
    statements_added_since_reap: u64,
}

impl IndexState {
    pub(crate) fn new() -> Self {
        Self {
            pattern_store: PatternStore::new(),
            subscriptions: HashMap::new(),
            last_reap: Instant::now(),
            queries_added_since_reap: 0,
            statements_added_since_reap: 0,
        }
    }
}

/// A handle on the spawned background reaper task (§10.5), so
/// `QueryIndex::shut_down` can stop it and wait for it to actually finish.
struct ReaperHandle {
    stop: oneshot::Sender<()>,
    join: JoinHandle<()>,
}

pub(crate) struct IndexInner {
    state: Mutex<IndexState>,
    clock: RwLock<Arc<dyn Clock>>,
    cleanup_policy: RwLock<Arc<dyn CleanupPolicy>>,
    pattern_observers: Mutex<Vec<Arc<dyn PatternObserver>>>,
    metrics: Metrics,
    next_subscription_id: AtomicU64,
    reaper: Mutex<Option<ReaperHandle>>,
}

impl IndexInner {
    pub(crate) fn now(&self) -> Instant {
        self.clock.read().unwrap_or_else(std::sync::PoisonError::into_inner).now()
    }

    pub(crate) fn forget_subscription(&self, id: SubscriptionId) {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .subscriptions
            .remove(&id);
    }
}

/// Builds a [`QueryIndex`] (§10.4). Defaults: [`SystemClock`], and
/// [`DefaultCleanupPolicy`] (reap if ≥ 30 s elapsed).
pub struct QueryIndexBuilder {
    clock: Arc<dyn Clock>,
    cleanup_policy: Arc<dyn CleanupPolicy>,
}

impl Default for QueryIndexBuilder {
    fn default() -> Self {
        Self {
            clock: Arc::new(SystemClock),
            cleanup_policy: Arc::new(DefaultCleanupPolicy::default()),
        }
    }
}

impl QueryIndexBuilder {
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn cleanup_policy(mut self, policy: Arc<dyn CleanupPolicy>) -> Self {
        self.cleanup_policy = policy;
        self
    }

    #[must_use]
    pub fn build(self) -> QueryIndex {
        QueryIndex(Arc::new(IndexInner {
            state: Mutex::new(IndexState::new()),
            clock: RwLock::new(self.clock),
            cleanup_policy: RwLock::new(self.cleanup_policy),
            pattern_observers: Mutex::new(Vec::new()),
            metrics: Metrics::new(),
            next_subscription_id: AtomicU64::new(0),
            reaper: Mutex::new(None),
        }))
    }
}

/// The Query Index core (§2, §6): a continuous-query matching engine over
/// an unbounded triple stream. Cheaply `Clone`-able — every clone shares the
/// same underlying state, the way a connection pool handle does.
#[derive(Clone)]
pub struct QueryIndex(Arc<IndexInner>);

impl Default for QueryIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryIndex {
    /// An index with default clock and cleanup policy and no background
    /// reaper task spawned. Use [`Self::builder`] to customize either, or
    /// [`Self::spawn_background_reaper`] afterward to add the task.
    #[must_use]
    pub fn new() -> Self {
        QueryIndexBuilder::default().build()
    }

    #[must_use]
    pub fn builder() -> QueryIndexBuilder {
        QueryIndexBuilder::default()
    }

    /// `addQuery(ttl, parsedQuery, handler) -> Subscription` (§6). The
    /// front-end is responsible for rejecting unsupported syntax before
    /// calling this — by the time a [`Query`] exists, it is schema-valid, so
    /// this only fails if a future front-end integration surfaces a new
    /// rejection path through [`SesameStreamError`].
    pub fn add_query(
        &self,
        ttl: Ttl,
        query: Query,
        handler: Arc<dyn SolutionHandler>,
    ) -> Result<Subscription, SesameStreamError> {
        let now = self.now();
        let id = SubscriptionId::next(&self.0.next_subscription_id);
        let patterns = query.patterns().to_vec();
        let subscription = Arc::new(SubscriptionInner::new(id, query, handler, ttl.expiry_from(now)));

        let mut effects = PendingEffects::default();
        {
            let mut state = self.0.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
            let interned: Vec<_> = patterns
                .into_iter()
                .map(|p| state.pattern_store.intern(p, &self.0.metrics))
                .collect();
            let root = Arc::new(crate::partial_solution::PartialSolution::root(
                subscription.clone(),
                interned.clone(),
            ));
            for pattern in &interned {
                if state.pattern_store.subscribe(pattern, root.clone()) {
                    effects.first_seen.push(pattern.clone());
                }
            }
            state.subscriptions.insert(id, subscription.clone());
            state.queries_added_since_reap += 1;
            self.0.metrics.record_query_added();
            self.0.metrics.record_partial_solution_created();
        }
        self.dispatch(effects);

        tracing::debug!(subscription = %id, "query admitted");
        Ok(Subscription::new(id, subscription, Arc::downgrade(&self.0)))
    }

    /// `addStatement(ttl, tuple)` (§6). `ttl` of [`Ttl::INFINITE`] means the
    /// triple never expires.
    pub fn add_statement(&self, ttl: Ttl, tuple: Tuple) -> bool {
        self.add_statements(ttl, std::iter::once(tuple))
    }

    /// `addStatements(ttl, tuples...)` (§6). Ingests the whole batch under
    /// one lock acquisition (§10.7 "amortizes one lock acquisition across
    /// many triples"). Returns `true` if at least one triple matched at
    /// least one pattern.
    pub fn add_statements(&self, ttl: Ttl, tuples: impl IntoIterator<Item = Tuple>) -> bool {
        let now = self.now();
        let expires_at = ttl.expiry_from(now);
        let mut changed = false;
        let mut effects = PendingEffects::default();
        let mut count: u64 = 0;
        {
            let mut state = self.0.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
            for tuple in tuples {
                let (tuple_changed, tuple_effects) = matcher::ingest(&mut state, &tuple, expires_at, now, &self.0.metrics);
                changed |= tuple_changed;
                effects.merge(tuple_effects);
                self.0.metrics.record_statement_ingested();
                count += 1;
            }
            state.statements_added_since_reap += count;
        }
        self.dispatch(effects);
        changed
    }

    /// `clear()` (§6): drop everything — every subscription, partial
    /// solution, and interned pattern.
    pub fn clear(&self) {
        let mut state = self.0.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        *state = IndexState::new();
    }

    /// `setCleanupPolicy(policy)` (§6).
    pub fn set_cleanup_policy(&self, policy: Arc<dyn CleanupPolicy>) {
        *self.0.cleanup_policy.write().unwrap_or_else(std::sync::PoisonError::into_inner) = policy;
    }

    /// `setClock(clock)` (§6).
    pub fn set_clock(&self, clock: Arc<dyn Clock>) {
        *self.0.clock.write().unwrap_or_else(std::sync::PoisonError::into_inner) = clock;
    }

    /// Registers a [`PatternObserver`] (typically a Linked Data fetcher) to
    /// receive pattern-first-seen / pattern-forgotten events (§4.2, §4.4).
    pub fn add_pattern_observer(&self, observer: Arc<dyn PatternObserver>) {
        self.0
            .pattern_observers
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(observer);
    }

    /// Runs one reap cycle unconditionally, regardless of the configured
    /// [`CleanupPolicy`] (§4.6). Embedding hosts that drive reaping
    /// themselves (rather than spawning the background task) call this
    /// directly.
    pub fn reap(&self) {
        let now = self.now();
        let effects = {
            let mut state = self.0.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
            let effects = reaper::reap(&mut state, now, &self.0.metrics);
            state.last_reap = now;
            state.queries_added_since_reap = 0;
            state.statements_added_since_reap = 0;
            effects
        };
        self.dispatch(effects);
    }

    /// Runs [`Self::reap`] only if the configured [`CleanupPolicy`] says to.
    /// This is what the background task (§10.5) calls on every tick.
    pub fn maybe_reap(&self) {
        let now = self.now();
        let (seconds_since_last, queries_added, statements_added) = {
            let state = self.0.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
            (
                now.saturating_duration_since(state.last_reap).as_secs(),
                state.queries_added_since_reap,
                state.statements_added_since_reap,
            )
        };
        let policy = self
            .0
            .cleanup_policy
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone();
        if policy.should_run_cleanup(seconds_since_last, queries_added, statements_added) {
            self.reap();
        }
    }

    /// Spawns the background reaper task (§10.5, §4.6 "a background
    /// coordinator wakes up on a configurable policy"). Requires a `tokio`
    /// runtime to already be running. Calling this twice replaces the
    /// previous task (stopping it first).
    pub fn spawn_background_reaper(&self, tick: std::time::Duration) {
        let (stop_tx, mut stop_rx) = oneshot::channel();
        let index = self.clone();
        let join = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(tick);
            loop {
                tokio::select! {
                    _ = ticker.tick() => index.maybe_reap(),
                    _ = &mut stop_rx => break,
                }
            }
        });
        let mut reaper = self.0.reaper.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(previous) = reaper.replace(ReaperHandle { stop: stop_tx, join }) {
            let _ = previous.stop.send(());
        }
    }

    /// `shutDown()` (§6, §5 "Shutdown"): stops the background reaper task
    /// and waits for it to actually exit, so no reap runs after this
    /// returns. A no-op if no background task was ever spawned.
    pub async fn shut_down(&self) {
        let handle = self.0.reaper.lock().unwrap_or_else(std::sync::PoisonError::into_inner).take();
        if let Some(handle) = handle {
            let _ = handle.stop.send(());
            let _ = handle.join.await;
        }
    }

    /// A point-in-time snapshot of the performance counters (§5, §9, §10.7
    /// "Metrics snapshot API").
    #[must_use]
    pub fn metrics(&self) -> IndexMetrics {
        self.0.metrics.snapshot()
    }

    fn now(&self) -> Instant {
        self.0.now()
    }

    /// Dispatches pattern-lifecycle events and candidate-solution emissions
    /// collected under the lock, entirely outside it (§4.4 "Snapshotting").
    fn dispatch(&self, effects: PendingEffects) {
        if !effects.first_seen.is_empty() || !effects.forgotten.is_empty() {
            let observers = self
                .0
                .pattern_observers
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .clone();
            for pattern in &effects.first_seen {
                for observer in &observers {
                    observer.pattern_first_seen(pattern);
                }
            }
            for pattern in &effects.forgotten {
                for observer in &observers {
                    observer.pattern_forgotten(pattern);
                }
            }
        }
        for (subscription, bindings) in effects.emissions {
            emission::emit_solution(&subscription, bindings, &self.0.metrics);
        }
    }
}
