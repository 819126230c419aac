use std::sync::atomic::{AtomicU64, Ordering};

/// Write-only-from-inside-the-index performance counters (§5, §9 "isolate
/// them behind a feature switch and make them atomic"). Every field is an
/// independent atomic so incrementing one never takes a lock, even though
/// the rest of the index is single-writer.
#[derive(Debug, Default)]
pub struct Metrics {
    queries_active: AtomicU64,
    statements_ingested: AtomicU64,
    solutions_emitted: AtomicU64,
    partial_solutions_live: AtomicU64,
    patterns_interned: AtomicU64,
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_query_added(&self) {
        self.queries_active.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_query_removed(&self) {
        self.queries_active.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn record_statement_ingested(&self) {
        self.statements_ingested.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_solution_emitted(&self) {
        self.solutions_emitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_partial_solution_created(&self) {
        self.partial_solutions_live.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_partial_solutions_dropped(&self, count: u64) {
        self.partial_solutions_live.fetch_sub(count, Ordering::Relaxed);
    }

    pub fn record_pattern_interned(&self) {
        self.patterns_interned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_pattern_forgotten(&self) {
        self.patterns_interned.fetch_sub(1, Ordering::Relaxed);
    }

    /// A consistent-enough snapshot for reporting (§5 "snapshot-read from
    /// outside"). Individual fields may be read a few nanoseconds apart, so
    /// this is not transactionally consistent across fields, which is fine
    /// for a reporting-only concern.
    #[must_use]
    pub fn snapshot(&self) -> IndexMetrics {
        IndexMetrics {
            queries_active: self.queries_active.load(Ordering::Relaxed),
            statements_ingested: self.statements_ingested.load(Ordering::Relaxed),
            solutions_emitted: self.solutions_emitted.load(Ordering::Relaxed),
            partial_solutions_live: self.partial_solutions_live.load(Ordering::Relaxed),
            patterns_interned: self.patterns_interned.load(Ordering::Relaxed),
        }
    }
}

/// An owned, point-in-time view of [`Metrics`] (§6 "Performance-metric log
/// lines"). `QueryIndex::metrics` returns this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndexMetrics {
    pub queries_active: u64,
    pub statements_ingested: u64,
    pub solutions_emitted: u64,
    pub partial_solutions_live: u64,
    pub patterns_interned: u64,
}
