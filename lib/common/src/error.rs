use std::error::Error;

/// The error taxonomy of §7.
///
/// Input-validation errors (`InvalidQuery`, `IncompatibleQuery`) surface
/// synchronously from `addQuery`; they are produced by the SPARQL front-end
/// collaborator, which is out of scope for this crate, but the variants are
/// kept here so the core's `Result` types and a front-end's can share one
/// error type, the way `rdf-fusion`'s `QueryEvaluationError` absorbs errors
/// from multiple collaborating layers into one enum.
///
/// Ingestion itself never fails observably (§7 "bad triples are simply
/// unmatched"); `FilterEvaluation` and `Fetcher` errors are logged and
/// contained rather than returned to the ingesting caller.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SesameStreamError {
    /// The query text could not be parsed at all.
    #[error("invalid query: {0}")]
    InvalidQuery(String),
    /// The query parsed but uses a feature this engine does not support
    /// (UNION, ORDER BY, EXISTS, ASK/CONSTRUCT/DESCRIBE/MODIFY, multiple
    /// roots, or an unexpected algebra node). Carries the offending node.
    #[error("incompatible query, unsupported construct: {0}")]
    IncompatibleQuery(String),
    /// A filter raised an error while being evaluated against a candidate
    /// solution. Locally suppressed by the caller: the candidate is
    /// rejected and the error is logged at a severe level (§7).
    #[error("filter evaluation failed: {0}")]
    FilterEvaluation(#[source] Box<dyn Error + Send + Sync + 'static>),
    /// An asynchronous error from the Linked Data fetcher collaborator.
    /// Logged; never propagated back into the index.
    #[error("fetcher failed: {0}")]
    Fetcher(#[source] Box<dyn Error + Send + Sync + 'static>),
    /// A bug indicator: an invariant this crate is supposed to guarantee by
    /// construction (§3's five `PartialSolution`/`PatternStore` invariants)
    /// was observed to be violated.
    #[error("internal invariant violated: {0}")]
    InternalInvariantViolation(String),
}

impl SesameStreamError {
    /// Builds a [`Self::FilterEvaluation`] from any boxable error.
    pub fn filter_evaluation(error: impl Into<Box<dyn Error + Send + Sync + 'static>>) -> Self {
        Self::FilterEvaluation(error.into())
    }

    /// Builds a [`Self::Fetcher`] from any boxable error.
    pub fn fetcher(error: impl Into<Box<dyn Error + Send + Sync + 'static>>) -> Self {
        Self::Fetcher(error.into())
    }

    /// Builds an [`Self::InternalInvariantViolation`] from a message.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalInvariantViolation(message.into())
    }
}
