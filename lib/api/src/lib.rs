//! The contracts the Query Index core consumes from, or exposes to, its
//! collaborators (§6): the SPARQL front-end's parsed [`Query`] record, the
//! [`FilterEvaluator`] and [`SequenceModifier`] it supplies per query, the
//! [`SolutionHandler`] a subscriber registers, and the [`PatternObserver`]
//! a Linked Data fetcher subscribes as.
//!
//! None of these traits are implemented in this workspace — the SPARQL
//! front-end, filter evaluation, and Linked Data fetch-on-reference
//! subsystem are explicitly out of scope (§1) — but the core is generic
//! over them, so tests and embedding hosts provide their own.

mod handler;
mod observer;
mod query;
mod sequence_modifier;

pub use handler::SolutionHandler;
pub use observer::PatternObserver;
pub use query::{FilterEvaluator, Query, QueryBuilder, QueryId};
pub use sequence_modifier::{PassThrough, SequenceModifier, SequenceOutcome};
