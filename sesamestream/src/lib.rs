//! SesameStream: a continuous-query engine over an unbounded stream of RDF
//! triples (§1). Queries are registered before data arrives; every newly
//! ingested triple is matched forward-chaining style against all active
//! queries, and completed solutions are pushed to per-subscription
//! handlers. Both queries and triples carry a time-to-live.
//!
//! This crate is a thin facade re-exporting the workspace's small crates
//! under namespaced modules, the way `rdf-fusion` re-exports
//! `rdf_fusion_model`, `rdf_fusion_storage`, and friends.
//!
//! ```
//! use sesamestream::{QueryIndex, Ttl};
//! use sesamestream::api::{PassThrough, QueryBuilder, SolutionHandler};
//! use sesamestream::model::{Pattern, RdfVariable, Term};
//! use oxrdf::NamedNode;
//! use std::sync::{Arc, Mutex};
//!
//! let index = QueryIndex::new();
//! let results = Arc::new(Mutex::new(Vec::new()));
//! let collected = results.clone();
//! let handler: Arc<dyn SolutionHandler> = Arc::new(move |b| collected.lock().unwrap().push(b));
//!
//! let s = RdfVariable::new("s").unwrap();
//! let pattern = Pattern::new([
//!     Term::Variable(s.clone()),
//!     Term::Constant(oxrdf::Term::NamedNode(NamedNode::new("http://knows").unwrap())),
//!     Term::Constant(oxrdf::Term::NamedNode(NamedNode::new("http://example").unwrap())),
//! ]);
//! let query = QueryBuilder::default()
//!     .pattern(pattern)
//!     .project(s)
//!     .sequence_modifier(Arc::new(PassThrough))
//!     .build()
//!     .unwrap();
//! index.add_query(Ttl::INFINITE, query, handler).unwrap();
//!
//! index.add_statement(Ttl::INFINITE, [
//!     oxrdf::Term::NamedNode(NamedNode::new("http://a").unwrap()),
//!     oxrdf::Term::NamedNode(NamedNode::new("http://knows").unwrap()),
//!     oxrdf::Term::NamedNode(NamedNode::new("http://example").unwrap()),
//! ]);
//!
//! assert_eq!(results.lock().unwrap().len(), 1);
//! ```

pub mod model {
    pub use sesamestream_model::*;
}

pub mod common {
    pub use sesamestream_common::*;
}

pub mod api {
    pub use sesamestream_api::*;
}

pub use sesamestream_common::{Clock, Expiry, ManualClock, SesameStreamError, SystemClock, Ttl};
pub use sesamestream_engine::{CleanupPolicy, DefaultCleanupPolicy, QueryIndex, QueryIndexBuilder, Subscription, SubscriptionId};
