//! Term, tuple, pattern and binding primitives ("Term & Tuple", §4.1 of the
//! design). Everything here is pure data plus structural comparisons; the
//! mutable, index-owning pieces live in `sesamestream-engine`.
//!
//! RDF constants are not re-invented: [`RdfTerm`] and [`RdfVariable`] are
//! re-exported from [`oxrdf`], the same crate the rest of the RDF/SPARQL
//! ecosystem this workspace is grounded in already depends on.

mod binding;
mod pattern;
mod term;
mod unify;

pub use binding::{Binding, BindingIter};
pub use pattern::{Pattern, Tuple, ARITY};
pub use term::Term;
pub use unify::{substitute, unify};

pub use oxrdf::Term as RdfTerm;
pub use oxrdf::Variable as RdfVariable;
