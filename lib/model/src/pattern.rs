use crate::{RdfTerm, RdfVariable, Term};
use std::fmt;

/// Tuple arity. The design admits larger arities (e.g. quads), but the
/// reference implementation fixes it at 3 (subject, predicate, object); see
/// §1 Non-goals ("named graphs / quads").
pub const ARITY: usize = 3;

/// A concrete, fully-ground RDF tuple as ingested by [`crate::unify`] — the
/// wire shape of a single RDF triple.
pub type Tuple = [RdfTerm; ARITY];

/// An ordered tuple of [`Term`]s of fixed [`ARITY`].
///
/// `Pattern` is a plain value type; *canonicalization* (holding exactly one
/// representative per structural-equality class) is the responsibility of
/// `sesamestream_engine::PatternStore`, which interns these values behind
/// `Arc` so that identity comparisons become a pointer-equality shortcut
/// (§3 "Patterns are canonicalized").
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Pattern([Term; ARITY]);

impl Pattern {
    #[must_use]
    pub const fn new(terms: [Term; ARITY]) -> Self {
        Self(terms)
    }

    #[must_use]
    pub const fn terms(&self) -> &[Term; ARITY] {
        &self.0
    }

    /// `true` if every position is a constant (no variables left to bind).
    #[must_use]
    pub fn is_ground(&self) -> bool {
        self.0.iter().all(Term::is_constant)
    }

    /// The distinct variables appearing in this pattern, in positional order
    /// (duplicates removed, first occurrence wins).
    #[must_use]
    pub fn variables(&self) -> Vec<&RdfVariable> {
        let mut seen = Vec::with_capacity(ARITY);
        for term in &self.0 {
            if let Term::Variable(name) = term {
                if !seen.contains(&name) {
                    seen.push(name);
                }
            }
        }
        seen
    }

    /// The constant named-node/literal/blank-node values a Linked Data
    /// fetcher would dereference for this pattern (§4.4 "First-seen pattern
    /// event").
    pub fn constants(&self) -> impl Iterator<Item = &RdfTerm> {
        self.0.iter().filter_map(Term::as_constant)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, term) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{term}")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::NamedNode;

    fn nn(iri: &str) -> RdfTerm {
        RdfTerm::NamedNode(NamedNode::new(iri).unwrap())
    }

    #[test]
    fn ground_pattern_has_no_variables() {
        let p = Pattern::new([
            Term::Constant(nn("http://a")),
            Term::Constant(nn("http://p")),
            Term::Constant(nn("http://o")),
        ]);
        assert!(p.is_ground());
        assert!(p.variables().is_empty());
    }

    #[test]
    fn repeated_variable_counted_once() {
        let x = RdfVariable::new("x").unwrap();
        let p = Pattern::new([
            Term::Variable(x.clone()),
            Term::Constant(nn("http://knows")),
            Term::Variable(x),
        ]);
        assert_eq!(p.variables().len(), 1);
        assert!(!p.is_ground());
    }
}
