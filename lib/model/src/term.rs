use crate::{RdfTerm, RdfVariable};
use std::fmt;

/// A single position within a [`Pattern`](crate::Pattern): either a concrete
/// RDF value or a named placeholder.
///
/// Equality and hashing are structural (§3 "Equality on terms is structural;
/// hashing is structural"). Two variables are never unified against each
/// other directly; unification only ever compares a variable against a
/// concrete value drawn from an ingested tuple (see [`crate::unify`]).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Term {
    /// An opaque, concrete RDF value.
    Constant(RdfTerm),
    /// A named placeholder, bound only once a matching value is unified
    /// against it.
    Variable(RdfVariable),
}

impl Term {
    /// `true` if this term carries a concrete RDF value.
    #[must_use]
    pub const fn is_constant(&self) -> bool {
        matches!(self, Self::Constant(_))
    }

    /// `true` if this term is a variable placeholder.
    #[must_use]
    pub const fn is_variable(&self) -> bool {
        matches!(self, Self::Variable(_))
    }

    #[must_use]
    pub const fn as_constant(&self) -> Option<&RdfTerm> {
        match self {
            Self::Constant(value) => Some(value),
            Self::Variable(_) => None,
        }
    }

    #[must_use]
    pub const fn as_variable(&self) -> Option<&RdfVariable> {
        match self {
            Self::Variable(name) => Some(name),
            Self::Constant(_) => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(value) => write!(f, "{value}"),
            Self::Variable(name) => write!(f, "{name}"),
        }
    }
}

impl From<RdfTerm> for Term {
    fn from(value: RdfTerm) -> Self {
        Self::Constant(value)
    }
}

impl From<RdfVariable> for Term {
    fn from(value: RdfVariable) -> Self {
        Self::Variable(value)
    }
}
