use crate::{RdfTerm, RdfVariable};
use std::fmt;
use std::sync::Arc;

/// A node of the persistent, prepend-only binding list (§9 "The prepend-only
/// binding list is trivial as a reference-counted cons-list"). `Arc` rather
/// than `Rc` is used throughout the engine so that a [`Binding`] — and the
/// partial solutions that carry one — can be shared across the background
/// reaper task without forcing every embedding to be single-threaded.
struct Node {
    name: RdfVariable,
    value: RdfTerm,
    parent: Option<Arc<Node>>,
}

/// An immutable variable-name-to-value mapping (§3 "Binding").
///
/// Bindings are never merged or mutated in place: "extending" one produces a
/// new `Binding` that logically prepends new pairs onto the old one, in
/// O(1) regardless of how large the old binding already was.
#[derive(Clone, Default)]
pub struct Binding(Option<Arc<Node>>);

impl Binding {
    /// The binding with no entries — the one every query's root partial
    /// solution starts from.
    #[must_use]
    pub const fn empty() -> Self {
        Self(None)
    }

    /// `true` if no variable is bound.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// Look up the value bound to `name`, if any. Walks the cons-list from
    /// most-recently-prepended to oldest, so a shadowing `prepend` for an
    /// already-bound name (which the matcher never produces, but which
    /// callers outside the matcher could) would return the newer value.
    #[must_use]
    pub fn get(&self, name: &RdfVariable) -> Option<&RdfTerm> {
        let mut current = self.0.as_deref();
        while let Some(node) = current {
            if &node.name == name {
                return Some(&node.value);
            }
            current = node.parent.as_deref();
        }
        None
    }

    /// Returns a new binding with `(name, value)` prepended. Does not check
    /// for an existing entry under `name`; callers that must guarantee
    /// uniqueness (the matcher's `unify`) check with [`Self::get`] first.
    #[must_use]
    pub fn prepend(&self, name: RdfVariable, value: RdfTerm) -> Self {
        Self(Some(Arc::new(Node {
            name,
            value,
            parent: self.0.clone(),
        })))
    }

    /// Prepends every pair of `other` onto `self`, preserving `other`'s own
    /// internal order. This is how `extend` in the matcher combines a
    /// triple's freshly unified bindings with a partial solution's
    /// previously accumulated ones (§4.4 "Bindings prepended, not merged").
    #[must_use]
    pub fn extend(&self, other: &Self) -> Self {
        let pairs: Vec<(RdfVariable, RdfTerm)> = other
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        let mut result = self.clone();
        for (name, value) in pairs.into_iter().rev() {
            result = result.prepend(name, value);
        }
        result
    }

    /// Iterates bindings from most-recently-prepended to oldest.
    pub fn iter(&self) -> BindingIter<'_> {
        BindingIter {
            current: self.0.as_deref(),
        }
    }

    /// The number of bound variables, counting shadowed duplicates (the
    /// matcher never produces those, so in practice this is the number of
    /// distinct variables bound so far).
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(name, value)| (name, value)))
            .finish()
    }
}

/// Iterator over a [`Binding`]'s entries, most-recent first.
pub struct BindingIter<'a> {
    current: Option<&'a Node>,
}

impl<'a> Iterator for BindingIter<'a> {
    type Item = (&'a RdfVariable, &'a RdfTerm);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.current?;
        self.current = node.parent.as_deref();
        Some((&node.name, &node.value))
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
    fn empty_binding_has_no_entries() {
        let b = Binding::empty();
        assert!(b.is_empty());
        assert_eq!(b.len(), 0);
    }

    #[test]
    fn prepend_is_visible_and_does_not_mutate_parent() {
        let x = RdfVariable::new("x").unwrap();
        let b0 = Binding::empty();
        let b1 = b0.prepend(x.clone(), nn("http://a"));
        assert_eq!(b1.get(&x), Some(&nn("http://a")));
        assert_eq!(b0.get(&x), None);
    }

    #[test]
    fn extend_prepends_all_pairs_from_other() {
        let x = RdfVariable::new("x").unwrap();
        let y = RdfVariable::new("y").unwrap();
        let base = Binding::empty().prepend(x.clone(), nn("http://a"));
        let fresh = Binding::empty().prepend(y.clone(), nn("http://b"));
        let combined = base.extend(&fresh);
        assert_eq!(combined.get(&x), Some(&nn("http://a")));
        assert_eq!(combined.get(&y), Some(&nn("http://b")));
        assert_eq!(combined.len(), 2);
    }
}
