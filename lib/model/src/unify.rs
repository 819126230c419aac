use crate::{Binding, Pattern, Term, Tuple, ARITY};

/// Position-wise unification of a pattern against a ground tuple (§4.1).
///
/// A constant term must equal the tuple element at that position, or
/// unification fails. A variable term records `name ↦ tupleValue`; if the
/// same variable name appears at multiple positions, all occurrences must
/// agree on the same value.
#[must_use]
pub fn unify(pattern: &Pattern, tuple: &Tuple) -> Option<Binding> {
    let mut binding = Binding::empty();
    for i in 0..ARITY {
        let value = &tuple[i];
        match &pattern.terms()[i] {
            Term::Constant(constant) => {
                if constant != value {
                    return None;
                }
            }
            Term::Variable(name) => match binding.get(name) {
                Some(existing) if existing != value => return None,
                Some(_) => {}
                None => binding = binding.prepend(name.clone(), value.clone()),
            },
        }
    }
    Some(binding)
}

/// Replaces every variable term of `pattern` whose name is bound in
/// `bindings` with the corresponding constant (§4.1).
///
/// Returns `None` — the "unchanged" signal — if no variable was
/// substituted, so that callers can skip re-interning a pattern that is
/// structurally identical to its input.
#[must_use]
pub fn substitute(pattern: &Pattern, bindings: &Binding) -> Option<Pattern> {
    let mut terms = pattern.terms().clone();
    let mut changed = false;
    for term in &mut terms {
        if let Term::Variable(name) = term {
            if let Some(value) = bindings.get(name) {
                *term = Term::Constant(value.clone());
                changed = true;
            }
        }
    }
    changed.then(|| Pattern::new(terms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::NamedNode;

    fn nn(iri: &str) -> crate::RdfTerm {
        crate::RdfTerm::NamedNode(NamedNode::new(iri).unwrap())
    }

    fn var(name: &str) -> crate::RdfVariable {
        crate::RdfVariable::new(name).unwrap()
    }

    #[test]
    fn unify_binds_variables_and_checks_constants() {
        let pattern = Pattern::new([
            Term::Variable(var("s")),
            Term::Constant(nn("http://p")),
            Term::Constant(nn("http://o")),
        ]);
        let tuple: Tuple = [nn("http://a"), nn("http://p"), nn("http://o")];
        let bindings = unify(&pattern, &tuple).unwrap();
        assert_eq!(bindings.get(&var("s")), Some(&nn("http://a")));
    }

    #[test]
    fn unify_fails_on_constant_mismatch() {
        let pattern = Pattern::new([
            Term::Variable(var("s")),
            Term::Constant(nn("http://p")),
            Term::Constant(nn("http://o")),
        ]);
        let tuple: Tuple = [nn("http://a"), nn("http://other"), nn("http://o")];
        assert!(unify(&pattern, &tuple).is_none());
    }

    #[test]
    fn unify_fails_when_repeated_variable_disagrees() {
        let x = var("x");
        let pattern = Pattern::new([
            Term::Variable(x.clone()),
            Term::Constant(nn("http://knows")),
            Term::Variable(x),
        ]);
        let tuple: Tuple = [nn("http://a"), nn("http://knows"), nn("http://b")];
        assert!(unify(&pattern, &tuple).is_none());
    }

    #[test]
    fn unify_succeeds_when_repeated_variable_agrees() {
        let x = var("x");
        let pattern = Pattern::new([
            Term::Variable(x.clone()),
            Term::Constant(nn("http://knows")),
            Term::Variable(x.clone()),
        ]);
        let tuple: Tuple = [nn("http://a"), nn("http://knows"), nn("http://a")];
        let bindings = unify(&pattern, &tuple).unwrap();
        assert_eq!(bindings.get(&x), Some(&nn("http://a")));
    }

    #[test]
    fn substitute_returns_none_when_nothing_bound() {
        let pattern = Pattern::new([
            Term::Variable(var("x")),
            Term::Constant(nn("http://age")),
            Term::Constant(nn("30")),
        ]);
        assert!(substitute(&pattern, &Binding::empty()).is_none());
    }

    #[test]
    fn substitute_rewrites_bound_variables_only() {
        let x = var("x");
        let y = var("y");
        let pattern = Pattern::new([
            Term::Variable(x.clone()),
            Term::Constant(nn("http://knows")),
            Term::Variable(y.clone()),
        ]);
        let bindings = Binding::empty().prepend(x, nn("http://a"));
        let rewritten = substitute(&pattern, &bindings).unwrap();
        assert_eq!(
            rewritten.terms()[0],
            Term::Constant(nn("http://a"))
        );
        assert_eq!(rewritten.terms()[2], Term::Variable(y));
    }
}
