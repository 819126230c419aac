//! Randomized-workload tests for the testable properties of §8: these only
//! exercise the public `sesamestream` facade, grounded on the
//! `knhk-ontology` repo's invariant-under-random-workload `proptest` style
//! (the teacher crate does not use `proptest`; see DESIGN.md).

use oxrdf::NamedNode;
use proptest::prelude::*;
use sesamestream::api::{PassThrough, QueryBuilder, SolutionHandler};
use sesamestream::model::{Binding, Pattern, RdfTerm, RdfVariable, Term};
use sesamestream::{ManualClock, QueryIndex, Ttl};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

fn nn(n: u8) -> RdfTerm {
    RdfTerm::NamedNode(NamedNode::new(format!("http://example/{n}")).unwrap())
}

fn p() -> RdfTerm {
    RdfTerm::NamedNode(NamedNode::new("http://example/knows").unwrap())
}

fn other_predicate() -> RdfTerm {
    RdfTerm::NamedNode(NamedNode::new("http://example/other").unwrap())
}

fn collecting_handler() -> (Arc<dyn SolutionHandler>, Arc<Mutex<Vec<Binding>>>) {
    let collected = Arc::new(Mutex::new(Vec::new()));
    let for_handler = collected.clone();
    let handler: Arc<dyn SolutionHandler> =
        Arc::new(move |bindings: Binding| for_handler.lock().unwrap().push(bindings));
    (handler, collected)
}

fn as_pair(bindings: &Binding, s: &RdfVariable, o: &RdfVariable) -> (u8, u8) {
    let decode = |term: &RdfTerm| match term {
        RdfTerm::NamedNode(node) => node.as_str().rsplit('/').next().unwrap().parse().unwrap(),
        _ => unreachable!("test data is always a named node"),
    };
    (decode(bindings.get(s).unwrap()), decode(bindings.get(o).unwrap()))
}

proptest! {
    /// Property 1 (Exhaustiveness) + Property 2 (Order independence): for a
    /// single pattern query with infinite TTL and no LIMIT, the solution
    /// multiset produced by any permutation of a triple stream equals the
    /// multiset of (subject, object) pairs among triples using the
    /// matching predicate.
    #[test]
    fn exhaustive_and_order_independent(
        matching in prop::collection::vec((0u8..8, 0u8..8), 0..12),
        noise in prop::collection::vec((0u8..8, 0u8..8), 0..6),
        seed in 0u64..1000,
    ) {
        let s = RdfVariable::new("s").unwrap();
        let o = RdfVariable::new("o").unwrap();
        let pattern = Pattern::new([Term::Variable(s.clone()), Term::Constant(p()), Term::Variable(o.clone())]);
        let query = QueryBuilder::default()
            .pattern(pattern)
            .project(s.clone())
            .project(o.clone())
            .sequence_modifier(Arc::new(PassThrough))
            .build()
            .unwrap();

        let mut triples: Vec<([RdfTerm; 3], bool)> = matching
            .iter()
            .map(|(subj, obj)| ([nn(*subj), p(), nn(*obj)], true))
            .chain(noise.iter().map(|(subj, obj)| ([nn(*subj), other_predicate(), nn(*obj)], false)))
            .collect();
        // A deterministic, seed-dependent shuffle in place of a
        // nondeterministic one so failures reproduce without re-running
        // under a different RNG draw.
        let len = triples.len();
        for i in 0..len {
            let j = ((seed.wrapping_add(i as u64).wrapping_mul(2654435761)) as usize) % len.max(1);
            triples.swap(i, j.min(len.saturating_sub(1)));
        }

        let index = QueryIndex::new();
        let (handler, collected) = collecting_handler();
        index.add_query(Ttl::INFINITE, query, handler).unwrap();
        for (tuple, _) in &triples {
            index.add_statement(Ttl::INFINITE, tuple.clone());
        }

        let expected: BTreeSet<(u8, u8)> = matching.into_iter().collect();
        let actual: BTreeSet<(u8, u8)> = collected
            .lock()
            .unwrap()
            .iter()
            .map(|b| as_pair(b, &s, &o))
            .collect();
        prop_assert_eq!(actual, expected);
    }

    /// Property 3 (Monotonicity before expiry): with infinite TTLs, the
    /// set of emitted solutions after ingesting a prefix of a triple
    /// stream is always a subset of the set after ingesting the whole
    /// stream — nothing already emitted is ever retracted.
    #[test]
    fn monotonic_before_expiry(triples in prop::collection::vec((0u8..6, 0u8..6), 1..10)) {
        let s = RdfVariable::new("s").unwrap();
        let o = RdfVariable::new("o").unwrap();
        let build_query = || {
            let pattern = Pattern::new([Term::Variable(s.clone()), Term::Constant(p()), Term::Variable(o.clone())]);
            QueryBuilder::default()
                .pattern(pattern)
                .project(s.clone())
                .project(o.clone())
                .sequence_modifier(Arc::new(PassThrough))
                .build()
                .unwrap()
        };

        let index = QueryIndex::new();
        let (handler, collected) = collecting_handler();
        index.add_query(Ttl::INFINITE, build_query(), handler).unwrap();

        let mut previous: BTreeSet<(u8, u8)> = BTreeSet::new();
        for (subj, obj) in &triples {
            index.add_statement(Ttl::INFINITE, [nn(*subj), p(), nn(*obj)]);
            let current: BTreeSet<(u8, u8)> = collected.lock().unwrap().iter().map(|b| as_pair(b, &s, &o)).collect();
            prop_assert!(previous.is_subset(&current));
            previous = current;
        }
    }

    /// Property 4 (TTL soundness), grounded on scenario S4: a two-pattern
    /// join's partial solution must not survive past the minimum TTL of
    /// its contributing triple, regardless of the query's own (longer) TTL.
    #[test]
    fn ttl_soundness_of_a_join(
        triple_ttl_secs in 1u64..20,
        query_ttl_secs in 20u64..40,
        gap_secs in 0u64..30,
    ) {
        let x = RdfVariable::new("x").unwrap();
        let y = RdfVariable::new("y").unwrap();
        let knows = Pattern::new([Term::Variable(x.clone()), Term::Constant(p()), Term::Variable(y.clone())]);
        let age = Pattern::new([Term::Variable(y.clone()), Term::Constant(other_predicate()), Term::Constant(nn(0))]);
        let query = QueryBuilder::default()
            .patterns([knows, age])
            .project(x)
            .project(y)
            .sequence_modifier(Arc::new(PassThrough))
            .build()
            .unwrap();

        let clock = Arc::new(ManualClock::new());
        let index = QueryIndex::builder().clock(clock.clone()).build();
        let (handler, collected) = collecting_handler();
        index.add_query(Ttl::from_secs(query_ttl_secs), query, handler).unwrap();

        index.add_statement(Ttl::from_secs(triple_ttl_secs), [nn(1), p(), nn(2)]);
        clock.advance(std::time::Duration::from_secs(gap_secs));
        index.add_statement(Ttl::from_secs(100), [nn(2), other_predicate(), nn(0)]);

        let emitted = !collected.lock().unwrap().is_empty();
        prop_assert_eq!(emitted, gap_secs < triple_ttl_secs);
    }
}

/// Property 5 (Canonicalization), observed indirectly through the
/// `PatternObserver` hook: two queries sharing a structurally identical
/// pattern must produce exactly one pattern-first-seen event, not two,
/// because the pattern store interns by structural equality.
#[test]
fn canonicalization_dedupes_first_seen_events() {
    struct CountingObserver(Mutex<usize>);
    impl sesamestream::api::PatternObserver for CountingObserver {
        fn pattern_first_seen(&self, _pattern: &Pattern) {
            *self.0.lock().unwrap() += 1;
        }
    }

    let index = QueryIndex::new();
    let observer = Arc::new(CountingObserver(Mutex::new(0)));
    index.add_pattern_observer(observer.clone());

    let build_query = || {
        let pattern = Pattern::new([
            Term::Variable(RdfVariable::new("s").unwrap()),
            Term::Constant(p()),
            Term::Constant(nn(0)),
        ]);
        QueryBuilder::default()
            .pattern(pattern)
            .project(RdfVariable::new("s").unwrap())
            .sequence_modifier(Arc::new(PassThrough))
            .build()
            .unwrap()
    };
    let (handler_a, _) = collecting_handler();
    let (handler_b, _) = collecting_handler();
    index.add_query(Ttl::INFINITE, build_query(), handler_a).unwrap();
    index.add_query(Ttl::INFINITE, build_query(), handler_b).unwrap();

    assert_eq!(*observer.0.lock().unwrap(), 1);
}

/// Property 6 (reverse-index consistency), observed behaviorally: two
/// subscriptions sharing a pattern are independent. Cancelling one must
/// not unsubscribe the other from the shared canonical pattern.
#[test]
fn cancelling_one_subscription_does_not_affect_a_sibling_on_the_same_pattern() {
    let index = QueryIndex::new();
    let build_query = || {
        let pattern = Pattern::new([
            Term::Variable(RdfVariable::new("s").unwrap()),
            Term::Constant(p()),
            Term::Constant(nn(0)),
        ]);
        QueryBuilder::default()
            .pattern(pattern)
            .project(RdfVariable::new("s").unwrap())
            .sequence_modifier(Arc::new(PassThrough))
            .build()
            .unwrap()
    };

    let (handler_a, collected_a) = collecting_handler();
    let (handler_b, collected_b) = collecting_handler();
    let subscription_a = index.add_query(Ttl::INFINITE, build_query(), handler_a).unwrap();
    index.add_query(Ttl::INFINITE, build_query(), handler_b).unwrap();

    subscription_a.cancel();
    index.add_statement(Ttl::INFINITE, [nn(1), p(), nn(0)]);

    assert!(collected_a.lock().unwrap().is_empty());
    assert_eq!(collected_b.lock().unwrap().len(), 1);
}
