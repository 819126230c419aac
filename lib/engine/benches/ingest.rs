use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use sesamestream_api::{PassThrough, QueryBuilder, SolutionHandler};
use sesamestream_common::Ttl;
use sesamestream_engine::QueryIndex;
use sesamestream_model::{Binding, Pattern, RdfTerm, RdfVariable, Term};
use std::sync::Arc;

fn nn(iri: &str) -> RdfTerm {
    RdfTerm::NamedNode(oxrdf::NamedNode::new(iri).unwrap())
}

struct NoopHandler;
impl SolutionHandler for NoopHandler {
    fn handle(&self, _bindings: Binding) {}
}

/// Registers `query_count` single-pattern queries of the shape
/// `SELECT ?s WHERE { ?s <p> ?o }`, then benchmarks ingesting a triple that
/// matches every one of them — the hot path the Matcher's pattern-store
/// snapshot-and-fan-out exists to keep linear in (matching patterns).
fn bench_ingest(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingest_matching_triple");
    for query_count in [1usize, 10, 100, 1_000] {
        group.bench_with_input(BenchmarkId::from_parameter(query_count), &query_count, |b, &query_count| {
            let index = QueryIndex::new();
            for _ in 0..query_count {
                let pattern = Pattern::new([
                    Term::Variable(RdfVariable::new("s").unwrap()),
                    Term::Constant(nn("http://p")),
                    Term::Variable(RdfVariable::new("o").unwrap()),
                ]);
                let query = QueryBuilder::default()
                    .pattern(pattern)
                    .project(RdfVariable::new("s").unwrap())
                    .sequence_modifier(Arc::new(PassThrough))
                    .build()
                    .unwrap();
                index.add_query(Ttl::INFINITE, query, Arc::new(NoopHandler)).unwrap();
            }
            b.iter(|| {
                index.add_statement(Ttl::INFINITE, [nn("http://a"), nn("http://p"), nn("http://o")]);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_ingest);
criterion_main!(benches);
