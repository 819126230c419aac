use sesamestream_common::SesameStreamError;
use sesamestream_model::{Binding, Pattern, RdfTerm, RdfVariable};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A front-end-assigned query identifier, distinct from the
/// `sesamestream_engine::SubscriptionId` the core hands back from
/// `addQuery` (§3 distinguishes the `Query` record's own `id` from the
/// `Subscription` that wraps it).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryId(u64);

impl QueryId {
    fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

/// The filter-evaluator collaborator (§6 "Filter evaluator: `apply(filter,
/// bindingSet) -> bool`, may fail").
///
/// A failed evaluation is equivalent to rejection — the engine drops the
/// candidate solution and logs the error rather than propagating it to the
/// ingesting caller (§7).
pub trait FilterEvaluator: Send + Sync {
    fn apply(&self, bindings: &Binding) -> Result<bool, SesameStreamError>;
}

impl<F> FilterEvaluator for F
where
    F: Fn(&Binding) -> Result<bool, SesameStreamError> + Send + Sync,
{
    fn apply(&self, bindings: &Binding) -> Result<bool, SesameStreamError> {
        self(bindings)
    }
}

/// The immutable record a SPARQL front-end produces when parsing a query
/// (§3 "Query"). The core treats `filters`, `constants`, `sequence_modifier`
/// and `renames` as opaque collaborators; it only inspects `patterns` (to
/// seed the root partial solution) and `projected_names`/`renames` (to
/// build a solution's result binding-set at emission, §4.5).
pub struct Query {
    id: QueryId,
    projected_names: Vec<RdfVariable>,
    renames: Vec<(RdfVariable, RdfVariable)>,
    constants: Vec<(RdfVariable, RdfTerm)>,
    filters: Vec<Arc<dyn FilterEvaluator>>,
    sequence_modifier: Arc<dyn crate::SequenceModifier>,
    patterns: Vec<Pattern>,
}

impl Query {
    #[must_use]
    pub fn builder() -> QueryBuilder {
        QueryBuilder::default()
    }

    #[must_use]
    pub const fn id(&self) -> QueryId {
        self.id
    }

    #[must_use]
    pub fn projected_names(&self) -> &[RdfVariable] {
        &self.projected_names
    }

    #[must_use]
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    #[must_use]
    pub fn filters(&self) -> &[Arc<dyn FilterEvaluator>] {
        &self.filters
    }

    #[must_use]
    pub fn sequence_modifier(&self) -> &Arc<dyn crate::SequenceModifier> {
        &self.sequence_modifier
    }

    /// Renames a variable for projection, per `nameRenames` (§4.5 step 2).
    /// Variables with no configured rename project under their own name.
    #[must_use]
    pub fn rename<'a>(&'a self, name: &'a RdfVariable) -> &'a RdfVariable {
        self.renames
            .iter()
            .find(|(from, _)| from == name)
            .map_or(name, |(_, to)| to)
    }

    /// Builds the projected result binding-set for a completed solution,
    /// applying renames and then the query's constant bindings (§4.5 step
    /// 2: "Apply `query.constants` after filter evaluation" is handled by
    /// the caller invoking this only once a filter has already accepted).
    #[must_use]
    pub fn project(&self, bindings: &Binding) -> Binding {
        let mut result = Binding::empty();
        // Reverse order so the final binding iterates in projection order
        // with the first projected name most recent.
        for name in self.projected_names.iter().rev() {
            if let Some(value) = bindings.get(name) {
                result = result.prepend(self.rename(name).clone(), value.clone());
            }
        }
        for (name, value) in self.constants.iter().rev() {
            result = result.prepend(name.clone(), value.clone());
        }
        result
    }
}

/// Builds a [`Query`]. Standing in for the SPARQL front-end's algebra-tree
/// translation, which is out of scope here (§1): a caller (a test, or a
/// real front-end) assembles the already-translated patterns, filters, and
/// sequence modifier directly.
pub struct QueryBuilder {
    id: QueryId,
    projected_names: Vec<RdfVariable>,
    renames: Vec<(RdfVariable, RdfVariable)>,
    constants: Vec<(RdfVariable, RdfTerm)>,
    filters: Vec<Arc<dyn FilterEvaluator>>,
    sequence_modifier: Option<Arc<dyn crate::SequenceModifier>>,
    patterns: Vec<Pattern>,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self {
            id: QueryId::next(),
            projected_names: Vec::new(),
            renames: Vec::new(),
            constants: Vec::new(),
            filters: Vec::new(),
            sequence_modifier: None,
            patterns: Vec::new(),
        }
    }
}

impl QueryBuilder {
    #[must_use]
    pub fn pattern(mut self, pattern: Pattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    #[must_use]
    pub fn patterns(mut self, patterns: impl IntoIterator<Item = Pattern>) -> Self {
        self.patterns.extend(patterns);
        self
    }

    #[must_use]
    pub fn project(mut self, name: RdfVariable) -> Self {
        self.projected_names.push(name);
        self
    }

    #[must_use]
    pub fn rename(mut self, from: RdfVariable, to: RdfVariable) -> Self {
        self.renames.push((from, to));
        self
    }

    #[must_use]
    pub fn constant(mut self, name: RdfVariable, value: RdfTerm) -> Self {
        self.constants.push((name, value));
        self
    }

    #[must_use]
    pub fn filter(mut self, filter: Arc<dyn FilterEvaluator>) -> Self {
        self.filters.push(filter);
        self
    }

    #[must_use]
    pub fn sequence_modifier(mut self, modifier: Arc<dyn crate::SequenceModifier>) -> Self {
        self.sequence_modifier = Some(modifier);
        self
    }

    /// Finishes construction. If no patterns were supplied, or no sequence
    /// modifier was configured (every query needs one — even "no DISTINCT,
    /// no LIMIT" is a sequence modifier that always accepts), this is an
    /// [`SesameStreamError::IncompatibleQuery`].
    pub fn build(self) -> Result<Query, SesameStreamError> {
        if self.patterns.is_empty() {
            return Err(SesameStreamError::IncompatibleQuery(
                "a query needs at least one triple pattern".to_owned(),
            ));
        }
        let sequence_modifier = self.sequence_modifier.ok_or_else(|| {
            SesameStreamError::IncompatibleQuery(
                "a query needs a sequence modifier, even a pass-through one".to_owned(),
            )
        })?;
        Ok(Query {
            id: self.id,
            projected_names: self.projected_names,
            renames: self.renames,
            constants: self.constants,
            filters: self.filters,
            sequence_modifier,
            patterns: self.patterns,
        })
    }
}
