use sesamestream_model::Binding;

/// The handler a subscriber registers at `addQuery` time (§3 "Subscription.
/// A handle holding `(query, handler, active)`"). Invoked with the
/// projected result binding-set of each accepted solution (§4.5 step 5).
///
/// Handler panics/exceptions are allowed to propagate to the ingesting
/// caller per §7 ("Handler exceptions propagate to the ingestion caller
/// unless the caller installs an interposer") — this trait does not catch
/// unwinds on the caller's behalf.
pub trait SolutionHandler: Send + Sync {
    fn handle(&self, bindings: Binding);
}

impl<F> SolutionHandler for F
where
    F: Fn(Binding) + Send + Sync,
{
    fn handle(&self, bindings: Binding) {
        self(bindings);
    }
}
