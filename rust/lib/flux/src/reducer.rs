use std::any::{Any, type_name};
use std::sync::Arc;

use tracing::warn;

use crate::action::{Action, AnyAction};
use crate::thunk::AsyncThunk;
use crate::trie::Trie;

type CaseReducer<S> = Arc<dyn Fn(&mut S, &AnyAction) -> bool + Send + Sync>;

/// Case reducers keyed by action-type pattern.
///
/// Built once with chained `on*` calls and handed to `Store::new`:
///
/// ```ignore
/// let reducers = Reducers::new()
///     .on(|state: &mut Inbox, a: &SetSortFilter| state.sort = a.0)
///     .on_fulfilled(FETCH, |state: &mut Inbox, page: &Page| state.items = page.items.clone())
///     .on_any("inbox/+/rejected", |state: &mut Inbox, _| state.loading = false);
/// ```
pub struct Reducers<S> {
    cases: Trie<CaseReducer<S>>,
}

impl<S: 'static> Reducers<S> {
    pub fn new() -> Self {
        Self { cases: Trie::new() }
    }

    /// Register a case for a typed action, routed by `A::TYPE`.
    pub fn on<A, F>(self, reducer: F) -> Self
    where
        A: Action,
        F: Fn(&mut S, &A) + Send + Sync + 'static,
    {
        self.on_path(A::TYPE, reducer)
    }

    /// Register a case for an explicit pattern whose payload is a `P`.
    ///
    /// A matching action carrying some other payload type is skipped.
    pub fn on_path<P, F>(mut self, pattern: &str, reducer: F) -> Self
    where
        P: Any,
        F: Fn(&mut S, &P) + Send + Sync + 'static,
    {
        let pattern_owned = pattern.to_string();
        let case: CaseReducer<S> = Arc::new(move |state: &mut S, action: &AnyAction| {
            match action.payload::<P>() {
                Some(payload) => {
                    reducer(state, payload);
                    true
                }
                None => {
                    warn!(
                        "reducer for '{}' expected {} on '{}'",
                        pattern_owned,
                        type_name::<P>(),
                        action.kind()
                    );
                    false
                }
            }
        });
        self.cases.insert(pattern, case);
        self
    }

    /// Register an untyped case, typically for a wildcard pattern.
    pub fn on_any<F>(mut self, pattern: &str, reducer: F) -> Self
    where
        F: Fn(&mut S, &AnyAction) + Send + Sync + 'static,
    {
        let case: CaseReducer<S> = Arc::new(move |state: &mut S, action: &AnyAction| {
            reducer(state, action);
            true
        });
        self.cases.insert(pattern, case);
        self
    }

    /// `{prefix}/pending`, payload is the thunk argument.
    pub fn on_pending<P, F>(self, thunk: AsyncThunk, reducer: F) -> Self
    where
        P: Any,
        F: Fn(&mut S, &P) + Send + Sync + 'static,
    {
        self.on_path(&thunk.pending(), reducer)
    }

    /// `{prefix}/fulfilled`, payload is the thunk result.
    pub fn on_fulfilled<P, F>(self, thunk: AsyncThunk, reducer: F) -> Self
    where
        P: Any,
        F: Fn(&mut S, &P) + Send + Sync + 'static,
    {
        self.on_path(&thunk.fulfilled(), reducer)
    }

    /// `{prefix}/rejected`. The payload is ignored; use `on_path` with
    /// `Rejection<Arg>` when the argument or error text is needed.
    pub fn on_rejected<F>(self, thunk: AsyncThunk, reducer: F) -> Self
    where
        F: Fn(&mut S) + Send + Sync + 'static,
    {
        self.on_any(&thunk.rejected(), move |state, _| reducer(state))
    }

    /// Whether any case would run for an action of this type.
    pub fn handles(&self, kind: &str) -> bool {
        !self.cases.matches(kind).is_empty()
    }

    /// Number of registered cases.
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Run every matching case in order. Returns how many applied.
    pub(crate) fn reduce(&self, state: &mut S, action: &AnyAction) -> usize {
        self.cases
            .matches(action.kind())
            .into_iter()
            .filter(|case| case(state, action))
            .count()
    }
}

impl<S: 'static> Default for Reducers<S> {
    fn default() -> Self {
        Self::new()
    }
}
