use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, RwLock};

use crate::action::AnyAction;
use crate::store::Store;
use crate::trie::Trie;

/// A boxed, `Send`-able future returned by effect handlers.
pub type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Type-erased effect handler.
///
/// Owned arguments so the returned future can be `'static`:
/// - `AnyAction`: the request (its type path and payload)
/// - `Arc<Store<S>>`: the store the effect reads and dispatches into
type Effect<S> = Arc<dyn Fn(AnyAction, Arc<Store<S>>) -> BoxFuture + Send + Sync>;

/// Effect router: maps request patterns to async handlers.
///
/// Reducers are synchronous and pure; anything that awaits (API calls,
/// timers) lives here and talks back to the store through `dispatch`.
/// Several handlers may match one request; they run one after another.
pub struct Router<S> {
    trie: RwLock<Trie<Effect<S>>>,
}

impl<S: Send + Sync + 'static> Router<S> {
    pub fn new() -> Self {
        Self {
            trie: RwLock::new(Trie::new()),
        }
    }

    /// Register an async handler for a request pattern (`+` / `#` allowed).
    pub fn on<F, Fut>(&self, pattern: &str, handler: F)
    where
        F: Fn(AnyAction, Arc<Store<S>>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let effect: Effect<S> = Arc::new(move |request: AnyAction, store: Arc<Store<S>>| -> BoxFuture {
            Box::pin(handler(request, store))
        });
        self.trie
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(pattern, effect);
    }

    /// Run every handler matching the request type, sequentially.
    ///
    /// Returns how many handlers ran; zero is not an error.
    pub async fn dispatch(&self, request: AnyAction, store: Arc<Store<S>>) -> usize {
        let effects: Vec<Effect<S>> = self
            .trie
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .matches(request.kind())
            .into_iter()
            .cloned()
            .collect();
        for effect in &effects {
            effect(request.clone(), Arc::clone(&store)).await;
        }
        effects.len()
    }

    /// Whether a handler is registered under exactly this pattern.
    pub fn has_handler(&self, pattern: &str) -> bool {
        self.trie
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .has_pattern(pattern)
    }

    /// Whether any handler would run for this request type.
    pub fn matches(&self, kind: &str) -> bool {
        !self
            .trie
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .matches(kind)
            .is_empty()
    }
}

impl<S: Send + Sync + 'static> Default for Router<S> {
    fn default() -> Self {
        Self::new()
    }
}
