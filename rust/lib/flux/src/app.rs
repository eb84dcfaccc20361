use std::future::Future;
use std::sync::Arc;

use crate::action::{Action, AnyAction, SubscriptionId};
use crate::reducer::Reducers;
use crate::router::Router;
use crate::store::Store;

/// A store plus the effects that feed it.
///
/// Two ways in:
/// - `dispatch(action)`: synchronous, straight into the reducers
/// - `emit(request).await`: asynchronous, routed to effect handlers which
///   typically call a backend and dispatch lifecycle actions
///
/// ```ignore
/// let flux = Flux::new(InboxState::default(), reducers());
///
/// flux.on(FetchInbox::TYPE, |request, store| async move {
///     let page = api.fetch().await;
///     store.dispatch(InboxLoaded(page));
/// });
///
/// flux.subscribe("inbox/#", |kind| println!("{kind} applied"));
/// flux.emit(FetchInbox).await;
/// let count = flux.read(|s| s.items.len());
/// ```
pub struct Flux<S> {
    store: Arc<Store<S>>,
    router: Router<S>,
}

impl<S: Send + Sync + 'static> Flux<S> {
    pub fn new(initial: S, reducers: Reducers<S>) -> Self {
        Self {
            store: Arc::new(Store::new(initial, reducers)),
            router: Router::new(),
        }
    }

    // ====================================================================
    // State
    // ====================================================================

    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        self.store.read(f)
    }

    pub fn snapshot(&self) -> S
    where
        S: Clone,
    {
        self.store.snapshot()
    }

    pub fn revision(&self) -> u64 {
        self.store.revision()
    }

    // ====================================================================
    // Actions and requests
    // ====================================================================

    /// Reduce an action synchronously. Returns the number of cases applied.
    pub fn dispatch(&self, action: impl Into<AnyAction>) -> usize {
        self.store.dispatch(action)
    }

    /// Route a typed request to its effect handlers and wait for them.
    pub async fn emit<A: Action>(&self, request: A) -> usize {
        self.emit_any(AnyAction::new(request)).await
    }

    /// Route a pre-built request.
    pub async fn emit_any(&self, request: AnyAction) -> usize {
        self.router.dispatch(request, Arc::clone(&self.store)).await
    }

    /// Register an effect handler for a request pattern.
    pub fn on<F, Fut>(&self, pattern: &str, handler: F)
    where
        F: Fn(AnyAction, Arc<Store<S>>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.router.on(pattern, handler);
    }

    /// Whether an `emit` of this request type would reach a handler.
    pub fn has_handler(&self, kind: &str) -> bool {
        self.router.matches(kind)
    }

    // ====================================================================
    // Subscriptions
    // ====================================================================

    pub fn subscribe<F>(&self, pattern: &str, listener: F) -> SubscriptionId
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.store.subscribe(pattern, listener)
    }

    pub fn unsubscribe(&self, pattern: &str, id: SubscriptionId) -> bool {
        self.store.unsubscribe(pattern, id)
    }

    /// The underlying store, for selectors and direct dispatch from tasks.
    pub fn store(&self) -> &Arc<Store<S>> {
        &self.store
    }
}
