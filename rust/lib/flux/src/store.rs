use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::action::{AnyAction, SubscriptionId};
use crate::reducer::Reducers;
use crate::trie::Trie;

/// Callback type for dispatch notifications. Receives the action type.
pub type Listener = Arc<dyn Fn(&str) + Send + Sync>;

/// Single-state store driven by reducer cases.
///
/// - `dispatch(action)` runs matching reducers under one write lock, then
///   notifies listeners whose pattern matches the action type.
/// - `read(f)` borrows the state for the duration of `f`.
/// - `snapshot()` clones the whole state.
/// - `subscribe(pattern, f)` / `unsubscribe(pattern, id)` manage listeners.
///
/// Every dispatch that applies at least one case bumps `revision()`.
/// Memoized selectors key their caches on it.
pub struct Store<S> {
    state: RwLock<S>,
    reducers: Reducers<S>,
    listeners: RwLock<Trie<ListenerEntry>>,
    revision: AtomicU64,
    next_id: AtomicU64,
}

#[derive(Clone)]
struct ListenerEntry {
    id: SubscriptionId,
    listener: Listener,
}

impl<S: Send + Sync + 'static> Store<S> {
    pub fn new(initial: S, reducers: Reducers<S>) -> Self {
        Self {
            state: RwLock::new(initial),
            reducers,
            listeners: RwLock::new(Trie::new()),
            revision: AtomicU64::new(0),
            next_id: AtomicU64::new(1),
        }
    }

    /// Reduce `action` into the state and notify listeners.
    ///
    /// Returns the number of case reducers that applied. Zero means the
    /// action was not handled: state, revision and listeners are untouched.
    pub fn dispatch(&self, action: impl Into<AnyAction>) -> usize {
        let action = action.into();
        let applied = {
            let mut state = write(&self.state);
            let applied = self.reducers.reduce(&mut state, &action);
            if applied > 0 {
                self.revision.fetch_add(1, Ordering::AcqRel);
            }
            applied
        };
        debug!(kind = action.kind(), applied, "dispatch");
        if applied == 0 {
            return 0;
        }

        // Listeners run outside the state lock so they may read or dispatch.
        let listeners: Vec<Listener> = read(&self.listeners)
            .matches(action.kind())
            .into_iter()
            .map(|entry| Arc::clone(&entry.listener))
            .collect();
        for listener in listeners {
            listener(action.kind());
        }
        applied
    }

    /// Run `f` against the current state.
    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        let state = read(&self.state);
        f(&state)
    }

    /// Like `read`, also passing the revision the state belongs to.
    pub fn read_at<R>(&self, f: impl FnOnce(&S, u64) -> R) -> R {
        let state = read(&self.state);
        f(&state, self.revision.load(Ordering::Acquire))
    }

    /// Clone the current state.
    pub fn snapshot(&self) -> S
    where
        S: Clone,
    {
        read(&self.state).clone()
    }

    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Acquire)
    }

    /// Whether any reducer case matches this action type.
    pub fn handles(&self, kind: &str) -> bool {
        self.reducers.handles(kind)
    }

    /// Listen for dispatches whose action type matches `pattern`.
    pub fn subscribe<F>(&self, pattern: &str, listener: F) -> SubscriptionId
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        write(&self.listeners).insert(
            pattern,
            ListenerEntry {
                id,
                listener: Arc::new(listener),
            },
        );
        id
    }

    /// Remove a listener registered under `pattern`.
    pub fn unsubscribe(&self, pattern: &str, id: SubscriptionId) -> bool {
        write(&self.listeners).remove(pattern, |entry| entry.id == id)
    }
}

// A panic inside a reducer leaves plain field writes behind, never a torn
// invariant the next reader could trip over, so poisoning is not propagated.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
