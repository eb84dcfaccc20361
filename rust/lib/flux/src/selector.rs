use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::store::Store;

/// A memoized, parameterized view over store state.
///
/// The output of `compute` is cached together with the store revision and
/// the arguments it was computed for. Asking again with equal arguments
/// before the next applied dispatch returns the very same `Arc`, so callers
/// can use `Arc::ptr_eq` to skip re-rendering.
pub struct Selector<S, Args, R> {
    compute: fn(&S, &Args) -> R,
    cache: Mutex<Option<Memo<Args, R>>>,
    recomputations: AtomicU64,
}

struct Memo<Args, R> {
    revision: u64,
    args: Args,
    output: Arc<R>,
}

impl<S, Args, R> Selector<S, Args, R>
where
    S: Send + Sync + 'static,
    Args: PartialEq + Clone,
{
    pub const fn new(compute: fn(&S, &Args) -> R) -> Self {
        Self {
            compute,
            cache: Mutex::new(None),
            recomputations: AtomicU64::new(0),
        }
    }

    /// Evaluate against the store, reusing the cached output when possible.
    pub fn select(&self, store: &Store<S>, args: &Args) -> Arc<R> {
        store.read_at(|state, revision| {
            let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(memo) = cache.as_ref() {
                if memo.revision == revision && memo.args == *args {
                    return Arc::clone(&memo.output);
                }
            }
            self.recomputations.fetch_add(1, Ordering::Relaxed);
            let output = Arc::new((self.compute)(state, args));
            *cache = Some(Memo {
                revision,
                args: args.clone(),
                output: Arc::clone(&output),
            });
            output
        })
    }

    /// Evaluate against a bare state value. Never cached.
    pub fn compute(&self, state: &S, args: &Args) -> R {
        (self.compute)(state, args)
    }

    /// How many times the underlying function ran through `select`.
    pub fn recomputations(&self) -> u64 {
        self.recomputations.load(Ordering::Relaxed)
    }

    /// Forget the cached output.
    pub fn reset(&self) {
        *self.cache.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
