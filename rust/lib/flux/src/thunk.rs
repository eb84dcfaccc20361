use std::any::Any;
use std::fmt::Display;
use std::future::Future;

use tracing::{debug, warn};

use crate::action::AnyAction;
use crate::store::Store;

/// Payload of a `{prefix}/rejected` action.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection<Arg> {
    /// The argument the operation was started with.
    pub arg: Arg,
    /// Display text of the failure.
    pub error: String,
}

/// An async operation with a pending / fulfilled / rejected lifecycle.
///
/// `run` brackets a future with lifecycle actions so reducers can track
/// loading flags and apply results without knowing about the future itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AsyncThunk {
    prefix: &'static str,
}

impl AsyncThunk {
    pub const fn new(prefix: &'static str) -> Self {
        Self { prefix }
    }

    pub fn prefix(&self) -> &'static str {
        self.prefix
    }

    pub fn pending(&self) -> String {
        format!("{}/pending", self.prefix)
    }

    pub fn fulfilled(&self) -> String {
        format!("{}/fulfilled", self.prefix)
    }

    pub fn rejected(&self) -> String {
        format!("{}/rejected", self.prefix)
    }

    /// Dispatch pending, await `work`, then dispatch fulfilled or rejected.
    ///
    /// The result of `work` is handed back unchanged so callers can chain
    /// on it; the store has already been updated by the time it returns.
    pub async fn run<S, Arg, Out, E, Fut>(&self, store: &Store<S>, arg: Arg, work: Fut) -> Result<Out, E>
    where
        S: Send + Sync + 'static,
        Arg: Any + Send + Sync + Clone,
        Out: Any + Send + Sync + Clone,
        E: Display,
        Fut: Future<Output = Result<Out, E>>,
    {
        store.dispatch(AnyAction::with_type(self.pending(), arg.clone()));
        match work.await {
            Ok(out) => {
                debug!("{} fulfilled", self.prefix);
                store.dispatch(AnyAction::with_type(self.fulfilled(), out.clone()));
                Ok(out)
            }
            Err(e) => {
                warn!("{} rejected: {}", self.prefix, e);
                let rejection = Rejection {
                    arg,
                    error: e.to_string(),
                };
                store.dispatch(AnyAction::with_type(self.rejected(), rejection));
                Err(e)
            }
        }
    }
}
