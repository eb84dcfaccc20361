//! Flux, an action-driven state engine for client apps.
//!
//! One state value per store, changed only by reducer cases that run in
//! response to dispatched actions. Anything asynchronous lives in effect
//! handlers that talk to a backend and dispatch actions back.
//!
//! # Pieces
//!
//! - `Store`: state behind one lock, reducer cases, listeners, revision
//! - `Reducers`: case reducers keyed by action-type pattern
//! - `AsyncThunk`: pending / fulfilled / rejected lifecycle around a future
//! - `Router` / `Flux`: async effect handlers routed by request type
//! - `EntityState`: normalized id-keyed table for collections
//! - `Selector`: memoized views keyed on store revision and arguments
//!
//! # Action types
//!
//! Actions live in a `/`-separated namespace:
//! - Plain: `conversations/setSortFilter`
//! - Lifecycle: `conversations/fetchConversations/pending`
//!
//! Reducers, effects and listeners all match with MQTT-style wildcards:
//! - `conversations/+`: one level
//! - `conversations/#`: everything below
//! - `conversations/+/rejected`: every failed operation of the slice

pub mod action;
pub mod app;
pub mod entity;
pub mod reducer;
pub mod router;
pub mod selector;
pub mod store;
pub mod thunk;
pub mod trie;

pub use action::{Action, AnyAction, SubscriptionId};
pub use app::Flux;
pub use entity::{Entity, EntityState};
pub use reducer::Reducers;
pub use router::{BoxFuture, Router};
pub use selector::Selector;
pub use store::{Listener, Store};
pub use thunk::{AsyncThunk, Rejection};
