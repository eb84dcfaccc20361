//! Conversation list store for the helpdesk agent inbox.
//!
//! Built on `helpdesk_flux`: one `ConversationsState` per store, changed by
//! the case reducers in [`reducer`]. Push events arrive as plain actions
//! ([`actions`]); backend calls are requests ([`requests`]) whose handlers run
//! an [`operations`] function against a [`ConversationApi`].
//!
//! ```ignore
//! let config = StoreConfig::from_args(&args)?;
//! let flux = new_flux(&config);
//! register_handlers(&flux, Arc::new(MemoryBackend::demo(config.page_size)?));
//!
//! flux.emit(FetchConversations(ConversationQuery::default())).await;
//! let selectors = ConversationSelectors::new();
//! let mine = selectors.filtered_conversations(flux.store(), &filters);
//! ```

pub mod actions;
pub mod api;
pub mod backend;
pub mod config;
pub mod error;
pub mod handlers;
pub mod helpers;
pub mod model;
pub mod operations;
pub mod reducer;
pub mod requests;
pub mod selectors;
pub mod state;

use helpdesk_flux::Flux;

pub use api::{ConversationApi, ConversationQuery};
pub use backend::MemoryBackend;
pub use config::StoreConfig;
pub use error::{ApiError, ConfigError};
pub use handlers::register_handlers;
pub use helpers::ConversationFilters;
pub use model::{Conversation, Message};
pub use selectors::ConversationSelectors;
pub use state::{AssigneeType, ConversationCounts, ConversationsState, SortFilter, StatusFilter};

/// A Flux instance holding the conversation store, with the initial filters
/// from `config`. Handlers are registered separately.
pub fn new_flux(config: &StoreConfig) -> Flux<ConversationsState> {
    Flux::new(ConversationsState::from_config(config), reducer::reducers())
}
