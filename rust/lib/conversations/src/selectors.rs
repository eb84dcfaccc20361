//! Read-side views of the conversation store.
//!
//! Scalar selectors are plain functions over the state. List views are
//! memoized per store revision and argument through [`ConversationSelectors`].

use std::sync::Arc;

use helpdesk_flux::{Selector, Store};

use crate::helpers::{ConversationFilters, apply_filters, sort_conversations};
use crate::model::{Conversation, ConversationId, InboxId, Message};
use crate::state::{AssigneeType, ConversationCounts, ConversationsState, SortFilter, StatusFilter};

type State = ConversationsState;

pub fn meta(state: &State) -> ConversationCounts {
    state.meta
}

pub fn is_all_conversations_fetched(state: &State) -> bool {
    state.is_all_conversations_fetched
}

pub fn conversation_status(state: &State) -> StatusFilter {
    state.conversation_status
}

pub fn assignee_type(state: &State) -> AssigneeType {
    state.assignee_type
}

pub fn active_inbox(state: &State) -> InboxId {
    state.current_inbox
}

pub fn sort_filter(state: &State) -> SortFilter {
    state.sort_filter
}

pub fn is_loading_messages(state: &State) -> bool {
    state.loading_messages
}

pub fn is_fetching_conversation(state: &State) -> bool {
    state.is_conversation_fetching
}

pub fn is_all_messages_fetched(state: &State) -> bool {
    state.is_all_messages_fetched
}

pub fn is_changing_conversation_status(state: &State) -> bool {
    state.is_changing_conversation_status
}

pub fn is_changing_conversation_assignee(state: &State) -> bool {
    state.is_changing_conversation_assignee
}

/// Sorted, filtered conversation list for one tab of the inbox.
pub fn filtered_conversations(state: &State, filters: &ConversationFilters) -> Vec<Conversation> {
    let mut conversations = state.conversations.all();
    sort_conversations(&mut conversations, filters.sort_by);
    conversations.retain(|conversation| {
        let assignee_matches = match filters.assignee_type {
            AssigneeType::Mine => conversation.assignee_id() == Some(filters.user_id),
            AssigneeType::Unassigned => conversation.assignee_id().is_none(),
            AssigneeType::All => true,
        };
        assignee_matches && apply_filters(conversation, filters)
    });
    conversations
}

pub fn messages_by_conversation_id(state: &State, id: &ConversationId) -> Vec<Message> {
    state
        .conversations
        .get(id)
        .map(|c| c.messages.clone())
        .unwrap_or_default()
}

pub fn conversation_by_id(state: &State, id: &ConversationId) -> Option<Conversation> {
    state.conversations.get(id).cloned()
}

/// Memoized list views. Hold one per consumer so caches do not thrash.
pub struct ConversationSelectors {
    filtered: Selector<State, ConversationFilters, Vec<Conversation>>,
    messages: Selector<State, ConversationId, Vec<Message>>,
    by_id: Selector<State, ConversationId, Option<Conversation>>,
}

impl ConversationSelectors {
    pub const fn new() -> Self {
        Self {
            filtered: Selector::new(filtered_conversations),
            messages: Selector::new(messages_by_conversation_id),
            by_id: Selector::new(conversation_by_id),
        }
    }

    pub fn filtered_conversations(
        &self,
        store: &Store<State>,
        filters: &ConversationFilters,
    ) -> Arc<Vec<Conversation>> {
        self.filtered.select(store, filters)
    }

    pub fn messages_by_conversation_id(&self, store: &Store<State>, id: ConversationId) -> Arc<Vec<Message>> {
        self.messages.select(store, &id)
    }

    pub fn conversation_by_id(&self, store: &Store<State>, id: ConversationId) -> Arc<Option<Conversation>> {
        self.by_id.select(store, &id)
    }

    /// Times the filtered list was rebuilt rather than served from cache.
    pub fn filtered_recomputations(&self) -> u64 {
        self.filtered.recomputations()
    }
}

impl Default for ConversationSelectors {
    fn default() -> Self {
        Self::new()
    }
}
