//! Async requests.
//!
//! Each struct is both the routed request (`flux.emit(req)`) and the
//! argument carried by its `pending` / `rejected` lifecycle actions. The
//! matching `AsyncThunk` shares the request path as its prefix.

use flux_derive::action;
use helpdesk_flux::{Action, AsyncThunk};

use crate::api::ConversationQuery;
use crate::model::{ConversationId, ConversationStatus, MessageId, Priority, UserId};

/// Load one page of the conversation list.
#[action("conversations/fetchConversations")]
pub struct FetchConversations(pub ConversationQuery);

/// Refresh the mine / unassigned / all counters.
#[action("conversations/fetchConversationStats")]
pub struct FetchConversationStats(pub ConversationQuery);

/// Load one conversation with its latest messages.
#[action("conversations/fetchConversation")]
pub struct FetchConversation {
    pub conversation_id: ConversationId,
}

/// Back-fill history older than `before_id` (older than the oldest loaded
/// message when `None`).
#[action("conversations/fetchPreviousMessages")]
pub struct FetchPreviousMessages {
    pub conversation_id: ConversationId,
    pub before_id: Option<MessageId>,
}

#[action("conversations/markMessagesAsRead")]
pub struct MarkMessagesAsRead {
    pub conversation_id: ConversationId,
}

#[action("conversations/markMessagesAsUnread")]
pub struct MarkMessagesAsUnread {
    pub conversation_id: ConversationId,
}

#[action("conversations/muteConversation")]
pub struct MuteConversation {
    pub conversation_id: ConversationId,
}

#[action("conversations/unmuteConversation")]
pub struct UnmuteConversation {
    pub conversation_id: ConversationId,
}

/// Move a conversation to `status`; `snoozed_until` only applies to snoozing.
#[action("conversations/toggleConversationStatus")]
pub struct ToggleConversationStatus {
    pub conversation_id: ConversationId,
    pub status: ConversationStatus,
    pub snoozed_until: Option<i64>,
}

/// Re-fetch a conversation and replace the stored copy if it has news.
#[action("conversations/updateConversationAndMessages")]
pub struct UpdateConversationAndMessages {
    pub conversation_id: ConversationId,
}

#[action("conversations/togglePriority")]
pub struct TogglePriority {
    pub conversation_id: ConversationId,
    pub priority: Option<Priority>,
}

/// Assign to an agent, or unassign with `None`.
#[action("conversations/assignConversation")]
pub struct AssignConversation {
    pub conversation_id: ConversationId,
    pub assignee_id: Option<UserId>,
}

pub const FETCH_CONVERSATIONS: AsyncThunk = AsyncThunk::new(FetchConversations::TYPE);
pub const FETCH_CONVERSATION_STATS: AsyncThunk = AsyncThunk::new(FetchConversationStats::TYPE);
pub const FETCH_CONVERSATION: AsyncThunk = AsyncThunk::new(FetchConversation::TYPE);
pub const FETCH_PREVIOUS_MESSAGES: AsyncThunk = AsyncThunk::new(FetchPreviousMessages::TYPE);
pub const MARK_MESSAGES_AS_READ: AsyncThunk = AsyncThunk::new(MarkMessagesAsRead::TYPE);
pub const MARK_MESSAGES_AS_UNREAD: AsyncThunk = AsyncThunk::new(MarkMessagesAsUnread::TYPE);
pub const MUTE_CONVERSATION: AsyncThunk = AsyncThunk::new(MuteConversation::TYPE);
pub const UNMUTE_CONVERSATION: AsyncThunk = AsyncThunk::new(UnmuteConversation::TYPE);
pub const TOGGLE_CONVERSATION_STATUS: AsyncThunk = AsyncThunk::new(ToggleConversationStatus::TYPE);
pub const UPDATE_CONVERSATION_AND_MESSAGES: AsyncThunk =
    AsyncThunk::new(UpdateConversationAndMessages::TYPE);
pub const TOGGLE_PRIORITY: AsyncThunk = AsyncThunk::new(TogglePriority::TYPE);
pub const ASSIGN_CONVERSATION: AsyncThunk = AsyncThunk::new(AssignConversation::TYPE);
