//! Backend seam and the result payloads of async operations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::model::{
    Assignee, Conversation, ConversationId, ConversationStatus, InboxId, Message, MessageId,
    Priority, UserId,
};
use crate::state::{AssigneeType, ConversationCounts, SortFilter, StatusFilter};

/// Query for one page of the conversation list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationQuery {
    pub status: StatusFilter,
    pub assignee_type: AssigneeType,
    pub sort_by: SortFilter,
    /// `0` queries every inbox.
    pub inbox_id: InboxId,
    /// 1-based page number.
    pub page: u32,
}

impl Default for ConversationQuery {
    fn default() -> Self {
        Self {
            status: StatusFilter::Open,
            assignee_type: AssigneeType::Mine,
            sort_by: SortFilter::Latest,
            inbox_id: 0,
            page: 1,
        }
    }
}

/// One page of conversations plus the counters for the whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationList {
    pub conversations: Vec<Conversation>,
    pub meta: ConversationCounts,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConversationStats {
    pub meta: ConversationCounts,
}

/// Older history of one conversation, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviousMessages {
    pub conversation_id: ConversationId,
    pub data: Vec<Message>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReadReceipt {
    pub id: ConversationId,
    pub last_seen: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnreadReceipt {
    pub id: ConversationId,
    pub unread_count: u32,
    pub last_seen: i64,
}

/// Acknowledges an operation that only needs the conversation id.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConversationRef {
    pub id: ConversationId,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusChange {
    pub id: ConversationId,
    pub updated_status: ConversationStatus,
    pub updated_snoozed_until: Option<i64>,
}

/// A freshly fetched conversation used to refresh the stored copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationRefresh {
    pub conversation_id: ConversationId,
    pub data: Conversation,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorityChange {
    pub id: ConversationId,
    pub priority: Option<Priority>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssigneeChange {
    pub id: ConversationId,
    pub assignee: Option<Assignee>,
}

/// Everything the store needs from the support-desk backend.
///
/// The HTTP transport lives outside this crate; `MemoryBackend` is the
/// in-process implementation used by the demo binary and tests.
#[async_trait]
pub trait ConversationApi: Send + Sync + 'static {
    async fn list_conversations(&self, query: &ConversationQuery) -> Result<ConversationList, ApiError>;

    async fn conversation_stats(&self, query: &ConversationQuery) -> Result<ConversationCounts, ApiError>;

    async fn get_conversation(&self, id: ConversationId) -> Result<Conversation, ApiError>;

    /// Up to one page of messages older than `before`, oldest first.
    /// `None` means the newest page.
    async fn list_messages(
        &self,
        id: ConversationId,
        before: Option<MessageId>,
    ) -> Result<Vec<Message>, ApiError>;

    /// Returns the agent's new last-seen timestamp.
    async fn mark_read(&self, id: ConversationId) -> Result<i64, ApiError>;

    async fn mark_unread(&self, id: ConversationId) -> Result<UnreadReceipt, ApiError>;

    async fn set_muted(&self, id: ConversationId, muted: bool) -> Result<(), ApiError>;

    async fn toggle_status(
        &self,
        id: ConversationId,
        status: ConversationStatus,
        snoozed_until: Option<i64>,
    ) -> Result<StatusChange, ApiError>;

    async fn set_priority(&self, id: ConversationId, priority: Option<Priority>) -> Result<(), ApiError>;

    /// Returns the resulting assignee, `None` when unassigned.
    async fn assign(
        &self,
        id: ConversationId,
        assignee_id: Option<UserId>,
    ) -> Result<Option<Assignee>, ApiError>;
}
