//! Filtering, ordering and message matching shared by reducers and selectors.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::model::{Conversation, InboxId, Message, Priority, UserId};
use crate::state::{AssigneeType, SortFilter, StatusFilter};

/// Arguments of the filtered conversation list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ConversationFilters {
    pub assignee_type: AssigneeType,
    /// Signed-in agent, compared against the assignee for `Mine`.
    pub user_id: UserId,
    pub sort_by: SortFilter,
    pub status: StatusFilter,
    /// `0` means every inbox.
    pub inbox_id: InboxId,
}

/// Status and inbox filters. Assignee filtering happens in the selector.
pub fn apply_filters(conversation: &Conversation, filters: &ConversationFilters) -> bool {
    let status_matches = filters.status.matches(conversation.status);
    let inbox_matches = filters.inbox_id == 0 || conversation.inbox_id == filters.inbox_id;
    status_matches && inbox_matches
}

/// Position of the stored copy of `message` (same echo id, or same id when
/// either side has none).
pub fn find_pending_message_index(conversation: &Conversation, message: &Message) -> Option<usize> {
    conversation.messages.iter().position(|m| m.same_as(message))
}

/// Rank for `sort_on_priority`; lower sorts first.
pub fn priority_rank(priority: Option<Priority>) -> u8 {
    match priority {
        Some(Priority::Urgent) => 1,
        Some(Priority::High) => 2,
        Some(Priority::Medium) => 3,
        Some(Priority::Low) => 4,
        None => 5,
    }
}

pub fn compare(sort_by: SortFilter, a: &Conversation, b: &Conversation) -> Ordering {
    match sort_by {
        SortFilter::Latest => b.last_activity_at.cmp(&a.last_activity_at),
        SortFilter::SortOnCreatedAt => a.created_at.cmp(&b.created_at),
        SortFilter::SortOnPriority => priority_rank(a.priority).cmp(&priority_rank(b.priority)),
    }
}

/// Stable sort in place.
pub fn sort_conversations(conversations: &mut [Conversation], sort_by: SortFilter) {
    conversations.sort_by(|a, b| compare(sort_by, a, b));
}
