//! Conversation and message records as the support-desk API delivers them.
//!
//! Field names and enum spellings follow the REST payloads (snake_case,
//! lowercase strings). Timestamps are Unix seconds.

use helpdesk_flux::Entity;
use serde::{Deserialize, Serialize};

pub type ConversationId = u64;
pub type MessageId = u64;
pub type InboxId = u64;
pub type UserId = u64;
pub type ContactId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStatus {
    Open,
    Resolved,
    Pending,
    Snoozed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Urgent,
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    /// Created locally, not yet confirmed by the server.
    Progress,
    Sent,
    Delivered,
    Read,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityStatus {
    Online,
    Busy,
    Offline,
}

/// The customer side of a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sender {
    pub id: ContactId,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_status: Option<AvailabilityStatus>,
}

/// The agent a conversation is assigned to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignee {
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMeta {
    pub sender: Sender,
    #[serde(default)]
    pub assignee: Option<Assignee>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    #[serde(default)]
    pub conversation_id: Option<ConversationId>,
    #[serde(default)]
    pub content: Option<String>,
    /// Client-generated id carried by an optimistic message and echoed back
    /// by the server on the confirmed copy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub echo_id: Option<String>,
    pub created_at: i64,
    pub status: MessageStatus,
    #[serde(default)]
    pub private: bool,
}

impl Message {
    /// Whether `other` is the same message. When both carry an echo id the
    /// echo id decides alone, since optimistic copies share a placeholder id.
    pub fn same_as(&self, other: &Message) -> bool {
        match (self.echo(), other.echo()) {
            (Some(a), Some(b)) => a == b,
            _ => self.id == other.id,
        }
    }

    fn echo(&self) -> Option<&str> {
        self.echo_id.as_deref().filter(|e| !e.is_empty())
    }

    /// Still waiting for the server to confirm it.
    pub fn is_pending(&self) -> bool {
        self.status == MessageStatus::Progress
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub inbox_id: InboxId,
    pub status: ConversationStatus,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub unread_count: u32,
    #[serde(default)]
    pub muted: bool,
    #[serde(default)]
    pub messages: Vec<Message>,
    pub meta: ConversationMeta,
    /// Time of the latest message.
    #[serde(default)]
    pub timestamp: i64,
    pub created_at: i64,
    #[serde(default)]
    pub last_activity_at: i64,
    #[serde(default)]
    pub agent_last_seen_at: Option<i64>,
    #[serde(default)]
    pub snoozed_until: Option<i64>,
}

impl Conversation {
    /// Take every attribute of `incoming` except its message list.
    pub fn apply_attributes(&mut self, incoming: Conversation) {
        let messages = std::mem::take(&mut self.messages);
        *self = Conversation {
            messages,
            ..incoming
        };
    }

    pub fn last_message_id(&self) -> Option<MessageId> {
        self.messages.last().map(|m| m.id)
    }

    pub fn assignee_id(&self) -> Option<UserId> {
        self.meta.assignee.as_ref().map(|a| a.id)
    }
}

impl Entity for Conversation {
    type Id = ConversationId;

    fn id(&self) -> ConversationId {
        self.id
    }
}
