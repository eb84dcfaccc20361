//! Conversation list state.

use std::fmt;
use std::str::FromStr;

use helpdesk_flux::EntityState;
use serde::{Deserialize, Serialize};

use crate::config::StoreConfig;
use crate::error::ConfigError;
use crate::model::{Conversation, ConversationStatus, InboxId};

/// Status filter of the conversation list. `All` disables the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    Open,
    Resolved,
    Pending,
    Snoozed,
    All,
}

impl StatusFilter {
    pub fn matches(self, status: ConversationStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Open => status == ConversationStatus::Open,
            StatusFilter::Resolved => status == ConversationStatus::Resolved,
            StatusFilter::Pending => status == ConversationStatus::Pending,
            StatusFilter::Snoozed => status == ConversationStatus::Snoozed,
        }
    }
}

/// Which assignees the list shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssigneeType {
    /// Assigned to the signed-in agent.
    #[default]
    Mine,
    Unassigned,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortFilter {
    /// Most recent activity first.
    #[default]
    Latest,
    /// Oldest conversation first.
    SortOnCreatedAt,
    /// Most urgent first.
    SortOnPriority,
}

macro_rules! wire_names {
    ($ty:ty { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $name),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ConfigError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(Self::$variant),)+
                    other => Err(ConfigError::UnknownValue {
                        kind: stringify!($ty),
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

wire_names!(StatusFilter {
    Open => "open",
    Resolved => "resolved",
    Pending => "pending",
    Snoozed => "snoozed",
    All => "all",
});

wire_names!(AssigneeType {
    Mine => "mine",
    Unassigned => "unassigned",
    All => "all",
});

wire_names!(SortFilter {
    Latest => "latest",
    SortOnCreatedAt => "sort_on_created_at",
    SortOnPriority => "sort_on_priority",
});

/// Per-assignee conversation counters reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConversationCounts {
    #[serde(default)]
    pub mine_count: u32,
    #[serde(default)]
    pub unassigned_count: u32,
    #[serde(default)]
    pub all_count: u32,
}

/// Everything the conversation list renders from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationsState {
    pub conversations: EntityState<Conversation>,
    pub loading: bool,
    pub meta: ConversationCounts,
    pub is_conversation_fetching: bool,
    pub is_all_conversations_fetched: bool,
    pub is_all_messages_fetched: bool,
    pub conversation_status: StatusFilter,
    pub assignee_type: AssigneeType,
    pub sort_filter: SortFilter,
    /// `0` means every inbox.
    pub current_inbox: InboxId,
    pub loading_messages: bool,
    pub is_changing_conversation_status: bool,
    pub is_changing_conversation_assignee: bool,
    /// A page shorter than this marks the end of the list or history.
    pub page_size: usize,
}

impl ConversationsState {
    pub const DEFAULT_PAGE_SIZE: usize = 20;

    /// Initial state with the filters and page size from `config`.
    pub fn from_config(config: &StoreConfig) -> Self {
        Self {
            conversation_status: config.status,
            assignee_type: config.assignee_type,
            sort_filter: config.sort,
            current_inbox: config.inbox_id,
            page_size: config.page_size,
            ..Self::default()
        }
    }
}

impl Default for ConversationsState {
    fn default() -> Self {
        Self {
            conversations: EntityState::new(),
            loading: false,
            meta: ConversationCounts::default(),
            is_conversation_fetching: false,
            is_all_conversations_fetched: false,
            is_all_messages_fetched: false,
            conversation_status: StatusFilter::Open,
            assignee_type: AssigneeType::Mine,
            sort_filter: SortFilter::Latest,
            current_inbox: 0,
            loading_messages: false,
            is_changing_conversation_status: false,
            is_changing_conversation_assignee: false,
            page_size: Self::DEFAULT_PAGE_SIZE,
        }
    }
}
