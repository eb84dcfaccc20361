//! In-process `ConversationApi` used by the demo binary and tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use tracing::debug;

use crate::api::{ConversationApi, ConversationList, ConversationQuery, StatusChange, UnreadReceipt};
use crate::error::ApiError;
use crate::helpers::{ConversationFilters, apply_filters, sort_conversations};
use crate::model::{
    Assignee, Conversation, ConversationId, ConversationStatus, Message, MessageId, Priority, UserId,
};
use crate::state::{AssigneeType, ConversationCounts};

const DEMO_SEED: &str = include_str!("../data/seed.json");

/// Conversations and agents held in memory, served in pages.
///
/// List pages carry only the latest message of each conversation, the way
/// the REST list endpoint does; `get_conversation` carries the latest page.
pub struct MemoryBackend {
    page_size: usize,
    user_id: UserId,
    offline: AtomicBool,
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    conversations: BTreeMap<ConversationId, Conversation>,
    agents: HashMap<UserId, Assignee>,
}

#[derive(Deserialize)]
struct Seed {
    user_id: UserId,
    agents: Vec<Assignee>,
    conversations: Vec<Conversation>,
}

impl MemoryBackend {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            user_id: 0,
            offline: AtomicBool::new(false),
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Agent whose conversations count as "mine".
    pub fn with_user(mut self, user_id: UserId) -> Self {
        self.user_id = user_id;
        self
    }

    /// Load agents and conversations from a JSON seed.
    pub fn from_json(page_size: usize, json: &str) -> Result<Self, ApiError> {
        let seed: Seed = serde_json::from_str(json)?;
        let backend = Self::new(page_size).with_user(seed.user_id);
        for agent in seed.agents {
            backend.add_agent(agent);
        }
        for conversation in seed.conversations {
            backend.insert(conversation);
        }
        Ok(backend)
    }

    /// The bundled demo inbox, with timestamps moved so the latest activity
    /// is now.
    pub fn demo(page_size: usize) -> Result<Self, ApiError> {
        let backend = Self::from_json(page_size, DEMO_SEED)?;
        {
            let mut inner = backend.lock();
            let latest = inner
                .conversations
                .values()
                .map(|c| c.last_activity_at)
                .max()
                .unwrap_or_default();
            let shift = Utc::now().timestamp() - latest;
            for c in inner.conversations.values_mut() {
                c.created_at += shift;
                c.timestamp += shift;
                c.last_activity_at += shift;
                c.snoozed_until = c.snoozed_until.map(|t| t + shift);
                for m in &mut c.messages {
                    m.created_at += shift;
                }
            }
        }
        Ok(backend)
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn insert(&self, conversation: Conversation) {
        self.lock().conversations.insert(conversation.id, conversation);
    }

    pub fn add_agent(&self, agent: Assignee) {
        self.lock().agents.insert(agent.id, agent);
    }

    /// Append a message as if it had just arrived. Returns false when the
    /// conversation is unknown.
    pub fn push_message(&self, message: Message) -> bool {
        let Some(id) = message.conversation_id else {
            return false;
        };
        let mut inner = self.lock();
        let Some(conversation) = inner.conversations.get_mut(&id) else {
            return false;
        };
        conversation.timestamp = message.created_at;
        conversation.last_activity_at = conversation.last_activity_at.max(message.created_at);
        conversation.unread_count += 1;
        conversation.messages.push(message);
        true
    }

    /// While offline every call fails with `ApiError::Network`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Relaxed);
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_online(&self) -> Result<(), ApiError> {
        if self.offline.load(Ordering::Relaxed) {
            return Err(ApiError::Network("backend offline".into()));
        }
        Ok(())
    }

    fn filters(&self, query: &ConversationQuery) -> ConversationFilters {
        ConversationFilters {
            assignee_type: query.assignee_type,
            user_id: self.user_id,
            sort_by: query.sort_by,
            status: query.status,
            inbox_id: query.inbox_id,
        }
    }

    fn counts(&self, inner: &Inner, filters: &ConversationFilters) -> ConversationCounts {
        let mut counts = ConversationCounts::default();
        for c in inner.conversations.values().filter(|c| apply_filters(c, filters)) {
            counts.all_count += 1;
            match c.assignee_id() {
                None => counts.unassigned_count += 1,
                Some(id) if id == self.user_id => counts.mine_count += 1,
                Some(_) => {}
            }
        }
        counts
    }

    fn with_conversation<R>(
        &self,
        id: ConversationId,
        f: impl FnOnce(&mut Conversation) -> R,
    ) -> Result<R, ApiError> {
        self.check_online()?;
        let mut inner = self.lock();
        let conversation = inner.conversations.get_mut(&id).ok_or(ApiError::NotFound(id))?;
        Ok(f(conversation))
    }

    fn latest_page(&self, messages: &[Message]) -> Vec<Message> {
        let start = messages.len().saturating_sub(self.page_size);
        messages[start..].to_vec()
    }
}

#[async_trait]
impl ConversationApi for MemoryBackend {
    async fn list_conversations(&self, query: &ConversationQuery) -> Result<ConversationList, ApiError> {
        self.check_online()?;
        let filters = self.filters(query);
        let inner = self.lock();

        let mut matching: Vec<Conversation> = inner
            .conversations
            .values()
            .filter(|c| apply_filters(c, &filters))
            .filter(|c| match filters.assignee_type {
                AssigneeType::Mine => c.assignee_id() == Some(self.user_id),
                AssigneeType::Unassigned => c.assignee_id().is_none(),
                AssigneeType::All => true,
            })
            .cloned()
            .collect();
        sort_conversations(&mut matching, filters.sort_by);

        let skip = (query.page.max(1) as usize - 1) * self.page_size;
        let conversations: Vec<Conversation> = matching
            .into_iter()
            .skip(skip)
            .take(self.page_size)
            .map(|mut c| {
                let last = c.messages.pop();
                c.messages = last.into_iter().collect();
                c
            })
            .collect();
        debug!(page = query.page, count = conversations.len(), "list conversations");

        Ok(ConversationList {
            conversations,
            meta: self.counts(&inner, &filters),
        })
    }

    async fn conversation_stats(&self, query: &ConversationQuery) -> Result<ConversationCounts, ApiError> {
        self.check_online()?;
        let filters = self.filters(query);
        Ok(self.counts(&self.lock(), &filters))
    }

    async fn get_conversation(&self, id: ConversationId) -> Result<Conversation, ApiError> {
        self.with_conversation(id, |c| Conversation {
            messages: self.latest_page(&c.messages),
            ..c.clone()
        })
    }

    async fn list_messages(
        &self,
        id: ConversationId,
        before: Option<MessageId>,
    ) -> Result<Vec<Message>, ApiError> {
        self.with_conversation(id, |c| {
            let end = match before {
                Some(before) => c.messages.iter().take_while(|m| m.id < before).count(),
                None => c.messages.len(),
            };
            self.latest_page(&c.messages[..end])
        })
    }

    async fn mark_read(&self, id: ConversationId) -> Result<i64, ApiError> {
        let now = Utc::now().timestamp();
        self.with_conversation(id, |c| {
            c.unread_count = 0;
            c.agent_last_seen_at = Some(now);
            now
        })
    }

    async fn mark_unread(&self, id: ConversationId) -> Result<UnreadReceipt, ApiError> {
        self.with_conversation(id, |c| {
            // Seen up to just before the latest message, which becomes unread.
            let last_seen = c.messages.last().map(|m| m.created_at - 1).unwrap_or_default();
            c.unread_count = u32::from(!c.messages.is_empty());
            c.agent_last_seen_at = Some(last_seen);
            UnreadReceipt {
                id,
                unread_count: c.unread_count,
                last_seen,
            }
        })
    }

    async fn set_muted(&self, id: ConversationId, muted: bool) -> Result<(), ApiError> {
        self.with_conversation(id, |c| c.muted = muted)
    }

    async fn toggle_status(
        &self,
        id: ConversationId,
        status: ConversationStatus,
        snoozed_until: Option<i64>,
    ) -> Result<StatusChange, ApiError> {
        self.with_conversation(id, |c| {
            c.status = status;
            c.snoozed_until = match status {
                ConversationStatus::Snoozed => snoozed_until,
                _ => None,
            };
            StatusChange {
                id,
                updated_status: c.status,
                updated_snoozed_until: c.snoozed_until,
            }
        })
    }

    async fn set_priority(&self, id: ConversationId, priority: Option<Priority>) -> Result<(), ApiError> {
        self.with_conversation(id, |c| c.priority = priority)
    }

    async fn assign(
        &self,
        id: ConversationId,
        assignee_id: Option<UserId>,
    ) -> Result<Option<Assignee>, ApiError> {
        self.check_online()?;
        let mut inner = self.lock();
        let assignee = match assignee_id {
            Some(agent_id) => Some(inner.agents.get(&agent_id).cloned().ok_or_else(|| ApiError::Server {
                status: 422,
                message: format!("agent {agent_id} not found"),
            })?),
            None => None,
        };
        let conversation = inner.conversations.get_mut(&id).ok_or(ApiError::NotFound(id))?;
        conversation.meta.assignee = assignee.clone();
        Ok(assignee)
    }
}
