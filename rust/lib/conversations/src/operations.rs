//! Async operations against the backend.
//!
//! Each function runs its request through the matching `AsyncThunk`, so the
//! store sees `pending` before the call and `fulfilled` / `rejected` after
//! it. The result is returned as well for callers that chain on it.

use helpdesk_flux::Store;

use crate::api::{
    AssigneeChange, ConversationApi, ConversationList, ConversationRef, ConversationRefresh,
    ConversationStats, PreviousMessages, PriorityChange, ReadReceipt, StatusChange, UnreadReceipt,
};
use crate::error::ApiError;
use crate::model::Conversation;
use crate::requests::*;
use crate::state::ConversationsState;

type State = ConversationsState;

pub async fn fetch_conversations(
    store: &Store<State>,
    api: &dyn ConversationApi,
    req: &FetchConversations,
) -> Result<ConversationList, ApiError> {
    FETCH_CONVERSATIONS
        .run(store, req.clone(), api.list_conversations(&req.0))
        .await
}

pub async fn fetch_conversation_stats(
    store: &Store<State>,
    api: &dyn ConversationApi,
    req: &FetchConversationStats,
) -> Result<ConversationStats, ApiError> {
    let work = async {
        let meta = api.conversation_stats(&req.0).await?;
        Ok::<_, ApiError>(ConversationStats { meta })
    };
    FETCH_CONVERSATION_STATS.run(store, req.clone(), work).await
}

pub async fn fetch_conversation(
    store: &Store<State>,
    api: &dyn ConversationApi,
    req: &FetchConversation,
) -> Result<Conversation, ApiError> {
    FETCH_CONVERSATION
        .run(store, req.clone(), api.get_conversation(req.conversation_id))
        .await
}

/// Without an explicit `before_id` the page ends just before the oldest
/// confirmed message already loaded. Optimistic messages carry a placeholder
/// id and are skipped.
pub async fn fetch_previous_messages(
    store: &Store<State>,
    api: &dyn ConversationApi,
    req: &FetchPreviousMessages,
) -> Result<PreviousMessages, ApiError> {
    let before = req.before_id.or_else(|| {
        store.read(|s| {
            s.conversations
                .get(&req.conversation_id)
                .and_then(|c| c.messages.iter().find(|m| !m.is_pending()).map(|m| m.id))
        })
    });
    let work = async {
        let data = api.list_messages(req.conversation_id, before).await?;
        Ok::<_, ApiError>(PreviousMessages {
            conversation_id: req.conversation_id,
            data,
        })
    };
    FETCH_PREVIOUS_MESSAGES.run(store, req.clone(), work).await
}

pub async fn mark_messages_as_read(
    store: &Store<State>,
    api: &dyn ConversationApi,
    req: &MarkMessagesAsRead,
) -> Result<ReadReceipt, ApiError> {
    let work = async {
        let last_seen = api.mark_read(req.conversation_id).await?;
        Ok::<_, ApiError>(ReadReceipt {
            id: req.conversation_id,
            last_seen,
        })
    };
    MARK_MESSAGES_AS_READ.run(store, req.clone(), work).await
}

pub async fn mark_messages_as_unread(
    store: &Store<State>,
    api: &dyn ConversationApi,
    req: &MarkMessagesAsUnread,
) -> Result<UnreadReceipt, ApiError> {
    MARK_MESSAGES_AS_UNREAD
        .run(store, req.clone(), api.mark_unread(req.conversation_id))
        .await
}

pub async fn mute_conversation(
    store: &Store<State>,
    api: &dyn ConversationApi,
    req: &MuteConversation,
) -> Result<ConversationRef, ApiError> {
    let id = req.conversation_id;
    let work = async {
        api.set_muted(id, true).await?;
        Ok::<_, ApiError>(ConversationRef { id })
    };
    MUTE_CONVERSATION.run(store, req.clone(), work).await
}

pub async fn unmute_conversation(
    store: &Store<State>,
    api: &dyn ConversationApi,
    req: &UnmuteConversation,
) -> Result<ConversationRef, ApiError> {
    let id = req.conversation_id;
    let work = async {
        api.set_muted(id, false).await?;
        Ok::<_, ApiError>(ConversationRef { id })
    };
    UNMUTE_CONVERSATION.run(store, req.clone(), work).await
}

pub async fn toggle_conversation_status(
    store: &Store<State>,
    api: &dyn ConversationApi,
    req: &ToggleConversationStatus,
) -> Result<StatusChange, ApiError> {
    let work = api.toggle_status(req.conversation_id, req.status, req.snoozed_until);
    TOGGLE_CONVERSATION_STATUS.run(store, req.clone(), work).await
}

pub async fn update_conversation_and_messages(
    store: &Store<State>,
    api: &dyn ConversationApi,
    req: &UpdateConversationAndMessages,
) -> Result<ConversationRefresh, ApiError> {
    let work = async {
        let data = api.get_conversation(req.conversation_id).await?;
        Ok::<_, ApiError>(ConversationRefresh {
            conversation_id: req.conversation_id,
            data,
        })
    };
    UPDATE_CONVERSATION_AND_MESSAGES.run(store, req.clone(), work).await
}

pub async fn toggle_priority(
    store: &Store<State>,
    api: &dyn ConversationApi,
    req: &TogglePriority,
) -> Result<PriorityChange, ApiError> {
    let work = async {
        api.set_priority(req.conversation_id, req.priority).await?;
        Ok::<_, ApiError>(PriorityChange {
            id: req.conversation_id,
            priority: req.priority,
        })
    };
    TOGGLE_PRIORITY.run(store, req.clone(), work).await
}

pub async fn assign_conversation(
    store: &Store<State>,
    api: &dyn ConversationApi,
    req: &AssignConversation,
) -> Result<AssigneeChange, ApiError> {
    let work = async {
        let assignee = api.assign(req.conversation_id, req.assignee_id).await?;
        Ok::<_, ApiError>(AssigneeChange {
            id: req.conversation_id,
            assignee,
        })
    };
    ASSIGN_CONVERSATION.run(store, req.clone(), work).await
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::api::ConversationQuery;
    use crate::backend::MemoryBackend;
    use crate::model::fixtures::*;
    use crate::model::{ConversationStatus, Priority};
    use crate::reducer::reducers;

    fn setup(conversations: Vec<Conversation>) -> (Store<State>, MemoryBackend) {
        let store = Store::new(State::default(), reducers());
        let backend = MemoryBackend::new(State::DEFAULT_PAGE_SIZE);
        for c in conversations {
            backend.insert(c);
        }
        (store, backend)
    }

    fn record_kinds(store: &Store<State>) -> Arc<Mutex<Vec<String>>> {
        let kinds = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&kinds);
        store.subscribe("conversations/#", move |kind| sink.lock().unwrap().push(kind.to_string()));
        kinds
    }

    // ========================================================================
    // List
    // ========================================================================

    #[tokio::test]
    async fn test_fetch_conversations_dispatches_lifecycle() {
        let (store, backend) = setup(vec![conversation(1, 1), conversation(2, 1)]);
        let kinds = record_kinds(&store);
        let query = ConversationQuery {
            assignee_type: crate::state::AssigneeType::All,
            ..Default::default()
        };

        let list = fetch_conversations(&store, &backend, &FetchConversations(query)).await.unwrap();
        assert_eq!(list.conversations.len(), 2);
        assert_eq!(
            *kinds.lock().unwrap(),
            vec![FETCH_CONVERSATIONS.pending(), FETCH_CONVERSATIONS.fulfilled()]
        );
        assert_eq!(store.read(|s| s.conversations.len()), 2);
        assert!(!store.read(|s| s.loading));
    }

    #[tokio::test]
    async fn test_offline_backend_rejects() {
        let (store, backend) = setup(vec![conversation(1, 1)]);
        backend.set_offline(true);
        let kinds = record_kinds(&store);

        let err = fetch_conversations(&store, &backend, &FetchConversations(Default::default()))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
        assert_eq!(kinds.lock().unwrap().last(), Some(&FETCH_CONVERSATIONS.rejected()));
        assert!(!store.read(|s| s.loading));
    }

    #[tokio::test]
    async fn test_fetch_stats() {
        let (store, backend) = setup(vec![conversation(1, 1)]);
        let stats = fetch_conversation_stats(&store, &backend, &FetchConversationStats(Default::default()))
            .await
            .unwrap();
        assert_eq!(stats.meta.unassigned_count, 1);
        assert_eq!(store.read(|s| s.meta), stats.meta);
    }

    // ========================================================================
    // Single conversation
    // ========================================================================

    #[tokio::test]
    async fn test_fetch_previous_messages_defaults_to_oldest_loaded() {
        let mut seeded = conversation(1, 1);
        seeded.messages = (1..=5).map(|id| message(id, 1, id as i64)).collect();
        let (store, backend) = setup(vec![seeded.clone()]);

        let mut loaded = seeded;
        loaded.messages.drain(..3);
        store.dispatch(crate::actions::AddConversation(loaded));

        let page = fetch_previous_messages(
            &store,
            &backend,
            &FetchPreviousMessages { conversation_id: 1, before_id: None },
        )
        .await
        .unwrap();
        assert_eq!(page.data.iter().map(|m| m.id).collect::<Vec<_>>(), vec![1, 2, 3]);

        let ids: Vec<_> = store.read(|s| s.conversations.get(&1).unwrap().messages.iter().map(|m| m.id).collect());
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert!(store.read(|s| s.is_all_messages_fetched));
    }

    #[tokio::test]
    async fn test_fetch_previous_messages_skips_optimistic_placeholder() {
        let mut seeded = conversation(1, 1);
        seeded.messages = (1..=5).map(|id| message(id, 1, id as i64)).collect();
        let (store, backend) = setup(vec![seeded.clone()]);

        let mut optimistic = message(0, 1, 6);
        optimistic.echo_id = Some("tmp-1".into());
        optimistic.status = crate::model::MessageStatus::Progress;
        let mut loaded = seeded;
        loaded.messages.drain(..3);
        loaded.messages.insert(0, optimistic);
        store.dispatch(crate::actions::AddConversation(loaded));

        let page = fetch_previous_messages(
            &store,
            &backend,
            &FetchPreviousMessages { conversation_id: 1, before_id: None },
        )
        .await
        .unwrap();
        assert_eq!(page.data.iter().map(|m| m.id).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_attribute_operations() {
        let (store, backend) = setup(vec![conversation(1, 1)]);
        store.dispatch(crate::actions::AddConversation(conversation(1, 1)));

        mute_conversation(&store, &backend, &MuteConversation { conversation_id: 1 }).await.unwrap();
        assert!(store.read(|s| s.conversations.get(&1).unwrap().muted));
        unmute_conversation(&store, &backend, &UnmuteConversation { conversation_id: 1 }).await.unwrap();
        assert!(!store.read(|s| s.conversations.get(&1).unwrap().muted));

        toggle_priority(&store, &backend, &TogglePriority { conversation_id: 1, priority: Some(Priority::Urgent) })
            .await
            .unwrap();
        assert_eq!(store.read(|s| s.conversations.get(&1).unwrap().priority), Some(Priority::Urgent));

        let change = toggle_conversation_status(
            &store,
            &backend,
            &ToggleConversationStatus {
                conversation_id: 1,
                status: ConversationStatus::Resolved,
                snoozed_until: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(change.updated_status, ConversationStatus::Resolved);
        assert_eq!(
            store.read(|s| s.conversations.get(&1).unwrap().status),
            ConversationStatus::Resolved
        );

        backend.add_agent(agent(7));
        assign_conversation(&store, &backend, &AssignConversation { conversation_id: 1, assignee_id: Some(7) })
            .await
            .unwrap();
        assert_eq!(store.read(|s| s.conversations.get(&1).unwrap().assignee_id()), Some(7));
    }

    #[tokio::test]
    async fn test_read_unread_round() {
        let (store, backend) = setup(vec![conversation(1, 1)]);
        store.dispatch(crate::actions::AddConversation(conversation(1, 1)));

        let unread = mark_messages_as_unread(&store, &backend, &MarkMessagesAsUnread { conversation_id: 1 })
            .await
            .unwrap();
        assert!(unread.unread_count > 0);
        assert_eq!(store.read(|s| s.conversations.get(&1).unwrap().unread_count), unread.unread_count);

        mark_messages_as_read(&store, &backend, &MarkMessagesAsRead { conversation_id: 1 }).await.unwrap();
        assert_eq!(store.read(|s| s.conversations.get(&1).unwrap().unread_count), 0);
    }

    #[tokio::test]
    async fn test_missing_conversation_is_not_found() {
        let (store, backend) = setup(vec![]);
        let err = fetch_conversation(&store, &backend, &FetchConversation { conversation_id: 9 })
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::NotFound(9));
        assert!(!store.read(|s| s.is_conversation_fetching));
    }

    #[tokio::test]
    async fn test_update_conversation_and_messages_picks_up_new_message() {
        let (store, backend) = setup(vec![conversation(1, 1)]);
        store.dispatch(crate::actions::AddConversation(conversation(1, 1)));
        backend.push_message(message(150, 1, 3_000));

        update_conversation_and_messages(&store, &backend, &UpdateConversationAndMessages { conversation_id: 1 })
            .await
            .unwrap();
        assert_eq!(store.read(|s| s.conversations.get(&1).unwrap().last_message_id()), Some(150));
    }
}
