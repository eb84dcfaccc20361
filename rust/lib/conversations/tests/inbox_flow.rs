/// End-to-end inbox flow: Flux + handlers + in-memory backend.
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::json;

use helpdesk_conversations::actions::{AddMessage, SetActiveInbox, UpdateContactsPresence};
use helpdesk_conversations::model::{AvailabilityStatus, ConversationStatus, MessageStatus};
use helpdesk_conversations::requests::*;
use helpdesk_conversations::*;

const AGENT: u64 = 7;

fn conversation(id: u64, inbox_id: u64, assignee: Option<u64>, last_activity_at: i64) -> Conversation {
    serde_json::from_value(json!({
        "id": id,
        "inbox_id": inbox_id,
        "status": "open",
        "meta": {
            "sender": {"id": id + 1000, "name": format!("contact {id}")},
            "assignee": assignee.map(|a| json!({"id": a, "name": format!("agent {a}")})),
        },
        "messages": (1..=3).map(|n| json!({
            "id": id * 100 + n,
            "conversation_id": id,
            "content": format!("message {n}"),
            "created_at": last_activity_at - 10 + n as i64,
            "status": "sent",
        })).collect::<Vec<_>>(),
        "timestamp": last_activity_at,
        "created_at": last_activity_at - 100,
        "last_activity_at": last_activity_at,
    }))
    .unwrap()
}

fn setup() -> (helpdesk_flux::Flux<ConversationsState>, Arc<MemoryBackend>) {
    let backend = Arc::new(MemoryBackend::new(2).with_user(AGENT));
    backend.add_agent(serde_json::from_value(json!({"id": AGENT, "name": "agent 7"})).unwrap());
    backend.insert(conversation(1, 1, Some(AGENT), 1_000));
    backend.insert(conversation(2, 1, None, 2_000));
    backend.insert(conversation(3, 2, Some(AGENT), 3_000));

    let config = StoreConfig {
        page_size: 2,
        user_id: AGENT,
        ..StoreConfig::default()
    };
    let flux = new_flux(&config);
    register_handlers(&flux, backend.clone());
    (flux, backend)
}

fn all_query(page: u32) -> ConversationQuery {
    ConversationQuery {
        assignee_type: AssigneeType::All,
        page,
        ..ConversationQuery::default()
    }
}

fn ids(list: &[Conversation]) -> Vec<u64> {
    list.iter().map(|c| c.id).collect()
}

#[tokio::test]
async fn test_paged_load_and_tabs() {
    let (flux, _) = setup();
    let applied = Arc::new(AtomicUsize::new(0));
    let counter = applied.clone();
    flux.subscribe("conversations/fetchConversations/#", move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    flux.emit(FetchConversations(all_query(1))).await;
    assert!(!flux.read(|s| s.is_all_conversations_fetched));
    flux.emit(FetchConversations(all_query(2))).await;
    assert!(flux.read(|s| s.is_all_conversations_fetched));
    assert_eq!(applied.load(Ordering::SeqCst), 4);

    let state = flux.snapshot();
    assert_eq!(state.conversations.len(), 3);
    assert_eq!(state.meta, ConversationCounts { mine_count: 2, unassigned_count: 1, all_count: 3 });

    let selectors = ConversationSelectors::new();
    let mine = ConversationFilters { user_id: AGENT, ..ConversationFilters::default() };
    assert_eq!(ids(&selectors.filtered_conversations(flux.store(), &mine)), vec![3, 1]);

    let unassigned = ConversationFilters { assignee_type: AssigneeType::Unassigned, ..mine };
    assert_eq!(ids(&selectors.filtered_conversations(flux.store(), &unassigned)), vec![2]);

    let inbox_one = ConversationFilters { inbox_id: 1, ..mine };
    assert_eq!(ids(&selectors.filtered_conversations(flux.store(), &inbox_one)), vec![1]);
}

#[tokio::test]
async fn test_open_conversation_and_scroll_back() {
    let (flux, _) = setup();
    flux.emit(FetchConversations(all_query(1))).await;

    flux.emit(FetchConversation { conversation_id: 3 }).await;
    let loaded: Vec<u64> = flux.read(|s| s.conversations.get(&3).unwrap().messages.iter().map(|m| m.id).collect());
    assert_eq!(loaded, vec![302, 303]);
    assert!(!flux.read(|s| s.is_all_messages_fetched));

    flux.emit(FetchPreviousMessages { conversation_id: 3, before_id: None }).await;
    let selectors = ConversationSelectors::new();
    let messages = selectors.messages_by_conversation_id(flux.store(), 3);
    assert_eq!(messages.iter().map(|m| m.id).collect::<Vec<_>>(), vec![301, 302, 303]);
    assert!(flux.read(|s| s.is_all_messages_fetched));
    assert!(!flux.read(|s| s.loading_messages));
}

#[tokio::test]
async fn test_live_events_and_operations() {
    let (flux, backend) = setup();
    flux.emit(FetchConversations(all_query(1))).await;

    // Optimistic send, then the server echo replaces it in place.
    let pending: Message = serde_json::from_value(json!({
        "id": 0, "conversation_id": 3, "echo_id": "tmp-1", "content": "on it",
        "created_at": 3_100, "status": "progress",
    }))
    .unwrap();
    flux.dispatch(AddMessage(pending));
    let optimistic = flux.read(|s| s.conversations.get(&3).unwrap().messages.last().unwrap().clone());
    assert_eq!(optimistic.status, MessageStatus::Progress);
    flux.dispatch(AddMessage(Message {
        id: 399,
        status: MessageStatus::Sent,
        ..optimistic
    }));
    let last = flux.read(|s| s.conversations.get(&3).unwrap().messages.last().unwrap().clone());
    assert_eq!((last.id, last.status), (399, MessageStatus::Sent));
    assert_eq!(flux.read(|s| s.conversations.get(&3).unwrap().timestamp), 3_100);

    flux.dispatch(UpdateContactsPresence {
        contacts: [(1_003, AvailabilityStatus::Online)].into_iter().collect(),
    });
    assert_eq!(
        flux.read(|s| s.conversations.get(&3).unwrap().meta.sender.availability_status),
        Some(AvailabilityStatus::Online)
    );

    flux.emit(ToggleConversationStatus {
        conversation_id: 3,
        status: ConversationStatus::Snoozed,
        snoozed_until: Some(9_000),
    })
    .await;
    let snoozed = flux.read(|s| s.conversations.get(&3).cloned().unwrap());
    assert_eq!(snoozed.status, ConversationStatus::Snoozed);
    assert_eq!(snoozed.snoozed_until, Some(9_000));

    backend.set_offline(true);
    flux.emit(MuteConversation { conversation_id: 3 }).await;
    assert!(!flux.read(|s| s.conversations.get(&3).unwrap().muted));
    assert!(!flux.read(|s| s.is_changing_conversation_status));
}

#[tokio::test]
async fn test_two_optimistic_sends_confirmed_out_of_order() {
    let (flux, _) = setup();
    flux.emit(FetchConversations(all_query(1))).await;

    let optimistic = |echo: &str, content: &str| -> Message {
        serde_json::from_value(json!({
            "id": 0, "conversation_id": 3, "echo_id": echo, "content": content,
            "created_at": 3_100, "status": "progress",
        }))
        .unwrap()
    };
    flux.dispatch(AddMessage(optimistic("tmp-1", "first")));
    flux.dispatch(AddMessage(optimistic("tmp-2", "second")));

    flux.dispatch(AddMessage(Message {
        id: 401,
        status: MessageStatus::Sent,
        ..optimistic("tmp-2", "second")
    }));
    flux.dispatch(AddMessage(Message {
        id: 400,
        status: MessageStatus::Sent,
        ..optimistic("tmp-1", "first")
    }));

    let messages = flux.read(|s| s.conversations.get(&3).unwrap().messages.clone());
    let tail: Vec<_> = messages[messages.len() - 2..]
        .iter()
        .map(|m| (m.id, m.content.as_deref(), m.status))
        .collect();
    assert_eq!(
        tail,
        vec![(400, Some("first"), MessageStatus::Sent), (401, Some("second"), MessageStatus::Sent)]
    );
    assert_eq!(messages.len(), 3);
}

#[tokio::test]
async fn test_inbox_switch_filters_new_conversations() {
    let (flux, _) = setup();
    flux.dispatch(SetActiveInbox(2));
    flux.dispatch(helpdesk_conversations::actions::AddConversation(conversation(10, 1, None, 5_000)));
    flux.dispatch(helpdesk_conversations::actions::AddConversation(conversation(11, 2, None, 5_000)));
    assert_eq!(flux.read(|s| s.conversations.ids().to_vec()), vec![11]);
}
