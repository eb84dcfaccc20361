//! Case reducers for the conversation list.

use std::collections::HashSet;

use helpdesk_flux::Reducers;

use crate::actions::*;
use crate::api::{
    AssigneeChange, ConversationList, ConversationRef, ConversationRefresh, ConversationStats,
    PreviousMessages, PriorityChange, ReadReceipt, StatusChange, UnreadReceipt,
};
use crate::helpers::find_pending_message_index;
use crate::model::{Conversation, Message, MessageId};
use crate::requests::*;
use crate::state::ConversationsState;

type State = ConversationsState;

/// Every case the conversation store handles.
pub fn reducers() -> Reducers<State> {
    let reducers = Reducers::new()
        // ====================================================================
        // Filters
        // ====================================================================
        .on(|s: &mut State, _: &ClearAllConversations| s.conversations.remove_all())
        .on(|s: &mut State, a: &SetConversationStatus| s.conversation_status = a.0)
        .on(|s: &mut State, a: &SetAssigneeType| s.assignee_type = a.0)
        .on(|s: &mut State, a: &SetActiveInbox| s.current_inbox = a.0)
        .on(|s: &mut State, a: &SetSortFilter| s.sort_filter = a.0)
        // ====================================================================
        // Push events
        // ====================================================================
        .on(|s: &mut State, a: &ClearConversation| {
            s.conversations.remove_one(&a.0);
        })
        .on(|s: &mut State, a: &AddConversation| add_conversation(s, &a.0))
        .on(|s: &mut State, a: &UpdateConversation| update_conversation(s, &a.0))
        .on(|s: &mut State, a: &AddMessage| add_message(s, &a.0))
        .on(|s: &mut State, a: &UpdateContactsPresence| {
            for conversation in s.conversations.values_mut() {
                let sender = &mut conversation.meta.sender;
                if let Some(status) = a.contacts.get(&sender.id) {
                    sender.availability_status = Some(*status);
                }
            }
        });

    let reducers = list_cases(reducers);
    let reducers = conversation_cases(reducers);
    attribute_cases(reducers)
}

fn add_conversation(state: &mut State, conversation: &Conversation) {
    if state.current_inbox == 0 || state.current_inbox == conversation.inbox_id {
        state.conversations.add_one(conversation.clone());
    }
}

fn update_conversation(state: &mut State, conversation: &Conversation) {
    let updated = state
        .conversations
        .update_one(&conversation.id, |stored| stored.apply_attributes(conversation.clone()));
    if !updated {
        state.conversations.add_one(conversation.clone());
    }
}

fn add_message(state: &mut State, message: &Message) {
    let Some(conversation_id) = message.conversation_id else {
        return;
    };
    state.conversations.update_one(&conversation_id, |conversation| {
        match find_pending_message_index(conversation, message) {
            Some(index) => conversation.messages[index] = message.clone(),
            None => {
                conversation.messages.push(message.clone());
                conversation.timestamp = message.created_at;
            }
        }
    });
}

/// Older history goes in front; ids already loaded are skipped.
fn prepend_messages(conversation: &mut Conversation, older: &[Message]) {
    let loaded: HashSet<MessageId> = conversation.messages.iter().map(|m| m.id).collect();
    let mut messages: Vec<Message> = older
        .iter()
        .filter(|m| !loaded.contains(&m.id))
        .cloned()
        .collect();
    messages.append(&mut conversation.messages);
    conversation.messages = messages;
}

fn list_cases(reducers: Reducers<State>) -> Reducers<State> {
    reducers
        .on_pending(FETCH_CONVERSATIONS, |s: &mut State, _: &FetchConversations| s.loading = true)
        .on_fulfilled(FETCH_CONVERSATIONS, |s: &mut State, list: &ConversationList| {
            s.conversations.upsert_many(list.conversations.iter().cloned());
            s.meta = list.meta;
            s.loading = false;
            s.is_all_conversations_fetched = list.conversations.len() < s.page_size;
        })
        .on_rejected(FETCH_CONVERSATIONS, |s: &mut State| s.loading = false)
        .on_fulfilled(FETCH_CONVERSATION_STATS, |s: &mut State, stats: &ConversationStats| {
            s.meta = stats.meta
        })
}

fn conversation_cases(reducers: Reducers<State>) -> Reducers<State> {
    reducers
        .on_pending(FETCH_CONVERSATION, |s: &mut State, _: &FetchConversation| {
            s.is_conversation_fetching = true
        })
        .on_fulfilled(FETCH_CONVERSATION, |s: &mut State, conversation: &Conversation| {
            s.conversations.upsert_one(conversation.clone());
            s.is_all_messages_fetched = false;
            s.is_conversation_fetching = false;
        })
        .on_rejected(FETCH_CONVERSATION, |s: &mut State| s.is_conversation_fetching = false)
        .on_pending(FETCH_PREVIOUS_MESSAGES, |s: &mut State, _: &FetchPreviousMessages| {
            s.loading_messages = true;
            s.is_all_messages_fetched = false;
        })
        .on_fulfilled(FETCH_PREVIOUS_MESSAGES, |s: &mut State, page: &PreviousMessages| {
            // Flags settle even when the conversation was dropped meanwhile.
            s.conversations
                .update_one(&page.conversation_id, |c| prepend_messages(c, &page.data));
            s.is_all_messages_fetched = page.data.len() < s.page_size;
            s.loading_messages = false;
        })
        .on_rejected(FETCH_PREVIOUS_MESSAGES, |s: &mut State| s.loading_messages = false)
        .on_fulfilled(
            UPDATE_CONVERSATION_AND_MESSAGES,
            |s: &mut State, refresh: &ConversationRefresh| {
                let Some(stored) = s.conversations.get(&refresh.conversation_id) else {
                    return;
                };
                if stored.last_message_id() == refresh.data.last_message_id() {
                    return;
                }
                s.conversations.upsert_one(refresh.data.clone());
                s.is_all_messages_fetched = false;
                s.is_conversation_fetching = false;
            },
        )
}

fn attribute_cases(reducers: Reducers<State>) -> Reducers<State> {
    reducers
        .on_fulfilled(MARK_MESSAGES_AS_READ, |s: &mut State, r: &ReadReceipt| {
            s.conversations.update_one(&r.id, |c| {
                c.unread_count = 0;
                c.agent_last_seen_at = Some(r.last_seen);
            });
        })
        .on_fulfilled(MARK_MESSAGES_AS_UNREAD, |s: &mut State, r: &UnreadReceipt| {
            s.conversations.update_one(&r.id, |c| {
                c.unread_count = r.unread_count;
                c.agent_last_seen_at = Some(r.last_seen);
            });
        })
        .on_fulfilled(MUTE_CONVERSATION, |s: &mut State, r: &ConversationRef| {
            s.conversations.update_one(&r.id, |c| c.muted = true);
        })
        .on_fulfilled(UNMUTE_CONVERSATION, |s: &mut State, r: &ConversationRef| {
            s.conversations.update_one(&r.id, |c| c.muted = false);
        })
        .on_pending(TOGGLE_CONVERSATION_STATUS, |s: &mut State, _: &ToggleConversationStatus| {
            s.is_changing_conversation_status = true
        })
        .on_fulfilled(TOGGLE_CONVERSATION_STATUS, |s: &mut State, change: &StatusChange| {
            s.conversations.update_one(&change.id, |c| {
                c.status = change.updated_status;
                c.snoozed_until = change.updated_snoozed_until;
            });
            s.is_changing_conversation_status = false;
        })
        .on_rejected(TOGGLE_CONVERSATION_STATUS, |s: &mut State| {
            s.is_changing_conversation_status = false
        })
        .on_fulfilled(TOGGLE_PRIORITY, |s: &mut State, change: &PriorityChange| {
            s.conversations.update_one(&change.id, |c| c.priority = change.priority);
        })
        .on_pending(ASSIGN_CONVERSATION, |s: &mut State, _: &AssignConversation| {
            s.is_changing_conversation_assignee = true
        })
        .on_fulfilled(ASSIGN_CONVERSATION, |s: &mut State, change: &AssigneeChange| {
            s.conversations
                .update_one(&change.id, |c| c.meta.assignee = change.assignee.clone());
            s.is_changing_conversation_assignee = false;
        })
        .on_rejected(ASSIGN_CONVERSATION, |s: &mut State| {
            s.is_changing_conversation_assignee = false
        })
}
