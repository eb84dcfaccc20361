//! Synchronous actions: filter changes, push events and local clears.

use std::collections::HashMap;

use flux_derive::action;

use crate::model::{AvailabilityStatus, ContactId, Conversation, ConversationId, InboxId, Message};
use crate::state::{AssigneeType, SortFilter, StatusFilter};

/// Drop every conversation from the table.
#[action("conversations/clearAllConversations")]
pub struct ClearAllConversations;

#[action("conversations/setConversationStatus")]
pub struct SetConversationStatus(pub StatusFilter);

#[action("conversations/setAssigneeType")]
pub struct SetAssigneeType(pub AssigneeType);

/// Select an inbox; `0` selects all of them.
#[action("conversations/setActiveInbox")]
pub struct SetActiveInbox(pub InboxId);

#[action("conversations/setSortFilter")]
pub struct SetSortFilter(pub SortFilter);

/// Drop one conversation, if present.
#[action("conversations/clearConversation")]
pub struct ClearConversation(pub ConversationId);

/// A conversation created elsewhere (push event).
#[action("conversations/addConversation")]
pub struct AddConversation(pub Conversation);

/// A conversation changed elsewhere (push event).
#[action("conversations/updateConversation")]
pub struct UpdateConversation(pub Conversation);

/// A message created or confirmed elsewhere (push event or send echo).
#[action("conversations/addMessage")]
pub struct AddMessage(pub Message);

/// Contact availability changes, keyed by contact id.
#[action("conversations/updateContactsPresence")]
pub struct UpdateContactsPresence {
    pub contacts: HashMap<ContactId, AvailabilityStatus>,
}
