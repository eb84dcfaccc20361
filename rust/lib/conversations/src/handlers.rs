//! Request handlers and Flux wiring.
//!
//! `register_handlers` routes every request type to its operation. The
//! handler downcasts the payload, runs the operation against the shared
//! backend and logs the outcome; the store itself is updated through the
//! operation's lifecycle actions.

use std::sync::Arc;

use helpdesk_flux::{Action, Flux, Store};
use tracing::{info, warn};

use crate::api::ConversationApi;
use crate::operations;
use crate::requests::*;
use crate::state::ConversationsState;

type State = ConversationsState;

/// Downcast the routed payload and run `$op` with it.
macro_rules! route {
    ($flux:expr, $api:expr, $req:ty => $op:path) => {{
        let api = Arc::clone($api);
        $flux.on(<$req>::TYPE, move |request, store: Arc<Store<State>>| {
            let api = Arc::clone(&api);
            async move {
                let Some(req) = request.payload::<$req>() else {
                    warn!("{} expected {}", <$req>::TYPE, stringify!($req));
                    return;
                };
                match $op(&store, api.as_ref(), req).await {
                    Ok(_) => info!("{} done", <$req>::TYPE),
                    Err(e) => warn!("{} failed for {:?}: {}", <$req>::TYPE, req, e),
                }
            }
        });
    }};
}

/// Register every request handler with a Flux instance.
pub fn register_handlers(flux: &Flux<State>, api: Arc<dyn ConversationApi>) {
    route!(flux, &api, FetchConversations => operations::fetch_conversations);
    route!(flux, &api, FetchConversationStats => operations::fetch_conversation_stats);
    route!(flux, &api, FetchConversation => operations::fetch_conversation);
    route!(flux, &api, FetchPreviousMessages => operations::fetch_previous_messages);
    route!(flux, &api, MarkMessagesAsRead => operations::mark_messages_as_read);
    route!(flux, &api, MarkMessagesAsUnread => operations::mark_messages_as_unread);
    route!(flux, &api, MuteConversation => operations::mute_conversation);
    route!(flux, &api, UnmuteConversation => operations::unmute_conversation);
    route!(flux, &api, ToggleConversationStatus => operations::toggle_conversation_status);
    route!(
        flux,
        &api,
        UpdateConversationAndMessages => operations::update_conversation_and_messages
    );
    route!(flux, &api, TogglePriority => operations::toggle_priority);
    route!(flux, &api, AssignConversation => operations::assign_conversation);
}
