//! Demo inbox: loads the bundled seed through the store and prints the
//! current tab.
//!
//! Usage: inboxd [--user-id=1] [--status=open] [--assignee=mine] [--sort=latest] [--inbox=0]

use std::sync::Arc;

use tracing::info;

use helpdesk_conversations::actions::{AddMessage, SetAssigneeType};
use helpdesk_conversations::model::MessageStatus;
use helpdesk_conversations::requests::{FetchConversationStats, FetchConversations, MarkMessagesAsRead};
use helpdesk_conversations::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let mut config = StoreConfig::from_args(&args)?;

    let mut backend = MemoryBackend::demo(config.page_size)?;
    if config.user_id == 0 {
        config.user_id = backend.user_id();
    } else {
        backend = backend.with_user(config.user_id);
    }
    let backend = Arc::new(backend);
    info!("Agent {} on inbox {}", config.user_id, config.inbox_id);

    let flux = new_flux(&config);
    register_handlers(&flux, backend.clone());
    flux.subscribe("conversations/#", |kind| tracing::debug!(kind, "applied"));

    let query = ConversationQuery {
        status: config.status,
        assignee_type: AssigneeType::All,
        sort_by: config.sort,
        inbox_id: config.inbox_id,
        page: 1,
    };
    flux.emit(FetchConversations(query.clone())).await;
    flux.emit(FetchConversationStats(query)).await;

    let selectors = ConversationSelectors::new();
    let filters = ConversationFilters {
        assignee_type: config.assignee_type,
        user_id: config.user_id,
        sort_by: config.sort,
        status: config.status,
        inbox_id: config.inbox_id,
    };
    print_tab(&flux, &selectors, &filters);

    // A reply arrives on the newest conversation, then the agent reads it.
    flux.dispatch(SetAssigneeType(AssigneeType::All));
    let all = ConversationFilters {
        assignee_type: AssigneeType::All,
        ..filters
    };
    if let Some(first) = selectors.filtered_conversations(flux.store(), &all).first() {
        let id = first.id;
        flux.dispatch(AddMessage(Message {
            id: first.last_message_id().unwrap_or_default() + 1,
            conversation_id: Some(id),
            content: Some("Just following up on this.".into()),
            echo_id: None,
            created_at: chrono::Utc::now().timestamp(),
            status: MessageStatus::Sent,
            private: false,
        }));
        flux.emit(MarkMessagesAsRead { conversation_id: id }).await;
        print_tab(&flux, &selectors, &all);
    }

    println!("{}", serde_json::to_string_pretty(&flux.snapshot())?);
    Ok(())
}

fn print_tab(
    flux: &helpdesk_flux::Flux<ConversationsState>,
    selectors: &ConversationSelectors,
    filters: &ConversationFilters,
) {
    let meta = flux.read(helpdesk_conversations::selectors::meta);
    println!(
        "{} / {} | mine {} | unassigned {} | all {}",
        filters.status, filters.assignee_type, meta.mine_count, meta.unassigned_count, meta.all_count
    );
    for c in selectors.filtered_conversations(flux.store(), filters).iter() {
        let last = c.messages.last().and_then(|m| m.content.as_deref()).unwrap_or("");
        println!(
            "  #{:<5} {:<18} unread {:<2} {}",
            c.id, c.meta.sender.name, c.unread_count, last
        );
    }
}
