use std::sync::Arc;

use tracing::info;

use murmur_sync::{
    ControllerOptions, ConversationController, InboxController, MessagingBackend, SendOutcome,
    Simulator, SimulatorConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "murmur=debug,murmur_store=debug,murmur_sync=debug".into()),
        )
        .init();

    // Config
    let config = SimulatorConfig::from_env()?;
    info!(
        min_latency_ms = config.latency.min_latency.as_millis() as u64,
        max_latency_ms = config.latency.max_latency.as_millis() as u64,
        failure_rate = config.latency.failure_rate,
        "Starting simulated session"
    );

    let backend: Arc<dyn MessagingBackend> = Arc::new(Simulator::new(config));

    // Conversation list
    let inbox = InboxController::new(backend.clone(), ControllerOptions::default());
    inbox.open().await;
    while inbox.snapshot().has_more {
        let before = inbox.snapshot().items.len();
        inbox.load_more().await;
        if inbox.snapshot().items.len() == before {
            // fetch failed; stop rather than spin
            break;
        }
    }
    let list = inbox.snapshot();
    info!(conversations = list.items.len(), "Inbox loaded");

    let Some(first) = list.items.first().cloned() else {
        info!("No conversations, nothing more to do");
        return Ok(());
    };

    // History of the newest conversation
    let chat = ConversationController::new(backend.clone(), ControllerOptions::default());
    chat.open(first.id).await;
    chat.load_older().await;
    chat.load_older().await;

    chat.set_draft("Hey! Just catching up on this thread.");
    match chat.send_draft().await {
        SendOutcome::Delivered(message) => info!(message_id = %message.id, "Message delivered"),
        outcome => info!(?outcome, draft = %chat.draft(), "Message not delivered"),
    }

    println!("{}", serde_json::to_string_pretty(&first)?);
    println!("{}", serde_json::to_string_pretty(&chat.snapshot())?);

    chat.close();
    inbox.close();
    backend.clear_cache().await;
    info!("Session finished");

    Ok(())
}
