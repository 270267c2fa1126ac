use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};
use uuid::Uuid;

use murmur_store::{BackwardCursor, ForwardCursor, MessagePage, PreviewPage, Store};
use murmur_types::Message;

use crate::backend::MessagingBackend;
use crate::config::{LatencyConfig, SimulatorConfig};
use crate::error::BackendError;
use crate::latency::LatencySimulator;

/// In-process backend: a session-owned `Store` behind simulated latency.
#[derive(Clone)]
pub struct Simulator {
    store: Arc<Store>,
    latency: LatencySimulator,
}

impl Simulator {
    pub fn new(config: SimulatorConfig) -> Self {
        Self::with_store(Arc::new(Store::new(config.store)), config.latency)
    }

    pub fn with_store(store: Arc<Store>, latency: LatencyConfig) -> Self {
        Self {
            store,
            latency: LatencySimulator::new(latency),
        }
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    /// One round-trip, then either proceed or reject the operation.
    async fn exchange(&self, operation: &'static str) -> Result<(), BackendError> {
        self.latency.round_trip().await;
        if self.latency.should_fail() {
            warn!(operation, "Simulated backend failure");
            return Err(BackendError::Unavailable { operation });
        }
        Ok(())
    }
}

#[async_trait]
impl MessagingBackend for Simulator {
    async fn fetch_message_previews(
        &self,
        count: usize,
        cursor: Option<ForwardCursor>,
    ) -> Result<PreviewPage, BackendError> {
        self.exchange("fetch_message_previews").await?;
        let page = self.store.fetch_forward(count, cursor);
        debug!(count, cursor = ?cursor.map(|c| c.to_string()), items = page.len(), "Served previews");
        Ok(page)
    }

    async fn fetch_chat_messages(
        &self,
        conversation_id: Uuid,
        count: usize,
        cursor: Option<BackwardCursor>,
    ) -> Result<MessagePage, BackendError> {
        self.exchange("fetch_chat_messages").await?;
        let page = self.store.fetch_backward(conversation_id, count, cursor);
        debug!(%conversation_id, count, cursor = ?cursor.map(|c| c.to_string()), items = page.len(), "Served messages");
        Ok(page)
    }

    async fn send_message(&self, conversation_id: Uuid, text: &str) -> Result<Message, BackendError> {
        self.exchange("send_message").await?;
        Ok(self.store.send_message(conversation_id, text))
    }

    async fn clear_cache(&self) {
        self.latency.round_trip().await;
        self.store.clear();
        info!("Simulator cache cleared");
    }
}
