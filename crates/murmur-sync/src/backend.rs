use async_trait::async_trait;
use uuid::Uuid;

use murmur_store::{BackwardCursor, ForwardCursor, MessagePage, PreviewPage};
use murmur_types::Message;

use crate::error::BackendError;

/// The data operations a chat UI depends on.
///
/// `Simulator` implements this in-process; a networked backend would keep
/// the same four signatures.
#[async_trait]
pub trait MessagingBackend: Send + Sync {
    /// Forward page of the conversation list.
    async fn fetch_message_previews(
        &self,
        count: usize,
        cursor: Option<ForwardCursor>,
    ) -> Result<PreviewPage, BackendError>;

    /// Backward page of a conversation's history, newest window first.
    async fn fetch_chat_messages(
        &self,
        conversation_id: Uuid,
        count: usize,
        cursor: Option<BackwardCursor>,
    ) -> Result<MessagePage, BackendError>;

    /// Send an outgoing message and return the confirmed record.
    async fn send_message(&self, conversation_id: Uuid, text: &str) -> Result<Message, BackendError>;

    /// Drop every cached dataset.
    async fn clear_cache(&self);
}
