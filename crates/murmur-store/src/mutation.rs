use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use murmur_types::Message;
use murmur_types::ids;

use crate::Store;
use crate::cache::CacheKey;

impl Store {
    /// Create an outgoing message and append it to the conversation's history.
    ///
    /// The append is skipped when the history was never paged in; the created
    /// record is returned either way. The timestamp never precedes the last
    /// cached message.
    pub fn send_message(&self, conversation_id: Uuid, text: &str) -> Message {
        let key = CacheKey::Chat { conversation_id };

        self.with_cache(|cache| {
            let now = Utc::now();
            let last = cache
                .get(&key)
                .and_then(|entry| entry.dataset.messages().last())
                .map(|m| m.timestamp);

            let message = Message {
                id: ids::new_id(),
                conversation_id,
                sender_id: self.config.local_user_id,
                text: text.to_string(),
                timestamp: last.map_or(now, |last| last.max(now)),
                is_outgoing: true,
            };

            let appended = cache.append_to(&key, message.clone());
            debug!(key = %key, message_id = %message.id, appended, "Message sent");
            message
        })
    }
}
