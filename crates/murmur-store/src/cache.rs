use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use murmur_types::ids;
use murmur_types::{ConversationPreview, Message};

/// Identifies one backing dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Conversation list, keyed by the page size it was first requested with.
    Previews { size: usize },
    /// Message history of one conversation.
    Chat { conversation_id: Uuid },
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Previews { size } => write!(f, "previews-{}", size),
            Self::Chat { conversation_id } => write!(f, "chat-{}", conversation_id),
        }
    }
}

/// Full backing sequence for a key.
#[derive(Debug, Clone, PartialEq)]
pub enum Dataset {
    Previews(Vec<ConversationPreview>),
    Messages(Vec<Message>),
}

impl Dataset {
    pub fn len(&self) -> usize {
        match self {
            Self::Previews(items) => items.len(),
            Self::Messages(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Previews held by this dataset; empty for a message history.
    pub fn previews(&self) -> &[ConversationPreview] {
        match self {
            Self::Previews(items) => items,
            Self::Messages(_) => &[],
        }
    }

    /// Messages held by this dataset; empty for a conversation list.
    pub fn messages(&self) -> &[Message] {
        match self {
            Self::Messages(items) => items,
            Self::Previews(_) => &[],
        }
    }
}

/// A single item that can be appended to a dataset.
#[derive(Debug, Clone)]
pub enum Record {
    Preview(ConversationPreview),
    Message(Message),
}

impl From<ConversationPreview> for Record {
    fn from(preview: ConversationPreview) -> Self {
        Self::Preview(preview)
    }
}

impl From<Message> for Record {
    fn from(message: Message) -> Self {
        Self::Message(message)
    }
}

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub generation: Uuid,
    pub created_at: DateTime<Utc>,
    pub dataset: Dataset,
}

/// Keyed datasets. Entries are created lazily, grow by appends and never shrink.
#[derive(Debug, Default)]
pub struct CacheStore {
    entries: HashMap<CacheKey, CacheEntry>,
}

impl CacheStore {
    /// Return the entry for `key`, materialising it with `factory` on first access.
    pub fn get_or_create<F>(&mut self, key: CacheKey, factory: F) -> &mut CacheEntry
    where
        F: FnOnce(&CacheKey) -> Dataset,
    {
        self.entries.entry(key).or_insert_with_key(|key| {
            let dataset = factory(key);
            let generation = ids::new_generation();
            debug!(key = %key, %generation, len = dataset.len(), "Materialised cache entry");
            CacheEntry {
                generation,
                created_at: Utc::now(),
                dataset,
            }
        })
    }

    pub fn get(&self, key: &CacheKey) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    /// Append `item` to the end of the entry under `key`.
    ///
    /// Returns false and drops the item when the key has no entry or the item
    /// kind does not match the dataset. History that was never paged in is not
    /// created here.
    pub fn append_to(&mut self, key: &CacheKey, item: impl Into<Record>) -> bool {
        let Some(entry) = self.entries.get_mut(key) else {
            debug!(key = %key, "Append dropped: no cache entry");
            return false;
        };
        match (&mut entry.dataset, item.into()) {
            (Dataset::Messages(items), Record::Message(message)) => {
                items.push(message);
                true
            }
            (Dataset::Previews(items), Record::Preview(preview)) => {
                items.push(preview);
                true
            }
            _ => {
                debug!(key = %key, "Append dropped: record kind does not match dataset");
                false
            }
        }
    }

    /// Remove every entry, returning how many were dropped.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
