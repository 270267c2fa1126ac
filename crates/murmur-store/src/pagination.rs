use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::Store;
use crate::cache::{CacheKey, Dataset};
use crate::generator::{generate_messages, generate_previews};
use crate::page::{BackwardCursor, ForwardCursor, MessagePage, PreviewPage};

impl Store {
    /// Forward page of the conversation list.
    ///
    /// The first call for a given `size` materialises `size * oversize_factor`
    /// previews; that length is fixed from then on. Pages hold at most
    /// `max_page_size` items.
    pub fn fetch_forward(&self, size: usize, cursor: Option<ForwardCursor>) -> PreviewPage {
        let key = CacheKey::Previews { size };
        let window = self.window(size);

        self.with_cache(|cache| {
            let entry = cache.get_or_create(key, |key| self.materialise(key, size));
            let items = entry.dataset.previews();
            let len = items.len();

            let start = cursor.map_or(0, |c| c.offset().min(len));
            let end = start.saturating_add(window).min(len);
            let next = (end < len).then(|| ForwardCursor::at(end));

            debug!(key = %key, start, end, len, "Forward page");
            PreviewPage::new(items[start..end].to_vec(), next)
        })
    }

    /// Backward page of one conversation's history.
    ///
    /// Without a cursor the newest window is returned. Items are always
    /// oldest-first within the page.
    pub fn fetch_backward(
        &self,
        conversation_id: Uuid,
        size: usize,
        cursor: Option<BackwardCursor>,
    ) -> MessagePage {
        let key = CacheKey::Chat { conversation_id };
        let window = self.window(size);

        self.with_cache(|cache| {
            let entry = cache.get_or_create(key, |key| self.materialise(key, size));
            let items = entry.dataset.messages();
            let len = items.len();

            let end = cursor.map_or(len, |c| c.offset().min(len));
            let start = end.saturating_sub(window);
            let next = (start > 0).then(|| BackwardCursor::at(start));

            debug!(key = %key, start, end, len, "Backward page");
            MessagePage::new(items[start..end].to_vec(), next)
        })
    }

    fn window(&self, size: usize) -> usize {
        size.min(self.config.max_page_size)
    }

    fn materialise(&self, key: &CacheKey, requested: usize) -> Dataset {
        let count = requested.saturating_mul(self.config.oversize_factor);
        let mut rng = self.rng_for(key);
        let now = Utc::now();

        match *key {
            CacheKey::Previews { .. } => {
                Dataset::Previews(generate_previews(&mut rng, count, now, self.config.preview_step))
            }
            CacheKey::Chat { conversation_id } => Dataset::Messages(generate_messages(
                &mut rng,
                conversation_id,
                self.config.local_user_id,
                count,
                now,
                self.config.message_step,
            )),
        }
    }
}
