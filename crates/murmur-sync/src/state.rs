use std::sync::Arc;

use serde::Serialize;

use crate::observer::{SyncObserver, TracingObserver};

/// Where the newest item sits in a rendered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderConvention {
    /// Oldest first; older pages are prepended and new messages appended.
    #[default]
    NewestLast,
    /// Newest first, for inverted lists; older pages are appended and new
    /// messages inserted at the front.
    NewestFirst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Edge {
    Front,
    Back,
}

impl OrderConvention {
    /// Reorder an oldest-first page for display.
    pub(crate) fn arrange<T>(self, mut oldest_first: Vec<T>) -> Vec<T> {
        if self == Self::NewestFirst {
            oldest_first.reverse();
        }
        oldest_first
    }

    pub(crate) fn older_edge(self) -> Edge {
        match self {
            Self::NewestLast => Edge::Front,
            Self::NewestFirst => Edge::Back,
        }
    }

    pub(crate) fn newer_edge(self) -> Edge {
        match self {
            Self::NewestLast => Edge::Back,
            Self::NewestFirst => Edge::Front,
        }
    }
}

/// Construction options shared by both controllers.
#[derive(Clone)]
pub struct ControllerOptions {
    /// Items requested per page. The backend caps it further.
    pub page_size: usize,
    /// Only consulted by `ConversationController`; the inbox is always newest-first.
    pub order: OrderConvention,
    pub observer: Arc<dyn SyncObserver>,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            page_size: 20,
            order: OrderConvention::default(),
            observer: Arc::new(TracingObserver),
        }
    }
}

/// Client-visible state of one paginated surface.
///
/// `epoch` increases on every reset; a task that captured an older epoch
/// must not touch this state when it completes.
#[derive(Debug, Clone, Serialize)]
pub struct SyncState<T, C> {
    pub items: Vec<T>,
    pub cursor: Option<C>,
    pub has_more: bool,
    pub loading: bool,
    pub loading_more: bool,
    pub in_flight: bool,
    pub epoch: u64,
}

impl<T, C> Default for SyncState<T, C> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            cursor: None,
            has_more: false,
            loading: false,
            loading_more: false,
            in_flight: false,
            epoch: 0,
        }
    }
}

impl<T, C: Copy> SyncState<T, C> {
    /// Drop everything and start a new epoch.
    pub(crate) fn reset(&mut self) -> u64 {
        let epoch = self.epoch + 1;
        *self = Self {
            epoch,
            ..Self::default()
        };
        epoch
    }

    /// Reset and mark the initial load as running.
    pub(crate) fn begin_open(&mut self) -> u64 {
        let epoch = self.reset();
        self.loading = true;
        epoch
    }

    pub(crate) fn finish_open(&mut self, items: Vec<T>, cursor: Option<C>) {
        self.items = items;
        self.cursor = cursor;
        self.has_more = cursor.is_some();
        self.loading = false;
    }

    /// Like `finish_open`, but items merged while the load was running (sends
    /// confirmed before the first page arrived) survive at `edge`. Kept items
    /// whose key the page already contains are dropped.
    pub(crate) fn finish_open_keeping<K, F>(
        &mut self,
        items: Vec<T>,
        cursor: Option<C>,
        edge: Edge,
        key: F,
    ) where
        K: PartialEq,
        F: Fn(&T) -> K,
    {
        let mut kept = std::mem::take(&mut self.items);
        kept.retain(|item| !items.iter().any(|loaded| key(loaded) == key(item)));
        self.finish_open(items, cursor);
        self.insert(kept, edge);
    }

    pub(crate) fn fail_open(&mut self) {
        self.loading = false;
    }

    /// Latch the single-flight guard. `Err` says why the request is dropped.
    pub(crate) fn begin_more(&mut self) -> Result<(u64, C), &'static str> {
        if self.in_flight {
            return Err("already in flight");
        }
        if !self.has_more {
            return Err("no more pages");
        }
        let cursor = self.cursor.ok_or("no cursor")?;
        self.in_flight = true;
        self.loading_more = true;
        Ok((self.epoch, cursor))
    }

    /// Release the guard if it still belongs to `epoch`.
    pub(crate) fn end_more(&mut self, epoch: u64) {
        if self.epoch == epoch {
            self.in_flight = false;
            self.loading_more = false;
        }
    }

    pub(crate) fn merge_page(&mut self, items: Vec<T>, cursor: Option<C>, edge: Edge) {
        self.insert(items, edge);
        self.cursor = cursor;
        self.has_more = cursor.is_some();
    }

    pub(crate) fn insert(&mut self, items: Vec<T>, edge: Edge) {
        match edge {
            Edge::Front => {
                self.items.splice(0..0, items);
            }
            Edge::Back => self.items.extend(items),
        }
    }
}
