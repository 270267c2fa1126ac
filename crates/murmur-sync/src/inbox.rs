use std::sync::{Arc, Mutex, PoisonError};

use murmur_store::ForwardCursor;
use murmur_types::ConversationPreview;

use crate::backend::MessagingBackend;
use crate::observer::{SyncEvent, SyncLog, SyncObserver};
use crate::state::{ControllerOptions, Edge, SyncState};

const COMPONENT: &str = "inbox";

/// Client state for the conversation list: forward pagination, newest first.
#[derive(Clone)]
pub struct InboxController {
    inner: Arc<InboxInner>,
}

struct InboxInner {
    backend: Arc<dyn MessagingBackend>,
    observer: Arc<dyn SyncObserver>,
    page_size: usize,
    state: Mutex<SyncState<ConversationPreview, ForwardCursor>>,
}

impl InboxController {
    pub fn new(backend: Arc<dyn MessagingBackend>, options: ControllerOptions) -> Self {
        Self {
            inner: Arc::new(InboxInner {
                backend,
                observer: options.observer,
                page_size: options.page_size,
                state: Mutex::new(SyncState::default()),
            }),
        }
    }

    fn with_state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&mut SyncState<ConversationPreview, ForwardCursor>) -> T,
    {
        let mut state = self.inner.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    fn emit(&self, event: SyncEvent) {
        self.inner.observer.log(SyncLog {
            component: COMPONENT,
            scope: None,
            event,
        });
    }

    /// Reset and load the first page.
    pub async fn open(&self) {
        let epoch = self.with_state(|state| state.begin_open());
        self.emit(SyncEvent::Opened { epoch });

        let result = self
            .inner
            .backend
            .fetch_message_previews(self.inner.page_size, None)
            .await;

        let event = self.with_state(|state| {
            if state.epoch != epoch {
                return SyncEvent::StaleResultDiscarded {
                    task_epoch: epoch,
                    current_epoch: state.epoch,
                };
            }
            match result {
                Ok(page) => {
                    let (items, cursor) = page.into_parts();
                    let count = items.len();
                    state.finish_open(items, cursor);
                    SyncEvent::PageLoaded {
                        items: count,
                        total: state.items.len(),
                        has_more: state.has_more,
                    }
                }
                Err(e) => {
                    state.fail_open();
                    SyncEvent::FetchFailed { message: e.to_string() }
                }
            }
        });
        self.emit(event);
    }

    /// Append the next page. Dropped while another page is loading or once
    /// the list is exhausted.
    pub async fn load_more(&self) {
        let (epoch, cursor) = match self.with_state(|state| state.begin_more()) {
            Ok(started) => started,
            Err(reason) => {
                self.emit(SyncEvent::FetchSkipped { reason });
                return;
            }
        };

        let _flight = scopeguard::guard((), |_| {
            self.with_state(|state| state.end_more(epoch));
        });

        let result = self
            .inner
            .backend
            .fetch_message_previews(self.inner.page_size, Some(cursor))
            .await;

        let event = self.with_state(|state| {
            if state.epoch != epoch {
                return SyncEvent::StaleResultDiscarded {
                    task_epoch: epoch,
                    current_epoch: state.epoch,
                };
            }
            match result {
                Ok(page) => {
                    let (items, cursor) = page.into_parts();
                    let count = items.len();
                    state.merge_page(items, cursor, Edge::Back);
                    SyncEvent::PageLoaded {
                        items: count,
                        total: state.items.len(),
                        has_more: state.has_more,
                    }
                }
                Err(e) => SyncEvent::FetchFailed { message: e.to_string() },
            }
        });
        self.emit(event);
    }

    /// Drop the list; outstanding results will be discarded.
    pub fn close(&self) {
        let epoch = self.with_state(|state| state.reset());
        self.emit(SyncEvent::Closed { epoch });
    }

    pub fn snapshot(&self) -> SyncState<ConversationPreview, ForwardCursor> {
        self.with_state(|state| state.clone())
    }
}
