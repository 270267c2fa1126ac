use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use murmur_store::BackwardCursor;
use murmur_types::Message;

use crate::backend::MessagingBackend;
use crate::observer::{SyncEvent, SyncLog, SyncObserver};
use crate::state::{ControllerOptions, OrderConvention, SyncState};

const COMPONENT: &str = "conversation";

/// Result of `ConversationController::send`.
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// Blank text or no open conversation; nothing was sent.
    Skipped,
    /// Confirmed and merged into the item list.
    Delivered(Message),
    /// The backend failed; the draft holds the typed text again.
    Restored,
    /// The conversation was closed or switched before the send settled.
    Discarded,
}

/// Owned copy of a conversation's client state.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationSnapshot {
    pub conversation_id: Option<Uuid>,
    pub draft: String,
    #[serde(flatten)]
    pub sync: SyncState<Message, BackwardCursor>,
}

/// Client state for one open conversation: backward-paginated history,
/// the composer draft and optimistic sends.
///
/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct ConversationController {
    inner: Arc<ConversationInner>,
}

struct ConversationInner {
    backend: Arc<dyn MessagingBackend>,
    observer: Arc<dyn SyncObserver>,
    page_size: usize,
    order: OrderConvention,
    state: Mutex<ConversationState>,
}

#[derive(Default)]
struct ConversationState {
    conversation_id: Option<Uuid>,
    draft: String,
    sync: SyncState<Message, BackwardCursor>,
}

impl ConversationState {
    fn is_current(&self, epoch: u64, conversation_id: Uuid) -> bool {
        self.sync.epoch == epoch && self.conversation_id == Some(conversation_id)
    }
}

impl ConversationController {
    pub fn new(backend: Arc<dyn MessagingBackend>, options: ControllerOptions) -> Self {
        Self {
            inner: Arc::new(ConversationInner {
                backend,
                observer: options.observer,
                page_size: options.page_size,
                order: options.order,
                state: Mutex::new(ConversationState::default()),
            }),
        }
    }

    fn with_state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&mut ConversationState) -> T,
    {
        let mut state = self.inner.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    fn emit(&self, scope: Uuid, event: SyncEvent) {
        self.inner.observer.log(SyncLog {
            component: COMPONENT,
            scope: Some(scope),
            event,
        });
    }

    /// Switch to `conversation_id` and load its newest page.
    ///
    /// Any task still running for a previous conversation is invalidated.
    pub async fn open(&self, conversation_id: Uuid) {
        let epoch = self.with_state(|state| {
            state.conversation_id = Some(conversation_id);
            state.draft.clear();
            state.sync.begin_open()
        });
        self.emit(conversation_id, SyncEvent::Opened { epoch });

        let result = self
            .inner
            .backend
            .fetch_chat_messages(conversation_id, self.inner.page_size, None)
            .await;

        let order = self.inner.order;
        let event = self.with_state(|state| {
            if !state.is_current(epoch, conversation_id) {
                return SyncEvent::StaleResultDiscarded {
                    task_epoch: epoch,
                    current_epoch: state.sync.epoch,
                };
            }
            match result {
                Ok(page) => {
                    let (items, cursor) = page.into_parts();
                    let count = items.len();
                    // Sends confirmed while this page was loading are already in items.
                    state.sync.finish_open_keeping(
                        order.arrange(items),
                        cursor,
                        order.newer_edge(),
                        |m| m.id,
                    );
                    SyncEvent::PageLoaded {
                        items: count,
                        total: state.sync.items.len(),
                        has_more: state.sync.has_more,
                    }
                }
                Err(e) => {
                    state.sync.fail_open();
                    SyncEvent::FetchFailed { message: e.to_string() }
                }
            }
        });
        self.emit(conversation_id, event);
    }

    /// Reveal the next page of older messages.
    ///
    /// Dropped (not queued) while another page is loading, when the history is
    /// exhausted, or when no conversation is open.
    pub async fn load_older(&self) {
        let started: Result<_, (Option<Uuid>, &'static str)> = self.with_state(|state| {
            let conversation_id = state.conversation_id.ok_or((None, "no conversation open"))?;
            state
                .sync
                .begin_more()
                .map(|(epoch, cursor)| (conversation_id, epoch, cursor))
                .map_err(|reason| (Some(conversation_id), reason))
        });
        let (conversation_id, epoch, cursor) = match started {
            Ok(started) => started,
            Err((scope, reason)) => {
                self.inner.observer.log(SyncLog {
                    component: COMPONENT,
                    scope,
                    event: SyncEvent::FetchSkipped { reason },
                });
                return;
            }
        };

        // Released on every exit path, including cancellation of this future.
        let _flight = scopeguard::guard((), |_| {
            self.with_state(|state| state.sync.end_more(epoch));
        });

        let result = self
            .inner
            .backend
            .fetch_chat_messages(conversation_id, self.inner.page_size, Some(cursor))
            .await;

        let order = self.inner.order;
        let event = self.with_state(|state| {
            if !state.is_current(epoch, conversation_id) {
                return SyncEvent::StaleResultDiscarded {
                    task_epoch: epoch,
                    current_epoch: state.sync.epoch,
                };
            }
            match result {
                Ok(page) => {
                    let (items, cursor) = page.into_parts();
                    let count = items.len();
                    state.sync.merge_page(order.arrange(items), cursor, order.older_edge());
                    SyncEvent::PageLoaded {
                        items: count,
                        total: state.sync.items.len(),
                        has_more: state.sync.has_more,
                    }
                }
                Err(e) => SyncEvent::FetchFailed { message: e.to_string() },
            }
        });
        self.emit(conversation_id, event);
    }

    /// Send `text` to the open conversation.
    ///
    /// The draft is cleared before the backend answers. The message is only
    /// rendered once confirmed; on failure the draft is restored and the item
    /// list is left as it was. Sends are not serialised against each other or
    /// against pagination, so confirmations merge in completion order.
    pub async fn send(&self, text: &str) -> SendOutcome {
        let body = text.trim();
        if body.is_empty() {
            return SendOutcome::Skipped;
        }
        let Some((conversation_id, epoch)) = self.with_state(|state| {
            let conversation_id = state.conversation_id?;
            state.draft.clear();
            Some((conversation_id, state.sync.epoch))
        }) else {
            return SendOutcome::Skipped;
        };

        let result = self.inner.backend.send_message(conversation_id, body).await;

        let order = self.inner.order;
        let (outcome, event) = self.with_state(|state| {
            if !state.is_current(epoch, conversation_id) {
                let event = SyncEvent::StaleResultDiscarded {
                    task_epoch: epoch,
                    current_epoch: state.sync.epoch,
                };
                return (SendOutcome::Discarded, event);
            }
            match result {
                Ok(message) => {
                    let event = SyncEvent::SendDelivered { message_id: message.id };
                    state.sync.insert(vec![message.clone()], order.newer_edge());
                    (SendOutcome::Delivered(message), event)
                }
                Err(e) => {
                    warn!(%conversation_id, error = %e, "Send failed, restoring draft");
                    state.draft = text.to_string();
                    (SendOutcome::Restored, SyncEvent::SendFailed { message: e.to_string() })
                }
            }
        });
        self.emit(conversation_id, event);
        outcome
    }

    /// Send whatever is currently in the draft.
    pub async fn send_draft(&self) -> SendOutcome {
        let draft = self.draft();
        self.send(&draft).await
    }

    pub fn draft(&self) -> String {
        self.with_state(|state| state.draft.clone())
    }

    pub fn set_draft(&self, text: impl Into<String>) {
        let text = text.into();
        self.with_state(|state| state.draft = text);
    }

    /// Tear down the surface. Results of outstanding tasks will be discarded.
    pub fn close(&self) {
        let closed = self.with_state(|state| {
            let conversation_id = state.conversation_id.take()?;
            state.draft.clear();
            Some((conversation_id, state.sync.reset()))
        });
        if let Some((conversation_id, epoch)) = closed {
            self.emit(conversation_id, SyncEvent::Closed { epoch });
        }
    }

    pub fn conversation_id(&self) -> Option<Uuid> {
        self.with_state(|state| state.conversation_id)
    }

    pub fn snapshot(&self) -> ConversationSnapshot {
        self.with_state(|state| ConversationSnapshot {
            conversation_id: state.conversation_id,
            draft: state.draft.clone(),
            sync: state.sync.clone(),
        })
    }
}
