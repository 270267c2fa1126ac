/// Structured reporting of controller activity.
///
/// Controllers emit a `SyncLog` for every page merge, skipped fetch, stale
/// result and send outcome. The default observer forwards to `tracing`.

use std::fmt;

use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct SyncLog {
    pub component: &'static str,
    /// Conversation the event belongs to; `None` for the inbox.
    pub scope: Option<Uuid>,
    pub event: SyncEvent,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    /// State was reset for a new surface.
    Opened { epoch: u64 },
    /// A page was merged into client state.
    PageLoaded { items: usize, total: usize, has_more: bool },
    /// A pagination request was dropped without reaching the backend.
    FetchSkipped { reason: &'static str },
    /// A fetch failed; client state kept its previous items.
    FetchFailed { message: String },
    /// A task finished after its surface was reset and its result was dropped.
    StaleResultDiscarded { task_epoch: u64, current_epoch: u64 },
    SendDelivered { message_id: Uuid },
    /// A send failed and the draft was restored.
    SendFailed { message: String },
    Closed { epoch: u64 },
}

impl fmt::Display for SyncEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Opened { epoch } => write!(f, "opened epoch={}", epoch),
            Self::PageLoaded { items, total, has_more } => {
                write!(f, "page_loaded items={} total={} has_more={}", items, total, has_more)
            }
            Self::FetchSkipped { reason } => write!(f, "fetch_skipped reason={}", reason),
            Self::FetchFailed { message } => write!(f, "fetch_failed: {}", message),
            Self::StaleResultDiscarded { task_epoch, current_epoch } => {
                write!(f, "stale_result_discarded task_epoch={} current_epoch={}", task_epoch, current_epoch)
            }
            Self::SendDelivered { message_id } => write!(f, "send_delivered id={}", message_id),
            Self::SendFailed { message } => write!(f, "send_failed: {}", message),
            Self::Closed { epoch } => write!(f, "closed epoch={}", epoch),
        }
    }
}

pub trait SyncObserver: Send + Sync {
    fn log(&self, entry: SyncLog);
}

/// Observer that uses the `tracing` crate.
pub struct TracingObserver;

impl SyncObserver for TracingObserver {
    fn log(&self, entry: SyncLog) {
        let scope = entry.scope.map(|id| id.to_string()).unwrap_or_else(|| "inbox".into());
        // info for lifecycle and failures, debug for per-page traffic
        match &entry.event {
            SyncEvent::Opened { .. }
            | SyncEvent::Closed { .. }
            | SyncEvent::FetchFailed { .. }
            | SyncEvent::SendFailed { .. } => {
                tracing::info!(component = entry.component, scope = %scope, "{}", entry.event);
            }
            _ => {
                tracing::debug!(component = entry.component, scope = %scope, "{}", entry.event);
            }
        }
    }
}

/// Discards every entry.
pub struct NullObserver;

impl SyncObserver for NullObserver {
    fn log(&self, _entry: SyncLog) {}
}
