#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use murmur_store::{BackwardCursor, ForwardCursor, MessagePage, PreviewPage};
use murmur_sync::{
    BackendError, ControllerOptions, LatencyConfig, MessagingBackend, OrderConvention, Simulator,
    SimulatorConfig, SyncEvent, SyncLog, SyncObserver,
};
use murmur_types::Message;

/// Simulator with default (non-zero) latency. Run under `start_paused`.
pub fn simulator() -> Simulator {
    Simulator::new(SimulatorConfig::default())
}

/// Wraps a simulator, counting calls. Sends can be made to fail for the
/// whole test; fetches can be switched to failing and back.
pub struct TestBackend {
    pub inner: Simulator,
    pub fail_sends: bool,
    pub fail_fetches: AtomicBool,
    /// Fixed delays, replacing the simulator's random latency when set.
    pub delays: Option<(Duration, Duration)>,
    pub preview_fetches: AtomicUsize,
    pub message_fetches: AtomicUsize,
    pub sends: AtomicUsize,
}

impl TestBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::build(simulator(), false, None))
    }

    pub fn failing_sends() -> Arc<Self> {
        Arc::new(Self::build(simulator(), true, None))
    }

    /// Every fetch takes `fetch`, every send takes `send`.
    pub fn with_delays(fetch: Duration, send: Duration) -> Arc<Self> {
        let instant = Simulator::new(SimulatorConfig {
            latency: LatencyConfig::instant(),
            ..SimulatorConfig::default()
        });
        Arc::new(Self::build(instant, false, Some((fetch, send))))
    }

    fn build(inner: Simulator, fail_sends: bool, delays: Option<(Duration, Duration)>) -> Self {
        Self {
            inner,
            fail_sends,
            fail_fetches: AtomicBool::new(false),
            delays,
            preview_fetches: AtomicUsize::new(0),
            message_fetches: AtomicUsize::new(0),
            sends: AtomicUsize::new(0),
        }
    }

    pub fn set_fail_fetches(&self, fail: bool) {
        self.fail_fetches.store(fail, Ordering::SeqCst);
    }

    pub fn message_fetches(&self) -> usize {
        self.message_fetches.load(Ordering::SeqCst)
    }

    pub fn preview_fetches(&self) -> usize {
        self.preview_fetches.load(Ordering::SeqCst)
    }

    async fn fetch_gate(&self, operation: &'static str) -> Result<(), BackendError> {
        if let Some((fetch, _)) = self.delays {
            tokio::time::sleep(fetch).await;
        }
        if self.fail_fetches.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_millis(300)).await;
            return Err(BackendError::Unavailable { operation });
        }
        Ok(())
    }
}

#[async_trait]
impl MessagingBackend for TestBackend {
    async fn fetch_message_previews(
        &self,
        count: usize,
        cursor: Option<ForwardCursor>,
    ) -> Result<PreviewPage, BackendError> {
        self.preview_fetches.fetch_add(1, Ordering::SeqCst);
        self.fetch_gate("fetch_message_previews").await?;
        self.inner.fetch_message_previews(count, cursor).await
    }

    async fn fetch_chat_messages(
        &self,
        conversation_id: Uuid,
        count: usize,
        cursor: Option<BackwardCursor>,
    ) -> Result<MessagePage, BackendError> {
        self.message_fetches.fetch_add(1, Ordering::SeqCst);
        self.fetch_gate("fetch_chat_messages").await?;
        self.inner.fetch_chat_messages(conversation_id, count, cursor).await
    }

    async fn send_message(&self, conversation_id: Uuid, text: &str) -> Result<Message, BackendError> {
        self.sends.fetch_add(1, Ordering::SeqCst);
        if let Some((_, send)) = self.delays {
            tokio::time::sleep(send).await;
        }
        if self.fail_sends {
            tokio::time::sleep(Duration::from_millis(300)).await;
            return Err(BackendError::Unavailable { operation: "send_message" });
        }
        self.inner.send_message(conversation_id, text).await
    }

    async fn clear_cache(&self) {
        self.inner.clear_cache().await
    }
}

#[derive(Default)]
pub struct RecordingObserver {
    entries: Mutex<Vec<SyncLog>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<SyncEvent> {
        self.entries.lock().unwrap().iter().map(|e| e.event.clone()).collect()
    }

    pub fn count(&self, matches: impl Fn(&SyncEvent) -> bool) -> usize {
        self.events().iter().filter(|e| matches(e)).count()
    }
}

impl SyncObserver for RecordingObserver {
    fn log(&self, entry: SyncLog) {
        self.entries.lock().unwrap().push(entry);
    }
}

pub fn options(observer: Arc<RecordingObserver>, order: OrderConvention) -> ControllerOptions {
    ControllerOptions {
        page_size: 20,
        order,
        observer,
    }
}
