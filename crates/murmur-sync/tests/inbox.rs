mod common;

use std::sync::Arc;

use murmur_sync::{InboxController, OrderConvention, SyncEvent};

use common::{RecordingObserver, TestBackend, options};

fn inbox(backend: Arc<TestBackend>) -> (InboxController, Arc<RecordingObserver>) {
    let observer = Arc::new(RecordingObserver::default());
    let inbox = InboxController::new(backend, options(observer.clone(), OrderConvention::default()));
    (inbox, observer)
}

#[tokio::test(start_paused = true)]
async fn pages_through_the_whole_list() {
    let backend = TestBackend::new();
    let (inbox, _) = inbox(backend.clone());

    inbox.open().await;
    let state = inbox.snapshot();
    assert_eq!(state.items.len(), 20);
    assert_eq!(state.cursor.map(|c| c.to_string()).as_deref(), Some("20"));

    inbox.load_more().await;
    let state = inbox.snapshot();
    assert_eq!(state.items.len(), 40);
    assert_eq!(state.cursor.map(|c| c.to_string()).as_deref(), Some("40"));

    inbox.load_more().await;
    let state = inbox.snapshot();
    assert_eq!(state.items.len(), 60);
    assert!(!state.has_more);
    assert_eq!(state.cursor, None);
    assert!(state.items.windows(2).all(|w| w[0].timestamp > w[1].timestamp));

    let mut ids: Vec<_> = state.items.iter().map(|p| p.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 60);
}

#[tokio::test(start_paused = true)]
async fn exhausted_list_does_not_fetch() {
    let backend = TestBackend::new();
    let (inbox, observer) = inbox(backend.clone());
    inbox.open().await;
    inbox.load_more().await;
    inbox.load_more().await;
    let fetches = backend.preview_fetches();

    inbox.load_more().await;
    assert_eq!(backend.preview_fetches(), fetches);
    assert_eq!(
        observer.count(|e| *e == SyncEvent::FetchSkipped { reason: "no more pages" }),
        1
    );
}

#[tokio::test(start_paused = true)]
async fn concurrent_load_more_fetches_once() {
    let backend = TestBackend::new();
    let (inbox, _) = inbox(backend.clone());
    inbox.open().await;

    tokio::join!(inbox.load_more(), inbox.load_more(), inbox.load_more());

    assert_eq!(backend.preview_fetches(), 2);
    assert_eq!(inbox.snapshot().items.len(), 40);
}

#[tokio::test(start_paused = true)]
async fn reopening_serves_the_same_cached_list() {
    let backend = TestBackend::new();
    let (inbox, _) = inbox(backend.clone());
    inbox.open().await;
    inbox.load_more().await;
    let first: Vec<_> = inbox.snapshot().items.iter().map(|p| p.id).collect();

    inbox.close();
    assert!(inbox.snapshot().items.is_empty());
    inbox.open().await;
    inbox.load_more().await;
    let second: Vec<_> = inbox.snapshot().items.iter().map(|p| p.id).collect();

    assert_eq!(first, second);
}

#[tokio::test(start_paused = true)]
async fn clear_cache_regenerates_the_list() {
    use murmur_sync::MessagingBackend;

    let backend = TestBackend::new();
    let (inbox, _) = inbox(backend.clone());
    inbox.open().await;
    let before: Vec<_> = inbox.snapshot().items.iter().map(|p| p.id).collect();

    backend.clear_cache().await;
    inbox.open().await;
    let after: Vec<_> = inbox.snapshot().items.iter().map(|p| p.id).collect();

    assert_eq!(after.len(), 20);
    assert_ne!(before, after);
}

#[tokio::test(start_paused = true)]
async fn close_during_load_more_discards_result() {
    let backend = TestBackend::new();
    let (inbox, observer) = inbox(backend.clone());
    inbox.open().await;

    let close = async {
        tokio::task::yield_now().await;
        inbox.close();
    };
    tokio::join!(inbox.load_more(), close);

    let state = inbox.snapshot();
    assert!(state.items.is_empty());
    assert!(!state.in_flight);
    assert_eq!(
        observer.count(|e| matches!(e, SyncEvent::StaleResultDiscarded { .. })),
        1
    );
}

#[tokio::test(start_paused = true)]
async fn failed_load_more_releases_guard() {
    let backend = TestBackend::new();
    let (inbox, observer) = inbox(backend.clone());
    inbox.open().await;

    backend.set_fail_fetches(true);
    inbox.load_more().await;

    let state = inbox.snapshot();
    assert!(!state.in_flight);
    assert!(!state.loading_more);
    assert_eq!(state.items.len(), 20);
    assert!(state.has_more);
    assert_eq!(observer.count(|e| matches!(e, SyncEvent::FetchFailed { .. })), 1);

    backend.set_fail_fetches(false);
    inbox.load_more().await;
    assert_eq!(backend.preview_fetches(), 3);
    assert_eq!(inbox.snapshot().items.len(), 40);
}

#[tokio::test(start_paused = true)]
async fn failed_open_stops_loading() {
    let backend = TestBackend::new();
    let (inbox, _) = inbox(backend.clone());
    backend.set_fail_fetches(true);

    inbox.open().await;

    let state = inbox.snapshot();
    assert!(!state.loading);
    assert!(state.items.is_empty());
    assert_eq!(state.cursor, None);
}
