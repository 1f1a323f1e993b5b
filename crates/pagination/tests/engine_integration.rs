//! Integration tests for the fetch engine and pagination facade.

use std::sync::Arc;
use std::time::Duration;

use pagination::{
    CancelHandle, DeliveryReceiver, EngineState, FetchEngine, FetchRequest, Generation,
    ManualFetcher, Page, PartialRequest, Responder, delivery_channel,
};

type Engine = FetchEngine<String>;

fn items(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{prefix}-{i}")).collect()
}

fn drain(engine: &mut Engine, inbox: &mut DeliveryReceiver<String>) -> usize {
    let mut applied = 0;
    while let Ok(delivery) = inbox.try_recv() {
        if engine.deliver(delivery).is_some() {
            applied += 1;
        }
    }
    applied
}

#[test]
fn test_only_last_issued_request_is_observable() {
    let fetcher = ManualFetcher::new();
    let (sink, mut inbox) = delivery_channel();
    let mut engine: Engine = FetchEngine::new(Arc::new(fetcher.clone()), sink);

    for page in 1..=5 {
        engine.query(FetchRequest::new(page, 10)).unwrap();
    }

    // Resolve everything, newest first, so stale results arrive last.
    for index in (0..5).rev() {
        let page = index as u32 + 1;
        fetcher.succeed(index, Page::new(items(&format!("p{page}"), 2), 50, page, 10));
    }

    assert_eq!(drain(&mut engine, &mut inbox), 1);
    let view = engine.pagination();
    assert_eq!(view.items(), &["p5-0".to_string(), "p5-1".to_string()]);
    assert_eq!(view.page(), 5);
    assert_eq!(view.total(), 50);
    for index in 0..4 {
        assert!(fetcher.is_cancelled(index));
    }
}

#[test]
fn test_unresolved_fetch_keeps_loading() {
    let fetcher = ManualFetcher::new();
    let (sink, mut inbox) = delivery_channel();
    let mut engine: Engine = FetchEngine::new(Arc::new(fetcher.clone()), sink);

    engine.query(FetchRequest::new(1, 20)).unwrap();
    assert_eq!(drain(&mut engine, &mut inbox), 0);

    assert_eq!(engine.state(), EngineState::Querying);
    assert!(engine.pagination().loading());
    assert!(engine.pagination().first_request());
    assert_eq!(fetcher.pending_count(), 1);
}

#[test]
fn test_page_one_arriving_after_page_two_never_surfaces() {
    let fetcher = ManualFetcher::new();
    let (sink, mut inbox) = delivery_channel();
    let mut engine: Engine = FetchEngine::new(Arc::new(fetcher.clone()), sink);

    engine.query(FetchRequest::new(1, 10)).unwrap();
    engine.query(FetchRequest::new(2, 10)).unwrap();

    fetcher.succeed(1, Page::new(items("page2", 3), 13, 2, 10));
    drain(&mut engine, &mut inbox);
    fetcher.succeed(0, Page::new(items("page1", 10), 13, 1, 10));
    drain(&mut engine, &mut inbox);

    let view = engine.pagination();
    assert_eq!(view.page(), 2);
    assert_eq!(view.items(), items("page2", 3).as_slice());
}

#[test]
fn test_failure_then_retry_recovers() {
    let fetcher = ManualFetcher::new();
    let (sink, mut inbox) = delivery_channel();
    let mut engine: Engine = FetchEngine::new(Arc::new(fetcher.clone()), sink);

    engine.query(FetchRequest::new(1, 10)).unwrap();
    fetcher.fail(0, "gateway timeout");
    drain(&mut engine, &mut inbox);
    assert!(engine.pagination().error());

    // Retry is the caller's job: re-issue the same request.
    engine.pagination().run_query(PartialRequest::new()).unwrap();
    assert!(!engine.pagination().error());
    assert!(engine.pagination().loading());

    fetcher.succeed(1, Page::new(items("ok", 1), 1, 1, 10));
    drain(&mut engine, &mut inbox);
    assert_eq!(engine.state(), EngineState::Success);
    assert_eq!(fetcher.call_count(), 2);
}

#[tokio::test]
async fn test_async_transport_with_task_abort() {
    let (sink, mut inbox) = delivery_channel();
    let callback = |request: &FetchRequest, responder: Responder<String>| {
        let page = request.page;
        let size = request.size;
        // Page 1 is slow, anything else answers right away.
        let delay = if page == 1 { 200 } else { 1 };
        let task = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(delay)).await;
            responder.success(Page::new(vec![format!("page-{page}")], 2, page, size));
        });
        CancelHandle::new(move || task.abort())
    };
    let mut engine: Engine = FetchEngine::new(Arc::new(callback), sink);

    engine.query(FetchRequest::new(1, 1)).unwrap();
    let generation = engine.query(FetchRequest::new(2, 1)).unwrap();
    assert_eq!(generation, Generation::new(2));

    let delivery = inbox.recv().await.unwrap();
    assert_eq!(delivery.generation, generation);
    assert!(engine.deliver(delivery).is_some());

    // The aborted page-1 task never reports.
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(inbox.try_recv().is_err());
    assert_eq!(engine.pagination().items(), &["page-2".to_string()]);
}
