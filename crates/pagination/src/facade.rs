//! Read/command projection over a fetch engine.

use serde::{Deserialize, Serialize};

use crate::engine::FetchEngine;
use crate::error::Result;
use crate::generation::Generation;
use crate::outcome::Page;
use crate::request::{FetchRequest, PartialRequest};
use crate::state::EngineState;

/// What presentation code needs to render a paginated listing.
///
/// Borrowed from a running engine; it exposes the engine's state as plain
/// values and forwards `run_query` without any other side effect.
pub struct Pagination<'a, T, S = (), O = ()> {
    engine: &'a mut FetchEngine<T, S, O>,
}

impl<'a, T, S, O> Pagination<'a, T, S, O>
where
    S: Clone,
    O: Clone,
{
    pub fn new(engine: &'a mut FetchEngine<T, S, O>) -> Self {
        Self { engine }
    }

    /// Items of the latest successful page; empty otherwise.
    pub fn items(&self) -> &[T] {
        self.engine
            .page()
            .map(|page| page.items.as_slice())
            .unwrap_or(&[])
    }

    /// Total item count reported by the latest successful page; 0 otherwise.
    pub fn total(&self) -> u64 {
        self.engine.page().map(|page| page.total).unwrap_or(0)
    }

    /// Page number of the current request.
    pub fn page(&self) -> u32 {
        self.engine.request().page
    }

    /// Page size of the current request.
    pub fn size(&self) -> u32 {
        self.engine.request().size
    }

    pub fn request(&self) -> &FetchRequest<S, O> {
        self.engine.request()
    }

    pub fn response(&self) -> Option<&Page<T>> {
        self.engine.page()
    }

    pub fn state(&self) -> EngineState {
        self.engine.state()
    }

    pub fn loading(&self) -> bool {
        self.engine.is_loading()
    }

    pub fn error(&self) -> bool {
        self.engine.has_error()
    }

    /// Transport message of the latest failure, if the latest request failed.
    pub fn error_message(&self) -> Option<&str> {
        self.engine
            .outcome()
            .failure()
            .map(|failure| failure.error.as_str())
    }

    pub fn first_request(&self) -> bool {
        self.engine.is_first_request()
    }

    /// Merges `partial` over the current request and issues it.
    ///
    /// Fields left unset keep their current value, so callers can change
    /// only the size or only the search filter.
    pub fn run_query(&mut self, partial: PartialRequest<S, O>) -> Result<Generation> {
        self.engine.run_query(partial)
    }

    /// Copies the current view into an owned snapshot.
    pub fn snapshot(&self) -> PageSnapshot<T>
    where
        T: Clone,
    {
        PageSnapshot {
            items: self.items().to_vec(),
            total: self.total(),
            page: self.page(),
            size: self.size(),
            loading: self.loading(),
            error: self.error_message().map(str::to_owned),
            first_request: self.first_request(),
        }
    }
}

/// Owned copy of a [`Pagination`] view, safe to hand across tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSnapshot<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub size: u32,
    pub loading: bool,
    pub error: Option<String>,
    pub first_request: bool,
}

impl<T> PageSnapshot<T> {
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}

impl<T> Default for PageSnapshot<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: 1,
            size: crate::request::DEFAULT_PAGE_SIZE,
            loading: false,
            error: None,
            first_request: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::callback::delivery_channel;
    use crate::manual::ManualFetcher;

    type Engine = FetchEngine<u32, String, String>;

    fn setup() -> (Engine, ManualFetcher<u32, String, String>, crate::DeliveryReceiver<u32>) {
        let fetcher = ManualFetcher::new();
        let (sink, inbox) = delivery_channel();
        (FetchEngine::new(Arc::new(fetcher.clone()), sink), fetcher, inbox)
    }

    #[test]
    fn test_initial_view() {
        let (mut engine, _, _) = setup();
        let view = engine.pagination();

        assert!(view.items().is_empty());
        assert_eq!(view.total(), 0);
        assert_eq!(view.page(), 1);
        assert_eq!(view.size(), crate::DEFAULT_PAGE_SIZE);
        assert!(!view.loading());
        assert!(!view.error());
        assert!(view.first_request());
    }

    #[test]
    fn test_loading_then_success() {
        let (mut engine, fetcher, mut inbox) = setup();
        engine.pagination().run_query(PartialRequest::new().size(2)).unwrap();
        assert!(engine.pagination().loading());
        assert!(engine.pagination().first_request());

        fetcher.succeed(0, Page::new(vec![10, 11], 7, 1, 2));
        engine.deliver(inbox.try_recv().unwrap());

        let view = engine.pagination();
        assert_eq!(view.items(), &[10, 11]);
        assert_eq!(view.total(), 7);
        assert_eq!(view.size(), 2);
        assert!(!view.loading());
        assert!(!view.first_request());
    }

    #[test]
    fn test_error_flag_and_message() {
        let (mut engine, fetcher, mut inbox) = setup();
        engine.pagination().run_query(PartialRequest::new()).unwrap();

        fetcher.fail(0, "network down");
        engine.deliver(inbox.try_recv().unwrap());

        let view = engine.pagination();
        assert!(view.error());
        assert_eq!(view.error_message(), Some("network down"));
        assert!(view.items().is_empty());
        assert!(!view.first_request());
    }

    #[test]
    fn test_first_request_stays_false_on_requery() {
        let (mut engine, fetcher, mut inbox) = setup();
        engine.pagination().run_query(PartialRequest::new()).unwrap();
        fetcher.succeed(0, Page::new(vec![1], 1, 1, 20));
        engine.deliver(inbox.try_recv().unwrap());

        engine.pagination().run_query(PartialRequest::new().page(2)).unwrap();

        let view = engine.pagination();
        assert!(view.loading());
        assert!(!view.first_request());
    }

    #[test]
    fn test_run_query_merges_search_only() {
        let (mut engine, fetcher, _) = setup();
        engine
            .query(FetchRequest::new(3, 25).with_order_by("name".to_string()))
            .unwrap();

        engine
            .pagination()
            .run_query(PartialRequest::new().search("debezium".to_string()))
            .unwrap();

        let issued = &fetcher.requests()[1];
        assert_eq!(issued.page, 3);
        assert_eq!(issued.size, 25);
        assert_eq!(issued.search.as_deref(), Some("debezium"));
        assert_eq!(issued.order_by.as_deref(), Some("name"));
    }

    #[test]
    fn test_snapshot_copies_view() {
        let (mut engine, fetcher, mut inbox) = setup();
        engine.pagination().run_query(PartialRequest::new()).unwrap();
        fetcher.succeed(0, Page::new(vec![5], 1, 1, 20));
        engine.deliver(inbox.try_recv().unwrap());

        let snapshot = engine.pagination().snapshot();

        assert_eq!(snapshot.items, vec![5]);
        assert_eq!(snapshot.total, 1);
        assert!(!snapshot.has_error());
        assert!(!snapshot.first_request);
    }
}
