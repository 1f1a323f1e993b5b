//! The paginated fetch engine.

use std::sync::Arc;

use crate::callback::{CancelHandle, Delivery, DeliverySender, FetchCallback, Responder};
use crate::error::Result;
use crate::facade::Pagination;
use crate::generation::Generation;
use crate::outcome::{FetchFailure, FetchOutcome, Page};
use crate::request::{FetchRequest, PartialRequest};
use crate::state::EngineState;

/// Signal the engine reports to its owner after applying a delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineSignal<T> {
    /// The current request succeeded; the engine is ready.
    Success(Page<T>),

    /// The current request failed.
    Failure(FetchFailure),
}

/// Single-slot cache of the latest fetch for one paginated listing.
///
/// The engine issues fetches through a [`FetchCallback`] and applies the
/// results it receives back through [`FetchEngine::deliver`]. Only the
/// result of the most recently issued request is ever applied.
pub struct FetchEngine<T, S = (), O = ()> {
    callback: Arc<dyn FetchCallback<T, S, O>>,
    sink: DeliverySender<T>,
    state: EngineState,
    request: FetchRequest<S, O>,
    outcome: FetchOutcome<T, S, O>,
    generation: Generation,
    in_flight: Option<CancelHandle>,
    first_request: bool,
}

impl<T, S, O> FetchEngine<T, S, O>
where
    S: Clone,
    O: Clone,
{
    /// Creates an idle engine that reports results on `sink`.
    pub fn new(callback: Arc<dyn FetchCallback<T, S, O>>, sink: DeliverySender<T>) -> Self {
        Self {
            callback,
            sink,
            state: EngineState::Idle,
            request: FetchRequest::default(),
            outcome: FetchOutcome::Idle,
            generation: Generation::initial(),
            in_flight: None,
            first_request: true,
        }
    }

    /// Sets the request that partial queries are merged over before the
    /// first query is issued.
    pub fn with_request(mut self, request: FetchRequest<S, O>) -> Self {
        self.request = request;
        self
    }

    /// Issues a fetch for `request`, superseding any request in flight.
    ///
    /// Returns the generation stamped on the new fetch. An invalid request
    /// is rejected and leaves the engine untouched.
    #[tracing::instrument(skip_all, fields(page = request.page, size = request.size))]
    pub fn query(&mut self, request: FetchRequest<S, O>) -> Result<Generation> {
        request.validate()?;

        if let Some(previous) = self.in_flight.take() {
            tracing::debug!(superseded = %self.generation, "cancelling in-flight fetch");
            previous.cancel();
        }

        self.generation = self.generation.next();
        self.state = self.state.on_query();
        self.outcome = FetchOutcome::Loading(request.clone());
        self.request = request;

        let responder = Responder::new(self.generation, self.request.page, self.sink.clone());
        let handle = self.callback.fetch(&self.request, responder);
        self.in_flight = Some(handle);

        metrics::counter!("pagination_queries_total").increment(1);
        tracing::debug!(generation = %self.generation, "fetch issued");

        Ok(self.generation)
    }

    /// Merges `partial` over the current request and issues it.
    pub fn run_query(&mut self, partial: PartialRequest<S, O>) -> Result<Generation> {
        let request = self.request.merge(partial);
        self.query(request)
    }

    /// Applies a fetch result.
    ///
    /// Results from superseded requests are discarded and yield `None`.
    pub fn deliver(&mut self, delivery: Delivery<T>) -> Option<EngineSignal<T>>
    where
        T: Clone,
    {
        if !self.is_current(delivery.generation) {
            metrics::counter!("pagination_stale_deliveries_total").increment(1);
            tracing::debug!(
                stale = %delivery.generation,
                current = %self.generation,
                "discarding stale delivery"
            );
            return None;
        }

        self.in_flight = None;
        self.first_request = false;
        self.state = self.state.on_resolved(delivery.result.is_ok());

        match delivery.result {
            Ok(page) => {
                tracing::debug!(
                    generation = %self.generation,
                    items = page.items.len(),
                    total = page.total,
                    "fetch succeeded"
                );
                self.outcome = FetchOutcome::Success(page.clone());
                Some(EngineSignal::Success(page))
            }
            Err(failure) => {
                metrics::counter!("pagination_failures_total").increment(1);
                tracing::warn!(
                    generation = %self.generation,
                    page = failure.page,
                    error = %failure.error,
                    "fetch failed"
                );
                self.outcome = FetchOutcome::Failure(failure.clone());
                Some(EngineSignal::Failure(failure))
            }
        }
    }

    /// Returns the read/command facade over this engine.
    pub fn pagination(&mut self) -> Pagination<'_, T, S, O> {
        Pagination::new(self)
    }
}

impl<T, S, O> FetchEngine<T, S, O> {
    fn is_current(&self, generation: Generation) -> bool {
        self.state.is_querying() && generation == self.generation
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Returns the most recently issued request (or the initial one).
    pub fn request(&self) -> &FetchRequest<S, O> {
        &self.request
    }

    pub fn outcome(&self) -> &FetchOutcome<T, S, O> {
        &self.outcome
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Returns true until the first request succeeds or fails.
    pub fn is_first_request(&self) -> bool {
        self.first_request
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_querying()
    }

    pub fn has_error(&self) -> bool {
        matches!(self.state, EngineState::Failure)
    }

    /// Returns the latest page if the latest request succeeded.
    pub fn page(&self) -> Option<&Page<T>> {
        self.outcome.page()
    }
}

impl<T, S, O> Drop for FetchEngine<T, S, O> {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            tracing::debug!(generation = %self.generation, "engine dropped, cancelling fetch");
            handle.cancel();
        }
    }
}

impl<T, S, O> std::fmt::Debug for FetchEngine<T, S, O>
where
    S: std::fmt::Debug,
    O: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchEngine")
            .field("state", &self.state)
            .field("request", &self.request)
            .field("generation", &self.generation)
            .field("first_request", &self.first_request)
            .finish_non_exhaustive()
    }
}
