//! Fetch callback resolved by hand, for tests and demos.

use std::sync::{Arc, RwLock};

use crate::callback::{CancelHandle, FetchCallback, Responder};
use crate::outcome::Page;
use crate::request::FetchRequest;

struct Call<T, S, O> {
    request: FetchRequest<S, O>,
    responder: Option<Responder<T>>,
    cancelled: bool,
}

struct ManualState<T, S, O> {
    calls: Vec<Call<T, S, O>>,
}

/// Fetch callback that records every request and resolves only when told to.
///
/// Calls are addressed by the order they were issued in, which makes it
/// possible to resolve them out of order and model late transport replies.
/// Resolving a cancelled call still delivers its result, as a real
/// transport that ignored the cancellation would.
pub struct ManualFetcher<T, S = (), O = ()> {
    state: Arc<RwLock<ManualState<T, S, O>>>,
}

impl<T, S, O> ManualFetcher<T, S, O> {
    /// Creates a fetcher with no recorded calls.
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(ManualState { calls: Vec::new() })),
        }
    }

    /// Returns the number of fetches started so far.
    pub fn call_count(&self) -> usize {
        self.state.read().unwrap().calls.len()
    }

    /// Returns the number of fetches still waiting for a result.
    pub fn pending_count(&self) -> usize {
        self.state
            .read()
            .unwrap()
            .calls
            .iter()
            .filter(|call| call.responder.is_some())
            .count()
    }

    /// Returns true if the engine cancelled the call at `index`.
    pub fn is_cancelled(&self, index: usize) -> bool {
        self.state
            .read()
            .unwrap()
            .calls
            .get(index)
            .is_some_and(|call| call.cancelled)
    }

    /// Resolves the call at `index` with `page`.
    ///
    /// Returns false if there is no such call or it was already resolved.
    pub fn succeed(&self, index: usize, page: Page<T>) -> bool {
        match self.take_responder(index) {
            Some(responder) => {
                responder.success(page);
                true
            }
            None => false,
        }
    }

    /// Fails the call at `index` with `error`.
    pub fn fail(&self, index: usize, error: impl Into<String>) -> bool {
        match self.take_responder(index) {
            Some(responder) => {
                responder.failure(error);
                true
            }
            None => false,
        }
    }

    /// Resolves the most recent call with `page`.
    pub fn succeed_latest(&self, page: Page<T>) -> bool {
        match self.call_count() {
            0 => false,
            count => self.succeed(count - 1, page),
        }
    }

    fn take_responder(&self, index: usize) -> Option<Responder<T>> {
        self.state
            .write()
            .unwrap()
            .calls
            .get_mut(index)
            .and_then(|call| call.responder.take())
    }
}

impl<T, S: Clone, O: Clone> ManualFetcher<T, S, O> {
    /// Returns every request issued so far, oldest first.
    pub fn requests(&self) -> Vec<FetchRequest<S, O>> {
        self.state
            .read()
            .unwrap()
            .calls
            .iter()
            .map(|call| call.request.clone())
            .collect()
    }
}

impl<T, S, O> Clone for ManualFetcher<T, S, O> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T, S, O> Default for ManualFetcher<T, S, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S, O> FetchCallback<T, S, O> for ManualFetcher<T, S, O>
where
    T: Send + Sync + 'static,
    S: Clone + Send + Sync + 'static,
    O: Clone + Send + Sync + 'static,
{
    fn fetch(&self, request: &FetchRequest<S, O>, responder: Responder<T>) -> CancelHandle {
        let mut state = self.state.write().unwrap();
        let index = state.calls.len();
        state.calls.push(Call {
            request: request.clone(),
            responder: Some(responder),
            cancelled: false,
        });

        let shared = Arc::clone(&self.state);
        CancelHandle::new(move || {
            if let Some(call) = shared.write().unwrap().calls.get_mut(index) {
                call.cancelled = true;
            }
        })
    }
}
