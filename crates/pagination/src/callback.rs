//! The fetch callback contract and the plumbing that carries results back.
//!
//! An engine hands every fetch callback a [`Responder`] stamped with the
//! generation of the request it belongs to. The callback calls
//! [`Responder::success`] or [`Responder::failure`] once the transport
//! resolves; both consume the responder, so a callback cannot report twice.
//! The result travels as a [`Delivery`] over a channel and is applied by
//! whoever owns the engine, one delivery at a time.

use tokio::sync::mpsc;

use crate::generation::Generation;
use crate::outcome::{FetchFailure, Page};
use crate::request::FetchRequest;

/// A fetch result tagged with the generation of the request that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery<T> {
    pub generation: Generation,
    pub result: std::result::Result<Page<T>, FetchFailure>,
}

impl<T> Delivery<T> {
    /// Creates a successful delivery.
    pub fn success(generation: Generation, page: Page<T>) -> Self {
        Self {
            generation,
            result: Ok(page),
        }
    }

    /// Creates a failed delivery.
    pub fn failure(generation: Generation, failure: FetchFailure) -> Self {
        Self {
            generation,
            result: Err(failure),
        }
    }
}

pub type DeliverySender<T> = mpsc::UnboundedSender<Delivery<T>>;
pub type DeliveryReceiver<T> = mpsc::UnboundedReceiver<Delivery<T>>;

/// Creates the channel fetch results are delivered on.
pub fn delivery_channel<T>() -> (DeliverySender<T>, DeliveryReceiver<T>) {
    mpsc::unbounded_channel()
}

/// Continuation handed to a fetch callback for one request.
#[derive(Debug)]
pub struct Responder<T> {
    generation: Generation,
    page: u32,
    sink: DeliverySender<T>,
}

impl<T> Responder<T> {
    pub(crate) fn new(generation: Generation, page: u32, sink: DeliverySender<T>) -> Self {
        Self {
            generation,
            page,
            sink,
        }
    }

    /// Returns the generation this responder reports for.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Returns the page number that was requested.
    pub fn requested_page(&self) -> u32 {
        self.page
    }

    /// Reports a successful fetch.
    pub fn success(self, page: Page<T>) {
        self.send(Delivery::success(self.generation, page));
    }

    /// Reports a failed fetch for the requested page.
    pub fn failure(self, error: impl Into<String>) {
        let failure = FetchFailure::new(error, self.page);
        self.send(Delivery::failure(self.generation, failure));
    }

    fn send(&self, delivery: Delivery<T>) {
        // The engine may already be gone; its results no longer matter.
        if self.sink.send(delivery).is_err() {
            tracing::trace!(generation = %self.generation, "delivery dropped, engine closed");
        }
    }
}

/// Handle that asks the transport to abandon a fetch.
///
/// Cancellation is cooperative: the transport may ignore it or resolve
/// anyway, in which case the engine discards the late delivery.
pub struct CancelHandle(Option<Box<dyn FnOnce() + Send>>);

impl CancelHandle {
    /// Creates a handle that runs `cancel` when invoked.
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self(Some(Box::new(cancel)))
    }

    /// Creates a handle for transports that cannot be cancelled.
    pub fn noop() -> Self {
        Self(None)
    }

    /// Asks the transport to abandon the fetch.
    pub fn cancel(mut self) {
        if let Some(cancel) = self.0.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for CancelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("CancelHandle")
            .field(&if self.0.is_some() { "armed" } else { "noop" })
            .finish()
    }
}

/// The external API call an engine drives.
///
/// Implementations start the fetch, return immediately with a cancel
/// handle, and later call at most one of the responder's continuations.
/// Dropping the responder without calling either is allowed once the
/// fetch was cancelled.
pub trait FetchCallback<T, S = (), O = ()>: Send + Sync {
    fn fetch(&self, request: &FetchRequest<S, O>, responder: Responder<T>) -> CancelHandle;
}

impl<T, S, O, F> FetchCallback<T, S, O> for F
where
    F: Fn(&FetchRequest<S, O>, Responder<T>) -> CancelHandle + Send + Sync,
{
    fn fetch(&self, request: &FetchRequest<S, O>, responder: Responder<T>) -> CancelHandle {
        self(request, responder)
    }
}
