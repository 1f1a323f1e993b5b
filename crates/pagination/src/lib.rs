//! Paginated fetch engine for remote resource listings.
//!
//! The [`FetchEngine`] owns a single page of results and at most one
//! in-flight request. Every `query` supersedes the previous one: the old
//! request is cancelled and, because each issued fetch is stamped with a
//! [`Generation`], any result it still produces is discarded on delivery.
//!
//! The [`Pagination`] facade is the read/command projection presentation
//! code uses instead of talking to the engine directly.

pub mod callback;
pub mod engine;
pub mod error;
pub mod facade;
pub mod generation;
pub mod manual;
pub mod outcome;
pub mod request;
pub mod state;

pub use callback::{
    CancelHandle, Delivery, DeliveryReceiver, DeliverySender, FetchCallback, Responder,
    delivery_channel,
};
pub use engine::{EngineSignal, FetchEngine};
pub use error::{PaginationError, Result};
pub use facade::{PageSnapshot, Pagination};
pub use generation::Generation;
pub use manual::ManualFetcher;
pub use outcome::{FetchFailure, FetchOutcome, Page};
pub use request::{DEFAULT_PAGE_SIZE, FetchRequest, PartialRequest};
pub use state::EngineState;
