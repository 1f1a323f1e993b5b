//! Fetch results as stored by the engine.

use serde::{Deserialize, Serialize};

use crate::request::FetchRequest;

/// One page of a remote listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub size: u32,
}

impl<T> Page<T> {
    /// Creates a page.
    pub fn new(items: Vec<T>, total: u64, page: u32, size: u32) -> Self {
        Self {
            items,
            total,
            page,
            size,
        }
    }

    /// Returns true if the page holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A failed fetch: the transport's message and the page that was requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchFailure {
    pub error: String,
    pub page: u32,
}

impl FetchFailure {
    pub fn new(error: impl Into<String>, page: u32) -> Self {
        Self {
            error: error.into(),
            page,
        }
    }
}

impl std::fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "page {}: {}", self.page, self.error)
    }
}

/// The engine's latest outcome. Only one is current at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome<T, S = (), O = ()> {
    /// Nothing has been requested yet.
    Idle,

    /// A request is in flight.
    Loading(FetchRequest<S, O>),

    /// The latest request succeeded.
    Success(Page<T>),

    /// The latest request failed.
    Failure(FetchFailure),
}

impl<T, S, O> Default for FetchOutcome<T, S, O> {
    fn default() -> Self {
        FetchOutcome::Idle
    }
}

impl<T, S, O> FetchOutcome<T, S, O> {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchOutcome::Loading(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, FetchOutcome::Failure(_))
    }

    /// Returns the page if the latest request succeeded.
    pub fn page(&self) -> Option<&Page<T>> {
        match self {
            FetchOutcome::Success(page) => Some(page),
            _ => None,
        }
    }

    /// Returns the failure if the latest request failed.
    pub fn failure(&self) -> Option<&FetchFailure> {
        match self {
            FetchOutcome::Failure(failure) => Some(failure),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_outcome_is_idle() {
        let outcome: FetchOutcome<u32> = FetchOutcome::default();
        assert_eq!(outcome, FetchOutcome::Idle);
        assert!(outcome.page().is_none());
        assert!(!outcome.is_loading());
    }

    #[test]
    fn test_success_exposes_page() {
        let outcome: FetchOutcome<&str> = FetchOutcome::Success(Page::new(vec!["a"], 1, 1, 10));
        assert_eq!(outcome.page().map(|p| p.items.len()), Some(1));
        assert!(outcome.failure().is_none());
    }

    #[test]
    fn test_failure_display() {
        let failure = FetchFailure::new("connection reset", 3);
        assert_eq!(failure.to_string(), "page 3: connection reset");
        let outcome: FetchOutcome<()> = FetchOutcome::Failure(failure);
        assert!(outcome.is_failure());
    }
}
