//! Fetch requests and partial request updates.

use serde::{Deserialize, Serialize};

use crate::error::{PaginationError, Result};

/// Page size used when nothing else was requested.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// A request for one page of a remote listing.
///
/// `S` is the opaque search filter and `O` the opaque sort specification;
/// the engine only carries them through to the fetch callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest<S = (), O = ()> {
    pub page: u32,
    pub size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<S>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<O>,
}

impl<S, O> FetchRequest<S, O> {
    /// Creates a request for the given page and size with no filter or sort.
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size,
            search: None,
            order_by: None,
        }
    }

    /// Sets the search filter.
    pub fn with_search(mut self, search: S) -> Self {
        self.search = Some(search);
        self
    }

    /// Sets the sort specification.
    pub fn with_order_by(mut self, order_by: O) -> Self {
        self.order_by = Some(order_by);
        self
    }

    /// Checks that page and size are both at least 1.
    pub fn validate(&self) -> Result<()> {
        if self.page == 0 || self.size == 0 {
            return Err(PaginationError::InvalidRequest {
                page: self.page,
                size: self.size,
            });
        }
        Ok(())
    }
}

impl<S: Clone, O: Clone> FetchRequest<S, O> {
    /// Returns a new request with the fields set in `partial` replacing
    /// the corresponding fields of `self`.
    ///
    /// Unspecified fields keep their current value, not a default.
    pub fn merge(&self, partial: PartialRequest<S, O>) -> Self {
        Self {
            page: partial.page.unwrap_or(self.page),
            size: partial.size.unwrap_or(self.size),
            search: partial.search.unwrap_or_else(|| self.search.clone()),
            order_by: partial.order_by.unwrap_or_else(|| self.order_by.clone()),
        }
    }
}

impl<S, O> Default for FetchRequest<S, O> {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

/// A request update where every field is optional.
///
/// `search` and `order_by` are doubly optional: `None` keeps the current
/// value, `Some(None)` removes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialRequest<S = (), O = ()> {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub size: Option<u32>,
    #[serde(default)]
    pub search: Option<Option<S>>,
    #[serde(default)]
    pub order_by: Option<Option<O>>,
}

impl<S, O> PartialRequest<S, O> {
    /// Creates an update that changes nothing.
    pub fn new() -> Self {
        Self {
            page: None,
            size: None,
            search: None,
            order_by: None,
        }
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn search(mut self, search: S) -> Self {
        self.search = Some(Some(search));
        self
    }

    /// Removes the search filter.
    pub fn clear_search(mut self) -> Self {
        self.search = Some(None);
        self
    }

    pub fn order_by(mut self, order_by: O) -> Self {
        self.order_by = Some(Some(order_by));
        self
    }

    /// Removes the sort, falling back to the listing's default order.
    pub fn clear_order_by(mut self) -> Self {
        self.order_by = Some(None);
        self
    }
}

impl<S, O> Default for PartialRequest<S, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, O> From<FetchRequest<S, O>> for PartialRequest<S, O> {
    fn from(request: FetchRequest<S, O>) -> Self {
        Self {
            page: Some(request.page),
            size: Some(request.size),
            search: Some(request.search),
            order_by: Some(request.order_by),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Request = FetchRequest<String, String>;
    type Partial = PartialRequest<String, String>;

    #[test]
    fn test_default_request() {
        let request = Request::default();
        assert_eq!(request.page, 1);
        assert_eq!(request.size, DEFAULT_PAGE_SIZE);
        assert!(request.search.is_none());
        assert!(request.order_by.is_none());
    }

    #[test]
    fn test_validate_rejects_zero_page_or_size() {
        assert!(Request::new(1, 1).validate().is_ok());
        assert_eq!(
            Request::new(0, 10).validate(),
            Err(PaginationError::InvalidRequest { page: 0, size: 10 })
        );
        assert!(Request::new(3, 0).validate().is_err());
    }

    #[test]
    fn test_merge_keeps_current_values() {
        let current = Request::new(3, 50)
            .with_search("kafka".to_string())
            .with_order_by("name asc".to_string());

        let merged = current.merge(Partial::new().size(10));

        assert_eq!(merged.page, 3);
        assert_eq!(merged.size, 10);
        assert_eq!(merged.search.as_deref(), Some("kafka"));
        assert_eq!(merged.order_by.as_deref(), Some("name asc"));
    }

    #[test]
    fn test_merge_replaces_search_only() {
        let current = Request::new(2, 20).with_search("old".to_string());
        let merged = current.merge(Partial::new().search("new".to_string()));
        assert_eq!(merged.page, 2);
        assert_eq!(merged.search.as_deref(), Some("new"));
        assert!(merged.order_by.is_none());
    }

    #[test]
    fn test_empty_partial_is_identity() {
        let current = Request::new(4, 15).with_order_by("id".to_string());
        assert_eq!(current.merge(Partial::default()), current);
    }

    #[test]
    fn test_full_partial_from_request() {
        let target = Request::new(9, 5).with_search("x".to_string());
        let merged = Request::default().merge(target.clone().into());
        assert_eq!(merged, target);
    }

    #[test]
    fn test_merge_clears_search_and_sort() {
        let current = Request::new(2, 20)
            .with_search("kafka".to_string())
            .with_order_by("name asc".to_string());

        let merged = current.merge(Partial::new().clear_search());
        assert!(merged.search.is_none());
        assert_eq!(merged.order_by.as_deref(), Some("name asc"));
        assert_eq!(merged.page, 2);

        let merged = merged.merge(Partial::new().clear_order_by());
        assert!(merged.order_by.is_none());
    }

    #[test]
    fn test_request_without_filter_clears_it() {
        let current = Request::new(1, 20).with_search("kafka".to_string());
        let merged = current.merge(Request::new(1, 20).into());
        assert!(merged.search.is_none());
    }

    #[test]
    fn test_unset_filters_are_not_serialized() {
        let json = serde_json::to_value(Request::new(1, 10)).unwrap();
        assert_eq!(json, serde_json::json!({ "page": 1, "size": 10 }));
    }
}
