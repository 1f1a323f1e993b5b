//! Per-step context.

use common::{AuthContext, Identified};
use pagination::Page;

/// Data a selection step carries across transitions.
#[derive(Debug, Clone)]
pub struct SelectionContext<T> {
    /// Token provider and base path the step's fetches use.
    pub auth: AuthContext,
    /// Latest successful page.
    pub response: Option<Page<T>>,
    /// Item picked from `response`, if any.
    pub selected: Option<T>,
    /// Message of the latest failed fetch.
    pub error: Option<String>,
}

impl<T> SelectionContext<T> {
    /// Creates an empty context.
    pub fn new(auth: AuthContext) -> Self {
        Self {
            auth,
            response: None,
            selected: None,
            error: None,
        }
    }

    /// Seeds the context with a selection confirmed on an earlier visit to
    /// the step, so it starts out valid.
    pub fn with_selected(mut self, item: T) -> Self {
        self.selected = Some(item);
        self
    }
}

impl<T: Identified> SelectionContext<T> {
    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_ref().map(Identified::id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{ConnectorCluster, StaticTokenProvider};

    #[test]
    fn test_new_context_is_empty() {
        let auth = AuthContext::new(StaticTokenProvider::new("t"), "/api");
        let context: SelectionContext<ConnectorCluster> = SelectionContext::new(auth);
        assert!(context.response.is_none());
        assert!(context.selected_id().is_none());
        assert!(context.error.is_none());
        assert_eq!(context.auth.base_path(), "/api");
    }

    #[test]
    fn test_seeded_selection() {
        let auth = AuthContext::new(StaticTokenProvider::new("t"), "/api");
        let context = SelectionContext::new(auth).with_selected(ConnectorCluster::new("c-1", "a"));
        assert_eq!(context.selected_id(), Some("c-1"));
    }
}
