//! Connector clusters API trait and in-memory implementation.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::ConnectorCluster;
use pagination::Page;

use crate::error::WizardError;

/// Listing endpoint for connector clusters.
#[async_trait]
pub trait ClustersApi: Send + Sync {
    /// Lists one page of clusters visible to the holder of `token`.
    async fn list_clusters(
        &self,
        token: &str,
        base_path: &str,
        page: u32,
        size: u32,
    ) -> Result<Page<ConnectorCluster>, WizardError>;
}

#[derive(Debug, Default)]
struct InMemoryClustersState {
    clusters: Vec<ConnectorCluster>,
    calls: usize,
    fail_on_list: bool,
    hold_responses: bool,
}

/// In-memory clusters API for testing and demos.
#[derive(Debug, Clone, Default)]
pub struct InMemoryClustersApi {
    state: Arc<RwLock<InMemoryClustersState>>,
}

impl InMemoryClustersApi {
    /// Creates an API with no clusters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an API that lists `clusters`.
    pub fn with_clusters(clusters: Vec<ConnectorCluster>) -> Self {
        let api = Self::new();
        api.state.write().unwrap().clusters = clusters;
        api
    }

    /// Configures the API to fail every list call.
    pub fn set_fail_on_list(&self, fail: bool) {
        self.state.write().unwrap().fail_on_list = fail;
    }

    /// Configures the API to never answer list calls, like a hung transport.
    pub fn set_hold_responses(&self, hold: bool) {
        self.state.write().unwrap().hold_responses = hold;
    }

    /// Returns the number of list calls received.
    pub fn call_count(&self) -> usize {
        self.state.read().unwrap().calls
    }
}

#[async_trait]
impl ClustersApi for InMemoryClustersApi {
    async fn list_clusters(
        &self,
        token: &str,
        _base_path: &str,
        page: u32,
        size: u32,
    ) -> Result<Page<ConnectorCluster>, WizardError> {
        let hold = {
            let mut state = self.state.write().unwrap();
            state.calls += 1;

            if token.is_empty() {
                return Err(WizardError::ClustersApi("401 Unauthorized".to_string()));
            }
            if state.fail_on_list {
                return Err(WizardError::ClustersApi(
                    "503 Service Unavailable".to_string(),
                ));
            }
            state.hold_responses
        };

        if hold {
            std::future::pending::<()>().await;
        }

        let state = self.state.read().unwrap();
        let start = (page.saturating_sub(1) as usize).saturating_mul(size as usize);
        let items = state
            .clusters
            .iter()
            .skip(start)
            .take(size as usize)
            .cloned()
            .collect();

        Ok(Page::new(items, state.clusters.len() as u64, page, size))
    }
}
