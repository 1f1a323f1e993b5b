//! The connector cluster selection step.
//!
//! Lists the clusters a connector can be deployed to and lets the user pick
//! one. Fetches run on the tokio runtime the step was built on; each fetch
//! awaits a fresh access token before calling the API.

use std::sync::Arc;

use common::{AuthContext, ConnectorCluster};
use pagination::{
    CancelHandle, DeliveryReceiver, FetchCallback, FetchRequest, Responder, delivery_channel,
};
use tokio::runtime::Handle;

use crate::context::SelectionContext;
use crate::error::{Result, WizardError};
use crate::services::ClustersApi;
use crate::step::SelectionStep;

/// Name the cluster step reports in its messages.
pub const CLUSTERS_STEP: &str = "clusters";

pub type ClustersStep = SelectionStep<ConnectorCluster>;

/// Fetch callback that lists clusters through a [`ClustersApi`].
pub struct ClusterFetcher<A> {
    api: Arc<A>,
    auth: AuthContext,
    handle: Handle,
}

impl<A: ClustersApi + 'static> ClusterFetcher<A> {
    /// Creates a fetcher bound to the current tokio runtime.
    pub fn new(api: Arc<A>, auth: AuthContext) -> Result<Self> {
        let handle = Handle::try_current().map_err(|_| WizardError::NoRuntime)?;
        Ok(Self { api, auth, handle })
    }
}

impl<A: ClustersApi + 'static> FetchCallback<ConnectorCluster> for ClusterFetcher<A> {
    fn fetch(
        &self,
        request: &FetchRequest,
        responder: Responder<ConnectorCluster>,
    ) -> CancelHandle {
        let api = Arc::clone(&self.api);
        let auth = self.auth.clone();
        let (page, size) = (request.page, request.size);

        let task = self.handle.spawn(async move {
            let token = match auth.access_token().await {
                Ok(token) => token,
                Err(e) => {
                    tracing::warn!(error = %e, "no access token for cluster listing");
                    responder.failure(e.to_string());
                    return;
                }
            };

            match api.list_clusters(&token, auth.base_path(), page, size).await {
                Ok(clusters) => responder.success(clusters),
                Err(e) => {
                    tracing::warn!(page, error = %e, "cluster listing failed");
                    responder.failure(e.to_string());
                }
            }
        });

        CancelHandle::new(move || task.abort())
    }
}

impl<A> std::fmt::Debug for ClusterFetcher<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterFetcher")
            .field("auth", &self.auth)
            .finish_non_exhaustive()
    }
}

/// Builds a cluster step and the receiver its fetch results arrive on.
///
/// Must be called from within a tokio runtime.
pub fn clusters_step<A: ClustersApi + 'static>(
    auth: AuthContext,
    api: Arc<A>,
) -> Result<(ClustersStep, DeliveryReceiver<ConnectorCluster>)> {
    let fetcher = ClusterFetcher::new(api, auth.clone())?;
    let (sink, deliveries) = delivery_channel();
    let step = SelectionStep::new(
        CLUSTERS_STEP,
        SelectionContext::new(auth),
        Arc::new(fetcher),
        sink,
    );
    Ok((step, deliveries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::InMemoryClustersApi;
    use crate::signal::StepSignal;
    use common::StaticTokenProvider;

    fn api() -> Arc<InMemoryClustersApi> {
        Arc::new(InMemoryClustersApi::with_clusters(vec![
            ConnectorCluster::new("a", "alpha"),
            ConnectorCluster::new("b", "beta"),
        ]))
    }

    fn auth() -> AuthContext {
        AuthContext::new(StaticTokenProvider::new("t0k3n"), "https://api.test")
    }

    #[test]
    fn test_fetcher_requires_runtime() {
        let result = ClusterFetcher::new(api(), auth());
        assert!(matches!(result, Err(WizardError::NoRuntime)));
    }

    #[tokio::test]
    async fn test_step_loads_first_page() {
        let api = api();
        let (mut step, mut deliveries) = clusters_step(auth(), Arc::clone(&api)).unwrap();

        assert_eq!(step.start(), vec![StepSignal::IsInvalid]);
        let delivery = deliveries.recv().await.unwrap();
        assert!(step.deliver(delivery));

        assert!(step.is_ready());
        assert_eq!(step.name(), CLUSTERS_STEP);
        assert_eq!(api.call_count(), 1);
        assert_eq!(step.pagination().unwrap().total(), 2);
    }

    #[tokio::test]
    async fn test_missing_token_is_a_fetch_failure() {
        let auth = AuthContext::new(StaticTokenProvider::anonymous(), "/");
        let api = api();
        let (mut step, mut deliveries) = clusters_step(auth, Arc::clone(&api)).unwrap();

        step.start();
        let delivery = deliveries.recv().await.unwrap();
        step.deliver(delivery);

        assert!(step.context().error.is_some());
        assert!(!step.is_ready());
        assert_eq!(api.call_count(), 0);
    }

    #[tokio::test]
    async fn test_api_failure_reaches_pagination_view() {
        let api = api();
        api.set_fail_on_list(true);
        let (mut step, mut deliveries) = clusters_step(auth(), api).unwrap();

        step.start();
        let delivery = deliveries.recv().await.unwrap();
        step.deliver(delivery);

        let view = step.pagination().unwrap();
        assert!(view.error());
        assert!(view.error_message().unwrap().contains("503"));
    }

    #[tokio::test]
    async fn test_cancel_aborts_held_fetch() {
        let api = api();
        api.set_hold_responses(true);
        let fetcher = ClusterFetcher::new(Arc::clone(&api), auth()).unwrap();
        let (sink, mut deliveries) = delivery_channel();
        let mut engine = pagination::FetchEngine::new(Arc::new(fetcher), sink);

        engine.query(FetchRequest::default()).unwrap();
        tokio::task::yield_now().await;
        drop(engine);

        // The aborted task drops its responder, closing the channel.
        assert!(deliveries.recv().await.is_none());
    }
}
