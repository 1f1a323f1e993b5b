//! Demo runner for the connector creation wizard.
//!
//! Drives the cluster selection step the way the console UI would: waits for
//! the first page, picks a ready cluster, confirms it, and feeds every step
//! signal to a [`WizardCoordinator`].

pub mod config;
pub mod error;

use std::sync::Arc;

use common::{ClusterStatus, ConnectorCluster};
use tokio::sync::mpsc;
use wizard::{
    CLUSTERS_STEP, ClustersApi, StepCompletion, WizardCoordinator, clusters_step, spawn_step,
};

pub use config::Config;
pub use error::{ConsoleError, Result};

/// Clusters the demo binary lists.
pub fn demo_clusters() -> Vec<ConnectorCluster> {
    vec![
        ConnectorCluster::new("c-1", "staging").with_status(ClusterStatus::Unconnected),
        ConnectorCluster::new("c-2", "production"),
        ConnectorCluster::new("c-3", "edge").with_status(ClusterStatus::Disconnected),
        ConnectorCluster::new("c-4", "analytics"),
    ]
}

/// Runs the cluster step to completion against `api`.
///
/// Selects the first ready cluster on the first page.
#[tracing::instrument(
    skip_all,
    fields(base_path = %config.base_path, page_size = config.page_size)
)]
pub async fn run_cluster_selection<A: ClustersApi + 'static>(
    config: &Config,
    api: Arc<A>,
) -> Result<StepCompletion> {
    let (step, deliveries) = clusters_step(config.auth_context(), api)?;
    let step = step.with_initial_request(config.initial_request());

    let (parent, mut messages) = mpsc::unbounded_channel();
    let (handle, task) = spawn_step(step, deliveries, parent);
    let mut wizard = WizardCoordinator::new([CLUSTERS_STEP]);

    let loaded = handle.wait_for(|s| s.ready || s.page.has_error()).await?;
    if let Some(error) = loaded.page.error {
        return Err(ConsoleError::Listing(error));
    }

    let cluster = loaded
        .page
        .items
        .iter()
        .find(|cluster| cluster.status == ClusterStatus::Ready)
        .ok_or(ConsoleError::NoReadyCluster {
            page: loaded.page.page,
        })?;
    tracing::info!(cluster_id = %cluster.id, name = %cluster.name, "selecting cluster");

    handle.select_item(cluster.id.clone())?;
    handle.confirm()?;

    let mut completion = None;
    while let Some(message) = messages.recv().await {
        tracing::debug!(
            step = message.step,
            signal = message.signal.signal_type(),
            "step signal"
        );
        if let Some(done) = wizard.handle_message(&message)? {
            completion = Some(done);
        }
    }

    task.await.map_err(|e| ConsoleError::Task(e.to_string()))?;
    completion.ok_or_else(|| ConsoleError::StepEnded(CLUSTERS_STEP.to_string()))
}
