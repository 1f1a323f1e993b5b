//! Console demo entry point.

use std::sync::Arc;

use console::Config;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use wizard::InMemoryClustersApi;

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    // 1. Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Install Prometheus metrics recorder
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Run the cluster step against the demo clusters
    let api = Arc::new(InMemoryClustersApi::with_clusters(console::demo_clusters()));
    tracing::info!(base_path = %config.base_path, "starting cluster selection");

    let outcome = console::run_cluster_selection(&config, api).await;

    match &outcome {
        Ok(completion) => tracing::info!(
            step = %completion.step,
            cluster_id = %completion.item_id,
            completed_at = %completion.completed_at,
            "cluster selected"
        ),
        Err(e) => tracing::error!(error = %e, "cluster selection failed"),
    }

    // 4. Dump metrics on the way out
    println!("{}", metrics_handle.render());

    if outcome.is_err() {
        std::process::exit(1);
    }
}
