//! Runs a selection step on its own task.
//!
//! The task owns the step and its delivery receiver and processes one input
//! at a time: a UI command from a [`StepHandle`] or a fetch result from the
//! transport. Signals go to the parent channel as [`StepMessage`]s, and the
//! step's view is published on a watch channel after every input.

use common::Identified;
use pagination::{DeliveryReceiver, PageSnapshot, PartialRequest};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::error::{Result, WizardError};
use crate::signal::{StepMessage, StepSignal};
use crate::state::SelectionState;
use crate::step::{SelectionStep, StepEvent};

/// Owned view of a running step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepSnapshot<T> {
    pub state: SelectionState,
    /// True once the first page has loaded.
    pub ready: bool,
    /// The latest pagination view. Frozen once the step is done.
    pub page: PageSnapshot<T>,
    pub selected_id: Option<String>,
}

impl<T> StepSnapshot<T> {
    pub fn is_done(&self) -> bool {
        self.state.is_terminal()
    }
}

impl<T> Default for StepSnapshot<T> {
    fn default() -> Self {
        Self {
            state: SelectionState::Verify,
            ready: false,
            page: PageSnapshot::default(),
            selected_id: None,
        }
    }
}

/// Sends commands to a step task and observes its view.
pub struct StepHandle<T, S = (), O = ()> {
    name: &'static str,
    commands: mpsc::UnboundedSender<StepEvent<S, O>>,
    snapshots: watch::Receiver<StepSnapshot<T>>,
}

impl<T, S, O> Clone for StepHandle<T, S, O> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            commands: self.commands.clone(),
            snapshots: self.snapshots.clone(),
        }
    }
}

impl<T: Clone, S, O> StepHandle<T, S, O> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Queues a command for the step.
    ///
    /// Fails once the step task has finished.
    pub fn send(&self, event: StepEvent<S, O>) -> Result<()> {
        self.commands
            .send(event)
            .map_err(|_| WizardError::StepStopped(self.name.to_string()))
    }

    pub fn select_item(&self, id: impl Into<String>) -> Result<()> {
        self.send(StepEvent::SelectItem(id.into()))
    }

    pub fn deselect_item(&self) -> Result<()> {
        self.send(StepEvent::DeselectItem)
    }

    pub fn confirm(&self) -> Result<()> {
        self.send(StepEvent::Confirm)
    }

    pub fn query(&self, partial: PartialRequest<S, O>) -> Result<()> {
        self.send(StepEvent::Query(partial))
    }

    /// Returns the latest published view.
    pub fn snapshot(&self) -> StepSnapshot<T> {
        self.snapshots.borrow().clone()
    }

    /// Subscribes to view updates.
    pub fn subscribe(&self) -> watch::Receiver<StepSnapshot<T>> {
        self.snapshots.clone()
    }

    /// Waits until the published view satisfies `predicate`.
    ///
    /// Fails if the step task finishes without ever satisfying it.
    pub async fn wait_for(
        &self,
        predicate: impl FnMut(&StepSnapshot<T>) -> bool,
    ) -> Result<StepSnapshot<T>> {
        let mut snapshots = self.snapshots.clone();
        snapshots
            .wait_for(predicate)
            .await
            .map(|snapshot| snapshot.clone())
            .map_err(|_| WizardError::StepStopped(self.name.to_string()))
    }
}

/// Starts `step` on a new task.
///
/// `deliveries` must be the receiver paired with the step's fetch engine.
/// The task stops when the step is done or every handle is dropped.
pub fn spawn_step<T, S, O>(
    step: SelectionStep<T, S, O>,
    deliveries: DeliveryReceiver<T>,
    parent: mpsc::UnboundedSender<StepMessage<T>>,
) -> (StepHandle<T, S, O>, JoinHandle<()>)
where
    T: Identified + Clone + Send + Sync + 'static,
    S: Clone + Send + 'static,
    O: Clone + Send + 'static,
{
    let name = step.name();
    let (commands, inbox) = mpsc::unbounded_channel();
    let (publisher, snapshots) = watch::channel(StepSnapshot::default());

    let task = tokio::spawn(run_step(step, inbox, deliveries, parent, publisher));

    let handle = StepHandle {
        name,
        commands,
        snapshots,
    };
    (handle, task)
}

async fn run_step<T, S, O>(
    mut step: SelectionStep<T, S, O>,
    mut inbox: mpsc::UnboundedReceiver<StepEvent<S, O>>,
    mut deliveries: DeliveryReceiver<T>,
    parent: mpsc::UnboundedSender<StepMessage<T>>,
    publisher: watch::Sender<StepSnapshot<T>>,
) where
    T: Identified + Clone,
    S: Clone,
    O: Clone,
{
    let name = step.name();
    tracing::info!(step = name, step_id = %step.id(), "step task started");

    let signals = step.start();
    forward(&parent, name, signals);
    publish(&mut step, &publisher);

    while !step.is_done() {
        tokio::select! {
            command = inbox.recv() => match command {
                Some(event) => {
                    let signals = step.send(event);
                    forward(&parent, name, signals);
                }
                None => {
                    tracing::debug!(step = name, "all handles dropped");
                    break;
                }
            },
            Some(delivery) = deliveries.recv() => {
                step.deliver(delivery);
            }
        }
        publish(&mut step, &publisher);
    }

    tracing::info!(step = name, state = %step.state(), "step task finished");
}

fn forward<T>(
    parent: &mpsc::UnboundedSender<StepMessage<T>>,
    step: &'static str,
    signals: Vec<StepSignal<T>>,
) {
    for signal in signals {
        if parent.send(StepMessage::new(step, signal)).is_err() {
            tracing::debug!(step, "parent gone, signal dropped");
        }
    }
}

fn publish<T, S, O>(
    step: &mut SelectionStep<T, S, O>,
    publisher: &watch::Sender<StepSnapshot<T>>,
) where
    T: Identified + Clone,
    S: Clone,
    O: Clone,
{
    let page = match step.pagination() {
        Some(view) => view.snapshot(),
        None => publisher.borrow().page.clone(),
    };
    let snapshot = StepSnapshot {
        state: step.state(),
        ready: step.is_ready(),
        page,
        selected_id: step.selected_id().map(str::to_owned),
    };
    publisher.send_replace(snapshot);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::context::SelectionContext;
    use common::{AuthContext, ConnectorCluster, StaticTokenProvider};
    use pagination::{ManualFetcher, Page, delivery_channel};

    fn spawn_manual() -> (
        StepHandle<ConnectorCluster>,
        ManualFetcher<ConnectorCluster>,
        mpsc::UnboundedReceiver<StepMessage<ConnectorCluster>>,
        JoinHandle<()>,
    ) {
        let fetcher = ManualFetcher::new();
        let (sink, deliveries) = delivery_channel();
        let auth = AuthContext::new(StaticTokenProvider::new("t"), "/");
        let context = SelectionContext::new(auth);
        let step = SelectionStep::new("clusters", context, Arc::new(fetcher.clone()), sink);
        let (parent, messages) = mpsc::unbounded_channel();
        let (handle, task) = spawn_step(step, deliveries, parent);
        (handle, fetcher, messages, task)
    }

    fn page(ids: &[&str]) -> Page<ConnectorCluster> {
        let items: Vec<_> = ids.iter().map(|id| ConnectorCluster::new(*id, *id)).collect();
        let total = items.len() as u64;
        Page::new(items, total, 1, 20)
    }

    #[tokio::test]
    async fn test_start_signals_parent() {
        let (_handle, _fetcher, mut messages, _task) = spawn_manual();

        let message = messages.recv().await.unwrap();

        assert_eq!(message, StepMessage::new("clusters", StepSignal::IsInvalid));
    }

    #[tokio::test]
    async fn test_snapshot_tracks_loading() {
        let (handle, fetcher, _messages, _task) = spawn_manual();

        let loading = handle.wait_for(|s| s.page.loading).await.unwrap();
        assert!(loading.page.first_request);

        fetcher.succeed_latest(page(&["a", "b"]));
        let ready = handle.wait_for(|s| s.ready).await.unwrap();

        assert!(!ready.page.loading);
        assert_eq!(ready.page.total, 2);
        assert_eq!(ready.state, SelectionState::Selecting);
    }

    #[tokio::test]
    async fn test_confirm_finishes_task() {
        let (handle, fetcher, mut messages, task) = spawn_manual();
        handle.wait_for(|s| s.page.loading).await.unwrap();
        fetcher.succeed_latest(page(&["a"]));
        handle.wait_for(|s| s.ready).await.unwrap();

        handle.select_item("a").unwrap();
        handle.confirm().unwrap();
        task.await.unwrap();

        let signals: Vec<_> = std::iter::from_fn(|| messages.try_recv().ok())
            .map(|m| m.signal)
            .collect();
        assert_eq!(
            signals,
            vec![
                StepSignal::IsInvalid,
                StepSignal::IsValid,
                StepSignal::Done(ConnectorCluster::new("a", "a")),
            ]
        );

        let last = handle.snapshot();
        assert!(last.is_done());
        assert_eq!(last.selected_id.as_deref(), Some("a"));
        assert_eq!(last.page.total, 1);
        assert!(matches!(handle.confirm(), Err(WizardError::StepStopped(_))));
    }

    #[tokio::test]
    async fn test_wait_for_fails_after_task_stops() {
        let (handle, _fetcher, _messages, task) = spawn_manual();

        task.abort();
        let _ = task.await;

        let result = handle.wait_for(|s| s.is_done()).await;
        assert!(matches!(result, Err(WizardError::StepStopped(_))));
    }

    #[tokio::test]
    async fn test_query_through_handle() {
        let (handle, fetcher, _messages, _task) = spawn_manual();
        handle.wait_for(|s| s.page.loading).await.unwrap();

        handle.query(PartialRequest::new().page(3)).unwrap();
        handle.wait_for(|s| s.page.page == 3).await.unwrap();

        assert_eq!(fetcher.call_count(), 2);
        assert!(fetcher.is_cancelled(0));
    }
}
