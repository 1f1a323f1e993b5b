//! Generic selection step coordinator.

use std::sync::Arc;

use common::{Identified, StepId};
use pagination::{
    Delivery, DeliverySender, EngineSignal, FetchCallback, FetchEngine, FetchRequest, Pagination,
    PartialRequest,
};

use crate::context::SelectionContext;
use crate::guards;
use crate::signal::StepSignal;
use crate::state::{ApiRegion, SelectionState};

/// Commands a selection step accepts from the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepEvent<S = (), O = ()> {
    /// Fetch a page; unset fields keep their current value.
    Query(PartialRequest<S, O>),
    /// Select the listed item with this id.
    SelectItem(String),
    /// Drop the current selection.
    DeselectItem,
    /// Confirm the current selection and finish the step.
    Confirm,
}

impl<S, O> StepEvent<S, O> {
    /// Returns the event name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepEvent::Query(_) => "query",
            StepEvent::SelectItem(_) => "selectItem",
            StepEvent::DeselectItem => "deselectItem",
            StepEvent::Confirm => "confirm",
        }
    }
}

/// A wizard step that lists remote items and lets the user pick one.
///
/// The step runs two regions side by side. The api region owns the fetch
/// engine: it requests the first page on [`start`](Self::start) and becomes
/// ready once a page arrives. The selection region validates the user's
/// pick against the latest page and reports validity through the signals
/// each transition returns.
///
/// Events that do not apply to the current state are ignored.
pub struct SelectionStep<T, S = (), O = ()> {
    id: StepId,
    name: &'static str,
    context: SelectionContext<T>,
    state: SelectionState,
    api: ApiRegion,
    engine: Option<FetchEngine<T, S, O>>,
    initial_request: FetchRequest<S, O>,
    started: bool,
}

impl<T, S, O> SelectionStep<T, S, O>
where
    T: Identified + Clone,
    S: Clone,
    O: Clone,
{
    /// Creates a step whose engine fetches through `callback` and reports
    /// results on `sink`.
    pub fn new(
        name: &'static str,
        context: SelectionContext<T>,
        callback: Arc<dyn FetchCallback<T, S, O>>,
        sink: DeliverySender<T>,
    ) -> Self {
        Self {
            id: StepId::new(),
            name,
            context,
            state: SelectionState::Verify,
            api: ApiRegion::Idle,
            engine: Some(FetchEngine::new(callback, sink)),
            initial_request: FetchRequest::default(),
            started: false,
        }
    }

    /// Sets the request issued when the step starts.
    pub fn with_initial_request(mut self, request: FetchRequest<S, O>) -> Self {
        self.initial_request = request;
        self
    }

    /// Enters both regions: requests the first page and routes the
    /// selection region out of `Verify`.
    ///
    /// Returns the signals emitted on entry. Starting twice does nothing.
    #[tracing::instrument(skip(self), fields(step = self.name, step_id = %self.id))]
    pub fn start(&mut self) -> Vec<StepSignal<T>> {
        if self.started {
            return Vec::new();
        }
        self.started = true;

        let request = self.initial_request.clone();
        if let Some(engine) = self.engine.as_mut() {
            if let Err(e) = engine.query(request) {
                tracing::warn!(error = %e, "initial request rejected");
            }
        }

        let mut signals = Vec::new();
        self.verify(&mut signals);
        signals
    }

    /// Handles a UI command and returns the signals it produced.
    ///
    /// Commands sent before [`start`](Self::start) are ignored.
    #[tracing::instrument(
        skip(self, event),
        fields(step = self.name, state = %self.state, event = event.as_str())
    )]
    pub fn send(&mut self, event: StepEvent<S, O>) -> Vec<StepSignal<T>> {
        let mut signals = Vec::new();
        if !self.started {
            tracing::debug!("step not started, event ignored");
            return signals;
        }

        match (self.state, event) {
            (SelectionState::Done, event) => {
                tracing::debug!(event = event.as_str(), "step is done, event ignored");
            }
            (_, StepEvent::Query(partial)) => self.forward_query(partial),
            (SelectionState::Selecting, StepEvent::SelectItem(id)) => {
                self.select(&id, &mut signals);
            }
            (SelectionState::Valid, StepEvent::SelectItem(id))
                if guards::has_explicit_id(&id) =>
            {
                self.select(&id, &mut signals);
            }
            (SelectionState::Valid, StepEvent::DeselectItem) => {
                self.context = guards::clear_selection(self.take_context());
                self.verify(&mut signals);
            }
            (SelectionState::Valid, StepEvent::Confirm)
                if guards::item_selected(&self.context) =>
            {
                self.finish(&mut signals);
            }
            (state, event) => {
                tracing::trace!(%state, event = event.as_str(), "event not handled in state");
            }
        }

        signals
    }

    /// Applies a fetch result delivered for this step's engine.
    ///
    /// Returns true if the result was current and applied. Results never
    /// produce parent signals: fetch failures stop at the pagination view.
    pub fn deliver(&mut self, delivery: Delivery<T>) -> bool {
        let Some(engine) = self.engine.as_mut() else {
            tracing::debug!(step = self.name, "delivery after step finished, ignored");
            return false;
        };

        match engine.deliver(delivery) {
            Some(EngineSignal::Success(page)) => {
                self.context = guards::store_response(self.take_context(), page);
                if self.api == ApiRegion::Idle {
                    self.api = ApiRegion::Ready;
                    tracing::info!(step = self.name, "first page loaded, step ready");
                }
                true
            }
            Some(EngineSignal::Failure(failure)) => {
                self.context = guards::store_error(self.take_context(), failure.error);
                true
            }
            None => false,
        }
    }

    pub fn select_item(&mut self, id: impl Into<String>) -> Vec<StepSignal<T>> {
        self.send(StepEvent::SelectItem(id.into()))
    }

    pub fn deselect_item(&mut self) -> Vec<StepSignal<T>> {
        self.send(StepEvent::DeselectItem)
    }

    pub fn confirm(&mut self) -> Vec<StepSignal<T>> {
        self.send(StepEvent::Confirm)
    }

    pub fn query(&mut self, partial: PartialRequest<S, O>) -> Vec<StepSignal<T>> {
        self.send(StepEvent::Query(partial))
    }

    /// Returns the pagination view over the step's engine, until the step
    /// is done.
    pub fn pagination(&mut self) -> Option<Pagination<'_, T, S, O>> {
        self.engine.as_mut().map(FetchEngine::pagination)
    }

    fn forward_query(&mut self, partial: PartialRequest<S, O>) {
        if let Some(engine) = self.engine.as_mut() {
            if let Err(e) = engine.run_query(partial) {
                tracing::warn!(step = self.name, error = %e, "query rejected");
            }
        }
    }

    fn select(&mut self, id: &str, signals: &mut Vec<StepSignal<T>>) {
        self.context = guards::assign_selection(self.take_context(), id);
        if guards::no_item_selected(&self.context) {
            tracing::debug!(step = self.name, id, "selected id not in current page");
        }
        self.verify(signals);
    }

    /// Routes out of `Verify`. Entering either target emits its signal.
    fn verify(&mut self, signals: &mut Vec<StepSignal<T>>) {
        self.state = SelectionState::Verify;
        if guards::no_item_selected(&self.context) {
            self.enter(SelectionState::Selecting, signals);
        } else {
            self.enter(SelectionState::Valid, signals);
        }
    }

    fn enter(&mut self, state: SelectionState, signals: &mut Vec<StepSignal<T>>) {
        self.state = state;
        let signal = match state {
            SelectionState::Selecting => StepSignal::IsInvalid,
            SelectionState::Valid => StepSignal::IsValid,
            SelectionState::Done => match self.context.selected.clone() {
                Some(item) => StepSignal::Done(item),
                None => return,
            },
            SelectionState::Verify => return,
        };
        tracing::debug!(
            step = self.name,
            %state,
            signal = signal.signal_type(),
            "state entered"
        );
        metrics::counter!("wizard_signals_total", "signal" => signal.signal_type()).increment(1);
        signals.push(signal);
    }

    fn finish(&mut self, signals: &mut Vec<StepSignal<T>>) {
        self.enter(SelectionState::Done, signals);
        // The engine lives only as long as the step is active.
        self.engine = None;
        tracing::info!(
            step = self.name,
            selected = self.context.selected_id().unwrap_or_default(),
            "selection confirmed"
        );
    }

    fn take_context(&mut self) -> SelectionContext<T> {
        let empty = SelectionContext::new(self.context.auth.clone());
        std::mem::replace(&mut self.context, empty)
    }
}

impl<T, S, O> SelectionStep<T, S, O> {
    pub fn id(&self) -> StepId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn api_region(&self) -> ApiRegion {
        self.api
    }

    /// True once the first page has loaded.
    pub fn is_ready(&self) -> bool {
        self.api == ApiRegion::Ready
    }

    pub fn is_done(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn context(&self) -> &SelectionContext<T> {
        &self.context
    }

    pub fn selected(&self) -> Option<&T> {
        self.context.selected.as_ref()
    }

    /// The confirmed selection, once the step is done.
    pub fn output(&self) -> Option<&T> {
        if self.is_done() {
            self.context.selected.as_ref()
        } else {
            None
        }
    }

    /// The step's fetch engine, until the step is done.
    pub fn engine(&self) -> Option<&FetchEngine<T, S, O>> {
        self.engine.as_ref()
    }
}

impl<T: Identified, S, O> SelectionStep<T, S, O> {
    pub fn selected_id(&self) -> Option<&str> {
        self.context.selected_id()
    }
}
