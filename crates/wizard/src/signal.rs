//! Signals a step sends to its parent wizard.

use common::Identified;
use serde::{Deserialize, Serialize};

/// Notification from a step to the wizard that mounted it.
///
/// Every entry into `Selecting` produces one `IsInvalid`, every entry into
/// `Valid` one `IsValid`. Consecutive identical signals are possible and
/// must be treated as idempotent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum StepSignal<T> {
    /// The step holds a selection.
    IsValid,

    /// The step holds no selection.
    IsInvalid,

    /// The selection was confirmed; carries the selected item.
    Done(T),
}

impl<T> StepSignal<T> {
    /// Returns the signal type name.
    pub fn signal_type(&self) -> &'static str {
        match self {
            StepSignal::IsValid => "isValid",
            StepSignal::IsInvalid => "isInvalid",
            StepSignal::Done(_) => "done",
        }
    }

    /// Returns the confirmed item for a `Done` signal.
    pub fn output(&self) -> Option<&T> {
        match self {
            StepSignal::Done(item) => Some(item),
            _ => None,
        }
    }
}

impl<T: Identified> StepSignal<T> {
    /// Returns the identifier of the confirmed item for a `Done` signal.
    pub fn output_id(&self) -> Option<&str> {
        self.output().map(Identified::id)
    }
}

/// A signal tagged with the name of the step that emitted it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepMessage<T> {
    pub step: &'static str,
    pub signal: StepSignal<T>,
}

impl<T> StepMessage<T> {
    pub fn new(step: &'static str, signal: StepSignal<T>) -> Self {
        Self { step, signal }
    }
}
