//! Selection step state machine.

use serde::{Deserialize, Serialize};

/// The state of a step's selection region.
///
/// State transitions:
/// ```text
///           ┌──► Selecting ──┐ select
/// Verify ───┤                ├──────────────► Verify
///           └──► Valid ──────┘ select / deselect
///                  │
///                  └── confirm ──► Done
/// ```
///
/// A step sits in `Verify` until it is started and ignores every event
/// there. After that `Verify` is transient: it routes to `Selecting` or
/// `Valid` in the same transition and is never observed at rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SelectionState {
    /// Checking whether an item is selected.
    #[default]
    Verify,

    /// Nothing is selected; the step is invalid.
    Selecting,

    /// An item is selected; the step is valid.
    Valid,

    /// The selection was confirmed (terminal state).
    Done,
}

impl SelectionState {
    /// Returns true if the state reacts to `SelectItem`.
    pub fn can_select(&self) -> bool {
        matches!(self, SelectionState::Selecting | SelectionState::Valid)
    }

    /// Returns true if the state reacts to `DeselectItem` and `Confirm`.
    pub fn has_selection(&self) -> bool {
        matches!(self, SelectionState::Valid)
    }

    /// Returns true if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SelectionState::Done)
    }

    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionState::Verify => "verify",
            SelectionState::Selecting => "selecting",
            SelectionState::Valid => "valid",
            SelectionState::Done => "done",
        }
    }
}

impl std::fmt::Display for SelectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The state of a step's api region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ApiRegion {
    /// The first page has been requested but has not loaded yet.
    #[default]
    Idle,

    /// The engine reported a successful page at least once.
    Ready,
}

impl ApiRegion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiRegion::Idle => "idle",
            ApiRegion::Ready => "ready",
        }
    }
}

impl std::fmt::Display for ApiRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
