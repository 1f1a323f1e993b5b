//! Fetch engine state machine.

use serde::{Deserialize, Serialize};

/// The state of a fetch engine.
///
/// State transitions:
/// ```text
///                 ┌──────────────────────────┐
///                 ▼                          │ query
/// Idle ──query──► Querying ──┬──► Success ───┤
///                  ▲  │      └──► Failure ───┘
///                  └──┘ query (supersedes)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum EngineState {
    /// No request has been issued yet.
    #[default]
    Idle,

    /// A request is in flight.
    Querying,

    /// The latest request succeeded.
    Success,

    /// The latest request failed.
    Failure,
}

impl EngineState {
    /// Returns the state after a `query` event. Every state accepts it.
    pub fn on_query(self) -> Self {
        EngineState::Querying
    }

    /// Returns the state after the current request resolved.
    ///
    /// Only `Querying` reacts; a resolution in any other state is stale and
    /// leaves the state unchanged.
    pub fn on_resolved(self, succeeded: bool) -> Self {
        match (self, succeeded) {
            (EngineState::Querying, true) => EngineState::Success,
            (EngineState::Querying, false) => EngineState::Failure,
            (state, _) => state,
        }
    }

    /// Returns true if a request is in flight.
    pub fn is_querying(&self) -> bool {
        matches!(self, EngineState::Querying)
    }

    /// Returns true once a request has succeeded or failed.
    pub fn is_settled(&self) -> bool {
        matches!(self, EngineState::Success | EngineState::Failure)
    }

    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineState::Idle => "idle",
            EngineState::Querying => "querying",
            EngineState::Success => "success",
            EngineState::Failure => "failure",
        }
    }
}

impl std::fmt::Display for EngineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
