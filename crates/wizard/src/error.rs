//! Wizard error types.

use common::AuthError;
use pagination::PaginationError;
use thiserror::Error;

/// Errors that can occur while running wizard steps.
///
/// Selection misses and transport failures are not errors: the first is
/// "nothing selected", the second is a fetch outcome.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WizardError {
    /// The clusters API failed.
    #[error("Clusters API error: {0}")]
    ClustersApi(String),

    /// No access token could be obtained.
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// A fetch request was rejected.
    #[error("Pagination error: {0}")]
    Pagination(#[from] PaginationError),

    /// A fetcher was created outside a tokio runtime.
    #[error("No tokio runtime available to run fetches on")]
    NoRuntime,

    /// The step's task has finished and accepts no more commands.
    #[error("Step '{0}' is no longer running")]
    StepStopped(String),

    /// The current step has not reported a valid selection.
    #[error("Step '{step}' is not valid")]
    StepInvalid { step: String },

    /// A signal or command named a step the wizard does not have.
    #[error("Unknown step: {0}")]
    UnknownStep(String),

    /// Every step has already completed.
    #[error("Wizard is already complete")]
    WizardComplete,
}

/// Convenience type alias for wizard results.
pub type Result<T> = std::result::Result<T, WizardError>;
