//! Console error types.

use thiserror::Error;
use wizard::WizardError;

/// Errors that can end a console run.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// A wizard operation failed.
    #[error("Wizard error: {0}")]
    Wizard(#[from] WizardError),

    /// The cluster listing could not be loaded.
    #[error("Cluster listing failed: {0}")]
    Listing(String),

    /// The listing holds no cluster a connector can be deployed to.
    #[error("No ready cluster on page {page}")]
    NoReadyCluster { page: u32 },

    /// The step stopped without reporting a completion.
    #[error("Step '{0}' ended without a selection")]
    StepEnded(String),

    /// The step task panicked or was aborted.
    #[error("Step task failed: {0}")]
    Task(String),
}

/// Convenience type alias for console results.
pub type Result<T> = std::result::Result<T, ConsoleError>;
