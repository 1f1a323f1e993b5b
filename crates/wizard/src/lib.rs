//! Wizard step coordinators for the connector creation flow.
//!
//! A wizard step is a parallel state machine with two regions:
//! - the `api` region owns a [`pagination::FetchEngine`] and loads the
//!   first page as soon as the step starts;
//! - the `selection` region tracks which listed item the user picked and
//!   reports validity to the enclosing wizard.
//!
//! [`SelectionStep`] implements the pattern generically; the cluster step
//! in [`clusters`] is the representative instantiation. [`spawn_step`] runs
//! a step on its own task, and [`WizardCoordinator`] sequences steps by the
//! signals they emit.

pub mod clusters;
pub mod context;
pub mod coordinator;
pub mod error;
pub mod guards;
pub mod runtime;
pub mod services;
pub mod signal;
pub mod state;
pub mod step;

pub use clusters::{CLUSTERS_STEP, ClusterFetcher, ClustersStep, clusters_step};
pub use context::SelectionContext;
pub use coordinator::{StepCompletion, StepValidity, WizardCoordinator};
pub use error::WizardError;
pub use runtime::{StepHandle, StepSnapshot, spawn_step};
pub use services::{ClustersApi, InMemoryClustersApi};
pub use signal::{StepMessage, StepSignal};
pub use state::{ApiRegion, SelectionState};
pub use step::{SelectionStep, StepEvent};
