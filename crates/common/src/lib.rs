//! Shared types for the connector console orchestration core.
//!
//! Holds the pieces every layer agrees on: step identifiers, the
//! [`Identified`] contract selection relies on, the cluster resource the
//! representative wizard step lists, and the explicitly constructed
//! authentication context threaded down to fetch callbacks.

pub mod auth;
pub mod types;

pub use auth::{AuthContext, AuthError, StaticTokenProvider, TokenProvider};
pub use types::{ClusterStatus, ConnectorCluster, Identified, StepId};
