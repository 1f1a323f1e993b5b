//! Remote API traits and in-memory implementations for wizard steps.

pub mod clusters;

pub use clusters::{ClustersApi, InMemoryClustersApi};
