//! Authentication context passed down to fetch callbacks.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised while acquiring an access token.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// No token is available (e.g. the session was never initialised).
    #[error("No access token available")]
    MissingToken,

    /// The identity provider refused or failed to issue a token.
    #[error("Token provider error: {0}")]
    Provider(String),
}

/// Source of access tokens.
///
/// The orchestration core never inspects tokens; it awaits them and hands
/// them to the transport.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Returns a currently valid access token.
    async fn access_token(&self) -> Result<String, AuthError>;
}

/// Token provider that always returns the same token.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenProvider {
    token: Option<String>,
}

impl StaticTokenProvider {
    /// Creates a provider that returns `token`.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    /// Creates a provider with no token; every request fails with
    /// [`AuthError::MissingToken`].
    pub fn anonymous() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String, AuthError> {
        self.token.clone().ok_or(AuthError::MissingToken)
    }
}

/// The token provider and API base path a step coordinator is built with.
///
/// Constructed once by the application and cloned into every coordinator.
/// Nothing in the core writes to it.
#[derive(Clone)]
pub struct AuthContext {
    provider: Arc<dyn TokenProvider>,
    base_path: String,
}

impl AuthContext {
    /// Creates a context from a token provider and an API base path.
    pub fn new(provider: impl TokenProvider + 'static, base_path: impl Into<String>) -> Self {
        Self {
            provider: Arc::new(provider),
            base_path: base_path.into(),
        }
    }

    /// Creates a context that shares an existing provider.
    pub fn from_shared(provider: Arc<dyn TokenProvider>, base_path: impl Into<String>) -> Self {
        Self {
            provider,
            base_path: base_path.into(),
        }
    }

    /// Returns the API base path.
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Awaits an access token from the provider.
    pub async fn access_token(&self) -> Result<String, AuthError> {
        self.provider.access_token().await
    }
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext")
            .field("base_path", &self.base_path)
            .finish_non_exhaustive()
    }
}
