//! Console configuration loaded from environment variables.

use common::{AuthContext, StaticTokenProvider};
use pagination::{DEFAULT_PAGE_SIZE, FetchRequest};

/// Console configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `BASE_PATH`: connector API base path (default: `"http://localhost:8000"`)
/// - `PAGE_SIZE`: items per listing page (default: `20`)
/// - `ACCESS_TOKEN`: static bearer token (default: none)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
#[derive(Debug, Clone)]
pub struct Config {
    pub base_path: String,
    pub page_size: u32,
    pub access_token: Option<String>,
    pub log_level: String,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            base_path: lookup("BASE_PATH").unwrap_or(defaults.base_path),
            page_size: lookup("PAGE_SIZE")
                .and_then(|s| s.parse().ok())
                .filter(|size| *size > 0)
                .unwrap_or(defaults.page_size),
            access_token: lookup("ACCESS_TOKEN").filter(|token| !token.is_empty()),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
        }
    }

    /// Builds the auth context every step is constructed with.
    ///
    /// Without a token, every fetch fails with a missing-token error.
    pub fn auth_context(&self) -> AuthContext {
        let provider = match &self.access_token {
            Some(token) => StaticTokenProvider::new(token.clone()),
            None => StaticTokenProvider::anonymous(),
        };
        AuthContext::new(provider, self.base_path.clone())
    }

    /// Returns the request listings start with.
    pub fn initial_request(&self) -> FetchRequest {
        FetchRequest::new(1, self.page_size)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_path: "http://localhost:8000".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            access_token: None,
            log_level: "info".to_string(),
        }
    }
}
