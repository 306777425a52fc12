//! Environment-sourced configuration for the chat-completion API.

use std::env;

/// Environment variable holding the API key.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
/// Environment variable holding the API base URL.
pub const BASE_URL_VAR: &str = "OPENAI_API_BASE_URL";
/// Environment variable holding the API version identifier.
pub const API_VERSION_VAR: &str = "OPENAI_API_VERSION";
/// Environment variable holding the deployment (model) identifier.
pub const DEPLOYMENT_VAR: &str = "OPENAI_API_DEPLOYMENT";

/// Connection settings for the remote summarization endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Secret sent in the `api-key` header.
    pub api_key: String,
    /// Base URL the deployment path is appended to.
    pub base_url: String,
    /// Value of the `api-version` query parameter.
    pub api_version: String,
    /// Deployment or model identifier.
    pub deployment: String,
}

impl ApiConfig {
    /// Loads the configuration from the process environment.
    ///
    /// `.env` files are loaded once in `main`, so values from them are
    /// visible here as ordinary variables.
    ///
    /// # Errors
    ///
    /// Returns an error naming every variable that is missing or empty.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Loads the configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error naming every variable that is missing or empty.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut get = |name: &'static str| match lookup(name) {
            Some(value) if !value.trim().is_empty() => value,
            _ => {
                missing.push(name);
                String::new()
            }
        };

        let api_key = get(API_KEY_VAR);
        let base_url = get(BASE_URL_VAR);
        let api_version = get(API_VERSION_VAR);
        let deployment = get(DEPLOYMENT_VAR);

        if !missing.is_empty() {
            return Err(format!("missing API configuration: {}", missing.join(", ")));
        }

        Ok(Self { api_key, base_url, api_version, deployment })
    }

    /// Builds the request URL: `{base}/{deployment}?api-version={version}`.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}?api-version={}",
            self.base_url.trim_end_matches('/'),
            self.deployment,
            self.api_version
        )
    }
}

// Keep the key out of logs.
impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("deployment", &self.deployment)
            .finish()
    }
}
