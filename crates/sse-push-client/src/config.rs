//! Client configuration

use serde::{Deserialize, Serialize};

use crate::connection::Credentials;
use crate::error::Result;

/// Environment variable holding the push server URI
pub const ENV_URI: &str = "SSE_PUSH_URI";
/// Environment variable holding the Basic-Auth username
pub const ENV_USERNAME: &str = "SSE_PUSH_USERNAME";
/// Environment variable holding the Basic-Auth password
pub const ENV_PASSWORD: &str = "SSE_PUSH_PASSWORD";

/// Connection settings for a [`Client`](crate::Client)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Push server URI, e.g. "https://push.example.com/events"
    #[serde(default)]
    pub uri: Option<String>,
    /// Basic-Auth username, leave both unset to connect anonymously
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
}

impl ClientConfig {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: Some(uri.into()),
            ..Default::default()
        }
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Load settings from `SSE_PUSH_URI`, `SSE_PUSH_USERNAME` and `SSE_PUSH_PASSWORD`
    ///
    /// Empty variables count as unset. Nothing is validated here; an absent
    /// URI is reported when the client is built.
    pub fn from_env() -> Self {
        Self::default().merge_env()
    }

    /// Override fields with the environment variables that are set
    pub fn merge_env(self) -> Self {
        self.merge_with(|key| std::env::var(key).ok())
    }

    fn merge_with(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(uri) = var(ENV_URI) {
            self.uri = Some(uri);
        }
        if let Some(username) = var(ENV_USERNAME) {
            self.username = Some(username);
        }
        if let Some(password) = var(ENV_PASSWORD) {
            self.password = Some(password);
        }
        self
    }

    /// Validated credentials, `None` when no authentication is configured
    pub fn credentials(&self) -> Result<Option<Credentials>> {
        Credentials::from_parts(self.username.as_deref(), self.password.as_deref())
    }
}
