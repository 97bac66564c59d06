use serde::{Deserialize, Serialize};

use super::defaults;

/// Remote classifier endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Classification endpoint URL.
    pub endpoint: String,
    /// Bearer token sent with each request, when the endpoint requires one.
    pub api_key: Option<String>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::DEFAULT_REMOTE_ENDPOINT.to_string(),
            api_key: None,
        }
    }
}
