//! HTTP client for the remote classifier endpoint.

use async_trait::async_trait;
use glint_core::config::RemoteConfig;
use glint_core::errors::{GlintResult, InferenceError};
use glint_core::models::{Classification, ClassifyInput};
use glint_core::traits::IClassifier;
use reqwest::StatusCode;
use tracing::debug;

use crate::protocol::ClassifyRequest;
use crate::protocol::ClassifyResponse;

/// One bare HTTP call per classify. No retries here; the resilience
/// wrapper owns those, so failures only need to land in the right
/// error class: server-side and transport trouble is transient,
/// request trouble is a rejection, a garbled body is a protocol error.
pub struct HttpClassifier {
    client: reqwest::Client,
    config: RemoteConfig,
}

impl HttpClassifier {
    pub fn new(config: RemoteConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Endpoint this client posts to.
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }
}

#[async_trait]
impl IClassifier for HttpClassifier {
    async fn classify(&self, input: &ClassifyInput) -> GlintResult<Classification> {
        let request = ClassifyRequest::new(input);
        debug!(
            request_id = %request.request_id,
            endpoint = %self.config.endpoint,
            "posting classify request"
        );

        let mut builder = self.client.post(&self.config.endpoint).json(&request);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| InferenceError::Transient {
            message: format!("classify request failed: {e}"),
        })?;

        let status = response.status();
        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(InferenceError::Transient {
                message: format!("classifier returned {status}"),
            }
            .into());
        }
        if status.is_client_error() {
            return Err(InferenceError::Rejected {
                message: format!("classifier returned {status}"),
            }
            .into());
        }

        let envelope: ClassifyResponse =
            response.json().await.map_err(|e| InferenceError::Protocol {
                message: format!("malformed classify response: {e}"),
            })?;

        Ok(envelope.into_classification()?)
    }

    fn name(&self) -> &str {
        "http"
    }
}
