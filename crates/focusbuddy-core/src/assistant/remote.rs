//! JSON-over-HTTP assistant client.
//!
//! Endpoints, relative to the configured base URL:
//!
//! | Path              | Request                         | Response                  |
//! |-------------------|---------------------------------|---------------------------|
//! | `task-intent`     | `{prompt}`                      | `{tasks: [...]}`          |
//! | `bear-status`     | `{tasksSnapshot: [...]}`        | `{feelingSummary, buddyNote}` |
//! | `describe-image`  | `{mimeType, data}` (base64)     | `{description}`           |
//! | `generate-image`  | `{prompt, aspectRatio}`         | `{imageBytes}` (base64)   |
//!
//! Error responses carry `{error}`; a 422 from `task-intent` means the
//! prompt could not be interpreted.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use url::Url;

use super::{Assistant, AspectRatio, CheckInReply, IntentReply, TaskSnapshot};
use crate::error::AssistantError;
use crate::storage::AssistantConfig;

pub struct RemoteAssistant {
    base_url: Url,
    client: Client,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DescribeBody {
    #[serde(default)]
    description: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageBody {
    #[serde(default)]
    image_bytes: Option<String>,
}

impl RemoteAssistant {
    /// Build a client for `base_url`.
    ///
    /// # Errors
    ///
    /// Fails if the URL does not parse or the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AssistantError> {
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)
            .map_err(|e| AssistantError::Transport(format!("invalid base URL '{base_url}': {e}")))?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url, client })
    }

    /// Client from configuration; `NotConfigured` when no URL is set.
    pub fn from_config(config: &AssistantConfig) -> Result<Self, AssistantError> {
        let base_url = config
            .base_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or(AssistantError::NotConfigured)?;
        Self::new(base_url, Duration::from_secs(config.timeout_secs))
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<T, AssistantError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| AssistantError::Transport(e.to_string()))?;
        debug!(%url, "assistant request");

        let resp = self.client.post(url).json(&body).send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json::<T>().await?);
        }

        let message = resp
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|b| b.error)
            .unwrap_or_else(|| format!("HTTP {status}"));
        if status == StatusCode::UNPROCESSABLE_ENTITY {
            Err(AssistantError::Interpretation(message))
        } else {
            Err(AssistantError::Transport(format!("{message} (HTTP {status})")))
        }
    }
}

#[async_trait]
impl Assistant for RemoteAssistant {
    async fn propose_tasks(&self, prompt: &str) -> Result<IntentReply, AssistantError> {
        self.post("task-intent", json!({ "prompt": prompt })).await
    }

    async fn check_in(&self, snapshot: &[TaskSnapshot]) -> Result<CheckInReply, AssistantError> {
        self.post("bear-status", json!({ "tasksSnapshot": snapshot }))
            .await
    }

    async fn describe_image(&self, photo: &[u8], mime_type: &str) -> Result<String, AssistantError> {
        let body: DescribeBody = self
            .post(
                "describe-image",
                json!({ "mimeType": mime_type, "data": STANDARD.encode(photo) }),
            )
            .await?;
        Ok(body.description.unwrap_or_default())
    }

    async fn generate_image(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<Vec<u8>, AssistantError> {
        let body: ImageBody = self
            .post(
                "generate-image",
                json!({ "prompt": prompt, "aspectRatio": aspect_ratio }),
            )
            .await?;
        match body.image_bytes {
            Some(encoded) => STANDARD
                .decode(encoded.trim())
                .map_err(|e| AssistantError::Generation(format!("undecodable image: {e}"))),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_requires_base_url() {
        let config = AssistantConfig::default();
        assert!(matches!(
            RemoteAssistant::from_config(&config),
            Err(AssistantError::NotConfigured)
        ));
    }

    #[test]
    fn base_url_keeps_its_path() {
        let remote = RemoteAssistant::new("http://localhost:3000/api", Duration::from_secs(5)).unwrap();
        assert_eq!(
            remote.base_url.join("task-intent").unwrap().as_str(),
            "http://localhost:3000/api/task-intent"
        );
    }

    #[test]
    fn rejects_unparseable_base_url() {
        assert!(RemoteAssistant::new("not a url", Duration::from_secs(5)).is_err());
    }
}
