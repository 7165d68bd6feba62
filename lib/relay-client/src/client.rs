use crate::{InvokeError, Result, SelectedFile};
use derive_setters::Setters;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

#[non_exhaustive]
#[derive(Debug, Clone, Setters, Derivative)]
#[derivative(Default)]
#[setters[prefix = "with_"]]
pub struct ClientConfig {
    #[derivative(Default(value = "\"http://127.0.0.1:8000/remove-bg\".to_string()"))]
    pub relay_url: String,

    #[derivative(Default(value = "Duration::from_secs(60)"))]
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalResult {
    pub result_url: String,
    pub original_url: String,
}

impl RemovalResult {
    pub fn processed_bytes(&self) -> Result<Vec<u8>> {
        data_url::decode(&self.result_url).map_err(|e| InvokeError::InvalidResponse(e.to_string()))
    }
}

/// Ticket tying an in-flight call to the selection that started it.
#[derive(Debug, Clone)]
pub struct Selection {
    id: u64,
    generation: Arc<AtomicU64>,
}

impl Selection {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_current(&self) -> bool {
        self.generation.load(Ordering::SeqCst) == self.id
    }
}

#[derive(Serialize)]
struct RelayRequest<'a> {
    image: &'a str,
}

#[derive(Deserialize)]
struct RelaySuccess {
    #[serde(rename = "resultUrl")]
    result_url: String,
}

#[derive(Deserialize)]
struct RelayFailure {
    error: String,
}

#[derive(Debug, Clone)]
pub struct RelayClient {
    config: ClientConfig,
    client: Client,
    generation: Arc<AtomicU64>,
}

impl RelayClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| InvokeError::Transport(e.to_string()))?;

        Ok(Self {
            config,
            client,
            generation: Arc::new(AtomicU64::new(0)),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Starts a new selection, superseding every earlier one.
    pub fn select(&self) -> Selection {
        let id = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        Selection {
            id,
            generation: self.generation.clone(),
        }
    }

    /// Validates `file`, sends it through the relay and returns both image
    /// references. Results of calls overtaken by a newer selection come back
    /// as [`InvokeError::Superseded`].
    pub async fn remove_background(&self, file: &SelectedFile) -> Result<RemovalResult> {
        file.validate()?;

        let selection = self.select();
        let outcome = self.invoke(file).await;

        if !selection.is_current() {
            log::info!(
                "discarding result of superseded selection {} ({})",
                selection.id(),
                file.name
            );
            return Err(InvokeError::Superseded);
        }

        if let Err(e) = &outcome {
            log::warn!("Error removing background: {e}");
        }

        outcome
    }

    async fn invoke(&self, file: &SelectedFile) -> Result<RemovalResult> {
        let original_url = file.to_data_url();

        let response = self
            .client
            .post(&self.config.relay_url)
            .json(&RelayRequest {
                image: &original_url,
            })
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(transport_error)?;

        if !status.is_success() {
            let message = serde_json::from_slice::<RelayFailure>(&body)
                .ok()
                .map(|failure| failure.error)
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| format!("Background removal failed ({status})"));

            return Err(InvokeError::Relay {
                status: status.as_u16(),
                message,
            });
        }

        let success = serde_json::from_slice::<RelaySuccess>(&body)
            .map_err(|e| InvokeError::InvalidResponse(e.to_string()))?;

        Ok(RemovalResult {
            result_url: success.result_url,
            original_url,
        })
    }
}

fn transport_error(e: reqwest::Error) -> InvokeError {
    if e.is_timeout() {
        InvokeError::Transport("request timed out".to_string())
    } else {
        InvokeError::Transport(e.without_url().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_selection_supersedes() {
        let client = RelayClient::new(ClientConfig::default()).unwrap();

        let first = client.select();
        assert!(first.is_current());

        let second = client.select();
        assert!(!first.is_current());
        assert!(second.is_current());
        assert!(second.id() > first.id());
    }

    #[test]
    fn test_clones_share_selections() {
        let client = RelayClient::new(ClientConfig::default()).unwrap();
        let other = client.clone();

        let first = client.select();
        other.select();
        assert!(!first.is_current());
    }

    #[test]
    fn test_processed_bytes() {
        let result = RemovalResult {
            result_url: data_url::encode(b"png", "image/png"),
            original_url: String::new(),
        };
        assert_eq!(result.processed_bytes().unwrap(), b"png");

        let result = RemovalResult {
            result_url: "nonsense".to_string(),
            original_url: String::new(),
        };
        assert!(matches!(
            result.processed_bytes(),
            Err(InvokeError::InvalidResponse(_))
        ));
    }
}
