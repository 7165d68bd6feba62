use crate::RelayError;
use derive_setters::Setters;
use remove_bg::{ApiConfig, BackgroundRemover, Credential, RemoveBg};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

const NO_IMAGE: &str = "No image provided";

#[non_exhaustive]
#[derive(Debug, Clone, Setters, Derivative)]
#[derivative(Default)]
#[setters[prefix = "with_"]]
pub struct RelayConfig {
    pub credential: Option<Credential>,

    // base64 inflates a 10MB image to ~13.4MB
    #[derivative(Default(value = "16 * 1024 * 1024"))]
    pub max_body_bytes: usize,
}

impl RelayConfig {
    pub fn new(credential: Option<Credential>) -> Self {
        Self {
            credential,
            ..Default::default()
        }
    }

    pub fn from_env() -> Self {
        Self::new(Credential::from_env())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RelayRequest {
    pub image: String,
}

impl RelayRequest {
    pub fn from_slice(body: &[u8]) -> Result<Self, RelayError> {
        let value = serde_json::from_slice::<Value>(body)
            .map_err(|_| RelayError::invalid_request("Request body must be a JSON object"))?;

        match value.get("image") {
            Some(Value::String(image)) if !image.trim().is_empty() => Ok(Self {
                image: image.clone(),
            }),
            Some(Value::String(_)) | Some(Value::Null) | None => {
                Err(RelayError::invalid_request(NO_IMAGE))
            }
            Some(_) => Err(RelayError::invalid_request(
                "Field `image` must be a data URL or base64 string",
            )),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RelayResponse {
    #[serde(rename = "resultUrl")]
    pub result_url: String,
}

pub struct Relay {
    config: RelayConfig,
    remover: Arc<dyn BackgroundRemover>,
}

impl Relay {
    pub fn new(config: RelayConfig, remover: Arc<dyn BackgroundRemover>) -> Self {
        Self { config, remover }
    }

    pub fn with_api(config: RelayConfig, api: ApiConfig) -> Result<Self, remove_bg::Error> {
        Ok(Self::new(config, Arc::new(RemoveBg::new(api)?)))
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    pub async fn handle(&self, body: &[u8]) -> Result<RelayResponse, RelayError> {
        let credential = self
            .config
            .credential
            .as_ref()
            .ok_or(RelayError::MissingCredential)?;

        let request = RelayRequest::from_slice(body)?;
        let image = data_url::decode_payload(&request.image).map_err(|e| {
            log::debug!("rejecting envelope: {e}");
            RelayError::invalid_request("Image must be a valid base64 data URL")
        })?;

        if image.is_empty() {
            return Err(RelayError::invalid_request(NO_IMAGE));
        }

        let processed = self.remover.remove(credential, image).await?;

        Ok(RelayResponse {
            result_url: data_url::encode(&processed.bytes, &processed.mime),
        })
    }
}
