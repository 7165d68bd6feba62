use crate::{ApiConfig, Credential, Error, GENERIC_FAILURE, Result, first_error_title};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{
    Client,
    header::CONTENT_TYPE,
    multipart::{Form, Part},
};

const DEFAULT_RESULT_MIME: &str = "image/png";
const LOG_BODY_LIMIT: usize = 256;

#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub bytes: Bytes,
    pub mime: String,
}

/// The external background-removal service.
#[async_trait]
pub trait BackgroundRemover: Send + Sync {
    async fn remove(&self, credential: &Credential, image: Vec<u8>) -> Result<ProcessedImage>;
}

#[derive(Debug, Clone)]
pub struct RemoveBg {
    config: ApiConfig,
    client: Client,
}

impl RemoveBg {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn form(&self, image: Vec<u8>) -> Form {
        let part = Part::bytes(image).file_name(self.config.file_name.clone());
        Form::new().part(self.config.file_field.clone(), part)
    }

    fn transport_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout(self.config.timeout)
        } else {
            Error::Request(e.without_url())
        }
    }
}

#[async_trait]
impl BackgroundRemover for RemoveBg {
    async fn remove(&self, credential: &Credential, image: Vec<u8>) -> Result<ProcessedImage> {
        let size = image.len();
        let response = self
            .client
            .post(self.config.endpoint())
            .header("X-Api-Key", credential.expose())
            .multipart(self.form(image))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let mime = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::trim)
            .filter(|v| v.starts_with("image/"))
            .unwrap_or(DEFAULT_RESULT_MIME)
            .to_string();

        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            log::warn!(
                "remove.bg failed with {status}: {}",
                truncate(&body, LOG_BODY_LIMIT)
            );

            let message = first_error_title(&body).unwrap_or_else(|| GENERIC_FAILURE.to_string());
            return Err(Error::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        log::debug!("remove.bg accepted {size} bytes, returned {} bytes", body.len());

        Ok(ProcessedImage { bytes: body, mime })
    }
}

fn truncate(body: &[u8], limit: usize) -> String {
    let text = String::from_utf8_lossy(body);
    if text.chars().count() <= limit {
        text.into_owned()
    } else {
        format!("{}...", text.chars().take(limit).collect::<String>())
    }
}
