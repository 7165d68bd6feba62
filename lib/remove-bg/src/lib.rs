#[macro_use]
extern crate derivative;

mod client;
mod request;
mod response;

pub use client::{BackgroundRemover, ProcessedImage, RemoveBg};
pub use request::{API_KEY_ENV, ApiConfig, Credential, DEFAULT_API_BASE_URL};
pub use response::first_error_title;

pub type Result<T> = std::result::Result<T, Error>;

/// Message used when the upstream failure body carries no usable title.
pub const GENERIC_FAILURE: &str = "Failed to remove background";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("upstream returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("upstream timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Request Error {0}")]
    Request(#[from] reqwest::Error),
}
