//! Server-side relay between the browser and remove.bg.
//!
//! The relay accepts `{ "image": "<data-url-or-base64>" }`, forwards the
//! decoded bytes to the upstream API with a server-held key and answers
//! `{ "resultUrl": "<data-url>" }` or `{ "error": "<message>" }`. Every
//! response carries permissive CORS headers because the endpoint is called
//! cross-origin.

#[macro_use]
extern crate derivative;

pub mod error;
pub mod relay;
pub mod router;
pub mod server;

pub use error::{ErrorBody, RelayError};
pub use relay::{Relay, RelayConfig, RelayRequest, RelayResponse};
pub use router::{ALLOW_HEADERS, ALLOW_METHODS, ALLOW_ORIGIN, router};
pub use server::{RelayServer, RelayServerConfig};

pub use remove_bg::{ApiConfig, BackgroundRemover, Credential, ProcessedImage};

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),

    #[error("Addr parse error: {0}")]
    AddrParseError(#[from] std::net::AddrParseError),
}
