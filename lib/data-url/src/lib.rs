//! Data URL codec used to carry image bytes inside JSON envelopes.
//!
//! The wire form is `data:<mime>;base64,<payload>`. Decoding only cares about
//! the first comma: everything before it is the header, everything after it is
//! standard-alphabet, padded base64.
//!
//! # Examples
//! ```
//! let url = data_url::encode(b"\x89PNG", "image/png");
//! assert_eq!(url, "data:image/png;base64,iVBORw==");
//! assert_eq!(data_url::decode(&url).unwrap(), b"\x89PNG");
//! ```

mod codec;

pub use codec::{DEFAULT_MIME, DataUrl, decode, decode_payload, encode};

pub type Result<T> = std::result::Result<T, CodecError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),
}
