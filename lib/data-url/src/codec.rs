use crate::{CodecError, Result};
use base64::{Engine, engine::general_purpose::STANDARD};
use std::fmt;

/// Media type assumed when a data URL header names none (RFC 2397).
pub const DEFAULT_MIME: &str = "text/plain;charset=US-ASCII";

const SCHEME: &str = "data:";
const BASE64_TAG: &str = ";base64";

/// A decoded data URL: the declared media type plus the raw payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl DataUrl {
    pub fn new(mime: impl ToString, bytes: Vec<u8>) -> Self {
        Self {
            mime: mime.to_string(),
            bytes,
        }
    }

    pub fn parse(text: &str) -> Result<Self> {
        let (header, payload) = split_envelope(text)?;
        let bytes = decode_base64(payload)?;

        let media = header.strip_prefix(SCHEME).unwrap_or(header);
        let media = media.strip_suffix(BASE64_TAG).unwrap_or(media);
        let mime = if media.is_empty() {
            DEFAULT_MIME.to_string()
        } else {
            media.to_string()
        };

        Ok(Self { mime, bytes })
    }
}

impl fmt::Display for DataUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SCHEME}{}{BASE64_TAG},", self.mime)?;
        f.write_str(&STANDARD.encode(&self.bytes))
    }
}

pub fn encode(bytes: &[u8], mime: &str) -> String {
    format!("{SCHEME}{mime}{BASE64_TAG},{}", STANDARD.encode(bytes))
}

pub fn decode(text: &str) -> Result<Vec<u8>> {
    let (_, payload) = split_envelope(text)?;
    decode_base64(payload)
}

/// Accepts either a full data URL or a bare base64 payload.
pub fn decode_payload(text: &str) -> Result<Vec<u8>> {
    if text.contains(',') {
        decode(text)
    } else {
        decode_base64(text)
    }
}

fn split_envelope(text: &str) -> Result<(&str, &str)> {
    text.split_once(',').ok_or_else(|| {
        CodecError::MalformedEnvelope("missing comma separator".to_string())
    })
}

fn decode_base64(payload: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(payload)
        .map_err(|e| CodecError::MalformedEnvelope(format!("invalid base64 payload: {e}")))
}
