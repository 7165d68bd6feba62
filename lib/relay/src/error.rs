use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// Failures reported to the caller as `{ "error": <message> }`.
///
/// Messages are written for end users. Transport details and the API key
/// never appear in them.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Server misconfigured: REMOVE_BG_API_KEY is not set")]
    MissingCredential,

    #[error("{message}")]
    UpstreamError { status: Option<u16>, message: String },

    #[error("Background removal timed out, please try again")]
    UpstreamTimeout,
}

impl RelayError {
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::MissingCredential | Self::UpstreamError { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    pub fn invalid_request(message: impl ToString) -> Self {
        Self::InvalidRequest(message.to_string())
    }
}

impl From<remove_bg::Error> for RelayError {
    fn from(e: remove_bg::Error) -> Self {
        match e {
            remove_bg::Error::Upstream { status, message } => Self::UpstreamError {
                status: Some(status),
                message,
            },
            remove_bg::Error::Timeout(_) => Self::UpstreamTimeout,
            remove_bg::Error::Request(e) => {
                log::warn!("remove.bg request failed: {e}");
                Self::UpstreamError {
                    status: None,
                    message: "Failed to reach the background removal service".to_string(),
                }
            }
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            RelayError::invalid_request("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RelayError::MissingCredential.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            RelayError::UpstreamError {
                status: Some(403),
                message: "Invalid API key".to_string()
            }
            .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            RelayError::UpstreamTimeout.status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
    }

    #[test]
    fn test_from_upstream_error() {
        let err = RelayError::from(remove_bg::Error::Upstream {
            status: 403,
            message: "Invalid API key".to_string(),
        });
        assert_eq!(err.to_string(), "Invalid API key");

        let err = RelayError::from(remove_bg::Error::Timeout(Duration::from_secs(30)));
        assert!(matches!(err, RelayError::UpstreamTimeout));
    }

    #[test]
    fn test_messages_are_not_empty() {
        for err in [
            RelayError::invalid_request("No image provided"),
            RelayError::MissingCredential,
            RelayError::UpstreamTimeout,
        ] {
            assert!(!err.to_string().trim().is_empty());
        }
    }
}
