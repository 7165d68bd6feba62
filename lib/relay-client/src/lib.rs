#[macro_use]
extern crate derivative;

pub mod client;
pub mod file;

pub use client::{ClientConfig, RelayClient, RemovalResult, Selection};
pub use file::{MAX_FILE_SIZE, SelectedFile, ValidationError};

pub type Result<T> = std::result::Result<T, InvokeError>;

#[derive(thiserror::Error, Debug)]
pub enum InvokeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("relay returned {status}: {message}")]
    Relay { status: u16, message: String },

    #[error("relay request failed: {0}")]
    Transport(String),

    #[error("unexpected relay response: {0}")]
    InvalidResponse(String),

    #[error("result discarded: a newer image was selected")]
    Superseded,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl InvokeError {
    /// Message fit for showing to the end user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::Relay { message, .. } => message.clone(),
            Self::Transport(_) => "Could not reach the background removal service".to_string(),
            Self::InvalidResponse(_) => {
                "The background removal service returned an unexpected response".to_string()
            }
            Self::Superseded => "A newer image was selected".to_string(),
            Self::IoError(e) => format!("Could not read the selected file: {e}"),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
