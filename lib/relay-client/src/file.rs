use crate::Result;
use std::{fs, path::Path};

/// Largest image accepted before anything is sent to the relay.
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

const OCTET_STREAM: &str = "application/octet-stream";

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select an image file (JPEG, PNG, etc.)")]
    NotAnImage(String),

    #[error("Please select an image under 10MB")]
    TooLarge(usize),
}

/// An image picked by the user, held in memory for one removal.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl ToString, mime: impl ToString, bytes: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            mime: mime.to_string(),
            bytes,
        }
    }

    /// Reads `path` and sniffs its media type from the leading bytes.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let mime = infer::get(&bytes)
            .map(|kind| kind.mime_type())
            .unwrap_or(OCTET_STREAM);

        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("image")
            .to_string();

        log::debug!("selected {name}: {mime}, {} bytes", bytes.len());
        Ok(Self::new(name, mime, bytes))
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if !self.mime.starts_with("image/") {
            return Err(ValidationError::NotAnImage(self.mime.clone()));
        }

        if self.size() > MAX_FILE_SIZE {
            return Err(ValidationError::TooLarge(self.size()));
        }

        Ok(())
    }

    pub fn to_data_url(&self) -> String {
        data_url::encode(&self.bytes, &self.mime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_mime() {
        let file = SelectedFile::new("notes.txt", "text/plain", b"hello".to_vec());
        assert_eq!(
            file.validate(),
            Err(ValidationError::NotAnImage("text/plain".to_string()))
        );

        let file = SelectedFile::new("a.png", "image/png", vec![0; 16]);
        assert!(file.validate().is_ok());
    }

    #[test]
    fn test_validate_size() {
        let file = SelectedFile::new("big.jpg", "image/jpeg", vec![0; MAX_FILE_SIZE]);
        assert!(file.validate().is_ok());

        let file = SelectedFile::new("big.jpg", "image/jpeg", vec![0; MAX_FILE_SIZE + 1]);
        assert_eq!(
            file.validate(),
            Err(ValidationError::TooLarge(MAX_FILE_SIZE + 1))
        );
    }

    #[test]
    fn test_data_url_is_lossless() {
        let file = SelectedFile::new("a.png", "image/png", vec![0, 1, 2, 254, 255]);
        assert_eq!(data_url::decode(&file.to_data_url()).unwrap(), file.bytes);
    }
}
