use derive_setters::Setters;
use std::{fmt, time::Duration};

pub const DEFAULT_API_BASE_URL: &str = "https://api.remove.bg/v1.0";

/// Environment variable holding the remove.bg API key.
pub const API_KEY_ENV: &str = "REMOVE_BG_API_KEY";

#[non_exhaustive]
#[derive(Debug, Clone, Setters, Derivative)]
#[derivative(Default)]
#[setters[prefix = "with_"]]
pub struct ApiConfig {
    #[derivative(Default(value = "DEFAULT_API_BASE_URL.to_string()"))]
    pub api_base_url: String,

    #[derivative(Default(value = "Duration::from_secs(30)"))]
    pub timeout: Duration,

    // multipart field the upstream reads the image from
    #[derivative(Default(value = "\"image_file\".to_string()"))]
    pub file_field: String,

    #[derivative(Default(value = "\"image.png\".to_string()"))]
    pub file_name: String,
}

impl ApiConfig {
    pub fn endpoint(&self) -> String {
        format!("{}/removebg", self.api_base_url.trim_end_matches('/'))
    }
}

/// Server-held API key. Never printed: `Debug` and `Display` are redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            None
        } else {
            Some(Self(key))
        }
    }

    pub fn from_env() -> Option<Self> {
        Self::from_env_var(API_KEY_ENV)
    }

    pub fn from_env_var(name: &str) -> Option<Self> {
        std::env::var(name).ok().and_then(Self::new)
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}
