use serde::Deserialize;

#[derive(Deserialize, Debug, Default)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub errors: Vec<ErrorItem>,
}

#[derive(Deserialize, Debug, Default)]
pub(crate) struct ErrorItem {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub code: Option<String>,
}

/// Extracts `errors[0].title` from a remove.bg failure body.
pub fn first_error_title(body: &[u8]) -> Option<String> {
    let body = serde_json::from_slice::<ErrorBody>(body).ok()?;
    let first = body.errors.into_iter().next()?;

    if let Some(code) = &first.code {
        log::debug!("upstream error code: {code}");
    }

    first.title.filter(|title| !title.trim().is_empty())
}
