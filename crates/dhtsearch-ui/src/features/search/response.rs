//! Interpretation of raw search responses.

use super::state::SearchResult;
use crate::i18n::{I18nArg, LocaleResolver};
use dhtsearch_api_models::{ErrorBody, SearchResponse};

/// Status and body exactly as the transport received them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body text.
    pub body: String,
}

impl RawResponse {
    /// Convenience constructor.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Why a search request did not produce results.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Non-2xx status, with the message from the error body when present.
    #[error("search request failed with status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// `detail` message from the error body.
        detail: Option<String>,
    },
    /// The request never produced a response.
    #[error("search request failed: {0}")]
    Transport(String),
    /// A 2xx body that does not decode as a search response.
    #[error("malformed search response: {0}")]
    Malformed(String),
}

impl FetchError {
    /// Message shown to the user in the active locale.
    ///
    /// A server-provided detail wins; a bare status falls back to
    /// `common.http_error`, everything else to `common.error`.
    #[must_use]
    pub fn user_message(&self, locale: &LocaleResolver) -> String {
        match self {
            Self::Status {
                detail: Some(detail),
                ..
            } => detail.clone(),
            Self::Status {
                status,
                detail: None,
            } => locale.resolve_with("common.http_error", &[I18nArg::new("status", status)]),
            Self::Transport(_) | Self::Malformed(_) => locale.resolve("common.error"),
        }
    }
}

/// Turn a raw response into a result page or a classified failure.
///
/// # Errors
///
/// Returns [`FetchError::Status`] for non-2xx statuses and
/// [`FetchError::Malformed`] for undecodable success bodies.
pub fn interpret_response(raw: &RawResponse) -> Result<SearchResult, FetchError> {
    if !raw.is_success() {
        let detail = serde_json::from_str::<ErrorBody>(&raw.body)
            .ok()
            .and_then(|body| body.message().map(str::to_string));
        return Err(FetchError::Status {
            status: raw.status,
            detail,
        });
    }
    let response: SearchResponse =
        serde_json::from_str(&raw.body).map_err(|err| FetchError::Malformed(err.to_string()))?;
    Ok(SearchResult::from(response))
}
