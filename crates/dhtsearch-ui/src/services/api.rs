//! HTTP client for the search API.

use crate::features::search::{FetchError, RawResponse, SearchQuery, SearchTransport};
use gloo_net::http::Request;

#[derive(Clone, Debug)]
pub(crate) struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub(crate) fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl SearchTransport for ApiClient {
    async fn search(&self, query: &SearchQuery) -> Result<RawResponse, FetchError> {
        let url = format!("{}{}", self.base_url, query.to_path());
        let response = Request::get(&url)
            .send()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))?;
        Ok(RawResponse { status, body })
    }
}
