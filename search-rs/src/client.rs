//! Search API client
//!
//! Issues one `GET` per page against the backend search endpoint. The client
//! is stateless apart from its connection pool; it does not retry and does
//! not enforce a timeout.

use tracing::{debug, warn};
use url::{form_urlencoded, Url};

use crate::config::BackendConfig;
use crate::error::{Result, SearchError, GENERIC_FAILURE_MESSAGE};
use crate::types::{ErrorBody, SearchQuery, SearchResponseBody, SearchResponsePage};

/// Anything that can answer a page query
#[async_trait::async_trait]
pub trait SearchBackend: Send + Sync {
    /// Fetch one page of results
    async fn fetch_page(&self, query: &SearchQuery) -> Result<SearchResponsePage>;
}

/// HTTP client for `GET /api/search`
pub struct SearchApiClient {
    endpoint: Url,
    client: reqwest::Client,
}

impl SearchApiClient {
    /// Create a client for `endpoint` resolved against `base_url`
    pub fn new(base_url: &str, endpoint: &str) -> Result<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| SearchError::Config(format!("Invalid base URL '{}': {}", base_url, e)))?;
        let endpoint = base
            .join(endpoint)
            .map_err(|e| SearchError::Config(format!("Invalid endpoint '{}': {}", endpoint, e)))?;

        Ok(Self {
            endpoint,
            client: reqwest::Client::new(),
        })
    }

    /// Create a client from the `[backend]` configuration section
    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        Self::new(&config.base_url, &config.endpoint)
    }

    /// Full request URL for a query. The term is percent-encoded with
    /// spaces as `%20`; a literal `+` is already `%2B` at that point.
    pub fn request_url(&self, query: &SearchQuery) -> Url {
        let term = form_urlencoded::byte_serialize(query.term().as_bytes())
            .collect::<String>()
            .replace('+', "%20");

        let mut url = self.endpoint.clone();
        url.set_query(Some(&format!(
            "q={}&limit={}&offset={}",
            term,
            query.limit(),
            query.offset()
        )));
        url
    }

    /// Fetch one page of results
    pub async fn fetch_page(&self, query: &SearchQuery) -> Result<SearchResponsePage> {
        let url = self.request_url(query);
        debug!("SearchApiClient: GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SearchError::NetworkFailure(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SearchError::NetworkFailure(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string());
            warn!("SearchApiClient: request failed with status {}: {}", status, message);
            return Err(SearchError::ServerError {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: SearchResponseBody = serde_json::from_str(&body).map_err(|e| {
            warn!("SearchApiClient: malformed response body: {}", e);
            SearchError::MalformedResponse(e.to_string())
        })?;

        let page = SearchResponsePage::from(parsed);
        debug!(
            "SearchApiClient: received {} results (total {}, fallback {})",
            page.results.len(),
            page.total_results,
            page.fallback
        );
        Ok(page)
    }
}

#[async_trait::async_trait]
impl SearchBackend for SearchApiClient {
    async fn fetch_page(&self, query: &SearchQuery) -> Result<SearchResponsePage> {
        SearchApiClient::fetch_page(self, query).await
    }
}
