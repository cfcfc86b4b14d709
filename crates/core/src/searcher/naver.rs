//! Naver shopping search backend implementation.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};

use crate::config::NaverConfig;
use crate::metrics;

use super::paginate::{MAX_PAGE_SIZE, MAX_START};
use super::{RawItem, SearchError, SearchRequest, ShoppingSearcher};

const CLIENT_ID_HEADER: &str = "X-Naver-Client-Id";
const CLIENT_SECRET_HEADER: &str = "X-Naver-Client-Secret";

/// Naver shopping search backend.
pub struct NaverSearcher {
    client: Client,
    config: NaverConfig,
}

impl NaverSearcher {
    /// Create a new NaverSearcher with the given configuration.
    ///
    /// Missing credentials are not an error here; they are reported by
    /// `check_credentials` and on the first search.
    pub fn new(config: NaverConfig) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| SearchError::ConnectionFailed(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Build the search URL, clamping paging values to the API's limits.
    fn build_search_url(&self, request: &SearchRequest) -> String {
        let display = request.display.clamp(1, MAX_PAGE_SIZE);
        let start = request.start.clamp(1, MAX_START);

        let mut url = format!(
            "{}?query={}&display={}&start={}&sort={}",
            self.config.url.trim_end_matches('/'),
            urlencoding::encode(&request.query),
            display,
            start,
            request.sort.as_api_param()
        );

        if let Some(exclude) = &request.exclude {
            url.push_str(&format!("&exclude={}", urlencoding::encode(exclude)));
        }

        url
    }

    /// Perform the HTTP call and decode the item list.
    async fn fetch_page(&self, request: &SearchRequest) -> Result<Vec<RawItem>, SearchError> {
        let url = self.build_search_url(request);
        debug!(query = %request.query, start = request.start, sort = %request.sort, "Searching Naver");

        let response = self
            .client
            .get(&url)
            .header(CLIENT_ID_HEADER, &self.config.client_id)
            .header(CLIENT_SECRET_HEADER, &self.config.client_secret)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::Timeout
                } else if e.is_connect() {
                    SearchError::ConnectionFailed(e.to_string())
                } else {
                    SearchError::ApiError(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::ApiError(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let naver_response: NaverResponse = response
            .json()
            .await
            .map_err(|e| SearchError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        match naver_response.items {
            Some(items) => {
                debug!(
                    query = %request.query,
                    total = naver_response.total.unwrap_or_default(),
                    results = items.len(),
                    "Naver search complete"
                );
                Ok(items)
            }
            None => {
                warn!(query = %request.query, "Search response carried no items");
                Ok(Vec::new())
            }
        }
    }
}

#[async_trait]
impl ShoppingSearcher for NaverSearcher {
    fn name(&self) -> &str {
        "naver"
    }

    fn check_credentials(&self) -> Result<(), SearchError> {
        if self.config.has_credentials() {
            Ok(())
        } else {
            error!("Naver API credentials are not configured");
            Err(SearchError::MissingCredentials)
        }
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<RawItem>, SearchError> {
        self.check_credentials()?;

        let start = Instant::now();
        let result = self.fetch_page(request).await;
        metrics::SEARCH_DURATION.observe(start.elapsed().as_secs_f64());

        match result {
            Ok(items) => {
                let outcome = if items.is_empty() { "empty" } else { "ok" };
                metrics::SEARCH_REQUESTS.with_label_values(&[outcome]).inc();
                Ok(items)
            }
            Err(e) => {
                metrics::SEARCH_REQUESTS
                    .with_label_values(&["transport_error"])
                    .inc();
                warn!(query = %request.query, error = %e, "Naver search failed, treating as no results");
                Ok(Vec::new())
            }
        }
    }
}

// Naver API response types
#[derive(Debug, Deserialize)]
struct NaverResponse {
    #[serde(default)]
    total: Option<u64>,
    #[serde(default)]
    items: Option<Vec<RawItem>>,
}
