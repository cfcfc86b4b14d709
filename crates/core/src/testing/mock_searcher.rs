//! Mock shopping searcher for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::searcher::{RawItem, SearchError, SearchRequest, ShoppingSearcher};

/// Mock implementation of the `ShoppingSearcher` trait.
///
/// Provides controllable behavior for testing:
/// - Scripted results per exact query string, served page by page
/// - Recorded requests for assertions
/// - Simulated transport failures and missing credentials
///
/// # Example
///
/// ```rust,ignore
/// use petfood_core::testing::{fixtures, MockSearcher};
///
/// let searcher = MockSearcher::new();
/// searcher.set_results("오리젠 사료", vec![fixtures::raw_item("1", "오리젠 캣")]).await;
///
/// let items = searcher.search(&SearchRequest::new("오리젠 사료")).await?;
/// assert_eq!(items.len(), 1);
/// assert_eq!(searcher.recorded_queries().await, vec!["오리젠 사료"]);
/// ```
pub struct MockSearcher {
    /// Full result lists keyed by query.
    results: Arc<RwLock<HashMap<String, Vec<RawItem>>>>,
    /// Recorded requests, in call order.
    requests: Arc<RwLock<Vec<SearchRequest>>>,
    /// Number of upcoming calls that simulate a failed transport.
    failures_pending: Arc<RwLock<usize>>,
    has_credentials: bool,
}

impl std::fmt::Debug for MockSearcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSearcher")
            .field("results", &"<results>")
            .field("requests", &"<requests>")
            .field("has_credentials", &self.has_credentials)
            .finish()
    }
}

impl Default for MockSearcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSearcher {
    /// Create a new mock searcher with no scripted results.
    pub fn new() -> Self {
        Self {
            results: Arc::new(RwLock::new(HashMap::new())),
            requests: Arc::new(RwLock::new(Vec::new())),
            failures_pending: Arc::new(RwLock::new(0)),
            has_credentials: true,
        }
    }

    /// Create a mock searcher that behaves as if no credentials are configured.
    pub fn without_credentials() -> Self {
        Self {
            has_credentials: false,
            ..Self::new()
        }
    }

    /// Set the full result list served for `query`.
    pub async fn set_results(&self, query: &str, results: Vec<RawItem>) {
        self.results.write().await.insert(query.to_string(), results);
    }

    /// Clear all scripted results.
    pub async fn clear_results(&self) {
        self.results.write().await.clear();
    }

    /// Get recorded requests.
    pub async fn recorded_requests(&self) -> Vec<SearchRequest> {
        self.requests.read().await.clone()
    }

    /// Get the query string of every recorded request.
    pub async fn recorded_queries(&self) -> Vec<String> {
        self.requests
            .read()
            .await
            .iter()
            .map(|r| r.query.clone())
            .collect()
    }

    /// Get the number of searches performed.
    pub async fn search_count(&self) -> usize {
        self.requests.read().await.len()
    }

    /// Make the next search behave like a failed transport (no results).
    pub async fn fail_next_search(&self) {
        *self.failures_pending.write().await += 1;
    }

    async fn take_failure(&self) -> bool {
        let mut pending = self.failures_pending.write().await;
        if *pending > 0 {
            *pending -= 1;
            true
        } else {
            false
        }
    }
}

#[async_trait]
impl ShoppingSearcher for MockSearcher {
    fn name(&self) -> &str {
        "mock"
    }

    fn check_credentials(&self) -> Result<(), SearchError> {
        if self.has_credentials {
            Ok(())
        } else {
            Err(SearchError::MissingCredentials)
        }
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<RawItem>, SearchError> {
        self.check_credentials()?;

        self.requests.write().await.push(request.clone());

        if self.take_failure().await {
            return Ok(Vec::new());
        }

        let results = self.results.read().await;
        let Some(all) = results.get(&request.query) else {
            return Ok(Vec::new());
        };

        let offset = request.start.saturating_sub(1) as usize;
        Ok(all
            .iter()
            .skip(offset)
            .take(request.display as usize)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_pages_by_start_and_display() {
        let searcher = MockSearcher::new();
        let items: Vec<_> = (1..=5)
            .map(|i| fixtures::raw_item(&i.to_string(), "item"))
            .collect();
        searcher.set_results("q", items).await;

        let page = searcher
            .search(&SearchRequest::new("q").start(3).display(2))
            .await
            .unwrap();
        let ids: Vec<_> = page.iter().map(|i| i.product_id().unwrap()).collect();
        assert_eq!(ids, vec!["3", "4"]);

        let past_end = searcher
            .search(&SearchRequest::new("q").start(6).display(2))
            .await
            .unwrap();
        assert!(past_end.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_query_is_empty() {
        let searcher = MockSearcher::new();
        let page = searcher.search(&SearchRequest::new("nothing")).await.unwrap();
        assert!(page.is_empty());
        assert_eq!(searcher.recorded_queries().await, vec!["nothing"]);
    }

    #[tokio::test]
    async fn test_failure_is_consumed() {
        let searcher = MockSearcher::new();
        searcher
            .set_results("q", vec![fixtures::raw_item("1", "item")])
            .await;
        searcher.fail_next_search().await;

        assert!(searcher.search(&SearchRequest::new("q")).await.unwrap().is_empty());
        assert_eq!(searcher.search(&SearchRequest::new("q")).await.unwrap().len(), 1);
        assert_eq!(searcher.search_count().await, 2);
    }

    #[tokio::test]
    async fn test_without_credentials_records_nothing() {
        let searcher = MockSearcher::without_credentials();
        let result = searcher.search(&SearchRequest::new("q")).await;
        assert!(matches!(result, Err(SearchError::MissingCredentials)));
        assert_eq!(searcher.search_count().await, 0);
    }
}
