//! Paginated fetching with a fixed delay between calls.

use std::time::Duration;
use tracing::debug;

use crate::config::FetchConfig;

use super::{RawItem, SearchError, SearchRequest, ShoppingSearcher, SortMode};

/// Largest page the search API serves.
pub const MAX_PAGE_SIZE: u32 = 100;
/// Largest start offset the search API accepts; results beyond it are unreachable.
pub const MAX_START: u32 = 1000;

/// Walks result pages of a query until enough items are collected.
#[derive(Debug, Clone)]
pub struct Paginator {
    page_size: u32,
    delay: Duration,
}

impl Paginator {
    pub fn new(page_size: u32, delay: Duration) -> Self {
        Self {
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
            delay,
        }
    }

    pub fn from_config(config: &FetchConfig) -> Self {
        Self::new(
            config.page_size,
            Duration::from_millis(config.request_delay_ms),
        )
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Fetch up to `max_results` items for `query`.
    ///
    /// Stops early on an empty page (end of results, or a failed call) and
    /// at the API's start-offset cap. Sleeps the configured delay after
    /// every call. Only missing credentials abort the fetch.
    pub async fn fetch_all(
        &self,
        searcher: &dyn ShoppingSearcher,
        query: &str,
        sort: SortMode,
        max_results: u32,
    ) -> Result<Vec<RawItem>, SearchError> {
        let mut items: Vec<RawItem> = Vec::new();

        while (items.len() as u32) < max_results {
            let fetched = items.len() as u32;
            let start = fetched + 1;
            if start > MAX_START {
                debug!(query = query, "Reached the API start offset cap");
                break;
            }

            let request = SearchRequest::new(query)
                .display(self.page_size.min(max_results - fetched))
                .start(start)
                .sort(sort);

            let page = searcher.search(&request).await?;
            let page_len = page.len();
            items.extend(page);

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            if page_len == 0 {
                break;
            }

            debug!(query = query, fetched = items.len(), max = max_results, "Fetched page");
        }

        items.truncate(max_results as usize);
        debug!(query = query, total = items.len(), "Fetch complete");
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixtures, MockSearcher};

    fn numbered(prefix: &str, n: usize) -> Vec<RawItem> {
        (0..n)
            .map(|i| fixtures::raw_item(&format!("{}-{}", prefix, i), &format!("{} item {}", prefix, i)))
            .collect()
    }

    #[tokio::test]
    async fn test_fetch_all_pages_until_max() {
        let searcher = MockSearcher::new();
        searcher.set_results("사료", numbered("a", 250)).await;

        let paginator = Paginator::new(100, Duration::ZERO);
        let items = paginator
            .fetch_all(&searcher, "사료", SortMode::Similarity, 150)
            .await
            .unwrap();

        assert_eq!(items.len(), 150);
        let requests = searcher.recorded_requests().await;
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].start, 1);
        assert_eq!(requests[0].display, 100);
        assert_eq!(requests[1].start, 101);
        assert_eq!(requests[1].display, 50);
    }

    #[tokio::test]
    async fn test_fetch_all_stops_on_empty_page() {
        let searcher = MockSearcher::new();
        searcher.set_results("사료", numbered("a", 30)).await;

        let paginator = Paginator::new(20, Duration::ZERO);
        let items = paginator
            .fetch_all(&searcher, "사료", SortMode::Similarity, 100)
            .await
            .unwrap();

        assert_eq!(items.len(), 30);
        // 20, then 10, then an empty page
        assert_eq!(searcher.recorded_requests().await.len(), 3);
    }

    #[tokio::test]
    async fn test_fetch_all_passes_sort_mode() {
        let searcher = MockSearcher::new();
        searcher.set_results("사료", numbered("a", 5)).await;

        let paginator = Paginator::new(100, Duration::ZERO);
        paginator
            .fetch_all(&searcher, "사료", SortMode::PriceDesc, 10)
            .await
            .unwrap();

        let requests = searcher.recorded_requests().await;
        assert!(requests.iter().all(|r| r.sort == SortMode::PriceDesc));
    }

    #[tokio::test]
    async fn test_fetch_all_respects_start_cap() {
        let searcher = MockSearcher::new();
        searcher.set_results("사료", numbered("a", 1200)).await;

        let paginator = Paginator::new(100, Duration::ZERO);
        let items = paginator
            .fetch_all(&searcher, "사료", SortMode::Similarity, 5000)
            .await
            .unwrap();

        assert_eq!(items.len(), 1000);
        let requests = searcher.recorded_requests().await;
        assert_eq!(requests.last().unwrap().start, 901);
    }

    #[tokio::test]
    async fn test_fetch_all_failure_is_no_results() {
        let searcher = MockSearcher::new();
        searcher.set_results("사료", numbered("a", 5)).await;
        searcher.fail_next_search().await;

        let paginator = Paginator::new(100, Duration::ZERO);
        let items = paginator
            .fetch_all(&searcher, "사료", SortMode::Similarity, 10)
            .await
            .unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_all_propagates_missing_credentials() {
        let searcher = MockSearcher::without_credentials();
        let paginator = Paginator::new(100, Duration::ZERO);
        let result = paginator
            .fetch_all(&searcher, "사료", SortMode::Similarity, 10)
            .await;
        assert!(matches!(result, Err(SearchError::MissingCredentials)));
    }
}
