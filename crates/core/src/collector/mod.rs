//! 3-track collection strategy.
//!
//! - Track A searches every dictionary brand with a group-specific query.
//! - Track B sweeps the generic category query over three price bands.
//! - Track C finds brands in the combined results that the dictionary lacks.
//!
//! Tracks run sequentially and feed one accumulator that is deduplicated by
//! product id before discovery and the final catalog filter.

mod filter;
mod query;
mod types;

pub use filter::{
    filter_by_price_band, filter_by_product_type, filter_catalog_with_fallback, CategoryFilter,
};
pub use query::{build_query, QueryVocabulary};
pub use types::*;

use std::collections::HashSet;

use tracing::info;

use crate::config::Config;
use crate::dictionary::BrandDictionary;
use crate::metrics;
use crate::searcher::{dedup_by_product_id, Paginator, RawItem, SearchError, ShoppingSearcher, SortMode};

/// Runs the collection tracks against a search backend.
pub struct Collector<'a> {
    searcher: &'a dyn ShoppingSearcher,
    paginator: Paginator,
    vocabulary: QueryVocabulary,
    food_marker: String,
    max_results: u32,
    price_bands: Vec<PriceBand>,
}

impl<'a> Collector<'a> {
    pub fn new(searcher: &'a dyn ShoppingSearcher, config: &Config) -> Self {
        Self {
            searcher,
            paginator: Paginator::from_config(&config.fetch),
            vocabulary: QueryVocabulary {
                food_word: config.collector.food_word.clone(),
                category_query: config.collector.category_query.clone(),
            },
            food_marker: config.collector.food_marker.clone(),
            max_results: config.fetch.max_results,
            price_bands: default_price_bands(),
        }
    }

    /// Results fetched per brand (Track A) and per band (Track B).
    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_price_bands(mut self, bands: Vec<PriceBand>) -> Self {
        self.price_bands = bands;
        self
    }

    fn category_filter(&self, dictionary: &BrandDictionary) -> CategoryFilter {
        CategoryFilter::new(self.food_marker.clone(), dictionary.category_id.clone())
    }

    /// Track A: one paginated search per dictionary brand.
    ///
    /// Standalone groups run first, then manufacturer pairs, then
    /// general-name brands. A brand is searched at most once.
    pub async fn track_a(&self, dictionary: &BrandDictionary) -> Result<Vec<RawItem>, SearchError> {
        let category_filter = self.category_filter(dictionary);
        let mut collected = Vec::new();

        for entry in dictionary.search_entries() {
            let query = build_query(&entry.name, &entry.group, dictionary, &self.vocabulary);
            info!(brand = %entry.name, group = entry.group.key(), query = %query, "Track A search");

            let fetched = self
                .paginator
                .fetch_all(self.searcher, &query, SortMode::Similarity, self.max_results)
                .await?;
            if fetched.is_empty() {
                continue;
            }

            let fetched_count = fetched.len();
            let in_category = category_filter.apply(fetched);
            let category_count = in_category.len();
            let kept = filter_catalog_with_fallback(in_category, &entry.name);

            info!(
                brand = %entry.name,
                fetched = fetched_count,
                in_category = category_count,
                kept = kept.len(),
                "Track A brand collected"
            );
            collected.extend(kept);
        }

        metrics::ITEMS_COLLECTED
            .with_label_values(&["track_a"])
            .inc_by(collected.len() as u64);
        Ok(collected)
    }

    /// Track B: the category query swept once per price band.
    ///
    /// The API cannot filter by price, only sort by it, so each band keeps
    /// whatever part of its fetched window lands inside the band. A band may
    /// legitimately come back empty.
    pub async fn track_b(&self, dictionary: &BrandDictionary) -> Result<Vec<RawItem>, SearchError> {
        let category_filter = self.category_filter(dictionary);
        let mut collected = Vec::new();

        for band in &self.price_bands {
            info!(band = %band.label(), sort = %band.sort, "Track B search");

            let fetched = self
                .paginator
                .fetch_all(
                    self.searcher,
                    &self.vocabulary.category_query,
                    band.sort,
                    self.max_results,
                )
                .await?;

            let fetched_count = fetched.len();
            let in_category = category_filter.apply(fetched);
            let typed = filter_catalog_with_fallback(in_category, &band.label());
            let in_band = filter_by_price_band(typed, band);

            info!(
                band = %band.label(),
                fetched = fetched_count,
                kept = in_band.len(),
                "Track B band collected"
            );
            collected.extend(in_band);
        }

        metrics::ITEMS_COLLECTED
            .with_label_values(&["track_b"])
            .inc_by(collected.len() as u64);
        Ok(collected)
    }

    /// Run all tracks and merge discovered brands into `dictionary`.
    ///
    /// The caller decides whether to persist the updated dictionary.
    pub async fn collect(&self, dictionary: &mut BrandDictionary) -> Result<Collection, SearchError> {
        self.searcher.check_credentials()?;

        let track_a_items = self.track_a(dictionary).await?;
        let track_b_items = self.track_b(dictionary).await?;
        let track_a = track_a_items.len();
        let track_b = track_b_items.len();

        let mut combined = track_a_items;
        combined.extend(track_b_items);
        let unique = dedup_by_product_id(combined);
        let deduplicated = unique.len();

        let discovered_brands = discover_new_brands(&dictionary.known_brands(), &unique);
        if !discovered_brands.is_empty() {
            let added = dictionary.merge_discovered(&discovered_brands);
            metrics::BRANDS_DISCOVERED.inc_by(added as u64);
        }

        let items = filter_catalog_with_fallback(unique, "all tracks");
        info!(
            track_a = track_a,
            track_b = track_b,
            deduplicated = deduplicated,
            final_items = items.len(),
            discovered = discovered_brands.len(),
            "Collection complete"
        );

        Ok(Collection {
            items,
            track_a,
            track_b,
            deduplicated,
            discovered_brands,
        })
    }
}

/// Track C: brands present in `items` but unknown to the dictionary.
///
/// Each new brand is reported once, in the order it was first seen.
pub fn discover_new_brands(known: &HashSet<String>, items: &[RawItem]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut discovered = Vec::new();

    for brand in items.iter().filter_map(|i| i.brand_name()) {
        if known.contains(brand) || !seen.insert(brand) {
            continue;
        }
        info!(brand = brand, "Discovered new brand");
        discovered.push(brand.to_string());
    }

    discovered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures::{branded_item, priced_item, raw_item};
    use crate::testing::MockSearcher;

    fn test_config() -> Config {
        let mut config = Config::default();
        config.fetch.request_delay_ms = 0;
        config.fetch.max_results = 100;
        config
    }

    fn dictionary() -> BrandDictionary {
        serde_json::from_str(
            r#"{
                "brands": {
                    "overseas_premium": ["오리젠"],
                    "domestic": ["캐츠랑"],
                    "general_name_correction": ["GO!"],
                    "manufacturer_brand_pairs": [
                        {"manufacturer": "네슬레", "brands": ["퓨리나 원", "오리젠"]}
                    ]
                }
            }"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_track_a_queries_in_pass_order_once_per_brand() {
        let searcher = MockSearcher::new();
        let config = test_config();
        let collector = Collector::new(&searcher, &config);

        collector.track_a(&dictionary()).await.unwrap();

        let queries = searcher.recorded_queries().await;
        assert_eq!(
            queries,
            vec!["오리젠 사료", "캐츠랑 사료", "네슬레 퓨리나 원 사료", "고양이 사료 GO!"]
        );
    }

    #[tokio::test]
    async fn test_track_a_brand_in_pair_and_general_name_uses_manufacturer_query() {
        let dictionary: BrandDictionary = serde_json::from_str(
            r#"{
                "brands": {
                    "general_name_correction": ["GO!"],
                    "manufacturer_brand_pairs": [
                        {"manufacturer": "페톤", "brands": ["GO!"]}
                    ]
                }
            }"#,
        )
        .unwrap();
        let searcher = MockSearcher::new();
        let config = test_config();
        let collector = Collector::new(&searcher, &config);

        collector.track_a(&dictionary).await.unwrap();

        assert_eq!(searcher.recorded_queries().await, vec!["페톤 GO! 사료"]);
    }

    #[tokio::test]
    async fn test_track_a_filters_and_falls_back() {
        let searcher = MockSearcher::new();

        let mut not_food = raw_item("1", "고양이 장난감");
        not_food.category3 = Some("장난감".to_string());
        not_food.category4 = None;
        searcher
            .set_results("오리젠 사료", vec![not_food, raw_item("2", "오리젠 캣")])
            .await;

        let mut market_only = raw_item("3", "캐츠랑 전연령");
        market_only.product_type = Some(1);
        searcher.set_results("캐츠랑 사료", vec![market_only]).await;

        let config = test_config();
        let collector = Collector::new(&searcher, &config);
        let items = collector.track_a(&dictionary()).await.unwrap();

        let ids: Vec<_> = items.iter().map(|i| i.product_id().unwrap()).collect();
        // "1" dropped by the category filter, "3" kept via fallback
        assert_eq!(ids, vec!["2", "3"]);
    }

    #[tokio::test]
    async fn test_track_b_uses_band_sorts_and_price_filter() {
        let searcher = MockSearcher::new();
        searcher
            .set_results(
                "고양이 사료",
                vec![
                    priced_item("low", 12_000.0),
                    priced_item("mid", 45_000.0),
                    priced_item("high", 99_000.0),
                ],
            )
            .await;

        let config = test_config();
        let collector = Collector::new(&searcher, &config);
        let items = collector.track_b(&BrandDictionary::default()).await.unwrap();

        let ids: Vec<_> = items.iter().map(|i| i.product_id().unwrap()).collect();
        assert_eq!(ids, vec!["low", "mid", "high"]);

        let sorts: Vec<_> = searcher
            .recorded_requests()
            .await
            .iter()
            .filter(|r| r.start == 1)
            .map(|r| r.sort)
            .collect();
        assert_eq!(
            sorts,
            vec![SortMode::PriceAsc, SortMode::PriceAsc, SortMode::PriceDesc]
        );
    }

    #[test]
    fn test_discover_new_brands_reports_once() {
        let known: HashSet<String> = ["오리젠".to_string()].into_iter().collect();
        let mut items: Vec<RawItem> = (0..5)
            .map(|i| branded_item(&format!("n{}", i), "뉴브랜드"))
            .collect();
        items.push(branded_item("o", "오리젠"));
        items.push(branded_item("s", " 세컨드 "));
        items.push(raw_item("none", "no brand"));

        let discovered = discover_new_brands(&known, &items);
        assert_eq!(discovered, vec!["뉴브랜드", "세컨드"]);
    }

    #[tokio::test]
    async fn test_collect_dedups_across_tracks_and_merges_brands() {
        let searcher = MockSearcher::new();
        let mut from_a = branded_item("123", "뉴브랜드");
        from_a.title = "Track A listing".to_string();
        let mut from_b = priced_item("123", 10_000.0);
        from_b.title = "Track B listing".to_string();

        searcher.set_results("오리젠 사료", vec![from_a]).await;
        searcher.set_results("고양이 사료", vec![from_b]).await;

        let config = test_config();
        let collector = Collector::new(&searcher, &config);
        let mut dict = dictionary();
        let collection = collector.collect(&mut dict).await.unwrap();

        assert_eq!(collection.track_a, 1);
        assert_eq!(collection.track_b, 1);
        assert_eq!(collection.deduplicated, 1);
        assert_eq!(collection.items.len(), 1);
        assert_eq!(collection.items[0].title, "Track A listing");
        assert_eq!(collection.discovered_brands, vec!["뉴브랜드"]);
        assert!(dict.brands.domestic.contains(&"뉴브랜드".to_string()));
    }

    #[tokio::test]
    async fn test_collect_without_credentials_makes_no_calls() {
        let searcher = MockSearcher::without_credentials();
        let config = test_config();
        let collector = Collector::new(&searcher, &config);

        let result = collector.collect(&mut dictionary()).await;
        assert!(matches!(result, Err(SearchError::MissingCredentials)));
        assert!(searcher.recorded_requests().await.is_empty());
    }
}
