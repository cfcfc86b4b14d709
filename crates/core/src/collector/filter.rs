//! Post-hoc filters over fetched items.
//!
//! The search API has no usable category or price-range filter, so results
//! are narrowed locally after each fetch.

use tracing::{debug, warn};

use crate::searcher::RawItem;

use super::PriceBand;

/// Keeps items whose category levels identify them as pet food.
#[derive(Debug, Clone)]
pub struct CategoryFilter {
    /// Word looked for inside any category level, e.g. `사료`.
    pub marker: String,
    /// Category id a level may equal instead.
    pub category_id: String,
}

impl CategoryFilter {
    pub fn new(marker: impl Into<String>, category_id: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            category_id: category_id.into(),
        }
    }

    pub fn matches(&self, item: &RawItem) -> bool {
        item.categories().into_iter().flatten().any(|level| {
            (!self.marker.is_empty() && level.contains(&self.marker))
                || (!self.category_id.is_empty() && level.trim() == self.category_id)
        })
    }

    pub fn apply(&self, items: Vec<RawItem>) -> Vec<RawItem> {
        let before = items.len();
        let kept: Vec<RawItem> = items.into_iter().filter(|i| self.matches(i)).collect();
        let removed = before - kept.len();
        if removed > 0 {
            debug!(removed = removed, kept = kept.len(), "Category filter removed non-food items");
        }
        kept
    }
}

/// Keep only catalog/comparison listings.
pub fn filter_by_product_type(items: &[RawItem]) -> Vec<RawItem> {
    items
        .iter()
        .filter(|i| i.is_catalog_listing())
        .cloned()
        .collect()
}

/// Keep catalog listings, or everything when none of the items is one.
///
/// A brand whose results contain no catalog-grade listing keeps its
/// category-filtered results rather than losing them all.
pub fn filter_catalog_with_fallback(items: Vec<RawItem>, label: &str) -> Vec<RawItem> {
    let catalog = filter_by_product_type(&items);
    if catalog.is_empty() && !items.is_empty() {
        warn!(
            label = label,
            kept = items.len(),
            "No catalog listings, keeping all category matches"
        );
        return items;
    }
    catalog
}

/// Keep items whose lowest price falls inside the band.
///
/// Items without a parseable price belong to no band.
pub fn filter_by_price_band(items: Vec<RawItem>, band: &PriceBand) -> Vec<RawItem> {
    items
        .into_iter()
        .filter(|i| i.low_price().is_some_and(|p| band.contains(p)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::searcher::SortMode;
    use crate::testing::fixtures::{priced_item, raw_item};

    fn filter() -> CategoryFilter {
        CategoryFilter::new("사료", "50006679")
    }

    #[test]
    fn test_category_marker_in_any_level() {
        let mut item = raw_item("1", "x");
        item.category1 = Some("생활/건강".to_string());
        item.category2 = Some("반려동물".to_string());
        item.category3 = Some("고양이 용품".to_string());
        item.category4 = None;
        assert!(!filter().matches(&item));

        item.category2 = Some("고양이 사료".to_string());
        assert!(filter().matches(&item));
    }

    #[test]
    fn test_category_id_must_equal() {
        let mut item = raw_item("1", "x");
        item.category3 = None;
        item.category4 = None;
        item.category1 = Some("50006679".to_string());
        assert!(filter().matches(&item));

        item.category1 = Some("500066790".to_string());
        assert!(!filter().matches(&item));
    }

    #[test]
    fn test_product_type_filter() {
        let mut marketplace = raw_item("2", "market");
        marketplace.product_type = Some(1);
        let items = vec![raw_item("1", "catalog"), marketplace];

        let kept = filter_by_product_type(&items);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].product_id(), Some("1"));
    }

    #[test]
    fn test_fallback_restores_category_set() {
        let mut a = raw_item("1", "a");
        a.product_type = Some(1);
        let mut b = raw_item("2", "b");
        b.product_type = None;
        let items = vec![a, b];

        let kept = filter_catalog_with_fallback(items.clone(), "test");
        assert_eq!(kept, items);

        // Applying the rule again changes nothing
        let again = filter_catalog_with_fallback(kept.clone(), "test");
        assert_eq!(again, kept);
    }

    #[test]
    fn test_fallback_not_used_when_catalog_present() {
        let mut market = raw_item("1", "a");
        market.product_type = Some(1);
        let items = vec![market, raw_item("2", "b")];

        let kept = filter_catalog_with_fallback(items, "test");
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].product_id(), Some("2"));
    }

    #[test]
    fn test_fallback_on_empty_input_is_empty() {
        assert!(filter_catalog_with_fallback(Vec::new(), "test").is_empty());
    }

    #[test]
    fn test_price_band_filter() {
        let band = PriceBand::new(30_000.0, Some(70_000.0), SortMode::PriceAsc);
        let mut unpriced = raw_item("5", "no price");
        unpriced.lprice = None;
        let items = vec![
            priced_item("1", 29_999.0),
            priced_item("2", 30_000.0),
            priced_item("3", 69_999.0),
            priced_item("4", 70_000.0),
            unpriced,
        ];

        let kept = filter_by_price_band(items, &band);
        let ids: Vec<_> = kept.iter().map(|i| i.product_id().unwrap()).collect();
        assert_eq!(ids, vec!["2", "3"]);
        for item in &kept {
            let price = item.low_price().unwrap();
            assert!((30_000.0..70_000.0).contains(&price));
        }
    }
}
