//! Deduplication of search results by external product id.

use std::collections::HashSet;

use tracing::info;

use super::RawItem;

/// Deduplicate raw items by product id.
///
/// The first occurrence of each id wins and input order is preserved.
/// Items without a product id are dropped.
pub fn dedup_by_product_id(items: Vec<RawItem>) -> Vec<RawItem> {
    let before = items.len();
    let mut seen: HashSet<String> = HashSet::new();

    let unique: Vec<RawItem> = items
        .into_iter()
        .filter(|item| match item.product_id() {
            Some(id) => seen.insert(id.to_string()),
            None => false,
        })
        .collect();

    let removed = before - unique.len();
    if removed > 0 {
        info!(removed = removed, kept = unique.len(), "Removed duplicate product ids");
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures::raw_item;

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let mut later = raw_item("123", "Track B copy");
        later.lprice = Some("1000".to_string());
        let items = vec![
            raw_item("123", "Track A copy"),
            raw_item("456", "Other"),
            later,
        ];

        let unique = dedup_by_product_id(items);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].title, "Track A copy");
        assert_eq!(unique[1].product_id(), Some("456"));
    }

    #[test]
    fn test_dedup_preserves_order() {
        let items = vec![
            raw_item("3", "c"),
            raw_item("1", "a"),
            raw_item("3", "c2"),
            raw_item("2", "b"),
            raw_item("1", "a2"),
        ];
        let ids: Vec<_> = dedup_by_product_id(items)
            .iter()
            .map(|i| i.product_id().unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
    }

    #[test]
    fn test_dedup_drops_items_without_id() {
        let mut no_id_1 = raw_item("", "no id 1");
        no_id_1.product_id = None;
        let no_id_2 = raw_item("  ", "blank id");

        let unique = dedup_by_product_id(vec![no_id_1, no_id_2, raw_item("9", "x")]);
        assert_eq!(unique.len(), 1);
        assert_eq!(unique[0].product_id(), Some("9"));
    }

    #[test]
    fn test_dedup_identical_items_without_id_all_dropped() {
        let mut item = raw_item("", "같은 상품");
        item.product_id = None;

        assert!(dedup_by_product_id(vec![item.clone(), item]).is_empty());
    }

    #[test]
    fn test_dedup_is_idempotent() {
        let items = vec![
            raw_item("1", "a"),
            raw_item("2", "b"),
            raw_item("1", "a again"),
            raw_item("", "no id"),
        ];
        let once = dedup_by_product_id(items);
        let twice = dedup_by_product_id(once.clone());
        assert_eq!(once, twice);
    }
}
