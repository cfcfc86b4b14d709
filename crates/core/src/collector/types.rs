//! Types for the collection tracks.

use serde::{Deserialize, Serialize};

use crate::searcher::{RawItem, SortMode};

/// A price range swept by Track B, with the sort order used to fetch it.
///
/// Bands are half-open: `min <= price < max`; `max = None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBand {
    pub min: f64,
    pub max: Option<f64>,
    pub sort: SortMode,
}

impl PriceBand {
    pub fn new(min: f64, max: Option<f64>, sort: SortMode) -> Self {
        Self { min, max, sort }
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && self.max.map_or(true, |max| price < max)
    }

    pub fn label(&self) -> String {
        match self.max {
            Some(max) => format!("{}-{}", self.min, max),
            None => format!("{}+", self.min),
        }
    }
}

/// Low, mid and high price bands, in sweep order.
pub fn default_price_bands() -> Vec<PriceBand> {
    vec![
        PriceBand::new(0.0, Some(30_000.0), SortMode::PriceAsc),
        PriceBand::new(30_000.0, Some(70_000.0), SortMode::PriceAsc),
        PriceBand::new(70_000.0, None, SortMode::PriceDesc),
    ]
}

/// Outcome of a full 3-track collection.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    /// Items ready for normalization and persistence.
    pub items: Vec<RawItem>,
    /// Items contributed by Track A (after its filters).
    pub track_a: usize,
    /// Items contributed by Track B (after its filters).
    pub track_b: usize,
    /// Items left after cross-track deduplication.
    pub deduplicated: usize,
    /// Brands found by Track C, in first-seen order.
    pub discovered_brands: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bands_do_not_overlap() {
        let bands = default_price_bands();
        for price in [0.0, 1.0, 29_999.0, 30_000.0, 50_000.0, 69_999.99, 70_000.0, 1e9] {
            let hits = bands.iter().filter(|b| b.contains(price)).count();
            assert_eq!(hits, 1, "price {} matched {} bands", price, hits);
        }
        assert!(!bands.iter().any(|b| b.contains(-1.0)));
    }

    #[test]
    fn test_band_sort_orders() {
        let sorts: Vec<_> = default_price_bands().iter().map(|b| b.sort).collect();
        assert_eq!(
            sorts,
            vec![SortMode::PriceAsc, SortMode::PriceAsc, SortMode::PriceDesc]
        );
    }

    #[test]
    fn test_band_label() {
        let bands = default_price_bands();
        assert_eq!(bands[0].label(), "0-30000");
        assert_eq!(bands[2].label(), "70000+");
    }
}
