//! Prometheus metrics for the ingestion pipeline.
//!
//! This module provides metrics for:
//! - Search API calls (outcomes, latency)
//! - Collection tracks (items kept per track, discovered brands)
//! - Persistence (stored and skipped foods)

use once_cell::sync::Lazy;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

/// Registry holding every pipeline metric.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    for metric in all_metrics() {
        // Fixed, distinct names
        let _ = registry.register(metric);
    }
    registry
});

// =============================================================================
// Search API
// =============================================================================

/// Search calls by outcome.
pub static SEARCH_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("petfood_search_requests_total", "Total search API calls"),
        &["outcome"], // "ok", "empty", "transport_error"
    )
    .unwrap()
});

/// Search call latency in seconds.
pub static SEARCH_DURATION: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "petfood_search_duration_seconds",
            "Duration of search API calls",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
    )
    .unwrap()
});

// =============================================================================
// Collection
// =============================================================================

/// Items kept after filtering, by track.
pub static ITEMS_COLLECTED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "petfood_items_collected_total",
            "Items kept by the collection tracks",
        ),
        &["track"], // "track_a", "track_b", "single_query"
    )
    .unwrap()
});

/// Brands added to the dictionary by discovery.
pub static BRANDS_DISCOVERED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "petfood_brands_discovered_total",
        "Brands added to the dictionary by discovery",
    )
    .unwrap()
});

// =============================================================================
// Persistence
// =============================================================================

/// Store attempts by outcome.
pub static FOODS_PERSISTED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("petfood_foods_persisted_total", "Food store attempts"),
        &["outcome"], // "inserted", "duplicate_id", "duplicate_name_brand", "invalid", "failed"
    )
    .unwrap()
});

/// Foods in the catalog after the last run.
pub static CATALOG_FOODS: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("petfood_catalog_foods", "Foods stored in the catalog").unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Search
        Box::new(SEARCH_REQUESTS.clone()),
        Box::new(SEARCH_DURATION.clone()),
        // Collection
        Box::new(ITEMS_COLLECTED.clone()),
        Box::new(BRANDS_DISCOVERED.clone()),
        // Persistence
        Box::new(FOODS_PERSISTED.clone()),
        Box::new(CATALOG_FOODS.clone()),
    ]
}

/// Encode all metrics as Prometheus text format.
pub fn render_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_metrics_returns_prometheus_format() {
        SEARCH_REQUESTS.with_label_values(&["ok"]).inc();
        FOODS_PERSISTED.with_label_values(&["inserted"]).inc();

        let output = render_metrics().unwrap();
        assert!(output.contains("petfood_search_requests_total"));
        assert!(output.contains("petfood_foods_persisted_total"));
        assert!(output.contains("# HELP"));
        assert!(output.contains("# TYPE"));
    }

    #[test]
    fn test_registry_contains_all_metrics() {
        ITEMS_COLLECTED.with_label_values(&["track_a"]).inc();
        SEARCH_DURATION.observe(0.2);
        BRANDS_DISCOVERED.inc_by(0);
        CATALOG_FOODS.set(0);

        let output = render_metrics().unwrap();
        assert!(output.contains("petfood_search_duration_seconds"));
        assert!(output.contains("petfood_items_collected_total"));
        assert!(output.contains("petfood_brands_discovered_total"));
        assert!(output.contains("petfood_catalog_foods"));
    }
}
