//! Ingest pipeline: collection, normalization, attribute parsing, persistence.
//!
//! The pipeline owns no global state. Normalizer and matcher are built from
//! the dictionary handed to each run, after discovered brands are merged.

mod types;

pub use types::*;

use tracing::{error, info, warn};

use crate::catalog::{CatalogError, FoodCatalog, NewFood};
use crate::collector::Collector;
use crate::config::Config;
use crate::dictionary::{BrandDictionary, DictionaryStore};
use crate::matcher::FormulaMatcher;
use crate::metrics;
use crate::searcher::{extract_info, Paginator, RawItem, ShoppingSearcher, SortMode};
use crate::text::TextNormalizer;

/// Runs ingest jobs against a search backend and a food catalog.
pub struct IngestPipeline<'a> {
    searcher: &'a dyn ShoppingSearcher,
    catalog: &'a dyn FoodCatalog,
    config: &'a Config,
}

impl<'a> IngestPipeline<'a> {
    pub fn new(
        searcher: &'a dyn ShoppingSearcher,
        catalog: &'a dyn FoodCatalog,
        config: &'a Config,
    ) -> Self {
        Self {
            searcher,
            catalog,
            config,
        }
    }

    /// Full 3-track collection followed by persistence.
    ///
    /// Discovered brands are merged into `dictionary` and written through
    /// `store` before any item is normalized.
    pub async fn run_three_track(
        &self,
        dictionary: &mut BrandDictionary,
        store: &DictionaryStore,
    ) -> Result<IngestReport, PipelineError> {
        self.searcher.check_credentials()?;
        info!(
            searcher = self.searcher.name(),
            brands = dictionary.total_brands(),
            "Starting 3-track ingest"
        );

        let collection = Collector::new(self.searcher, self.config)
            .collect(dictionary)
            .await?;

        if !collection.discovered_brands.is_empty() {
            match store.save(dictionary) {
                Ok(()) => info!(
                    added = collection.discovered_brands.len(),
                    path = %store.path().display(),
                    "Brand dictionary updated"
                ),
                Err(e) => error!(error = %e, "Failed to save brand dictionary"),
            }
        }

        let mut report = IngestReport {
            track_a: collection.track_a,
            track_b: collection.track_b,
            deduplicated: collection.deduplicated,
            filtered: collection.items.len(),
            discovered_brands: collection.discovered_brands,
            ..Default::default()
        };

        self.persist_items(&collection.items, dictionary, &mut report)?;
        self.finish(&report);
        Ok(report)
    }

    /// Fetch one query without post-filters and persist the results.
    pub async fn run_single_query(
        &self,
        query: &str,
        max_results: u32,
        dictionary: &BrandDictionary,
    ) -> Result<IngestReport, PipelineError> {
        self.searcher.check_credentials()?;
        info!(query = query, max = max_results, "Starting single-query ingest");

        let items = Paginator::from_config(&self.config.fetch)
            .fetch_all(self.searcher, query, SortMode::Similarity, max_results)
            .await?;
        metrics::ITEMS_COLLECTED
            .with_label_values(&["single_query"])
            .inc_by(items.len() as u64);

        let mut report = IngestReport {
            deduplicated: items.len(),
            filtered: items.len(),
            ..Default::default()
        };

        self.persist_items(&items, dictionary, &mut report)?;
        self.finish(&report);
        Ok(report)
    }

    /// Normalize, parse and store each item in its own transaction.
    ///
    /// Invalid items and per-item write failures are counted and skipped.
    /// A poisoned catalog lock aborts the batch.
    fn persist_items(
        &self,
        items: &[RawItem],
        dictionary: &BrandDictionary,
        report: &mut IngestReport,
    ) -> Result<(), PipelineError> {
        let normalizer = TextNormalizer::new(dictionary);
        let matcher = FormulaMatcher::from_dictionary(dictionary);

        for item in items {
            let food = build_food(item, &normalizer, &matcher);
            match self.catalog.store_food(&food) {
                Ok(outcome) => {
                    metrics::FOODS_PERSISTED
                        .with_label_values(&[outcome.label()])
                        .inc();
                    if outcome.is_inserted() {
                        report.saved += 1;
                    } else {
                        report.skipped += 1;
                    }
                }
                Err(CatalogError::Validation(reason)) => {
                    metrics::FOODS_PERSISTED
                        .with_label_values(&["invalid"])
                        .inc();
                    warn!(product_id = ?food.product_id, reason = %reason, "Skipping invalid food");
                    report.failed += 1;
                }
                Err(CatalogError::LockPoisoned) => return Err(CatalogError::LockPoisoned.into()),
                Err(e) => {
                    metrics::FOODS_PERSISTED.with_label_values(&["failed"]).inc();
                    warn!(product_id = ?food.product_id, error = %e, "Failed to store food");
                    report.failed += 1;
                }
            }
        }

        Ok(())
    }

    fn finish(&self, report: &IngestReport) {
        if let Ok(stats) = self.catalog.stats() {
            metrics::CATALOG_FOODS.set(stats.total_foods as i64);
        }
        info!(
            saved = report.saved,
            skipped = report.skipped,
            failed = report.failed,
            discovered = report.discovered_brands.len(),
            "Ingest complete"
        );
    }
}

/// Turn a raw item into a catalog record.
///
/// Attributes come from the title; the item's own brand field fills in
/// when the title names no known brand.
pub fn build_food(item: &RawItem, normalizer: &TextNormalizer, matcher: &FormulaMatcher) -> NewFood {
    let info = extract_info(item);
    let parsed = matcher.parse_product_name(&info.name);
    let normalized = normalizer.normalize_item(info);

    NewFood {
        name: normalized.name,
        brand: parsed.brand.or(normalized.brand),
        category: parsed.category,
        age_class: parsed.age,
        type_tag: parsed.type_tag,
        size: parsed.size,
        shop_category: normalized.category,
        min_price: normalized.min_price,
        max_price: normalized.max_price,
        link: normalized.link,
        image: normalized.image,
        product_id: normalized.product_id,
        manufacturer: normalized.maker,
        mall_name: normalized.mall_name,
    }
}
