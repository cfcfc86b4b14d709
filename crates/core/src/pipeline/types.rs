//! Types for the ingest pipeline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that abort an ingest run.
///
/// Transport failures and per-item write failures never surface here; they
/// are logged and counted in the report instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("searcher error: {0}")]
    Searcher(#[from] crate::searcher::SearchError),

    #[error("catalog error: {0}")]
    Catalog(#[from] crate::catalog::CatalogError),
}

impl PipelineError {
    pub fn is_auth(&self) -> bool {
        matches!(self, PipelineError::Searcher(e) if e.is_auth())
    }
}

/// Summary of one ingest run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestReport {
    /// Items kept by Track A (zero in single-query mode).
    pub track_a: usize,
    /// Items kept by Track B (zero in single-query mode).
    pub track_b: usize,
    /// Items left after cross-track deduplication, or fetched in single-query mode.
    pub deduplicated: usize,
    /// Items handed to persistence.
    pub filtered: usize,
    /// Foods written.
    pub saved: usize,
    /// Foods skipped as duplicates.
    pub skipped: usize,
    /// Items rejected by validation or failed to write.
    pub failed: usize,
    /// Brands added to the dictionary during this run.
    pub discovered_brands: Vec<String>,
}
