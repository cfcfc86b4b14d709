//! Shopping search abstraction.
//!
//! This module provides a `ShoppingSearcher` trait over the remote shopping
//! search endpoint, the Naver implementation, paginated fetching with a fixed
//! inter-call delay, and product-id deduplication.

mod dedup;
mod naver;
mod paginate;
mod types;

pub use dedup::dedup_by_product_id;
pub use naver::NaverSearcher;
pub use paginate::{Paginator, MAX_PAGE_SIZE, MAX_START};
pub use types::*;
