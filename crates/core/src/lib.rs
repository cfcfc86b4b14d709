pub mod catalog;
pub mod collector;
pub mod config;
pub mod dictionary;
pub mod matcher;
pub mod metrics;
pub mod pipeline;
pub mod searcher;
pub mod testing;
pub mod text;

pub use catalog::{
    CatalogError, CatalogStats, FoodCatalog, NewFood, SqliteCatalog, StoreOutcome, StoredFood,
};
pub use collector::{
    build_query, default_price_bands, discover_new_brands, Collection, Collector, PriceBand,
};
pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, Config, ConfigError,
    SanitizedConfig,
};
pub use dictionary::{BrandDictionary, BrandGroup, DictionaryError, DictionaryStore};
pub use matcher::{AgeClass, FoodCategory, FormulaMatcher, ParsedAttributes, TypeTag};
pub use pipeline::{build_food, IngestPipeline, IngestReport, PipelineError};
pub use searcher::{
    dedup_by_product_id, extract_info, ItemInfo, NaverSearcher, NormalizedItem, Paginator,
    RawItem, SearchError, SearchRequest, ShoppingSearcher, SortMode,
};
pub use text::{normalize_text, TextNormalizer};
