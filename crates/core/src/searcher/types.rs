//! Types for the shopping search system.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::text::strip_markup;

/// Product-type code of aggregated catalog/comparison listings.
pub const CATALOG_PRODUCT_TYPE: u32 = 2;

/// Parameters for a single search call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Free-text search query.
    pub query: String,
    /// Results per page (1..=100).
    pub display: u32,
    /// 1-based offset of the first result (1..=1000).
    pub start: u32,
    /// Result ordering.
    pub sort: SortMode,
    /// Optional category exclusion passed through to the API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<String>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            display: 10,
            start: 1,
            sort: SortMode::Similarity,
            exclude: None,
        }
    }

    pub fn display(mut self, display: u32) -> Self {
        self.display = display;
        self
    }

    pub fn start(mut self, start: u32) -> Self {
        self.start = start;
        self
    }

    pub fn sort(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }

    pub fn exclude(mut self, exclude: impl Into<String>) -> Self {
        self.exclude = Some(exclude.into());
        self
    }
}

/// Result ordering supported by the search API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    #[default]
    Similarity,
    Date,
    PriceAsc,
    PriceDesc,
}

impl SortMode {
    /// Value of the API's `sort` parameter.
    pub fn as_api_param(&self) -> &'static str {
        match self {
            SortMode::Similarity => "sim",
            SortMode::Date => "date",
            SortMode::PriceAsc => "asc",
            SortMode::PriceDesc => "dsc",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_api_param())
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sim" | "similarity" => Ok(SortMode::Similarity),
            "date" => Ok(SortMode::Date),
            "asc" | "price_asc" => Ok(SortMode::PriceAsc),
            "dsc" | "desc" | "price_desc" => Ok(SortMode::PriceDesc),
            other => Err(format!("unknown sort mode: {}", other)),
        }
    }
}

/// One search-result record exactly as the API returns it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawItem {
    /// Listing title, may contain `<b>` highlight markup.
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    /// Lowest price as a decimal string.
    #[serde(default, deserialize_with = "lenient_string")]
    pub lprice: Option<String>,
    /// Highest price as a decimal string (often empty).
    #[serde(default, deserialize_with = "lenient_string")]
    pub hprice: Option<String>,
    #[serde(default)]
    pub mall_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub product_id: Option<String>,
    /// Listing kind; `2` marks catalog/comparison listings.
    #[serde(default, deserialize_with = "lenient_u32")]
    pub product_type: Option<u32>,
    #[serde(default)]
    pub maker: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub category1: Option<String>,
    #[serde(default)]
    pub category2: Option<String>,
    #[serde(default)]
    pub category3: Option<String>,
    #[serde(default)]
    pub category4: Option<String>,
}

impl RawItem {
    /// External product id, if present and non-blank.
    pub fn product_id(&self) -> Option<&str> {
        self.product_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// Lowest price as a number.
    pub fn low_price(&self) -> Option<f64> {
        parse_price_field(self.lprice.as_deref())
    }

    /// The four category levels, shallowest first.
    pub fn categories(&self) -> [Option<&str>; 4] {
        [
            self.category1.as_deref(),
            self.category2.as_deref(),
            self.category3.as_deref(),
            self.category4.as_deref(),
        ]
    }

    /// Brand field, trimmed, if non-blank.
    pub fn brand_name(&self) -> Option<&str> {
        self.brand.as_deref().map(str::trim).filter(|b| !b.is_empty())
    }

    pub fn is_catalog_listing(&self) -> bool {
        self.product_type == Some(CATALOG_PRODUCT_TYPE)
    }
}

/// A raw item with markup removed and prices parsed.
///
/// Maker, brand and category fields are passed through untouched; the
/// normalizer canonicalizes them later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemInfo {
    pub product_id: Option<String>,
    pub name: String,
    pub link: Option<String>,
    pub image: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub mall_name: Option<String>,
    pub product_type: Option<u32>,
    pub maker: Option<String>,
    pub brand: Option<String>,
    pub category1: Option<String>,
    pub category2: Option<String>,
    pub category3: Option<String>,
    pub category4: Option<String>,
}

impl ItemInfo {
    /// Most specific non-blank category level.
    pub fn deepest_category(&self) -> Option<&str> {
        [
            self.category4.as_deref(),
            self.category3.as_deref(),
            self.category2.as_deref(),
            self.category1.as_deref(),
        ]
        .into_iter()
        .flatten()
        .find(|c| !c.trim().is_empty())
    }
}

/// Convert a raw API item into its extracted shape.
pub fn extract_info(item: &RawItem) -> ItemInfo {
    ItemInfo {
        product_id: item.product_id().map(str::to_string),
        name: strip_markup(&item.title),
        link: item.link.clone(),
        image: item.image.clone(),
        min_price: parse_price_field(item.lprice.as_deref()),
        max_price: parse_price_field(item.hprice.as_deref()),
        mall_name: item.mall_name.clone(),
        product_type: item.product_type,
        maker: item.maker.clone(),
        brand: item.brand.clone(),
        category1: item.category1.clone(),
        category2: item.category2.clone(),
        category3: item.category3.clone(),
        category4: item.category4.clone(),
    }
}

/// An extracted item after brand, name and category canonicalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedItem {
    pub product_id: Option<String>,
    pub name: String,
    pub brand: Option<String>,
    pub maker: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub link: Option<String>,
    pub image: Option<String>,
    pub mall_name: Option<String>,
    pub product_type: Option<u32>,
}

fn parse_price_field(value: Option<&str>) -> Option<f64> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }
    value.parse::<f64>().ok()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Str(String),
    Int(i64),
    Float(f64),
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<StringOrNumber>::deserialize(deserializer)?.map(|v| match v {
            StringOrNumber::Str(s) => s,
            StringOrNumber::Int(n) => n.to_string(),
            StringOrNumber::Float(n) => n.to_string(),
        }),
    )
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<StringOrNumber>::deserialize(deserializer)?.and_then(|v| match v {
            StringOrNumber::Str(s) => s.trim().parse().ok(),
            StringOrNumber::Int(n) => u32::try_from(n).ok(),
            StringOrNumber::Float(_) => None,
        }),
    )
}

/// Errors that can occur during search operations.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Search API credentials are not configured")]
    MissingCredentials,

    #[error("Search backend connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Search backend API error: {0}")]
    ApiError(String),

    #[error("Invalid search response: {0}")]
    InvalidResponse(String),

    #[error("Request timeout")]
    Timeout,
}

impl SearchError {
    /// Whether this is the one fatal class (missing credentials).
    pub fn is_auth(&self) -> bool {
        matches!(self, SearchError::MissingCredentials)
    }
}

/// Trait for shopping search backends.
#[async_trait]
pub trait ShoppingSearcher: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Fail fast before any network call when credentials are missing.
    fn check_credentials(&self) -> Result<(), SearchError> {
        Ok(())
    }

    /// Execute one search call.
    ///
    /// Only `SearchError::MissingCredentials` is returned as an error;
    /// transport failures are logged and reported as an empty page.
    async fn search(&self, request: &SearchRequest) -> Result<Vec<RawItem>, SearchError>;
}
