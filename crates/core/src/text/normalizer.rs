//! Dictionary-aware canonicalization of brands, names, categories and prices.

use once_cell::sync::Lazy;
use regex_lite::Regex;

use super::{collapse_whitespace, normalize_text};
use crate::dictionary::BrandDictionary;
use crate::searcher::{ItemInfo, NormalizedItem};

/// Promotional phrases sellers put in listing titles.
static NOISE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"무료배송\??|오늘출발|당일발송|이벤트특가|한정판매|최저가|할인|쿠폰|사은품|\d+%")
        .unwrap()
});

static PRICE_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\d,]+").unwrap());

/// Short category labels and their canonical forms, in lookup order.
const CATEGORY_MAPPING: &[(&str, &str)] = &[
    ("건식", "건식사료"),
    ("습식", "습식사료"),
    ("간식", "간식"),
    ("영양제", "영양제"),
    ("사료", "사료"),
    ("건사료", "건식사료"),
    ("습사료", "습식사료"),
];

/// Maps raw listing text onto canonical dictionary entries.
///
/// Built from a [`BrandDictionary`] by whoever owns the run; brand lookups
/// follow the dictionary's iteration order, so the first matching entry wins.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    brands: Vec<String>,
}

impl TextNormalizer {
    pub fn new(dictionary: &BrandDictionary) -> Self {
        Self::from_brands(dictionary.brand_names())
    }

    pub fn from_brands(brands: Vec<String>) -> Self {
        let brands = brands
            .into_iter()
            .map(|b| normalize_text(&b))
            .filter(|b| !b.is_empty())
            .collect();
        Self { brands }
    }

    pub fn brands(&self) -> &[String] {
        &self.brands
    }

    pub fn normalize_text(&self, text: &str) -> String {
        normalize_text(text)
    }

    /// Canonicalize a brand name against the dictionary.
    ///
    /// Exact (case-insensitive) match first, then containment in either
    /// direction. Unknown brands come back cleaned but otherwise unchanged.
    pub fn normalize_brand(&self, brand: Option<&str>) -> Option<String> {
        let cleaned = normalize_text(brand?);
        if cleaned.is_empty() {
            return None;
        }
        let lower = cleaned.to_lowercase();

        if let Some(exact) = self.brands.iter().find(|b| b.to_lowercase() == lower) {
            return Some(exact.clone());
        }

        let contained = self.brands.iter().find(|b| {
            let candidate = b.to_lowercase();
            candidate.contains(&lower) || lower.contains(&candidate)
        });

        Some(contained.cloned().unwrap_or(cleaned))
    }

    /// Clean a product title for storage: no brackets, no promo phrases.
    pub fn normalize_product_name(&self, name: &str) -> String {
        let name = normalize_text(name);
        let name: String = name
            .chars()
            .filter(|c| !matches!(c, '(' | ')' | '[' | ']' | '{' | '}'))
            .collect();
        let name = NOISE.replace_all(&name, "");
        collapse_whitespace(&name)
    }

    pub fn normalize_category(&self, category: Option<&str>) -> Option<String> {
        let category = normalize_text(category?);
        if category.is_empty() {
            return None;
        }

        if let Some((_, canonical)) = CATEGORY_MAPPING.iter().find(|(raw, _)| *raw == category) {
            return Some(canonical.to_string());
        }

        if let Some((_, canonical)) = CATEGORY_MAPPING
            .iter()
            .find(|(raw, _)| category.contains(raw))
        {
            return Some(canonical.to_string());
        }

        Some(category)
    }

    /// Find the dictionary brand a product name mentions.
    ///
    /// A brand the name starts with beats one that merely appears inside it.
    pub fn extract_brand_from_name(&self, name: &str) -> Option<String> {
        let lower = normalize_text(name).to_lowercase();
        if lower.is_empty() {
            return None;
        }

        self.brands
            .iter()
            .find(|b| lower.starts_with(&b.to_lowercase()))
            .or_else(|| self.brands.iter().find(|b| lower.contains(&b.to_lowercase())))
            .cloned()
    }

    /// Parse the first digit/comma run of a price string, e.g. `"32,900원"`.
    pub fn normalize_price(price: &str) -> Option<f64> {
        let digits = PRICE_DIGITS.find(price)?.as_str().replace(',', "");
        digits.parse::<f64>().ok()
    }

    /// Canonicalize an extracted item's text fields.
    pub fn normalize_item(&self, info: ItemInfo) -> NormalizedItem {
        let category = info
            .deepest_category()
            .and_then(|c| self.normalize_category(Some(c)));
        let maker = info
            .maker
            .as_deref()
            .map(normalize_text)
            .filter(|m| !m.is_empty());

        NormalizedItem {
            name: self.normalize_product_name(&info.name),
            brand: self.normalize_brand(info.brand.as_deref()),
            maker,
            category,
            product_id: info.product_id,
            min_price: info.min_price,
            max_price: info.max_price,
            link: info.link,
            image: info.image,
            mall_name: info.mall_name,
            product_type: info.product_type,
        }
    }
}
